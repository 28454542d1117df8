use super::*;
use crate::foundation::core::Rgb8;

fn run(effect: &mut impl Effect, c: Rgb8) -> Rgb8 {
    let input = PixelSurface::new(1, 1, c).unwrap();
    let mut output = PixelSurface::transparent(1, 1).unwrap();
    effect.run(&input, &mut output, FrameIndex(0)).unwrap();
    output.color()[0]
}

#[test]
fn brighter_moves_toward_white() {
    assert_eq!(
        run(&mut Brighter::new(50), Rgb8::new(0, 100, 255)),
        Rgb8::new(128, 178, 255)
    );
    assert_eq!(run(&mut Brighter::new(100), Rgb8::BLACK), Rgb8::WHITE);
    assert_eq!(run(&mut Brighter::new(0), Rgb8::new(1, 2, 3)), Rgb8::new(1, 2, 3));
}

#[test]
fn darker_moves_toward_black() {
    assert_eq!(
        run(&mut Darker::new(50), Rgb8::new(0, 100, 255)),
        Rgb8::new(0, 50, 127)
    );
    assert_eq!(run(&mut Darker::new(100), Rgb8::WHITE), Rgb8::BLACK);
}

#[test]
fn percent_over_100_is_invalid() {
    assert!(matches!(
        Brighter::new(101).validate(),
        Err(HalfblockError::InvalidValue(_))
    ));
    assert!(matches!(
        Darker::new(250).validate(),
        Err(HalfblockError::InvalidValue(_))
    ));
    Darker::new(100).validate().unwrap();
}
