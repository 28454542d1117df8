use super::*;
use crate::foundation::core::Rgb8;

fn visible(s: &PixelSurface) -> usize {
    s.opacity().iter().filter(|a| **a != 0).count()
}

#[test]
fn rotate_by_zero_copies_input_centered() {
    let input = PixelSurface::new(2, 2, Rgb8::WHITE).unwrap();
    let mut output = PixelSurface::transparent(4, 4).unwrap();
    Rotate::fixed(0.0)
        .run(&input, &mut output, FrameIndex(0))
        .unwrap();
    assert_eq!(visible(&output), 4);
    assert_eq!(output.pixel(1, 1).unwrap().1, 255);
    assert_eq!(output.pixel(2, 2).unwrap().1, 255);
}

#[test]
fn rotate_quarter_turn_keeps_output_dimensions() {
    let input = PixelSurface::new(4, 2, Rgb8::WHITE).unwrap();
    let mut output = PixelSurface::transparent(6, 6).unwrap();
    Rotate::fixed(90.0)
        .run(&input, &mut output, FrameIndex(0))
        .unwrap();
    assert_eq!((output.width(), output.height()), (6, 6));
    assert_eq!(visible(&output), 8);
    // the wide bar now stands upright
    assert_eq!(output.pixel(0, 3).unwrap().1, 0);
    assert_eq!(output.pixel(3, 1).unwrap().1, 255);
}

#[test]
fn rotate_angle_ramps_and_clamps() {
    let r = Rotate {
        from_degrees: 0.0,
        to_degrees: 180.0,
        duration: 4,
        margin: 2,
        algorithm: RotateAlgorithm::Bilinear,
    };
    assert_eq!(r.angle_at(FrameIndex(2)), 90f64.to_radians());
    assert_eq!(r.angle_at(FrameIndex(99)), 180f64.to_radians());
    assert_eq!(r.declared_expansion(), Some(Expansion::new(2, 2)));
    assert_eq!(Rotate::fixed(10.0).declared_expansion(), None);
}

#[test]
fn rotate_validation() {
    assert!(matches!(
        Rotate::fixed(f64::INFINITY).validate(),
        Err(HalfblockError::InvalidValue(_))
    ));
    let mut r = Rotate::fixed(1.0);
    r.duration = 0;
    assert!(matches!(r.validate(), Err(HalfblockError::InvalidDuration(_))));
}

#[test]
fn zoom_doubles_content_around_center() {
    let input = PixelSurface::new(2, 2, Rgb8::WHITE).unwrap();
    let mut output = PixelSurface::transparent(6, 6).unwrap();
    let mut zoom = Zoom::new(1.0, 2.0, 10).with_margin(2);
    zoom.run(&input, &mut output, FrameIndex(10)).unwrap();
    assert_eq!(visible(&output), 16);
    assert_eq!(output.pixel(1, 1).unwrap().1, 255);
    assert_eq!(output.pixel(0, 0).unwrap().1, 0);
}

#[test]
fn zoom_at_unit_scale_is_a_centered_copy() {
    let input = PixelSurface::new(2, 2, Rgb8::WHITE).unwrap();
    let mut output = PixelSurface::transparent(4, 4).unwrap();
    let mut zoom = Zoom::new(1.0, 3.0, 10);
    zoom.run(&input, &mut output, FrameIndex(0)).unwrap();
    assert_eq!(visible(&output), 4);
}

#[test]
fn zoom_shrinks_to_at_least_one_cell() {
    let input = PixelSurface::new(3, 3, Rgb8::WHITE).unwrap();
    let mut output = PixelSurface::transparent(3, 3).unwrap();
    let mut zoom = Zoom::new(0.01, 0.01, 1);
    zoom.run(&input, &mut output, FrameIndex(0)).unwrap();
    assert_eq!(visible(&output), 1);
    assert_eq!(output.pixel(1, 1).unwrap().1, 255);
}

#[test]
fn zoom_scratch_follows_each_new_input() {
    let mut zoom = Zoom::new(2.0, 2.0, 1).with_margin(1);
    let white = PixelSurface::new(1, 1, Rgb8::WHITE).unwrap();
    let red = PixelSurface::new(1, 1, Rgb8::new(255, 0, 0)).unwrap();

    let mut output = PixelSurface::transparent(3, 3).unwrap();
    zoom.run(&white, &mut output, FrameIndex(0)).unwrap();
    assert_eq!(output.pixel(1, 1), Some((Rgb8::WHITE, 255)));

    let mut output = PixelSurface::transparent(3, 3).unwrap();
    zoom.run(&red, &mut output, FrameIndex(1)).unwrap();
    assert_eq!(visible(&output), 4);
    assert!(
        output
            .color()
            .iter()
            .zip(output.opacity())
            .filter(|(_, a)| **a != 0)
            .all(|(c, _)| *c == Rgb8::new(255, 0, 0))
    );
}

#[test]
fn zoom_validation() {
    assert!(Zoom::new(0.0, 1.0, 5).validate().is_err());
    assert!(Zoom::new(1.0, MAX_ZOOM * 2.0, 5).validate().is_err());
    assert!(matches!(
        Zoom::new(1.0, 2.0, 0).validate(),
        Err(HalfblockError::InvalidDuration(_))
    ));
    Zoom::new(0.5, 4.0, 5).validate().unwrap();
}
