use super::*;

fn checker(w: u32, h: u32) -> PixelSurface {
    let mut s = PixelSurface::transparent(w, h).unwrap();
    for y in 0..h {
        for x in 0..w {
            let v = (y * w + x) as u8;
            s.set_pixel(x, y, Rgb8::new(v, v, v), 255);
        }
    }
    s
}

#[test]
fn new_fills_opaque_with_no_text() {
    let s = PixelSurface::new(3, 2, Rgb8::new(1, 2, 3)).unwrap();
    assert_eq!(s.len(), 6);
    assert!(s.color().iter().all(|c| *c == Rgb8::new(1, 2, 3)));
    assert!(s.opacity().iter().all(|a| *a == 255));
    assert!(s.text().iter().all(Option::is_none));
}

#[test]
fn zero_dimensions_are_rejected() {
    assert!(matches!(
        PixelSurface::new(0, 4, Rgb8::BLACK),
        Err(HalfblockError::InvalidDimensions {
            width: 0,
            height: 4
        })
    ));
    assert!(PixelSurface::transparent(4, 0).is_err());
    let mut s = PixelSurface::transparent(2, 2).unwrap();
    assert!(s.resize(0, 1).is_err());
    assert!(s.scale(3, 0, ScaleAlgorithm::Bilinear).is_err());
}

#[test]
fn from_rgba_copies_alpha_verbatim() {
    let rgba = [10, 20, 30, 128, 40, 50, 60, 0];
    let s = PixelSurface::from_rgba(&rgba, 2, 1).unwrap();
    assert_eq!(s.pixel(0, 0), Some((Rgb8::new(10, 20, 30), 128)));
    assert_eq!(s.pixel(1, 0), Some((Rgb8::new(40, 50, 60), 0)));
}

#[test]
fn to_rgba_exports_opacity_as_alpha() {
    let rgba = vec![1, 2, 3, 255, 4, 5, 6, 7];
    let s = PixelSurface::from_rgba(&rgba, 1, 2).unwrap();
    assert_eq!(s.to_rgba(), rgba);
}

#[test]
fn from_rgba_short_buffer_is_buffer_too_small() {
    let err = PixelSurface::from_rgba(&[0; 7], 2, 1).unwrap_err();
    assert!(matches!(
        err,
        HalfblockError::BufferTooSmall {
            needed: 8,
            actual: 7
        }
    ));
}

#[test]
fn set_alpha_never_creates_or_removes_absence() {
    let mut s = PixelSurface::new(3, 1, Rgb8::WHITE).unwrap();
    s.opacity_mut()[1] = 0;
    s.set_alpha(0);
    assert_eq!(s.opacity(), &[1, 0, 1]);
    s.set_alpha(200);
    assert_eq!(s.opacity(), &[200, 0, 200]);
}

#[test]
fn clear_transparent_resets_all_channels() {
    let mut s = PixelSurface::new(2, 2, Rgb8::WHITE).unwrap();
    s.put_str(0, 0, "hi");
    s.clear_transparent();
    assert!(s.opacity().iter().all(|a| *a == 0));
    assert!(s.text().iter().all(Option::is_none));
    assert!(s.color().iter().all(|c| *c == Rgb8::BLACK));
}

#[test]
fn resize_clears_content() {
    let mut s = PixelSurface::new(2, 2, Rgb8::WHITE).unwrap();
    s.resize(4, 3).unwrap();
    assert_eq!((s.width(), s.height()), (4, 3));
    assert_eq!(s.len(), 12);
    assert!(s.opacity().iter().all(|a| *a == 0));
}

#[test]
fn put_str_stops_at_right_edge() {
    let mut s = PixelSurface::transparent(4, 2).unwrap();
    assert_eq!(s.put_str(2, 0, "abcdef"), 2);
    assert_eq!(s.text()[2], Some('a'));
    assert_eq!(s.text()[3], Some('b'));
    assert_eq!(s.put_str(0, 5, "x"), 0);
}

#[test]
fn fill_rect_is_clipped() {
    let mut s = PixelSurface::transparent(4, 4).unwrap();
    s.fill_rect(-2, 3, 4, 10, Rgb8::WHITE, 255);
    let lit: Vec<usize> = (0..s.len()).filter(|&i| s.opacity()[i] != 0).collect();
    assert_eq!(lit, vec![12, 13]);
}

#[test]
fn copy_to_requires_large_enough_destination() {
    let src = checker(3, 2);
    let mut small = PixelSurface::transparent(2, 2).unwrap();
    assert!(matches!(
        src.copy_to(&mut small),
        Err(HalfblockError::BufferTooSmall { .. })
    ));

    let mut big = PixelSurface::transparent(4, 4).unwrap();
    src.copy_to(&mut big).unwrap();
    assert_eq!(big.pixel(2, 1), src.pixel(2, 1));
    assert_eq!(big.pixel(3, 3).map(|p| p.1), Some(0));
}

#[test]
fn assign_from_is_exact_copy() {
    let mut src = checker(3, 3);
    src.set_position(-4, 7);
    src.z = 9;
    src.set_text(1, 0, Some('x'));
    let mut dst = PixelSurface::transparent(1, 1).unwrap();
    dst.assign_from(&src);
    assert_eq!((dst.width(), dst.height()), (3, 3));
    assert_eq!(dst.color(), src.color());
    assert_eq!(dst.opacity(), src.opacity());
    assert_eq!(dst.text(), src.text());
    assert_eq!(dst.position(), Position::new(-4, 7));
    assert_eq!(dst.z, 9);
}

#[test]
fn scale_to_same_size_keeps_buffer_identity() {
    let mut s = checker(4, 4);
    let before_ptr = s.color().as_ptr();
    let before = s.color().to_vec();
    s.scale(4, 4, ScaleAlgorithm::Bicubic).unwrap();
    assert_eq!(s.color().as_ptr(), before_ptr);
    assert_eq!(s.color(), before.as_slice());
}

#[test]
fn scale_reallocates_and_clears_text() {
    let mut s = checker(2, 2);
    s.put_str(0, 0, "ab");
    s.scale(4, 4, ScaleAlgorithm::NearestNeighbor).unwrap();
    assert_eq!((s.width(), s.height()), (4, 4));
    assert!(s.text().iter().all(Option::is_none));
    // nearest upscale by 2 replicates each source pixel into a 2x2 block
    assert_eq!(s.pixel(0, 0), s.pixel(1, 1));
    assert_eq!(s.pixel(3, 3).unwrap().0, Rgb8::new(3, 3, 3));
}

#[test]
fn scale_in_place_clip_keeps_outer_dimensions() {
    let mut s = PixelSurface::new(4, 4, Rgb8::WHITE).unwrap();
    s.scale_in_place(2, 2, 2, 2, FitMode::Clip, ScaleAlgorithm::NearestNeighbor)
        .unwrap();
    assert_eq!((s.width(), s.height()), (4, 4));
    let visible: Vec<(u32, u32)> = (0..4)
        .flat_map(|y| (0..4).map(move |x| (x, y)))
        .filter(|&(x, y)| s.pixel(x, y).unwrap().1 != 0)
        .collect();
    assert_eq!(visible, vec![(1, 1), (2, 1), (1, 2), (2, 2)]);
}

#[test]
fn scale_in_place_clip_truncates_oversized_content() {
    let mut s = PixelSurface::new(4, 4, Rgb8::WHITE).unwrap();
    s.scale_in_place(8, 8, 2, 2, FitMode::Clip, ScaleAlgorithm::Bilinear)
        .unwrap();
    assert_eq!((s.width(), s.height()), (4, 4));
    assert!(s.opacity().iter().all(|a| *a == 255));
}

#[test]
fn scale_in_place_autoenlarge_grows_and_shifts_position() {
    let mut s = PixelSurface::new(4, 4, Rgb8::WHITE).unwrap();
    s.set_position(10, 10);
    s.scale_in_place(8, 8, 2, 2, FitMode::AutoEnlarge, ScaleAlgorithm::NearestNeighbor)
        .unwrap();
    assert_eq!((s.width(), s.height()), (8, 8));
    assert_eq!(s.position(), Position::new(8, 8));
    assert!(s.opacity().iter().all(|a| *a == 255));
}

#[test]
fn rotate_in_place_clip_keeps_dimensions() {
    let mut s = PixelSurface::new(6, 2, Rgb8::WHITE).unwrap();
    s.rotate_in_place(
        std::f64::consts::FRAC_PI_2,
        3,
        1,
        FitMode::Clip,
        RotateAlgorithm::NearestNeighbor,
    )
    .unwrap();
    assert_eq!((s.width(), s.height()), (6, 2));
    let visible = s.opacity().iter().filter(|a| **a != 0).count();
    assert_eq!(visible, 4);
}

#[test]
fn rotate_in_place_autoenlarge_fits_everything() {
    let mut s = PixelSurface::new(6, 2, Rgb8::WHITE).unwrap();
    s.rotate_in_place(
        std::f64::consts::FRAC_PI_2,
        3,
        1,
        FitMode::AutoEnlarge,
        RotateAlgorithm::NearestNeighbor,
    )
    .unwrap();
    assert_eq!(s.width(), 6);
    assert_eq!(s.height(), 6);
    let visible = s.opacity().iter().filter(|a| **a != 0).count();
    assert_eq!(visible, 12);
}

#[test]
fn rotate_rejects_non_finite_angle() {
    let mut s = checker(2, 2);
    assert!(matches!(
        s.rotate(f64::NAN, RotateAlgorithm::Bilinear),
        Err(HalfblockError::InvalidValue(_))
    ));
}

#[test]
fn clip_span_handles_negative_and_overflowing_offsets() {
    assert_eq!(
        clip_span(-2, 5, 10),
        Some(Span {
            src_start: 2,
            dst_start: 0,
            len: 3
        })
    );
    assert_eq!(
        clip_span(8, 5, 10),
        Some(Span {
            src_start: 0,
            dst_start: 8,
            len: 2
        })
    );
    assert_eq!(clip_span(10, 5, 10), None);
    assert_eq!(clip_span(-5, 5, 10), None);
}

#[test]
fn coverage_claims_each_cell_once() {
    let mut s = PixelSurface::transparent(70, 1).unwrap();
    {
        let mut cells = s.cells_for_compositing();
        assert!(cells.claim(65));
        assert!(!cells.claim(65));
        assert!(cells.claim(64));
    }
    let mut cells = s.cells_for_compositing();
    assert!(cells.claim(65));
}
