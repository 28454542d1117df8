use super::*;
use crate::foundation::core::Rgb8;

fn solid(w: u32, h: u32, c: Rgb8, x: i32, y: i32, z: i32) -> PixelSurface {
    let mut s = PixelSurface::new(w, h, c).unwrap();
    s.set_position(x, y);
    s.z = z;
    s
}

const RED: Rgb8 = Rgb8::new(255, 0, 0);
const GREEN: Rgb8 = Rgb8::new(0, 255, 0);
const BLUE: Rgb8 = Rgb8::new(0, 0, 255);

#[test]
fn z_order_is_descending_and_stable() {
    let a = solid(1, 1, RED, 0, 0, 1);
    let b = solid(1, 1, RED, 0, 0, 5);
    let c = solid(1, 1, RED, 0, 0, 1);
    let d = solid(1, 1, RED, 0, 0, -2);
    let order = z_order(&[&a, &b, &c, &d]);
    assert_eq!(order.front_to_back(), &[1, 0, 2, 3]);
    assert_eq!(order.back_to_front().collect::<Vec<_>>(), vec![3, 2, 0, 1]);
}

#[test]
fn z_order_all_equal_is_identity() {
    let surfaces: Vec<PixelSurface> = (0..5).map(|_| solid(1, 1, RED, 0, 0, 3)).collect();
    let refs: Vec<&PixelSurface> = surfaces.iter().collect();
    assert_eq!(z_order(&refs).front_to_back(), &[0, 1, 2, 3, 4]);
}

#[test]
fn z_order_drops_inputs_over_capacity() {
    let one = solid(1, 1, RED, 0, 0, 0);
    let refs = vec![&one; MAX_COMPOSITE_SURFACES + 3];
    let order = z_order(&refs);
    assert_eq!(order.len(), MAX_COMPOSITE_SURFACES);
}

#[test]
fn binary_highest_z_wins_regardless_of_input_order() {
    let low = solid(3, 1, RED, 0, 0, 0);
    let high = solid(2, 1, GREEN, 1, 0, 10);
    let mut dest = PixelSurface::new(4, 1, BLUE).unwrap();
    render_binary(&[&low, &high], &mut dest);
    let row: Vec<Rgb8> = dest.color().to_vec();
    assert_eq!(row, vec![RED, GREEN, GREEN, BLUE]);
}

#[test]
fn binary_skips_transparent_cells_so_lower_layers_show_through() {
    let mut top = solid(2, 1, GREEN, 0, 0, 5);
    top.opacity_mut()[0] = 0;
    let bottom = solid(2, 1, RED, 0, 0, 1);
    let mut dest = PixelSurface::new(2, 1, BLUE).unwrap();
    render_binary(&[&top, &bottom], &mut dest);
    assert_eq!(dest.color(), &[RED, GREEN]);
}

#[test]
fn binary_uncovered_cells_keep_previous_content() {
    let s = solid(1, 1, RED, 0, 0, 0);
    let mut dest = PixelSurface::new(2, 2, BLUE).unwrap();
    dest.set_text(1, 1, Some('q'));
    render_binary(&[&s], &mut dest);
    assert_eq!(dest.pixel(1, 1), Some((BLUE, 255)));
    assert_eq!(dest.text()[3], Some('q'));
}

#[test]
fn equal_z_first_inserted_is_in_front_for_every_variant() {
    let a = solid(1, 1, RED, 0, 0, 0);
    let b = solid(1, 1, GREEN, 0, 0, 0);
    for mode in [
        CompositeMode::Binary,
        CompositeMode::Over,
        CompositeMode::Aligned,
        CompositeMode::AlphaOverOpaqueBg,
        CompositeMode::AlphaGeneral,
    ] {
        let mut dest = PixelSurface::new(1, 1, BLUE).unwrap();
        composite(mode, &[&a, &b], &mut dest);
        assert_eq!(dest.color()[0], RED, "{mode:?}");
    }
}

#[test]
fn over_and_binary_agree_for_opaque_layers() {
    let layers = [
        solid(4, 4, RED, -1, -1, 2),
        solid(3, 2, GREEN, 2, 1, 7),
        solid(5, 1, BLUE, 0, 3, -1),
        solid(2, 2, Rgb8::WHITE, 1, 1, 7),
    ];
    let refs: Vec<&PixelSurface> = layers.iter().collect();
    let mut binary = PixelSurface::transparent(5, 5).unwrap();
    let mut over = PixelSurface::transparent(5, 5).unwrap();
    render_binary(&refs, &mut binary);
    render_over(&refs, &mut over);
    assert_eq!(binary.color(), over.color());
    assert_eq!(binary.opacity(), over.opacity());
}

#[test]
fn surface_over_overwrites_unconditionally() {
    let mut dest = PixelSurface::new(2, 1, BLUE).unwrap();
    let s = solid(1, 1, RED, 1, 0, -100);
    render_surface_over(&s, &mut dest);
    assert_eq!(dest.color(), &[BLUE, RED]);
}

#[test]
fn fully_outside_surfaces_contribute_nothing() {
    let right = solid(3, 3, RED, 14, 0, 0);
    let below = solid(3, 3, RED, 0, 9, 0);
    let left = solid(3, 3, RED, -3, 0, 0);
    let above = solid(3, 3, RED, 0, -40, 0);
    let huge_offset = solid(3, 3, RED, i32::MAX, i32::MIN, 0);
    let refs = [&right, &below, &left, &above, &huge_offset];
    for mode in [
        CompositeMode::Binary,
        CompositeMode::Over,
        CompositeMode::AlphaOverOpaqueBg,
        CompositeMode::AlphaGeneral,
    ] {
        let mut dest = PixelSurface::new(4, 4, BLUE).unwrap();
        composite(mode, &refs, &mut dest);
        assert!(dest.color().iter().all(|c| *c == BLUE), "{mode:?}");
    }
}

#[test]
fn partially_offscreen_surface_is_clipped() {
    let s = solid(3, 3, RED, -2, 2, 0);
    let mut dest = PixelSurface::transparent(4, 4).unwrap();
    render_binary(&[&s], &mut dest);
    let lit: Vec<(u32, u32)> = (0..4)
        .flat_map(|y| (0..4).map(move |x| (x, y)))
        .filter(|&(x, y)| dest.pixel(x, y).unwrap().1 != 0)
        .collect();
    assert_eq!(lit, vec![(0, 2), (0, 3)]);
}

#[test]
fn aligned_ignores_mismatched_sizes_and_keeps_first_opaque() {
    let mut front = PixelSurface::new(2, 2, GREEN).unwrap();
    front.opacity_mut()[3] = 0;
    front.z = 1;
    let back = PixelSurface::new(2, 2, RED).unwrap();
    let odd = PixelSurface::new(3, 2, Rgb8::WHITE).unwrap();
    let mut dest = PixelSurface::new(2, 2, BLUE).unwrap();
    render_aligned(&[&back, &odd, &front], &mut dest);
    assert_eq!(dest.color(), &[GREEN, GREEN, GREEN, RED]);
}

#[test]
fn alpha_over_opaque_background_matches_integer_formula() {
    let mut fg = solid(2, 1, RED, 0, 0, 1);
    fg.set_alpha(128);
    let mut dest = PixelSurface::new(2, 1, BLUE).unwrap();
    render_alpha_over_opaque_bg(&[&fg], &mut dest);
    assert_eq!(dest.color()[0], Rgb8::new(128, 0, 127));
    assert_eq!(dest.opacity()[0], 255);
}

#[test]
fn alpha_layers_blend_bottom_first() {
    let mut top = solid(1, 1, RED, 0, 0, 9);
    top.set_alpha(128);
    let bottom = solid(1, 1, GREEN, 0, 0, 1);
    let mut dest = PixelSurface::new(1, 1, BLUE).unwrap();
    render_alpha_over_opaque_bg(&[&top, &bottom], &mut dest);
    // green replaces blue first, then half red over green
    assert_eq!(dest.color()[0], Rgb8::new(128, 127, 0));
}

#[test]
fn alpha_general_over_transparent_destination_keeps_source() {
    let mut fg = solid(1, 1, Rgb8::new(200, 100, 50), 0, 0, 0);
    fg.set_alpha(100);
    let mut dest = PixelSurface::transparent(1, 1).unwrap();
    render_alpha_general(&[&fg], &mut dest);
    assert_eq!(dest.pixel(0, 0), Some((Rgb8::new(200, 100, 50), 100)));
}

#[test]
fn alpha_general_accumulates_coverage() {
    let mut a = solid(1, 1, Rgb8::WHITE, 0, 0, 1);
    a.set_alpha(128);
    let mut b = solid(1, 1, Rgb8::WHITE, 0, 0, 0);
    b.set_alpha(128);
    let mut dest = PixelSurface::transparent(1, 1).unwrap();
    render_alpha_general(&[&a, &b], &mut dest);
    let (c, alpha) = dest.pixel(0, 0).unwrap();
    assert_eq!(c, Rgb8::WHITE);
    assert_eq!(alpha, 192);
}

#[test]
fn composite_copies_text_with_visible_cells_only() {
    let mut s = solid(2, 1, RED, 0, 0, 0);
    s.put_str(0, 0, "ab");
    s.opacity_mut()[1] = 0;
    let mut dest = PixelSurface::new(2, 1, BLUE).unwrap();
    render_binary(&[&s], &mut dest);
    assert_eq!(dest.text(), &[Some('a'), None]);
}

#[test]
fn alpha_modes_hide_text_under_an_opaque_front_layer() {
    let mut back = solid(2, 1, RED, 0, 0, 0);
    back.put_str(0, 0, "X");
    let front = solid(1, 1, GREEN, 0, 0, 5);

    let mut dest = PixelSurface::new(2, 1, BLUE).unwrap();
    render_alpha_over_opaque_bg(&[&back, &front], &mut dest);
    assert_eq!(dest.text(), &[None, None]);
    assert_eq!(dest.color()[0], GREEN);

    let mut dest = PixelSurface::new(2, 1, BLUE).unwrap();
    render_alpha_general(&[&front, &back], &mut dest);
    assert_eq!(dest.text(), &[None, None]);

    let mut dest = PixelSurface::new(2, 1, BLUE).unwrap();
    render_binary(&[&back, &front], &mut dest);
    assert_eq!(dest.text(), &[None, None]);

    let wire = dest.to_wire_format();
    assert!(!wire.contains(&b'X'));
}

#[test]
fn alpha_modes_keep_lower_text_under_a_translucent_layer() {
    let mut back = solid(1, 1, RED, 0, 0, 0);
    back.put_str(0, 0, "X");
    let mut front = solid(1, 1, GREEN, 0, 0, 5);
    front.set_alpha(128);

    let mut dest = PixelSurface::new(1, 1, BLUE).unwrap();
    render_alpha_over_opaque_bg(&[&back, &front], &mut dest);
    assert_eq!(dest.text(), &[Some('X')]);

    let mut dest = PixelSurface::new(1, 1, BLUE).unwrap();
    render_alpha_general(&[&back, &front], &mut dest);
    assert_eq!(dest.text(), &[Some('X')]);
}

#[test]
fn overwrite_paths_leave_the_claim_guard_alone() {
    let mut dest = PixelSurface::new(2, 1, BLUE).unwrap();
    assert!(dest.cells_for_compositing().claim(0));
    render_over(&[&solid(1, 1, RED, 1, 0, 0)], &mut dest);
    assert!(!dest.cells_mut().claim(0));
    assert!(dest.cells_mut().claim(1));
}

#[test]
fn composite_mode_uses_snake_case_names() {
    let m: CompositeMode = serde_json::from_str("\"alpha_over_opaque_bg\"").unwrap();
    assert_eq!(m, CompositeMode::AlphaOverOpaqueBg);
    assert_eq!(CompositeMode::default(), CompositeMode::Binary);
}
