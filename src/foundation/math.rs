/// `x * y / 255`, rounded to nearest.
pub(crate) fn mul_div255_u16(x: u16, y: u16) -> u16 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u16
}

pub(crate) fn mul_div255_u8(x: u16, y: u16) -> u8 {
    mul_div255_u16(x, y) as u8
}

/// Straight-alpha blend of `fg` over an opaque `bg` with truncating division.
///
/// `out = (fg * alpha + bg * (255 - alpha)) / 255`
pub(crate) fn blend_over_opaque(fg: u8, bg: u8, alpha: u8) -> u8 {
    let a = u32::from(alpha);
    ((u32::from(fg) * a + u32::from(bg) * (255 - a)) / 255) as u8
}

/// Porter-Duff "over" for straight (non-premultiplied) color with independent alphas.
///
/// Returns `(color, alpha)`. `src_a` must be non-zero.
pub(crate) fn porter_duff_over(
    src: [u8; 3],
    src_a: u8,
    dst: [u8; 3],
    dst_a: u8,
) -> ([u8; 3], u8) {
    let sa = u32::from(src_a);
    let da = u32::from(dst_a);
    let inv = 255 - sa;

    // dst contribution in 255^2 units: dst_a * (255 - src_a)
    let dst_w = da * inv;
    let out_a_scaled = sa * 255 + dst_w;
    let out_a = ((out_a_scaled + 127) / 255).min(255) as u8;
    if out_a_scaled == 0 {
        return ([0, 0, 0], 0);
    }

    let mut out = [0u8; 3];
    for i in 0..3 {
        let num = u32::from(src[i]) * sa * 255 + u32::from(dst[i]) * dst_w;
        out[i] = (num / out_a_scaled).min(255) as u8;
    }
    (out, out_a)
}

pub(crate) fn clamp_u8(v: f64) -> u8 {
    if v.is_nan() {
        return 0;
    }
    v.round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
