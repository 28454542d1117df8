use super::PixelSurface;
use super::resample::Resampled;
use crate::foundation::core::{Affine, Point, Rgb8};
use crate::foundation::math::clamp_u8;
use std::f64::consts::{FRAC_PI_2, TAU};

/// Sampling kernel used by [`PixelSurface::rotate`] and [`PixelSurface::rotate_in_place`].
///
/// Exact multiples of 90 degrees always take a direct index permutation, whatever the
/// kernel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotateAlgorithm {
    /// Nearest source pixel.
    #[default]
    NearestNeighbor,
    /// 2x2 weighted interpolation; out-of-bounds taps count as transparent.
    Bilinear,
}

const QUARTER_EPS: f64 = 1e-9;

/// Number of clockwise quarter turns (`0..4`) if `angle` is an exact multiple of 90 degrees.
pub(crate) fn quarter_turns(angle: f64) -> Option<u8> {
    let turns = angle.rem_euclid(TAU) / FRAC_PI_2;
    let r = turns.round();
    if (turns - r).abs() > QUARTER_EPS {
        return None;
    }
    Some((r as i64).rem_euclid(4) as u8)
}

/// Bounding box of a `width x height` rectangle rotated by `angle`, rounded to nearest.
pub(crate) fn rotated_extent(width: u32, height: u32, angle: f64) -> (u32, u32) {
    let (sin, cos) = angle.sin_cos();
    let (w, h) = (f64::from(width), f64::from(height));
    let nw = (cos.abs() * w + sin.abs() * h).round().max(1.0);
    let nh = (sin.abs() * w + cos.abs() * h).round().max(1.0);
    (nw as u32, nh as u32)
}

pub(crate) fn rotate(src: &PixelSurface, angle: f64, algo: RotateAlgorithm) -> Resampled {
    if let Some(q) = quarter_turns(angle) {
        return rotate_quarter(src, q);
    }
    let (w, h) = rotated_extent(src.width(), src.height(), angle);
    let mut out = Resampled::transparent(w, h);

    // destination -> source, so every destination pixel is assigned exactly once
    let inv = Affine::translate((f64::from(src.width()) / 2.0, f64::from(src.height()) / 2.0))
        * Affine::rotate(-angle)
        * Affine::translate((-f64::from(w) / 2.0, -f64::from(h) / 2.0));
    let [a, b, _, _, _, _] = inv.as_coeffs();

    let dw = w as usize;
    for dy in 0..h {
        let mut p = inv * Point::new(0.5, f64::from(dy) + 0.5);
        let row = (dy as usize) * dw;
        for dx in 0..dw {
            let o = row + dx;
            match algo {
                RotateAlgorithm::NearestNeighbor => sample_nearest(src, p, &mut out, o),
                RotateAlgorithm::Bilinear => sample_bilinear(src, p, &mut out, o),
            }
            p.x += a;
            p.y += b;
        }
    }
    out
}

fn sample_nearest(src: &PixelSurface, p: Point, out: &mut Resampled, o: usize) {
    let (sx, sy) = (p.x.floor(), p.y.floor());
    if sx < 0.0 || sy < 0.0 || sx >= f64::from(src.width()) || sy >= f64::from(src.height()) {
        return;
    }
    let i = (sy as usize) * (src.width() as usize) + sx as usize;
    out.color[o] = src.color()[i];
    out.opacity[o] = src.opacity()[i];
}

fn sample_bilinear(src: &PixelSurface, p: Point, out: &mut Resampled, o: usize) {
    let fx = p.x - 0.5;
    let fy = p.y - 0.5;
    let (x0, y0) = (fx.floor(), fy.floor());
    let (tx, ty) = (fx - x0, fy - y0);
    let (x0, y0) = (x0 as i64, y0 as i64);
    let (sw, sh) = (i64::from(src.width()), i64::from(src.height()));

    let mut acc_a = 0.0f64;
    let mut acc = [0.0f64; 3];
    for (yy, wy) in [(y0, 1.0 - ty), (y0 + 1, ty)] {
        if yy < 0 || yy >= sh {
            continue;
        }
        for (xx, wx) in [(x0, 1.0 - tx), (x0 + 1, tx)] {
            if xx < 0 || xx >= sw {
                continue;
            }
            let i = (yy * sw + xx) as usize;
            let a = f64::from(src.opacity()[i]);
            if a == 0.0 {
                continue;
            }
            let w = wx * wy * a;
            let c = src.color()[i];
            acc_a += w;
            acc[0] += w * f64::from(c.r);
            acc[1] += w * f64::from(c.g);
            acc[2] += w * f64::from(c.b);
        }
    }
    let a = clamp_u8(acc_a);
    if a == 0 {
        return;
    }
    out.opacity[o] = a;
    out.color[o] = Rgb8::new(
        clamp_u8(acc[0] / acc_a),
        clamp_u8(acc[1] / acc_a),
        clamp_u8(acc[2] / acc_a),
    );
}

fn rotate_quarter(src: &PixelSurface, q: u8) -> Resampled {
    let (sw, sh) = (src.width() as usize, src.height() as usize);
    let (w, h) = if q % 2 == 1 { (sh, sw) } else { (sw, sh) };
    let mut out = Resampled::transparent(w as u32, h as u32);
    let (color, opacity) = (src.color(), src.opacity());

    for y in 0..h {
        for x in 0..w {
            let (sx, sy) = match q {
                0 => (x, y),
                1 => (y, sh - 1 - x),
                2 => (sw - 1 - x, sh - 1 - y),
                _ => (sw - 1 - y, x),
            };
            let i = sy * sw + sx;
            let o = y * w + x;
            out.color[o] = color[i];
            out.opacity[o] = opacity[i];
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/surface/rotate.rs"]
mod tests;
