use super::PixelSurface;
use crate::foundation::core::Rgb8;
use crate::foundation::math::clamp_u8;

/// Resampling kernel used by [`PixelSurface::scale`] and [`PixelSurface::scale_in_place`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScaleAlgorithm {
    /// Integer ratio mapping `src = dst * src_len / dst_len`; fastest, biased to the top-left.
    DirectRatio,
    /// Pixel-center nearest neighbor.
    #[default]
    NearestNeighbor,
    /// 2x2 weighted interpolation.
    Bilinear,
    /// 4x4 Catmull-Rom convolution.
    Bicubic,
}

/// Freshly resampled channel data, not yet adopted by a surface.
#[derive(Debug)]
pub(crate) struct Resampled {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) color: Vec<Rgb8>,
    pub(crate) opacity: Vec<u8>,
}

impl Resampled {
    pub(crate) fn transparent(width: u32, height: u32) -> Self {
        let n = (width as usize) * (height as usize);
        Self {
            width,
            height,
            color: vec![Rgb8::BLACK; n],
            opacity: vec![0; n],
        }
    }
}

pub(crate) fn resample(
    src: &PixelSurface,
    width: u32,
    height: u32,
    algo: ScaleAlgorithm,
) -> Resampled {
    let mut out = Resampled::transparent(width, height);
    match algo {
        ScaleAlgorithm::DirectRatio => {
            let xs = direct_taps(src.width(), width);
            let ys = direct_taps(src.height(), height);
            gather(src, &xs, &ys, &mut out);
        }
        ScaleAlgorithm::NearestNeighbor => {
            let xs = nearest_taps(src.width(), width);
            let ys = nearest_taps(src.height(), height);
            gather(src, &xs, &ys, &mut out);
        }
        ScaleAlgorithm::Bilinear => {
            let xs = linear_taps(src.width(), width);
            let ys = linear_taps(src.height(), height);
            convolve(src, &xs, &ys, &mut out);
        }
        ScaleAlgorithm::Bicubic => {
            let xs = cubic_taps(src.width(), width);
            let ys = cubic_taps(src.height(), height);
            convolve(src, &xs, &ys, &mut out);
        }
    }
    out
}

fn direct_taps(src_len: u32, dst_len: u32) -> Vec<usize> {
    (0..dst_len)
        .map(|d| ((u64::from(d) * u64::from(src_len)) / u64::from(dst_len)) as usize)
        .collect()
}

fn nearest_taps(src_len: u32, dst_len: u32) -> Vec<usize> {
    let ratio = f64::from(src_len) / f64::from(dst_len);
    let max = (src_len - 1) as usize;
    (0..dst_len)
        .map(|d| ((((f64::from(d) + 0.5) * ratio).floor()) as usize).min(max))
        .collect()
}

fn gather(src: &PixelSurface, xs: &[usize], ys: &[usize], out: &mut Resampled) {
    let sw = src.width() as usize;
    let (color, opacity) = (src.color(), src.opacity());
    let dw = out.width as usize;
    for (dy, &sy) in ys.iter().enumerate() {
        let srow = sy * sw;
        let drow = dy * dw;
        for (dx, &sx) in xs.iter().enumerate() {
            out.color[drow + dx] = color[srow + sx];
            out.opacity[drow + dx] = opacity[srow + sx];
        }
    }
}

/// Up to four source indices and weights contributing to one destination coordinate.
#[derive(Clone, Copy, Debug, Default)]
struct Taps {
    idx: [usize; 4],
    w: [f64; 4],
    n: usize,
}

fn source_coord(d: u32, src_len: u32, dst_len: u32) -> f64 {
    (f64::from(d) + 0.5) * f64::from(src_len) / f64::from(dst_len) - 0.5
}

fn clamp_index(i: i64, len: u32) -> usize {
    i.clamp(0, i64::from(len) - 1) as usize
}

fn linear_taps(src_len: u32, dst_len: u32) -> Vec<Taps> {
    (0..dst_len)
        .map(|d| {
            let f = source_coord(d, src_len, dst_len);
            let f0 = f.floor();
            let t = f - f0;
            let i0 = f0 as i64;
            Taps {
                idx: [clamp_index(i0, src_len), clamp_index(i0 + 1, src_len), 0, 0],
                w: [1.0 - t, t, 0.0, 0.0],
                n: 2,
            }
        })
        .collect()
}

fn catmull_rom(t: f64) -> [f64; 4] {
    let t2 = t * t;
    let t3 = t2 * t;
    [
        0.5 * (-t3 + 2.0 * t2 - t),
        0.5 * (3.0 * t3 - 5.0 * t2 + 2.0),
        0.5 * (-3.0 * t3 + 4.0 * t2 + t),
        0.5 * (t3 - t2),
    ]
}

fn cubic_taps(src_len: u32, dst_len: u32) -> Vec<Taps> {
    (0..dst_len)
        .map(|d| {
            let f = source_coord(d, src_len, dst_len);
            let f0 = f.floor();
            let i0 = f0 as i64;
            Taps {
                idx: [
                    clamp_index(i0 - 1, src_len),
                    clamp_index(i0, src_len),
                    clamp_index(i0 + 1, src_len),
                    clamp_index(i0 + 2, src_len),
                ],
                w: catmull_rom(f - f0),
                n: 4,
            }
        })
        .collect()
}

/// Separable weighted sampling. Color is weighted by opacity so absent cells never bleed
/// their (unread) color into visible neighbors.
fn convolve(src: &PixelSurface, xs: &[Taps], ys: &[Taps], out: &mut Resampled) {
    let sw = src.width() as usize;
    let (color, opacity) = (src.color(), src.opacity());
    let dw = out.width as usize;

    for (dy, ty) in ys.iter().enumerate() {
        for (dx, tx) in xs.iter().enumerate() {
            let mut acc_a = 0.0f64;
            let mut acc = [0.0f64; 3];
            for j in 0..ty.n {
                let row = ty.idx[j] * sw;
                for i in 0..tx.n {
                    let k = row + tx.idx[i];
                    let a = f64::from(opacity[k]);
                    if a == 0.0 {
                        continue;
                    }
                    let w = tx.w[i] * ty.w[j] * a;
                    let c = color[k];
                    acc_a += w;
                    acc[0] += w * f64::from(c.r);
                    acc[1] += w * f64::from(c.g);
                    acc[2] += w * f64::from(c.b);
                }
            }
            let o = dy * dw + dx;
            let a = clamp_u8(acc_a);
            if a == 0 || acc_a <= 0.0 {
                continue;
            }
            out.opacity[o] = a;
            out.color[o] = Rgb8::new(
                clamp_u8(acc[0] / acc_a),
                clamp_u8(acc[1] / acc_a),
                clamp_u8(acc[2] / acc_a),
            );
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/surface/resample.rs"]
mod tests;
