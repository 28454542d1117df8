use crate::effects::handle::{Effect, Expansion, place_input};
use crate::foundation::core::{FrameIndex, Rgb8};
use crate::foundation::error::{HalfblockError, HalfblockResult};
use crate::foundation::math::mul_div255_u8;
use crate::surface::PixelSurface;

/// Largest accepted blur radius.
pub const MAX_BLUR_RADIUS: u32 = 64;

/// Separable gaussian blur over premultiplied color and opacity.
///
/// Declares an expansion of `radius` on each axis so the blurred edge has room to bleed.
#[derive(Clone, Debug)]
pub struct Blur {
    radius: u32,
    kernel: Vec<u32>,
    premul: Vec<[u8; 4]>,
    tmp: Vec<[u8; 4]>,
}

impl Blur {
    /// Blur with `sigma = radius / 2`.
    pub fn new(radius: u32) -> Self {
        Self {
            radius,
            kernel: Vec::new(),
            premul: Vec::new(),
            tmp: Vec::new(),
        }
    }

    /// Kernel radius in cells.
    pub fn radius(&self) -> u32 {
        self.radius
    }
}

impl Effect for Blur {
    fn name(&self) -> &'static str {
        "blur"
    }

    fn run(
        &mut self,
        input: &PixelSurface,
        output: &mut PixelSurface,
        _frame: FrameIndex,
    ) -> HalfblockResult<()> {
        place_input(input, output);
        if self.kernel.is_empty() {
            let sigma = (self.radius as f32 / 2.0).max(0.5);
            self.kernel = gaussian_kernel_q16(self.radius, sigma)?;
        }

        let (w, h) = (output.width() as usize, output.height() as usize);
        self.premul.clear();
        self.premul.extend(
            output
                .color()
                .iter()
                .zip(output.opacity())
                .map(|(c, &a)| premultiply(*c, a)),
        );
        self.tmp.clear();
        self.tmp.resize(self.premul.len(), [0; 4]);

        horizontal_pass(&self.premul, &mut self.tmp, w, h, &self.kernel);
        vertical_pass(&self.tmp, &mut self.premul, w, h, &self.kernel);

        for (c, px) in output.color_mut().iter_mut().zip(&self.premul) {
            *c = unpremultiply(*px);
        }
        for (a, px) in output.opacity_mut().iter_mut().zip(&self.premul) {
            *a = px[3];
        }
        Ok(())
    }

    fn validate(&self) -> HalfblockResult<()> {
        if self.radius == 0 || self.radius > MAX_BLUR_RADIUS {
            return Err(HalfblockError::invalid_blur_radius(format!(
                "blur radius must be in 1..={MAX_BLUR_RADIUS}, got {}",
                self.radius
            )));
        }
        Ok(())
    }

    fn declared_expansion(&self) -> Option<Expansion> {
        Some(Expansion::new(self.radius, self.radius))
    }
}

fn premultiply(c: Rgb8, a: u8) -> [u8; 4] {
    if a == 0 {
        return [0; 4];
    }
    let m = |v: u8| mul_div255_u8(u16::from(v), u16::from(a));
    [m(c.r), m(c.g), m(c.b), a]
}

fn unpremultiply(px: [u8; 4]) -> Rgb8 {
    let a = u32::from(px[3]);
    if a == 0 {
        return Rgb8::BLACK;
    }
    let u = |v: u8| ((u32::from(v) * 255 + a / 2) / a).min(255) as u8;
    Rgb8::new(u(px[0]), u(px[1]), u(px[2]))
}

fn gaussian_kernel_q16(radius: u32, sigma: f32) -> HalfblockResult<Vec<u32>> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(HalfblockError::invalid_value("blur sigma must be > 0"));
    }

    let r = radius as i32;
    let denom = 2.0 * f64::from(sigma) * f64::from(sigma);
    let weights_f: Vec<f64> = (-r..=r)
        .map(|i| {
            let x = f64::from(i);
            (-x * x / denom).exp()
        })
        .collect();
    let sum: f64 = weights_f.iter().sum();
    if sum <= 0.0 {
        return Err(HalfblockError::invalid_value("gaussian kernel sum is zero"));
    }

    let mut weights: Vec<u32> = weights_f
        .iter()
        .map(|wf| ((wf / sum) * 65536.0).round().clamp(0.0, 65536.0) as u32)
        .collect();
    // Fold rounding drift into the center tap so the kernel sums to exactly 1.0 in q16.
    let acc: i64 = weights.iter().map(|&w| i64::from(w)).sum();
    let delta = 65536 - acc;
    if delta != 0 {
        let mid = weights.len() / 2;
        weights[mid] = (i64::from(weights[mid]) + delta).clamp(0, 65536) as u32;
    }
    Ok(weights)
}

fn horizontal_pass(src: &[[u8; 4]], dst: &mut [[u8; 4]], w: usize, h: usize, k: &[u32]) {
    let radius = (k.len() / 2) as isize;
    let last = w as isize - 1;
    for y in 0..h {
        let row = &src[y * w..(y + 1) * w];
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let sx = (x as isize + ki as isize - radius).clamp(0, last) as usize;
                for c in 0..4 {
                    acc[c] += u64::from(kw) * u64::from(row[sx][c]);
                }
            }
            dst[y * w + x] = acc.map(q16_to_u8);
        }
    }
}

fn vertical_pass(src: &[[u8; 4]], dst: &mut [[u8; 4]], w: usize, h: usize, k: &[u32]) {
    let radius = (k.len() / 2) as isize;
    let last = h as isize - 1;
    for y in 0..h {
        for x in 0..w {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let sy = (y as isize + ki as isize - radius).clamp(0, last) as usize;
                for c in 0..4 {
                    acc[c] += u64::from(kw) * u64::from(src[sy * w + x][c]);
                }
            }
            dst[y * w + x] = acc.map(q16_to_u8);
        }
    }
}

fn q16_to_u8(acc: u64) -> u8 {
    ((acc + 32768) >> 16).min(255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/effects/blur.rs"]
mod tests;
