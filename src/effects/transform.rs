use crate::effects::handle::{Effect, Expansion, centered_offset, place_input, ramp};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{HalfblockError, HalfblockResult};
use crate::surface::{FitMode, PixelSurface, RotateAlgorithm, ScaleAlgorithm};

/// Largest zoom factor accepted by [`Zoom`].
pub const MAX_ZOOM: f64 = 16.0;

/// Rotates the content about the output center, ramping from `from_degrees` to `to_degrees`.
///
/// Content leaving the output is clipped; `margin` reserves room around the input for it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rotate {
    /// Angle at frame 0 (clockwise, degrees).
    pub from_degrees: f64,
    /// Angle from `duration` onward.
    pub to_degrees: f64,
    /// Ramp length in frames; must be non-zero.
    pub duration: u64,
    /// Border requested on every side.
    pub margin: u32,
    /// Sampling kernel.
    pub algorithm: RotateAlgorithm,
}

impl Rotate {
    /// Constant rotation by `degrees`.
    pub fn fixed(degrees: f64) -> Self {
        Self {
            from_degrees: degrees,
            to_degrees: degrees,
            duration: 1,
            margin: 0,
            algorithm: RotateAlgorithm::default(),
        }
    }

    /// Angle in radians at `frame`.
    pub fn angle_at(&self, frame: FrameIndex) -> f64 {
        ramp(self.from_degrees, self.to_degrees, frame, self.duration).to_radians()
    }
}

impl Effect for Rotate {
    fn name(&self) -> &'static str {
        "rotate"
    }

    fn run(
        &mut self,
        input: &PixelSurface,
        output: &mut PixelSurface,
        frame: FrameIndex,
    ) -> HalfblockResult<()> {
        place_input(input, output);
        let angle = self.angle_at(frame);
        let cx = (output.width() / 2) as i32;
        let cy = (output.height() / 2) as i32;
        output.rotate_in_place(angle, cx, cy, FitMode::Clip, self.algorithm)
    }

    fn validate(&self) -> HalfblockResult<()> {
        if !self.from_degrees.is_finite() || !self.to_degrees.is_finite() {
            return Err(HalfblockError::invalid_value("rotate angles must be finite"));
        }
        if self.duration == 0 {
            return Err(HalfblockError::invalid_duration(
                "rotate duration must be > 0",
            ));
        }
        Ok(())
    }

    fn declared_expansion(&self) -> Option<Expansion> {
        (self.margin > 0).then(|| Expansion::new(self.margin, self.margin))
    }
}

/// Rescales the content around the output center, ramping from `from_scale` to `to_scale`.
#[derive(Clone, Debug)]
pub struct Zoom {
    /// Scale factor at frame 0.
    pub from_scale: f64,
    /// Scale factor from `duration` onward.
    pub to_scale: f64,
    /// Ramp length in frames; must be non-zero.
    pub duration: u64,
    /// Border requested on every side.
    pub margin: u32,
    /// Resampling kernel.
    pub algorithm: ScaleAlgorithm,
    scratch: Option<PixelSurface>,
}

impl Zoom {
    /// Zoom ramp with no margin and the default kernel.
    pub fn new(from_scale: f64, to_scale: f64, duration: u64) -> Self {
        Self {
            from_scale,
            to_scale,
            duration,
            margin: 0,
            algorithm: ScaleAlgorithm::default(),
            scratch: None,
        }
    }

    /// Reserve `margin` cells on every side.
    pub fn with_margin(mut self, margin: u32) -> Self {
        self.margin = margin;
        self
    }

    /// Use `algorithm` for resampling.
    pub fn with_algorithm(mut self, algorithm: ScaleAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// Scale factor at `frame`.
    pub fn scale_at(&self, frame: FrameIndex) -> f64 {
        ramp(self.from_scale, self.to_scale, frame, self.duration)
    }
}

fn scaled_dim(v: u32, k: f64) -> u32 {
    (f64::from(v) * k).round().clamp(1.0, f64::from(u32::MAX)) as u32
}

impl Effect for Zoom {
    fn name(&self) -> &'static str {
        "zoom"
    }

    fn run(
        &mut self,
        input: &PixelSurface,
        output: &mut PixelSurface,
        frame: FrameIndex,
    ) -> HalfblockResult<()> {
        let k = self.scale_at(frame);
        let (tw, th) = (scaled_dim(input.width(), k), scaled_dim(input.height(), k));
        if tw == input.width() && th == input.height() {
            place_input(input, output);
            return Ok(());
        }

        let scratch = match self.scratch.take() {
            Some(mut s) => {
                s.assign_from(input);
                s
            }
            None => input.clone(),
        };
        let scratch = self.scratch.insert(scratch);
        scratch.scale(tw, th, self.algorithm)?;
        let (dx, dy) = centered_offset(scratch, output);
        output.blit_from(scratch, dx, dy);
        Ok(())
    }

    fn validate(&self) -> HalfblockResult<()> {
        for k in [self.from_scale, self.to_scale] {
            if !k.is_finite() || k <= 0.0 || k > MAX_ZOOM {
                return Err(HalfblockError::invalid_value(format!(
                    "zoom scale must be in (0, {MAX_ZOOM}], got {k}"
                )));
            }
        }
        if self.duration == 0 {
            return Err(HalfblockError::invalid_duration("zoom duration must be > 0"));
        }
        Ok(())
    }

    fn declared_expansion(&self) -> Option<Expansion> {
        (self.margin > 0).then(|| Expansion::new(self.margin, self.margin))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/transform.rs"]
mod tests;
