use crate::effects::handle::{Effect, place_input, ramp};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{HalfblockError, HalfblockResult};
use crate::foundation::math::clamp_u8;
use crate::surface::PixelSurface;

/// Scales color channels by a factor ramping from `alpha_start` to `alpha_end` over
/// `duration` frames. Opacity is left untouched, so the content fades toward black.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fade {
    /// Factor at frame 0, in `[0, 1]`.
    pub alpha_start: f64,
    /// Factor from `duration` onward, in `[0, 1]`.
    pub alpha_end: f64,
    /// Ramp length in frames; must be non-zero.
    pub duration: u64,
}

impl Fade {
    /// Build a fade ramp.
    pub fn new(alpha_start: f64, alpha_end: f64, duration: u64) -> Self {
        Self {
            alpha_start,
            alpha_end,
            duration,
        }
    }

    /// Factor applied at `frame`.
    pub fn factor_at(&self, frame: FrameIndex) -> f64 {
        ramp(self.alpha_start, self.alpha_end, frame, self.duration)
    }
}

fn unit(v: f64) -> bool {
    v.is_finite() && (0.0..=1.0).contains(&v)
}

impl Effect for Fade {
    fn name(&self) -> &'static str {
        "fade"
    }

    fn run(
        &mut self,
        input: &PixelSurface,
        output: &mut PixelSurface,
        frame: FrameIndex,
    ) -> HalfblockResult<()> {
        let k = self.factor_at(frame);
        place_input(input, output);
        for c in output.color_mut() {
            *c = c.map(|v| clamp_u8(f64::from(v) * k));
        }
        Ok(())
    }

    fn validate(&self) -> HalfblockResult<()> {
        if !unit(self.alpha_start) || !unit(self.alpha_end) {
            return Err(HalfblockError::invalid_alpha_range(format!(
                "fade alpha must be within [0, 1], got {} -> {}",
                self.alpha_start, self.alpha_end
            )));
        }
        if self.duration == 0 {
            return Err(HalfblockError::invalid_duration("fade duration must be > 0"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/fade.rs"]
mod tests;
