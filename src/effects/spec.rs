use crate::effects::blur::Blur;
use crate::effects::fade::Fade;
use crate::effects::handle::EffectHandle;
use crate::effects::tone::{Brighter, Darker};
use crate::effects::transform::{Rotate, Zoom};
use crate::foundation::error::HalfblockResult;
use crate::surface::{RotateAlgorithm, ScaleAlgorithm};

/// JSON-facing description of a built-in effect, tagged by `kind`.
///
/// ```json
/// { "kind": "fade", "alpha_start": 1.0, "alpha_end": 0.0, "duration": 60 }
/// ```
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EffectSpec {
    /// See [`Fade`].
    Fade {
        /// Factor at frame 0.
        alpha_start: f64,
        /// Factor from `duration` onward.
        alpha_end: f64,
        /// Ramp length in frames.
        duration: u64,
    },
    /// See [`Blur`].
    Blur {
        /// Kernel radius.
        radius: u32,
    },
    /// See [`Brighter`].
    Brighter {
        /// Amount in `0..=100`.
        percent: u32,
    },
    /// See [`Darker`].
    Darker {
        /// Amount in `0..=100`.
        percent: u32,
    },
    /// See [`Rotate`].
    Rotate {
        /// Angle at frame 0, in degrees.
        #[serde(default)]
        from_degrees: f64,
        /// Angle from `duration` onward, in degrees.
        to_degrees: f64,
        /// Ramp length in frames.
        #[serde(default = "one_frame")]
        duration: u64,
        /// Border requested on every side.
        #[serde(default)]
        margin: u32,
        /// Sampling kernel.
        #[serde(default)]
        algorithm: RotateAlgorithm,
    },
    /// See [`Zoom`].
    Zoom {
        /// Scale at frame 0.
        #[serde(default = "unit_scale")]
        from_scale: f64,
        /// Scale from `duration` onward.
        to_scale: f64,
        /// Ramp length in frames.
        #[serde(default = "one_frame")]
        duration: u64,
        /// Border requested on every side.
        #[serde(default)]
        margin: u32,
        /// Resampling kernel.
        #[serde(default)]
        algorithm: ScaleAlgorithm,
    },
}

fn one_frame() -> u64 {
    1
}

fn unit_scale() -> f64 {
    1.0
}

impl EffectSpec {
    /// Construct the effect and validate its parameters.
    pub fn build(&self) -> HalfblockResult<EffectHandle> {
        let handle = match *self {
            Self::Fade {
                alpha_start,
                alpha_end,
                duration,
            } => EffectHandle::new(Fade::new(alpha_start, alpha_end, duration)),
            Self::Blur { radius } => EffectHandle::new(Blur::new(radius)),
            Self::Brighter { percent } => EffectHandle::new(Brighter::new(percent)),
            Self::Darker { percent } => EffectHandle::new(Darker::new(percent)),
            Self::Rotate {
                from_degrees,
                to_degrees,
                duration,
                margin,
                algorithm,
            } => EffectHandle::new(Rotate {
                from_degrees,
                to_degrees,
                duration,
                margin,
                algorithm,
            }),
            Self::Zoom {
                from_scale,
                to_scale,
                duration,
                margin,
                algorithm,
            } => EffectHandle::new(
                Zoom::new(from_scale, to_scale, duration)
                    .with_margin(margin)
                    .with_algorithm(algorithm),
            ),
        };
        handle.validate()?;
        Ok(handle)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/spec.rs"]
mod tests;
