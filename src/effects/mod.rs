//! Frame-driven surface effects and the chain that sequences them.

pub(crate) mod blur;
pub(crate) mod chain;
pub(crate) mod fade;
pub(crate) mod handle;
pub(crate) mod spec;
pub(crate) mod tone;
pub(crate) mod transform;

pub use blur::{Blur, MAX_BLUR_RADIUS};
pub use chain::{EffectChain, EffectContext};
pub use fade::Fade;
pub use handle::{Effect, EffectHandle, Expansion, centered_offset};
pub use spec::EffectSpec;
pub use tone::{Brighter, Darker};
pub use transform::{MAX_ZOOM, Rotate, Zoom};
