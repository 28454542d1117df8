//! Halfblock is a software pixel compositor for truecolor terminals.
//!
//! Every terminal character cell shows two vertically stacked pixels using the half-block
//! glyphs, so a canvas of `w x h` pixels occupies `w` columns and `ceil(h / 2)` lines.
//!
//! - Build [`PixelSurface`]s from solid colors or PNGs
//! - Attach an [`EffectChain`] (fade, blur, tone, rotate, zoom or your own [`Effect`])
//! - Merge them with a [`RenderPipeline`] using one of the [`CompositeMode`]s
//! - Encode frames as escape sequences and stream them into a [`FrameSink`]
//!
//! Scenes can also be described in JSON and loaded through [`Scene`].
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// PNG decoding and color parsing.
pub mod assets;
/// Per-surface pixel effects and effect chains.
pub mod effects;
/// Frame sinks.
pub mod encode;
/// Compositing and frame orchestration.
pub mod render;
/// JSON scene model.
pub mod scene;
/// Pixel surfaces, resampling and wire encoding.
pub mod surface;

pub use crate::foundation::core::{Affine, FrameIndex, Point, Position, Rgb8, Vec2};
pub use crate::foundation::error::{HalfblockError, HalfblockResult};

pub use crate::assets::{DecodedImage, decode_png, load_png, parse_hex_color};
pub use crate::effects::{
    Blur, Brighter, Darker, Effect, EffectChain, EffectContext, EffectHandle, EffectSpec,
    Expansion, Fade, Rotate, Zoom,
};
pub use crate::encode::{FrameSink, InMemorySink, SinkConfig, SinkStats, TerminalSink, render_range};
pub use crate::render::{CompositeMode, PipelineOpts, RenderObject, RenderPipeline, ZOrder, composite};
pub use crate::scene::Scene;
pub use crate::surface::{FitMode, PixelSurface, RotateAlgorithm, ScaleAlgorithm};
