//! JSON scene configuration and pipeline assembly.

pub(crate) mod build;
pub(crate) mod model;

pub use model::{LabelDef, LayerDef, LayerSource, PositionDef, Scene};
