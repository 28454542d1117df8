use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::effects::EffectSpec;
use crate::foundation::core::{Position, Rgb8};
use crate::foundation::error::{HalfblockError, HalfblockResult};
use crate::render::CompositeMode;
use crate::surface::ScaleAlgorithm;

/// JSON scene description: a canvas, layers with effects, and an optional post-process chain.
///
/// ```json
/// {
///   "width": 40, "height": 24, "background": "#101018", "frames": 60,
///   "layers": [
///     { "source": { "type": "solid", "width": 8, "height": 8, "color": "#f36" },
///       "position": [4, 4], "z": 1,
///       "effects": [{ "kind": "fade", "alpha_start": 1.0, "alpha_end": 0.2, "duration": 60 }] }
///   ]
/// }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scene {
    /// Canvas width in columns.
    pub width: u32,
    /// Canvas height in pixel rows.
    pub height: u32,
    /// Merge-buffer clear color; omitted means transparent.
    #[serde(default)]
    pub background: Option<Rgb8>,
    /// Compositor variant.
    #[serde(default)]
    pub mode: CompositeMode,
    /// Number of frames a player should render.
    #[serde(default = "default_frames")]
    pub frames: u64,
    /// Layers in insertion order (ties in `z` favor earlier layers).
    #[serde(default)]
    pub layers: Vec<LayerDef>,
    /// Effects applied to the merged frame.
    #[serde(default)]
    pub post: Vec<EffectSpec>,
}

fn default_frames() -> u64 {
    1
}

/// One drawable layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayerDef {
    /// Optional label used in error messages.
    #[serde(default)]
    pub name: Option<String>,
    /// Pixel content.
    pub source: LayerSource,
    /// Offset on the canvas, as `[x, y]` or `{ "x": .., "y": .. }`.
    #[serde(default)]
    pub position: PositionDef,
    /// Layering priority.
    #[serde(default)]
    pub z: i32,
    /// Opacity override for every visible cell (`1..=255`).
    #[serde(default)]
    pub alpha: Option<u8>,
    /// Text overlays.
    #[serde(default)]
    pub labels: Vec<LabelDef>,
    /// Per-layer effect chain.
    #[serde(default)]
    pub effects: Vec<EffectSpec>,
}

/// Layer pixel content.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LayerSource {
    /// Uniform opaque rectangle.
    Solid {
        /// Width in columns.
        width: u32,
        /// Height in pixel rows.
        height: u32,
        /// Fill color.
        color: Rgb8,
    },
    /// PNG image, resolved relative to the scene's assets root.
    Image {
        /// Path to the PNG file.
        path: PathBuf,
        /// Optional `[width, height]` to rescale to after decoding.
        #[serde(default)]
        size: Option<[u32; 2]>,
        /// Kernel used when `size` is set.
        #[serde(default)]
        algorithm: ScaleAlgorithm,
    },
}

/// Text written along a row of a layer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LabelDef {
    /// Start column.
    pub x: u32,
    /// Pixel row; must be even so the glyph lands on a whole terminal cell.
    pub y: u32,
    /// Characters to place, one per column.
    pub text: String,
}

/// Layer offset accepting both array and object notation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PositionDef {
    /// Column offset.
    pub x: i32,
    /// Pixel-row offset.
    pub y: i32,
}

impl<'de> Deserialize<'de> for PositionDef {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Arr([i32; 2]),
            Obj { x: i32, y: i32 },
        }

        match Repr::deserialize(deserializer)? {
            Repr::Arr([x, y]) => Ok(Self { x, y }),
            Repr::Obj { x, y } => Ok(Self { x, y }),
        }
    }
}

impl From<PositionDef> for Position {
    fn from(p: PositionDef) -> Self {
        Position::new(p.x, p.y)
    }
}

impl Scene {
    /// Parse a scene from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> HalfblockResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| HalfblockError::serde(format!("parse scene JSON: {e}")))
    }

    /// Parse a scene from a JSON string.
    pub fn from_json_str(s: &str) -> HalfblockResult<Self> {
        Self::from_reader(s.as_bytes())
    }

    /// Parse a scene from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> HalfblockResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            HalfblockError::validation(format!("open scene JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Check structural constraints that JSON typing cannot express.
    pub fn validate(&self) -> HalfblockResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(HalfblockError::validation(format!(
                "scene canvas must be non-empty, got {}x{}",
                self.width, self.height
            )));
        }
        if self.frames == 0 {
            return Err(HalfblockError::validation("scene frames must be > 0"));
        }
        if self.mode == CompositeMode::AlphaOverOpaqueBg && self.background.is_none() {
            return Err(HalfblockError::validation(
                "alpha_over_opaque_bg requires a background color",
            ));
        }
        for (i, layer) in self.layers.iter().enumerate() {
            layer.validate().map_err(|e| layer.wrap_error(i, e))?;
        }
        Ok(())
    }
}

impl LayerDef {
    pub(crate) fn label(&self, index: usize) -> String {
        match &self.name {
            Some(name) => format!("layer '{name}'"),
            None => format!("layer #{index}"),
        }
    }

    /// Prefix validation messages with this layer's label; other errors pass through.
    pub(crate) fn wrap_error(&self, index: usize, err: HalfblockError) -> HalfblockError {
        match err {
            HalfblockError::Validation(msg) => {
                HalfblockError::validation(format!("{}: {msg}", self.label(index)))
            }
            other => other,
        }
    }

    fn validate(&self) -> HalfblockResult<()> {
        if self.alpha == Some(0) {
            return Err(HalfblockError::validation("alpha must be in 1..=255"));
        }
        if let LayerSource::Solid { width, height, .. } = self.source
            && (width == 0 || height == 0)
        {
            return Err(HalfblockError::validation("solid source must be non-empty"));
        }
        if let LayerSource::Image {
            size: Some([w, h]), ..
        } = self.source
            && (w == 0 || h == 0)
        {
            return Err(HalfblockError::validation("image size must be non-empty"));
        }
        if let Some(label) = self.labels.iter().find(|l| l.y % 2 != 0) {
            return Err(HalfblockError::validation(format!(
                "label '{}' is on odd row {}",
                label.text, label.y
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/model.rs"]
mod tests;
