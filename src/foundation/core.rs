pub use kurbo::{Affine, Point, Vec2};

/// Externally supplied frame counter.
///
/// Effects derive all time-varying parameters from this value, never from wall-clock time.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize,
    serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

impl FrameIndex {
    /// Progress of this frame through a `duration`-frame ramp, clamped to `[0, 1]`.
    ///
    /// A zero duration is treated as already complete.
    pub fn progress(self, duration: u64) -> f64 {
        if duration == 0 {
            return 1.0;
        }
        (self.0.min(duration) as f64) / (duration as f64)
    }

    /// The next frame.
    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

/// Straight (non-premultiplied) 8-bit RGB color.
///
/// Deserializes from `"#rrggbb"`, `"#rgb"`, `[r, g, b]` or `{ "r": .., "g": .., "b": .. }`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "crate::assets::color::ColorRepr")]
pub struct Rgb8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb8 {
    /// Pure black.
    pub const BLACK: Self = Self::new(0, 0, 0);
    /// Pure white.
    pub const WHITE: Self = Self::new(255, 255, 255);

    /// Build a color from its channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Channels as an array, in `r, g, b` order.
    pub const fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Build a color from an `r, g, b` array.
    pub const fn from_array(c: [u8; 3]) -> Self {
        Self::new(c[0], c[1], c[2])
    }

    /// Apply `f` to every channel.
    pub fn map(self, mut f: impl FnMut(u8) -> u8) -> Self {
        Self::new(f(self.r), f(self.g), f(self.b))
    }
}

/// Signed cell position of a surface relative to its destination.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Position {
    /// Column offset (may be negative).
    pub x: i32,
    /// Pixel-row offset (may be negative).
    pub y: i32,
}

impl Position {
    /// Build a position from its coordinates.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
