/// Convenience result type used across halfblock.
pub type HalfblockResult<T> = Result<T, HalfblockError>;

/// Top-level error taxonomy used by surface, compositor and effect APIs.
#[derive(thiserror::Error, Debug)]
pub enum HalfblockError {
    /// A surface was requested with a zero width or height.
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions {
        /// Requested width.
        width: u32,
        /// Requested height.
        height: u32,
    },

    /// A copy destination (or import buffer) is smaller than its source.
    #[error("buffer too small: need {needed}, got {actual}")]
    BufferTooSmall {
        /// Required length or extent.
        needed: usize,
        /// Provided length or extent.
        actual: usize,
    },

    /// The PNG file could not be read.
    #[error("invalid png file: {0}")]
    InvalidPngFile(String),

    /// The PNG bytes could not be decoded.
    #[error("invalid png data: {0}")]
    InvalidPngData(String),

    /// An effect parameter is outside its documented domain.
    #[error("invalid value: {0}")]
    InvalidValue(String),

    /// An effect duration is zero or otherwise unusable.
    #[error("invalid duration: {0}")]
    InvalidDuration(String),

    /// An alpha parameter is outside `[0, 1]`.
    #[error("invalid alpha range: {0}")]
    InvalidAlphaRange(String),

    /// A blur radius is zero or too large.
    #[error("invalid blur radius: {0}")]
    InvalidBlurRadius(String),

    /// Invalid user-provided configuration or scene data.
    #[error("validation error: {0}")]
    Validation(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl HalfblockError {
    /// Build a [`HalfblockError::InvalidDimensions`] value.
    pub fn invalid_dimensions(width: u32, height: u32) -> Self {
        Self::InvalidDimensions { width, height }
    }

    /// Build a [`HalfblockError::BufferTooSmall`] value.
    pub fn buffer_too_small(needed: usize, actual: usize) -> Self {
        Self::BufferTooSmall { needed, actual }
    }

    /// Build a [`HalfblockError::InvalidPngFile`] value.
    pub fn invalid_png_file(msg: impl Into<String>) -> Self {
        Self::InvalidPngFile(msg.into())
    }

    /// Build a [`HalfblockError::InvalidPngData`] value.
    pub fn invalid_png_data(msg: impl Into<String>) -> Self {
        Self::InvalidPngData(msg.into())
    }

    /// Build a [`HalfblockError::InvalidValue`] value.
    pub fn invalid_value(msg: impl Into<String>) -> Self {
        Self::InvalidValue(msg.into())
    }

    /// Build a [`HalfblockError::InvalidDuration`] value.
    pub fn invalid_duration(msg: impl Into<String>) -> Self {
        Self::InvalidDuration(msg.into())
    }

    /// Build a [`HalfblockError::InvalidAlphaRange`] value.
    pub fn invalid_alpha_range(msg: impl Into<String>) -> Self {
        Self::InvalidAlphaRange(msg.into())
    }

    /// Build a [`HalfblockError::InvalidBlurRadius`] value.
    pub fn invalid_blur_radius(msg: impl Into<String>) -> Self {
        Self::InvalidBlurRadius(msg.into())
    }

    /// Build a [`HalfblockError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`HalfblockError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
