//! Boundaries to external data: PNG decoding and color notation.

pub(crate) mod color;
pub(crate) mod decode;

pub use color::parse_hex_color;
pub use decode::{DecodedImage, decode_png, load_png};
