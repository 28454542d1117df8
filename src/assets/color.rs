use std::str::FromStr;

use crate::foundation::core::Rgb8;
use crate::foundation::error::{HalfblockError, HalfblockResult};

/// Every accepted JSON spelling of a color.
#[derive(serde::Deserialize)]
#[serde(untagged)]
pub enum ColorRepr {
    Hex(String),
    Array([u8; 3]),
    Object { r: u8, g: u8, b: u8 },
}

impl TryFrom<ColorRepr> for Rgb8 {
    type Error = HalfblockError;

    fn try_from(repr: ColorRepr) -> Result<Self, Self::Error> {
        match repr {
            ColorRepr::Hex(s) => parse_hex_color(&s),
            ColorRepr::Array(c) => Ok(Rgb8::from_array(c)),
            ColorRepr::Object { r, g, b } => Ok(Rgb8::new(r, g, b)),
        }
    }
}

/// Parse `#rrggbb` or `#rgb` (the leading `#` is optional).
pub fn parse_hex_color(s: &str) -> HalfblockResult<Rgb8> {
    let hex = s.trim();
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    let bad = || HalfblockError::validation(format!("invalid color '{s}'"));
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(bad());
    }
    let channel = |i: usize, len: usize| {
        u8::from_str_radix(&hex[i * len..(i + 1) * len], 16).map_err(|_| bad())
    };
    match hex.len() {
        6 => Ok(Rgb8::new(channel(0, 2)?, channel(1, 2)?, channel(2, 2)?)),
        3 => {
            // `#abc` is shorthand for `#aabbcc`
            let dup = |v: u8| v * 17;
            Ok(Rgb8::new(
                dup(channel(0, 1)?),
                dup(channel(1, 1)?),
                dup(channel(2, 1)?),
            ))
        }
        _ => Err(bad()),
    }
}

impl FromStr for Rgb8 {
    type Err = HalfblockError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_hex_color(s)
    }
}

impl std::fmt::Display for Rgb8 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/color.rs"]
mod tests;
