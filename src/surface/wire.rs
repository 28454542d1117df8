//! Terminal wire encoding.
//!
//! Each character cell carries the pixel rows `(y, y + 1)`: the upper pixel in the cell
//! background (or an upper-half glyph) and the lower pixel in the foreground of a
//! lower-half glyph. Rows end with a relative cursor move (`ESC[{w}D ESC[1B`) so a frame
//! can be redrawn in place without clearing the screen.

use super::PixelSurface;
use crate::foundation::core::Rgb8;

const UPPER_HALF: &[u8] = "\u{2580}".as_bytes();
const LOWER_HALF: &[u8] = "\u{2584}".as_bytes();
const RESET_BLANK: &[u8] = b"\x1b[m ";
const RESET_PREFIX: &[u8] = b"\x1b[0;";

// `ESC[38;2;255;255;255m` + `ESC[48;2;255;255;255m` + a 4-byte codepoint, rounded up.
const MAX_CELL_BYTES: usize = 48;
// `ESC[4294967295D` + `ESC[1B`
const MAX_ROW_TRAILER_BYTES: usize = 20;

/// Scratch capacity that always fits a full frame of `width x height` pixels.
pub(crate) fn capacity_for(width: u32, height: u32) -> usize {
    let lines = (height as usize).div_ceil(2);
    lines * ((width as usize) * MAX_CELL_BYTES + MAX_ROW_TRAILER_BYTES)
}

fn row_budget(width: u32) -> usize {
    (width as usize) * MAX_CELL_BYTES + MAX_ROW_TRAILER_BYTES
}

impl PixelSurface {
    /// Encode the surface as truecolor half-block escape sequences.
    ///
    /// The returned slice borrows this surface's scratch buffer, which is reused across
    /// calls. If the scratch budget cannot hold another full row, encoding stops at the
    /// last complete row instead of growing the buffer.
    pub fn to_wire_format(&mut self) -> &[u8] {
        let mut out = std::mem::take(&mut self.wire);
        out.clear();
        if out.capacity() < self.wire_capacity {
            out.reserve_exact(self.wire_capacity);
        }

        let (w, h) = (self.width as usize, self.height as usize);
        let budget = row_budget(self.width);
        let mut rows = 0usize;
        for y in (0..h).step_by(2) {
            if out.len() + budget > self.wire_capacity {
                tracing::warn!(
                    rows_written = rows,
                    rows_total = h.div_ceil(2),
                    capacity = self.wire_capacity,
                    "wire output truncated"
                );
                break;
            }
            let upper = y * w;
            let lower = (y + 1 < h).then_some((y + 1) * w);
            for x in 0..w {
                self.encode_cell(&mut out, upper + x, lower.map(|l| l + x));
            }
            out.extend_from_slice(b"\x1b[");
            push_dec_u32(&mut out, self.width);
            out.extend_from_slice(b"D\x1b[1B");
            rows += 1;
        }

        self.wire = out;
        &self.wire
    }

    /// Bytes reserved for [`PixelSurface::to_wire_format`].
    pub fn wire_capacity(&self) -> usize {
        self.wire_capacity
    }

    /// Override the wire scratch budget; output beyond it is truncated at row granularity.
    pub fn set_wire_capacity(&mut self, bytes: usize) {
        self.wire_capacity = bytes;
        self.wire = Vec::with_capacity(bytes);
    }

    fn encode_cell(&self, out: &mut Vec<u8>, upper: usize, lower: Option<usize>) {
        let upper_text = self.text[upper];
        let lower_text = lower.and_then(|l| self.text[l]);
        let text = match (upper_text, lower_text) {
            (Some(ch), _) => Some((ch, upper, lower)),
            (None, Some(ch)) => Some((ch, lower.unwrap_or(upper), Some(upper))),
            (None, None) => None,
        };

        if let Some((ch, fg_idx, bg_idx)) = text {
            let fg = self.color[fg_idx];
            let bg = bg_idx.map_or(fg, |i| self.color[i]);
            push_fg(out, fg);
            push_bg(out, bg);
            let mut utf8 = [0u8; 4];
            out.extend_from_slice(ch.encode_utf8(&mut utf8).as_bytes());
            return;
        }

        let upper_on = self.opacity[upper] != 0;
        let lower_on = lower.is_some_and(|l| self.opacity[l] != 0);
        match (upper_on, lower_on, lower) {
            (true, true, Some(l)) => {
                push_bg(out, self.color[upper]);
                push_fg(out, self.color[l]);
                out.extend_from_slice(LOWER_HALF);
            }
            (false, true, Some(l)) => {
                out.extend_from_slice(RESET_PREFIX);
                push_color_params(out, b"38;2;", self.color[l]);
                out.extend_from_slice(LOWER_HALF);
            }
            (true, _, _) => {
                out.extend_from_slice(RESET_PREFIX);
                push_color_params(out, b"38;2;", self.color[upper]);
                out.extend_from_slice(UPPER_HALF);
            }
            _ => out.extend_from_slice(RESET_BLANK),
        }
    }
}

fn push_fg(out: &mut Vec<u8>, c: Rgb8) {
    out.extend_from_slice(b"\x1b[");
    push_color_params(out, b"38;2;", c);
}

fn push_bg(out: &mut Vec<u8>, c: Rgb8) {
    out.extend_from_slice(b"\x1b[");
    push_color_params(out, b"48;2;", c);
}

/// `{lead}R;G;Bm`
fn push_color_params(out: &mut Vec<u8>, lead: &[u8], c: Rgb8) {
    out.extend_from_slice(lead);
    push_dec_u8(out, c.r);
    out.push(b';');
    push_dec_u8(out, c.g);
    out.push(b';');
    push_dec_u8(out, c.b);
    out.push(b'm');
}

fn push_dec_u8(out: &mut Vec<u8>, v: u8) {
    if v >= 100 {
        out.push(b'0' + v / 100);
    }
    if v >= 10 {
        out.push(b'0' + (v / 10) % 10);
    }
    out.push(b'0' + v % 10);
}

fn push_dec_u32(out: &mut Vec<u8>, mut v: u32) {
    let mut digits = [0u8; 10];
    let mut n = 0;
    loop {
        digits[n] = b'0' + (v % 10) as u8;
        n += 1;
        v /= 10;
        if v == 0 {
            break;
        }
    }
    out.extend(digits[..n].iter().rev());
}

#[cfg(test)]
#[path = "../../tests/unit/surface/wire.rs"]
mod tests;
