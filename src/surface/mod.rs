//! Pixel surfaces: owned color/opacity/text buffers for one rectangular canvas.
//!
//! One terminal character cell displays two vertically stacked pixels, so a surface of
//! `height` pixel rows occupies `ceil(height / 2)` text lines once encoded with
//! [`PixelSurface::to_wire_format`].

pub(crate) mod resample;
pub(crate) mod rotate;
pub(crate) mod wire;

use crate::foundation::core::{Position, Rgb8};
use crate::foundation::error::{HalfblockError, HalfblockResult};
use resample::Resampled;

pub use resample::ScaleAlgorithm;
pub use rotate::RotateAlgorithm;

/// How an in-place transform treats content that no longer fits the surface.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitMode {
    /// Keep the outer dimensions and drop whatever falls outside.
    #[default]
    Clip,
    /// Grow the surface first so the transformed content fits completely.
    AutoEnlarge,
}

/// An owned pixel canvas with per-cell color, opacity and optional text overlay.
///
/// Opacity `0` marks a cell as not present: its color is never read by compositing. Any
/// other value is visible and, for alpha-aware operations, acts as a true alpha.
#[derive(Clone, Debug)]
pub struct PixelSurface {
    width: u32,
    height: u32,
    /// Column offset in destination space. May be negative.
    pub x: i32,
    /// Pixel-row offset in destination space. May be negative.
    pub y: i32,
    /// Layering priority; higher draws in front.
    pub z: i32,

    color: Vec<Rgb8>,
    opacity: Vec<u8>,
    text: Vec<Option<char>>,

    // Per-cell "already written" bits used by no-overwrite compositing into this surface.
    coverage: Vec<u64>,
    wire: Vec<u8>,
    wire_capacity: usize,
}

impl PixelSurface {
    /// Allocate a fully opaque surface filled with `fill`.
    pub fn new(width: u32, height: u32, fill: Rgb8) -> HalfblockResult<Self> {
        let mut s = Self::allocate(width, height)?;
        s.clear_opaque(fill);
        Ok(s)
    }

    /// Allocate a fully transparent surface.
    pub fn transparent(width: u32, height: u32) -> HalfblockResult<Self> {
        Self::allocate(width, height)
    }

    /// Import decoded RGBA8 pixels (straight alpha, row-major).
    ///
    /// Alpha is copied verbatim into the opacity channel; it is not binarized.
    pub fn from_rgba(rgba: &[u8], width: u32, height: u32) -> HalfblockResult<Self> {
        let mut s = Self::allocate(width, height)?;
        let needed = s.len() * 4;
        if rgba.len() < needed {
            return Err(HalfblockError::buffer_too_small(needed, rgba.len()));
        }
        for ((px, c), a) in rgba
            .chunks_exact(4)
            .zip(s.color.iter_mut())
            .zip(s.opacity.iter_mut())
        {
            *c = Rgb8::new(px[0], px[1], px[2]);
            *a = px[3];
        }
        Ok(s)
    }

    /// Export as RGBA8 (straight alpha, row-major); opacity becomes alpha.
    pub fn to_rgba(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.len() * 4);
        for (c, a) in self.color.iter().zip(&self.opacity) {
            out.extend_from_slice(&[c.r, c.g, c.b, *a]);
        }
        out
    }

    fn allocate(width: u32, height: u32) -> HalfblockResult<Self> {
        let n = cell_count(width, height)?;
        let wire_capacity = wire::capacity_for(width, height);
        Ok(Self {
            width,
            height,
            x: 0,
            y: 0,
            z: 0,
            color: vec![Rgb8::BLACK; n],
            opacity: vec![0; n],
            text: vec![None; n],
            coverage: vec![0; n.div_ceil(64)],
            wire: Vec::with_capacity(wire_capacity),
            wire_capacity,
        })
    }

    /// Width in columns.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixel rows (two rows per terminal line).
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of cells (`width * height`).
    pub fn len(&self) -> usize {
        self.color.len()
    }

    /// Always `false`: surfaces are never zero-sized.
    pub fn is_empty(&self) -> bool {
        self.color.is_empty()
    }

    /// Position in destination space.
    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }

    /// Move the surface in destination space.
    pub fn set_position(&mut self, x: i32, y: i32) {
        self.x = x;
        self.y = y;
    }

    /// Row-major color channel.
    pub fn color(&self) -> &[Rgb8] {
        &self.color
    }

    /// Mutable row-major color channel.
    pub fn color_mut(&mut self) -> &mut [Rgb8] {
        &mut self.color
    }

    /// Row-major opacity channel.
    pub fn opacity(&self) -> &[u8] {
        &self.opacity
    }

    /// Mutable row-major opacity channel.
    pub fn opacity_mut(&mut self) -> &mut [u8] {
        &mut self.opacity
    }

    /// Row-major text overlay channel.
    pub fn text(&self) -> &[Option<char>] {
        &self.text
    }

    /// Mutable row-major text overlay channel.
    pub fn text_mut(&mut self) -> &mut [Option<char>] {
        &mut self.text
    }

    /// Cell index for `(x, y)`, or `None` when out of bounds.
    pub fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some((y as usize) * (self.width as usize) + (x as usize))
    }

    /// Color and opacity at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<(Rgb8, u8)> {
        self.index(x, y).map(|i| (self.color[i], self.opacity[i]))
    }

    /// Write one cell. Returns `false` when `(x, y)` is out of bounds.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Rgb8, opacity: u8) -> bool {
        match self.index(x, y) {
            Some(i) => {
                self.color[i] = color;
                self.opacity[i] = opacity;
                true
            }
            None => false,
        }
    }

    /// Set or clear the text overlay at `(x, y)`.
    ///
    /// Overlays only pair correctly on even rows.
    pub fn set_text(&mut self, x: u32, y: u32, ch: Option<char>) -> bool {
        match self.index(x, y) {
            Some(i) => {
                self.text[i] = ch;
                true
            }
            None => false,
        }
    }

    /// Write `s` as text overlays along row `y` starting at column `x`.
    ///
    /// Stops at the right edge. Returns the number of characters written.
    pub fn put_str(&mut self, x: u32, y: u32, s: &str) -> usize {
        if y >= self.height {
            return 0;
        }
        let mut written = 0;
        for (col, ch) in (x..self.width).zip(s.chars()) {
            if self.set_text(col, y, Some(ch)) {
                written += 1;
            }
        }
        written
    }

    /// Fill a rectangle (clipped to the surface) with a color and opacity.
    pub fn fill_rect(&mut self, x: i32, y: i32, w: u32, h: u32, color: Rgb8, opacity: u8) {
        let Some(cx) = clip_span(i64::from(x), w, self.width) else {
            return;
        };
        let Some(cy) = clip_span(i64::from(y), h, self.height) else {
            return;
        };
        let stride = self.width as usize;
        for row in cy.dst_start..cy.dst_start + cy.len {
            let base = (row as usize) * stride + cx.dst_start as usize;
            let end = base + cx.len as usize;
            self.color[base..end].fill(color);
            self.opacity[base..end].fill(opacity);
        }
    }

    /// Reset every cell to `color`, fully opaque, with no text.
    pub fn clear_opaque(&mut self, color: Rgb8) {
        self.color.fill(color);
        self.opacity.fill(255);
        self.text.fill(None);
    }

    /// Reset every cell to transparent black with no text.
    pub fn clear_transparent(&mut self) {
        self.color.fill(Rgb8::BLACK);
        self.opacity.fill(0);
        self.text.fill(None);
    }

    /// Rewrite the opacity of every visible cell to `max(value, 1)`.
    ///
    /// Cells with opacity `0` stay absent.
    pub fn set_alpha(&mut self, value: u8) {
        let value = value.max(1);
        for a in self.opacity.iter_mut().filter(|a| **a != 0) {
            *a = value;
        }
    }

    /// Reallocate at a new size. Content is cleared to transparent, not preserved.
    pub fn resize(&mut self, width: u32, height: u32) -> HalfblockResult<()> {
        let n = cell_count(width, height)?;
        self.reallocate(width, height, n);
        Ok(())
    }

    fn reallocate(&mut self, width: u32, height: u32, n: usize) {
        tracing::debug!(
            from_w = self.width,
            from_h = self.height,
            to_w = width,
            to_h = height,
            "surface resize"
        );
        self.width = width;
        self.height = height;
        self.color = vec![Rgb8::BLACK; n];
        self.opacity = vec![0; n];
        self.text = vec![None; n];
        self.coverage = vec![0; n.div_ceil(64)];
        self.wire_capacity = wire::capacity_for(width, height);
        self.wire = Vec::with_capacity(self.wire_capacity);
    }

    /// Copy this surface's content into the top-left corner of `dst`.
    ///
    /// Fails with [`HalfblockError::BufferTooSmall`] if `dst` is narrower or shorter.
    pub fn copy_to(&self, dst: &mut PixelSurface) -> HalfblockResult<()> {
        if dst.width < self.width {
            return Err(HalfblockError::buffer_too_small(
                self.width as usize,
                dst.width as usize,
            ));
        }
        if dst.height < self.height {
            return Err(HalfblockError::buffer_too_small(
                self.height as usize,
                dst.height as usize,
            ));
        }
        dst.blit_from(self, 0, 0);
        Ok(())
    }

    /// Make this surface an exact copy of `src`: dimensions, channels, position and layer.
    ///
    /// Buffers are only reallocated when the dimensions differ.
    pub fn assign_from(&mut self, src: &PixelSurface) {
        if self.width != src.width || self.height != src.height {
            self.reallocate(src.width, src.height, src.len());
        }
        self.color.copy_from_slice(&src.color);
        self.opacity.copy_from_slice(&src.opacity);
        self.text.copy_from_slice(&src.text);
        self.x = src.x;
        self.y = src.y;
        self.z = src.z;
    }

    /// Overwrite the region of `self` at `(dx, dy)` with every cell of `src`, clipped.
    ///
    /// Unlike compositing, transparent source cells are copied too.
    pub fn blit_from(&mut self, src: &PixelSurface, dx: i32, dy: i32) {
        let Some(cx) = clip_span(i64::from(dx), src.width, self.width) else {
            return;
        };
        let Some(cy) = clip_span(i64::from(dy), src.height, self.height) else {
            return;
        };
        let (sw, dw) = (src.width as usize, self.width as usize);
        let len = cx.len as usize;
        for row in 0..cy.len as usize {
            let s = (cy.src_start as usize + row) * sw + cx.src_start as usize;
            let d = (cy.dst_start as usize + row) * dw + cx.dst_start as usize;
            self.color[d..d + len].copy_from_slice(&src.color[s..s + len]);
            self.opacity[d..d + len].copy_from_slice(&src.opacity[s..s + len]);
            self.text[d..d + len].copy_from_slice(&src.text[s..s + len]);
        }
    }

    /// Rescale to `(width, height)` with the given algorithm.
    ///
    /// No-op (buffers untouched) when the size is unchanged. The text overlay is cleared.
    pub fn scale(
        &mut self,
        width: u32,
        height: u32,
        algorithm: ScaleAlgorithm,
    ) -> HalfblockResult<()> {
        if width == 0 || height == 0 {
            return Err(HalfblockError::invalid_dimensions(width, height));
        }
        if width == self.width && height == self.height {
            return Ok(());
        }
        let out = resample::resample(self, width, height, algorithm);
        self.adopt(out);
        Ok(())
    }

    /// Scale the content to `(width, height)` and re-center it at `(center_x, center_y)`.
    ///
    /// With [`FitMode::Clip`] the outer dimensions stay fixed; with
    /// [`FitMode::AutoEnlarge`] the surface grows first (and its position shifts so the
    /// existing content keeps its place in destination space).
    pub fn scale_in_place(
        &mut self,
        width: u32,
        height: u32,
        center_x: i32,
        center_y: i32,
        mode: FitMode,
        algorithm: ScaleAlgorithm,
    ) -> HalfblockResult<()> {
        if width == 0 || height == 0 {
            return Err(HalfblockError::invalid_dimensions(width, height));
        }
        let content = resample::resample(self, width, height, algorithm);
        self.place_centered(content, center_x, center_y, mode)
    }

    /// Rotate by `angle` radians (clockwise on screen), reallocating to the bounding box.
    pub fn rotate(&mut self, angle: f64, algorithm: RotateAlgorithm) -> HalfblockResult<()> {
        if !angle.is_finite() {
            return Err(HalfblockError::invalid_value("rotation angle must be finite"));
        }
        if rotate::quarter_turns(angle) == Some(0) {
            return Ok(());
        }
        let out = rotate::rotate(self, angle, algorithm);
        self.adopt(out);
        Ok(())
    }

    /// Rotate the content and re-center it at `(center_x, center_y)`.
    ///
    /// See [`PixelSurface::scale_in_place`] for how `mode` applies.
    pub fn rotate_in_place(
        &mut self,
        angle: f64,
        center_x: i32,
        center_y: i32,
        mode: FitMode,
        algorithm: RotateAlgorithm,
    ) -> HalfblockResult<()> {
        if !angle.is_finite() {
            return Err(HalfblockError::invalid_value("rotation angle must be finite"));
        }
        let content = rotate::rotate(self, angle, algorithm);
        self.place_centered(content, center_x, center_y, mode)
    }

    fn adopt(&mut self, out: Resampled) {
        let n = out.color.len();
        if out.width != self.width || out.height != self.height {
            self.coverage = vec![0; n.div_ceil(64)];
            self.wire_capacity = wire::capacity_for(out.width, out.height);
            self.wire = Vec::with_capacity(self.wire_capacity);
        }
        self.width = out.width;
        self.height = out.height;
        self.color = out.color;
        self.opacity = out.opacity;
        self.text = vec![None; n];
    }

    fn place_centered(
        &mut self,
        content: Resampled,
        center_x: i32,
        center_y: i32,
        mode: FitMode,
    ) -> HalfblockResult<()> {
        let left = i64::from(center_x) - i64::from(content.width / 2);
        let top = i64::from(center_y) - i64::from(content.height / 2);

        let (mut dx, mut dy) = (left, top);
        match mode {
            FitMode::Clip => self.clear_transparent(),
            FitMode::AutoEnlarge => {
                let min_x = left.min(0);
                let min_y = top.min(0);
                let max_x = (left + i64::from(content.width)).max(i64::from(self.width));
                let max_y = (top + i64::from(content.height)).max(i64::from(self.height));
                let new_w = dim_from_i64(max_x - min_x)?;
                let new_h = dim_from_i64(max_y - min_y)?;
                if new_w != self.width || new_h != self.height {
                    self.resize(new_w, new_h)?;
                } else {
                    self.clear_transparent();
                }
                self.x = saturate_i32(i64::from(self.x) + min_x);
                self.y = saturate_i32(i64::from(self.y) + min_y);
                dx -= min_x;
                dy -= min_y;
            }
        }
        self.blit_buffers(dx, dy, &content);
        Ok(())
    }

    fn blit_buffers(&mut self, dx: i64, dy: i64, src: &Resampled) {
        let Some(cx) = clip_span(dx, src.width, self.width) else {
            return;
        };
        let Some(cy) = clip_span(dy, src.height, self.height) else {
            return;
        };
        let (sw, dw) = (src.width as usize, self.width as usize);
        let len = cx.len as usize;
        for row in 0..cy.len as usize {
            let s = (cy.src_start as usize + row) * sw + cx.src_start as usize;
            let d = (cy.dst_start as usize + row) * dw + cx.dst_start as usize;
            self.color[d..d + len].copy_from_slice(&src.color[s..s + len]);
            self.opacity[d..d + len].copy_from_slice(&src.opacity[s..s + len]);
        }
    }

    /// Borrow every channel mutably at once, with the write-guard bits reset.
    pub(crate) fn cells_for_compositing(&mut self) -> CellsMut<'_> {
        self.coverage.fill(0);
        self.cells_mut()
    }

    /// Borrow every channel mutably at once for overwrite or blend paths that never claim.
    pub(crate) fn cells_mut(&mut self) -> CellsMut<'_> {
        CellsMut {
            width: self.width,
            height: self.height,
            color: &mut self.color,
            opacity: &mut self.opacity,
            text: &mut self.text,
            coverage: &mut self.coverage,
        }
    }
}

/// Simultaneous mutable view of a surface's channels for compositor hot loops.
pub(crate) struct CellsMut<'a> {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) color: &'a mut [Rgb8],
    pub(crate) opacity: &'a mut [u8],
    pub(crate) text: &'a mut [Option<char>],
    coverage: &'a mut [u64],
}

impl CellsMut<'_> {
    /// Mark cell `i` as written; returns `true` if it was not written before.
    #[inline]
    pub(crate) fn claim(&mut self, i: usize) -> bool {
        let (word, bit) = (i / 64, 1u64 << (i % 64));
        let fresh = self.coverage[word] & bit == 0;
        self.coverage[word] |= bit;
        fresh
    }
}

/// One axis of a clipped copy: where to start reading, where to start writing, how many cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Span {
    pub(crate) src_start: u32,
    pub(crate) dst_start: u32,
    pub(crate) len: u32,
}

/// Intersect `[offset, offset + src_len)` with `[0, dst_len)`.
pub(crate) fn clip_span(offset: i64, src_len: u32, dst_len: u32) -> Option<Span> {
    let start = offset.max(0);
    let end = (offset + i64::from(src_len)).min(i64::from(dst_len));
    if end <= start {
        return None;
    }
    Some(Span {
        src_start: (start - offset) as u32,
        dst_start: start as u32,
        len: (end - start) as u32,
    })
}

fn cell_count(width: u32, height: u32) -> HalfblockResult<usize> {
    if width == 0 || height == 0 {
        return Err(HalfblockError::invalid_dimensions(width, height));
    }
    (width as usize)
        .checked_mul(height as usize)
        .ok_or_else(|| HalfblockError::invalid_dimensions(width, height))
}

fn dim_from_i64(v: i64) -> HalfblockResult<u32> {
    u32::try_from(v).map_err(|_| HalfblockError::invalid_value(format!("surface extent {v}")))
}

fn saturate_i32(v: i64) -> i32 {
    v.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

#[cfg(test)]
#[path = "../../tests/unit/surface/surface.rs"]
mod tests;
