//! Multi-surface compositing into one destination surface.
//!
//! Every function here borrows its inputs read-only and mutates only the destination; none
//! of them allocate. Surface positions are interpreted relative to the destination's
//! top-left corner, and anything outside the destination is clipped.
//!
//! Two ordering families exist:
//!
//! - **no-overwrite** ([`render_binary`], [`render_aligned`]) walk front-to-back and never
//!   touch a cell that was already written in the same call;
//! - **overwrite/blend** ([`render_over`], [`render_alpha_over_opaque_bg`],
//!   [`render_alpha_general`]) walk back-to-front so the topmost surface lands last.
//!
//! Both walk the same stable descending-z order (in opposite directions), so for equal
//! `z` the surface passed first is the one in front in every family.

use crate::foundation::math::{blend_over_opaque, porter_duff_over};
use crate::surface::{CellsMut, PixelSurface, clip_span};

/// Maximum number of surfaces considered by a single compositing call.
///
/// Inputs beyond this bound are dropped (with a warning), not reported as errors.
pub const MAX_COMPOSITE_SURFACES: usize = 2048;

/// Compositor variant used by a render pipeline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompositeMode {
    /// First-opaque-wins painter's algorithm ([`render_binary`]).
    #[default]
    Binary,
    /// Back-to-front unconditional overwrite ([`render_over`]).
    Over,
    /// [`render_binary`] for surfaces that exactly match the destination ([`render_aligned`]).
    Aligned,
    /// Alpha blend over an opaque destination ([`render_alpha_over_opaque_bg`]).
    AlphaOverOpaqueBg,
    /// Porter-Duff "over" with alpha on both sides ([`render_alpha_general`]).
    AlphaGeneral,
}

/// Composite `surfaces` into `dest` with the selected variant.
pub fn composite(mode: CompositeMode, surfaces: &[&PixelSurface], dest: &mut PixelSurface) {
    match mode {
        CompositeMode::Binary => render_binary(surfaces, dest),
        CompositeMode::Over => render_over(surfaces, dest),
        CompositeMode::Aligned => render_aligned(surfaces, dest),
        CompositeMode::AlphaOverOpaqueBg => render_alpha_over_opaque_bg(surfaces, dest),
        CompositeMode::AlphaGeneral => render_alpha_general(surfaces, dest),
    }
}

/// Fixed-capacity, stably sorted surface indices in descending `z` (front first).
pub struct ZOrder {
    idx: [u16; MAX_COMPOSITE_SURFACES],
    len: usize,
}

impl ZOrder {
    /// Indices from frontmost (highest `z`) to backmost.
    pub fn front_to_back(&self) -> &[u16] {
        &self.idx[..self.len]
    }

    /// Indices from backmost to frontmost.
    pub fn back_to_front(&self) -> impl Iterator<Item = usize> + '_ {
        self.front_to_back().iter().rev().map(|&i| usize::from(i))
    }

    /// Number of surfaces that will be composited.
    pub fn len(&self) -> usize {
        self.len
    }

    /// `true` when there is nothing to composite.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Order `surfaces` by descending `z`; ties keep their input order.
///
/// When every surface shares one `z` (the common single-layer scene) the identity order is
/// returned without sorting.
pub fn z_order(surfaces: &[&PixelSurface]) -> ZOrder {
    let len = if surfaces.len() > MAX_COMPOSITE_SURFACES {
        tracing::warn!(
            given = surfaces.len(),
            max = MAX_COMPOSITE_SURFACES,
            "compositor input over capacity; extra surfaces dropped"
        );
        MAX_COMPOSITE_SURFACES
    } else {
        surfaces.len()
    };

    let mut order = ZOrder {
        idx: [0; MAX_COMPOSITE_SURFACES],
        len,
    };
    for (i, slot) in order.idx[..len].iter_mut().enumerate() {
        *slot = i as u16;
    }
    if len < 2 {
        return order;
    }

    let z = |i: u16| surfaces[usize::from(i)].z;
    let first = surfaces[0].z;
    if surfaces[..len].iter().all(|s| s.z == first) {
        return order;
    }

    // Stable insertion sort: linear on already-ordered input and allocation-free.
    let idx = &mut order.idx[..len];
    for i in 1..len {
        let cur = idx[i];
        let zc = z(cur);
        let mut j = i;
        while j > 0 && z(idx[j - 1]) < zc {
            idx[j] = idx[j - 1];
            j -= 1;
        }
        idx[j] = cur;
    }
    order
}

/// Destination-space intersection of a surface footprint with the destination bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Clip {
    src_x: usize,
    src_y: usize,
    dst_x: usize,
    dst_y: usize,
    w: usize,
    h: usize,
}

fn clip(src: &PixelSurface, dst_w: u32, dst_h: u32) -> Option<Clip> {
    let cx = clip_span(i64::from(src.x), src.width(), dst_w)?;
    let cy = clip_span(i64::from(src.y), src.height(), dst_h)?;
    Some(Clip {
        src_x: cx.src_start as usize,
        src_y: cy.src_start as usize,
        dst_x: cx.dst_start as usize,
        dst_y: cy.dst_start as usize,
        w: cx.len as usize,
        h: cy.len as usize,
    })
}

/// Visit each clipped row as `(src_row_start, dst_row_start, len)`.
#[inline]
fn for_each_row(src: &PixelSurface, dst_w: u32, dst_h: u32, mut f: impl FnMut(usize, usize, usize)) {
    let Some(c) = clip(src, dst_w, dst_h) else {
        return;
    };
    let (sw, dw) = (src.width() as usize, dst_w as usize);
    for row in 0..c.h {
        let s = (c.src_y + row) * sw + c.src_x;
        let d = (c.dst_y + row) * dw + c.dst_x;
        f(s, d, c.w);
    }
}

/// Painter's algorithm without a depth buffer: front-to-back, first opaque write wins.
///
/// A destination cell ends up with the color of the highest-`z` surface that covers it with
/// non-zero opacity; uncovered cells keep their previous content.
pub fn render_binary(surfaces: &[&PixelSurface], dest: &mut PixelSurface) {
    let order = z_order(surfaces);
    let mut cells = dest.cells_for_compositing();
    for &i in order.front_to_back() {
        let src = surfaces[usize::from(i)];
        copy_unclaimed(src, &mut cells);
    }
}

fn copy_unclaimed(src: &PixelSurface, cells: &mut CellsMut<'_>) {
    let (color, opacity, text) = (src.color(), src.opacity(), src.text());
    for_each_row(src, cells.width, cells.height, |s, d, len| {
        for k in 0..len {
            let a = opacity[s + k];
            if a == 0 || !cells.claim(d + k) {
                continue;
            }
            cells.color[d + k] = color[s + k];
            cells.opacity[d + k] = a;
            cells.text[d + k] = text[s + k];
        }
    });
}

/// Back-to-front unconditional overwrite of every visible source cell.
pub fn render_over(surfaces: &[&PixelSurface], dest: &mut PixelSurface) {
    let order = z_order(surfaces);
    for i in order.back_to_front() {
        render_surface_over(surfaces[i], dest);
    }
}

/// Overwrite `dest` with every visible cell of one surface.
pub fn render_surface_over(surface: &PixelSurface, dest: &mut PixelSurface) {
    let cells = dest.cells_mut();
    let (color, opacity, text) = (surface.color(), surface.opacity(), surface.text());
    for_each_row(surface, cells.width, cells.height, |s, d, len| {
        for k in 0..len {
            let a = opacity[s + k];
            if a == 0 {
                continue;
            }
            cells.color[d + k] = color[s + k];
            cells.opacity[d + k] = a;
            cells.text[d + k] = text[s + k];
        }
    });
}

/// [`render_binary`] for inputs that share the destination's exact size and sit at `(0, 0)`.
///
/// Skips all clipping and offset arithmetic. Surfaces whose size differs from the destination
/// are ignored.
pub fn render_aligned(surfaces: &[&PixelSurface], dest: &mut PixelSurface) {
    let order = z_order(surfaces);
    let mut cells = dest.cells_for_compositing();
    for &i in order.front_to_back() {
        let src = surfaces[usize::from(i)];
        if src.width() != cells.width || src.height() != cells.height {
            tracing::trace!(index = i, "aligned compositing skipped mismatched surface");
            continue;
        }
        let (color, opacity, text) = (src.color(), src.opacity(), src.text());
        for (k, &a) in opacity.iter().enumerate() {
            if a == 0 || !cells.claim(k) {
                continue;
            }
            cells.color[k] = color[k];
            cells.opacity[k] = a;
            cells.text[k] = text[k];
        }
    }
}

/// Back-to-front alpha blend over a destination that is assumed fully opaque.
///
/// Per channel: `out = (fg * alpha + bg * (255 - alpha)) / 255`. Destination opacity is left
/// untouched.
pub fn render_alpha_over_opaque_bg(surfaces: &[&PixelSurface], dest: &mut PixelSurface) {
    let order = z_order(surfaces);
    let cells = dest.cells_mut();
    for i in order.back_to_front() {
        let src = surfaces[i];
        let (color, opacity, text) = (src.color(), src.opacity(), src.text());
        for_each_row(src, cells.width, cells.height, |s, d, len| {
            for k in 0..len {
                let a = opacity[s + k];
                if a == 0 {
                    continue;
                }
                let fg = color[s + k];
                let bg = &mut cells.color[d + k];
                if a == 255 {
                    *bg = fg;
                    cells.text[d + k] = text[s + k];
                } else {
                    bg.r = blend_over_opaque(fg.r, bg.r, a);
                    bg.g = blend_over_opaque(fg.g, bg.g, a);
                    bg.b = blend_over_opaque(fg.b, bg.b, a);
                    if let Some(ch) = text[s + k] {
                        cells.text[d + k] = Some(ch);
                    }
                }
            }
        });
    }
}

/// Back-to-front Porter-Duff "over" where both source and destination carry alpha.
pub fn render_alpha_general(surfaces: &[&PixelSurface], dest: &mut PixelSurface) {
    let order = z_order(surfaces);
    let cells = dest.cells_mut();
    for i in order.back_to_front() {
        let src = surfaces[i];
        let (color, opacity, text) = (src.color(), src.opacity(), src.text());
        for_each_row(src, cells.width, cells.height, |s, d, len| {
            for k in 0..len {
                let sa = opacity[s + k];
                if sa == 0 {
                    continue;
                }
                let o = d + k;
                let fg = color[s + k];
                if sa == 255 {
                    cells.color[o] = fg;
                    cells.opacity[o] = 255;
                    cells.text[o] = text[s + k];
                    continue;
                }
                let (c, a) = porter_duff_over(
                    fg.to_array(),
                    sa,
                    cells.color[o].to_array(),
                    cells.opacity[o],
                );
                cells.color[o] = crate::foundation::core::Rgb8::from_array(c);
                cells.opacity[o] = a;
                if let Some(ch) = text[s + k] {
                    cells.text[o] = Some(ch);
                }
            }
        });
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
