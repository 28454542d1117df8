use crate::effects::handle::{EffectHandle, Expansion};
use crate::effects::spec::EffectSpec;
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{HalfblockError, HalfblockResult};
use crate::surface::PixelSurface;

/// Output buffers owned on behalf of one chain invocation site.
///
/// `output` is sized to the input plus twice the chain's expansion; `intermediate` only exists
/// for chains with two or more stages, which alternate between the two buffers.
#[derive(Clone, Debug)]
pub struct EffectContext {
    output: PixelSurface,
    intermediate: Option<PixelSurface>,
    applied: Expansion,
    input_size: (u32, u32),
}

impl EffectContext {
    /// Context whose output starts as a transparent `width x height` surface.
    pub fn new(width: u32, height: u32) -> HalfblockResult<Self> {
        Ok(Self {
            output: PixelSurface::transparent(width, height)?,
            intermediate: None,
            applied: Expansion::default(),
            input_size: (width, height),
        })
    }

    /// Context pre-sized for `surface` with no expansion.
    pub fn for_surface(surface: &PixelSurface) -> Self {
        Self {
            output: surface.clone(),
            intermediate: None,
            applied: Expansion::default(),
            input_size: (surface.width(), surface.height()),
        }
    }

    /// Result of the last chain run.
    pub fn output(&self) -> &PixelSurface {
        &self.output
    }

    /// Mutable access to the output surface (e.g. for wire encoding).
    pub fn output_mut(&mut self) -> &mut PixelSurface {
        &mut self.output
    }

    /// Border actually added around the input on the last run.
    pub fn applied_expansion(&self) -> Expansion {
        self.applied
    }

    /// Input dimensions seen on the last run.
    pub fn input_size(&self) -> (u32, u32) {
        self.input_size
    }

    fn prepare(
        &mut self,
        input: &PixelSurface,
        expansion: Expansion,
        stages: usize,
    ) -> HalfblockResult<(u32, u32)> {
        let grow = |base: u32, border: u32| {
            border
                .checked_mul(2)
                .and_then(|b| base.checked_add(b))
                .ok_or_else(|| HalfblockError::invalid_dimensions(input.width(), input.height()))
        };
        let w = grow(input.width(), expansion.x)?;
        let h = grow(input.height(), expansion.y)?;

        if self.output.width() != w || self.output.height() != h {
            tracing::debug!(width = w, height = h, "effect context output resize");
            self.output.resize(w, h)?;
        }
        if stages >= 2 {
            match &mut self.intermediate {
                Some(im) if im.width() == w && im.height() == h => {}
                Some(im) => im.resize(w, h)?,
                None => self.intermediate = Some(PixelSurface::transparent(w, h)?),
            }
        }
        self.applied = expansion;
        self.input_size = (input.width(), input.height());
        Ok((w, h))
    }
}

/// Ordered effects applied one after another, growing the canvas once up front.
#[derive(Debug, Default)]
pub struct EffectChain {
    handles: Vec<EffectHandle>,
    expansion: Expansion,
}

impl EffectChain {
    /// Empty chain (pass-through).
    pub fn new() -> Self {
        Self::default()
    }

    /// Build and validate one handle per spec, in order.
    pub fn from_specs(specs: &[EffectSpec]) -> HalfblockResult<Self> {
        let mut chain = Self::new();
        for spec in specs {
            chain.add(spec.build()?);
        }
        Ok(chain)
    }

    /// Append an effect. The chain's border becomes the per-axis maximum of all declared
    /// expansions.
    pub fn add(&mut self, handle: impl Into<EffectHandle>) -> &mut Self {
        let handle = handle.into();
        if let Some(e) = handle.declared_expansion() {
            self.expansion = self.expansion.max(e);
        }
        self.handles.push(handle);
        self
    }

    /// Builder form of [`EffectChain::add`].
    pub fn with(mut self, handle: impl Into<EffectHandle>) -> Self {
        self.add(handle);
        self
    }

    /// Number of effects.
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// `true` for a pass-through chain.
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Accumulated border requirement.
    pub fn expansion(&self) -> Expansion {
        self.expansion
    }

    /// Validate every effect, returning the first failure.
    pub fn validate(&self) -> HalfblockResult<()> {
        self.handles.iter().try_for_each(EffectHandle::validate)
    }

    /// Run all effects on `input`, leaving the result in `ctx.output()`.
    ///
    /// Parameters are validated before any stage runs. The output is positioned so the
    /// original content keeps its place in destination space and inherits `input.z`.
    #[tracing::instrument(skip_all, fields(effects = self.handles.len(), frame = frame.0))]
    pub fn run(
        &mut self,
        input: &PixelSurface,
        ctx: &mut EffectContext,
        frame: FrameIndex,
    ) -> HalfblockResult<()> {
        self.validate()?;

        if self.handles.is_empty() {
            ctx.output.assign_from(input);
            ctx.applied = Expansion::default();
            ctx.input_size = (input.width(), input.height());
            return Ok(());
        }

        let stages = self.handles.len();
        let (w, h) = ctx.prepare(input, self.expansion, stages)?;
        let x = input.x.saturating_sub_unsigned(self.expansion.x);
        let y = input.y.saturating_sub_unsigned(self.expansion.y);

        let output = &mut ctx.output;
        let intermediate = &mut ctx.intermediate;
        for (i, handle) in self.handles.iter_mut().enumerate() {
            // The last stage always lands in `output`.
            let to_output = (stages - 1 - i) % 2 == 0;
            let (dst, prev): (&mut PixelSurface, Option<&PixelSurface>) =
                match (to_output, intermediate.as_mut()) {
                    (true, Some(im)) => (&mut *output, Some(&*im)),
                    (true, None) => (&mut *output, None),
                    (false, Some(im)) => (im, Some(&*output)),
                    (false, None) => {
                        return Err(HalfblockError::validation(
                            "effect chain intermediate buffer missing",
                        ));
                    }
                };
            let src = if i == 0 {
                input
            } else {
                prev.ok_or_else(|| {
                    HalfblockError::validation("effect chain intermediate buffer missing")
                })?
            };

            if dst.width() != w || dst.height() != h {
                dst.resize(w, h)?;
            } else {
                dst.clear_transparent();
            }
            dst.set_position(x, y);
            dst.z = input.z;

            tracing::trace!(stage = i, effect = handle.name(), "effect stage");
            handle.run(src, dst, frame)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/chain.rs"]
mod tests;
