use smallvec::SmallVec;

use crate::effects::{EffectChain, EffectContext};
use crate::foundation::core::{FrameIndex, Rgb8};
use crate::foundation::error::{HalfblockError, HalfblockResult};
use crate::render::compositor::{CompositeMode, composite};
use crate::surface::PixelSurface;

/// One content surface plus its optional effect chain.
#[derive(Debug)]
pub struct RenderObject {
    surface: PixelSurface,
    effects: Option<(EffectChain, EffectContext)>,
}

impl RenderObject {
    /// Object drawn as-is.
    pub fn new(surface: PixelSurface) -> Self {
        Self {
            surface,
            effects: None,
        }
    }

    /// Object whose surface is passed through `chain` every frame.
    pub fn with_chain(surface: PixelSurface, chain: EffectChain) -> Self {
        let ctx = EffectContext::for_surface(&surface);
        Self {
            surface,
            effects: Some((chain, ctx)),
        }
    }

    /// Content surface (before effects).
    pub fn surface(&self) -> &PixelSurface {
        &self.surface
    }

    /// Mutable content surface, e.g. to move it between frames.
    pub fn surface_mut(&mut self) -> &mut PixelSurface {
        &mut self.surface
    }

    /// Attached effect chain, if any.
    pub fn chain(&self) -> Option<&EffectChain> {
        self.effects.as_ref().map(|(chain, _)| chain)
    }

    /// Surface to composite for `frame`: the chain's output, or the content itself when no
    /// chain is attached (no copy).
    pub fn process(&mut self, frame: FrameIndex) -> HalfblockResult<&PixelSurface> {
        match &mut self.effects {
            Some((chain, ctx)) => {
                chain.run(&self.surface, ctx, frame)?;
                Ok(ctx.output())
            }
            None => Ok(&self.surface),
        }
    }
}

/// Pipeline-wide compositing configuration.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PipelineOpts {
    /// Compositor variant for the merge step.
    #[serde(default)]
    pub mode: CompositeMode,
    /// Merge-buffer clear color; `None` clears to transparent.
    #[serde(default)]
    pub background: Option<Rgb8>,
}

impl PipelineOpts {
    /// Reject combinations the compositor cannot honor.
    pub fn validate(&self) -> HalfblockResult<()> {
        if self.mode == CompositeMode::AlphaOverOpaqueBg && self.background.is_none() {
            return Err(HalfblockError::validation(
                "alpha_over_opaque_bg compositing requires an opaque background",
            ));
        }
        Ok(())
    }
}

/// Objects -> per-object chains -> compositor -> optional post-process chain -> destination.
#[derive(Debug)]
pub struct RenderPipeline {
    objects: Vec<RenderObject>,
    merge: PixelSurface,
    destination: EffectContext,
    post: Option<EffectChain>,
    opts: PipelineOpts,
}

impl RenderPipeline {
    /// Pipeline drawing into a `width x height` canvas.
    pub fn new(width: u32, height: u32, opts: PipelineOpts) -> HalfblockResult<Self> {
        opts.validate()?;
        Ok(Self {
            objects: Vec::new(),
            merge: PixelSurface::transparent(width, height)?,
            destination: EffectContext::new(width, height)?,
            post: None,
            opts,
        })
    }

    /// Append an object; returns its index. Insertion order breaks z ties.
    pub fn push(&mut self, object: RenderObject) -> usize {
        self.objects.push(object);
        self.objects.len() - 1
    }

    /// Set or clear the post-process chain applied to the merged frame.
    pub fn set_post_process(&mut self, chain: Option<EffectChain>) {
        self.post = chain;
    }

    /// Objects in insertion order.
    pub fn objects(&self) -> &[RenderObject] {
        &self.objects
    }

    /// Object by index.
    pub fn object_mut(&mut self, index: usize) -> Option<&mut RenderObject> {
        self.objects.get_mut(index)
    }

    /// Compositing configuration.
    pub fn opts(&self) -> PipelineOpts {
        self.opts
    }

    /// Canvas size of the merge buffer.
    pub fn canvas_size(&self) -> (u32, u32) {
        (self.merge.width(), self.merge.height())
    }

    /// Result of the last [`RenderPipeline::run`].
    pub fn destination(&self) -> &PixelSurface {
        self.destination.output()
    }

    /// Render one frame into the destination.
    #[tracing::instrument(skip(self), fields(objects = self.objects.len()))]
    pub fn run(&mut self, frame: FrameIndex) -> HalfblockResult<()> {
        let mut layers: SmallVec<[&PixelSurface; 16]> = SmallVec::with_capacity(self.objects.len());
        for object in self.objects.iter_mut() {
            layers.push(object.process(frame)?);
        }

        match self.opts.background {
            Some(bg) => self.merge.clear_opaque(bg),
            None => self.merge.clear_transparent(),
        }
        composite(self.opts.mode, &layers, &mut self.merge);

        match &mut self.post {
            Some(chain) => chain.run(&self.merge, &mut self.destination, frame),
            None => {
                self.destination.output_mut().assign_from(&self.merge);
                Ok(())
            }
        }
    }

    /// [`RenderPipeline::run`] followed by wire encoding of the destination.
    pub fn render_wire(&mut self, frame: FrameIndex) -> HalfblockResult<&[u8]> {
        self.run(frame)?;
        Ok(self.destination.output_mut().to_wire_format())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/pipeline.rs"]
mod tests;
