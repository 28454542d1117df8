use std::path::Path;

use crate::effects::EffectChain;
use crate::foundation::error::HalfblockResult;
use crate::render::{PipelineOpts, RenderObject, RenderPipeline};
use crate::scene::model::{LayerDef, LayerSource, Scene};
use crate::surface::PixelSurface;

impl Scene {
    /// Validate the scene and assemble a ready-to-run pipeline.
    ///
    /// Image paths are resolved against `assets_root`.
    #[tracing::instrument(skip(self), fields(layers = self.layers.len()))]
    pub fn build_pipeline(&self, assets_root: &Path) -> HalfblockResult<RenderPipeline> {
        self.validate()?;
        let mut pipeline = RenderPipeline::new(
            self.width,
            self.height,
            PipelineOpts {
                mode: self.mode,
                background: self.background,
            },
        )?;

        for (i, layer) in self.layers.iter().enumerate() {
            let object = build_object(layer, assets_root).map_err(|e| layer.wrap_error(i, e))?;
            pipeline.push(object);
        }

        if !self.post.is_empty() {
            pipeline.set_post_process(Some(EffectChain::from_specs(&self.post)?));
        }
        tracing::debug!(
            width = self.width,
            height = self.height,
            mode = ?self.mode,
            "scene pipeline built"
        );
        Ok(pipeline)
    }
}

fn build_object(layer: &LayerDef, assets_root: &Path) -> HalfblockResult<RenderObject> {
    let mut surface = match &layer.source {
        LayerSource::Solid {
            width,
            height,
            color,
        } => PixelSurface::new(*width, *height, *color)?,
        LayerSource::Image {
            path,
            size,
            algorithm,
        } => {
            let mut s = PixelSurface::from_png_path(assets_root.join(path))?;
            if let Some([w, h]) = *size {
                s.scale(w, h, *algorithm)?;
            }
            s
        }
    };

    surface.set_position(layer.position.x, layer.position.y);
    surface.z = layer.z;
    if let Some(alpha) = layer.alpha {
        surface.set_alpha(alpha);
    }
    for label in &layer.labels {
        surface.put_str(label.x, label.y, &label.text);
    }

    if layer.effects.is_empty() {
        Ok(RenderObject::new(surface))
    } else {
        let chain = EffectChain::from_specs(&layer.effects)?;
        Ok(RenderObject::with_chain(surface, chain))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/build.rs"]
mod tests;
