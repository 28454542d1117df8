//! Compositing and frame orchestration.

pub(crate) mod compositor;
pub(crate) mod pipeline;

pub use compositor::{
    CompositeMode, MAX_COMPOSITE_SURFACES, ZOrder, composite, render_aligned,
    render_alpha_general, render_alpha_over_opaque_bg, render_binary, render_over,
    render_surface_over, z_order,
};
pub use pipeline::{PipelineOpts, RenderObject, RenderPipeline};
