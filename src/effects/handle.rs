use crate::foundation::core::FrameIndex;
use crate::foundation::error::HalfblockResult;
use crate::surface::PixelSurface;

/// Extra border cells an effect needs beyond its input bounds, per side.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Expansion {
    /// Columns added on the left and on the right.
    pub x: u32,
    /// Pixel rows added above and below.
    pub y: u32,
}

impl Expansion {
    /// Build an expansion from its per-axis borders.
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Per-axis maximum of two expansions.
    pub fn max(self, other: Self) -> Self {
        Self {
            x: self.x.max(other.x),
            y: self.y.max(other.y),
        }
    }

    /// `true` when no border is requested.
    pub fn is_zero(self) -> bool {
        self.x == 0 && self.y == 0
    }
}

/// A frame-driven surface transform.
///
/// When run by an [`EffectChain`](crate::EffectChain), `output` arrives cleared to
/// transparent and already sized to the input plus the chain's total [`Expansion`] on every
/// side. Effects that keep the content size write it centered (see [`centered_offset`]).
pub trait Effect: Send {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str {
        "custom"
    }

    /// Apply the transform for `frame`, reading `input` and writing `output`.
    fn run(
        &mut self,
        input: &PixelSurface,
        output: &mut PixelSurface,
        frame: FrameIndex,
    ) -> HalfblockResult<()>;

    /// Check parameters against their documented domain.
    fn validate(&self) -> HalfblockResult<()> {
        Ok(())
    }

    /// Border this effect needs around its input, if any.
    fn declared_expansion(&self) -> Option<Expansion> {
        None
    }
}

/// Type-erased effect, so one chain can hold heterogeneous transforms.
pub struct EffectHandle {
    inner: Box<dyn Effect>,
}

impl EffectHandle {
    /// Wrap a concrete effect.
    pub fn new(effect: impl Effect + 'static) -> Self {
        Self {
            inner: Box::new(effect),
        }
    }

    /// Wrap a closure as an effect with no parameters to validate and no expansion.
    pub fn from_fn<F>(name: &'static str, f: F) -> Self
    where
        F: FnMut(&PixelSurface, &mut PixelSurface, FrameIndex) -> HalfblockResult<()>
            + Send
            + 'static,
    {
        Self::new(FnEffect { name, f })
    }

    /// See [`Effect::name`].
    pub fn name(&self) -> &'static str {
        self.inner.name()
    }

    /// See [`Effect::run`].
    pub fn run(
        &mut self,
        input: &PixelSurface,
        output: &mut PixelSurface,
        frame: FrameIndex,
    ) -> HalfblockResult<()> {
        self.inner.run(input, output, frame)
    }

    /// See [`Effect::validate`].
    pub fn validate(&self) -> HalfblockResult<()> {
        self.inner.validate()
    }

    /// See [`Effect::declared_expansion`].
    pub fn declared_expansion(&self) -> Option<Expansion> {
        self.inner.declared_expansion()
    }
}

impl std::fmt::Debug for EffectHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectHandle")
            .field("name", &self.name())
            .field("expansion", &self.declared_expansion())
            .finish()
    }
}

impl<E: Effect + 'static> From<E> for EffectHandle {
    fn from(effect: E) -> Self {
        Self::new(effect)
    }
}

struct FnEffect<F> {
    name: &'static str,
    f: F,
}

impl<F> Effect for FnEffect<F>
where
    F: FnMut(&PixelSurface, &mut PixelSurface, FrameIndex) -> HalfblockResult<()> + Send,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn run(
        &mut self,
        input: &PixelSurface,
        output: &mut PixelSurface,
        frame: FrameIndex,
    ) -> HalfblockResult<()> {
        (self.f)(input, output, frame)
    }
}

/// Offset that centers `input` inside `output`.
pub fn centered_offset(input: &PixelSurface, output: &PixelSurface) -> (i32, i32) {
    let dx = (i64::from(output.width()) - i64::from(input.width())) / 2;
    let dy = (i64::from(output.height()) - i64::from(input.height())) / 2;
    (dx as i32, dy as i32)
}

/// Copy `input` centered into `output`.
pub(crate) fn place_input(input: &PixelSurface, output: &mut PixelSurface) {
    let (dx, dy) = centered_offset(input, output);
    output.blit_from(input, dx, dy);
}

/// Linear interpolation of a ramp parameter, clamped at `duration`.
pub(crate) fn ramp(start: f64, end: f64, frame: FrameIndex, duration: u64) -> f64 {
    start + (end - start) * frame.progress(duration)
}
