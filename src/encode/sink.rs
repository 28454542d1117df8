use std::io::Write;
use std::ops::Range;

use anyhow::Context;
use xxhash_rust::xxh3::xxh3_64;

use crate::foundation::core::FrameIndex;
use crate::foundation::error::{HalfblockError, HalfblockResult};
use crate::render::RenderPipeline;

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SinkConfig {
    /// Frame width in columns.
    pub width: u32,
    /// Frame height in pixel rows.
    pub height: u32,
}

/// Consumer of encoded frames.
///
/// Ordering contract: `push_frame` is called in strictly increasing [`FrameIndex`] order
/// between one `begin` and one `end`.
pub trait FrameSink: Send {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> HalfblockResult<()>;
    /// Push one wire-encoded frame.
    fn push_frame(&mut self, idx: FrameIndex, wire: &[u8]) -> HalfblockResult<()>;
    /// Called once after the last frame is pushed.
    fn end(&mut self) -> HalfblockResult<()>;
}

/// Counters kept by [`TerminalSink`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SinkStats {
    /// Frames handed to the sink.
    pub frames_total: u64,
    /// Frames actually written.
    pub frames_written: u64,
    /// Frames skipped because they matched the previous frame.
    pub frames_elided: u64,
}

/// Writes frames to a terminal-like stream, redrawing in place.
///
/// After each frame the cursor sits one line below it; the next frame first moves the cursor
/// back up by as many lines as the previous frame wrote, so it overwrites it without clearing
/// the screen. Lines are counted from the row trailers in the wire bytes, which keeps the
/// rewind correct for truncated frames and for frames larger than the configured canvas.
///
/// Cursor-down does not scroll at the bottom of the screen, so before a frame needs more lines
/// than any earlier one the sink emits that many newlines (scrolling if required) and moves
/// back up. The frame origin then starts at column 0.
#[derive(Debug)]
pub struct TerminalSink<W: Write + Send> {
    out: W,
    cfg: Option<SinkConfig>,
    last_lines: usize,
    reserved: usize,
    elide_static: bool,
    last_hash: Option<u64>,
    stats: SinkStats,
}

impl<W: Write + Send> TerminalSink<W> {
    /// Sink writing every frame to `out`.
    pub fn new(out: W) -> Self {
        Self {
            out,
            cfg: None,
            last_lines: 0,
            reserved: 0,
            elide_static: false,
            last_hash: None,
            stats: SinkStats::default(),
        }
    }

    /// Skip frames whose bytes hash equal to the previously written frame.
    pub fn with_static_frame_elision(mut self, enabled: bool) -> Self {
        self.elide_static = enabled;
        self
    }

    /// Configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Counters for the current run.
    pub fn stats(&self) -> SinkStats {
        self.stats
    }

    /// Release the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn reserve(&mut self, lines: usize) -> HalfblockResult<()> {
        if lines <= self.reserved {
            return Ok(());
        }
        self.out
            .write_all(&b"\n".repeat(lines))
            .context("reserve frame lines")?;
        write!(self.out, "\x1b[{lines}A").context("move cursor to frame origin")?;
        self.reserved = lines;
        Ok(())
    }
}

impl<W: Write + Send> FrameSink for TerminalSink<W> {
    fn begin(&mut self, cfg: SinkConfig) -> HalfblockResult<()> {
        self.cfg = Some(cfg);
        self.last_lines = 0;
        self.reserved = 0;
        self.last_hash = None;
        self.stats = SinkStats::default();
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, wire: &[u8]) -> HalfblockResult<()> {
        if self.cfg.is_none() {
            return Err(HalfblockError::validation("push_frame called before begin"));
        }
        self.stats.frames_total += 1;

        if self.elide_static {
            let hash = xxh3_64(wire);
            if self.last_hash == Some(hash) {
                self.stats.frames_elided += 1;
                tracing::trace!(frame = idx.0, "static frame elided");
                return Ok(());
            }
            self.last_hash = Some(hash);
        }

        if self.last_lines > 0 {
            write!(self.out, "\x1b[{}A", self.last_lines).context("move cursor to frame origin")?;
        }
        let lines = line_count(wire);
        self.reserve(lines)?;
        self.out.write_all(wire).context("write frame")?;
        self.out.flush().context("flush frame")?;
        self.last_lines = lines;
        self.stats.frames_written += 1;
        Ok(())
    }

    fn end(&mut self) -> HalfblockResult<()> {
        self.out.write_all(b"\x1b[0m").context("reset attributes")?;
        self.out.flush().context("flush terminal")?;
        tracing::debug!(
            written = self.stats.frames_written,
            elided = self.stats.frames_elided,
            "terminal sink finished"
        );
        Ok(())
    }
}

fn line_count(wire: &[u8]) -> usize {
    const ROW_END: &[u8] = b"\x1b[1B";
    wire.windows(ROW_END.len()).filter(|w| *w == ROW_END).count()
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    frames: Vec<(FrameIndex, Vec<u8>)>,
    ended: bool,
}

impl InMemorySink {
    /// Create a new in-memory sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<SinkConfig> {
        self.cfg
    }

    /// Captured frames in push order.
    pub fn frames(&self) -> &[(FrameIndex, Vec<u8>)] {
        &self.frames
    }

    /// Whether `end` has been called.
    pub fn is_ended(&self) -> bool {
        self.ended
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> HalfblockResult<()> {
        self.cfg = Some(cfg);
        self.frames.clear();
        self.ended = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, wire: &[u8]) -> HalfblockResult<()> {
        self.frames.push((idx, wire.to_vec()));
        Ok(())
    }

    fn end(&mut self) -> HalfblockResult<()> {
        self.ended = true;
        Ok(())
    }
}

/// Render `frames` (start inclusive, end exclusive) and stream each encoded frame into `sink`.
///
/// No pacing is applied; callers that need real-time playback drive the loop themselves.
pub fn render_range(
    pipeline: &mut RenderPipeline,
    frames: Range<u64>,
    sink: &mut dyn FrameSink,
) -> HalfblockResult<()> {
    if frames.is_empty() {
        return Err(HalfblockError::validation("render range must be non-empty"));
    }
    let (width, height) = pipeline.canvas_size();
    sink.begin(SinkConfig { width, height })?;
    for f in frames {
        let idx = FrameIndex(f);
        let wire = pipeline.render_wire(idx)?;
        sink.push_frame(idx, wire)?;
    }
    sink.end()
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
