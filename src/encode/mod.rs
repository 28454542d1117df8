//! Frame sinks: where encoded frames go after rendering.

pub(crate) mod sink;

pub use sink::{FrameSink, InMemorySink, SinkConfig, SinkStats, TerminalSink, render_range};
