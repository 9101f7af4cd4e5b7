//! Diagnostics emitted by a vectorization run.
//!
//! `trace` carries the per-search and per-feature events routed through an
//! injected [`TraceSink`]; `summary` holds the run totals written as the JSON
//! report; `timing` collects per-stage wall times.

pub mod summary;
pub mod timing;
pub mod trace;

pub use summary::RunSummary;
pub use timing::{StageTiming, TimingBreakdown};
pub use trace::{LogSink, NullSink, RecordingSink, TraceEvent, TraceSink};
