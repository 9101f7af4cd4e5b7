//! Feature pipeline: follow every reference record and feed the sinks.
//!
//! Each record is projected with the run [`GeoReference`], followed over the
//! read-only grid, scored, and handed to a [`FeatureSink`] before the next
//! record is processed. Per-feature match failures and malformed records are
//! reported and skipped; only fatal errors (I/O on the input stream or the
//! outputs) abort the run.
//!
//! ```no_run
//! use guided_vectorize::prelude::*;
//! use std::io::Cursor;
//!
//! # fn main() -> guided_vectorize::Result<()> {
//! let (w, h) = (64usize, 64usize);
//! let edges = vec![0u8; w * h];
//! let grid = PixelGrid::new(w, h, &edges);
//! let text = "1 0 0 1 1 1 7 2\n10 0 0, 5 0\n";
//! let (params, records) = ParameterFile::from_reader(Cursor::new(text))?;
//! let geo = params.geo_reference(w, h)?;
//! let vectorizer = Vectorizer::new(grid, geo)?;
//! let mut out = MemorySink::default();
//! let summary = vectorizer.run(records, &mut out, &mut LogSink)?;
//! println!("{}", summary.headline());
//! # Ok(())
//! # }
//! ```

use crate::diagnostics::timing::elapsed_ms;
use crate::diagnostics::{RunSummary, TraceEvent, TraceSink};
use crate::error::{Result, VectorizeError};
use crate::follow::{FailureReason, FeatureFollower, MatchedFeature, ReferenceFeature};
use crate::geo::GeoReference;
use crate::image::PixelGrid;
use crate::input::ReferenceRecord;
use crate::output::{FeatureFailure, FeatureSink, FinishedFeature};
use crate::quality::{self, MatchQuality};
use log::info;
use std::time::Instant;

/// Result of following one valid reference record.
#[derive(Clone, Debug, PartialEq)]
pub enum FeatureOutcome {
    Matched {
        feature: MatchedFeature,
        quality: MatchQuality,
    },
    Failed(FeatureFailure),
}

/// Runs the follower over a stream of reference records.
#[derive(Clone, Debug)]
pub struct Vectorizer<'g> {
    follower: FeatureFollower<'g>,
    geo: GeoReference,
    declared_references: Option<usize>,
}

impl<'g> Vectorizer<'g> {
    /// The grid must have the dimensions recorded in `geo`.
    pub fn new(grid: PixelGrid<'g>, geo: GeoReference) -> Result<Self> {
        if grid.w != geo.width || grid.h != geo.height {
            return Err(VectorizeError::Config(format!(
                "raster is {}x{} but geo-reference expects {}x{}",
                grid.w, grid.h, geo.width, geo.height
            )));
        }
        if grid.data.len() < grid.stride * grid.h.saturating_sub(1) + grid.w {
            return Err(VectorizeError::Config(format!(
                "raster buffer holds {} bytes, too few for {}x{}",
                grid.data.len(),
                grid.w,
                grid.h
            )));
        }
        Ok(Self {
            follower: FeatureFollower::new(grid, geo.tolerance_px),
            geo,
            declared_references: None,
        })
    }

    /// Record the reference count announced by the parameter file.
    pub fn with_declared_references(mut self, count: usize) -> Self {
        self.declared_references = Some(count);
        self
    }

    pub fn geo(&self) -> &GeoReference {
        &self.geo
    }

    /// Project, follow and score one record.
    ///
    /// Errors are record-local (`TooFewPoints`); per-feature match failures
    /// come back as [`FeatureOutcome::Failed`].
    pub fn process_record<S>(&self, record: &ReferenceRecord, trace: &mut S) -> Result<FeatureOutcome>
    where
        S: TraceSink + ?Sized,
    {
        let reference = ReferenceFeature::from_world(record.ref_id, &record.points, &self.geo)?;
        let failed = |reason| {
            FeatureOutcome::Failed(FeatureFailure {
                ref_id: reference.ref_id(),
                reason,
                reference: reference.points().clone(),
            })
        };
        let outcome = match self.follower.follow(&reference, trace) {
            Ok(feature) => match quality::score(&feature, self.geo.cell_size) {
                Some(quality) => FeatureOutcome::Matched { feature, quality },
                None => failed(FailureReason::SinglePointOnly),
            },
            Err(reason) => failed(reason),
        };
        Ok(outcome)
    }

    /// Process `records` one at a time, in order.
    pub fn run<I, O, S>(&self, records: I, output: &mut O, trace: &mut S) -> Result<RunSummary>
    where
        I: IntoIterator<Item = Result<ReferenceRecord>>,
        O: FeatureSink + ?Sized,
        S: TraceSink + ?Sized,
    {
        let start = Instant::now();
        let mut summary = self.empty_summary();
        for item in records {
            let line = record_line(&item);
            let outcome = item.and_then(|record| self.process_record(&record, &mut *trace));
            self.settle(line, outcome, &mut summary, output, trace)?;
        }
        summary.timings.push("follow", elapsed_ms(start));
        self.finish(start, summary, output)
    }

    /// Follow features on the rayon pool.
    ///
    /// Records are read up front; trace events and sink calls are replayed in
    /// input order, so sinks observe the same sequence as [`run`](Self::run).
    #[cfg(feature = "parallel")]
    pub fn run_parallel<I, O, S>(
        &self,
        records: I,
        output: &mut O,
        trace: &mut S,
    ) -> Result<RunSummary>
    where
        I: IntoIterator<Item = Result<ReferenceRecord>>,
        O: FeatureSink + ?Sized,
        S: TraceSink + ?Sized,
    {
        use crate::diagnostics::RecordingSink;
        use rayon::prelude::*;

        let start = Instant::now();
        let mut summary = self.empty_summary();

        let mut pending = Vec::new();
        let mut fatal = None;
        for item in records {
            match item {
                Err(e) if !e.is_record_local() => {
                    fatal = Some(e);
                    break;
                }
                item => pending.push(item),
            }
        }
        summary.timings.push("read", elapsed_ms(start));

        let follow_start = Instant::now();
        let followed: Vec<_> = pending
            .into_par_iter()
            .map(|item| {
                let line = record_line(&item);
                let mut local = RecordingSink::new();
                let outcome = item.and_then(|record| self.process_record(&record, &mut local));
                (line, outcome, local)
            })
            .collect();
        summary.timings.push("follow", elapsed_ms(follow_start));

        for (line, outcome, local) in followed {
            local.replay_into(trace);
            self.settle(line, outcome, &mut summary, output, trace)?;
        }
        if let Some(e) = fatal {
            return Err(e);
        }
        self.finish(start, summary, output)
    }

    fn empty_summary(&self) -> RunSummary {
        RunSummary {
            declared_references: self.declared_references,
            tolerance_px: self.geo.tolerance_px,
            ..RunSummary::default()
        }
    }

    fn settle<O, S>(
        &self,
        line: Option<usize>,
        outcome: Result<FeatureOutcome>,
        summary: &mut RunSummary,
        output: &mut O,
        trace: &mut S,
    ) -> Result<()>
    where
        O: FeatureSink + ?Sized,
        S: TraceSink + ?Sized,
    {
        match outcome {
            Ok(FeatureOutcome::Matched { feature, quality }) => {
                summary.attempted += 1;
                let finished = FinishedFeature {
                    index: summary.matched,
                    feature,
                    quality,
                };
                summary.matched += 1;
                output.accept_match(&finished)
            }
            Ok(FeatureOutcome::Failed(failure)) => {
                summary.attempted += 1;
                match failure.reason {
                    FailureReason::NoStartPoint => summary.no_start_point += 1,
                    FailureReason::SinglePointOnly => summary.single_point_only += 1,
                }
                output.accept_failure(&failure)
            }
            Err(e) if e.is_record_local() => {
                summary.skipped_records += 1;
                trace.record(TraceEvent::RecordSkipped {
                    line,
                    message: e.to_string(),
                });
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    fn finish<O>(&self, start: Instant, mut summary: RunSummary, output: &mut O) -> Result<RunSummary>
    where
        O: FeatureSink + ?Sized,
    {
        summary.timings.total_ms = elapsed_ms(start);
        output.finish(&summary)?;
        info!(
            "{} ({} without start point, {} single point, {} skipped records)",
            summary.headline(),
            summary.no_start_point,
            summary.single_point_only,
            summary.skipped_records
        );
        if let Some(declared) = summary.declared_references {
            let seen = summary.attempted + summary.skipped_records;
            if declared != seen {
                info!("parameter record announced {declared} reference features, read {seen}");
            }
        }
        Ok(summary)
    }
}

fn record_line(item: &Result<ReferenceRecord>) -> Option<usize> {
    match item {
        Ok(record) => Some(record.line),
        Err(VectorizeError::MalformedRecord { line, .. }) => Some(*line),
        Err(_) => None,
    }
}

#[cfg(test)]
mod tests;
