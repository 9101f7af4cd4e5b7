//! Consumers of finished features.
//!
//! The pipeline hands every matched feature and every per-feature failure to
//! a [`FeatureSink`]. Writers for the line-drawing exchange format
//! ([`VectorWriter`]), SQL insert statements ([`SqlWriter`]) and a raster
//! overlay of matched pixels ([`MatchOverlay`]) are provided; tuples and
//! `Option`s of sinks compose.

mod overlay;
mod sql;
mod vector;

pub use overlay::MatchOverlay;
pub use sql::SqlWriter;
pub use vector::VectorWriter;

use crate::diagnostics::RunSummary;
use crate::error::Result;
use crate::follow::{FailureReason, MatchedFeature};
use crate::image::io::ensure_parent_dir;
use crate::points::PointSequence;
use crate::quality::MatchQuality;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// A matched feature ready for serialization.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinishedFeature {
    /// Running index among the features written so far (0-based).
    pub index: usize,
    pub feature: MatchedFeature,
    pub quality: MatchQuality,
}

/// A reference feature that produced no output line.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureFailure {
    pub ref_id: i32,
    pub reason: FailureReason,
    pub reference: PointSequence,
}

pub trait FeatureSink {
    fn accept_match(&mut self, feature: &FinishedFeature) -> Result<()>;

    fn accept_failure(&mut self, _failure: &FeatureFailure) -> Result<()> {
        Ok(())
    }

    /// Called once after the last feature.
    fn finish(&mut self, _summary: &RunSummary) -> Result<()> {
        Ok(())
    }
}

impl<T: FeatureSink + ?Sized> FeatureSink for &mut T {
    fn accept_match(&mut self, feature: &FinishedFeature) -> Result<()> {
        (**self).accept_match(feature)
    }

    fn accept_failure(&mut self, failure: &FeatureFailure) -> Result<()> {
        (**self).accept_failure(failure)
    }

    fn finish(&mut self, summary: &RunSummary) -> Result<()> {
        (**self).finish(summary)
    }
}

impl<A: FeatureSink, B: FeatureSink> FeatureSink for (A, B) {
    fn accept_match(&mut self, feature: &FinishedFeature) -> Result<()> {
        self.0.accept_match(feature)?;
        self.1.accept_match(feature)
    }

    fn accept_failure(&mut self, failure: &FeatureFailure) -> Result<()> {
        self.0.accept_failure(failure)?;
        self.1.accept_failure(failure)
    }

    fn finish(&mut self, summary: &RunSummary) -> Result<()> {
        self.0.finish(summary)?;
        self.1.finish(summary)
    }
}

impl<T: FeatureSink> FeatureSink for Option<T> {
    fn accept_match(&mut self, feature: &FinishedFeature) -> Result<()> {
        match self {
            Some(sink) => sink.accept_match(feature),
            None => Ok(()),
        }
    }

    fn accept_failure(&mut self, failure: &FeatureFailure) -> Result<()> {
        match self {
            Some(sink) => sink.accept_failure(failure),
            None => Ok(()),
        }
    }

    fn finish(&mut self, summary: &RunSummary) -> Result<()> {
        match self {
            Some(sink) => sink.finish(summary),
            None => Ok(()),
        }
    }
}

/// Create `path` (and its parent directories) for buffered writing.
pub fn create_output(path: &Path) -> Result<BufWriter<File>> {
    ensure_parent_dir(path)?;
    Ok(BufWriter::new(File::create(path)?))
}

/// Keeps everything in memory.
#[derive(Clone, Debug, Default)]
pub struct MemorySink {
    pub matches: Vec<FinishedFeature>,
    pub failures: Vec<FeatureFailure>,
    pub summary: Option<RunSummary>,
}

impl FeatureSink for MemorySink {
    fn accept_match(&mut self, feature: &FinishedFeature) -> Result<()> {
        self.matches.push(feature.clone());
        Ok(())
    }

    fn accept_failure(&mut self, failure: &FeatureFailure) -> Result<()> {
        self.failures.push(failure.clone());
        Ok(())
    }

    fn finish(&mut self, summary: &RunSummary) -> Result<()> {
        self.summary = Some(summary.clone());
        Ok(())
    }
}
