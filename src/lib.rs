#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod geo;
pub mod image;
pub mod input;
pub mod output;
pub mod pipeline;
pub mod points;

// Building blocks of the follower; public for tools and tests.
pub mod follow;
pub mod pixel_size;
pub mod quality;
pub mod search;

// --- High-level re-exports -------------------------------------------------

// Main entry points: run driver, geo-referencing and results.
pub use crate::error::{Result, VectorizeError};
pub use crate::geo::{GeoReference, WorldPoint};
pub use crate::pipeline::{FeatureOutcome, Vectorizer};
pub use crate::points::{PixelPoint, PointSequence};

// Per-feature results.
pub use crate::follow::{FailureReason, FeatureFollower, MatchedFeature, ReferenceFeature};
pub use crate::quality::MatchQuality;

// Run-level diagnostics.
pub use crate::diagnostics::{RunSummary, TraceEvent, TraceSink};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use guided_vectorize::prelude::*;
///
/// # fn main() -> guided_vectorize::Result<()> {
/// let (w, h) = (32usize, 32usize);
/// let mut edges = vec![0u8; w * h];
/// for x in 10..20 {
///     edges[16 * w + x] = FOREGROUND;
/// }
/// let grid = PixelGrid::new(w, h, &edges);
/// let follower = FeatureFollower::new(grid, 2);
///
/// let reference = ReferenceFeature::new(
///     1,
///     vec![PixelPoint::new(10, 15), PixelPoint::new(15, 16), PixelPoint::new(19, 17)].into(),
/// )?;
/// match follower.follow(&reference, &mut LogSink) {
///     Ok(found) => println!("matched {} of {}", found.matched_count(), reference.len()),
///     Err(reason) => println!("{}", reason.describe()),
/// }
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::diagnostics::{LogSink, NullSink, RecordingSink};
    pub use crate::image::{PixelGrid, FOREGROUND};
    pub use crate::input::ParameterFile;
    pub use crate::output::{FeatureSink, MemorySink, SqlWriter, VectorWriter};
    pub use crate::{
        FeatureFollower, GeoReference, PixelPoint, ReferenceFeature, RunSummary, Vectorizer,
    };
}
