use thiserror::Error;

/// Errors raised while loading inputs, parsing records, or writing outputs.
///
/// Per-feature match failures are not errors; they are reported through
/// [`crate::follow::FailureReason`].
#[derive(Error, Debug)]
pub enum VectorizeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("malformed record on line {line}: {message}")]
    MalformedRecord { line: usize, message: String },

    #[error("reference feature {ref_id} has {points} point(s), need at least 2")]
    TooFewPoints { ref_id: i32, points: usize },

    #[error("reference feature {ref_id} has vertex ({x}, {y}) too far outside the raster")]
    VertexOutOfRange { ref_id: i32, x: f64, y: f64 },

    #[error("invalid geo-reference: {0}")]
    InvalidGeoReference(String),

    #[error("raster {path} is too short: row {row} returned {read} of {expected} bytes")]
    RasterSize {
        path: String,
        row: usize,
        read: usize,
        expected: usize,
    },

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl VectorizeError {
    /// True when the error only affects one reference record and the run can
    /// continue with the next one.
    pub fn is_record_local(&self) -> bool {
        matches!(
            self,
            VectorizeError::MalformedRecord { .. }
                | VectorizeError::TooFewPoints { .. }
                | VectorizeError::VertexOutOfRange { .. }
        )
    }

    pub(crate) fn malformed(line: usize, message: impl Into<String>) -> Self {
        VectorizeError::MalformedRecord {
            line,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, VectorizeError>;
