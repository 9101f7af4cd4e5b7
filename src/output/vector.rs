use super::{FeatureFailure, FeatureSink, FinishedFeature};
use crate::diagnostics::RunSummary;
use crate::error::Result;
use crate::follow::FailureReason;
use std::io::Write;

/// Writes features in the `-FIGURE` / `-COORDS` / `-END` line-drawing format.
///
/// Coordinates are written in pixels. A color of `0` picks a per-feature
/// color `(index * 20) % 255` so neighbouring features contrast.
pub struct VectorWriter<W: Write> {
    out: W,
    color: u8,
}

impl<W: Write> VectorWriter<W> {
    /// Create the writer and emit the tolerance header comment.
    pub fn new(mut out: W, tolerance_px: u32, color: u8) -> Result<Self> {
        writeln!(out, "# tolerance in pixels is {tolerance_px}")?;
        Ok(Self { out, color })
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn color_for(&self, index: usize) -> usize {
        if self.color == 0 {
            (index * 20) % 255
        } else {
            usize::from(self.color)
        }
    }
}

impl<W: Write> FeatureSink for VectorWriter<W> {
    fn accept_match(&mut self, feature: &FinishedFeature) -> Result<()> {
        let points = &feature.feature.points;
        writeln!(
            self.out,
            "-FIGURE {} L {} {}",
            feature.index,
            points.len(),
            self.color_for(feature.index)
        )?;
        for p in points {
            writeln!(
                self.out,
                "-COORDS {:.2} {:.2} 0",
                f64::from(p.col),
                f64::from(p.row)
            )?;
        }
        Ok(())
    }

    fn accept_failure(&mut self, failure: &FeatureFailure) -> Result<()> {
        if failure.reason == FailureReason::NoStartPoint {
            writeln!(
                self.out,
                "#No start point found for reference line {}",
                failure.ref_id
            )?;
        }
        Ok(())
    }

    fn finish(&mut self, _summary: &RunSummary) -> Result<()> {
        writeln!(self.out, "-END")?;
        self.out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::test_support::finished;
    use crate::points::{PixelPoint, PointSequence};

    fn failure(ref_id: i32, reason: FailureReason) -> FeatureFailure {
        FeatureFailure {
            ref_id,
            reason,
            reference: PointSequence::from(vec![PixelPoint::new(0, 0), PixelPoint::new(1, 1)]),
        }
    }

    #[test]
    fn writes_figures_comments_and_end_marker() {
        let mut w = VectorWriter::new(Vec::new(), 3, 50).unwrap();
        w.accept_match(&finished(0, 10, &[(4, 5, 0.0), (6, 7, 1.0)]))
            .unwrap();
        w.accept_failure(&failure(11, FailureReason::NoStartPoint))
            .unwrap();
        w.accept_failure(&failure(12, FailureReason::SinglePointOnly))
            .unwrap();
        w.finish(&RunSummary::default()).unwrap();
        let text = String::from_utf8(w.into_inner()).unwrap();
        assert_eq!(
            text,
            "# tolerance in pixels is 3\n\
             -FIGURE 0 L 2 50\n\
             -COORDS 4.00 5.00 0\n\
             -COORDS 6.00 7.00 0\n\
             #No start point found for reference line 11\n\
             -END\n"
        );
    }

    #[test]
    fn zero_color_cycles_by_index() {
        let mut w = VectorWriter::new(Vec::new(), 1, 0).unwrap();
        w.accept_match(&finished(13, 1, &[(0, 0, 0.0), (1, 0, 0.0)]))
            .unwrap();
        let text = String::from_utf8(w.into_inner()).unwrap();
        assert!(text.contains("-FIGURE 13 L 2 5\n"), "{text}");
    }
}
