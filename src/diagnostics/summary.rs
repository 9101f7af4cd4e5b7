use super::TimingBreakdown;
use serde::Serialize;

/// Totals for one vectorization run, written as the JSON run report.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    /// Reference count announced by the parameter record, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub declared_references: Option<usize>,
    pub tolerance_px: u32,
    /// Reference features that were followed (valid records only).
    pub attempted: usize,
    pub matched: usize,
    pub no_start_point: usize,
    pub single_point_only: usize,
    /// Records dropped before following (malformed or too short).
    pub skipped_records: usize,
    pub timings: TimingBreakdown,
}

impl RunSummary {
    pub fn failed(&self) -> usize {
        self.no_start_point + self.single_point_only
    }

    pub fn headline(&self) -> String {
        format!(
            "Found and wrote {} of {} features",
            self.matched, self.attempted
        )
    }
}
