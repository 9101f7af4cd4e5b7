use super::{FeatureSink, FinishedFeature};
use crate::diagnostics::RunSummary;
use crate::error::Result;
use crate::geo::GeoReference;
use std::io::Write;

/// Writes one `INSERT INTO QUERYLINES` statement per matched feature.
///
/// Geometry is re-projected to world meters and emitted as WKT with SRID 3857.
pub struct SqlWriter<W: Write> {
    out: W,
    experiment_id: i32,
    data_id: i32,
    geo: GeoReference,
}

impl<W: Write> SqlWriter<W> {
    pub fn new(out: W, experiment_id: i32, data_id: i32, geo: GeoReference) -> Self {
        Self {
            out,
            experiment_id,
            data_id,
            geo,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn linestring(&self, feature: &FinishedFeature) -> String {
        feature
            .feature
            .points
            .iter()
            .map(|p| {
                let w = self.geo.to_world(p);
                format!("{:.6} {:.6}", w.x, w.y)
            })
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl<W: Write> FeatureSink for SqlWriter<W> {
    fn accept_match(&mut self, feature: &FinishedFeature) -> Result<()> {
        let q = &feature.quality;
        writeln!(
            self.out,
            "INSERT INTO QUERYLINES (experimentid,dataid,uploadfeatureid,refpointcount,matchpercent,meandistance,stdevdistance,geom) \
             VALUES ({}, {}, {}, {}, {:.2}, {:.2}, {:.2}, ST_GeomFromText('LINESTRING({})',3857));",
            self.experiment_id,
            self.data_id,
            feature.feature.ref_id,
            feature.feature.reference_count,
            q.match_percent,
            q.mean_m,
            q.stdev_m,
            self.linestring(feature)
        )?;
        Ok(())
    }

    fn finish(&mut self, _summary: &RunSummary) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}
