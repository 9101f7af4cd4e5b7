use crate::error::{Result, VectorizeError};
use crate::geo::GeoReference;
use serde::Serialize;
use std::str::FromStr;

/// Values carried by the first line of the parameter file:
/// `refCount centerX centerY cellSize cellSizeX cellSizeY dataId toleranceMeters`.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunParameters {
    pub ref_count: usize,
    pub center_x: f64,
    pub center_y: f64,
    pub cell_size: f64,
    pub cell_size_x: f64,
    pub cell_size_y: f64,
    pub data_id: i32,
    pub tolerance_m: f64,
}

impl RunParameters {
    pub fn parse(line: &str, line_no: usize) -> Result<Self> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        Ok(Self {
            ref_count: field(&tokens, 0, "refCount", line_no)?,
            center_x: field(&tokens, 1, "centerX", line_no)?,
            center_y: field(&tokens, 2, "centerY", line_no)?,
            cell_size: field(&tokens, 3, "cellSize", line_no)?,
            cell_size_x: field(&tokens, 4, "cellSizeX", line_no)?,
            cell_size_y: field(&tokens, 5, "cellSizeY", line_no)?,
            data_id: field(&tokens, 6, "dataId", line_no)?,
            tolerance_m: field(&tokens, 7, "toleranceMeters", line_no)?,
        })
    }

    /// Search radius in pixels: `round(tolerance_m / cell_size)`.
    pub fn tolerance_px(&self) -> Result<u32> {
        self.validate()?;
        Ok((self.tolerance_m / self.cell_size).round() as u32)
    }

    /// Build the run geo-reference for a `width × height` raster.
    pub fn geo_reference(&self, width: usize, height: usize) -> Result<GeoReference> {
        let tolerance_px = self.tolerance_px()?;
        Ok(GeoReference {
            cell_size: self.cell_size,
            cell_size_x: self.cell_size_x,
            cell_size_y: self.cell_size_y,
            center_x: self.center_x,
            center_y: self.center_y,
            width,
            height,
            tolerance_px,
        })
    }

    fn validate(&self) -> Result<()> {
        for (name, v) in [
            ("cellSize", self.cell_size),
            ("cellSizeX", self.cell_size_x),
            ("cellSizeY", self.cell_size_y),
        ] {
            if !(v.is_finite() && v > 0.0) {
                return Err(VectorizeError::InvalidGeoReference(format!(
                    "{name} must be positive, got {v}"
                )));
            }
        }
        if !(self.center_x.is_finite() && self.center_y.is_finite()) {
            return Err(VectorizeError::InvalidGeoReference(
                "center coordinates must be finite".into(),
            ));
        }
        if !(self.tolerance_m.is_finite() && self.tolerance_m >= 0.0) {
            return Err(VectorizeError::InvalidGeoReference(format!(
                "tolerance must be non-negative, got {}",
                self.tolerance_m
            )));
        }
        Ok(())
    }
}

fn field<T: FromStr>(tokens: &[&str], index: usize, name: &str, line_no: usize) -> Result<T> {
    let token = tokens
        .get(index)
        .ok_or_else(|| VectorizeError::malformed(line_no, format!("missing {name}")))?;
    parse_field(token, name, line_no)
}

pub(crate) fn parse_field<T: FromStr>(token: &str, name: &str, line_no: usize) -> Result<T> {
    token.parse().map_err(|_| {
        VectorizeError::malformed(line_no, format!("cannot parse {name} from '{token}'"))
    })
}
