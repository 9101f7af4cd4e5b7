use super::{FeatureSink, FinishedFeature};
use crate::diagnostics::RunSummary;
use crate::error::Result;
use crate::image::io::{save_grayscale_u8, save_raw_rgb};
use crate::image::{ImageViewMut, PixelGrid, RasterU8, MATCH_MARKER};
use std::path::PathBuf;

/// Copy of the input raster with every matched pixel set to [`MATCH_MARKER`].
///
/// Saved on `finish`: `.rgb`/`.raw` paths are written as raw RGB, anything
/// else through the `image` encoders.
pub struct MatchOverlay {
    raster: RasterU8,
    path: PathBuf,
}

impl MatchOverlay {
    pub fn new(grid: &PixelGrid<'_>, path: PathBuf) -> Self {
        Self {
            raster: RasterU8::from_grid(grid),
            path,
        }
    }

    pub fn raster(&self) -> &RasterU8 {
        &self.raster
    }

    fn is_raw(&self) -> bool {
        matches!(
            self.path.extension().and_then(|e| e.to_str()),
            Some("rgb") | Some("raw")
        )
    }
}

impl FeatureSink for MatchOverlay {
    fn accept_match(&mut self, feature: &FinishedFeature) -> Result<()> {
        let grid = self.raster.as_grid();
        let inside: Vec<(usize, usize)> = feature
            .feature
            .points
            .iter()
            .filter(|p| grid.contains(p.col, p.row))
            .map(|p| (p.col as usize, p.row as usize))
            .collect();
        for (x, y) in inside {
            self.raster.set(x, y, MATCH_MARKER);
        }
        Ok(())
    }

    fn finish(&mut self, _summary: &RunSummary) -> Result<()> {
        if self.is_raw() {
            save_raw_rgb(&self.raster, &self.path)
        } else {
            save_grayscale_u8(&self.raster, &self.path)
        }
    }
}
