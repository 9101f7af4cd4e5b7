//! JSON configuration for the `guided_vectorize` tool.

use crate::error::{Result, VectorizeError};
use crate::image::io::{load_grayscale_image, load_raw_rgb};
use crate::image::RasterU8;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Default output color for figure records.
pub const DEFAULT_VECTOR_COLOR: u8 = 50;

#[derive(Debug, Deserialize)]
pub struct VectorizeToolConfig {
    pub raster: RasterConfig,
    /// Parameter file: run parameters followed by reference records.
    pub parameters: PathBuf,
    #[serde(default)]
    pub experiment_id: i32,
    /// Figure color; `0` picks `(index * 20) % 255` per feature.
    #[serde(default = "default_vector_color")]
    pub vector_color: u8,
    /// Follow features on the rayon pool when the `parallel` feature is built.
    #[serde(default)]
    pub parallel: bool,
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize)]
pub struct RasterConfig {
    pub path: PathBuf,
    /// Required for `raw_rgb`; checked against the decoded size otherwise.
    pub width: Option<usize>,
    pub height: Option<usize>,
    #[serde(default)]
    pub encoding: RasterEncoding,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RasterEncoding {
    /// Headerless 3 bytes per pixel; the first byte of each triplet is kept.
    #[default]
    RawRgb,
    /// Any format the `image` crate decodes, converted to 8-bit luma.
    Encoded,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// `<stem>.vec` and `<stem>.sql` unless the paths are given explicitly.
    pub stem: Option<PathBuf>,
    pub vector: Option<PathBuf>,
    pub sql: Option<PathBuf>,
    #[serde(rename = "report_json")]
    pub report_json: Option<PathBuf>,
    #[serde(rename = "overlay_image")]
    pub overlay_image: Option<PathBuf>,
}

impl OutputConfig {
    pub fn vector_path(&self) -> Result<PathBuf> {
        self.resolve(self.vector.as_ref(), "vec")
    }

    pub fn sql_path(&self) -> Result<PathBuf> {
        self.resolve(self.sql.as_ref(), "sql")
    }

    fn resolve(&self, explicit: Option<&PathBuf>, extension: &str) -> Result<PathBuf> {
        if let Some(path) = explicit {
            return Ok(path.clone());
        }
        let stem = self.stem.as_ref().ok_or_else(|| {
            VectorizeError::Config(format!(
                "output needs either `stem` or an explicit .{extension} path"
            ))
        })?;
        let mut name = stem.as_os_str().to_owned();
        name.push(".");
        name.push(extension);
        Ok(PathBuf::from(name))
    }
}

impl RasterConfig {
    /// Load the edge raster described by this entry.
    pub fn load(&self) -> Result<RasterU8> {
        match self.encoding {
            RasterEncoding::RawRgb => {
                let (width, height) = self.width.zip(self.height).ok_or_else(|| {
                    VectorizeError::Config("raw_rgb raster needs `width` and `height`".to_string())
                })?;
                load_raw_rgb(&self.path, width, height)
            }
            RasterEncoding::Encoded => {
                let raster = load_grayscale_image(&self.path)?;
                let mismatch = |want: Option<usize>, got: usize| want.is_some_and(|w| w != got);
                if mismatch(self.width, raster.width()) || mismatch(self.height, raster.height()) {
                    return Err(VectorizeError::Config(format!(
                        "{} decodes to {}x{}, config expects {}x{}",
                        self.path.display(),
                        raster.width(),
                        raster.height(),
                        self.width.map_or("?".to_string(), |w| w.to_string()),
                        self.height.map_or("?".to_string(), |h| h.to_string()),
                    )));
                }
                Ok(raster)
            }
        }
    }
}

fn default_vector_color() -> u8 {
    DEFAULT_VECTOR_COLOR
}

pub fn load_config(path: &Path) -> Result<VectorizeToolConfig> {
    let data = fs::read_to_string(path).map_err(|e| {
        VectorizeError::Config(format!("failed to read config {}: {e}", path.display()))
    })?;
    serde_json::from_str(&data).map_err(|e| {
        VectorizeError::Config(format!("failed to parse config {}: {e}", path.display()))
    })
}
