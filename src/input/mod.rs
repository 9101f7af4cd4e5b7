//! Parameter-file ingestion.
//!
//! The first line holds the run parameters ([`RunParameters`]); every later
//! non-blank line is one reference feature ([`ReferenceRecord`]).

mod params;
mod reference;

pub use params::RunParameters;
pub use reference::{parse_reference_line, ReferenceReader, ReferenceRecord};

use crate::error::{Result, VectorizeError};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Split a parameter stream into its run parameters and reference records.
pub struct ParameterFile;

impl ParameterFile {
    pub fn open(path: &Path) -> Result<(RunParameters, ReferenceReader<BufReader<File>>)> {
        let file = File::open(path).map_err(|e| {
            VectorizeError::Config(format!(
                "cannot open parameter file {}: {e}",
                path.display()
            ))
        })?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_reader<R: BufRead>(mut reader: R) -> Result<(RunParameters, ReferenceReader<R>)> {
        let mut first = String::new();
        if reader.read_line(&mut first)? == 0 {
            return Err(VectorizeError::Config(
                "parameter file has no parameter record".into(),
            ));
        }
        let params = RunParameters::parse(&first, 1)?;
        Ok((params, ReferenceReader::new(reader, 2)))
    }
}
