use super::params::parse_field;
use crate::error::{Result, VectorizeError};
use crate::geo::WorldPoint;
use std::io::BufRead;

/// One parsed reference line: `refId x0 y0, x1 y1, ...`.
#[derive(Clone, Debug, PartialEq)]
pub struct ReferenceRecord {
    /// 1-based line number in the parameter file.
    pub line: usize,
    pub ref_id: i32,
    pub points: Vec<WorldPoint>,
}

/// Parse a reference line. Tokens are comma separated; the first carries the
/// feature id in front of its coordinate pair. Empty tokens are ignored.
pub fn parse_reference_line(line: &str, line_no: usize) -> Result<ReferenceRecord> {
    let mut ref_id = None;
    let mut points = Vec::new();
    for token in line.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        let fields: Vec<&str> = token.split_whitespace().collect();
        let coords = if ref_id.is_none() {
            let [id, x, y] = fields.as_slice() else {
                return Err(VectorizeError::malformed(
                    line_no,
                    format!("expected 'refId x y', got '{token}'"),
                ));
            };
            ref_id = Some(parse_field::<i32>(id, "refId", line_no)?);
            (*x, *y)
        } else {
            let [x, y] = fields.as_slice() else {
                return Err(VectorizeError::malformed(
                    line_no,
                    format!("expected 'x y', got '{token}'"),
                ));
            };
            (*x, *y)
        };
        points.push(WorldPoint::new(
            parse_field(coords.0, "x", line_no)?,
            parse_field(coords.1, "y", line_no)?,
        ));
    }
    let ref_id = ref_id.ok_or_else(|| VectorizeError::malformed(line_no, "empty record"))?;
    Ok(ReferenceRecord {
        line: line_no,
        ref_id,
        points,
    })
}

/// Iterates over the reference lines of a parameter file, skipping blank lines.
///
/// A line that is not valid UTF-8 is a malformed record; the reader moves on
/// to the next line.
#[derive(Debug)]
pub struct ReferenceReader<R> {
    reader: R,
    buf: Vec<u8>,
    line_no: usize,
}

impl<R: BufRead> ReferenceReader<R> {
    /// `first_line` is the 1-based number of the first line `reader` yields.
    pub fn new(reader: R, first_line: usize) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            line_no: first_line.saturating_sub(1),
        }
    }
}

impl<R: BufRead> Iterator for ReferenceReader<R> {
    type Item = Result<ReferenceRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.buf.clear();
            match self.reader.read_until(b'\n', &mut self.buf) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(e) => return Some(Err(e.into())),
            }
            self.line_no += 1;
            let line = match std::str::from_utf8(&self.buf) {
                Ok(line) => line,
                Err(e) => {
                    return Some(Err(VectorizeError::malformed(
                        self.line_no,
                        format!("not valid UTF-8: {e}"),
                    )))
                }
            };
            if line.trim().is_empty() {
                continue;
            }
            return Some(parse_reference_line(line, self.line_no));
        }
    }
}
