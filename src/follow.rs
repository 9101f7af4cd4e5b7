//! Reference-guided line following.
//!
//! For one reference feature the follower matches the first vertex (searching
//! toward the first reference segment), then walks the remaining vertices in
//! order. Each search prefers the bearing from the previous reference vertex
//! to the most recently matched pixel, since the matched path may drift away
//! from the reference. The first vertex that cannot be matched ends the
//! feature; later vertices are not attempted.
//!
//! There is no backtracking and no connectivity check between consecutive
//! matches: two matches may belong to unrelated foreground regions as long as
//! each lies within tolerance of its reference vertex. A pixel already on the
//! path is never matched a second time.

use crate::diagnostics::{TraceEvent, TraceSink};
use crate::error::{Result, VectorizeError};
use crate::geo::{GeoReference, WorldPoint};
use crate::image::PixelGrid;
use crate::points::{PixelPoint, PointSequence};
use crate::search::{calculate_direction, find_point};
use serde::Serialize;
use std::collections::HashSet;

/// Reference line projected into pixel space. Always has at least two points.
#[derive(Clone, Debug, PartialEq)]
pub struct ReferenceFeature {
    ref_id: i32,
    points: PointSequence,
}

impl ReferenceFeature {
    pub fn new(ref_id: i32, points: PointSequence) -> Result<Self> {
        if points.len() < 2 {
            return Err(VectorizeError::TooFewPoints {
                ref_id,
                points: points.len(),
            });
        }
        Ok(Self { ref_id, points })
    }

    /// Project world coordinates with `geo`. Points are not clamped to the grid,
    /// but a vertex too far away to search around is a record error.
    pub fn from_world(ref_id: i32, world: &[WorldPoint], geo: &GeoReference) -> Result<Self> {
        let points = world
            .iter()
            .map(|&w| {
                geo.try_to_pixel(w).ok_or(VectorizeError::VertexOutOfRange {
                    ref_id,
                    x: w.x,
                    y: w.y,
                })
            })
            .collect::<Result<PointSequence>>()?;
        Self::new(ref_id, points)
    }

    pub fn ref_id(&self) -> i32 {
        self.ref_id
    }

    pub fn points(&self) -> &PointSequence {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Pixel path found for (a prefix of) a reference feature.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchedFeature {
    pub ref_id: i32,
    pub points: PointSequence,
    pub reference_count: usize,
}

impl MatchedFeature {
    /// Vertices successfully matched; equals the number of path points.
    pub fn matched_count(&self) -> usize {
        self.points.len()
    }
}

/// Why a reference feature produced no output line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailureReason {
    /// The first reference vertex had no foreground pixel within tolerance.
    NoStartPoint,
    /// Only the first vertex matched; a single point is not a line.
    SinglePointOnly,
}

impl FailureReason {
    pub fn describe(self) -> &'static str {
        match self {
            FailureReason::NoStartPoint => "no start point found",
            FailureReason::SinglePointOnly => "only one point found",
        }
    }
}

/// Follows reference features over a read-only grid.
#[derive(Clone, Copy, Debug)]
pub struct FeatureFollower<'g> {
    grid: PixelGrid<'g>,
    tolerance: u32,
}

impl<'g> FeatureFollower<'g> {
    pub fn new(grid: PixelGrid<'g>, tolerance: u32) -> Self {
        Self { grid, tolerance }
    }

    pub fn tolerance(&self) -> u32 {
        self.tolerance
    }

    /// Match `reference` vertex by vertex.
    pub fn follow<S>(
        &self,
        reference: &ReferenceFeature,
        trace: &mut S,
    ) -> std::result::Result<MatchedFeature, FailureReason>
    where
        S: TraceSink + ?Sized,
    {
        let refs = reference.points().as_slice();
        let ref_id = reference.ref_id();
        trace.record(TraceEvent::FeatureStarted {
            ref_id,
            reference_points: refs.len(),
            start: refs[0].as_array(),
        });

        let mut taken: HashSet<(i32, i32)> = HashSet::new();
        let mut path = PointSequence::with_capacity(refs.len());

        let start_dir = calculate_direction(&refs[0], &refs[1]);
        let Some(start) = find_point(
            &self.grid,
            refs[0],
            self.tolerance,
            Some(start_dir),
            |_, _| false,
            trace,
        ) else {
            return Err(reject(ref_id, FailureReason::NoStartPoint, refs, trace));
        };
        taken.insert((start.point.col, start.point.row));
        path.push(start.point);

        for pair in refs.windows(2) {
            let (prior_ref, current_ref) = (&pair[0], pair[1]);
            let last = match path.last() {
                Some(p) => *p,
                None => break,
            };
            let direction = calculate_direction(prior_ref, &last);
            let hit = find_point(
                &self.grid,
                current_ref,
                self.tolerance,
                Some(direction),
                |col, row| taken.contains(&(col, row)),
                trace,
            );
            let Some(hit) = hit else {
                break;
            };
            taken.insert((hit.point.col, hit.point.row));
            path.push(hit.point);
        }

        if path.len() < 2 {
            return Err(reject(ref_id, FailureReason::SinglePointOnly, refs, trace));
        }

        trace.record(TraceEvent::FeatureMatched {
            ref_id,
            matched: path.len(),
            reference: refs.len(),
        });
        Ok(MatchedFeature {
            ref_id,
            points: path,
            reference_count: refs.len(),
        })
    }
}

fn reject<S: TraceSink + ?Sized>(
    ref_id: i32,
    reason: FailureReason,
    refs: &[PixelPoint],
    trace: &mut S,
) -> FailureReason {
    trace.record(TraceEvent::FeatureRejected {
        ref_id,
        reason,
        reference: refs.iter().map(PixelPoint::as_array).collect(),
    });
    reason
}
