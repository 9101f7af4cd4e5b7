//! Expanding-ring directional search for foreground pixels.
//!
//! Given a target pixel, the search first tests the target itself. If it is
//! not usable it visits the square rings of radius `1..=tolerance` around the
//! target. Within a ring the eight compass directions are scanned in a
//! zig-zag order centred on the preferred direction (see
//! [`ring::SCAN_OFFSETS`]); each direction scans `radius` cells from its
//! anchor toward the next compass point. The first usable pixel wins, which
//! makes the result deterministic and never farther (in rings) than the
//! nearest usable pixel.
//!
//! Cost is proportional to the ring perimeters actually visited, not to the
//! full `(2R+1)²` window. Positions outside the grid are skipped.
//!
//! The search reads the grid only; it is safe to run concurrently on a shared
//! grid.

mod direction;
pub mod ring;

pub use direction::{calculate_direction, CompassDirection};
pub use ring::RingScan;

use crate::diagnostics::{TraceEvent, TraceSink};
use crate::image::PixelGrid;
use crate::points::PixelPoint;

/// Successful search result.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SearchHit {
    /// Matched pixel; `match_distance` holds the Euclidean distance to the target.
    pub point: PixelPoint,
    /// Ring on which the pixel was found (0 for the target itself).
    pub radius: u32,
}

/// Find the nearest usable foreground pixel around `target`.
///
/// A pixel is usable when it is foreground and `is_taken(col, row)` is false.
/// `preferred == None` scans as if `N` were preferred. Returns `None` when no
/// usable pixel lies within `tolerance` rings.
pub fn find_point<F, S>(
    grid: &PixelGrid<'_>,
    target: PixelPoint,
    tolerance: u32,
    preferred: Option<CompassDirection>,
    is_taken: F,
    trace: &mut S,
) -> Option<SearchHit>
where
    F: Fn(i32, i32) -> bool,
    S: TraceSink + ?Sized,
{
    let direction = preferred.unwrap_or(CompassDirection::N);
    trace.record(TraceEvent::SearchStarted {
        target: target.as_array(),
        direction,
    });

    let usable = |col: i32, row: i32| grid.is_foreground(col, row) && !is_taken(col, row);

    let hit = if usable(target.col, target.row) {
        Some(SearchHit {
            point: PixelPoint::matched(target.col, target.row, &target),
            radius: 0,
        })
    } else {
        (1..=tolerance).find_map(|radius| {
            RingScan::new(direction, radius)
                .map(|(dx, dy)| (target.col + dx, target.row + dy))
                .find(|&(col, row)| usable(col, row))
                .map(|(col, row)| SearchHit {
                    point: PixelPoint::matched(col, row, &target),
                    radius,
                })
        })
    };

    match &hit {
        Some(h) => trace.record(TraceEvent::PointFound {
            target: target.as_array(),
            found: h.point.as_array(),
            radius: h.radius,
            distance: h.point.match_distance.unwrap_or(0.0),
        }),
        None => trace.record(TraceEvent::PointNotFound {
            target: target.as_array(),
            tolerance,
        }),
    }
    hit
}
