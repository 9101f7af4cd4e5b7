//! Conversion between real-world meters and pixel indices.
//!
//! The pixel grid is centred on `(center_x, center_y)`: the pixel at
//! `(width / 2, height / 2)` (integer division) maps to the centre coordinate.
//! Image rows grow downward while world Y grows upward.

use crate::points::PixelPoint;
use serde::{Deserialize, Serialize};

/// Largest pixel offset from the grid centre accepted by
/// [`GeoReference::try_to_pixel`]. Leaves headroom in `i32` for search rings
/// and point differences.
pub const MAX_PIXEL_OFFSET: f64 = (1u32 << 30) as f64;

/// Position in real-world meters (EPSG:3857 in practice).
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldPoint {
    pub x: f64,
    pub y: f64,
}

impl WorldPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Run-wide geo-referencing of the raster.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoReference {
    /// Isotropic cell size (meters/pixel) used to express match distances in meters.
    pub cell_size: f64,
    pub cell_size_x: f64,
    pub cell_size_y: f64,
    pub center_x: f64,
    pub center_y: f64,
    pub width: usize,
    pub height: usize,
    /// Search radius in pixels.
    pub tolerance_px: u32,
}

impl GeoReference {
    /// Project a world point to the nearest pixel (ties round away from zero).
    /// Results are not clamped to the grid; offsets beyond `i32` saturate.
    pub fn to_pixel(&self, world: WorldPoint) -> PixelPoint {
        let (dc, dr) = self.pixel_offsets(world);
        PixelPoint::new(
            (dc as i32).saturating_add(self.half_width()),
            (dr as i32).saturating_add(self.half_height()),
        )
    }

    /// Like [`to_pixel`](Self::to_pixel), but `None` when the point lies so far
    /// off the grid that a search of `tolerance_px` rings around it would leave
    /// the `i32` pixel range.
    pub fn try_to_pixel(&self, world: WorldPoint) -> Option<PixelPoint> {
        let (dc, dr) = self.pixel_offsets(world);
        let limit = MAX_PIXEL_OFFSET - f64::from(self.tolerance_px);
        if !(dc.abs() <= limit && dr.abs() <= limit) {
            return None;
        }
        Some(PixelPoint::new(
            dc as i32 + self.half_width(),
            dr as i32 + self.half_height(),
        ))
    }

    fn pixel_offsets(&self, world: WorldPoint) -> (f64, f64) {
        (
            ((world.x - self.center_x) / self.cell_size_x).round(),
            (-(world.y - self.center_y) / self.cell_size_y).round(),
        )
    }

    /// Exact inverse of [`to_pixel`](Self::to_pixel) for integer pixels.
    pub fn to_world(&self, p: &PixelPoint) -> WorldPoint {
        WorldPoint {
            x: self.center_x + f64::from(p.col - self.half_width()) * self.cell_size_x,
            y: self.center_y - f64::from(p.row - self.half_height()) * self.cell_size_y,
        }
    }

    /// True when `p` lies inside `[0, width) × [0, height)`.
    pub fn in_bounds(&self, p: &PixelPoint) -> bool {
        p.col >= 0 && p.row >= 0 && (p.col as usize) < self.width && (p.row as usize) < self.height
    }

    /// Convert a pixel distance to meters with the isotropic cell size.
    pub fn pixels_to_meters(&self, pixels: f64) -> f64 {
        pixels * self.cell_size
    }

    #[inline]
    fn half_width(&self) -> i32 {
        (self.width / 2) as i32
    }

    #[inline]
    fn half_height(&self) -> i32 {
        (self.height / 2) as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geo() -> GeoReference {
        GeoReference {
            cell_size: 2.0,
            cell_size_x: 2.0,
            cell_size_y: 3.0,
            center_x: 1000.0,
            center_y: 5000.0,
            width: 11,
            height: 8,
            tolerance_px: 2,
        }
    }

    #[test]
    fn center_maps_to_middle_pixel() {
        let g = geo();
        let p = g.to_pixel(WorldPoint::new(1000.0, 5000.0));
        assert_eq!(p.as_array(), [5, 4]);
    }

    #[test]
    fn world_y_grows_upward() {
        let g = geo();
        let north = g.to_pixel(WorldPoint::new(1000.0, 5006.0));
        assert_eq!(north.as_array(), [5, 2]);
        let east = g.to_pixel(WorldPoint::new(1004.0, 5000.0));
        assert_eq!(east.as_array(), [7, 4]);
    }

    #[test]
    fn halfway_rounds_away_from_zero() {
        let g = geo();
        // +0.5 cell east and -0.5 cell west both round outward.
        assert_eq!(g.to_pixel(WorldPoint::new(1001.0, 5000.0)).col, 6);
        assert_eq!(g.to_pixel(WorldPoint::new(999.0, 5000.0)).col, 4);
        // 1.5 cells south rounds to 2 rows down.
        assert_eq!(g.to_pixel(WorldPoint::new(1000.0, 4995.5)).row, 6);
    }

    #[test]
    fn pixel_world_round_trip_is_exact() {
        let g = geo();
        for row in 0..g.height as i32 {
            for col in 0..g.width as i32 {
                let p = PixelPoint::new(col, row);
                let back = g.to_pixel(g.to_world(&p));
                assert_eq!(back.as_array(), [col, row], "round trip of ({col},{row})");
            }
        }
    }

    #[test]
    fn far_away_points_are_rejected_not_wrapped() {
        let g = geo();
        let far = WorldPoint::new(1000.0 + 2.0 * 3.0e9, 5000.0);
        assert!(g.try_to_pixel(far).is_none());
        assert_eq!(g.to_pixel(far).col, i32::MAX);
        assert!(g.try_to_pixel(WorldPoint::new(f64::NAN, 5000.0)).is_none());
        assert_eq!(
            g.try_to_pixel(WorldPoint::new(1004.0, 5000.0)),
            Some(g.to_pixel(WorldPoint::new(1004.0, 5000.0)))
        );
    }

    #[test]
    fn bounds_check_covers_edges() {
        let g = geo();
        assert!(g.in_bounds(&PixelPoint::new(0, 0)));
        assert!(g.in_bounds(&PixelPoint::new(10, 7)));
        assert!(!g.in_bounds(&PixelPoint::new(11, 7)));
        assert!(!g.in_bounds(&PixelPoint::new(0, -1)));
    }
}
