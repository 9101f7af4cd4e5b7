//! Empirical pixel size from a red calibration box.
//!
//! Map tiles are captured with a small pure-red box drawn around the image
//! center. Counting near-red pixels along the center row and column gives the
//! box size in pixels; dividing the box extent in meters by that count gives
//! the ground size of one pixel.

use crate::image::RgbRaster;
use serde::Serialize;

/// Half-width of the scan window around the image center.
pub const SCAN_RADIUS: usize = 50;

/// Corners of the calibration box in projected meters (EPSG:3857).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CalibrationBox {
    pub nw_x: f64,
    pub nw_y: f64,
    pub se_x: f64,
    pub se_y: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PixelSize {
    pub mean: f64,
    pub x: f64,
    pub y: f64,
    pub box_width: usize,
    pub box_height: usize,
}

/// Encoders blur pure red, so accept anything close to it.
#[inline]
pub fn is_near_red([r, g, b]: [u8; 3]) -> bool {
    r >= 0xF0 && g < 0x10 && b < 0x10
}

/// `None` when the box is not visible on the center row or column.
pub fn estimate_pixel_size(raster: &RgbRaster, bbox: &CalibrationBox) -> Option<PixelSize> {
    if raster.width == 0 || raster.height == 0 {
        return None;
    }
    let (cx, cy) = (raster.width / 2, raster.height / 2);
    let span = |center: usize, len: usize| {
        center.saturating_sub(SCAN_RADIUS)..(center + SCAN_RADIUS).min(len)
    };

    let box_width = span(cx, raster.width)
        .filter(|&x| is_near_red(raster.pixel(x, cy)))
        .count();
    let box_height = span(cy, raster.height)
        .filter(|&y| is_near_red(raster.pixel(cx, y)))
        .count();
    if box_width == 0 || box_height == 0 {
        return None;
    }

    let x = (bbox.se_x - bbox.nw_x) / box_width as f64;
    let y = (bbox.nw_y - bbox.se_y) / box_height as f64;
    Some(PixelSize {
        mean: (x + y) / 2.0,
        x,
        y,
        box_width,
        box_height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: [u8; 3] = [0xFF, 0x00, 0x00];

    fn raster_with_box(w: usize, h: usize, x0: usize, y0: usize, bw: usize, bh: usize) -> RgbRaster {
        let mut data = vec![0x80u8; w * h * 3];
        for y in y0..y0 + bh {
            for x in x0..x0 + bw {
                let i = (y * w + x) * 3;
                data[i..i + 3].copy_from_slice(&RED);
            }
        }
        RgbRaster {
            width: w,
            height: h,
            data,
        }
    }

    #[test]
    fn near_red_threshold() {
        assert!(is_near_red([0xF0, 0x0F, 0x0F]));
        assert!(!is_near_red([0xEF, 0x00, 0x00]));
        assert!(!is_near_red([0xFF, 0x10, 0x00]));
    }

    #[test]
    fn box_counts_give_per_axis_sizes() {
        let raster = raster_with_box(200, 160, 90, 75, 20, 10);
        let bbox = CalibrationBox {
            nw_x: 1000.0,
            nw_y: 5000.0,
            se_x: 1040.0,
            se_y: 4970.0,
        };
        let size = estimate_pixel_size(&raster, &bbox).unwrap();
        assert_eq!((size.box_width, size.box_height), (20, 10));
        assert_eq!(size.x, 2.0);
        assert_eq!(size.y, 3.0);
        assert_eq!(size.mean, 2.5);
    }

    #[test]
    fn scan_window_is_clamped_to_small_images() {
        let raster = raster_with_box(20, 20, 5, 5, 10, 10);
        let bbox = CalibrationBox {
            nw_x: 0.0,
            nw_y: 10.0,
            se_x: 10.0,
            se_y: 0.0,
        };
        let size = estimate_pixel_size(&raster, &bbox).unwrap();
        assert_eq!(size.mean, 1.0);
    }

    #[test]
    fn missing_box_yields_none() {
        let raster = raster_with_box(64, 64, 0, 0, 0, 0);
        let bbox = CalibrationBox {
            nw_x: 0.0,
            nw_y: 1.0,
            se_x: 1.0,
            se_y: 0.0,
        };
        assert!(estimate_pixel_size(&raster, &bbox).is_none());
    }
}
