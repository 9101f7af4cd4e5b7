//! Borrowed 8-bit raster with the foreground predicate used by the search.

/// Pixel value marking an edge (foreground) pixel.
pub const FOREGROUND: u8 = 0xFF;
/// Pixel value written by the overlay for matched pixels.
pub const MATCH_MARKER: u8 = 0xAA;

#[derive(Clone, Copy, Debug)]
pub struct PixelGrid<'a> {
    pub w: usize,
    pub h: usize,
    pub stride: usize, // bytes between rows
    pub data: &'a [u8],
}

impl<'a> PixelGrid<'a> {
    /// Tightly packed `w × h` grid over `data`.
    pub fn new(w: usize, h: usize, data: &'a [u8]) -> Self {
        Self {
            w,
            h,
            stride: w,
            data,
        }
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.stride + x]
    }

    /// True when `(col, row)` addresses a pixel of this grid.
    #[inline]
    pub fn contains(&self, col: i32, row: i32) -> bool {
        col >= 0 && row >= 0 && (col as usize) < self.w && (row as usize) < self.h
    }

    /// Foreground test; positions outside the grid are never foreground.
    #[inline]
    pub fn is_foreground(&self, col: i32, row: i32) -> bool {
        self.contains(col, row) && self.get(col as usize, row as usize) == FOREGROUND
    }

    pub fn foreground_count(&self) -> usize {
        (0..self.h)
            .map(|y| {
                crate::image::ImageView::row(self, y)
                    .iter()
                    .filter(|&&v| v == FOREGROUND)
                    .count()
            })
            .sum()
    }
}

impl<'a> crate::image::traits::ImageView for PixelGrid<'a> {
    type Pixel = u8;

    #[inline]
    fn width(&self) -> usize {
        self.w
    }
    #[inline]
    fn height(&self) -> usize {
        self.h
    }
    #[inline]
    fn stride(&self) -> usize {
        self.stride
    }
    #[inline]
    fn row(&self, y: usize) -> &[u8] {
        let start = y * self.stride;
        &self.data[start..start + self.w]
    }
    #[inline]
    fn as_slice(&self) -> Option<&[u8]> {
        (self.stride == self.w).then_some(&self.data[..self.w * self.h])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_positions_are_background() {
        let mut data = vec![0u8; 4 * 3];
        data[0] = FOREGROUND;
        data[11] = FOREGROUND;
        let grid = PixelGrid::new(4, 3, &data);
        assert!(grid.is_foreground(0, 0));
        assert!(grid.is_foreground(3, 2));
        assert!(!grid.is_foreground(-1, 0));
        assert!(!grid.is_foreground(4, 2));
        assert!(!grid.is_foreground(3, 3));
        assert_eq!(grid.foreground_count(), 2);
    }

    #[test]
    fn only_exact_marker_counts_as_foreground() {
        let data = vec![0xFE, MATCH_MARKER, FOREGROUND];
        let grid = PixelGrid::new(3, 1, &data);
        assert!(!grid.is_foreground(0, 0));
        assert!(!grid.is_foreground(1, 0));
        assert!(grid.is_foreground(2, 0));
    }
}
