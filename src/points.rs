//! Pixel positions and the owned point sequences built from them.
//!
//! A [`PointSequence`] belongs to exactly one feature. Forward/backward
//! navigation is index arithmetic over the backing `Vec`.

use serde::{Deserialize, Serialize};

/// Integer pixel position, optionally carrying the distance to the reference
/// vertex it was matched against.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PixelPoint {
    pub col: i32,
    pub row: i32,
    /// Euclidean pixel distance to the matched reference vertex. `None` for
    /// points that were never matched (reference vertices).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_distance: Option<f64>,
}

impl PixelPoint {
    pub fn new(col: i32, row: i32) -> Self {
        Self {
            col,
            row,
            match_distance: None,
        }
    }

    /// A point found as the match for `target`; the distance is filled in.
    pub fn matched(col: i32, row: i32, target: &PixelPoint) -> Self {
        let mut p = Self::new(col, row);
        p.match_distance = Some(p.distance_to(target));
        p
    }

    pub fn distance_to(&self, other: &PixelPoint) -> f64 {
        let dx = f64::from(self.col - other.col);
        let dy = f64::from(self.row - other.row);
        (dx * dx + dy * dy).sqrt()
    }

    pub fn as_array(&self) -> [i32; 2] {
        [self.col, self.row]
    }
}

/// Ordered, owned sequence of pixel points.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PointSequence {
    points: Vec<PixelPoint>,
}

impl PointSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            points: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, point: PixelPoint) {
        self.points.push(point);
    }

    pub fn insert(&mut self, index: usize, point: PixelPoint) {
        self.points.insert(index, point);
    }

    pub fn remove(&mut self, index: usize) -> PixelPoint {
        self.points.remove(index)
    }

    pub fn truncate(&mut self, len: usize) {
        self.points.truncate(len);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<&PixelPoint> {
        self.points.first()
    }

    pub fn last(&self) -> Option<&PixelPoint> {
        self.points.last()
    }

    pub fn get(&self, index: usize) -> Option<&PixelPoint> {
        self.points.get(index)
    }

    /// Index of the successor of `index`, if any.
    pub fn next_index(&self, index: usize) -> Option<usize> {
        let next = index + 1;
        (next < self.points.len()).then_some(next)
    }

    /// Index of the predecessor of `index`, if any.
    pub fn prev_index(&self, index: usize) -> Option<usize> {
        if index == 0 || index >= self.points.len() {
            None
        } else {
            Some(index - 1)
        }
    }

    /// True when some point of the sequence sits on `(col, row)`.
    pub fn contains_pixel(&self, col: i32, row: i32) -> bool {
        self.points.iter().any(|p| p.col == col && p.row == row)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PixelPoint> {
        self.points.iter()
    }

    pub fn as_slice(&self) -> &[PixelPoint] {
        &self.points
    }
}

impl From<Vec<PixelPoint>> for PointSequence {
    fn from(points: Vec<PixelPoint>) -> Self {
        Self { points }
    }
}

impl FromIterator<PixelPoint> for PointSequence {
    fn from_iter<T: IntoIterator<Item = PixelPoint>>(iter: T) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a PointSequence {
    type Item = &'a PixelPoint;
    type IntoIter = std::slice::Iter<'a, PixelPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq(coords: &[(i32, i32)]) -> PointSequence {
        coords.iter().map(|&(c, r)| PixelPoint::new(c, r)).collect()
    }

    #[test]
    fn navigation_walks_both_directions() {
        let s = seq(&[(0, 0), (1, 0), (2, 1)]);
        let mut forward = Vec::new();
        let mut idx = Some(0);
        while let Some(i) = idx {
            forward.push(s.get(i).unwrap().as_array());
            idx = s.next_index(i);
        }
        assert_eq!(forward, vec![[0, 0], [1, 0], [2, 1]]);

        let mut backward = Vec::new();
        let mut idx = Some(s.len() - 1);
        while let Some(i) = idx {
            backward.push(s.get(i).unwrap().as_array());
            idx = s.prev_index(i);
        }
        assert_eq!(backward, vec![[2, 1], [1, 0], [0, 0]]);
        assert_eq!(s.prev_index(7), None);
    }

    #[test]
    fn editing_keeps_order() {
        let mut s = seq(&[(0, 0), (2, 0)]);
        s.insert(1, PixelPoint::new(1, 0));
        assert_eq!(s.get(1).unwrap().as_array(), [1, 0]);
        let removed = s.remove(0);
        assert_eq!(removed.as_array(), [0, 0]);
        s.truncate(1);
        assert_eq!(s.len(), 1);
        assert_eq!(s.first(), s.last());
        assert!(s.contains_pixel(1, 0));
        assert!(!s.contains_pixel(2, 0));
    }

    #[test]
    fn matched_point_records_distance() {
        let target = PixelPoint::new(5, 5);
        let p = PixelPoint::matched(8, 9, &target);
        assert_eq!(p.match_distance, Some(5.0));
        assert_eq!(target.match_distance, None);
    }
}
