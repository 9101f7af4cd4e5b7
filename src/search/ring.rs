use super::CompassDirection;

/// Rotation applied to the preferred direction for each of the eight scan
/// slots: preferred first, then alternating clockwise/counter-clockwise.
pub const SCAN_OFFSETS: [i32; 8] = [0, 1, -1, 2, -2, 3, -3, 4];

/// Offsets `(dcol, drow)` of the square ring at Chebyshev distance `radius`,
/// in scan order for a preferred direction.
///
/// Each direction contributes `radius` positions starting at its anchor
/// (`step * radius`) and walking toward the next compass point, so the eight
/// directions together cover the `8 * radius` ring cells exactly once.
#[derive(Clone, Debug)]
pub struct RingScan {
    preferred: CompassDirection,
    radius: i32,
    slot: usize,
    along: i32,
}

impl RingScan {
    pub fn new(preferred: CompassDirection, radius: u32) -> Self {
        Self {
            preferred,
            radius: radius as i32,
            slot: 0,
            along: 0,
        }
    }
}

impl Iterator for RingScan {
    type Item = (i32, i32);

    fn next(&mut self) -> Option<Self::Item> {
        if self.radius <= 0 {
            return None;
        }
        if self.along >= self.radius {
            self.along = 0;
            self.slot += 1;
        }
        if self.slot >= SCAN_OFFSETS.len() {
            return None;
        }
        let dir = self.preferred.rotated(SCAN_OFFSETS[self.slot]);
        let (sx, sy) = dir.step();
        let (ax, ay) = dir.ring_advance();
        let j = self.along;
        self.along += 1;
        Some((sx * self.radius + ax * j, sy * self.radius + ay * j))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.radius <= 0 || self.slot >= SCAN_OFFSETS.len() {
            return (0, Some(0));
        }
        let r = self.radius as usize;
        let remaining = (SCAN_OFFSETS.len() - self.slot) * r - self.along.min(self.radius) as usize;
        (remaining, Some(remaining))
    }
}
