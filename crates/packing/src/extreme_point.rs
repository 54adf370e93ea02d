//! Extreme-point set for corner placement candidates.

use nalgebra::Vector3;
use std::cmp::Ordering;
use u_loading_core::EPS;

/// Candidate corners at which the next box may be placed.
///
/// Starts with the origin. After every placement the set drops points
/// swallowed by the new box and emits the three corner points
/// `(x+l, y, z)`, `(x, y+w, z)`, `(x, y, z+h)`. Points are kept sorted
/// by ascending `x` so the packer's scan visits the inside of the cargo
/// bay first.
///
/// Emitted points are not projected onto lower surfaces; the support
/// check rejects floating placements, so projection would only add
/// candidates without changing which routes pack.
#[derive(Debug, Clone)]
pub struct ExtremePointSet {
    points: Vec<Vector3<f64>>,
}

impl Default for ExtremePointSet {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtremePointSet {
    /// Creates a set seeded with the origin.
    pub fn new() -> Self {
        Self {
            points: vec![Vector3::zeros()],
        }
    }

    /// Returns the candidate points, sorted by ascending `x`.
    pub fn points(&self) -> &[Vector3<f64>] {
        &self.points
    }

    /// Returns the number of candidate points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns `true` if no candidates remain.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Records a placed box at `position` with oriented side lengths
    /// `dims`, refreshing the candidate set.
    pub fn record_placement(&mut self, position: Vector3<f64>, dims: Vector3<f64>) {
        let (x, y, z) = (position.x, position.y, position.z);
        let (l, w, h) = (dims.x, dims.y, dims.z);

        // Drop points inside the half-open box [x, x+l) x [y, y+w) x [z, z+h).
        self.points.retain(|p| {
            !(p.x >= x - EPS
                && p.x < x + l - EPS
                && p.y >= y - EPS
                && p.y < y + w - EPS
                && p.z >= z - EPS
                && p.z < z + h - EPS)
        });

        let candidates = [
            Vector3::new(x + l, y, z),
            Vector3::new(x, y + w, z),
            Vector3::new(x, y, z + h),
        ];
        for c in candidates {
            if !self.points.iter().any(|p| (p - c).norm() < EPS) {
                self.points.push(c);
            }
        }

        self.points.sort_by(|a, b| {
            (a.x, a.y, a.z)
                .partial_cmp(&(b.x, b.y, b.z))
                .unwrap_or(Ordering::Equal)
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_origin() {
        let eps = ExtremePointSet::new();
        assert_eq!(eps.len(), 1);
        assert_eq!(eps.points()[0], Vector3::zeros());
    }

    #[test]
    fn test_placement_replaces_origin_with_three_corners() {
        let mut eps = ExtremePointSet::new();
        eps.record_placement(Vector3::zeros(), Vector3::new(10.0, 20.0, 30.0));

        assert_eq!(eps.len(), 3);
        let pts = eps.points();
        assert!(pts.contains(&Vector3::new(10.0, 0.0, 0.0)));
        assert!(pts.contains(&Vector3::new(0.0, 20.0, 0.0)));
        assert!(pts.contains(&Vector3::new(0.0, 0.0, 30.0)));
    }

    #[test]
    fn test_points_sorted_by_x() {
        let mut eps = ExtremePointSet::new();
        eps.record_placement(Vector3::zeros(), Vector3::new(10.0, 10.0, 10.0));
        eps.record_placement(Vector3::new(10.0, 0.0, 0.0), Vector3::new(5.0, 5.0, 5.0));

        let xs: Vec<f64> = eps.points().iter().map(|p| p.x).collect();
        let mut sorted = xs.clone();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(xs, sorted);
    }

    #[test]
    fn test_duplicate_points_merged() {
        let mut eps = ExtremePointSet::new();
        eps.record_placement(Vector3::zeros(), Vector3::new(10.0, 10.0, 10.0));
        // Second box behind the first re-emits (0, 10, 0).
        eps.record_placement(Vector3::new(0.0, 0.0, 10.0), Vector3::new(10.0, 10.0, 10.0));

        let pts = eps.points();
        let dup_count = pts
            .iter()
            .filter(|p| (*p - Vector3::new(0.0, 10.0, 0.0)).norm() < EPS)
            .count();
        assert_eq!(dup_count, 1);
    }

    #[test]
    fn test_covered_points_removed() {
        let mut eps = ExtremePointSet::new();
        eps.record_placement(Vector3::zeros(), Vector3::new(10.0, 10.0, 10.0));
        // A box landing on (10, 0, 0) swallows that candidate.
        eps.record_placement(Vector3::new(10.0, 0.0, 0.0), Vector3::new(10.0, 10.0, 10.0));

        assert!(!eps
            .points()
            .iter()
            .any(|p| (p - Vector3::new(10.0, 0.0, 0.0)).norm() < EPS));
    }
}
