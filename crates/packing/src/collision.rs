//! Axis-aligned bounding box collision tests.

use nalgebra::Vector3;
use u_loading_core::EPS;

/// An axis-aligned box `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner.
    pub min: Vector3<f64>,
    /// Maximum corner.
    pub max: Vector3<f64>,
}

impl Aabb {
    /// Creates a box from its corners.
    pub fn new(min: Vector3<f64>, max: Vector3<f64>) -> Self {
        Self { min, max }
    }

    /// Creates a box from its minimum corner and side lengths.
    pub fn from_corner(x: f64, y: f64, z: f64, lx: f64, ly: f64, lz: f64) -> Self {
        Self {
            min: Vector3::new(x, y, z),
            max: Vector3::new(x + lx, y + ly, z + lz),
        }
    }

    /// Returns whether two boxes interpenetrate by more than `EPS` on all
    /// three axes. Touching faces do not collide.
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.max.x > other.min.x + EPS
            && self.min.x < other.max.x - EPS
            && self.max.y > other.min.y + EPS
            && self.min.y < other.max.y - EPS
            && self.max.z > other.min.z + EPS
            && self.min.z < other.max.z - EPS
    }
}

/// Placed boxes stored as a contiguous `(x1, y1, z1, x2, y2, z2)` array
/// so a whole route's collision test runs over one flat buffer.
#[derive(Debug, Clone, Default)]
pub struct PlacedBoxes {
    data: Vec<f64>,
}

impl PlacedBoxes {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a placed box.
    pub fn push(&mut self, b: &Aabb) {
        self.data.extend_from_slice(&[
            b.min.x, b.min.y, b.min.z, b.max.x, b.max.y, b.max.z,
        ]);
    }

    /// Returns the number of placed boxes.
    pub fn len(&self) -> usize {
        self.data.len() / 6
    }

    /// Returns `true` if no boxes are stored.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns whether the candidate strictly overlaps any placed box.
    ///
    /// Agrees with [`Aabb::overlaps`] against every stored box on all
    /// inputs; the x-axis test runs first so most rows are rejected
    /// after one comparison.
    pub fn collides(&self, candidate: &Aabb) -> bool {
        let (nx1, ny1, nz1) = (candidate.min.x, candidate.min.y, candidate.min.z);
        let (nx2, ny2, nz2) = (candidate.max.x, candidate.max.y, candidate.max.z);

        for row in self.data.chunks_exact(6) {
            if nx2 <= row[0] + EPS || nx1 >= row[3] - EPS {
                continue;
            }
            if ny2 <= row[1] + EPS || ny1 >= row[4] - EPS {
                continue;
            }
            if nz2 <= row[2] + EPS || nz1 >= row[5] - EPS {
                continue;
            }
            return true;
        }
        false
    }
}
