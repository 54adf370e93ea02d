//! Cargo item type.

use std::hash::{Hash, Hasher};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A rigid rectangular cargo item.
///
/// Side lengths are millimeters (integral values widened to `f64`), mass
/// is kilograms. Items are immutable once constructed and hash by their
/// identifier.
///
/// # Examples
///
/// ```
/// use u_loading_core::Item;
///
/// let item = Item::new("SPU-1", 600.0, 400.0, 300.0, 12.5);
/// assert_eq!(item.volume(), 600.0 * 400.0 * 300.0);
/// assert_eq!(item.orientations().len(), 6);
///
/// let cube = Item::new("SPU-2", 100.0, 100.0, 100.0, 1.0);
/// assert_eq!(cube.orientations().len(), 1);
/// ```
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Item {
    id: String,
    length: f64,
    width: f64,
    height: f64,
    weight: f64,
}

impl Item {
    /// Creates a new item.
    pub fn new(id: impl Into<String>, length: f64, width: f64, height: f64, weight: f64) -> Self {
        Self {
            id: id.into(),
            length,
            width,
            height,
            weight,
        }
    }

    /// Returns the item identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the length (original x side).
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Returns the width (original y side).
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Returns the height (original z side).
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Returns the mass.
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Returns the item volume.
    pub fn volume(&self) -> f64 {
        self.length * self.width * self.height
    }

    /// Returns the distinct axis-aligned orientations `(lx, ly, lz)`.
    ///
    /// The six side permutations, with duplicates removed: a cube yields
    /// one orientation, a box with exactly two equal sides yields three.
    pub fn orientations(&self) -> Vec<(f64, f64, f64)> {
        let (l, w, h) = (self.length, self.width, self.height);
        let perms = [
            (l, w, h),
            (l, h, w),
            (w, l, h),
            (w, h, l),
            (h, l, w),
            (h, w, l),
        ];

        let mut distinct: Vec<(f64, f64, f64)> = Vec::with_capacity(6);
        for p in perms {
            if !distinct.contains(&p) {
                distinct.push(p);
            }
        }
        distinct
    }
}

impl PartialEq for Item {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Item {}

impl Hash for Item {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
