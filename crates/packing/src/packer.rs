//! Sequence-dependent route packer with signature-keyed memoization.

use crate::collision::{Aabb, PlacedBoxes};
use crate::extreme_point::ExtremePointSet;
use crate::height_map::HeightMap;
use nalgebra::Vector3;
use std::cell::RefCell;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;
use u_loading_core::{
    route_signature, Item, Node, PackedItem, PackedLoad, SolverConfig, VehicleType, EPS,
};

/// Packs a route's cargo in strict visit order.
///
/// For each stop (depots skipped) items are taken by decreasing volume
/// and placed at the feasible extreme point minimizing the lexicographic
/// score `(x, z, y)` over all orientations. Low `x` pushes early stops'
/// cargo to the inside of the bay, which is exactly the LIFO unload
/// order the routes require; low `z` keeps stacks short.
///
/// Packing is deterministic for a fixed `(vehicle, sequence)`, so
/// outcomes (failures included) are memoized under the route signature.
/// The cache only grows and is never shared across threads; parallel
/// restarts clone the packer and warm their own copies.
#[derive(Debug, Clone)]
pub struct SequencePacker {
    grid_precision: f64,
    support_ratio: f64,
    enable_cache: bool,
    cache: RefCell<HashMap<String, Option<Arc<PackedLoad>>>>,
}

impl SequencePacker {
    /// Creates a packer from the solver configuration.
    pub fn new(config: &SolverConfig) -> Self {
        Self {
            grid_precision: config.grid_precision,
            support_ratio: config.support_ratio,
            enable_cache: config.enable_cache,
            cache: RefCell::new(HashMap::new()),
        }
    }

    /// Packs `sequence` into `vehicle`.
    ///
    /// Returns the placements and load rate on success, `None` when some
    /// item cannot be placed. Consults and fills the memo cache.
    pub fn pack(&self, vehicle: &VehicleType, sequence: &[Arc<Node>]) -> Option<Arc<PackedLoad>> {
        let signature = route_signature(vehicle.code(), sequence);

        if self.enable_cache {
            if let Some(entry) = self.cache.borrow().get(&signature) {
                return entry.clone();
            }
        }

        let outcome = self.pack_uncached(vehicle, sequence);

        if self.enable_cache {
            self.cache
                .borrow_mut()
                .insert(signature, outcome.clone());
        }
        outcome
    }

    fn pack_uncached(
        &self,
        vehicle: &VehicleType,
        sequence: &[Arc<Node>],
    ) -> Option<Arc<PackedLoad>> {
        let mut corners = ExtremePointSet::new();
        let mut placements: Vec<PackedItem> = Vec::new();
        let mut placed = PlacedBoxes::new();
        let mut surface = HeightMap::new(
            vehicle.length(),
            vehicle.width(),
            self.grid_precision,
            self.support_ratio,
        );

        for node in sequence.iter().filter(|n| !n.is_depot()) {
            // Within a stop, large items go in first.
            let mut items: Vec<&Arc<Item>> = node.items().iter().collect();
            items.sort_by(|a, b| {
                b.volume()
                    .partial_cmp(&a.volume())
                    .unwrap_or(Ordering::Equal)
            });

            for item in items {
                match self.place_item(vehicle, item, &corners, &placed, &surface) {
                    Some((position, dims)) => {
                        placements.push(PackedItem::new(
                            item.clone(),
                            position.x,
                            position.y,
                            position.z,
                            dims.x,
                            dims.y,
                            dims.z,
                        ));
                        placed.push(&Aabb::from_corner(
                            position.x, position.y, position.z, dims.x, dims.y, dims.z,
                        ));
                        surface.update(position.x, position.y, dims.x, dims.y, position.z + dims.z);
                        corners.record_placement(position, dims);
                    }
                    None => {
                        log::debug!(
                            "no feasible placement for item '{}' in vehicle '{}'",
                            item.id(),
                            vehicle.code()
                        );
                        return None;
                    }
                }
            }
        }

        let load_rate = if vehicle.volume() > 0.0 {
            placements.iter().map(|p| p.volume()).sum::<f64>() / vehicle.volume()
        } else {
            0.0
        };
        Some(Arc::new(PackedLoad::new(placements, load_rate)))
    }

    /// Finds the best feasible `(corner, orientation)` for one item, or
    /// `None` if nothing fits.
    fn place_item(
        &self,
        vehicle: &VehicleType,
        item: &Arc<Item>,
        corners: &ExtremePointSet,
        placed: &PlacedBoxes,
        surface: &HeightMap,
    ) -> Option<(Vector3<f64>, Vector3<f64>)> {
        let orientations = item.orientations();
        let mut best: Option<((f64, f64, f64), Vector3<f64>, Vector3<f64>)> = None;

        for ep in corners.points() {
            for &(lx, ly, lz) in &orientations {
                if ep.x + lx > vehicle.length() + EPS
                    || ep.y + ly > vehicle.width() + EPS
                    || ep.z + lz > vehicle.height() + EPS
                {
                    continue;
                }

                let candidate = Aabb::from_corner(ep.x, ep.y, ep.z, lx, ly, lz);
                if placed.collides(&candidate) {
                    continue;
                }

                if ep.z > EPS && !surface.check_support(ep.x, ep.y, lx, ly, ep.z) {
                    continue;
                }

                let score = (ep.x, ep.z, ep.y);
                let improves = match &best {
                    None => true,
                    Some((current, _, _)) => score < *current,
                };
                if improves {
                    best = Some((score, *ep, Vector3::new(lx, ly, lz)));
                }
            }
        }

        best.map(|(_, position, dims)| (position, dims))
    }

    /// Returns the number of memoized routes.
    pub fn cache_len(&self) -> usize {
        self.cache.borrow().len()
    }

    /// Drops all memoized outcomes.
    pub fn clear_cache(&self) {
        self.cache.borrow_mut().clear();
    }
}
