//! Distance lookup and smallest-feasible-vehicle search.

use std::cmp::Ordering;
use std::sync::Arc;
use u_loading_core::{Node, Route, SolverConfig, VehicleType, EPS};
use u_loading_packing::SequencePacker;

/// A dense n×n distance matrix indexed by node id.
///
/// Missing pairs are `+inf` and the diagonal is zero, so an unreachable
/// leg poisons a route's distance instead of silently shortening it.
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    data: Vec<f64>,
    size: usize,
}

impl DistanceMatrix {
    /// Creates a matrix with `+inf` everywhere except the zero diagonal.
    pub fn new(size: usize) -> Self {
        let mut data = vec![f64::INFINITY; size * size];
        for i in 0..size {
            data[i * size + i] = 0.0;
        }
        Self { data, size }
    }

    /// Returns the distance from `from` to `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.size + to]
    }

    /// Sets the distance from `from` to `to`.
    pub fn set(&mut self, from: usize, to: usize, distance: f64) {
        self.data[from * self.size + to] = distance;
    }

    /// Number of nodes covered by this matrix.
    pub fn size(&self) -> usize {
        self.size
    }
}

/// Binds stop sequences to vehicles.
///
/// Holds the vehicle catalog sorted by ascending interior volume, the
/// distance matrix, and the route packer. `find_best_vehicle` walks the
/// catalog smallest-first and returns the first vehicle whose cargo bay
/// accepts the sequence's items.
#[derive(Debug, Clone)]
pub struct FleetManager {
    vehicle_types: Vec<VehicleType>,
    distances: DistanceMatrix,
    packer: SequencePacker,
    config: SolverConfig,
}

impl FleetManager {
    /// Creates a fleet manager. The catalog is sorted by interior volume.
    pub fn new(
        mut vehicle_types: Vec<VehicleType>,
        distances: DistanceMatrix,
        config: SolverConfig,
    ) -> Self {
        vehicle_types.sort_by(|a, b| {
            a.volume()
                .partial_cmp(&b.volume())
                .unwrap_or(Ordering::Equal)
        });
        let packer = SequencePacker::new(&config);
        Self {
            vehicle_types,
            distances,
            packer,
            config,
        }
    }

    /// Returns the solver configuration.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Returns the catalog, sorted by ascending interior volume.
    pub fn vehicle_types(&self) -> &[VehicleType] {
        &self.vehicle_types
    }

    /// Returns the largest vehicle type, if the catalog is non-empty.
    pub fn largest_vehicle(&self) -> Option<&VehicleType> {
        self.vehicle_types.last()
    }

    /// Returns the route packer.
    pub fn packer(&self) -> &SequencePacker {
        &self.packer
    }

    /// Distance between two nodes.
    pub fn distance(&self, from: &Node, to: &Node) -> f64 {
        self.distances.get(from.id(), to.id())
    }

    /// Total distance along a stop sequence.
    pub fn path_distance(&self, sequence: &[Arc<Node>]) -> f64 {
        sequence
            .windows(2)
            .map(|leg| self.distances.get(leg[0].id(), leg[1].id()))
            .sum()
    }

    /// Finds the smallest vehicle able to serve `sequence`, packing
    /// included.
    ///
    /// Vehicles are tried in ascending volume; each is pruned first on
    /// aggregate item weight, then handed to the packer. Returns `None`
    /// when no vehicle in the catalog can serve the sequence.
    pub fn find_best_vehicle(&self, sequence: &[Arc<Node>]) -> Option<Arc<Route>> {
        let dist = self.path_distance(sequence);
        let total_weight: f64 = sequence.iter().map(|n| n.total_weight()).sum();

        for vehicle in &self.vehicle_types {
            if total_weight > vehicle.max_weight() + EPS {
                continue;
            }
            if let Some(load) = self.packer.pack(vehicle, sequence) {
                return Some(Arc::new(Route::new(
                    vehicle.clone(),
                    sequence.to_vec(),
                    load,
                    dist,
                )));
            }
        }
        None
    }
}
