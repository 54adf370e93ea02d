//! Routes and packed loads.

use crate::config::SolverConfig;
use crate::item::Item;
use crate::node::Node;
use crate::vehicle::VehicleType;
use std::sync::Arc;

/// A single item placement inside a cargo bay.
///
/// `(x, y, z)` is the minimum corner; `(lx, ly, lz)` are the oriented
/// side lengths, one of the item's axis-aligned orientations.
#[derive(Debug, Clone)]
pub struct PackedItem {
    item: Arc<Item>,
    x: f64,
    y: f64,
    z: f64,
    lx: f64,
    ly: f64,
    lz: f64,
}

impl PackedItem {
    /// Creates a placement.
    pub fn new(item: Arc<Item>, x: f64, y: f64, z: f64, lx: f64, ly: f64, lz: f64) -> Self {
        Self {
            item,
            x,
            y,
            z,
            lx,
            ly,
            lz,
        }
    }

    /// Returns the placed item.
    pub fn item(&self) -> &Arc<Item> {
        &self.item
    }

    /// Returns the minimum corner `(x, y, z)`.
    pub fn position(&self) -> (f64, f64, f64) {
        (self.x, self.y, self.z)
    }

    /// Returns the oriented side lengths `(lx, ly, lz)`.
    pub fn dimensions(&self) -> (f64, f64, f64) {
        (self.lx, self.ly, self.lz)
    }

    /// Returns the maximum corner `(x+lx, y+ly, z+lz)`.
    pub fn max_corner(&self) -> (f64, f64, f64) {
        (self.x + self.lx, self.y + self.ly, self.z + self.lz)
    }

    /// Returns the placed volume.
    pub fn volume(&self) -> f64 {
        self.lx * self.ly * self.lz
    }
}

/// The packed load of a route: placements plus the achieved load rate.
///
/// Produced once by the packer for a given `(vehicle, sequence)` and
/// shared read-only afterwards, so cache hits and route clones stay
/// shallow.
#[derive(Debug, Clone)]
pub struct PackedLoad {
    placements: Vec<PackedItem>,
    load_rate: f64,
}

impl PackedLoad {
    /// Creates a packed load.
    pub fn new(placements: Vec<PackedItem>, load_rate: f64) -> Self {
        Self {
            placements,
            load_rate,
        }
    }

    /// Returns the placements in packing order.
    pub fn placements(&self) -> &[PackedItem] {
        &self.placements
    }

    /// Returns the volumetric load rate (placed volume / interior volume).
    pub fn load_rate(&self) -> f64 {
        self.load_rate
    }

    /// Returns the total placed mass.
    pub fn total_weight(&self) -> f64 {
        self.placements.iter().map(|p| p.item().weight()).sum()
    }

    /// Returns the total placed volume.
    pub fn total_volume(&self) -> f64 {
        self.placements.iter().map(|p| p.volume()).sum()
    }
}

/// Builds the deterministic fingerprint of `(vehicle type, stop order)`.
///
/// Two routes with equal signatures have byte-identical packing outcomes,
/// which makes the signature usable as a memo key.
pub fn route_signature(vehicle_code: &str, sequence: &[Arc<Node>]) -> String {
    let mut sig = String::with_capacity(vehicle_code.len() + sequence.len() * 4 + 1);
    sig.push_str(vehicle_code);
    sig.push('|');
    for (i, node) in sequence.iter().enumerate() {
        if i > 0 {
            sig.push(',');
        }
        sig.push_str(&node.id().to_string());
    }
    sig
}

/// An ordered route served by one vehicle, with its packed load.
///
/// The sequence starts at the start depot and ends at the end depot.
/// Routes are immutable: operators never edit a route in place, they ask
/// the fleet manager for a replacement built from a new sequence.
#[derive(Debug, Clone)]
pub struct Route {
    vehicle: VehicleType,
    sequence: Vec<Arc<Node>>,
    load: Arc<PackedLoad>,
    dist_cost: f64,
}

impl Route {
    /// Creates a route from a successful packing.
    pub fn new(
        vehicle: VehicleType,
        sequence: Vec<Arc<Node>>,
        load: Arc<PackedLoad>,
        dist_cost: f64,
    ) -> Self {
        Self {
            vehicle,
            sequence,
            load,
            dist_cost,
        }
    }

    /// Returns the vehicle serving this route.
    pub fn vehicle(&self) -> &VehicleType {
        &self.vehicle
    }

    /// Returns the full stop sequence including both depots.
    pub fn sequence(&self) -> &[Arc<Node>] {
        &self.sequence
    }

    /// Iterates the customer stops (depots excluded).
    pub fn customers(&self) -> impl Iterator<Item = &Arc<Node>> {
        self.sequence.iter().filter(|n| !n.is_depot())
    }

    /// Returns the number of customer stops.
    pub fn customer_count(&self) -> usize {
        self.customers().count()
    }

    /// Returns whether the given customer id is served by this route.
    pub fn serves(&self, node_id: usize) -> bool {
        self.customers().any(|n| n.id() == node_id)
    }

    /// Returns the packed load.
    pub fn load(&self) -> &Arc<PackedLoad> {
        &self.load
    }

    /// Returns the placements in packing order.
    pub fn placements(&self) -> &[PackedItem] {
        self.load.placements()
    }

    /// Returns the volumetric load rate.
    pub fn load_rate(&self) -> f64 {
        self.load.load_rate()
    }

    /// Returns the route distance.
    pub fn dist_cost(&self) -> f64 {
        self.dist_cost
    }

    /// Returns the route signature (vehicle code + ordered node ids).
    pub fn signature(&self) -> String {
        route_signature(self.vehicle.code(), &self.sequence)
    }

    /// Returns the weighted cost of this route alone:
    /// `alpha * (1 - load_rate) + beta * dist_cost`.
    pub fn weighted_cost(&self, config: &SolverConfig) -> f64 {
        config.alpha * (1.0 - self.load_rate()) + config.beta * self.dist_cost
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample_route() -> Route {
        let vehicle = VehicleType::new("CT1", 100.0, 100.0, 100.0, 1000.0);
        let item = Arc::new(Item::new("A", 10.0, 10.0, 10.0, 1.0));
        let node = Arc::new(Node::customer(1, "P01", false, vec![item.clone()]));
        let sequence = vec![
            Arc::new(Node::depot(0, "start_point")),
            node,
            Arc::new(Node::depot(2, "end_point")),
        ];
        let load = Arc::new(PackedLoad::new(
            vec![PackedItem::new(item, 0.0, 0.0, 0.0, 10.0, 10.0, 10.0)],
            0.001,
        ));
        Route::new(vehicle, sequence, load, 250.0)
    }

    #[test]
    fn test_signature() {
        let route = sample_route();
        assert_eq!(route.signature(), "CT1|0,1,2");
    }

    #[test]
    fn test_signature_order_sensitivity() {
        let a = Arc::new(Node::customer(1, "P01", false, vec![]));
        let b = Arc::new(Node::customer(2, "P02", false, vec![]));
        let fwd = route_signature("CT1", &[a.clone(), b.clone()]);
        let rev = route_signature("CT1", &[b, a]);
        assert_ne!(fwd, rev);
    }

    #[test]
    fn test_customers_skip_depots() {
        let route = sample_route();
        assert_eq!(route.customer_count(), 1);
        assert!(route.serves(1));
        assert!(!route.serves(0));
    }

    #[test]
    fn test_weighted_cost() {
        let route = sample_route();
        let config = SolverConfig::default().with_objective_weights(1000.0, 2.0);
        assert_relative_eq!(
            route.weighted_cost(&config),
            1000.0 * (1.0 - 0.001) + 2.0 * 250.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_packed_item_corners() {
        let item = Arc::new(Item::new("A", 5.0, 4.0, 3.0, 1.0));
        let p = PackedItem::new(item, 1.0, 2.0, 3.0, 5.0, 4.0, 3.0);
        assert_eq!(p.max_corner(), (6.0, 6.0, 6.0));
        assert_relative_eq!(p.volume(), 60.0, epsilon = 1e-9);
    }
}
