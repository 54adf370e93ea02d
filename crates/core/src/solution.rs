//! Solution: a collection of routes over the customer set.

use crate::config::SolverConfig;
use crate::node::Node;
use crate::route::Route;
use std::collections::HashSet;
use std::sync::Arc;

/// A candidate solution: an unordered collection of routes between the
/// virtual start and end depots.
///
/// Cloning is shallow: routes are immutable and shared via `Arc`, so
/// destroy operators can copy a solution cheaply and replace routes
/// wholesale. During search a solution may leave customers unserved; the
/// driver only ever returns a covering solution when one exists.
#[derive(Debug, Clone)]
pub struct Solution {
    start: Arc<Node>,
    end: Arc<Node>,
    routes: Vec<Arc<Route>>,
}

impl Solution {
    /// Creates an empty solution.
    pub fn new(start: Arc<Node>, end: Arc<Node>) -> Self {
        Self {
            start,
            end,
            routes: Vec::new(),
        }
    }

    /// Returns the start depot.
    pub fn start(&self) -> &Arc<Node> {
        &self.start
    }

    /// Returns the end depot.
    pub fn end(&self) -> &Arc<Node> {
        &self.end
    }

    /// Returns the routes.
    pub fn routes(&self) -> &[Arc<Route>] {
        &self.routes
    }

    /// Replaces the whole route list.
    pub fn set_routes(&mut self, routes: Vec<Arc<Route>>) {
        self.routes = routes;
    }

    /// Appends a route.
    pub fn push_route(&mut self, route: Arc<Route>) {
        self.routes.push(route);
    }

    /// Replaces the route at `index`.
    pub fn replace_route(&mut self, index: usize, route: Arc<Route>) {
        self.routes[index] = route;
    }

    /// Returns the number of customer stops across all routes.
    pub fn customer_count(&self) -> usize {
        self.routes.iter().map(|r| r.customer_count()).sum()
    }

    /// Returns the ids of all served customers.
    pub fn served_ids(&self) -> HashSet<usize> {
        self.routes
            .iter()
            .flat_map(|r| r.customers().map(|n| n.id()))
            .collect()
    }

    /// Returns whether every given customer is served by some route.
    pub fn covers(&self, customers: &[Arc<Node>]) -> bool {
        let served = self.served_ids();
        customers.iter().all(|n| served.contains(&n.id()))
    }

    /// Returns the total distance over all routes.
    pub fn total_distance(&self) -> f64 {
        self.routes.iter().map(|r| r.dist_cost()).sum()
    }

    /// Returns the mean volumetric load rate over routes.
    pub fn mean_load_rate(&self) -> f64 {
        if self.routes.is_empty() {
            return 0.0;
        }
        self.routes.iter().map(|r| r.load_rate()).sum::<f64>() / self.routes.len() as f64
    }

    /// Returns the weighted objective
    /// `alpha * (1 - mean load rate) + beta * total distance`.
    ///
    /// The empty solution is worst-possible (`+inf`) so any non-empty
    /// candidate dominates it under annealing acceptance.
    pub fn objective(&self, config: &SolverConfig) -> f64 {
        if self.routes.is_empty() {
            return f64::INFINITY;
        }
        config.alpha * (1.0 - self.mean_load_rate()) + config.beta * self.total_distance()
    }
}
