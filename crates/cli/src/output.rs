//! Result serialization and reporting.
//!
//! # Coordinate convention
//!
//! Internally the packer works corner-based in the vehicle frame:
//! `x` along the interior length, `y` along the width, `z` up. The
//! result file uses the downstream visualizer's frame: box-center
//! coordinates relative to the vehicle center, with
//!
//! - output `x` = internal `y` (width axis)
//! - output `y` = internal `z` (height axis)
//! - output `z` = internal `x` (length axis)
//!
//! The `direction` field encodes which orientation the packer chose,
//! comparing the placed `(lx, ly)` against the item's original sides:
//! 100 `(l,w)`, 200 `(w,l)`, 300 `(l,h)`, 400 `(h,l)`, 500 `(w,h)`,
//! 600 `(h,w)`.

use serde::Serialize;
use std::collections::HashMap;
use std::io;
use std::path::Path;
use u_loading_core::{PackedItem, Route, Solution, SolverConfig, EPS};

/// Result file: `{ estimateCode, solutionArray: [[vehicle, ...]] }`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SolutionFile {
    pub estimate_code: String,
    pub solution_array: Vec<Vec<VehicleDto>>,
}

/// One used vehicle with its visit order and placements.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleDto {
    pub truck_type_id: String,
    pub truck_type_code: String,
    pub piece: usize,
    pub volume: f64,
    pub weight: f64,
    pub inner_length: f64,
    pub inner_width: f64,
    pub inner_height: f64,
    pub max_load_weight: f64,
    pub platform_array: Vec<String>,
    pub spu_array: Vec<SpuDto>,
}

/// One placed box in the visualizer frame.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpuDto {
    pub spu_id: String,
    pub platform_code: String,
    pub direction: u32,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub order: usize,
    pub length: f64,
    pub width: f64,
    pub height: f64,
    pub weight: f64,
}

/// Maps a placement's oriented sides back to a direction code.
fn direction_code(placement: &PackedItem) -> u32 {
    let (lx, ly, _) = placement.dimensions();
    let item = placement.item();
    let (l, w, h) = (item.length(), item.width(), item.height());

    let close = |a: f64, b: f64| (a - b).abs() < EPS;
    if close(lx, l) && close(ly, w) {
        100
    } else if close(lx, w) && close(ly, l) {
        200
    } else if close(lx, l) && close(ly, h) {
        300
    } else if close(lx, h) && close(ly, l) {
        400
    } else if close(lx, w) && close(ly, h) {
        500
    } else if close(lx, h) && close(ly, w) {
        600
    } else {
        100
    }
}

fn vehicle_dto(route: &Route) -> VehicleDto {
    let vehicle = route.vehicle();

    // Item id -> platform code, from the route's own stops.
    let mut item_platform: HashMap<&str, &str> = HashMap::new();
    for node in route.customers() {
        for item in node.items() {
            item_platform.insert(item.id(), node.platform_code());
        }
    }

    let platform_array: Vec<String> = route
        .customers()
        .map(|n| n.platform_code().to_string())
        .collect();

    let spu_array: Vec<SpuDto> = route
        .placements()
        .iter()
        .enumerate()
        .map(|(idx, p)| {
            let (x, y, z) = p.position();
            let (lx, ly, lz) = p.dimensions();

            // Box center, shifted to the vehicle center, then remapped
            // onto the output axes.
            let center_x = x + lx / 2.0 - vehicle.length() / 2.0;
            let center_y = y + ly / 2.0 - vehicle.width() / 2.0;
            let center_z = z + lz / 2.0 - vehicle.height() / 2.0;

            SpuDto {
                spu_id: p.item().id().to_string(),
                platform_code: item_platform
                    .get(p.item().id())
                    .map(|c| c.to_string())
                    .unwrap_or_default(),
                direction: direction_code(p),
                x: center_y,
                y: center_z,
                z: center_x,
                order: idx + 1,
                length: lx,
                width: ly,
                height: lz,
                weight: p.item().weight(),
            }
        })
        .collect();

    VehicleDto {
        truck_type_id: vehicle.code().to_string(),
        truck_type_code: vehicle.code().to_string(),
        piece: route.placements().len(),
        volume: route.placements().iter().map(|p| p.item().volume()).sum(),
        weight: route.load().total_weight(),
        inner_length: vehicle.length(),
        inner_width: vehicle.width(),
        inner_height: vehicle.height(),
        max_load_weight: vehicle.max_weight(),
        platform_array,
        spu_array,
    }
}

/// Builds the result file for a solved instance.
pub fn build_result(estimate_code: &str, solution: &Solution) -> SolutionFile {
    let vehicles: Vec<VehicleDto> = solution.routes().iter().map(|r| vehicle_dto(r)).collect();
    SolutionFile {
        estimate_code: estimate_code.to_string(),
        solution_array: vec![vehicles],
    }
}

/// Writes the result file as pretty-printed JSON.
pub fn write_result(path: impl AsRef<Path>, file: &SolutionFile) -> io::Result<()> {
    let json = serde_json::to_string_pretty(file)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    std::fs::write(path, json)
}

/// Writes a plain-text per-vehicle report next to the JSON result.
pub fn write_report(
    path: impl AsRef<Path>,
    estimate_code: &str,
    solution: &Solution,
    config: &SolverConfig,
) -> io::Result<()> {
    use std::fmt::Write as _;

    let mut out = String::new();
    let total_dist = solution.total_distance();
    let mean_load = solution.mean_load_rate();

    let _ = writeln!(out, "==================================================");
    let _ = writeln!(out, "       SOLUTION REPORT: {}", estimate_code);
    let _ = writeln!(out, "==================================================\n");
    let _ = writeln!(out, "Global Metrics:");
    let _ = writeln!(out, "  - Vehicles Used:    {}", solution.routes().len());
    let _ = writeln!(out, "  - Objective Cost:   {:.2}", solution.objective(config));
    let _ = writeln!(out, "  - Total Distance:   {:.2} m", total_dist);
    let _ = writeln!(out, "  - Avg Volume Util:  {:.2}%\n", mean_load * 100.0);

    for (idx, route) in solution.routes().iter().enumerate() {
        let vehicle = route.vehicle();
        let loaded_weight = route.load().total_weight();
        let stops: Vec<&str> = route
            .sequence()
            .iter()
            .map(|n| n.platform_code())
            .collect();

        let _ = writeln!(out, "Vehicle #{} (Type: {})", idx + 1, vehicle.code());
        let _ = writeln!(out, "--------------------------------------------------");
        let _ = writeln!(out, "  Route:      {}", stops.join(" -> "));
        let _ = writeln!(out, "  Distance:   {:.2}", route.dist_cost());
        let _ = writeln!(out, "  Load:       {} items", route.placements().len());
        let _ = writeln!(
            out,
            "  Volume:     {:.3} m^3 / {:.3} m^3 ({:.2}%)",
            route.load().total_volume() / 1e9,
            vehicle.volume() / 1e9,
            route.load_rate() * 100.0
        );
        let _ = writeln!(
            out,
            "  Weight:     {:.2} kg / {:.2} kg ({:.2}%)\n",
            loaded_weight,
            vehicle.max_weight(),
            loaded_weight / vehicle.max_weight() * 100.0
        );
    }

    std::fs::write(path, out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::sync::Arc;
    use u_loading_core::{Item, Node, VehicleType};
    use u_loading_routing::{DistanceMatrix, FleetManager};

    fn solved_single_stop() -> Solution {
        let mut m = DistanceMatrix::new(3);
        m.set(0, 1, 100.0);
        m.set(1, 2, 100.0);
        let fleet = FleetManager::new(
            vec![VehicleType::new("CT10", 10.0, 10.0, 10.0, 100.0)],
            m,
            SolverConfig::default(),
        );

        let start = Arc::new(Node::depot(0, "start_point"));
        let end = Arc::new(Node::depot(2, "end_point"));
        let node = Arc::new(Node::customer(
            1,
            "P01",
            false,
            vec![Arc::new(Item::new("B1", 4.0, 2.0, 1.0, 3.5))],
        ));

        let route = fleet
            .find_best_vehicle(&[start.clone(), node, end.clone()])
            .expect("feasible");
        let mut sol = Solution::new(start, end);
        sol.push_route(route);
        sol
    }

    #[test]
    fn test_result_shape() {
        let sol = solved_single_stop();
        let file = build_result("demo", &sol);

        assert_eq!(file.estimate_code, "demo");
        assert_eq!(file.solution_array.len(), 1);
        let vehicle = &file.solution_array[0][0];
        assert_eq!(vehicle.truck_type_code, "CT10");
        assert_eq!(vehicle.piece, 1);
        assert_eq!(vehicle.platform_array, vec!["P01".to_string()]);
        assert_relative_eq!(vehicle.volume, 8.0, epsilon = 1e-9);
        assert_relative_eq!(vehicle.weight, 3.5, epsilon = 1e-9);
    }

    #[test]
    fn test_center_relative_axis_mapping() {
        let sol = solved_single_stop();
        let file = build_result("demo", &sol);
        let spu = &file.solution_array[0][0].spu_array[0];

        // The box packs at the origin corner in some orientation; its
        // center must therefore sit at (side/2 - interior/2) on each
        // mapped axis.
        assert_relative_eq!(spu.z, spu.length / 2.0 - 5.0, epsilon = 1e-9);
        assert_relative_eq!(spu.x, spu.width / 2.0 - 5.0, epsilon = 1e-9);
        assert_relative_eq!(spu.y, spu.height / 2.0 - 5.0, epsilon = 1e-9);
        assert_eq!(spu.order, 1);
    }

    #[test]
    fn test_direction_codes() {
        let item = Arc::new(Item::new("X", 4.0, 2.0, 1.0, 1.0));
        let cases = [
            ((4.0, 2.0, 1.0), 100),
            ((2.0, 4.0, 1.0), 200),
            ((4.0, 1.0, 2.0), 300),
            ((1.0, 4.0, 2.0), 400),
            ((2.0, 1.0, 4.0), 500),
            ((1.0, 2.0, 4.0), 600),
        ];
        for ((lx, ly, lz), expected) in cases {
            let p = PackedItem::new(item.clone(), 0.0, 0.0, 0.0, lx, ly, lz);
            assert_eq!(direction_code(&p), expected, "dims ({},{},{})", lx, ly, lz);
        }
    }

    #[test]
    fn test_reconstructed_aabbs_disjoint() {
        // Pack several boxes, rebuild corner AABBs from the serialized
        // center coordinates, and check pairwise disjointness.
        let mut m = DistanceMatrix::new(3);
        m.set(0, 1, 10.0);
        m.set(1, 2, 10.0);
        let fleet = FleetManager::new(
            vec![VehicleType::new("CT", 20.0, 12.0, 12.0, 100.0)],
            m,
            SolverConfig::default(),
        );
        let start = Arc::new(Node::depot(0, "start_point"));
        let end = Arc::new(Node::depot(2, "end_point"));
        let node = Arc::new(Node::customer(
            1,
            "P01",
            false,
            vec![
                Arc::new(Item::new("A", 8.0, 6.0, 4.0, 1.0)),
                Arc::new(Item::new("B", 6.0, 6.0, 6.0, 1.0)),
                Arc::new(Item::new("C", 4.0, 4.0, 4.0, 1.0)),
            ],
        ));
        let route = fleet
            .find_best_vehicle(&[start.clone(), node, end.clone()])
            .expect("feasible");
        let mut sol = Solution::new(start, end);
        sol.push_route(route);

        let file = build_result("demo", &sol);
        let spus = &file.solution_array[0][0].spu_array;
        assert_eq!(spus.len(), 3);

        let eps = 1e-5;
        let boxes: Vec<(f64, f64, f64, f64, f64, f64)> = spus
            .iter()
            .map(|s| {
                (
                    s.x - s.width / 2.0,
                    s.y - s.height / 2.0,
                    s.z - s.length / 2.0,
                    s.x + s.width / 2.0,
                    s.y + s.height / 2.0,
                    s.z + s.length / 2.0,
                )
            })
            .collect();

        for (i, a) in boxes.iter().enumerate() {
            for b in boxes.iter().skip(i + 1) {
                let overlap = a.3 > b.0 + eps
                    && a.0 < b.3 - eps
                    && a.4 > b.1 + eps
                    && a.1 < b.4 - eps
                    && a.5 > b.2 + eps
                    && a.2 < b.5 - eps;
                assert!(!overlap, "reconstructed boxes {:?} and {:?} overlap", a, b);
            }
        }
    }
}
