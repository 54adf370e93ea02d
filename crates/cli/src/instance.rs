//! Instance file parsing.

use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use u_loading_core::{Error as CoreError, Item, Node, VehicleType};
use u_loading_routing::DistanceMatrix;

/// Reserved platform code of the virtual start depot.
pub const START_POINT: &str = "start_point";
/// Reserved platform code of the virtual end depot.
pub const END_POINT: &str = "end_point";

/// Errors that can occur when loading an instance file.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Invalid(#[from] CoreError),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawInstance {
    algorithm_base_param_dto: RawBaseParam,
    #[serde(default)]
    boxes: Vec<RawBox>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawBaseParam {
    truck_type_dto_list: Vec<RawTruckType>,
    platform_dto_list: Vec<RawPlatform>,
    #[serde(default)]
    distance_map: HashMap<String, f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTruckType {
    truck_type_code: String,
    length: f64,
    width: f64,
    height: f64,
    max_load: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPlatform {
    platform_code: String,
    #[serde(default)]
    must_first: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawBox {
    spu_box_id: String,
    platform_code: String,
    length: f64,
    width: f64,
    height: f64,
    weight: f64,
}

/// A fully validated problem instance.
///
/// Nodes are laid out as `[start depot, customers.., end depot]` with
/// ids equal to their index, matching the distance matrix.
#[derive(Debug, Clone)]
pub struct Instance {
    name: String,
    nodes: Vec<Arc<Node>>,
    vehicle_types: Vec<VehicleType>,
    distances: DistanceMatrix,
}

impl Instance {
    /// Returns the instance name (the `estimateCode` of its results).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns all nodes: start depot, customers, end depot.
    pub fn nodes(&self) -> &[Arc<Node>] {
        &self.nodes
    }

    /// Returns the start depot.
    pub fn start(&self) -> &Arc<Node> {
        &self.nodes[0]
    }

    /// Returns the end depot.
    pub fn end(&self) -> &Arc<Node> {
        &self.nodes[self.nodes.len() - 1]
    }

    /// Returns the customer nodes.
    pub fn customers(&self) -> &[Arc<Node>] {
        &self.nodes[1..self.nodes.len() - 1]
    }

    /// Returns the vehicle catalog as listed in the file.
    pub fn vehicle_types(&self) -> &[VehicleType] {
        &self.vehicle_types
    }

    /// Returns the distance matrix.
    pub fn distances(&self) -> &DistanceMatrix {
        &self.distances
    }
}

/// Loads and validates an instance file. The file stem becomes the
/// instance name.
pub fn load_instance(path: impl AsRef<Path>) -> Result<Instance, ParseError> {
    let path = path.as_ref();
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "instance".to_string());
    let content = std::fs::read_to_string(path)?;
    parse_instance(&name, &content)
}

/// Parses and validates an instance from a JSON string.
pub fn parse_instance(name: &str, json: &str) -> Result<Instance, ParseError> {
    let raw: RawInstance = serde_json::from_str(json)?;
    build_instance(name, raw)
}

fn build_instance(name: &str, raw: RawInstance) -> Result<Instance, ParseError> {
    // 1. Vehicle catalog.
    let mut vehicle_types = Vec::with_capacity(raw.algorithm_base_param_dto.truck_type_dto_list.len());
    for truck in &raw.algorithm_base_param_dto.truck_type_dto_list {
        let vehicle = VehicleType::new(
            truck.truck_type_code.clone(),
            truck.length,
            truck.width,
            truck.height,
            truck.max_load,
        );
        vehicle.validate()?;
        vehicle_types.push(vehicle);
    }
    if vehicle_types.is_empty() {
        return Err(CoreError::InvalidInstance("no vehicle types".into()).into());
    }

    // 2. Items grouped by platform.
    let mut items_by_platform: HashMap<String, Vec<Arc<Item>>> = HashMap::new();
    for b in &raw.boxes {
        if b.length <= 0.0 || b.width <= 0.0 || b.height <= 0.0 {
            return Err(CoreError::InvalidGeometry(format!(
                "box '{}' has non-positive dimensions",
                b.spu_box_id
            ))
            .into());
        }
        if b.weight < 0.0 {
            return Err(CoreError::InvalidGeometry(format!(
                "box '{}' has negative weight",
                b.spu_box_id
            ))
            .into());
        }
        items_by_platform
            .entry(b.platform_code.clone())
            .or_default()
            .push(Arc::new(Item::new(
                b.spu_box_id.clone(),
                b.length,
                b.width,
                b.height,
                b.weight,
            )));
    }

    // 3. Nodes: start depot, customers in file order, end depot.
    let platforms = &raw.algorithm_base_param_dto.platform_dto_list;
    let mut nodes: Vec<Arc<Node>> = Vec::with_capacity(platforms.len() + 2);
    let mut node_ids: HashMap<String, usize> = HashMap::new();

    nodes.push(Arc::new(Node::depot(0, START_POINT)));
    node_ids.insert(START_POINT.to_string(), 0);

    for (i, platform) in platforms.iter().enumerate() {
        let id = i + 1;
        let items = items_by_platform
            .remove(&platform.platform_code)
            .unwrap_or_default();
        nodes.push(Arc::new(Node::customer(
            id,
            platform.platform_code.clone(),
            platform.must_first,
            items,
        )));
        node_ids.insert(platform.platform_code.clone(), id);
    }

    let end_id = nodes.len();
    nodes.push(Arc::new(Node::depot(end_id, END_POINT)));
    node_ids.insert(END_POINT.to_string(), end_id);

    // Boxes naming a platform absent from the platform list are fatal.
    if let Some(orphan) = items_by_platform.keys().next() {
        return Err(CoreError::UnknownPlatform(orphan.clone()).into());
    }

    // 4. Distance matrix: +inf default, zero diagonal, "A+B" entries.
    let mut distances = DistanceMatrix::new(nodes.len());
    for (key, &meters) in &raw.algorithm_base_param_dto.distance_map {
        let Some((from_code, to_code)) = key.split_once('+') else {
            return Err(
                CoreError::InvalidInstance(format!("malformed distance key '{}'", key)).into(),
            );
        };
        let from = *node_ids
            .get(from_code)
            .ok_or_else(|| CoreError::UnknownPlatform(from_code.to_string()))?;
        let to = *node_ids
            .get(to_code)
            .ok_or_else(|| CoreError::UnknownPlatform(to_code.to_string()))?;
        if meters < 0.0 {
            return Err(
                CoreError::InvalidInstance(format!("negative distance for '{}'", key)).into(),
            );
        }
        distances.set(from, to, meters);
    }

    Ok(Instance {
        name: name.to_string(),
        nodes,
        vehicle_types,
        distances,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample_json() -> String {
        r#"{
            "algorithmBaseParamDto": {
                "truckTypeDtoList": [
                    {"truckTypeCode": "CT10", "length": 4000, "width": 2000, "height": 2000, "maxLoad": 5000}
                ],
                "platformDtoList": [
                    {"platformCode": "P01", "mustFirst": true},
                    {"platformCode": "P02"}
                ],
                "distanceMap": {
                    "start_point+P01": 1200.0,
                    "P01+P02": 800.0,
                    "P02+end_point": 950.0
                }
            },
            "boxes": [
                {"spuBoxId": "B1", "platformCode": "P01", "length": 600, "width": 400, "height": 300, "weight": 12.0},
                {"spuBoxId": "B2", "platformCode": "P02", "length": 500, "width": 400, "height": 300, "weight": 8.0}
            ]
        }"#
        .to_string()
    }

    #[test]
    fn test_parse_sample() {
        let instance = parse_instance("demo", &sample_json()).expect("parses");

        assert_eq!(instance.name(), "demo");
        assert_eq!(instance.customers().len(), 2);
        assert_eq!(instance.vehicle_types().len(), 1);

        let p01 = &instance.customers()[0];
        assert_eq!(p01.platform_code(), "P01");
        assert!(p01.is_bonded());
        assert_eq!(p01.items().len(), 1);

        assert!(instance.start().is_depot());
        assert!(instance.end().is_depot());
        assert_eq!(instance.start().id(), 0);
        assert_eq!(instance.end().id(), 3);
    }

    #[test]
    fn test_distance_matrix_wiring() {
        let instance = parse_instance("demo", &sample_json()).expect("parses");
        let d = instance.distances();

        assert_relative_eq!(d.get(0, 1), 1200.0, epsilon = 1e-9);
        assert_relative_eq!(d.get(1, 2), 800.0, epsilon = 1e-9);
        assert_relative_eq!(d.get(2, 3), 950.0, epsilon = 1e-9);
        assert_eq!(d.get(2, 2), 0.0);
        // Unlisted pair stays unreachable.
        assert!(d.get(1, 3).is_infinite());
    }

    #[test]
    fn test_unknown_platform_in_distance_map_fatal() {
        let json = sample_json().replace("P01+P02", "P01+P99");
        let err = parse_instance("demo", &json).unwrap_err();
        assert!(matches!(
            err,
            ParseError::Invalid(CoreError::UnknownPlatform(_))
        ));
    }

    #[test]
    fn test_negative_dimension_fatal() {
        let json = sample_json().replace(
            r#""length": 600"#,
            r#""length": -600"#,
        );
        let err = parse_instance("demo", &json).unwrap_err();
        assert!(matches!(
            err,
            ParseError::Invalid(CoreError::InvalidGeometry(_))
        ));
    }

    #[test]
    fn test_orphan_box_platform_fatal() {
        let json = sample_json().replace(
            r#""platformCode": "P02", "length": 500"#,
            r#""platformCode": "P77", "length": 500"#,
        );
        let err = parse_instance("demo", &json).unwrap_err();
        assert!(matches!(
            err,
            ParseError::Invalid(CoreError::UnknownPlatform(_))
        ));
    }

    #[test]
    fn test_malformed_json_fatal() {
        assert!(matches!(
            parse_instance("demo", "{").unwrap_err(),
            ParseError::Json(_)
        ));
    }
}
