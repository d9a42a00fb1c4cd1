use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A point in space, with a stable hash string identifying the coordinates.
///
/// Immutable after construction; the hash is derived once and never
/// recomputed, so two `Location`s built from the same coordinates always
/// compare equal via `coord_hash`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    coord_hash: String,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            coord_hash: format!("{latitude:.8},{longitude:.8}"),
        }
    }

    pub fn coord_hash(&self) -> &str {
        &self.coord_hash
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: u32,
    pub start: Location,
    pub price_km: f64,
}

impl PartialEq for Vehicle {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: u32,
    pub pickup: Location,
    pub delivery: Location,
    pub load_factor: f64,
}

impl Order {
    /// Normalized load contributed by one unit of this order.
    pub fn load(&self) -> f64 {
        1.0 / self.load_factor
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Constraints {
    pub max_total_distance: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Problem {
    pub vehicles: Vec<Vehicle>,
    pub orders: Vec<Order>,
    pub constraints: Constraints,
}

impl Problem {
    pub fn num_vehicles(&self) -> usize {
        self.vehicles.len()
    }

    pub fn num_orders(&self) -> usize {
        self.orders.len()
    }

    /// Parse a `Problem` from the §6 external-interface JSON shape
    /// (`vehicles`/`orders`/`constraints`).
    pub fn from_json(json: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize this `Problem` back to its §6 JSON shape.
    pub fn to_json(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopType {
    Pickup,
    Delivery,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteStop {
    pub order_id: u32,
    pub stop_type: StopType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VehicleRoute {
    pub stops: Vec<RouteStop>,
    pub total_distance: f64,
    pub empty_distance: f64,
    pub total_price: f64,
}

impl VehicleRoute {
    pub fn empty() -> Self {
        Self {
            stops: Vec::new(),
            total_distance: 0.0,
            empty_distance: 0.0,
            total_price: 0.0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProblemSolution {
    pub routes: HashMap<u32, VehicleRoute>,
    pub total_distance: f64,
    pub empty_distance: f64,
    pub total_price: f64,
}

impl ProblemSolution {
    /// Serialize to the §6 `ProblemSolution` JSON shape
    /// (`routes`/`totalDistance`/`emptyDistance`/`totalPrice`... as the
    /// crate's own field names; no external naming convention is imposed).
    pub fn to_json(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvergencePoint {
    pub time_ms: u64,
    pub iteration: usize,
    pub total_distance: f64,
    pub total_price: f64,
    pub empty_distance: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PsaSolution {
    pub solution: ProblemSolution,
    pub history: Vec<ConvergencePoint>,
}

/// The exact solver's output: three independently optimal solutions, one per
/// objective.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlgorithmSolution {
    pub best_distance: ProblemSolution,
    pub best_price: ProblemSolution,
    pub best_empty: ProblemSolution,
}

impl AlgorithmSolution {
    pub fn to_json(&self) -> crate::error::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
