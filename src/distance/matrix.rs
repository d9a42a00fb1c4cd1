//! Distance matrices built once per `solve` call from an injected distance
//! function.
//!
//! The teacher's `distance/matrix.rs` fetched a distance table from a live
//! HTTP provider (Google/OSRM); that's exactly the kind of external
//! collaborator this spec keeps out of the core. What's kept is the shape:
//! build the table once up front, log its dimensions, and hand callers a
//! read-only matrix.

use tracing::debug;

use crate::domain::types::{Location, Problem};

/// A pure, deterministic distance function: `(from, to) -> kilometers`.
/// Symmetry is not required, only non-negativity.
pub type DistanceFn = dyn Fn(&Location, &Location) -> f64 + Send + Sync;

pub fn euclidean(a: &Location, b: &Location) -> f64 {
    ((a.latitude - b.latitude).powi(2) + (a.longitude - b.longitude).powi(2)).sqrt()
}

/// Great-circle (haversine) distance in kilometers, treating
/// `latitude`/`longitude` as degrees.
pub fn great_circle(a: &Location, b: &Location) -> f64 {
    const EARTH_RADIUS_KM: f64 = 6371.0;

    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlat = (b.latitude - a.latitude).to_radians();
    let dlon = (b.longitude - a.longitude).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

/// `2N x 2N` table over order pickup/delivery nodes. `node(2*o)` is
/// `orders[o].pickup`, `node(2*o+1)` is `orders[o].delivery`.
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    n_orders: usize,
    cells: Vec<f64>,
}

impl DistanceMatrix {
    pub fn build(problem: &Problem, dist: &DistanceFn) -> Self {
        let n = problem.num_orders();
        let dim = 2 * n;
        let mut cells = vec![0.0; dim * dim];

        let node = |k: usize| -> &Location {
            if k.is_multiple_of(2) {
                &problem.orders[k / 2].pickup
            } else {
                &problem.orders[k / 2].delivery
            }
        };

        for i in 0..dim {
            for j in 0..dim {
                cells[i * dim + j] = if i == j { 0.0 } else { dist(node(i), node(j)) };
            }
        }

        debug!("built order distance matrix D ({dim}x{dim})");
        Self { n_orders: n, cells }
    }

    #[inline]
    pub fn get(&self, from_node: usize, to_node: usize) -> f64 {
        let dim = 2 * self.n_orders;
        self.cells[from_node * dim + to_node]
    }
}

/// `V x N` table: `S[v][o]` is the distance from vehicle `v`'s start to
/// order `o`'s pickup.
#[derive(Debug, Clone)]
pub struct VehicleStartMatrix {
    n_orders: usize,
    cells: Vec<f64>,
}

impl VehicleStartMatrix {
    pub fn build(problem: &Problem, dist: &DistanceFn) -> Self {
        let v = problem.num_vehicles();
        let n = problem.num_orders();
        let mut cells = vec![0.0; v * n];

        for (vi, vehicle) in problem.vehicles.iter().enumerate() {
            for (oi, order) in problem.orders.iter().enumerate() {
                cells[vi * n + oi] = dist(&vehicle.start, &order.pickup);
            }
        }

        debug!("built vehicle-start distance matrix S ({v}x{n})");
        Self { n_orders: n, cells }
    }

    #[inline]
    pub fn get(&self, vehicle: usize, order: usize) -> f64 {
        self.cells[vehicle * self.n_orders + order]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn euclidean_matches_pythagoras() {
        let a = Location::new(0.0, 0.0);
        let b = Location::new(3.0, 4.0);
        assert!((euclidean(&a, &b) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn distance_matrix_diagonal_is_zero() {
        let problem = Problem {
            vehicles: vec![],
            orders: vec![crate::domain::types::Order {
                id: 0,
                pickup: Location::new(0.0, 0.0),
                delivery: Location::new(3.0, 4.0),
                load_factor: 1.0,
            }],
            constraints: crate::domain::types::Constraints {
                max_total_distance: 1000.0,
            },
        };
        let d = DistanceMatrix::build(&problem, &euclidean);
        assert_eq!(d.get(0, 0), 0.0);
        assert_eq!(d.get(1, 1), 0.0);
        assert!((d.get(0, 1) - 5.0).abs() < 1e-9);
    }
}
