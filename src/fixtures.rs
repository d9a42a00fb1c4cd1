//! Deterministic synthetic problem generation for the bench binary and
//! tests, replacing the teacher's CSV/postal-code loader with a seeded
//! random generator since no external location dataset is part of this
//! crate's scope.
//!
//! Grounded on the teacher's `fixtures/data_generator.rs` shape (seeded
//! `ChaCha8Rng`, a bounding region, building up a fixed-size fleet and
//! order list) with the postal-lookup machinery replaced by plain
//! coordinates.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::domain::types::{Constraints, Location, Order, Problem, Vehicle};

/// Generates a `Problem` with `num_vehicles` vehicles and `num_orders`
/// orders, all within a `span`-kilometer-wide square centered on the
/// origin, using `rng` for every random draw so a given seed always
/// reproduces the same problem.
pub fn random_problem(
    num_vehicles: usize,
    num_orders: usize,
    span: f64,
    rng: &mut ChaCha8Rng,
) -> Problem {
    let half = span / 2.0;
    let coord = |rng: &mut ChaCha8Rng| rng.gen_range(-half..=half);

    let vehicles = (0..num_vehicles)
        .map(|id| Vehicle {
            id: id as u32,
            start: Location::new(coord(rng), coord(rng)),
            price_km: rng.gen_range(0.8..1.5),
        })
        .collect();

    let orders = (0..num_orders)
        .map(|id| Order {
            id: id as u32,
            pickup: Location::new(coord(rng), coord(rng)),
            delivery: Location::new(coord(rng), coord(rng)),
            load_factor: rng.gen_range(1.0..4.0),
        })
        .collect();

    Problem {
        vehicles,
        orders,
        constraints: Constraints {
            max_total_distance: span * num_orders.max(1) as f64,
        },
    }
}
