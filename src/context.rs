//! Bundles a `Problem` with its once-built distance matrices and id→index
//! lookups, matching §3's lifecycle rule: matrices are built once per
//! `solve` call and never mutated.

use std::collections::HashMap;

use crate::distance::{DistanceFn, DistanceMatrix, VehicleStartMatrix};
use crate::domain::types::Problem;

pub struct SolveContext<'a> {
    pub problem: &'a Problem,
    pub d: DistanceMatrix,
    pub s: VehicleStartMatrix,
    order_index: HashMap<u32, usize>,
    vehicle_index: HashMap<u32, usize>,
}

impl<'a> SolveContext<'a> {
    pub fn build(problem: &'a Problem, dist: &DistanceFn) -> Self {
        let d = DistanceMatrix::build(problem, dist);
        let s = VehicleStartMatrix::build(problem, dist);
        let order_index = problem
            .orders
            .iter()
            .enumerate()
            .map(|(i, o)| (o.id, i))
            .collect();
        let vehicle_index = problem
            .vehicles
            .iter()
            .enumerate()
            .map(|(i, v)| (v.id, i))
            .collect();

        Self {
            problem,
            d,
            s,
            order_index,
            vehicle_index,
        }
    }

    pub fn order_index(&self, order_id: u32) -> usize {
        self.order_index[&order_id]
    }

    pub fn vehicle_index(&self, vehicle_id: u32) -> usize {
        self.vehicle_index[&vehicle_id]
    }
}
