//! Objective selection and route-metric accumulation.
//!
//! Grounded on the teacher's `evaluation/fitness.rs` `find_distance` idiom
//! (walk a stop sequence, sum leg lengths against a matrix) generalized to
//! the three VRPPD objectives and to empty/price accounting.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Objective {
    Distance,
    Price,
    Empty,
}

impl Objective {
    pub fn value_of(self, totals: &RouteTotals) -> f64 {
        match self {
            Objective::Distance => totals.total_distance,
            Objective::Price => totals.total_price,
            Objective::Empty => totals.empty_distance,
        }
    }
}

/// The triple an evaluated route (or whole solution) accumulates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RouteTotals {
    pub total_distance: f64,
    pub empty_distance: f64,
    pub total_price: f64,
}

impl RouteTotals {
    pub fn is_dominated_by_or_equal(&self, other: &RouteTotals) -> bool {
        self.total_distance >= other.total_distance
            && self.total_price >= other.total_price
            && self.empty_distance >= other.empty_distance
    }

    pub fn add(&mut self, other: &RouteTotals) {
        self.total_distance += other.total_distance;
        self.empty_distance += other.empty_distance;
        self.total_price += other.total_price;
    }
}
