//! The mutable solution representation PSA operators work over: a
//! vehicle -> stop-sequence map, cheap to clone and recompute.
//!
//! Grounded on the teacher's `solver/tabu_search/neighborhood.rs` pattern
//! of keeping a lightweight move-friendly representation separate from the
//! reported `ProblemSolution`, recomputing the latter only when needed.
//! Stops are kept in full (not collapsed to an order-visit sequence) so
//! SHIFT can interleave a pickup/delivery pair with other orders' stops,
//! per §4.4.

use std::collections::{HashMap, HashSet};

use crate::context::SolveContext;
use crate::domain::solution::aggregate;
use crate::domain::types::{ProblemSolution, RouteStop, VehicleRoute};
use crate::evaluation::feasibility::simulate_route;
use crate::evaluation::metrics::{Objective, RouteTotals};

#[derive(Debug, Clone)]
pub struct State {
    pub stops: HashMap<u32, Vec<RouteStop>>,
}

impl State {
    pub fn from_solution(ctx: &SolveContext, solution: &ProblemSolution) -> Self {
        let stops = ctx
            .problem
            .vehicles
            .iter()
            .map(|vehicle| {
                let route_stops = solution
                    .routes
                    .get(&vehicle.id)
                    .map(|r| r.stops.clone())
                    .unwrap_or_default();
                (vehicle.id, route_stops)
            })
            .collect();
        Self { stops }
    }

    #[allow(dead_code)]
    pub fn unassigned(&self, ctx: &SolveContext) -> Vec<u32> {
        let assigned: HashSet<u32> = self
            .stops
            .values()
            .flatten()
            .map(|stop| stop.order_id)
            .collect();
        ctx.problem
            .orders
            .iter()
            .map(|o| o.id)
            .filter(|id| !assigned.contains(id))
            .collect()
    }

    /// Recompute every vehicle's route from its stop sequence and fold
    /// into a `ProblemSolution`. `None` if any vehicle's sequence is
    /// infeasible.
    pub fn to_solution(&self, ctx: &SolveContext) -> Option<ProblemSolution> {
        let mut routes = HashMap::new();
        for (vehicle_index, vehicle) in ctx.problem.vehicles.iter().enumerate() {
            let stops = self.stops.get(&vehicle.id).cloned().unwrap_or_default();
            if stops.is_empty() {
                continue;
            }
            let totals = simulate_route(ctx, vehicle, vehicle_index, &stops, true).ok()?;
            routes.insert(
                vehicle.id,
                VehicleRoute {
                    stops,
                    total_distance: totals.total_distance,
                    empty_distance: totals.empty_distance,
                    total_price: totals.total_price,
                },
            );
        }
        Some(aggregate(routes))
    }

    /// Energy for `objective`, or `+inf` if infeasible.
    pub fn energy(&self, ctx: &SolveContext, objective: Objective) -> f64 {
        match self.to_solution(ctx) {
            Some(solution) => objective.value_of(&RouteTotals {
                total_distance: solution.total_distance,
                empty_distance: solution.empty_distance,
                total_price: solution.total_price,
            }),
            None => f64::INFINITY,
        }
    }
}
