//! The constraint evaluator: walks a candidate stop sequence and computes
//! `(totalDistance, emptyDistance, totalPrice)`, or reports why it's
//! infeasible.
//!
//! This is the single simulator shared by RCRS insertion costing, the PSA
//! neighborhood operators' full-route recompute, and the exact solver's
//! final feasibility check — grounded on the teacher's `evaluation/penalty.rs`
//! accumulate-then-compare idiom, generalized from capacity-only to the
//! pickup/delivery load + `maxTotalDistance` rules in §3/§4.1.

use crate::config::constant::{EMPTY_THRESHOLD, LOAD_CAPACITY, LOAD_EPSILON};
use crate::context::SolveContext;
use crate::domain::types::{RouteStop, StopType, Vehicle};
use crate::evaluation::metrics::RouteTotals;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Infeasible {
    CapacityExceeded,
    DeliveryBeforePickup,
    MaxTotalDistanceExceeded,
}

/// Simulate `vehicle` driving `stops` in order, starting and ending unladen.
///
/// Returns the accumulated totals, or `Infeasible` at the first violated
/// constraint. `enforce_max_distance` lets callers that only care about
/// capacity (e.g. a mid-search partial route) skip the
/// `maxTotalDistance` check; RCRS and PSA's full-route recompute always
/// enforce it, per the spec's decision to apply `maxTotalDistance`
/// identically wherever the feasibility simulator runs.
pub fn simulate_route(
    ctx: &SolveContext,
    vehicle: &Vehicle,
    vehicle_index: usize,
    stops: &[RouteStop],
    enforce_max_distance: bool,
) -> Result<RouteTotals, Infeasible> {
    let mut totals = RouteTotals::default();
    let mut running_load = 0.0_f64;
    let mut last_node: Option<usize> = None;
    let mut picked = std::collections::HashSet::new();

    for stop in stops {
        let order_idx = ctx.order_index(stop.order_id);
        let node = order_idx * 2 + if stop.stop_type == StopType::Delivery { 1 } else { 0 };

        let leg = match last_node {
            None => ctx.s.get(vehicle_index, order_idx),
            Some(from) => ctx.d.get(from, node),
        };
        let leg_is_empty = running_load < EMPTY_THRESHOLD;

        totals.total_distance += leg;
        totals.total_price += leg * vehicle.price_km;
        if leg_is_empty {
            totals.empty_distance += leg;
        }

        match stop.stop_type {
            StopType::Pickup => {
                picked.insert(stop.order_id);
                running_load += ctx.problem.orders[order_idx].load();
                if running_load > LOAD_CAPACITY + LOAD_EPSILON {
                    return Err(Infeasible::CapacityExceeded);
                }
            }
            StopType::Delivery => {
                if !picked.remove(&stop.order_id) {
                    return Err(Infeasible::DeliveryBeforePickup);
                }
                running_load -= ctx.problem.orders[order_idx].load();
            }
        }

        last_node = Some(node);
    }

    if enforce_max_distance && totals.total_distance > ctx.problem.constraints.max_total_distance {
        return Err(Infeasible::MaxTotalDistanceExceeded);
    }

    Ok(totals)
}
