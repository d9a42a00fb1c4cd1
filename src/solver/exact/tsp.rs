//! Held-Karp-style memoized routing subsolver: for a fixed vehicle and a
//! fixed subset of orders, find the pickup/delivery ordering minimizing
//! each of the three objectives simultaneously.
//!
//! Grounded on `other_examples`' PD-TSP family
//! (`harborgrid-justin-esxi…optimization-tsp.rs` for the solver-as-struct
//! shape, the `Elta305…pd-tsp-solver` construction heuristics for the
//! pickup-before-delivery bitmask discipline) — the literal bitmask
//! recursion here is new, since none of the pack's examples implement exact
//! enumeration at this granularity, grounded instead directly on spec's
//! described `(lastNode, dist, empty, price, load, stops, pickedMask,
//! deliveredMask)` recursion.

use crate::config::constant::{LOAD_CAPACITY, LOAD_EPSILON};
use crate::context::SolveContext;
use crate::domain::types::{RouteStop, StopType, Vehicle};
use crate::evaluation::metrics::RouteTotals;

#[derive(Debug, Clone)]
pub struct TspCandidate {
    pub totals: RouteTotals,
    pub stops: Vec<RouteStop>,
}

/// The three best routes found for one (vehicle, order subset) pair.
#[derive(Debug, Clone)]
pub struct TspResult {
    pub min_distance: TspCandidate,
    pub min_price: TspCandidate,
    pub min_empty: TspCandidate,
}

struct Search<'a> {
    ctx: &'a SolveContext<'a>,
    vehicle: &'a Vehicle,
    vehicle_index: usize,
    /// Global order indices participating in this subset, in bit-position
    /// order: bit `i` of `picked`/`delivered` refers to `members[i]`.
    members: Vec<usize>,
    target_mask: u16,
    best_distance: Option<TspCandidate>,
    best_price: Option<TspCandidate>,
    best_empty: Option<TspCandidate>,
}

impl<'a> Search<'a> {
    fn maybe_prune(&self, totals: &RouteTotals) -> bool {
        let dist_bound = self
            .best_distance
            .as_ref()
            .map_or(f64::INFINITY, |c| c.totals.total_distance);
        let price_bound = self
            .best_price
            .as_ref()
            .map_or(f64::INFINITY, |c| c.totals.total_price);
        let empty_bound = self
            .best_empty
            .as_ref()
            .map_or(f64::INFINITY, |c| c.totals.empty_distance);

        totals.total_distance >= dist_bound
            && totals.total_price >= price_bound
            && totals.empty_distance >= empty_bound
    }

    fn consider_completion(&mut self, totals: RouteTotals, stops: &[RouteStop]) {
        if totals.total_distance > self.ctx.problem.constraints.max_total_distance {
            return;
        }

        if self
            .best_distance
            .as_ref()
            .is_none_or(|c| totals.total_distance < c.totals.total_distance)
        {
            self.best_distance = Some(TspCandidate {
                totals,
                stops: stops.to_vec(),
            });
        }
        if self
            .best_price
            .as_ref()
            .is_none_or(|c| totals.total_price < c.totals.total_price)
        {
            self.best_price = Some(TspCandidate {
                totals,
                stops: stops.to_vec(),
            });
        }
        if self
            .best_empty
            .as_ref()
            .is_none_or(|c| totals.empty_distance < c.totals.empty_distance)
        {
            self.best_empty = Some(TspCandidate {
                totals,
                stops: stops.to_vec(),
            });
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn recurse(
        &mut self,
        last_node: Option<usize>,
        totals: RouteTotals,
        load: f64,
        stops: &mut Vec<RouteStop>,
        picked: u16,
        delivered: u16,
    ) {
        if self.maybe_prune(&totals) {
            return;
        }

        if delivered == self.target_mask {
            self.consider_completion(totals, stops);
            return;
        }

        for i in 0..self.members.len() {
            let bit = 1u16 << i;
            let order_idx = self.members[i];
            let order = &self.ctx.problem.orders[order_idx];

            if picked & bit == 0 {
                let new_load = load + order.load();
                if new_load > LOAD_CAPACITY + LOAD_EPSILON {
                    continue;
                }
                let node = order_idx * 2;
                let leg = match last_node {
                    None => self.ctx.s.get(self.vehicle_index, order_idx),
                    Some(from) => self.ctx.d.get(from, node),
                };
                let leg_is_empty = picked == delivered;

                let mut next_totals = totals;
                next_totals.total_distance += leg;
                next_totals.total_price += leg * self.vehicle.price_km;
                if leg_is_empty {
                    next_totals.empty_distance += leg;
                }

                stops.push(RouteStop {
                    order_id: order.id,
                    stop_type: StopType::Pickup,
                });
                self.recurse(
                    Some(node),
                    next_totals,
                    new_load,
                    stops,
                    picked | bit,
                    delivered,
                );
                stops.pop();
            } else if delivered & bit == 0 {
                let node = order_idx * 2 + 1;
                let from = last_node.expect("a pickup must precede any delivery");
                let leg = self.ctx.d.get(from, node);

                let mut next_totals = totals;
                next_totals.total_distance += leg;
                next_totals.total_price += leg * self.vehicle.price_km;

                stops.push(RouteStop {
                    order_id: order.id,
                    stop_type: StopType::Delivery,
                });
                self.recurse(
                    Some(node),
                    next_totals,
                    load - order.load(),
                    stops,
                    picked,
                    delivered | bit,
                );
                stops.pop();
            }
        }
    }
}

/// Solve the inner TSP for `vehicle` carrying exactly the orders in
/// `members` (global order indices). Returns `None` if no ordering
/// satisfies capacity and `maxTotalDistance` for every prefix/completion.
pub fn solve_tsp(
    ctx: &SolveContext,
    vehicle_index: usize,
    members: Vec<usize>,
) -> Option<TspResult> {
    debug_assert!(!members.is_empty());
    let vehicle = &ctx.problem.vehicles[vehicle_index];
    let target_mask = (1u16 << members.len()) - 1;

    let mut search = Search {
        ctx,
        vehicle,
        vehicle_index,
        members,
        target_mask,
        best_distance: None,
        best_price: None,
        best_empty: None,
    };

    let mut stops = Vec::new();
    search.recurse(None, RouteTotals::default(), 0.0, &mut stops, 0, 0);

    match (search.best_distance, search.best_price, search.best_empty) {
        (Some(min_distance), Some(min_price), Some(min_empty)) => Some(TspResult {
            min_distance,
            min_price,
            min_empty,
        }),
        _ => None,
    }
}
