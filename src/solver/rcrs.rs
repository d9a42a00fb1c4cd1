//! Randomized Cheapest-Route-Insertion: a greedy constructive initializer
//! used both standalone (as a fast heuristic) and to seed PSA's initial
//! population, per §4.2.
//!
//! Grounded on the teacher's `solver/tabu_search/repair.rs` insertion-cost
//! idiom (evaluate every slot, keep the cheapest, reject anything
//! infeasible) generalized from single-stop capacity repair to paired
//! pickup/delivery slot search across all three objectives.

use std::collections::HashMap;

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::instrument;

use crate::config::constant::EMPTY_BIAS_WEIGHT;
use crate::context::SolveContext;
use crate::domain::solution::aggregate;
use crate::domain::types::{Order, ProblemSolution, RouteStop, StopType, Vehicle, VehicleRoute};
use crate::evaluation::feasibility::simulate_route;
use crate::evaluation::metrics::Objective;

struct Slot {
    vehicle_index: usize,
    pickup_at: usize,
    delivery_at: usize,
    cost: f64,
}

fn insert_at(stops: &[RouteStop], pickup_at: usize, delivery_at: usize, order: &Order) -> Vec<RouteStop> {
    let mut next = stops.to_vec();
    next.insert(
        pickup_at,
        RouteStop {
            order_id: order.id,
            stop_type: StopType::Pickup,
        },
    );
    next.insert(
        delivery_at,
        RouteStop {
            order_id: order.id,
            stop_type: StopType::Delivery,
        },
    );
    next
}

#[derive(Clone, Copy)]
struct InsertionSite<'a> {
    vehicle: &'a Vehicle,
    vehicle_index: usize,
    base_stops: &'a [RouteStop],
    order: &'a Order,
    order_index: usize,
    pickup_at: usize,
    delivery_at: usize,
}

/// Cost of inserting `site.order` at `site`'s (pickup, delivery) slot, for
/// `objective`. Returns `None` if the resulting route is infeasible.
fn insertion_cost(ctx: &SolveContext, site: &InsertionSite, objective: Objective) -> Option<f64> {
    let InsertionSite {
        vehicle,
        vehicle_index,
        base_stops,
        order,
        order_index,
        pickup_at,
        delivery_at,
    } = *site;
    let before = simulate_route(ctx, vehicle, vehicle_index, base_stops, true).ok()?;
    let candidate_stops = insert_at(base_stops, pickup_at, delivery_at, order);
    let after = simulate_route(ctx, vehicle, vehicle_index, &candidate_stops, true).ok()?;

    Some(match objective {
        Objective::Distance => after.total_distance - before.total_distance,
        Objective::Price => (after.total_distance - before.total_distance) * vehicle.price_km,
        Objective::Empty => {
            (after.empty_distance - before.empty_distance)
                + EMPTY_BIAS_WEIGHT * ctx.s.get(vehicle_index, order_index)
        }
    })
}

/// Build a solution for `objective` by shuffling the order list with `rng`
/// and greedily inserting each order at its cheapest feasible slot across
/// every vehicle. Orders with no feasible slot anywhere are left
/// unassigned.
#[instrument(skip(ctx, rng), fields(orders = ctx.problem.num_orders(), ?objective))]
pub fn build_solution(
    ctx: &SolveContext,
    objective: Objective,
    rng: &mut impl Rng,
) -> ProblemSolution {
    let mut order_ids: Vec<u32> = ctx.problem.orders.iter().map(|o| o.id).collect();
    order_ids.shuffle(rng);

    let mut routes: HashMap<u32, VehicleRoute> = ctx
        .problem
        .vehicles
        .iter()
        .map(|v| (v.id, VehicleRoute::empty()))
        .collect();

    for order_id in order_ids {
        let order_index = ctx.order_index(order_id);
        let order = &ctx.problem.orders[order_index];

        let mut best: Option<Slot> = None;
        for (vehicle_index, vehicle) in ctx.problem.vehicles.iter().enumerate() {
            let base_stops = &routes[&vehicle.id].stops;
            let n = base_stops.len();
            for pickup_at in 0..=n {
                for delivery_at in pickup_at + 1..=n + 1 {
                    let site = InsertionSite {
                        vehicle,
                        vehicle_index,
                        base_stops,
                        order,
                        order_index,
                        pickup_at,
                        delivery_at,
                    };
                    let cost = insertion_cost(ctx, &site, objective);
                    if let Some(cost) = cost {
                        if best.as_ref().is_none_or(|s| cost < s.cost) {
                            best = Some(Slot {
                                vehicle_index,
                                pickup_at,
                                delivery_at,
                                cost,
                            });
                        }
                    }
                }
            }
        }

        if let Some(slot) = best {
            let vehicle = &ctx.problem.vehicles[slot.vehicle_index];
            let base_stops = routes[&vehicle.id].stops.clone();
            let new_stops = insert_at(&base_stops, slot.pickup_at, slot.delivery_at, order);
            let totals = simulate_route(ctx, vehicle, slot.vehicle_index, &new_stops, true)
                .expect("slot was validated feasible during search");
            routes.insert(
                vehicle.id,
                VehicleRoute {
                    stops: new_stops,
                    total_distance: totals.total_distance,
                    empty_distance: totals.empty_distance,
                    total_price: totals.total_price,
                },
            );
        }
    }

    routes.retain(|_, route| !route.is_empty());
    aggregate(routes)
}
