//! The three PSA neighborhood operators (§4.4): SHIFT, SWAP, and
//! INTRA-SHUFFLE, each producing one candidate [`State`] from the current
//! one.
//!
//! Grounded on the teacher's `solver/tabu_search/neighborhood.rs` move
//! generators, generalized from single-route capacity moves to
//! cross-vehicle order reassignment.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::OperatorWeights;
use crate::context::SolveContext;
use crate::domain::solution::{order_sequence, stops_for_order_sequence};
use crate::domain::types::{RouteStop, StopType, VehicleRoute};

use super::state::State;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Shift,
    Swap,
    IntraShuffle,
}

pub fn choose(weights: OperatorWeights, rng: &mut impl Rng) -> Operator {
    let total = weights.shift + weights.swap + weights.shuffle;
    let draw = rng.gen::<f64>() * total;
    if draw < weights.shift {
        Operator::Shift
    } else if draw < weights.shift + weights.swap {
        Operator::Swap
    } else {
        Operator::IntraShuffle
    }
}

/// Remove both stops of `order_id` from `stops`, returning the stripped
/// sequence. No-op if the order isn't present.
fn remove_order(stops: &[RouteStop], order_id: u32) -> Vec<RouteStop> {
    stops.iter().filter(|s| s.order_id != order_id).cloned().collect()
}

/// Non-empty vehicle ids currently holding at least one stop.
fn non_empty_vehicles(state: &State) -> Vec<u32> {
    state
        .stops
        .iter()
        .filter(|(_, stops)| !stops.is_empty())
        .map(|(&id, _)| id)
        .collect()
}

/// Remove one order's `(pickup, delivery)` pair from a randomly chosen
/// non-empty vehicle, then re-insert it into a (possibly different)
/// randomly chosen vehicle at independent random pickup/delivery
/// positions `i <= j`, allowing the pair to interleave with whatever
/// stops already occupy that range — exactly the §4.4 SHIFT contract.
pub fn shift(ctx: &SolveContext, state: &State, rng: &mut impl Rng) -> State {
    let mut next = state.clone();
    let source_candidates = non_empty_vehicles(&next);
    let Some(&v1) = source_candidates.choose(rng) else {
        return next;
    };
    let source_stops = &next.stops[&v1];
    let Some(&order_id) = source_stops
        .iter()
        .map(|s| s.order_id)
        .collect::<Vec<_>>()
        .choose(rng)
    else {
        return next;
    };

    let stripped = remove_order(source_stops, order_id);
    next.stops.insert(v1, stripped);

    let Some(&v2) = ctx
        .problem
        .vehicles
        .iter()
        .map(|v| v.id)
        .collect::<Vec<_>>()
        .choose(rng)
    else {
        return next;
    };
    let target = next.stops.entry(v2).or_default();
    let len = target.len();
    let pickup_at = rng.gen_range(0..=len);
    let delivery_at = rng.gen_range(pickup_at + 1..=len + 1);
    target.insert(
        pickup_at,
        RouteStop {
            order_id,
            stop_type: StopType::Pickup,
        },
    );
    target.insert(
        delivery_at,
        RouteStop {
            order_id,
            stop_type: StopType::Delivery,
        },
    );
    next
}

/// Exchange one order between two distinct non-empty vehicles. Each
/// order is removed from its old position and re-appended at the *end*
/// of the other vehicle's stop list as a contiguous `(pickup, delivery)`
/// pair, discarding whatever interleaving it previously had — this is
/// the literal behavior §4.4/§9 specify for parity, even though an
/// insertion at the vacated position would likely anneal faster. Falls
/// back to [`shift`] when fewer than two vehicles currently carry
/// orders.
pub fn swap(ctx: &SolveContext, state: &State, rng: &mut impl Rng) -> State {
    let mut next = state.clone();
    let mut candidates = non_empty_vehicles(&next);
    candidates.shuffle(rng);

    let mut chosen: Option<(u32, u32)> = None;
    for attempt in 0..5.min(candidates.len().max(1)) {
        if candidates.len() < 2 {
            break;
        }
        let v1 = candidates[attempt % candidates.len()];
        let v2 = candidates[(attempt + 1) % candidates.len()];
        if v1 != v2 {
            chosen = Some((v1, v2));
            break;
        }
    }
    let Some((v1, v2)) = chosen else {
        return shift(ctx, &next, rng);
    };

    let Some(&order1) = next.stops[&v1]
        .iter()
        .map(|s| s.order_id)
        .collect::<Vec<_>>()
        .choose(rng)
    else {
        return shift(ctx, &next, rng);
    };
    let Some(&order2) = next.stops[&v2]
        .iter()
        .map(|s| s.order_id)
        .collect::<Vec<_>>()
        .choose(rng)
    else {
        return shift(ctx, &next, rng);
    };

    let v1_stripped = remove_order(&next.stops[&v1], order1);
    let v2_stripped = remove_order(&next.stops[&v2], order2);
    next.stops.insert(v1, v1_stripped);
    next.stops.insert(v2, v2_stripped);

    next.stops.get_mut(&v1).unwrap().push(RouteStop {
        order_id: order2,
        stop_type: StopType::Pickup,
    });
    next.stops.get_mut(&v1).unwrap().push(RouteStop {
        order_id: order2,
        stop_type: StopType::Delivery,
    });
    next.stops.get_mut(&v2).unwrap().push(RouteStop {
        order_id: order1,
        stop_type: StopType::Pickup,
    });
    next.stops.get_mut(&v2).unwrap().push(RouteStop {
        order_id: order1,
        stop_type: StopType::Delivery,
    });
    next
}

/// Pick a vehicle with at least 4 stops (>= 2 orders), shuffle the
/// order-visit sequence, and rewrite the route as the concatenation of
/// `(pickup, delivery)` pairs in the new order — collapsing any prior
/// interleaving, per §4.4's own description of this operator.
pub fn intra_shuffle(_ctx: &SolveContext, state: &State, rng: &mut impl Rng) -> State {
    let mut next = state.clone();
    let candidates: Vec<u32> = next
        .stops
        .iter()
        .filter(|(_, stops)| stops.len() >= 4)
        .map(|(&vehicle_id, _)| vehicle_id)
        .collect();
    let Some(&vehicle_id) = candidates.choose(rng) else {
        return next;
    };
    let route = VehicleRoute {
        stops: next.stops[&vehicle_id].clone(),
        total_distance: 0.0,
        empty_distance: 0.0,
        total_price: 0.0,
    };
    let mut order_ids = order_sequence(&route);
    order_ids.shuffle(rng);
    next.stops.insert(vehicle_id, stops_for_order_sequence(&order_ids));
    next
}

pub fn propose(
    ctx: &SolveContext,
    state: &State,
    weights: OperatorWeights,
    rng: &mut impl Rng,
) -> State {
    match choose(weights, rng) {
        Operator::Shift => shift(ctx, state, rng),
        Operator::Swap => swap(ctx, state, rng),
        Operator::IntraShuffle => intra_shuffle(ctx, state, rng),
    }
}

/// One mutation applied for its own sake (used by the worker's
/// `INFLUENCE_UPDATE` handler to perturb an adopted neighbor so two
/// workers never carry identical state, per §4.4).
pub fn perturb(ctx: &SolveContext, state: &State, weights: OperatorWeights, rng: &mut impl Rng) -> State {
    propose(ctx, state, weights, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::euclidean;
    use crate::domain::types::{Constraints, Location, Order, Problem, Vehicle};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashMap;

    fn sample_problem() -> Problem {
        Problem {
            vehicles: vec![
                Vehicle {
                    id: 1,
                    start: Location::new(0.0, 0.0),
                    price_km: 1.0,
                },
                Vehicle {
                    id: 2,
                    start: Location::new(10.0, 10.0),
                    price_km: 1.0,
                },
            ],
            orders: vec![
                Order {
                    id: 1,
                    pickup: Location::new(1.0, 0.0),
                    delivery: Location::new(1.0, 1.0),
                    load_factor: 1.0,
                },
                Order {
                    id: 2,
                    pickup: Location::new(11.0, 10.0),
                    delivery: Location::new(11.0, 11.0),
                    load_factor: 1.0,
                },
            ],
            constraints: Constraints {
                max_total_distance: 1000.0,
            },
        }
    }

    fn sample_state() -> State {
        let stops: HashMap<u32, Vec<RouteStop>> = [
            (
                1u32,
                vec![
                    RouteStop {
                        order_id: 1,
                        stop_type: StopType::Pickup,
                    },
                    RouteStop {
                        order_id: 1,
                        stop_type: StopType::Delivery,
                    },
                ],
            ),
            (
                2u32,
                vec![
                    RouteStop {
                        order_id: 2,
                        stop_type: StopType::Pickup,
                    },
                    RouteStop {
                        order_id: 2,
                        stop_type: StopType::Delivery,
                    },
                ],
            ),
        ]
        .into_iter()
        .collect();
        State { stops }
    }

    fn total_stop_count(state: &State) -> usize {
        state.stops.values().map(|s| s.len()).sum()
    }

    #[test]
    fn shift_preserves_total_order_count() {
        let problem = sample_problem();
        let ctx = SolveContext::build(&problem, &euclidean);
        let state = sample_state();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let next = shift(&ctx, &state, &mut rng);
        assert_eq!(total_stop_count(&next), 4);
    }

    #[test]
    fn swap_preserves_total_order_count() {
        let problem = sample_problem();
        let ctx = SolveContext::build(&problem, &euclidean);
        let state = sample_state();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let next = swap(&ctx, &state, &mut rng);
        assert_eq!(total_stop_count(&next), 4);
    }

    #[test]
    fn shift_can_interleave_with_existing_stops() {
        let problem = sample_problem();
        let ctx = SolveContext::build(&problem, &euclidean);
        let state = sample_state();

        let mut found_interleaved = false;
        for seed in 0..500u64 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let next = shift(&ctx, &state, &mut rng);
            for stops in next.stops.values() {
                if stops.len() == 4 {
                    let order_ids: Vec<u32> = stops.iter().map(|s| s.order_id).collect();
                    let interleaved = order_ids[0] != order_ids[1];
                    if interleaved {
                        found_interleaved = true;
                    }
                }
            }
            if found_interleaved {
                break;
            }
        }
        assert!(found_interleaved, "shift should be able to interleave orders");
    }
}
