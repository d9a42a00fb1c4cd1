//! End-to-end scenarios and algebraic-law checks from the spec's testable
//! properties section, exercised against the public `vrppd` API.

use rand::SeedableRng;
use vrppd::config::PsaConfig;
use vrppd::distance::euclidean;
use vrppd::domain::types::{Constraints, Location, Order, Problem, Vehicle};
use vrppd::error::SolverError;
use vrppd::evaluation::Objective;
use vrppd::{solve_exact, solve_psa, SolveContext};

fn constraints(max_total_distance: f64) -> Constraints {
    Constraints { max_total_distance }
}

/// Scenario 1: single order, single vehicle.
#[test]
fn single_order_single_vehicle() {
    let problem = Problem {
        vehicles: vec![Vehicle {
            id: 1,
            start: Location::new(0.0, 0.0),
            price_km: 2.0,
        }],
        orders: vec![Order {
            id: 1,
            pickup: Location::new(0.0, 0.0),
            delivery: Location::new(3.0, 4.0),
            load_factor: 1.0,
        }],
        constraints: constraints(1000.0),
    };
    let ctx = SolveContext::build(&problem, &euclidean);
    let solution = solve_exact(&ctx).unwrap();

    let route = solution.best_distance.routes.get(&1).unwrap();
    assert_eq!(route.stops.len(), 2);
    assert!((route.total_distance - 5.0).abs() < 1e-9);
    assert_eq!(route.empty_distance, 0.0);
    assert!((route.total_price - 10.0).abs() < 1e-9);
}

/// Scenario 2: two disjoint regions, one order per vehicle is optimal.
#[test]
fn two_disjoint_regions() {
    let problem = Problem {
        vehicles: vec![
            Vehicle {
                id: 1,
                start: Location::new(0.0, 0.0),
                price_km: 1.0,
            },
            Vehicle {
                id: 2,
                start: Location::new(100.0, 0.0),
                price_km: 1.0,
            },
        ],
        orders: vec![
            Order {
                id: 1,
                pickup: Location::new(5.0, 0.0),
                delivery: Location::new(5.0, 5.0),
                load_factor: 1.0,
            },
            Order {
                id: 2,
                pickup: Location::new(105.0, 0.0),
                delivery: Location::new(105.0, 5.0),
                load_factor: 1.0,
            },
        ],
        constraints: constraints(1000.0),
    };
    let ctx = SolveContext::build(&problem, &euclidean);
    let solution = solve_exact(&ctx).unwrap();

    assert!((solution.best_distance.total_distance - 20.0).abs() < 1e-9);
    assert_eq!(solution.best_distance.routes.len(), 2);
}

/// Scenario 3: a cheap-but-far vehicle wins on price, an expensive-but-near
/// one wins on distance.
#[test]
fn price_vs_distance_conflict() {
    let problem = Problem {
        vehicles: vec![
            Vehicle {
                id: 1,
                start: Location::new(0.0, 0.0),
                price_km: 10.0,
            },
            Vehicle {
                id: 2,
                start: Location::new(50.0, 0.0),
                price_km: 1.0,
            },
        ],
        orders: vec![Order {
            id: 1,
            pickup: Location::new(5.0, 0.0),
            delivery: Location::new(10.0, 0.0),
            load_factor: 1.0,
        }],
        constraints: constraints(1000.0),
    };
    let ctx = SolveContext::build(&problem, &euclidean);
    let solution = solve_exact(&ctx).unwrap();

    assert!(solution.best_distance.routes.contains_key(&1));
    assert!((solution.best_distance.total_distance - 10.0).abs() < 1e-9);

    // v2 is farther from the order but an order of magnitude cheaper per
    // km, so it wins on price even though it loses badly on distance.
    assert!(solution.best_price.routes.contains_key(&2));
    assert!((solution.best_price.total_price - solution.best_price.total_distance).abs() < 1e-9);
    assert!(solution.best_price.total_distance > solution.best_distance.total_distance);
}

/// Scenario 4: RCRS must leave an overweight order unassigned while still
/// placing the two that fit.
#[test]
fn rcrs_capacity_enforcement() {
    let problem = Problem {
        vehicles: vec![Vehicle {
            id: 1,
            start: Location::new(0.0, 0.0),
            price_km: 1.0,
        }],
        orders: vec![
            Order {
                id: 1,
                pickup: Location::new(1.0, 0.0),
                delivery: Location::new(2.0, 0.0),
                load_factor: 2.0,
            },
            Order {
                id: 2,
                pickup: Location::new(3.0, 0.0),
                delivery: Location::new(4.0, 0.0),
                load_factor: 2.0,
            },
            Order {
                id: 3,
                pickup: Location::new(5.0, 0.0),
                delivery: Location::new(6.0, 0.0),
                load_factor: 0.5,
            },
        ],
        constraints: constraints(1000.0),
    };
    let ctx = SolveContext::build(&problem, &euclidean);
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(1);
    let solution = vrppd::solver::rcrs::build_solution(&ctx, Objective::Distance, &mut rng);

    let assigned: std::collections::HashSet<u32> = solution
        .routes
        .values()
        .flat_map(|r| r.stops.iter().map(|s| s.order_id))
        .collect();
    assert!(assigned.contains(&1));
    assert!(assigned.contains(&2));
    assert!(!assigned.contains(&3));
}

/// Scenario 5: the exact solver's size guard fires above 7x7.
#[test]
fn exact_size_guard() {
    let mut orders = Vec::new();
    for i in 1..=8 {
        orders.push(Order {
            id: i,
            pickup: Location::new(i as f64, 0.0),
            delivery: Location::new(i as f64, 1.0),
            load_factor: 1.0,
        });
    }
    let problem = Problem {
        vehicles: vec![Vehicle {
            id: 1,
            start: Location::new(0.0, 0.0),
            price_km: 1.0,
        }],
        orders,
        constraints: constraints(1000.0),
    };
    let ctx = SolveContext::build(&problem, &euclidean);
    let err = solve_exact(&ctx).unwrap_err();
    assert!(matches!(
        err,
        SolverError::ProblemTooLarge {
            vehicles: 1,
            orders: 8
        }
    ));
}

/// Scenario 6 / algebraic law: iterating nonempty subsets of a mask via
/// `sub = (sub - 1) & remaining` yields exactly `2^k - 1` distinct subsets,
/// each disjoint from whatever is outside the mask.
#[test]
fn subset_iteration_is_exhaustive_and_disjoint() {
    let remaining: u64 = 0b1111 & !0b0101; // orders not yet assigned: 0b1010
    let mut seen = Vec::new();
    let mut sub = remaining;
    while sub > 0 {
        seen.push(sub);
        sub = (sub - 1) & remaining;
    }
    seen.sort_unstable();
    assert_eq!(seen, vec![0b0010, 0b1000, 0b1010]);
    for s in &seen {
        assert_eq!(s & 0b0101, 0);
    }
}

#[test]
fn subset_count_matches_two_pow_k_minus_one() {
    for k in 1..=7u32 {
        let mask: u64 = (1 << k) - 1;
        let mut count = 0;
        let mut sub = mask;
        while sub > 0 {
            count += 1;
            sub = (sub - 1) & mask;
        }
        assert_eq!(count, (1u64 << k) - 1);
    }
}

/// Boundary: zero orders produce an all-zero, all-empty solution.
#[test]
fn zero_orders_yields_empty_solution() {
    let problem = Problem {
        vehicles: vec![Vehicle {
            id: 1,
            start: Location::new(0.0, 0.0),
            price_km: 1.0,
        }],
        orders: vec![],
        constraints: constraints(1000.0),
    };
    let ctx = SolveContext::build(&problem, &euclidean);
    let solution = solve_exact(&ctx).unwrap();
    assert_eq!(solution.best_distance.total_distance, 0.0);
    assert_eq!(solution.best_distance.total_price, 0.0);
    assert_eq!(solution.best_distance.empty_distance, 0.0);
    assert!(solution.best_distance.routes.is_empty() || solution.best_distance.routes.values().all(|r| r.is_empty()));
}

/// Cross-solver consistency: PSA's returned energy for an instance small
/// enough for the exact solver must be >= the exact optimum.
#[test]
fn heuristic_energy_is_never_better_than_exact_optimum() {
    let problem = Problem {
        vehicles: vec![
            Vehicle {
                id: 1,
                start: Location::new(0.0, 0.0),
                price_km: 1.0,
            },
            Vehicle {
                id: 2,
                start: Location::new(20.0, 0.0),
                price_km: 1.0,
            },
        ],
        orders: vec![
            Order {
                id: 1,
                pickup: Location::new(1.0, 0.0),
                delivery: Location::new(2.0, 1.0),
                load_factor: 1.0,
            },
            Order {
                id: 2,
                pickup: Location::new(21.0, 0.0),
                delivery: Location::new(22.0, 1.0),
                load_factor: 1.0,
            },
            Order {
                id: 3,
                pickup: Location::new(3.0, 1.0),
                delivery: Location::new(5.0, 2.0),
                load_factor: 1.0,
            },
        ],
        constraints: constraints(1000.0),
    };
    let ctx = SolveContext::build(&problem, &euclidean);
    let exact = solve_exact(&ctx).unwrap();

    let mut config = PsaConfig::new(Objective::Distance);
    config.sa.max_iterations = 1_000;
    config.workers = Some(2);
    let psa = solve_psa(&ctx, &config).unwrap();

    assert!(psa.solution.total_distance >= exact.best_distance.total_distance - 1e-6);
}

/// Boundary: when `maxTotalDistance` rules out every complete vehicle/order
/// partition, the exact solver returns the +inf sentinel in every slot
/// rather than a spuriously empty "optimal" solution.
#[test]
fn max_total_distance_infeasible_returns_infinite_sentinel() {
    let problem = Problem {
        vehicles: vec![Vehicle {
            id: 1,
            start: Location::new(0.0, 0.0),
            price_km: 1.0,
        }],
        orders: vec![Order {
            id: 1,
            pickup: Location::new(0.0, 0.0),
            delivery: Location::new(100.0, 100.0),
            load_factor: 1.0,
        }],
        constraints: constraints(0.001),
    };
    let ctx = SolveContext::build(&problem, &euclidean);
    let solution = solve_exact(&ctx).unwrap();

    assert!(solution.best_distance.total_distance.is_infinite());
    assert!(solution.best_price.total_price.is_infinite());
    assert!(solution.best_empty.empty_distance.is_infinite());
    assert!(solution.best_distance.routes.is_empty());
}
