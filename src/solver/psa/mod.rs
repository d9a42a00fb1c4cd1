//! Parallel simulated annealing heuristic (§4.4): a ring of worker threads
//! each running batched SA over an RCRS-seeded solution, periodically
//! syncing their best result through a coordinator.

pub mod coordinator;
pub mod operators;
pub mod state;
pub mod worker;

pub use coordinator::solve_psa;
