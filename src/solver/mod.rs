//! The three solving strategies: exact branch-and-bound, the RCRS
//! constructive heuristic, and the PSA parallel metaheuristic.

pub mod exact;
pub mod psa;
pub mod rcrs;

pub use exact::solve_exact;
pub use psa::solve_psa;
