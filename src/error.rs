use thiserror::Error;

/// Errors surfaced across the solver's public API.
///
/// Infeasible candidates and pruned branches are never represented here —
/// those are local, silent outcomes (`+inf` energy, `None` from a TSP
/// subsolve). Only conditions that abort an entire `solve` call reach this
/// type.
#[derive(Debug, Error)]
pub enum SolverError {
    #[error("problem too large for the exact solver: {vehicles} vehicles x {orders} orders (limit is 7x7)")]
    ProblemTooLarge { vehicles: usize, orders: usize },

    #[error("PSA worker {worker} failed: {reason}")]
    WorkerFailed { worker: usize, reason: String },

    #[error("malformed problem/solution JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SolverError>;
