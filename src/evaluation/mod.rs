pub mod feasibility;
pub mod metrics;

pub use feasibility::{simulate_route, Infeasible};
pub use metrics::{Objective, RouteTotals};
