pub mod solution;
pub mod types;

pub use types::{
    AlgorithmSolution, Constraints, ConvergencePoint, Location, Order, Problem, ProblemSolution,
    PsaSolution, RouteStop, StopType, Vehicle, VehicleRoute,
};
