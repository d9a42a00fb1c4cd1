pub mod matrix;

pub use matrix::{euclidean, great_circle, DistanceFn, DistanceMatrix, VehicleStartMatrix};
