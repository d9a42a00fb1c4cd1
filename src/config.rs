//! Tunables for the PSA heuristic solver.
//!
//! Mirrors the teacher's `pub mod constant` layout for bare defaults, plus a
//! `SaConfig`/`PsaConfig` pair of structs so callers can override individual
//! knobs via `..Default::default()`.

pub mod constant {
    pub const DEFAULT_INITIAL_TEMP: f64 = 1500.0;
    pub const DEFAULT_COOLING_RATE: f64 = 0.99;
    pub const DEFAULT_MIN_TEMP: f64 = 0.1;
    pub const DEFAULT_MAX_ITERATIONS: usize = 10_000;
    pub const DEFAULT_BATCH_SIZE: usize = 50;
    pub const DEFAULT_SYNC_INTERVAL: usize = 200;

    pub const DEFAULT_SHIFT_WEIGHT: f64 = 0.4;
    pub const DEFAULT_SWAP_WEIGHT: f64 = 0.3;
    pub const DEFAULT_SHUFFLE_WEIGHT: f64 = 0.3;

    /// Load ceiling; a running load above this (plus `LOAD_EPSILON`) is
    /// infeasible.
    pub const LOAD_CAPACITY: f64 = 1.0;
    pub const LOAD_EPSILON: f64 = 1e-6;
    /// Below this running load, a leg counts as "empty" (vehicle unladen).
    pub const EMPTY_THRESHOLD: f64 = 0.001;

    /// The EMPTY-objective RCRS insertion cost biases toward vehicles near
    /// the pickup by this fixed weight on `S[v][o]`.
    pub const EMPTY_BIAS_WEIGHT: f64 = 0.4;

    /// Reheat floor applied when a worker adopts an improving influence.
    pub const REHEAT_FLOOR: f64 = 50.0;

    /// Exact solver's size guard: `ProblemTooLarge` above this in either
    /// dimension.
    pub const MAX_EXACT_VEHICLES: usize = 7;
    pub const MAX_EXACT_ORDERS: usize = 7;
}

/// Weighted draw over the three neighborhood operators.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OperatorWeights {
    pub shift: f64,
    pub swap: f64,
    pub shuffle: f64,
}

impl Default for OperatorWeights {
    fn default() -> Self {
        Self {
            shift: constant::DEFAULT_SHIFT_WEIGHT,
            swap: constant::DEFAULT_SWAP_WEIGHT,
            shuffle: constant::DEFAULT_SHUFFLE_WEIGHT,
        }
    }
}

/// Simulated-annealing schedule and batching parameters for a single PSA
/// worker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SaConfig {
    pub initial_temp: f64,
    pub cooling_rate: f64,
    pub min_temp: f64,
    pub max_iterations: usize,
    pub batch_size: usize,
    pub sync_interval: usize,
    pub weights: OperatorWeights,
}

impl Default for SaConfig {
    fn default() -> Self {
        Self {
            initial_temp: constant::DEFAULT_INITIAL_TEMP,
            cooling_rate: constant::DEFAULT_COOLING_RATE,
            min_temp: constant::DEFAULT_MIN_TEMP,
            max_iterations: constant::DEFAULT_MAX_ITERATIONS,
            batch_size: constant::DEFAULT_BATCH_SIZE,
            sync_interval: constant::DEFAULT_SYNC_INTERVAL,
            weights: OperatorWeights::default(),
        }
    }
}

/// Top-level configuration for a PSA `solve` call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PsaConfig {
    pub target: crate::evaluation::metrics::Objective,
    pub sa: SaConfig,
    /// Worker count; `None` defers to `std::thread::available_parallelism`.
    pub workers: Option<usize>,
    /// Seed for RCRS construction and per-worker jitter.
    pub seed: u64,
}

impl PsaConfig {
    pub fn new(target: crate::evaluation::metrics::Objective) -> Self {
        Self {
            target,
            sa: SaConfig::default(),
            workers: None,
            seed: 0x5EED,
        }
    }
}
