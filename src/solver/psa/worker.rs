//! A single PSA worker: batched simulated annealing that periodically
//! reports its best solution to the coordinator and absorbs influence
//! arriving from elsewhere in the ring.
//!
//! Grounded on the teacher's `solver/tabu_search/search.rs` iterate/cool
//! loop, generalized from a single-threaded schedule to the batch-then-sync
//! shape §4.4 describes, and on
//! `other_examples/68b07f48_peterrrock2-frcw__src-recom-opt-short_bursts.rs.rs`
//! for the worker-side channel-draining idiom, including that example's use
//! of `crossbeam_channel` for the job/result `Sender`/`Receiver` pair.

use crossbeam_channel::{Receiver, Sender};

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{instrument, trace};

use crate::config::constant::REHEAT_FLOOR;
use crate::config::SaConfig;
use crate::context::SolveContext;
use crate::evaluation::metrics::Objective;

use super::operators;
use super::state::State;

pub enum ToWorker {
    Init { state: State },
    InfluenceUpdate { state: State, energy: f64 },
}

pub enum ToCoordinator {
    SyncReport {
        worker: usize,
        iteration: usize,
        best_energy: f64,
        best_state: State,
    },
    Done {
        worker: usize,
        best_energy: f64,
        best_state: State,
    },
}

/// `initialTemp x uniform(0.9, 1.2)` per-worker jitter (§4.3 step 4).
pub fn jitter_initial_temp(initial_temp: f64, rng: &mut impl Rng) -> f64 {
    initial_temp * rng.gen_range(0.9..=1.2)
}

#[instrument(skip(ctx, config, rx, report_tx))]
#[allow(clippy::too_many_arguments)]
pub fn run(
    worker_id: usize,
    ctx: &SolveContext,
    objective: Objective,
    config: SaConfig,
    seed: u64,
    rx: Receiver<ToWorker>,
    report_tx: Sender<ToCoordinator>,
) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let mut current = match rx.recv() {
        Ok(ToWorker::Init { state }) => state,
        _ => return,
    };
    let mut current_energy = current.energy(ctx, objective);
    let mut best = current.clone();
    let mut best_energy = current_energy;
    let mut temperature = jitter_initial_temp(config.initial_temp, &mut rng);

    let mut iteration = 0;
    let mut batch_count = 0usize;
    while iteration < config.max_iterations && temperature > config.min_temp {
        for _ in 0..config.batch_size {
            if iteration >= config.max_iterations {
                break;
            }

            let candidate = operators::propose(ctx, &current, config.weights, &mut rng);
            let candidate_energy = candidate.energy(ctx, objective);
            let delta = candidate_energy - current_energy;

            let accept = if delta <= 0.0 {
                true
            } else if candidate_energy.is_finite() {
                rng.gen::<f64>() < (-delta / temperature).exp()
            } else {
                false
            };

            if accept {
                current = candidate;
                current_energy = candidate_energy;
                if current_energy < best_energy {
                    best_energy = current_energy;
                    best = current.clone();
                }
            }

            temperature = (temperature * config.cooling_rate).max(config.min_temp);
            iteration += 1;
        }
        batch_count += 1;

        trace!(iteration, best_energy, temperature, "psa worker batch complete");
        if batch_count % config.sync_interval.max(1) == 0
            && report_tx
                .send(ToCoordinator::SyncReport {
                    worker: worker_id,
                    iteration,
                    best_energy,
                    best_state: best.clone(),
                })
                .is_err()
        {
            return;
        }

        while let Ok(message) = rx.try_recv() {
            if let ToWorker::InfluenceUpdate { state, energy } = message {
                // §4.4: adopt only if it improves on the *current* working
                // solution, not the worker's personal best, then perturb
                // once so two workers never converge on identical state.
                if energy < current_energy {
                    let perturbed = operators::perturb(ctx, &state, config.weights, &mut rng);
                    let perturbed_energy = perturbed.energy(ctx, objective);
                    if perturbed_energy.is_finite() {
                        current = perturbed;
                        current_energy = perturbed_energy;
                    } else {
                        current = state;
                        current_energy = energy;
                    }
                    if current_energy < best_energy {
                        best_energy = current_energy;
                        best = current.clone();
                    }
                    temperature = temperature.max(REHEAT_FLOOR);
                }
            }
        }
    }

    let _ = report_tx.send(ToCoordinator::Done {
        worker: worker_id,
        best_energy,
        best_state: best,
    });
}
