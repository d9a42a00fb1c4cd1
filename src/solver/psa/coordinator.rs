//! Spawns the PSA worker ring, relays influence updates one hop at a time,
//! and assembles the global-best convergence history.
//!
//! Grounded on
//! `other_examples/68b07f48_peterrrock2-frcw__src-recom-opt-short_bursts.rs.rs`'s
//! job/result channel actor pattern: a coordinator fans work out over
//! `crossbeam_channel` channels and fans results back in (same crate that
//! example reaches for). Generalized here from a one-shot job queue to a
//! long-running ring: `INFLUENCE_UPDATE` is always coordinator -> worker
//! (per §4.4), so the ring topology is realized by the coordinator
//! forwarding each improving `SYNC_REPORT` from worker `i` only to worker
//! `i + 1`, never broadcasting and never wrapping past the last worker.

use std::thread;
use std::time::Instant;

use crossbeam_channel::unbounded;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{info, instrument};

use crate::config::PsaConfig;
use crate::context::SolveContext;
use crate::domain::types::{ConvergencePoint, PsaSolution};
use crate::error::{Result, SolverError};

use crate::solver::rcrs;

use super::state::State;
use super::worker::{self, ToCoordinator, ToWorker};

#[instrument(skip(ctx, config))]
pub fn solve_psa(ctx: &SolveContext, config: &PsaConfig) -> Result<PsaSolution> {
    let workers = config
        .workers
        .unwrap_or_else(|| thread::available_parallelism().map(|n| n.get()).unwrap_or(2))
        .max(2);

    let mut seed_rng = ChaCha8Rng::seed_from_u64(config.seed);
    let initial = rcrs::build_solution(ctx, config.target, &mut seed_rng);
    let initial_state = State::from_solution(ctx, &initial);

    let (report_tx, report_rx) = unbounded::<ToCoordinator>();
    let (in_txs, in_rxs): (Vec<_>, Vec<_>) = (0..workers).map(|_| unbounded::<ToWorker>()).unzip();

    let start = Instant::now();
    let mut history = Vec::new();
    let mut best_energy = initial_state.energy(ctx, config.target);
    let mut best_state = initial_state.clone();

    let outcome = thread::scope(|scope| -> Result<()> {
        let mut rxs = in_rxs.into_iter();
        for worker_id in 0..workers {
            let rx = rxs.next().expect("one receiver per worker");
            let report_tx = report_tx.clone();
            let sa_config = config.sa;
            let objective = config.target;
            let seed = config.seed.wrapping_add(worker_id as u64 * 0x9E37_79B9_7F4A_7C15);
            scope.spawn(move || {
                worker::run(worker_id, ctx, objective, sa_config, seed, rx, report_tx);
            });
        }
        drop(report_tx);

        for tx in &in_txs {
            if tx
                .send(ToWorker::Init {
                    state: initial_state.clone(),
                })
                .is_err()
            {
                return Err(SolverError::WorkerFailed {
                    worker: 0,
                    reason: "worker channel closed before INIT".into(),
                });
            }
        }

        let mut done = 0;
        loop {
            match report_rx.recv() {
                Ok(ToCoordinator::SyncReport {
                    worker,
                    iteration,
                    best_energy: reported_energy,
                    best_state: reported_state,
                }) => {
                    if reported_energy < best_energy {
                        best_energy = reported_energy;
                        best_state = reported_state.clone();
                        if let Some(solution) = best_state.to_solution(ctx) {
                            history.push(ConvergencePoint {
                                time_ms: start.elapsed().as_millis() as u64,
                                iteration,
                                total_distance: solution.total_distance,
                                total_price: solution.total_price,
                                empty_distance: solution.empty_distance,
                            });
                        }
                        if worker + 1 < workers {
                            let _ = in_txs[worker + 1].send(ToWorker::InfluenceUpdate {
                                state: reported_state,
                                energy: reported_energy,
                            });
                        }
                    }
                }
                Ok(ToCoordinator::Done {
                    best_energy: reported_energy,
                    best_state: reported_state,
                    ..
                }) => {
                    if reported_energy < best_energy {
                        best_energy = reported_energy;
                        best_state = reported_state;
                    }
                    done += 1;
                    if done == workers {
                        break;
                    }
                }
                Err(_) => break,
            }
        }

        Ok(())
    });
    outcome?;

    let solution = best_state.to_solution(ctx).unwrap_or_else(|| {
        crate::domain::solution::aggregate(std::collections::HashMap::new())
    });
    info!(best_energy, workers, "psa converged");

    Ok(PsaSolution { solution, history })
}
