//! CLI entry point: generates a synthetic problem, runs the exact solver
//! when the size permits, always runs PSA, and prints/saves the results.
//!
//! Grounded on the teacher's `main.rs` tracing-subscriber setup and
//! `colored` solution dump, and on its `save_to_csv` convergence-history
//! export idiom, re-pointed at [`vrppd::PsaSolution::history`].

use std::error::Error;

use colored::Colorize;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{info, span, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use vrppd::config::PsaConfig;
use vrppd::evaluation::Objective;
use vrppd::{euclidean, fixtures, solve_exact, solve_psa, SolveContext};

const NUM_VEHICLES: usize = 4;
const NUM_ORDERS: usize = 10;
const SPAN_KM: f64 = 25.0;
const SEED: u64 = 20260731;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(fmt::layer().with_span_events(fmt::format::FmtSpan::CLOSE).compact())
        .init();

    let mut rng = ChaCha8Rng::seed_from_u64(SEED);
    let problem = fixtures::random_problem(NUM_VEHICLES, NUM_ORDERS, SPAN_KM, &mut rng);

    info!(
        vehicles = NUM_VEHICLES,
        orders = NUM_ORDERS,
        "generated synthetic problem"
    );

    let ctx = SolveContext::build(&problem, &euclidean);

    {
        let span = span!(Level::INFO, "exact");
        let _guard = span.enter();
        match solve_exact(&ctx) {
            Ok(solution) => {
                println!(
                    "{} total_distance={:.2} total_price={:.2}",
                    "exact (distance-optimal)".green().bold(),
                    solution.best_distance.total_distance,
                    solution.best_distance.total_price,
                );
            }
            Err(err) => {
                println!("{} {err}", "exact solver skipped:".yellow());
            }
        }
    }

    let psa_solution = {
        let span = span!(Level::INFO, "psa");
        let _guard = span.enter();
        let config = PsaConfig::new(Objective::Distance);
        solve_psa(&ctx, &config)?
    };

    println!(
        "{} total_distance={:.2} total_price={:.2} empty_distance={:.2}",
        "psa".cyan().bold(),
        psa_solution.solution.total_distance,
        psa_solution.solution.total_price,
        psa_solution.solution.empty_distance,
    );

    let mut writer = csv::Writer::from_path("psa_convergence.csv")?;
    writer.write_record(["iteration", "time_ms", "total_distance", "total_price", "empty_distance"])?;
    for point in &psa_solution.history {
        writer.write_record([
            point.iteration.to_string(),
            point.time_ms.to_string(),
            point.total_distance.to_string(),
            point.total_price.to_string(),
            point.empty_distance.to_string(),
        ])?;
    }
    writer.flush()?;
    info!(points = psa_solution.history.len(), "wrote convergence history");

    std::fs::write("psa_solution.json", psa_solution.solution.to_json()?)?;
    info!("wrote psa_solution.json");

    Ok(())
}
