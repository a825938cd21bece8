//! Console demos of the econsolve models.
//!
//! # Usage
//!
//! ```text
//! cargo run --example demo -- griewank
//! cargo run --example demo -- griewank 7
//! cargo run --example demo -- salon
//! cargo run --example demo -- stackelberg
//! cargo run --example demo -- household
//! RUST_LOG=debug cargo run --example demo -- griewank
//! ```
//!
//! # Modes
//!
//! - **griewank [seed]**: Refined multi-start L-BFGS on the 2-D Griewank
//!   function. Prints every new incumbent and the final solution.
//!
//! - **salon [seed]**: Values the Δ = 0.05 adjustment policy against always
//!   adjusting, then grid-searches Δ on \[0.01, 1\].
//!
//! - **stackelberg**: Equilibrium quantities for `d = 20` as the marginal cost
//!   rises from 0 to 20.
//!
//! - **household**: Discrete and continuous time allocations of the default
//!   household, then `H_F / H_M` as the female wage rises from 0.8 to 1.2.

use std::error::Error;

use econsolve_models::{
    grid::linspace,
    griewank::{Griewank, GriewankProblem},
    household::{self, DISCRETE_POINTS, Household},
    salon::{self, Params, Policy, Salon},
    stackelberg,
};
use econsolve_solvers::optimization::{
    golden_section,
    multistart::{self, Event, Lbfgs},
};
use rand::{SeedableRng, rngs::StdRng};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    let mode = std::env::args().nth(1).unwrap_or_else(|| "griewank".into());
    let seed = std::env::args()
        .nth(2)
        .as_deref()
        .map(str::parse::<u64>)
        .transpose()
        .unwrap_or_else(|_| {
            eprintln!("Invalid seed, expected a non-negative integer");
            std::process::exit(1);
        });

    match mode.as_str() {
        "griewank" => griewank(seed.unwrap_or(19)),
        "salon" => salon(seed.unwrap_or(1986)),
        "stackelberg" => stackelberg(),
        "household" => household(),
        other => {
            eprintln!("Unknown mode: {other}");
            eprintln!("Usage: demo [griewank [seed]|salon [seed]|stackelberg|household]");
            std::process::exit(1);
        }
    }
}

fn griewank(seed: u64) -> Result<(), Box<dyn Error>> {
    let mut rng = StdRng::seed_from_u64(seed);

    let observer = |event: &Event<'_, _, _, 2>| {
        if let Event::Improved {
            iter,
            phase,
            start,
            weight,
            point,
            ..
        } = event
        {
            let chi = weight.map_or_else(|| "-".to_string(), |w| format!("{w:.4}"));
            println!(
                "{iter:4}  {phase:?}  chi = {chi:>6}  start = ({:9.3}, {:9.3})  f = {:.3e}",
                start[0], start[1], point.objective
            );
        }
        None
    };

    let solution = multistart::minimize(
        &Griewank::<2>,
        &GriewankProblem::<2>,
        &Lbfgs::default(),
        &mut rng,
        &multistart::Config::default(),
        observer,
    )?;

    println!(
        "\n{:?} after {} restarts ({} failed): x = ({:.3e}, {:.3e}), f = {:.3e}",
        solution.status,
        solution.iters,
        solution.failures.len(),
        solution.x[0],
        solution.x[1],
        solution.objective,
    );
    Ok(())
}

fn salon(seed: u64) -> Result<(), Box<dyn Error>> {
    let salon = Salon::new(Params::default())?;
    let panel = salon.draw_shocks(&mut StdRng::seed_from_u64(seed))?;

    let comparison = salon.compare(&panel, Policy::threshold(0.05)?)?;
    println!("H(Δ = 0)    = {:.3}", comparison.baseline);
    println!("H(Δ = 0.05) = {:.3}", comparison.value);
    println!("Δ = 0.05 {:?} profitability", comparison.verdict);

    let search = salon.grid_search(&panel, &salon::default_grid())?;
    println!(
        "\nBest Δ on the grid: {:.5} with H = {:.3}",
        search.best.delta(),
        search.value
    );
    Ok(())
}

fn stackelberg() -> Result<(), Box<dyn Error>> {
    let costs = linspace(0.0, 20.0, 11);
    let sweep = stackelberg::cost_sweep(20.0, &costs, &golden_section::Config::default())?;

    println!("{:>6} {:>10} {:>10} {:>8}", "c", "q_leader", "q_follower", "price");
    for eq in sweep {
        println!(
            "{:6.2} {:10.4} {:10.4} {:8.4}",
            eq.cost, eq.q_leader, eq.q_follower, eq.price
        );
    }
    Ok(())
}

fn household() -> Result<(), Box<dyn Error>> {
    let household = Household::new(household::Params::default())?;

    let discrete = household.solve_discrete(DISCRETE_POINTS)?;
    let continuous = household.solve()?;
    for (label, choice) in [("discrete", discrete), ("continuous", continuous)] {
        let h = choice.hours;
        println!(
            "{label:>10}: LM = {:.3}, HM = {:.3}, LF = {:.3}, HF = {:.3}, U = {:.5}",
            h.lm, h.hm, h.lf, h.hf, choice.utility
        );
    }

    println!("\n{:>6} {:>10}", "wF", "HF/HM");
    for point in household.wage_sweep(&household::default_wages(), Household::solve)? {
        println!("{:6.2} {:10.4}", point.w_f, point.choice.hours.home_ratio());
    }
    Ok(())
}
