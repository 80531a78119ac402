//! Console driver for the banking simulator
//!
//! Runs a scenario (the built-in default, or a JSON file given as the first
//! argument) and prints the per-day report: each bank's net assets, cash,
//! and asset ratio, followed by the money supply and its smoothed annualized
//! growth rate. Ends with a final summary.
//!
//! ```text
//! banking-simulator [scenario.json]
//! ```
//!
//! Scenario files deserialize into `OrchestratorConfig`; omitted fields take
//! their defaults, so `{"num_days": 365, "rng_seed": 7}` is a valid file.

use std::error::Error;
use std::fs;
use std::process::ExitCode;

use banking_simulator_core_rs::{Orchestrator, OrchestratorConfig};

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let config = load_config()?;
    let mut orchestrator = Orchestrator::new(config)?;

    println!("Starting money supply: {:.6}", orchestrator.money_supply());
    println!("Starting hard assets: {:.6}", orchestrator.hard_cash());

    while !orchestrator.is_finished() {
        let result = orchestrator.step_day()?;

        for (idx, bank) in orchestrator.banks().iter().enumerate() {
            println!(
                "\tBank: {} Net Assets: {:.6} Cash: {:.6} Ratio: {:.6}",
                idx + 1,
                bank.compute_net_assets(),
                bank.cash_on_hand(),
                bank.compute_asset_ratio()
            );
        }

        println!(
            "Day {} money supply: {:.6} growth rate: {:.6}",
            result.day,
            result.money_supply,
            result.growth_rate_ema * 100.0
        );
    }

    let money_supply = orchestrator.money_supply();
    let hard_assets = orchestrator.hard_cash();
    println!(
        "End of simulation:\nMoney Supply: {:.6}\nHard Assets: {:.6}\nAsset Ratio: {:.6}",
        money_supply,
        hard_assets,
        money_supply / hard_assets
    );

    Ok(())
}

fn load_config() -> Result<OrchestratorConfig, Box<dyn Error>> {
    match std::env::args().nth(1) {
        Some(path) => {
            let contents = fs::read_to_string(&path)
                .map_err(|e| format!("cannot read scenario file {}: {}", path, e))?;
            let config: OrchestratorConfig = serde_json::from_str(&contents)
                .map_err(|e| format!("invalid scenario file {}: {}", path, e))?;
            Ok(config)
        }
        None => Ok(OrchestratorConfig::default()),
    }
}
