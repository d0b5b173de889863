use log::{error, info};
use solar_settle::{CommunitySnapshot, Config, SettlementError, settle};
use std::fs;
use std::process::ExitCode;

fn run(config: &Config) -> Result<String, SettlementError> {
    info!("Reading community snapshot from {}", config.snapshot_path.display());
    let raw = fs::read_to_string(&config.snapshot_path)?;
    let snapshot: CommunitySnapshot = serde_json::from_str(&raw)?;

    let report = settle(&snapshot, config)?;
    info!("Voting results:\n{}", report.tally.summary());

    Ok(serde_json::to_string_pretty(&report)?)
}

fn main() -> ExitCode {
    // Initialize logging
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(&config) {
        Ok(report) => {
            println!("{}", report);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Settlement failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
