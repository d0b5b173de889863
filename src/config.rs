use crate::error::{Result, SettlementError};
use crate::payments::{DEFAULT_INSTALLMENTS, MAX_INSTALLMENTS};
use log::{info, warn};
use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Monthly installments a share is spread over.
    pub installments: u32,
    /// Reject votes for providers that have not submitted a quote.
    pub strict_votes: bool,
    pub snapshot_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            installments: DEFAULT_INSTALLMENTS,
            strict_votes: false,
            snapshot_path: PathBuf::from("community.json"),
        }
    }
}

impl Config {
    /// Read settings from the process environment. Call `dotenvy::dotenv()` first to pick up a `.env` file.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let installments = try_load(&lookup, "SOLAR_INSTALLMENTS", defaults.installments)?;
        if installments == 0 || installments > MAX_INSTALLMENTS {
            return Err(SettlementError::Config(format!(
                "SOLAR_INSTALLMENTS must be between 1 and {}, got {}",
                MAX_INSTALLMENTS, installments
            )));
        }

        Ok(Self {
            installments,
            strict_votes: try_load(&lookup, "SOLAR_STRICT_VOTES", defaults.strict_votes)?,
            snapshot_path: lookup("SOLAR_SNAPSHOT_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.snapshot_path),
        })
    }
}

fn try_load<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Display,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|e| {
            warn!("Invalid {key} value {raw:?}: {e}");
            SettlementError::Config(format!("invalid {key}: {e}"))
        }),
        None => {
            info!("{key} not set, using default: {default}");
            Ok(default)
        }
    }
}
