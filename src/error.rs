use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::PaymentStatus;

#[derive(Error, Debug)]
pub enum SettlementError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid amount: {0} (must be greater than zero)")]
    InvalidAmount(Decimal),

    #[error("Unknown option: {0}")]
    UnknownOption(String),

    #[error("Voting has no winner (no votes cast or a tie for first place)")]
    NoWinner,

    #[error("No quote found for provider {0}")]
    QuoteNotFound(String),

    #[error("Community has no billable usage")]
    NoBillableUsage,

    #[error("Payment cannot move from {from:?} to {to:?}")]
    InvalidTransition {
        from: PaymentStatus,
        to: PaymentStatus,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed snapshot: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SettlementError>;
