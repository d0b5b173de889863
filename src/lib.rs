pub mod config;
pub mod error;
pub mod models;
pub mod payments;
pub mod settlement;
pub mod usage;
pub mod voting;

pub use config::Config;
pub use error::{Result, SettlementError};
pub use settlement::{CommunitySnapshot, SettlementReport, settle};
