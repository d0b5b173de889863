pub mod plan;
pub mod split;

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of monthly installments a quote share is spread over unless configured otherwise.
pub const DEFAULT_INSTALLMENTS: u32 = 12;

/// Longest schedule accepted: ten years of monthly installments.
pub const MAX_INSTALLMENTS: u32 = 120;

// Half-up to the paisa; every amount handed out of this module goes through here.
pub(crate) fn round_currency(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
