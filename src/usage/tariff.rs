//! Domestic slab tariff used to estimate what a participant pays the utility today.
//!
//! Units up to 100 per month are free. Above that every slab is charged at its own
//! marginal rate, and a fixed charge is added depending on the consumption band.

use crate::error::{Result, SettlementError};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

// (upper bound of the slab in units, rate per unit in paise)
const SLABS: [(u32, i64); 7] = [
    (100, 0),
    (200, 225),
    (400, 450),
    (500, 600),
    (600, 800),
    (800, 900),
    (1000, 1000),
];
const TOP_RATE_PAISE: i64 = 1100;

/// Estimated monthly bill in rupees for `units` kWh consumed in one month.
pub fn monthly_bill(units: f64) -> Result<Decimal> {
    if !units.is_finite() || units < 0.0 {
        return Err(SettlementError::InvalidInput(format!(
            "monthly consumption must be a non-negative number, got {}",
            units
        )));
    }
    let units = Decimal::from_f64(units)
        .ok_or_else(|| SettlementError::InvalidInput(format!("unrepresentable consumption {}", units)))?;

    if units <= Decimal::from(100) {
        return Ok(Decimal::ZERO);
    }

    let mut amount = Decimal::ZERO;
    let mut lower = Decimal::ZERO;
    for (upper, rate) in SLABS {
        let upper = Decimal::from(upper);
        if units <= lower {
            break;
        }
        amount += (units.min(upper) - lower) * Decimal::new(rate, 2);
        lower = upper;
    }
    if units > lower {
        amount += (units - lower) * Decimal::new(TOP_RATE_PAISE, 2);
    }

    amount += fixed_charge(units);

    Ok(amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
}

/// Bills with and without the solar share of a period's consumption.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolarSavings {
    pub bill_without_solar: Decimal,
    pub actual_bill: Decimal,
    pub savings: Decimal,
}

/// What solar saved: the bill for all consumption drawn from the grid, against the bill
/// for the units the grid actually supplied.
pub fn savings(solar_units: f64, grid_units: f64) -> Result<SolarSavings> {
    if !solar_units.is_finite() || solar_units < 0.0 {
        return Err(SettlementError::InvalidInput(format!(
            "solar generation must be a non-negative number, got {}",
            solar_units
        )));
    }

    let bill_without_solar = monthly_bill(solar_units + grid_units)?;
    let actual_bill = monthly_bill(grid_units)?;

    Ok(SolarSavings {
        savings: bill_without_solar - actual_bill,
        bill_without_solar,
        actual_bill,
    })
}

fn fixed_charge(units: Decimal) -> Decimal {
    if units <= Decimal::from(100) {
        Decimal::ZERO
    } else if units <= Decimal::from(200) {
        Decimal::from(30)
    } else if units <= Decimal::from(500) {
        Decimal::from(50)
    } else {
        Decimal::from(70)
    }
}
