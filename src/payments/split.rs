use super::{DEFAULT_INSTALLMENTS, MAX_INSTALLMENTS, round_currency};
use crate::error::{Result, SettlementError};
use crate::models::{PaymentBreakdownItem, UsageSummary};
use log::debug;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;

/// Split `total_cost` across participants by usage share, with twelve monthly installments.
pub fn split(summaries: &[UsageSummary], total_cost: Decimal) -> Result<Vec<PaymentBreakdownItem>> {
    split_with_installments(summaries, total_cost, DEFAULT_INSTALLMENTS)
}

/// Like [`split`] but with a caller-chosen installment count.
///
/// Each item is rounded on its own (half-up, two places). The rounded shares are not
/// reconciled against the total, so their sum can be off by up to half a paisa per
/// participant; [`rounding_drift`] reports by how much.
pub fn split_with_installments(
    summaries: &[UsageSummary],
    total_cost: Decimal,
    installments: u32,
) -> Result<Vec<PaymentBreakdownItem>> {
    if total_cost <= Decimal::ZERO {
        return Err(SettlementError::InvalidAmount(total_cost));
    }
    if installments == 0 || installments > MAX_INSTALLMENTS {
        return Err(SettlementError::InvalidInput(format!(
            "installment count must be between 1 and {}, got {}",
            MAX_INSTALLMENTS, installments
        )));
    }
    let divisor = Decimal::from(installments);

    let items = summaries
        .iter()
        .map(|summary| {
            let proportion = share_of(summary)?;
            let full_payment = round_currency(proportion * total_cost);
            let monthly_installment = round_currency(full_payment / divisor);

            Ok(PaymentBreakdownItem {
                participant_id: summary.participant_id.clone(),
                name: summary.name.clone(),
                average_usage: summary.average_usage,
                proportion: summary.proportion,
                full_payment,
                monthly_installment,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    debug!(
        "Split {} across {} participants ({} installments)",
        total_cost,
        items.len(),
        installments
    );

    Ok(items)
}

/// Quote total minus the sum of the rounded full payments.
pub fn rounding_drift(items: &[PaymentBreakdownItem], total_cost: Decimal) -> Decimal {
    total_cost - items.iter().map(|item| item.full_payment).sum::<Decimal>()
}

fn share_of(summary: &UsageSummary) -> Result<Decimal> {
    if !summary.proportion.is_finite() || summary.proportion < 0.0 {
        return Err(SettlementError::InvalidInput(format!(
            "participant {} has an invalid proportion: {}",
            summary.participant_id, summary.proportion
        )));
    }
    Decimal::from_f64(summary.proportion).ok_or_else(|| {
        SettlementError::InvalidInput(format!(
            "participant {} has an unrepresentable proportion: {}",
            summary.participant_id, summary.proportion
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Participant;
    use crate::usage::summarize;

    fn summaries_for(readings: &[(&str, f64)]) -> Vec<UsageSummary> {
        let participants: Vec<Participant> = readings
            .iter()
            .map(|(id, usage)| Participant::new(*id, *id, vec![*usage; 6]))
            .collect();
        summarize(&participants).unwrap()
    }

    fn amount(value: &str) -> Decimal {
        value.parse().unwrap()
    }

    #[test]
    fn splits_by_usage_share() {
        let summaries = summaries_for(&[("a", 100.0), ("b", 300.0)]);
        let items = split(&summaries, amount("1000")).unwrap();

        assert_eq!(items[0].participant_id, "a");
        assert_eq!(items[0].full_payment, amount("250.00"));
        assert_eq!(items[0].monthly_installment, amount("20.83"));
        assert_eq!(items[1].participant_id, "b");
        assert_eq!(items[1].full_payment, amount("750.00"));
        assert_eq!(items[1].monthly_installment, amount("62.50"));
        assert_eq!(rounding_drift(&items, amount("1000")), Decimal::ZERO);
    }

    #[test]
    fn drift_stays_within_half_a_paisa_per_participant() {
        let summaries = summaries_for(&[("a", 1.0), ("b", 1.0), ("c", 1.0)]);
        let total = amount("100");
        let items = split(&summaries, total).unwrap();

        assert!(items.iter().all(|item| item.full_payment == amount("33.33")));
        let drift = rounding_drift(&items, total);
        assert_eq!(drift, amount("0.01"));
        assert!(drift.abs() <= amount("0.005") * Decimal::from(items.len()));
    }

    #[test]
    fn drift_bound_holds_for_uneven_usage() {
        let summaries = summaries_for(&[
            ("a", 123.4),
            ("b", 87.65),
            ("c", 412.0),
            ("d", 0.75),
            ("e", 250.1),
        ]);
        let total = amount("987654.32");
        let items = split(&summaries, total).unwrap();

        let drift = rounding_drift(&items, total);
        assert!(drift.abs() <= amount("0.005") * Decimal::from(items.len()));
        for item in &items {
            assert!(item.full_payment >= Decimal::ZERO);
            assert_eq!(
                item.monthly_installment,
                round_currency(item.full_payment / Decimal::from(12))
            );
        }
    }

    #[test]
    fn custom_installment_count() {
        let summaries = summaries_for(&[("a", 100.0), ("b", 300.0)]);
        let items = split_with_installments(&summaries, amount("1000"), 24).unwrap();

        assert_eq!(items[0].monthly_installment, amount("10.42"));
        assert_eq!(items[1].monthly_installment, amount("31.25"));
    }

    #[test]
    fn rejects_non_positive_totals() {
        let summaries = summaries_for(&[("a", 100.0)]);

        assert!(matches!(
            split(&summaries, Decimal::ZERO),
            Err(SettlementError::InvalidAmount(_))
        ));
        assert!(matches!(
            split(&summaries, amount("-10")),
            Err(SettlementError::InvalidAmount(_))
        ));
    }

    #[test]
    fn rejects_out_of_range_installments() {
        let summaries = summaries_for(&[("a", 100.0)]);
        assert!(matches!(
            split_with_installments(&summaries, amount("10"), 0),
            Err(SettlementError::InvalidInput(_))
        ));
        assert!(matches!(
            split_with_installments(&summaries, amount("10"), MAX_INSTALLMENTS + 1),
            Err(SettlementError::InvalidInput(_))
        ));
        assert!(split_with_installments(&summaries, amount("10"), MAX_INSTALLMENTS).is_ok());
    }

    #[test]
    fn zero_usage_community_owes_nothing() {
        let summaries = summaries_for(&[("a", 0.0), ("b", 0.0)]);
        let items = split(&summaries, amount("1000")).unwrap();

        assert!(items.iter().all(|item| item.full_payment.is_zero()));
        assert_eq!(rounding_drift(&items, amount("1000")), amount("1000"));
    }
}
