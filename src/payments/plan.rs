use super::{MAX_INSTALLMENTS, round_currency};
use crate::error::{Result, SettlementError};
use crate::models::{Payment, PaymentMethod, PaymentOption, PaymentPlan, PaymentStatus};
use chrono::{DateTime, Utc};
use log::info;
use rust_decimal::{Decimal, RoundingStrategy};
use uuid::Uuid;

/// Build a payment schedule for one participant's share.
///
/// `amount` is first rounded to the paisa. A full plan is a single payment of it. An
/// installment plan has `n` payments of `amount / n` rounded to the paisa, with the last
/// one absorbing whatever rounding left over so the schedule always adds up to `amount`.
pub fn create_plan(
    participant_id: impl Into<String>,
    amount: Decimal,
    option: PaymentOption,
) -> Result<PaymentPlan> {
    let amount = round_currency(amount);
    if amount <= Decimal::ZERO {
        return Err(SettlementError::InvalidAmount(amount));
    }

    let count = option.payment_count();
    if count == 0 || count > MAX_INSTALLMENTS {
        return Err(SettlementError::InvalidInput(format!(
            "an installment plan needs between 1 and {} installments, got {}",
            MAX_INSTALLMENTS, count
        )));
    }

    let participant_id = participant_id.into();
    let payments = schedule(amount, count)
        .into_iter()
        .enumerate()
        .map(|(i, installment)| Payment {
            transaction_id: Uuid::new_v4(),
            installment_number: i as u32 + 1,
            total_installments: count,
            amount: installment,
            status: PaymentStatus::Pending,
            method: None,
            paid_at: None,
        })
        .collect();

    info!(
        "Created {:?} payment plan for participant {} over {} ({} payment(s))",
        option, participant_id, amount, count
    );

    Ok(PaymentPlan {
        id: Uuid::new_v4(),
        participant_id,
        option,
        original_amount: amount,
        payments,
        created_at: Utc::now(),
    })
}

fn schedule(amount: Decimal, count: u32) -> Vec<Decimal> {
    if count == 1 {
        return vec![amount];
    }

    let divisor = Decimal::from(count);
    let leading = Decimal::from(count - 1);
    let mut installment = round_currency(amount / divisor);
    // Rounding up on tiny amounts can overshoot the total before the last installment
    if installment * leading > amount {
        installment = (amount / divisor).round_dp_with_strategy(2, RoundingStrategy::ToZero);
    }

    let mut payments = vec![installment; count as usize - 1];
    payments.push(amount - installment * leading);
    payments
}

impl Payment {
    /// Still owed: pending, or failed and waiting for a retry.
    pub fn is_due(&self) -> bool {
        matches!(self.status, PaymentStatus::Pending | PaymentStatus::Failed)
    }

    /// Record a successful payment. Failed payments may be retried.
    pub fn complete(&mut self, method: PaymentMethod, at: DateTime<Utc>) -> Result<()> {
        self.transition(PaymentStatus::Completed)?;
        self.method = Some(method);
        self.paid_at = Some(at);
        Ok(())
    }

    pub fn fail(&mut self) -> Result<()> {
        self.transition(PaymentStatus::Failed)
    }

    pub fn refund(&mut self) -> Result<()> {
        self.transition(PaymentStatus::Refunded)
    }

    fn transition(&mut self, to: PaymentStatus) -> Result<()> {
        let allowed = matches!(
            (self.status, to),
            (PaymentStatus::Pending, PaymentStatus::Completed)
                | (PaymentStatus::Pending, PaymentStatus::Failed)
                | (PaymentStatus::Failed, PaymentStatus::Completed)
                | (PaymentStatus::Completed, PaymentStatus::Refunded)
        );
        if !allowed {
            return Err(SettlementError::InvalidTransition {
                from: self.status,
                to,
            });
        }
        self.status = to;
        Ok(())
    }
}

impl PaymentPlan {
    /// The earliest installment that still has to be paid.
    pub fn next_due(&self) -> Option<&Payment> {
        self.payments.iter().find(|payment| payment.is_due())
    }

    /// Pay the earliest outstanding installment.
    pub fn pay_next(&mut self, method: PaymentMethod, at: DateTime<Utc>) -> Result<&Payment> {
        let index = self
            .payments
            .iter()
            .position(|payment| payment.is_due())
            .ok_or_else(|| {
                SettlementError::InvalidInput(format!(
                    "payment plan {} has nothing left to pay",
                    self.id
                ))
            })?;

        let payment = &mut self.payments[index];
        payment.complete(method, at)?;
        info!(
            "Participant {} paid installment {}/{} ({}) by {:?}",
            self.participant_id,
            payment.installment_number,
            payment.total_installments,
            payment.amount,
            method
        );
        Ok(&self.payments[index])
    }

    pub fn amount_paid(&self) -> Decimal {
        self.payments
            .iter()
            .filter(|payment| payment.status == PaymentStatus::Completed)
            .map(|payment| payment.amount)
            .sum()
    }

    pub fn amount_refunded(&self) -> Decimal {
        self.payments
            .iter()
            .filter(|payment| payment.status == PaymentStatus::Refunded)
            .map(|payment| payment.amount)
            .sum()
    }

    /// Sum of installments still owed. Refunded installments are closed, not owed again.
    pub fn outstanding(&self) -> Decimal {
        self.payments
            .iter()
            .filter(|payment| payment.is_due())
            .map(|payment| payment.amount)
            .sum()
    }

    /// Every installment paid and kept. A refund reopens nothing but keeps the plan incomplete.
    pub fn is_complete(&self) -> bool {
        self.payments
            .iter()
            .all(|payment| payment.status == PaymentStatus::Completed)
    }
}
