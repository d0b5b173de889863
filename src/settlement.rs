//! Payment-readiness gate: turn a finished provider vote into per-participant amounts.

use crate::config::Config;
use crate::error::{Result, SettlementError};
use crate::models::{
    Participant, PaymentBreakdownItem, PaymentOption, PaymentPlan, Quote, Vote,
};
use crate::payments::plan::create_plan;
use crate::payments::split::{rounding_drift, split_with_installments};
use crate::usage::{community_average, summarize, tariff};
use crate::voting::{VoteTally, VoteTallyResult};
use log::{info, warn};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Everything known about one community's decision, as supplied by the data store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunitySnapshot {
    #[serde(default)]
    pub community_id: Option<String>,
    pub participants: Vec<Participant>,
    pub quotes: Vec<Quote>,
    #[serde(default)]
    pub votes: Vec<Vote>,
    /// Options open for voting. Defaults to the providers that quoted.
    #[serde(default)]
    pub options: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementItem {
    #[serde(flatten)]
    pub breakdown: PaymentBreakdownItem,
    /// What the participant's average month costs on the utility tariff today.
    pub estimated_monthly_bill: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementReport {
    pub community_id: Option<String>,
    pub winning_provider: String,
    pub quote: Quote,
    pub tally: VoteTallyResult,
    pub community_average_usage: f64,
    pub installments: u32,
    pub items: Vec<SettlementItem>,
    /// Quote total minus the sum of the rounded shares.
    pub rounding_drift: Decimal,
}

impl SettlementReport {
    pub fn item_for(&self, participant_id: &str) -> Option<&SettlementItem> {
        self.items
            .iter()
            .find(|item| item.breakdown.participant_id == participant_id)
    }

    /// Payment plan for one participant's share, paid in full or over the report's installments.
    pub fn plan_for(&self, participant_id: &str, installments: bool) -> Result<PaymentPlan> {
        let item = self.item_for(participant_id).ok_or_else(|| {
            SettlementError::InvalidInput(format!(
                "participant {} is not part of this settlement",
                participant_id
            ))
        })?;

        let option = if installments {
            PaymentOption::Installments(self.installments)
        } else {
            PaymentOption::Full
        };
        create_plan(participant_id, item.breakdown.full_payment, option)
    }
}

/// Tally the votes and return the winning option, refusing to proceed without a clear winner.
pub fn ready_for_payment(tally: &VoteTally) -> Result<String> {
    let result = tally.tally();
    if let Some(winner) = &result.winner {
        return Ok(winner.clone());
    }

    if result.is_tie() {
        warn!("Payments blocked: first place is tied\n{}", result.summary());
    } else {
        warn!("Payments blocked: no votes have been cast");
    }
    Err(SettlementError::NoWinner)
}

pub fn build_tally(snapshot: &CommunitySnapshot, strict: bool) -> Result<VoteTally> {
    let mut tally = if strict {
        match &snapshot.options {
            Some(options) => VoteTally::strict(options.iter().cloned()),
            None => VoteTally::strict(snapshot.quotes.iter().map(|q| q.provider_id.clone())),
        }
    } else {
        VoteTally::new()
    };

    for vote in &snapshot.votes {
        tally.record(vote.clone())?;
    }
    Ok(tally)
}

/// Run the whole settlement for one community.
pub fn settle(snapshot: &CommunitySnapshot, config: &Config) -> Result<SettlementReport> {
    let tally = build_tally(snapshot, config.strict_votes)?;
    let winning_provider = ready_for_payment(&tally)?;

    let quote = snapshot
        .quotes
        .iter()
        .find(|quote| quote.provider_id == winning_provider)
        .cloned()
        .ok_or_else(|| SettlementError::QuoteNotFound(winning_provider.clone()))?;

    if snapshot.participants.is_empty() {
        return Err(SettlementError::InvalidInput(
            "community has no participants".to_string(),
        ));
    }

    let summaries = summarize(&snapshot.participants)?;
    if summaries.iter().all(|summary| summary.proportion == 0.0) {
        return Err(SettlementError::NoBillableUsage);
    }

    let breakdown = split_with_installments(&summaries, quote.total_cost, config.installments)?;
    let rounding_drift = rounding_drift(&breakdown, quote.total_cost);

    let items = breakdown
        .into_iter()
        .map(|item| {
            let estimated_monthly_bill = tariff::monthly_bill(item.average_usage)?;
            Ok(SettlementItem {
                breakdown: item,
                estimated_monthly_bill,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    info!(
        "Settled {} across {} participants with provider {} (drift {})",
        quote.total_cost,
        items.len(),
        winning_provider,
        rounding_drift
    );

    Ok(SettlementReport {
        community_id: snapshot.community_id.clone(),
        winning_provider,
        quote,
        tally: tally.tally(),
        community_average_usage: community_average(&summaries),
        installments: config.installments,
        items,
        rounding_drift,
    })
}
