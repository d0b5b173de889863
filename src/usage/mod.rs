pub mod tariff;

use crate::error::{Result, SettlementError};
use crate::models::{Participant, UsageSummary};
use log::{debug, warn};

/// Reduce each participant's readings to an average and a share of the community total.
///
/// Summaries come back in the same order as `participants`. When the community uses
/// nothing at all every proportion is `0.0`.
pub fn summarize(participants: &[Participant]) -> Result<Vec<UsageSummary>> {
    let mut summaries = Vec::with_capacity(participants.len());

    // First pass: per-participant totals and averages
    for participant in participants {
        if participant.readings.is_empty() {
            return Err(SettlementError::InvalidInput(format!(
                "participant {} has no usage readings",
                participant.id
            )));
        }

        if let Some(bad) = participant
            .readings
            .iter()
            .find(|reading| !reading.is_finite() || **reading < 0.0)
        {
            return Err(SettlementError::InvalidInput(format!(
                "participant {} has an invalid reading: {}",
                participant.id, bad
            )));
        }

        let total_usage: f64 = participant.readings.iter().sum();
        if !total_usage.is_finite() {
            return Err(SettlementError::InvalidInput(format!(
                "participant {} has readings too large to total",
                participant.id
            )));
        }
        let average_usage = total_usage / participant.readings.len() as f64;

        summaries.push(UsageSummary {
            participant_id: participant.id.clone(),
            name: participant.name.clone(),
            total_usage,
            average_usage,
            proportion: 0.0,
        });
    }

    let community_total: f64 = summaries.iter().map(|s| s.average_usage).sum();
    if !community_total.is_finite() {
        return Err(SettlementError::InvalidInput(
            "community usage is too large to total".to_string(),
        ));
    }

    if community_total > 0.0 {
        for summary in &mut summaries {
            summary.proportion = summary.average_usage / community_total;
        }
    } else if !summaries.is_empty() {
        warn!(
            "Community of {} participants has zero total usage; all proportions are 0",
            summaries.len()
        );
    }

    debug!(
        "Summarized {} participants, community total {:.2} kWh",
        summaries.len(),
        community_total
    );

    Ok(summaries)
}

/// Mean of the participants' average usage, or `0.0` for an empty community.
pub fn community_average(summaries: &[UsageSummary]) -> f64 {
    if summaries.is_empty() {
        return 0.0;
    }
    summaries.iter().map(|s| s.average_usage).sum::<f64>() / summaries.len() as f64
}
