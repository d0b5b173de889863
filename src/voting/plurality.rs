use crate::voting::VoteTallyResult;
use std::collections::{BTreeMap, BTreeSet, HashMap};

pub fn calculate_results(
    choices: &HashMap<String, String>,
    options: Option<&BTreeSet<String>>,
) -> VoteTallyResult {
    let mut counts: BTreeMap<String, usize> = BTreeMap::new();

    // Known options show up in the results even with no votes
    if let Some(options) = options {
        for option_id in options {
            counts.insert(option_id.clone(), 0);
        }
    }

    for option_id in choices.values() {
        *counts.entry(option_id.clone()).or_insert(0) += 1;
    }

    let total_votes = choices.len();
    let top = counts.values().copied().max().unwrap_or(0);

    // A winner needs the single highest count; a shared maximum stays undecided
    let winner = if top == 0 {
        None
    } else {
        let mut leaders = counts.iter().filter(|(_, votes)| **votes == top);
        match (leaders.next(), leaders.next()) {
            (Some((option_id, _)), None) => Some(option_id.clone()),
            _ => None,
        }
    };

    VoteTallyResult {
        counts,
        total_votes,
        winner,
    }
}

pub fn render_summary(result: &VoteTallyResult) -> String {
    if result.total_votes == 0 {
        return "No votes were cast.".to_string();
    }

    let mut summary = String::new();

    for row in result.standings() {
        let is_winner = result.winner.as_deref() == Some(row.option_id.as_str());
        let percentage = row.votes as f64 * 100.0 / result.total_votes as f64;
        let noun = if row.votes == 1 { "vote" } else { "votes" };

        // Highlight the winner
        let line = if is_winner {
            format!("**{}**: {} {} ({:.1}%)", row.option_id, row.votes, noun, percentage)
        } else {
            format!("{}: {} {} ({:.1}%)", row.option_id, row.votes, noun, percentage)
        };

        summary.push_str(&line);
        summary.push('\n');
    }

    if result.is_tie() {
        let leaders: Vec<String> = result
            .standings()
            .into_iter()
            .filter(|row| row.rank == 1)
            .map(|row| row.option_id)
            .collect();
        summary.push_str(&format!("\nTie between {}.", leaders.join(" and ")));
    }

    summary.push_str(&format!("\n{} voters participated.", result.total_votes));
    summary
}
