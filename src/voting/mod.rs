pub mod plurality;

use crate::error::{Result, SettlementError};
use crate::models::Vote;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

// Outcome of a provider vote
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteTallyResult {
    pub counts: BTreeMap<String, usize>, // Votes per option
    pub total_votes: usize,
    pub winner: Option<String>, // None when nobody voted or first place is shared
}

// One row of the standings, highest count first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteCount {
    pub option_id: String,
    pub votes: usize,
    pub rank: usize,
}

impl VoteTallyResult {
    pub fn is_tie(&self) -> bool {
        self.winner.is_none() && self.total_votes > 0
    }

    /// Options ordered by vote count, ties broken by option id. Tied options share a rank.
    pub fn standings(&self) -> Vec<VoteCount> {
        let mut sorted: Vec<(&String, &usize)> = self.counts.iter().collect();
        sorted.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

        let mut standings: Vec<VoteCount> = Vec::with_capacity(sorted.len());
        for (i, (option_id, votes)) in sorted.into_iter().enumerate() {
            let rank = match standings.last() {
                Some(previous) if previous.votes == *votes => previous.rank,
                _ => i + 1,
            };
            standings.push(VoteCount {
                option_id: option_id.clone(),
                votes: *votes,
                rank,
            });
        }
        standings
    }

    pub fn summary(&self) -> String {
        plurality::render_summary(self)
    }
}

/// Who voted for what in one decision, e.g. one community choosing between provider quotes.
///
/// Each voter holds at most one vote; voting again replaces the earlier choice. A strict
/// tally only accepts the options it was created with.
#[derive(Debug, Clone, Default)]
pub struct VoteTally {
    choices: HashMap<String, String>,
    options: Option<BTreeSet<String>>,
}

impl VoteTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn strict<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            choices: HashMap::new(),
            options: Some(options.into_iter().map(Into::into).collect()),
        }
    }

    pub fn is_strict(&self) -> bool {
        self.options.is_some()
    }

    /// Record `voter_id`'s choice, returning the option it replaced if any.
    pub fn cast_vote(
        &mut self,
        voter_id: impl Into<String>,
        option_id: impl Into<String>,
    ) -> Result<Option<String>> {
        let voter_id = voter_id.into();
        let option_id = option_id.into();

        if let Some(options) = &self.options {
            if !options.contains(&option_id) {
                warn!("Rejected vote from {} for unknown option {}", voter_id, option_id);
                return Err(SettlementError::UnknownOption(option_id));
            }
        }

        debug!("Voter {} chose {}", voter_id, option_id);
        Ok(self.choices.insert(voter_id, option_id))
    }

    pub fn record(&mut self, vote: Vote) -> Result<Option<String>> {
        self.cast_vote(vote.voter_id, vote.option_id)
    }

    pub fn retract_vote(&mut self, voter_id: &str) -> Option<String> {
        self.choices.remove(voter_id)
    }

    pub fn vote_of(&self, voter_id: &str) -> Option<&str> {
        self.choices.get(voter_id).map(String::as_str)
    }

    pub fn voter_count(&self) -> usize {
        self.choices.len()
    }

    pub fn tally(&self) -> VoteTallyResult {
        plurality::calculate_results(&self.choices, self.options.as_ref())
    }

    pub fn winner(&self) -> Option<String> {
        self.tally().winner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn majority_wins() {
        let mut tally = VoteTally::new();
        tally.cast_vote("v1", "X").unwrap();
        tally.cast_vote("v2", "X").unwrap();
        tally.cast_vote("v3", "Y").unwrap();

        let result = tally.tally();
        assert_eq!(result.counts.get("X"), Some(&2));
        assert_eq!(result.counts.get("Y"), Some(&1));
        assert_eq!(result.total_votes, 3);
        assert_eq!(result.winner.as_deref(), Some("X"));
        assert_eq!(tally.winner().as_deref(), Some("X"));
    }

    #[test]
    fn tie_has_no_winner() {
        let mut tally = VoteTally::new();
        tally.cast_vote("v1", "X").unwrap();
        tally.cast_vote("v2", "Y").unwrap();

        let result = tally.tally();
        assert_eq!(result.counts.get("X"), Some(&1));
        assert_eq!(result.counts.get("Y"), Some(&1));
        assert!(result.is_tie());
        assert_eq!(tally.winner(), None);
    }

    #[test]
    fn no_votes_no_winner() {
        let tally = VoteTally::new();
        let result = tally.tally();

        assert_eq!(result.total_votes, 0);
        assert!(result.counts.is_empty());
        assert!(!result.is_tie());
        assert_eq!(tally.winner(), None);
    }

    #[test]
    fn revoting_replaces_the_earlier_choice() {
        let mut tally = VoteTally::new();
        assert_eq!(tally.cast_vote("v1", "X").unwrap(), None);
        assert_eq!(tally.cast_vote("v1", "Y").unwrap().as_deref(), Some("X"));

        let result = tally.tally();
        assert_eq!(result.total_votes, 1);
        assert_eq!(result.counts.get("X"), None);
        assert_eq!(result.counts.get("Y"), Some(&1));
        assert_eq!(tally.vote_of("v1"), Some("Y"));
    }

    #[test]
    fn retracting_a_vote_can_break_a_tie() {
        let mut tally = VoteTally::new();
        tally.cast_vote("v1", "X").unwrap();
        tally.cast_vote("v2", "Y").unwrap();
        tally.cast_vote("v3", "Y").unwrap();
        tally.cast_vote("v4", "X").unwrap();
        assert_eq!(tally.winner(), None);

        assert_eq!(tally.retract_vote("v4").as_deref(), Some("X"));
        assert_eq!(tally.retract_vote("nobody"), None);
        assert_eq!(tally.winner().as_deref(), Some("Y"));
        assert_eq!(tally.voter_count(), 3);
    }

    #[test]
    fn strict_tally_rejects_unknown_options() {
        let mut tally = VoteTally::strict(["solar-co", "sunrise"]);
        tally.cast_vote("v1", "solar-co").unwrap();

        let err = tally.cast_vote("v1", "moonbeam").unwrap_err();
        assert!(matches!(err, SettlementError::UnknownOption(option) if option == "moonbeam"));
        assert_eq!(tally.vote_of("v1"), Some("solar-co"));

        let result = tally.tally();
        assert_eq!(result.counts.get("sunrise"), Some(&0));
        assert_eq!(result.winner.as_deref(), Some("solar-co"));
    }

    #[test]
    fn record_accepts_vote_values() {
        let mut tally = VoteTally::new();
        tally
            .record(Vote {
                voter_id: "v1".to_string(),
                option_id: "X".to_string(),
            })
            .unwrap();
        assert_eq!(tally.winner().as_deref(), Some("X"));
    }

    #[test]
    fn standings_share_ranks_on_ties() {
        let mut tally = VoteTally::new();
        for (voter, option) in [("1", "A"), ("2", "B"), ("3", "B"), ("4", "C"), ("5", "C"), ("6", "D")] {
            tally.cast_vote(voter, option).unwrap();
        }

        let standings = tally.tally().standings();
        let rows: Vec<(&str, usize, usize)> = standings
            .iter()
            .map(|row| (row.option_id.as_str(), row.votes, row.rank))
            .collect();
        assert_eq!(rows, vec![("B", 2, 1), ("C", 2, 1), ("A", 1, 3), ("D", 1, 3)]);
    }
}
