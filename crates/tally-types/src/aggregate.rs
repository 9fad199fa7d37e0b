use serde::{Deserialize, Serialize};

use crate::vote::{VoteRecord, VoterIdentity};

/// Running totals and full history for one item.
///
/// `history` is append-only and kept in chronological order; `rating` and
/// `votes` are maintained alongside it so reads never walk the history.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemAggregate {
    pub rating: i64,
    pub votes: u64,
    #[serde(default)]
    pub history: Vec<VoteRecord>,
}

impl ItemAggregate {
    pub fn new() -> Self {
        Self::default()
    }

    /// The `{rating, votes}` pair for this item.
    pub fn summary(&self) -> RatingSummary {
        RatingSummary {
            rating: self.rating,
            votes: self.votes,
        }
    }

    /// Most recent record cast by `voter`, scanning from the newest entry.
    pub fn last_vote_by(&self, voter: &VoterIdentity) -> Option<&VoteRecord> {
        self.history.iter().rev().find(|record| record.is_from(voter))
    }

    /// Append an accepted vote and update the running totals.
    pub fn record(&mut self, record: VoteRecord) {
        self.rating += record.direction.delta();
        self.votes += 1;
        self.history.push(record);
    }

    /// Rating recomputed from history.
    pub fn history_rating(&self) -> i64 {
        self.history.iter().map(|r| r.direction.delta()).sum()
    }
}

/// Rating and accepted vote count for one item.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingSummary {
    pub rating: i64,
    pub votes: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vote::VoteDirection;

    fn voter(hash: &str) -> VoterIdentity {
        VoterIdentity::new(hash, "agent").unwrap()
    }

    #[test]
    fn empty_aggregate_reads_zero() {
        let agg = ItemAggregate::new();
        assert_eq!(agg.summary(), RatingSummary { rating: 0, votes: 0 });
        assert!(agg.last_vote_by(&voter("u1")).is_none());
    }

    #[test]
    fn record_updates_totals() {
        let mut agg = ItemAggregate::new();
        agg.record(VoteRecord::new(VoteDirection::Up, voter("u1"), "ip", 1));
        agg.record(VoteRecord::new(VoteDirection::Up, voter("u2"), "ip", 2));
        agg.record(VoteRecord::new(VoteDirection::Down, voter("u3"), "ip", 3));
        assert_eq!(agg.summary(), RatingSummary { rating: 1, votes: 3 });
        assert_eq!(agg.history_rating(), 1);
        assert_eq!(agg.history.len(), 3);
    }

    #[test]
    fn last_vote_finds_most_recent_match() {
        let mut agg = ItemAggregate::new();
        agg.record(VoteRecord::new(VoteDirection::Up, voter("u1"), "ip", 10));
        agg.record(VoteRecord::new(VoteDirection::Up, voter("u1"), "ip", 20));
        agg.record(VoteRecord::new(VoteDirection::Up, voter("u2"), "ip", 30));

        let last = agg.last_vote_by(&voter("u1")).unwrap();
        assert_eq!(last.timestamp_ms, 20);
    }

    #[test]
    fn missing_history_deserializes_empty() {
        let agg: ItemAggregate = serde_json::from_str(r#"{"rating": 0, "votes": 0}"#).unwrap();
        assert!(agg.history.is_empty());
    }
}
