use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::aggregate::{ItemAggregate, RatingSummary};
use crate::vote::VoterIdentity;

/// The whole persisted state: every item aggregate keyed by item id.
///
/// Serialized as `{"items": {"<id>": {...}}}`. A document without an `items`
/// key reads as empty.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerDocument {
    #[serde(default)]
    pub items: BTreeMap<String, ItemAggregate>,
}

impl LedgerDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, item_id: &str) -> Option<&ItemAggregate> {
        self.items.get(item_id)
    }

    /// Summary for `item_id`, or zeros if the item has never been voted on.
    pub fn summary(&self, item_id: &str) -> RatingSummary {
        self.get(item_id)
            .map(ItemAggregate::summary)
            .unwrap_or_default()
    }

    /// Aggregate for `item_id`, created empty on first access.
    pub fn item_mut(&mut self, item_id: &str) -> &mut ItemAggregate {
        self.items.entry(item_id.to_owned()).or_default()
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn total_votes(&self) -> u64 {
        self.items.values().map(|item| item.votes).sum()
    }

    /// Parse a document from raw JSON bytes.
    pub fn from_json(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }

    /// Pretty-printed JSON with two-space indentation.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Check every item for aggregate and cooldown invariants.
    ///
    /// Returns an empty list when the document is consistent.
    pub fn validate(&self, cooldown_ms: u64) -> Vec<Violation> {
        let mut violations = Vec::new();

        for (item_id, item) in &self.items {
            let history_rating = item.history_rating();
            if item.rating != history_rating {
                violations.push(Violation {
                    item_id: item_id.clone(),
                    kind: ViolationKind::RatingMismatch,
                    description: format!(
                        "rating is {}, history sums to {history_rating}",
                        item.rating
                    ),
                });
            }

            let history_len = item.history.len() as u64;
            if item.votes != history_len {
                violations.push(Violation {
                    item_id: item_id.clone(),
                    kind: ViolationKind::VoteCountMismatch,
                    description: format!(
                        "votes is {}, history holds {history_len} records",
                        item.votes
                    ),
                });
            }

            let mut last_by_voter: HashMap<&VoterIdentity, u64> = HashMap::new();
            let mut previous_ts = None;
            for (index, record) in item.history.iter().enumerate() {
                if let Some(prev) = previous_ts {
                    if record.timestamp_ms < prev {
                        violations.push(Violation {
                            item_id: item_id.clone(),
                            kind: ViolationKind::OutOfOrder,
                            description: format!(
                                "record {index} at {} precedes previous record at {prev}",
                                record.timestamp_ms
                            ),
                        });
                    }
                }
                previous_ts = Some(record.timestamp_ms);

                if let Some(last) = last_by_voter.insert(&record.voter, record.timestamp_ms) {
                    let elapsed = record.timestamp_ms.saturating_sub(last);
                    if elapsed < cooldown_ms {
                        violations.push(Violation {
                            item_id: item_id.clone(),
                            kind: ViolationKind::CooldownBreach,
                            description: format!(
                                "record {index} by {} is {elapsed} ms after the previous one",
                                record.voter
                            ),
                        });
                    }
                }
            }
        }

        violations
    }
}

/// A specific inconsistency found by [`LedgerDocument::validate`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Violation {
    pub item_id: String,
    pub kind: ViolationKind,
    pub description: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViolationKind {
    RatingMismatch,
    VoteCountMismatch,
    OutOfOrder,
    CooldownBreach,
}
