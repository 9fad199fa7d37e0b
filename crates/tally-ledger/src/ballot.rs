use tally_types::{RatingSummary, VoteDirection, VoterIdentity};

use crate::error::{LedgerError, LedgerResult};

/// Address recorded when the caller's address cannot be determined.
pub const UNKNOWN_ADDRESS: &str = "unknown";

/// A vote as submitted, before the ledger decides on it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ballot {
    pub item_id: String,
    pub direction: VoteDirection,
    pub voter: VoterIdentity,
    pub source_address: String,
}

impl Ballot {
    pub fn new(
        item_id: impl Into<String>,
        direction: VoteDirection,
        voter: VoterIdentity,
        source_address: impl Into<String>,
    ) -> LedgerResult<Self> {
        let ballot = Self {
            item_id: item_id.into(),
            direction,
            voter,
            source_address: source_address.into(),
        };
        ballot.validate()?;
        Ok(ballot)
    }

    /// Reject an empty item id or an incomplete voter identity.
    pub fn validate(&self) -> LedgerResult<()> {
        if self.item_id.is_empty() {
            return Err(LedgerError::Validation("empty item_id".into()));
        }
        self.voter.validate()?;
        Ok(())
    }

    /// Commit message used when persisting this vote.
    pub fn commit_message(&self) -> String {
        format!("vote: {} ({})", self.item_id, self.direction)
    }
}

/// What happened to a ballot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VoteOutcome {
    /// The vote was recorded and persisted.
    Accepted(RatingSummary),
    /// The voter already voted on this item within the cooldown window.
    /// Nothing was recorded.
    Cooldown { retry_after_ms: u64 },
}

impl VoteOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn voter() -> VoterIdentity {
        VoterIdentity::new("u1", "agent1").unwrap()
    }

    #[test]
    fn rejects_empty_item() {
        let err = Ballot::new("", VoteDirection::Up, voter(), "ip").unwrap_err();
        assert!(matches!(err, LedgerError::Validation(_)));
    }

    #[test]
    fn validate_catches_literal_with_empty_agent() {
        let ballot = Ballot {
            item_id: "a".into(),
            direction: VoteDirection::Up,
            voter: VoterIdentity {
                user_hash: "u1".into(),
                user_agent: String::new(),
            },
            source_address: "ip".into(),
        };
        match ballot.validate() {
            Err(LedgerError::Validation(msg)) => assert!(msg.contains("user_agent")),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn commit_message_format() {
        let up = Ballot::new("a", VoteDirection::Up, voter(), "ip").unwrap();
        assert_eq!(up.commit_message(), "vote: a (1)");
        let down = Ballot::new("b", VoteDirection::Down, voter(), "ip").unwrap();
        assert_eq!(down.commit_message(), "vote: b (-1)");
    }
}
