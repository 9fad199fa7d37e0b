use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Direction of a single vote.
///
/// Serialized as the bare integer `1` or `-1`; any other integer is rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum VoteDirection {
    Up,
    Down,
}

impl VoteDirection {
    /// The signed contribution of this vote to an item's rating.
    pub const fn delta(self) -> i64 {
        match self {
            Self::Up => 1,
            Self::Down => -1,
        }
    }
}

impl TryFrom<i64> for VoteDirection {
    type Error = TypeError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Up),
            -1 => Ok(Self::Down),
            other => Err(TypeError::InvalidDirection(other)),
        }
    }
}

impl From<VoteDirection> for i64 {
    fn from(direction: VoteDirection) -> Self {
        direction.delta()
    }
}

impl fmt::Display for VoteDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.delta())
    }
}

/// The pair used to recognize a repeat voter.
///
/// Both halves are opaque caller-supplied strings and are compared by exact
/// equality. This is not a verified account.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VoterIdentity {
    pub user_hash: String,
    pub user_agent: String,
}

impl VoterIdentity {
    /// Build an identity, rejecting empty components.
    pub fn new(
        user_hash: impl Into<String>,
        user_agent: impl Into<String>,
    ) -> Result<Self, TypeError> {
        let identity = Self {
            user_hash: user_hash.into(),
            user_agent: user_agent.into(),
        };
        identity.validate()?;
        Ok(identity)
    }

    /// Reject identities with an empty component.
    pub fn validate(&self) -> Result<(), TypeError> {
        if self.user_hash.is_empty() {
            return Err(TypeError::EmptyField("user_hash"));
        }
        if self.user_agent.is_empty() {
            return Err(TypeError::EmptyField("user_agent"));
        }
        Ok(())
    }
}

impl fmt::Display for VoterIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.user_hash, self.user_agent)
    }
}

/// One accepted vote.
///
/// Stored as `{"vote", "user_hash", "user_agent", "ip", "ts"}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRecord {
    #[serde(rename = "vote")]
    pub direction: VoteDirection,
    #[serde(flatten)]
    pub voter: VoterIdentity,
    /// Best-effort client address. Informational only.
    #[serde(rename = "ip")]
    pub source_address: String,
    /// Milliseconds since the UNIX epoch, assigned by the server.
    #[serde(rename = "ts")]
    pub timestamp_ms: u64,
}

impl VoteRecord {
    pub fn new(
        direction: VoteDirection,
        voter: VoterIdentity,
        source_address: impl Into<String>,
        timestamp_ms: u64,
    ) -> Self {
        Self {
            direction,
            voter,
            source_address: source_address.into(),
            timestamp_ms,
        }
    }

    /// Returns `true` if this record was cast by `voter`.
    pub fn is_from(&self, voter: &VoterIdentity) -> bool {
        self.voter == *voter
    }
}
