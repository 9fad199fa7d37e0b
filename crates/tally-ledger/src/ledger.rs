use std::sync::Arc;

use tally_store::DocumentStore;
use tally_types::{RatingSummary, VoteRecord, Violation};
use tokio::sync::Mutex;

use crate::ballot::{Ballot, VoteOutcome};
use crate::clock::{Clock, SystemClock};
use crate::error::{LedgerError, LedgerResult};

/// Length of the duplicate-vote guard: 30 days.
pub const COOLDOWN_WINDOW_MS: u64 = 30 * 24 * 60 * 60 * 1000;

/// Remaining wait after a vote cast at `last_vote_ms`, or `None` if the window has
/// passed. Zero elapsed time is still inside the window.
pub fn cooldown_remaining(last_vote_ms: u64, now_ms: u64, window_ms: u64) -> Option<u64> {
    let elapsed = now_ms.saturating_sub(last_vote_ms);
    (elapsed < window_ms).then(|| window_ms - elapsed)
}

/// Owns the per-item aggregates and the vote-admission rule.
///
/// The ledger keeps no state between calls: every operation loads the
/// document fresh from the store. Votes are serialized by a document-wide
/// writer lock so two votes handled by one process never overwrite each other.
pub struct VoteLedger {
    store: Arc<dyn DocumentStore>,
    clock: Arc<dyn Clock>,
    cooldown_ms: u64,
    writer: Mutex<()>,
}

impl VoteLedger {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            clock: Arc::new(SystemClock),
            cooldown_ms: COOLDOWN_WINDOW_MS,
            writer: Mutex::new(()),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_cooldown_ms(mut self, cooldown_ms: u64) -> Self {
        self.cooldown_ms = cooldown_ms;
        self
    }

    pub fn cooldown_ms(&self) -> u64 {
        self.cooldown_ms
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    /// Current rating and vote count for `item_id`. Unknown items read as zero.
    pub async fn rating(&self, item_id: &str) -> LedgerResult<RatingSummary> {
        let loaded = self.store.load().await?;
        Ok(loaded.document.summary(item_id))
    }

    /// Vote history for `item_id`, oldest first.
    pub async fn history(&self, item_id: &str) -> LedgerResult<Vec<VoteRecord>> {
        let loaded = self.store.load().await?;
        Ok(loaded
            .document
            .get(item_id)
            .map(|item| item.history.clone())
            .unwrap_or_default())
    }

    /// Run the document integrity check against the stored document.
    pub async fn verify(&self) -> LedgerResult<Vec<Violation>> {
        let loaded = self.store.load().await?;
        Ok(loaded.document.validate(self.cooldown_ms))
    }

    /// Admit or reject a vote.
    ///
    /// A cooldown rejection is an `Ok` outcome and leaves the store untouched.
    /// If the save fails the vote is not recorded and the error is returned.
    pub async fn apply_vote(&self, ballot: &Ballot) -> LedgerResult<VoteOutcome> {
        ballot.validate()?;

        let _guard = self.writer.lock().await;
        let now = self.clock.now_ms();
        let loaded = self.store.load().await?;
        let mut document = loaded.document;

        let item = document.item_mut(&ballot.item_id);
        if let Some(last) = item.last_vote_by(&ballot.voter) {
            if let Some(retry_after_ms) = cooldown_remaining(last.timestamp_ms, now, self.cooldown_ms) {
                tracing::debug!(
                    item = %ballot.item_id,
                    voter = %ballot.voter,
                    retry_after_ms,
                    "vote rejected: cooldown"
                );
                return Ok(VoteOutcome::Cooldown { retry_after_ms });
            }
        }

        item.record(VoteRecord::new(
            ballot.direction,
            ballot.voter.clone(),
            ballot.source_address.clone(),
            now,
        ));
        let summary = item.summary();

        self.store
            .save(&document, loaded.revision.as_deref(), &ballot.commit_message())
            .await
            .map_err(|e| {
                tracing::error!(item = %ballot.item_id, error = %e, "vote not recorded");
                LedgerError::from(e)
            })?;

        tracing::info!(
            item = %ballot.item_id,
            direction = %ballot.direction,
            rating = summary.rating,
            votes = summary.votes,
            "vote accepted"
        );
        Ok(VoteOutcome::Accepted(summary))
    }
}

impl std::fmt::Debug for VoteLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VoteLedger")
            .field("store", &self.store.describe())
            .field("cooldown_ms", &self.cooldown_ms)
            .finish()
    }
}
