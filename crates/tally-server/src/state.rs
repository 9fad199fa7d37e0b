use std::sync::Arc;

use tally_ledger::VoteLedger;

/// Shared request state.
#[derive(Clone, Debug)]
pub struct AppState {
    pub ledger: Arc<VoteLedger>,
}

impl AppState {
    pub fn new(ledger: VoteLedger) -> Self {
        Self {
            ledger: Arc::new(ledger),
        }
    }
}
