//! Thread-safe handle to a single ledger.
//!
//! All mutations are serialized through one writer lock, so there is a
//! single global order of operations and no caller can observe another
//! call half-applied. Queries share the read lock and run concurrently with
//! each other, never with a write.
//!
//! Cheap to clone; the ledger lives behind an `Arc`.

use campus_protocol::{Address, Amount};
use parking_lot::RwLock;
use std::sync::Arc;

use crate::call::{Call, CallOutcome};
use crate::campus_coin::{CampusCoin, LedgerSnapshot};
use crate::error::LedgerError;
use crate::events::EventRecord;

#[derive(Debug, Clone)]
pub struct SharedLedger {
    inner: Arc<RwLock<CampusCoin>>,
}

impl SharedLedger {
    /// Wraps a deployed ledger.
    pub fn new(coin: CampusCoin) -> Self {
        Self {
            inner: Arc::new(RwLock::new(coin)),
        }
    }

    /// Executes `call` under the writer lock.
    pub fn execute(&self, caller: Address, call: Call) -> Result<CallOutcome, LedgerError> {
        let op = call.name();
        let mut coin = self.inner.write();
        let first_new = coin.events().len() as u64;
        match coin.execute(caller, call) {
            Ok(outcome) => {
                tracing::debug!(
                    op,
                    caller = %caller,
                    events = coin.events().len() as u64 - first_new,
                    "call committed"
                );
                Ok(outcome)
            }
            Err(e) => {
                tracing::warn!(
                    op,
                    caller = %caller,
                    kind = %e.kind(),
                    error = %e,
                    "call rejected"
                );
                Err(e)
            }
        }
    }

    /// Runs `f` against the ledger under the read lock.
    pub fn read<R>(&self, f: impl FnOnce(&CampusCoin) -> R) -> R {
        f(&self.inner.read())
    }

    pub fn balance_of(&self, account: &Address) -> Amount {
        self.read(|coin| coin.balance_of(account))
    }

    pub fn total_supply(&self) -> Amount {
        self.read(|coin| coin.total_supply())
    }

    pub fn snapshot(&self) -> LedgerSnapshot {
        self.read(|coin| coin.snapshot())
    }

    /// Copies out every event with `sequence >= from`.
    pub fn events_since(&self, from: u64) -> Vec<EventRecord> {
        self.read(|coin| coin.events().since(from).to_vec())
    }
}
