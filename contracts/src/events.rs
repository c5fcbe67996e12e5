//! # Event Log
//!
//! Append-only record of every successful state change, in commit order.
//! Failed calls append nothing.
//!
//! Each entry carries a sequence number (0-based, gap-free) and the UTC
//! time it was recorded. Observers that poll the log can resume from the
//! last sequence they saw with [`EventLog::since`].
//!
//! The sequence is the log's only clock. `recorded_at` is wall-clock
//! metadata for operators: replaying the same calls yields the same
//! sequences and events but different `recorded_at` values, so comparisons
//! of two histories must ignore it.

use campus_protocol::{Address, Amount};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A state change observable by auditors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum LedgerEvent {
    /// ERC-20 style movement. `from` is `None` for mints, `to` is `None`
    /// for burns.
    Transfer {
        from: Option<Address>,
        to: Option<Address>,
        amount: Amount,
    },
    TokensMinted {
        to: Address,
        amount: Amount,
    },
    StudentAdded {
        account: Address,
    },
    StudentRemoved {
        account: Address,
    },
    ServiceProviderAdded {
        account: Address,
        name: String,
        category: String,
    },
    ServiceProviderRemoved {
        account: Address,
    },
    ServiceProviderUpdated {
        account: Address,
        name: String,
        category: String,
        active: bool,
    },
    /// `amount` is gross; the provider received `amount - fee`.
    ServicePaid {
        payer: Address,
        provider: Address,
        amount: Amount,
        fee: Amount,
    },
}

impl LedgerEvent {
    /// The event's name, matching its serde tag.
    pub fn name(&self) -> &'static str {
        match self {
            LedgerEvent::Transfer { .. } => "Transfer",
            LedgerEvent::TokensMinted { .. } => "TokensMinted",
            LedgerEvent::StudentAdded { .. } => "StudentAdded",
            LedgerEvent::StudentRemoved { .. } => "StudentRemoved",
            LedgerEvent::ServiceProviderAdded { .. } => "ServiceProviderAdded",
            LedgerEvent::ServiceProviderRemoved { .. } => "ServiceProviderRemoved",
            LedgerEvent::ServiceProviderUpdated { .. } => "ServiceProviderUpdated",
            LedgerEvent::ServicePaid { .. } => "ServicePaid",
        }
    }
}

/// An event together with its position in the log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Position in the log, starting at 0.
    pub sequence: u64,
    /// Wall-clock time of the append. Observational only; ordering comes
    /// from `sequence`.
    pub recorded_at: DateTime<Utc>,
    /// The event itself.
    #[serde(flatten)]
    pub event: LedgerEvent,
}

/// The append-only log.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    records: Vec<EventRecord>,
}

impl EventLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `event` and returns its sequence number.
    pub fn append(&mut self, event: LedgerEvent) -> u64 {
        let sequence = self.records.len() as u64;
        self.records.push(EventRecord {
            sequence,
            recorded_at: Utc::now(),
            event,
        });
        sequence
    }

    /// All records, oldest first.
    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }

    /// Records with `sequence >= from`. Empty if `from` is past the end.
    pub fn since(&self, from: u64) -> &[EventRecord] {
        let start = usize::try_from(from)
            .unwrap_or(usize::MAX)
            .min(self.records.len());
        &self.records[start..]
    }

    /// The most recent record.
    pub fn last(&self) -> Option<&EventRecord> {
        self.records.last()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates over the bare events, oldest first.
    pub fn events(&self) -> impl DoubleEndedIterator<Item = &LedgerEvent> {
        self.records.iter().map(|r| &r.event)
    }
}
