//! # CampusCoin Contracts
//!
//! The CampusCoin ledger as a standalone, deterministic state machine: a
//! permissioned campus token where only registered students hold minted
//! tokens, and every service payment skims a fee to the university.
//!
//! - **registry** — admin/university roles, students, service providers.
//! - **ledger** — balances, total supply, and the atomic delta primitive.
//! - **payment** — fee split and per-student spend accounting.
//! - **events** — append-only audit log.
//! - **campus_coin** — the public operation surface tying it together.
//! - **call** — operations as data, for scripted execution.
//! - **shared** — a lock-serialized handle for multi-threaded callers.
//!
//! ## Design Principles
//!
//! 1. All monetary arithmetic is checked; balances are `u128` base units.
//! 2. Failed calls change nothing and emit nothing.
//! 3. Guards are pure reads; mutation happens after every guard passed.
//! 4. Every public type the outside world sees is serializable (serde).

pub mod call;
pub mod campus_coin;
pub mod error;
pub mod events;
pub mod ledger;
pub mod payment;
pub mod registry;
pub mod shared;

pub use call::{Call, CallOutcome};
pub use campus_coin::{CampusCoin, LedgerSnapshot};
pub use error::{ErrorKind, LedgerError, RecipientCheck};
pub use events::{EventLog, EventRecord, LedgerEvent};
pub use payment::{FeeSplit, PaymentReceipt};
pub use registry::{Roles, ServiceProvider};
pub use shared::SharedLedger;
