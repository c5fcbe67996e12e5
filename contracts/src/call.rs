//! Mutating operations as data.
//!
//! A [`Call`] names one guarded operation and its arguments; the caller is
//! supplied separately, the way a transaction's sender is. Scripts, the
//! shared handle and tests all drive the ledger through
//! [`CampusCoin::execute`](crate::CampusCoin::execute).

use campus_protocol::{Address, Amount};
use serde::{Deserialize, Serialize};

use crate::payment::PaymentReceipt;

/// One mutating operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Call {
    AddStudent {
        account: Address,
    },
    RemoveStudent {
        account: Address,
    },
    AddServiceProvider {
        account: Address,
        name: String,
        category: String,
    },
    RemoveServiceProvider {
        account: Address,
    },
    UpdateServiceProvider {
        account: Address,
        name: String,
        category: String,
        active: bool,
    },
    Mint {
        to: Address,
        amount: Amount,
    },
    Burn {
        amount: Amount,
    },
    Transfer {
        to: Address,
        amount: Amount,
    },
    PayService {
        provider: Address,
        amount: Amount,
    },
}

impl Call {
    /// The operation name, matching the serde tag.
    pub fn name(&self) -> &'static str {
        match self {
            Call::AddStudent { .. } => "add_student",
            Call::RemoveStudent { .. } => "remove_student",
            Call::AddServiceProvider { .. } => "add_service_provider",
            Call::RemoveServiceProvider { .. } => "remove_service_provider",
            Call::UpdateServiceProvider { .. } => "update_service_provider",
            Call::Mint { .. } => "mint",
            Call::Burn { .. } => "burn",
            Call::Transfer { .. } => "transfer",
            Call::PayService { .. } => "pay_service",
        }
    }
}

/// What a successful call produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CallOutcome {
    /// The call committed; its effects are in the event log.
    Applied,
    /// A service payment committed.
    Paid(PaymentReceipt),
}
