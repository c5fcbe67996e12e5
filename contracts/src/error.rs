//! Error types for the CampusCoin ledger.
//!
//! Every guarded operation that can fail returns a [`LedgerError`]. A failed
//! call never mutates state and never emits an event, so the caller can fix
//! the violated precondition and resubmit.
//!
//! Two views are provided on top of the detailed `Display` message:
//! [`LedgerError::kind`] for matching, and [`LedgerError::reason`] for the
//! stable, human-facing revert string.

use campus_protocol::{Address, Amount};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// The operation whose recipient failed the student check. Mint and
/// transfer share an error kind but report different reasons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RecipientCheck {
    /// `mint(to, amount)`.
    Mint,
    /// `transfer(to, amount)`.
    Transfer,
}

/// Errors that can occur during ledger operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LedgerError {
    /// The caller is not the administrator.
    #[error("unauthorized: {caller} is not the admin")]
    Unauthorized {
        /// The rejected caller.
        caller: Address,
    },

    /// The recipient of a mint or transfer is not a registered student.
    #[error("recipient {recipient} is not a registered student")]
    RecipientNotStudent {
        /// The rejected recipient.
        recipient: Address,
        /// Which operation performed the check.
        check: RecipientCheck,
    },

    /// The payer of a service payment is not a registered student.
    #[error("sender {sender} is not a registered student")]
    SenderNotStudent {
        /// The rejected payer.
        sender: Address,
    },

    /// The payee has no provider record, or its record is inactive.
    #[error("service provider {provider} is not active")]
    ProviderNotActive {
        /// The rejected payee.
        provider: Address,
    },

    /// An update targeted an account with no provider record.
    #[error("service provider {provider} not found")]
    ProviderNotFound {
        /// The account that was looked up.
        provider: Address,
    },

    /// The debited account holds less than the requested amount.
    #[error("insufficient balance: {account} has {balance}, requested {requested}")]
    InsufficientBalance {
        /// The account being debited.
        account: Address,
        /// Its balance at the time of the call.
        balance: Amount,
        /// The amount the call tried to debit.
        requested: Amount,
    },

    /// A credit, supply change, or spend counter would exceed `u128`.
    #[error("amount overflow")]
    AmountOverflow,
}

/// Field-less discriminant of [`LedgerError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    Unauthorized,
    RecipientNotStudent,
    SenderNotStudent,
    ProviderNotActive,
    ProviderNotFound,
    InsufficientBalance,
    AmountOverflow,
}

impl ErrorKind {
    /// Stable snake_case label, suitable for metric labels and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::Unauthorized => "unauthorized",
            ErrorKind::RecipientNotStudent => "recipient_not_student",
            ErrorKind::SenderNotStudent => "sender_not_student",
            ErrorKind::ProviderNotActive => "provider_not_active",
            ErrorKind::ProviderNotFound => "provider_not_found",
            ErrorKind::InsufficientBalance => "insufficient_balance",
            ErrorKind::AmountOverflow => "amount_overflow",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl LedgerError {
    /// Returns the discriminant of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            LedgerError::Unauthorized { .. } => ErrorKind::Unauthorized,
            LedgerError::RecipientNotStudent { .. } => ErrorKind::RecipientNotStudent,
            LedgerError::SenderNotStudent { .. } => ErrorKind::SenderNotStudent,
            LedgerError::ProviderNotActive { .. } => ErrorKind::ProviderNotActive,
            LedgerError::ProviderNotFound { .. } => ErrorKind::ProviderNotFound,
            LedgerError::InsufficientBalance { .. } => ErrorKind::InsufficientBalance,
            LedgerError::AmountOverflow => ErrorKind::AmountOverflow,
        }
    }

    /// Returns the stable revert reason for this error.
    ///
    /// These strings are part of the public surface: scripts and clients
    /// match on them, so they must not change.
    pub fn reason(&self) -> &'static str {
        match self {
            LedgerError::Unauthorized { .. } => "Only admin can call this",
            LedgerError::RecipientNotStudent {
                check: RecipientCheck::Mint,
                ..
            } => "Can only mint to registered students",
            LedgerError::RecipientNotStudent {
                check: RecipientCheck::Transfer,
                ..
            } => "Recipient must be a registered student",
            LedgerError::SenderNotStudent { .. } => "Only registered students can pay",
            LedgerError::ProviderNotActive { .. } => "Recipient must be an active service provider",
            LedgerError::ProviderNotFound { .. } => "Provider not found",
            LedgerError::InsufficientBalance { .. } => "Insufficient balance",
            LedgerError::AmountOverflow => "Amount overflow",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recipient_reason_depends_on_operation() {
        let recipient = Address::from_label("provider");
        let mint = LedgerError::RecipientNotStudent {
            recipient,
            check: RecipientCheck::Mint,
        };
        let transfer = LedgerError::RecipientNotStudent {
            recipient,
            check: RecipientCheck::Transfer,
        };
        assert_eq!(mint.kind(), transfer.kind());
        assert_eq!(mint.reason(), "Can only mint to registered students");
        assert_eq!(transfer.reason(), "Recipient must be a registered student");
    }

    #[test]
    fn display_carries_details() {
        let err = LedgerError::InsufficientBalance {
            account: Address::from_label("student1"),
            balance: Amount::from_tokens(5),
            requested: Amount::from_tokens(10),
        };
        let msg = err.to_string();
        assert!(msg.contains("has 5"));
        assert!(msg.contains("requested 10"));
        assert_eq!(err.kind().as_str(), "insufficient_balance");
    }
}
