//! # Payment Processor
//!
//! Fee arithmetic and per-student spend accounting for `payService`.
//!
//! A payment of `gross` base units is split as
//!
//! ```text
//! fee            = floor(gross * fee_bps / 10_000)
//! provider_share = gross - fee
//! ```
//!
//! With the default 100 bps, paying 1 CC sends 0.99 CC to the provider and
//! 0.01 CC to the university. The student's spend counter grows by the
//! gross amount, not the provider's share.

use campus_protocol::{Address, Amount};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::LedgerError;

/// How a gross payment is divided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSplit {
    /// Amount debited from the payer.
    pub gross: Amount,
    /// Amount credited to the university treasury.
    pub fee: Amount,
    /// Amount credited to the provider.
    pub provider_share: Amount,
}

/// Splits `gross` at `fee_bps`, truncating the fee toward zero.
///
/// # Errors
///
/// Returns [`LedgerError::AmountOverflow`] only if `fee_bps` exceeds
/// 10_000 (rejected at configuration time).
pub fn split_payment(gross: Amount, fee_bps: u16) -> Result<FeeSplit, LedgerError> {
    let fee = gross
        .checked_bps(fee_bps)
        .ok_or(LedgerError::AmountOverflow)?;
    let provider_share = gross
        .checked_sub(fee)
        .ok_or(LedgerError::AmountOverflow)?;
    Ok(FeeSplit {
        gross,
        fee,
        provider_share,
    })
}

/// Result of a successful service payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentReceipt {
    /// The paying student.
    pub payer: Address,
    /// The provider that was paid.
    pub provider: Address,
    /// The treasury that received the fee.
    pub university: Address,
    /// The amounts moved.
    pub split: FeeSplit,
    /// The payer's cumulative gross spend after this payment.
    pub total_spent: Amount,
}

/// Cumulative gross spend per student. Never decreases.
#[derive(Debug, Clone, Default)]
pub struct SpendTracker {
    spent: HashMap<Address, Amount>,
}

impl SpendTracker {
    /// Returns the cumulative spend of `account`, or zero.
    pub fn total_spent(&self, account: &Address) -> Amount {
        self.spent.get(account).copied().unwrap_or(Amount::ZERO)
    }

    /// Computes the counter value after adding `gross`, without writing it.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::AmountOverflow`] if the counter would overflow.
    pub fn preview(&self, account: &Address, gross: Amount) -> Result<Amount, LedgerError> {
        self.total_spent(account)
            .checked_add(gross)
            .ok_or(LedgerError::AmountOverflow)
    }

    /// Stores a value previously returned by [`preview`](Self::preview).
    pub fn commit(&mut self, account: Address, total: Amount) {
        debug_assert!(total >= self.total_spent(&account));
        self.spent.insert(account, total);
    }

    /// Iterates over every student that has ever paid.
    pub fn entries(&self) -> impl Iterator<Item = (&Address, &Amount)> {
        self.spent.iter()
    }
}
