//! # Token Ledger
//!
//! Per-account balances and total supply, in base units.
//!
//! Every balance change in the system goes through one primitive,
//! [`TokenLedger::apply`], which takes a [`LedgerDelta`]: an ordered list of
//! credits and debits plus a change to total supply. The delta is staged
//! against a scratch copy of the touched balances and committed only if
//! every posting succeeds, so a call either applies in full or not at all.
//!
//! ## Invariant
//!
//! `total_supply == Σ balances`. Mint and burn move supply and exactly one
//! balance by the same amount; transfers and payments have balanced postings
//! and leave supply unchanged.

use campus_protocol::{Address, Amount};
use std::collections::HashMap;

use crate::error::LedgerError;
use crate::payment::FeeSplit;

// ---------------------------------------------------------------------------
// LedgerDelta
// ---------------------------------------------------------------------------

/// A single balance movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Posting {
    /// Add to an account.
    Credit(Address, Amount),
    /// Subtract from an account; fails if the balance is too small.
    Debit(Address, Amount),
}

/// Change to total supply accompanying a set of postings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupplyChange {
    Unchanged,
    Increase(Amount),
    Decrease(Amount),
}

/// An atomic set of balance movements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerDelta {
    postings: Vec<Posting>,
    supply: SupplyChange,
}

impl LedgerDelta {
    /// New tokens credited to `to`.
    pub fn mint(to: Address, amount: Amount) -> Self {
        Self {
            postings: vec![Posting::Credit(to, amount)],
            supply: SupplyChange::Increase(amount),
        }
    }

    /// Tokens destroyed from `from`.
    pub fn burn(from: Address, amount: Amount) -> Self {
        Self {
            postings: vec![Posting::Debit(from, amount)],
            supply: SupplyChange::Decrease(amount),
        }
    }

    /// Tokens moved from `from` to `to`.
    pub fn transfer(from: Address, to: Address, amount: Amount) -> Self {
        Self {
            postings: vec![Posting::Debit(from, amount), Posting::Credit(to, amount)],
            supply: SupplyChange::Unchanged,
        }
    }

    /// A service payment: the payer is debited the gross amount, the
    /// treasury is credited the fee and the provider the remainder.
    pub fn payment(payer: Address, university: Address, provider: Address, split: &FeeSplit) -> Self {
        Self {
            postings: vec![
                Posting::Debit(payer, split.gross),
                Posting::Credit(university, split.fee),
                Posting::Credit(provider, split.provider_share),
            ],
            supply: SupplyChange::Unchanged,
        }
    }

    /// The postings, in application order.
    pub fn postings(&self) -> &[Posting] {
        &self.postings
    }

    /// The supply change.
    pub fn supply(&self) -> SupplyChange {
        self.supply
    }
}

// ---------------------------------------------------------------------------
// TokenLedger
// ---------------------------------------------------------------------------

/// Balances and total supply.
#[derive(Debug, Clone, Default)]
pub struct TokenLedger {
    /// Balances keyed by account. Absent means zero.
    balances: HashMap<Address, Amount>,
    /// Sum of all balances.
    total_supply: Amount,
}

impl TokenLedger {
    /// Creates a ledger whose entire supply is held by `holder`.
    pub fn genesis(holder: Address, supply: Amount) -> Self {
        let mut balances = HashMap::new();
        if !supply.is_zero() {
            balances.insert(holder, supply);
        }
        Self {
            balances,
            total_supply: supply,
        }
    }

    /// Returns the balance of `account`, or zero.
    pub fn balance_of(&self, account: &Address) -> Amount {
        self.balances.get(account).copied().unwrap_or(Amount::ZERO)
    }

    /// Returns the total supply.
    pub fn total_supply(&self) -> Amount {
        self.total_supply
    }

    /// Iterates over every account that has ever been credited.
    pub fn balances(&self) -> impl Iterator<Item = (&Address, &Amount)> {
        self.balances.iter()
    }

    /// Applies `delta` atomically.
    ///
    /// Postings are evaluated in order against staged balances, so the
    /// same account may appear more than once (a student paying themself
    /// as provider, for instance).
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InsufficientBalance`] if a debit exceeds the
    /// staged balance, or [`LedgerError::AmountOverflow`] if a credit or the
    /// supply would overflow. On error nothing is written.
    pub fn apply(&mut self, delta: &LedgerDelta) -> Result<(), LedgerError> {
        let mut staged: HashMap<Address, Amount> = HashMap::with_capacity(delta.postings().len());

        for posting in delta.postings() {
            let (account, next) = match *posting {
                Posting::Credit(account, amount) => {
                    let current = Self::staged_balance(&staged, &self.balances, &account);
                    let next = current
                        .checked_add(amount)
                        .ok_or(LedgerError::AmountOverflow)?;
                    (account, next)
                }
                Posting::Debit(account, amount) => {
                    let current = Self::staged_balance(&staged, &self.balances, &account);
                    let next =
                        current
                            .checked_sub(amount)
                            .ok_or(LedgerError::InsufficientBalance {
                                account,
                                balance: current,
                                requested: amount,
                            })?;
                    (account, next)
                }
            };
            staged.insert(account, next);
        }

        let supply = match delta.supply() {
            SupplyChange::Unchanged => self.total_supply,
            SupplyChange::Increase(amount) => self
                .total_supply
                .checked_add(amount)
                .ok_or(LedgerError::AmountOverflow)?,
            // Unreachable while the invariant holds: the burn debit already
            // failed if the holder lacked the amount.
            SupplyChange::Decrease(amount) => self
                .total_supply
                .checked_sub(amount)
                .ok_or(LedgerError::AmountOverflow)?,
        };

        self.balances.extend(staged);
        self.total_supply = supply;
        Ok(())
    }

    fn staged_balance(
        staged: &HashMap<Address, Amount>,
        committed: &HashMap<Address, Amount>,
        account: &Address,
    ) -> Amount {
        staged
            .get(account)
            .or_else(|| committed.get(account))
            .copied()
            .unwrap_or(Amount::ZERO)
    }

    /// Returns `true` if the total supply equals the sum of all balances.
    pub fn supply_matches_balances(&self) -> bool {
        Amount::checked_sum(self.balances.values().copied()) == Some(self.total_supply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(label: &str) -> Address {
        Address::from_label(label)
    }

    #[test]
    fn genesis_assigns_supply_to_holder() {
        let ledger = TokenLedger::genesis(addr("admin"), Amount::from_tokens(1_000));
        assert_eq!(ledger.balance_of(&addr("admin")), Amount::from_tokens(1_000));
        assert_eq!(ledger.total_supply(), Amount::from_tokens(1_000));
        assert!(ledger.supply_matches_balances());
    }

    #[test]
    fn mint_and_burn_move_supply() {
        let mut ledger = TokenLedger::default();
        ledger
            .apply(&LedgerDelta::mint(addr("s"), Amount::from_tokens(100)))
            .unwrap();
        ledger
            .apply(&LedgerDelta::burn(addr("s"), Amount::from_tokens(40)))
            .unwrap();
        assert_eq!(ledger.balance_of(&addr("s")), Amount::from_tokens(60));
        assert_eq!(ledger.total_supply(), Amount::from_tokens(60));
        assert!(ledger.supply_matches_balances());
    }

    #[test]
    fn failed_delta_writes_nothing() {
        let mut ledger = TokenLedger::genesis(addr("a"), Amount::from_tokens(10));
        // Credit first, then an impossible debit: the credit must not stick.
        let delta = LedgerDelta {
            postings: vec![
                Posting::Credit(addr("b"), Amount::from_tokens(5)),
                Posting::Debit(addr("a"), Amount::from_tokens(11)),
            ],
            supply: SupplyChange::Unchanged,
        };
        let err = ledger.apply(&delta).unwrap_err();
        assert_eq!(
            err,
            LedgerError::InsufficientBalance {
                account: addr("a"),
                balance: Amount::from_tokens(10),
                requested: Amount::from_tokens(11),
            }
        );
        assert_eq!(ledger.balance_of(&addr("b")), Amount::ZERO);
        assert_eq!(ledger.balance_of(&addr("a")), Amount::from_tokens(10));
    }

    #[test]
    fn transfer_to_self_is_a_no_op() {
        let mut ledger = TokenLedger::genesis(addr("a"), Amount::from_tokens(10));
        ledger
            .apply(&LedgerDelta::transfer(addr("a"), addr("a"), Amount::from_tokens(10)))
            .unwrap();
        assert_eq!(ledger.balance_of(&addr("a")), Amount::from_tokens(10));
    }

    #[test]
    fn payment_delta_debits_gross_and_credits_both_legs() {
        let split = FeeSplit {
            gross: Amount::from_tokens(1),
            fee: Amount::parse_tokens("0.01").unwrap(),
            provider_share: Amount::parse_tokens("0.99").unwrap(),
        };
        let delta = LedgerDelta::payment(addr("s"), addr("uni"), addr("gym"), &split);
        assert_eq!(
            delta.postings(),
            &[
                Posting::Debit(addr("s"), split.gross),
                Posting::Credit(addr("uni"), split.fee),
                Posting::Credit(addr("gym"), split.provider_share),
            ]
        );
        assert_eq!(delta.supply(), SupplyChange::Unchanged);
        assert_eq!(
            LedgerDelta::mint(addr("s"), split.gross).supply(),
            SupplyChange::Increase(split.gross)
        );
        assert_eq!(
            LedgerDelta::burn(addr("s"), split.gross).supply(),
            SupplyChange::Decrease(split.gross)
        );
    }

    #[test]
    fn supply_overflow_rejected() {
        let mut ledger =
            TokenLedger::genesis(addr("a"), Amount::from_base_units(u128::MAX));
        let err = ledger
            .apply(&LedgerDelta::mint(addr("b"), Amount::from_base_units(1)))
            .unwrap_err();
        assert_eq!(err, LedgerError::AmountOverflow);
        assert_eq!(ledger.balance_of(&addr("b")), Amount::ZERO);
    }
}
