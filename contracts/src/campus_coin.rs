//! # CampusCoin Contract
//!
//! The permissioned, fee-skimming campus token. Composes the role registry,
//! token ledger, payment processor and event log behind the public
//! operation surface.
//!
//! ## Operation Shape
//!
//! Every mutating operation follows the same three steps:
//!
//! 1. **Guard** — pure precondition checks against the registry, in a fixed
//!    order (caller role first, then targets, then balances).
//! 2. **Apply** — a single [`LedgerDelta`] and/or registry write. A delta
//!    either commits whole or fails without writing.
//! 3. **Emit** — events are appended only after the state change committed.
//!
//! A returned error therefore always means "nothing happened".
//!
//! ## Transfer Eligibility
//!
//! `transfer` checks only the recipient. A sender who was removed from the
//! student registry can still move tokens they hold to a student.

use campus_protocol::config::{DECIMALS, TOKEN_NAME, TOKEN_SYMBOL};
use campus_protocol::{Address, Amount, ConfigError, LedgerConfig};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::call::{Call, CallOutcome};
use crate::error::{LedgerError, RecipientCheck};
use crate::events::{EventLog, LedgerEvent};
use crate::ledger::{LedgerDelta, TokenLedger};
use crate::payment::{split_payment, PaymentReceipt, SpendTracker};
use crate::registry::{RoleRegistry, Roles, ServiceProvider};

/// Point-in-time view of the whole ledger, with deterministic ordering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub admin: Address,
    pub university: Address,
    pub total_supply: Amount,
    pub balances: BTreeMap<Address, Amount>,
    pub students: Vec<Address>,
    pub service_providers: BTreeMap<Address, ServiceProvider>,
    pub total_spent: BTreeMap<Address, Amount>,
    pub event_count: usize,
}

/// The CampusCoin ledger.
#[derive(Debug, Clone)]
pub struct CampusCoin {
    config: LedgerConfig,
    registry: RoleRegistry,
    ledger: TokenLedger,
    spending: SpendTracker,
    events: EventLog,
}

impl CampusCoin {
    /// Deploys with the default configuration. `deployer` becomes the admin
    /// and receives the whole genesis supply.
    pub fn deploy(deployer: Address, university: Address) -> Self {
        Self::genesis(deployer, university, LedgerConfig::default())
    }

    /// Deploys with an explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the configuration fails validation.
    pub fn deploy_with_config(
        deployer: Address,
        university: Address,
        config: LedgerConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::genesis(deployer, university, config))
    }

    fn genesis(deployer: Address, university: Address, config: LedgerConfig) -> Self {
        let roles = Roles {
            admin: deployer,
            university,
        };
        let mut events = EventLog::new();
        if !config.genesis_supply.is_zero() {
            events.append(LedgerEvent::Transfer {
                from: None,
                to: Some(deployer),
                amount: config.genesis_supply,
            });
        }
        Self {
            ledger: TokenLedger::genesis(deployer, config.genesis_supply),
            registry: RoleRegistry::new(roles),
            spending: SpendTracker::default(),
            events,
            config,
        }
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    pub fn name(&self) -> &'static str {
        TOKEN_NAME
    }

    pub fn symbol(&self) -> &'static str {
        TOKEN_SYMBOL
    }

    pub fn decimals(&self) -> u8 {
        DECIMALS
    }

    pub fn total_supply(&self) -> Amount {
        self.ledger.total_supply()
    }

    pub fn balance_of(&self, account: &Address) -> Amount {
        self.ledger.balance_of(account)
    }

    pub fn admin(&self) -> Address {
        self.registry.roles().admin
    }

    pub fn university(&self) -> Address {
        self.registry.roles().university
    }

    pub fn is_student(&self, account: &Address) -> bool {
        self.registry.is_student(account)
    }

    /// Provider record for `account`; the default (inactive, unnamed)
    /// record if none exists.
    pub fn service_providers(&self, account: &Address) -> ServiceProvider {
        self.registry.service_provider(account)
    }

    /// Cumulative gross amount `account` has paid for services.
    pub fn total_spent(&self, account: &Address) -> Amount {
        self.spending.total_spent(account)
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Returns `true` if total supply equals the sum of all balances.
    pub fn check_supply_invariant(&self) -> bool {
        self.ledger.supply_matches_balances()
    }

    /// Captures the full state with sorted collections.
    pub fn snapshot(&self) -> LedgerSnapshot {
        let mut students: Vec<Address> = self.registry.students().copied().collect();
        students.sort();
        LedgerSnapshot {
            admin: self.admin(),
            university: self.university(),
            total_supply: self.total_supply(),
            balances: self
                .ledger
                .balances()
                .map(|(a, b)| (*a, *b))
                .collect(),
            students,
            service_providers: self
                .registry
                .providers()
                .map(|(a, p)| (*a, p.clone()))
                .collect(),
            total_spent: self.spending.entries().map(|(a, s)| (*a, *s)).collect(),
            event_count: self.events.len(),
        }
    }

    // -----------------------------------------------------------------------
    // Role Registry
    // -----------------------------------------------------------------------

    /// Registers `account` as a student. Idempotent.
    pub fn add_student(&mut self, caller: Address, account: Address) -> Result<(), LedgerError> {
        self.registry.require_admin(&caller)?;
        self.registry.add_student(account);
        self.events.append(LedgerEvent::StudentAdded { account });
        Ok(())
    }

    /// Clears student status. Idempotent; balances are untouched.
    pub fn remove_student(&mut self, caller: Address, account: Address) -> Result<(), LedgerError> {
        self.registry.require_admin(&caller)?;
        self.registry.remove_student(&account);
        self.events.append(LedgerEvent::StudentRemoved { account });
        Ok(())
    }

    /// Creates or overwrites a provider record and activates it.
    pub fn add_service_provider(
        &mut self,
        caller: Address,
        account: Address,
        name: impl Into<String>,
        category: impl Into<String>,
    ) -> Result<(), LedgerError> {
        self.registry.require_admin(&caller)?;
        let (name, category) = (name.into(), category.into());
        self.registry
            .upsert_provider(account, name.clone(), category.clone());
        self.events.append(LedgerEvent::ServiceProviderAdded {
            account,
            name,
            category,
        });
        Ok(())
    }

    /// Deactivates a provider, keeping its name and category.
    ///
    /// Removing an account that was never registered succeeds without
    /// creating a record or emitting an event.
    pub fn remove_service_provider(
        &mut self,
        caller: Address,
        account: Address,
    ) -> Result<(), LedgerError> {
        self.registry.require_admin(&caller)?;
        if self.registry.deactivate_provider(&account) {
            self.events
                .append(LedgerEvent::ServiceProviderRemoved { account });
        }
        Ok(())
    }

    /// Overwrites every field of an existing provider record. Works on
    /// deactivated records too.
    pub fn update_service_provider(
        &mut self,
        caller: Address,
        account: Address,
        name: impl Into<String>,
        category: impl Into<String>,
        active: bool,
    ) -> Result<(), LedgerError> {
        self.registry.require_admin(&caller)?;
        let (name, category) = (name.into(), category.into());
        self.registry
            .update_provider(&account, name.clone(), category.clone(), active)?;
        self.events.append(LedgerEvent::ServiceProviderUpdated {
            account,
            name,
            category,
            active,
        });
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Token Ledger
    // -----------------------------------------------------------------------

    /// Mints `amount` to a registered student.
    pub fn mint(&mut self, caller: Address, to: Address, amount: Amount) -> Result<(), LedgerError> {
        self.registry.require_admin(&caller)?;
        self.registry
            .require_student_recipient(&to, RecipientCheck::Mint)?;
        self.ledger.apply(&LedgerDelta::mint(to, amount))?;
        self.events.append(LedgerEvent::Transfer {
            from: None,
            to: Some(to),
            amount,
        });
        self.events.append(LedgerEvent::TokensMinted { to, amount });
        Ok(())
    }

    /// Destroys `amount` of the caller's own tokens. Open to any holder.
    pub fn burn(&mut self, caller: Address, amount: Amount) -> Result<(), LedgerError> {
        self.ledger.apply(&LedgerDelta::burn(caller, amount))?;
        self.events.append(LedgerEvent::Transfer {
            from: Some(caller),
            to: None,
            amount,
        });
        Ok(())
    }

    /// Moves `amount` from the caller to a registered student.
    pub fn transfer(&mut self, caller: Address, to: Address, amount: Amount) -> Result<(), LedgerError> {
        self.registry
            .require_student_recipient(&to, RecipientCheck::Transfer)?;
        self.ledger
            .apply(&LedgerDelta::transfer(caller, to, amount))?;
        self.events.append(LedgerEvent::Transfer {
            from: Some(caller),
            to: Some(to),
            amount,
        });
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Payment Processor
    // -----------------------------------------------------------------------

    /// Pays an active provider. The university receives the fee, the
    /// provider the rest, and the caller's spend counter grows by the gross
    /// amount.
    pub fn pay_service(
        &mut self,
        caller: Address,
        provider: Address,
        amount: Amount,
    ) -> Result<PaymentReceipt, LedgerError> {
        self.registry.require_student_sender(&caller)?;
        self.registry.require_active_provider(&provider)?;

        let university = self.university();
        let split = split_payment(amount, self.config.service_fee_bps)?;
        let total_spent = self.spending.preview(&caller, amount)?;

        self.ledger
            .apply(&LedgerDelta::payment(caller, university, provider, &split))?;
        self.spending.commit(caller, total_spent);

        self.events.append(LedgerEvent::Transfer {
            from: Some(caller),
            to: Some(university),
            amount: split.fee,
        });
        self.events.append(LedgerEvent::Transfer {
            from: Some(caller),
            to: Some(provider),
            amount: split.provider_share,
        });
        self.events.append(LedgerEvent::ServicePaid {
            payer: caller,
            provider,
            amount,
            fee: split.fee,
        });

        Ok(PaymentReceipt {
            payer: caller,
            provider,
            university,
            split,
            total_spent,
        })
    }

    // -----------------------------------------------------------------------
    // Dispatch
    // -----------------------------------------------------------------------

    /// Executes `call` on behalf of `caller`.
    pub fn execute(&mut self, caller: Address, call: Call) -> Result<CallOutcome, LedgerError> {
        match call {
            Call::AddStudent { account } => self.add_student(caller, account)?,
            Call::RemoveStudent { account } => self.remove_student(caller, account)?,
            Call::AddServiceProvider {
                account,
                name,
                category,
            } => self.add_service_provider(caller, account, name, category)?,
            Call::RemoveServiceProvider { account } => {
                self.remove_service_provider(caller, account)?
            }
            Call::UpdateServiceProvider {
                account,
                name,
                category,
                active,
            } => self.update_service_provider(caller, account, name, category, active)?,
            Call::Mint { to, amount } => self.mint(caller, to, amount)?,
            Call::Burn { amount } => self.burn(caller, amount)?,
            Call::Transfer { to, amount } => self.transfer(caller, to, amount)?,
            Call::PayService { provider, amount } => {
                return self
                    .pay_service(caller, provider, amount)
                    .map(CallOutcome::Paid);
            }
        }
        Ok(CallOutcome::Applied)
    }
}
