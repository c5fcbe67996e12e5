//! # Role Registry
//!
//! Tracks who may do what on the ledger:
//!
//! - **admin** — the deployer. Fixed for the lifetime of the ledger and the
//!   only identity allowed to change the registry or mint.
//! - **university** — the treasury that receives the service fee. Fixed at
//!   deployment.
//! - **students** — accounts eligible to receive minted tokens and transfers
//!   and to pay for services. Plain set membership.
//! - **service providers** — named, categorized payees. Records are never
//!   deleted: removal clears the `active` flag, so a removed provider can be
//!   reactivated through an update.
//!
//! The `require_*` guards are pure precondition checks. They read the
//! registry and either pass or return the [`LedgerError`] the calling
//! operation should fail with.

use campus_protocol::Address;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use crate::error::{LedgerError, RecipientCheck};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// The two fixed identities of a deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Roles {
    /// Deployer; authorizes every registry and mint operation.
    pub admin: Address,
    /// Treasury credited with the service fee.
    pub university: Address,
}

/// A service provider record.
///
/// An account with no record reads as the default value: empty name and
/// category, inactive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceProvider {
    /// Display name (e.g., "Coffee Shop").
    pub name: String,
    /// Free-form category (e.g., "Food").
    pub category: String,
    /// Whether the provider may currently receive payments.
    pub active: bool,
}

/// Role and eligibility state of the ledger.
#[derive(Debug, Clone)]
pub struct RoleRegistry {
    roles: Roles,
    students: HashSet<Address>,
    providers: HashMap<Address, ServiceProvider>,
}

impl RoleRegistry {
    /// Creates a registry with the given fixed roles and no students or
    /// providers.
    pub fn new(roles: Roles) -> Self {
        Self {
            roles,
            students: HashSet::new(),
            providers: HashMap::new(),
        }
    }

    /// Returns the fixed roles.
    pub fn roles(&self) -> Roles {
        self.roles
    }

    // -- Guards -------------------------------------------------------------

    /// Passes only for the admin.
    pub fn require_admin(&self, caller: &Address) -> Result<(), LedgerError> {
        if *caller != self.roles.admin {
            return Err(LedgerError::Unauthorized { caller: *caller });
        }
        Ok(())
    }

    /// Passes only if `recipient` is a registered student.
    pub fn require_student_recipient(
        &self,
        recipient: &Address,
        check: RecipientCheck,
    ) -> Result<(), LedgerError> {
        if !self.is_student(recipient) {
            return Err(LedgerError::RecipientNotStudent {
                recipient: *recipient,
                check,
            });
        }
        Ok(())
    }

    /// Passes only if the payer is a registered student.
    pub fn require_student_sender(&self, sender: &Address) -> Result<(), LedgerError> {
        if !self.is_student(sender) {
            return Err(LedgerError::SenderNotStudent { sender: *sender });
        }
        Ok(())
    }

    /// Passes only if `provider` has a record with `active == true`.
    pub fn require_active_provider(&self, provider: &Address) -> Result<(), LedgerError> {
        match self.providers.get(provider) {
            Some(record) if record.active => Ok(()),
            _ => Err(LedgerError::ProviderNotActive {
                provider: *provider,
            }),
        }
    }

    // -- Students -----------------------------------------------------------

    /// Returns `true` if `account` is a registered student.
    pub fn is_student(&self, account: &Address) -> bool {
        self.students.contains(account)
    }

    /// Marks `account` as a student. Returns `true` if it was not one already.
    pub fn add_student(&mut self, account: Address) -> bool {
        self.students.insert(account)
    }

    /// Clears student status. Returns `true` if `account` was a student.
    pub fn remove_student(&mut self, account: &Address) -> bool {
        self.students.remove(account)
    }

    /// Iterates over registered students in unspecified order.
    pub fn students(&self) -> impl Iterator<Item = &Address> {
        self.students.iter()
    }

    // -- Service providers --------------------------------------------------

    /// Returns the provider record for `account`, if one was ever created.
    pub fn provider(&self, account: &Address) -> Option<&ServiceProvider> {
        self.providers.get(account)
    }

    /// Returns the provider record, or the default (inactive) record.
    pub fn service_provider(&self, account: &Address) -> ServiceProvider {
        self.providers.get(account).cloned().unwrap_or_default()
    }

    /// Creates or overwrites a provider record and marks it active.
    pub fn upsert_provider(&mut self, account: Address, name: String, category: String) {
        self.providers.insert(
            account,
            ServiceProvider {
                name,
                category,
                active: true,
            },
        );
    }

    /// Soft-deletes a provider. Returns `false` if no record exists, in
    /// which case nothing changes.
    pub fn deactivate_provider(&mut self, account: &Address) -> bool {
        match self.providers.get_mut(account) {
            Some(record) => {
                record.active = false;
                true
            }
            None => false,
        }
    }

    /// Overwrites every field of an existing provider record.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::ProviderNotFound`] if `account` has no record.
    pub fn update_provider(
        &mut self,
        account: &Address,
        name: String,
        category: String,
        active: bool,
    ) -> Result<(), LedgerError> {
        let record = self
            .providers
            .get_mut(account)
            .ok_or(LedgerError::ProviderNotFound { provider: *account })?;
        record.name = name;
        record.category = category;
        record.active = active;
        Ok(())
    }

    /// Iterates over every provider record in unspecified order.
    pub fn providers(&self) -> impl Iterator<Item = (&Address, &ServiceProvider)> {
        self.providers.iter()
    }
}
