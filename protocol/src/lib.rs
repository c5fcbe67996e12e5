// Copyright (c) 2026 CampusCoin Maintainers. MIT License.
// See LICENSE for details.

//! # CampusCoin Protocol — Shared Primitives
//!
//! The vocabulary every other crate in the workspace speaks:
//!
//! - **address** — opaque 20-byte account identities, with hex and label forms.
//! - **amount** — exact fixed-point token amounts (18 decimals, `u128` base units).
//! - **config** — token metadata, fee and genesis constants, and [`config::LedgerConfig`].
//!
//! Nothing in here knows about roles or balances; that lives in
//! `campus-contracts`.

pub mod address;
pub mod amount;
pub mod config;

pub use address::{Address, AddressError};
pub use amount::{Amount, AmountError};
pub use config::{ConfigError, LedgerConfig};
