//! # Ledger Configuration & Constants
//!
//! Every magic number in CampusCoin lives here. Token metadata, fixed-point
//! precision, the genesis allocation, and the service-fee rate are all
//! defined once and referenced everywhere else.
//!
//! The token metadata constants are part of the public surface (`name()`,
//! `symbol()`, `decimals()`), so changing them is a breaking change for
//! every client that displays balances.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::amount::Amount;

// ---------------------------------------------------------------------------
// Token Metadata
// ---------------------------------------------------------------------------

/// Human-readable token name returned by `name()`.
pub const TOKEN_NAME: &str = "CampusCoin";

/// Ticker symbol returned by `symbol()`.
pub const TOKEN_SYMBOL: &str = "CC";

/// Number of fractional decimal digits. One token is `10^18` base units,
/// the same precision as Ether.
pub const DECIMALS: u8 = 18;

/// Base units per whole token (`10^DECIMALS`).
pub const BASE_UNITS_PER_TOKEN: u128 = 1_000_000_000_000_000_000;

/// Crate version, assembled at compile time.
pub const LEDGER_VERSION: &str = env!("CARGO_PKG_VERSION");

// ---------------------------------------------------------------------------
// Genesis
// ---------------------------------------------------------------------------

/// Whole tokens credited to the administrator at deployment. The admin
/// holds the entire genesis supply; students only ever receive freshly
/// minted tokens or transfers.
pub const DEFAULT_GENESIS_SUPPLY_TOKENS: u64 = 1_000_000;

// ---------------------------------------------------------------------------
// Fee Parameters
// ---------------------------------------------------------------------------

/// Basis-point denominator. 10_000 bps = 100%.
pub const BPS_DENOMINATOR: u16 = 10_000;

/// Service-payment fee skimmed to the university treasury, in basis points.
/// 100 bps = 1%, truncated toward zero on every payment.
pub const SERVICE_FEE_BPS: u16 = 100;

// ---------------------------------------------------------------------------
// LedgerConfig
// ---------------------------------------------------------------------------

/// Errors raised when a [`LedgerConfig`] is internally inconsistent.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The fee rate exceeds 100%.
    #[error("service fee of {0} bps exceeds {BPS_DENOMINATOR} bps")]
    FeeTooHigh(u16),
}

/// Tunable deployment parameters.
///
/// Roles are not part of the config: the admin is whoever deploys, and the
/// university is the single constructor argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    /// Supply credited to the admin at genesis.
    pub genesis_supply: Amount,
    /// Fee taken from every service payment, in basis points.
    pub service_fee_bps: u16,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            genesis_supply: Amount::from_tokens(DEFAULT_GENESIS_SUPPLY_TOKENS),
            service_fee_bps: SERVICE_FEE_BPS,
        }
    }
}

impl LedgerConfig {
    /// Checks that the configuration can be deployed.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::FeeTooHigh`] if `service_fee_bps` is above
    /// [`BPS_DENOMINATOR`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.service_fee_bps > BPS_DENOMINATOR {
            return Err(ConfigError::FeeTooHigh(self.service_fee_bps));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_units_match_decimals() {
        assert_eq!(BASE_UNITS_PER_TOKEN, 10u128.pow(DECIMALS as u32));
    }

    #[test]
    fn test_default_fee_is_one_percent() {
        assert_eq!(
            u32::from(SERVICE_FEE_BPS) * 100,
            u32::from(BPS_DENOMINATOR)
        );
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = LedgerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(
            config.genesis_supply,
            Amount::from_tokens(DEFAULT_GENESIS_SUPPLY_TOKENS)
        );
    }

    #[test]
    fn test_fee_above_denominator_rejected() {
        let config = LedgerConfig {
            service_fee_bps: BPS_DENOMINATOR + 1,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::FeeTooHigh(BPS_DENOMINATOR + 1))
        );
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: LedgerConfig = serde_json::from_str(r#"{"service_fee_bps": 250}"#).unwrap();
        assert_eq!(config.service_fee_bps, 250);
        assert_eq!(config.genesis_supply, LedgerConfig::default().genesis_supply);
    }
}
