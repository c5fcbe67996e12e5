//! # Fixed-Point Token Amounts
//!
//! Every balance in CampusCoin is an integer count of base units, where one
//! token is `10^18` base units. User-facing amounts are decimal strings
//! ("100", "0.99") and are converted exactly. No binary floating point ever
//! touches a balance.
//!
//! The serde representation is the decimal token string.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::config::{BASE_UNITS_PER_TOKEN, BPS_DENOMINATOR, DECIMALS};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur while parsing a decimal token amount.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AmountError {
    /// The input string was empty.
    #[error("empty amount")]
    Empty,

    /// The input contained something other than digits and a single `.`.
    #[error("invalid character {found:?} in amount {input:?}")]
    InvalidCharacter {
        /// The full input string.
        input: String,
        /// The first offending character.
        found: char,
    },

    /// More fractional digits than the token supports.
    #[error("amount {input:?} has {digits} fractional digits, maximum is {DECIMALS}")]
    TooManyDecimals {
        /// The full input string.
        input: String,
        /// Number of fractional digits supplied.
        digits: usize,
    },

    /// The amount does not fit in 128 bits of base units.
    #[error("amount {0:?} overflows the base-unit range")]
    Overflow(String),
}

// ---------------------------------------------------------------------------
// Amount
// ---------------------------------------------------------------------------

/// A non-negative quantity of CampusCoin, stored as base units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(u128);

impl Amount {
    /// The zero amount.
    pub const ZERO: Amount = Amount(0);

    /// Wraps a raw base-unit count.
    pub const fn from_base_units(units: u128) -> Self {
        Self(units)
    }

    /// Converts whole tokens to base units. Cannot overflow: `u64::MAX`
    /// tokens is roughly `1.8 * 10^37` base units, well inside `u128`.
    pub const fn from_tokens(tokens: u64) -> Self {
        Self(tokens as u128 * BASE_UNITS_PER_TOKEN)
    }

    /// Returns the raw base-unit count.
    pub const fn base_units(self) -> u128 {
        self.0
    }

    /// Returns `true` for the zero amount.
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Parses a decimal token quantity such as `"100"` or `"0.25"`.
    ///
    /// The integer part is mandatory; a fractional part, when present, must
    /// have between 1 and 18 digits. Signs, exponents and whitespace are
    /// rejected.
    ///
    /// # Errors
    ///
    /// See [`AmountError`] for the individual failure modes.
    pub fn parse_tokens(input: &str) -> Result<Self, AmountError> {
        if input.is_empty() {
            return Err(AmountError::Empty);
        }

        let (whole, fraction) = match input.split_once('.') {
            Some((w, f)) => (w, Some(f)),
            None => (input, None),
        };

        let invalid = |found: char| AmountError::InvalidCharacter {
            input: input.to_string(),
            found,
        };

        if whole.is_empty() {
            return Err(invalid('.'));
        }
        if let Some(c) = whole.chars().find(|c| !c.is_ascii_digit()) {
            return Err(invalid(c));
        }

        let overflow = || AmountError::Overflow(input.to_string());
        let mut units = whole
            .parse::<u128>()
            .map_err(|_| overflow())?
            .checked_mul(BASE_UNITS_PER_TOKEN)
            .ok_or_else(overflow)?;

        if let Some(fraction) = fraction {
            if fraction.is_empty() {
                return Err(invalid('.'));
            }
            if let Some(c) = fraction.chars().find(|c| !c.is_ascii_digit()) {
                return Err(invalid(c));
            }
            if fraction.len() > DECIMALS as usize {
                return Err(AmountError::TooManyDecimals {
                    input: input.to_string(),
                    digits: fraction.len(),
                });
            }
            // Right-pad to 18 digits: "25" -> 250000000000000000.
            let scale = 10u128.pow(DECIMALS as u32 - fraction.len() as u32);
            let frac_units = fraction.parse::<u128>().map_err(|_| overflow())? * scale;
            units = units.checked_add(frac_units).ok_or_else(overflow)?;
        }

        Ok(Self(units))
    }

    /// Checked addition. Returns `None` on overflow.
    pub fn checked_add(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_add(rhs.0).map(Amount)
    }

    /// Checked subtraction. Returns `None` if `rhs > self`.
    pub fn checked_sub(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_sub(rhs.0).map(Amount)
    }

    /// Returns `floor(self * bps / 10_000)` without ever forming the full
    /// product, so it is exact across the whole `u128` range.
    ///
    /// Returns `None` only when `bps` exceeds the denominator and the result
    /// would not fit.
    pub fn checked_bps(self, bps: u16) -> Option<Amount> {
        let denom = u128::from(BPS_DENOMINATOR);
        let bps = u128::from(bps);
        let quotient = self.0 / denom;
        let remainder = self.0 % denom;
        quotient
            .checked_mul(bps)?
            .checked_add(remainder * bps / denom)
            .map(Amount)
    }

    /// Sums an iterator of amounts, returning `None` on overflow.
    pub fn checked_sum<I>(iter: I) -> Option<Amount>
    where
        I: IntoIterator<Item = Amount>,
    {
        iter.into_iter()
            .try_fold(Amount::ZERO, |acc, a| acc.checked_add(a))
    }
}

impl fmt::Display for Amount {
    /// Shortest exact decimal rendering in whole tokens: `100`, `0.99`,
    /// `0.000000000000000001`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / BASE_UNITS_PER_TOKEN;
        let fraction = self.0 % BASE_UNITS_PER_TOKEN;
        if fraction == 0 {
            return write!(f, "{}", whole);
        }
        let digits = format!("{:0width$}", fraction, width = DECIMALS as usize);
        write!(f, "{}.{}", whole, digits.trim_end_matches('0'))
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Amount::parse_tokens(s)
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct AmountVisitor;

        impl<'de> Visitor<'de> for AmountVisitor {
            type Value = Amount;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a decimal token amount as a string or whole-token integer")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Amount, E> {
                Amount::parse_tokens(v).map_err(E::custom)
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Amount, E> {
                Ok(Amount::from_tokens(v))
            }
        }

        deserializer.deserialize_any(AmountVisitor)
    }
}
