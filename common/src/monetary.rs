//! Fixed-point amount, fee and rate types.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Result, SwapError};

/// A token quantity in the token's smallest indivisible unit.
pub type Amount = u128;

/// Number of fractional decimal digits carried by a [`FeePercent`].
pub const PCT_DECIMALS: u32 = 8;

/// Scaled value of one percent.
pub const PCT_UNIT: u64 = 100_000_000;

/// Scaled value of 100%.
pub const PCT_SCALE: u64 = 100 * PCT_UNIT;

/// A fee percentage scaled by [`PCT_SCALE`] (10% is `10 * 10^8`).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct FeePercent(u64);

impl FeePercent {
    /// No fee.
    pub const ZERO: Self = Self(0);

    /// The whole input is withheld.
    pub const MAX: Self = Self(PCT_SCALE);

    /// Create from a raw scaled value.
    ///
    /// Values above [`PCT_SCALE`] are representable so they can be reported
    /// back in errors; use [`is_valid`](Self::is_valid) or
    /// [`validated`](Self::validated) before storing one.
    pub const fn from_scaled(value: u64) -> Self {
        Self(value)
    }

    /// Create from a whole number of percent.
    pub fn from_whole_percent(percent: u64) -> Result<Self> {
        percent
            .checked_mul(PCT_UNIT)
            .map(Self)
            .ok_or(SwapError::InvalidPercentage {
                value: u64::MAX,
                max: PCT_SCALE,
            })?
            .validated()
    }

    /// Create from a human decimal percentage such as `10.5`.
    pub fn from_percent(percent: Decimal) -> Result<Self> {
        let scaled = percent
            .checked_mul(Decimal::from(PCT_UNIT))
            .ok_or(SwapError::InvalidPercentage {
                value: u64::MAX,
                max: PCT_SCALE,
            })?;
        if percent.is_sign_negative() || !scaled.fract().is_zero() {
            return Err(SwapError::InvalidPercentage {
                value: scaled.trunc().abs().to_u64().unwrap_or(u64::MAX),
                max: PCT_SCALE,
            });
        }

        let raw = scaled.to_u64().ok_or(SwapError::InvalidPercentage {
            value: u64::MAX,
            max: PCT_SCALE,
        })?;
        Self(raw).validated()
    }

    /// Get the raw scaled value.
    pub const fn get(&self) -> u64 {
        self.0
    }

    /// Check the value lies in `[0, PCT_SCALE]`.
    pub const fn is_valid(&self) -> bool {
        self.0 <= PCT_SCALE
    }

    /// Return `self` if valid, `InvalidPercentage` otherwise.
    pub fn validated(self) -> Result<Self> {
        if self.is_valid() {
            Ok(self)
        } else {
            Err(SwapError::InvalidPercentage {
                value: self.0,
                max: PCT_SCALE,
            })
        }
    }

    /// The percentage as a decimal (`10.5` for 10.5%).
    pub fn as_percent(&self) -> Decimal {
        Decimal::from_i128_with_scale(self.0 as i128, PCT_DECIMALS).normalize()
    }
}

impl fmt::Display for FeePercent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.as_percent())
    }
}

/// Units of token A exchanged for one unit of token B. Always positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u128", into = "u128")]
pub struct Rate(u128);

impl Rate {
    /// Create a new rate.
    pub fn new(value: u128) -> Result<Self> {
        if value == 0 {
            return Err(SwapError::InvalidRate);
        }
        Ok(Self(value))
    }

    /// Get the raw rate.
    pub const fn get(&self) -> u128 {
        self.0
    }
}

impl TryFrom<u128> for Rate {
    type Error = SwapError;

    fn try_from(value: u128) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Rate> for u128 {
    fn from(rate: Rate) -> Self {
        rate.0
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
