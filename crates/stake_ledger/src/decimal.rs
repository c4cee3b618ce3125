//! Explicit arithmetic context for ledger math.
//!
//! Every operation rounds its result to a fixed number of significant digits
//! using round-half-even. Intermediate results never carry more digits than
//! the context allows.
//!
//! # Example
//!
//! ```rust,ignore
//! use stake_ledger::DecimalContext;
//!
//! let ctx = DecimalContext::default();
//! let third = ctx.div(&1.into(), &3.into()).unwrap();
//! ```

use crate::error::{Error, Result};
use bigdecimal::{BigDecimal, RoundingMode};
use num_bigint::BigInt;
use num_traits::Zero;
use std::num::NonZeroU64;

/// Default number of significant digits.
pub const DEFAULT_PRECISION: u64 = 30;

/// Precision and rounding rules applied to every ledger computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecimalContext {
    precision: NonZeroU64,
    rounding: RoundingMode,
}

impl Default for DecimalContext {
    fn default() -> Self {
        Self {
            precision: NonZeroU64::new(DEFAULT_PRECISION).unwrap_or(NonZeroU64::MIN),
            rounding: RoundingMode::HalfEven,
        }
    }
}

impl DecimalContext {
    /// Creates a context with the given number of significant digits.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPrecision`] when `precision` is zero.
    pub fn new(precision: u64) -> Result<Self> {
        let precision = NonZeroU64::new(precision).ok_or(Error::InvalidPrecision(precision))?;
        Ok(Self {
            precision,
            rounding: RoundingMode::HalfEven,
        })
    }

    /// Sets the rounding mode.
    #[must_use]
    pub const fn with_rounding(mut self, rounding: RoundingMode) -> Self {
        self.rounding = rounding;
        self
    }

    /// Number of significant digits kept.
    pub const fn precision(&self) -> u64 {
        self.precision.get()
    }

    /// Rounding mode applied after each operation.
    pub const fn rounding(&self) -> RoundingMode {
        self.rounding
    }

    /// Rounds a value to the context precision.
    pub fn round(&self, value: &BigDecimal) -> BigDecimal {
        value.with_precision_round(self.precision, self.rounding)
    }

    /// `a + b`, rounded.
    pub fn add(&self, a: &BigDecimal, b: &BigDecimal) -> BigDecimal {
        self.round(&(a + b))
    }

    /// `a - b`, rounded.
    pub fn sub(&self, a: &BigDecimal, b: &BigDecimal) -> BigDecimal {
        self.round(&(a - b))
    }

    /// `a * b`, rounded.
    pub fn mul(&self, a: &BigDecimal, b: &BigDecimal) -> BigDecimal {
        self.round(&(a * b))
    }

    /// `a / b`, rounded. `None` when `b` is zero.
    pub fn div(&self, a: &BigDecimal, b: &BigDecimal) -> Option<BigDecimal> {
        if b.is_zero() {
            return None;
        }
        Some(self.round(&(a / b)))
    }

    /// Rounded running sum, accumulated left to right from zero.
    pub fn sum<I>(&self, values: I) -> BigDecimal
    where
        I: IntoIterator<Item = BigDecimal>,
    {
        values
            .into_iter()
            .fold(BigDecimal::zero(), |acc, v| self.add(&acc, &v))
    }
}

/// Floor of `value` as an integer.
pub fn floor_to_integer(value: &BigDecimal) -> BigInt {
    let (digits, scale) = value
        .with_scale_round(0, RoundingMode::Floor)
        .into_bigint_and_exponent();
    debug_assert_eq!(scale, 0);
    digits
}
