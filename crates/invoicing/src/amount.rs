//! Currency amounts.
//!
//! Clients submit amounts in major units ("42.50" dollars); rows store minor
//! units (4250 cents) so no floating point value is ever persisted.

use serde::{Deserialize, Serialize};

use dashboard_core::ValueObject;

/// An amount in minor currency units (cents). May be negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AmountCents(i64);

impl ValueObject for AmountCents {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountError {
    /// The raw value is not a finite number.
    NotANumber,
    /// The value does not fit in the persisted integer column.
    OutOfRange,
}

impl AmountError {
    pub fn message(self) -> &'static str {
        match self {
            AmountError::NotANumber => "Expected number, received nan",
            AmountError::OutOfRange => "Number out of range",
        }
    }
}

impl core::fmt::Display for AmountError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.message())
    }
}

impl AmountCents {
    pub const ZERO: AmountCents = AmountCents(0);

    pub fn new(cents: i64) -> Self {
        Self(cents)
    }

    pub fn cents(self) -> i64 {
        self.0
    }

    /// Convert a major-unit value to cents: `round(value * 100)`, halves away
    /// from zero.
    pub fn from_major_units(value: f64) -> Result<Self, AmountError> {
        if !value.is_finite() {
            return Err(AmountError::NotANumber);
        }
        let cents = (value * 100.0).round();
        // i64::MIN is exactly representable; i64::MAX rounds up to 2^63.
        if !cents.is_finite() || cents < i64::MIN as f64 || cents >= i64::MAX as f64 {
            return Err(AmountError::OutOfRange);
        }
        Ok(Self(cents as i64))
    }

    /// Coerce a raw form value and convert it to cents.
    pub fn coerce(raw: Option<&str>) -> Result<Self, AmountError> {
        Self::from_major_units(coerce_number(raw)?)
    }
}

/// Loose number coercion for form input.
///
/// A missing or blank value is `0`. Anything else must parse as a finite
/// decimal number once surrounding whitespace is trimmed.
pub fn coerce_number(raw: Option<&str>) -> Result<f64, AmountError> {
    let trimmed = match raw {
        None => return Ok(0.0),
        Some(s) => s.trim(),
    };
    if trimmed.is_empty() {
        return Ok(0.0);
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(AmountError::NotANumber),
    }
}

impl core::fmt::Display for AmountCents {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{sign}{}.{:02}", abs / 100, abs % 100)
    }
}
