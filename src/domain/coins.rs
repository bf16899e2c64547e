//! Multi-denomination decimal coin sets.
//!
//! A [`DecCoins`] maps a denomination to an exact decimal amount. Zero amounts
//! are never stored, so two sets are equal iff they hold the same non-zero
//! entries. All binary operations work over the union of denominations with a
//! missing denomination read as zero, and return `None` instead of leaving the
//! decimal range.

use super::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoinsParseError {
    #[error("invalid coin entry {0:?}: expected <amount><denom>")]
    MalformedEntry(String),
    #[error("invalid denomination {0:?}")]
    InvalidDenom(String),
    #[error("invalid amount {amount:?} in entry {entry:?}: {reason}")]
    InvalidAmount {
        entry: String,
        amount: String,
        reason: String,
    },
    #[error("duplicate entries for {0:?} overflow the decimal range")]
    Overflow(String),
}

/// Sorted, zero-free multi-denomination decimal amount.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct DecCoins(BTreeMap<String, Decimal>);

impl DecCoins {
    /// The empty coin set.
    pub fn new() -> Self {
        DecCoins(BTreeMap::new())
    }

    /// Single-denomination coin set.
    pub fn from_coin(denom: impl Into<String>, amount: Decimal) -> Self {
        let mut coins = BTreeMap::new();
        if !amount.is_zero() {
            coins.insert(denom.into(), amount);
        }
        DecCoins(coins)
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Amount held for `denom`, zero if absent.
    pub fn amount_of(&self, denom: &str) -> Decimal {
        self.0.get(denom).copied().unwrap_or_default()
    }

    pub fn denoms(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Decimal)> {
        self.0.iter().map(|(denom, amount)| (denom.as_str(), *amount))
    }

    /// Returns true if any entry is strictly negative.
    pub fn is_any_negative(&self) -> bool {
        self.0.values().any(Decimal::is_negative)
    }

    /// Returns true if every denomination in the union satisfies `self >= other`.
    pub fn is_all_gte(&self, other: &DecCoins) -> bool {
        self.iter()
            .all(|(denom, amount)| amount >= other.amount_of(denom))
            && other
                .iter()
                .all(|(denom, amount)| self.amount_of(denom) >= amount)
    }

    /// Component-wise sum, or `None` if any entry leaves the decimal range.
    pub fn checked_add(&self, other: &DecCoins) -> Option<DecCoins> {
        let mut out = self.clone();
        for (denom, amount) in other.iter() {
            out.checked_add_amount(denom, amount)?;
        }
        Some(out)
    }

    /// Component-wise difference, or `None` if any entry leaves the decimal range.
    pub fn checked_sub(&self, other: &DecCoins) -> Option<DecCoins> {
        let mut out = self.clone();
        for (denom, amount) in other.iter() {
            out.checked_add_amount(denom, -amount)?;
        }
        Some(out)
    }

    /// Every entry times `scalar`, or `None` on overflow.
    pub fn checked_mul_dec(&self, scalar: Decimal) -> Option<DecCoins> {
        let mut out = BTreeMap::new();
        for (denom, amount) in self.iter() {
            let product = amount.checked_mul(scalar)?;
            if !product.is_zero() {
                out.insert(denom.to_string(), product);
            }
        }
        Some(DecCoins(out))
    }

    /// Every entry divided by `scalar`, or `None` on a zero divisor or overflow.
    pub fn checked_quo_dec(&self, scalar: Decimal) -> Option<DecCoins> {
        let mut out = BTreeMap::new();
        for (denom, amount) in self.iter() {
            let quotient = amount.checked_div(scalar)?;
            if !quotient.is_zero() {
                out.insert(denom.to_string(), quotient);
            }
        }
        Some(DecCoins(out))
    }

    fn checked_add_amount(&mut self, denom: &str, amount: Decimal) -> Option<()> {
        if amount.is_zero() {
            return Some(());
        }
        let updated = self.amount_of(denom).checked_add(amount)?;
        if updated.is_zero() {
            self.0.remove(denom);
        } else {
            self.0.insert(denom.to_string(), updated);
        }
        Some(())
    }

    /// Canonical text form: `<amount><denom>` entries joined by commas, sorted by denom.
    pub fn to_canonical_string(&self) -> String {
        self.0
            .iter()
            .map(|(denom, amount)| format!("{}{}", amount.to_canonical_string(), denom))
            .collect::<Vec<_>>()
            .join(",")
    }
}

fn is_valid_denom(denom: &str) -> bool {
    let mut chars = denom.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | ':' | '.' | '_' | '-'))
}

fn parse_entry(entry: &str) -> Result<(String, Decimal), CoinsParseError> {
    let split = entry
        .find(|c: char| c.is_ascii_alphabetic())
        .ok_or_else(|| CoinsParseError::MalformedEntry(entry.to_string()))?;
    let (amount_str, denom) = entry.split_at(split);
    if amount_str.is_empty() {
        return Err(CoinsParseError::MalformedEntry(entry.to_string()));
    }
    if !is_valid_denom(denom) {
        return Err(CoinsParseError::InvalidDenom(denom.to_string()));
    }
    let amount =
        Decimal::from_str_canonical(amount_str).map_err(|e| CoinsParseError::InvalidAmount {
            entry: entry.to_string(),
            amount: amount_str.to_string(),
            reason: e.to_string(),
        })?;
    Ok((denom.to_string(), amount))
}

impl FromStr for DecCoins {
    type Err = CoinsParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Ok(DecCoins::new());
        }
        let mut coins = DecCoins::new();
        for entry in trimmed.split(',') {
            let (denom, amount) = parse_entry(entry.trim())?;
            coins
                .checked_add_amount(&denom, amount)
                .ok_or(CoinsParseError::Overflow(denom))?;
        }
        Ok(coins)
    }
}

impl fmt::Display for DecCoins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_canonical_string())
    }
}

impl Serialize for DecCoins {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_canonical_string())
    }
}

impl<'de> Deserialize<'de> for DecCoins {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        DecCoins::from_str(&raw).map_err(serde::de::Error::custom)
    }
}
