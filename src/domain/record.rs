//! Position record persisted per (accumulator, position index).

use super::{DecCoins, Decimal};
use serde::{Deserialize, Serialize};

/// Caller-defined settlement configuration carried by a position.
///
/// The engine never inspects it; every lifecycle operation passes it through
/// unmodified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PositionOptions(pub serde_json::Value);

impl PositionOptions {
    pub fn new(value: serde_json::Value) -> Self {
        PositionOptions(value)
    }

    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }
}

/// Stored state of one live position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Share units; strictly positive while the record exists.
    pub num_shares: Decimal,
    /// Accumulator value at creation or last settlement.
    pub init_accum_value: DecCoins,
    /// Rewards settled but not yet paid out.
    pub unclaimed_rewards: DecCoins,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<PositionOptions>,
}
