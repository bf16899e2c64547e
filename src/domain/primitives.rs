//! Domain primitives: AccumName, PositionIndex.

use serde::{Deserialize, Serialize};

/// Name of an accumulator, unique within the store (e.g. "spread/pool/7").
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccumName(pub String);

impl AccumName {
    pub fn new(name: impl Into<String>) -> Self {
        AccumName(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AccumName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Opaque key of a position inside one accumulator, typically derived from an
/// owner address and/or range identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PositionIndex(pub String);

impl PositionIndex {
    pub fn new(index: impl Into<String>) -> Self {
        PositionIndex(index.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PositionIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
