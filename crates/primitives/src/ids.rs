//! Identifier type definitions.

use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};

/// Identifier of a single security (one share class).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, From, Into, Serialize,
    Deserialize,
)]
pub struct SecurityId(pub u64);

impl SecurityId {
    /// Create a new security ID.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }
}

/// Identifier of the parent firm shared by all of its share classes.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, From, Into, Serialize,
    Deserialize,
)]
pub struct FirmId(pub u64);

impl FirmId {
    /// Create a new firm ID.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }
}

/// Accounting-side company key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
pub struct CompanyKey(pub String);

impl CompanyKey {
    /// Create a new company key.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }
}

impl From<&str> for CompanyKey {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for CompanyKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn company_key_from_str() {
        let key: CompanyKey = "001004".into();
        assert_eq!(key.to_string(), "001004");
    }

    #[test]
    fn ids_order_numerically() {
        assert!(SecurityId::new(10001) < SecurityId::new(10002));
        assert_eq!(FirmId::from(7).to_string(), "7");
        assert_eq!(u64::from(SecurityId::new(42)), 42);
    }
}
