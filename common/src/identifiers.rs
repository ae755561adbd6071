//! Identifier types for TokenSwap entities.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for a completed swap.
/// Uses UUID v7 for time-ordered identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SwapId(Uuid);

impl SwapId {
    /// Create a new swap ID.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Create from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Parse from string.
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }

    /// Get the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for SwapId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SwapId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An account on a token ledger (a wallet address or an engine's own account).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AccountId(String);

impl AccountId {
    /// Create a new account ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Validate the account ID format.
    pub fn is_valid(&self) -> bool {
        !self.0.is_empty()
            && self.0.len() <= 64
            && self
                .0
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for AccountId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for AccountId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Handle identifying one fungible token (its ledger address or symbol).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenId(String);

impl TokenId {
    /// Create a new token ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for TokenId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// A named permission held by zero or more accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Capability {
    /// May change swap configuration.
    Admin,
    /// May mint on a mint/burn ledger.
    Minter,
}

impl Capability {
    /// Role name as exposed to external role stores.
    pub fn role_name(&self) -> &'static str {
        match self {
            Capability::Admin => "DEFAULT_ADMIN_ROLE",
            Capability::Minter => "MINTER_ROLE",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.role_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_swap_id_creation() {
        let id1 = SwapId::new();
        let id2 = SwapId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn test_swap_id_parse() {
        let uuid_str = "019456ab-1234-7def-8901-234567890abc";
        let id = SwapId::parse(uuid_str).unwrap();
        assert_eq!(id.to_string(), uuid_str);
    }

    #[test]
    fn test_account_id_validation() {
        assert!(AccountId::new("holder_1").is_valid());
        assert!(AccountId::new("token-swap").is_valid());
        assert!(!AccountId::new("").is_valid());
        assert!(!AccountId::new("has space").is_valid());
    }

    #[test]
    fn test_capability_role_names() {
        assert_eq!(Capability::Admin.to_string(), "DEFAULT_ADMIN_ROLE");
        assert_eq!(Capability::Minter.to_string(), "MINTER_ROLE");
    }
}
