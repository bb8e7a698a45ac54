//! Core types for the account/OU directory surface.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Opaque, globally unique account identifier assigned by the directory.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    /// Wrap a raw identifier string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AccountId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Opaque organizational-unit identifier assigned by the directory on
/// creation. Desired-state nodes have no identifier until created.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OuId(String);

impl OuId {
    /// Wrap a raw identifier string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw identifier string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OuId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OuId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Lifecycle status of an account.
///
/// Suspended accounts block most mutating operations until resolved;
/// accounts pending closure are on their way out of the organization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountStatus {
    /// In good standing; all operations allowed
    Active,
    /// Suspended; most mutating operations are blocked
    Suspended,
    /// Closure requested; on its way out of the organization
    PendingClosure,
}

impl AccountStatus {
    /// Whether the account is suspended.
    pub fn is_suspended(&self) -> bool {
        matches!(self, Self::Suspended)
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Active => "ACTIVE",
            Self::Suspended => "SUSPENDED",
            Self::PendingClosure => "PENDING_CLOSURE",
        };
        f.write_str(s)
    }
}

/// An account as reported by the directory service.
///
/// Accounts always have exactly one parent OU. The directory owns name,
/// email, and status; this core only ever changes the parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountRecord {
    /// Globally unique identifier
    pub id: AccountId,
    /// Display name
    pub name: String,
    /// Contact email, unique within the organization
    pub email: String,
    /// Lifecycle status
    pub status: AccountStatus,
    /// Current parent OU
    pub parent: OuId,
}

/// An organizational unit as reported by the directory service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OuRecord {
    /// Identifier assigned by the directory
    pub id: OuId,
    /// Human name, unique among siblings (not globally)
    pub name: String,
    /// Parent OU; `None` only for the organization root
    pub parent: Option<OuId>,
}

/// Configuration for retry logic against the directory service.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the first)
    pub max_attempts: u32,
    /// Base delay between retries
    pub base_delay: Duration,
    /// Multiplier for exponential backoff
    pub backoff_factor: f64,
    /// Maximum delay between retries
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay: Duration::from_millis(500),
            backoff_factor: 2.0,
            max_delay: Duration::from_secs(30),
        }
    }
}

impl RetryConfig {
    /// Create a new retry config with custom settings.
    pub fn new(max_attempts: u32, base_delay: Duration, backoff_factor: f64) -> Self {
        Self {
            max_attempts,
            base_delay,
            backoff_factor,
            max_delay: Duration::from_secs(30),
        }
    }

    /// Calculate the delay for a given attempt number (0-indexed).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let delay = self.base_delay.as_secs_f64() * self.backoff_factor.powi(attempt as i32);
        let capped = delay.min(self.max_delay.as_secs_f64());
        Duration::from_secs_f64(capped)
    }

    /// Create a config that never retries.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_status_suspended() {
        assert!(AccountStatus::Suspended.is_suspended());
        assert!(!AccountStatus::Active.is_suspended());
        assert!(!AccountStatus::PendingClosure.is_suspended());
    }

    #[test]
    fn test_status_serde_wire_format() {
        let json = serde_json::to_string(&AccountStatus::PendingClosure).unwrap();
        assert_eq!(json, "\"PENDING_CLOSURE\"");
        let back: AccountStatus = serde_json::from_str("\"SUSPENDED\"").unwrap();
        assert_eq!(back, AccountStatus::Suspended);
    }

    #[test]
    fn test_retry_config_delay() {
        let config = RetryConfig::new(5, Duration::from_secs(1), 2.0);

        assert_eq!(config.delay_for_attempt(0), Duration::from_secs(1));
        assert_eq!(config.delay_for_attempt(1), Duration::from_secs(2));
        assert_eq!(config.delay_for_attempt(2), Duration::from_secs(4));
        assert_eq!(config.delay_for_attempt(3), Duration::from_secs(8));
    }

    #[test]
    fn test_retry_config_max_delay() {
        let config = RetryConfig {
            max_delay: Duration::from_secs(3),
            ..RetryConfig::new(5, Duration::from_secs(1), 2.0)
        };

        assert_eq!(config.delay_for_attempt(4), Duration::from_secs(3));
    }

    #[test]
    fn test_id_display() {
        assert_eq!(AccountId::new("111111111111").to_string(), "111111111111");
        assert_eq!(OuId::new("ou-ab12").as_str(), "ou-ab12");
    }
}
