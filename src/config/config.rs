use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

/// When subscribers are told about a dispatch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NotifyPolicy {
    /// After every applied dispatch, even if the new state equals the old one.
    #[default]
    Always,
    /// Only when the new state compares unequal to the previous one.
    OnChange,
}

/// What happens when `dispatch` is called while a dispatch is running on the
/// same thread (from a subscriber, middleware or the reducer itself).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReentrancyPolicy {
    /// Fail the nested call with `DispatchError::Reentrant`.
    #[default]
    Reject,
    /// Run the nested action once the current dispatch has notified everyone.
    Queue,
}

/// Policies a [`Store`](crate::Store) is built with.
///
/// Every field is optional in serialized form:
///
/// ```
/// use reservoir::{NotifyPolicy, ReentrancyPolicy, StoreConfig};
///
/// let config = StoreConfig::from_toml_str("reentrancy = \"queue\"").unwrap();
/// assert_eq!(config.notify, NotifyPolicy::Always);
/// assert_eq!(config.reentrancy, ReentrancyPolicy::Queue);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    pub notify: NotifyPolicy,
    pub reentrancy: ReentrancyPolicy,
}

impl StoreConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn with_notify(mut self, notify: NotifyPolicy) -> Self {
        self.notify = notify;
        self
    }

    pub fn with_reentrancy(mut self, reentrancy: ReentrancyPolicy) -> Self {
        self.reentrancy = reentrancy;
        self
    }
}
