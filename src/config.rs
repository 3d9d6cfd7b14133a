//! Machine configuration.

use serde::{Deserialize, Serialize};

/// What happens when a transition is registered for an `(event, from)`
/// pair that already has one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Last registration wins
    #[default]
    Replace,

    /// Fail with `TransitionCreationError::DuplicateTransition`
    Reject,
}

/// Tunables for a `StateMachine`.
///
/// Every field has a default, so partial JSON documents are accepted:
///
/// ```rust
/// use statecraft::config::{DuplicatePolicy, MachineConfig};
///
/// let config = MachineConfig::from_json(r#"{ "duplicate_policy": "reject" }"#).unwrap();
/// assert_eq!(config.duplicate_policy, DuplicatePolicy::Reject);
/// assert!(!config.record_history);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    pub duplicate_policy: DuplicatePolicy,

    /// Keep a `TransitionHistory` of every state change
    pub record_history: bool,
}

impl MachineConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }

    pub fn record_history(mut self, enabled: bool) -> Self {
        self.record_history = enabled;
        self
    }
}
