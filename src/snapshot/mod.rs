//! Point-in-time capture of a machine's runtime position.
//!
//! A snapshot holds the current state and the transition history. The
//! transition table is code, not data, and is never part of a snapshot:
//! restoring re-homes a machine whose rules were registered again by the
//! caller.

use crate::core::TransitionHistory;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

pub mod error;

pub use error::SnapshotError;

/// Version identifier for snapshot format
pub const SNAPSHOT_VERSION: u32 = 1;

/// Serializable capture of where a machine is.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot<S, E> {
    /// Snapshot format version
    pub version: u32,

    /// Unique snapshot identifier
    pub id: String,

    /// When the snapshot was taken
    pub taken_at: DateTime<Utc>,

    /// Current state, `None` for a machine that was never given one
    pub current_state: Option<S>,

    pub history: TransitionHistory<S, E>,
}

impl<S, E> Snapshot<S, E> {
    pub fn new(current_state: Option<S>, history: TransitionHistory<S, E>) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            id: uuid::Uuid::new_v4().to_string(),
            taken_at: Utc::now(),
            current_state,
            history,
        }
    }

    pub(crate) fn check_version(&self) -> Result<(), SnapshotError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion {
                found: self.version,
                supported: SNAPSHOT_VERSION,
            });
        }
        Ok(())
    }
}

impl<S: Serialize, E: Serialize> Snapshot<S, E> {
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        serde_json::to_string(self).map_err(|e| SnapshotError::SerializationFailed(e.to_string()))
    }
}

impl<S: DeserializeOwned, E: DeserializeOwned> Snapshot<S, E> {
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let snapshot: Self = serde_json::from_str(json)
            .map_err(|e| SnapshotError::DeserializationFailed(e.to_string()))?;
        snapshot.check_version()?;
        Ok(snapshot)
    }
}
