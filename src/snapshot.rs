//! Snapshot encoding
//!
//! Wraps a [`DashboardView`] with producer and provenance metadata so that a
//! rendered dashboard can be handed to other tools as a self-describing JSON
//! document.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::dashboard::DashboardView;
use crate::error::DashboardError;
use crate::{PRODUCER_NAME, RETRO_VERSION};

/// Current snapshot document version
pub const SNAPSHOT_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotProducer {
    pub name: String,
    pub version: String,
    /// Identifies the session that produced the snapshot
    pub instance_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotProvenance {
    /// Where the records came from, e.g. the API base URL or a fixture directory
    pub source: String,
    pub computed_at_utc: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub snapshot_version: String,
    pub producer: SnapshotProducer,
    pub provenance: SnapshotProvenance,
    pub view: DashboardView,
}

/// Snapshot encoder for one session
pub struct SnapshotEncoder {
    instance_id: String,
}

impl Default for SnapshotEncoder {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotEncoder {
    /// Create a new encoder with a unique instance ID
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create an encoder with a specific instance ID
    pub fn with_instance_id(instance_id: String) -> Self {
        Self { instance_id }
    }

    pub fn instance_id(&self) -> &str {
        &self.instance_id
    }

    pub fn encode(&self, view: &DashboardView, source: &str) -> DashboardSnapshot {
        DashboardSnapshot {
            snapshot_version: SNAPSHOT_VERSION.to_string(),
            producer: SnapshotProducer {
                name: PRODUCER_NAME.to_string(),
                version: RETRO_VERSION.to_string(),
                instance_id: self.instance_id.clone(),
            },
            provenance: SnapshotProvenance {
                source: source.to_string(),
                computed_at_utc: Utc::now().to_rfc3339(),
            },
            view: view.clone(),
        }
    }

    /// Encode to a pretty-printed JSON string
    pub fn encode_to_json(&self, view: &DashboardView, source: &str) -> Result<String, DashboardError> {
        let snapshot = self.encode(view, source);
        Ok(serde_json::to_string_pretty(&snapshot)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DashboardConfig;
    use crate::dashboard::Dashboard;
    use crate::kudos::KudosStore;
    use pretty_assertions::assert_eq;

    fn view() -> DashboardView {
        Dashboard::empty(DashboardConfig::default())
            .with_kudos(KudosStore::with_sample_feed())
            .view()
    }

    #[test]
    fn test_encode_carries_producer_metadata() {
        let encoder = SnapshotEncoder::with_instance_id("session-1".to_string());
        let snapshot = encoder.encode(&view(), "inline fixtures");

        assert_eq!(snapshot.snapshot_version, SNAPSHOT_VERSION);
        assert_eq!(snapshot.producer.name, "retro-buddy");
        assert_eq!(snapshot.producer.version, RETRO_VERSION);
        assert_eq!(snapshot.producer.instance_id, "session-1");
        assert_eq!(snapshot.provenance.source, "inline fixtures");
        assert!(chrono::DateTime::parse_from_rfc3339(&snapshot.provenance.computed_at_utc).is_ok());
    }

    #[test]
    fn test_instance_ids_are_unique() {
        assert_ne!(SnapshotEncoder::new().instance_id(), SnapshotEncoder::new().instance_id());
    }

    #[test]
    fn test_encode_to_json_round_trips() {
        let encoder = SnapshotEncoder::new();
        let json = encoder.encode_to_json(&view(), "http://localhost:4000/api").unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(parsed.get("producer").is_some());
        assert!(parsed["view"]["kudos"].is_array());
        assert_eq!(parsed["view"]["kudos"].as_array().unwrap().len(), 4);

        let decoded: DashboardSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.view.kudos[0].sent_at, "Apr 24, 2:30 PM");
    }
}
