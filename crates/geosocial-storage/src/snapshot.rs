//! Serializable graph snapshots.
//!
//! A snapshot is the store's own JSON exchange format. Relationships are
//! directed unless `undirected` is set.

use serde::{Deserialize, Serialize};
use tracing::info;

use geosocial_domain::{KeywordId, Location, TimeWindow, UserId};

use crate::error::{StorageError, StorageResult};
use crate::memory::MemoryGraphStore;

/// A keyword with its optional time window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordSnapshot {
    pub keyword: KeywordId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window: Option<TimeWindow>,
}

/// One user and its attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserSnapshot {
    pub id: UserId,
    #[serde(default)]
    pub keywords: Vec<KeywordSnapshot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

/// One relationship.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipSnapshot {
    pub from: UserId,
    pub to: UserId,
    pub weight: f64,
    #[serde(default)]
    pub undirected: bool,
}

/// Whole-graph snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    #[serde(default)]
    pub users: Vec<UserSnapshot>,
    #[serde(default)]
    pub relationships: Vec<RelationshipSnapshot>,
}

impl GraphSnapshot {
    pub fn from_json(json: &str) -> StorageResult<Self> {
        serde_json::from_str(json).map_err(|e| StorageError::SerializationError {
            message: e.to_string(),
        })
    }

    pub fn to_json(&self) -> StorageResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| StorageError::SerializationError {
            message: e.to_string(),
        })
    }
}

impl MemoryGraphStore {
    /// Builds a store from a snapshot. Users are added before relationships,
    /// so relationship order follows the snapshot.
    pub fn from_snapshot(snapshot: &GraphSnapshot) -> StorageResult<Self> {
        let store = Self::new();

        for user in &snapshot.users {
            store.add_user(user.id.clone(), Default::default())?;
            for keyword in &user.keywords {
                store.add_keyword(&user.id, keyword.keyword.clone(), keyword.window)?;
            }
            if let Some(location) = user.location {
                store.set_location(&user.id, location)?;
            }
        }

        for rel in &snapshot.relationships {
            if rel.undirected {
                store.add_undirected_relationship(&rel.from, &rel.to, rel.weight)?;
            } else {
                store.add_relationship(&rel.from, &rel.to, rel.weight)?;
            }
        }

        info!(
            users = store.user_count(),
            relationships = store.relationship_count(),
            "graph loaded from snapshot"
        );
        Ok(store)
    }

    /// Exports the store. Users are sorted by id; relationships are written
    /// as directed edges in stored order.
    pub fn snapshot(&self) -> StorageResult<GraphSnapshot> {
        let mut snapshot = GraphSnapshot::default();

        for id in self.user_ids() {
            let entry = self.entry(&id)?;
            snapshot.users.push(UserSnapshot {
                id: id.clone(),
                keywords: entry
                    .keywords
                    .iter()
                    .map(|keyword| KeywordSnapshot {
                        keyword: keyword.clone(),
                        window: entry.windows.get(keyword).copied(),
                    })
                    .collect(),
                location: entry.location,
            });
            snapshot
                .relationships
                .extend(entry.relationships.iter().map(|rel| RelationshipSnapshot {
                    from: rel.from.clone(),
                    to: rel.to.clone(),
                    weight: rel.weight,
                    undirected: false,
                }));
        }

        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geosocial_domain::GraphAccess;

    const SAMPLE: &str = r#"{
        "users": [
            {"id": "q", "keywords": [{"keyword": "coffee", "window": {"start": 0, "end": 10}}, {"keyword": "jazz"}]},
            {"id": "n1", "keywords": [{"keyword": "coffee"}], "location": {"lat": 1.5, "lon": 2.5}},
            {"id": "n2"}
        ],
        "relationships": [
            {"from": "q", "to": "n1", "weight": 2.0, "undirected": true},
            {"from": "n1", "to": "n2", "weight": 1.0}
        ]
    }"#;

    fn uid(id: &str) -> UserId {
        UserId::new(id).unwrap()
    }

    #[test]
    fn test_store_from_snapshot() {
        let snapshot = GraphSnapshot::from_json(SAMPLE).unwrap();
        let store = MemoryGraphStore::from_snapshot(&snapshot).unwrap();

        assert_eq!(store.user_count(), 3);
        assert_eq!(store.relationship_count(), 3);
        assert_eq!(store.keywords(&uid("q")).unwrap().len(), 2);
        assert_eq!(
            store
                .keyword_time_window(&uid("q"), &KeywordId::new("coffee").unwrap())
                .unwrap(),
            Some(TimeWindow { start: 0, end: 10 })
        );
        assert_eq!(
            store.location(&uid("n1")).unwrap(),
            Some(Location { lat: 1.5, lon: 2.5 })
        );
        assert_eq!(store.relationships(&uid("n1")).unwrap().len(), 2);
    }

    #[test]
    fn test_snapshot_rejects_unknown_endpoint() {
        let json = r#"{"users": [{"id": "a"}], "relationships": [{"from": "a", "to": "b", "weight": 1.0}]}"#;
        let snapshot = GraphSnapshot::from_json(json).unwrap();
        let err = MemoryGraphStore::from_snapshot(&snapshot).unwrap_err();
        assert!(matches!(err, StorageError::UserNotFound { ref user } if user == "b"));
    }

    #[test]
    fn test_snapshot_rejects_blank_ids() {
        let json = r#"{"users": [{"id": ""}]}"#;
        let err = GraphSnapshot::from_json(json).unwrap_err();
        assert!(matches!(err, StorageError::SerializationError { .. }));
    }

    #[test]
    fn test_malformed_json_is_a_serialization_error() {
        let err = GraphSnapshot::from_json("{ not json").unwrap_err();
        assert!(matches!(err, StorageError::SerializationError { .. }));
    }

    #[test]
    fn test_export_then_reload_preserves_graph() {
        let store =
            MemoryGraphStore::from_snapshot(&GraphSnapshot::from_json(SAMPLE).unwrap()).unwrap();
        let exported = store.snapshot().unwrap();
        let reloaded = MemoryGraphStore::from_snapshot(&exported).unwrap();

        assert_eq!(reloaded.user_ids(), store.user_ids());
        assert_eq!(reloaded.relationship_count(), store.relationship_count());
        assert_eq!(
            reloaded.relationships(&uid("n1")).unwrap(),
            store.relationships(&uid("n1")).unwrap()
        );
    }
}
