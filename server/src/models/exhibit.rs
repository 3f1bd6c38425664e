//! Exhibit model
//!
//! In-memory exhibit directory. Restarting the server restores the sample
//! exhibits; nothing is persisted.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use exhibit_guard_core::{EngineError, ExhibitId, PolicyConfig, ThresholdPolicy};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, Serialize)]
pub struct Exhibit {
    pub id: ExhibitId,
    pub name: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub policy: ThresholdPolicy,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateExhibit {
    #[validate(length(min = 1, max = 120))]
    pub name: String,
    #[validate(length(max = 1000))]
    pub description: Option<String>,
    #[validate(length(min = 1, max = 120))]
    pub location: Option<String>,
    /// Thresholds; omitted bounds take the conservation defaults
    #[serde(flatten)]
    pub thresholds: PolicyConfig,
}

pub struct ExhibitStore {
    inner: RwLock<Directory>,
}

struct Directory {
    next_id: ExhibitId,
    exhibits: BTreeMap<ExhibitId, Exhibit>,
}

impl ExhibitStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Directory {
                next_id: 1,
                exhibits: BTreeMap::new(),
            }),
        }
    }

    /// Directory pre-filled with the sample galleries
    pub fn with_samples() -> Self {
        let store = Self::new();
        let samples = [
            ("ESP32 Real Sensors", "Live data from ESP32 device", "Gallery A", (20.0, 30.0), (40.0, 65.0), 100.0),
            ("Ancient Egyptian Artifacts", "Collection of ancient Egyptian pottery and tools", "Gallery B", (18.0, 22.0), (45.0, 55.0), 0.3),
            ("Modern Art Collection", "Contemporary paintings and sculptures", "Gallery C", (19.0, 23.0), (40.0, 60.0), 0.4),
            ("Natural History Display", "Fossils and geological specimens", "Gallery D", (18.0, 24.0), (42.0, 58.0), 0.5),
        ];

        for (name, description, location, temperature, humidity, vibration_max) in samples {
            let thresholds = PolicyConfig {
                exhibit_id: None,
                temperature_min: Some(temperature.0),
                temperature_max: Some(temperature.1),
                humidity_min: Some(humidity.0),
                humidity_max: Some(humidity.1),
                vibration_max: Some(vibration_max),
            };
            let created = store.create(CreateExhibit {
                name: name.to_string(),
                description: Some(description.to_string()),
                location: Some(location.to_string()),
                thresholds,
            });
            if let Err(e) = created {
                tracing::error!("Sample exhibit '{}' rejected: {}", name, e);
            }
        }

        store
    }

    pub fn list(&self) -> Vec<Exhibit> {
        self.inner.read().exhibits.values().cloned().collect()
    }

    pub fn get(&self, id: ExhibitId) -> Option<Exhibit> {
        self.inner.read().exhibits.get(&id).cloned()
    }

    pub fn policy(&self, id: ExhibitId) -> Option<ThresholdPolicy> {
        self.inner.read().exhibits.get(&id).map(|e| e.policy.clone())
    }

    pub fn len(&self) -> usize {
        self.inner.read().exhibits.len()
    }

    /// Register an exhibit; the policy is validated before an id is taken
    pub fn create(&self, req: CreateExhibit) -> Result<Exhibit, EngineError> {
        let mut dir = self.inner.write();
        let id = dir.next_id;

        let policy = ThresholdPolicy::try_from(req.thresholds)?.for_exhibit(id);
        let now = Utc::now();
        let exhibit = Exhibit {
            id,
            name: req.name,
            description: req.description,
            location: req.location,
            policy,
            created_at: now,
            updated_at: now,
        };

        dir.next_id += 1;
        dir.exhibits.insert(id, exhibit.clone());
        Ok(exhibit)
    }

    /// Partial policy update. `None` when the exhibit does not exist.
    pub fn update_policy(
        &self,
        id: ExhibitId,
        update: &PolicyConfig,
    ) -> Option<Result<Exhibit, EngineError>> {
        let mut dir = self.inner.write();
        let exhibit = dir.exhibits.get_mut(&id)?;

        let result = exhibit.policy.apply(update).map(|policy| {
            exhibit.policy = policy.for_exhibit(id);
            exhibit.updated_at = Utc::now();
            exhibit.clone()
        });
        Some(result)
    }

    pub fn delete(&self, id: ExhibitId) -> Option<Exhibit> {
        self.inner.write().exhibits.remove(&id)
    }
}

impl Default for ExhibitStore {
    fn default() -> Self {
        Self::new()
    }
}
