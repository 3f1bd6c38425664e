//! History Registry
//!
//! One `ExhibitHistory` per exhibit, created on the first reading and
//! dropped when the exhibit is deleted. Each exhibit sits behind its own
//! mutex: readings for the same exhibit serialize, different exhibits run
//! in parallel.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};

use crate::logic::reading::{ExhibitId, SensorKind};
use super::window::{HistoryWindow, WindowStats};

// ============================================================================
// PER-EXHIBIT HISTORY
// ============================================================================

#[derive(Debug, Clone)]
pub struct ExhibitHistory {
    windows: BTreeMap<SensorKind, HistoryWindow>,
    capacity: usize,
}

impl ExhibitHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            windows: BTreeMap::new(),
            capacity,
        }
    }

    pub fn window(&self, kind: SensorKind) -> Option<&HistoryWindow> {
        self.windows.get(&kind)
    }

    /// Lazily creates the window for `kind`
    pub fn window_mut(&mut self, kind: SensorKind) -> &mut HistoryWindow {
        let capacity = self.capacity;
        self.windows
            .entry(kind)
            .or_insert_with(|| HistoryWindow::new(capacity))
    }

    pub fn push(&mut self, kind: SensorKind, value: f64) {
        self.window_mut(kind).push(value);
    }

    pub fn stats(&self) -> BTreeMap<SensorKind, WindowStats> {
        self.windows
            .iter()
            .map(|(kind, window)| (*kind, window.stats()))
            .collect()
    }
}

// ============================================================================
// REGISTRY
// ============================================================================

pub struct HistoryRegistry {
    exhibits: RwLock<HashMap<ExhibitId, Arc<Mutex<ExhibitHistory>>>>,
    capacity: usize,
}

impl HistoryRegistry {
    pub fn new(capacity: usize) -> Self {
        Self {
            exhibits: RwLock::new(HashMap::new()),
            capacity,
        }
    }

    /// History handle for an exhibit, created on first use
    pub fn handle(&self, exhibit_id: ExhibitId) -> Arc<Mutex<ExhibitHistory>> {
        if let Some(existing) = self.exhibits.read().get(&exhibit_id) {
            return Arc::clone(existing);
        }

        let mut exhibits = self.exhibits.write();
        let entry = exhibits.entry(exhibit_id).or_insert_with(|| {
            log::debug!("Creating trend history for exhibit {}", exhibit_id);
            Arc::new(Mutex::new(ExhibitHistory::new(self.capacity)))
        });
        Arc::clone(entry)
    }

    /// Drop an exhibit's history. Returns whether it existed.
    pub fn evict(&self, exhibit_id: ExhibitId) -> bool {
        let removed = self.exhibits.write().remove(&exhibit_id).is_some();
        if removed {
            log::info!("Evicted trend history for exhibit {}", exhibit_id);
        }
        removed
    }

    pub fn snapshot(&self, exhibit_id: ExhibitId) -> Option<BTreeMap<SensorKind, WindowStats>> {
        let handle = self.exhibits.read().get(&exhibit_id).cloned()?;
        let history = handle.lock();
        Some(history.stats())
    }

    pub fn contains(&self, exhibit_id: ExhibitId) -> bool {
        self.exhibits.read().contains_key(&exhibit_id)
    }

    pub fn len(&self) -> usize {
        self.exhibits.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.exhibits.read().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl std::fmt::Debug for HistoryRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryRegistry")
            .field("exhibits", &self.len())
            .field("capacity", &self.capacity)
            .finish()
    }
}
