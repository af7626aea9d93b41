//! In-process video store
//!
//! Backs tests and local demos. Clones share the same rows, so a test can keep
//! a handle to inspect or disturb the store while a manager owns another.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{Duration, Utc};
use uuid::Uuid;

use super::{StoreError, StoreResult, VideoStore};
use crate::model::{
    ListFilter, NewVideoEntry, OrderAssignment, VideoEntry, VideoId, VideoPatch, canonical_order,
};

#[derive(Debug, Default)]
struct MemoryState {
    rows: Vec<VideoEntry>,
    configured: bool,
    unavailable: bool,
    batch: bool,
    update_calls: usize,
    /// Absolute update call number (1-based) that will be rejected
    fail_update_call: Option<usize>,
    fail_next_batch: bool,
}

/// Vec-backed [`VideoStore`] with failure injection
#[derive(Debug, Clone)]
pub struct MemoryVideoStore {
    state: Arc<Mutex<MemoryState>>,
}

impl Default for MemoryVideoStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryVideoStore {
    pub fn new() -> Self {
        Self::with_entries(Vec::new())
    }

    pub fn with_entries(rows: Vec<VideoEntry>) -> Self {
        Self {
            state: Arc::new(Mutex::new(MemoryState {
                rows,
                configured: true,
                ..MemoryState::default()
            })),
        }
    }

    /// A store that answers every call with [`StoreError::NotConfigured`]
    pub fn unconfigured() -> Self {
        Self {
            state: Arc::new(Mutex::new(MemoryState::default())),
        }
    }

    /// Enable the transactional [`VideoStore::apply_order`] path
    pub fn with_batch(self) -> Self {
        self.lock().batch = true;
        self
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Reject the `n`th update call counted from now (1-based)
    pub fn fail_nth_update(&self, n: usize) {
        let mut state = self.lock();
        state.fail_update_call = Some(state.update_calls + n.max(1));
    }

    pub fn fail_next_batch(&self) {
        self.lock().fail_next_batch = true;
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.lock().unavailable = unavailable;
    }

    /// Bump a row's version as another writer would
    pub fn touch(&self, id: VideoId) {
        let mut state = self.lock();
        if let Some(row) = state.rows.iter_mut().find(|r| r.id == id) {
            row.version += 1;
            row.updated_at = Utc::now();
        }
    }

    pub fn update_calls(&self) -> usize {
        self.lock().update_calls
    }

    /// All rows in canonical order
    pub fn snapshot(&self) -> Vec<VideoEntry> {
        let mut rows = self.lock().rows.clone();
        canonical_order(&mut rows);
        rows
    }
}

impl MemoryState {
    fn check_reachable(&self) -> StoreResult<()> {
        if !self.configured {
            return Err(StoreError::NotConfigured);
        }
        if self.unavailable {
            return Err(StoreError::Unavailable("memory store offline".to_string()));
        }
        Ok(())
    }

    fn position(&self, id: VideoId) -> StoreResult<usize> {
        self.rows
            .iter()
            .position(|r| r.id == id)
            .ok_or(StoreError::NotFound(id))
    }

    fn apply_patch(&mut self, id: VideoId, patch: &VideoPatch) -> StoreResult<VideoEntry> {
        let index = self.position(id)?;
        let row = &mut self.rows[index];

        if patch.expected_version.is_some_and(|v| v != row.version) {
            return Err(StoreError::Conflict(id));
        }
        if let Some(order) = patch.display_order {
            row.display_order = order;
        }
        if let Some(active) = patch.is_active {
            row.is_active = active;
        }
        if let Some(category) = patch.category {
            row.category = category;
        }
        row.version += 1;
        row.updated_at = Utc::now().max(row.updated_at);

        Ok(row.clone())
    }
}

impl VideoStore for MemoryVideoStore {
    async fn list(&self, filter: ListFilter) -> StoreResult<Vec<VideoEntry>> {
        let state = self.lock();
        state.check_reachable()?;

        let mut rows: Vec<VideoEntry> = state
            .rows
            .iter()
            .filter(|r| filter.matches(r))
            .cloned()
            .collect();
        canonical_order(&mut rows);
        Ok(rows)
    }

    async fn insert(&self, entry: NewVideoEntry) -> StoreResult<VideoEntry> {
        let mut state = self.lock();
        state.check_reachable()?;

        // Keep creation instants strictly increasing so tie-breaks are stable.
        let latest = state.rows.iter().map(|r| r.created_at).max();
        let now = match latest {
            Some(latest) => Utc::now().max(latest + Duration::microseconds(1)),
            None => Utc::now(),
        };

        let row = VideoEntry {
            id: Uuid::new_v4(),
            source_url: entry.source_url,
            external_id: entry.external_id,
            display_order: entry.display_order,
            is_active: entry.is_active,
            category: entry.category,
            version: 1,
            created_at: now,
            updated_at: now,
        };
        state.rows.push(row.clone());
        Ok(row)
    }

    async fn update(&self, id: VideoId, patch: VideoPatch) -> StoreResult<VideoEntry> {
        let mut state = self.lock();
        state.check_reachable()?;

        state.update_calls += 1;
        if state.fail_update_call == Some(state.update_calls) {
            state.fail_update_call = None;
            return Err(StoreError::Rejected(format!("injected failure updating {}", id)));
        }

        state.apply_patch(id, &patch)
    }

    async fn delete(&self, id: VideoId) -> StoreResult<()> {
        let mut state = self.lock();
        state.check_reachable()?;

        let index = state.position(id)?;
        state.rows.remove(index);
        Ok(())
    }

    fn supports_batch(&self) -> bool {
        self.lock().batch
    }

    async fn apply_order(&self, assignments: &[OrderAssignment]) -> StoreResult<Vec<VideoEntry>> {
        let mut state = self.lock();
        state.check_reachable()?;
        if !state.batch {
            return Err(StoreError::Unsupported);
        }
        if std::mem::take(&mut state.fail_next_batch) {
            return Err(StoreError::Rejected("injected batch failure".to_string()));
        }

        // Validate everything before touching any row.
        for assignment in assignments {
            let index = state.position(assignment.id)?;
            if state.rows[index].version != assignment.expected_version {
                return Err(StoreError::Conflict(assignment.id));
            }
        }

        assignments
            .iter()
            .map(|a| state.apply_patch(a.id, &VideoPatch::from(*a)))
            .collect()
    }
}
