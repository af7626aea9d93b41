//! Video order manager
//!
//! Owns one admin's view of the catalog: the staged order, the gesture in
//! progress, the notice banner and the save workflow. Saving is two-step
//! ([`request_save`](VideoOrderManager::request_save) opens the confirmation,
//! [`confirm_save`](VideoOrderManager::confirm_save) commits) and all-or-nothing
//! from the caller's point of view: any failed write discards the whole staged
//! order.
//!
//! All methods take `&self`. State sits behind a mutex that is released
//! before every store call, so a save in flight never blocks readers. Every
//! store round trip occupies the phase first ([`CommitPhase::InFlight`] for a
//! save, [`CommitPhase::Busy`] for add, delete and reload), and every other
//! mutation is rejected until it finishes.

use std::{
    sync::{Mutex, MutexGuard, PoisonError},
    time::{Duration, Instant},
};

use serde::Serialize;
use tracing::{info, warn};

use crate::{
    drag::{DragCoordinator, DropTarget, Step},
    error::{OrderError, OrderResult},
    model::{
        Category, ListFilter, NewVideoEntry, OrderAssignment, VideoEntry, VideoId,
        next_display_order,
    },
    notice::{Notice, NoticeBoard, NoticeKind, SUCCESS_TTL},
    pagination::{Page, Pager},
    session::AdminSession,
    staging::{Move, StagingStore},
    store::{StoreError, VideoStore},
    youtube,
};

/// Manager settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManagerConfig {
    /// Entries per admin page
    pub page_size: usize,
    /// Lifetime of success notices
    pub success_ttl: Duration,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            page_size: 6,
            success_ttl: SUCCESS_TTL,
        }
    }
}

/// Where the save workflow stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitPhase {
    Idle,
    AwaitingConfirmation,
    InFlight,
    /// An add, delete or reload is waiting on the store
    Busy,
}

#[derive(Debug)]
struct ManagerState {
    staging: StagingStore,
    drag: DragCoordinator,
    notices: NoticeBoard,
    phase: CommitPhase,
    /// Set once the store reports it is not configured
    disabled: bool,
}

impl ManagerState {
    fn ensure_settled(&self) -> OrderResult<()> {
        match self.phase {
            CommitPhase::InFlight => Err(OrderError::CommitInFlight),
            CommitPhase::Busy => Err(OrderError::ListBusy),
            CommitPhase::Idle | CommitPhase::AwaitingConfirmation => Ok(()),
        }
    }

    fn ensure_mutable(&self) -> OrderResult<()> {
        if self.disabled {
            return Err(OrderError::NotConfigured);
        }
        self.ensure_settled()
    }

    /// Replace the baseline; any staged reorder and open confirmation go away
    fn reload(&mut self, entries: Vec<VideoEntry>) {
        self.staging.load(entries);
        self.drag.cancel();
        self.phase = CommitPhase::Idle;
        self.disabled = false;
    }

    fn apply(&mut self, step: Option<Move>) -> Option<Move> {
        step.filter(|s| self.staging.apply(*s))
    }

    fn store_failed(&mut self, error: &StoreError, message: &str) {
        if *error == StoreError::NotConfigured {
            self.disabled = true;
            self.notices.error("Video store is not configured", Instant::now());
        } else {
            self.notices.error(message, Instant::now());
        }
    }
}

/// Notice as shown to the admin
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoticeView {
    pub kind: NoticeKind,
    pub message: String,
}

impl From<&Notice> for NoticeView {
    fn from(notice: &Notice) -> Self {
        Self {
            kind: notice.kind,
            message: notice.message.clone(),
        }
    }
}

/// Everything the admin list view renders
#[derive(Debug, Clone, Serialize)]
pub struct ManagerSnapshot {
    pub entries: Page<VideoEntry>,
    pub dirty: bool,
    pub phase: CommitPhase,
    pub notice: Option<NoticeView>,
    pub disabled: bool,
    /// Absolute index and page of a pending keyboard drop
    pub keyboard_target: Option<(usize, usize)>,
}

/// Resets an interrupted store round trip so the manager does not stay stuck
/// in [`CommitPhase::InFlight`] or [`CommitPhase::Busy`]
struct PhaseGuard<'a> {
    state: &'a Mutex<ManagerState>,
    interrupted: &'static str,
    armed: bool,
}

impl<'a> PhaseGuard<'a> {
    fn new(state: &'a Mutex<ManagerState>, interrupted: &'static str) -> Self {
        Self {
            state,
            interrupted,
            armed: true,
        }
    }

    /// The round trip finished and already settled the phase
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for PhaseGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            state.phase = CommitPhase::Idle;
            state.staging.discard();
            state.drag.cancel();
            state.notices.error(self.interrupted, Instant::now());
        }
    }
}

pub struct VideoOrderManager<S> {
    store: S,
    session: AdminSession,
    state: Mutex<ManagerState>,
}

impl<S: VideoStore> VideoOrderManager<S> {
    /// Build an empty manager; call [`refresh`](Self::refresh) to load the list
    pub fn new(store: S, session: AdminSession, config: ManagerConfig) -> Self {
        Self {
            store,
            session,
            state: Mutex::new(ManagerState {
                staging: StagingStore::new(),
                drag: DragCoordinator::new(Pager::new(config.page_size)),
                notices: NoticeBoard::new(config.success_ttl),
                phase: CommitPhase::Idle,
                disabled: false,
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, ManagerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn session(&self) -> &AdminSession {
        &self.session
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Fetch the full admin listing and make it the new baseline
    pub async fn refresh(&self) -> OrderResult<()> {
        {
            let mut state = self.state();
            state.ensure_settled()?;
            state.phase = CommitPhase::Busy;
        }

        let guard = PhaseGuard::new(&self.state, "Loading videos was interrupted");
        let listing = self.store.list(ListFilter::all()).await;
        guard.disarm();

        let mut state = self.state();
        match listing {
            Ok(entries) => {
                state.reload(entries);
                Ok(())
            }
            Err(e) => {
                warn!("Failed to load videos for admin {}: {}", self.session.admin_id, e);
                state.phase = CommitPhase::Idle;
                state.store_failed(&e, "Failed to load videos");
                Err(map_store_error(e))
            }
        }
    }

    /// Settle a failed add or delete; nothing changed, so the staged order stays
    fn write_failed(&self, error: &StoreError, message: &str) {
        let mut state = self.state();
        state.phase = CommitPhase::Idle;
        state.store_failed(error, message);
    }

    /// Reload after an add or delete; a failed reload still drops the staged order
    ///
    /// Runs while the write still holds [`CommitPhase::Busy`] and always
    /// leaves the manager idle.
    async fn reload_after_write(&self) {
        let listing = self.store.list(ListFilter::all()).await;

        let mut state = self.state();
        match listing {
            Ok(entries) => state.reload(entries),
            Err(e) => {
                warn!("Failed to reload videos: {}", e);
                state.staging.discard();
                state.phase = CommitPhase::Idle;
                state.store_failed(&e, "Failed to load videos");
            }
        }
    }

    /// Validate `url` and append it after the current last entry
    pub async fn add_video(&self, url: &str, category: Option<Category>) -> OrderResult<VideoEntry> {
        let new_entry = {
            let mut state = self.state();
            state.ensure_mutable()?;

            let url = url.trim();
            let Some(external_id) = youtube::extract_video_id(url) else {
                state.notices.error("Invalid YouTube URL", Instant::now());
                return Err(OrderError::Validation("Invalid YouTube URL".to_string()));
            };

            state.phase = CommitPhase::Busy;
            NewVideoEntry {
                source_url: url.to_string(),
                external_id,
                display_order: next_display_order(state.staging.confirmed()),
                is_active: true,
                category: category.unwrap_or_else(|| youtube::detect_category(url)),
            }
        };

        let guard = PhaseGuard::new(&self.state, "Adding the video was interrupted");
        let inserted = match self.store.insert(new_entry).await {
            Ok(row) => row,
            Err(e) => {
                guard.disarm();
                warn!("Failed to add video: {}", e);
                self.write_failed(&e, "Failed to add video");
                return Err(map_store_error(e));
            }
        };

        info!(
            "Admin {} added video {} at position {}",
            self.session.admin_id, inserted.id, inserted.display_order
        );

        self.state()
            .notices
            .success("Video added successfully!", Instant::now());
        // A failed reload replaces the success notice with its error.
        self.reload_after_write().await;
        guard.disarm();
        Ok(inserted)
    }

    /// Delete an entry immediately; any staged reorder is dropped
    pub async fn delete_video(&self, id: VideoId) -> OrderResult<()> {
        {
            let mut state = self.state();
            state.ensure_mutable()?;
            state.phase = CommitPhase::Busy;
        }

        let guard = PhaseGuard::new(&self.state, "Deleting the video was interrupted");
        if let Err(e) = self.store.delete(id).await {
            guard.disarm();
            warn!("Failed to delete video {}: {}", id, e);
            self.write_failed(&e, "Failed to delete video");
            return Err(map_store_error(e));
        }

        info!("Admin {} deleted video {}", self.session.admin_id, id);

        self.state()
            .notices
            .success("Video deleted successfully!", Instant::now());
        // A failed reload replaces the success notice with its error.
        self.reload_after_write().await;
        guard.disarm();
        Ok(())
    }

    /// Stage a move on absolute indices; invalid indices are a no-op
    pub fn move_entry(&self, from: usize, to: usize) -> OrderResult<bool> {
        let mut state = self.state();
        state.ensure_mutable()?;
        Ok(state.staging.move_entry(from, to))
    }

    pub fn begin_drag(&self, source: VideoId) -> OrderResult<()> {
        let mut state = self.state();
        state.ensure_mutable()?;
        state.drag.begin(source);
        Ok(())
    }

    /// Finish a pointer drag, staging the resulting move
    pub fn drop_on(&self, target: DropTarget) -> OrderResult<Option<Move>> {
        let mut state = self.state();
        state.ensure_mutable()?;

        let ManagerState { staging, drag, .. } = &mut *state;
        let step = drag.drop_on(target, staging.working());
        Ok(state.apply(step))
    }

    pub fn cancel_drag(&self) {
        self.state().drag.cancel();
    }

    /// Pick up an entry for keyboard reordering
    pub fn lift(&self, source: VideoId) -> OrderResult<()> {
        let mut state = self.state();
        state.ensure_mutable()?;

        let ManagerState { staging, drag, .. } = &mut *state;
        if drag.lift(source, staging.working()) {
            Ok(())
        } else {
            Err(OrderError::UnknownVideo(source))
        }
    }

    pub fn step(&self, step: Step) -> OrderResult<Option<usize>> {
        let mut state = self.state();
        state.ensure_mutable()?;

        let ManagerState { staging, drag, .. } = &mut *state;
        Ok(drag.step(step, staging.working()))
    }

    /// Drop the lifted entry at its keyboard target
    pub fn confirm_keyboard(&self) -> OrderResult<Option<Move>> {
        let mut state = self.state();
        state.ensure_mutable()?;

        let ManagerState { staging, drag, .. } = &mut *state;
        let step = drag.confirm(staging.working());
        Ok(state.apply(step))
    }

    /// Throw away the staged order
    pub fn discard(&self) -> OrderResult<()> {
        let mut state = self.state();
        state.ensure_settled()?;

        state.staging.discard();
        state.drag.cancel();
        state.phase = CommitPhase::Idle;
        Ok(())
    }

    /// First step of a save: ask for confirmation
    pub fn request_save(&self) -> OrderResult<()> {
        let mut state = self.state();
        state.ensure_mutable()?;
        if !state.staging.is_dirty() {
            return Err(OrderError::NothingToSave);
        }

        state.phase = CommitPhase::AwaitingConfirmation;
        Ok(())
    }

    /// Close the confirmation; the staged order stays staged
    pub fn cancel_save(&self) -> OrderResult<()> {
        let mut state = self.state();
        state.ensure_settled()?;
        state.phase = CommitPhase::Idle;
        Ok(())
    }

    /// Second step of a save: write the staged order to the store
    pub async fn confirm_save(&self) -> OrderResult<()> {
        let plan = {
            let mut state = self.state();
            if state.disabled {
                return Err(OrderError::NotConfigured);
            }
            state.ensure_settled()?;
            if state.phase == CommitPhase::Idle {
                return Err(OrderError::NoPendingConfirmation);
            }
            if !state.staging.is_dirty() {
                state.phase = CommitPhase::Idle;
                return Err(OrderError::NothingToSave);
            }

            let plan = state.staging.plan()?;
            state.phase = CommitPhase::InFlight;
            state.drag.cancel();
            plan
        };

        let guard = PhaseGuard::new(&self.state, "Saving the video order was interrupted");
        info!(
            "Admin {} saving order of {} videos",
            self.session.admin_id,
            plan.len()
        );
        let outcome = self.write_order(&plan).await;
        guard.disarm();

        let conflict = {
            let mut state = self.state();
            state.phase = CommitPhase::Idle;
            match &outcome {
                Ok(rows) => {
                    state.staging.load(rows.clone());
                    state.notices.success("Video order saved", Instant::now());
                    info!("Video order saved by admin {}", self.session.admin_id);
                    false
                }
                Err(e) => {
                    warn!("Saving video order failed, reverting: {}", e);
                    state.staging.discard();
                    state.store_failed(e, "Failed to save video order");
                    matches!(e, StoreError::Conflict(_))
                }
            }
        };

        if conflict {
            // Our versions are stale; the next attempt needs fresh rows.
            if self.refresh().await.is_ok() {
                self.state().notices.error(
                    "Video order was changed elsewhere; the list has been reloaded",
                    Instant::now(),
                );
            }
        }

        outcome.map(|_| ()).map_err(map_store_error)
    }

    /// Batched when the store supports it, else one update per row in order
    async fn write_order(&self, plan: &[OrderAssignment]) -> Result<Vec<VideoEntry>, StoreError> {
        if self.store.supports_batch() {
            return self.store.apply_order(plan).await;
        }

        let mut rows = Vec::with_capacity(plan.len());
        for (written, assignment) in plan.iter().enumerate() {
            match self.store.update(assignment.id, (*assignment).into()).await {
                Ok(row) => rows.push(row),
                Err(e) => {
                    warn!(
                        "Order update {} of {} failed for video {}; abandoning the rest",
                        written + 1,
                        plan.len(),
                        assignment.id
                    );
                    return Err(e);
                }
            }
        }
        Ok(rows)
    }

    pub fn dismiss_notice(&self) {
        self.state().notices.dismiss();
    }

    pub fn notice(&self) -> Option<NoticeView> {
        self.state().notices.visible(Instant::now()).map(NoticeView::from)
    }

    /// Notice as it would appear at `now`
    pub fn notice_at(&self, now: Instant) -> Option<NoticeView> {
        self.state().notices.visible(now).map(NoticeView::from)
    }

    pub fn is_dirty(&self) -> bool {
        self.state().staging.is_dirty()
    }

    pub fn phase(&self) -> CommitPhase {
        self.state().phase
    }

    pub fn is_disabled(&self) -> bool {
        self.state().disabled
    }

    pub fn working(&self) -> Vec<VideoEntry> {
        self.state().staging.working().to_vec()
    }

    pub fn confirmed(&self) -> Vec<VideoEntry> {
        self.state().staging.confirmed().to_vec()
    }

    /// The admin view of `page` of the working order
    pub fn snapshot(&self, page: usize) -> ManagerSnapshot {
        let state = self.state();
        let pager = state.drag.pager();

        ManagerSnapshot {
            entries: pager.paginate(state.staging.working(), page),
            dirty: state.staging.is_dirty(),
            phase: state.phase,
            notice: state.notices.visible(Instant::now()).map(NoticeView::from),
            disabled: state.disabled,
            keyboard_target: state.drag.keyboard_target(),
        }
    }
}

fn map_store_error(error: StoreError) -> OrderError {
    match error {
        StoreError::NotConfigured => OrderError::NotConfigured,
        other => OrderError::Store(other),
    }
}
