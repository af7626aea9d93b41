//! End-to-end behaviour of the video order manager over the in-memory store

use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use catalog::{
    AdminSession, Category, CommitPhase, ManagerConfig, MemoryVideoStore, OrderError, StoreError,
    VideoEntry, VideoId, VideoOrderManager, VideoStore,
    drag::{DropTarget, Step},
    model::{ListFilter, NewVideoEntry, VideoPatch},
    notice::NoticeKind,
};
use chrono::Utc;
use tokio::sync::Semaphore;
use uuid::Uuid;

fn session() -> AdminSession {
    AdminSession::new(
        Uuid::new_v4(),
        Uuid::new_v4(),
        Utc::now() + chrono::Duration::hours(1),
    )
}

fn new_entry(n: usize) -> NewVideoEntry {
    NewVideoEntry {
        source_url: format!("https://www.youtube.com/watch?v=clip{}", n),
        external_id: format!("clip{}", n),
        display_order: n as i32,
        is_active: true,
        category: Category::Wide,
    }
}

async fn seeded_store(n: usize) -> MemoryVideoStore {
    let store = MemoryVideoStore::new();
    for i in 0..n {
        store.insert(new_entry(i)).await.unwrap();
    }
    store
}

async fn manager_over<S: VideoStore>(store: S) -> VideoOrderManager<S> {
    let manager = VideoOrderManager::new(store, session(), ManagerConfig::default());
    manager.refresh().await.unwrap();
    manager
}

fn ids(entries: &[VideoEntry]) -> Vec<VideoId> {
    entries.iter().map(|e| e.id).collect()
}

fn orders(entries: &[VideoEntry]) -> Vec<i32> {
    entries.iter().map(|e| e.display_order).collect()
}

#[tokio::test]
async fn test_add_appends_after_current_maximum() {
    let store = seeded_store(3).await;
    let manager = manager_over(store.clone()).await;

    let added = manager
        .add_video("https://youtu.be/newClip_1", None)
        .await
        .unwrap();

    assert_eq!(added.display_order, 3);
    assert_eq!(added.external_id, "newClip_1");
    assert_eq!(orders(&manager.confirmed()), vec![0, 1, 2, 3]);
    assert_eq!(
        manager.notice().map(|n| n.message),
        Some("Video added successfully!".to_string())
    );
}

#[tokio::test]
async fn test_add_detects_shorts_unless_told_otherwise() {
    let manager = manager_over(MemoryVideoStore::new()).await;

    let short = manager
        .add_video("https://www.youtube.com/shorts/abc", None)
        .await
        .unwrap();
    let forced = manager
        .add_video("https://www.youtube.com/shorts/def", Some(Category::Wide))
        .await
        .unwrap();

    assert_eq!(short.category, Category::Tall);
    assert_eq!(forced.category, Category::Wide);
    assert_eq!(short.display_order, 0);
    assert_eq!(forced.display_order, 1);
}

#[tokio::test]
async fn test_invalid_url_never_reaches_the_store() {
    let store = seeded_store(2).await;
    let manager = manager_over(store.clone()).await;

    let result = manager.add_video("https://vimeo.com/12345", None).await;

    assert!(matches!(result, Err(OrderError::Validation(_))));
    assert_eq!(store.snapshot().len(), 2);
    let notice = manager.notice().unwrap();
    assert_eq!(notice.kind, NoticeKind::Error);
    assert_eq!(notice.message, "Invalid YouTube URL");
}

#[tokio::test]
async fn test_reorder_then_save() {
    let store = seeded_store(3).await;
    let manager = manager_over(store.clone()).await;
    let [a, b, c]: [VideoId; 3] = ids(&manager.working()).try_into().unwrap();

    manager.begin_drag(c).unwrap();
    manager.drop_on(DropTarget::Entry(a)).unwrap();
    assert_eq!(ids(&manager.working()), vec![c, a, b]);
    assert!(manager.is_dirty());

    manager.request_save().unwrap();
    assert_eq!(manager.phase(), CommitPhase::AwaitingConfirmation);
    manager.confirm_save().await.unwrap();

    let stored = store.snapshot();
    assert_eq!(ids(&stored), vec![c, a, b]);
    assert_eq!(orders(&stored), vec![0, 1, 2]);
    assert_eq!(store.update_calls(), 3);

    assert_eq!(ids(&manager.confirmed()), vec![c, a, b]);
    assert!(!manager.is_dirty());
    assert_eq!(manager.phase(), CommitPhase::Idle);
    assert_eq!(manager.notice().map(|n| n.kind), Some(NoticeKind::Success));
}

#[tokio::test]
async fn test_reorder_then_fail_reverts_everything() {
    let store = seeded_store(3).await;
    let manager = manager_over(store.clone()).await;
    let [a, b, c]: [VideoId; 3] = ids(&manager.working()).try_into().unwrap();

    manager.begin_drag(c).unwrap();
    manager.drop_on(DropTarget::Entry(a)).unwrap();
    store.fail_nth_update(2);

    manager.request_save().unwrap();
    let result = manager.confirm_save().await;

    assert!(matches!(
        result,
        Err(OrderError::Store(StoreError::Rejected(_)))
    ));
    assert_eq!(store.update_calls(), 2, "updates after the failure are abandoned");
    assert_eq!(ids(&manager.working()), vec![a, b, c]);
    assert!(!manager.is_dirty());
    assert_eq!(manager.phase(), CommitPhase::Idle);

    let notice = manager.notice_at(Instant::now() + Duration::from_secs(60)).unwrap();
    assert_eq!(notice.kind, NoticeKind::Error);
}

#[tokio::test]
async fn test_delete_during_pending_reorder_reloads_from_store() {
    let store = seeded_store(3).await;
    let manager = manager_over(store.clone()).await;
    let [a, b, c]: [VideoId; 3] = ids(&manager.working()).try_into().unwrap();

    manager.move_entry(2, 0).unwrap();
    assert_eq!(ids(&manager.working()), vec![c, a, b]);

    manager.delete_video(b).await.unwrap();

    assert!(!manager.is_dirty());
    assert_eq!(ids(&manager.working()), vec![a, c]);
    assert_eq!(ids(&manager.working()), ids(&store.snapshot()));
}

#[tokio::test]
async fn test_add_during_pending_reorder_reloads_from_store() {
    let store = seeded_store(3).await;
    let manager = manager_over(store.clone()).await;

    manager.move_entry(2, 0).unwrap();
    assert!(manager.is_dirty());

    let added = manager
        .add_video("https://youtu.be/lateClip_1", None)
        .await
        .unwrap();

    assert!(!manager.is_dirty());
    assert_eq!(added.display_order, 3);
    assert_eq!(manager.working(), store.snapshot());
    assert_eq!(manager.working().last().map(|e| e.id), Some(added.id));
}

#[tokio::test]
async fn test_cancelled_confirmation_keeps_changes_staged() {
    let manager = manager_over(seeded_store(3).await).await;

    manager.move_entry(0, 2).unwrap();
    manager.request_save().unwrap();
    manager.cancel_save().unwrap();

    assert!(manager.is_dirty());
    assert_eq!(manager.phase(), CommitPhase::Idle);
    assert_eq!(
        manager.confirm_save().await,
        Err(OrderError::NoPendingConfirmation)
    );
}

#[tokio::test]
async fn test_save_requires_changes() {
    let manager = manager_over(seeded_store(3).await).await;

    assert_eq!(manager.request_save(), Err(OrderError::NothingToSave));

    manager.move_entry(0, 1).unwrap();
    manager.request_save().unwrap();
    manager.move_entry(1, 0).unwrap();

    assert_eq!(manager.confirm_save().await, Err(OrderError::NothingToSave));
    assert_eq!(manager.phase(), CommitPhase::Idle);
}

#[tokio::test]
async fn test_discard_is_idempotent() {
    let manager = manager_over(seeded_store(4).await).await;
    let original = ids(&manager.confirmed());

    manager.move_entry(3, 0).unwrap();
    manager.discard().unwrap();
    manager.discard().unwrap();

    assert_eq!(ids(&manager.working()), original);
    assert!(!manager.is_dirty());
}

#[tokio::test]
async fn test_cross_page_drag_by_slot_and_keyboard_agree() {
    let pointer = manager_over(seeded_store(12).await).await;
    let keyboard = manager_over(seeded_store(12).await).await;
    let direct = manager_over(seeded_store(12).await).await;

    let source = pointer.working()[7].id;
    pointer.begin_drag(source).unwrap();
    pointer
        .drop_on(DropTarget::Slot { page: 1, slot: 1 })
        .unwrap();

    keyboard.lift(keyboard.working()[7].id).unwrap();
    for _ in 0..6 {
        keyboard.step(Step::Up).unwrap();
    }
    keyboard.confirm_keyboard().unwrap();

    direct.move_entry(7, 1).unwrap();

    let positions = |m: &VideoOrderManager<MemoryVideoStore>| {
        m.working()
            .iter()
            .map(|e| e.external_id.clone())
            .collect::<Vec<_>>()
    };
    assert_eq!(positions(&pointer), positions(&direct));
    assert_eq!(positions(&keyboard), positions(&direct));
    assert_eq!(pointer.working()[1].id, source);

    let second_page = pointer.snapshot(2);
    assert_eq!(second_page.entries.items.len(), 6);
    assert!(second_page.dirty);
}

#[tokio::test]
async fn test_batched_store_commits_in_one_write() {
    let store = MemoryVideoStore::new().with_batch();
    for i in 0..3 {
        store.insert(new_entry(i)).await.unwrap();
    }
    let manager = manager_over(store.clone()).await;

    manager.move_entry(0, 2).unwrap();
    let staged = ids(&manager.working());
    manager.request_save().unwrap();
    manager.confirm_save().await.unwrap();

    assert_eq!(store.update_calls(), 0);
    assert_eq!(ids(&store.snapshot()), staged);
    assert!(manager.confirmed().iter().all(|e| e.version == 2));
}

#[tokio::test]
async fn test_failed_batch_leaves_store_untouched() {
    let store = MemoryVideoStore::new().with_batch();
    for i in 0..3 {
        store.insert(new_entry(i)).await.unwrap();
    }
    let manager = manager_over(store.clone()).await;
    let before = store.snapshot();

    manager.move_entry(0, 2).unwrap();
    store.fail_next_batch();
    manager.request_save().unwrap();

    assert!(manager.confirm_save().await.is_err());
    assert_eq!(store.snapshot(), before);
    assert_eq!(ids(&manager.working()), ids(&before));
}

#[tokio::test]
async fn test_concurrent_edit_conflict_triggers_refetch() {
    let store = seeded_store(3).await;
    let manager = manager_over(store.clone()).await;
    let [a, _, _]: [VideoId; 3] = ids(&manager.working()).try_into().unwrap();

    // Another admin saves first.
    store
        .update(
            a,
            VideoPatch {
                display_order: Some(9),
                ..VideoPatch::default()
            },
        )
        .await
        .unwrap();

    manager.move_entry(2, 0).unwrap();
    manager.request_save().unwrap();
    let result = manager.confirm_save().await;

    assert_eq!(result, Err(OrderError::Store(StoreError::Conflict(a))));
    assert!(!manager.is_dirty());
    assert_eq!(manager.confirmed(), store.snapshot());
    assert!(
        manager
            .notice()
            .unwrap()
            .message
            .contains("changed elsewhere")
    );
}

#[tokio::test]
async fn test_unconfigured_store_disables_mutations() {
    let manager = VideoOrderManager::new(
        MemoryVideoStore::unconfigured(),
        session(),
        ManagerConfig::default(),
    );

    assert_eq!(manager.refresh().await, Err(OrderError::NotConfigured));
    assert!(manager.is_disabled());
    assert_eq!(manager.move_entry(0, 1), Err(OrderError::NotConfigured));
    assert_eq!(
        manager.add_video("https://youtu.be/abc", None).await,
        Err(OrderError::NotConfigured)
    );
    assert_eq!(manager.request_save(), Err(OrderError::NotConfigured));
    assert_eq!(manager.notice().map(|n| n.kind), Some(NoticeKind::Error));
}

#[tokio::test]
async fn test_transient_failure_keeps_local_state() {
    let store = seeded_store(3).await;
    let manager = manager_over(store.clone()).await;
    let before = manager.confirmed();

    store.set_unavailable(true);
    let result = manager.delete_video(before[0].id).await;

    assert!(matches!(
        result,
        Err(OrderError::Store(StoreError::Unavailable(_)))
    ));
    assert_eq!(manager.confirmed(), before);
    assert!(!manager.is_disabled());

    manager.dismiss_notice();
    assert_eq!(manager.notice(), None);
}

#[tokio::test]
async fn test_success_notice_clears_itself() {
    let manager = manager_over(seeded_store(1).await).await;
    manager
        .add_video("https://youtu.be/another", None)
        .await
        .unwrap();

    assert!(manager.notice().is_some());
    assert!(
        manager
            .notice_at(Instant::now() + Duration::from_secs(4))
            .is_none()
    );
}

/// Memory store whose updates, inserts and deletes wait for a permit
#[derive(Clone)]
struct GatedStore {
    inner: MemoryVideoStore,
    updates: Arc<Semaphore>,
    writes: Arc<Semaphore>,
}

impl VideoStore for GatedStore {
    async fn list(&self, filter: ListFilter) -> Result<Vec<VideoEntry>, StoreError> {
        self.inner.list(filter).await
    }

    async fn insert(&self, entry: NewVideoEntry) -> Result<VideoEntry, StoreError> {
        let _permit = self.writes.acquire().await.expect("gate closed");
        self.inner.insert(entry).await
    }

    async fn update(&self, id: VideoId, patch: VideoPatch) -> Result<VideoEntry, StoreError> {
        let _permit = self.updates.acquire().await.expect("gate closed");
        self.inner.update(id, patch).await
    }

    async fn delete(&self, id: VideoId) -> Result<(), StoreError> {
        let _permit = self.writes.acquire().await.expect("gate closed");
        self.inner.delete(id).await
    }
}

async fn gated_manager(n: usize) -> (Arc<VideoOrderManager<GatedStore>>, GatedStore) {
    let store = GatedStore {
        inner: seeded_store(n).await,
        updates: Arc::new(Semaphore::new(0)),
        writes: Arc::new(Semaphore::new(0)),
    };
    (Arc::new(manager_over(store.clone()).await), store)
}

async fn wait_for_phase<S: VideoStore>(manager: &VideoOrderManager<S>, phase: CommitPhase) {
    while manager.phase() != phase {
        tokio::task::yield_now().await;
    }
}

async fn wait_for_flight<S: VideoStore>(manager: &VideoOrderManager<S>) {
    wait_for_phase(manager, CommitPhase::InFlight).await;
}

#[tokio::test]
async fn test_commit_is_single_flight() {
    let (manager, store) = gated_manager(3).await;
    manager.move_entry(2, 0).unwrap();
    manager.request_save().unwrap();

    let committing = tokio::spawn({
        let manager = manager.clone();
        async move { manager.confirm_save().await }
    });
    wait_for_flight(&manager).await;

    assert_eq!(manager.confirm_save().await, Err(OrderError::CommitInFlight));
    assert_eq!(manager.move_entry(0, 1), Err(OrderError::CommitInFlight));
    assert_eq!(manager.discard(), Err(OrderError::CommitInFlight));
    assert_eq!(manager.refresh().await, Err(OrderError::CommitInFlight));
    assert_eq!(
        manager.add_video("https://youtu.be/late", None).await,
        Err(OrderError::CommitInFlight)
    );
    assert!(manager.snapshot(1).dirty);

    store.updates.add_permits(3);
    committing.await.unwrap().unwrap();

    assert_eq!(manager.phase(), CommitPhase::Idle);
    assert!(!manager.is_dirty());
}

#[tokio::test]
async fn test_interrupted_commit_resets_state() {
    let (manager, _store) = gated_manager(3).await;
    let original = ids(&manager.confirmed());
    manager.move_entry(2, 0).unwrap();
    manager.request_save().unwrap();

    let committing = tokio::spawn({
        let manager = manager.clone();
        async move { manager.confirm_save().await }
    });
    wait_for_flight(&manager).await;

    committing.abort();
    assert!(committing.await.unwrap_err().is_cancelled());

    assert_eq!(manager.phase(), CommitPhase::Idle);
    assert!(!manager.is_dirty());
    assert_eq!(ids(&manager.working()), original);
    assert_eq!(manager.notice().map(|n| n.kind), Some(NoticeKind::Error));
}

#[tokio::test]
async fn test_pending_add_holds_off_a_commit() {
    let (manager, store) = gated_manager(3).await;

    let adding = tokio::spawn({
        let manager = manager.clone();
        async move { manager.add_video("https://youtu.be/pendingAdd1", None).await }
    });
    wait_for_phase(&manager, CommitPhase::Busy).await;

    assert_eq!(manager.move_entry(2, 0), Err(OrderError::ListBusy));
    assert_eq!(manager.request_save(), Err(OrderError::ListBusy));
    assert_eq!(manager.confirm_save().await, Err(OrderError::ListBusy));
    assert_eq!(manager.refresh().await, Err(OrderError::ListBusy));
    assert_eq!(manager.snapshot(1).phase, CommitPhase::Busy);

    store.writes.add_permits(1);
    let added = adding.await.unwrap().unwrap();

    assert_eq!(manager.phase(), CommitPhase::Idle);
    assert_eq!(manager.confirmed(), store.inner.snapshot());
    assert_eq!(manager.confirmed().len(), 4);

    // The added row survives a reorder committed right after it.
    manager.move_entry(3, 0).unwrap();
    manager.request_save().unwrap();
    let committing = tokio::spawn({
        let manager = manager.clone();
        async move { manager.confirm_save().await }
    });
    wait_for_flight(&manager).await;

    assert_eq!(
        manager.add_video("https://youtu.be/tooLate_01", None).await,
        Err(OrderError::CommitInFlight)
    );
    assert_eq!(
        manager.delete_video(added.id).await,
        Err(OrderError::CommitInFlight)
    );

    store.updates.add_permits(4);
    committing.await.unwrap().unwrap();

    assert_eq!(manager.phase(), CommitPhase::Idle);
    assert_eq!(manager.confirmed(), store.inner.snapshot());
    assert_eq!(manager.confirmed()[0].id, added.id);
    assert_eq!(manager.confirmed().len(), 4);
}

#[tokio::test]
async fn test_pending_delete_holds_off_a_commit() {
    let (manager, store) = gated_manager(3).await;
    let [a, b, c]: [VideoId; 3] = ids(&manager.working()).try_into().unwrap();
    manager.move_entry(2, 0).unwrap();
    manager.request_save().unwrap();

    let deleting = tokio::spawn({
        let manager = manager.clone();
        async move { manager.delete_video(b).await }
    });
    wait_for_phase(&manager, CommitPhase::Busy).await;

    assert_eq!(manager.confirm_save().await, Err(OrderError::ListBusy));
    assert_eq!(manager.discard(), Err(OrderError::ListBusy));
    assert_eq!(manager.store().inner.update_calls(), 0);

    store.writes.add_permits(1);
    deleting.await.unwrap().unwrap();

    assert_eq!(manager.phase(), CommitPhase::Idle);
    assert!(!manager.is_dirty());
    assert_eq!(ids(&manager.confirmed()), vec![a, c]);
    assert_eq!(manager.confirmed(), store.inner.snapshot());
}

#[tokio::test]
async fn test_interrupted_add_settles_the_manager() {
    let (manager, store) = gated_manager(2).await;
    let original = manager.confirmed();

    let adding = tokio::spawn({
        let manager = manager.clone();
        async move { manager.add_video("https://youtu.be/abandoned1", None).await }
    });
    wait_for_phase(&manager, CommitPhase::Busy).await;

    adding.abort();
    assert!(adding.await.unwrap_err().is_cancelled());

    assert_eq!(manager.phase(), CommitPhase::Idle);
    assert_eq!(manager.confirmed(), original);
    assert_eq!(store.inner.snapshot().len(), 2);
    assert_eq!(manager.notice().map(|n| n.kind), Some(NoticeKind::Error));

    store.writes.add_permits(1);
    manager
        .add_video("https://youtu.be/secondTry1", None)
        .await
        .unwrap();
    assert_eq!(manager.confirmed(), store.inner.snapshot());
}
