//! One order manager per admin session

use std::{collections::HashMap, sync::Arc};

use catalog::{AdminSession, ManagerConfig, VideoOrderManager, VideoStore};
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{info, warn};
use uuid::Uuid;

/// Live managers keyed by session ID
///
/// Staged reorders live only in memory, so they survive between requests of
/// the same session and are dropped with it.
pub struct ManagerRegistry<S> {
    store: S,
    config: ManagerConfig,
    managers: Arc<RwLock<HashMap<Uuid, Arc<VideoOrderManager<S>>>>>,
}

impl<S: Clone> Clone for ManagerRegistry<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            config: self.config,
            managers: self.managers.clone(),
        }
    }
}

impl<S: VideoStore + Clone> ManagerRegistry<S> {
    pub fn new(store: S, config: ManagerConfig) -> Self {
        Self {
            store,
            config,
            managers: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// The session's manager, created and loaded on first use
    ///
    /// A failed initial load still yields a manager; its notice carries the error.
    pub async fn get_or_create(&self, session: &AdminSession) -> Arc<VideoOrderManager<S>> {
        if let Some(manager) = self.managers.read().await.get(&session.session_id) {
            return manager.clone();
        }

        let manager = Arc::new(VideoOrderManager::new(
            self.store.clone(),
            session.clone(),
            self.config,
        ));
        if let Err(e) = manager.refresh().await {
            warn!(
                "Initial load for session {} failed: {}",
                session.session_id, e
            );
        }

        let mut managers = self.managers.write().await;
        managers
            .entry(session.session_id)
            .or_insert_with(|| {
                info!("Opened order manager for session {}", session.session_id);
                manager
            })
            .clone()
    }

    /// Drop a session's manager, discarding anything it had staged
    pub async fn remove(&self, session_id: Uuid) -> bool {
        self.managers.write().await.remove(&session_id).is_some()
    }

    /// Drop every manager whose session has expired, returning how many went
    pub async fn sweep_expired(&self, now: DateTime<Utc>) -> usize {
        let mut managers = self.managers.write().await;
        let before = managers.len();
        managers.retain(|_, manager| !manager.session().is_expired(now));
        before - managers.len()
    }

    pub async fn len(&self) -> usize {
        self.managers.read().await.len()
    }
}
