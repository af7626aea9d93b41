//! Row-store contract the catalog is persisted through

use std::future::Future;

use thiserror::Error;

use crate::model::{ListFilter, NewVideoEntry, OrderAssignment, VideoEntry, VideoId, VideoPatch};

pub mod memory;

pub use memory::MemoryVideoStore;

/// Failures reported by a [`VideoStore`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// No backing store is configured
    #[error("Video store is not configured")]
    NotConfigured,

    /// The store could not be reached
    #[error("Video store unavailable: {0}")]
    Unavailable(String),

    /// The store refused the operation (constraint violation, bad payload)
    #[error("Video store rejected the operation: {0}")]
    Rejected(String),

    #[error("Video {0} not found")]
    NotFound(VideoId),

    /// The row changed since it was read
    #[error("Video {0} was modified concurrently")]
    Conflict(VideoId),

    /// The store has no batched write path
    #[error("Operation not supported by this video store")]
    Unsupported,
}

/// Type alias for Result with StoreError
pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence for showcased videos
///
/// `list` returns entries in canonical order (see
/// [`canonical_order`](crate::model::canonical_order)).
pub trait VideoStore: Send + Sync {
    fn list(&self, filter: ListFilter) -> impl Future<Output = StoreResult<Vec<VideoEntry>>> + Send;

    /// Insert an entry; the store assigns id, version and timestamps
    fn insert(&self, entry: NewVideoEntry) -> impl Future<Output = StoreResult<VideoEntry>> + Send;

    /// Apply a partial update, returning the stored row
    fn update(
        &self,
        id: VideoId,
        patch: VideoPatch,
    ) -> impl Future<Output = StoreResult<VideoEntry>> + Send;

    fn delete(&self, id: VideoId) -> impl Future<Output = StoreResult<()>> + Send;

    /// Whether [`apply_order`](Self::apply_order) writes all assignments atomically
    fn supports_batch(&self) -> bool {
        false
    }

    /// Write every assignment in one transaction, or none of them
    fn apply_order(
        &self,
        _assignments: &[OrderAssignment],
    ) -> impl Future<Output = StoreResult<Vec<VideoEntry>>> + Send {
        async { Err(StoreError::Unsupported) }
    }
}
