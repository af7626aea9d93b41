//! Errors raised by the video order manager

use thiserror::Error;

use crate::{model::VideoId, store::StoreError};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OrderError {
    /// The store is not configured; mutations stay disabled
    #[error("Video store is not configured")]
    NotConfigured,

    /// Input rejected before reaching the store
    #[error("{0}")]
    Validation(String),

    /// A reorder commit is running
    #[error("A save is already in progress")]
    CommitInFlight,

    /// An add, delete or reload has not finished yet
    #[error("Another change to the video list is in progress")]
    ListBusy,

    /// Confirmation without a preceding save request
    #[error("No save is awaiting confirmation")]
    NoPendingConfirmation,

    #[error("There are no unsaved changes")]
    NothingToSave,

    #[error("Video {0} is not in the list")]
    UnknownVideo(VideoId),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Type alias for Result with OrderError
pub type OrderResult<T> = Result<T, OrderError>;
