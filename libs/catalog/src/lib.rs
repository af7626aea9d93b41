//! Video catalog for the showreel portfolio
//!
//! The public side reads active videos and splits them into showcase lanes.
//! The admin side goes through a [`VideoOrderManager`]: entries are added
//! and deleted immediately, while reordering is staged locally (by drag or
//! keyboard) and written to the [`VideoStore`] only on explicit, confirmed
//! save.

pub mod drag;
pub mod error;
pub mod manager;
pub mod model;
pub mod notice;
pub mod pagination;
pub mod session;
pub mod showcase;
pub mod staging;
pub mod store;
pub mod youtube;

pub use error::{OrderError, OrderResult};
pub use manager::{CommitPhase, ManagerConfig, ManagerSnapshot, VideoOrderManager};
pub use model::{Category, VideoEntry, VideoId};
pub use session::AdminSession;
pub use store::{MemoryVideoStore, StoreError, VideoStore};
