//! Application state shared across handlers

use catalog::showcase::ShowcaseLayout;
use common::{session::SessionStore, token::TokenSigner};

use crate::{managers::ManagerRegistry, repositories::PgVideoStore};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Public reads go straight to the store
    pub video_store: PgVideoStore,
    pub managers: ManagerRegistry<PgVideoStore>,
    pub session_store: SessionStore,
    pub token_signer: TokenSigner,
    pub showcase_layout: ShowcaseLayout,
}
