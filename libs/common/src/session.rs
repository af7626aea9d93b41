//! Admin session records kept in Redis
//!
//! The auth service writes a record on login and deletes it on logout. The
//! API service only reads it: a token whose session record is gone is dead,
//! whatever its `exp` claim says.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::{cache::RedisPool, error::SessionError};

/// Session record stored under `admin_session:{session_id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub session_id: Uuid,
    pub admin_id: Uuid,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl SessionRecord {
    /// Remaining lifetime in whole seconds, zero once expired
    pub fn ttl_seconds(&self, now: DateTime<Utc>) -> u64 {
        (self.expires_at - now).num_seconds().max(0) as u64
    }
}

/// Redis-backed session store
#[derive(Clone)]
pub struct SessionStore {
    redis: RedisPool,
}

impl SessionStore {
    pub fn new(redis: RedisPool) -> Self {
        Self { redis }
    }

    fn key(session_id: Uuid) -> String {
        format!("admin_session:{}", session_id)
    }

    /// Persist a session until its expiry
    pub async fn create(&self, record: &SessionRecord) -> Result<(), SessionError> {
        info!(
            "Creating admin session {} for admin {}",
            record.session_id, record.admin_id
        );

        let ttl = record.ttl_seconds(Utc::now()).max(1);
        self.redis
            .set_json(&Self::key(record.session_id), record, ttl)
            .await
    }

    /// Look up a live session
    pub async fn find(&self, session_id: Uuid) -> Result<Option<SessionRecord>, SessionError> {
        self.redis.get_json(&Self::key(session_id)).await
    }

    /// Revoke a session, returning whether it was still live
    pub async fn revoke(&self, session_id: Uuid) -> Result<bool, SessionError> {
        info!("Revoking admin session {}", session_id);
        Ok(self.redis.delete(&Self::key(session_id)).await?)
    }

    pub async fn health_check(&self) -> Result<bool, SessionError> {
        Ok(self.redis.health_check().await?)
    }
}
