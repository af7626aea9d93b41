//! Admin session capability

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Proof of an authenticated admin, handed to a
/// [`VideoOrderManager`](crate::manager::VideoOrderManager) when it is built.
///
/// Expiry is tracked here for the owner's benefit; enforcing it is the job of
/// whoever issued the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminSession {
    pub session_id: Uuid,
    pub admin_id: Uuid,
    pub expires_at: DateTime<Utc>,
}

impl AdminSession {
    pub fn new(session_id: Uuid, admin_id: Uuid, expires_at: DateTime<Utc>) -> Self {
        Self {
            session_id,
            admin_id,
            expires_at,
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}
