//! Admin account repository

use anyhow::Result;
use sqlx::{PgPool, Row};
use tracing::info;
use uuid::Uuid;

/// Stored admin credential
#[derive(Debug, Clone)]
pub struct AdminCredential {
    pub id: Uuid,
    pub password_hash: String,
}

/// Admin account repository
#[derive(Clone)]
pub struct AdminRepository {
    pool: PgPool,
}

impl AdminRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Every admin credential, oldest account first
    ///
    /// Login is password-only, so the caller tries each hash in turn.
    pub async fn all_credentials(&self) -> Result<Vec<AdminCredential>> {
        let rows = sqlx::query(
            r#"
            SELECT id, password_hash
            FROM admin_users
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| AdminCredential {
                id: row.get("id"),
                password_hash: row.get("password_hash"),
            })
            .collect())
    }

    /// Stamp a successful login
    pub async fn record_login(&self, admin_id: Uuid) -> Result<()> {
        sqlx::query("UPDATE admin_users SET last_login = NOW() WHERE id = $1")
            .bind(admin_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Create the first admin account when none exists yet
    ///
    /// Returns the new account's ID, or `None` when admins were already present.
    pub async fn ensure_bootstrap(&self, password_hash: &str) -> Result<Option<Uuid>> {
        let row = sqlx::query(
            r#"
            INSERT INTO admin_users (password_hash)
            SELECT $1
            WHERE NOT EXISTS (SELECT 1 FROM admin_users)
            RETURNING id
            "#,
        )
        .bind(password_hash)
        .fetch_optional(&self.pool)
        .await?;

        let created = row.map(|row| row.get::<Uuid, _>("id"));
        if let Some(id) = created {
            info!("Created bootstrap admin account {}", id);
        }

        Ok(created)
    }
}
