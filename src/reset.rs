use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use sqlx::PgPool;

use crate::auth::{generate_reset_token, hash_reset_token};
use crate::store::UserStore;

/// Boundary for password-recovery mechanics: generate a reset link for an
/// address and hand it off for delivery. Callers treat every failure the
/// same way, so implementations are free to fail on unknown addresses.
#[async_trait]
pub trait ResetLinkProvider: Send + Sync {
    async fn send_reset_link(&self, email: &str) -> anyhow::Result<()>;
}

pub struct PgResetLinkProvider {
    pool: PgPool,
    users: Arc<dyn UserStore>,
    link_base: String,
    ttl_hours: i64,
}

impl PgResetLinkProvider {
    pub fn new(
        pool: PgPool,
        users: Arc<dyn UserStore>,
        link_base: String,
        ttl_hours: i64,
    ) -> Self {
        Self {
            pool,
            users,
            link_base,
            ttl_hours,
        }
    }
}

#[async_trait]
impl ResetLinkProvider for PgResetLinkProvider {
    async fn send_reset_link(&self, email: &str) -> anyhow::Result<()> {
        if self.users.find_by_email(email).await?.is_none() {
            anyhow::bail!("no user registered under this address");
        }

        let token = generate_reset_token();
        let expires_at = Utc::now() + Duration::hours(self.ttl_hours);

        sqlx::query(
            r#"
            INSERT INTO senha_reset_token (email, token_hash, expires_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(email)
        .bind(hash_reset_token(&token))
        .bind(expires_at)
        .execute(&self.pool)
        .await?;

        let link = format!("{}?token={}", self.link_base, token);
        // TODO: hand the link to an SMTP relay; until then it only reaches
        // the server log.
        tracing::info!(%email, %link, "password reset link issued");

        Ok(())
    }
}
