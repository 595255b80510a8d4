// src/db/audit_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;

use crate::{common::error::AppError, db::store::AuditStore, models::audit::AuditEvent};

#[derive(Clone)]
pub struct AuditRepository {
    pool: PgPool,
}

impl AuditRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditStore for AuditRepository {
    async fn record(&self, event: &AuditEvent) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO logs (user_id, user_name, user_type, type, request, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
            .bind(event.user_id)
            .bind(&event.user_name)
            .bind(event.user_type.as_str())
            .bind(event.outcome.as_str())
            .bind(&event.request)
            .bind(event.created_at)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
