// src/db/voluntary_work_repo.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{types::Json, FromRow, PgPool};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::store::{CapacityPolicy, MembershipInsert, VoluntaryWorkStore},
    models::{
        actor::{ActorKind, ActorRef},
        voluntary_work::{average_rating, FeedbackEntry, RatingEntry, VoluntaryWork},
        volunteer::{parse_text_set, MemberContact, SkillTag},
    },
};

const WORK_COLUMNS: &str = r#"
    w.id, w.name, w.description, w.location,
    w.days, w.time_slots,
    w.capacity, w.rating, w.avg_rating, w.feedback,
    w.status, w.creator_kind, w.creator_id, w.organization_id, w.created_at
"#;

// Linha crua da tabela voluntary_works
#[derive(Debug, FromRow)]
struct VoluntaryWorkRow {
    id: i64,
    name: String,
    description: String,
    location: String,
    days: Vec<String>,
    time_slots: Vec<String>,
    capacity: i32,
    rating: Json<Vec<RatingEntry>>,
    avg_rating: f64,
    feedback: Json<Vec<FeedbackEntry>>,
    status: String,
    creator_kind: String,
    creator_id: Uuid,
    organization_id: Option<Uuid>,
    created_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct VoluntaryWorkRepository {
    pool: PgPool,
}

impl VoluntaryWorkRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Completa a linha com habilidades e inscritos (visão da tabela de inscrições)
    async fn hydrate(&self, row: VoluntaryWorkRow) -> Result<VoluntaryWork, AppError> {
        let skill_tags = sqlx::query_as::<_, SkillTag>(
            r#"
            SELECT st.id, st.name
            FROM skill_tags st
            JOIN voluntary_work_skill_tags ws ON ws.skill_tag_id = st.id
            WHERE ws.voluntary_work_id = $1
            ORDER BY st.id
            "#,
        )
            .bind(row.id)
            .fetch_all(&self.pool)
            .await?;

        let volunteer_profiles = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT volunteer_profile_id
            FROM voluntary_work_members
            WHERE voluntary_work_id = $1
            ORDER BY registered_at, volunteer_profile_id
            "#,
        )
            .bind(row.id)
            .fetch_all(&self.pool)
            .await?;

        Ok(VoluntaryWork {
            id: row.id,
            name: row.name,
            description: row.description,
            location: row.location,
            days: parse_text_set(&row.days)?,
            time: parse_text_set(&row.time_slots)?,
            skill_tags,
            capacity: row.capacity,
            volunteer_profiles,
            rating: row.rating.0,
            avg_rating: row.avg_rating,
            feedback: row.feedback.0,
            status: row.status.parse()?,
            creator: ActorRef { kind: ActorKind::parse(&row.creator_kind)?, id: row.creator_id },
            organization_id: row.organization_id,
            created_at: row.created_at,
        })
    }
}

#[async_trait]
impl VoluntaryWorkStore for VoluntaryWorkRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<VoluntaryWork>, AppError> {
        let sql = format!("SELECT {WORK_COLUMNS} FROM voluntary_works w WHERE w.id = $1");
        let maybe_row = sqlx::query_as::<_, VoluntaryWorkRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match maybe_row {
            Some(row) => Ok(Some(self.hydrate(row).await?)),
            None => Ok(None),
        }
    }

    async fn add_member(
        &self,
        work_id: i64,
        profile_id: Uuid,
        policy: CapacityPolicy,
    ) -> Result<MembershipInsert, AppError> {
        // 1. Inicia Transação
        let mut tx = self.pool.begin().await?;

        // 2. Trava a linha do trabalho: inscrições concorrentes esperam aqui
        let capacity = sqlx::query_scalar::<_, i32>(
            "SELECT capacity FROM voluntary_works WHERE id = $1 FOR UPDATE",
        )
            .bind(work_id)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(capacity) = capacity else {
            return Ok(MembershipInsert::WorkMissing);
        };

        // 3. Já inscrito?
        let already_member = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM voluntary_work_members
                WHERE voluntary_work_id = $1 AND volunteer_profile_id = $2
            )
            "#,
        )
            .bind(work_id)
            .bind(profile_id)
            .fetch_one(&mut *tx)
            .await?;

        if already_member {
            return Ok(MembershipInsert::AlreadyMember);
        }

        // 4. Recontagem dentro da transação
        if policy == CapacityPolicy::Enforce {
            let members = sqlx::query_scalar::<_, i64>(
                "SELECT COUNT(*) FROM voluntary_work_members WHERE voluntary_work_id = $1",
            )
                .bind(work_id)
                .fetch_one(&mut *tx)
                .await?;

            if members >= i64::from(capacity) {
                return Ok(MembershipInsert::CapacityReached { capacity });
            }
        }

        // 5. Salva o Vínculo
        sqlx::query(
            r#"
            INSERT INTO voluntary_work_members (voluntary_work_id, volunteer_profile_id)
            VALUES ($1, $2)
            "#,
        )
            .bind(work_id)
            .bind(profile_id)
            .execute(&mut *tx)
            .await?;

        // 6. Commit
        tx.commit().await?;

        Ok(MembershipInsert::Inserted)
    }

    async fn remove_member(&self, work_id: i64, profile_id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            DELETE FROM voluntary_work_members
            WHERE voluntary_work_id = $1 AND volunteer_profile_id = $2
            "#,
        )
            .bind(work_id)
            .bind(profile_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn member_contacts(&self, work_id: i64) -> Result<Vec<MemberContact>, AppError> {
        let contacts = sqlx::query_as::<_, MemberContact>(
            r#"
            SELECT v.id AS volunteer_id, v.name, v.email
            FROM voluntary_work_members m
            JOIN volunteers v ON v.volunteer_profile_id = m.volunteer_profile_id
            WHERE m.voluntary_work_id = $1
            ORDER BY m.registered_at, v.id
            "#,
        )
            .bind(work_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(contacts)
    }

    async fn find_by_member(&self, profile_id: Uuid) -> Result<Vec<VoluntaryWork>, AppError> {
        let sql = format!(
            r#"
            SELECT {WORK_COLUMNS}
            FROM voluntary_works w
            JOIN voluntary_work_members m ON m.voluntary_work_id = w.id
            WHERE m.volunteer_profile_id = $1
            ORDER BY w.created_at, w.id
            "#
        );
        let rows = sqlx::query_as::<_, VoluntaryWorkRow>(&sql)
            .bind(profile_id)
            .fetch_all(&self.pool)
            .await?;

        let mut works = Vec::with_capacity(rows.len());
        for row in rows {
            works.push(self.hydrate(row).await?);
        }
        Ok(works)
    }

    async fn append_rating(&self, work_id: i64, entry: &RatingEntry) -> Result<Option<f64>, AppError> {
        let mut tx = self.pool.begin().await?;

        // Trava a linha: a média sempre é recalculada sobre a lista completa
        let current = sqlx::query_scalar::<_, Json<Vec<RatingEntry>>>(
            "SELECT rating FROM voluntary_works WHERE id = $1 FOR UPDATE",
        )
            .bind(work_id)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(Json(mut ratings)) = current else {
            return Ok(None);
        };

        ratings.push(entry.clone());
        let avg_rating = average_rating(&ratings);

        sqlx::query("UPDATE voluntary_works SET rating = $2, avg_rating = $3 WHERE id = $1")
            .bind(work_id)
            .bind(Json(&ratings))
            .bind(avg_rating)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(Some(avg_rating))
    }

    async fn append_feedback(&self, work_id: i64, entry: &FeedbackEntry) -> Result<bool, AppError> {
        // Concatena no próprio UPDATE: dois feedbacks simultâneos não se sobrescrevem
        let result = sqlx::query(
            "UPDATE voluntary_works SET feedback = feedback || $2::jsonb WHERE id = $1",
        )
            .bind(work_id)
            .bind(Json(vec![entry]))
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
