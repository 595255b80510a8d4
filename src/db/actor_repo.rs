// src/db/actor_repo.rs

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{
        rbac_repo::{RbacRepository, RoleHolder},
        store::ActorStore,
    },
    models::{
        actor::{OrganizationAdmin, OrganizationProfile},
        volunteer::{parse_text_set, SkillTag, Volunteer, VolunteerProfile},
    },
};

// Linha do JOIN volunteers x volunteer_profiles
#[derive(Debug, FromRow)]
struct VolunteerRow {
    id: Uuid,
    name: String,
    email: String,
    volunteer_type: String,
    profile_id: Uuid,
    available_location: String,
    available_days: Vec<String>,
    available_time: Vec<String>,
}

#[derive(Debug, FromRow)]
struct OrganizationAdminRow {
    id: Uuid,
    name: String,
    email: String,
}

// O repositório de atores: admins de organização, voluntários e perfis de organização
#[derive(Clone)]
pub struct ActorRepository {
    pool: PgPool,
    rbac_repo: RbacRepository,
}

impl ActorRepository {
    pub fn new(pool: PgPool, rbac_repo: RbacRepository) -> Self {
        Self { pool, rbac_repo }
    }

    async fn profile_skill_tags(&self, profile_id: Uuid) -> Result<Vec<SkillTag>, AppError> {
        let tags = sqlx::query_as::<_, SkillTag>(
            r#"
            SELECT st.id, st.name
            FROM skill_tags st
            JOIN volunteer_profile_skill_tags ps ON ps.skill_tag_id = st.id
            WHERE ps.volunteer_profile_id = $1
            ORDER BY st.id
            "#,
        )
            .bind(profile_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(tags)
    }
}

#[async_trait]
impl ActorStore for ActorRepository {
    async fn find_organization_admin(&self, id: Uuid) -> Result<Option<OrganizationAdmin>, AppError> {
        let maybe_admin = sqlx::query_as::<_, OrganizationAdminRow>(
            "SELECT id, name, email FROM organization_admins WHERE id = $1",
        )
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = maybe_admin else {
            return Ok(None);
        };

        let roles = self.rbac_repo.roles_for(RoleHolder::OrganizationAdmin(row.id)).await?;

        Ok(Some(OrganizationAdmin { id: row.id, name: row.name, email: row.email, roles }))
    }

    async fn find_volunteer(&self, id: Uuid) -> Result<Option<Volunteer>, AppError> {
        let maybe_volunteer = sqlx::query_as::<_, VolunteerRow>(
            r#"
            SELECT
                v.id, v.name, v.email,
                v.volunteer_type,
                p.id AS profile_id,
                p.available_location, p.available_days, p.available_time
            FROM volunteers v
            JOIN volunteer_profiles p ON p.id = v.volunteer_profile_id
            WHERE v.id = $1
            "#,
        )
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = maybe_volunteer else {
            return Ok(None);
        };

        let roles = self.rbac_repo.roles_for(RoleHolder::Volunteer(row.id)).await?;
        let skill_tags = self.profile_skill_tags(row.profile_id).await?;

        let profile = VolunteerProfile {
            id: row.profile_id,
            available_location: row.available_location,
            available_days: parse_text_set(&row.available_days)?,
            available_time: parse_text_set(&row.available_time)?,
            skill_tags,
        };

        Ok(Some(Volunteer {
            id: row.id,
            name: row.name,
            email: row.email,
            volunteer_type: row.volunteer_type.parse()?,
            roles,
            profile,
        }))
    }

    async fn find_organization_profile(&self, id: Uuid) -> Result<Option<OrganizationProfile>, AppError> {
        let profile = sqlx::query_as::<_, OrganizationProfile>(
            "SELECT id, name, admin_id FROM organization_profiles WHERE id = $1",
        )
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(profile)
    }
}
