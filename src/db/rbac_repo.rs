// src/db/rbac_repo.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::common::error::AppError;
use crate::models::rbac::{group_role_rows, Role, RolePermissionRow};

// De qual tabela de vínculo os cargos serão lidos
#[derive(Debug, Clone, Copy)]
pub enum RoleHolder {
    OrganizationAdmin(Uuid),
    Volunteer(Uuid),
}

#[derive(Clone)]
pub struct RbacRepository {
    pool: PgPool,
}

impl RbacRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Cargos (com permissões) de um admin ou voluntário
    pub async fn roles_for(&self, holder: RoleHolder) -> Result<Vec<Role>, AppError> {
        // LEFT JOIN para não perder cargos sem nenhuma permissão
        let (link_table, holder_column, holder_id) = match holder {
            RoleHolder::OrganizationAdmin(id) => ("organization_admin_roles", "admin_id", id),
            RoleHolder::Volunteer(id) => ("volunteer_roles", "volunteer_id", id),
        };

        let sql = format!(
            r#"
            SELECT r.id AS role_id, r.name AS role_name,
                   p.id AS permission_id, p.name AS permission_name
            FROM {link_table} l
            JOIN roles r ON r.id = l.role_id
            LEFT JOIN role_permissions rp ON rp.role_id = r.id
            LEFT JOIN permissions p ON p.id = rp.permission_id
            WHERE l.{holder_column} = $1
            ORDER BY r.name, p.name
            "#
        );

        let rows = sqlx::query_as::<_, RolePermissionRow>(&sql)
            .bind(holder_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(group_role_rows(rows))
    }
}
