// src/models/rbac.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// O que sai do banco (Tabela permissions)
// O `name` é o identificador da operação, ex: "POST_voluntaryWork"
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Permission {
    pub id: Uuid,
    pub name: String,
}

// Cargo já com as permissões carregadas
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub id: Uuid,
    pub name: String,
    pub permissions: Vec<Permission>,
}

impl Role {
    pub fn new(name: &str, permission_names: &[&str]) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            permissions: permission_names
                .iter()
                .map(|p| Permission { id: Uuid::new_v4(), name: p.to_string() })
                .collect(),
        }
    }
}

// Linha "achatada" do JOIN roles x role_permissions x permissions.
// Um cargo sem permissões vem com as colunas de permissão nulas (LEFT JOIN).
#[derive(Debug, FromRow)]
pub struct RolePermissionRow {
    pub role_id: Uuid,
    pub role_name: String,
    pub permission_id: Option<Uuid>,
    pub permission_name: Option<String>,
}

// Agrupa as linhas do JOIN em cargos, mantendo a ordem em que chegaram
pub fn group_role_rows(rows: Vec<RolePermissionRow>) -> Vec<Role> {
    let mut roles: Vec<Role> = Vec::new();

    for row in rows {
        let position = match roles.iter().position(|r| r.id == row.role_id) {
            Some(pos) => pos,
            None => {
                roles.push(Role { id: row.role_id, name: row.role_name, permissions: Vec::new() });
                roles.len() - 1
            }
        };

        if let (Some(id), Some(name)) = (row.permission_id, row.permission_name) {
            roles[position].permissions.push(Permission { id, name });
        }
    }

    roles
}
