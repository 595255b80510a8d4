// src/models/audit.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{actor::Actor, volunteer::VolunteerType};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AuditUserType {
    Volunteer,
    Premium,
    Admin,
    Root,
}

impl AuditUserType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditUserType::Volunteer => "volunteer",
            AuditUserType::Premium => "premium",
            AuditUserType::Admin => "admin",
            AuditUserType::Root => "root",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AuditOutcome {
    Success,
    Failed,
}

impl AuditOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditOutcome::Success => "success",
            AuditOutcome::Failed => "failed",
        }
    }
}

// Um registro da tabela `logs`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AuditEvent {
    pub user_id: Uuid,
    pub user_name: String,
    pub user_type: AuditUserType,
    #[serde(rename = "type")]
    pub outcome: AuditOutcome,
    pub request: String,
    pub created_at: DateTime<Utc>,
}

impl AuditEvent {
    pub fn for_actor(actor: &Actor, outcome: AuditOutcome, request: impl Into<String>) -> Self {
        let user_type = match actor {
            Actor::Volunteer(volunteer) => match volunteer.volunteer_type {
                VolunteerType::Volunteer => AuditUserType::Volunteer,
                VolunteerType::Premium => AuditUserType::Premium,
            },
            Actor::OrganizationAdmin(admin) if admin.is_root() => AuditUserType::Root,
            Actor::OrganizationAdmin(_) => AuditUserType::Admin,
        };

        Self {
            user_id: actor.id(),
            user_name: actor.name().to_string(),
            user_type,
            outcome,
            request: request.into(),
            created_at: Utc::now(),
        }
    }
}
