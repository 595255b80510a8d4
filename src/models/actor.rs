// src/models/actor.rs

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::{
    rbac::Role,
    volunteer::{Volunteer, VolunteerProfile},
};

// Quem está do outro lado da requisição: admin de organização ou voluntário.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum ActorKind {
    OrganizationAdmin,
    Volunteer,
}

impl ActorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActorKind::OrganizationAdmin => "organizationAdmin",
            ActorKind::Volunteer => "volunteer",
        }
    }

    pub fn parse(value: &str) -> anyhow::Result<Self> {
        match value {
            "organizationAdmin" => Ok(ActorKind::OrganizationAdmin),
            "volunteer" => Ok(ActorKind::Volunteer),
            other => Err(anyhow::anyhow!("Tipo de ator desconhecido: {}", other)),
        }
    }
}

// Referência tipada a um ator (ex: o criador de um trabalho voluntário).
// O ID sozinho não diz se é admin ou voluntário, por isso carregamos o `kind` junto.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub struct ActorRef {
    pub kind: ActorKind,
    pub id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationAdmin {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub roles: Vec<Role>,
}

impl OrganizationAdmin {
    // O admin "root" é tratado à parte no log de auditoria
    pub fn is_root(&self) -> bool {
        self.name == "root"
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationProfile {
    pub id: Uuid,
    pub name: String,
    pub admin_id: Option<Uuid>,
}

#[derive(Debug, Clone)]
pub enum Actor {
    OrganizationAdmin(OrganizationAdmin),
    Volunteer(Volunteer),
}

impl Actor {
    pub fn id(&self) -> Uuid {
        match self {
            Actor::OrganizationAdmin(admin) => admin.id,
            Actor::Volunteer(volunteer) => volunteer.id,
        }
    }

    pub fn kind(&self) -> ActorKind {
        match self {
            Actor::OrganizationAdmin(_) => ActorKind::OrganizationAdmin,
            Actor::Volunteer(_) => ActorKind::Volunteer,
        }
    }

    pub fn actor_ref(&self) -> ActorRef {
        ActorRef { kind: self.kind(), id: self.id() }
    }

    pub fn name(&self) -> &str {
        match self {
            Actor::OrganizationAdmin(admin) => &admin.name,
            Actor::Volunteer(volunteer) => &volunteer.name,
        }
    }

    pub fn email(&self) -> &str {
        match self {
            Actor::OrganizationAdmin(admin) => &admin.email,
            Actor::Volunteer(volunteer) => &volunteer.email,
        }
    }

    pub fn roles(&self) -> &[Role] {
        match self {
            Actor::OrganizationAdmin(admin) => &admin.roles,
            Actor::Volunteer(volunteer) => &volunteer.roles,
        }
    }

    pub fn as_volunteer(&self) -> Option<&Volunteer> {
        match self {
            Actor::Volunteer(volunteer) => Some(volunteer),
            Actor::OrganizationAdmin(_) => None,
        }
    }

    pub fn volunteer_profile(&self) -> Option<&VolunteerProfile> {
        self.as_volunteer().map(|v| &v.profile)
    }
}
