// src/services/ownership.rs
//
// Checagens complementares ao gate de permissões, usadas em rotas específicas.
// Falha em qualquer uma delas vira `Unauthorized`, independente do gate.

use std::sync::Arc;

use uuid::Uuid;

use crate::common::error::{AppError, Resource};
use crate::db::ActorStore;
use crate::models::{
    actor::{Actor, OrganizationProfile},
    voluntary_work::VoluntaryWork,
};

// "Estou mexendo em mim mesmo?"
pub fn is_self(actor: &Actor, target_id: Uuid) -> bool {
    actor.id() == target_id
}

// O criador é comparado pela referência tipada: um admin e um voluntário
// com o mesmo UUID não se confundem.
pub fn is_creator(actor: &Actor, work: &VoluntaryWork) -> bool {
    actor.actor_ref() == work.creator
}

pub fn administers_organization(actor: &Actor, organization: &OrganizationProfile) -> bool {
    match actor {
        Actor::OrganizationAdmin(admin) => organization.admin_id == Some(admin.id),
        Actor::Volunteer(_) => false,
    }
}

pub fn participates_in(actor: &Actor, work: &VoluntaryWork) -> bool {
    actor
        .volunteer_profile()
        .is_some_and(|profile| work.has_member(profile.id))
}

pub fn ensure(allowed: bool) -> Result<(), AppError> {
    if allowed { Ok(()) } else { Err(AppError::Unauthorized) }
}

// Checagens que precisam consultar o banco
#[derive(Clone)]
pub struct OwnershipService {
    actors: Arc<dyn ActorStore>,
}

impl OwnershipService {
    pub fn new(actors: Arc<dyn ActorStore>) -> Self {
        Self { actors }
    }

    // Criador do trabalho ou admin da organização dona dele
    pub async fn may_manage(&self, actor: &Actor, work: &VoluntaryWork) -> Result<bool, AppError> {
        if is_creator(actor, work) {
            return Ok(true);
        }

        let Some(organization_id) = work.organization_id else {
            return Ok(false);
        };

        let organization = self
            .actors
            .find_organization_profile(organization_id)
            .await?
            .ok_or(AppError::NotFound(Resource::OrganizationProfile))?;
        Ok(administers_organization(actor, &organization))
    }
}
