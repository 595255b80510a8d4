// src/services/registration_service.rs

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    common::error::{AppError, Resource},
    db::{ActorStore, CapacityPolicy, MembershipInsert, VoluntaryWorkStore},
    models::{
        voluntary_work::VoluntaryWork,
        volunteer::{MemberContact, Volunteer},
    },
    services::{eligibility, work_locks::WorkLocks},
};

// Comprovante de uma inscrição/desinscrição, usado para e-mail e auditoria
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationReceipt {
    pub work_id: i64,
    pub work_name: String,
    pub volunteer: MemberContact,
}

impl RegistrationReceipt {
    fn new(work: &VoluntaryWork, volunteer: &Volunteer) -> Self {
        Self {
            work_id: work.id,
            work_name: work.name.clone(),
            volunteer: MemberContact {
                volunteer_id: volunteer.id,
                name: volunteer.name.clone(),
                email: volunteer.email.clone(),
            },
        }
    }
}

#[derive(Clone)]
pub struct RegistrationService {
    actors: Arc<dyn ActorStore>,
    works: Arc<dyn VoluntaryWorkStore>,
    locks: WorkLocks,
    admin_policy: CapacityPolicy,
}

impl RegistrationService {
    pub fn new(
        actors: Arc<dyn ActorStore>,
        works: Arc<dyn VoluntaryWorkStore>,
        locks: WorkLocks,
        admin_respects_capacity: bool,
    ) -> Self {
        let admin_policy = if admin_respects_capacity {
            CapacityPolicy::Enforce
        } else {
            CapacityPolicy::Ignore
        };
        Self { actors, works, locks, admin_policy }
    }

    pub async fn voluntary_work(&self, work_id: i64) -> Result<VoluntaryWork, AppError> {
        self.works
            .find_by_id(work_id)
            .await?
            .ok_or(AppError::NotFound(Resource::VoluntaryWork))
    }

    pub async fn volunteer(&self, volunteer_id: Uuid) -> Result<Volunteer, AppError> {
        self.actors
            .find_volunteer(volunteer_id)
            .await?
            .ok_or(AppError::NotFound(Resource::Volunteer))
    }

    // Trabalhos em que o voluntário está inscrito (visão da tabela de inscrições)
    pub async fn voluntary_works_for_volunteer(&self, volunteer_id: Uuid) -> Result<Vec<VoluntaryWork>, AppError> {
        let volunteer = self.volunteer(volunteer_id).await?;
        self.works.find_by_member(volunteer.profile.id).await
    }

    /// Inscrição feita pelo próprio voluntário.
    /// Ordem das checagens: trabalho existe, perfil compatível, ainda não inscrito, há vaga.
    pub async fn register_by_volunteer(
        &self,
        work_id: i64,
        volunteer: &Volunteer,
    ) -> Result<RegistrationReceipt, AppError> {
        let _guard = self.locks.lock(work_id).await;

        let work = self.voluntary_work(work_id).await?;

        let failed = eligibility::mismatches(&volunteer.profile, &work);
        if !failed.is_empty() {
            tracing::debug!("Voluntário {} incompatível com o trabalho {}: {:?}", volunteer.id, work_id, failed);
            return Err(AppError::EligibilityMismatch(failed));
        }

        if work.has_member(volunteer.profile.id) {
            return Err(AppError::AlreadyRegistered);
        }

        if work.is_full() {
            return Err(AppError::CapacityExceeded { capacity: work.capacity });
        }

        self.insert_member(&work, volunteer, CapacityPolicy::Enforce).await?;

        tracing::info!("✅ Voluntário {} inscrito no trabalho {}.", volunteer.id, work_id);
        Ok(RegistrationReceipt::new(&work, volunteer))
    }

    /// Inscrição feita por um admin de organização: sem checagem de perfil.
    /// A capacidade só é respeitada se `ADMIN_REGISTRATION_RESPECTS_CAPACITY` estiver ligado.
    pub async fn register_by_organization_admin(
        &self,
        work_id: i64,
        volunteer_id: Uuid,
    ) -> Result<RegistrationReceipt, AppError> {
        let _guard = self.locks.lock(work_id).await;

        let work = self.voluntary_work(work_id).await?;
        let volunteer = self.volunteer(volunteer_id).await?;

        if work.has_member(volunteer.profile.id) {
            return Err(AppError::AlreadyRegistered);
        }

        self.insert_member(&work, &volunteer, self.admin_policy).await?;

        if work.is_full() {
            tracing::warn!(
                "⚠️ Trabalho {} acima da capacidade ({} de {}) após inscrição feita por admin.",
                work_id,
                work.member_count() + 1,
                work.capacity
            );
        }

        tracing::info!("✅ Voluntário {} inscrito no trabalho {} por um admin.", volunteer_id, work_id);
        Ok(RegistrationReceipt::new(&work, &volunteer))
    }

    pub async fn deregister(&self, work_id: i64, volunteer_id: Uuid) -> Result<RegistrationReceipt, AppError> {
        let _guard = self.locks.lock(work_id).await;

        let work = self.voluntary_work(work_id).await?;
        let volunteer = self.volunteer(volunteer_id).await?;

        if !work.has_member(volunteer.profile.id) {
            return Err(AppError::NotRegistered);
        }

        if !self.works.remove_member(work_id, volunteer.profile.id).await? {
            return Err(AppError::NotRegistered);
        }

        tracing::info!("👋 Voluntário {} saiu do trabalho {}.", volunteer_id, work_id);
        Ok(RegistrationReceipt::new(&work, &volunteer))
    }

    // A inserção no banco refaz as checagens de forma atômica
    async fn insert_member(
        &self,
        work: &VoluntaryWork,
        volunteer: &Volunteer,
        policy: CapacityPolicy,
    ) -> Result<(), AppError> {
        match self.works.add_member(work.id, volunteer.profile.id, policy).await? {
            MembershipInsert::Inserted => Ok(()),
            MembershipInsert::AlreadyMember => Err(AppError::AlreadyRegistered),
            MembershipInsert::CapacityReached { capacity } => Err(AppError::CapacityExceeded { capacity }),
            MembershipInsert::WorkMissing => Err(AppError::NotFound(Resource::VoluntaryWork)),
        }
    }
}
