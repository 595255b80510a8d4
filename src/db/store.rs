// src/db/store.rs
//
// Contratos de persistência usados pelos services.
// Implementados pelos repositórios Postgres e pelo InMemoryStore.

use async_trait::async_trait;
use uuid::Uuid;

use crate::common::error::AppError;
use crate::models::{
    actor::{OrganizationAdmin, OrganizationProfile},
    audit::AuditEvent,
    voluntary_work::{FeedbackEntry, RatingEntry, VoluntaryWork},
    volunteer::{MemberContact, Volunteer},
};

// Se a inserção deve respeitar a capacidade do trabalho
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CapacityPolicy {
    Enforce,
    Ignore,
}

// Resultado da inserção condicional de um inscrito
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipInsert {
    Inserted,
    AlreadyMember,
    CapacityReached { capacity: i32 },
    WorkMissing,
}

#[async_trait]
pub trait ActorStore: Send + Sync {
    // Admin com cargos e permissões carregados
    async fn find_organization_admin(&self, id: Uuid) -> Result<Option<OrganizationAdmin>, AppError>;

    // Voluntário com cargos, permissões e perfil (habilidades incluídas)
    async fn find_volunteer(&self, id: Uuid) -> Result<Option<Volunteer>, AppError>;

    async fn find_organization_profile(&self, id: Uuid) -> Result<Option<OrganizationProfile>, AppError>;
}

#[async_trait]
pub trait VoluntaryWorkStore: Send + Sync {
    // Trabalho com habilidades e a lista de perfis inscritos
    async fn find_by_id(&self, id: i64) -> Result<Option<VoluntaryWork>, AppError>;

    /// Insere o inscrito de forma atômica: a contagem de inscritos é refeita
    /// junto com a inserção, então duas inscrições simultâneas não passam da capacidade.
    async fn add_member(
        &self,
        work_id: i64,
        profile_id: Uuid,
        policy: CapacityPolicy,
    ) -> Result<MembershipInsert, AppError>;

    // `false` quando o perfil não estava inscrito
    async fn remove_member(&self, work_id: i64, profile_id: Uuid) -> Result<bool, AppError>;

    async fn member_contacts(&self, work_id: i64) -> Result<Vec<MemberContact>, AppError>;

    async fn find_by_member(&self, profile_id: Uuid) -> Result<Vec<VoluntaryWork>, AppError>;

    /// Acrescenta a avaliação e recalcula a média na mesma operação.
    /// `None` quando o trabalho não existe; senão, a nova média.
    async fn append_rating(&self, work_id: i64, entry: &RatingEntry) -> Result<Option<f64>, AppError>;

    // `false` quando o trabalho não existe
    async fn append_feedback(&self, work_id: i64, entry: &FeedbackEntry) -> Result<bool, AppError>;
}

#[async_trait]
pub trait AuditStore: Send + Sync {
    async fn record(&self, event: &AuditEvent) -> Result<(), AppError>;
}
