// src/db/memory_repo.rs
//
// Armazenamento em memória: usado nos testes e para rodar sem Postgres.
// Cada operação pega o lock inteiro, então a inserção condicional é atômica.

use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::store::{ActorStore, AuditStore, CapacityPolicy, MembershipInsert, VoluntaryWorkStore},
    models::{
        actor::{OrganizationAdmin, OrganizationProfile},
        audit::AuditEvent,
        voluntary_work::{average_rating, FeedbackEntry, RatingEntry, VoluntaryWork},
        volunteer::{MemberContact, Volunteer},
    },
};

#[derive(Default)]
struct MemoryState {
    organization_admins: HashMap<Uuid, OrganizationAdmin>,
    volunteers: HashMap<Uuid, Volunteer>,
    organization_profiles: HashMap<Uuid, OrganizationProfile>,
    // Trabalhos guardados SEM inscritos; a lista vem de `memberships`
    voluntary_works: HashMap<i64, VoluntaryWork>,
    // Tabela de inscrições (work_id, profile_id), em ordem de chegada
    memberships: Vec<(i64, Uuid)>,
    audit_log: Vec<AuditEvent>,
}

impl MemoryState {
    fn with_members(&self, work: &VoluntaryWork) -> VoluntaryWork {
        let mut work = work.clone();
        work.volunteer_profiles = self
            .memberships
            .iter()
            .filter(|(work_id, _)| *work_id == work.id)
            .map(|(_, profile_id)| *profile_id)
            .collect();
        work
    }

    fn is_member(&self, work_id: i64, profile_id: Uuid) -> bool {
        self.memberships.contains(&(work_id, profile_id))
    }
}

#[derive(Clone, Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<MemoryState>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // Um lock envenenado só indica que outro teste entrou em pânico; os dados seguem válidos.
    fn read(&self) -> RwLockReadGuard<'_, MemoryState> {
        self.state.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, MemoryState> {
        self.state.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn insert_organization_admin(&self, admin: OrganizationAdmin) {
        self.write().organization_admins.insert(admin.id, admin);
    }

    pub fn insert_volunteer(&self, volunteer: Volunteer) {
        self.write().volunteers.insert(volunteer.id, volunteer);
    }

    pub fn insert_organization_profile(&self, profile: OrganizationProfile) {
        self.write().organization_profiles.insert(profile.id, profile);
    }

    // Os perfis listados em `volunteer_profiles` viram linhas de inscrição
    pub fn insert_voluntary_work(&self, mut work: VoluntaryWork) {
        let mut state = self.write();
        for profile_id in work.volunteer_profiles.drain(..) {
            if !state.is_member(work.id, profile_id) {
                state.memberships.push((work.id, profile_id));
            }
        }
        state.voluntary_works.insert(work.id, work);
    }

    pub fn audit_log(&self) -> Vec<AuditEvent> {
        self.read().audit_log.clone()
    }
}

#[async_trait]
impl ActorStore for InMemoryStore {
    async fn find_organization_admin(&self, id: Uuid) -> Result<Option<OrganizationAdmin>, AppError> {
        Ok(self.read().organization_admins.get(&id).cloned())
    }

    async fn find_volunteer(&self, id: Uuid) -> Result<Option<Volunteer>, AppError> {
        Ok(self.read().volunteers.get(&id).cloned())
    }

    async fn find_organization_profile(&self, id: Uuid) -> Result<Option<OrganizationProfile>, AppError> {
        Ok(self.read().organization_profiles.get(&id).cloned())
    }
}

#[async_trait]
impl VoluntaryWorkStore for InMemoryStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<VoluntaryWork>, AppError> {
        let state = self.read();
        Ok(state.voluntary_works.get(&id).map(|w| state.with_members(w)))
    }

    async fn add_member(
        &self,
        work_id: i64,
        profile_id: Uuid,
        policy: CapacityPolicy,
    ) -> Result<MembershipInsert, AppError> {
        let mut state = self.write();

        let Some(capacity) = state.voluntary_works.get(&work_id).map(|w| w.capacity) else {
            return Ok(MembershipInsert::WorkMissing);
        };

        if state.is_member(work_id, profile_id) {
            return Ok(MembershipInsert::AlreadyMember);
        }

        if policy == CapacityPolicy::Enforce {
            let members = state.memberships.iter().filter(|(w, _)| *w == work_id).count();
            if members as i64 >= i64::from(capacity) {
                return Ok(MembershipInsert::CapacityReached { capacity });
            }
        }

        state.memberships.push((work_id, profile_id));
        Ok(MembershipInsert::Inserted)
    }

    async fn remove_member(&self, work_id: i64, profile_id: Uuid) -> Result<bool, AppError> {
        let mut state = self.write();
        let before = state.memberships.len();
        state.memberships.retain(|m| *m != (work_id, profile_id));
        Ok(state.memberships.len() < before)
    }

    async fn member_contacts(&self, work_id: i64) -> Result<Vec<MemberContact>, AppError> {
        let state = self.read();
        let contacts = state
            .memberships
            .iter()
            .filter(|(w, _)| *w == work_id)
            .filter_map(|(_, profile_id)| {
                state.volunteers.values().find(|v| v.profile.id == *profile_id)
            })
            .map(|v| MemberContact {
                volunteer_id: v.id,
                name: v.name.clone(),
                email: v.email.clone(),
            })
            .collect();

        Ok(contacts)
    }

    async fn find_by_member(&self, profile_id: Uuid) -> Result<Vec<VoluntaryWork>, AppError> {
        let state = self.read();
        let mut works: Vec<VoluntaryWork> = state
            .memberships
            .iter()
            .filter(|(_, p)| *p == profile_id)
            .filter_map(|(work_id, _)| state.voluntary_works.get(work_id))
            .map(|w| state.with_members(w))
            .collect();

        works.sort_by_key(|w| (w.created_at, w.id));
        Ok(works)
    }

    async fn append_rating(&self, work_id: i64, entry: &RatingEntry) -> Result<Option<f64>, AppError> {
        let mut state = self.write();
        let Some(work) = state.voluntary_works.get_mut(&work_id) else {
            return Ok(None);
        };

        work.rating.push(entry.clone());
        work.avg_rating = average_rating(&work.rating);
        Ok(Some(work.avg_rating))
    }

    async fn append_feedback(&self, work_id: i64, entry: &FeedbackEntry) -> Result<bool, AppError> {
        match self.write().voluntary_works.get_mut(&work_id) {
            Some(work) => {
                work.feedback.push(entry.clone());
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl AuditStore for InMemoryStore {
    async fn record(&self, event: &AuditEvent) -> Result<(), AppError> {
        self.write().audit_log.push(event.clone());
        Ok(())
    }
}
