// src/services/eligibility.rs
//
// Compatibilidade estrutural entre o perfil do voluntário e o trabalho voluntário.
// Não olha capacidade: isso é responsabilidade do RegistrationService.

use serde::Serialize;

use crate::models::{voluntary_work::VoluntaryWork, volunteer::VolunteerProfile};

// Qual regra de compatibilidade falhou
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum EligibilityMismatch {
    Location,
    Days,
    Time,
    SkillTags,
}

impl EligibilityMismatch {
    pub fn as_str(&self) -> &'static str {
        match self {
            EligibilityMismatch::Location => "location",
            EligibilityMismatch::Days => "days",
            EligibilityMismatch::Time => "time",
            EligibilityMismatch::SkillTags => "skillTags",
        }
    }
}

/// Lista as regras que o perfil não cumpre (vazia = elegível).
///
/// 1. Local exatamente igual.
/// 2. Dias disponíveis: não vazio e todos contidos nos dias do trabalho.
/// 3. Turnos disponíveis: mesma regra dos dias.
/// 4. Toda habilidade exigida pelo trabalho precisa estar no perfil.
pub fn mismatches(profile: &VolunteerProfile, work: &VoluntaryWork) -> Vec<EligibilityMismatch> {
    let mut failed = Vec::new();

    if profile.available_location != work.location {
        failed.push(EligibilityMismatch::Location);
    }

    // O voluntário não precisa cobrir todos os dias do trabalho,
    // mas não pode declarar um dia em que o trabalho não acontece.
    if profile.available_days.is_empty() || !profile.available_days.is_subset(&work.days) {
        failed.push(EligibilityMismatch::Days);
    }

    if profile.available_time.is_empty() || !profile.available_time.is_subset(&work.time) {
        failed.push(EligibilityMismatch::Time);
    }

    let has_all_skills = work
        .skill_tags
        .iter()
        .all(|required| profile.skill_tags.iter().any(|owned| owned.id == required.id));
    if !has_all_skills {
        failed.push(EligibilityMismatch::SkillTags);
    }

    failed
}

pub fn is_eligible(profile: &VolunteerProfile, work: &VoluntaryWork) -> bool {
    mismatches(profile, work).is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        actor::{ActorKind, ActorRef},
        voluntary_work::WorkStatus,
        volunteer::{SkillTag, TimeSlot, Weekday},
    };
    use chrono::Utc;
    use std::collections::BTreeSet;
    use uuid::Uuid;

    fn tag(id: i64) -> SkillTag {
        SkillTag { id, name: format!("skill-{}", id) }
    }

    fn work(days: &[Weekday], time: &[TimeSlot], skills: &[i64]) -> VoluntaryWork {
        VoluntaryWork {
            id: 1,
            name: "Horta comunitária".into(),
            description: "Plantio".into(),
            location: "X".into(),
            days: days.iter().copied().collect(),
            time: time.iter().copied().collect(),
            skill_tags: skills.iter().map(|id| tag(*id)).collect(),
            capacity: 10,
            volunteer_profiles: Vec::new(),
            rating: Vec::new(),
            avg_rating: 0.0,
            feedback: Vec::new(),
            status: WorkStatus::Pending,
            creator: ActorRef { kind: ActorKind::OrganizationAdmin, id: Uuid::new_v4() },
            organization_id: None,
            created_at: Utc::now(),
        }
    }

    fn profile(days: &[Weekday], time: &[TimeSlot], skills: &[i64]) -> VolunteerProfile {
        VolunteerProfile {
            id: Uuid::new_v4(),
            available_location: "X".into(),
            available_days: days.iter().copied().collect::<BTreeSet<_>>(),
            available_time: time.iter().copied().collect::<BTreeSet<_>>(),
            skill_tags: skills.iter().map(|id| tag(*id)).collect(),
        }
    }

    #[test]
    fn fewer_days_than_the_work_is_eligible() {
        let w = work(&[Weekday::Monday, Weekday::Tuesday], &[TimeSlot::Morning], &[]);
        let p = profile(&[Weekday::Monday], &[TimeSlot::Morning], &[]);
        assert!(is_eligible(&p, &w));
    }

    #[test]
    fn a_day_outside_the_work_schedule_is_not_eligible() {
        let w = work(&[Weekday::Monday], &[TimeSlot::Morning], &[]);
        let p = profile(&[Weekday::Monday, Weekday::Wednesday], &[TimeSlot::Morning], &[]);
        assert_eq!(mismatches(&p, &w), vec![EligibilityMismatch::Days]);
    }

    #[test]
    fn empty_availability_is_never_eligible() {
        let w = work(&[Weekday::Monday], &[TimeSlot::Morning], &[]);
        let p = profile(&[], &[], &[]);
        assert_eq!(mismatches(&p, &w), vec![EligibilityMismatch::Days, EligibilityMismatch::Time]);
    }

    #[test]
    fn location_must_match_exactly() {
        let w = work(&[Weekday::Monday], &[TimeSlot::Morning], &[]);
        let mut p = profile(&[Weekday::Monday], &[TimeSlot::Morning], &[]);
        p.available_location = "x".into();
        assert_eq!(mismatches(&p, &w), vec![EligibilityMismatch::Location]);
    }

    #[test]
    fn required_skills_must_be_a_subset_of_the_profile() {
        let w = work(&[Weekday::Monday], &[TimeSlot::Afternoon], &[1, 2]);

        let missing = profile(&[Weekday::Monday], &[TimeSlot::Afternoon], &[1]);
        assert_eq!(mismatches(&missing, &w), vec![EligibilityMismatch::SkillTags]);

        let extra = profile(&[Weekday::Monday], &[TimeSlot::Afternoon], &[1, 2, 3]);
        assert!(is_eligible(&extra, &w));
    }

    #[test]
    fn time_slot_outside_the_work_is_not_eligible() {
        let w = work(&[Weekday::Friday], &[TimeSlot::Morning], &[]);
        let p = profile(&[Weekday::Friday], &[TimeSlot::Morning, TimeSlot::Afternoon], &[]);
        assert_eq!(mismatches(&p, &w), vec![EligibilityMismatch::Time]);
    }
}
