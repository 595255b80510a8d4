// src/services/fixtures.rs
//
// Montagem de atores e trabalhos para os testes dos services.

use std::collections::BTreeSet;

use chrono::Utc;
use uuid::Uuid;

use crate::models::{
    actor::{ActorKind, ActorRef, OrganizationAdmin},
    rbac::Role,
    voluntary_work::{VoluntaryWork, WorkStatus},
    volunteer::{SkillTag, TimeSlot, Volunteer, VolunteerProfile, VolunteerType, Weekday},
};

pub fn first_aid() -> SkillTag {
    SkillTag { id: 1, name: "First Aid".into() }
}

pub fn profile(location: &str, days: &[Weekday], time: &[TimeSlot], skills: &[SkillTag]) -> VolunteerProfile {
    VolunteerProfile {
        id: Uuid::new_v4(),
        available_location: location.to_string(),
        available_days: days.iter().copied().collect(),
        available_time: time.iter().copied().collect(),
        skill_tags: skills.to_vec(),
    }
}

pub fn volunteer_with(name: &str, profile: VolunteerProfile, permissions: &[&str]) -> Volunteer {
    Volunteer {
        id: Uuid::new_v4(),
        name: name.to_string(),
        email: format!("{name}@mail.com"),
        volunteer_type: VolunteerType::Volunteer,
        roles: vec![Role::new("volunteer", permissions)],
        profile,
    }
}

// Casa com `work(..)`: Nablus, segunda de manhã, primeiros socorros
pub fn eligible_volunteer(name: &str) -> Volunteer {
    volunteer_with(
        name,
        profile("Nablus", &[Weekday::Monday], &[TimeSlot::Morning], &[first_aid()]),
        &["REGISTER_voluntaryWork", "DEREGISTER_voluntaryWork"],
    )
}

pub fn admin(name: &str, permissions: &[&str]) -> OrganizationAdmin {
    OrganizationAdmin {
        id: Uuid::new_v4(),
        name: name.to_string(),
        email: format!("{name}@org.org"),
        roles: vec![Role::new("admin", permissions)],
    }
}

pub fn work(id: i64, capacity: i32, creator: ActorRef) -> VoluntaryWork {
    VoluntaryWork {
        id,
        name: format!("Work {id}"),
        description: "Mutirão de limpeza".into(),
        location: "Nablus".into(),
        days: BTreeSet::from([Weekday::Monday, Weekday::Tuesday]),
        time: BTreeSet::from([TimeSlot::Morning]),
        skill_tags: vec![first_aid()],
        capacity,
        volunteer_profiles: Vec::new(),
        rating: Vec::new(),
        avg_rating: 0.0,
        feedback: Vec::new(),
        status: WorkStatus::Pending,
        creator,
        organization_id: None,
        created_at: Utc::now(),
    }
}

pub fn any_creator() -> ActorRef {
    ActorRef { kind: ActorKind::OrganizationAdmin, id: Uuid::new_v4() }
}
