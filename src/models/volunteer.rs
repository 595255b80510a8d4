// src/models/volunteer.rs

use std::collections::BTreeSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::rbac::Role;

// --- 1. Dias da semana ---
// No banco ficam como TEXT[] com o nome em inglês ("Monday")
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Weekday {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Weekday {
    pub fn as_str(&self) -> &'static str {
        match self {
            Weekday::Sunday => "Sunday",
            Weekday::Monday => "Monday",
            Weekday::Tuesday => "Tuesday",
            Weekday::Wednesday => "Wednesday",
            Weekday::Thursday => "Thursday",
            Weekday::Friday => "Friday",
            Weekday::Saturday => "Saturday",
        }
    }
}

impl FromStr for Weekday {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Sunday" => Ok(Weekday::Sunday),
            "Monday" => Ok(Weekday::Monday),
            "Tuesday" => Ok(Weekday::Tuesday),
            "Wednesday" => Ok(Weekday::Wednesday),
            "Thursday" => Ok(Weekday::Thursday),
            "Friday" => Ok(Weekday::Friday),
            "Saturday" => Ok(Weekday::Saturday),
            other => Err(anyhow::anyhow!("Dia da semana desconhecido: {}", other)),
        }
    }
}

// --- 2. Turnos ---
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TimeSlot {
    Morning,
    Afternoon,
}

impl TimeSlot {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeSlot::Morning => "Morning",
            TimeSlot::Afternoon => "Afternoon",
        }
    }
}

impl FromStr for TimeSlot {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Morning" => Ok(TimeSlot::Morning),
            "Afternoon" => Ok(TimeSlot::Afternoon),
            other => Err(anyhow::anyhow!("Turno desconhecido: {}", other)),
        }
    }
}

// Converte a coluna TEXT[] do Postgres para um conjunto tipado
pub fn parse_text_set<T>(values: &[String]) -> anyhow::Result<BTreeSet<T>>
where
    T: FromStr<Err = anyhow::Error> + Ord,
{
    values.iter().map(|v| v.parse::<T>()).collect()
}

// --- 3. Habilidades ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SkillTag {
    pub id: i64,
    pub name: String,
}

// A identidade de uma habilidade é o ID, não o nome
impl PartialEq for SkillTag {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for SkillTag {}

// --- 4. Perfil do Voluntário ---
// A lista de trabalhos em que ele está inscrito NÃO mora aqui:
// ela é derivada da tabela de inscrições (voluntary_work_members).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolunteerProfile {
    pub id: Uuid,
    pub available_location: String,
    pub available_days: BTreeSet<Weekday>,
    pub available_time: BTreeSet<TimeSlot>,
    pub skill_tags: Vec<SkillTag>,
}

// --- 5. Voluntário ---
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum VolunteerType {
    Volunteer,
    Premium,
}

impl VolunteerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VolunteerType::Volunteer => "volunteer",
            VolunteerType::Premium => "premium",
        }
    }
}

impl FromStr for VolunteerType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "volunteer" => Ok(VolunteerType::Volunteer),
            "premium" => Ok(VolunteerType::Premium),
            other => Err(anyhow::anyhow!("Tipo de voluntário desconhecido: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Volunteer {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub volunteer_type: VolunteerType,
    pub roles: Vec<Role>,
    pub profile: VolunteerProfile,
}

// Dados mínimos para avisar um inscrito (e-mail, certificado)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MemberContact {
    pub volunteer_id: Uuid,
    pub name: String,
    pub email: String,
}
