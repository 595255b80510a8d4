// src/models/voluntary_work.rs

use std::collections::BTreeSet;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::models::{
    actor::ActorRef,
    volunteer::{SkillTag, TimeSlot, Weekday},
};

// --- 1. Status do trabalho voluntário ---
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum WorkStatus {
    Pending,
    #[serde(rename = "In Progress")]
    InProgress,
    Finished,
    Canceled,
}

impl WorkStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkStatus::Pending => "Pending",
            WorkStatus::InProgress => "In Progress",
            WorkStatus::Finished => "Finished",
            WorkStatus::Canceled => "Canceled",
        }
    }
}

impl FromStr for WorkStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(WorkStatus::Pending),
            "In Progress" => Ok(WorkStatus::InProgress),
            "Finished" => Ok(WorkStatus::Finished),
            "Canceled" => Ok(WorkStatus::Canceled),
            other => Err(anyhow::anyhow!("Status desconhecido: {}", other)),
        }
    }
}

// --- 2. Avaliações e Feedback (guardados como JSONB) ---
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RatingEntry {
    pub volunteer_name: String,
    pub rating: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackEntry {
    pub volunteer_name: String,
    pub feedback: String,
}

// Média aritmética das notas; sem nenhuma nota, 0.0
pub fn average_rating(ratings: &[RatingEntry]) -> f64 {
    if ratings.is_empty() {
        return 0.0;
    }
    let sum: f64 = ratings.iter().map(|r| r.rating).sum();
    sum / ratings.len() as f64
}

// --- 3. Trabalho Voluntário ---
// `volunteer_profiles` é uma visão da tabela de inscrições: os IDs dos perfis inscritos.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoluntaryWork {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub location: String,
    pub days: BTreeSet<Weekday>,
    pub time: BTreeSet<TimeSlot>,
    pub skill_tags: Vec<SkillTag>,
    pub capacity: i32,
    pub volunteer_profiles: Vec<Uuid>,
    pub rating: Vec<RatingEntry>,
    pub avg_rating: f64,
    pub feedback: Vec<FeedbackEntry>,
    pub status: WorkStatus,
    pub creator: ActorRef,
    pub organization_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl VoluntaryWork {
    pub fn member_count(&self) -> usize {
        self.volunteer_profiles.len()
    }

    pub fn has_member(&self, profile_id: Uuid) -> bool {
        self.volunteer_profiles.contains(&profile_id)
    }

    // Capacidade negativa ou zero nunca aceita ninguém
    pub fn is_full(&self) -> bool {
        self.member_count() as i64 >= i64::from(self.capacity)
    }
}

// ---
// Payloads
// ---

// Voluntário se inscrevendo manda `{}`; admin precisa informar o `volunteerId`.
#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPayload {
    #[serde(default)]
    pub volunteer_id: Option<Uuid>,
}

#[derive(Debug, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DeregisterPayload {
    #[serde(default)]
    pub volunteer_id: Option<Uuid>,
}

// Admin agindo em nome de um voluntário precisa dizer qual
pub fn require_volunteer_id(volunteer_id: Option<Uuid>) -> Result<Uuid, ValidationErrors> {
    volunteer_id.ok_or_else(|| {
        let mut err = ValidationError::new("required");
        err.message = Some("O campo 'volunteerId' é obrigatório.".into());
        let mut errors = ValidationErrors::new();
        errors.add("volunteerId", err);
        errors
    })
}

// Sem limite de faixa: qualquer número entra na média
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RatingPayload {
    pub rating: f64,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackPayload {
    #[validate(length(min = 1, message = "O feedback não pode ser vazio."))]
    pub feedback: String,
}

fn validate_iso_date(value: &str) -> Result<(), ValidationError> {
    if NaiveDate::parse_from_str(value, "%Y-%m-%d").is_err() {
        let mut err = ValidationError::new("date");
        err.message = Some("A data deve estar no formato AAAA-MM-DD.".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CertificatePayload {
    #[validate(length(min = 1, message = "O nome da organização é obrigatório."))]
    pub organization_name: String,

    // Sem data, vale o dia da emissão
    #[validate(custom(function = "validate_iso_date"))]
    #[serde(default)]
    pub date: Option<String>,
}

// ---
// Respostas
// ---

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingResponse {
    pub message: String,
    pub avg_rating: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchResponse {
    pub message: String,
    pub recipients: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoluntaryWorkResponse {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub location: String,
    pub days: BTreeSet<Weekday>,
    pub time: BTreeSet<TimeSlot>,
    pub status: WorkStatus,
    pub capacity: i32,
    pub skill_tags: Vec<String>,
    pub rating: Vec<RatingEntry>,
    pub avg_rating: f64,
    pub feedback: Vec<FeedbackEntry>,
    pub volunteer_numbers: usize,
    pub creator: ActorRef,
    pub created_at: DateTime<Utc>,
}

impl From<VoluntaryWork> for VoluntaryWorkResponse {
    fn from(work: VoluntaryWork) -> Self {
        let volunteer_numbers = work.member_count();
        Self {
            id: work.id,
            name: work.name,
            description: work.description,
            location: work.location,
            days: work.days,
            time: work.time,
            status: work.status,
            capacity: work.capacity,
            skill_tags: work.skill_tags.into_iter().map(|t| t.name).collect(),
            rating: work.rating,
            avg_rating: work.avg_rating,
            feedback: work.feedback,
            volunteer_numbers,
            creator: work.creator,
            created_at: work.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_uses_the_spaced_label() {
        let json = serde_json::to_string(&WorkStatus::InProgress).unwrap();
        assert_eq!(json, "\"In Progress\"");
        assert_eq!("In Progress".parse::<WorkStatus>().unwrap(), WorkStatus::InProgress);
    }

    #[test]
    fn missing_volunteer_id_is_a_field_error() {
        let errors = require_volunteer_id(None).unwrap_err();
        assert!(errors.field_errors().contains_key("volunteerId"));

        let id = Uuid::new_v4();
        assert_eq!(require_volunteer_id(Some(id)).unwrap(), id);
    }

    #[test]
    fn average_of_no_ratings_is_zero() {
        assert_eq!(average_rating(&[]), 0.0);

        let ratings: Vec<RatingEntry> = [4.0, 5.0, 3.0]
            .into_iter()
            .map(|rating| RatingEntry { volunteer_name: "v".into(), rating })
            .collect();
        assert_eq!(average_rating(&ratings), 4.0);
    }

    #[test]
    fn certificate_date_must_be_a_calendar_date() {
        let ok = CertificatePayload { organization_name: "Org".into(), date: Some("2024-02-29".into()) };
        assert!(ok.validate().is_ok());

        let bad = CertificatePayload { organization_name: "Org".into(), date: Some("2023-02-30".into()) };
        let errors = bad.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("date"));

        let today = CertificatePayload { organization_name: "Org".into(), date: None };
        assert!(today.validate().is_ok());
    }
}
