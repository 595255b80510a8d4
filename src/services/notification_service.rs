// src/services/notification_service.rs
//
// E-mails e certificados enviados aos inscritos.
// Tudo é disparado em tasks separadas: falha no envio só vira log.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;

use crate::{
    common::error::AppError,
    db::VoluntaryWorkStore,
    models::{voluntary_work::VoluntaryWork, volunteer::MemberContact},
};

pub const REGISTRATION_SUBJECT: &str = "Registration in Voluntary Work!";
pub const DEREGISTRATION_SUBJECT: &str = "Deregistration from Voluntary Work!";
pub const REMINDER_SUBJECT: &str = "Reminder to rate and feedback Voluntary Work!";

// Dados que vão para o gerador de certificado de cada inscrito
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CertificateRequest {
    pub volunteer_name: String,
    pub volunteer_email: String,
    pub voluntary_work_name: String,
    pub organization_name: String,
    pub date: String,
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_email(
        &self,
        to_address: &str,
        to_name: &str,
        subject: &str,
        body: &str,
    ) -> anyhow::Result<()>;

    async fn send_certificate(&self, request: &CertificateRequest) -> anyhow::Result<()>;
}

// Não entrega nada: só registra no log o que seria enviado
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send_email(
        &self,
        to_address: &str,
        to_name: &str,
        subject: &str,
        body: &str,
    ) -> anyhow::Result<()> {
        tracing::info!("📧 E-mail para {} <{}>: {} | {}", to_name, to_address, subject, body);
        Ok(())
    }

    async fn send_certificate(&self, request: &CertificateRequest) -> anyhow::Result<()> {
        tracing::info!(
            "📜 Certificado de '{}' para {} <{}> ({}, {})",
            request.voluntary_work_name,
            request.volunteer_name,
            request.volunteer_email,
            request.organization_name,
            request.date
        );
        Ok(())
    }
}

#[derive(Clone)]
pub struct NotificationService {
    notifier: Arc<dyn Notifier>,
    works: Arc<dyn VoluntaryWorkStore>,
}

impl NotificationService {
    pub fn new(notifier: Arc<dyn Notifier>, works: Arc<dyn VoluntaryWorkStore>) -> Self {
        Self { notifier, works }
    }

    fn dispatch_email(&self, to: &MemberContact, subject: &'static str, body: String) {
        let notifier = self.notifier.clone();
        let address = to.email.clone();
        let name = to.name.clone();

        tokio::spawn(async move {
            if let Err(e) = notifier.send_email(&address, &name, subject, &body).await {
                tracing::warn!("⚠️ Falha ao enviar '{}' para {}: {:?}", subject, address, e);
            }
        });
    }

    pub fn registration_confirmed(&self, work_name: &str, volunteer: &MemberContact) {
        self.dispatch_email(
            volunteer,
            REGISTRATION_SUBJECT,
            format!("You have successfully registered in {}!", work_name),
        );
    }

    pub fn deregistration_confirmed(&self, work_name: &str, volunteer: &MemberContact) {
        self.dispatch_email(
            volunteer,
            DEREGISTRATION_SUBJECT,
            format!(
                "You have unfortunately deregistered from {}. We hope to see you in other voluntary works!",
                work_name
            ),
        );
    }

    /// Pede avaliação e feedback a cada inscrito atual. Retorna quantos avisos saíram.
    pub async fn remind_members(&self, work: &VoluntaryWork) -> Result<usize, AppError> {
        let members = self.works.member_contacts(work.id).await?;

        for member in &members {
            self.dispatch_email(
                member,
                REMINDER_SUBJECT,
                format!(
                    "You have successfully finished {}!\nWe encourage you to tell us your opinion and thoughts about our voluntary work, you can rate and create feedback for it!",
                    work.name
                ),
            );
        }

        tracing::info!("🔔 Lembrete do trabalho {} enviado a {} inscritos.", work.id, members.len());
        Ok(members.len())
    }

    /// Um certificado por inscrito atual. Sem data, usa a de hoje (AAAA-MM-DD).
    pub async fn issue_certificates(
        &self,
        work: &VoluntaryWork,
        organization_name: &str,
        date: Option<&str>,
    ) -> Result<usize, AppError> {
        let date = match date {
            Some(d) => d.to_string(),
            None => Utc::now().format("%Y-%m-%d").to_string(),
        };

        let members = self.works.member_contacts(work.id).await?;

        for member in &members {
            let request = CertificateRequest {
                volunteer_name: member.name.clone(),
                volunteer_email: member.email.clone(),
                voluntary_work_name: work.name.clone(),
                organization_name: organization_name.to_string(),
                date: date.clone(),
            };

            let notifier = self.notifier.clone();
            tokio::spawn(async move {
                if let Err(e) = notifier.send_certificate(&request).await {
                    tracing::warn!("⚠️ Falha ao gerar certificado para {}: {:?}", request.volunteer_email, e);
                }
            });
        }

        tracing::info!("📜 {} certificados solicitados para o trabalho {}.", members.len(), work.id);
        Ok(members.len())
    }
}
