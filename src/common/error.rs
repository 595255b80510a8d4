use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::common::i18n::{I18nStore, DEFAULT_LANG};
use crate::middleware::i18n::Locale;
use crate::services::eligibility::EligibilityMismatch;

// Qual entidade não foi encontrada
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    VoluntaryWork,
    Volunteer,
    OrganizationProfile,
}

impl Resource {
    pub fn key(&self) -> &'static str {
        match self {
            Resource::VoluntaryWork => "voluntary_work",
            Resource::Volunteer => "volunteer",
            Resource::OrganizationProfile => "organization_profile",
        }
    }
}

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // Corpo ausente, sem Content-Type JSON ou mal formado
    #[error("Corpo da requisição inválido: {0}")]
    InvalidBody(#[from] JsonRejection),

    #[error("Recurso não encontrado: {0:?}")]
    NotFound(Resource),

    #[error("Permissão '{0}' ausente")]
    Forbidden(String),

    #[error("Acesso negado ao recurso")]
    Unauthorized,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Perfil incompatível com o trabalho voluntário: {0:?}")]
    EligibilityMismatch(Vec<EligibilityMismatch>),

    #[error("Capacidade esgotada ({capacity})")]
    CapacityExceeded { capacity: i32 },

    #[error("Voluntário não inscrito")]
    NotRegistered,

    #[error("Voluntário já inscrito")]
    AlreadyRegistered,

    // Variante para erros de banco de dados
    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    // `anyhow::Error` é ótimo para capturar o contexto do erro.
    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

// O corpo de erro que sai pela API
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.error, "details": details }),
            None => json!({ "error": self.error }),
        };
        (self.status, Json(body)).into_response()
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Unauthorized | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::EligibilityMismatch(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::CapacityExceeded { .. }
            | AppError::NotRegistered
            | AppError::AlreadyRegistered => StatusCode::CONFLICT,
            AppError::DatabaseError(_)
            | AppError::InternalServerError(_)
            | AppError::JwtError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    // Traduz o erro para o idioma do cliente
    pub fn to_api_error(&self, locale: &Locale, store: &I18nStore) -> ApiError {
        let lang = locale.0.as_str();
        let status = self.status();

        let (error, details) = match self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| match &e.message {
                            Some(m) => m.to_string(),
                            None => e.code.to_string(),
                        })
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                (store.translate(lang, "validation"), Some(json!(details)))
            }
            AppError::InvalidBody(rejection) => {
                (store.translate(lang, "invalid_body"), Some(json!({ "body": rejection.body_text() })))
            }
            AppError::NotFound(resource) => {
                let resource_name = store.translate(lang, resource.key());
                (store.translate_with(lang, "not_found", &[("resource", resource_name.as_str())]), None)
            }
            AppError::Forbidden(operation) => {
                (store.translate_with(lang, "forbidden", &[("operation", operation.as_str())]), None)
            }
            AppError::Unauthorized => (store.translate(lang, "unauthorized"), None),
            AppError::InvalidToken => (store.translate(lang, "invalid_token"), None),
            AppError::EligibilityMismatch(rules) => {
                let failed: Vec<&str> = rules.iter().map(|r| r.as_str()).collect();
                (store.translate(lang, "eligibility"), Some(json!({ "failedRules": failed })))
            }
            AppError::CapacityExceeded { capacity } => {
                let capacity = capacity.to_string();
                (store.translate_with(lang, "capacity", &[("capacity", capacity.as_str())]), None)
            }
            AppError::NotRegistered => (store.translate(lang, "not_registered"), None),
            AppError::AlreadyRegistered => (store.translate(lang, "already_registered"), None),

            // Todos os outros erros (DatabaseError, InternalServerError, JwtError) viram 500.
            // O `tracing` loga a mensagem detalhada; o cliente recebe só a genérica.
            e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (store.translate(lang, "internal"), None)
            }
        };

        ApiError { status, error, details }
    }
}

// Usado onde não há Locale à mão (ex: middlewares): responde em inglês.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let locale = Locale(DEFAULT_LANG.to_string());
        self.to_api_error(&locale, &I18nStore::new()).into_response()
    }
}
