// src/services/auth.rs

use std::sync::Arc;

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use crate::{
    common::error::AppError,
    db::ActorStore,
    models::{
        actor::{Actor, ActorKind, ActorRef},
        auth::Claims,
    },
};

// Login e senha ficam fora daqui: o serviço só emite e valida tokens.
#[derive(Clone)]
pub struct AuthService {
    actors: Arc<dyn ActorStore>,
    jwt_secret: String,
}

impl AuthService {
    pub fn new(actors: Arc<dyn ActorStore>, jwt_secret: String) -> Self {
        Self { actors, jwt_secret }
    }

    // Resolve o token para o ator, já com cargos e permissões
    pub async fn validate_token(&self, token: &str) -> Result<Actor, AppError> {
        let validation = Validation::default();
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        )
        .map_err(|_| AppError::InvalidToken)?;

        let claims = token_data.claims;
        let actor = match claims.kind {
            ActorKind::OrganizationAdmin => self
                .actors
                .find_organization_admin(claims.sub)
                .await?
                .map(Actor::OrganizationAdmin),
            ActorKind::Volunteer => self
                .actors
                .find_volunteer(claims.sub)
                .await?
                .map(Actor::Volunteer),
        };

        // Token válido de um ator que não existe mais
        actor.ok_or(AppError::InvalidToken)
    }

    pub fn create_token(&self, actor: ActorRef) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::days(7);

        let claims = Claims {
            sub: actor.id,
            kind: actor.kind,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}
