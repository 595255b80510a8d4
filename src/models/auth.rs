// src/models/auth.rs

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::actor::ActorKind;

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,        // Subject (ID do ator)
    pub kind: ActorKind,  // Admin de organização ou voluntário
    pub exp: usize,       // Expiration time (quando o token expira)
    pub iat: usize,       // Issued At (quando o token foi criado)
}

// Resposta da rota /me: quem sou eu e o que posso fazer
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub kind: ActorKind,
    pub permissions: Vec<String>,
}
