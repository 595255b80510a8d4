// src/common/i18n.rs

use std::{collections::HashMap, sync::Arc};

pub const DEFAULT_LANG: &str = "en";

// (idioma, chave) -> modelo da mensagem. Parâmetros no formato {nome}.
const MESSAGES: &[(&str, &str, &str)] = &[
    ("en", "validation", "One or more fields are invalid."),
    ("pt", "validation", "Um ou mais campos são inválidos."),
    ("en", "invalid_body", "The request body is not valid JSON."),
    ("pt", "invalid_body", "O corpo da requisição não é um JSON válido."),
    ("en", "not_found", "{resource} not found."),
    ("pt", "not_found", "{resource} não encontrado."),
    ("en", "forbidden", "You don't have the permission '{operation}' to access this resource!"),
    ("pt", "forbidden", "Você precisa da permissão '{operation}' para realizar esta ação."),
    ("en", "unauthorized", "You are not allowed to act on this resource."),
    ("pt", "unauthorized", "Você não tem acesso a este recurso."),
    ("en", "invalid_token", "Invalid or missing authentication token."),
    ("pt", "invalid_token", "Token de autenticação inválido ou ausente."),
    ("en", "eligibility", "Volunteer's profile information does not align with the voluntary work requirements."),
    ("pt", "eligibility", "O perfil do voluntário não atende aos requisitos do trabalho voluntário."),
    ("en", "capacity", "Voluntary work is already at full capacity ({capacity})."),
    ("pt", "capacity", "O trabalho voluntário já está com a capacidade máxima ({capacity})."),
    ("en", "not_registered", "Volunteer is not registered for this voluntary work."),
    ("pt", "not_registered", "O voluntário não está inscrito neste trabalho voluntário."),
    ("en", "already_registered", "Volunteer is already registered for this voluntary work."),
    ("pt", "already_registered", "O voluntário já está inscrito neste trabalho voluntário."),
    ("en", "internal", "An unexpected error occurred."),
    ("pt", "internal", "Ocorreu um erro inesperado."),
];

const RESOURCES: &[(&str, &str, &str)] = &[
    ("en", "voluntary_work", "Voluntary work"),
    ("pt", "voluntary_work", "Trabalho voluntário"),
    ("en", "volunteer", "Volunteer"),
    ("pt", "volunteer", "Voluntário"),
    ("en", "organization_profile", "Organization profile"),
    ("pt", "organization_profile", "Perfil de organização"),
];

// Armazém de traduções compartilhado pelo AppState
#[derive(Clone)]
pub struct I18nStore {
    messages: Arc<HashMap<String, &'static str>>,
}

impl Default for I18nStore {
    fn default() -> Self {
        Self::new()
    }
}

impl I18nStore {
    pub fn new() -> Self {
        let messages = MESSAGES
            .iter()
            .chain(RESOURCES.iter())
            .map(|(lang, key, text)| (format!("{}.{}", lang, key), *text))
            .collect();

        Self { messages: Arc::new(messages) }
    }

    // Busca a mensagem no idioma pedido; cai para o inglês e, por fim, para a própria chave
    pub fn translate(&self, lang: &str, key: &str) -> String {
        self.lookup(lang, key)
            .or_else(|| self.lookup(DEFAULT_LANG, key))
            .unwrap_or(key)
            .to_string()
    }

    pub fn translate_with(&self, lang: &str, key: &str, params: &[(&str, &str)]) -> String {
        params.iter().fold(self.translate(lang, key), |text, (name, value)| {
            text.replace(&format!("{{{}}}", name), value)
        })
    }

    fn lookup(&self, lang: &str, key: &str) -> Option<&'static str> {
        self.messages.get(&format!("{}.{}", lang, key)).copied()
    }
}
