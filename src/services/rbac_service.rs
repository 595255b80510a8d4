// src/services/rbac_service.rs

use std::collections::BTreeSet;

use crate::common::error::AppError;
use crate::models::actor::Actor;

// ---
// Classes de operação
// ---
// O identificador de operação segue a convenção "<VERBO>_<recurso>",
// ex: "POST_voluntaryWork", "REGISTER_voluntaryWork".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationClass {
    Create,
    Read,
    Update,
    Delete,
    Register,
    Deregister,
    Custom,
}

impl OperationClass {
    pub fn of(operation_id: &str) -> Self {
        // Prefixo sem nada depois do "_" (ex: "PUT_") não conta como classe conhecida
        let Some((verb, resource)) = operation_id.split_once('_') else {
            return OperationClass::Custom;
        };
        if resource.is_empty() {
            return OperationClass::Custom;
        }

        match verb {
            "POST" => OperationClass::Create,
            "GET" => OperationClass::Read,
            "PUT" => OperationClass::Update,
            "DELETE" => OperationClass::Delete,
            "REGISTER" => OperationClass::Register,
            "DEREGISTER" => OperationClass::Deregister,
            _ => OperationClass::Custom,
        }
    }

    /// Escrita aberta: PUT_* e DELETE_* passam pelo gate mesmo sem permissão explícita.
    /// As rotas que dependem disso exigem também um predicado de posse.
    pub fn is_open_write(&self) -> bool {
        matches!(self, OperationClass::Update | OperationClass::Delete)
    }
}

// ---
// Conjunto de permissões resolvido
// ---
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionSet(BTreeSet<String>);

impl PermissionSet {
    pub fn contains(&self, operation_id: &str) -> bool {
        self.0.contains(operation_id)
    }

    pub fn names(&self) -> Vec<String> {
        self.0.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for PermissionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// União (sem repetição) das permissões de todos os cargos do ator.
/// Sem herança nem curingas: só os nomes gravados.
pub fn resolve_permissions(actor: &Actor) -> PermissionSet {
    actor
        .roles()
        .iter()
        .flat_map(|role| role.permissions.iter())
        .map(|permission| permission.name.clone())
        .collect()
}

// Por que a operação foi liberada
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Grant {
    Explicit,
    OpenWrite,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow(Grant),
    Deny,
}

impl Decision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allow(_))
    }
}

pub fn authorize(operation_id: &str, permissions: &PermissionSet) -> Decision {
    if permissions.contains(operation_id) {
        return Decision::Allow(Grant::Explicit);
    }
    if OperationClass::of(operation_id).is_open_write() {
        return Decision::Allow(Grant::OpenWrite);
    }
    Decision::Deny
}

#[derive(Clone, Default)]
pub struct RbacService;

impl RbacService {
    pub fn new() -> Self {
        Self
    }

    pub fn permissions_for(&self, actor: &Actor) -> PermissionSet {
        resolve_permissions(actor)
    }

    // Gate principal: negação é definitiva (Forbidden), sem nova tentativa
    pub fn check(&self, actor: &Actor, operation_id: &str) -> Result<Grant, AppError> {
        let permissions = resolve_permissions(actor);

        match authorize(operation_id, &permissions) {
            Decision::Allow(Grant::OpenWrite) => {
                tracing::debug!(
                    actor_id = %actor.id(),
                    operation = operation_id,
                    "Operação liberada pela política de escrita aberta"
                );
                Ok(Grant::OpenWrite)
            }
            Decision::Allow(grant) => Ok(grant),
            Decision::Deny => {
                tracing::info!(actor_id = %actor.id(), operation = operation_id, "⛔ Acesso negado");
                Err(AppError::Forbidden(operation_id.to_string()))
            }
        }
    }
}
