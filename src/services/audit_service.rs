// src/services/audit_service.rs

use std::sync::Arc;

use crate::{
    db::AuditStore,
    models::{
        actor::Actor,
        audit::{AuditEvent, AuditOutcome},
    },
};

#[derive(Clone)]
pub struct AuditService {
    store: Arc<dyn AuditStore>,
}

impl AuditService {
    pub fn new(store: Arc<dyn AuditStore>) -> Self {
        Self { store }
    }

    // Grava em segundo plano; erro de gravação não chega ao cliente
    pub fn record(&self, actor: &Actor, outcome: AuditOutcome, request: impl Into<String>) {
        let event = AuditEvent::for_actor(actor, outcome, request);
        let store = self.store.clone();

        tokio::spawn(async move {
            if let Err(e) = store.record(&event).await {
                tracing::error!("🔥 Falha ao gravar log de auditoria ({}): {}", event.request, e);
            }
        });
    }

    pub fn success(&self, actor: &Actor, request: impl Into<String>) {
        self.record(actor, AuditOutcome::Success, request);
    }

    pub fn failure(&self, actor: &Actor, request: impl Into<String>) {
        self.record(actor, AuditOutcome::Failed, request);
    }
}
