// src/config.rs

use std::{env, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    common::i18n::I18nStore,
    db::{
        ActorRepository, ActorStore, AuditRepository, AuditStore, RbacRepository,
        VoluntaryWorkRepository, VoluntaryWorkStore,
    },
    services::{
        audit_service::AuditService,
        auth::AuthService,
        notification_service::{LogNotifier, NotificationService, Notifier},
        ownership::OwnershipService,
        rating_service::RatingService,
        rbac_service::RbacService,
        registration_service::RegistrationService,
        work_locks::WorkLocks,
    },
};

// Configuração lida das variáveis de ambiente (.env aceito)
#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_addr: String,
    pub db_max_connections: u32,
    // Desligado: admin inscreve mesmo com o trabalho lotado
    pub admin_registration_respects_capacity: bool,
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?;
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        let db_max_connections = match env::var("DB_MAX_CONNECTIONS") {
            Ok(value) => value
                .parse()
                .with_context(|| format!("DB_MAX_CONNECTIONS inválido: {}", value))?,
            Err(_) => 5,
        };

        let admin_registration_respects_capacity = env::var("ADMIN_REGISTRATION_RESPECTS_CAPACITY")
            .map(|value| parse_flag(&value))
            .unwrap_or(false);

        Ok(Self {
            database_url,
            jwt_secret,
            bind_addr,
            db_max_connections,
            admin_registration_respects_capacity,
        })
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

pub async fn connect(settings: &Settings) -> anyhow::Result<PgPool> {
    let db_pool = PgPoolOptions::new()
        .max_connections(settings.db_max_connections)
        .acquire_timeout(Duration::from_secs(3))
        .connect(&settings.database_url)
        .await?;

    tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");
    Ok(db_pool)
}

#[derive(Clone)]
pub struct AppState {
    pub settings: Settings,
    pub i18n_store: I18nStore,
    pub rbac_service: RbacService,
    pub auth_service: AuthService,
    pub registration_service: RegistrationService,
    pub rating_service: RatingService,
    pub notification_service: NotificationService,
    pub audit_service: AuditService,
    pub ownership_service: OwnershipService,
}

impl AppState {
    // Postgres como armazenamento; e-mails só no log
    pub fn new(settings: Settings, db_pool: PgPool) -> Self {
        let rbac_repo = RbacRepository::new(db_pool.clone());
        let actors = Arc::new(ActorRepository::new(db_pool.clone(), rbac_repo));
        let works = Arc::new(VoluntaryWorkRepository::new(db_pool.clone()));
        let audit = Arc::new(AuditRepository::new(db_pool));

        Self::from_stores(settings, actors, works, audit, Arc::new(LogNotifier))
    }

    // --- Monta o gráfico de dependências ---
    pub fn from_stores(
        settings: Settings,
        actors: Arc<dyn ActorStore>,
        works: Arc<dyn VoluntaryWorkStore>,
        audit: Arc<dyn AuditStore>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        // Mesmo conjunto de locks para inscrição e avaliação
        let locks = WorkLocks::new();

        let registration_service = RegistrationService::new(
            actors.clone(),
            works.clone(),
            locks.clone(),
            settings.admin_registration_respects_capacity,
        );

        Self {
            auth_service: AuthService::new(actors.clone(), settings.jwt_secret.clone()),
            registration_service,
            rating_service: RatingService::new(works.clone(), locks),
            notification_service: NotificationService::new(notifier, works),
            audit_service: AuditService::new(audit),
            ownership_service: OwnershipService::new(actors),
            rbac_service: RbacService::new(),
            i18n_store: I18nStore::new(),
            settings,
        }
    }
}
