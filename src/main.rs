//src/main.rs

use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use volunteer_backend::{
    config::{self, AppState, Settings},
    routes::app_router,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // RUST_LOG controla o nível; padrão "info"
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    // Se a configuração falhar, a aplicação não deve iniciar.
    let settings = Settings::from_env()?;
    let db_pool = config::connect(&settings).await?;

    // Faz o app rodar as migrações do SQLx na inicialização
    sqlx::migrate!().run(&db_pool).await?;
    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    if !settings.admin_registration_respects_capacity {
        tracing::info!("Inscrições feitas por admin ignoram a capacidade dos trabalhos.");
    }

    let bind_addr = settings.bind_addr.clone();
    let app = app_router(AppState::new(settings, db_pool));

    // Inicia o servidor
    let listener = TcpListener::bind(&bind_addr).await?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
