use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use dotenvy::dotenv;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use fuel_ingest::config::{DatabaseConfig, EnvironmentConfig};
use fuel_ingest::database::{create_pool, run_migrations};
use fuel_ingest::repositories::PgFuelingRepository;
use fuel_ingest::routes::create_app_router;
use fuel_ingest::services::StaticReferencePrices;
use fuel_ingest::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging (RUST_LOG o "info")
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("⛽ Fuel Ingest - API de abastecimentos");
    info!("======================================");

    let config = EnvironmentConfig::from_env()?;
    let db_config = DatabaseConfig::from_env()?;
    info!("⚙️ Entorno: {}", config.environment);

    // Inicializar base de datos
    let pool = match create_pool(&db_config).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {:#}", e);
            return Err(e);
        }
    };

    if db_config.run_migrations {
        run_migrations(&pool)
            .await
            .context("Error aplicando el schema de abastecimentos")?;
    }

    let store = Arc::new(PgFuelingRepository::new(pool));
    let prices = Arc::new(StaticReferencePrices::default());
    let app_state = AppState::new(config.clone(), store, prices);
    let app = create_app_router(app_state);

    let addr: SocketAddr = config
        .server_url()
        .parse()
        .with_context(|| format!("Dirección inválida: {}", config.server_url()))?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   POST /api/{}/abastecimentos - Registrar abastecimento", config.api_version);
    info!("   GET  /api/{}/abastecimentos - Listar abastecimentos", config.api_version);
    info!(
        "   GET  /api/{}/abastecimentos/motorista/:cpf - Historial del motorista",
        config.api_version
    );
    info!("   GET  /health - Health check");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("No se pudo abrir {}", addr))?;

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("❌ Error del servidor: {}", e);
        return Err(e.into());
    }

    info!("👋 Servidor terminado");
    Ok(())
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("❌ No se pudo instalar el handler de Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("❌ No se pudo instalar el handler de SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
