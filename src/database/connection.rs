//! Configuración de conexión a PostgreSQL
//!
//! Este módulo abre el pool y aplica el schema de abastecimentos.

use anyhow::{Context, Result};
use sqlx::{Executor, PgPool};
use tracing::info;

use crate::config::database::DatabaseConfig;

const SCHEMA_SQL: &str = include_str!("../../migrations/0001_create_abastecimentos.sql");

/// Crear un pool de conexiones a la base de datos
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool> {
    info!("🔗 Conectando a PostgreSQL: {}", mask_database_url(&config.url));

    let pool = config
        .create_pool()
        .await
        .with_context(|| format!("Error conectando a {}", mask_database_url(&config.url)))?;

    info!("✅ PostgreSQL conectado (max {} conexiones)", config.max_connections);
    Ok(pool)
}

/// Ejecutar el schema (idempotente)
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    pool.execute(SCHEMA_SQL).await?;
    info!("📐 Schema de abastecimentos aplicado");
    Ok(())
}

/// Función helper para enmascarar la URL de la base de datos en logs
pub fn mask_database_url(url: &str) -> String {
    let Some(scheme_end) = url.find("://") else {
        return url.to_string();
    };
    let Some(at_pos) = url.rfind('@') else {
        return url.to_string();
    };
    if at_pos < scheme_end {
        return url.to_string();
    }

    let protocol = &url[..scheme_end + 3];
    let host = &url[at_pos + 1..];
    format!("{}***:***@{}", protocol, host)
}
