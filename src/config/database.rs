//! Configuración de base de datos
//!
//! Este módulo maneja la configuración del pool PostgreSQL con SQLx.

use std::env;
use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::postgres::{PgPool, PgPoolOptions};

/// Configuración de la base de datos
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
    pub run_migrations: bool,
}

impl DatabaseConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            max_connections: 20,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
            idle_timeout: Duration::from_secs(300),
            max_lifetime: Duration::from_secs(3600),
            run_migrations: true,
        }
    }

    /// `DATABASE_URL` es obligatoria; el resto tiene valores por defecto
    pub fn from_env() -> Result<Self> {
        let url = env::var("DATABASE_URL")
            .context("DATABASE_URL must be set in environment variables")?;
        let mut config = Self::new(url);

        if let Ok(max) = env::var("DATABASE_MAX_CONNECTIONS") {
            config.max_connections = max
                .parse()
                .context("DATABASE_MAX_CONNECTIONS must be a valid number")?;
        }
        if let Ok(min) = env::var("DATABASE_MIN_CONNECTIONS") {
            config.min_connections = min
                .parse()
                .context("DATABASE_MIN_CONNECTIONS must be a valid number")?;
        }
        if let Ok(flag) = env::var("RUN_MIGRATIONS") {
            config.run_migrations = parse_flag(&flag);
        }

        Ok(config)
    }

    /// Crear un nuevo pool de conexiones
    pub async fn create_pool(&self) -> Result<PgPool, sqlx::Error> {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .min_connections(self.min_connections.min(self.max_connections))
            .acquire_timeout(self.connect_timeout)
            .idle_timeout(self.idle_timeout)
            .max_lifetime(self.max_lifetime)
            .connect(&self.url)
            .await
    }
}

fn parse_flag(value: &str) -> bool {
    !matches!(value.trim().to_ascii_lowercase().as_str(), "0" | "false" | "no" | "off")
}
