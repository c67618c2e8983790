//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno. Se construye una vez al
//! arrancar y se pasa por `AppState`; no hay configuración global mutable.

use std::env;

use anyhow::{Context, Result};
use rust_decimal::Decimal;

/// Umbral de anomalía: +25% sobre el precio de referencia
pub const DEFAULT_ANOMALY_THRESHOLD: Decimal = Decimal::from_parts(125, 0, 0, false, 2);

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub host: String,
    pub port: u16,
    pub api_version: String,
    pub cors_origins: Vec<String>,
    /// No se lee del entorno; ver DESIGN.md
    pub anomaly_threshold: Decimal,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            host: "0.0.0.0".to_string(),
            port: 8000,
            api_version: "v1".to_string(),
            cors_origins: Vec::new(),
            anomaly_threshold: DEFAULT_ANOMALY_THRESHOLD,
        }
    }
}

impl EnvironmentConfig {
    /// Cargar configuración desde variables de entorno, con valores por defecto
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let port = match env::var("PORT") {
            Ok(port) => port
                .parse()
                .with_context(|| format!("PORT must be a valid number, got '{}'", port))?,
            Err(_) => defaults.port,
        };

        Ok(Self {
            environment: env::var("ENVIRONMENT").unwrap_or(defaults.environment),
            host: env::var("HOST").unwrap_or(defaults.host),
            port,
            api_version: env::var("API_VERSION").unwrap_or(defaults.api_version),
            cors_origins: env::var("CORS_ORIGINS")
                .map(|origins| parse_origins(&origins))
                .unwrap_or_default(),
            anomaly_threshold: defaults.anomaly_threshold,
        })
    }

    /// Obtener la dirección del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EnvironmentConfig::default();
        assert_eq!(config.environment, "development");
        assert_eq!(config.server_url(), "0.0.0.0:8000");
        assert_eq!(config.anomaly_threshold.to_string(), "1.25");
    }

    #[test]
    fn test_parse_origins() {
        assert_eq!(
            parse_origins("http://a.com, http://b.com,,"),
            vec!["http://a.com".to_string(), "http://b.com".to_string()]
        );
        assert!(parse_origins("").is_empty());
    }
}
