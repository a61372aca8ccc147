//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y variables de configuración.

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use std::env;
use std::str::FromStr;

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub cors_origins: Vec<String>,
    /// Monto fijo cobrado por cada estadía
    pub tarifa_base: Decimal,
    /// Monto adicional por cada hora iniciada de estadía
    pub tarifa_valor_hora: Decimal,
    pub bcrypt_cost: u32,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            port: 8080,
            host: "0.0.0.0".to_string(),
            cors_origins: Vec::new(),
            tarifa_base: Decimal::new(2000, 0),
            tarifa_valor_hora: Decimal::ZERO,
            bcrypt_cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl EnvironmentConfig {
    /// Leer la configuración desde las variables de entorno, usando los
    /// valores por defecto para las variables ausentes
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        Ok(Self {
            environment: env::var("ENVIRONMENT").unwrap_or(defaults.environment),
            port: parse_var("PORT")?.unwrap_or(defaults.port),
            host: env::var("HOST").unwrap_or(defaults.host),
            cors_origins: env::var("CORS_ORIGINS")
                .map(|origins| parse_origins(&origins))
                .unwrap_or(defaults.cors_origins),
            tarifa_base: parse_var("TARIFA_BASE")?.unwrap_or(defaults.tarifa_base),
            tarifa_valor_hora: parse_var("TARIFA_VALOR_HORA")?
                .unwrap_or(defaults.tarifa_valor_hora),
            bcrypt_cost: parse_var("BCRYPT_COST")?.unwrap_or(defaults.bcrypt_cost),
        })
    }

    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Obtener la dirección del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<T>(name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("{} must be a valid value, got '{}'", name, raw)),
        Err(_) => Ok(None),
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
