//! Cálculo del monto a cobrar por una estadía

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::config::EnvironmentConfig;

const SEGUNDOS_POR_HORA: i64 = 3600;

/// Tarifa: monto base más un valor por cada hora iniciada
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tarifa {
    pub monto_base: Decimal,
    pub valor_hora: Decimal,
}

impl Default for Tarifa {
    fn default() -> Self {
        Self {
            monto_base: Decimal::new(2000, 0),
            valor_hora: Decimal::ZERO,
        }
    }
}

impl From<&EnvironmentConfig> for Tarifa {
    fn from(config: &EnvironmentConfig) -> Self {
        Self {
            monto_base: config.tarifa_base,
            valor_hora: config.tarifa_valor_hora,
        }
    }
}

impl Tarifa {
    pub fn new(monto_base: Decimal, valor_hora: Decimal) -> Self {
        Self {
            monto_base,
            valor_hora,
        }
    }

    /// Monto de una estadía entre `llegada` y `salida`
    pub fn calcular(&self, llegada: DateTime<Utc>, salida: DateTime<Utc>) -> Decimal {
        self.monto_base + self.valor_hora * Decimal::from(horas_iniciadas(llegada, salida))
    }
}

fn horas_iniciadas(llegada: DateTime<Utc>, salida: DateTime<Utc>) -> i64 {
    let segundos = (salida - llegada).num_seconds().max(0);
    (segundos + SEGUNDOS_POR_HORA - 1) / SEGUNDOS_POR_HORA
}
