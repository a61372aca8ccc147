//! Modelo de Pago

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::Entidad;
use crate::utils::validation::validate_not_empty;

/// Pago - a lo más uno por registro
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, Validate)]
pub struct Pago {
    #[serde(default)]
    pub id: i64,
    pub fecha_pago: DateTime<Utc>,
    pub monto: Decimal,
    #[validate(custom = "validate_not_empty", length(max = 30))]
    pub metodo: String,
    pub registro_id: i64,
}

impl Entidad for Pago {
    const RECURSO: &'static str = "Pago";

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct PatchPago {
    pub fecha_pago: Option<DateTime<Utc>>,
    pub monto: Option<Decimal>,
    #[validate(custom = "validate_not_empty", length(max = 30))]
    pub metodo: Option<String>,
    pub registro_id: Option<i64>,
}

impl PatchPago {
    pub fn apply_to(self, pago: &mut Pago) {
        if let Some(fecha_pago) = self.fecha_pago {
            pago.fecha_pago = fecha_pago;
        }
        if let Some(monto) = self.monto {
            pago.monto = monto;
        }
        if let Some(metodo) = self.metodo {
            pago.metodo = metodo;
        }
        if let Some(registro_id) = self.registro_id {
            pago.registro_id = registro_id;
        }
    }
}

/// Pago junto a la estadía que lo originó
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct PagoDetalle {
    pub pago_id: i64,
    pub fecha_pago: DateTime<Utc>,
    pub monto: Decimal,
    pub metodo: String,
    pub hora_llegada: DateTime<Utc>,
    pub hora_salida: Option<DateTime<Utc>>,
    pub patente: String,
}
