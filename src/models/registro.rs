//! Modelo de Registro
//!
//! Un registro es una estadía de un auto: abierto mientras `hora_salida` es nulo.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::{present_or_null, Entidad};
use crate::utils::errors::{validation_error, AppResult};

/// Registro - mapea a la tabla registros
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Registro {
    #[serde(default)]
    pub id: i64,
    pub hora_llegada: DateTime<Utc>,
    #[serde(default)]
    pub hora_salida: Option<DateTime<Utc>>,
    pub auto_id: i64,
}

impl Registro {
    /// Abre una nueva estadía para el auto
    pub fn open(auto_id: i64, hora_llegada: DateTime<Utc>) -> Self {
        Self {
            id: 0,
            hora_llegada,
            hora_salida: None,
            auto_id,
        }
    }

    pub fn is_open(&self) -> bool {
        self.hora_salida.is_none()
    }

    /// La salida nunca puede ser anterior a la llegada
    pub fn check_times(&self) -> AppResult<()> {
        match self.hora_salida {
            Some(salida) if salida < self.hora_llegada => Err(validation_error(
                "hora_salida",
                "la hora de salida no puede ser anterior a la de llegada",
            )),
            _ => Ok(()),
        }
    }
}

impl Entidad for Registro {
    const RECURSO: &'static str = "Registro";

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }
}

/// Actualización parcial; `hora_salida: null` reabre el registro
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PatchRegistro {
    pub hora_llegada: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "present_or_null")]
    pub hora_salida: Option<Option<DateTime<Utc>>>,
    pub auto_id: Option<i64>,
}

impl PatchRegistro {
    pub fn apply_to(self, registro: &mut Registro) {
        if let Some(hora_llegada) = self.hora_llegada {
            registro.hora_llegada = hora_llegada;
        }
        if let Some(hora_salida) = self.hora_salida {
            registro.hora_salida = hora_salida;
        }
        if let Some(auto_id) = self.auto_id {
            registro.auto_id = auto_id;
        }
    }
}
