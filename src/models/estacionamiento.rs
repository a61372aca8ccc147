//! Modelo de Estacionamiento
//!
//! Un estacionamiento es un espacio físico dentro de una sucursal. Se mantiene
//! el invariante `ocupado == auto_id.is_some()` en toda escritura.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::{present_or_null, Entidad};
use crate::utils::errors::{validation_error, AppResult};

/// Estacionamiento - mapea a la tabla estacionamientos
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, Validate)]
pub struct Estacionamiento {
    #[serde(default)]
    pub id: i64,
    #[validate(range(min = 1))]
    pub numero: i32,
    #[serde(default)]
    pub ocupado: bool,
    #[serde(default)]
    pub auto_id: Option<i64>,
    pub sucursal_id: i64,
}

impl Estacionamiento {
    /// Verificar que la marca de ocupado coincide con el auto asignado
    pub fn check_occupancy(&self) -> AppResult<()> {
        if self.ocupado != self.auto_id.is_some() {
            return Err(validation_error(
                "ocupado",
                "un estacionamiento está ocupado si y solo si tiene un auto asignado",
            ));
        }
        Ok(())
    }

    pub fn occupy(&mut self, auto_id: i64) {
        self.ocupado = true;
        self.auto_id = Some(auto_id);
    }

    pub fn release(&mut self) {
        self.ocupado = false;
        self.auto_id = None;
    }
}

impl Entidad for Estacionamiento {
    const RECURSO: &'static str = "Estacionamiento";

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }
}

/// Actualización parcial; `auto_id: null` libera explícitamente el auto
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct PatchEstacionamiento {
    #[validate(range(min = 1))]
    pub numero: Option<i32>,
    pub ocupado: Option<bool>,
    #[serde(default, deserialize_with = "present_or_null")]
    pub auto_id: Option<Option<i64>>,
    pub sucursal_id: Option<i64>,
}

impl PatchEstacionamiento {
    pub fn apply_to(self, estacionamiento: &mut Estacionamiento) {
        if let Some(numero) = self.numero {
            estacionamiento.numero = numero;
        }
        if let Some(ocupado) = self.ocupado {
            estacionamiento.ocupado = ocupado;
        }
        if let Some(auto_id) = self.auto_id {
            estacionamiento.auto_id = auto_id;
        }
        if let Some(sucursal_id) = self.sucursal_id {
            estacionamiento.sucursal_id = sucursal_id;
        }
    }
}

/// Fila del reporte de estacionamientos ocupados con su auto y dueño
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
pub struct OcupacionDetalle {
    pub numero: i32,
    pub patente: String,
    pub nombre_completo: String,
}
