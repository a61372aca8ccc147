//! Modelo de Sucursal

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::Entidad;

/// Sucursal - pertenece a una comuna y agrupa estacionamientos
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, Validate)]
pub struct Sucursal {
    #[serde(default)]
    pub id: i64,
    #[validate(length(min = 1, max = 100))]
    pub nombre: String,
    #[validate(length(min = 1, max = 200))]
    pub direccion: String,
    #[validate(range(min = 10_000_000, max = 999_999_999_999_999))]
    pub telefono: i64,
    pub comuna_id: i64,
}

impl Entidad for Sucursal {
    const RECURSO: &'static str = "Sucursal";

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct PatchSucursal {
    #[validate(length(min = 1, max = 100))]
    pub nombre: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub direccion: Option<String>,
    #[validate(range(min = 10_000_000, max = 999_999_999_999_999))]
    pub telefono: Option<i64>,
    pub comuna_id: Option<i64>,
}

impl PatchSucursal {
    pub fn apply_to(self, sucursal: &mut Sucursal) {
        if let Some(nombre) = self.nombre {
            sucursal.nombre = nombre;
        }
        if let Some(direccion) = self.direccion {
            sucursal.direccion = direccion;
        }
        if let Some(telefono) = self.telefono {
            sucursal.telefono = telefono;
        }
        if let Some(comuna_id) = self.comuna_id {
            sucursal.comuna_id = comuna_id;
        }
    }
}
