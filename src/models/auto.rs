//! Modelo de Auto

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::Entidad;
use crate::utils::validation::validate_patente;

/// Auto - identificado por su patente y perteneciente a un usuario
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, Validate)]
pub struct Auto {
    #[serde(default)]
    pub id: i64,
    #[validate(custom = "validate_patente")]
    pub patente: String,
    pub usuario_id: i64,
}

impl Entidad for Auto {
    const RECURSO: &'static str = "Auto";

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct PatchAuto {
    #[validate(custom = "validate_patente")]
    pub patente: Option<String>,
    pub usuario_id: Option<i64>,
}

impl PatchAuto {
    pub fn apply_to(self, auto: &mut Auto) {
        if let Some(patente) = self.patente {
            auto.patente = patente;
        }
        if let Some(usuario_id) = self.usuario_id {
            auto.usuario_id = usuario_id;
        }
    }
}
