//! Modelo de Comuna

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::Entidad;

/// Comuna - pertenece a exactamente una región
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, Validate)]
pub struct Comuna {
    #[serde(default)]
    pub id: i64,
    #[validate(range(min = 1))]
    pub codigo: i64,
    #[validate(length(min = 1, max = 100))]
    pub nombre: String,
    pub region_id: i64,
}

impl Entidad for Comuna {
    const RECURSO: &'static str = "Comuna";

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct PatchComuna {
    #[validate(range(min = 1))]
    pub codigo: Option<i64>,
    #[validate(length(min = 1, max = 100))]
    pub nombre: Option<String>,
    pub region_id: Option<i64>,
}

impl PatchComuna {
    pub fn apply_to(self, comuna: &mut Comuna) {
        if let Some(codigo) = self.codigo {
            comuna.codigo = codigo;
        }
        if let Some(nombre) = self.nombre {
            comuna.nombre = nombre;
        }
        if let Some(region_id) = self.region_id {
            comuna.region_id = region_id;
        }
    }
}
