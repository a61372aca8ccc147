//! Modelo de Region

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::Entidad;

/// Region - mapea a la tabla regiones
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, Validate)]
pub struct Region {
    #[serde(default)]
    pub id: i64,
    #[validate(range(min = 1))]
    pub codigo: i32,
    #[validate(length(min = 1, max = 100))]
    pub nombre: String,
}

impl Entidad for Region {
    const RECURSO: &'static str = "Region";

    fn id(&self) -> i64 {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }
}

/// Actualización parcial de una región
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct PatchRegion {
    #[validate(range(min = 1))]
    pub codigo: Option<i32>,
    #[validate(length(min = 1, max = 100))]
    pub nombre: Option<String>,
}

impl PatchRegion {
    pub fn apply_to(self, region: &mut Region) {
        if let Some(codigo) = self.codigo {
            region.codigo = codigo;
        }
        if let Some(nombre) = self.nombre {
            region.nombre = nombre;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_only_touches_supplied_fields() {
        let mut region = Region {
            id: 1,
            codigo: 1234,
            nombre: "Santiago".to_string(),
        };
        let patch: PatchRegion =
            serde_json::from_str(r#"{"nombre":"Santiago Actualizado"}"#).unwrap();

        patch.apply_to(&mut region);

        assert_eq!(
            region,
            Region {
                id: 1,
                codigo: 1234,
                nombre: "Santiago Actualizado".to_string(),
            }
        );
    }
}
