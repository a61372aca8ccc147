use serde::Deserialize;
use validator::Validate;

use crate::utils::validation::validate_patente;

/// Request de entrada de un auto a un estacionamiento
#[derive(Debug, Deserialize, Validate)]
pub struct EntradaRequest {
    #[validate(custom = "validate_patente")]
    pub patente: String,
    #[validate(range(min = 1))]
    pub numero: i32,
    /// Sucursal del estacionamiento; sin ella se busca solo por número
    #[serde(default)]
    pub sucursal_id: Option<i64>,
}

/// Request de salida de un auto
#[derive(Debug, Deserialize, Validate)]
pub struct SalidaRequest {
    #[validate(custom = "validate_patente")]
    pub patente: String,
}
