//! Modelos del sistema
//!
//! Este módulo contiene todos los modelos de datos que mapean exactamente
//! al schema PostgreSQL de `migrations/`, junto con los payloads de
//! actualización parcial (`Patch*`) de cada entidad.

pub mod auto;
pub mod comuna;
pub mod estacionamiento;
pub mod pago;
pub mod region;
pub mod registro;
pub mod sucursal;
pub mod usuario;

pub use auto::{Auto, PatchAuto};
pub use comuna::{Comuna, PatchComuna};
pub use estacionamiento::{Estacionamiento, OcupacionDetalle, PatchEstacionamiento};
pub use pago::{Pago, PagoDetalle, PatchPago};
pub use region::{PatchRegion, Region};
pub use registro::{PatchRegistro, Registro};
pub use sucursal::{PatchSucursal, Sucursal};
pub use usuario::{PatchUsuario, Usuario};

use serde::{Deserialize, Deserializer};

/// Entidad persistida con llave primaria numérica. Un id `0` indica
/// que la entidad todavía no fue guardada.
pub trait Entidad {
    /// Nombre del recurso usado en los mensajes de error
    const RECURSO: &'static str;

    fn id(&self) -> i64;
    fn set_id(&mut self, id: i64);

    fn is_new(&self) -> bool {
        self.id() == 0
    }
}

/// Distingue un campo ausente (`None`) de un `null` explícito (`Some(None)`)
/// en los payloads de actualización parcial.
pub(crate) fn present_or_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
