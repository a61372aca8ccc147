//! Payloads de request que no corresponden directamente a una entidad

pub mod ocupacion_dto;
pub mod pago_dto;

pub use ocupacion_dto::{EntradaRequest, SalidaRequest};
pub use pago_dto::{CrearPagoRequest, RangoFechasQuery};
