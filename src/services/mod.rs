//! Services module
//!
//! Este módulo contiene la lógica de negocio. Cada servicio recibe un
//! `&mut` a un `ParkingStore` y trabaja dentro de esa unidad de trabajo.

pub mod auto_service;
pub mod cascada_service;
pub mod comuna_service;
pub mod estacionamiento_service;
pub mod ocupacion_service;
pub mod pago_service;
pub mod region_service;
pub mod registro_service;
pub mod sucursal_service;
pub mod tarifa;
pub mod usuario_service;

pub use auto_service::AutoService;
pub use cascada_service::CascadaService;
pub use comuna_service::ComunaService;
pub use estacionamiento_service::EstacionamientoService;
pub use ocupacion_service::OcupacionService;
pub use pago_service::PagoService;
pub use region_service::RegionService;
pub use registro_service::RegistroService;
pub use sucursal_service::SucursalService;
pub use tarifa::Tarifa;
pub use usuario_service::UsuarioService;
