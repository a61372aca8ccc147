//! SmartPark
//!
//! Backend de una red de estacionamientos: regiones, comunas y sucursales,
//! estacionamientos con su ocupación, autos y usuarios, registros de
//! estadía y pagos.

pub mod config;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

pub use routes::create_router;
pub use state::AppState;
