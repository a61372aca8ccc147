//! Middleware del sistema

pub mod cors;

pub use cors::{cors_layer, cors_with_origins};
