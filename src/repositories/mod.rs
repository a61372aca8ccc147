//! Repositorios
//!
//! Acceso a datos detrás del trait `ParkingStore`, con una implementación
//! sobre PostgreSQL y otra en memoria.

pub mod memory_store;
pub mod parking_store;
pub mod pg_store;

pub use memory_store::MemoryStore;
pub use parking_store::ParkingStore;
pub use pg_store::PgStore;
