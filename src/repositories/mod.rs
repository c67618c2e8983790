//! Repositorios
//!
//! Acceso a datos de abastecimientos: trait de persistencia y sus
//! implementaciones PostgreSQL y en memoria.

pub mod fueling_repository;
pub mod memory_repository;

pub use fueling_repository::{FuelingStore, PgFuelingRepository};
pub use memory_repository::InMemoryFuelingRepository;
