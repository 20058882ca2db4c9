//! Record access layer.
//!
//! Every coffee operation is a single call against the document store. The
//! `CoffeeRepository` trait is the seam handlers depend on; PostgreSQL backs
//! it in production and an in-memory store backs it in tests.

pub mod coffee_repository;

#[cfg(test)]
pub mod memory_repository;

pub use coffee_repository::{CoffeeRepository, PgCoffeeRepository};
