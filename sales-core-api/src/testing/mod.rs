//! In-memory store and fixtures for tests.

pub mod fixtures;
pub mod memory_store;

pub use fixtures::*;
pub use memory_store::*;
