pub mod auth;
pub mod config;
pub mod error;
pub mod scheduler;
pub mod scope;
pub mod service;
pub mod telemetry;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use error::*;
pub use scope::*;
pub use service::*;
