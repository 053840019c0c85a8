//! `medierp-core`: shared domain primitives for the MediERP policy engine.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod error;
pub mod module_key;

pub use error::DomainError;
pub use module_key::{DEFAULT_MODULE, ModuleKey, ROUTE_PREFIX};
