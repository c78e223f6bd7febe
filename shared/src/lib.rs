//! Shared types and models for the Crop Advisor platform
//!
//! This crate contains the domain types shared between the backend, the
//! browser form (via WASM), and other components of the system.

pub mod knowledge;
pub mod models;
pub mod types;
pub mod validation;

pub use knowledge::*;
pub use models::*;
pub use types::*;
pub use validation::*;
