//! Business logic services for the Crop Advisor platform

pub mod auth;
pub mod contact;
pub mod prediction;

pub use auth::AuthService;
pub use contact::ContactService;
pub use prediction::PredictionService;
