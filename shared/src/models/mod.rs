//! Domain models for the Crop Advisor platform

mod crop;
mod market;
mod observation;
mod user;
mod weather;

pub use crop::*;
pub use market::*;
pub use observation::*;
pub use user::*;
pub use weather::*;
