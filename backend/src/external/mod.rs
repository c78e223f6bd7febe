//! External API integrations

pub mod mail;
pub mod weather;

pub use mail::{MailClient, MailError, OutgoingMail};
pub use weather::{WeatherClient, WeatherError, WeatherQuery};
