//! Configuration module for minutesmaster
//!
//! Handles loading and managing application settings from TOML files.

mod api;
mod settings;

pub use api::{ApiConfig, Provider};
pub use settings::{GeneralSettings, HttpSettings, Settings, API_KEY_ENV};
