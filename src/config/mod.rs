//! Configuration module for ShopSearch-RS
//!
//! Handles loading settings from YAML files and environment variables.
//! Settings are constructed once in `main` and passed into the application
//! state; there is no process-wide singleton.

mod settings;

pub use settings::*;
