//! # Adapters
//!
//! Concrete configuration sources for the filter.

pub mod config;

pub use config::StaticConfigProvider;
#[cfg(feature = "config")]
pub use config::TomlConfigProvider;
