//! Configuration loading.
//!
//! Settings come from a TOML file, with environment overrides on top.

mod settings;

pub use settings::Settings;
