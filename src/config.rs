// src/config.rs

//! Configuration loading utilities.
//!
//! This module provides convenience functions for loading and validating the
//! application configuration.

use std::path::Path;

use crate::error::{AppError, Result};
use crate::models::Config;

/// Load configuration from a TOML file, falling back to defaults.
///
/// The session cookie is always merged in from the environment afterwards
/// (see [`crate::models::SESSION_COOKIE_ENV`]).
pub fn load_config(path: &Path) -> Config {
    Config::load_or_default(path)
}

/// Load and validate configuration, surfacing validation failures.
pub fn load_validated(path: &Path) -> Result<Config> {
    let config = load_config(path);
    config
        .validate()
        .map_err(|e| AppError::config(format!("Invalid configuration: {e}")))?;
    Ok(config)
}
