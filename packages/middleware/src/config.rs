//! Environment-driven configuration for the request middleware.

use std::num::ParseIntError;

use thiserror::Error;

/// Default maximum request body size, in bytes (256 KiB).
pub const DEFAULT_BODY_LIMIT: usize = 262_144;

/// Environment variable overriding [`DEFAULT_BODY_LIMIT`].
pub const BODY_LIMIT_ENV: &str = "JSONPARAMS_BODY_LIMIT";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value:?}")]
    InvalidUsize {
        name: String,
        value: String,
        #[source]
        source: ParseIntError,
    },
}

/// Reads `name` from the environment as a `usize`, falling back to `default`
/// when unset.
///
/// # Errors
///
/// * If the variable is set but is not a valid `usize`
pub fn default_env_usize(name: &str, default: usize) -> Result<usize, ConfigError> {
    parse_env_usize(name, std::env::var(name).ok().as_deref(), default)
}

fn parse_env_usize(name: &str, value: Option<&str>, default: usize) -> Result<usize, ConfigError> {
    let Some(value) = value else {
        return Ok(default);
    };

    value
        .trim()
        .parse::<usize>()
        .map_err(|source| ConfigError::InvalidUsize {
            name: name.to_string(),
            value: value.to_string(),
            source,
        })
}
