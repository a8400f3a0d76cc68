//! Configuration loading from disk.

use crate::config::schema::RouteMap;
use crate::config::validation::{validate_routes, ValidationError};
use std::fs;
use std::path::Path;

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load a route map from a JSON config file.
///
/// The file is an object mapping route names to route configs; an empty
/// name denotes the default route. The result is parsed only; callers
/// layer in any flag-built default route and then run
/// [`finalize_routes`] before serving.
pub fn load_routes(path: &Path) -> Result<RouteMap, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let routes: RouteMap = serde_json::from_str(&content).map_err(ConfigError::Parse)?;
    Ok(routes)
}

/// Validate and normalize a fully layered route map.
pub fn finalize_routes(routes: &mut RouteMap) -> Result<(), ConfigError> {
    validate_routes(routes).map_err(ConfigError::Validation)
}
