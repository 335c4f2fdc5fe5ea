use anyhow::{Context, Result};
use std::{fs, path::Path};
use tracing::{debug, info};
use waterwatch_schemas::file_formats::ConfigFile;

/// Looked up in the working directory when no `--config` is given.
pub const DEFAULT_CONFIG_PATH: &str = "waterwatch.yaml";

/// Loads the configuration file.
///
/// An explicit path must exist. Without one, `waterwatch.yaml` is read if
/// present and built-in defaults are used otherwise.
pub fn load(explicit: Option<&Path>) -> Result<ConfigFile> {
    let path = match explicit {
        Some(path) => path,
        None => {
            let default = Path::new(DEFAULT_CONFIG_PATH);
            if !default.is_file() {
                debug!("No {} found, using default configuration", DEFAULT_CONFIG_PATH);
                return Ok(ConfigFile::default());
            }
            default
        }
    };

    info!("Loading configuration from '{}'", path.display());
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    parse(&content).with_context(|| format!("Failed to parse YAML from {}", path.display()))
}

fn parse(content: &str) -> Result<ConfigFile> {
    // An empty document deserializes to unit, not to a mapping.
    if content.trim().is_empty() {
        return Ok(ConfigFile::default());
    }
    Ok(serde_yaml::from_str(content)?)
}
