use std::fs;
use std::path::Path;

use super::ArchlensConfig;
use crate::errors::{Error, Result};

/// Parse configuration from a TOML string
pub fn parse_config(contents: &str) -> Result<ArchlensConfig> {
    let config = toml::from_str::<ArchlensConfig>(contents)?;
    validate_config(&config)?;
    Ok(config)
}

/// Load configuration from a file.
///
/// A missing file yields the defaults; an unreadable or malformed file is an error.
pub fn load_config(path: &Path) -> Result<ArchlensConfig> {
    let contents = match fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            log::debug!("No config at {}, using defaults", path.display());
            return Ok(ArchlensConfig::default());
        }
        Err(e) => return Err(Error::file_system(path, e)),
    };

    let config = parse_config(&contents)?;
    log::debug!("Loaded config from {}", path.display());
    Ok(config)
}

fn validate_config(config: &ArchlensConfig) -> Result<()> {
    if config.cycles.max_cycles == 0 {
        return Err(Error::Configuration(
            "cycles.max_cycles must be at least 1".to_string(),
        ));
    }
    // Surface bad globs at load time rather than at classification time
    config.classification.exclusion_matcher()?;
    Ok(())
}
