use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "archlens.toml";

const DEFAULT_CONFIG: &str = r#"# Archlens Configuration

[classification]
exclude_patterns = ["**.generated.**"]

[classification.explicit]
# "com.acme.order.Order" = "AGGREGATE_ROOT"

[classification.validation]
fail_on_unclassified = false
fail_on_conflict = true

[cycles]
max_cycles = 100
max_dependencies_per_edge = 10
include_transitive = true

[audit]
disabled = []
fail_on = "CRITICAL"

[audit.severity_overrides]
# "hexagonal:port-coverage" = "MINOR"
"#;

pub fn init_config(force: bool) -> Result<()> {
    init_config_at(&PathBuf::from(DEFAULT_CONFIG_FILE), force)
}

pub fn init_config_at(config_path: &Path, force: bool) -> Result<()> {
    if config_path.exists() && !force {
        anyhow::bail!("Configuration file already exists. Use --force to overwrite.");
    }

    fs::write(config_path, DEFAULT_CONFIG)?;
    println!("Created {} configuration file", config_path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{load_config, ArchlensConfig};

    #[test]
    fn test_written_config_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        init_config_at(&path, false).unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.cycles, ArchlensConfig::default().cycles);
        assert_eq!(config.audit.fail_on, ArchlensConfig::default().audit.fail_on);
    }

    #[test]
    fn test_existing_file_requires_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        fs::write(&path, "").unwrap();

        assert!(init_config_at(&path, false).is_err());
        init_config_at(&path, true).unwrap();
        assert!(fs::read_to_string(&path).unwrap().contains("[cycles]"));
    }
}
