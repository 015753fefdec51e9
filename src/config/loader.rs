use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::directory::PrefixDirectory;

use super::types::{Config, DirectoryFile};

impl Config {
    /// Load configuration from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        debug!(path = %path.display(), "loading configuration");

        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        let mut config = Self::from_yaml(&contents)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;

        // Entries file is relative to the config file, not the working directory
        if let Some(ref entries) = config.directory.path {
            if entries.is_relative() {
                if let Some(parent) = path.parent() {
                    config.directory.path = Some(parent.join(entries));
                }
            }
        }

        Ok(config)
    }

    /// Parse configuration from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty document means "all defaults"
        let config: Config = if yaml.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(yaml).context("failed to parse YAML configuration")?
        };

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.classifier
            .validate()
            .context("invalid classifier limits")?;

        if self.telemetry.log_level.trim().is_empty() {
            anyhow::bail!("telemetry.log_level must not be empty");
        }

        let dir = &self.directory;
        if !dir.builtin && dir.path.is_none() && dir.countries.is_empty() {
            anyhow::bail!("directory has no sources: enable builtin, set a path or add countries");
        }

        debug!("configuration validated successfully");
        Ok(())
    }

    /// Assemble and validate the prefix directory.
    pub fn build_directory(&self) -> Result<PrefixDirectory> {
        let source = &self.directory;
        let mut builder = PrefixDirectory::builder();

        if source.builtin {
            let builtin = PrefixDirectory::builtin();
            builder = builder.extend(
                builtin.countries().into_iter().cloned(),
                builtin.operators().into_iter().cloned(),
            );
        }

        if let Some(ref path) = source.path {
            let file = load_directory_file(path)?;
            builder = builder.extend(file.countries, file.operators);
        }

        builder = builder.extend(source.countries.iter().cloned(), source.operators.iter().cloned());

        let directory = builder.build().context("invalid prefix directory")?;
        if directory.is_empty() {
            anyhow::bail!("prefix directory is empty");
        }

        info!(
            countries = directory.country_count(),
            operators = directory.operator_count(),
            builtin = source.builtin,
            path = ?source.path,
            "prefix directory loaded"
        );

        Ok(directory)
    }
}

fn load_directory_file(path: &Path) -> Result<DirectoryFile> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read directory file: {}", path.display()))?;

    serde_yaml::from_str(&contents)
        .with_context(|| format!("failed to parse directory file: {}", path.display()))
}
