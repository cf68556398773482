//! Extra configuration file support for sbom-generator.
//!
//! The `-e/--extra` file supplies document metadata and connection settings
//! that are awkward to pass as flags. It is YAML (JSON parses too); command
//! line flags always take priority over values read here.

use anyhow::{bail, Context};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use crate::sbom_generation::domain::Creator;
use crate::sbom_generation::services::MetadataSettings;
use crate::shared::error::SbomError;
use crate::shared::security::{validate_file_size, validate_regular_file, MAX_CONFIG_FILE_SIZE};
use crate::shared::Result;

/// Upper bound for `max_retries`
const MAX_RETRIES_LIMIT: u32 = 10;

/// Extra configuration file schema.
#[derive(Debug, Deserialize, Default)]
pub struct ExtraConfig {
    /// Base URI for document namespaces
    pub namespace: Option<String>,
    pub organization: Option<String>,
    pub org_email: Option<String>,
    pub person: Option<String>,
    pub person_email: Option<String>,
    /// Inventory service URL (or `saas`)
    pub url: Option<String>,
    pub timeout_secs: Option<u64>,
    pub max_retries: Option<u32>,
    /// Captures unknown fields for warnings.
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_yaml_ng::Value>,
}

impl ExtraConfig {
    /// Document metadata settings; unset values keep their defaults
    pub fn metadata_settings(&self) -> MetadataSettings {
        let mut settings = MetadataSettings::default();
        if let Some(namespace) = non_empty(self.namespace.as_deref()) {
            settings.namespace_base = namespace.to_string();
        }
        settings.organization = non_empty(self.organization.as_deref())
            .map(|name| Creator::new(name, self.org_email.clone()));
        settings.person = non_empty(self.person.as_deref())
            .map(|name| Creator::new(name, self.person_email.clone()));
        settings
    }

    /// One warning line per unknown field, sorted by key
    pub fn unknown_field_warnings(&self) -> Vec<String> {
        let mut keys: Vec<&String> = self.unknown_fields.keys().collect();
        keys.sort();
        keys.into_iter()
            .map(|key| format!("Unknown config field '{}' will be ignored.", key))
            .collect()
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Loads the extra configuration file.
///
/// # Returns
/// The configuration plus warnings for the caller to report. A missing file
/// is not an error: it yields the default configuration and a warning.
///
/// # Errors
/// Returns `SbomError::Usage` if the file is unreadable, too large,
/// not valid YAML, or holds invalid values
pub fn load_extra_config(path: &Path) -> Result<(ExtraConfig, Vec<String>)> {
    if !path.exists() {
        let warning = format!(
            "Extra config file {} not found; continuing with defaults.",
            path.display()
        );
        tracing::warn!(path = %path.display(), "extra config file not found");
        return Ok((ExtraConfig::default(), vec![warning]));
    }

    let config = load_config_from_path(path).map_err(|e| SbomError::Usage {
        message: format!("{:#}", e),
    })?;
    let warnings = config.unknown_field_warnings();
    Ok((config, warnings))
}

/// Load config from an explicit path. Returns an error if the file is not found.
pub fn load_config_from_path(path: &Path) -> Result<ExtraConfig> {
    validate_regular_file(path, "extra config file")?;
    let size = std::fs::metadata(path)
        .with_context(|| format!("Failed to read config file metadata: {}", path.display()))?
        .len();
    validate_file_size(size, path, MAX_CONFIG_FILE_SIZE)?;

    let content = std::fs::read_to_string(path).with_context(|| {
        format!(
            "Failed to read config file: {}\n\n💡 Hint: Check that the file exists and is readable.",
            path.display()
        )
    })?;

    if content.trim().is_empty() {
        return Ok(ExtraConfig::default());
    }

    let config: ExtraConfig = serde_yaml_ng::from_str(&content).with_context(|| {
        format!(
            "Failed to parse config file: {}\n\n💡 Hint: Ensure the file contains valid YAML or JSON.",
            path.display()
        )
    })?;

    validate_config(&config)?;
    Ok(config)
}

/// Validate the loaded configuration.
fn validate_config(config: &ExtraConfig) -> Result<()> {
    if let Some(namespace) = non_empty(config.namespace.as_deref()) {
        if !namespace.starts_with("http://") && !namespace.starts_with("https://") {
            bail!(
                "Invalid config: namespace must be an http(s) URI, got '{}'.\n\n\
                 💡 Hint: Use a base such as \"https://sbom.example.com/spdxdocs\".",
                namespace
            );
        }
    }
    if config.timeout_secs == Some(0) {
        bail!("Invalid config: timeout_secs must be greater than 0.");
    }
    if let Some(retries) = config.max_retries {
        if retries == 0 || retries > MAX_RETRIES_LIMIT {
            bail!(
                "Invalid config: max_retries must be between 1 and {}, got {}.",
                MAX_RETRIES_LIMIT,
                retries
            );
        }
    }
    Ok(())
}
