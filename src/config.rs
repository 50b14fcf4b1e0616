//! Tool configuration.
//!
//! Handles loading, validating, and merging `imgror.toml`. Stock defaults are
//! the base layer; a user file overrides only the keys it sets.
//!
//! ## Config File Location
//!
//! `imgror.toml` in the working directory is picked up automatically. Pass
//! `--config PATH` to use a different file (which must then exist).
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [transform]
//! default_quality = 85       # Quality a fresh selection starts at (10-100)
//! baseline_quality = 85      # Quality of the "estimated size" re-encode (10-100)
//! filter = "catmull-rom"     # nearest | triangle | catmull-rom | gaussian | lanczos3
//!
//! [upload]
//! extensions = ["png", "jpg", "jpeg"]
//!
//! [fetch]
//! timeout_secs = 30
//! max_bytes = 33554432       # 32 MiB
//! user_agent = "imgror/<version>"
//!
//! [export]
//! output_dir = "."
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{Quality, ResampleFilter, is_decodable_extension};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name looked up in the working directory when no `--config` is given.
pub const CONFIG_FILE_NAME: &str = "imgror.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration loaded from `imgror.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ToolConfig {
    /// Transform engine defaults (quality, baseline, resampling filter).
    pub transform: TransformConfig,
    /// Which uploads are accepted.
    pub upload: UploadConfig,
    /// HTTP client settings for URL ingestion.
    pub fetch: FetchConfig,
    /// Where exported files are written.
    pub export: ExportConfig,
}

impl ToolConfig {
    /// Validate config values are within acceptable ranges.
    ///
    /// Quality ranges are enforced while parsing, by [`Quality`] itself.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.upload.extensions.is_empty() {
            return Err(ConfigError::Validation(
                "upload.extensions must not be empty".into(),
            ));
        }
        if let Some(ext) = self
            .upload
            .extensions
            .iter()
            .find(|ext| !is_decodable_extension(ext))
        {
            return Err(ConfigError::Validation(format!(
                "upload.extensions: no decoder for '{ext}'"
            )));
        }
        if self.fetch.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "fetch.timeout_secs must be positive".into(),
            ));
        }
        if self.fetch.max_bytes == 0 {
            return Err(ConfigError::Validation(
                "fetch.max_bytes must be positive".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TransformConfig {
    /// Quality the slider starts at for every newly selected image.
    pub default_quality: Quality,
    /// Quality used to estimate the original size.
    pub baseline_quality: Quality,
    pub filter: ResampleFilter,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UploadConfig {
    /// Accepted file extensions, compared case-insensitively.
    pub extensions: Vec<String>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            extensions: vec!["png".into(), "jpg".into(), "jpeg".into()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FetchConfig {
    pub timeout_secs: u64,
    /// Responses larger than this are rejected.
    pub max_bytes: u64,
    pub user_agent: String,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            max_bytes: 32 * 1024 * 1024,
            user_agent: format!("imgror/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfig {
    pub output_dir: PathBuf,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged on top of.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(ToolConfig::default())?)
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

fn read_toml(path: &Path) -> Result<toml::Value, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Merge an optional overlay onto the stock defaults, then deserialize and validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<ToolConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: ToolConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load the effective configuration.
///
/// With an explicit path the file must exist. Otherwise `imgror.toml` in `dir`
/// is used when present, and stock defaults when not.
pub fn load_config(explicit: Option<&Path>, dir: &Path) -> Result<ToolConfig, ConfigError> {
    let overlay = match explicit {
        Some(path) => Some(read_toml(path)?),
        None => {
            let path = dir.join(CONFIG_FILE_NAME);
            if path.exists() {
                Some(read_toml(&path)?)
            } else {
                None
            }
        }
    };
    resolve_config(overlay)
}

/// Returns a fully-commented stock `imgror.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# imgror configuration
# ====================
#
# Every key is optional. Delete anything you don't want to override.

[transform]
# Quality (10-100) a newly selected image starts at.
default_quality = 85
# Quality (10-100) of the re-encode used to estimate the original size.
# The estimate is a native-size JPEG re-encode, not the file's size on disk.
baseline_quality = 85
# Resampling filter: nearest | triangle | catmull-rom | gaussian | lanczos3
filter = "catmull-rom"

[upload]
# File extensions accepted from local files (case-insensitive).
extensions = ["png", "jpg", "jpeg"]

[fetch]
# Seconds before an HTTP fetch is abandoned.
timeout_secs = 30
# Largest accepted response body, in bytes.
max_bytes = 33554432
# user_agent = "imgror/<version>"

[export]
# Directory exported IMGROR_*.jpg files are written to.
output_dir = "."
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_values() {
        let config = ToolConfig::default();
        assert_eq!(config.transform.default_quality.value(), 85);
        assert_eq!(config.transform.baseline_quality.value(), 85);
        assert_eq!(config.transform.filter, ResampleFilter::CatmullRom);
        assert_eq!(config.upload.extensions, vec!["png", "jpg", "jpeg"]);
        assert_eq!(config.fetch.timeout_secs, 30);
        assert!(config.fetch.user_agent.starts_with("imgror/"));
        assert_eq!(config.export.output_dir, PathBuf::from("."));
    }

    #[test]
    fn validate_default_config_passes() {
        assert!(ToolConfig::default().validate().is_ok());
    }

    #[test]
    fn parse_partial_config() {
        let config: ToolConfig = toml::from_str(
            r#"
[transform]
default_quality = 60
"#,
        )
        .unwrap();
        assert_eq!(config.transform.default_quality.value(), 60);
        // Untouched keys keep defaults
        assert_eq!(config.transform.baseline_quality.value(), 85);
        assert_eq!(config.fetch.max_bytes, 32 * 1024 * 1024);
    }

    #[test]
    fn stock_config_parses_to_defaults() {
        let config: ToolConfig = toml::from_str(stock_config_toml()).unwrap();
        let defaults = ToolConfig::default();
        assert_eq!(
            config.transform.default_quality,
            defaults.transform.default_quality
        );
        assert_eq!(config.transform.filter, defaults.transform.filter);
        assert_eq!(config.upload.extensions, defaults.upload.extensions);
        assert_eq!(config.fetch.max_bytes, defaults.fetch.max_bytes);
        assert_eq!(config.export.output_dir, defaults.export.output_dir);
    }

    #[test]
    fn quality_out_of_range_rejected() {
        let result: Result<ToolConfig, _> = toml::from_str(
            r#"
[transform]
baseline_quality = 5
"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn unknown_key_rejected() {
        let result = resolve_config(Some(
            toml::from_str(
                r#"
[transform]
qualty = 50
"#,
            )
            .unwrap(),
        ));
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn unknown_section_rejected() {
        let result: Result<ToolConfig, _> = toml::from_str("[server]\nport = 80\n");
        assert!(result.is_err());
    }

    #[test]
    fn validate_empty_extensions() {
        let mut config = ToolConfig::default();
        config.upload.extensions.clear();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_undecodable_extension() {
        let mut config = ToolConfig::default();
        config.upload.extensions.push("psd".into());
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("psd"));
    }

    #[test]
    fn validate_zero_timeout_and_size() {
        let mut config = ToolConfig::default();
        config.fetch.timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = ToolConfig::default();
        config.fetch.max_bytes = 0;
        assert!(config.validate().is_err());
    }

    // =========================================================================
    // merge_toml tests
    // =========================================================================

    #[test]
    fn merge_toml_scalar_override() {
        let base: toml::Value = toml::from_str("a = 1\nb = 2").unwrap();
        let overlay: toml::Value = toml::from_str("b = 3").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["a"].as_integer(), Some(1));
        assert_eq!(merged["b"].as_integer(), Some(3));
    }

    #[test]
    fn merge_toml_nested_tables_keep_siblings() {
        let base = stock_defaults_value().unwrap();
        let overlay: toml::Value = toml::from_str("[fetch]\ntimeout_secs = 5").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["fetch"]["timeout_secs"].as_integer(), Some(5));
        assert_eq!(
            merged["fetch"]["max_bytes"].as_integer(),
            Some(32 * 1024 * 1024)
        );
        assert_eq!(merged["transform"]["filter"].as_str(), Some("catmull-rom"));
    }

    #[test]
    fn merge_toml_arrays_replace() {
        let base = stock_defaults_value().unwrap();
        let overlay: toml::Value = toml::from_str("[upload]\nextensions = [\"webp\"]").unwrap();
        let merged = merge_toml(base, overlay);
        let exts = merged["upload"]["extensions"].as_array().unwrap();
        assert_eq!(exts.len(), 1);
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(None, tmp.path()).unwrap();
        assert_eq!(config.transform.default_quality.value(), 85);
    }

    #[test]
    fn load_config_reads_file_from_dir() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE_NAME),
            r#"
[transform]
filter = "lanczos3"

[export]
output_dir = "out"
"#,
        )
        .unwrap();

        let config = load_config(None, tmp.path()).unwrap();
        assert_eq!(config.transform.filter, ResampleFilter::Lanczos3);
        assert_eq!(config.export.output_dir, PathBuf::from("out"));
        assert_eq!(config.transform.default_quality.value(), 85);
    }

    #[test]
    fn load_config_explicit_path() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("custom.toml");
        fs::write(&path, "[fetch]\ntimeout_secs = 7\n").unwrap();

        let config = load_config(Some(&path), Path::new("/nonexistent")).unwrap();
        assert_eq!(config.fetch.timeout_secs, 7);
    }

    #[test]
    fn load_config_explicit_missing_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let result = load_config(Some(&tmp.path().join("missing.toml")), tmp.path());
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE_NAME), "this is not valid toml [[[").unwrap();
        let result = load_config(None, tmp.path());
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn load_config_validates_values() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE_NAME), "[fetch]\nmax_bytes = 0\n").unwrap();
        let result = load_config(None, tmp.path());
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }
}
