//! Printer configuration
//!
//! `defaults/tilescope.default.toml` is embedded into the binary so the
//! documented defaults and the runtime behavior stay in sync. User files are
//! layered on top through [`Loader`] before deserializing into
//! [`PrinterConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../../defaults/tilescope.default.toml");

/// Knobs consumed by the printers
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PrinterConfig {
    pub limits: LimitsConfig,
    pub display: DisplayConfig,
}

/// Plausibility bounds for values read from memory
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LimitsConfig {
    pub max_sane_value: u64,
    pub max_hidden_dims: usize,
}

/// How many elements listings show before truncating
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DisplayConfig {
    pub array_preview: usize,
    pub thread_buffer_preview: usize,
    pub tuple_preview: usize,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        LimitsConfig {
            max_sane_value: 100_000_000,
            max_hidden_dims: 20,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        DisplayConfig {
            array_preview: 20,
            thread_buffer_preview: 10,
            tuple_preview: 32,
        }
    }
}

impl Default for PrinterConfig {
    fn default() -> Self {
        PrinterConfig {
            limits: LimitsConfig::default(),
            display: DisplayConfig::default(),
        }
    }
}

/// Builds a [`PrinterConfig`]: embedded defaults, then user files, then single-key overrides
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    pub fn new() -> Self {
        let defaults = File::from_str(DEFAULT_TOML, FileFormat::Toml);
        Loader {
            builder: Config::builder().add_source(defaults),
        }
    }

    /// Layer a TOML file over what is already loaded; the file must exist
    pub fn with_file(self, path: impl AsRef<Path>) -> Self {
        let file = File::from(path.as_ref()).format(FileFormat::Toml);
        Loader {
            builder: self.builder.add_source(file),
        }
    }

    /// Force one dotted key, such as `limits.max_sane_value`, above every file
    pub fn set_override(self, key: &str, value: impl Into<ValueKind>) -> Result<Self, ConfigError> {
        Ok(Loader {
            builder: self.builder.set_override(key, value)?,
        })
    }

    pub fn build(self) -> Result<PrinterConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Loader::new()
    }
}

/// The embedded defaults alone
pub fn load_defaults() -> Result<PrinterConfig, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_default_config() {
        let config = load_defaults().expect("defaults to deserialize");
        assert_eq!(config.limits.max_sane_value, 100_000_000);
        assert_eq!(config.display.thread_buffer_preview, 10);
    }

    #[test]
    fn embedded_defaults_match_default_impl() {
        assert_eq!(load_defaults().unwrap(), PrinterConfig::default());
    }

    #[test]
    fn supports_overrides() {
        let config = Loader::new()
            .set_override("display.array_preview", 4_i64)
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert_eq!(config.display.array_preview, 4);
        assert_eq!(config.display.tuple_preview, 32);
    }

    #[test]
    fn missing_required_file_is_an_error() {
        assert!(Loader::new().with_file("/nonexistent/tilescope.toml").build().is_err());
    }

    #[test]
    fn override_wins_over_file() {
        let dir = std::env::temp_dir().join(format!("tilescope-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("limits.toml");
        std::fs::write(&path, "[limits]\nmax_sane_value = 1000\n").unwrap();

        let config = Loader::new()
            .with_file(&path)
            .set_override("limits.max_sane_value", 5_i64)
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(config.limits.max_sane_value, 5);
        assert_eq!(config.limits.max_hidden_dims, 20);

        std::fs::remove_dir_all(&dir).ok();
    }
}
