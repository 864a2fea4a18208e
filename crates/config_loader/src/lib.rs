//! # Config Loader
//!
//! Configuration loading and parsing module.
//!
//! Responsibilities:
//! - Parse TOML/JSON configuration files
//! - Validate configuration legality
//! - Produce a `SensorModelConfig`
//!
//! # Example
//!
//! ```no_run
//! use config_loader::ConfigLoader;
//! use std::path::Path;
//!
//! let config = ConfigLoader::load_from_path(Path::new("osmp_sensor.toml")).unwrap();
//! println!("Range: {}", config.fusion.max_range);
//! ```

mod parser;
mod validator;

pub use contracts::SensorModelConfig;
pub use parser::ConfigFormat;

use contracts::ContractError;
use std::path::Path;

/// Configuration loader
///
/// Provides static methods to load configuration from files or strings.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load from a `.toml` or `.json` file, chosen by extension
    pub fn load_from_path(path: &Path) -> Result<SensorModelConfig, ContractError> {
        let format = Self::detect_format(path)?;
        let content = Self::read_file(path)?;
        Self::load_from_str(&content, format)
    }

    /// Load from `path` if it exists
    ///
    /// A missing file yields `Ok(None)`; a present but broken one is an error.
    pub fn load_optional(path: &Path) -> Result<Option<SensorModelConfig>, ContractError> {
        if !path.is_file() {
            return Ok(None);
        }
        Self::load_from_path(path).map(Some)
    }

    /// Parse and validate configuration text
    pub fn load_from_str(
        content: &str,
        format: ConfigFormat,
    ) -> Result<SensorModelConfig, ContractError> {
        let config = parser::parse(content, format)?;
        validator::validate(&config)?;
        Ok(config)
    }

    /// Validate an already constructed configuration
    pub fn validate(config: &SensorModelConfig) -> Result<(), ContractError> {
        validator::validate(config)
    }

    /// Serialize to a TOML string
    pub fn to_toml(config: &SensorModelConfig) -> Result<String, ContractError> {
        toml::to_string_pretty(config)
            .map_err(|e| ContractError::config_parse(format!("TOML serialize error: {e}")))
    }

    /// Serialize to a JSON string
    pub fn to_json(config: &SensorModelConfig) -> Result<String, ContractError> {
        serde_json::to_string_pretty(config)
            .map_err(|e| ContractError::config_parse(format!("JSON serialize error: {e}")))
    }
}

impl ConfigLoader {
    fn detect_format(path: &Path) -> Result<ConfigFormat, ContractError> {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => ConfigFormat::from_extension(ext).ok_or_else(|| {
                ContractError::config_parse(format!("unsupported config format: .{ext}"))
            }),
            None => Err(ContractError::config_parse(format!(
                "no file extension on {}",
                path.display()
            ))),
        }
    }

    fn read_file(path: &Path) -> Result<String, ContractError> {
        std::fs::read_to_string(path).map_err(|e| ContractError::ConfigParse {
            message: format!("cannot read {}", path.display()),
            source: Some(Box::new(e)),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::InputFallback;
    use std::io::Write;

    const MINIMAL_TOML: &str = r#"
fallback = "reset"

[fusion]
max_range = 100.0

[scenario]
ego_index = 1
lateral_amplitude = 0.1

[scenario.dimension]
length = 4.5
width = 1.9
height = 1.4

[[scenario.lanes]]
x_offset = 0.0
y_offset = 0.0
x_speed = 20.0

[[scenario.lanes]]
x_offset = -10.0
y_offset = 0.0
x_speed = 20.0
"#;

    #[test]
    fn test_load_from_str_toml() {
        let result = ConfigLoader::load_from_str(MINIMAL_TOML, ConfigFormat::Toml);
        assert!(result.is_ok(), "Failed: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.fusion.max_range, 100.0);
        assert_eq!(config.fallback, InputFallback::Reset);
        assert_eq!(config.scenario.lanes.len(), 2);
    }

    #[test]
    fn test_round_trip_toml() {
        let config = ConfigLoader::load_from_str(MINIMAL_TOML, ConfigFormat::Toml).unwrap();
        let serialized = ConfigLoader::to_toml(&config).unwrap();
        let again = ConfigLoader::load_from_str(&serialized, ConfigFormat::Toml).unwrap();
        assert_eq!(config, again);
    }

    #[test]
    fn test_round_trip_json() {
        let config = SensorModelConfig::default();
        let json = ConfigLoader::to_json(&config).unwrap();
        let again = ConfigLoader::load_from_str(&json, ConfigFormat::Json).unwrap();
        assert_eq!(config, again);
    }

    #[test]
    fn test_validation_runs_after_parse() {
        let content = r#"
[scenario]
ego_index = 3
lanes = []
"#;
        let err = ConfigLoader::load_from_str(content, ConfigFormat::Toml).unwrap_err();
        assert!(err.to_string().contains("scenario.lanes"));
    }

    #[test]
    fn test_load_from_path() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(MINIMAL_TOML.as_bytes()).unwrap();

        let config = ConfigLoader::load_from_path(file.path()).unwrap();
        assert_eq!(config.scenario.ego_index, 1);
    }

    #[test]
    fn test_unsupported_extension() {
        let file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        let err = ConfigLoader::load_from_path(file.path()).unwrap_err();
        assert!(err.to_string().contains("unsupported config format"));
    }

    #[test]
    fn test_load_optional() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("osmp_sensor.toml");
        assert!(ConfigLoader::load_optional(&missing).unwrap().is_none());

        std::fs::write(&missing, "[fusion]\nmax_range = -5.0\n").unwrap();
        assert!(ConfigLoader::load_optional(&missing).is_err());

        std::fs::write(&missing, "fallback = \"reset\"\n").unwrap();
        let config = ConfigLoader::load_optional(&missing).unwrap().unwrap();
        assert_eq!(config.fallback, InputFallback::Reset);
    }
}
