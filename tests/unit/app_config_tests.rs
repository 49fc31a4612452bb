/*!
 * Tests for application configuration
 */

use anyhow::Result;
use sublearn::app_config::{Config, LogLevel};

/// Test defaults are sensible and valid
#[test]
fn test_default_config_shouldValidate() {
    let config = Config::default();

    assert_eq!(config.primary_language, "en");
    assert_eq!(config.secondary_language, "ko");
    assert_eq!(config.smi.default_duration_ms, 4000);
    assert_eq!(config.alignment.min_overlap_ratio, 0.0);
    assert_eq!(config.log_level, LogLevel::Info);
    assert!(config.validate().is_ok());
}

/// Test JSON round-trip keeps all settings
#[test]
fn test_config_serialization_withRoundTrip_shouldPreserveValues() -> Result<()> {
    let mut config = Config::default();
    config.secondary_language = "ja".to_string();
    config.smi.default_duration_ms = 2500;
    config.alignment.min_overlap_ratio = 0.25;

    let json = serde_json::to_string_pretty(&config)?;
    let parsed: Config = serde_json::from_str(&json)?;

    assert_eq!(parsed.secondary_language, "ja");
    assert_eq!(parsed.smi.default_duration_ms, 2500);
    assert_eq!(parsed.alignment.min_overlap_ratio, 0.25);

    Ok(())
}

/// Test missing fields fall back to defaults
#[test]
fn test_config_deserialization_withPartialJson_shouldUseDefaults() -> Result<()> {
    let parsed: Config = serde_json::from_str(r#"{"primary_language": "fr"}"#)?;

    assert_eq!(parsed.primary_language, "fr");
    assert_eq!(parsed.secondary_language, "ko");
    assert_eq!(parsed.smi.default_duration_ms, 4000);

    Ok(())
}

/// Test validation rejects bad values
#[test]
fn test_validate_withBadValues_shouldFail() {
    let mut config = Config::default();
    config.primary_language = "not-a-language".to_string();
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.smi.default_duration_ms = 0;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.alignment.min_overlap_ratio = 1.5;
    assert!(config.validate().is_err());
}
