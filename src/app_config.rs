use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;

use crate::language_utils;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Primary track language code (ISO), the language being learned
    #[serde(default = "default_primary_language")]
    pub primary_language: String,

    /// Secondary track language code (ISO), the viewer's native language
    #[serde(default = "default_secondary_language")]
    pub secondary_language: String,

    /// SMI parsing config
    #[serde(default)]
    pub smi: SmiConfig,

    /// Alignment config
    #[serde(default)]
    pub alignment: AlignmentConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// SMI parsing settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SmiConfig {
    /// Duration in ms given to the last cue of a track, which has no
    /// following sync boundary
    #[serde(default = "default_smi_duration_ms")]
    pub default_duration_ms: u64,
}

impl Default for SmiConfig {
    fn default() -> Self {
        Self {
            default_duration_ms: default_smi_duration_ms(),
        }
    }
}

/// Bilingual alignment settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AlignmentConfig {
    /// Minimum overlap as a fraction of the shorter cue's duration for two
    /// cues to pair; 0.0 pairs on any shared time
    #[serde(default = "default_min_overlap_ratio")]
    pub min_overlap_ratio: f64,
}

impl Default for AlignmentConfig {
    fn default() -> Self {
        Self {
            min_overlap_ratio: default_min_overlap_ratio(),
        }
    }
}

/// Log level for the application
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Error level
    Error,
    /// Warning level
    Warn,
    /// Info level
    #[default]
    Info,
    /// Debug level
    Debug,
    /// Trace level
    Trace,
}

fn default_primary_language() -> String {
    "en".to_string()
}

fn default_secondary_language() -> String {
    "ko".to_string()
}

fn default_smi_duration_ms() -> u64 {
    crate::smi_parser::DEFAULT_LAST_CUE_DURATION_MS
}

fn default_min_overlap_ratio() -> f64 {
    0.0
}

impl Default for Config {
    fn default() -> Self {
        Self {
            primary_language: default_primary_language(),
            secondary_language: default_secondary_language(),
            smi: SmiConfig::default(),
            alignment: AlignmentConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        language_utils::normalize_to_part2t(&self.primary_language)
            .map_err(|_| anyhow!("Invalid primary language code: {}", self.primary_language))?;

        language_utils::normalize_to_part2t(&self.secondary_language)
            .map_err(|_| anyhow!("Invalid secondary language code: {}", self.secondary_language))?;

        if self.smi.default_duration_ms == 0 {
            return Err(anyhow!("smi.default_duration_ms must be greater than zero"));
        }

        if !(0.0..=1.0).contains(&self.alignment.min_overlap_ratio) {
            return Err(anyhow!(
                "alignment.min_overlap_ratio must be between 0.0 and 1.0, got {}",
                self.alignment.min_overlap_ratio
            ));
        }

        Ok(())
    }
}
