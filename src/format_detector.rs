use std::path::Path;
use once_cell::sync::Lazy;
use regex::Regex;
use log::debug;

use crate::errors::ParseError;

// @module: Subtitle format detection

// @const: SRT timestamp line, the reliable content marker
static SRT_TIMESTAMP_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\s*\d{2}:\d{2}:\d{2},\d{3}\s*-->\s*\d{2}:\d{2}:\d{2},\d{3}").unwrap()
});

// @const: SAMI structural markers
static SMI_MARKUP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<\s*(sami|sync|body)\b").unwrap()
});

/// Supported subtitle formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubtitleFormat {
    /// SubRip plain-text timestamped blocks
    Srt,
    /// SAMI markup document
    Smi,
}

impl SubtitleFormat {
    /// Lowercase canonical extension
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Srt => "srt",
            Self::Smi => "smi",
        }
    }
}

impl std::fmt::Display for SubtitleFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// Detect the format of a subtitle file.
///
/// The extension decides when it is recognized (`.srt`, `.smi`, `.sami`);
/// otherwise the content is sniffed for SAMI markup tags or SRT timestamp
/// lines. Fails with `ParseError::UnsupportedFormat` when neither heuristic
/// matches.
pub fn detect_format(path: Option<&Path>, content: &str) -> Result<SubtitleFormat, ParseError> {
    if let Some(path) = path {
        if let Some(format) = detect_by_extension(path) {
            debug!("Detected {} format from extension of {:?}", format, path);
            return Ok(format);
        }
    }

    if let Some(format) = sniff_content(content) {
        debug!("Detected {} format from content sniffing", format);
        return Ok(format);
    }

    let label = path
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "<unnamed input>".to_string());
    Err(ParseError::UnsupportedFormat(label))
}

/// Extension-based detection, case-insensitive
pub fn detect_by_extension(path: &Path) -> Option<SubtitleFormat> {
    let ext = path.extension()?.to_string_lossy().to_lowercase();
    match ext.as_str() {
        "srt" => Some(SubtitleFormat::Srt),
        "smi" | "sami" => Some(SubtitleFormat::Smi),
        _ => None,
    }
}

/// Content-based detection used when the extension is absent or unknown.
///
/// SAMI markup wins over SRT markers: an SMI body can quote `-->` in cue
/// text, while no SRT file contains `<SAMI>`/`<SYNC>` tags.
fn sniff_content(content: &str) -> Option<SubtitleFormat> {
    if SMI_MARKUP.is_match(content) {
        return Some(SubtitleFormat::Smi);
    }
    if SRT_TIMESTAMP_LINE.is_match(content) {
        return Some(SubtitleFormat::Srt);
    }
    None
}
