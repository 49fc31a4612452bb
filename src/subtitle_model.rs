use std::fmt;
use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};

// @module: Canonical cue representation shared by all parsers

/// A half-open-free time window in milliseconds.
///
/// `start_ms <= end_ms` is guaranteed after normalization; raw parser output
/// may violate it and carries an `InvalidTimeRange` diagnostic instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    // @field: Start time in ms
    pub start_ms: u64,

    // @field: End time in ms
    pub end_ms: u64,
}

impl TimeRange {
    pub fn new(start_ms: u64, end_ms: u64) -> Self {
        TimeRange { start_ms, end_ms }
    }

    /// Duration of the range, saturating when the raw range is inverted
    pub fn duration_ms(&self) -> u64 {
        self.end_ms.saturating_sub(self.start_ms)
    }

    /// Overlap window with another range, if any time is shared
    pub fn overlap(&self, other: &TimeRange) -> Option<TimeRange> {
        let left = self.start_ms.max(other.start_ms);
        let right = self.end_ms.min(other.end_ms);
        if left < right {
            Some(TimeRange::new(left, right))
        } else {
            None
        }
    }

    /// Parse an SRT timestamp (HH:MM:SS,mmm) to milliseconds
    pub fn parse_timestamp(timestamp: &str) -> Result<u64> {
        let parts: Vec<&str> = timestamp.trim().split(&[':', ',', '.'][..]).collect();

        if parts.len() != 4 {
            return Err(anyhow!("Invalid timestamp format: {}", timestamp));
        }

        let hours: u64 = parts[0].parse().map_err(|_| anyhow!("Failed to parse hours in: {}", timestamp))?;
        let minutes: u64 = parts[1].parse().map_err(|_| anyhow!("Failed to parse minutes in: {}", timestamp))?;
        let seconds: u64 = parts[2].parse().map_err(|_| anyhow!("Failed to parse seconds in: {}", timestamp))?;
        let millis: u64 = parts[3].parse().map_err(|_| anyhow!("Failed to parse milliseconds in: {}", timestamp))?;

        if minutes >= 60 || seconds >= 60 || millis >= 1000 {
            return Err(anyhow!("Invalid time components in timestamp: {}", timestamp));
        }

        Ok(((hours * 60 + minutes) * 60 + seconds) * 1000 + millis)
    }

    /// Format a timestamp in milliseconds to SRT format (HH:MM:SS,mmm)
    pub fn format_timestamp(ms: u64) -> String {
        let hours = ms / 3_600_000;
        let minutes = (ms % 3_600_000) / 60_000;
        let seconds = (ms % 60_000) / 1_000;
        let millis = ms % 1_000;

        format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
    }

    /// Convert start time to formatted SRT timestamp
    pub fn format_start(&self) -> String {
        Self::format_timestamp(self.start_ms)
    }

    /// Convert end time to formatted SRT timestamp
    pub fn format_end(&self) -> String {
        Self::format_timestamp(self.end_ms)
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} --> {}", self.format_start(), self.format_end())
    }
}

// @struct: Single subtitle cue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cue {
    // @field: Sequence number, 1-based, unique within a track
    pub index: usize,

    // @field: Index as written in the source file, kept for diagnostics only
    pub source_index: Option<usize>,

    // @field: Time window
    pub range: TimeRange,

    // @field: Text lines, original line breaks preserved
    pub lines: Vec<String>,

    // @field: ISO language code when known
    pub language: Option<String>,
}

impl Cue {
    pub fn new(index: usize, range: TimeRange, lines: Vec<String>) -> Self {
        Cue {
            index,
            source_index: None,
            range,
            lines,
            language: None,
        }
    }

    /// True when every text line is empty after trimming
    pub fn is_empty(&self) -> bool {
        self.lines.iter().all(|l| l.trim().is_empty())
    }

    /// Joined text, one string with embedded newlines
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.index)?;
        writeln!(f, "{}", self.range)?;
        for line in &self.lines {
            writeln!(f, "{}", line)?;
        }
        writeln!(f)
    }
}

/// Ordered collection of cues for one subtitle file/language
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// List of cues, sorted by start time after normalization
    pub cues: Vec<Cue>,

    /// ISO language code for the whole track, when known
    pub language: Option<String>,
}

impl Track {
    pub fn new(language: Option<String>) -> Self {
        Track {
            cues: Vec::new(),
            language,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cues.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cues.len()
    }

    /// Serialize the whole track as SRT text
    pub fn to_srt(&self) -> String {
        let mut out = String::new();
        for cue in &self.cues {
            out.push_str(&cue.to_string());
        }
        out
    }
}

/// A matched (or one-sided) correspondence between cues of two tracks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignedPair {
    /// Cue from the primary track, absent for secondary-only pairs
    pub primary: Option<Cue>,

    /// Cue from the secondary track, absent for primary-only pairs
    pub secondary: Option<Cue>,

    /// Shared time window; equals the lone cue's range for one-sided pairs
    pub overlap: TimeRange,

    /// True for the greatest-overlap pairing when a cue matches several counterparts
    pub best_match: bool,
}

impl AlignedPair {
    pub fn matched(primary: Cue, secondary: Cue, overlap: TimeRange, best_match: bool) -> Self {
        AlignedPair {
            primary: Some(primary),
            secondary: Some(secondary),
            overlap,
            best_match,
        }
    }

    pub fn primary_only(cue: Cue) -> Self {
        let overlap = cue.range;
        AlignedPair {
            primary: Some(cue),
            secondary: None,
            overlap,
            best_match: false,
        }
    }

    pub fn secondary_only(cue: Cue) -> Self {
        let overlap = cue.range;
        AlignedPair {
            primary: None,
            secondary: Some(cue),
            overlap,
            best_match: false,
        }
    }

    /// True when both sides are present
    pub fn is_matched(&self) -> bool {
        self.primary.is_some() && self.secondary.is_some()
    }
}

/// Kind of recoverable problem found while parsing or normalizing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosticKind {
    /// A cue block could not be parsed and was skipped
    MalformedBlock,

    /// A cue ended before it started; corrected to end = start
    InvalidTimeRange,

    /// Two cues of the same track share time
    OverlappingCues,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::MalformedBlock => write!(f, "malformed block"),
            Self::InvalidTimeRange => write!(f, "invalid time range"),
            Self::OverlappingCues => write!(f, "overlapping cues"),
        }
    }
}

// @struct: One recoverable parse/normalize problem
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    // @field: Problem category
    pub kind: DiagnosticKind,

    // @field: Human-readable detail
    pub message: String,

    // @field: Source line where the problem was seen, when known
    pub line: Option<usize>,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Diagnostic {
            kind,
            message: message.into(),
            line: None,
        }
    }

    pub fn at_line(kind: DiagnosticKind, message: impl Into<String>, line: usize) -> Self {
        Diagnostic {
            kind,
            message: message.into(),
            line: Some(line),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "{} at line {}: {}", self.kind, line, self.message),
            None => write!(f, "{}: {}", self.kind, self.message),
        }
    }
}

/// A stage result plus the recoverable problems found while producing it
#[derive(Debug, Clone, Default)]
pub struct ParseOutcome<T> {
    /// The (possibly partial) result
    pub value: T,

    /// Accumulated recoverable problems, in source order
    pub diagnostics: Vec<Diagnostic>,
}

impl<T> ParseOutcome<T> {
    pub fn clean(value: T) -> Self {
        ParseOutcome {
            value,
            diagnostics: Vec::new(),
        }
    }

    pub fn with_diagnostics(value: T, diagnostics: Vec<Diagnostic>) -> Self {
        ParseOutcome { value, diagnostics }
    }

    /// Map the value while carrying diagnostics forward
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ParseOutcome<U> {
        ParseOutcome {
            value: f(self.value),
            diagnostics: self.diagnostics,
        }
    }
}
