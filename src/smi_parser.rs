use std::collections::BTreeMap;
use once_cell::sync::Lazy;
use regex::Regex;
use log::{warn, debug};

use crate::errors::ParseError;
use crate::language_utils;
use crate::subtitle_model::{Cue, Diagnostic, DiagnosticKind, ParseOutcome, TimeRange, Track};

// @module: SAMI (.smi) parsing
//
// Real-world SMI files are rarely well-formed markup: tags go unclosed,
// casing is inconsistent, and attribute quoting is optional. Everything here
// is structural pattern extraction over raw text, never a strict parser.

// @const: <SYNC Start=nnnn> opening tag, quoting and casing optional
static SYNC_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)<sync\s+start\s*=\s*"?(\d+)"?[^>]*>"#).unwrap()
});

// @const: <SYNC ...> tag whose start attribute is missing or non-numeric
static BROKEN_SYNC_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)<sync\b[^>]*>").unwrap()
});

// @const: <P Class=XXXX> opening tag
static P_CLASS_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)<p\b[^>]*?class\s*=\s*"?([A-Za-z0-9_-]+)"?[^>]*>"#).unwrap()
});

// @const: Explicit line-break marker
static BR_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<br\s*/?>").unwrap());

// @const: Inline markup other than the formatting tags b/i/u
static DROPPED_TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)</?(?:[a-z][a-z0-9]*)\b[^>]*>").unwrap()
});

// @const: Formatting tags preserved in cue text
static KEPT_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^</?(?:b|i|u)\b[^>]*>$").unwrap());

// @const: Web entity references like &nbsp;
static ENTITY: Lazy<Regex> = Lazy::new(|| Regex::new(r"&[a-zA-Z]{2,6};").unwrap());

/// Default duration of the final cue of a track, which has no following
/// sync boundary to end it
pub const DEFAULT_LAST_CUE_DURATION_MS: u64 = 4000;

/// Parse SMI content into one track per language class found.
///
/// Each `<SYNC Start=nnn>` block carries only a start time; a cue's end time
/// is the start of the next cue in the same language track, and the final
/// cue ends `default_duration_ms` after it starts. Blocks whose body is empty
/// or a lone `&nbsp;` placeholder are kept during parsing (they bound the
/// previous cue's end); the normalizer drops them afterwards.
///
/// Fails with `ParseError::NoLanguageTracksFound` when no sync block with
/// usable content exists.
pub fn parse(content: &str, default_duration_ms: u64) -> Result<ParseOutcome<Vec<Track>>, ParseError> {
    // An empty file is an empty result; only a document with content but no
    // recognizable cues is an error
    if content.trim().is_empty() {
        return Ok(ParseOutcome::clean(Vec::new()));
    }

    let mut diagnostics = Vec::new();
    let raw_cues = scan_sync_blocks(content, &mut diagnostics);

    if raw_cues.is_empty() {
        // No partial result to attach these to, so report them here
        for diag in &diagnostics {
            warn!("{}", diag);
        }
        return Err(ParseError::NoLanguageTracksFound);
    }

    // Group cues per class, preserving document order within each group
    let mut by_class: BTreeMap<String, Vec<RawCue>> = BTreeMap::new();
    for cue in raw_cues {
        by_class.entry(cue.class.clone()).or_default().push(cue);
    }

    let mut tracks = Vec::new();
    for (class, cues) in by_class {
        tracks.push(build_track(&class, cues, default_duration_ms));
    }

    debug!(
        "Parsed SMI document: {} language track(s), {} diagnostic(s)",
        tracks.len(),
        diagnostics.len()
    );

    Ok(ParseOutcome::with_diagnostics(tracks, diagnostics))
}

/// One sync block before end-time resolution
struct RawCue {
    start_ms: u64,
    class: String,
    lines: Vec<String>,
}

/// Scan the document for sync blocks and slice out each block's body
fn scan_sync_blocks(content: &str, diagnostics: &mut Vec<Diagnostic>) -> Vec<RawCue> {
    // Note broken sync tags the strict pattern cannot read, then move on
    for broken in BROKEN_SYNC_TAG.find_iter(content) {
        if !SYNC_TAG.is_match(broken.as_str()) {
            let line = content[..broken.start()].bytes().filter(|b| *b == b'\n').count() + 1;
            diagnostics.push(Diagnostic::at_line(
                DiagnosticKind::MalformedBlock,
                format!("sync tag without a numeric start attribute: {}", broken.as_str()),
                line,
            ));
        }
    }

    // (start time, byte range of the opening tag)
    let matches: Vec<(u64, usize, usize)> = SYNC_TAG
        .captures_iter(content)
        .filter_map(|caps| {
            let start_ms = caps.get(1)?.as_str().parse().ok()?;
            let tag = caps.get(0)?;
            Some((start_ms, tag.start(), tag.end()))
        })
        .collect();

    let mut cues = Vec::new();
    for (i, (start_ms, _, body_start)) in matches.iter().enumerate() {
        let body_end = matches
            .get(i + 1)
            .map(|(_, next_tag_start, _)| *next_tag_start)
            .unwrap_or(content.len());
        let body = &content[*body_start..body_end];

        let class = P_CLASS_TAG
            .captures(body)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_uppercase())
            .unwrap_or_default();

        cues.push(RawCue {
            start_ms: *start_ms,
            class,
            lines: extract_text_lines(body),
        });
    }

    cues
}

/// Turn a sync block body into trimmed text lines.
///
/// `<br>` markers become line breaks; b/i/u formatting tags survive, all
/// other markup and entity references are stripped. An empty or
/// `&nbsp;`-only body yields zero lines.
fn extract_text_lines(body: &str) -> Vec<String> {
    let broken = BR_TAG.replace_all(body, "\n");

    let mut lines: Vec<String> = broken.split('\n').map(clean_line).collect();

    while lines.first().is_some_and(|l| l.is_empty()) {
        lines.remove(0);
    }
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }

    lines
}

fn clean_line(line: &str) -> String {
    let without_tags = DROPPED_TAG.replace_all(line, |caps: &regex::Captures| {
        let tag = caps.get(0).map(|m| m.as_str()).unwrap_or_default();
        if KEPT_TAG.is_match(tag) {
            tag.to_string()
        } else {
            String::new()
        }
    });
    let without_entities = ENTITY.replace_all(&without_tags, "");

    without_entities.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Assemble one language track, resolving end times against the next cue of
/// the same class
fn build_track(class: &str, cues: Vec<RawCue>, default_duration_ms: u64) -> Track {
    let language = if class.is_empty() {
        None
    } else {
        // Unrecognized classes keep the raw name so the track is not lost
        Some(language_utils::language_from_sami_class(class).unwrap_or_else(|| class.to_string()))
    };

    let mut track = Track::new(language.clone());
    let next_starts: Vec<Option<u64>> = (0..cues.len())
        .map(|i| cues.get(i + 1).map(|c| c.start_ms))
        .collect();

    for (i, raw) in cues.into_iter().enumerate() {
        let end_ms = match next_starts[i] {
            Some(next_start) => next_start,
            None => raw.start_ms + default_duration_ms,
        };

        let mut cue = Cue::new(i + 1, TimeRange::new(raw.start_ms, end_ms), raw.lines);
        cue.language = language.clone();
        track.cues.push(cue);
    }

    track
}
