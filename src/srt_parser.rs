use once_cell::sync::Lazy;
use regex::Regex;
use log::{warn, debug};

use crate::subtitle_model::{Cue, Diagnostic, DiagnosticKind, ParseOutcome, TimeRange, Track};

// @module: SubRip (.srt) parsing

// @const: SRT timestamp line regex, strict on separators and field widths.
// Trailing annotations after the end timestamp (e.g. "X1:40 Y1:20") are ignored.
static TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{2}):(\d{2}):(\d{2}),(\d{3})\s*-->\s*(\d{2}):(\d{2}):(\d{2}),(\d{3})").unwrap()
});

/// Parse SRT content into a track plus per-block diagnostics.
///
/// Blocks are separated by blank lines: an index line, a timestamp line and
/// one or more text lines. Indices found in the file are not trusted for
/// ordering; cues are renumbered by file position and the raw index is kept
/// in `source_index` for diagnostics. A block without a parseable timestamp
/// line is skipped with a `MalformedBlock` diagnostic and parsing continues.
/// An empty file yields an empty track with zero diagnostics.
pub fn parse(content: &str) -> ParseOutcome<Track> {
    let mut track = Track::new(None);
    let mut diagnostics = Vec::new();

    for block in split_blocks(content) {
        match parse_block(&block) {
            Ok(Some((source_index, range, lines))) => {
                let mut cue = Cue::new(track.cues.len() + 1, range, lines);
                cue.source_index = source_index;
                track.cues.push(cue);
            }
            Ok(None) => {
                // Stray index-only remnant, nothing worth reporting
            }
            Err(diag) => {
                warn!("Skipping SRT block: {}", diag);
                diagnostics.push(diag);
            }
        }
    }

    debug!(
        "Parsed {} SRT cues, {} blocks skipped",
        track.cues.len(),
        diagnostics.len()
    );

    ParseOutcome::with_diagnostics(track, diagnostics)
}

/// One raw block: its lines and the 1-based line number of its first line
struct RawBlock {
    lines: Vec<String>,
    first_line: usize,
}

/// Split content into blank-line-separated blocks, tolerating any amount of
/// blank padding between them
fn split_blocks(content: &str) -> Vec<RawBlock> {
    let mut blocks = Vec::new();
    let mut current: Vec<String> = Vec::new();
    let mut current_start = 0;

    for (line_no, raw_line) in content.lines().enumerate() {
        let line = raw_line.trim_end();
        if line.trim().is_empty() {
            if !current.is_empty() {
                blocks.push(RawBlock {
                    lines: std::mem::take(&mut current),
                    first_line: current_start,
                });
            }
        } else {
            if current.is_empty() {
                current_start = line_no + 1;
            }
            current.push(line.to_string());
        }
    }

    if !current.is_empty() {
        blocks.push(RawBlock {
            lines: current,
            first_line: current_start,
        });
    }

    blocks
}

type ParsedBlock = (Option<usize>, TimeRange, Vec<String>);

/// Parse one block into (source index, range, text lines).
///
/// Returns Ok(None) for a block that is only a dangling index line, and a
/// `MalformedBlock` diagnostic when the timestamp line is missing or broken.
fn parse_block(block: &RawBlock) -> Result<Option<ParsedBlock>, Diagnostic> {
    let mut lines = block.lines.iter();

    // split_blocks never emits an empty block
    let Some(first) = lines.next() else {
        return Ok(None);
    };
    let mut source_index = None;
    let timestamp_line;

    if let Ok(idx) = first.trim().parse::<usize>() {
        source_index = Some(idx);
        match lines.next() {
            Some(line) => timestamp_line = line,
            // A lone trailing index with no timestamp is common at EOF
            None => return Ok(None),
        }
    } else {
        timestamp_line = first;
    }

    let caps = TIMESTAMP_REGEX.captures(timestamp_line.trim()).ok_or_else(|| {
        Diagnostic::at_line(
            DiagnosticKind::MalformedBlock,
            format!("expected timestamp line, got: {}", timestamp_line.trim()),
            block.first_line,
        )
    })?;

    let start_ms = timestamp_to_ms(&caps, 1);
    let end_ms = timestamp_to_ms(&caps, 5);

    let text: Vec<String> = lines.map(|l| l.to_string()).collect();
    if text.is_empty() {
        return Err(Diagnostic::at_line(
            DiagnosticKind::MalformedBlock,
            "block has a timestamp but no text lines".to_string(),
            block.first_line,
        ));
    }

    Ok(Some((source_index, TimeRange::new(start_ms, end_ms), text)))
}

/// Convert four consecutive capture groups to milliseconds
fn timestamp_to_ms(caps: &regex::Captures, start_idx: usize) -> u64 {
    let field = |i: usize| -> u64 {
        caps.get(start_idx + i)
            .map_or(0, |m| m.as_str().parse().unwrap_or(0))
    };

    ((field(0) * 60 + field(1)) * 60 + field(2)) * 1000 + field(3)
}
