use log::{warn, debug};

use crate::subtitle_model::{Diagnostic, DiagnosticKind, ParseOutcome, Track};

// @module: Cue normalization
//
// Last stage before a track is handed to consumers: whatever parser produced
// it, the output here is sorted, sequentially indexed, trimmed, and free of
// empty cues. SMI placeholder cues have already served as end-time boundaries
// by the time they are dropped here.

/// Normalize a parsed track into canonical form.
///
/// - sorts cues ascending by start time (stable, so equal starts keep
///   document order)
/// - trims leading/trailing whitespace from each text line
/// - drops cues whose every line is empty
/// - corrects inverted ranges to end = start, recording an
///   `InvalidTimeRange` diagnostic
/// - re-indexes sequentially from 1
///
/// Overlap between consecutive cues of the same track is a data-quality
/// warning, never fatal.
pub fn normalize(track: Track) -> ParseOutcome<Track> {
    let mut diagnostics = Vec::new();
    let language = track.language.clone();
    let mut cues = track.cues;

    cues.sort_by_key(|cue| cue.range.start_ms);

    let mut normalized = Track::new(language);
    for mut cue in cues {
        for line in &mut cue.lines {
            let trimmed = line.trim();
            if trimmed.len() != line.len() {
                *line = trimmed.to_string();
            }
        }

        if cue.is_empty() {
            continue;
        }

        if cue.range.end_ms < cue.range.start_ms {
            diagnostics.push(Diagnostic::new(
                DiagnosticKind::InvalidTimeRange,
                format!(
                    "cue {} ends at {}ms before it starts at {}ms; corrected",
                    cue.index, cue.range.end_ms, cue.range.start_ms
                ),
            ));
            cue.range.end_ms = cue.range.start_ms;
        }

        cue.index = normalized.cues.len() + 1;
        normalized.cues.push(cue);
    }

    let mut overlap_count = 0;
    for window in normalized.cues.windows(2) {
        if window[0].range.end_ms > window[1].range.start_ms {
            overlap_count += 1;
        }
    }
    if overlap_count > 0 {
        warn!("Found {} overlapping cue pair(s) within one track", overlap_count);
        diagnostics.push(Diagnostic::new(
            DiagnosticKind::OverlappingCues,
            format!("{} consecutive cue pair(s) share time", overlap_count),
        ));
    }

    debug!(
        "Normalized track to {} cue(s), {} diagnostic(s)",
        normalized.cues.len(),
        diagnostics.len()
    );

    ParseOutcome::with_diagnostics(normalized, diagnostics)
}
