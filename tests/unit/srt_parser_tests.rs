/*!
 * Tests for SubRip parsing
 */

use sublearn::srt_parser;
use sublearn::subtitle_model::{DiagnosticKind, TimeRange};
use crate::common;

/// Test timestamp parsing and formatting round-trip
#[test]
fn test_timestamp_parsing_withValidTimestamp_shouldParseAndFormat() {
    let ts = "01:23:45,678";
    let ms = TimeRange::parse_timestamp(ts).unwrap();
    assert_eq!(ms, 5025678);

    let formatted = TimeRange::format_timestamp(ms);
    assert_eq!(formatted, ts);
}

/// Test timestamp parsing rejects out-of-range components
#[test]
fn test_timestamp_parsing_withInvalidComponents_shouldFail() {
    assert!(TimeRange::parse_timestamp("00:61:00,000").is_err());
    assert!(TimeRange::parse_timestamp("00:00:61,000").is_err());
    assert!(TimeRange::parse_timestamp("not a timestamp").is_err());
}

/// Test basic parsing of a well-formed document
#[test]
fn test_parse_withWellFormedContent_shouldYieldAllCues() {
    let outcome = srt_parser::parse(common::sample_srt());

    assert!(outcome.diagnostics.is_empty());
    let track = outcome.value;
    assert_eq!(track.len(), 3);
    assert_eq!(track.cues[0].range, TimeRange::new(1000, 4000));
    assert_eq!(track.cues[0].lines, vec!["This is a test subtitle."]);
    assert_eq!(track.cues[2].range, TimeRange::new(10000, 14000));
}

/// Test the documented example timestamps
#[test]
fn test_parse_withTwoBlocks_shouldYieldExactMilliseconds() {
    let content = "1\n00:00:01,000 --> 00:00:03,000\nHello\n\n2\n00:00:04,500 --> 00:00:06,000\nWorld\n";
    let outcome = srt_parser::parse(content);

    let track = outcome.value;
    assert_eq!(track.len(), 2);
    assert_eq!(track.cues[0].range.start_ms, 1000);
    assert_eq!(track.cues[0].range.end_ms, 3000);
    assert_eq!(track.cues[1].range.start_ms, 4500);
    assert_eq!(track.cues[1].range.end_ms, 6000);
}

/// Test multi-line cue text is kept as separate lines
#[test]
fn test_parse_withMultiLineCue_shouldPreserveLineBreaks() {
    let content = "1\n00:00:01,000 --> 00:00:02,000\nFirst line\nSecond line\n";
    let outcome = srt_parser::parse(content);

    assert_eq!(outcome.value.cues[0].lines, vec!["First line", "Second line"]);
}

/// Test file indices are recorded but positions drive numbering
#[test]
fn test_parse_withUntrustworthyIndices_shouldRenumberByPosition() {
    let content = "7\n00:00:01,000 --> 00:00:02,000\nA\n\n3\n00:00:03,000 --> 00:00:04,000\nB\n";
    let outcome = srt_parser::parse(content);

    let track = outcome.value;
    assert_eq!(track.cues[0].index, 1);
    assert_eq!(track.cues[0].source_index, Some(7));
    assert_eq!(track.cues[1].index, 2);
    assert_eq!(track.cues[1].source_index, Some(3));
}

/// Test a block without a timestamp line is skipped, not fatal
#[test]
fn test_parse_withMalformedBlock_shouldSkipAndContinue() {
    let content = "1\nthis block has no timestamp\n\n2\n00:00:03,000 --> 00:00:04,000\nStill here\n";
    let outcome = srt_parser::parse(content);

    assert_eq!(outcome.value.len(), 1);
    assert_eq!(outcome.value.cues[0].lines, vec!["Still here"]);
    assert_eq!(outcome.diagnostics.len(), 1);
    assert_eq!(outcome.diagnostics[0].kind, DiagnosticKind::MalformedBlock);
}

/// Test an empty file yields an empty track with zero diagnostics
#[test]
fn test_parse_withEmptyContent_shouldYieldEmptyTrack() {
    let outcome = srt_parser::parse("");
    assert!(outcome.value.is_empty());
    assert!(outcome.diagnostics.is_empty());

    let outcome = srt_parser::parse("\n\n   \n");
    assert!(outcome.value.is_empty());
    assert!(outcome.diagnostics.is_empty());
}

/// Test extra blank lines between blocks are tolerated
#[test]
fn test_parse_withExtraBlankLines_shouldParseAllBlocks() {
    let content = "1\n00:00:01,000 --> 00:00:02,000\nA\n\n\n\n2\n00:00:03,000 --> 00:00:04,000\nB\n\n";
    let outcome = srt_parser::parse(content);

    assert_eq!(outcome.value.len(), 2);
    assert!(outcome.diagnostics.is_empty());
}

/// Test trailing positional annotations on the timestamp line are ignored
#[test]
fn test_parse_withPositionAnnotations_shouldIgnoreThem() {
    let content = "1\n00:00:20,000 --> 00:00:22,000  X1:40 X2:600 Y1:20 Y2:50\nPositioned\n";
    let outcome = srt_parser::parse(content);

    assert_eq!(outcome.value.len(), 1);
    assert_eq!(outcome.value.cues[0].range, TimeRange::new(20000, 22000));
}

/// Test parse then serialize preserves count, order and timestamps
#[test]
fn test_roundtrip_withWellFormedContent_shouldPreserveCuesExactly() {
    let original = srt_parser::parse(common::sample_srt()).value;
    let serialized = original.to_srt();
    let reparsed = srt_parser::parse(&serialized).value;

    assert_eq!(original.len(), reparsed.len());
    for (a, b) in original.cues.iter().zip(reparsed.cues.iter()) {
        assert_eq!(a.index, b.index);
        assert_eq!(a.range, b.range);
        assert_eq!(a.lines, b.lines);
    }
}
