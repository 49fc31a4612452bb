/*!
 * Tests for SAMI parsing
 */

use sublearn::smi_parser;
use sublearn::errors::ParseError;
use crate::common;

const DEFAULT_DURATION: u64 = 4000;

/// Test a bilingual document yields one track per language class
#[test]
fn test_parse_withBilingualDocument_shouldYieldTwoTracks() {
    let outcome = smi_parser::parse(common::sample_smi(), DEFAULT_DURATION).unwrap();

    let tracks = outcome.value;
    assert_eq!(tracks.len(), 2);

    let languages: Vec<Option<String>> = tracks.iter().map(|t| t.language.clone()).collect();
    assert!(languages.contains(&Some("en".to_string())));
    assert!(languages.contains(&Some("ko".to_string())));
}

/// Test end times derive from the next cue of the same track
#[test]
fn test_parse_withSequentialCues_shouldDeriveEndTimes() {
    let content = "<SAMI><BODY>\n\
        <SYNC Start=1000><P Class=ENCC>First\n\
        <SYNC Start=5000><P Class=ENCC>Second\n\
        </BODY></SAMI>";
    let outcome = smi_parser::parse(content, DEFAULT_DURATION).unwrap();

    let track = &outcome.value[0];
    assert_eq!(track.cues[0].range.start_ms, 1000);
    assert_eq!(track.cues[0].range.end_ms, 5000);

    // The final cue has no following boundary and gets the default duration
    assert_eq!(track.cues[1].range.start_ms, 5000);
    assert_eq!(track.cues[1].range.end_ms, 5000 + DEFAULT_DURATION);
}

/// Test &nbsp; placeholder blocks bound the previous cue but carry no text
#[test]
fn test_parse_withNbspPlaceholder_shouldBoundPreviousCue() {
    let content = "<SAMI><BODY>\n\
        <SYNC Start=1000><P Class=ENCC>Visible\n\
        <SYNC Start=3000><P Class=ENCC>&nbsp;\n\
        <SYNC Start=6000><P Class=ENCC>Next\n\
        </BODY></SAMI>";
    let outcome = smi_parser::parse(content, DEFAULT_DURATION).unwrap();

    let track = &outcome.value[0];
    assert_eq!(track.cues.len(), 3);
    assert_eq!(track.cues[0].range.end_ms, 3000);
    assert!(track.cues[1].is_empty());
    assert_eq!(track.cues[1].range.end_ms, 6000);
}

/// Test <br> markers become line breaks
#[test]
fn test_parse_withBrMarkers_shouldSplitLines() {
    let content = "<SYNC Start=1000><P Class=ENCC>Line one<br>Line two";
    let outcome = smi_parser::parse(content, DEFAULT_DURATION).unwrap();

    assert_eq!(outcome.value[0].cues[0].lines, vec!["Line one", "Line two"]);
}

/// Test tolerance of unclosed, case-inconsistent and unquoted markup
#[test]
fn test_parse_withSloppyMarkup_shouldStillExtractCues() {
    let content = "<sami><body>\n\
        <sync start=\"1000\"><p class=encc><font color=white>Hello</font>\n\
        <SyNc StArT=2000><P CLASS=ENCC><b>Bold</b> kept\n\
        </body>";
    let outcome = smi_parser::parse(content, DEFAULT_DURATION).unwrap();

    let track = &outcome.value[0];
    assert_eq!(track.cues.len(), 2);
    assert_eq!(track.cues[0].lines, vec!["Hello"]);
    // b/i/u formatting tags survive, other markup is stripped
    assert_eq!(track.cues[1].lines, vec!["<b>Bold</b> kept"]);
}

/// Test a document without recognizable language content fails
#[test]
fn test_parse_withNoSyncBlocks_shouldFailWithNoLanguageTracks() {
    let content = "<SAMI><HEAD><TITLE>Empty</TITLE></HEAD><BODY></BODY></SAMI>";
    let result = smi_parser::parse(content, DEFAULT_DURATION);

    assert!(matches!(result, Err(ParseError::NoLanguageTracksFound)));
}

/// Test an empty file yields no tracks and no diagnostics, not an error
#[test]
fn test_parse_withEmptyContent_shouldYieldNothing() {
    let outcome = smi_parser::parse("", DEFAULT_DURATION).unwrap();
    assert!(outcome.value.is_empty());
    assert!(outcome.diagnostics.is_empty());
}

/// Test a sync tag without a numeric start is reported but not fatal
#[test]
fn test_parse_withBrokenSyncTag_shouldRecordDiagnostic() {
    let content = "<SYNC Start=1000><P Class=ENCC>Good\n\
        <SYNC Start=oops><P Class=ENCC>Bad\n\
        <SYNC Start=5000><P Class=ENCC>Also good";
    let outcome = smi_parser::parse(content, DEFAULT_DURATION).unwrap();

    assert_eq!(outcome.value[0].cues.len(), 2);
    assert_eq!(outcome.diagnostics.len(), 1);
}

/// Test diagnostics still surface as warnings when the whole document fails
#[test]
fn test_parse_withOnlyBrokenSyncTags_shouldReportDiagnosticsBeforeFailing() {
    use std::sync::Mutex;
    use log::{Log, Metadata, Record};

    static CAPTURED: Mutex<Vec<String>> = Mutex::new(Vec::new());

    struct CaptureLogger;

    impl Log for CaptureLogger {
        fn enabled(&self, _: &Metadata) -> bool {
            true
        }
        fn log(&self, record: &Record) {
            CAPTURED.lock().unwrap().push(record.args().to_string());
        }
        fn flush(&self) {}
    }

    static LOGGER: CaptureLogger = CaptureLogger;
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(log::LevelFilter::Warn);

    let content = "<SAMI><BODY>\n\
        <SYNC Start=oops><P Class=ENCC>Bad\n\
        <SYNC><P Class=ENCC>Worse\n\
        </BODY></SAMI>";
    let result = smi_parser::parse(content, DEFAULT_DURATION);

    assert!(matches!(result, Err(ParseError::NoLanguageTracksFound)));

    let captured = CAPTURED.lock().unwrap();
    let reported = captured
        .iter()
        .filter(|m| m.contains("sync tag without a numeric start"))
        .count();
    assert_eq!(reported, 2);
}

/// Test entity references are stripped from cue text
#[test]
fn test_parse_withEntities_shouldStripThem() {
    let content = "<SYNC Start=1000><P Class=ENCC>Fish &amp; chips&nbsp;";
    let outcome = smi_parser::parse(content, DEFAULT_DURATION).unwrap();

    assert_eq!(outcome.value[0].cues[0].lines, vec!["Fish chips"]);
}

/// Test unknown classes keep their raw name as the track tag
#[test]
fn test_parse_withUnknownClass_shouldKeepRawClassName() {
    let content = "<SYNC Start=1000><P Class=XXQQ>Mystery";
    let outcome = smi_parser::parse(content, DEFAULT_DURATION).unwrap();

    assert_eq!(outcome.value[0].language, Some("XXQQ".to_string()));
}
