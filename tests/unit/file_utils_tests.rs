/*!
 * Tests for file and folder related functionality
 */

use std::path::PathBuf;
use anyhow::Result;
use sublearn::file_utils::FileManager;
use crate::common;

/// Test file existence check
#[test]
fn test_file_exists_withRealAndMissingFiles_shouldReport() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    let file = common::create_test_file(&dir, "a.srt", common::sample_srt())?;

    assert!(FileManager::file_exists(&file));
    assert!(!FileManager::file_exists(dir.join("missing.srt")));
    assert!(!FileManager::file_exists(&dir));

    Ok(())
}

/// Test BOM stripping when reading subtitle text
#[test]
fn test_read_subtitle_text_withBom_shouldStripIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    let content = format!("\u{feff}{}", common::sample_srt());
    let file = common::create_test_file(&dir, "bom.srt", &content)?;

    let text = FileManager::read_subtitle_text(&file)?;
    assert!(!text.starts_with('\u{feff}'));
    assert!(text.starts_with("1\n"));

    Ok(())
}

/// Test invalid UTF-8 bytes are replaced rather than refused
#[test]
fn test_read_subtitle_text_withInvalidUtf8_shouldNotFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let file = temp_dir.path().join("legacy.srt");
    std::fs::write(&file, b"1\n00:00:01,000 --> 00:00:02,000\n\xFF\xFEbroken\n")?;

    let text = FileManager::read_subtitle_text(&file)?;
    assert!(text.contains("broken"));

    Ok(())
}

/// Test subtitle file discovery filters by extension
#[test]
fn test_find_subtitle_files_withMixedContent_shouldFindSubtitlesOnly() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dir = temp_dir.path().to_path_buf();
    common::create_test_file(&dir, "a.srt", "x")?;
    common::create_test_file(&dir, "b.smi", "x")?;
    common::create_test_file(&dir, "c.SAMI", "x")?;
    common::create_test_file(&dir, "notes.txt", "x")?;
    common::create_test_file(&dir, "movie.mkv", "x")?;

    let found = FileManager::find_subtitle_files(&dir)?;
    assert_eq!(found.len(), 3);

    Ok(())
}

/// Test output path derivation
#[test]
fn test_generate_output_path_withSuffix_shouldComposeFilename() {
    let path = FileManager::generate_output_path(
        PathBuf::from("/videos/movie.smi"),
        PathBuf::from("/out"),
        "ko",
        "srt",
    );
    assert_eq!(path, PathBuf::from("/out/movie.ko.srt"));

    let path = FileManager::generate_output_path(
        PathBuf::from("movie.smi"),
        PathBuf::from("."),
        "",
        "srt",
    );
    assert_eq!(path, PathBuf::from("./movie.srt"));
}

/// Test writing creates missing parent directories
#[test]
fn test_write_text_withMissingParents_shouldCreateThem() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let nested = temp_dir.path().join("a").join("b").join("out.srt");

    FileManager::write_text(&nested, "content")?;
    assert_eq!(std::fs::read_to_string(&nested)?, "content");

    Ok(())
}
