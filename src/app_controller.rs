use anyhow::{Result, anyhow};
use log::{error, warn, info, debug};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::aligner::{self, AlignConfig};
use crate::app_config::Config;
use crate::errors::AlignError;
use crate::file_utils::FileManager;
use crate::format_detector::{self, SubtitleFormat};
use crate::language_utils;
use crate::normalizer;
use crate::smi_parser;
use crate::srt_parser;
use crate::subtitle_model::{AlignedPair, Diagnostic, ParseOutcome, Track};

// @module: Application controller for subtitle parsing and alignment

/// Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,
}

impl Controller {
    /// Create a new controller for test purposes with default configuration
    pub fn new_for_test() -> Result<Self> {
        Self::with_config(Config::default())
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Check if the controller is properly initialized with configuration
    pub fn is_initialized(&self) -> bool {
        !self.config.primary_language.is_empty() && !self.config.secondary_language.is_empty()
    }

    /// Parse one subtitle file into normalized tracks.
    ///
    /// SRT yields a single track; SMI yields one track per language class.
    /// Recoverable diagnostics from parsing and normalization are logged and
    /// returned beside the tracks; only `UnsupportedFormat` and
    /// `NoLanguageTracksFound` abort the file.
    pub fn load_tracks(&self, path: &Path) -> Result<ParseOutcome<Vec<Track>>> {
        if !FileManager::file_exists(path) {
            return Err(anyhow!("Input file does not exist: {:?}", path));
        }

        let content = FileManager::read_subtitle_text(path)?;
        let format = format_detector::detect_format(Some(path), &content)?;
        debug!("Parsing {:?} as {}", path, format);

        let parsed: ParseOutcome<Vec<Track>> = match format {
            SubtitleFormat::Srt => srt_parser::parse(&content).map(|track| vec![track]),
            SubtitleFormat::Smi => smi_parser::parse(&content, self.config.smi.default_duration_ms)?,
        };

        let mut diagnostics = parsed.diagnostics;
        let mut tracks = Vec::new();
        for track in parsed.value {
            let normalized = normalizer::normalize(track);
            diagnostics.extend(normalized.diagnostics);
            tracks.push(normalized.value);
        }

        Self::log_diagnostics(path, &diagnostics);

        Ok(ParseOutcome::with_diagnostics(tracks, diagnostics))
    }

    /// Align two subtitle files into a merged bilingual SRT file.
    ///
    /// Returns the path of the written file.
    pub fn run_align(
        &self,
        primary_file: &Path,
        secondary_file: &Path,
        output_path: Option<PathBuf>,
        force_overwrite: bool,
    ) -> Result<PathBuf> {
        let output_path = output_path.unwrap_or_else(|| {
            let dir = primary_file.parent().unwrap_or(Path::new("."));
            FileManager::generate_output_path(primary_file, dir, "aligned", "srt")
        });

        if output_path.exists() && !force_overwrite {
            warn!(
                "Skipping, output already exists (use -f to force overwrite): {:?}",
                output_path
            );
            return Ok(output_path);
        }

        let primary = self.pick_track(primary_file, "primary", &self.config.primary_language)?;
        let secondary =
            self.pick_track(secondary_file, "secondary", &self.config.secondary_language)?;

        let align_config = AlignConfig {
            min_overlap_ratio: self.config.alignment.min_overlap_ratio,
        };
        let pairs = aligner::align(&primary, &secondary, &align_config);

        let matched = pairs.iter().filter(|p| p.is_matched()).count();
        info!(
            "Aligned {} primary and {} secondary cue(s): {} matched pair(s), {} one-sided",
            primary.len(),
            secondary.len(),
            matched,
            pairs.len() - matched
        );

        FileManager::write_text(&output_path, &Self::render_aligned_srt(&pairs))?;
        info!("Wrote aligned subtitles to {:?}", output_path);

        Ok(output_path)
    }

    /// Convert a subtitle file to SRT, one output file per language track.
    ///
    /// Mostly useful for SMI inputs; running it on an SRT file re-serializes
    /// the normalized track. Returns the written paths.
    pub fn run_convert(
        &self,
        input_file: &Path,
        output_dir: Option<PathBuf>,
        force_overwrite: bool,
    ) -> Result<Vec<PathBuf>> {
        let output_dir = output_dir
            .unwrap_or_else(|| input_file.parent().unwrap_or(Path::new(".")).to_path_buf());
        FileManager::ensure_dir(&output_dir)?;

        let tracks = self.load_tracks(input_file)?.value;
        if tracks.is_empty() {
            warn!("No cues found in {:?}, nothing to convert", input_file);
            return Ok(Vec::new());
        }

        let mut written = Vec::new();
        for track in &tracks {
            let suffix = track.language.as_deref().unwrap_or("");
            let output_path =
                FileManager::generate_output_path(input_file, &output_dir, suffix, "srt");

            if output_path.exists() && !force_overwrite {
                warn!(
                    "Skipping, output already exists (use -f to force overwrite): {:?}",
                    output_path
                );
                continue;
            }

            FileManager::write_text(&output_path, &track.to_srt())?;
            info!("Wrote {} cue(s) to {:?}", track.len(), output_path);
            written.push(output_path);
        }

        Ok(written)
    }

    /// Process a directory: pair primary/secondary subtitle files by shared
    /// stem and align each pair.
    pub fn run_folder(&self, input_dir: &Path, force_overwrite: bool) -> Result<usize> {
        if !FileManager::dir_exists(input_dir) {
            return Err(anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        let files = FileManager::find_subtitle_files(input_dir)?;
        info!("Found {} subtitle file(s) under {:?}", files.len(), input_dir);

        // base stem -> (primary candidate, secondary candidate)
        let mut groups: BTreeMap<String, (Option<PathBuf>, Option<PathBuf>)> = BTreeMap::new();

        for file in files {
            let Some((base, token)) = Self::split_language_token(&file) else {
                debug!("No language token in file name, skipping: {:?}", file);
                continue;
            };

            let slot = groups.entry(base).or_default();
            if Self::token_matches_language(&token, &self.config.primary_language) {
                slot.0 = Some(file);
            } else if Self::token_matches_language(&token, &self.config.secondary_language) {
                slot.1 = Some(file);
            } else {
                debug!("Language token {:?} matches neither configured language: {:?}", token, file);
            }
        }

        let mut aligned_count = 0;
        for (base, pair) in groups {
            match pair {
                (Some(primary), Some(secondary)) => {
                    info!("Aligning pair for {:?}", base);
                    match self.run_align(&primary, &secondary, None, force_overwrite) {
                        Ok(_) => aligned_count += 1,
                        Err(e) => error!("Failed to align {:?}: {}", base, e),
                    }
                }
                (Some(only), None) | (None, Some(only)) => {
                    warn!("No counterpart subtitle found for {:?}", only);
                }
                (None, None) => {}
            }
        }

        info!("Finished, aligned {} pair(s)", aligned_count);
        Ok(aligned_count)
    }

    /// Serialize aligned pairs as a merged SRT document: each block carries
    /// the overlap window, primary lines first, then secondary lines.
    pub fn render_aligned_srt(pairs: &[AlignedPair]) -> String {
        let mut out = String::new();
        let mut index = 1;

        for pair in pairs {
            out.push_str(&format!("{}\n{}\n", index, pair.overlap));
            if let Some(primary) = &pair.primary {
                for line in &primary.lines {
                    out.push_str(line);
                    out.push('\n');
                }
            }
            if let Some(secondary) = &pair.secondary {
                for line in &secondary.lines {
                    out.push_str(line);
                    out.push('\n');
                }
            }
            out.push('\n');
            index += 1;
        }

        out
    }

    /// Load a file and pick the track matching the wanted language.
    ///
    /// Single-track files are used as-is; multi-track files (SMI) prefer a
    /// language match and fall back to the first track with a warning. A file
    /// with no tracks at all fails with `MissingTrack` naming the role.
    fn pick_track(&self, path: &Path, role: &str, wanted_language: &str) -> Result<Track> {
        let mut tracks = self.load_tracks(path)?.value;

        if tracks.len() > 1 {
            if let Some(track) = tracks.iter().find(|t| {
                t.language
                    .as_deref()
                    .is_some_and(|l| language_utils::language_codes_match(l, wanted_language))
            }) {
                return Ok(track.clone());
            }

            warn!(
                "No track in {:?} matches language {:?}, using the first of {} track(s)",
                path,
                wanted_language,
                tracks.len()
            );
        }

        if tracks.is_empty() {
            return Err(AlignError::MissingTrack(role.to_string()).into());
        }
        Ok(tracks.swap_remove(0))
    }

    fn log_diagnostics(path: &Path, diagnostics: &[Diagnostic]) {
        for diag in diagnostics {
            warn!("{:?}: {}", path, diag);
        }
    }

    /// Split a file stem into (base, trailing language token).
    ///
    /// Recognizes `movie.en.srt` and `Movie_English.srt` style names; the
    /// token is whatever follows the last `.`, `_` or `-` in the stem.
    fn split_language_token(path: &Path) -> Option<(String, String)> {
        let stem = path.file_stem()?.to_string_lossy().to_string();
        let split_at = stem.rfind(['.', '_', '-'])?;
        let (base, token) = stem.split_at(split_at);
        let token = &token[1..];

        if base.is_empty() || token.is_empty() {
            return None;
        }

        Some((
            path.parent().unwrap_or(Path::new("")).join(base).to_string_lossy().to_string(),
            token.to_string(),
        ))
    }

    /// Check whether a file-name token designates a language, either as an
    /// ISO code ("en", "eng") or a full name ("English")
    fn token_matches_language(token: &str, language_code: &str) -> bool {
        if language_utils::language_codes_match(token, language_code) {
            return true;
        }

        if let Ok(name) = language_utils::get_language_name(language_code) {
            return token.eq_ignore_ascii_case(&name);
        }

        false
    }
}
