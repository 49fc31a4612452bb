// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Result, Context};
use log::{info, LevelFilter, Log, Metadata, Record, Level, SetLoggerError};
use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};
use clap::{Parser, ValueEnum, CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use crate::app_config::Config;
use app_controller::Controller;

mod aligner;
mod app_config;
mod app_controller;
mod errors;
mod file_utils;
mod format_detector;
mod language_utils;
mod normalizer;
mod smi_parser;
mod srt_parser;
mod subtitle_model;

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

fn to_level_filter(level: &app_config::LogLevel) -> LevelFilter {
    match level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Align two subtitle files into a merged bilingual SRT (default command)
    Align(AlignArgs),

    /// Convert a subtitle file (typically .smi) to .srt, one file per language track
    Convert(ConvertArgs),

    /// Generate shell completions for sublearn
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct AlignArgs {
    /// Primary subtitle file (the language being learned) or a directory to pair up
    #[arg(value_name = "PRIMARY")]
    primary: PathBuf,

    /// Secondary subtitle file (native language); omitted in directory mode
    #[arg(value_name = "SECONDARY")]
    secondary: Option<PathBuf>,

    /// Output file path (defaults to <primary>.aligned.srt)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Primary language code (e.g. 'en')
    #[arg(short, long)]
    primary_language: Option<String>,

    /// Secondary language code (e.g. 'ko')
    #[arg(short, long)]
    secondary_language: Option<String>,

    /// Minimum overlap fraction of the shorter cue for two cues to pair
    #[arg(long)]
    min_overlap_ratio: Option<f64>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

#[derive(Parser, Debug)]
struct ConvertArgs {
    /// Input subtitle file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output directory (defaults to the input file's directory)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// sublearn - Subtitle parsing and bilingual alignment
///
/// Parses .srt and .smi subtitle files and aligns two language tracks into
/// paired cues for language study.
#[derive(Parser, Debug)]
#[command(name = "sublearn")]
#[command(version = "1.0.0")]
#[command(about = "Bilingual subtitle alignment tool")]
#[command(long_about = "sublearn parses .srt and .smi subtitle files, normalizes them into one
canonical representation, and aligns two language tracks by temporal overlap.

EXAMPLES:
    sublearn movie.en.srt movie.ko.smi            # Align two subtitle files
    sublearn -o study.srt movie.en.srt movie.ko.srt
    sublearn /subtitles/                          # Pair and align a directory
    sublearn convert movie.smi                    # SMI to SRT, one file per language
    sublearn --log-level debug movie.en.srt movie.ko.srt
    sublearn completions bash > sublearn.bash     # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default
    one will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Primary subtitle file or directory to process
    #[arg(value_name = "PRIMARY")]
    primary: Option<PathBuf>,

    /// Secondary subtitle file
    #[arg(value_name = "SECONDARY")]
    secondary: Option<PathBuf>,

    /// Output file path
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Force overwrite of existing output files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Primary language code (e.g. 'en')
    #[arg(short, long)]
    primary_language: Option<String>,

    /// Secondary language code (e.g. 'ko')
    #[arg(short, long)]
    secondary_language: Option<String>,

    /// Minimum overlap fraction of the shorter cue for two cues to pair
    #[arg(long)]
    min_overlap_ratio: Option<f64>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color code for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S%.3f");
            let color = Self::color_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {} {}\x1B[0m", color, now, record.level(), record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // The level is updated after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "sublearn", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Align(args)) => run_align(args),
        Some(Commands::Convert(args)) => run_convert(args),
        None => {
            // Default behavior - use top-level args for backwards compatibility
            let primary = cli.primary.ok_or_else(|| {
                anyhow::anyhow!("PRIMARY is required when no subcommand is specified")
            })?;

            run_align(AlignArgs {
                primary,
                secondary: cli.secondary,
                output: cli.output,
                force_overwrite: cli.force_overwrite,
                primary_language: cli.primary_language,
                secondary_language: cli.secondary_language,
                min_overlap_ratio: cli.min_overlap_ratio,
                config_path: cli.config_path,
                log_level: cli.log_level,
            })
        }
    }
}

/// Load the configuration file, creating a default one when absent, and
/// apply CLI overrides
fn load_config(
    config_path: &str,
    log_level: &Option<CliLogLevel>,
    apply_overrides: impl FnOnce(&mut Config),
) -> Result<Config> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = log_level {
        let config_log_level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(to_level_filter(&config_log_level));
    }

    let mut config = if Path::new(config_path).exists() {
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;

        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", config_path))?
    } else {
        info!("Config file not found at '{}', creating default config.", config_path);

        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;

        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;

        config
    };

    if let Some(cmd_log_level) = log_level {
        config.log_level = cmd_log_level.clone().into();
    }

    apply_overrides(&mut config);

    config.validate().context("Configuration validation failed")?;

    // If log level was not set via command line, update it from config now
    if log_level.is_none() {
        log::set_max_level(to_level_filter(&config.log_level));
    }

    Ok(config)
}

fn run_align(options: AlignArgs) -> Result<()> {
    let config = load_config(&options.config_path, &options.log_level, |config| {
        if let Some(lang) = &options.primary_language {
            config.primary_language = lang.clone();
        }
        if let Some(lang) = &options.secondary_language {
            config.secondary_language = lang.clone();
        }
        if let Some(ratio) = options.min_overlap_ratio {
            config.alignment.min_overlap_ratio = ratio;
        }
    })?;

    let controller = Controller::with_config(config)?;

    if options.primary.is_dir() {
        if options.secondary.is_some() {
            return Err(anyhow::anyhow!(
                "SECONDARY cannot be combined with a directory PRIMARY"
            ));
        }
        controller.run_folder(&options.primary, options.force_overwrite)?;
        return Ok(());
    }

    let secondary = options.secondary.ok_or_else(|| {
        anyhow::anyhow!("SECONDARY subtitle file is required when PRIMARY is a file")
    })?;

    controller.run_align(
        &options.primary,
        &secondary,
        options.output,
        options.force_overwrite,
    )?;

    Ok(())
}

fn run_convert(options: ConvertArgs) -> Result<()> {
    let config = load_config(&options.config_path, &options.log_level, |_| {})?;

    let controller = Controller::with_config(config)?;
    let written = controller.run_convert(&options.input, options.output_dir, options.force_overwrite)?;

    info!("Converted {:?} into {} file(s)", options.input, written.len());

    Ok(())
}
