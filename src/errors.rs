/*!
 * Error types for the sublearn application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 *
 * Recoverable per-cue problems are deliberately NOT errors: they accumulate as
 * `subtitle_model::Diagnostic` values next to the partial result, so a file with
 * a handful of broken blocks still yields every block that parsed.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort processing of a single subtitle file
#[derive(Error, Debug)]
pub enum ParseError {
    /// Neither the file extension nor the content matched a known format
    #[error("Unsupported subtitle format: {0}")]
    UnsupportedFormat(String),

    /// An SMI document contained no language-tagged cue content at all
    #[error("No language tracks found in SMI document")]
    NoLanguageTracksFound,
}

/// Errors that can occur during bilingual alignment
#[derive(Error, Debug)]
pub enum AlignError {
    /// One of the two tracks to align is missing
    #[error("Missing {0} track for alignment")]
    MissingTrack(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from subtitle parsing
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Error from alignment
    #[error("Align error: {0}")]
    Align(#[from] AlignError),

    /// Input path does not exist or has the wrong type
    #[error("Invalid input path: {0:?}")]
    InvalidInput(PathBuf),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
