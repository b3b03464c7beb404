//! Structured error types for the subsetter.
//!
//! Every variant is fatal: the pipeline aborts and no partial font is
//! returned. Font-level variants carry the font's identifying name (usually
//! the file path) so callers embedding many fonts can tell which one failed.

use std::io;

use crate::font::Tag;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SubsetError>;

/// The unified error type returned by all public subsetting functions.
#[derive(Debug, thiserror::Error)]
pub enum SubsetError {
    /// The leading version tag is not the TrueType magic `0x00010000`
    /// (or, for collections, not `ttcf`).
    #[error("{font} is not a TrueType file")]
    Format { font: String },

    /// A table the pipeline cannot work without is absent.
    #[error("table '{tag}' does not exist in {font}")]
    MissingTable { font: String, tag: Tag },

    /// Declared offsets or glyph records point outside the data they
    /// describe.
    #[error("corrupt font {font}: {reason}")]
    CorruptFont { font: String, reason: String },

    /// Seek/read failure on the underlying source, including truncation.
    #[error("failed to read {font}: {source}")]
    Io {
        font: String,
        #[source]
        source: io::Error,
    },

    /// Subset options (JSON) failed to parse.
    #[error("failed to parse subset options: {source}{}", format_hint(.hint))]
    Config {
        #[source]
        source: serde_json::Error,
        hint: String,
    },
}

fn format_hint(hint: &str) -> String {
    if hint.is_empty() {
        String::new()
    } else {
        format!("\n  Hint: {}", hint)
    }
}

impl From<serde_json::Error> for SubsetError {
    fn from(e: serde_json::Error) -> Self {
        let hint = match e.classify() {
            serde_json::error::Category::Syntax => {
                "Check for trailing commas, missing quotes, or unescaped characters.".to_string()
            }
            serde_json::error::Category::Data => {
                "The JSON is valid but doesn't match the options schema. Expected keys: glyphs, includeCmap, includeExtras, directoryOffset, collectionIndex.".to_string()
            }
            serde_json::error::Category::Eof => {
                "Unexpected end of input. Is the JSON truncated?".to_string()
            }
            serde_json::error::Category::Io => String::new(),
        };
        SubsetError::Config { source: e, hint }
    }
}
