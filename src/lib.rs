//! # sfnt-subset
//!
//! TrueType font subsetting for document embedding.
//!
//! A document usually touches a few hundred glyphs of a font that ships
//! thousands. Before a font program is embedded, this crate strips the
//! `glyf` outlines down to the glyphs actually used (plus `.notdef` and any
//! composite components) and writes a new, independently valid sfnt file.
//!
//! ## Architecture
//!
//! ```text
//! Font bytes + used glyph IDs + table flags
//!       ↓
//!   [font::directory] — sfnt header, table records
//!       ↓
//!   [font::loca]      — glyph offsets
//!       ↓
//!   [font::closure]   — composite dependency closure
//!       ↓
//!   [font::glyf]      — rebuilt glyf/loca
//!       ↓
//!   [font::assemble]  — subset font bytes
//! ```
//!
//! Deciding which glyphs are used (layout, shaping) and embedding the result
//! in a PDF are the caller's business.

pub mod error;
pub mod font;

pub use error::{Result, SubsetError};
pub use font::subset::{subset, subset_bytes, subset_file, SubsetOptions, SubsetResult};
