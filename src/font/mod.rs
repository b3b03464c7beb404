//! # Font Subsetting
//!
//! Reading, closing over, and rebuilding TrueType fonts for embedding.
//!
//! The pipeline runs one font per call, each stage consuming the previous
//! stage's output:
//!
//! ```text
//!   [directory] — sfnt header + table records
//!       ↓
//!   [loca]      — glyph offset index (short or long)
//!       ↓
//!   [closure]   — requested glyphs + .notdef + composite components
//!       ↓
//!   [glyf]      — new glyf/loca, glyph-ID space preserved
//!       ↓
//!   [assemble]  — header, directory, padded bodies, checksums
//! ```
//!
//! [`subset`] drives the stages; [`select`] is a small adapter that turns
//! text into glyph IDs for callers without a layout engine.

pub mod assemble;
pub mod closure;
pub mod directory;
pub mod glyf;
pub mod loca;
pub mod select;
pub mod source;
pub mod subset;

use std::fmt;

pub use directory::{TableDirectory, TableEntry};
pub use loca::{LocaFormat, LocaTable};
pub use source::FontSource;

/// A 4-byte sfnt table tag such as `glyf`, `cvt ` or `OS/2`.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Tag(pub [u8; 4]);

impl Tag {
    pub const fn new(bytes: &[u8; 4]) -> Self {
        Tag(*bytes)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.0 {
            if b.is_ascii_graphic() || b == b' ' {
                write!(f, "{}", b as char)?;
            } else {
                write!(f, "\\x{:02x}", b)?;
            }
        }
        Ok(())
    }
}

pub const CVT: Tag = Tag::new(b"cvt ");
pub const FPGM: Tag = Tag::new(b"fpgm");
pub const GLYF: Tag = Tag::new(b"glyf");
pub const HEAD: Tag = Tag::new(b"head");
pub const HHEA: Tag = Tag::new(b"hhea");
pub const HMTX: Tag = Tag::new(b"hmtx");
pub const LOCA: Tag = Tag::new(b"loca");
pub const MAXP: Tag = Tag::new(b"maxp");
pub const PREP: Tag = Tag::new(b"prep");
pub const CMAP: Tag = Tag::new(b"cmap");
pub const OS2: Tag = Tag::new(b"OS/2");
pub const NAME: Tag = Tag::new(b"name");
