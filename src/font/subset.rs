//! # TrueType Font Subsetter
//!
//! Strips a TrueType font to only the glyphs actually used in the document.
//! A typical font is 50-200KB; a subset with ~100 glyphs is usually a small
//! fraction of that.
//!
//! Glyph IDs are kept as they are in the source font. Dropped glyphs leave
//! zero-length loca entries behind, so content streams, width arrays and
//! the font's own `cmap`/`hmtx` keep addressing the same glyphs.
//!
//! ## Approach
//!
//! 1. Read the table directory (optionally of one collection member)
//! 2. Read `loca` in the format `head` declares
//! 3. Close the requested glyph set over composite references
//! 4. Rebuild `glyf` and `loca`
//! 5. Write the sfnt file with copied tables, checksums and alignment

use std::collections::BTreeSet;
use std::io::{Read, Seek};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::font::assemble::{assemble, TableSelection};
use crate::font::closure::resolve_closure;
use crate::font::directory::{collection_member_offset, read_directory};
use crate::font::glyf::build_glyf;
use crate::font::loca::read_loca;
use crate::font::FontSource;

/// What to keep. Deserializes from camelCase JSON, e.g.
/// `{"glyphs": [3, 7], "includeCmap": true}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SubsetOptions {
    /// Glyph IDs used by the document. `.notdef` is added regardless.
    pub glyphs: BTreeSet<u16>,
    /// Keep `cmap` and `OS/2`.
    pub include_cmap: bool,
    /// Keep `cmap`, `OS/2` and `name`.
    pub include_extras: bool,
    /// Offset of the table directory; 0 for a plain font file.
    pub directory_offset: u32,
    /// Member of a TrueType collection. Overrides `directory_offset`.
    pub collection_index: Option<u32>,
}

impl SubsetOptions {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn selection(&self) -> TableSelection {
        TableSelection {
            include_cmap: self.include_cmap,
            include_extras: self.include_extras,
        }
    }
}

/// Result of subsetting a font.
#[derive(Debug, Clone)]
pub struct SubsetResult {
    /// The subset TrueType file bytes.
    pub ttf_data: Vec<u8>,
    /// Every glyph kept: the request, `.notdef` and composite components.
    pub retained_glyphs: BTreeSet<u16>,
}

/// Subset the font behind `source`.
///
/// The source is consumed; its reader is dropped when this returns, whether
/// or not subsetting succeeded.
pub fn subset<R: Read + Seek>(
    mut source: FontSource<R>,
    options: &SubsetOptions,
) -> Result<SubsetResult> {
    let directory_offset = match options.collection_index {
        Some(index) => collection_member_offset(&mut source, index)?,
        None => options.directory_offset,
    };

    let directory = read_directory(&mut source, directory_offset)?;
    let loca = read_loca(&mut source, &directory)?;
    let closure = resolve_closure(&mut source, &directory, &loca, &options.glyphs)?;
    let rebuilt = build_glyf(&mut source, &directory, &loca, &closure)?;
    let ttf_data = assemble(&mut source, &directory, &rebuilt, options.selection())?;

    Ok(SubsetResult {
        ttf_data,
        retained_glyphs: closure,
    })
}

/// Subset an in-memory font.
pub fn subset_bytes(name: &str, data: &[u8], options: &SubsetOptions) -> Result<SubsetResult> {
    subset(FontSource::from_bytes(name, data), options)
}

/// Subset a font file. The path names the font in errors.
pub fn subset_file(path: impl AsRef<Path>, options: &SubsetOptions) -> Result<SubsetResult> {
    subset(FontSource::open(path)?, options)
}
