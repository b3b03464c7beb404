//! Text to glyph IDs through the font's own `cmap`.
//!
//! Real documents get their glyph IDs from shaping; this covers callers
//! that only have a string, such as the command-line tool.

use std::collections::BTreeSet;

use crate::error::{Result, SubsetError};

/// Glyph IDs for every character of `text` the font maps. Unmapped
/// characters are skipped; `.notdef` is added later by the subsetter.
pub fn glyph_ids_for_text(
    name: &str,
    data: &[u8],
    collection_index: u32,
    text: &str,
) -> Result<BTreeSet<u16>> {
    let face = ttf_parser::Face::parse(data, collection_index).map_err(|e| {
        SubsetError::CorruptFont {
            font: name.to_string(),
            reason: format!("failed to parse face: {}", e),
        }
    })?;

    let mut glyphs = BTreeSet::new();
    for ch in text.chars() {
        match face.glyph_index(ch) {
            Some(gid) => {
                glyphs.insert(gid.0);
            }
            None => log::debug!("{}: no glyph for {:?}", name, ch),
        }
    }
    Ok(glyphs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unparseable_font_is_corrupt() {
        let err = glyph_ids_for_text("junk.ttf", &[0u8; 10], 0, "abc").unwrap_err();
        match err {
            SubsetError::CorruptFont { font, reason } => {
                assert_eq!(font, "junk.ttf");
                assert!(reason.starts_with("failed to parse face"));
            }
            other => panic!("expected CorruptFont, got {:?}", other),
        }
    }
}
