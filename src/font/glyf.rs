//! Rebuilding `glyf` and `loca` for a glyph closure.
//!
//! Glyph IDs are not remapped. Every ID keeps its loca entry; glyphs outside
//! the closure become zero-length spans, so `hmtx`, `cmap` and anything
//! else indexed by glyph ID stays valid against the subset.

use std::collections::BTreeSet;
use std::io::{Read, Seek};

use crate::error::Result;
use crate::font::{FontSource, LocaFormat, LocaTable, TableDirectory, GLYF};

/// Largest `glyf` a short loca can index: entries hold offset / 2 as u16.
pub const MAX_SHORT_GLYF_LEN: usize = 0x1FFFE;

/// New `glyf` bytes and the loca table that indexes them.
#[derive(Debug, Clone)]
pub struct RebuiltGlyf {
    /// Outline data padded to a multiple of 4.
    pub glyf: Vec<u8>,
    /// Length of `glyf` before padding.
    pub glyf_len: usize,
    /// Same entry count and format as the source loca.
    pub loca: LocaTable,
}

pub fn build_glyf<R: Read + Seek>(
    source: &mut FontSource<R>,
    directory: &TableDirectory,
    loca: &LocaTable,
    closure: &BTreeSet<u16>,
) -> Result<RebuiltGlyf> {
    let glyf_entry = *directory
        .get(GLYF)
        .ok_or_else(|| source.missing_table(GLYF))?;
    source.check_table(&glyf_entry)?;

    let mut glyf_len = 0usize;
    for &glyph in closure {
        let (start, end) = checked_span(source, loca, glyph, glyf_entry.length)?;
        glyf_len += (end - start) as usize;
    }
    let max_len = match loca.format {
        LocaFormat::Short => MAX_SHORT_GLYF_LEN,
        LocaFormat::Long => u32::MAX as usize,
    };
    if glyf_len > max_len {
        return Err(source.corrupt(format!(
            "kept glyphs need {} bytes of glyf, more than a {:?} loca can index",
            glyf_len, loca.format
        )));
    }
    let mut glyf = vec![0u8; (glyf_len + 3) & !3];

    let mut offsets = Vec::with_capacity(loca.len());
    let mut cursor = 0usize;
    for id in 0..loca.len() {
        offsets.push(cursor as u32);
        let Ok(glyph) = u16::try_from(id) else {
            continue;
        };
        if !closure.contains(&glyph) {
            continue;
        }
        let (start, end) = checked_span(source, loca, glyph, glyf_entry.length)?;
        let len = (end - start) as usize;
        if len > 0 {
            source.seek(u64::from(glyf_entry.offset) + u64::from(start))?;
            source.read_into(&mut glyf[cursor..cursor + len])?;
            cursor += len;
        }
    }

    log::debug!(
        "{}: glyf {} -> {} bytes for {} glyphs",
        source.name(),
        glyf_entry.length,
        glyf_len,
        closure.len()
    );

    Ok(RebuiltGlyf {
        glyf,
        glyf_len,
        loca: LocaTable::new(loca.format, offsets),
    })
}

fn checked_span<R: Read + Seek>(
    source: &FontSource<R>,
    loca: &LocaTable,
    glyph: u16,
    glyf_len: u32,
) -> Result<(u32, u32)> {
    match loca.span(glyph) {
        Some((start, end)) if start <= end && end <= glyf_len => Ok((start, end)),
        Some((start, end)) => Err(source.corrupt(format!(
            "glyph {} spans {}..{} in a glyf table of {} bytes",
            glyph, start, end, glyf_len
        ))),
        None => Err(source.corrupt(format!(
            "glyph {} is outside the {} glyphs indexed by loca",
            glyph,
            loca.num_glyphs()
        ))),
    }
}
