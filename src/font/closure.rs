//! Glyph closure over composite references.
//!
//! A composite glyph is drawn from other glyphs, so keeping it means keeping
//! its components, and theirs in turn. The closure is computed with an
//! append-only worklist walked by index: a glyph ID is appended only the
//! first time it enters the set, so the walk ends after at most one visit
//! per glyph ID.

use std::collections::BTreeSet;
use std::io::{Read, Seek};

use crate::error::Result;
use crate::font::{FontSource, LocaTable, TableDirectory, GLYF};

pub const ARG_1_AND_2_ARE_WORDS: u16 = 0x0001;
pub const WE_HAVE_A_SCALE: u16 = 0x0008;
pub const MORE_COMPONENTS: u16 = 0x0020;
pub const WE_HAVE_AN_X_AND_Y_SCALE: u16 = 0x0040;
pub const WE_HAVE_A_TWO_BY_TWO: u16 = 0x0080;

/// numberOfContours + xMin/yMin/xMax/yMax
const GLYPH_HEADER_LEN: u32 = 10;
/// flags + glyphIndex
const COMPONENT_HEADER_LEN: u32 = 4;

/// Deduplicated processing queue backed by the glyph set it builds.
#[derive(Debug, Default)]
pub struct GlyphWorklist {
    seen: BTreeSet<u16>,
    queue: Vec<u16>,
    next: usize,
}

impl GlyphWorklist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a glyph unless it has been seen. Returns whether it was new.
    pub fn push(&mut self, glyph: u16) -> bool {
        if self.seen.insert(glyph) {
            self.queue.push(glyph);
            true
        } else {
            false
        }
    }

    /// Next unprocessed glyph, in insertion order.
    pub fn pop(&mut self) -> Option<u16> {
        let glyph = *self.queue.get(self.next)?;
        self.next += 1;
        Some(glyph)
    }

    pub fn into_set(self) -> BTreeSet<u16> {
        self.seen
    }
}

/// Bytes of argument and transform data following a component's glyph ID.
pub fn component_data_len(flags: u16) -> u32 {
    let mut skip = if flags & ARG_1_AND_2_ARE_WORDS != 0 {
        4
    } else {
        2
    };
    if flags & WE_HAVE_A_SCALE != 0 {
        skip += 2;
    } else if flags & WE_HAVE_AN_X_AND_Y_SCALE != 0 {
        skip += 4;
    }
    if flags & WE_HAVE_A_TWO_BY_TWO != 0 {
        skip += 8;
    }
    skip
}

/// Requested glyphs plus `.notdef` plus every glyph reachable through
/// composite references.
pub fn resolve_closure<R: Read + Seek>(
    source: &mut FontSource<R>,
    directory: &TableDirectory,
    loca: &LocaTable,
    requested: &BTreeSet<u16>,
) -> Result<BTreeSet<u16>> {
    let glyf = *directory
        .get(GLYF)
        .ok_or_else(|| source.missing_table(GLYF))?;
    source.check_table(&glyf)?;

    let mut worklist = GlyphWorklist::new();
    for &glyph in requested {
        worklist.push(glyph);
    }
    worklist.push(0);

    while let Some(glyph) = worklist.pop() {
        let (start, end) = loca.span(glyph).ok_or_else(|| {
            source.corrupt(format!(
                "glyph {} is outside the {} glyphs indexed by loca",
                glyph,
                loca.num_glyphs()
            ))
        })?;
        if start == end {
            continue;
        }
        if end < start || end > glyf.length {
            return Err(source.corrupt(format!(
                "glyph {} spans {}..{} in a glyf table of {} bytes",
                glyph, start, end, glyf.length
            )));
        }
        if end - start < 2 {
            return Err(source.corrupt(format!("glyph {} is too short for a header", glyph)));
        }

        source.seek(u64::from(glyf.offset) + u64::from(start))?;
        if source.read_i16()? >= 0 {
            continue;
        }

        let mut pos = start + GLYPH_HEADER_LEN;
        source.skip(GLYPH_HEADER_LEN - 2)?;
        loop {
            if pos + COMPONENT_HEADER_LEN > end {
                return Err(source.corrupt(format!(
                    "composite glyph {} has a component record past its end",
                    glyph
                )));
            }
            let flags = source.read_u16()?;
            let component = source.read_u16()?;
            pos += COMPONENT_HEADER_LEN;

            if worklist.push(component) {
                log::trace!("{}: glyph {} pulls in {}", source.name(), glyph, component);
            }
            if flags & MORE_COMPONENTS == 0 {
                break;
            }

            let skip = component_data_len(flags);
            pos += skip;
            source.skip(skip)?;
        }
    }

    let closure = worklist.into_set();
    log::debug!(
        "{}: {} requested glyphs close over {}",
        source.name(),
        requested.len(),
        closure.len()
    );
    Ok(closure)
}
