//! # sfnt Writer
//!
//! Emits the subset font: a 12-byte offset table, one 16-byte directory
//! record per table, then the table bodies, each zero-padded to a 4-byte
//! boundary.
//!
//! Only `glyf` and `loca` are rebuilt and get fresh checksums. Every other
//! table is copied byte for byte from the source together with its recorded
//! checksum and length. `head.checkSumAdjustment` is left as the source
//! has it.

use std::io::{Read, Seek};

use crate::error::Result;
use crate::font::directory::SFNT_VERSION;
use crate::font::glyf::RebuiltGlyf;
use crate::font::{
    FontSource, TableDirectory, Tag, CMAP, CVT, FPGM, GLYF, HEAD, HHEA, HMTX, LOCA, MAXP, NAME,
    OS2, PREP,
};

/// Tables every subset carries when the source has them.
pub const CORE_TABLES: [Tag; 9] = [CVT, FPGM, GLYF, HEAD, HHEA, HMTX, LOCA, MAXP, PREP];
pub const CMAP_TABLES: [Tag; 2] = [CMAP, OS2];
pub const EXTRA_TABLES: [Tag; 3] = [CMAP, OS2, NAME];

const HEADER_LEN: usize = 12;
const RECORD_LEN: usize = 16;

/// Which optional table groups to carry into the subset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TableSelection {
    /// Keep `cmap` and `OS/2`.
    pub include_cmap: bool,
    /// Keep `cmap`, `OS/2` and `name`. Implies `include_cmap`.
    pub include_extras: bool,
}

impl TableSelection {
    /// Tags to emit, in output order. Tags missing from the source are
    /// dropped later, at assembly time.
    pub fn tables(&self) -> Vec<Tag> {
        let mut tags = CORE_TABLES.to_vec();
        if self.include_extras {
            tags.extend_from_slice(&EXTRA_TABLES);
        } else if self.include_cmap {
            tags.extend_from_slice(&CMAP_TABLES);
        }
        tags
    }
}

/// Binary-search hints of the offset table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchParams {
    pub search_range: u16,
    pub entry_selector: u16,
    pub range_shift: u16,
}

/// `entrySelector` is floor(log2(num_tables)); the other two fields follow
/// from it. Zero tables give all zeroes.
pub fn search_params(num_tables: u16) -> SearchParams {
    if num_tables == 0 {
        return SearchParams {
            search_range: 0,
            entry_selector: 0,
            range_shift: 0,
        };
    }
    let entry_selector = (u16::BITS - 1 - num_tables.leading_zeros()) as u16;
    let search_range = (1u32 << entry_selector) * RECORD_LEN as u32;
    let range_shift = u32::from(num_tables) * RECORD_LEN as u32 - search_range;
    SearchParams {
        search_range: search_range as u16,
        entry_selector,
        range_shift: range_shift as u16,
    }
}

/// Wrapping sum of big-endian u32 words.
///
/// Only whole 4-byte groups are summed; a trailing 1-3 byte remainder is
/// ignored rather than zero-extended. Every buffer this crate checksums is
/// already padded to a multiple of 4, where the two readings agree.
pub fn checksum(data: &[u8]) -> u32 {
    data.chunks_exact(4)
        .map(|w| u32::from_be_bytes([w[0], w[1], w[2], w[3]]))
        .fold(0u32, |sum, word| sum.wrapping_add(word))
}

enum Body<'a> {
    Rebuilt(&'a [u8]),
    Source { offset: u32 },
}

struct PlannedTable<'a> {
    tag: Tag,
    checksum: u32,
    length: u32,
    body: Body<'a>,
}

fn padded(len: usize) -> usize {
    (len + 3) & !3
}

/// Write the subset font.
pub fn assemble<R: Read + Seek>(
    source: &mut FontSource<R>,
    directory: &TableDirectory,
    rebuilt: &RebuiltGlyf,
    selection: TableSelection,
) -> Result<Vec<u8>> {
    let (loca_bytes, loca_len) = rebuilt.loca.to_bytes();

    let mut plan: Vec<PlannedTable> = Vec::new();
    for tag in selection.tables() {
        let Some(entry) = directory.get(tag) else {
            log::debug!("{}: no '{}' table, skipped", source.name(), tag);
            continue;
        };
        let planned = match tag {
            GLYF => PlannedTable {
                tag,
                checksum: checksum(&rebuilt.glyf),
                length: rebuilt.glyf_len as u32,
                body: Body::Rebuilt(&rebuilt.glyf),
            },
            LOCA => PlannedTable {
                tag,
                checksum: checksum(&loca_bytes),
                length: loca_len as u32,
                body: Body::Rebuilt(&loca_bytes),
            },
            _ => {
                source.check_table(entry)?;
                PlannedTable {
                    tag,
                    checksum: entry.checksum,
                    length: entry.length,
                    body: Body::Source {
                        offset: entry.offset,
                    },
                }
            }
        };
        plan.push(planned);
    }

    let num_tables = plan.len() as u16;
    let dir_len = HEADER_LEN + plan.len() * RECORD_LEN;
    let total = dir_len + plan.iter().map(|t| padded(t.length as usize)).sum::<usize>();

    let mut output: Vec<u8> = Vec::with_capacity(total);
    let params = search_params(num_tables);
    output.extend_from_slice(&SFNT_VERSION.to_be_bytes());
    output.extend_from_slice(&num_tables.to_be_bytes());
    output.extend_from_slice(&params.search_range.to_be_bytes());
    output.extend_from_slice(&params.entry_selector.to_be_bytes());
    output.extend_from_slice(&params.range_shift.to_be_bytes());

    let mut table_offset = dir_len;
    for table in &plan {
        output.extend_from_slice(&table.tag.0);
        output.extend_from_slice(&table.checksum.to_be_bytes());
        output.extend_from_slice(&(table_offset as u32).to_be_bytes());
        output.extend_from_slice(&table.length.to_be_bytes());
        table_offset += padded(table.length as usize);
    }

    for table in &plan {
        let start = output.len();
        let len = table.length as usize;
        match table.body {
            Body::Rebuilt(bytes) => output.extend_from_slice(&bytes[..len]),
            Body::Source { offset } => {
                output.resize(start + len, 0);
                source.seek(u64::from(offset))?;
                source.read_into(&mut output[start..])?;
            }
        }
        output.resize(start + padded(len), 0);
    }

    log::debug!(
        "{}: wrote {} tables, {} bytes",
        source.name(),
        num_tables,
        output.len()
    );
    Ok(output)
}
