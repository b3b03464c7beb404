//! Glyph offset index (`loca`).

use std::io::{Read, Seek};

use crate::error::Result;
use crate::font::{FontSource, TableDirectory, HEAD, LOCA};

/// Byte offset of `indexToLocFormat` inside `head`.
pub const HEAD_LOCA_FORMAT_OFFSET: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocaFormat {
    /// u16 entries holding offset / 2.
    Short,
    /// u32 entries holding the offset.
    Long,
}

impl LocaFormat {
    pub fn from_head_field(value: i16) -> Self {
        if value == 0 {
            LocaFormat::Short
        } else {
            LocaFormat::Long
        }
    }

    pub fn entry_size(self) -> usize {
        match self {
            LocaFormat::Short => 2,
            LocaFormat::Long => 4,
        }
    }
}

/// True byte offsets into `glyf`, one more entry than there are glyphs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaTable {
    pub format: LocaFormat,
    pub offsets: Vec<u32>,
}

impl LocaTable {
    pub fn new(format: LocaFormat, offsets: Vec<u32>) -> Self {
        Self { format, offsets }
    }

    /// Number of entries (glyph count + 1).
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Number of glyph IDs the table can address.
    pub fn num_glyphs(&self) -> usize {
        self.offsets.len().saturating_sub(1)
    }

    /// `[start, end)` of a glyph in `glyf`, or `None` when the ID is out of
    /// range. The span is returned as stored, even if `end < start`.
    pub fn span(&self, glyph: u16) -> Option<(u32, u32)> {
        let idx = glyph as usize;
        let start = *self.offsets.get(idx)?;
        let end = *self.offsets.get(idx + 1)?;
        Some((start, end))
    }

    /// Serialize in this table's format, padded to a multiple of 4.
    /// Returns the buffer and its real (un-padded) length.
    ///
    /// Short offsets must be at most `glyf::MAX_SHORT_GLYF_LEN`, which
    /// `build_glyf` checks before producing a table.
    pub fn to_bytes(&self) -> (Vec<u8>, usize) {
        let real_len = self.offsets.len() * self.format.entry_size();
        let mut data = Vec::with_capacity((real_len + 3) & !3);
        match self.format {
            LocaFormat::Short => {
                for &offset in &self.offsets {
                    data.extend_from_slice(&((offset / 2) as u16).to_be_bytes());
                }
            }
            LocaFormat::Long => {
                for &offset in &self.offsets {
                    data.extend_from_slice(&offset.to_be_bytes());
                }
            }
        }
        data.resize((real_len + 3) & !3, 0);
        (data, real_len)
    }
}

/// Read `loca` using the format selected by `head.indexToLocFormat`.
pub fn read_loca<R: Read + Seek>(
    source: &mut FontSource<R>,
    directory: &TableDirectory,
) -> Result<LocaTable> {
    let head = *directory
        .get(HEAD)
        .ok_or_else(|| source.missing_table(HEAD))?;
    source.check_table(&head)?;
    if head.length < HEAD_LOCA_FORMAT_OFFSET + 2 {
        return Err(source.corrupt(format!(
            "head is {} bytes, too short for indexToLocFormat",
            head.length
        )));
    }
    source.seek(u64::from(head.offset) + u64::from(HEAD_LOCA_FORMAT_OFFSET))?;
    let format = LocaFormat::from_head_field(source.read_i16()?);

    let loca = *directory
        .get(LOCA)
        .ok_or_else(|| source.missing_table(LOCA))?;
    source.check_table(&loca)?;
    source.seek(u64::from(loca.offset))?;

    let count = loca.length as usize / format.entry_size();
    let mut offsets = Vec::with_capacity(count);
    for _ in 0..count {
        let offset = match format {
            LocaFormat::Short => u32::from(source.read_u16()?) * 2,
            LocaFormat::Long => source.read_u32()?,
        };
        offsets.push(offset);
    }

    log::debug!(
        "{}: {:?} loca with {} entries",
        source.name(),
        format,
        offsets.len()
    );
    Ok(LocaTable::new(format, offsets))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SubsetError;
    use crate::font::TableEntry;

    fn entry(tag: crate::font::Tag, offset: u32, length: u32) -> TableEntry {
        TableEntry {
            tag,
            checksum: 0,
            offset,
            length,
        }
    }

    /// `head` at 0 (54 bytes), `loca` right after.
    fn font_with_loca(format_field: i16, loca: &[u8]) -> (Vec<u8>, TableDirectory) {
        let mut data = vec![0u8; 54];
        data[50..52].copy_from_slice(&format_field.to_be_bytes());
        data.extend_from_slice(loca);
        let mut dir = TableDirectory::new();
        dir.insert(entry(HEAD, 0, 54));
        dir.insert(entry(LOCA, 54, loca.len() as u32));
        (data, dir)
    }

    #[test]
    fn test_short_entries_are_doubled() {
        let loca: Vec<u8> = [0u16, 10, 10, 25].iter().flat_map(|v| v.to_be_bytes()).collect();
        let (data, dir) = font_with_loca(0, &loca);
        let mut src = FontSource::from_bytes("f", &data);
        let table = read_loca(&mut src, &dir).unwrap();
        assert_eq!(table.format, LocaFormat::Short);
        assert_eq!(table.offsets, vec![0, 20, 20, 50]);
        assert_eq!(table.num_glyphs(), 3);
        assert_eq!(table.span(1), Some((20, 20)));
        assert_eq!(table.span(3), None);
    }

    #[test]
    fn test_long_entries() {
        let loca: Vec<u8> = [0u32, 12, 140_000].iter().flat_map(|v| v.to_be_bytes()).collect();
        let (data, dir) = font_with_loca(1, &loca);
        let mut src = FontSource::from_bytes("f", &data);
        let table = read_loca(&mut src, &dir).unwrap();
        assert_eq!(table.format, LocaFormat::Long);
        assert_eq!(table.offsets, vec![0, 12, 140_000]);
    }

    #[test]
    fn test_any_nonzero_format_is_long() {
        assert_eq!(LocaFormat::from_head_field(0), LocaFormat::Short);
        assert_eq!(LocaFormat::from_head_field(1), LocaFormat::Long);
        assert_eq!(LocaFormat::from_head_field(-3), LocaFormat::Long);
    }

    #[test]
    fn test_missing_head_and_loca() {
        let data = vec![0u8; 64];
        let mut src = FontSource::from_bytes("x.ttf", &data);

        let mut dir = TableDirectory::new();
        dir.insert(entry(LOCA, 0, 8));
        match read_loca(&mut src, &dir) {
            Err(SubsetError::MissingTable { tag, font }) => {
                assert_eq!(tag, HEAD);
                assert_eq!(font, "x.ttf");
            }
            other => panic!("expected missing head, got {:?}", other),
        }

        let mut dir = TableDirectory::new();
        dir.insert(entry(HEAD, 0, 54));
        match read_loca(&mut src, &dir) {
            Err(SubsetError::MissingTable { tag, .. }) => assert_eq!(tag, LOCA),
            other => panic!("expected missing loca, got {:?}", other),
        }
    }

    #[test]
    fn test_to_bytes_short() {
        let table = LocaTable::new(LocaFormat::Short, vec![0, 100, 200, 300]);
        let (data, real_len) = table.to_bytes();
        assert_eq!(real_len, 8);
        assert_eq!(data, vec![0, 0, 0, 50, 0, 100, 0, 150]);
    }

    #[test]
    fn test_to_bytes_short_pads_odd_entry_count() {
        let table = LocaTable::new(LocaFormat::Short, vec![0, 4, 8]);
        let (data, real_len) = table.to_bytes();
        assert_eq!(real_len, 6);
        assert_eq!(data.len(), 8);
        assert_eq!(&data[6..], &[0, 0]);
    }

    #[test]
    fn test_to_bytes_long() {
        let table = LocaTable::new(LocaFormat::Long, vec![0, 100, 200, 300]);
        let (data, real_len) = table.to_bytes();
        assert_eq!(real_len, 16);
        assert_eq!(&data[12..16], &300u32.to_be_bytes());
    }
}
