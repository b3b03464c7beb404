//! sfnt header and table directory.

use std::collections::HashMap;
use std::io::{Read, Seek};

use crate::error::Result;
use crate::font::{FontSource, Tag};

/// TrueType outlines version tag.
pub const SFNT_VERSION: u32 = 0x00010000;

const TTC_TAG: Tag = Tag::new(b"ttcf");

/// One table record as stored in the source font.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableEntry {
    pub tag: Tag,
    pub checksum: u32,
    pub offset: u32,
    pub length: u32,
}

/// Table records keyed by tag.
///
/// A font that lists the same tag twice keeps the record read last.
#[derive(Debug, Default, Clone)]
pub struct TableDirectory {
    entries: HashMap<Tag, TableEntry>,
}

impl TableDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record, replacing any earlier record with the same tag.
    pub fn insert(&mut self, entry: TableEntry) -> Option<TableEntry> {
        self.entries.insert(entry.tag, entry)
    }

    pub fn get(&self, tag: Tag) -> Option<&TableEntry> {
        self.entries.get(&tag)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parse the sfnt header and table records starting at `directory_offset`.
///
/// The binary-search fields of the header are skipped; they are recomputed
/// when the subset is written. Record offsets and lengths are not checked
/// against the size of the source.
pub fn read_directory<R: Read + Seek>(
    source: &mut FontSource<R>,
    directory_offset: u32,
) -> Result<TableDirectory> {
    source.seek(u64::from(directory_offset))?;
    if source.read_u32()? != SFNT_VERSION {
        return Err(source.format_error());
    }
    let num_tables = source.read_u16()?;
    source.skip(6)?;

    let mut directory = TableDirectory::new();
    for _ in 0..num_tables {
        let tag = source.read_tag()?;
        let entry = TableEntry {
            tag,
            checksum: source.read_u32()?,
            offset: source.read_u32()?,
            length: source.read_u32()?,
        };
        if let Some(previous) = directory.insert(entry) {
            log::debug!(
                "{}: duplicate '{}' record, offset {} replaced by {}",
                source.name(),
                tag,
                previous.offset,
                entry.offset
            );
        }
    }

    log::debug!(
        "{}: {} table records at offset {}",
        source.name(),
        num_tables,
        directory_offset
    );
    Ok(directory)
}

/// Directory offset of member `index` of a TrueType collection (`ttcf`).
pub fn collection_member_offset<R: Read + Seek>(
    source: &mut FontSource<R>,
    index: u32,
) -> Result<u32> {
    source.seek(0)?;
    if source.read_tag()? != TTC_TAG {
        return Err(source.format_error());
    }
    // majorVersion, minorVersion
    source.skip(4)?;
    let num_fonts = source.read_u32()?;
    if index >= num_fonts {
        return Err(source.corrupt(format!(
            "collection member {} requested but the collection holds {} fonts",
            index, num_fonts
        )));
    }
    source.seek(12 + u64::from(index) * 4)?;
    source.read_u32()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SubsetError;
    use crate::font::{GLYF, HEAD, LOCA};

    fn record(tag: &[u8; 4], checksum: u32, offset: u32, length: u32) -> Vec<u8> {
        let mut data = tag.to_vec();
        data.extend_from_slice(&checksum.to_be_bytes());
        data.extend_from_slice(&offset.to_be_bytes());
        data.extend_from_slice(&length.to_be_bytes());
        data
    }

    fn header(version: u32, records: &[Vec<u8>]) -> Vec<u8> {
        let mut data = version.to_be_bytes().to_vec();
        data.extend_from_slice(&(records.len() as u16).to_be_bytes());
        // Deliberately bogus search fields; the reader must not care.
        data.extend_from_slice(&[0xAB; 6]);
        for r in records {
            data.extend_from_slice(r);
        }
        data
    }

    #[test]
    fn test_reads_records() {
        let data = header(
            SFNT_VERSION,
            &[record(b"head", 1, 100, 54), record(b"glyf", 2, 200, 300)],
        );
        let mut src = FontSource::from_bytes("f", &data);
        let dir = read_directory(&mut src, 0).unwrap();
        assert_eq!(dir.len(), 2);
        let glyf = dir.get(GLYF).unwrap();
        assert_eq!((glyf.tag, glyf.checksum), (GLYF, 2));
        assert_eq!((glyf.offset, glyf.length), (200, 300));
        assert_eq!(dir.get(HEAD).map(|e| e.length), Some(54));
        assert!(dir.get(LOCA).is_none());
    }

    #[test]
    fn test_duplicate_tag_last_wins() {
        let data = header(
            SFNT_VERSION,
            &[record(b"glyf", 1, 100, 10), record(b"glyf", 9, 500, 20)],
        );
        let mut src = FontSource::from_bytes("f", &data);
        let dir = read_directory(&mut src, 0).unwrap();
        assert_eq!(dir.len(), 1);
        let entry = dir.get(GLYF).unwrap();
        assert_eq!((entry.checksum, entry.offset, entry.length), (9, 500, 20));
    }

    #[test]
    fn test_directory_offset() {
        let mut data = vec![0xEE; 40];
        data.extend(header(SFNT_VERSION, &[record(b"loca", 0, 0, 8)]));
        let mut src = FontSource::from_bytes("f", &data);
        let dir = read_directory(&mut src, 40).unwrap();
        assert!(dir.get(LOCA).is_some());
    }

    #[test]
    fn test_rejects_non_truetype_version() {
        for version in [0x4F54544F, 0x74727565, 0x00020000] {
            let data = header(version, &[]);
            let mut src = FontSource::from_bytes("bad.otf", &data);
            match read_directory(&mut src, 0) {
                Err(SubsetError::Format { font }) => assert_eq!(font, "bad.otf"),
                other => panic!("expected Format error, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_truncated_records_are_io_errors() {
        let mut data = header(SFNT_VERSION, &[record(b"head", 0, 0, 0)]);
        data[5] = 3; // claim three records, supply one
        let mut src = FontSource::from_bytes("f", &data);
        assert!(matches!(read_directory(&mut src, 0), Err(SubsetError::Io { .. })));
    }

    fn collection(offsets: &[u32]) -> Vec<u8> {
        let mut data = b"ttcf".to_vec();
        data.extend_from_slice(&1u16.to_be_bytes());
        data.extend_from_slice(&0u16.to_be_bytes());
        data.extend_from_slice(&(offsets.len() as u32).to_be_bytes());
        for o in offsets {
            data.extend_from_slice(&o.to_be_bytes());
        }
        data
    }

    #[test]
    fn test_collection_member_offset() {
        let data = collection(&[20, 400, 9000]);
        let mut src = FontSource::from_bytes("c.ttc", &data);
        assert_eq!(collection_member_offset(&mut src, 0).unwrap(), 20);
        assert_eq!(collection_member_offset(&mut src, 2).unwrap(), 9000);
        assert!(matches!(
            collection_member_offset(&mut src, 3),
            Err(SubsetError::CorruptFont { .. })
        ));
    }

    #[test]
    fn test_collection_requires_ttcf() {
        let data = header(SFNT_VERSION, &[]);
        let mut src = FontSource::from_bytes("f", &data);
        assert!(matches!(
            collection_member_offset(&mut src, 0),
            Err(SubsetError::Format { .. })
        ));
    }
}
