//! Cursor-based access to the font being subset.
//!
//! A [`FontSource`] owns its reader for the duration of one subsetting call.
//! It is moved into [`crate::font::subset::subset`] and dropped when that
//! call returns, so a file handle is closed on error paths as well as on
//! success.

use std::fs::File;
use std::io::{self, BufReader, Cursor, Read, Seek, SeekFrom};
use std::path::Path;

use crate::error::{Result, SubsetError};
use crate::font::{TableEntry, Tag};

pub struct FontSource<R> {
    name: String,
    reader: R,
    len: Option<u64>,
}

impl<'a> FontSource<Cursor<&'a [u8]>> {
    /// Wrap an in-memory font.
    pub fn from_bytes(name: impl Into<String>, data: &'a [u8]) -> Self {
        Self::new(name, Cursor::new(data))
    }
}

impl FontSource<BufReader<File>> {
    /// Open a font file. The path doubles as the font's name in errors.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let name = path.display().to_string();
        match File::open(path) {
            Ok(file) => Ok(Self::new(name, BufReader::new(file))),
            Err(source) => Err(SubsetError::Io { font: name, source }),
        }
    }
}

impl<R: Read + Seek> FontSource<R> {
    pub fn new(name: impl Into<String>, reader: R) -> Self {
        Self {
            name: name.into(),
            reader,
            len: None,
        }
    }

    /// The identifying name carried by every error from this source.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn seek(&mut self, pos: u64) -> Result<()> {
        self.reader
            .seek(SeekFrom::Start(pos))
            .map(|_| ())
            .map_err(|e| self.io_error(e))
    }

    pub fn skip(&mut self, count: u32) -> Result<()> {
        self.reader
            .seek(SeekFrom::Current(i64::from(count)))
            .map(|_| ())
            .map_err(|e| self.io_error(e))
    }

    /// Fill `buf` completely; a short read is an I/O error.
    pub fn read_into(&mut self, buf: &mut [u8]) -> Result<()> {
        self.reader.read_exact(buf).map_err(|e| self.io_error(e))
    }

    /// Total size of the source in bytes. Measured once, then cached; the
    /// read position is left where it was.
    pub fn byte_len(&mut self) -> Result<u64> {
        if let Some(len) = self.len {
            return Ok(len);
        }
        match measure(&mut self.reader) {
            Ok(len) => {
                self.len = Some(len);
                Ok(len)
            }
            Err(e) => Err(self.io_error(e)),
        }
    }

    /// Fail with `CorruptFont` unless the whole table lies inside the source.
    ///
    /// Must pass before any buffer is sized from `entry.length`.
    pub fn check_table(&mut self, entry: &TableEntry) -> Result<()> {
        let len = self.byte_len()?;
        let end = u64::from(entry.offset) + u64::from(entry.length);
        if end > len {
            return Err(self.corrupt(format!(
                "table '{}' spans {}..{} in a source of {} bytes",
                entry.tag, entry.offset, end, len
            )));
        }
        Ok(())
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        let mut buf = [0u8; 2];
        self.read_into(&mut buf)?;
        Ok(u16::from_be_bytes(buf))
    }

    pub fn read_i16(&mut self) -> Result<i16> {
        let mut buf = [0u8; 2];
        self.read_into(&mut buf)?;
        Ok(i16::from_be_bytes(buf))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        let mut buf = [0u8; 4];
        self.read_into(&mut buf)?;
        Ok(u32::from_be_bytes(buf))
    }

    pub fn read_tag(&mut self) -> Result<Tag> {
        let mut buf = [0u8; 4];
        self.read_into(&mut buf)?;
        Ok(Tag(buf))
    }

    pub(crate) fn format_error(&self) -> SubsetError {
        SubsetError::Format {
            font: self.name.clone(),
        }
    }

    pub(crate) fn missing_table(&self, tag: Tag) -> SubsetError {
        SubsetError::MissingTable {
            font: self.name.clone(),
            tag,
        }
    }

    pub(crate) fn corrupt(&self, reason: impl Into<String>) -> SubsetError {
        SubsetError::CorruptFont {
            font: self.name.clone(),
            reason: reason.into(),
        }
    }

    fn io_error(&self, source: io::Error) -> SubsetError {
        SubsetError::Io {
            font: self.name.clone(),
            source,
        }
    }
}

fn measure<S: Seek>(reader: &mut S) -> io::Result<u64> {
    let pos = reader.stream_position()?;
    let end = reader.seek(SeekFrom::End(0))?;
    reader.seek(SeekFrom::Start(pos))?;
    Ok(end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_big_endian() {
        let data = [0x00, 0x01, 0xFF, 0xFE, 0x12, 0x34, 0x56, 0x78, b'g', b'l', b'y', b'f'];
        let mut src = FontSource::from_bytes("mem", &data);
        assert_eq!(src.read_u16().unwrap(), 1);
        assert_eq!(src.read_i16().unwrap(), -2);
        assert_eq!(src.read_u32().unwrap(), 0x12345678);
        assert_eq!(src.read_tag().unwrap(), Tag::new(b"glyf"));
    }

    #[test]
    fn test_seek_and_skip() {
        let data = [0u8, 1, 2, 3, 4, 5, 6, 7];
        let mut src = FontSource::from_bytes("mem", &data);
        src.seek(2).unwrap();
        src.skip(2).unwrap();
        assert_eq!(src.read_u16().unwrap(), 0x0405);
    }

    #[test]
    fn test_len_keeps_position() {
        let data = [0u8, 1, 2, 3, 4, 5, 6, 7, 8, 9];
        let mut src = FontSource::from_bytes("mem", &data);
        src.seek(4).unwrap();
        assert_eq!(src.byte_len().unwrap(), 10);
        assert_eq!(src.read_u16().unwrap(), 0x0405);
    }

    #[test]
    fn test_check_table_bounds() {
        let data = [0u8; 64];
        let mut src = FontSource::from_bytes("small.ttf", &data);
        let entry = |offset, length| TableEntry {
            tag: Tag::new(b"prep"),
            checksum: 0,
            offset,
            length,
        };
        assert!(src.check_table(&entry(0, 64)).is_ok());
        assert!(src.check_table(&entry(60, 4)).is_ok());
        assert!(matches!(
            src.check_table(&entry(60, 5)),
            Err(SubsetError::CorruptFont { .. })
        ));
        match src.check_table(&entry(16, 0xFFFF_FFF0)) {
            Err(SubsetError::CorruptFont { font, reason }) => {
                assert_eq!(font, "small.ttf");
                assert!(reason.contains("'prep'"));
            }
            other => panic!("expected CorruptFont, got {:?}", other),
        }
    }

    #[test]
    fn test_short_read_is_io_error_with_name() {
        let data = [0u8; 3];
        let mut src = FontSource::from_bytes("tiny.ttf", &data);
        match src.read_u32() {
            Err(SubsetError::Io { font, source }) => {
                assert_eq!(font, "tiny.ttf");
                assert_eq!(source.kind(), io::ErrorKind::UnexpectedEof);
            }
            other => panic!("expected Io error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_open_missing_file() {
        let err = FontSource::open("/nonexistent/font.ttf").err().unwrap();
        assert!(matches!(err, SubsetError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/font.ttf"));
    }
}
