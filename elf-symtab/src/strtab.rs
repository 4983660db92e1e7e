use crate::error::Result;
use crate::section::{load_section, SectionHeader};
use crate::source::ByteSource;
use bytes::Bytes;
use std::borrow::Cow;
use std::io::{Read, Seek};

/// Stands in for a name whose offset is out of range or unterminated.
pub const CORRUPT_NAME: &str = "<corrupt>";

/// Contents of a string table section: names stored as null-terminated
/// strings and referenced by byte offset.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StringTable {
    data: Bytes,
}

impl StringTable {
    pub fn new<B: Into<Bytes>>(data: B) -> Self {
        StringTable { data: data.into() }
    }

    pub fn load<R: Read + Seek>(source: &mut ByteSource<R>, section: &SectionHeader) -> Result<StringTable> {
        Ok(StringTable { data: load_section(source, section)? })
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Raw name bytes at `offset`, without the terminator.
    pub fn get_bytes(&self, offset: u32) -> Option<&[u8]> {
        let start = usize::try_from(offset).ok()?;
        let tail = self.data.get(start..)?;
        let end = tail.iter().position(|&b| b == 0)?;
        Some(&tail[..end])
    }

    pub fn get(&self, offset: u32) -> Option<Cow<'_, str>> {
        self.get_bytes(offset).map(String::from_utf8_lossy)
    }

    /// Like [`StringTable::get`], but yields [`CORRUPT_NAME`] instead of
    /// failing.
    pub fn resolve(&self, offset: u32) -> Cow<'_, str> {
        match self.get(offset) {
            Some(name) => name,
            None => {
                debug!("corrupt name at offset {} of {}-byte string table", offset, self.data.len());
                Cow::Borrowed(CORRUPT_NAME)
            }
        }
    }
}
