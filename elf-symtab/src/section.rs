use crate::endian::Endian;
use crate::error::{Error, Result};
use crate::header::FileHeader;
use crate::source::ByteSource;
use crate::strtab::StringTable;
use bytes::Bytes;
use std::io::{Read, Seek};

/// Size of an ELF64 section header.
pub const ELF64_SHDR_SIZE: usize = 64;

pub const SHT_NULL: u32 = 0;
pub const SHT_PROGBITS: u32 = 1;
pub const SHT_SYMTAB: u32 = 2;
pub const SHT_STRTAB: u32 = 3;
pub const SHT_NOBITS: u32 = 8;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SectionHeader {
    /// Offset of the section name in the section name table.
    pub sh_name: u32,
    pub sh_type: u32,
    pub sh_flags: u64,
    pub sh_addr: u64,
    pub sh_offset: u64,
    pub sh_size: u64,
    pub sh_link: u32,
    pub sh_info: u32,
    pub sh_addralign: u64,
    pub sh_entsize: u64,
}

impl SectionHeader {
    pub fn decode(buf: &[u8; ELF64_SHDR_SIZE], endian: Endian) -> SectionHeader {
        SectionHeader {
            sh_name: endian.read_u32(&buf[0..]),
            sh_type: endian.read_u32(&buf[4..]),
            sh_flags: endian.read_u64(&buf[8..]),
            sh_addr: endian.read_u64(&buf[16..]),
            sh_offset: endian.read_u64(&buf[24..]),
            sh_size: endian.read_u64(&buf[32..]),
            sh_link: endian.read_u32(&buf[40..]),
            sh_info: endian.read_u32(&buf[44..]),
            sh_addralign: endian.read_u64(&buf[48..]),
            sh_entsize: endian.read_u64(&buf[56..]),
        }
    }

    /// Reads section header `index` of the table described by `file_header`.
    pub fn read<R: Read + Seek>(
        source: &mut ByteSource<R>,
        file_header: &FileHeader,
        index: u16,
    ) -> Result<SectionHeader> {
        if index >= file_header.e_shnum {
            return Err(Error::IndexOutOfRange { index, count: file_header.e_shnum });
        }
        let offset = file_header
            .section_header_offset(index)
            .ok_or_else(|| Error::truncated(file_header.e_shoff, ELF64_SHDR_SIZE as u64, source.len()))?;
        let mut buf = [0u8; ELF64_SHDR_SIZE];
        source.read_at(offset, &mut buf)?;
        Ok(SectionHeader::decode(&buf, file_header.endian()))
    }
}

/// Loads the file contents of a section. `SHT_NOBITS` sections occupy no
/// space in the file and load as empty.
pub fn load_section<R: Read + Seek>(source: &mut ByteSource<R>, section: &SectionHeader) -> Result<Bytes> {
    if section.sh_type == SHT_NOBITS {
        return Ok(Bytes::new());
    }
    let data = source.read_vec_at(section.sh_offset, section.sh_size)?;
    Ok(Bytes::from(data))
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NamedSection {
    pub index: u16,
    /// Display form of the name; unresolvable names show as the corrupt sentinel.
    pub name: String,
    pub header: SectionHeader,
}

/// Walks the section header table in on-disk order, pairing each header
/// with its name from the section name table.
pub struct Sections<'a, R> {
    source: &'a mut ByteSource<R>,
    file_header: &'a FileHeader,
    shstrtab: &'a StringTable,
    next: u16,
}

impl<'a, R: Read + Seek> Sections<'a, R> {
    pub fn new(source: &'a mut ByteSource<R>, file_header: &'a FileHeader, shstrtab: &'a StringTable) -> Self {
        Sections { source, file_header, shstrtab, next: 0 }
    }
}

impl<'a, R: Read + Seek> Iterator for Sections<'a, R> {
    type Item = Result<NamedSection>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.file_header.e_shnum {
            return None;
        }
        let index = self.next;
        match SectionHeader::read(self.source, self.file_header, index) {
            Ok(header) => {
                self.next += 1;
                let name = self.shstrtab.resolve(header.sh_name).into_owned();
                Some(Ok(NamedSection { index, name, header }))
            }
            Err(err) => {
                // The rest of the table is unreadable.
                self.next = self.file_header.e_shnum;
                Some(Err(err))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = usize::from(self.file_header.e_shnum.saturating_sub(self.next));
        (0, Some(remaining))
    }
}

/// Returns the first section, in on-disk order, whose name is exactly `name`.
pub fn find_section_by_name<R: Read + Seek>(
    source: &mut ByteSource<R>,
    file_header: &FileHeader,
    shstrtab: &StringTable,
    name: &str,
) -> Result<SectionHeader> {
    for section in Sections::new(source, file_header, shstrtab) {
        let section = section?;
        trace!("section [{}] {}", section.index, section.name);
        if shstrtab.get_bytes(section.header.sh_name) == Some(name.as_bytes()) {
            debug!("found {} at index {}", name, section.index);
            return Ok(section.header);
        }
    }
    Err(Error::SectionNotFound { name: name.to_string() })
}
