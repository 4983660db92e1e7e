use crate::endian::Endian;
use crate::error::{Error, Result};
use crate::section::ELF64_SHDR_SIZE;
use crate::source::ByteSource;
use std::io::{Read, Seek};

pub const EI_NIDENT: usize = 16;
pub const EI_CLASS: usize = 4;
pub const EI_DATA: usize = 5;
pub const EI_VERSION: usize = 6;

pub const ELFMAG: [u8; 4] = [0x7f, b'E', b'L', b'F'];
pub const ELFCLASS32: u8 = 1;
pub const ELFCLASS64: u8 = 2;
pub const ELFDATA2LSB: u8 = 1;
pub const ELFDATA2MSB: u8 = 2;
pub const EV_CURRENT: u8 = 1;

/// Size of the ELF64 file header.
pub const ELF64_EHDR_SIZE: usize = 64;

/// ELF64 file header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FileHeader {
    pub e_ident: [u8; EI_NIDENT],
    pub e_type: u16,
    pub e_machine: u16,
    pub e_version: u32,
    pub e_entry: u64,
    pub e_phoff: u64,
    pub e_shoff: u64,
    pub e_flags: u32,
    pub e_ehsize: u16,
    pub e_phentsize: u16,
    pub e_phnum: u16,
    /// Size of one section header table entry. Entries are read at this
    /// stride even when it is larger than [`ELF64_SHDR_SIZE`].
    pub e_shentsize: u16,
    pub e_shnum: u16,
    /// Index of the section holding section names.
    pub e_shstrndx: u16,
}

impl FileHeader {
    /// Reads and validates the header at offset 0 of `source`.
    pub fn decode<R: Read + Seek>(source: &mut ByteSource<R>) -> Result<FileHeader> {
        let mut buf = [0u8; ELF64_EHDR_SIZE];
        source.read_at(0, &mut buf)?;
        let header = FileHeader::parse(&buf)?;
        header.validate()?;
        debug!(
            "ELF64 header: type {} machine {} {} sections at {:#x}",
            header.e_type, header.e_machine, header.e_shnum, header.e_shoff
        );
        Ok(header)
    }

    /// Decodes the raw header bytes. Only the identification block is
    /// checked here; [`FileHeader::decode`] also checks the table geometry.
    pub fn parse(buf: &[u8; ELF64_EHDR_SIZE]) -> Result<FileHeader> {
        if buf[..4] != ELFMAG {
            return Err(Error::InvalidFormat("missing ELF magic number".to_string()));
        }
        match buf[EI_CLASS] {
            ELFCLASS64 => {}
            ELFCLASS32 => return Err(Error::InvalidFormat("32-bit ELF files are not supported".to_string())),
            class => return Err(Error::InvalidFormat(format!("unknown ELF class {}", class))),
        }
        let endian = match buf[EI_DATA] {
            ELFDATA2LSB => Endian::Little,
            ELFDATA2MSB => Endian::Big,
            data => return Err(Error::InvalidFormat(format!("unknown data encoding {}", data))),
        };
        if buf[EI_VERSION] != EV_CURRENT {
            return Err(Error::InvalidFormat(format!("unknown ELF version {}", buf[EI_VERSION])));
        }

        let mut e_ident = [0u8; EI_NIDENT];
        e_ident.copy_from_slice(&buf[..EI_NIDENT]);
        Ok(FileHeader {
            e_ident,
            e_type: endian.read_u16(&buf[16..]),
            e_machine: endian.read_u16(&buf[18..]),
            e_version: endian.read_u32(&buf[20..]),
            e_entry: endian.read_u64(&buf[24..]),
            e_phoff: endian.read_u64(&buf[32..]),
            e_shoff: endian.read_u64(&buf[40..]),
            e_flags: endian.read_u32(&buf[48..]),
            e_ehsize: endian.read_u16(&buf[52..]),
            e_phentsize: endian.read_u16(&buf[54..]),
            e_phnum: endian.read_u16(&buf[56..]),
            e_shentsize: endian.read_u16(&buf[58..]),
            e_shnum: endian.read_u16(&buf[60..]),
            e_shstrndx: endian.read_u16(&buf[62..]),
        })
    }

    pub fn encode(&self) -> [u8; ELF64_EHDR_SIZE] {
        let endian = self.endian();
        let mut buf = [0u8; ELF64_EHDR_SIZE];
        buf[..EI_NIDENT].copy_from_slice(&self.e_ident);
        endian.write_u16(&mut buf[16..], self.e_type);
        endian.write_u16(&mut buf[18..], self.e_machine);
        endian.write_u32(&mut buf[20..], self.e_version);
        endian.write_u64(&mut buf[24..], self.e_entry);
        endian.write_u64(&mut buf[32..], self.e_phoff);
        endian.write_u64(&mut buf[40..], self.e_shoff);
        endian.write_u32(&mut buf[48..], self.e_flags);
        endian.write_u16(&mut buf[52..], self.e_ehsize);
        endian.write_u16(&mut buf[54..], self.e_phentsize);
        endian.write_u16(&mut buf[56..], self.e_phnum);
        endian.write_u16(&mut buf[58..], self.e_shentsize);
        endian.write_u16(&mut buf[60..], self.e_shnum);
        endian.write_u16(&mut buf[62..], self.e_shstrndx);
        buf
    }

    pub fn endian(&self) -> Endian {
        if self.e_ident[EI_DATA] == ELFDATA2MSB {
            Endian::Big
        } else {
            Endian::Little
        }
    }

    /// Byte offset of section header `index`, or `None` on overflow.
    pub fn section_header_offset(&self, index: u16) -> Option<u64> {
        u64::from(index).checked_mul(u64::from(self.e_shentsize))?.checked_add(self.e_shoff)
    }

    fn validate(&self) -> Result<()> {
        // A file without a section header table is well-formed; the
        // lookups that need one report it.
        if self.e_shnum == 0 {
            return Ok(());
        }
        if usize::from(self.e_shentsize) < ELF64_SHDR_SIZE {
            return Err(Error::InvalidFormat(format!("section header entry size {} too small", self.e_shentsize)));
        }
        if self.e_shstrndx >= self.e_shnum {
            return Err(Error::InvalidFormat(format!(
                "section name table index {} out of range, file has {} sections",
                self.e_shstrndx, self.e_shnum
            )));
        }
        Ok(())
    }
}
