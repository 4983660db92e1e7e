#![allow(dead_code)]

use bytes::{BufMut, BytesMut};
use elf_symtab::{ByteSource, SHT_NULL, SHT_STRTAB, SHT_SYMTAB};
use std::io::Cursor;

pub struct Section {
    name: String,
    sh_type: u32,
    data: Vec<u8>,
    size: Option<u64>,
}

/// Assembles an ELF64 image: header, section contents, then the section
/// header table. Index 0 is the null section and `.shstrtab` is appended
/// last.
pub struct ElfBuilder {
    big_endian: bool,
    sections: Vec<Section>,
    shstrndx: Option<u16>,
}

impl ElfBuilder {
    pub fn new() -> Self {
        ElfBuilder { big_endian: false, sections: vec![], shstrndx: None }
    }

    pub fn big_endian(mut self) -> Self {
        self.big_endian = true;
        self
    }

    pub fn section(mut self, name: &str, sh_type: u32, data: Vec<u8>) -> Self {
        self.sections.push(Section { name: name.to_string(), sh_type, data, size: None });
        self
    }

    /// Like `section`, but declares `size` in the header regardless of the
    /// bytes actually stored.
    pub fn section_with_size(mut self, name: &str, sh_type: u32, data: Vec<u8>, size: u64) -> Self {
        self.sections.push(Section { name: name.to_string(), sh_type, data, size: Some(size) });
        self
    }

    pub fn symtab(self, symbols: &[(u32, u64, u64)]) -> Self {
        let big_endian = self.big_endian;
        let mut data = BytesMut::new();
        for &(name, value, size) in symbols {
            put_symbol(&mut data, big_endian, name, value, size);
        }
        self.section(".symtab", SHT_SYMTAB, data.to_vec())
    }

    pub fn strtab(self, names: &[&str]) -> Self {
        self.section(".strtab", SHT_STRTAB, string_table(names).0)
    }

    pub fn shstrndx(mut self, index: u16) -> Self {
        self.shstrndx = Some(index);
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut names: Vec<&str> = self.sections.iter().map(|s| s.name.as_str()).collect();
        names.push(".shstrtab");
        let (shstrtab, name_offsets) = string_table(&names);

        let mut contents = BytesMut::new();
        let mut headers = vec![(0u32, SHT_NULL, 0u64, 0u64)];
        for (section, &name) in self.sections.iter().zip(name_offsets.iter()) {
            let offset = 64 + contents.len() as u64;
            contents.extend_from_slice(&section.data);
            headers.push((name, section.sh_type, offset, section.size.unwrap_or(section.data.len() as u64)));
        }
        let offset = 64 + contents.len() as u64;
        contents.extend_from_slice(&shstrtab);
        headers.push((name_offsets[name_offsets.len() - 1], SHT_STRTAB, offset, shstrtab.len() as u64));
        while contents.len() % 8 != 0 {
            contents.put_u8(0);
        }

        let be = self.big_endian;
        let shoff = 64 + contents.len() as u64;
        let shnum = headers.len() as u16;
        let shstrndx = self.shstrndx.unwrap_or(shnum - 1);

        let mut elf = BytesMut::new();
        elf.extend_from_slice(&[
            0x7f,
            0x45,
            0x4c,
            0x46,
            0x02,
            if be { 0x02 } else { 0x01 },
            0x01,
            0x00,
            0x00,
            0x00,
            0x00,
            0x00,
            0x00,
            0x00,
            0x00,
            0x00,
        ]);
        // Type: REL
        put_u16(&mut elf, be, 1);
        // Machine: x86-64
        put_u16(&mut elf, be, 62);
        // Version
        put_u32(&mut elf, be, 1);
        // Entry
        put_u64(&mut elf, be, 0x401000);
        // Program header offset
        put_u64(&mut elf, be, 0);
        put_u64(&mut elf, be, shoff);
        // Flags
        put_u32(&mut elf, be, 0);
        // Header size
        put_u16(&mut elf, be, 64);
        // Program header entry size and count
        put_u16(&mut elf, be, 56);
        put_u16(&mut elf, be, 0);
        // Section header entry size
        put_u16(&mut elf, be, 64);
        put_u16(&mut elf, be, shnum);
        put_u16(&mut elf, be, shstrndx);
        assert!(elf.len() == 64);

        elf.extend_from_slice(&contents);
        for (name, sh_type, offset, size) in headers {
            put_u32(&mut elf, be, name);
            put_u32(&mut elf, be, sh_type);
            // Flags
            put_u64(&mut elf, be, 0);
            // Address
            put_u64(&mut elf, be, 0);
            put_u64(&mut elf, be, offset);
            put_u64(&mut elf, be, size);
            // Link
            put_u32(&mut elf, be, 0);
            // Info
            put_u32(&mut elf, be, 0);
            // Align
            put_u64(&mut elf, be, 1);
            // Entry size
            put_u64(&mut elf, be, if sh_type == SHT_SYMTAB { 24 } else { 0 });
        }
        elf.to_vec()
    }

    pub fn source(&self) -> ByteSource<Cursor<Vec<u8>>> {
        ByteSource::new(Cursor::new(self.build())).unwrap()
    }
}

/// Builds a string table holding `names` after the leading null byte.
/// Returns the table and the offset of each name.
pub fn string_table(names: &[&str]) -> (Vec<u8>, Vec<u32>) {
    let mut data = vec![0u8];
    let mut offsets = vec![];
    for name in names {
        offsets.push(data.len() as u32);
        data.extend_from_slice(name.as_bytes());
        data.push(0);
    }
    (data, offsets)
}

pub fn put_symbol(buf: &mut BytesMut, be: bool, name: u32, value: u64, size: u64) {
    put_u32(buf, be, name);
    // Info: GLOBAL FUNC
    buf.put_u8(0x12);
    // Other
    buf.put_u8(0);
    // Section index
    put_u16(buf, be, 1);
    put_u64(buf, be, value);
    put_u64(buf, be, size);
}

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn source_from(data: Vec<u8>) -> ByteSource<Cursor<Vec<u8>>> {
    ByteSource::new(Cursor::new(data)).unwrap()
}

fn put_u16(buf: &mut BytesMut, be: bool, n: u16) {
    if be {
        buf.put_u16(n)
    } else {
        buf.put_u16_le(n)
    }
}

fn put_u32(buf: &mut BytesMut, be: bool, n: u32) {
    if be {
        buf.put_u32(n)
    } else {
        buf.put_u32_le(n)
    }
}

fn put_u64(buf: &mut BytesMut, be: bool, n: u64) {
    if be {
        buf.put_u64(n)
    } else {
        buf.put_u64_le(n)
    }
}
