use crate::endian::Endian;
use crate::error::{Error, Result};
use crate::section::{load_section, SectionHeader};
use crate::source::ByteSource;
use crate::strtab::StringTable;
use std::fmt;
use std::io::{Read, Seek};
use std::slice;

/// Size of an ELF64 symbol table entry.
pub const ELF64_SYM_SIZE: usize = 24;

/// One raw symbol table entry. `st_info`, `st_other` and `st_shndx` are
/// carried as-is.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SymbolRecord {
    pub st_name: u32,
    pub st_info: u8,
    pub st_other: u8,
    pub st_shndx: u16,
    pub st_value: u64,
    pub st_size: u64,
}

impl SymbolRecord {
    pub fn decode(buf: &[u8; ELF64_SYM_SIZE], endian: Endian) -> SymbolRecord {
        SymbolRecord {
            st_name: endian.read_u32(&buf[0..]),
            st_info: buf[4],
            st_other: buf[5],
            st_shndx: endian.read_u16(&buf[6..]),
            st_value: endian.read_u64(&buf[8..]),
            st_size: endian.read_u64(&buf[16..]),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Symbol {
    pub name: String,
    pub record: SymbolRecord,
}

impl Symbol {
    pub fn value(&self) -> u64 {
        self.record.st_value
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x} {}", self.record.st_value, self.name)
    }
}

/// Symbols of a `.symtab` section in table order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
    trailing_bytes: u64,
}

impl SymbolTable {
    pub fn read<R: Read + Seek>(
        source: &mut ByteSource<R>,
        symtab: &SectionHeader,
        strtab: &SectionHeader,
        endian: Endian,
    ) -> Result<SymbolTable> {
        let symtab_data = load_section(source, symtab)?;
        let strtab = StringTable::load(source, strtab)?;
        Ok(SymbolTable::parse(&symtab_data, &strtab, endian))
    }

    /// Decodes every whole record in `data`. Leftover bytes that do not form
    /// a record are counted, not decoded.
    pub fn parse(data: &[u8], strtab: &StringTable, endian: Endian) -> SymbolTable {
        let chunks = data.chunks_exact(ELF64_SYM_SIZE);
        let trailing_bytes = chunks.remainder().len() as u64;
        if trailing_bytes != 0 {
            warn!(
                "symbol table size {} is not a multiple of {}, ignoring {} trailing bytes",
                data.len(),
                ELF64_SYM_SIZE,
                trailing_bytes
            );
        }
        let mut symbols = Vec::with_capacity(data.len() / ELF64_SYM_SIZE);
        for chunk in chunks {
            let mut buf = [0u8; ELF64_SYM_SIZE];
            buf.copy_from_slice(chunk);
            let record = SymbolRecord::decode(&buf, endian);
            let name = strtab.resolve(record.st_name).into_owned();
            symbols.push(Symbol { name, record });
        }
        debug!("decoded {} symbols", symbols.len());
        SymbolTable { symbols, trailing_bytes }
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn iter(&self) -> slice::Iter<'_, Symbol> {
        self.symbols.iter()
    }

    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    pub fn trailing_bytes(&self) -> u64 {
        self.trailing_bytes
    }

    pub fn is_malformed(&self) -> bool {
        self.trailing_bytes != 0
    }

    /// Fails with [`Error::MalformedTableSize`] when the section size was not
    /// a whole number of records.
    pub fn check_size(&self) -> Result<()> {
        if self.is_malformed() {
            let size = self.symbols.len() as u64 * ELF64_SYM_SIZE as u64 + self.trailing_bytes;
            return Err(Error::MalformedTableSize { size, entry_size: ELF64_SYM_SIZE as u64 });
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a SymbolTable {
    type Item = &'a Symbol;
    type IntoIter = slice::Iter<'a, Symbol>;

    fn into_iter(self) -> Self::IntoIter {
        self.symbols.iter()
    }
}
