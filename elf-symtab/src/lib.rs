//! Reads the symbol table of ELF64 object files.
//!
//! Parsing goes through a [`ByteSource`] over any `Read + Seek` input. It
//! decodes the [`FileHeader`], locates the section name table, and finds
//! `.symtab` and `.strtab` by name. The symbol records are then decoded
//! into a [`SymbolTable`]. Every record is decoded field by field in the
//! byte order declared by the file.
//!
//! ```no_run
//! use elf_symtab::{dump_symbols, ByteSource, DumpOptions};
//!
//! let file = std::fs::File::open("a.out").unwrap();
//! let mut source = ByteSource::new(file).unwrap();
//! dump_symbols(&mut source, &mut std::io::stdout(), DumpOptions::default()).unwrap();
//! ```

#[macro_use]
extern crate log;

mod dump;
mod endian;
mod error;
mod header;
mod section;
mod source;
mod strtab;
mod symbol;

pub use dump::{
    dump_symbols, list_sections, load_section_names, read_symbols, write_symbols, DumpOptions, STRTAB_SECTION,
    SYMTAB_SECTION,
};
pub use endian::Endian;
pub use error::{DumpError, Error, Result, Stage};
pub use header::{
    FileHeader, EI_CLASS, EI_DATA, EI_NIDENT, EI_VERSION, ELF64_EHDR_SIZE, ELFCLASS32, ELFCLASS64, ELFDATA2LSB,
    ELFDATA2MSB, ELFMAG, EV_CURRENT,
};
pub use section::{
    find_section_by_name, load_section, NamedSection, SectionHeader, Sections, ELF64_SHDR_SIZE, SHT_NOBITS, SHT_NULL,
    SHT_PROGBITS, SHT_STRTAB, SHT_SYMTAB,
};
pub use source::ByteSource;
pub use strtab::{StringTable, CORRUPT_NAME};
pub use symbol::{Symbol, SymbolRecord, SymbolTable, ELF64_SYM_SIZE};
