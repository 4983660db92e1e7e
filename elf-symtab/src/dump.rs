use crate::error::{DumpError, Stage, StageExt};
use crate::header::FileHeader;
use crate::section::{find_section_by_name, SectionHeader, Sections};
use crate::source::ByteSource;
use crate::strtab::StringTable;
use crate::symbol::SymbolTable;
use std::io::{Read, Seek, Write};

pub const SYMTAB_SECTION: &str = ".symtab";
pub const STRTAB_SECTION: &str = ".strtab";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DumpOptions {
    /// Fail instead of warning when `.symtab` is not a whole number of records.
    pub strict: bool,
}

/// Decodes the file header and loads the section name table it points to.
pub fn load_section_names<R: Read + Seek>(
    source: &mut ByteSource<R>,
) -> Result<(FileHeader, StringTable), DumpError> {
    let header = FileHeader::decode(source).stage(Stage::Header)?;
    let shstrtab = SectionHeader::read(source, &header, header.e_shstrndx)
        .and_then(|section| StringTable::load(source, &section))
        .stage(Stage::StringTable)?;
    Ok((header, shstrtab))
}

pub fn read_symbols<R: Read + Seek>(
    source: &mut ByteSource<R>,
    options: DumpOptions,
) -> Result<SymbolTable, DumpError> {
    let (header, shstrtab) = load_section_names(source)?;
    let symtab = find_section_by_name(source, &header, &shstrtab, SYMTAB_SECTION).stage(Stage::SectionSearch)?;
    let strtab = find_section_by_name(source, &header, &shstrtab, STRTAB_SECTION).stage(Stage::SectionSearch)?;
    let table = SymbolTable::read(source, &symtab, &strtab, header.endian()).stage(Stage::SymbolDecode)?;
    if options.strict {
        table.check_size().stage(Stage::SymbolDecode)?;
    }
    Ok(table)
}

/// Writes `value name` for every `.symtab` entry, in table order. Nothing is
/// written unless the whole table decoded.
pub fn dump_symbols<R: Read + Seek, W: Write>(
    source: &mut ByteSource<R>,
    out: &mut W,
    options: DumpOptions,
) -> Result<SymbolTable, DumpError> {
    let table = read_symbols(source, options)?;
    write_symbols(out, &table).stage(Stage::Output)?;
    Ok(table)
}

pub fn write_symbols<W: Write>(out: &mut W, table: &SymbolTable) -> std::io::Result<()> {
    for symbol in table {
        writeln!(out, "{}", symbol)?;
    }
    out.flush()
}

/// Writes `[index] name` for every section header. Returns the number of
/// sections listed.
pub fn list_sections<R: Read + Seek, W: Write>(source: &mut ByteSource<R>, out: &mut W) -> Result<usize, DumpError> {
    let (header, shstrtab) = load_section_names(source)?;
    let mut count = 0;
    for section in Sections::new(source, &header, &shstrtab) {
        let section = section.stage(Stage::SectionSearch)?;
        writeln!(out, "[{:>2}] {}", section.index, section.name).stage(Stage::Output)?;
        count += 1;
    }
    out.flush().stage(Stage::Output)?;
    Ok(count)
}
