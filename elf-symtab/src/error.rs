use std::fmt;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("truncated input: {needed} bytes needed at offset {offset:#x}, {available} available")]
    TruncatedInput { offset: u64, needed: u64, available: u64 },
    #[error("invalid ELF64 file: {0}")]
    InvalidFormat(String),
    #[error("section index {index} out of range, file has {count} sections")]
    IndexOutOfRange { index: u16, count: u16 },
    #[error("section {name} not found")]
    SectionNotFound { name: String },
    #[error("table size {size} is not a multiple of entry size {entry_size}")]
    MalformedTableSize { size: u64, entry_size: u64 },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn truncated(offset: u64, needed: u64, source_len: u64) -> Self {
        Error::TruncatedInput { offset, needed, available: source_len.saturating_sub(offset) }
    }
}

/// Step of a dump that produced a [`DumpError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    Header,
    StringTable,
    SectionSearch,
    SymbolDecode,
    Output,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::Header => "header parse",
            Stage::StringTable => "section name table load",
            Stage::SectionSearch => "section search",
            Stage::SymbolDecode => "symbol decode",
            Stage::Output => "output",
        };
        f.write_str(s)
    }
}

#[derive(Error, Debug)]
#[error("{stage}: {source}")]
pub struct DumpError {
    pub stage: Stage,
    #[source]
    pub source: Error,
}

pub(crate) trait StageExt<T> {
    fn stage(self, stage: Stage) -> Result<T, DumpError>;
}

impl<T, E: Into<Error>> StageExt<T> for Result<T, E> {
    fn stage(self, stage: Stage) -> Result<T, DumpError> {
        self.map_err(|err| DumpError { stage, source: err.into() })
    }
}
