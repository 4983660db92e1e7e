use crate::error::{Error, Result};
use std::io::{ErrorKind, Read, Seek, SeekFrom};

/// Random-access view over a seekable input. The length is taken once at
/// construction; every positioned read is checked against it before any
/// buffer is allocated.
pub struct ByteSource<R> {
    inner: R,
    len: u64,
}

impl<R: Read + Seek> ByteSource<R> {
    pub fn new(mut inner: R) -> Result<Self> {
        let len = inner.seek(SeekFrom::End(0))?;
        inner.seek(SeekFrom::Start(0))?;
        Ok(ByteSource { inner, len })
    }

    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Fills `buf` from `offset`.
    pub fn read_at(&mut self, offset: u64, buf: &mut [u8]) -> Result<()> {
        self.check_range(offset, buf.len() as u64)?;
        self.inner.seek(SeekFrom::Start(offset))?;
        self.read_next(buf)
    }

    /// Fills `buf` from the current position.
    pub fn read_next(&mut self, buf: &mut [u8]) -> Result<()> {
        let offset = self.inner.stream_position()?;
        match self.inner.read_exact(buf) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::UnexpectedEof => Err(Error::truncated(offset, buf.len() as u64, self.len)),
            Err(e) => Err(e.into()),
        }
    }

    pub fn read_vec_at(&mut self, offset: u64, size: u64) -> Result<Vec<u8>> {
        self.check_range(offset, size)?;
        let size = usize::try_from(size).map_err(|_| Error::truncated(offset, size, self.len))?;
        let mut buffer = vec![0; size];
        self.read_at(offset, &mut buffer)?;
        Ok(buffer)
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    fn check_range(&self, offset: u64, size: u64) -> Result<()> {
        match offset.checked_add(size) {
            Some(end) if end <= self.len => Ok(()),
            _ => Err(Error::truncated(offset, size, self.len)),
        }
    }
}
