//! Traits for writing.
use crate::{Error, Offset};

/// Write to a file or disk at a certain offset.
pub trait Write {
    /// Write some byte buffer and return the bytes written.
    fn write_bytes(&self, offset: Offset, buf: &[u8]) -> Result<usize, Error>;
}

/// Trait extension to simplify writing.
pub trait WriteExt {
    /// Write the whole buffer.
    fn write_exact(&self, offset: Offset, buf: &[u8]) -> Result<(), Error>;
}

impl<W: Write + ?Sized> WriteExt for W {
    fn write_exact(&self, offset: Offset, buf: &[u8]) -> Result<(), Error> {
        let mut done = 0;
        while done != buf.len() {
            match self.write_bytes(offset + done as Offset, &buf[done..])? {
                0 => return Err(Error::msg(PartialWriteError { offset, done })),
                n => done += n,
            }
        }
        Ok(())
    }
}

/// An exact write could only be partially done.
#[derive(thiserror::Error, Debug)]
#[error("partial write at {offset:#x} after {done} bytes")]
pub struct PartialWriteError {
    pub offset: Offset,
    pub done: usize,
}
