//! Traits for reading.
use crate::{Error, Offset, msg2err};

/// Read from a certain offset into a buffer.
pub trait Read {
    /// Read into some byte buffer. Returning zero means EOF.
    fn read_bytes(&self, offset: Offset, buf: &mut [u8]) -> Result<usize, Error>;
}

/// Extension methods to make implementations easier.
pub trait ReadExt {
    /// Fill the buffer.
    fn read_exact(&self, offset: Offset, buf: &mut [u8]) -> Result<(), Error>;

    /// Read a fixed number of bytes.
    fn read_array<const N: usize>(&self, offset: Offset) -> Result<[u8; N], Error>;

    /// Read a little-endian u32.
    fn read_u32_le(&self, offset: Offset) -> Result<u32, Error> {
        Ok(u32::from_le_bytes(self.read_array(offset)?))
    }
}

impl<R: Read + ?Sized> ReadExt for R {
    fn read_exact(&self, offset: Offset, buf: &mut [u8]) -> Result<(), Error> {
        let mut n = 0;
        while n != buf.len() {
            match self.read_bytes(offset + n as Offset, &mut buf[n..])? {
                0 => return Err(msg2err!(PartialReadError)),
                c => n += c,
            }
        }
        Ok(())
    }

    fn read_array<const N: usize>(&self, offset: Offset) -> Result<[u8; N], Error> {
        let mut buf = [0u8; N];
        self.read_exact(offset, &mut buf)?;
        Ok(buf)
    }
}

/// An exact read could only be partially done.
#[derive(Debug)]
pub struct PartialReadError;

impl core::fmt::Display for PartialReadError {
    fn fmt(&self, fmt: &mut core::fmt::Formatter<'_>) -> Result<(), core::fmt::Error> {
        write!(fmt, "{:?}", self)
    }
}
