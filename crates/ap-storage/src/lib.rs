//! The alpico storage interfaces.
#![no_std]

/// Offset in the underlying storage.
pub type Offset = u64;

/// Error when accessing storage.
pub type Error = anyhow::Error;

mod block;
mod read;
mod write;

pub use block::*;
pub use read::*;
pub use write::*;

/// Convert into an error type including the context.
#[macro_export]
macro_rules! msg2err {
    ($v: expr) => { $crate::Error::msg($v).context($crate::ErrorCtx((file!(), line!()))) }
}

/// A container for file! and line! Error context
pub struct ErrorCtx(pub (&'static str, u32));
impl core::fmt::Display for ErrorCtx {
    fn fmt(&self, fmt: &mut core::fmt::Formatter<'_>) -> Result<(), core::fmt::Error> {
        write!(fmt, "{}:{}", self.0.0, self.0.1)
    }
}
