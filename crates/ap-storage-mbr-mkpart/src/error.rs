//! Failures of a partitioning run.

use ap_storage::{Error, Offset};

/// Why a run stopped.
///
/// Every variant maps to its own process exit code.
#[derive(thiserror::Error, Debug)]
pub enum MkpartError {
    #[error("{0}")]
    Usage(String),
    #[error("can not open device {path}: {source:#}")]
    DeviceOpen {
        path: String,
        #[source]
        source: Error,
    },
    #[error("can not get {what}: {source:#}")]
    GeometryQuery {
        what: &'static str,
        #[source]
        source: Error,
    },
    #[error("can not read the disk signature: {0:#}")]
    SignatureRead(#[source] Error),
    #[error("{0}")]
    Layout(String),
    /// Writes before this one are already on the disk.
    #[error("write to {offset:#x} failed: {source:#}")]
    Write {
        offset: Offset,
        #[source]
        source: Error,
    },
    #[error("can not sync the device: {0:#}")]
    Sync(#[source] Error),
}

impl MkpartError {
    /// The process exit code for this failure.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Usage(_) => 1,
            Self::DeviceOpen { .. } => 3,
            Self::GeometryQuery { .. } => 4,
            Self::SignatureRead(_) => 5,
            Self::Layout(_) => 6,
            Self::Write { .. } => 7,
            Self::Sync(_) => 8,
        }
    }
}
