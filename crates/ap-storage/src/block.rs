//! Block devices.
use crate::{Error, Read, Write};

/// The legacy BIOS geometry of a disk.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Geometry {
    pub heads: u32,
    /// Sectors per track.
    pub sectors: u32,
    pub cylinders: u32,
    /// The first sector of the device on its parent disk.
    pub start: u64,
}

/// A disk that knows its own layout and can be asked to rescan it.
pub trait BlockDevice: Read + Write {
    /// The logical sector size in bytes.
    fn sector_size(&self) -> Result<u32, Error>;
    /// The device size in bytes.
    fn size_bytes(&self) -> Result<u64, Error>;
    /// The legacy geometry as reported by the driver.
    fn geometry(&self) -> Result<Geometry, Error>;
    /// Flush all written data to the device.
    fn sync(&self) -> Result<(), Error>;
    /// Ask the kernel to reread the partition table.
    fn reread_partitions(&self) -> Result<(), Error>;
}
