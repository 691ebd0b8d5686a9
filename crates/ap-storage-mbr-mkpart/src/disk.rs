//! What a run needs to know about the disk.

use crate::{human_size, MkpartError};
use ap_storage::{BlockDevice, Geometry};
use ap_storage_mbr::PRIMARY_PARTITIONS;
use tracing::{debug, warn};

/// Sectors kept free in front of the first partition unless configured otherwise.
pub const DEFAULT_START: u32 = 2048;

/// Used when the driver reports no usable geometry.
///
/// This is a guess that produces plausible CHS values, not a measurement.
pub const FALLBACK_GEOMETRY: Geometry = Geometry {
    heads: 122,
    sectors: 62,
    cylinders: 0,
    start: 0,
};

/// A primary partition to write.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PartInfo {
    /// Slot in the partition table.
    pub index: usize,
    /// Sectors after the reserved area.
    pub start: u32,
    /// Sectors.  Zero extends the partition to the end of the disk.
    pub length: u32,
    pub active: bool,
    pub typ: u8,
}

/// The disk as seen by one run.
#[derive(Clone, Debug, Default)]
pub struct DiskInfo {
    /// Logical sector size in bytes.
    pub sector_size: u32,
    /// Usable size in bytes, rounded down to whole sectors.
    pub bytes: u64,
    /// Usable size in sectors.
    pub size: u32,
    /// Reserved sectors in front of the partitions.
    pub start: u32,
    pub geometry: Geometry,
    /// The geometry is the fallback guess.
    pub heuristic: bool,
    /// The disk signature.
    pub id: u32,
    pub parts: [PartInfo; PRIMARY_PARTITIONS],
}

impl DiskInfo {
    /// Ask the device for its sizes and geometry.
    ///
    /// Failing sector or device size queries are fatal, as is a start offset
    /// that does not fit into 32 bits.  A missing geometry is replaced by
    /// [`FALLBACK_GEOMETRY`].  Disks larger than the 32-bit LBA range are
    /// limited to it with a warning.
    pub fn query(disk: &dyn BlockDevice, start_mib: Option<u32>) -> Result<Self, MkpartError> {
        let sector_size = match disk.sector_size() {
            Ok(0) => 512,
            Ok(v) => v,
            Err(source) => {
                return Err(MkpartError::GeometryQuery {
                    what: "sector size",
                    source,
                })
            }
        };
        debug!("disk sector size {sector_size}");

        let start = match start_mib {
            Some(mib) => start_sectors(mib, sector_size)?,
            None => DEFAULT_START,
        };
        debug!("start is {start}");

        let dsize = disk.size_bytes().map_err(|source| MkpartError::GeometryQuery {
            what: "device size",
            source,
        })?;
        debug!("disk size {}", human_size(dsize));

        let sectors = dsize / sector_size as u64;
        let size = u32::try_from(sectors).unwrap_or_else(|_| {
            warn!("disk has {sectors} sectors, only {} are addressable", u32::MAX);
            u32::MAX
        });
        debug!("disk sectors {size}");

        let (geometry, heuristic) = match disk.geometry() {
            Ok(geo) if geo.sectors != 0 => {
                debug!(
                    "disk geometry sector {}, head {}, cylinder {}",
                    geo.sectors, geo.heads, geo.cylinders
                );
                (geo, false)
            }
            Ok(_) => {
                warn!("driver reports no sectors per track, guessing the geometry");
                (FALLBACK_GEOMETRY, true)
            }
            Err(e) => {
                warn!("can not get geometry, guessing it: {e:#}");
                (FALLBACK_GEOMETRY, true)
            }
        };

        Ok(Self {
            sector_size,
            bytes: size as u64 * sector_size as u64,
            size,
            start,
            geometry,
            heuristic,
            id: 0,
            parts: Default::default(),
        })
    }
}

/// Convert a start offset in MiB into sectors.
pub fn start_sectors(mib: u32, sector_size: u32) -> Result<u32, MkpartError> {
    let per_mib = (1u32 << 20) / sector_size;
    mib.checked_mul(per_mib)
        .ok_or_else(|| MkpartError::Usage(format!("start offset of {mib} MiB is too large")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ap_storage::Geometry;
    use ap_storage_memory::MemoryDisk;

    #[test]
    fn start_offset() {
        assert_eq!(8192, start_sectors(4, 512).unwrap());
        assert_eq!(1024, start_sectors(4, 4096).unwrap());
        assert_eq!(0, start_sectors(0, 512).unwrap());
        assert!(matches!(start_sectors(u32::MAX, 512), Err(MkpartError::Usage(_))));
    }

    #[test]
    fn query_defaults() {
        let disk = MemoryDisk::new(1 << 20);
        let info = DiskInfo::query(&disk, None).unwrap();
        assert_eq!(512, info.sector_size);
        assert_eq!(2048, info.size);
        assert_eq!(DEFAULT_START, info.start);
        assert_eq!(FALLBACK_GEOMETRY, info.geometry);
        assert!(info.heuristic);
    }

    #[test]
    fn query_reported_geometry() {
        let geo = Geometry {
            heads: 16,
            sectors: 63,
            cylinders: 2,
            start: 0,
        };
        let disk = MemoryDisk::new(1 << 20).with_sector_size(4096).with_geometry(geo);
        let info = DiskInfo::query(&disk, Some(2)).unwrap();
        assert_eq!(256, info.size);
        assert_eq!(512, info.start);
        assert_eq!(geo, info.geometry);
        assert!(!info.heuristic);
    }

    /// Only a zero sector count triggers the guess; zero heads are taken verbatim.
    #[test]
    fn query_partial_geometry() {
        let disk = MemoryDisk::new(4096).with_geometry(Geometry { heads: 4, ..Geometry::default() });
        assert!(DiskInfo::query(&disk, None).unwrap().heuristic);

        let geo = Geometry { heads: 0, sectors: 32, ..Geometry::default() };
        let disk = MemoryDisk::new(4096).with_geometry(geo);
        let info = DiskInfo::query(&disk, None).unwrap();
        assert_eq!(geo, info.geometry);
        assert!(!info.heuristic);
    }

    #[test]
    fn query_start_overflow() {
        let disk = MemoryDisk::new(4096);
        assert!(matches!(DiskInfo::query(&disk, Some(u32::MAX)), Err(MkpartError::Usage(_))));
        let disk = MemoryDisk::new(4096).fail_size(true);
        assert!(matches!(DiskInfo::query(&disk, None), Err(MkpartError::GeometryQuery { what: "device size", .. })));
    }

    #[test]
    fn zero_sector_size() {
        let disk = MemoryDisk::new(4096).with_sector_size(0);
        assert_eq!(512, DiskInfo::query(&disk, None).unwrap().sector_size);
    }
}
