//! Partition a disk with a single MBR partition.
//!
//! The partition starts after a reserved area and covers the rest of the
//! disk.  The table is written in one pass of small writes:
//!
//! - boot magic at `0x1fe`
//! - zeroed entries 1-3
//! - entry 0
//! - the disk signature, only when the disk had none
//!
//! A failing write leaves the previous ones on the disk.

use ap_storage::BlockDevice;
use ap_storage_mbr::{Partition, BOOT_MAGIC, BOOT_SIGNATURE, PRIMARY_PARTITIONS, TYPE_LINUX};
use tracing::{debug, info, warn};

mod disk;
mod entry;
mod error;
mod signature;
mod size;
mod writes;

pub use disk::*;
pub use entry::*;
pub use error::MkpartError;
pub use signature::*;
pub use size::human_size;
pub use writes::*;

/// A partition table builder.
#[derive(Debug, Clone)]
pub struct MakeMbr {
    start_mib: Option<u32>,
    id_source: fn() -> u32,
}

impl Default for MakeMbr {
    fn default() -> Self {
        Self {
            start_mib: None,
            id_source: rand_disk_id,
        }
    }
}

impl MakeMbr {
    /// Reserve this many MiB in front of the partition.
    pub fn start_mib(self, v: u32) -> Self {
        Self {
            start_mib: Some(v),
            ..self
        }
    }

    /// Where a new disk signature comes from.
    pub fn id_source(self, v: fn() -> u32) -> Self {
        Self { id_source: v, ..self }
    }

    /// Query the disk and stage all writes without touching it.
    pub fn plan(&self, disk: &dyn BlockDevice) -> Result<Plan, MkpartError> {
        let mut info = DiskInfo::query(disk, self.start_mib)?;
        let mut writes = WriteList::default();

        let (id, node) = resolve_signature(disk, self.id_source)?;
        info.id = id;
        if let Some(node) = node {
            writes.stage(node);
        }
        info!("disk id is {id:08x}");

        let mut part = PartInfo {
            index: 0,
            start: 0,
            length: 0,
            active: false,
            typ: TYPE_LINUX,
        };
        writes.stage(build_entry(&info, &mut part)?);
        info.parts[0] = part;

        // clear the remaining entries
        let rest = PRIMARY_PARTITIONS - 1;
        writes.stage(WriteNode::zeroed(Partition::offset(1), rest * Partition::SIZE));

        writes.stage(WriteNode::new(BOOT_SIGNATURE, BOOT_MAGIC.to_vec()));
        Ok(Plan { disk: info, writes })
    }

    /// Write the table, flush it and let the kernel pick it up.
    pub fn run(&self, disk: &dyn BlockDevice) -> Result<Outcome, MkpartError> {
        self.plan(disk)?.commit(disk)
    }
}

/// Staged writes for a disk.
#[derive(Debug)]
pub struct Plan {
    pub disk: DiskInfo,
    pub writes: WriteList,
}

impl Plan {
    /// Apply the writes, sync and reread the partition table.
    ///
    /// A failing reread is only reported since the table is already on disk.
    pub fn commit(self, disk: &dyn BlockDevice) -> Result<Outcome, MkpartError> {
        let written = self.writes.apply(disk)?;
        disk.sync().map_err(MkpartError::Sync)?;
        debug!("synced");

        let rescanned = match disk.reread_partitions() {
            Ok(()) => true,
            Err(e) => {
                warn!("can not reread the partition table: {e:#}");
                false
            }
        };
        let part = &self.disk.parts[0];
        info!(
            "partition 0 at sector {} with {} sectors ({})",
            self.disk.start + part.start,
            part.length,
            human_size(part.length as u64 * self.disk.sector_size as u64)
        );
        Ok(Outcome {
            disk: self.disk,
            written,
            rescanned,
        })
    }
}

/// The result of a successful run.
#[derive(Debug)]
pub struct Outcome {
    pub disk: DiskInfo,
    /// Number of writes applied.
    pub written: usize,
    /// The kernel accepted the new table.
    pub rescanned: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use ap_storage_memory::MemoryDisk;

    #[test]
    fn plan_order() {
        let disk = MemoryDisk::new(4 << 20);
        let plan = MakeMbr::default().id_source(|| 42).plan(&disk).unwrap();
        let offsets: Vec<_> = plan.writes.iter().map(|n| (n.offset, n.len())).collect();
        assert_eq!(vec![(0x1fe, 2), (0x1ce, 48), (0x1be, 16), (0x1b8, 4)], offsets);
        assert_eq!(42, plan.disk.id);
        assert_eq!(0, disk.writes());
    }

    #[test]
    fn plan_keeps_signature() {
        let mut image = vec![0u8; 4 << 20];
        image[0x1b8] = 1;
        let disk = MemoryDisk::from_vec(image);
        let plan = MakeMbr::default().plan(&disk).unwrap();
        assert_eq!(3, plan.writes.len());
        assert_eq!(1, plan.disk.id);
    }

    #[test]
    fn run_syncs_and_rescans() {
        let disk = MemoryDisk::new(4 << 20);
        let outcome = MakeMbr::default().run(&disk).unwrap();
        assert_eq!(4, outcome.written);
        assert!(outcome.rescanned);
        assert_eq!(1, disk.syncs());
        assert_eq!(1, disk.rescans());
        assert_eq!(8192 - 2048, outcome.disk.parts[0].length);
    }
}
