//! On-disk structures of the MBR partition table.
#![no_std]

mod chs;
pub use chs::Chs;

/// Offset of the 32-bit disk signature.
pub const DISK_SIGNATURE: u64 = 0x1b8;
/// Offset of the first primary partition entry.
pub const PARTITION_TABLE: u64 = 0x1be;
/// Offset of the boot magic.
pub const BOOT_SIGNATURE: u64 = 0x1fe;
/// The boot magic in on-disk order.
pub const BOOT_MAGIC: [u8; 2] = [0x55, 0xaa];
/// Number of primary partitions.
pub const PRIMARY_PARTITIONS: usize = 4;

/// Partition type for Linux native filesystems.
pub const TYPE_LINUX: u8 = 0x83;
/// The active flag in the drive byte.
pub const ACTIVE: u8 = 0x80;

/// A single partition - on-disk format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Partition {
    pub drive: u8,
    pub chs_start: Chs,
    pub typ: u8,
    pub chs_end: Chs,
    pub lba: u32,
    pub size: u32,
}

impl Partition {
    /// The size of an entry on disk.
    pub const SIZE: usize = 16;

    /// The absolute offset of the n-th primary entry.
    pub fn offset(index: usize) -> u64 {
        PARTITION_TABLE + (index * Self::SIZE) as u64
    }

    /// Whether the boot flag is set.
    pub fn is_active(&self) -> bool {
        self.drive & ACTIVE != 0
    }

    /// Encode into the little-endian on-disk layout.
    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut res = [0u8; Self::SIZE];
        res[0] = self.drive;
        res[1..4].copy_from_slice(&self.chs_start.to_bytes());
        res[4] = self.typ;
        res[5..8].copy_from_slice(&self.chs_end.to_bytes());
        res[8..12].copy_from_slice(&self.lba.to_le_bytes());
        res[12..16].copy_from_slice(&self.size.to_le_bytes());
        res
    }

    /// Decode from the on-disk layout.
    pub fn from_bytes(buf: &[u8; Self::SIZE]) -> Self {
        Self {
            drive: buf[0],
            chs_start: Chs::from_bytes([buf[1], buf[2], buf[3]]),
            typ: buf[4],
            chs_end: Chs::from_bytes([buf[5], buf[6], buf[7]]),
            lba: u32::from_le_bytes([buf[8], buf[9], buf[10], buf[11]]),
            size: u32::from_le_bytes([buf[12], buf[13], buf[14], buf[15]]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_fill_the_table() {
        assert_eq!(0x1be, Partition::offset(0));
        assert_eq!(0x1ce, Partition::offset(1));
        assert_eq!(BOOT_SIGNATURE, Partition::offset(PRIMARY_PARTITIONS));
    }

    #[test]
    fn layout() {
        let p = Partition {
            drive: ACTIVE,
            chs_start: Chs { head: 1, sector: 2, cylinder: 3 },
            typ: TYPE_LINUX,
            chs_end: Chs { head: 4, sector: 5, cylinder: 6 },
            lba: 0x0000_0800,
            size: 0x000f_f800,
        };
        let buf = p.to_bytes();
        assert_eq!(
            [0x80, 1, 2, 3, 0x83, 4, 5, 6, 0x00, 0x08, 0, 0, 0x00, 0xf8, 0x0f, 0],
            buf
        );
        assert_eq!(p, Partition::from_bytes(&buf));
        assert!(p.is_active());
    }
}
