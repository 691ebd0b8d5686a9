//! The 32-bit disk signature.

use crate::{MkpartError, WriteNode};
use ap_storage::{Read, ReadExt};
use ap_storage_mbr::DISK_SIGNATURE;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

/// Keep an existing signature or stage a new one.
///
/// Returns the signature the disk will have and the write for a new one.
pub fn resolve_signature<R: Read + ?Sized>(
    disk: &R,
    generate: fn() -> u32,
) -> Result<(u32, Option<WriteNode>), MkpartError> {
    let id = disk.read_u32_le(DISK_SIGNATURE).map_err(MkpartError::SignatureRead)?;
    if id != 0 {
        debug!("keep disk id {id:08x}");
        return Ok((id, None));
    }
    let id = match generate() {
        0 => 1,
        v => v,
    };
    debug!("new disk id {id:08x}");
    Ok((id, Some(WriteNode::new(DISK_SIGNATURE, id.to_le_bytes().to_vec()))))
}

/// Get a randomized disk ID seeded by the current time.
pub fn rand_disk_id() -> u32 {
    let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default();
    let seed = (now.as_secs() as u32) ^ now.subsec_nanos().rotate_left(16);
    (seed.wrapping_mul(0x9e37_79b9) % 0xffff_ffff) + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use ap_storage_memory::MemoryDisk;

    #[test]
    fn keep_existing() {
        let mut image = vec![0u8; 512];
        image[0x1b8..0x1bc].copy_from_slice(&[0x78, 0x56, 0x34, 0x12]);
        let disk = MemoryDisk::from_vec(image);
        let (id, node) = resolve_signature(&disk, || 7).unwrap();
        assert_eq!(0x1234_5678, id);
        assert!(node.is_none());
    }

    #[test]
    fn generate_new() {
        let disk = MemoryDisk::new(512);
        let (id, node) = resolve_signature(&disk, || 0xdead_beef).unwrap();
        assert_eq!(0xdead_beef, id);
        assert_eq!(Some(WriteNode::new(0x1b8, vec![0xef, 0xbe, 0xad, 0xde])), node);
    }

    #[test]
    fn never_zero() {
        let disk = MemoryDisk::new(512);
        assert_eq!(1, resolve_signature(&disk, || 0).unwrap().0);
        assert_ne!(0, rand_disk_id());
    }

    #[test]
    fn tiny_disk() {
        let disk = MemoryDisk::new(0x1ba);
        assert!(matches!(resolve_signature(&disk, rand_disk_id), Err(MkpartError::SignatureRead(_))));
    }
}
