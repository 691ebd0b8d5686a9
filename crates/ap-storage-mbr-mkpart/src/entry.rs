//! Partition entries.

use crate::{DiskInfo, MkpartError, PartInfo, WriteNode};
use ap_storage_mbr::{Partition, ACTIVE, PRIMARY_PARTITIONS};
use tracing::{debug, warn};

/// Build the table entry for a partition.
///
/// A zero length is replaced by the remaining sectors of the disk and stored
/// back into `part`.  The CHS start is computed one sector past the LBA start.
pub fn build_entry(disk: &DiskInfo, part: &mut PartInfo) -> Result<WriteNode, MkpartError> {
    if part.index >= PRIMARY_PARTITIONS {
        return Err(MkpartError::Layout(format!("no primary partition {}", part.index)));
    }
    let first = disk.start as u64 + part.start as u64;
    let lba = u32::try_from(first)
        .map_err(|_| MkpartError::Layout(format!("partition start {first} not addressable")))?;
    if part.length == 0 {
        if first >= disk.size as u64 {
            return Err(MkpartError::Layout(format!(
                "partition start {first} is beyond the disk end {}",
                disk.size
            )));
        }
        part.length = disk.size - lba;
        debug!("use full disk, length {}", part.length);
    } else if first + part.length as u64 > disk.size as u64 {
        warn!("partition {} ends behind the disk", part.index);
    }

    let mut entry = Partition {
        drive: if part.active { ACTIVE } else { 0 },
        typ: part.typ,
        lba,
        size: part.length,
        ..Partition::default()
    };
    entry.chs_start.update(first + 1, &disk.geometry);
    entry.chs_end.update(first + part.length as u64, &disk.geometry);
    debug!(
        "partition {} chs {:02x?} - {:02x?}",
        part.index,
        entry.chs_start.to_bytes(),
        entry.chs_end.to_bytes()
    );
    Ok(WriteNode::new(Partition::offset(part.index), entry.to_bytes().to_vec()))
}

/// Decode a built entry again.
pub fn decode_entry(node: &WriteNode) -> Option<Partition> {
    let buf: &[u8; Partition::SIZE] = node.data.as_slice().try_into().ok()?;
    Some(Partition::from_bytes(buf))
}
