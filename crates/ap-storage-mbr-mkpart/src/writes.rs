//! Pending writes to the disk.

use crate::MkpartError;
use ap_storage::{Offset, Write, WriteExt};
use tracing::debug;

/// A single pending write.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WriteNode {
    pub offset: Offset,
    pub data: Vec<u8>,
}

impl WriteNode {
    pub fn new(offset: Offset, data: Vec<u8>) -> Self {
        Self { offset, data }
    }

    /// Clear a range of bytes.
    pub fn zeroed(offset: Offset, len: usize) -> Self {
        Self::new(offset, vec![0; len])
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// An ordered list of writes.
///
/// Staging pushes to the front: the node staged last is written first.
#[derive(Debug, Default)]
pub struct WriteList(Vec<WriteNode>);

impl WriteList {
    /// Put a write in front of all others.
    pub fn stage(&mut self, node: WriteNode) {
        debug!("stage {} bytes at {:#x}", node.len(), node.offset);
        self.0.push(node);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The writes in the order they will hit the disk.
    pub fn iter(&self) -> impl Iterator<Item = &WriteNode> {
        self.0.iter().rev()
    }

    /// Write everything in order and return the number of nodes written.
    ///
    /// Stops at the first failure.  Nothing is rolled back, so the disk keeps
    /// the writes that succeeded before.
    pub fn apply<W: Write + ?Sized>(self, disk: &W) -> Result<usize, MkpartError> {
        let mut done = 0;
        for node in self.0.into_iter().rev() {
            let WriteNode { offset, data } = node;
            let res = disk.write_exact(offset, &data);
            let len = data.len();
            drop(data);
            if let Err(source) = res {
                debug!("write to {offset:#x} length {len} failed");
                return Err(MkpartError::Write { offset, source });
            }
            debug!("write to {offset:#x} length {len}");
            done += 1;
        }
        Ok(done)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ap_storage_memory::MemoryDisk;

    fn list() -> WriteList {
        let mut list = WriteList::default();
        list.stage(WriteNode::new(8, vec![3; 4]));
        list.stage(WriteNode::new(4, vec![2; 4]));
        list.stage(WriteNode::new(0, vec![1; 4]));
        list
    }

    #[test]
    fn last_staged_first() {
        let offsets: Vec<_> = list().iter().map(|n| n.offset).collect();
        assert_eq!(vec![0, 4, 8], offsets);
    }

    #[test]
    fn apply_all() {
        let disk = MemoryDisk::new(16);
        assert_eq!(3, list().apply(&disk).unwrap());
        assert_eq!(
            vec![1, 1, 1, 1, 2, 2, 2, 2, 3, 3, 3, 3, 0, 0, 0, 0],
            disk.to_vec()
        );
    }

    #[test]
    fn overlapping_writes_follow_the_order() {
        let disk = MemoryDisk::new(4);
        let mut list = WriteList::default();
        list.stage(WriteNode::new(0, vec![2; 2]));
        list.stage(WriteNode::zeroed(0, 4));
        list.apply(&disk).unwrap();
        assert_eq!(vec![2, 2, 0, 0], disk.to_vec());
    }

    #[test]
    fn stop_at_first_failure() {
        let disk = MemoryDisk::new(16).fail_write(1);
        let err = list().apply(&disk).unwrap_err();
        assert!(matches!(err, MkpartError::Write { offset: 4, .. }));
        // the caller reports the failure, so the message carries the cause
        let msg = err.to_string();
        assert!(msg.starts_with("write to 0x4 failed"), "{msg}");
        assert!(msg.contains("injected write failure"), "{msg}");
        assert_eq!(2, disk.writes());
        assert_eq!(vec![1, 1, 1, 1], disk.to_vec()[..4].to_vec());
        assert!(disk.to_vec()[4..].iter().all(|x| *x == 0));
    }

    #[test]
    fn short_disk() {
        let disk = MemoryDisk::new(6);
        assert!(matches!(list().apply(&disk), Err(MkpartError::Write { offset: 4, .. })));
    }

    #[test]
    fn empty_list() {
        let disk = MemoryDisk::new(0);
        assert_eq!(0, WriteList::default().apply(&disk).unwrap());
        assert_eq!(0, disk.writes());
    }
}
