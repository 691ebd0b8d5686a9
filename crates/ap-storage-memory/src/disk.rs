use alloc::vec::Vec;
use ap_storage::{msg2err, BlockDevice, Error, Geometry, Offset, Read, Write};
use core::cell::{Cell, RefCell};

/// A block device backed by memory.
///
/// Writes and rescans can be made to fail to exercise error paths.
pub struct MemoryDisk {
    data: RefCell<Vec<u8>>,
    sector_size: u32,
    geometry: Option<Geometry>,
    /// Fail the n-th write call, counting from zero.
    fail_write: Option<usize>,
    fail_rescan: bool,
    fail_sector_size: bool,
    fail_size: bool,
    writes: Cell<usize>,
    syncs: Cell<usize>,
    rescans: Cell<usize>,
}

impl MemoryDisk {
    /// A zero-filled disk of the given size in bytes.
    pub fn new(size: usize) -> Self {
        Self::from_vec(alloc::vec![0; size])
    }

    /// Use an existing image as disk content.
    pub fn from_vec(data: Vec<u8>) -> Self {
        Self {
            data: RefCell::new(data),
            sector_size: 512,
            geometry: None,
            fail_write: None,
            fail_rescan: false,
            fail_sector_size: false,
            fail_size: false,
            writes: Cell::new(0),
            syncs: Cell::new(0),
            rescans: Cell::new(0),
        }
    }

    /// Set the logical sector size.
    pub fn with_sector_size(self, v: u32) -> Self {
        Self { sector_size: v, ..self }
    }

    /// Report a legacy geometry.  Without one the geometry query fails.
    pub fn with_geometry(self, v: Geometry) -> Self {
        Self {
            geometry: Some(v),
            ..self
        }
    }

    /// Let the n-th write call fail.
    pub fn fail_write(self, n: usize) -> Self {
        Self {
            fail_write: Some(n),
            ..self
        }
    }

    /// Let the partition rescan fail.
    pub fn fail_rescan(self, v: bool) -> Self {
        Self { fail_rescan: v, ..self }
    }

    /// Let the sector size query fail.
    pub fn fail_sector_size(self, v: bool) -> Self {
        Self {
            fail_sector_size: v,
            ..self
        }
    }

    /// Let the device size query fail.
    pub fn fail_size(self, v: bool) -> Self {
        Self { fail_size: v, ..self }
    }

    /// The number of write calls seen so far, including failed ones.
    pub fn writes(&self) -> usize {
        self.writes.get()
    }

    pub fn syncs(&self) -> usize {
        self.syncs.get()
    }

    pub fn rescans(&self) -> usize {
        self.rescans.get()
    }

    /// A copy of the current content.
    pub fn to_vec(&self) -> Vec<u8> {
        self.data.borrow().clone()
    }
}

impl Read for MemoryDisk {
    fn read_bytes(&self, ofs: Offset, buf: &mut [u8]) -> Result<usize, Error> {
        let data = self.data.borrow();
        if ofs >= data.len() as Offset {
            return Ok(0);
        }
        let ofs = ofs as usize;
        let n = core::cmp::min(data.len() - ofs, buf.len());
        buf[..n].copy_from_slice(&data[ofs..ofs + n]);
        Ok(n)
    }
}

impl Write for MemoryDisk {
    fn write_bytes(&self, ofs: Offset, buf: &[u8]) -> Result<usize, Error> {
        let call = self.writes.get();
        self.writes.set(call + 1);
        if self.fail_write == Some(call) {
            return Err(msg2err!("injected write failure"));
        }
        let mut data = self.data.borrow_mut();
        if ofs >= data.len() as Offset {
            return Ok(0);
        }
        let ofs = ofs as usize;
        let n = core::cmp::min(data.len() - ofs, buf.len());
        data[ofs..ofs + n].copy_from_slice(&buf[..n]);
        Ok(n)
    }
}

impl BlockDevice for MemoryDisk {
    fn sector_size(&self) -> Result<u32, Error> {
        if self.fail_sector_size {
            return Err(msg2err!("no sector size"));
        }
        Ok(self.sector_size)
    }

    fn size_bytes(&self) -> Result<u64, Error> {
        if self.fail_size {
            return Err(msg2err!("no device size"));
        }
        Ok(self.data.borrow().len() as u64)
    }

    fn geometry(&self) -> Result<Geometry, Error> {
        self.geometry.ok_or(msg2err!("no geometry"))
    }

    fn sync(&self) -> Result<(), Error> {
        self.syncs.set(self.syncs.get() + 1);
        Ok(())
    }

    fn reread_partitions(&self) -> Result<(), Error> {
        self.rescans.set(self.rescans.get() + 1);
        if self.fail_rescan {
            return Err(msg2err!("device busy"));
        }
        Ok(())
    }
}
