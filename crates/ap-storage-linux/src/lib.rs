//! Linux specific storage interface.

use ap_storage::{Error, Geometry, Offset, Read};
use std::fs::File;
use std::os::fd::AsRawFd;

mod disk_rw;
mod ioctl;
pub use disk_rw::LinuxDiskRW;

/// A disk backed by a file in Linux.
pub struct LinuxDisk {
    file: File,
    offset: u64,
}

impl LinuxDisk {
    /// Open a read-only disk at the given offset.
    pub fn new(filename: &str, offset: u64) -> Result<Self, Error> {
        Ok(Self {
            file: File::open(filename)?,
            offset,
        })
    }

    /// The logical sector size.  A driver reporting zero gets the 512 byte default.
    pub fn sector_size(&self) -> Result<u32, Error> {
        let size = ioctl::sector_size(self.file.as_raw_fd())?;
        Ok(if size == 0 { 512 } else { size })
    }

    /// The size of the whole device in bytes.
    pub fn size_bytes(&self) -> Result<u64, Error> {
        ioctl::size_bytes(self.file.as_raw_fd())
    }

    /// The legacy BIOS geometry.
    pub fn geometry(&self) -> Result<Geometry, Error> {
        ioctl::geometry(self.file.as_raw_fd())
    }

    /// Flush the written data of the device.
    pub fn sync(&self) -> Result<(), Error> {
        Ok(self.file.sync_all()?)
    }
}

impl Read for LinuxDisk {
    fn read_bytes(&self, offset: Offset, buf: &mut [u8]) -> Result<usize, Error> {
        let res = unsafe {
            libc::pread(
                self.file.as_raw_fd(),
                buf.as_mut_ptr() as *mut libc::c_void,
                buf.len(),
                (self.offset + offset) as i64,
            )
        };
        if res == -1 {
            return Err(std::io::Error::last_os_error().into());
        }
        Ok(res as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ap_storage::{BlockDevice, ReadExt, WriteExt};

    #[test]
    fn write_sync_read() {
        let file = tempfile::NamedTempFile::new().unwrap();
        file.as_file().set_len(1024).unwrap();
        let path = file.path().to_str().unwrap();

        let disk = LinuxDiskRW::new(path, 0).unwrap();
        disk.write_exact(0x1fe, &[0x55, 0xaa]).unwrap();
        disk.sync().unwrap();
        drop(disk);

        let disk = LinuxDisk::new(path, 0).unwrap();
        assert_eq!([0x55, 0xaa], disk.read_array::<2>(0x1fe).unwrap());
        disk.sync().unwrap();
    }
}
