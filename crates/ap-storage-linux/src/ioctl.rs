//! Block device ioctls from linux/fs.h and linux/hdreg.h.

use ap_storage::{Error, Geometry};
use std::os::fd::RawFd;

const BLKRRPART: u32 = 0x125f;
const BLKSSZGET: u32 = 0x1268;
/// _IOR(0x12, 114, size_t)
#[cfg(target_pointer_width = "64")]
const BLKGETSIZE64: u32 = 0x8008_1272;
#[cfg(target_pointer_width = "32")]
const BLKGETSIZE64: u32 = 0x8004_1272;
const HDIO_GETGEO: u32 = 0x0301;

/// struct hd_geometry
#[repr(C)]
#[derive(Default)]
struct HdGeometry {
    heads: u8,
    sectors: u8,
    cylinders: u16,
    start: libc::c_ulong,
}

/// Issue an ioctl with a pointer argument.
fn ioctl<T>(fd: RawFd, request: u32, arg: *mut T) -> Result<(), Error> {
    let res = unsafe { libc::ioctl(fd, request as _, arg) };
    if res == -1 {
        return Err(std::io::Error::last_os_error().into());
    }
    Ok(())
}

pub(crate) fn sector_size(fd: RawFd) -> Result<u32, Error> {
    let mut size: libc::c_int = 0;
    ioctl(fd, BLKSSZGET, &mut size as *mut _).map_err(|e| e.context("BLKSSZGET"))?;
    Ok(size as u32)
}

pub(crate) fn size_bytes(fd: RawFd) -> Result<u64, Error> {
    let mut size: u64 = 0;
    ioctl(fd, BLKGETSIZE64, &mut size as *mut _).map_err(|e| e.context("BLKGETSIZE64"))?;
    Ok(size)
}

pub(crate) fn geometry(fd: RawFd) -> Result<Geometry, Error> {
    let mut geo = HdGeometry::default();
    ioctl(fd, HDIO_GETGEO, &mut geo as *mut _).map_err(|e| e.context("HDIO_GETGEO"))?;
    Ok(Geometry {
        heads: geo.heads as u32,
        sectors: geo.sectors as u32,
        cylinders: geo.cylinders as u32,
        start: geo.start as u64,
    })
}

pub(crate) fn reread_partitions(fd: RawFd) -> Result<(), Error> {
    ioctl(fd, BLKRRPART, core::ptr::null_mut::<libc::c_void>()).map_err(|e| e.context("BLKRRPART"))
}
