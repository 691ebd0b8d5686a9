//! Legacy cylinder-head-sector addressing.

use ap_storage::Geometry;

/// Addresses above this cannot be expressed in CHS.
pub const CHS_LIMIT: u64 = 0xff_ffff;

/// A packed CHS address.
///
/// The sector byte holds the sector in the low six bits and bits 8-9 of
/// the cylinder in the upper two.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Chs {
    pub head: u8,
    pub sector: u8,
    pub cylinder: u8,
}

impl Chs {
    /// Marker for addresses beyond the CHS range.
    pub const OVERFLOW: Chs = Chs {
        head: 0xfe,
        sector: 0xff,
        cylinder: 0xff,
    };

    /// Encode an absolute sector address starting from the zero triple.
    pub fn encode(addr: u64, geo: &Geometry) -> Self {
        let mut res = Self::default();
        res.update(addr, geo);
        res
    }

    /// Set the triple to the given sector address.
    ///
    /// A geometry without heads or sectors leaves the triple untouched.
    pub fn update(&mut self, addr: u64, geo: &Geometry) {
        if addr > CHS_LIMIT {
            *self = Self::OVERFLOW;
            return;
        }
        if geo.sectors == 0 || geo.heads == 0 {
            return;
        }
        let sectors = geo.sectors as u64;
        let heads = geo.heads as u64;
        let mut l = addr;
        self.sector = ((l % sectors) & 0x3f) as u8;
        l /= sectors;
        self.head = ((l % heads) & 0xff) as u8;
        l /= heads;
        self.cylinder = (l & 0xff) as u8;
        self.sector |= ((l >> 2) & 0xc0) as u8;
    }

    /// The full 10-bit cylinder.
    pub fn cylinder(&self) -> u16 {
        (self.sector as u16 & 0xc0) << 2 | self.cylinder as u16
    }

    /// The sector without the cylinder bits.
    pub fn sector(&self) -> u8 {
        self.sector & 0x3f
    }

    /// The sector address this triple stands for.
    pub fn to_lba(&self, geo: &Geometry) -> u64 {
        (self.cylinder() as u64 * geo.heads as u64 + self.head as u64) * geo.sectors as u64 + self.sector() as u64
    }

    pub fn to_bytes(&self) -> [u8; 3] {
        [self.head, self.sector, self.cylinder]
    }

    pub fn from_bytes(buf: [u8; 3]) -> Self {
        Self {
            head: buf[0],
            sector: buf[1],
            cylinder: buf[2],
        }
    }
}
