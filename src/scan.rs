//! Bus scan results.

use core::fmt;

/// The set of 7-bit addresses that answered a scan.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScanReport {
    present: u128,
}

impl ScanReport {
    /// Number of 7-bit addresses.
    pub const ADDRESSES: u8 = 128;

    pub fn insert(&mut self, address: u8) {
        if address < Self::ADDRESSES {
            self.present |= 1u128 << address;
        }
    }

    pub fn contains(&self, address: u8) -> bool {
        address < Self::ADDRESSES && self.present & (1u128 << address) != 0
    }

    pub fn len(&self) -> usize {
        self.present.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.present == 0
    }

    /// Responding addresses, lowest first.
    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        (0..Self::ADDRESSES).filter(move |&address| self.contains(address))
    }
}

/// Renders the i2cdetect-style grid: one row per high nibble, `--` for
/// silent addresses.
impl fmt::Display for ScanReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("  ")?;
        for low in 0..16 {
            write!(f, " {:02X}", low)?;
        }
        f.write_str("\n")?;
        for high in 0..8u8 {
            write!(f, "{:X}0", high)?;
            for low in 0..16u8 {
                let address = high << 4 | low;
                if self.contains(address) {
                    write!(f, " {:02X}", address)?;
                } else {
                    f.write_str(" --")?;
                }
            }
            f.write_str("\n")?;
        }
        Ok(())
    }
}
