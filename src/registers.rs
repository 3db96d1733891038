//! Register-level access to the 2-wire bus controller.

/// The mask for the TWCR interrupt bit
pub const TWINT: u8 = 0x80;

/// The mask for the TWCR enable acknowledge bit
pub const TWEA: u8 = 0x40;

/// The mask for the TWCR start condition bit
pub const TWSTA: u8 = 0x20;

/// The mask for the TWCR stop condition bit
pub const TWSTO: u8 = 0x10;

/// The mask for the TWCR enable bit
pub const TWEN: u8 = 0x04;

/// The mask for the status bits of TWSR
pub const TWS_MASK: u8 = 0xF8;

/// The mask for the prescaler bits of TWSR
pub const TWPS_MASK: u8 = 0x03;

/// Exclusive handle on the registers of one 2-wire bus controller.
///
/// Implementations stand for the peripheral itself: holding a value of
/// this type is what grants the right to drive the bus. The memory-mapped
/// ATmega328P implementation lives in `hardware_atmega328p`; tests drive
/// the engine with a simulated controller instead.
pub trait Registers {
    /// Writes the bit rate register (TWBR).
    fn write_bit_rate(&mut self, value: u8);

    /// Reads the status register (TWSR), including the prescaler bits.
    fn read_status(&mut self) -> u8;

    /// Writes the status register (TWSR). Only the prescaler bits are
    /// writable on hardware.
    fn write_status(&mut self, value: u8);

    /// Reads the data register (TWDR).
    fn read_data(&mut self) -> u8;

    /// Writes the data register (TWDR).
    fn write_data(&mut self, value: u8);

    /// Reads the control register (TWCR).
    fn read_control(&mut self) -> u8;

    /// Writes the control register (TWCR).
    fn write_control(&mut self, value: u8);
}

impl<R: Registers + ?Sized> Registers for &mut R {
    fn write_bit_rate(&mut self, value: u8) {
        (**self).write_bit_rate(value)
    }

    fn read_status(&mut self) -> u8 {
        (**self).read_status()
    }

    fn write_status(&mut self, value: u8) {
        (**self).write_status(value)
    }

    fn read_data(&mut self) -> u8 {
        (**self).read_data()
    }

    fn write_data(&mut self, value: u8) {
        (**self).write_data(value)
    }

    fn read_control(&mut self) -> u8 {
        (**self).read_control()
    }

    fn write_control(&mut self, value: u8) {
        (**self).write_control(value)
    }
}
