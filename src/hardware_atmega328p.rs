//! The memory-mapped 2-wire interface of the ATMega328P.

use crate::registers::Registers;

/// TWBR, holding the SCL divisor.
pub const TWBR: *mut u8 = 0x00B8 as *mut u8;

/// TWSR, status code in the high five bits, prescaler in the low two.
pub const TWSR: *mut u8 = 0x00B9 as *mut u8;

/// TWDR, the byte shifted out or in.
pub const TWDR: *mut u8 = 0x00BB as *mut u8;

/// TWCR, start/stop/ack requests and the TWINT completion flag.
pub const TWCR: *mut u8 = 0x00BC as *mut u8;

/// [`Registers`] backed by the ATmega328P's memory-mapped TWI block.
pub struct Atmega328p {
    _private: (),
}

impl Atmega328p {
    /// Claims the 2-wire interface.
    ///
    /// # Safety
    ///
    /// Only one instance may exist at a time, and nothing else may touch
    /// the TWI registers while it does.
    pub const unsafe fn new() -> Self {
        Self { _private: () }
    }
}

impl Registers for Atmega328p {
    fn write_bit_rate(&mut self, value: u8) {
        unsafe { TWBR.write_volatile(value) }
    }

    fn read_status(&mut self) -> u8 {
        unsafe { TWSR.read_volatile() }
    }

    fn write_status(&mut self, value: u8) {
        unsafe { TWSR.write_volatile(value) }
    }

    fn read_data(&mut self) -> u8 {
        unsafe { TWDR.read_volatile() }
    }

    fn write_data(&mut self, value: u8) {
        unsafe { TWDR.write_volatile(value) }
    }

    fn read_control(&mut self) -> u8 {
        unsafe { TWCR.read_volatile() }
    }

    fn write_control(&mut self, value: u8) {
        unsafe { TWCR.write_volatile(value) }
    }
}
