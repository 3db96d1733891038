#![cfg_attr(not(test), no_std)]

//! A blocking AVR TWI (I2C) master driver.
//!
//! The driver is split between a register-level handle ([`Registers`]),
//! which owns the bus controller, and the transaction engine ([`Twi`]),
//! which sequences START, address, data and STOP phases on top of it.
//! Every phase is a busy-wait through an injectable [`Wait`] strategy.
//!
//! ```ignore
//! use avr_twi::{hardware_atmega328p::Atmega328p, Spin, StopPolicy, Twi, TwiConfig};
//!
//! let registers = unsafe { Atmega328p::new() };
//! let mut twi = Twi::new(registers, Spin, TwiConfig::default());
//! let written = twi.write(0x3C, &[0x00, 0xAE], StopPolicy::Stop);
//! ```

pub mod config;
pub mod error;
mod hal;
pub mod registers;
pub mod scan;
pub mod status;
pub mod twi;
pub mod wait;

#[cfg(feature = "hardware-atmega328p")]
pub mod hardware_atmega328p;

#[cfg(test)]
mod sim;

pub use config::{Prescaler, TwiConfig};
pub use error::Error;
pub use registers::Registers;
pub use scan::ScanReport;
pub use status::{Outcome, Phase, Status};
pub use twi::{Acknowledge, BusPhase, StopPolicy, Twi};
pub use wait::{Spin, Wait};

/// Represents data direction used for the R/W bit in the I2C header.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    Write = 0,
    Read = 1,
}

/// Formats a 7-bit slave address into the header byte placed on the bus.
///
/// The address is shifted left one bit and the R/W bit is OR-ed in
/// (0 for [`Direction::Write`], 1 for [`Direction::Read`]).
pub const fn format_address(address: u8, direction: Direction) -> u8 {
    (address << 1) | direction as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn header_for_display_address() {
        assert_eq!(format_address(0x3C, Direction::Write), 0x78);
        assert_eq!(format_address(0x3C, Direction::Read), 0x79);
    }

    proptest! {
        #[test]
        fn header_shifts_address_and_sets_rw_bit(address in 0u8..0x80) {
            prop_assert_eq!(format_address(address, Direction::Write), address << 1);
            prop_assert_eq!(format_address(address, Direction::Read), (address << 1) | 1);
        }
    }
}
