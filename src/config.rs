//! Bit rate configuration.

use crate::registers::TWPS_MASK;

/// Input clock of the controller on a stock 16 MHz board.
pub const DEFAULT_CPU_HZ: u32 = 16_000_000;

/// Standard-mode bit rate.
pub const STANDARD_MODE_HZ: u32 = 100_000;

/// Fast-mode bit rate.
pub const FAST_MODE_HZ: u32 = 400_000;

/// Bit rate prescaler, stored in the low bits of TWSR.
#[repr(u8)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Prescaler {
    #[default]
    Div1 = 0b00,
    Div4 = 0b01,
    Div16 = 0b10,
    Div64 = 0b11,
}

impl Prescaler {
    /// The division factor this prescaler applies.
    pub const fn factor(self) -> u32 {
        match self {
            Self::Div1 => 1,
            Self::Div4 => 4,
            Self::Div16 => 16,
            Self::Div64 => 64,
        }
    }

    /// The TWPS bits for this prescaler.
    pub const fn bits(self) -> u8 {
        self as u8 & TWPS_MASK
    }
}

/// Bus configuration applied by [`Twi::configure_with`].
///
/// [`Twi::configure_with`]: crate::Twi::configure_with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TwiConfig {
    /// Frequency of the clock feeding the controller.
    pub cpu_hz: u32,
    /// Target SCL frequency.
    pub bit_rate_hz: u32,
    pub prescaler: Prescaler,
}

impl Default for TwiConfig {
    fn default() -> Self {
        Self {
            cpu_hz: DEFAULT_CPU_HZ,
            bit_rate_hz: STANDARD_MODE_HZ,
            prescaler: Prescaler::Div1,
        }
    }
}

impl TwiConfig {
    /// A configuration for `bit_rate_hz` on a [`DEFAULT_CPU_HZ`] clock.
    pub const fn new(bit_rate_hz: u32) -> Self {
        Self {
            cpu_hz: DEFAULT_CPU_HZ,
            bit_rate_hz,
            prescaler: Prescaler::Div1,
        }
    }

    pub const fn with_cpu_hz(mut self, cpu_hz: u32) -> Self {
        self.cpu_hz = cpu_hz;
        self
    }

    pub const fn with_prescaler(mut self, prescaler: Prescaler) -> Self {
        self.prescaler = prescaler;
        self
    }

    /// Computes the TWBR value for this configuration.
    ///
    /// `TWBR = (cpu_hz / bit_rate_hz - 16) / (2 * prescaler)`
    ///
    /// Rates faster than the controller can reach give 0, rates slower
    /// than it can reach saturate at 255. Neither case is reported.
    pub const fn divisor(&self) -> u8 {
        if self.bit_rate_hz == 0 {
            return u8::MAX;
        }
        let ratio = self.cpu_hz / self.bit_rate_hz;
        if ratio <= 16 {
            return 0;
        }
        let divisor = (ratio - 16) / (2 * self.prescaler.factor());
        if divisor > u8::MAX as u32 {
            u8::MAX
        } else {
            divisor as u8
        }
    }

    /// The SCL frequency the hardware will actually run at.
    pub const fn effective_bit_rate_hz(&self) -> u32 {
        self.cpu_hz / (16 + 2 * self.divisor() as u32 * self.prescaler.factor())
    }
}
