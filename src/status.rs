//! Decoding of the 2-wire status register.
//!
//! The controller reuses one code space for every phase of a transaction,
//! so a raw code is decoded into the phase it reports on and the outcome
//! of that phase.

use crate::{registers::TWS_MASK, Direction};

/// The phase of a transaction a status code reports on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Phase {
    Start,
    RepeatedStart,
    Address(Direction),
    Data(Direction),
    /// Codes that are not tied to a single phase (arbitration loss,
    /// bus error, no information).
    Any,
}

/// The outcome reported for a [`Phase`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Outcome {
    /// The START or repeated START condition was transmitted.
    Transmitted,
    /// An ACK was received (address or transmitted data) or returned
    /// (received data).
    Ack,
    /// A NACK was received or returned.
    Nack,
    ArbitrationLost,
    BusError,
    /// No relevant state information is available; the bus is idle.
    NoInformation,
    /// A code this driver does not know about, masked.
    Unrecognized(u8),
}

/// A decoded value of the 2-wire status register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Status {
    pub phase: Phase,
    pub outcome: Outcome,
}

impl Status {
    pub const fn new(phase: Phase, outcome: Outcome) -> Self {
        Self { phase, outcome }
    }

    /// Translates a raw TWSR value into a [`Status`].
    ///
    /// The prescaler bits are ignored.
    pub const fn from_byte(value: u8) -> Self {
        use Direction::{Read, Write};

        match value & TWS_MASK {
            0x00 => Self::new(Phase::Any, Outcome::BusError),
            0x08 => Self::new(Phase::Start, Outcome::Transmitted),
            0x10 => Self::new(Phase::RepeatedStart, Outcome::Transmitted),
            0x18 => Self::new(Phase::Address(Write), Outcome::Ack),
            0x20 => Self::new(Phase::Address(Write), Outcome::Nack),
            0x28 => Self::new(Phase::Data(Write), Outcome::Ack),
            0x30 => Self::new(Phase::Data(Write), Outcome::Nack),
            0x38 => Self::new(Phase::Any, Outcome::ArbitrationLost),
            0x40 => Self::new(Phase::Address(Read), Outcome::Ack),
            0x48 => Self::new(Phase::Address(Read), Outcome::Nack),
            0x50 => Self::new(Phase::Data(Read), Outcome::Ack),
            0x58 => Self::new(Phase::Data(Read), Outcome::Nack),
            0xF8 => Self::new(Phase::Any, Outcome::NoInformation),
            other => Self::new(Phase::Any, Outcome::Unrecognized(other)),
        }
    }

    /// Translates a [`Status`] back into the raw TWSR status bits.
    pub const fn to_byte(self) -> u8 {
        use Direction::{Read, Write};

        match (self.phase, self.outcome) {
            (Phase::Start, _) => 0x08,
            (Phase::RepeatedStart, _) => 0x10,
            (Phase::Address(Write), Outcome::Ack) => 0x18,
            (Phase::Address(Write), _) => 0x20,
            (Phase::Data(Write), Outcome::Ack) => 0x28,
            (Phase::Data(Write), _) => 0x30,
            (Phase::Address(Read), Outcome::Ack) => 0x40,
            (Phase::Address(Read), _) => 0x48,
            (Phase::Data(Read), Outcome::Ack) => 0x50,
            (Phase::Data(Read), _) => 0x58,
            (Phase::Any, Outcome::ArbitrationLost) => 0x38,
            (Phase::Any, Outcome::BusError) => 0x00,
            (Phase::Any, Outcome::Unrecognized(raw)) => raw & TWS_MASK,
            (Phase::Any, _) => 0xF8,
        }
    }

    /// Whether a START or repeated START went out.
    pub const fn is_start(self) -> bool {
        matches!(self.phase, Phase::Start | Phase::RepeatedStart)
            && matches!(self.outcome, Outcome::Transmitted)
    }

    /// Whether this is an ACK reported for `phase`.
    pub fn is_ack(self, phase: Phase) -> bool {
        self.phase == phase && self.outcome == Outcome::Ack
    }
}
