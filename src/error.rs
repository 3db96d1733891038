//! Transaction errors.

use core::fmt;

use embedded_hal::i2c::{ErrorKind, NoAcknowledgeSource};

use crate::status::{Outcome, Phase, Status};

/// A transaction was aborted by an unexpected status code.
///
/// The bus has already been released with a STOP condition by the time
/// this error is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Error {
    /// The status that aborted the transaction.
    pub status: Status,
    /// Data bytes acknowledged (writes) or received (reads) before the abort.
    pub transferred: usize,
}

impl Error {
    pub const fn new(status: Status, transferred: usize) -> Self {
        Self {
            status,
            transferred,
        }
    }

    /// Whether the slave did not acknowledge its address.
    pub fn is_address_nack(&self) -> bool {
        matches!(
            self.status,
            Status {
                phase: Phase::Address(_),
                outcome: Outcome::Nack,
            }
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.status.phase, self.status.outcome) {
            (Phase::Address(_), Outcome::Nack) => f.write_str("address not acknowledged"),
            (Phase::Data(_), Outcome::Nack) => write!(
                f,
                "data not acknowledged after {} byte(s)",
                self.transferred
            ),
            (_, Outcome::ArbitrationLost) => f.write_str("arbitration lost"),
            (_, Outcome::BusError) => f.write_str("bus error"),
            _ => write!(
                f,
                "unexpected status {:#04x} after {} byte(s)",
                self.status.to_byte(),
                self.transferred
            ),
        }
    }
}

impl embedded_hal::i2c::Error for Error {
    fn kind(&self) -> ErrorKind {
        match (self.status.phase, self.status.outcome) {
            (Phase::Address(_), Outcome::Nack) => {
                ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address)
            }
            (Phase::Data(_), Outcome::Nack) => ErrorKind::NoAcknowledge(NoAcknowledgeSource::Data),
            (_, Outcome::ArbitrationLost) => ErrorKind::ArbitrationLoss,
            (_, Outcome::BusError) => ErrorKind::Bus,
            _ => ErrorKind::Other,
        }
    }
}
