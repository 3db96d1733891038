//! `embedded-hal` bus implementation, so display and sensor drivers can run
//! on top of [`Twi`].

use embedded_hal::i2c::{ErrorType, I2c, Operation, SevenBitAddress};

use crate::{error::Error, registers::Registers, twi::Twi, wait::Wait, Direction};

impl<R: Registers, W: Wait> ErrorType for Twi<R, W> {
    type Error = Error;
}

fn direction(operation: &Operation<'_>) -> Direction {
    match operation {
        Operation::Read(_) => Direction::Read,
        Operation::Write(_) => Direction::Write,
    }
}

/// Reads with nothing to receive put no bytes on the bus and are skipped.
fn is_empty_read(operation: &Operation<'_>) -> bool {
    matches!(operation, Operation::Read(buffer) if buffer.is_empty())
}

impl<R: Registers, W: Wait> Twi<R, W> {
    /// Runs `operations` as one transaction without the final STOP and
    /// returns whether the bus was taken.
    ///
    /// Adjacent operations in the same direction share one header; a
    /// direction change issues a repeated START. Only the last byte of a
    /// run of reads is NACKed.
    fn run(&mut self, address: u8, operations: &mut [Operation<'_>]) -> Result<bool, Error> {
        let mut previous = None;
        for index in 0..operations.len() {
            if is_empty_read(&operations[index]) {
                continue;
            }
            let next = operations[index + 1..]
                .iter()
                .find(|operation| !is_empty_read(operation))
                .map(direction);
            let current = direction(&operations[index]);
            if previous != Some(current) {
                self.begin(address, current)?;
            }
            match &mut operations[index] {
                Operation::Write(bytes) => self.send(bytes)?,
                Operation::Read(buffer) => {
                    self.receive_into(buffer, next != Some(Direction::Read))?
                }
            }
            previous = Some(current);
        }
        Ok(previous.is_some())
    }
}

impl<R: Registers, W: Wait> I2c<SevenBitAddress> for Twi<R, W> {
    fn transaction(
        &mut self,
        address: SevenBitAddress,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        match self.run(address, operations) {
            Ok(true) => {
                self.stop();
                Ok(())
            }
            Ok(false) => Ok(()),
            Err(error) => Err(self.abort(error)),
        }
    }
}
