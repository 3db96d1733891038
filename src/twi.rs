//! The TWI master transaction engine.

use log::{debug, trace};

use crate::{
    config::{Prescaler, TwiConfig},
    error::Error,
    format_address,
    registers::{Registers, TWEA, TWEN, TWINT, TWSTA, TWSTO},
    scan::ScanReport,
    status::{Outcome, Phase, Status},
    wait::{Spin, Wait},
    Direction,
};

/// Whether a transfer releases the bus when it succeeds.
///
/// Aborted transfers always release the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StopPolicy {
    /// Finish with a STOP condition.
    Stop,
    /// Keep the bus so the next transfer begins with a repeated START.
    NoStop,
}

/// The reply the master gives to a received byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Acknowledge {
    Ack,
    /// Tells the slave this is the last byte it should send.
    Nack,
}

impl Acknowledge {
    fn outcome(self) -> Outcome {
        match self {
            Self::Ack => Outcome::Ack,
            Self::Nack => Outcome::Nack,
        }
    }
}

/// Where the engine is within a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusPhase {
    Idle,
    StartSent,
    AddressAcked(Direction),
    Data(Direction),
}

/// A TWI bus master.
///
/// Owns the controller registers, so holding a `&mut Twi` is holding the
/// bus. Every operation blocks through `W` until the hardware completes it;
/// with [`Spin`] a slave that stalls the bus stalls the caller with it.
pub struct Twi<R, W = Spin> {
    registers: R,
    wait: W,
    config: TwiConfig,
    phase: BusPhase,
}

impl<R: Registers, W: Wait> Twi<R, W> {
    /// Takes the controller and applies `config`.
    pub fn new(registers: R, wait: W, config: TwiConfig) -> Self {
        let mut twi = Self {
            registers,
            wait,
            config,
            phase: BusPhase::Idle,
        };
        twi.configure_with(config);
        twi
    }

    /// Programs the bit rate for `bit_rate_hz` with no prescaling.
    ///
    /// Rates the divisor cannot reach saturate silently, see
    /// [`TwiConfig::divisor`].
    pub fn configure(&mut self, bit_rate_hz: u32) {
        let config = TwiConfig {
            bit_rate_hz,
            prescaler: Prescaler::Div1,
            ..self.config
        };
        self.configure_with(config);
    }

    /// Programs bit rate and prescaler from `config` and enables the
    /// controller.
    pub fn configure_with(&mut self, config: TwiConfig) {
        let divisor = config.divisor();
        debug!(
            "twi: {} Hz requested, TWBR={} prescaler={}",
            config.bit_rate_hz,
            divisor,
            config.prescaler.factor()
        );
        self.registers.write_status(config.prescaler.bits());
        self.registers.write_bit_rate(divisor);
        self.registers.write_control(TWEN);
        self.config = config;
        self.phase = BusPhase::Idle;
    }

    pub fn config(&self) -> &TwiConfig {
        &self.config
    }

    pub fn phase(&self) -> BusPhase {
        self.phase
    }

    /// Decodes the current content of the status register.
    pub fn status(&mut self) -> Status {
        Status::from_byte(self.registers.read_status())
    }

    /// Gives back the controller and the wait strategy.
    pub fn free(self) -> (R, W) {
        (self.registers, self.wait)
    }

    fn await_hardware(&mut self) {
        let registers = &mut self.registers;
        self.wait.until(|| registers.read_control() & TWINT != 0);
    }

    /// Transmits a START condition, or a repeated START when the bus is
    /// already held.
    pub fn start(&mut self) -> Status {
        self.registers.write_control(TWINT | TWSTA | TWEN);
        self.await_hardware();
        let status = self.status();
        trace!("twi: start -> {:?}", status);
        if status.is_start() {
            self.phase = BusPhase::StartSent;
        }
        status
    }

    /// Transmits a STOP condition, releasing the bus.
    ///
    /// Safe to call on an idle bus.
    pub fn stop(&mut self) {
        self.registers.write_control(TWINT | TWSTO | TWEN);
        // TWINT is not raised after a STOP; the hardware clears TWSTO instead.
        let registers = &mut self.registers;
        self.wait.until(|| registers.read_control() & TWSTO == 0);
        trace!("twi: stop");
        self.phase = BusPhase::Idle;
    }

    /// Shifts one byte out, header or data, and returns the resulting status.
    ///
    /// The same ACK code space is used for headers and data, so the caller
    /// checks the status against the phase it expects.
    pub fn transmit(&mut self, byte: u8) -> Status {
        self.registers.write_data(byte);
        self.registers.write_control(TWINT | TWEN);
        self.await_hardware();
        let status = self.status();
        trace!("twi: transmit {:#04x} -> {:?}", byte, status);
        match status.phase {
            Phase::Address(direction) if status.outcome == Outcome::Ack => {
                self.phase = BusPhase::AddressAcked(direction)
            }
            Phase::Data(direction) => self.phase = BusPhase::Data(direction),
            _ => {}
        }
        status
    }

    /// Shifts one byte in and replies with `reply`.
    ///
    /// The last byte of a read must be answered with
    /// [`Acknowledge::Nack`], otherwise the slave keeps driving the bus.
    pub fn receive(&mut self, reply: Acknowledge) -> u8 {
        let control = match reply {
            Acknowledge::Ack => TWINT | TWEN | TWEA,
            Acknowledge::Nack => TWINT | TWEN,
        };
        self.registers.write_control(control);
        self.await_hardware();
        let byte = self.registers.read_data();
        trace!("twi: receive {:#04x} ({:?})", byte, reply);
        self.phase = BusPhase::Data(Direction::Read);
        byte
    }

    /// START followed by the header; fails unless the slave ACKs it.
    pub(crate) fn begin(&mut self, address: u8, direction: Direction) -> Result<(), Error> {
        let status = self.start();
        if !status.is_start() {
            return Err(Error::new(status, 0));
        }
        let status = self.transmit(format_address(address, direction));
        if !status.is_ack(Phase::Address(direction)) {
            return Err(Error::new(status, 0));
        }
        Ok(())
    }

    pub(crate) fn send(&mut self, bytes: &[u8]) -> Result<(), Error> {
        for (sent, &byte) in bytes.iter().enumerate() {
            let status = self.transmit(byte);
            if !status.is_ack(Phase::Data(Direction::Write)) {
                return Err(Error::new(status, sent));
            }
        }
        Ok(())
    }

    /// Fills `buffer`, ACKing every byte except the last one when
    /// `nack_last` is set.
    pub(crate) fn receive_into(
        &mut self,
        buffer: &mut [u8],
        nack_last: bool,
    ) -> Result<(), Error> {
        let last = buffer.len().saturating_sub(1);
        for (received, slot) in buffer.iter_mut().enumerate() {
            let reply = if nack_last && received == last {
                Acknowledge::Nack
            } else {
                Acknowledge::Ack
            };
            let byte = self.receive(reply);
            let status = self.status();
            if status != Status::new(Phase::Data(Direction::Read), reply.outcome()) {
                return Err(Error::new(status, received));
            }
            *slot = byte;
        }
        Ok(())
    }

    /// Releases the bus after an unexpected status.
    pub(crate) fn abort(&mut self, error: Error) -> Error {
        debug!("twi: abort, {:?} after {} byte(s)", error.status, error.transferred);
        self.stop();
        error
    }

    /// Writes `bytes` to the slave at `address`.
    ///
    /// On error the bus has been released and the error records how many
    /// bytes the slave acknowledged.
    pub fn try_write(
        &mut self,
        address: u8,
        bytes: &[u8],
        stop: StopPolicy,
    ) -> Result<(), Error> {
        if let Err(error) = self
            .begin(address, Direction::Write)
            .and_then(|()| self.send(bytes))
        {
            return Err(self.abort(error));
        }
        if stop == StopPolicy::Stop {
            self.stop();
        }
        Ok(())
    }

    /// Reads `buffer.len()` bytes from the slave at `address`, NACKing the
    /// last one.
    ///
    /// An empty `buffer` never addresses the slave for reading, since there
    /// would be no byte to NACK; a bus held from an earlier transfer is
    /// still released when `stop` asks for it.
    pub fn try_read(
        &mut self,
        address: u8,
        buffer: &mut [u8],
        stop: StopPolicy,
    ) -> Result<(), Error> {
        if buffer.is_empty() {
            if stop == StopPolicy::Stop && self.phase != BusPhase::Idle {
                self.stop();
            }
            return Ok(());
        }
        if let Err(error) = self
            .begin(address, Direction::Read)
            .and_then(|()| self.receive_into(buffer, true))
        {
            return Err(self.abort(error));
        }
        if stop == StopPolicy::Stop {
            self.stop();
        }
        Ok(())
    }

    /// Writes `bytes` and returns how many of them the slave acknowledged.
    ///
    /// A short count is the only sign of failure: 0 when the slave did not
    /// answer its address, `k` when it refused byte `k`. The bus is always
    /// released after a failure, and after a success unless `stop` is
    /// [`StopPolicy::NoStop`].
    pub fn write(&mut self, address: u8, bytes: &[u8], stop: StopPolicy) -> usize {
        match self.try_write(address, bytes, stop) {
            Ok(()) => bytes.len(),
            Err(error) => error.transferred,
        }
    }

    /// Reads into `buffer` and returns how many bytes arrived before the
    /// transfer completed or was aborted.
    pub fn read(&mut self, address: u8, buffer: &mut [u8], stop: StopPolicy) -> usize {
        match self.try_read(address, buffer, stop) {
            Ok(()) => buffer.len(),
            Err(error) => error.transferred,
        }
    }

    /// Writes `bytes`, then reads into `buffer` after a repeated START,
    /// holding the bus in between.
    pub fn write_read(
        &mut self,
        address: u8,
        bytes: &[u8],
        buffer: &mut [u8],
    ) -> Result<(), Error> {
        self.try_write(address, bytes, StopPolicy::NoStop)?;
        self.try_read(address, buffer, StopPolicy::Stop)
    }

    /// Whether a slave acknowledges `address`.
    pub fn probe(&mut self, address: u8) -> bool {
        let found = self.begin(address, Direction::Write).is_ok();
        self.stop();
        found
    }

    /// Probes every 7-bit address.
    pub fn scan(&mut self) -> ScanReport {
        let mut report = ScanReport::default();
        for address in 0..ScanReport::ADDRESSES {
            if self.probe(address) {
                debug!("twi: found slave at {:#04x}", address);
                report.insert(address);
            }
        }
        report
    }
}
