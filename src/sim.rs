//! A simulated 2-wire controller with scripted slaves, for unit tests.

use std::collections::VecDeque;

use crate::registers::{Registers, TWEA, TWEN, TWINT, TWPS_MASK, TWSTA, TWSTO};
use crate::wait::Wait;

/// What the simulated slaves saw on the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Start,
    RepeatedStart,
    Stop,
    Header(u8),
    Sent(u8),
    Received { byte: u8, ack: bool },
}

#[derive(Debug, Default)]
pub struct Slave {
    address: u8,
    nack_byte: Option<usize>,
    lose_arbitration_at: Option<usize>,
    lose_arbitration_on_read: Option<usize>,
    bus_error_at: Option<usize>,
    replies: VecDeque<u8>,
    sent: usize,
    pub written: Vec<u8>,
}

impl Slave {
    pub fn new(address: u8) -> Self {
        Self {
            address,
            ..Self::default()
        }
    }

    /// NACK the data byte with this zero-based index.
    pub fn nack_byte(mut self, index: usize) -> Self {
        self.nack_byte = Some(index);
        self
    }

    /// Report arbitration loss while the master sends this data byte.
    pub fn lose_arbitration_at(mut self, index: usize) -> Self {
        self.lose_arbitration_at = Some(index);
        self
    }

    /// Report arbitration loss while the master clocks in the byte with
    /// this zero-based index.
    pub fn lose_arbitration_on_read(mut self, index: usize) -> Self {
        self.lose_arbitration_on_read = Some(index);
        self
    }

    /// Report an illegal START/STOP while the master sends this data byte.
    pub fn bus_error_at(mut self, index: usize) -> Self {
        self.bus_error_at = Some(index);
        self
    }

    pub fn replies(mut self, bytes: &[u8]) -> Self {
        self.replies.extend(bytes);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    Started,
    Transmitter(usize),
    Receiver(usize),
    /// The header was not acknowledged; data phases are illegal.
    Detached,
}

pub struct SimBus {
    pub slaves: Vec<Slave>,
    pub events: Vec<Event>,
    pub bit_rate: u8,
    prescaler: u8,
    data: u8,
    control: u8,
    status: u8,
    state: State,
    start_failure: Option<u8>,
}

impl SimBus {
    pub fn new(slaves: Vec<Slave>) -> Self {
        Self {
            slaves,
            events: Vec::new(),
            bit_rate: 0,
            prescaler: 0,
            data: 0,
            control: 0,
            status: 0xF8,
            state: State::Idle,
            start_failure: None,
        }
    }

    /// Answer every START with `status` instead of start-ok.
    pub fn fail_start(mut self, status: u8) -> Self {
        self.start_failure = Some(status);
        self
    }

    pub fn stops(&self) -> usize {
        self.events.iter().filter(|e| **e == Event::Stop).count()
    }

    pub fn enabled(&self) -> bool {
        self.control & TWEN != 0
    }

    fn complete(&mut self, status: u8) {
        self.status = status;
        self.control |= TWINT;
    }

    fn address_phase(&mut self) {
        let header = self.data;
        self.events.push(Event::Header(header));
        let address = header >> 1;
        let read = header & 1 == 1;
        match self.slaves.iter().position(|s| s.address == address) {
            Some(index) if read => {
                self.state = State::Receiver(index);
                self.complete(0x40);
            }
            Some(index) => {
                self.state = State::Transmitter(index);
                self.complete(0x18);
            }
            None => {
                self.state = State::Detached;
                self.complete(if read { 0x48 } else { 0x20 });
            }
        }
    }

    fn transmit_phase(&mut self, index: usize) {
        let byte = self.data;
        self.events.push(Event::Sent(byte));
        let slave = &mut self.slaves[index];
        let position = slave.written.len();
        slave.written.push(byte);
        let lost = slave.lose_arbitration_at == Some(position);
        let nack = slave.nack_byte == Some(position);
        let bus_error = slave.bus_error_at == Some(position);
        let status = if lost {
            self.state = State::Detached;
            0x38
        } else if bus_error {
            self.state = State::Detached;
            0x00
        } else if nack {
            0x30
        } else {
            0x28
        };
        self.complete(status);
    }

    fn receive_phase(&mut self, index: usize, ack: bool) {
        let slave = &mut self.slaves[index];
        let position = slave.sent;
        if slave.lose_arbitration_on_read == Some(position) {
            self.state = State::Detached;
            self.complete(0x38);
            return;
        }
        slave.sent += 1;
        let byte = slave.replies.pop_front().unwrap_or(0xFF);
        self.data = byte;
        self.events.push(Event::Received { byte, ack });
        self.complete(if ack { 0x50 } else { 0x58 });
    }
}

impl Registers for SimBus {
    fn write_bit_rate(&mut self, value: u8) {
        self.bit_rate = value;
    }

    fn read_status(&mut self) -> u8 {
        self.status | self.prescaler
    }

    fn write_status(&mut self, value: u8) {
        self.prescaler = value & TWPS_MASK;
    }

    fn read_data(&mut self) -> u8 {
        self.data
    }

    fn write_data(&mut self, value: u8) {
        self.data = value;
    }

    fn read_control(&mut self) -> u8 {
        self.control
    }

    fn write_control(&mut self, value: u8) {
        // Writing a one to TWINT clears the flag and starts the operation.
        self.control = value & !TWINT;
        if value & TWEN == 0 || value & TWINT == 0 {
            return;
        }

        if value & TWSTA != 0 {
            if let Some(status) = self.start_failure {
                self.state = State::Detached;
                self.complete(status);
                return;
            }
            let status = if self.state == State::Idle {
                self.events.push(Event::Start);
                0x08
            } else {
                self.events.push(Event::RepeatedStart);
                0x10
            };
            self.state = State::Started;
            self.complete(status);
        } else if value & TWSTO != 0 {
            self.events.push(Event::Stop);
            self.state = State::Idle;
            self.status = 0xF8;
            self.control &= !TWSTO;
        } else {
            match self.state {
                State::Started => self.address_phase(),
                State::Transmitter(index) => self.transmit_phase(index),
                State::Receiver(index) => self.receive_phase(index, value & TWEA != 0),
                State::Idle | State::Detached => self.complete(0x00),
            }
        }
    }
}

/// A [`Wait`] that fails the test instead of hanging.
#[derive(Debug, Default)]
pub struct Bounded {
    pub polls: usize,
}

impl Wait for Bounded {
    fn until<F: FnMut() -> bool>(&mut self, mut ready: F) {
        for _ in 0..16 {
            self.polls += 1;
            if ready() {
                return;
            }
        }
        panic!("bus operation never completed");
    }
}
