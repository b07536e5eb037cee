//! Scripted transport for tests
//!
//! Each scripted reply is released into the receive buffer when the driver
//! hands the line back after a write, the way the module answers after the
//! turnaround.

use std::collections::VecDeque;
use std::string::String;
use std::vec::Vec;

use embedded_hal::delay::DelayNs;

use crate::transport::{Direction, Transport};
use crate::Device;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusFault;

#[derive(Debug)]
pub struct MockTransport {
    replies: VecDeque<Vec<u8>>,
    rx: VecDeque<u8>,
    direction: Direction,
    writes: Vec<Vec<u8>>,
    pub directions: Vec<Direction>,
    /// Accept at most this many bytes per write
    pub write_limit: Option<usize>,
    pub fail_writes: bool,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            replies: VecDeque::new(),
            rx: VecDeque::new(),
            direction: Direction::Receive,
            writes: Vec::new(),
            directions: Vec::new(),
            write_limit: None,
            fail_writes: false,
        }
    }

    pub fn push_reply(&mut self, reply: &[u8]) {
        self.replies.push_back(reply.to_vec());
    }

    /// Makes bytes pending right away, like radio traffic arriving.
    pub fn push_incoming(&mut self, bytes: &[u8]) {
        self.rx.extend(bytes.iter().copied());
    }

    pub fn writes(&self) -> &[Vec<u8>] {
        &self.writes
    }

    pub fn written(&self) -> Vec<String> {
        self.writes
            .iter()
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
            .collect()
    }
}

impl Transport for MockTransport {
    type Error = BusFault;

    fn available(&mut self) -> usize {
        self.rx.len()
    }

    fn read_byte(&mut self) -> Result<u8, Self::Error> {
        self.rx.pop_front().ok_or(BusFault)
    }

    fn write(&mut self, bytes: &[u8]) -> Result<usize, Self::Error> {
        if self.fail_writes || self.direction != Direction::Transmit {
            return Err(BusFault);
        }
        let accepted = self.write_limit.map_or(bytes.len(), |limit| limit.min(bytes.len()));
        self.writes.push(bytes[..accepted].to_vec());
        Ok(accepted)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    fn set_direction(&mut self, direction: Direction) -> Result<(), Self::Error> {
        if self.direction == Direction::Transmit && direction == Direction::Receive {
            if let Some(reply) = self.replies.pop_front() {
                self.rx.extend(reply);
            }
        }
        self.direction = direction;
        self.directions.push(direction);
        Ok(())
    }

    fn wait_for_input(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Delay that only adds up what it was asked to wait.
#[derive(Debug, Default)]
pub struct MockDelay {
    total_ns: u64,
}

impl MockDelay {
    pub fn total_ms(&self) -> u64 {
        self.total_ns / 1_000_000
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.total_ns += u64::from(ns);
    }
}

/// Driver over a transport that plays back `replies` in order.
pub fn device(replies: &[&str]) -> Device<MockTransport, MockDelay> {
    let mut transport = MockTransport::new();
    for reply in replies {
        transport.push_reply(reply.as_bytes());
    }
    Device::new(transport, MockDelay::default())
}
