//! Half-duplex transport contract
//!
//! The radio hangs off an RS-485 transceiver, so only one side may drive the
//! line at a time. The driver never opens ports or toggles pins itself; it
//! consumes this trait and the board support code implements it on top of
//! its UART and direction (DE/RE) pin.
//!
//! # Important Notes
//! - The driver switches to [`Direction::Transmit`] before every write and
//!   back to [`Direction::Receive`] after flushing
//! - [`Transport::wait_for_input`] is the only place the driver blocks on the
//!   device. Any timeout must live in the implementation; returning with no
//!   bytes pending is reported as [`Error::NoResponse`](crate::Error::NoResponse)
//! - The delay constants were tuned on real transceivers. Override them when
//!   the turnaround time of your hardware differs

/// Bus direction of the half-duplex transceiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Driver enabled, this side owns the line
    Transmit,
    /// Driver released, listening to the module
    Receive,
}

/// Byte stream with explicit direction control.
pub trait Transport {
    /// Error reported by the underlying UART or direction pin
    type Error;

    /// Settle time in milliseconds after switching to [`Direction::Transmit`]
    /// before the line may be driven.
    const SWITCH_SETTLE_MS: u32 = 10;

    /// Pause in milliseconds between drain passes so bytes still in flight
    /// can accumulate in the receive buffer.
    const READ_GAP_MS: u32 = 10;

    /// Number of received bytes that can be read without blocking.
    fn available(&mut self) -> usize;

    /// Reads one pending byte.
    fn read_byte(&mut self) -> Result<u8, Self::Error>;

    /// Writes `bytes`, returning how many were accepted.
    fn write(&mut self, bytes: &[u8]) -> Result<usize, Self::Error>;

    /// Blocks until every written byte has left the UART.
    fn flush(&mut self) -> Result<(), Self::Error>;

    /// Switches the transceiver direction.
    fn set_direction(&mut self, direction: Direction) -> Result<(), Self::Error>;

    /// Blocks until at least one byte is pending or the transport's own
    /// timeout expires.
    fn wait_for_input(&mut self) -> Result<(), Self::Error>;
}
