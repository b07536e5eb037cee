//! Payload transmission and reception
//!
//! Once the module is back in data mode, bytes written to it go over the air.
//! How they are framed depends on the work mode:
//! - [`WorkMode::Transparent`]: the payload is sent as is and reaches every
//!   module on the same channel and address
//! - [`WorkMode::FixedPoint`]: every payload is preceded by a 3 byte header
//!   `[addr_hi][addr_lo][channel]` naming its destination
//!
//! Received data carries no framing in either mode; [`Device::receive`]
//! returns whatever bytes arrived.
//!
//! # Important Notes
//! - The work mode is checked against the store; an unknown work mode fails
//!   both kinds of send. Call [`Device::get_work_mode`] first if needed
//! - Nothing is written when a check fails

use embedded_hal::delay::DelayNs;

use crate::settings::{WorkMode, CHANNELS};
use crate::{Device, Error, Transport};

/// Largest payload of a fixed-point frame
pub const MAX_PAYLOAD: usize = 512;

/// Address and channel bytes in front of a fixed-point payload
pub const HEADER_LEN: usize = 3;

/// Capacity of a fixed-point frame
pub const FRAME_CAPACITY: usize = HEADER_LEN + MAX_PAYLOAD;

/// Fixed-point frame ready to be written
pub type Frame = heapless::Vec<u8, FRAME_CAPACITY>;

/// Builds a fixed-point frame: big-endian address, channel, then payload.
///
/// # Errors
/// * `Error::InvalidParameter` - `channel` is outside 0-127
/// * `Error::PayloadTooLong` - `payload` exceeds [`MAX_PAYLOAD`]
pub fn fixed_point_frame(address: u16, channel: u8, payload: &[u8]) -> Result<Frame, Error> {
    if !CHANNELS.contains(&channel) {
        return Err(Error::InvalidParameter);
    }
    if payload.len() > MAX_PAYLOAD {
        return Err(Error::PayloadTooLong);
    }

    let mut frame = Frame::new();
    let [hi, lo] = address.to_be_bytes();
    frame
        .extend_from_slice(&[hi, lo, channel])
        .map_err(|_| Error::PayloadTooLong)?;
    frame
        .extend_from_slice(payload)
        .map_err(|_| Error::PayloadTooLong)?;
    Ok(frame)
}

impl<T, D> Device<T, D>
where
    T: Transport,
    D: DelayNs,
{
    /// Sends `payload` verbatim in transparent mode.
    ///
    /// Returns the number of bytes the transport accepted.
    ///
    /// # Errors
    /// * `Error::WorkModeMismatch` - The work mode is not known to be
    ///   transparent
    /// * `Error::Bus` - The transport failed
    pub fn send(&mut self, payload: &[u8]) -> Result<usize, Error> {
        if self.settings.work_mode != Some(WorkMode::Transparent) {
            return Err(Error::WorkModeMismatch);
        }
        self.transmit(payload)
    }

    /// Sends `payload` to `address` on `channel` in fixed-point mode.
    ///
    /// Header and payload go out in a single write, which must be accepted
    /// in full.
    ///
    /// # Errors
    /// * `Error::WorkModeMismatch` - The work mode is not known to be
    ///   fixed-point
    /// * `Error::InvalidParameter` - `channel` is outside 0-127
    /// * `Error::PayloadTooLong` - `payload` exceeds [`MAX_PAYLOAD`]
    /// * `Error::ShortWrite` - The transport accepted only part of the frame
    /// * `Error::Bus` - The transport failed
    pub fn send_to(&mut self, address: u16, channel: u8, payload: &[u8]) -> Result<(), Error> {
        if self.settings.work_mode != Some(WorkMode::FixedPoint) {
            return Err(Error::WorkModeMismatch);
        }

        let frame = fixed_point_frame(address, channel, payload)?;
        let written = self.transmit(&frame)?;
        if written != frame.len() {
            warn!("short write: {} of {} bytes", written, frame.len());
            return Err(Error::ShortWrite);
        }
        Ok(())
    }

    /// Waits for incoming data and copies it into `buffer`.
    ///
    /// Keeps draining while bytes keep arriving, until the transport runs
    /// dry or `buffer` is full. Returns the number of bytes copied, zero if
    /// the transport gave up waiting without receiving anything.
    pub fn receive(&mut self, buffer: &mut [u8]) -> Result<usize, Error> {
        self.wait_for_input()?;
        let len = self.drain(buffer)?;
        trace!("received {} bytes", len);
        Ok(len)
    }
}
