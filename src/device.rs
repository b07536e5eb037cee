//! USR-LG206-P device interface
//!
//! This module provides the driver handle and the command/response engine
//! every setting accessor is built on.
//!
//! The interface is built around the `Device<T, D>` struct which wraps a
//! half-duplex [`Transport`] and a delay provider and provides methods for:
//! - Sending `AT` commands and classifying the module's reply
//! - Reading setting values out of query replies
//! - Keeping the [`Settings`] store in step with the module
//!
//! # Example
//! ```no_run
//! use usr_lg206p::{Device, Switch};
//!
//! # fn run<T: usr_lg206p::Transport, D: embedded_hal::delay::DelayNs>(transport: T, delay: D)
//! # -> Result<(), usr_lg206p::Error> {
//! let mut radio = Device::new(transport, delay);
//!
//! radio.enter_config_mode()?;
//! radio.set_channel(72)?;
//! radio.set_forward_error_correction(Switch::On)?;
//! radio.exit_config_mode()?;
//! # Ok(())
//! # }
//! ```

use core::fmt::{self, Write};

use embedded_hal::delay::DelayNs;

use crate::error::Error;
use crate::response::{self, Response, Value, RESPONSE_CAPACITY};
use crate::settings::{Settings, Switch};
use crate::transport::{Direction, Transport};

/// Room for `AT`, the longest command suffix and the line terminator.
const COMMAND_CAPACITY: usize = 64;

/// Command text after the `AT` prefix, e.g. `+CH=72`
pub(crate) type Suffix = heapless::String<COMMAND_CAPACITY>;

/// Formats a command suffix.
pub(crate) fn suffix(args: fmt::Arguments<'_>) -> Result<Suffix, Error> {
    let mut suffix = Suffix::new();
    suffix
        .write_fmt(args)
        .map_err(|_| Error::InvalidParameter)?;
    Ok(suffix)
}

/// What to do when the module answers a command with `ERR<n>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RetryPolicy {
    /// Surface the device error immediately
    #[default]
    Never,
    /// Re-send the same command once before surfacing the error
    Once,
}

/// Driver configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Handling of `ERR<n>` replies
    pub retry: RetryPolicy,
}

/// Main device interface for the USR-LG206-P.
///
/// # Important Notes
/// - Call [`enter_config_mode`](Device::enter_config_mode) before reading or
///   writing settings. This is not enforced
/// - Operations block until the transport delivers the reply and must not be
///   abandoned halfway, the line would be left in the wrong direction
/// - One owner per radio; wrap the device in a mutex to share it
pub struct Device<T, D> {
    transport: T,
    delay: D,
    pub(crate) settings: Settings,
    config: Config,
}

impl<T, D> Device<T, D> {
    /// Creates a driver that knows nothing about the module yet.
    ///
    /// # Arguments
    /// * `transport` - Half-duplex link to the module
    /// * `delay` - Delay provider for the direction settle and drain gaps
    pub fn new(transport: T, delay: D) -> Self {
        Self::with_settings(transport, delay, Settings::new())
    }

    /// Creates a driver that assumes the module holds `settings`, typically
    /// [`Settings::factory`] for a module fresh out of the box.
    pub fn with_settings(transport: T, delay: D, settings: Settings) -> Self {
        Self {
            transport,
            delay,
            settings,
            config: Config::default(),
        }
    }

    /// Replaces the driver configuration.
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Current view of the module settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Releases the transport and delay provider.
    pub fn release(self) -> (T, D) {
        (self.transport, self.delay)
    }
}

impl<T, D> Device<T, D>
where
    T: Transport,
    D: DelayNs,
{
    /// Sends `"AT" + suffix + "\r\n"` and requires `success` in the reply.
    ///
    /// # Errors
    /// * `Error::Device` - The module replied with `ERR<n>`
    /// * `Error::NoResponse` - Nothing came back
    /// * `Error::CommandEchoNotReceived` - Echo is on and the reply does not
    ///   start with the command
    /// * `Error::InvalidResponse` - `success` is not in the reply
    pub fn set_parameter(&mut self, suffix: &str, success: &str) -> Result<(), Error> {
        self.with_retry(|device| {
            let response = device.command(suffix)?;
            response::expect_token(response::text(&response)?, success)
        })
    }

    /// Sends `"AT" + suffix + "\r\n"` and extracts the value from the reply.
    ///
    /// With `using_colon` the value follows `<suffix>:`, otherwise it follows
    /// `<success>=` (only `AT+E` answers in that form).
    ///
    /// # Errors
    /// Same as [`set_parameter`](Device::set_parameter), plus
    /// * `Error::MissingSettingClarification` - The value marker is absent
    /// * `Error::MissingOk` - `success` does not follow the value
    pub fn get_parameter(
        &mut self,
        suffix: &str,
        using_colon: bool,
        success: &str,
    ) -> Result<Value, Error> {
        self.with_retry(|device| {
            let response = device.command(suffix)?;
            let value = response::extract_value(
                response::text(&response)?,
                suffix,
                using_colon,
                success,
            )?;
            Value::try_from(value).map_err(|_| Error::InvalidResponse)
        })
    }

    fn with_retry<R>(
        &mut self,
        mut operation: impl FnMut(&mut Self) -> Result<R, Error>,
    ) -> Result<R, Error> {
        match operation(self) {
            Err(Error::Device(err)) if self.config.retry == RetryPolicy::Once => {
                warn!("module replied {}, retrying once", err);
                operation(self)
            }
            result => result,
        }
    }

    /// Runs one command exchange up to and including the error check.
    fn command(&mut self, suffix: &str) -> Result<Response, Error> {
        let mut command = heapless::String::<COMMAND_CAPACITY>::new();
        write!(command, "AT{}\r\n", suffix).map_err(|_| Error::InvalidParameter)?;

        if self.settings.at_mode != Some(Switch::On) {
            warn!("sending AT{} while AT mode is not known to be on", suffix);
        }

        self.transmit(command.as_bytes())?;
        let response = self.read_response()?;
        let text = response::text(&response)?;

        if self.settings.command_echo == Some(Switch::On) {
            response::check_echo(text, &command)?;
        }

        if let Some(err) = response::device_error(text) {
            warn!("AT{} rejected: {}", suffix, err);
            return Err(err);
        }

        Ok(response)
    }

    /// Sends raw bytes and waits for a reply containing `expected`.
    pub(crate) fn handshake(&mut self, bytes: &str, expected: &str) -> Result<(), Error> {
        self.transmit(bytes.as_bytes())?;
        let response = self.read_response()?;
        response::expect_token(response::text(&response)?, expected)
    }

    /// Drives the line, writes `bytes` and hands the line back.
    pub(crate) fn transmit(&mut self, bytes: &[u8]) -> Result<usize, Error> {
        self.transport
            .set_direction(Direction::Transmit)
            .map_err(|_| Error::Bus)?;
        self.delay.delay_ms(T::SWITCH_SETTLE_MS);

        trace!("tx {=[u8]}", bytes);
        let written = self.transport.write(bytes);
        let flushed = self.transport.flush();

        // The line is released even when the write failed.
        self.transport
            .set_direction(Direction::Receive)
            .map_err(|_| Error::Bus)?;

        flushed.map_err(|_| Error::Bus)?;
        written.map_err(|_| Error::Bus)
    }

    /// Waits for the module and drains its reply.
    fn read_response(&mut self) -> Result<Response, Error> {
        self.wait_for_input()?;
        if self.transport.available() == 0 {
            return Err(Error::NoResponse);
        }

        let mut buffer = [0u8; RESPONSE_CAPACITY];
        let len = self.drain(&mut buffer)?;

        if self.transport.available() > 0 {
            warn!("reply longer than {} bytes, truncated", RESPONSE_CAPACITY);
            while self.transport.available() > 0 {
                self.transport.read_byte().map_err(|_| Error::Bus)?;
            }
        }

        trace!("rx {=[u8]}", &buffer[..len]);
        Response::from_slice(&buffer[..len]).map_err(|_| Error::InvalidResponse)
    }

    pub(crate) fn wait_for_input(&mut self) -> Result<(), Error> {
        self.transport.wait_for_input().map_err(|_| Error::Bus)
    }

    /// Copies pending bytes into `buffer` until the transport runs dry or the
    /// buffer is full, pausing between passes so a burst can finish arriving.
    pub(crate) fn drain(&mut self, buffer: &mut [u8]) -> Result<usize, Error> {
        let mut cursor = 0;

        while cursor < buffer.len() && self.transport.available() > 0 {
            self.delay.delay_ms(T::READ_GAP_MS);

            let pending = self.transport.available().min(buffer.len() - cursor);
            for slot in &mut buffer[cursor..cursor + pending] {
                *slot = self.transport.read_byte().map_err(|_| Error::Bus)?;
            }
            cursor += pending;
        }

        Ok(cursor)
    }

    /// Number of received bytes waiting in the transport.
    pub fn available(&mut self) -> usize {
        self.transport.available()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DeviceError;
    use crate::mock::{device, MockDelay, MockTransport};
    use crate::response::OK;

    #[test]
    fn set_sends_framed_command_and_switches_direction() {
        let mut radio = device(&["\r\nOK\r\n"]);
        assert_eq!(radio.set_parameter("+Z", OK), Ok(()));

        let (transport, delay) = radio.release();
        assert_eq!(transport.written(), ["AT+Z\r\n"]);
        assert_eq!(
            transport.directions,
            [Direction::Transmit, Direction::Receive]
        );
        // settle after switching plus one drain pass
        assert_eq!(delay.total_ms(), 20);
    }

    #[test]
    fn device_error_is_terminal() {
        let mut radio = device(&["AT+SPD=3\r\n\r\nERR3\r\n", "\r\nOK\r\n"]);
        assert_eq!(
            radio.set_parameter("+SPD=3", OK),
            Err(Error::Device(DeviceError::InvalidOperator))
        );
        assert_eq!(radio.release().0.written().len(), 1);
    }

    #[test]
    fn retry_once_resends_after_device_error() {
        let mut radio = device(&["\r\nERR:5\r\n", "\r\nOK\r\n"]).with_config(Config {
            retry: RetryPolicy::Once,
        });
        assert_eq!(radio.set_parameter("+CH=3", OK), Ok(()));
        assert_eq!(radio.release().0.written(), ["AT+CH=3\r\n", "AT+CH=3\r\n"]);
    }

    #[test]
    fn retry_once_gives_up_after_second_error() {
        let mut radio = device(&["\r\nERR:5\r\n", "\r\nERR:5\r\n", "\r\nOK\r\n"])
            .with_config(Config {
                retry: RetryPolicy::Once,
            });
        assert_eq!(
            radio.set_parameter("+CH=3", OK),
            Err(Error::Device(DeviceError::OperationNotAllowed))
        );
        assert_eq!(radio.release().0.written().len(), 2);
    }

    #[test]
    fn retry_is_not_applied_to_protocol_errors() {
        let mut radio = device(&["\r\nHUH\r\n", "\r\nOK\r\n"]).with_config(Config {
            retry: RetryPolicy::Once,
        });
        assert_eq!(radio.set_parameter("+Z", OK), Err(Error::InvalidResponse));
        assert_eq!(radio.release().0.written().len(), 1);
    }

    #[test]
    fn silence_is_no_response() {
        let mut radio = device(&[]);
        assert_eq!(radio.set_parameter("+Z", OK), Err(Error::NoResponse));
    }

    #[test]
    fn echo_must_prefix_reply_when_enabled() {
        let mut radio = device(&["\r\nOK\r\n", "AT+Z\r\n\r\nOK\r\n"]);
        radio.settings.command_echo = Some(Switch::On);

        assert_eq!(
            radio.set_parameter("+Z", OK),
            Err(Error::CommandEchoNotReceived)
        );
        assert_eq!(radio.set_parameter("+Z", OK), Ok(()));
    }

    #[test]
    fn get_classifies_missing_markers() {
        let mut radio = device(&["\r\nOK\r\n", "\r\n+CH:5\r\n"]);
        assert_eq!(
            radio.get_parameter("+CH", true, OK),
            Err(Error::MissingSettingClarification)
        );
        assert_eq!(radio.get_parameter("+CH", true, OK), Err(Error::MissingOk));
    }

    #[test]
    fn get_returns_value_text() {
        let mut radio = device(&["AT+VER\r\n\r\n+VER:V1.0.4\r\n\r\nOK\r\n"]);
        let value = radio.get_parameter("+VER", true, OK).unwrap();
        assert_eq!(value.as_str(), "V1.0.4");
    }

    #[test]
    fn long_reply_is_truncated_and_line_cleared() {
        let mut long = std::string::String::from("\r\nOK");
        long.push_str(&"x".repeat(RESPONSE_CAPACITY * 2));

        let mut radio = device(&[long.as_str()]);
        assert_eq!(radio.set_parameter("+Z", OK), Ok(()));
        assert_eq!(radio.available(), 0);
    }

    #[test]
    fn bus_failure_is_reported() {
        let mut transport = MockTransport::new();
        transport.fail_writes = true;
        let mut radio = Device::new(transport, MockDelay::default());

        assert_eq!(radio.set_parameter("+Z", OK), Err(Error::Bus));
        // line handed back regardless
        let (transport, _) = radio.release();
        assert_eq!(transport.directions.last(), Some(&Direction::Receive));
    }

    #[test]
    fn overlong_suffix_is_rejected_before_sending() {
        let mut radio = device(&["\r\nOK\r\n"]);
        let long = "+".repeat(COMMAND_CAPACITY);
        assert_eq!(radio.set_parameter(&long, OK), Err(Error::InvalidParameter));
        assert!(radio.release().0.written().is_empty());
    }
}
