//! Driver error types

use core::fmt;

/// Error codes the module reports with an `ERR<n>` reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceError {
    /// `ERR1`: command not terminated or not framed as `AT...\r\n`
    InvalidCommandFormat = 1,
    /// `ERR2`: unknown command
    InvalidCommand = 2,
    /// `ERR3`: unknown operator (`=`, `?`)
    InvalidOperator = 3,
    /// `ERR4`: parameter rejected by the module
    InvalidParameter = 4,
    /// `ERR5`: command not permitted in the current state
    OperationNotAllowed = 5,
}

impl TryFrom<u8> for DeviceError {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::InvalidCommandFormat),
            2 => Ok(Self::InvalidCommand),
            3 => Ok(Self::InvalidOperator),
            4 => Ok(Self::InvalidParameter),
            5 => Ok(Self::OperationNotAllowed),
            _ => Err(()),
        }
    }
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::InvalidCommandFormat => "invalid command format",
            Self::InvalidCommand => "invalid command",
            Self::InvalidOperator => "invalid operator",
            Self::InvalidParameter => "invalid parameter",
            Self::OperationNotAllowed => "operation not allowed",
        };
        write!(f, "ERR{}: {}", *self as u8, text)
    }
}

/// Error returned by every fallible driver operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The module answered with an `ERR<n>` code
    Device(DeviceError),
    /// No byte arrived before the transport gave up waiting
    NoResponse,
    /// The reply did not contain the expected token
    InvalidResponse,
    /// Echo is on but the reply does not start with the command sent
    CommandEchoNotReceived,
    /// The reply carried the setting but no success token after it
    MissingOk,
    /// The reply lacks the `<command>:` marker that introduces the value
    MissingSettingClarification,
    /// Caller supplied a value outside the documented range; nothing was sent
    InvalidParameter,
    /// The transport reported a failure
    Bus,
    /// The current work mode does not allow this kind of send
    WorkModeMismatch,
    /// The transport accepted fewer bytes than the frame holds
    ShortWrite,
    /// The payload does not fit the frame buffer
    PayloadTooLong,
}

impl From<DeviceError> for Error {
    fn from(value: DeviceError) -> Self {
        Self::Device(value)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Device(err) => write!(f, "device error {err}"),
            Self::NoResponse => f.write_str("no response from module"),
            Self::InvalidResponse => f.write_str("unexpected response from module"),
            Self::CommandEchoNotReceived => f.write_str("command echo not received"),
            Self::MissingOk => f.write_str("response is missing the success token"),
            Self::MissingSettingClarification => {
                f.write_str("response is missing the setting marker")
            }
            Self::InvalidParameter => f.write_str("parameter out of range"),
            Self::Bus => f.write_str("transport failure"),
            Self::WorkModeMismatch => f.write_str("send not allowed in current work mode"),
            Self::ShortWrite => f.write_str("frame only partially written"),
            Self::PayloadTooLong => f.write_str("payload too long for frame buffer"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_codes_map_one_to_one() {
        assert_eq!(DeviceError::try_from(1), Ok(DeviceError::InvalidCommandFormat));
        assert_eq!(DeviceError::try_from(3), Ok(DeviceError::InvalidOperator));
        assert_eq!(DeviceError::try_from(5), Ok(DeviceError::OperationNotAllowed));
        assert!(DeviceError::try_from(0).is_err());
        assert!(DeviceError::try_from(6).is_err());
    }

    #[test]
    fn display_carries_code() {
        let err = Error::from(DeviceError::InvalidParameter);
        assert_eq!(err.to_string(), "device error ERR4: invalid parameter");
    }
}
