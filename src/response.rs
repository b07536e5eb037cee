//! Reply classification
//!
//! Replies are plain ASCII without a length prefix, for example:
//!
//! ```text
//! AT+WMODE\r\n          <- echo, only when command echo is on
//! \r\n+WMODE:TRANS\r\n  <- setting with colon marker
//! \r\nOK\r\n            <- success token
//! ```
//!
//! A reply containing `ERR<n>` is a device error regardless of what else it
//! holds. The functions here work on the drained text only; the exchange
//! itself lives on [`Device`](crate::Device).

use crate::error::{DeviceError, Error};

/// Size of the buffer a reply is drained into. Longer replies are truncated.
pub const RESPONSE_CAPACITY: usize = 128;

/// Success token of nearly every command
pub const OK: &str = "OK";

/// Raw reply bytes
pub type Response = heapless::Vec<u8, RESPONSE_CAPACITY>;

/// Value extracted from a query reply
pub type Value = heapless::String<RESPONSE_CAPACITY>;

/// Views a reply as text.
pub fn text(response: &[u8]) -> Result<&str, Error> {
    core::str::from_utf8(response).map_err(|_| Error::InvalidResponse)
}

/// Checks the echoed command at the start of the reply.
pub fn check_echo(response: &str, command: &str) -> Result<(), Error> {
    if response.starts_with(command) {
        Ok(())
    } else {
        Err(Error::CommandEchoNotReceived)
    }
}

/// Looks for an `ERR<n>` code in the reply.
///
/// The code follows `ERR` directly or after one of `:`, `=`, `-` or a space,
/// and is at most two decimal digits. An `ERR` without a known code 1-5 is
/// reported as [`Error::InvalidResponse`].
pub fn device_error(response: &str) -> Option<Error> {
    let index = response.find("ERR")?;
    let rest = &response[index + 3..];
    let rest = rest
        .strip_prefix(|c: char| matches!(c, ':' | '=' | '-' | ' '))
        .unwrap_or(rest);

    let digits = rest
        .bytes()
        .take(2)
        .take_while(u8::is_ascii_digit)
        .count();

    let code = rest[..digits]
        .parse::<u8>()
        .ok()
        .and_then(|code| DeviceError::try_from(code).ok());

    Some(match code {
        Some(code) => Error::Device(code),
        None => Error::InvalidResponse,
    })
}

/// Requires `token` somewhere in the reply.
pub fn expect_token(response: &str, token: &str) -> Result<(), Error> {
    if response.contains(token) {
        Ok(())
    } else {
        Err(Error::InvalidResponse)
    }
}

/// Extracts the value of a query reply.
///
/// With `using_colon` the value sits between `<suffix>:` and the success
/// token. Without it the reply has the legacy `<success>=<value>` form and
/// the value runs to the end of the reply.
pub fn extract_value<'a>(
    response: &'a str,
    suffix: &str,
    using_colon: bool,
    success: &str,
) -> Result<&'a str, Error> {
    let (marker, separator) = if using_colon {
        (suffix, ':')
    } else {
        (success, '=')
    };

    let start = find_marker(response, marker, separator)
        .ok_or(Error::MissingSettingClarification)?;
    let rest = &response[start..];

    let value = if using_colon {
        let end = rest.find(success).ok_or(Error::MissingOk)?;
        &rest[..end]
    } else {
        rest
    };

    Ok(value.trim_end_matches(is_line_break))
}

/// Index just past the first `<marker><separator>` in `response`.
fn find_marker(response: &str, marker: &str, separator: char) -> Option<usize> {
    response
        .match_indices(marker)
        .map(|(index, _)| index + marker.len())
        .find(|&end| response[end..].starts_with(separator))
        .map(|end| end + separator.len_utf8())
}

fn is_line_break(c: char) -> bool {
    c == '\r' || c == '\n'
}

/// Parses a numeric value and checks it against the documented range.
pub fn parse_in_range<N>(value: &str, range: &core::ops::RangeInclusive<N>) -> Result<N, Error>
where
    N: core::str::FromStr + PartialOrd,
{
    let number = value.trim().parse::<N>().map_err(|_| Error::InvalidResponse)?;
    if range.contains(&number) {
        Ok(number)
    } else {
        Err(Error::InvalidResponse)
    }
}
