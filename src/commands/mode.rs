//! AT mode control
//!
//! The module boots into data mode, where everything written to it is sent
//! over the air. Configuration needs the AT mode:
//!
//! ```text
//!            +++ / a          AT+ENTM, AT+Z
//!  Unknown ───────────► On ─────────────────► Off
//!                       ▲                      │
//!                       └──────── +++ / a ─────┘
//! ```
//!
//! Entering is a two step handshake without the `AT` prefix or line
//! terminator: send `+++`, expect `a`, send `a`, expect `+OK`.

use embedded_hal::delay::DelayNs;

use crate::response::OK;
use crate::{Device, Error, Switch, Transport};

impl<T, D> Device<T, D>
where
    T: Transport,
    D: DelayNs,
{
    /// Switches the module into AT mode.
    ///
    /// Does nothing when the mode is already known to be on. On failure the
    /// recorded mode is left untouched.
    ///
    /// # Errors
    /// * `Error::NoResponse` - The module did not answer a handshake step
    /// * `Error::InvalidResponse` - A handshake reply lacked `a` or `+OK`
    pub fn enter_config_mode(&mut self) -> Result<(), Error> {
        if self.settings.at_mode == Some(Switch::On) {
            return Ok(());
        }

        self.handshake("+++", "a")?;
        self.handshake("a", "+OK")?;

        debug!("AT mode on");
        self.settings.at_mode = Some(Switch::On);
        Ok(())
    }

    /// Returns the module to data mode (`AT+ENTM`).
    ///
    /// Does nothing when the mode is already known to be off.
    pub fn exit_config_mode(&mut self) -> Result<(), Error> {
        if self.settings.at_mode == Some(Switch::Off) {
            return Ok(());
        }

        self.set_parameter("+ENTM", OK)?;

        debug!("AT mode off");
        self.settings.at_mode = Some(Switch::Off);
        Ok(())
    }

    /// Whether the module is known to accept AT commands.
    pub fn is_config_mode(&self) -> bool {
        self.settings.at_mode == Some(Switch::On)
    }
}

#[cfg(test)]
mod tests {
    use crate::mock::device;
    use crate::{Error, Switch};

    #[test]
    fn handshake_sends_guard_then_confirmation() {
        let mut radio = device(&["a", "+OK"]);
        assert_eq!(radio.enter_config_mode(), Ok(()));
        assert!(radio.is_config_mode());
        assert_eq!(radio.release().0.written(), ["+++", "a"]);
    }

    #[test]
    fn enter_is_idempotent() {
        let mut radio = device(&["a", "+OK"]);
        radio.enter_config_mode().unwrap();
        assert_eq!(radio.enter_config_mode(), Ok(()));
        assert_eq!(radio.release().0.written().len(), 2);
    }

    #[test]
    fn handshake_failures_leave_mode_unchanged() {
        let mut radio = device(&[]);
        assert_eq!(radio.enter_config_mode(), Err(Error::NoResponse));
        assert_eq!(radio.settings().at_mode, None);

        let mut radio = device(&["?"]);
        assert_eq!(radio.enter_config_mode(), Err(Error::InvalidResponse));

        let mut radio = device(&["a", "ERR"]);
        assert_eq!(radio.enter_config_mode(), Err(Error::InvalidResponse));
        assert_eq!(radio.settings().at_mode, None);
        assert_eq!(radio.release().0.written(), ["+++", "a"]);
    }

    #[test]
    fn exit_sends_entm_once() {
        let mut radio = device(&["AT+ENTM\r\n\r\n\r\nOK\r\n"]);
        assert_eq!(radio.exit_config_mode(), Ok(()));
        assert_eq!(radio.settings().at_mode, Some(Switch::Off));
        assert_eq!(radio.exit_config_mode(), Ok(()));
        assert_eq!(radio.release().0.written(), ["AT+ENTM\r\n"]);
    }

    #[test]
    fn exit_failure_keeps_mode() {
        let mut radio = device(&["a", "+OK", "\r\nERR:2\r\n"]);
        radio.enter_config_mode().unwrap();
        assert!(radio.exit_config_mode().is_err());
        assert!(radio.is_config_mode());
    }
}
