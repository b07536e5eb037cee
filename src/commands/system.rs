//! System commands
//!
//! This module contains:
//! - Command echo (`AT+E`), the only setting answered in the `OK=<value>` form
//! - Hardware identity queries (`AT+NID`, `AT+VER`)
//! - Restart (`AT+Z`), save as default (`AT+CFGTF`) and reset to default
//!   (`AT+RELD`)
//! - Bulk transfer of a whole [`Settings`] value in either direction
//!
//! # Important Notes
//! - Restart and reset both leave the module in data mode
//! - After a reset the store forgets every configuration slot, the module
//!   now holds its own defaults. The UART settings return to the factory
//!   link since the module reloads those too

use embedded_hal::delay::DelayNs;

use crate::response::OK;
use crate::settings::{Fields, Identity, Settings, Switch};
use crate::{Device, Error, Transport};

impl<T, D> Device<T, D>
where
    T: Transport,
    D: DelayNs,
{
    /// Turns the command echo on or off.
    ///
    /// Replies are parsed differently while the echo is on, so the store is
    /// only updated once the module confirmed the change.
    pub fn set_command_echo(&mut self, echo: Switch) -> Result<(), Error> {
        if self.settings.command_echo == Some(echo) {
            return Ok(());
        }
        let suffix = match echo {
            Switch::On => "+E=ON",
            Switch::Off => "+E=OFF",
        };
        self.set_parameter(suffix, OK)?;
        self.settings.command_echo = Some(echo);
        Ok(())
    }

    /// Reads the command echo state, from the store when known.
    pub fn get_command_echo(&mut self) -> Result<Switch, Error> {
        if let Some(echo) = self.settings.command_echo {
            return Ok(echo);
        }
        let value = self.get_parameter("+E", false, OK)?;
        let echo = Switch::parse(&value).ok_or(Error::InvalidResponse)?;
        self.settings.command_echo = Some(echo);
        Ok(echo)
    }

    /// Reads the node id, once.
    pub fn get_node_id(&mut self) -> Result<Identity, Error> {
        if let Some(id) = &self.settings.node_id {
            return Ok(id.clone());
        }
        let id = self.query_identity("+NID")?;
        self.settings.node_id = Some(id.clone());
        Ok(id)
    }

    /// Reads the firmware version, once.
    pub fn get_firmware_version(&mut self) -> Result<Identity, Error> {
        if let Some(version) = &self.settings.firmware_version {
            return Ok(version.clone());
        }
        let version = self.query_identity("+VER")?;
        self.settings.firmware_version = Some(version.clone());
        Ok(version)
    }

    fn query_identity(&mut self, suffix: &str) -> Result<Identity, Error> {
        let value = self.get_parameter(suffix, true, OK)?;
        Identity::try_from(value.trim()).map_err(|_| Error::InvalidResponse)
    }

    /// Restarts the module (`AT+Z`). It comes back in data mode.
    pub fn restart(&mut self) -> Result<(), Error> {
        self.set_parameter("+Z", OK)?;
        debug!("restarted, AT mode off");
        self.settings.at_mode = Some(Switch::Off);
        Ok(())
    }

    /// Stores the current configuration as the module's power-on default.
    pub fn save_as_default(&mut self) -> Result<(), Error> {
        self.set_parameter("+CFGTF", "+CFGTF:SAVED")
    }

    /// Makes the module reload its defaults and reboot.
    ///
    /// Every configuration slot becomes unknown and the UART settings go back
    /// to their factory values; node id and firmware version are kept.
    pub fn reset_to_default(&mut self) -> Result<(), Error> {
        self.set_parameter("+RELD", "REBOOTING")?;
        debug!("module reloaded defaults, configuration forgotten");
        self.settings.forget_configuration();
        self.settings.at_mode = Some(Switch::Off);
        Ok(())
    }

    /// Pushes every known configuration slot of `target` to the module.
    ///
    /// Slots already holding the requested value cost no exchange. The echo
    /// goes last since it changes how the other replies are parsed. Stops at
    /// the first failure; slots set before it stay set.
    pub fn apply_settings(&mut self, target: &Settings) -> Result<(), Error> {
        if let Some(mode) = target.work_mode {
            self.set_work_mode(mode)?;
        }
        if let Some(mode) = target.power_mode {
            self.set_power_mode(mode)?;
        }
        if let Some(interval) = target.wake_up_interval {
            self.set_wake_up_interval(interval)?;
        }
        if let Some(rate) = target.air_rate {
            self.set_air_rate(rate)?;
        }
        if let Some(address) = target.destination_address {
            self.set_destination_address(address)?;
        }
        if let Some(channel) = target.channel {
            self.set_channel(channel)?;
        }
        if let Some(fec) = target.forward_error_correction {
            self.set_forward_error_correction(fec)?;
        }
        if let Some(dbm) = target.transmitting_power {
            self.set_transmitting_power(dbm)?;
        }
        if let Some(interval) = target.test_interval {
            self.set_test_interval(interval)?;
        }
        if let Some(key) = &target.key {
            self.set_key(key)?;
        }
        self.set_uart_settings(target.uart)?;
        if let Some(echo) = target.command_echo {
            self.set_command_echo(echo)?;
        }
        Ok(())
    }

    /// Restores the factory configuration.
    pub fn factory_reset(&mut self) -> Result<(), Error> {
        self.apply_settings(&Settings::factory())
    }

    /// Queries every slot in `fields` the store does not know yet and
    /// returns a copy of the store.
    ///
    /// The key cannot be read back and is skipped.
    pub fn read_settings(&mut self, fields: Fields) -> Result<Settings, Error> {
        let missing = fields & Fields::QUERYABLE & !self.settings.known();

        if missing.contains(Fields::COMMAND_ECHO) {
            self.get_command_echo()?;
        }
        if missing.contains(Fields::NODE_ID) {
            self.get_node_id()?;
        }
        if missing.contains(Fields::FIRMWARE_VERSION) {
            self.get_firmware_version()?;
        }
        if missing.contains(Fields::WORK_MODE) {
            self.get_work_mode()?;
        }
        if missing.contains(Fields::POWER_MODE) {
            self.get_power_mode()?;
        }
        if missing.contains(Fields::WAKE_UP_INTERVAL) {
            self.get_wake_up_interval()?;
        }
        if missing.contains(Fields::AIR_RATE) {
            self.get_air_rate()?;
        }
        if missing.contains(Fields::DESTINATION_ADDRESS) {
            self.get_destination_address()?;
        }
        if missing.contains(Fields::CHANNEL) {
            self.get_channel()?;
        }
        if missing.contains(Fields::FORWARD_ERROR_CORRECTION) {
            self.get_forward_error_correction()?;
        }
        if missing.contains(Fields::TRANSMITTING_POWER) {
            self.get_transmitting_power()?;
        }
        if missing.contains(Fields::TEST_INTERVAL) {
            self.get_test_interval()?;
        }

        Ok(self.settings.clone())
    }
}
