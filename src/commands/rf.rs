//! Radio parameter commands
//!
//! This module contains the accessors for the LoRa link configuration:
//! - Work mode (`AT+WMODE`) and power mode (`AT+PMODE`)
//! - Wake-up interval (`AT+WTM`) and air rate (`AT+SPD`)
//! - Destination address (`AT+ADDR`) and channel (`AT+CH`)
//! - Forward error correction (`AT+FEC`) and transmit power (`AT+PWR`)
//! - Test data interval (`AT+SQT`) and encryption key (`AT+KEY`)
//!
//! Every setter follows the same sequence:
//! 1. Reject values outside the documented range, nothing is sent
//! 2. Return early when the store already holds the value
//! 3. Send the command and update the store on success
//!
//! Every getter answers from the store when it can and queries the module
//! otherwise.

use core::ops::RangeInclusive;
use core::str::FromStr;

use embedded_hal::delay::DelayNs;

use crate::device::suffix;
use crate::response::{self, OK};
use crate::settings::{
    is_valid_key, AirRate, Key, PowerMode, Switch, WorkMode, CHANNELS, TEST_INTERVAL_MS,
    TRANSMITTING_POWER_DBM, WAKE_UP_INTERVAL_MS,
};
use crate::{Device, Error, Transport};

impl<T, D> Device<T, D>
where
    T: Transport,
    D: DelayNs,
{
    fn query_number<N>(&mut self, suffix: &str, range: &RangeInclusive<N>) -> Result<N, Error>
    where
        N: FromStr + PartialOrd,
    {
        let value = self.get_parameter(suffix, true, OK)?;
        response::parse_in_range(&value, range)
    }

    /// Sets the work mode, which decides how payloads are framed.
    pub fn set_work_mode(&mut self, mode: WorkMode) -> Result<(), Error> {
        if self.settings.work_mode == Some(mode) {
            return Ok(());
        }
        self.set_parameter(&suffix(format_args!("+WMODE={}", mode.as_str()))?, OK)?;
        self.settings.work_mode = Some(mode);
        Ok(())
    }

    /// Reads the work mode, from the store when known.
    pub fn get_work_mode(&mut self) -> Result<WorkMode, Error> {
        if let Some(mode) = self.settings.work_mode {
            return Ok(mode);
        }
        let value = self.get_parameter("+WMODE", true, OK)?;
        let mode = WorkMode::parse(&value).ok_or(Error::InvalidResponse)?;
        self.settings.work_mode = Some(mode);
        Ok(mode)
    }

    /// Sets the power mode.
    pub fn set_power_mode(&mut self, mode: PowerMode) -> Result<(), Error> {
        if self.settings.power_mode == Some(mode) {
            return Ok(());
        }
        self.set_parameter(&suffix(format_args!("+PMODE={}", mode.as_str()))?, OK)?;
        self.settings.power_mode = Some(mode);
        Ok(())
    }

    /// Reads the power mode, from the store when known.
    pub fn get_power_mode(&mut self) -> Result<PowerMode, Error> {
        if let Some(mode) = self.settings.power_mode {
            return Ok(mode);
        }
        let value = self.get_parameter("+PMODE", true, OK)?;
        let mode = PowerMode::parse(&value).ok_or(Error::InvalidResponse)?;
        self.settings.power_mode = Some(mode);
        Ok(mode)
    }

    /// Sets the wake-up interval in milliseconds (500-4000).
    ///
    /// Only relevant in [`PowerMode::WakeUp`].
    pub fn set_wake_up_interval(&mut self, interval_ms: u16) -> Result<(), Error> {
        if !WAKE_UP_INTERVAL_MS.contains(&interval_ms) {
            return Err(Error::InvalidParameter);
        }
        if self.settings.wake_up_interval == Some(interval_ms) {
            return Ok(());
        }
        self.set_parameter(&suffix(format_args!("+WTM={}", interval_ms))?, OK)?;
        self.settings.wake_up_interval = Some(interval_ms);
        Ok(())
    }

    /// Reads the wake-up interval in milliseconds.
    pub fn get_wake_up_interval(&mut self) -> Result<u16, Error> {
        if let Some(interval) = self.settings.wake_up_interval {
            return Ok(interval);
        }
        let interval = self.query_number("+WTM", &WAKE_UP_INTERVAL_MS)?;
        self.settings.wake_up_interval = Some(interval);
        Ok(interval)
    }

    /// Sets the air rate. Both ends of a link must use the same rate.
    pub fn set_air_rate(&mut self, rate: AirRate) -> Result<(), Error> {
        if self.settings.air_rate == Some(rate) {
            return Ok(());
        }
        self.set_parameter(&suffix(format_args!("+SPD={}", rate.level()))?, OK)?;
        self.settings.air_rate = Some(rate);
        Ok(())
    }

    /// Sets the air rate from its level (1-10).
    pub fn set_air_rate_level(&mut self, level: u8) -> Result<(), Error> {
        self.set_air_rate(AirRate::try_from(level)?)
    }

    /// Reads the air rate, from the store when known.
    pub fn get_air_rate(&mut self) -> Result<AirRate, Error> {
        if let Some(rate) = self.settings.air_rate {
            return Ok(rate);
        }
        let level: u8 = self.query_number("+SPD", &(1..=10))?;
        let rate = AirRate::try_from(level).map_err(|_| Error::InvalidResponse)?;
        self.settings.air_rate = Some(rate);
        Ok(rate)
    }

    /// Sets the destination address. `0xFFFF` is the broadcast address.
    pub fn set_destination_address(&mut self, address: u16) -> Result<(), Error> {
        if self.settings.destination_address == Some(address) {
            return Ok(());
        }
        self.set_parameter(&suffix(format_args!("+ADDR={}", address))?, OK)?;
        self.settings.destination_address = Some(address);
        Ok(())
    }

    /// Reads the destination address.
    pub fn get_destination_address(&mut self) -> Result<u16, Error> {
        if let Some(address) = self.settings.destination_address {
            return Ok(address);
        }
        let address = self.query_number("+ADDR", &(u16::MIN..=u16::MAX))?;
        self.settings.destination_address = Some(address);
        Ok(address)
    }

    /// Sets the channel (0-127).
    pub fn set_channel(&mut self, channel: u8) -> Result<(), Error> {
        if !CHANNELS.contains(&channel) {
            return Err(Error::InvalidParameter);
        }
        if self.settings.channel == Some(channel) {
            return Ok(());
        }
        self.set_parameter(&suffix(format_args!("+CH={}", channel))?, OK)?;
        self.settings.channel = Some(channel);
        Ok(())
    }

    /// Reads the channel, from the store when known.
    pub fn get_channel(&mut self) -> Result<u8, Error> {
        if let Some(channel) = self.settings.channel {
            return Ok(channel);
        }
        let channel = self.query_number("+CH", &CHANNELS)?;
        self.settings.channel = Some(channel);
        Ok(channel)
    }

    /// Turns forward error correction on or off.
    pub fn set_forward_error_correction(&mut self, fec: Switch) -> Result<(), Error> {
        if self.settings.forward_error_correction == Some(fec) {
            return Ok(());
        }
        self.set_parameter(&suffix(format_args!("+FEC={}", fec.as_str()))?, OK)?;
        self.settings.forward_error_correction = Some(fec);
        Ok(())
    }

    /// Reads the forward error correction state.
    pub fn get_forward_error_correction(&mut self) -> Result<Switch, Error> {
        if let Some(fec) = self.settings.forward_error_correction {
            return Ok(fec);
        }
        let value = self.get_parameter("+FEC", true, OK)?;
        let fec = Switch::parse(&value).ok_or(Error::InvalidResponse)?;
        self.settings.forward_error_correction = Some(fec);
        Ok(fec)
    }

    /// Sets the transmit power in dBm (10-20).
    pub fn set_transmitting_power(&mut self, dbm: u8) -> Result<(), Error> {
        if !TRANSMITTING_POWER_DBM.contains(&dbm) {
            return Err(Error::InvalidParameter);
        }
        if self.settings.transmitting_power == Some(dbm) {
            return Ok(());
        }
        self.set_parameter(&suffix(format_args!("+PWR={}", dbm))?, OK)?;
        self.settings.transmitting_power = Some(dbm);
        Ok(())
    }

    /// Reads the transmit power in dBm.
    pub fn get_transmitting_power(&mut self) -> Result<u8, Error> {
        if let Some(dbm) = self.settings.transmitting_power {
            return Ok(dbm);
        }
        let dbm = self.query_number("+PWR", &TRANSMITTING_POWER_DBM)?;
        self.settings.transmitting_power = Some(dbm);
        Ok(dbm)
    }

    /// Sets the interval of the module's test data in milliseconds
    /// (100-6000).
    pub fn set_test_interval(&mut self, interval_ms: u16) -> Result<(), Error> {
        if !TEST_INTERVAL_MS.contains(&interval_ms) {
            return Err(Error::InvalidParameter);
        }
        if self.settings.test_interval == Some(interval_ms) {
            return Ok(());
        }
        self.set_parameter(&suffix(format_args!("+SQT={}", interval_ms))?, OK)?;
        self.settings.test_interval = Some(interval_ms);
        Ok(())
    }

    /// Reads the test data interval in milliseconds.
    pub fn get_test_interval(&mut self) -> Result<u16, Error> {
        if let Some(interval) = self.settings.test_interval {
            return Ok(interval);
        }
        let interval = self.query_number("+SQT", &TEST_INTERVAL_MS)?;
        self.settings.test_interval = Some(interval);
        Ok(interval)
    }

    /// Sets the encryption key, 16 hex characters.
    ///
    /// The module cannot report its key, so there is no getter; the last
    /// key set is available in [`settings`](Device::settings).
    pub fn set_key(&mut self, key: &str) -> Result<(), Error> {
        if !is_valid_key(key) {
            return Err(Error::InvalidParameter);
        }
        if self.settings.key.as_deref() == Some(key) {
            return Ok(());
        }
        let stored = Key::try_from(key).map_err(|_| Error::InvalidParameter)?;
        self.set_parameter(&suffix(format_args!("+KEY={}", key))?, OK)?;
        self.settings.key = Some(stored);
        Ok(())
    }
}
