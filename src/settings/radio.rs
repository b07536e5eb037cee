//! Radio settings
//!
//! This module contains the in-memory copy of every module parameter:
//! - AT mode and command echo state
//! - Hardware identity (node id, firmware version)
//! - Work mode and power mode
//! - Air rate, channel, destination address and transmit power
//! - Forward error correction, test interval and encryption key
//!
//! Every slot is independently known (`Some`) or unknown (`None`). A known
//! slot is trusted until this driver changes it; the module is assumed to be
//! controlled by nobody else.

use core::ops::RangeInclusive;

use bitflags::bitflags;

use super::UartSettings;

/// Valid wake-up interval in milliseconds (`AT+WTM`)
pub const WAKE_UP_INTERVAL_MS: RangeInclusive<u16> = 500..=4000;
/// Valid LoRa channel numbers (`AT+CH`)
pub const CHANNELS: RangeInclusive<u8> = 0..=127;
/// Valid transmit power in dBm (`AT+PWR`)
pub const TRANSMITTING_POWER_DBM: RangeInclusive<u8> = 10..=20;
/// Valid test data interval in milliseconds (`AT+SQT`)
pub const TEST_INTERVAL_MS: RangeInclusive<u16> = 100..=6000;
/// Number of hex characters in an encryption key (`AT+KEY`)
pub const KEY_LENGTH: usize = 16;
/// Encryption key the module ships with
pub const FACTORY_KEY: &str = "FFFFFFFFFFFFFFFF";

/// Node id or firmware version string as reported by the module
pub type Identity = heapless::String<32>;

/// Encryption key, [`KEY_LENGTH`] hex characters
pub type Key = heapless::String<KEY_LENGTH>;

/// On/off state shared by the AT mode, command echo and FEC settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Switch {
    /// Enabled (`ON`)
    On,
    /// Disabled (`OFF`)
    Off,
}

impl Switch {
    /// Wire representation (`ON`/`OFF`)
    pub fn as_str(self) -> &'static str {
        match self {
            Self::On => "ON",
            Self::Off => "OFF",
        }
    }

    /// Parses the wire representation.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "ON" => Some(Self::On),
            "OFF" => Some(Self::Off),
            _ => None,
        }
    }
}

/// Transmission work mode (`AT+WMODE`)
///
/// Selects how application payloads are framed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WorkMode {
    /// Raw bytes, broadcast to every module on the same channel/address
    Transparent,
    /// Each payload is prefixed with destination address and channel
    FixedPoint,
}

impl WorkMode {
    /// Wire representation (`TRANS`/`FP`)
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Transparent => "TRANS",
            Self::FixedPoint => "FP",
        }
    }

    /// Parses the wire representation.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "TRANS" => Some(Self::Transparent),
            "FP" => Some(Self::FixedPoint),
            _ => None,
        }
    }
}

/// Power consumption mode (`AT+PMODE`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PowerMode {
    /// Receiver always on
    Run,
    /// Receiver wakes every wake-up interval
    WakeUp,
}

impl PowerMode {
    /// Wire representation (`RUN`/`WU`)
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Run => "RUN",
            Self::WakeUp => "WU",
        }
    }

    /// Parses the wire representation.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "RUN" => Some(Self::Run),
            "WU" => Some(Self::WakeUp),
            _ => None,
        }
    }
}

/// LoRa air rate level (`AT+SPD`)
///
/// The discriminant is the level sent on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AirRate {
    /// Level 1, 268 bps
    Bps268 = 1,
    /// Level 2, 488 bps
    Bps488 = 2,
    /// Level 3, 537 bps
    Bps537 = 3,
    /// Level 4, 878 bps
    Bps878 = 4,
    /// Level 5, 977 bps
    Bps977 = 5,
    /// Level 6, 1758 bps
    Bps1758 = 6,
    /// Level 7, 3125 bps
    Bps3125 = 7,
    /// Level 8, 6250 bps
    Bps6250 = 8,
    /// Level 9, 10937 bps
    Bps10937 = 9,
    /// Level 10, 21875 bps
    Bps21875 = 10,
}

impl AirRate {
    /// Level 1-10 as used by `AT+SPD`
    pub fn level(self) -> u8 {
        self as u8
    }

    /// Nominal air data rate
    pub fn bits_per_second(self) -> u32 {
        match self {
            Self::Bps268 => 268,
            Self::Bps488 => 488,
            Self::Bps537 => 537,
            Self::Bps878 => 878,
            Self::Bps977 => 977,
            Self::Bps1758 => 1758,
            Self::Bps3125 => 3125,
            Self::Bps6250 => 6250,
            Self::Bps10937 => 10937,
            Self::Bps21875 => 21875,
        }
    }
}

impl TryFrom<u8> for AirRate {
    type Error = crate::Error;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        match level {
            1 => Ok(Self::Bps268),
            2 => Ok(Self::Bps488),
            3 => Ok(Self::Bps537),
            4 => Ok(Self::Bps878),
            5 => Ok(Self::Bps977),
            6 => Ok(Self::Bps1758),
            7 => Ok(Self::Bps3125),
            8 => Ok(Self::Bps6250),
            9 => Ok(Self::Bps10937),
            10 => Ok(Self::Bps21875),
            _ => Err(crate::Error::InvalidParameter),
        }
    }
}

bitflags! {
    /// Set of settings slots
    ///
    /// Used to report which slots of a [`Settings`] value are known and to
    /// select the slots a bulk read should fill.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Fields: u16 {
        const COMMAND_ECHO = 1 << 0;
        const NODE_ID = 1 << 1;
        const FIRMWARE_VERSION = 1 << 2;
        const WORK_MODE = 1 << 3;
        const POWER_MODE = 1 << 4;
        const WAKE_UP_INTERVAL = 1 << 5;
        const AIR_RATE = 1 << 6;
        const DESTINATION_ADDRESS = 1 << 7;
        const CHANNEL = 1 << 8;
        const FORWARD_ERROR_CORRECTION = 1 << 9;
        const TRANSMITTING_POWER = 1 << 10;
        const TEST_INTERVAL = 1 << 11;
        const KEY = 1 << 12;
        const UART = 1 << 13;
    }
}

impl Fields {
    /// Slots the module can be asked for. The key is write-only.
    pub const QUERYABLE: Self = Self::from_bits_retain(Self::all().bits() & !Self::KEY.bits());

    /// Slots that describe configuration rather than hardware identity
    pub const CONFIGURABLE: Self = Self::from_bits_retain(
        Self::all().bits() & !(Self::NODE_ID.bits() | Self::FIRMWARE_VERSION.bits()),
    );
}

/// In-memory copy of the module configuration.
///
/// # Important Notes
/// - `None` means the value has not been read from or written to the module
/// - `destination_address` of `Some(0)` is a real address, not "unset"
/// - UART settings are always known, the link would not work otherwise
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Settings {
    /// Whether the module currently accepts AT commands
    pub at_mode: Option<Switch>,
    /// Whether the module echoes every command before its reply
    pub command_echo: Option<Switch>,
    /// Hardware node id (`AT+NID`), never changes once read
    pub node_id: Option<Identity>,
    /// Firmware version (`AT+VER`), never changes once read
    pub firmware_version: Option<Identity>,
    /// How payloads are framed
    pub work_mode: Option<WorkMode>,
    /// Receiver power mode
    pub power_mode: Option<PowerMode>,
    /// Wake-up interval in milliseconds, see [`WAKE_UP_INTERVAL_MS`]
    pub wake_up_interval: Option<u16>,
    /// LoRa air rate
    pub air_rate: Option<AirRate>,
    /// Destination address, `0xFFFF` broadcasts
    pub destination_address: Option<u16>,
    /// See [`CHANNELS`]
    pub channel: Option<u8>,
    /// Forward error correction
    pub forward_error_correction: Option<Switch>,
    /// Transmit power in dBm, see [`TRANSMITTING_POWER_DBM`]
    pub transmitting_power: Option<u8>,
    /// Test data interval in milliseconds, see [`TEST_INTERVAL_MS`]
    pub test_interval: Option<u16>,
    /// Last key set through this driver, the module cannot report it
    pub key: Option<Key>,
    /// Serial link of the module
    pub uart: UartSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self::new()
    }
}

impl Settings {
    /// Store with every slot unknown except the UART settings.
    pub fn new() -> Self {
        Self {
            at_mode: None,
            command_echo: None,
            node_id: None,
            firmware_version: None,
            work_mode: None,
            power_mode: None,
            wake_up_interval: None,
            air_rate: None,
            destination_address: None,
            channel: None,
            forward_error_correction: None,
            transmitting_power: None,
            test_interval: None,
            key: None,
            uart: UartSettings::default(),
        }
    }

    /// Store as the module ships from the factory.
    ///
    /// Node id and firmware version stay unknown, they identify the hardware.
    pub fn factory() -> Self {
        Self {
            at_mode: Some(Switch::Off),
            command_echo: Some(Switch::On),
            node_id: None,
            firmware_version: None,
            work_mode: Some(WorkMode::Transparent),
            power_mode: Some(PowerMode::Run),
            wake_up_interval: Some(2000),
            air_rate: Some(AirRate::Bps21875),
            destination_address: Some(0),
            channel: Some(65),
            forward_error_correction: Some(Switch::Off),
            transmitting_power: Some(20),
            test_interval: Some(2000),
            key: Key::try_from(FACTORY_KEY).ok(),
            uart: UartSettings::default(),
        }
    }

    /// Slots currently holding a value.
    pub fn known(&self) -> Fields {
        let mut fields = Fields::UART;
        fields.set(Fields::COMMAND_ECHO, self.command_echo.is_some());
        fields.set(Fields::NODE_ID, self.node_id.is_some());
        fields.set(Fields::FIRMWARE_VERSION, self.firmware_version.is_some());
        fields.set(Fields::WORK_MODE, self.work_mode.is_some());
        fields.set(Fields::POWER_MODE, self.power_mode.is_some());
        fields.set(Fields::WAKE_UP_INTERVAL, self.wake_up_interval.is_some());
        fields.set(Fields::AIR_RATE, self.air_rate.is_some());
        fields.set(Fields::DESTINATION_ADDRESS, self.destination_address.is_some());
        fields.set(Fields::CHANNEL, self.channel.is_some());
        fields.set(
            Fields::FORWARD_ERROR_CORRECTION,
            self.forward_error_correction.is_some(),
        );
        fields.set(Fields::TRANSMITTING_POWER, self.transmitting_power.is_some());
        fields.set(Fields::TEST_INTERVAL, self.test_interval.is_some());
        fields.set(Fields::KEY, self.key.is_some());
        fields
    }

    /// Forgets every configuration slot after the module reloaded its
    /// defaults. Hardware identity is kept and the UART settings return to
    /// their factory values, which the module reloads as well.
    pub fn forget_configuration(&mut self) {
        let node_id = self.node_id.take();
        let firmware_version = self.firmware_version.take();
        *self = Self {
            at_mode: self.at_mode,
            node_id,
            firmware_version,
            ..Self::new()
        };
    }
}

/// Checks that `key` is exactly [`KEY_LENGTH`] hex digits.
pub fn is_valid_key(key: &str) -> bool {
    key.len() == KEY_LENGTH && key.bytes().all(|b| b.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::BaudRate;

    #[test]
    fn new_store_only_knows_uart() {
        let settings = Settings::new();
        assert_eq!(settings.known(), Fields::UART);
        assert_eq!(settings.at_mode, None);
        assert_eq!(settings.destination_address, None);
    }

    #[test]
    fn factory_store_is_fully_configured() {
        let settings = Settings::factory();
        assert!(settings.known().contains(Fields::CONFIGURABLE));
        assert!(!settings.known().intersects(Fields::NODE_ID | Fields::FIRMWARE_VERSION));
        assert_eq!(settings.destination_address, Some(0));
        assert_eq!(settings.key.as_deref(), Some(FACTORY_KEY));
        assert!(is_valid_key(FACTORY_KEY));
        assert_eq!(settings.at_mode, Some(Switch::Off));
    }

    #[test]
    fn forget_keeps_identity_and_restores_uart() {
        let mut settings = Settings::factory();
        settings.node_id = Some(Identity::try_from("0001A2B3").unwrap());
        settings.uart.baud_rate = BaudRate::Baud9600;
        settings.forget_configuration();

        assert_eq!(settings.uart, UartSettings::default());

        assert_eq!(settings.node_id.as_deref(), Some("0001A2B3"));
        assert_eq!(settings.channel, None);
        assert_eq!(settings.at_mode, Some(Switch::Off));
        assert_eq!(settings.known(), Fields::NODE_ID | Fields::UART);
    }

    #[test]
    fn air_rate_levels() {
        assert_eq!(AirRate::try_from(1), Ok(AirRate::Bps268));
        assert_eq!(AirRate::try_from(10).map(AirRate::bits_per_second), Ok(21875));
        assert_eq!(AirRate::try_from(0), Err(crate::Error::InvalidParameter));
        assert_eq!(AirRate::try_from(11), Err(crate::Error::InvalidParameter));
        assert_eq!(AirRate::Bps6250.level(), 8);
    }

    #[test]
    fn wire_names() {
        assert_eq!(WorkMode::parse("TRANS"), Some(WorkMode::Transparent));
        assert_eq!(WorkMode::parse(" FP "), Some(WorkMode::FixedPoint));
        assert_eq!(PowerMode::parse("WU"), Some(PowerMode::WakeUp));
        assert_eq!(Switch::parse("OFF"), Some(Switch::Off));
        assert_eq!(Switch::parse("MAYBE"), None);
    }

    #[test]
    fn key_validation() {
        assert!(is_valid_key("0123456789abcdef"));
        assert!(!is_valid_key("FFFFFFFF"));
        assert!(!is_valid_key("FFFFFFFFFFFFFFFG"));
    }
}
