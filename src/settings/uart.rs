//! Module-side UART settings (`AT+UART`)
//!
//! These describe the serial link between the microcontroller and the
//! module. They are always known: changing them without this driver knowing
//! would break communication, so the store starts from the factory values
//! `115200,8,1,NONE,485`.
//!
//! # Important Notes
//! - A successful `AT+UART=` only takes effect on the module after a restart
//! - The microcontroller UART must be reconfigured to match by the caller

use core::fmt::{self, Write};

/// Serial baud rate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BaudRate {
    /// 1200 bps
    Baud1200,
    /// 2400 bps
    Baud2400,
    /// 4800 bps
    Baud4800,
    /// 9600 bps
    Baud9600,
    /// 19200 bps
    Baud19200,
    /// 38400 bps
    Baud38400,
    /// 57600 bps
    Baud57600,
    /// 115200 bps, factory default
    Baud115200,
}

impl BaudRate {
    /// Rate in bits per second
    pub fn bits_per_second(self) -> u32 {
        match self {
            Self::Baud1200 => 1200,
            Self::Baud2400 => 2400,
            Self::Baud4800 => 4800,
            Self::Baud9600 => 9600,
            Self::Baud19200 => 19200,
            Self::Baud38400 => 38400,
            Self::Baud57600 => 57600,
            Self::Baud115200 => 115200,
        }
    }

    /// Looks up a supported rate.
    pub fn from_bits_per_second(value: u32) -> Option<Self> {
        match value {
            1200 => Some(Self::Baud1200),
            2400 => Some(Self::Baud2400),
            4800 => Some(Self::Baud4800),
            9600 => Some(Self::Baud9600),
            19200 => Some(Self::Baud19200),
            38400 => Some(Self::Baud38400),
            57600 => Some(Self::Baud57600),
            115200 => Some(Self::Baud115200),
            _ => None,
        }
    }
}

/// Number of data bits per character
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DataBits {
    /// 7 data bits
    Seven = 7,
    /// 8 data bits
    Eight = 8,
}

/// Number of stop bits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StopBits {
    /// 1 stop bit
    One = 1,
    /// 2 stop bits
    Two = 2,
}

/// Parity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Parity {
    /// No parity bit
    None,
    /// Even parity
    Even,
    /// Odd parity
    Odd,
}

impl Parity {
    /// Wire representation (`NONE`/`EVEN`/`ODD`)
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::Even => "EVEN",
            Self::Odd => "ODD",
        }
    }
}

/// Flow control of the module's serial side
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FlowControl {
    /// Module drives an RS-485 transceiver
    Rs485,
    /// No flow control
    Nfc,
}

impl FlowControl {
    /// Wire representation (`485`/`NFC`)
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Rs485 => "485",
            Self::Nfc => "NFC",
        }
    }
}

/// UART settings record, held by value inside [`Settings`](super::Settings).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UartSettings {
    /// Baud rate
    pub baud_rate: BaudRate,
    /// Data bits per character
    pub data_bits: DataBits,
    /// Stop bits per character
    pub stop_bits: StopBits,
    /// Parity mode
    pub parity: Parity,
    /// Flow control
    pub flow_control: FlowControl,
}

impl Default for UartSettings {
    fn default() -> Self {
        Self {
            baud_rate: BaudRate::Baud115200,
            data_bits: DataBits::Eight,
            stop_bits: StopBits::One,
            parity: Parity::None,
            flow_control: FlowControl::Rs485,
        }
    }
}

impl UartSettings {
    /// Parses the `<baud>,<data>,<stop>,<parity>,<flow>` form used by
    /// `AT+UART`.
    pub fn parse(value: &str) -> Option<Self> {
        let mut parts = value.trim().split(',').map(str::trim);

        let baud_rate = BaudRate::from_bits_per_second(parts.next()?.parse().ok()?)?;
        let data_bits = match parts.next()? {
            "7" => DataBits::Seven,
            "8" => DataBits::Eight,
            _ => return None,
        };
        let stop_bits = match parts.next()? {
            "1" => StopBits::One,
            "2" => StopBits::Two,
            _ => return None,
        };
        let parity = match parts.next()? {
            "NONE" => Parity::None,
            "EVEN" => Parity::Even,
            "ODD" => Parity::Odd,
            _ => return None,
        };
        let flow_control = match parts.next()? {
            "485" => FlowControl::Rs485,
            "NFC" => FlowControl::Nfc,
            _ => return None,
        };

        if parts.next().is_some() {
            return None;
        }

        Some(Self {
            baud_rate,
            data_bits,
            stop_bits,
            parity,
            flow_control,
        })
    }

    /// Writes the `AT+UART` parameter form into `out`.
    pub fn write_to<W: Write>(&self, out: &mut W) -> fmt::Result {
        write!(
            out,
            "{},{},{},{},{}",
            self.baud_rate.bits_per_second(),
            self.data_bits as u8,
            self.stop_bits as u8,
            self.parity.as_str(),
            self.flow_control.as_str()
        )
    }
}
