#![cfg_attr(not(test), no_std)]
//! USR-LG206-P LoRa Radio Driver
//!
//! This crate provides a type-safe interface for the USR-LG206-P LoRa radio
//! module. The module is configured with text `AT` commands and sits on a
//! half-duplex RS-485 link, so the driver has to turn the line around for
//! every exchange.
//!
//! # Features
//! - Two step AT mode handshake (`+++` / `a`)
//! - Every module setting as a typed getter/setter pair, with a settings
//!   store that skips redundant exchanges
//! - Classification of `ERR1`..`ERR5` device errors apart from protocol
//!   failures
//! - Transparent and fixed-point payload framing
//! - `no_std`, no allocator, `embedded-hal` 1.0 delays
//! - Optional `defmt` logging
//!
//! # Architecture
//! The driver is organized into several modules:
//!
//! - [`device`]: Main device interface
//!   - Command/response engine over the half-duplex link
//!   - Owns the settings store and the driver configuration
//!
//! - [`transport`]: The byte stream contract the board code implements
//!
//! - [`settings`]: Data model for everything the module can be told
//!   - [`Settings`]: the store, every slot known or unknown
//!   - Range constants and wire enums
//!
//! - [`commands`]: Command interface for module control
//!   - [`commands::mode`]: AT mode control
//!   - [`commands::rf`]: Radio parameters
//!   - [`commands::system`]: Echo, identity, restart, bulk transfer
//!   - [`commands::uart`]: Serial link settings
//!
//! - [`message`]: Payload send and receive
//!
//! - [`response`]: Reply parsing shared by the engine
//!
//! # Usage
//! Configuration follows a specific sequence:
//!
//! 1. Implement [`Transport`] for your UART and direction pin
//! 2. Create a new [`Device`] with the transport and a delay provider
//! 3. Enter the AT mode
//! 4. Set the work mode, channel, address and whatever else is needed
//! 5. Exit the AT mode
//! 6. Send and receive payloads
//!
//! # Important Notes
//! - The driver blocks until the transport reports input; put the timeout
//!   in the transport
//! - Exchanges must not be abandoned halfway
//! - The settings store mirrors what this driver told the module. Changes
//!   made by other means are invisible to it
//!
//! # Example
//! ```no_run
//! use embedded_hal::delay::DelayNs;
//! use usr_lg206p::{Device, Error, Transport, WorkMode};
//!
//! fn report<T: Transport, D: DelayNs>(transport: T, delay: D) -> Result<(), Error> {
//!     let mut radio = Device::new(transport, delay);
//!
//!     radio.enter_config_mode()?;
//!     radio.set_work_mode(WorkMode::FixedPoint)?;
//!     radio.set_channel(72)?;
//!     radio.exit_config_mode()?;
//!
//!     radio.send_to(0x0001, 72, b"21.5C")?;
//!     Ok(())
//! }
//! ```

// This mod MUST go first, so that the others see its macros.
mod fmt;

pub mod commands;
pub mod device;
pub mod error;
pub mod message;
pub mod response;
pub mod settings;
pub mod transport;

#[cfg(test)]
mod mock;

pub use device::{Config, Device, RetryPolicy};
pub use error::{DeviceError, Error};
pub use settings::*;
pub use transport::{Direction, Transport};
