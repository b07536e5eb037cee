//! Module command implementations
//!
//! This module contains the USR-LG206-P `AT` command set, implemented as
//! methods on [`Device`](crate::Device). Commands are organized into
//! functional categories:
//!
//! # Command Categories
//! - [`mode`]: AT mode control
//!   - Enter the AT mode with the `+++` / `a` handshake
//!   - Return to data mode (`AT+ENTM`)
//!
//! - [`rf`]: Radio parameter commands
//!   - Work mode and power mode
//!   - Air rate, channel and destination address
//!   - Transmit power, FEC, wake-up and test intervals
//!   - Encryption key
//!
//! - [`system`]: System commands
//!   - Command echo and hardware identity
//!   - Restart, save as default, reset to default
//!   - Bulk apply and read of [`Settings`](crate::Settings)
//!
//! - [`uart`]: Serial link settings
//!
//! # Common Patterns
//! 1. Enter the AT mode
//! 2. Read or write settings; values already in the store cost no exchange
//! 3. Optionally save them as the power-on default
//! 4. Exit the AT mode before sending data
//!
//! # Important Notes
//! - Setters reject out-of-range values before anything is sent
//! - The store only changes after the module confirmed a command
//! - Commands sent outside the AT mode are transmitted as data by the
//!   module; the driver logs a warning but sends them anyway

pub mod mode;
pub mod rf;
pub mod system;
pub mod uart;
