//! Settings store for the USR-LG206-P
//!
//! # Structure
//! - `radio`: radio parameters, AT mode and hardware identity
//! - `uart`: serial link parameters of the module
//!
//! The driver owns one [`Settings`] value and only changes it after the
//! module confirmed a command.

mod radio;
mod uart;

pub use radio::*;
pub use uart::*;
