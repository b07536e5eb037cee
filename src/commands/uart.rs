//! Serial link settings (`AT+UART`)
//!
//! The UART settings are the only slot the store always knows: the driver
//! could not talk to the module otherwise. A change takes effect on the
//! module's next restart, after which the host side must follow.

use embedded_hal::delay::DelayNs;

use crate::device::Suffix;
use crate::response::OK;
use crate::settings::UartSettings;
use crate::{Device, Error, Transport};

impl<T, D> Device<T, D>
where
    T: Transport,
    D: DelayNs,
{
    /// Sets the module's serial parameters.
    pub fn set_uart_settings(&mut self, uart: UartSettings) -> Result<(), Error> {
        if self.settings.uart == uart {
            debug!("UART settings unchanged");
            return Ok(());
        }

        let mut suffix = Suffix::new();
        suffix
            .push_str("+UART=")
            .map_err(|_| Error::InvalidParameter)?;
        uart.write_to(&mut suffix)
            .map_err(|_| Error::InvalidParameter)?;

        self.set_parameter(&suffix, OK)?;
        self.settings.uart = uart;
        Ok(())
    }

    /// Last known serial parameters, without talking to the module.
    pub fn uart_settings(&self) -> UartSettings {
        self.settings.uart
    }

    /// Reads the serial parameters from the module and updates the store.
    pub fn query_uart_settings(&mut self) -> Result<UartSettings, Error> {
        let value = self.get_parameter("+UART", true, OK)?;
        let uart = UartSettings::parse(&value).ok_or(Error::InvalidResponse)?;
        self.settings.uart = uart;
        Ok(uart)
    }
}

#[cfg(test)]
mod tests {
    use crate::mock::device;
    use crate::settings::{BaudRate, FlowControl, Parity, UartSettings};
    use crate::Error;

    #[test]
    fn default_link_needs_no_exchange() {
        let mut radio = device(&[]);
        assert_eq!(radio.set_uart_settings(UartSettings::default()), Ok(()));
        assert!(radio.release().0.writes().is_empty());
    }

    #[test]
    fn set_writes_comma_form() {
        let mut radio = device(&["\r\nOK\r\n"]);
        let uart = UartSettings {
            baud_rate: BaudRate::Baud9600,
            parity: Parity::Even,
            ..UartSettings::default()
        };
        assert_eq!(radio.set_uart_settings(uart), Ok(()));
        assert_eq!(radio.uart_settings(), uart);
        assert_eq!(
            radio.release().0.written(),
            ["AT+UART=9600,8,1,EVEN,485\r\n"]
        );
    }

    #[test]
    fn query_always_reads_module() {
        let mut radio = device(&[
            "\r\n+UART:57600,8,1,NONE,NFC\r\n\r\nOK\r\n",
            "\r\n+UART:57600,8\r\n\r\nOK\r\n",
        ]);
        let uart = radio.query_uart_settings().unwrap();
        assert_eq!(uart.baud_rate, BaudRate::Baud57600);
        assert_eq!(uart.flow_control, FlowControl::Nfc);
        assert_eq!(radio.uart_settings(), uart);

        assert_eq!(radio.query_uart_settings(), Err(Error::InvalidResponse));
        assert_eq!(radio.uart_settings(), uart);
    }
}
