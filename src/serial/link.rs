// Serial link to the vehicle's microcontroller

use serialport::{self, SerialPort};
use std::io::Write;
use tracing::{debug, info};

use super::protocol::ByteCode;
use super::{Transport, TransportError};
use crate::config::SERIAL_TIMEOUT;

/// Exclusively owned serial port; closed when dropped
pub struct SerialLink {
    port: Box<dyn SerialPort>,
    name: String,
}

impl SerialLink {
    /// Open the port for writing at the given baud rate
    pub fn open(port_name: &str, baudrate: u32) -> Result<Self, TransportError> {
        info!("Opening serial port {} at {} baud", port_name, baudrate);
        // Read timeout only; nothing is ever read back from the vehicle
        let port = serialport::new(port_name, baudrate)
            .timeout(SERIAL_TIMEOUT)
            .open()
            .map_err(|source| TransportError::Open {
                port: port_name.to_string(),
                source,
            })?;

        Ok(Self {
            port,
            name: port_name.to_string(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Transport for SerialLink {
    fn send(&mut self, code: ByteCode) -> Result<(), TransportError> {
        debug!("Writing {} to {}", code, self.name);
        self.port.write_all(&[code.as_byte()])?;
        self.port.flush()?;
        Ok(())
    }
}

impl Drop for SerialLink {
    fn drop(&mut self) {
        info!("Closing serial port {}", self.name);
    }
}

/// Names of the serial ports visible on this machine
pub fn list_ports() -> Result<Vec<String>, serialport::Error> {
    Ok(serialport::available_ports()?
        .into_iter()
        .map(|info| info.port_name)
        .collect())
}
