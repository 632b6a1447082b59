// Serial transport for the vehicle
//
// Provides:
// - The single-byte command protocol
// - A serialport-backed link that owns the device for the session
// - The Transport trait the encoder writes through

mod link;
pub mod protocol;

pub use link::{list_ports, SerialLink};
pub use protocol::ByteCode;

/// Error types for the serial transport
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Failed to open serial port {port}: {source}")]
    Open {
        port: String,
        #[source]
        source: serialport::Error,
    },

    #[error("Serial write failed: {0}")]
    Write(#[from] std::io::Error),
}

/// Sink for command bytes
///
/// The resource behind an implementation is released when it is dropped.
pub trait Transport {
    fn send(&mut self, code: ByteCode) -> Result<(), TransportError>;
}
