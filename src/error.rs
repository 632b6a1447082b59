use crate::config::ConfigError;
use crate::serial::TransportError;

/// Fatal errors surfaced to main; every one ends the process with a non-zero code
#[derive(Debug, thiserror::Error)]
pub enum TeleopError {
    #[error("Failed to initialize terminal input: {0}")]
    InputSurface(#[source] std::io::Error),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to enumerate serial ports: {0}")]
    PortDiscovery(#[from] serialport::Error),
}
