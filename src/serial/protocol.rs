// Single-byte wire protocol spoken by the vehicle's microcontroller
//
// No framing, no checksum, no acknowledgement. Each byte is a complete command:
// [1=forward, 2=reverse, 3=left, 4=right, 5=stop]

use std::fmt;

/// Command byte codes
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteCode {
    Forward = 1,
    Reverse = 2,
    Left = 3,
    Right = 4,
    Stop = 5,
}

impl ByteCode {
    pub const fn as_byte(self) -> u8 {
        self as u8
    }
}

impl From<ByteCode> for u8 {
    fn from(code: ByteCode) -> Self {
        code.as_byte()
    }
}

/// Raised when a byte outside the protocol is decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Unknown command byte: 0x{0:02X}")]
pub struct UnknownByte(pub u8);

impl TryFrom<u8> for ByteCode {
    type Error = UnknownByte;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        match byte {
            1 => Ok(ByteCode::Forward),
            2 => Ok(ByteCode::Reverse),
            3 => Ok(ByteCode::Left),
            4 => Ok(ByteCode::Right),
            5 => Ok(ByteCode::Stop),
            other => Err(UnknownByte(other)),
        }
    }
}

impl fmt::Display for ByteCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({})", self, self.as_byte())
    }
}
