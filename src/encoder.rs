// Key state -> command mapping and byte transmission
//
// Priority when both keys of an axis are held: up beats down, left beats right.
// The vertical byte is always written before the lateral byte; the firmware acts
// on bytes as they arrive.

use tracing::{debug, info};

use crate::messages::{Command, KeyState, Lateral, Vertical};
use crate::serial::{ByteCode, Transport, TransportError};

/// Command for a key state and the bytes that announce it, in wire order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encoded {
    pub command: Command,
    pub codes: Vec<ByteCode>,
}

/// Map a key state to its command and byte sequence
pub fn encode(state: KeyState) -> Encoded {
    let mut codes = Vec::with_capacity(2);

    let vertical = if state.up {
        codes.push(ByteCode::Forward);
        Some(Vertical::Forward)
    } else if state.down {
        codes.push(ByteCode::Reverse);
        Some(Vertical::Reverse)
    } else {
        None
    };

    let lateral = if state.left {
        codes.push(ByteCode::Left);
        Some(Lateral::Left)
    } else if state.right {
        codes.push(ByteCode::Right);
        Some(Lateral::Right)
    } else {
        None
    };

    Encoded {
        command: Command::compose(vertical, lateral),
        codes,
    }
}

/// Owns the transport and remembers the last command sent
pub struct CommandEncoder<T: Transport> {
    transport: T,
    last: Command,
}

impl<T: Transport> CommandEncoder<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            last: Command::Idle,
        }
    }

    /// Send the bytes for `state` if it changed; otherwise re-report the last command
    pub fn encode_and_send(
        &mut self,
        state: KeyState,
        changed: bool,
    ) -> Result<Command, TransportError> {
        if !changed {
            return Ok(self.last);
        }

        let encoded = encode(state);
        for &code in &encoded.codes {
            self.transport.send(code)?;
        }

        if encoded.command != self.last {
            debug!("Command: {} -> {}", self.last, encoded.command);
        }
        self.last = encoded.command;
        Ok(encoded.command)
    }

    /// Write the stop byte
    pub fn shutdown(&mut self) -> Result<(), TransportError> {
        info!("Sending stop");
        self.transport.send(ByteCode::Stop)
    }

    pub fn last_command(&self) -> Command {
        self.last
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingTransport;

    fn state(up: bool, down: bool, left: bool, right: bool) -> KeyState {
        KeyState::new(up, down, left, right)
    }

    #[test]
    fn test_idle_sends_nothing() {
        let encoded = encode(KeyState::default());
        assert_eq!(encoded.command, Command::Idle);
        assert!(encoded.codes.is_empty());
    }

    #[test]
    fn test_up_beats_down() {
        let encoded = encode(state(true, true, false, false));
        assert_eq!(encoded.command, Command::Forward);
        assert_eq!(encoded.codes, vec![ByteCode::Forward]);
    }

    #[test]
    fn test_left_beats_right() {
        let encoded = encode(state(false, true, true, true));
        assert_eq!(encoded.command, Command::ReverseLeft);
        assert_eq!(encoded.codes, vec![ByteCode::Reverse, ByteCode::Left]);
    }

    #[test]
    fn test_composite_vertical_byte_first() {
        let encoded = encode(state(true, false, true, false));
        assert_eq!(encoded.command, Command::ForwardLeft);
        assert_eq!(encoded.codes, vec![ByteCode::Forward, ByteCode::Left]);
    }

    #[test]
    fn test_lateral_only() {
        let encoded = encode(state(false, false, true, false));
        assert_eq!(encoded.command, Command::Left);
        assert_eq!(encoded.codes, vec![ByteCode::Left]);

        let encoded = encode(state(false, false, false, true));
        assert_eq!(encoded.command, Command::Right);
        assert_eq!(encoded.codes, vec![ByteCode::Right]);
    }

    #[test]
    fn test_encode_is_deterministic_over_all_states() {
        for bits in 0u8..16 {
            let s = state(bits & 1 != 0, bits & 2 != 0, bits & 4 != 0, bits & 8 != 0);
            let encoded = encode(s);
            assert_eq!(encoded, encode(s));

            // One byte per active axis, matching the command's axes
            let expected_len =
                encoded.command.vertical().is_some() as usize + encoded.command.lateral().is_some() as usize;
            assert_eq!(encoded.codes.len(), expected_len);
        }
    }

    #[test]
    fn test_changed_tick_writes_bytes_in_order() {
        let transport = RecordingTransport::new();
        let log = transport.log();
        let mut encoder = CommandEncoder::new(transport);

        let command = encoder
            .encode_and_send(state(true, false, false, true), true)
            .unwrap();
        assert_eq!(command, Command::ForwardRight);
        assert_eq!(log.bytes(), vec![1, 4]);
    }

    #[test]
    fn test_unchanged_tick_reports_previous_command() {
        let transport = RecordingTransport::new();
        let log = transport.log();
        let mut encoder = CommandEncoder::new(transport);

        encoder.encode_and_send(state(false, true, false, false), true).unwrap();
        let command = encoder
            .encode_and_send(state(true, false, true, false), false)
            .unwrap();

        assert_eq!(command, Command::Reverse);
        assert_eq!(encoder.last_command(), Command::Reverse);
        assert_eq!(log.bytes(), vec![2]);
    }

    #[test]
    fn test_unchanged_before_any_change_is_idle() {
        let transport = RecordingTransport::new();
        let log = transport.log();
        let mut encoder = CommandEncoder::new(transport);

        let command = encoder.encode_and_send(state(true, false, false, false), false).unwrap();
        assert_eq!(command, Command::Idle);
        assert!(log.bytes().is_empty());
    }

    #[test]
    fn test_write_failure_surfaces() {
        let transport = RecordingTransport::failing_at(1);
        let log = transport.log();
        let mut encoder = CommandEncoder::new(transport);

        let result = encoder.encode_and_send(state(true, false, true, false), true);
        assert!(matches!(result, Err(TransportError::Write(_))));
        assert_eq!(log.bytes(), vec![1]);
        assert_eq!(encoder.last_command(), Command::Idle);
    }

    #[test]
    fn test_shutdown_sends_stop_byte() {
        let transport = RecordingTransport::new();
        let log = transport.log();
        let mut encoder = CommandEncoder::new(transport);

        encoder.shutdown().unwrap();
        assert_eq!(log.bytes(), vec![5]);
    }
}
