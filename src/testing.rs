//! Test doubles for the input surface and the serial transport.

use std::cell::RefCell;
use std::collections::{HashSet, VecDeque};
use std::io;
use std::rc::Rc;

use crate::input::{InputSurface, KeyEvent, PhysicalKey};
use crate::messages::Command;
use crate::serial::{ByteCode, Transport, TransportError};

/// Surface that replays one batch of events per drain call.
#[derive(Debug, Default)]
pub struct ScriptedSurface {
    ticks: VecDeque<Vec<KeyEvent>>,
    held: HashSet<PhysicalKey>,
    pub rendered: Vec<Command>,
}

impl ScriptedSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the events delivered by the next unconsumed tick.
    pub fn push_tick(&mut self, events: Vec<KeyEvent>) {
        self.ticks.push_back(events);
    }

    /// Mark a key as held without emitting an event.
    pub fn hold(&mut self, key: PhysicalKey) {
        self.held.insert(key);
    }
}

impl InputSurface for ScriptedSurface {
    fn drain_events(&mut self) -> Vec<KeyEvent> {
        let events = self.ticks.pop_front().unwrap_or_default();
        for event in &events {
            if event.pressed {
                self.held.insert(event.key);
            } else {
                self.held.remove(&event.key);
            }
        }
        events
    }

    fn is_pressed(&self, key: PhysicalKey) -> bool {
        self.held.contains(&key)
    }

    fn render_status(&mut self, command: Command) {
        self.rendered.push(command);
    }
}

#[derive(Debug, Default)]
struct LogInner {
    bytes: Vec<u8>,
    writes: usize,
    opens: usize,
    closes: usize,
}

/// Shared view of what a RecordingTransport did, readable after it is dropped.
#[derive(Debug, Clone, Default)]
pub struct TransportLog(Rc<RefCell<LogInner>>);

impl TransportLog {
    pub fn bytes(&self) -> Vec<u8> {
        self.0.borrow().bytes.clone()
    }

    pub fn opens(&self) -> usize {
        self.0.borrow().opens
    }

    pub fn closes(&self) -> usize {
        self.0.borrow().closes
    }
}

/// Transport that records bytes and counts open/close.
#[derive(Debug)]
pub struct RecordingTransport {
    log: TransportLog,
    fail_at: Option<usize>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::open(None)
    }

    /// The write with this zero-based index fails; every other write succeeds.
    pub fn failing_at(index: usize) -> Self {
        Self::open(Some(index))
    }

    fn open(fail_at: Option<usize>) -> Self {
        let log = TransportLog::default();
        log.0.borrow_mut().opens += 1;
        Self { log, fail_at }
    }

    pub fn log(&self) -> TransportLog {
        self.log.clone()
    }
}

impl Transport for RecordingTransport {
    fn send(&mut self, code: ByteCode) -> Result<(), TransportError> {
        let mut inner = self.log.0.borrow_mut();
        let index = inner.writes;
        inner.writes += 1;
        if self.fail_at == Some(index) {
            return Err(TransportError::Write(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "device unplugged",
            )));
        }
        inner.bytes.push(code.as_byte());
        Ok(())
    }
}

impl Drop for RecordingTransport {
    fn drop(&mut self) {
        self.log.0.borrow_mut().closes += 1;
    }
}
