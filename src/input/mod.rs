// Keyboard input for the teleop loop
//
// Provides:
// - Physical key identities and the static key -> direction table
// - The InputSurface trait the sampler reads from
// - The per-tick sampler
// - A crossterm terminal surface

mod sampler;
pub mod terminal;

pub use sampler::{sample, Sample};
pub use terminal::TerminalSurface;

use crate::messages::Command;

/// Key identity as reported by the input surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhysicalKey {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Escape,
    /// Always lowercase
    Char(char),
}

/// Role a key plays in the teleop loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirectionKey {
    Up,
    Down,
    Left,
    Right,
    Quit,
}

/// Keys the loop reacts to
pub static KEY_MAP: [(PhysicalKey, DirectionKey); 6] = [
    (PhysicalKey::ArrowUp, DirectionKey::Up),
    (PhysicalKey::ArrowDown, DirectionKey::Down),
    (PhysicalKey::ArrowLeft, DirectionKey::Left),
    (PhysicalKey::ArrowRight, DirectionKey::Right),
    (PhysicalKey::Char('q'), DirectionKey::Quit),
    (PhysicalKey::Char('x'), DirectionKey::Quit),
];

impl DirectionKey {
    pub fn from_key(key: PhysicalKey) -> Option<Self> {
        KEY_MAP
            .iter()
            .find(|(physical, _)| *physical == key)
            .map(|&(_, direction)| direction)
    }

    /// Physical keys polled for the stop condition
    pub fn quit_keys() -> impl Iterator<Item = PhysicalKey> {
        KEY_MAP
            .iter()
            .filter(|(_, direction)| *direction == DirectionKey::Quit)
            .map(|&(physical, _)| physical)
    }
}

/// A key transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: PhysicalKey,
    /// true = pressed, false = released
    pub pressed: bool,
}

impl KeyEvent {
    pub const fn down(key: PhysicalKey) -> Self {
        Self { key, pressed: true }
    }

    pub const fn up(key: PhysicalKey) -> Self {
        Self {
            key,
            pressed: false,
        }
    }
}

/// Surface that owns the keyboard (and any status display) for the session.
/// Implementations: TerminalSurface (crossterm), ScriptedSurface (testing).
///
/// Released when dropped.
pub trait InputSurface {
    /// Take every key transition queued since the last call, without blocking.
    fn drain_events(&mut self) -> Vec<KeyEvent>;

    /// Check if a key is currently held down.
    fn is_pressed(&self, key: PhysicalKey) -> bool;

    /// Show the current command to the operator.
    fn render_status(&mut self, _command: Command) {}
}
