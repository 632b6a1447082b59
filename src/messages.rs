// Define the values that flow through one tick: key state in, command out

use serde::{Deserialize, Serialize};
use std::fmt;

/// Pressed state of the four directional keys
///
/// Owned by the control loop and handed to the sampler each tick, which returns
/// the updated copy. Both axes may be active at once (diagonal input).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl KeyState {
    pub const fn new(up: bool, down: bool, left: bool, right: bool) -> Self {
        Self {
            up,
            down,
            left,
            right,
        }
    }
}

/// Vertical axis of a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vertical {
    Forward,
    Reverse,
}

/// Lateral axis of a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lateral {
    Left,
    Right,
}

/// Logical motion command derived from the key state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Command {
    #[default]
    Idle,
    Forward,
    Reverse,
    ForwardLeft,
    ForwardRight,
    ReverseLeft,
    ReverseRight,
    Left,
    Right,
}

impl Command {
    /// Combine an optional vertical and an optional lateral component
    pub const fn compose(vertical: Option<Vertical>, lateral: Option<Lateral>) -> Self {
        match (vertical, lateral) {
            (None, None) => Command::Idle,
            (None, Some(Lateral::Left)) => Command::Left,
            (None, Some(Lateral::Right)) => Command::Right,
            (Some(Vertical::Forward), None) => Command::Forward,
            (Some(Vertical::Forward), Some(Lateral::Left)) => Command::ForwardLeft,
            (Some(Vertical::Forward), Some(Lateral::Right)) => Command::ForwardRight,
            (Some(Vertical::Reverse), None) => Command::Reverse,
            (Some(Vertical::Reverse), Some(Lateral::Left)) => Command::ReverseLeft,
            (Some(Vertical::Reverse), Some(Lateral::Right)) => Command::ReverseRight,
        }
    }

    pub const fn vertical(self) -> Option<Vertical> {
        match self {
            Command::Forward | Command::ForwardLeft | Command::ForwardRight => {
                Some(Vertical::Forward)
            }
            Command::Reverse | Command::ReverseLeft | Command::ReverseRight => {
                Some(Vertical::Reverse)
            }
            Command::Idle | Command::Left | Command::Right => None,
        }
    }

    pub const fn lateral(self) -> Option<Lateral> {
        match self {
            Command::Left | Command::ForwardLeft | Command::ReverseLeft => Some(Lateral::Left),
            Command::Right | Command::ForwardRight | Command::ReverseRight => Some(Lateral::Right),
            Command::Idle | Command::Forward | Command::Reverse => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Command::Idle => "idle",
            Command::Forward => "forward",
            Command::Reverse => "reverse",
            Command::ForwardLeft => "forward_left",
            Command::ForwardRight => "forward_right",
            Command::ReverseLeft => "reverse_left",
            Command::ReverseRight => "reverse_right",
            Command::Left => "left",
            Command::Right => "right",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
