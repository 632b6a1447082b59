// Per-tick key sampling
//
// Direction keys are edge-triggered: only press/release events change the state.
// Quit keys are level-triggered: polled every tick, so a held quit key reports
// stop on every tick it stays down.

use tracing::debug;

use super::{DirectionKey, InputSurface};
use crate::messages::KeyState;

/// Result of sampling one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sample {
    pub state: KeyState,
    /// A directional key transitioned this tick
    pub changed: bool,
    /// A quit key is held right now
    pub stop: bool,
}

/// Drain the surface's pending events into `state` and poll the quit keys
pub fn sample<S: InputSurface + ?Sized>(surface: &mut S, mut state: KeyState) -> Sample {
    let mut changed = false;

    for event in surface.drain_events() {
        let field = match DirectionKey::from_key(event.key) {
            Some(DirectionKey::Up) => &mut state.up,
            Some(DirectionKey::Down) => &mut state.down,
            Some(DirectionKey::Left) => &mut state.left,
            Some(DirectionKey::Right) => &mut state.right,
            Some(DirectionKey::Quit) | None => continue,
        };
        *field = event.pressed;
        changed = true;
    }

    let stop = DirectionKey::quit_keys().any(|key| surface.is_pressed(key));

    if changed {
        debug!("Key state: {:?}", state);
    }

    Sample {
        state,
        changed,
        stop,
    }
}
