// Terminal input surface built on crossterm
//
// Terminals that speak the kitty keyboard protocol report key releases directly.
// Everywhere else only presses (and auto-repeat presses) arrive, so a key counts
// as held until no press was seen for the configured hold window.

use crossterm::{
    cursor::MoveToColumn,
    event::{
        self, Event, KeyCode, KeyEventKind, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute, queue,
    style::Print,
    terminal::{self, disable_raw_mode, enable_raw_mode, Clear, ClearType},
};
use std::collections::HashMap;
use std::io::{self, Write};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use super::{InputSurface, KeyEvent, PhysicalKey};
use crate::messages::Command;

const BANNER: &str = "RC car interactive control\r\nUse arrows to move, q or x to stop\r\n";

/// Held-key bookkeeping, with release emulation when `hold` is set
#[derive(Debug)]
struct HeldKeys {
    last_seen: HashMap<PhysicalKey, Instant>,
    hold: Option<Duration>,
}

impl HeldKeys {
    fn new(hold: Option<Duration>) -> Self {
        Self {
            last_seen: HashMap::new(),
            hold,
        }
    }

    /// Record a press or auto-repeat; only the first press is a transition
    fn press(&mut self, key: PhysicalKey, now: Instant) -> Option<KeyEvent> {
        match self.last_seen.insert(key, now) {
            Some(_) => None,
            None => Some(KeyEvent::down(key)),
        }
    }

    fn release(&mut self, key: PhysicalKey) -> Option<KeyEvent> {
        self.last_seen.remove(&key).map(|_| KeyEvent::up(key))
    }

    /// Emulated releases for keys silent for longer than the hold window
    fn expire(&mut self, now: Instant) -> Vec<KeyEvent> {
        let Some(hold) = self.hold else {
            return Vec::new();
        };

        let stale: Vec<PhysicalKey> = self
            .last_seen
            .iter()
            .filter(|&(_, &seen)| now.saturating_duration_since(seen) > hold)
            .map(|(&key, _)| key)
            .collect();

        stale.into_iter().filter_map(|key| self.release(key)).collect()
    }

    fn contains(&self, key: PhysicalKey) -> bool {
        self.last_seen.contains_key(&key)
    }
}

fn physical_key(code: KeyCode) -> Option<PhysicalKey> {
    match code {
        KeyCode::Up => Some(PhysicalKey::ArrowUp),
        KeyCode::Down => Some(PhysicalKey::ArrowDown),
        KeyCode::Left => Some(PhysicalKey::ArrowLeft),
        KeyCode::Right => Some(PhysicalKey::ArrowRight),
        KeyCode::Esc => Some(PhysicalKey::Escape),
        KeyCode::Char(c) => Some(PhysicalKey::Char(c.to_ascii_lowercase())),
        _ => None,
    }
}

/// Raw-mode terminal that owns the keyboard for the session
pub struct TerminalSurface {
    held: HeldKeys,
    enhanced: bool,
    stdout: io::Stdout,
}

impl TerminalSurface {
    /// Enable raw mode and print the banner.
    ///
    /// `key_hold` is only used when the terminal cannot report key releases.
    pub fn new(key_hold: Duration) -> io::Result<Self> {
        enable_raw_mode()?;
        // From here on Drop restores the terminal
        let mut surface = Self {
            held: HeldKeys::new(Some(key_hold)),
            enhanced: false,
            stdout: io::stdout(),
        };

        if terminal::supports_keyboard_enhancement()? {
            execute!(
                surface.stdout,
                PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::REPORT_EVENT_TYPES)
            )?;
            surface.enhanced = true;
            surface.held = HeldKeys::new(None);
            info!("Terminal reports key releases");
        } else {
            info!(
                "Terminal does not report key releases, holding keys for {}ms",
                key_hold.as_millis()
            );
        }

        execute!(surface.stdout, Print(BANNER))?;
        Ok(surface)
    }

    fn read_pending(&mut self, events: &mut Vec<KeyEvent>) -> io::Result<()> {
        while event::poll(Duration::ZERO)? {
            let Event::Key(key_event) = event::read()? else {
                continue;
            };
            let Some(key) = physical_key(key_event.code) else {
                continue;
            };
            let transition = match key_event.kind {
                KeyEventKind::Press | KeyEventKind::Repeat => self.held.press(key, Instant::now()),
                KeyEventKind::Release => self.held.release(key),
            };
            events.extend(transition);
        }
        Ok(())
    }
}

impl InputSurface for TerminalSurface {
    fn drain_events(&mut self) -> Vec<KeyEvent> {
        let mut events = Vec::new();
        if let Err(e) = self.read_pending(&mut events) {
            warn!("Failed to read terminal events: {}", e);
        }
        events.extend(self.held.expire(Instant::now()));
        events
    }

    fn is_pressed(&self, key: PhysicalKey) -> bool {
        self.held.contains(key)
    }

    fn render_status(&mut self, command: Command) {
        let result = queue!(
            self.stdout,
            MoveToColumn(0),
            Clear(ClearType::CurrentLine),
            Print(format!("command: {}", command))
        )
        .and_then(|()| self.stdout.flush());
        if let Err(e) = result {
            debug!("Failed to render status: {}", e);
        }
    }
}

impl Drop for TerminalSurface {
    fn drop(&mut self) {
        if self.enhanced {
            if let Err(e) = execute!(self.stdout, PopKeyboardEnhancementFlags) {
                warn!("Failed to pop keyboard enhancement flags: {}", e);
            }
        }
        let _ = execute!(self.stdout, Print("\r\n"));
        if let Err(e) = disable_raw_mode() {
            warn!("Failed to disable raw mode: {}", e);
        }
    }
}
