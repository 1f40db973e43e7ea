/// Keyboard button source.
///
/// Tracks which keys are currently held down so that the six virtual
/// buttons read as steady levels, like GPIO pins:
///   - Arrows / WASD  →  Up, Down, Left, Right
///   - Z / J          →  A
///   - X / K          →  B
///
/// Uses crossterm's keyboard enhancement for Release events when available.
/// Falls back to timeout-based release detection on terminals that don't support it.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::domain::entity::Buttons;
use crate::sim::ports::ButtonSource;

/// After this duration without a Press/Repeat event, consider the key released.
/// Only used when the terminal doesn't report Release events.
const HOLD_TIMEOUT: Duration = Duration::from_millis(160);

const KEYS_LEFT: &[KeyCode] = &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const KEYS_RIGHT: &[KeyCode] = &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
const KEYS_UP: &[KeyCode] = &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')];
const KEYS_DOWN: &[KeyCode] = &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')];
const KEYS_A: &[KeyCode] = &[KeyCode::Char('z'), KeyCode::Char('Z'), KeyCode::Char('j'), KeyCode::Char('J')];
const KEYS_B: &[KeyCode] = &[KeyCode::Char('x'), KeyCode::Char('X'), KeyCode::Char('k'), KeyCode::Char('K')];

pub struct KeyboardButtons {
    /// Timestamp of last Press/Repeat event for each key.
    last_active: HashMap<KeyCode, Instant>,

    /// Set once Esc or Ctrl+C has been seen.
    quit: bool,

    /// Whether to honor Release events. Only true when keyboard
    /// enhancement is confirmed working.
    honor_release: bool,
}

impl KeyboardButtons {
    pub fn new(honor_release: bool) -> Self {
        KeyboardButtons {
            last_active: HashMap::with_capacity(16),
            quit: false,
            honor_release,
        }
    }

    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    /// Drain all pending terminal events and update key states.
    fn drain_events(&mut self) {
        // Read all available events without blocking
        while poll(Duration::ZERO).unwrap_or(false) {
            if let Ok(Event::Key(key)) = event::read() {
                self.apply(key, Instant::now());
            }
        }

        // Expire keys that have timed out (fallback for terminals without Release)
        if !self.honor_release {
            let now = Instant::now();
            self.last_active.retain(|_, t| now.duration_since(*t) < HOLD_TIMEOUT);
        }
    }

    fn apply(&mut self, key: KeyEvent, at: Instant) {
        if key.code == KeyCode::Esc
            || (key.modifiers.contains(KeyModifiers::CONTROL)
                && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C')))
        {
            self.quit = true;
            return;
        }

        match key.kind {
            KeyEventKind::Release if self.honor_release => {
                self.last_active.remove(&key.code);
            }
            KeyEventKind::Release => {
                // Ignore release when enhancement not confirmed;
                // rely on timeout-based expiry instead
            }
            _ => {
                self.last_active.insert(key.code, at);
            }
        }
    }

    fn any_held(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.last_active.contains_key(c))
    }

    fn snapshot(&self) -> Buttons {
        Buttons {
            up: self.any_held(KEYS_UP),
            down: self.any_held(KEYS_DOWN),
            left: self.any_held(KEYS_LEFT),
            right: self.any_held(KEYS_RIGHT),
            a: self.any_held(KEYS_A),
            b: self.any_held(KEYS_B),
        }
    }
}

impl ButtonSource for KeyboardButtons {
    fn sample(&mut self) -> Buttons {
        self.drain_events();
        self.snapshot()
    }
}
