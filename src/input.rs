/// Keyboard handling — turns raw terminal key events into game commands.
///
/// Two classes of terminal are supported:
/// * **Keyboard-enhancement capable** (kitty protocol): proper `Press` /
///   `Repeat` / `Release` events, so a direction is cleared on release.
/// * **Classic terminals**: only `Press` events (OS key-repeat shows as
///   repeated `Press`).  A direction then expires after `HOLD_WINDOW` frames
///   without a fresh press.

use std::collections::HashMap;

use crossterm::event::{KeyCode, KeyEventKind, KeyModifiers};

use crate::entities::Direction;

/// Frames a direction stays held after its last press on terminals that never
/// report releases.  8 frames @ 60 FPS ≈ 133 ms, above the OS repeat interval.
pub const HOLD_WINDOW: u64 = 8;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Press(Direction),
    Release(Direction),
    Start,
    Restart,
    Quit,
}

fn direction_for(code: KeyCode) -> Option<Direction> {
    match code {
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => Some(Direction::Up),
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => Some(Direction::Down),
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(Direction::Left),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(Direction::Right),
        _ => None,
    }
}

/// Map one key event to a command, if it means anything to the game.
pub fn map_key(code: KeyCode, kind: KeyEventKind, modifiers: KeyModifiers) -> Option<Command> {
    if let Some(direction) = direction_for(code) {
        return match kind {
            KeyEventKind::Press | KeyEventKind::Repeat => Some(Command::Press(direction)),
            KeyEventKind::Release => Some(Command::Release(direction)),
        };
    }

    // One-shot actions fire on the initial press only
    if kind != KeyEventKind::Press {
        return None;
    }
    match code {
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => Some(Command::Quit),
        KeyCode::Char(' ') => Some(Command::Start),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(Command::Restart),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Command::Quit),
        _ => None,
    }
}

/// Which direction keys are currently down, and since which frame.
#[derive(Debug, Default)]
pub struct HeldKeys {
    last_seen: HashMap<Direction, u64>,
    /// `true` once the terminal is known to deliver release events.
    reports_release: bool,
}

impl HeldKeys {
    pub fn new(reports_release: bool) -> Self {
        HeldKeys {
            last_seen: HashMap::new(),
            reports_release,
        }
    }

    pub fn press(&mut self, direction: Direction, frame: u64) {
        self.last_seen.insert(direction, frame);
    }

    pub fn release(&mut self, direction: Direction) {
        // A release proves the terminal reports them; stop expiring keys
        self.reports_release = true;
        self.last_seen.remove(&direction);
    }

    pub fn is_held(&self, direction: Direction, frame: u64) -> bool {
        match self.last_seen.get(&direction) {
            Some(_) if self.reports_release => true,
            Some(&last) => frame.saturating_sub(last) <= HOLD_WINDOW,
            None => false,
        }
    }
}
