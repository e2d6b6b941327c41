/// Keyboard events to camera input edges
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use pv3d_core::{InputAction, InputEdge};
use std::collections::HashMap;

/// Map a key to the action it drives
pub fn action_for(event: &KeyEvent) -> Option<InputAction> {
    let action = match event.code {
        KeyCode::Char('c') if event.modifiers.contains(KeyModifiers::CONTROL) => InputAction::Quit,
        KeyCode::Char('q') | KeyCode::Esc => InputAction::Quit,
        KeyCode::Left => InputAction::PanLeft,
        KeyCode::Right => InputAction::PanRight,
        KeyCode::Up => InputAction::TiltUp,
        KeyCode::Down => InputAction::TiltDown,
        KeyCode::Char(c) => match c.to_ascii_lowercase() {
            'w' => InputAction::MoveForward,
            's' => InputAction::MoveBack,
            'a' => InputAction::StrafeLeft,
            'd' => InputAction::StrafeRight,
            _ => return None,
        },
        _ => return None,
    };
    Some(action)
}

/// Turns key events into press/release edges.
///
/// Most terminals only report presses and auto-repeats. Unless the terminal
/// reports releases, a held key is released once it has gone `hold_ticks`
/// ticks without a repeat.
pub struct KeyTracker {
    /// Ticks since each held action was last seen
    held: HashMap<InputAction, u32>,
    reports_release: bool,
    hold_ticks: u32,
}

impl KeyTracker {
    pub fn new(reports_release: bool, hold_ticks: u32) -> Self {
        Self {
            held: HashMap::new(),
            reports_release,
            hold_ticks,
        }
    }

    pub fn key_event(&mut self, event: &KeyEvent) -> Option<InputEdge> {
        let action = action_for(event)?;

        if action == InputAction::Quit {
            return (event.kind != KeyEventKind::Release).then(|| InputEdge::press(action));
        }

        match event.kind {
            KeyEventKind::Release => self
                .held
                .remove(&action)
                .map(|_| InputEdge::release(action)),
            KeyEventKind::Press | KeyEventKind::Repeat => {
                match self.held.insert(action, 0) {
                    Some(_) => None,
                    None => Some(InputEdge::press(action)),
                }
            }
        }
    }

    /// Age held keys by one tick, releasing the ones that timed out
    pub fn end_tick(&mut self) -> Vec<InputEdge> {
        if self.reports_release {
            return Vec::new();
        }

        let mut released = Vec::new();
        let hold_ticks = self.hold_ticks;
        self.held.retain(|&action, age| {
            *age += 1;
            if *age > hold_ticks {
                released.push(InputEdge::release(action));
                false
            } else {
                true
            }
        });
        released
    }
}
