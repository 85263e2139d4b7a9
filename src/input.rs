//! Turns terminal events into engine commands.
//!
//! Which commands are produced depends on the current game state: steering is
//! only accepted while a round is running, and Space/Enter starts, pauses,
//! resumes or resets depending on where the game is.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use crate::engine::{Command, GameState};
use crate::snake::Direction::{self, *};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Intent {
    Engine(Command),
    Quit,
}

pub fn translate_key(key: &KeyEvent, state: GameState) -> Option<Intent> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C')) {
        return Some(Intent::Quit);
    }

    let command = match key.code {
        KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => turn(Up, state)?,
        KeyCode::Down | KeyCode::Char('s') | KeyCode::Char('S') => turn(Down, state)?,
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => turn(Left, state)?,
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => turn(Right, state)?,

        KeyCode::Char(' ') | KeyCode::Enter => match state {
            GameState::Idle | GameState::Paused => Command::Start,
            GameState::Playing => Command::Pause,
            GameState::GameOver => Command::Reset,
        },
        KeyCode::Char('p') | KeyCode::Char('P') | KeyCode::Esc => match state {
            GameState::Playing => Command::Pause,
            GameState::Paused => Command::Start,
            _ => return None,
        },
        KeyCode::Char('r') | KeyCode::Char('R') => Command::Reset,

        KeyCode::Char('q') | KeyCode::Char('Q') => return Some(Intent::Quit),
        _ => return None,
    };

    Some(Intent::Engine(command))
}

fn turn(direction: Direction, state: GameState) -> Option<Command> {
    (state == GameState::Playing).then_some(Command::Turn(direction))
}

/// The dominant axis of a drag picks the direction; ties go vertical. A zero
/// delta is a tap, not a swipe.
pub fn swipe_direction(dx: i32, dy: i32) -> Option<Direction> {
    if dx == 0 && dy == 0 {
        return None;
    }

    let dir = if dx.abs() > dy.abs() {
        if dx > 0 { Right } else { Left }
    } else if dy > 0 {
        Down
    } else {
        Up
    };
    Some(dir)
}

/// Pairs a left-button press with its release to recover the swipe delta.
#[derive(Debug, Default)]
pub struct SwipeTracker {
    origin: Option<(u16, u16)>,
}

impl SwipeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle_mouse(&mut self, ev: &MouseEvent, state: GameState) -> Option<Intent> {
        match ev.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.origin = Some((ev.column, ev.row));
                None
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let (x0, y0) = self.origin.take()?;
                let dx = ev.column as i32 - x0 as i32;
                let dy = ev.row as i32 - y0 as i32;
                let command = turn(swipe_direction(dx, dy)?, state)?;
                Some(Intent::Engine(command))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent { kind, column, row, modifiers: KeyModifiers::NONE }
    }

    #[test]
    fn arrows_and_wasd_steer_while_playing() {
        let cases = [
            (KeyCode::Up, Up),
            (KeyCode::Char('w'), Up),
            (KeyCode::Down, Down),
            (KeyCode::Char('s'), Down),
            (KeyCode::Left, Left),
            (KeyCode::Char('A'), Left),
            (KeyCode::Right, Right),
            (KeyCode::Char('d'), Right),
        ];

        for (code, dir) in cases {
            assert_eq!(
                translate_key(&key(code), GameState::Playing),
                Some(Intent::Engine(Command::Turn(dir)))
            );
        }
    }

    #[test]
    fn steering_ignored_outside_play() {
        for state in [GameState::Idle, GameState::Paused, GameState::GameOver] {
            assert_eq!(translate_key(&key(KeyCode::Up), state), None);
            assert_eq!(translate_key(&key(KeyCode::Char('d')), state), None);
        }
    }

    #[test]
    fn space_depends_on_state() {
        let space = key(KeyCode::Char(' '));
        assert_eq!(translate_key(&space, GameState::Idle), Some(Intent::Engine(Command::Start)));
        assert_eq!(translate_key(&space, GameState::Playing), Some(Intent::Engine(Command::Pause)));
        assert_eq!(translate_key(&space, GameState::Paused), Some(Intent::Engine(Command::Start)));
        assert_eq!(translate_key(&space, GameState::GameOver), Some(Intent::Engine(Command::Reset)));

        assert_eq!(
            translate_key(&key(KeyCode::Enter), GameState::Idle),
            Some(Intent::Engine(Command::Start))
        );
    }

    #[test]
    fn pause_key_toggles() {
        let esc = key(KeyCode::Esc);
        assert_eq!(translate_key(&esc, GameState::Playing), Some(Intent::Engine(Command::Pause)));
        assert_eq!(translate_key(&esc, GameState::Paused), Some(Intent::Engine(Command::Start)));
        assert_eq!(translate_key(&esc, GameState::Idle), None);
        assert_eq!(translate_key(&key(KeyCode::Char('p')), GameState::GameOver), None);
    }

    #[test]
    fn reset_and_quit() {
        assert_eq!(
            translate_key(&key(KeyCode::Char('r')), GameState::Playing),
            Some(Intent::Engine(Command::Reset))
        );
        assert_eq!(translate_key(&key(KeyCode::Char('q')), GameState::Idle), Some(Intent::Quit));

        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(translate_key(&ctrl_c, GameState::Playing), Some(Intent::Quit));
    }

    #[test]
    fn key_release_ignored() {
        let mut ev = key(KeyCode::Char(' '));
        ev.kind = KeyEventKind::Release;
        assert_eq!(translate_key(&ev, GameState::Idle), None);
    }

    #[test]
    fn swipe_picks_dominant_axis() {
        assert_eq!(swipe_direction(5, 2), Some(Right));
        assert_eq!(swipe_direction(-5, 2), Some(Left));
        assert_eq!(swipe_direction(1, 4), Some(Down));
        assert_eq!(swipe_direction(1, -4), Some(Up));
        assert_eq!(swipe_direction(3, -3), Some(Up));
        assert_eq!(swipe_direction(0, 0), None);
    }

    #[test]
    fn drag_becomes_turn() {
        let mut tracker = SwipeTracker::new();
        let down = mouse(MouseEventKind::Down(MouseButton::Left), 10, 10);
        let up = mouse(MouseEventKind::Up(MouseButton::Left), 3, 11);

        assert_eq!(tracker.handle_mouse(&down, GameState::Playing), None);
        assert_eq!(tracker.handle_mouse(&up, GameState::Playing), Some(Intent::Engine(Command::Turn(Left))));

        // Release without a press does nothing.
        assert_eq!(tracker.handle_mouse(&up, GameState::Playing), None);
    }

    #[test]
    fn drag_ignored_outside_play() {
        let mut tracker = SwipeTracker::new();
        tracker.handle_mouse(&mouse(MouseEventKind::Down(MouseButton::Left), 0, 0), GameState::Paused);
        let res = tracker.handle_mouse(&mouse(MouseEventKind::Up(MouseButton::Left), 0, 5), GameState::Paused);
        assert_eq!(res, None);
    }
}
