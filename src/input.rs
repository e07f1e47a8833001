//! Key mapping from terminal events to engine requests.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::snake::Direction::{self, *};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputRequest {
    Turn(Direction),
    PauseToggle,
    Quit,
}

pub fn map_key(key: &KeyEvent) -> Option<InputRequest> {
    if is_ctrl_c(key) {
        return Some(InputRequest::Quit);
    }

    match key.code {
        KeyCode::Char('w') | KeyCode::Char('W') | KeyCode::Up => Some(InputRequest::Turn(Up)),
        KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Left => Some(InputRequest::Turn(Left)),
        KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Down => Some(InputRequest::Turn(Down)),
        KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Right => Some(InputRequest::Turn(Right)),
        KeyCode::Char('p') | KeyCode::Char('P') | KeyCode::Esc => Some(InputRequest::PauseToggle),
        KeyCode::Char('q') | KeyCode::Char('Q') => Some(InputRequest::Quit),
        _ => None,
    }
}

pub fn is_ctrl_c(key: &KeyEvent) -> bool {
    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::from(code)
    }

    #[test]
    fn arrows_and_wasd_steer() {
        assert_eq!(map_key(&key(KeyCode::Up)), Some(InputRequest::Turn(Up)));
        assert_eq!(map_key(&key(KeyCode::Char('a'))), Some(InputRequest::Turn(Left)));
        assert_eq!(map_key(&key(KeyCode::Char('S'))), Some(InputRequest::Turn(Down)));
        assert_eq!(map_key(&key(KeyCode::Right)), Some(InputRequest::Turn(Right)));
    }

    #[test]
    fn pause_and_quit() {
        assert_eq!(map_key(&key(KeyCode::Esc)), Some(InputRequest::PauseToggle));
        assert_eq!(map_key(&key(KeyCode::Char('p'))), Some(InputRequest::PauseToggle));
        assert_eq!(map_key(&key(KeyCode::Char('q'))), Some(InputRequest::Quit));

        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(map_key(&ctrl_c), Some(InputRequest::Quit));
        assert_eq!(map_key(&key(KeyCode::Char('c'))), None);
    }
}
