use blockfall_engine::Intent;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// What a key press asks the play screen to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Action {
    Intent(Intent),
    TogglePause,
    Quit,
}

/// Maps a key press to an action. Releases and unbound keys map to `None`.
pub(crate) fn action_for_key(key: KeyEvent) -> Option<Action> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    let action = match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::Quit,
        KeyCode::Left => Action::Intent(Intent::MoveLeft),
        KeyCode::Right => Action::Intent(Intent::MoveRight),
        KeyCode::Down => Action::Intent(Intent::SoftDrop),
        KeyCode::Char(' ') => Action::Intent(Intent::HardDrop),
        KeyCode::Up | KeyCode::Char('x') => Action::Intent(Intent::RotateCw),
        KeyCode::Char('z') => Action::Intent(Intent::RotateCcw),
        KeyCode::Char('c') => Action::Intent(Intent::Hold),
        KeyCode::Char('r') => Action::Intent(Intent::Restart),
        KeyCode::Char('p') => Action::TogglePause,
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        _ => return None,
    };
    Some(action)
}

#[cfg(test)]
mod tests {
    use crossterm::event::KeyEventState;

    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_bindings() {
        let cases = [
            (KeyCode::Left, Action::Intent(Intent::MoveLeft)),
            (KeyCode::Right, Action::Intent(Intent::MoveRight)),
            (KeyCode::Down, Action::Intent(Intent::SoftDrop)),
            (KeyCode::Char(' '), Action::Intent(Intent::HardDrop)),
            (KeyCode::Up, Action::Intent(Intent::RotateCw)),
            (KeyCode::Char('x'), Action::Intent(Intent::RotateCw)),
            (KeyCode::Char('z'), Action::Intent(Intent::RotateCcw)),
            (KeyCode::Char('c'), Action::Intent(Intent::Hold)),
            (KeyCode::Char('r'), Action::Intent(Intent::Restart)),
            (KeyCode::Char('p'), Action::TogglePause),
            (KeyCode::Char('q'), Action::Quit),
            (KeyCode::Esc, Action::Quit),
        ];
        for (code, action) in cases {
            assert_eq!(action_for_key(press(code)), Some(action), "{code:?}");
        }
    }

    #[test]
    fn test_ctrl_c_quits() {
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(action_for_key(key), Some(Action::Quit));
    }

    #[test]
    fn test_unbound_key() {
        assert_eq!(action_for_key(press(KeyCode::Char('a'))), None);
        assert_eq!(action_for_key(press(KeyCode::Enter)), None);
    }

    #[test]
    fn test_release_is_ignored() {
        let key = KeyEvent::new_with_kind_and_state(
            KeyCode::Left,
            KeyModifiers::NONE,
            KeyEventKind::Release,
            KeyEventState::NONE,
        );
        assert_eq!(action_for_key(key), None);
    }
}
