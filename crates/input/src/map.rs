//! Key mapping from terminal events to simulation input.

use crate::types::{arena_for_terminal, InputEvent, SimAction};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Map a key press to an input event.
///
/// Every key wounds the player except the few bound to other actions.
pub fn handle_key_event(key: KeyEvent) -> InputEvent {
    if should_quit(key) {
        return InputEvent::Quit;
    }
    match key.code {
        KeyCode::Char('f') | KeyCode::Char('F') => InputEvent::Action(SimAction::Fire),
        KeyCode::Char('m') | KeyCode::Char('M') => InputEvent::Action(SimAction::ToggleMelee),
        KeyCode::Char('r') | KeyCode::Char('R') => InputEvent::Action(SimAction::Respawn),
        _ => InputEvent::Action(SimAction::Wound),
    }
}

/// Check if key should quit the game.
pub fn should_quit(key: KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q'))
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

/// Map any terminal event. Only presses count; repeats and releases are ignored.
pub fn map_event(event: Event) -> InputEvent {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => handle_key_event(key),
        Event::Resize(cols, rows) => {
            let (width, height) = arena_for_terminal(cols, rows);
            InputEvent::Resize { width, height }
        }
        _ => InputEvent::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventState, MouseEvent, MouseEventKind};

    #[test]
    fn test_bound_keys() {
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('f'))),
            InputEvent::Action(SimAction::Fire)
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('M'))),
            InputEvent::Action(SimAction::ToggleMelee)
        );
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('r'))),
            InputEvent::Action(SimAction::Respawn)
        );
    }

    #[test]
    fn test_any_other_key_wounds() {
        for code in [KeyCode::Char('x'), KeyCode::Char(' '), KeyCode::Enter, KeyCode::Left] {
            assert_eq!(
                handle_key_event(KeyEvent::from(code)),
                InputEvent::Action(SimAction::Wound)
            );
        }
    }

    #[test]
    fn test_quit_keys() {
        assert!(should_quit(KeyEvent::from(KeyCode::Char('q'))));
        assert!(should_quit(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL
        )));
        assert!(!should_quit(KeyEvent::from(KeyCode::Char('c'))));
        assert_eq!(
            handle_key_event(KeyEvent::from(KeyCode::Char('Q'))),
            InputEvent::Quit
        );
    }

    #[test]
    fn test_release_and_repeat_are_ignored() {
        let release = KeyEvent::new_with_kind_and_state(
            KeyCode::Char('x'),
            KeyModifiers::NONE,
            KeyEventKind::Release,
            KeyEventState::NONE,
        );
        assert_eq!(map_event(Event::Key(release)), InputEvent::Other);

        let repeat = KeyEvent::new_with_kind(
            KeyCode::Char('x'),
            KeyModifiers::NONE,
            KeyEventKind::Repeat,
        );
        assert_eq!(map_event(Event::Key(repeat)), InputEvent::Other);
        assert_eq!(
            map_event(Event::Key(KeyEvent::from(KeyCode::Char('x')))),
            InputEvent::Action(SimAction::Wound)
        );
    }

    #[test]
    fn test_resize_maps_to_pixels() {
        assert_eq!(
            map_event(Event::Resize(80, 25)),
            InputEvent::Resize {
                width: 80,
                height: 48
            }
        );
    }

    #[test]
    fn test_mouse_is_other() {
        let mouse = MouseEvent {
            kind: MouseEventKind::Moved,
            column: 0,
            row: 0,
            modifiers: KeyModifiers::NONE,
        };
        assert_eq!(map_event(Event::Mouse(mouse)), InputEvent::Other);
    }
}
