/// Mapping from crossterm events to scene input
use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
};
use laddertruck_core::InputEvent;

/// Zoom delta of one scroll notch
pub const WHEEL_STEP: f32 = 100.0;

/// What the app loop should do with a terminal event
#[derive(Debug, Clone, PartialEq)]
pub enum TerminalEvent {
    Quit,
    Input(InputEvent),
}

/// Symbolic key name for a key code, as keymaps spell it
pub fn key_name(code: KeyCode) -> Option<String> {
    let name = match code {
        KeyCode::Char(c) => return Some(c.to_string()),
        KeyCode::Up => "ArrowUp",
        KeyCode::Down => "ArrowDown",
        KeyCode::Left => "ArrowLeft",
        KeyCode::Right => "ArrowRight",
        KeyCode::PageUp => "PageUp",
        KeyCode::PageDown => "PageDown",
        KeyCode::Home => "Home",
        KeyCode::End => "End",
        KeyCode::Tab => "Tab",
        KeyCode::Enter => "Enter",
        KeyCode::Backspace => "Backspace",
        _ => return None,
    };
    Some(name.to_string())
}

pub fn translate(event: &Event) -> Option<TerminalEvent> {
    match *event {
        Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) => {
            if code == KeyCode::Esc
                || (modifiers.contains(KeyModifiers::CONTROL) && code == KeyCode::Char('c'))
            {
                return Some(TerminalEvent::Quit);
            }
            key_name(code).map(|name| TerminalEvent::Input(InputEvent::Key(name)))
        }
        Event::Mouse(MouseEvent { kind, .. }) => match kind {
            MouseEventKind::ScrollUp => Some(TerminalEvent::Input(InputEvent::Wheel(-WHEEL_STEP))),
            MouseEventKind::ScrollDown => Some(TerminalEvent::Input(InputEvent::Wheel(WHEEL_STEP))),
            _ => None,
        },
        Event::Resize(width, height) => Some(TerminalEvent::Input(InputEvent::Resize {
            width: width as u32,
            height: height as u32,
        })),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode, modifiers: KeyModifiers, kind: KeyEventKind) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers,
            kind,
            state: KeyEventState::NONE,
        })
    }

    fn press(code: KeyCode) -> Event {
        key(code, KeyModifiers::NONE, KeyEventKind::Press)
    }

    #[test]
    fn test_char_and_arrow_keys() {
        assert_eq!(
            translate(&press(KeyCode::Char(' '))),
            Some(TerminalEvent::Input(InputEvent::Key(" ".into())))
        );
        assert_eq!(
            translate(&press(KeyCode::Left)),
            Some(TerminalEvent::Input(InputEvent::Key("ArrowLeft".into())))
        );
        assert_eq!(translate(&press(KeyCode::F(5))), None);
    }

    #[test]
    fn test_quit_keys() {
        assert_eq!(translate(&press(KeyCode::Esc)), Some(TerminalEvent::Quit));
        assert_eq!(
            translate(&key(KeyCode::Char('c'), KeyModifiers::CONTROL, KeyEventKind::Press)),
            Some(TerminalEvent::Quit)
        );
        // Plain 'q' rotates the ladder
        assert_eq!(
            translate(&press(KeyCode::Char('q'))),
            Some(TerminalEvent::Input(InputEvent::Key("q".into())))
        );
    }

    #[test]
    fn test_release_ignored() {
        assert_eq!(
            translate(&key(KeyCode::Char('o'), KeyModifiers::NONE, KeyEventKind::Release)),
            None
        );
    }

    #[test]
    fn test_scroll_and_resize() {
        let scroll = |kind| {
            Event::Mouse(MouseEvent {
                kind,
                column: 0,
                row: 0,
                modifiers: KeyModifiers::NONE,
            })
        };
        assert_eq!(
            translate(&scroll(MouseEventKind::ScrollDown)),
            Some(TerminalEvent::Input(InputEvent::Wheel(WHEEL_STEP)))
        );
        assert_eq!(
            translate(&scroll(MouseEventKind::ScrollUp)),
            Some(TerminalEvent::Input(InputEvent::Wheel(-WHEEL_STEP)))
        );
        assert_eq!(
            translate(&Event::Resize(120, 40)),
            Some(TerminalEvent::Input(InputEvent::Resize {
                width: 120,
                height: 40
            }))
        );
    }
}
