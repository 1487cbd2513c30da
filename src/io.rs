use crossterm::event::Event as CrossTermEvent;
use crossterm::event::KeyCode;
use crossterm::event::KeyEvent;
use crossterm::event::KeyEventKind;
use crossterm::event::KeyModifiers;

use crate::events::Command;
use crate::events::Edit;
use crate::events::Event;
use crate::events::ViewEvent;

/// How far one pan key moves the view.
const PAN_STEP: isize = 5;

/// Converts a crossterm event into a torus-life event
pub fn convert_event(event: CrossTermEvent) -> Option<Event> {
    match event {
        CrossTermEvent::Key(key_event) if key_event.kind != KeyEventKind::Release => {
            convert_key(key_event)
        }
        CrossTermEvent::Resize(_, _) => Some(Event::ViewEvent(ViewEvent::Redraw)),
        _ => None,
    }
}

fn convert_key(key_event: KeyEvent) -> Option<Event> {
    let pan = |rows, cols| Some(Event::ViewEvent(ViewEvent::Pan { rows, cols }));

    match key_event {
        KeyEvent {
            code: KeyCode::Char('c'),
            modifiers: KeyModifiers::CONTROL,
            ..
        }
        | KeyEvent {
            code: KeyCode::Char('q'),
            ..
        } => Some(Event::Exit),

        KeyEvent {
            code: KeyCode::Char(' '),
            ..
        } => Some(Event::Command(Command::StartStop)),
        KeyEvent {
            code: KeyCode::Char('r'),
            ..
        } => Some(Event::Command(Command::Randomize)),
        KeyEvent {
            code: KeyCode::Char('c'),
            ..
        } => Some(Event::Command(Command::Reset)),

        // movements
        KeyEvent {
            code: KeyCode::Char('h') | KeyCode::Left,
            ..
        } => pan(0, -PAN_STEP),
        KeyEvent {
            code: KeyCode::Char('j') | KeyCode::Down,
            ..
        } => pan(PAN_STEP, 0),
        KeyEvent {
            code: KeyCode::Char('k') | KeyCode::Up,
            ..
        } => pan(-PAN_STEP, 0),
        KeyEvent {
            code: KeyCode::Char('l') | KeyCode::Right,
            ..
        } => pan(0, PAN_STEP),
        KeyEvent {
            code: KeyCode::Char('0'),
            modifiers: KeyModifiers::ALT,
            ..
        } => Some(Event::ViewEvent(ViewEvent::Recenter)),

        // size input
        KeyEvent {
            code: KeyCode::Char(c @ ('0'..='9' | '.' | '-')),
            ..
        } => Some(Event::Edit(Edit::Push(c))),
        KeyEvent {
            code: KeyCode::Backspace,
            ..
        } => Some(Event::Edit(Edit::Pop)),
        KeyEvent {
            code: KeyCode::Esc, ..
        } => Some(Event::Edit(Edit::Clear)),
        KeyEvent {
            code: KeyCode::Enter,
            ..
        } => Some(Event::Edit(Edit::Submit)),

        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::Event as CrossTermEvent;
    use crossterm::event::KeyCode;
    use crossterm::event::KeyEvent;
    use crossterm::event::KeyEventKind;
    use crossterm::event::KeyModifiers;

    use super::convert_event;
    use crate::events::Command;
    use crate::events::Edit;
    use crate::events::Event;
    use crate::events::ViewEvent;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> CrossTermEvent {
        CrossTermEvent::Key(KeyEvent::new(code, modifiers))
    }

    fn plain(c: char) -> Option<Event> {
        convert_event(key(KeyCode::Char(c), KeyModifiers::NONE))
    }

    #[test]
    fn commands() {
        assert!(matches!(
            plain(' '),
            Some(Event::Command(Command::StartStop))
        ));
        assert!(matches!(
            plain('r'),
            Some(Event::Command(Command::Randomize))
        ));
        assert!(matches!(plain('c'), Some(Event::Command(Command::Reset))));
        assert!(matches!(plain('q'), Some(Event::Exit)));
        assert!(matches!(
            convert_event(key(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Event::Exit)
        ));
    }

    #[test]
    fn size_input() {
        assert!(matches!(plain('4'), Some(Event::Edit(Edit::Push('4')))));
        assert!(matches!(plain('0'), Some(Event::Edit(Edit::Push('0')))));
        assert!(matches!(
            convert_event(key(KeyCode::Enter, KeyModifiers::NONE)),
            Some(Event::Edit(Edit::Submit))
        ));
        assert!(matches!(
            convert_event(key(KeyCode::Backspace, KeyModifiers::NONE)),
            Some(Event::Edit(Edit::Pop))
        ));
    }

    #[test]
    fn view() {
        assert!(matches!(
            plain('l'),
            Some(Event::ViewEvent(ViewEvent::Pan { rows: 0, cols: 5 }))
        ));
        assert!(matches!(
            convert_event(key(KeyCode::Char('0'), KeyModifiers::ALT)),
            Some(Event::ViewEvent(ViewEvent::Recenter))
        ));
        assert!(matches!(
            convert_event(CrossTermEvent::Resize(80, 24)),
            Some(Event::ViewEvent(ViewEvent::Redraw))
        ));
    }

    #[test]
    fn ignores_releases_and_unknown_keys() {
        let release = KeyEvent::new_with_kind(
            KeyCode::Char(' '),
            KeyModifiers::NONE,
            KeyEventKind::Release,
        );

        assert!(convert_event(CrossTermEvent::Key(release)).is_none());
        assert!(plain('z').is_none());
        assert!(convert_event(CrossTermEvent::FocusGained).is_none());
    }
}
