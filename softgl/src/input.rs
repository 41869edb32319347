use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WindowEvent {
    Close,
    Capture,
    Key(KeyCode),
}

pub fn poll_events(max_frame_time: Duration) -> anyhow::Result<Vec<WindowEvent>> {
    let mut out = Vec::new();

    // tiny timeout keeps the frame loop responsive
    let timeout = std::cmp::min(Duration::from_millis(1), max_frame_time);
    while event::poll(timeout)? {
        if let Event::Key(k) = event::read()? {
            if let Some(ev) = map_key(k) {
                out.push(ev);
            }
            if out.len() >= 32 {
                break;
            }
        }
    }
    Ok(out)
}

/// Esc, `q` and Ctrl-C close; `p` captures; other presses go to the demo.
pub fn map_key(k: KeyEvent) -> Option<WindowEvent> {
    if k.kind != KeyEventKind::Press {
        return None;
    }
    if k.modifiers.contains(KeyModifiers::CONTROL) {
        return match k.code {
            KeyCode::Char('c') | KeyCode::Char('C') => Some(WindowEvent::Close),
            _ => None,
        };
    }
    Some(match k.code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => WindowEvent::Close,
        KeyCode::Char('p') | KeyCode::Char('P') => WindowEvent::Capture,
        code => WindowEvent::Key(code),
    })
}
