use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

/// Input action that can be performed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    ScrollDown,
    ScrollUp,
    PageDown,
    PageUp,
    JumpToTop,
    JumpToBottom,
    SwitchFeed,
    /// Act on the "new content" badge
    ShowNew,
    None,
}

/// Pointer input in terminal rows; the view converts rows to pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerInput {
    Press { row: u16 },
    Drag { row: u16 },
    Release,
    /// Wheel notches, positive = down
    Wheel(i32),
}

/// Handle a key event and return the corresponding action
pub fn handle_key_event(key: KeyEvent) -> Action {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        KeyCode::Char('c') if ctrl => Action::Quit,
        KeyCode::Char('d') | KeyCode::Char('f') if ctrl => Action::PageDown,
        KeyCode::Char('u') | KeyCode::Char('b') if ctrl => Action::PageUp,
        KeyCode::Char('j') | KeyCode::Down => Action::ScrollDown,
        KeyCode::Char('k') | KeyCode::Up => Action::ScrollUp,
        KeyCode::PageDown => Action::PageDown,
        KeyCode::PageUp => Action::PageUp,
        KeyCode::Char('g') | KeyCode::Home => Action::JumpToTop,
        KeyCode::Char('G') | KeyCode::End => Action::JumpToBottom,
        KeyCode::Tab => Action::SwitchFeed,
        KeyCode::Enter => Action::ShowNew,
        _ => Action::None,
    }
}

/// Map a terminal mouse event onto touch-style pointer input
pub fn translate_mouse(mouse: MouseEvent) -> Option<PointerInput> {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => Some(PointerInput::Press { row: mouse.row }),
        MouseEventKind::Drag(MouseButton::Left) => Some(PointerInput::Drag { row: mouse.row }),
        MouseEventKind::Up(MouseButton::Left) => Some(PointerInput::Release),
        MouseEventKind::ScrollDown => Some(PointerInput::Wheel(1)),
        MouseEventKind::ScrollUp => Some(PointerInput::Wheel(-1)),
        _ => None,
    }
}
