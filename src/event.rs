use crossterm::event::KeyEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Tick,
    Key(KeyEvent),
    /// Terminal resized to (columns, rows).
    Resize(u16, u16),
    ScrollUp,
    ScrollDown,
}
