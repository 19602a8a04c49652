use crossterm::event::{KeyEvent, MouseEvent};

#[derive(Debug, Clone)]
pub enum UiEvent {
    KeyPressed(KeyEvent),
    Mouse(MouseEvent),
    Resize,
    AppStarted,
    /// Demo ticker: advance the built-in match simulation one step.
    DemoTick,
}
