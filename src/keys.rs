use crate::app::{App, MenuItem};
use crossterm::event::KeyCode::Char;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use std::sync::Arc;
use tokio::sync::Mutex;

pub async fn handle_key_bindings(key_event: KeyEvent, app: &Arc<Mutex<App>>) {
    let mut guard = app.lock().await;

    match (guard.state.active_tab, key_event.code, key_event.modifiers) {
        // Quit
        (_, Char('q'), _) | (_, Char('c'), KeyModifiers::CONTROL) => {
            crate::cleanup_terminal();
            std::process::exit(0);
        }

        // Tab switching
        (_, Char('1'), _) => guard.update_tab(MenuItem::Diagram),
        (_, Char('?'), _) => guard.update_tab(MenuItem::Help),
        (MenuItem::Help, KeyCode::Esc, _) => guard.exit_help(),

        // Tournament cycling
        (MenuItem::Diagram, KeyCode::Tab | Char('n'), _) => guard.next_tournament(),
        (MenuItem::Diagram, KeyCode::BackTab | Char('p'), _) => guard.prev_tournament(),

        // Zoom
        (MenuItem::Diagram, Char('+') | Char('='), _) => guard.zoom_in(),
        (MenuItem::Diagram, Char('-'), _) => guard.zoom_out(),
        (MenuItem::Diagram, Char('0') | Char('r'), _) => guard.reset_view(),

        // Pan — each key press is one full gesture of one cell.
        (MenuItem::Diagram, Char('h') | KeyCode::Left, _) => guard.pan_step(1.0, 0.0),
        (MenuItem::Diagram, Char('l') | KeyCode::Right, _) => guard.pan_step(-1.0, 0.0),
        (MenuItem::Diagram, Char('k') | KeyCode::Up, _) => guard.pan_step(0.0, 1.0),
        (MenuItem::Diagram, Char('j') | KeyCode::Down, _) => guard.pan_step(0.0, -1.0),

        // Selection and highlight
        (MenuItem::Diagram, KeyCode::Enter | Char(']'), _) => guard.select_next_match(),
        (MenuItem::Diagram, Char('['), _) => guard.select_prev_match(),
        (MenuItem::Diagram, Char('t'), _) => guard.cycle_highlight(),

        // Layout orientation
        (MenuItem::Diagram, Char('o'), _) => guard.toggle_orientation(),

        // Global
        (_, Char('f'), _) => guard.toggle_full_screen(),
        (_, Char('"'), _) => guard.toggle_show_logs(),

        _ => {}
    }
}

pub async fn handle_mouse(mouse_event: MouseEvent, app: &Arc<Mutex<App>>) {
    let mut guard = app.lock().await;
    if guard.state.active_tab != MenuItem::Diagram {
        return;
    }

    match mouse_event.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            guard.pan_grab(mouse_event.column, mouse_event.row);
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            guard.pan_drag(mouse_event.column, mouse_event.row);
        }
        MouseEventKind::Up(MouseButton::Left) => {
            guard.pan_release();
        }
        MouseEventKind::ScrollUp => guard.zoom_in(),
        MouseEventKind::ScrollDown => guard.zoom_out(),
        _ => {}
    }
}
