use anyhow::Result;
use botadmin_core::{DefaultAction, FieldKey};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use crate::app::{point_in_rect, App, FocusPane, InputMode, Screen};
use crate::tui::AppEvent;

/// Tracks whether a widget claimed the current terminal event.
#[derive(Debug, Default)]
pub struct EventDisposition {
    pub default_prevented: bool,
    pub propagation_stopped: bool,
}

impl DefaultAction for EventDisposition {
    fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    fn stop_propagation(&mut self) {
        self.propagation_stopped = true;
    }
}

pub fn handle_event(app: &mut App, event: AppEvent) -> Result<()> {
    match event {
        AppEvent::Key(key) => handle_key(app, key),
        AppEvent::Mouse(mouse) => handle_mouse(app, mouse),
        AppEvent::Resize(width, _) => app.on_resize(width),
        AppEvent::Paste(text) => handle_paste(app, &text),
        AppEvent::Tick => app.tick(),
    }
    Ok(())
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Global keys that work in any mode
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_mode(app, key),
        InputMode::Editing => handle_editing_mode(app, key),
    }
}

fn handle_normal_mode(app: &mut App, key: KeyEvent) {
    match app.screen {
        Screen::Tenants => handle_tenants_normal(app, key),
        Screen::TenantDetail => handle_detail_normal(app, key),
        Screen::AddTenant => handle_form_normal(app, key),
    }
}

fn handle_tenants_normal(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('j') | KeyCode::Down => app.tenant_nav_down(),
        KeyCode::Char('k') | KeyCode::Up => app.tenant_nav_up(),
        KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right => app.open_selected_tenant(),
        KeyCode::Char('/') | KeyCode::Char('i') => app.input_mode = InputMode::Editing,
        KeyCode::Char('s') => app.cycle_sort(),
        KeyCode::Char('a') => app.open_add_tenant(),
        KeyCode::Char('t') => app.toggle_theme(),
        _ => {}
    }
}

fn handle_detail_normal(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Esc | KeyCode::Char('h') | KeyCode::Left | KeyCode::Backspace => {
            app.screen = Screen::Tenants;
        }
        KeyCode::Char('t') => app.toggle_theme(),
        _ => {}
    }
}

fn handle_form_normal(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Esc => app.screen = Screen::Tenants,

        KeyCode::Tab => {
            app.focus = match app.focus {
                FocusPane::Fields => FocusPane::Uploads,
                FocusPane::Uploads => FocusPane::Fields,
            };
        }

        KeyCode::Char('j') | KeyCode::Down => match app.focus {
            FocusPane::Fields => app.focus_next_field(),
            FocusPane::Uploads => app.file_nav_down(),
        },
        KeyCode::Char('k') | KeyCode::Up => match app.focus {
            FocusPane::Fields => app.focus_prev_field(),
            FocusPane::Uploads => app.file_nav_up(),
        },

        KeyCode::Enter | KeyCode::Char('i') => app.start_editing(),
        KeyCode::Char('o') => {
            app.focus = FocusPane::Uploads;
            app.start_editing();
        }
        KeyCode::Char('d') | KeyCode::Delete => {
            if app.focus == FocusPane::Uploads {
                app.remove_selected_file();
            }
        }

        KeyCode::Char('s') => app.submit(),
        KeyCode::Char('r') => app.reset_form(),
        KeyCode::Char('x') => app.dismiss_messages(),
        KeyCode::Char('t') => app.toggle_theme(),
        _ => {}
    }
}

fn handle_editing_mode(app: &mut App, key: KeyEvent) {
    match app.screen {
        Screen::Tenants => handle_search_editing(app, key),
        Screen::AddTenant => match app.focus {
            FocusPane::Fields => handle_field_editing(app, key),
            FocusPane::Uploads => handle_path_editing(app, key),
        },
        Screen::TenantDetail => app.input_mode = InputMode::Normal,
    }
}

fn handle_search_editing(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Enter => {
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Backspace => {
            app.search_input.pop();
            app.search_changed();
        }
        KeyCode::Char(c) => {
            app.search_input.push(c);
            app.search_changed();
        }
        _ => {}
    }
}

fn handle_field_editing(app: &mut App, key: KeyEvent) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Char('s') if ctrl => app.submit(),
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Enter => {
            // The prompt is multi-line; everything else commits and moves on
            if app.focused_key() == FieldKey::Prompt && !ctrl {
                app.insert_char('\n');
            } else {
                app.input_mode = InputMode::Normal;
                app.focus_next_field();
            }
        }
        KeyCode::Tab => app.focus_next_field(),
        KeyCode::BackTab => app.focus_prev_field(),
        KeyCode::Backspace => app.backspace(),
        KeyCode::Delete => app.delete_forward(),
        KeyCode::Left => app.cursor_left(),
        KeyCode::Right => app.cursor_right(),
        KeyCode::Home => app.cursor_home(),
        KeyCode::End => app.cursor_end(),
        KeyCode::Char(c) => app.insert_char(c),
        _ => {}
    }
}

fn handle_path_editing(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.path_input.clear();
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Enter => app.pick_path(),
        KeyCode::Backspace => {
            app.path_input.pop();
        }
        KeyCode::Char(c) => app.path_input.push(c),
        _ => {}
    }
}

/// A paste on the form is a file drop unless a text field is being edited.
/// Whatever the upload widget claims never reaches the text input.
fn handle_paste(app: &mut App, text: &str) {
    let mut disposition = EventDisposition::default();

    let editing_field = app.input_mode == InputMode::Editing && app.focus == FocusPane::Fields;
    if app.screen == Screen::AddTenant && !editing_field {
        app.drop_paths(text, &mut disposition);
    }

    let claimed = disposition.default_prevented || disposition.propagation_stopped;
    if claimed || app.input_mode != InputMode::Editing {
        return;
    }

    match app.screen {
        Screen::Tenants => {
            app.search_input.push_str(text.trim());
            app.search_changed();
        }
        Screen::AddTenant => app.insert_text(text),
        Screen::TenantDetail => {}
    }
}

fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    if app.screen != Screen::AddTenant {
        match mouse.kind {
            MouseEventKind::ScrollDown if app.screen == Screen::Tenants => app.tenant_nav_down(),
            MouseEventKind::ScrollUp if app.screen == Screen::Tenants => app.tenant_nav_up(),
            _ => {}
        }
        return;
    }

    let mut disposition = EventDisposition::default();
    match mouse.kind {
        MouseEventKind::Moved | MouseEventKind::Drag(_) => {
            app.pointer_moved(mouse.column, mouse.row, &mut disposition);
        }
        MouseEventKind::Down(MouseButton::Left) => {
            let in_uploads = app
                .upload_area
                .map(|r| point_in_rect(mouse.column, mouse.row, r))
                .unwrap_or(false);
            if app.input_mode == InputMode::Normal {
                app.focus = if in_uploads { FocusPane::Uploads } else { FocusPane::Fields };
            }
        }
        MouseEventKind::ScrollDown => match app.focus {
            FocusPane::Fields => app.grid_scroll = app.grid_scroll.saturating_add(1),
            FocusPane::Uploads => app.file_nav_down(),
        },
        MouseEventKind::ScrollUp => match app.focus {
            FocusPane::Fields => app.grid_scroll = app.grid_scroll.saturating_sub(1),
            FocusPane::Uploads => app.file_nav_up(),
        },
        _ => {}
    }
}
