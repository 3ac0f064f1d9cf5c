use std::time::Instant;

use botadmin_core::{
    fields, layout, parse_dropped_paths, Config, DefaultAction, DragEvent, FieldKey,
    FormController, SortKey, SubmitOutcome, Tenant, TenantDirectory, UploadedFile, ViewportClass,
};
use ratatui::layout::Rect;
use ratatui::widgets::ListState;
use tracing::{info, warn};

use crate::theme::Palette;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Tenants,
    TenantDetail,
    AddTenant,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusPane {
    Fields,
    Uploads,
}

/// Start-up settings resolved from config and CLI flags.
#[derive(Debug, Clone)]
pub struct Settings {
    pub config: Config,
    pub dark_mode: bool,
}

pub struct App {
    // Core state
    pub should_quit: bool,
    pub screen: Screen,
    pub input_mode: InputMode,
    pub focus: FocusPane,
    pub dark_mode: bool,
    pub palette: Palette,
    pub cell_width_px: u16,

    // Tenant directory
    pub directory: TenantDirectory,
    pub search_input: String,
    pub sort: SortKey,
    pub tenant_state: ListState,
    pub detail_tenant: Option<Tenant>,

    // Tenant form
    pub form: FormController,
    pub field_order: Vec<FieldKey>,
    pub focused_field: usize,
    pub field_cursor: usize, // cursor position in the focused value
    pub grid_scroll: u16,

    // Uploads
    pub path_input: String,
    pub file_state: ListState,
    pub status_message: Option<String>,

    // Panel areas for mouse hit-testing (updated during render)
    pub upload_area: Option<Rect>,
}

impl App {
    pub fn new(settings: Settings) -> Self {
        let config = settings.config;
        let form = FormController::new(config.upload_policy(), config.locale().dictionary());

        let field_order: Vec<FieldKey> = fields::IDENTITY_FIELDS
            .iter()
            .chain(fields::grid_fields())
            .chain(std::iter::once(fields::prompt_field()))
            .map(|field| field.key)
            .collect();

        let mut tenant_state = ListState::default();
        tenant_state.select(Some(0));

        Self {
            should_quit: false,
            screen: Screen::Tenants,
            input_mode: InputMode::Normal,
            focus: FocusPane::Fields,
            dark_mode: settings.dark_mode,
            palette: Palette::for_mode(settings.dark_mode),
            cell_width_px: config.cell_width_px(),

            directory: TenantDirectory::placeholder(),
            search_input: String::new(),
            sort: SortKey::default(),
            tenant_state,
            detail_tenant: None,

            form,
            field_order,
            focused_field: 0,
            field_cursor: 0,
            grid_scroll: 0,

            path_input: String::new(),
            file_state: ListState::default(),
            status_message: None,

            upload_area: None,
        }
    }

    // Tenant directory
    pub fn visible_tenants(&self) -> Vec<&Tenant> {
        self.directory.search(&self.search_input, self.sort)
    }

    pub fn tenant_nav_down(&mut self) {
        let len = self.visible_tenants().len();
        if len > 0 {
            let i = self.tenant_state.selected().unwrap_or(0);
            self.tenant_state.select(Some((i + 1).min(len - 1)));
        }
    }

    pub fn tenant_nav_up(&mut self) {
        let i = self.tenant_state.selected().unwrap_or(0);
        self.tenant_state.select(Some(i.saturating_sub(1)));
    }

    pub fn search_changed(&mut self) {
        let selection = if self.visible_tenants().is_empty() { None } else { Some(0) };
        self.tenant_state.select(selection);
    }

    pub fn cycle_sort(&mut self) {
        self.sort = self.sort.next();
        self.search_changed();
    }

    pub fn open_selected_tenant(&mut self) {
        let selected = self
            .tenant_state
            .selected()
            .and_then(|i| self.visible_tenants().get(i).map(|t| (*t).clone()));
        if let Some(tenant) = selected {
            self.detail_tenant = Some(tenant);
            self.screen = Screen::TenantDetail;
        }
    }

    pub fn open_add_tenant(&mut self) {
        self.screen = Screen::AddTenant;
        self.input_mode = InputMode::Normal;
        self.focus = FocusPane::Fields;
    }

    // Form fields
    pub fn focused_key(&self) -> FieldKey {
        self.field_order
            .get(self.focused_field)
            .copied()
            .unwrap_or(FieldKey::Name)
    }

    pub fn focus_next_field(&mut self) {
        if !self.field_order.is_empty() {
            self.focused_field = (self.focused_field + 1) % self.field_order.len();
            self.field_cursor = self.focused_value().chars().count();
        }
    }

    pub fn focus_prev_field(&mut self) {
        if !self.field_order.is_empty() {
            self.focused_field = self
                .focused_field
                .checked_sub(1)
                .unwrap_or(self.field_order.len() - 1);
            self.field_cursor = self.focused_value().chars().count();
        }
    }

    pub fn focused_value(&self) -> &str {
        self.form.data().get(self.focused_key())
    }

    pub fn start_editing(&mut self) {
        self.input_mode = InputMode::Editing;
        if self.focus == FocusPane::Fields {
            self.field_cursor = self.focused_value().chars().count();
        }
    }

    /// Route an edit of the focused value through the controller.
    fn edit_focused<F>(&mut self, edit: F)
    where
        F: FnOnce(&mut String, &mut usize),
    {
        let key = self.focused_key();
        let mut value = self.form.data().get(key).to_string();
        let mut cursor = self.field_cursor.min(value.chars().count());
        edit(&mut value, &mut cursor);
        self.field_cursor = cursor;
        self.form.on_field_change(key, value);
    }

    pub fn insert_char(&mut self, c: char) {
        self.edit_focused(|value, cursor| {
            let byte_pos = char_to_byte_index(value, *cursor);
            value.insert(byte_pos, c);
            *cursor += 1;
        });
    }

    pub fn insert_text(&mut self, text: &str) {
        let multiline = self.focused_key() == FieldKey::Prompt;
        self.edit_focused(|value, cursor| {
            let byte_pos = char_to_byte_index(value, *cursor);
            let text: String = if multiline {
                text.to_string()
            } else {
                text.replace(['\r', '\n'], "")
            };
            value.insert_str(byte_pos, &text);
            *cursor += text.chars().count();
        });
    }

    pub fn backspace(&mut self) {
        self.edit_focused(|value, cursor| {
            if *cursor > 0 {
                *cursor -= 1;
                let byte_pos = char_to_byte_index(value, *cursor);
                value.remove(byte_pos);
            }
        });
    }

    pub fn delete_forward(&mut self) {
        self.edit_focused(|value, cursor| {
            if *cursor < value.chars().count() {
                let byte_pos = char_to_byte_index(value, *cursor);
                value.remove(byte_pos);
            }
        });
    }

    pub fn cursor_left(&mut self) {
        self.field_cursor = self.field_cursor.saturating_sub(1);
    }

    pub fn cursor_right(&mut self) {
        let char_count = self.focused_value().chars().count();
        self.field_cursor = (self.field_cursor + 1).min(char_count);
    }

    pub fn cursor_home(&mut self) {
        self.field_cursor = 0;
    }

    pub fn cursor_end(&mut self) {
        self.field_cursor = self.focused_value().chars().count();
    }

    pub fn submit(&mut self) {
        self.input_mode = InputMode::Normal;
        match self.form.submit(Instant::now()) {
            SubmitOutcome::Accepted => {
                self.field_cursor = 0;
                self.status_message = None;
            }
            SubmitOutcome::Rejected { error_count } => {
                // Jump to the first field that needs attention
                if let Some(idx) = self
                    .field_order
                    .iter()
                    .position(|key| self.form.errors().contains(*key))
                {
                    self.focused_field = idx;
                    self.focus = FocusPane::Fields;
                }
                self.status_message = Some(format!("{} {}", error_count, self.form.text().fields_need_attention));
            }
        }
    }

    pub fn reset_form(&mut self) {
        self.form.reset();
        self.field_cursor = 0;
        self.input_mode = InputMode::Normal;
    }

    // Uploads
    pub fn drop_paths(&mut self, text: &str, defaults: &mut impl DefaultAction) {
        let files = self.load_candidates(text);
        self.form
            .uploads_mut()
            .handle_drag(DragEvent::Drop(files), defaults);
        self.sync_file_selection();
    }

    pub fn pick_path(&mut self) {
        let input = std::mem::take(&mut self.path_input);
        let files = self.load_candidates(&input);
        self.form.uploads_mut().select_files(files);
        self.input_mode = InputMode::Normal;
        self.sync_file_selection();
    }

    /// Stat each path; unreadable ones never reach the upload policy.
    fn load_candidates(&mut self, text: &str) -> Vec<UploadedFile> {
        let mut files = Vec::new();
        let mut unreadable = Vec::new();

        for path in parse_dropped_paths(text) {
            match UploadedFile::from_path(&path) {
                Ok(file) => files.push(file),
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "skipping unreadable path");
                    unreadable.push(path.display().to_string());
                }
            }
        }

        self.status_message = if unreadable.is_empty() {
            None
        } else {
            Some(format!("{}: {}", self.form.text().could_not_read, unreadable.join(", ")))
        };
        files
    }

    pub fn pointer_moved(&mut self, column: u16, row: u16, defaults: &mut impl DefaultAction) {
        let inside = self
            .upload_area
            .map(|r| point_in_rect(column, row, r))
            .unwrap_or(false);
        let active = self.form.uploads().drag_active();

        let event = match (inside, active) {
            (true, false) => DragEvent::Enter,
            (true, true) => DragEvent::Over,
            (false, true) => DragEvent::Leave,
            (false, false) => return,
        };
        self.form.uploads_mut().handle_drag(event, defaults);
    }

    pub fn file_nav_down(&mut self) {
        let len = self.form.uploads().files().len();
        if len > 0 {
            let i = self.file_state.selected().unwrap_or(0);
            self.file_state.select(Some((i + 1).min(len - 1)));
        }
    }

    pub fn file_nav_up(&mut self) {
        let i = self.file_state.selected().unwrap_or(0);
        self.file_state.select(Some(i.saturating_sub(1)));
    }

    pub fn remove_selected_file(&mut self) {
        let handle = self
            .file_state
            .selected()
            .and_then(|i| self.form.uploads().files().get(i))
            .map(|entry| entry.handle);
        if let Some(handle) = handle {
            self.form.uploads_mut().remove_file(handle);
            self.sync_file_selection();
        }
    }

    fn sync_file_selection(&mut self) {
        let len = self.form.uploads().files().len();
        match (len, self.file_state.selected()) {
            (0, _) => self.file_state.select(None),
            (_, None) => self.file_state.select(Some(0)),
            (len, Some(i)) if i >= len => self.file_state.select(Some(len - 1)),
            _ => {}
        }
    }

    // Environment signals
    pub fn on_resize(&mut self, columns: u16) {
        self.form
            .set_viewport(ViewportClass::from_columns(columns, self.cell_width_px));
    }

    pub fn tick(&mut self) {
        self.form.tick(Instant::now());
    }

    pub fn dismiss_messages(&mut self) {
        self.form.dismiss_notice();
        self.form.uploads_mut().clear_error();
        self.status_message = None;
    }

    pub fn toggle_theme(&mut self) {
        self.dark_mode = !self.dark_mode;
        self.palette = Palette::for_mode(self.dark_mode);
        info!(dark = self.dark_mode, "theme toggled");
        if let Err(err) = Config::save_theme(self.dark_mode) {
            warn!(error = %err, "could not persist theme");
        }
    }

    pub fn grid_columns(&self) -> u16 {
        layout::grid_columns(self.form.viewport())
    }
}

/// Convert a character index to a byte index for UTF-8 safe string operations
pub fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

/// Check if a point is within a rectangle
pub fn point_in_rect(x: u16, y: u16, rect: Rect) -> bool {
    x >= rect.x && x < rect.x + rect.width && y >= rect.y && y < rect.y + rect.height
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    struct Ignore;

    impl DefaultAction for Ignore {
        fn prevent_default(&mut self) {}
        fn stop_propagation(&mut self) {}
    }

    fn test_app() -> App {
        App::new(Settings {
            config: Config::new(),
            dark_mode: true,
        })
    }

    #[test]
    fn test_field_order_ends_with_prompt() {
        let app = test_app();
        assert_eq!(app.field_order.first(), Some(&FieldKey::Name));
        assert_eq!(app.field_order.get(1), Some(&FieldKey::WhatsappNumber));
        assert_eq!(app.field_order.last(), Some(&FieldKey::Prompt));
        assert_eq!(app.field_order.len(), FieldKey::all().len());
    }

    #[test]
    fn test_editing_is_utf8_safe() {
        let mut app = test_app();
        app.start_editing();
        for c in "Zoë".chars() {
            app.insert_char(c);
        }
        app.cursor_left();
        app.backspace();
        assert_eq!(app.form.data().get(FieldKey::Name), "Zë");
        app.cursor_home();
        app.delete_forward();
        assert_eq!(app.form.data().get(FieldKey::Name), "ë");
    }

    #[test]
    fn test_pasted_text_in_single_line_field_drops_newlines() {
        let mut app = test_app();
        app.insert_text("Ada\nLovelace");
        assert_eq!(app.form.data().get(FieldKey::Name), "AdaLovelace");

        app.focused_field = app.field_order.len() - 1;
        app.insert_text("line one\nline two");
        assert_eq!(app.form.data().get(FieldKey::Prompt), "line one\nline two");
    }

    #[test]
    fn test_rejected_submit_focuses_first_error() {
        let mut app = test_app();
        app.insert_text("Ada");
        app.submit();
        assert_eq!(app.focused_key(), FieldKey::WhatsappNumber);
        assert!(app.status_message.is_some());
    }

    #[test]
    fn test_drop_reads_files_and_reports_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("menu.pdf");
        std::fs::File::create(&good).unwrap().write_all(b"%PDF").unwrap();
        let missing = dir.path().join("gone.csv");

        let mut app = test_app();
        let text = format!("'{}' '{}'", good.display(), missing.display());
        app.drop_paths(&text, &mut Ignore);

        assert_eq!(app.form.uploads().files().len(), 1);
        assert_eq!(app.file_state.selected(), Some(0));
        assert!(app.form.has_uploaded_files());
        assert!(app.status_message.as_deref().unwrap_or("").contains("gone.csv"));

        app.remove_selected_file();
        assert!(!app.form.has_uploaded_files());
        assert_eq!(app.file_state.selected(), None);
    }

    #[test]
    fn test_pointer_drives_drag_state() {
        let mut app = test_app();
        app.upload_area = Some(Rect::new(10, 10, 20, 5));

        app.pointer_moved(12, 11, &mut Ignore);
        assert!(app.form.uploads().drag_active());
        app.pointer_moved(13, 11, &mut Ignore);
        assert!(app.form.uploads().drag_active());
        app.pointer_moved(0, 0, &mut Ignore);
        assert!(!app.form.uploads().drag_active());
    }

    #[test]
    fn test_resize_reclassifies_viewport() {
        let mut app = test_app();
        app.on_resize(80);
        assert_eq!(app.form.viewport(), ViewportClass::Small);
        assert_eq!(app.grid_columns(), 1);
        app.on_resize(200);
        assert_eq!(app.form.viewport(), ViewportClass::Large);
        assert!(app.form.prompt_above_grid());
    }

    #[test]
    fn test_search_and_open_detail() {
        let mut app = test_app();
        app.search_input = "bob".to_string();
        app.search_changed();
        app.open_selected_tenant();
        assert_eq!(app.screen, Screen::TenantDetail);
        assert_eq!(app.detail_tenant.as_ref().map(|t| t.id), Some(2));

        app.search_input = "zzz".to_string();
        app.search_changed();
        assert_eq!(app.tenant_state.selected(), None);
    }
}
