use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
};
use botadmin_core::{fields, FieldKey, ViewportClass};
use crate::app::{App, FocusPane, InputMode, Screen};

const FIELD_HEIGHT: u16 = 3;
const PROMPT_HEIGHT: u16 = 7;
const BUTTON_ROW_HEIGHT: u16 = 1;

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // Main layout: header, body, footer
    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area);

    match app.screen {
        Screen::Tenants => render_tenants_screen(app, frame, body_area),
        Screen::TenantDetail => render_detail_screen(app, frame, body_area),
        Screen::AddTenant => render_form_screen(app, frame, body_area),
    }

    render_footer(app, frame, footer_area);
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let palette = app.palette;
    let screen_name = match app.screen {
        Screen::Tenants => app.form.text().tenants,
        Screen::TenantDetail => app.form.text().tenant,
        Screen::AddTenant => app.form.text().add_user,
    };

    let title = Line::from(vec![
        Span::styled(" Bot Admin ", Style::default().fg(palette.accent).bold()),
        Span::styled(format!("· {} ", screen_name), Style::default().fg(palette.text)),
        Span::styled(
            format!("[{}] ", app.form.viewport().label()),
            Style::default().fg(palette.muted),
        ),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(palette.muted),
        ),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(palette.surface));
    frame.render_widget(header, area);
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let palette = app.palette;
    let mode_style = match app.input_mode {
        InputMode::Normal => Style::default().bg(palette.accent).fg(palette.surface),
        InputMode::Editing => Style::default().bg(palette.success).fg(palette.surface),
    };
    let mode_text = match app.input_mode {
        InputMode::Normal => " NORMAL ",
        InputMode::Editing => " EDIT ",
    };

    let key_style = Style::default().bg(palette.muted).fg(palette.text);
    let label_style = Style::default().bg(palette.surface).fg(palette.text);
    let hint = |key: &'static str, label: &'static str| {
        vec![
            Span::styled(format!(" {} ", key), key_style),
            Span::styled(format!(" {} ", label), label_style),
        ]
    };

    let hints: Vec<Span> = match (app.screen, app.input_mode, app.focus) {
        (Screen::Tenants, InputMode::Normal, _) => [
            hint("j/k", "nav"),
            hint("Enter", "open"),
            hint("/", "search"),
            hint("s", "sort"),
            hint("a", "add"),
            hint("t", "theme"),
            hint("q", "quit"),
        ]
        .concat(),
        (Screen::Tenants, InputMode::Editing, _) => {
            [hint("Enter", "done"), hint("Esc", "done")].concat()
        }
        (Screen::TenantDetail, _, _) => [hint("Esc", "back"), hint("q", "quit")].concat(),
        (Screen::AddTenant, InputMode::Normal, FocusPane::Fields) => [
            hint("j/k", "field"),
            hint("Enter", "edit"),
            hint("Tab", "uploads"),
            hint("s", "submit"),
            hint("r", "cancel"),
            hint("x", "dismiss"),
            hint("Esc", "tenants"),
        ]
        .concat(),
        (Screen::AddTenant, InputMode::Normal, FocusPane::Uploads) => [
            hint("j/k", "file"),
            hint("o", "pick path"),
            hint("d", "remove"),
            hint("Tab", "fields"),
            hint("s", "submit"),
            hint("Esc", "tenants"),
        ]
        .concat(),
        (Screen::AddTenant, InputMode::Editing, FocusPane::Fields) => [
            hint("Tab", "next"),
            hint("Enter", "commit"),
            hint("Ctrl-s", "submit"),
            hint("Esc", "stop typing"),
        ]
        .concat(),
        (Screen::AddTenant, InputMode::Editing, FocusPane::Uploads) => {
            [hint("Enter", "attach"), hint("Esc", "cancel")].concat()
        }
    };

    let footer_content = Line::from(
        vec![
            Span::styled(mode_text, mode_style),
            Span::styled(" ", label_style),
        ]
        .into_iter()
        .chain(hints)
        .collect::<Vec<_>>(),
    );

    let footer = Paragraph::new(footer_content).style(Style::default().bg(palette.surface));
    frame.render_widget(footer, area);
}

fn render_tenants_screen(app: &mut App, frame: &mut Frame, area: Rect) {
    let palette = app.palette;
    let [search_area, list_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(0),
    ])
    .areas(area);

    let editing = app.input_mode == InputMode::Editing;
    let search_block = Block::default()
        .borders(Borders::ALL)
        .border_style(palette.border(editing))
        .title(format!(
            " {} · {}: {} ",
            app.form.text().search,
            app.form.text().sort,
            app.sort.display_name()
        ));

    let search_text = if app.search_input.is_empty() && !editing {
        Span::styled(app.form.text().search_placeholder, Style::default().fg(palette.muted))
    } else {
        Span::styled(app.search_input.clone(), Style::default().fg(palette.text))
    };
    frame.render_widget(Paragraph::new(Line::from(search_text)).block(search_block), search_area);

    if editing {
        let cursor_x = (app.search_input.chars().count() as u16).min(search_area.width.saturating_sub(3));
        frame.set_cursor_position((search_area.x + 1 + cursor_x, search_area.y + 1));
    }

    let items: Vec<ListItem> = app
        .visible_tenants()
        .iter()
        .map(|t| {
            ListItem::new(format!(
                " {:<20} {:<14} {:<8} {:>4} users  {} ",
                t.name, t.whatsapp_number, t.status, t.active_users, t.creation_date
            ))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(palette.border(!editing))
                .title(format!(" {} ", app.form.text().tenants)),
        )
        .highlight_style(palette.highlight())
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, list_area, &mut app.tenant_state);
}

fn render_detail_screen(app: &App, frame: &mut Frame, area: Rect) {
    let palette = app.palette;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(palette.border(true));

    let Some(tenant) = &app.detail_tenant else {
        frame.render_widget(Paragraph::new(app.form.text().no_tenant_selected).block(block), area);
        return;
    };

    let row = |label: &'static str, value: String| {
        Line::from(vec![
            Span::styled(format!("{:<24}", label), Style::default().fg(palette.muted)),
            Span::styled(value, Style::default().fg(palette.text)),
        ])
    };

    let text = app.form.text();
    let lines = vec![
        row(text.whatsapp_number, tenant.whatsapp_number.clone()),
        row(text.business_id, tenant.whatsapp_business_id.clone()),
        row(text.status, tenant.status.clone()),
        row(text.created, tenant.creation_date.clone()),
        row(text.active_users, tenant.active_users.to_string()),
        row(text.response_rate, tenant.response_rate.clone()),
        row(text.total_conversations, tenant.total_conversations.to_string()),
    ];

    let paragraph = Paragraph::new(lines)
        .block(block.title(format!(" {} ", tenant.name)))
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn render_form_screen(app: &mut App, frame: &mut Frame, area: Rect) {
    let [notice_area, content_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
    ])
    .areas(area);

    render_notice(app, frame, notice_area);

    let prompt_above = app.form.prompt_above_grid();
    let upload_height = upload_section_height(app);

    if app.form.viewport() == ViewportClass::Large {
        let [left, right] = Layout::horizontal([
            Constraint::Percentage(50),
            Constraint::Percentage(50),
        ])
        .areas(content_area);

        if prompt_above {
            let [upload_area, prompt_area] = Layout::vertical([
                Constraint::Length(upload_height),
                Constraint::Length(PROMPT_HEIGHT + BUTTON_ROW_HEIGHT),
            ])
            .areas(right);
            render_upload_section(app, frame, upload_area);
            render_prompt_section(app, frame, prompt_area);
            render_grid(app, frame, left);
        } else {
            render_upload_section(app, frame, right);
            let [grid_area, prompt_area] = Layout::vertical([
                Constraint::Min(FIELD_HEIGHT),
                Constraint::Length(PROMPT_HEIGHT + BUTTON_ROW_HEIGHT),
            ])
            .areas(left);
            render_grid(app, frame, grid_area);
            render_prompt_section(app, frame, prompt_area);
        }
    } else {
        let [upload_area, grid_area, prompt_area] = Layout::vertical([
            Constraint::Length(upload_height),
            Constraint::Min(FIELD_HEIGHT),
            Constraint::Length(PROMPT_HEIGHT + BUTTON_ROW_HEIGHT),
        ])
        .areas(content_area);
        render_upload_section(app, frame, upload_area);
        render_grid(app, frame, grid_area);
        render_prompt_section(app, frame, prompt_area);
    }
}

fn render_notice(app: &App, frame: &mut Frame, area: Rect) {
    let palette = app.palette;
    let notice = if app.form.is_success() {
        Paragraph::new(format!(" ✓ {} ", app.form.text().user_added_success))
            .style(Style::default().bg(palette.success).fg(palette.surface).bold())
    } else if let Some(message) = &app.status_message {
        Paragraph::new(format!(" {} ", message)).style(Style::default().fg(palette.error))
    } else {
        Paragraph::new("")
    };
    frame.render_widget(notice, area);
}

fn upload_section_height(app: &App) -> u16 {
    let uploads = app.form.uploads();
    let drop_zone = 5;
    let banner = if uploads.error().is_some() { 1 } else { 0 };
    let list = if uploads.has_files() {
        (uploads.files().len() as u16).min(5) + 2
    } else {
        0
    };
    drop_zone + banner + list + 2
}

fn render_upload_section(app: &mut App, frame: &mut Frame, area: Rect) {
    let palette = app.palette;
    let focused = app.focus == FocusPane::Uploads;
    app.upload_area = Some(area);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(palette.border(focused))
        .title(format!(" {} ", app.form.text().upload_files));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let uploads = app.form.uploads();
    let banner_height = if uploads.error().is_some() { 1 } else { 0 };
    let [drop_area, banner_area, list_area] = Layout::vertical([
        Constraint::Length(5),
        Constraint::Length(banner_height),
        Constraint::Min(0),
    ])
    .areas(inner);

    // Drop zone
    let drop_style = if uploads.drag_active() {
        Style::default().fg(palette.accent).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(palette.muted)
    };
    let picking = focused && app.input_mode == InputMode::Editing;
    let mut lines = vec![
        Line::from(Span::styled(app.form.text().drop_hint, Style::default().fg(palette.text))),
        Line::from(Span::styled(app.form.text().allowed_types_hint, Style::default().fg(palette.muted))),
    ];
    if picking {
        lines.push(Line::from(vec![
            Span::styled(format!("{}: ", app.form.text().path), Style::default().fg(palette.muted)),
            Span::styled(app.path_input.clone(), Style::default().fg(palette.text)),
        ]));
    }
    let drop_zone = Paragraph::new(lines)
        .alignment(ratatui::layout::Alignment::Center)
        .block(Block::default().borders(Borders::ALL).border_style(drop_style));
    frame.render_widget(drop_zone, drop_area);

    if picking {
        let line_width = (app.form.text().path.chars().count() + 2 + app.path_input.chars().count()) as u16;
        let start = drop_area.x + drop_area.width.saturating_sub(line_width) / 2;
        let cursor_x = (start + line_width).min(drop_area.x + drop_area.width.saturating_sub(2));
        frame.set_cursor_position((cursor_x, drop_area.y + 3));
    }

    // Rejection banner
    if let Some(error) = uploads.error() {
        let banner = Paragraph::new(format!(" {} ", error))
            .style(Style::default().fg(palette.error).add_modifier(Modifier::BOLD));
        frame.render_widget(banner, banner_area);
    }

    // Accepted files
    if uploads.has_files() {
        let items: Vec<ListItem> = uploads
            .files()
            .iter()
            .map(|entry| {
                ListItem::new(Line::from(vec![
                    Span::styled(format!(" {} ", entry.file.name), Style::default().fg(palette.text)),
                    Span::styled(
                        format!("({:.1} KB)", entry.file.size_kib()),
                        Style::default().fg(palette.muted),
                    ),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::TOP)
                    .border_style(Style::default().fg(palette.muted))
                    .title(format!(" {} ", app.form.text().uploaded_files)),
            )
            .highlight_style(if focused { palette.highlight() } else { Style::default() })
            .highlight_symbol(if focused { "> " } else { "  " });

        frame.render_stateful_widget(list, list_area, &mut app.file_state);
    }
}

fn render_grid(app: &mut App, frame: &mut Frame, area: Rect) {
    let grid_keys: Vec<FieldKey> = app
        .field_order
        .iter()
        .copied()
        .filter(|key| *key != FieldKey::Prompt)
        .collect();

    let columns = app.grid_columns().max(1) as usize;
    let total_rows = grid_keys.len().div_ceil(columns) as u16;
    let visible_rows = (area.height / FIELD_HEIGHT).max(1);

    // Keep the focused row on screen
    if let Some(idx) = grid_keys.iter().position(|key| *key == app.focused_key()) {
        let row = (idx / columns) as u16;
        if row < app.grid_scroll {
            app.grid_scroll = row;
        } else if row >= app.grid_scroll + visible_rows {
            app.grid_scroll = row + 1 - visible_rows;
        }
    }
    app.grid_scroll = app.grid_scroll.min(total_rows.saturating_sub(visible_rows));

    let cell_width = area.width / columns as u16;
    for (idx, key) in grid_keys.iter().enumerate() {
        let row = (idx / columns) as u16;
        if row < app.grid_scroll || row >= app.grid_scroll + visible_rows {
            continue;
        }
        let col = (idx % columns) as u16;
        let cell = Rect::new(
            area.x + col * cell_width,
            area.y + (row - app.grid_scroll) * FIELD_HEIGHT,
            cell_width,
            FIELD_HEIGHT,
        )
        .intersection(area);
        if cell.is_empty() {
            continue;
        }
        render_field(app, frame, cell, *key);
    }
}

fn render_field(app: &App, frame: &mut Frame, area: Rect, key: FieldKey) {
    let palette = app.palette;
    let field = fields::field_for(key);
    let focused = app.focus == FocusPane::Fields && app.focused_key() == key;
    let editing = focused && app.input_mode == InputMode::Editing;
    let error = app.form.errors().get(key);

    let border_style = match (error, focused) {
        (Some(_), _) => Style::default().fg(palette.error),
        (None, true) => Style::default().fg(palette.accent),
        (None, false) => Style::default().fg(palette.muted),
    };

    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(format!(" {} ", field.label));
    if let Some(message) = error {
        block = block.title_bottom(Line::from(Span::styled(
            format!(" {} ", message),
            Style::default().fg(palette.error),
        )));
    }
    let inner = block.inner(area);

    let value = app.form.data().get(key);
    let width = inner.width.max(1) as usize;
    let content = if value.is_empty() {
        Span::styled(field.placeholder, Style::default().fg(palette.muted))
    } else if key.is_secret() && !editing {
        Span::styled("•".repeat(value.chars().count().min(width)), Style::default().fg(palette.text))
    } else {
        // Scroll horizontally so the cursor stays visible
        let offset = if editing { app.field_cursor.saturating_sub(width - 1) } else { 0 };
        let shown: String = value.chars().skip(offset).take(width).collect();
        Span::styled(shown, Style::default().fg(palette.text))
    };

    frame.render_widget(Paragraph::new(Line::from(content)).block(block), area);

    if editing && inner.height > 0 {
        let offset = app.field_cursor.saturating_sub(width - 1);
        let cursor_x = (app.field_cursor - offset) as u16;
        frame.set_cursor_position((inner.x + cursor_x, inner.y));
    }
}

fn render_prompt_section(app: &App, frame: &mut Frame, area: Rect) {
    let palette = app.palette;
    let [prompt_area, buttons_area] = Layout::vertical([
        Constraint::Min(3),
        Constraint::Length(BUTTON_ROW_HEIGHT),
    ])
    .areas(area);

    let field = fields::prompt_field();
    let focused = app.focus == FocusPane::Fields && app.focused_key() == FieldKey::Prompt;
    let editing = focused && app.input_mode == InputMode::Editing;
    let error = app.form.errors().get(FieldKey::Prompt);

    let border_style = match (error, focused) {
        (Some(_), _) => Style::default().fg(palette.error),
        (None, true) => Style::default().fg(palette.accent),
        (None, false) => Style::default().fg(palette.muted),
    };
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(format!(" {} ", field.label));
    if let Some(message) = error {
        block = block.title_bottom(Line::from(Span::styled(
            format!(" {} ", message),
            Style::default().fg(palette.error),
        )));
    }
    let inner = block.inner(prompt_area);

    let value = app.form.data().get(FieldKey::Prompt);
    let paragraph = if value.is_empty() {
        Paragraph::new(Span::styled(field.placeholder, Style::default().fg(palette.muted)))
    } else {
        Paragraph::new(value.to_string()).style(Style::default().fg(palette.text))
    };
    frame.render_widget(paragraph.block(block).wrap(Wrap { trim: false }), prompt_area);

    if editing {
        let before: String = value.chars().take(app.field_cursor).collect();
        let row = before.matches('\n').count() as u16;
        let col = before.rsplit('\n').next().map(|l| l.chars().count()).unwrap_or(0) as u16;
        if row < inner.height {
            frame.set_cursor_position((inner.x + col.min(inner.width.saturating_sub(1)), inner.y + row));
        }
    }

    let text = app.form.text();
    let buttons = Line::from(vec![
        Span::styled(format!(" ✕ {} (r) ", text.cancel), Style::default().fg(palette.text)),
        Span::raw("  "),
        Span::styled(
            format!(" + {} (s) ", text.add_user),
            Style::default().bg(palette.accent).fg(palette.surface).bold(),
        ),
    ]);
    frame.render_widget(
        Paragraph::new(buttons).alignment(ratatui::layout::Alignment::Right),
        buttons_area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Settings;
    use botadmin_core::{Config, UploadedFile};
    use ratatui::{backend::TestBackend, Terminal};

    fn form_app(width: u16) -> App {
        let mut app = App::new(Settings {
            config: Config::new(),
            dark_mode: true,
        });
        app.open_add_tenant();
        app.on_resize(width);
        app
    }

    fn draw(app: &mut App, width: u16, height: u16) {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| render(app, frame)).unwrap();
    }

    #[test]
    fn test_form_renders_in_tiny_terminals() {
        for width in [20, 80, 150] {
            for height in 1..=6 {
                let mut app = form_app(width);
                draw(&mut app, width, height);

                app.form
                    .uploads_mut()
                    .add_files(vec![UploadedFile::new("menu.pdf", 2048)]);
                app.start_editing();
                draw(&mut app, width, height);

                app.input_mode = InputMode::Normal;
                app.focus = FocusPane::Uploads;
                app.start_editing();
                app.path_input.push_str("/tmp/menu.pdf");
                draw(&mut app, width, height);
            }
        }
    }

    #[test]
    fn test_grid_scrolls_to_focused_field() {
        let mut app = form_app(80);
        app.focused_field = app.field_order.len() - 2;
        draw(&mut app, 80, 30);
        assert!(app.grid_scroll > 0);

        app.focused_field = 0;
        draw(&mut app, 80, 30);
        assert_eq!(app.grid_scroll, 0);
    }

    fn screen_text(app: &mut App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| render(app, frame)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn test_detail_screen_follows_locale() {
        let mut config = Config::new();
        config.locale = Some("fr".to_string());
        let mut app = App::new(Settings {
            config,
            dark_mode: true,
        });
        app.open_selected_tenant();

        let text = screen_text(&mut app, 150, 20);
        assert!(text.contains("Client"));
        assert!(text.contains("Numéro WhatsApp"));
        assert!(!text.contains("Business ID"));
    }

    #[test]
    fn test_every_screen_renders() {
        let mut app = form_app(150);
        for screen in [Screen::Tenants, Screen::TenantDetail, Screen::AddTenant] {
            app.screen = screen;
            draw(&mut app, 150, 40);
        }
        app.open_selected_tenant();
        draw(&mut app, 150, 40);
        assert!(app.upload_area.is_some());
    }
}
