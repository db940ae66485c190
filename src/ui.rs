use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use pmb_registration::{
    summary_rows, FieldKey, InputKind, KeyValueStore, RegistrationForm, ResultView, StatusLine,
    SubmitOutcome, FIELD_COUNT,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame, Terminal,
};
use std::io;

pub struct App<S: KeyValueStore> {
    pub form: RegistrationForm<S>,
    pub selected: usize,
    /// Last storage failure, shown in the status bar
    pub notice: Option<String>,
    pub should_quit: bool,
}

impl<S: KeyValueStore> App<S> {
    pub fn new(form: RegistrationForm<S>) -> Self {
        Self {
            form,
            selected: 0,
            notice: None,
            should_quit: false,
        }
    }

    pub fn selected_key(&self) -> FieldKey {
        FieldKey::ALL[self.selected]
    }

    /// Leaving a field counts as blur
    pub fn next_field(&mut self) {
        self.form.blur(self.selected_key());
        self.selected = (self.selected + 1) % FIELD_COUNT;
    }

    pub fn previous_field(&mut self) {
        self.form.blur(self.selected_key());
        self.selected = (self.selected + FIELD_COUNT - 1) % FIELD_COUNT;
    }

    pub fn type_char(&mut self, c: char) {
        let key = self.selected_key();
        if key.options().is_some() {
            return;
        }
        let mut value = self.form.value(key).to_string();
        value.push(c);
        self.form.edit(key, value);
    }

    pub fn backspace(&mut self) {
        let key = self.selected_key();
        let mut value = self.form.value(key).to_string();
        if value.pop().is_none() {
            return;
        }
        if key.options().is_some() {
            self.form.change(key, String::new());
        } else {
            self.form.edit(key, value);
        }
    }

    /// Step through the option set of a selection field
    pub fn cycle_option(&mut self, forward: bool) {
        let key = self.selected_key();
        let Some(options) = key.options() else {
            return;
        };

        let current = options.iter().position(|o| *o == self.form.value(key));
        let next = match (current, forward) {
            (None, true) => 0,
            (None, false) => options.len() - 1,
            (Some(i), true) => (i + 1) % options.len(),
            (Some(i), false) => (i + options.len() - 1) % options.len(),
        };
        self.form.change(key, options[next]);
    }

    pub fn submit(&mut self) {
        match self.form.submit() {
            Ok(SubmitOutcome::Accepted(_)) => self.notice = None,
            Ok(SubmitOutcome::Rejected(report)) => {
                self.notice = None;
                // jump to the first field that needs attention
                if let Some(first) = report.errors().next() {
                    self.selected = first.field.index();
                }
            }
            Err(err) => self.notice = Some(err.to_string()),
        }
    }

    pub fn reset(&mut self) {
        match self.form.reset() {
            Ok(()) => {
                self.notice = None;
                self.selected = 0;
            }
            Err(err) => self.notice = Some(err.to_string()),
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('c') if ctrl => self.should_quit = true,
            KeyCode::Char('r') if ctrl => self.reset(),
            KeyCode::Enter => self.submit(),
            KeyCode::Tab | KeyCode::Down => self.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.previous_field(),
            KeyCode::Right => self.cycle_option(true),
            KeyCode::Left => self.cycle_option(false),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Char(c) if !ctrl => self.type_char(c),
            _ => {}
        }
    }
}

pub fn run_ui<S: KeyValueStore>(app: &mut App<S>) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend, S: KeyValueStore>(
    terminal: &mut Terminal<B>,
    app: &mut App<S>,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            app.handle_key(key);
            if app.should_quit {
                return Ok(());
            }
        }
    }
}

fn ui<S: KeyValueStore>(f: &mut Frame, app: &App<S>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with storage badge
            Constraint::Min(0),    // Form + result
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(55), // Form fields
            Constraint::Percentage(45), // Result area
        ])
        .split(chunks[1]);

    render_form(f, content_chunks[0], app);
    render_result(f, content_chunks[1], app);

    render_status_bar(f, chunks[2], app);
}

fn render_header<S: KeyValueStore>(f: &mut Frame, area: Rect, app: &App<S>) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            " PMB Registration ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" │ "),
        Span::styled(app.form.storage_badge(), Style::default().fg(Color::Gray)),
    ]))
    .block(Block::default().borders(Borders::ALL));

    f.render_widget(header, area);
}

fn render_form<S: KeyValueStore>(f: &mut Frame, area: Rect, app: &App<S>) {
    let locale = app.form.locale();
    let mut lines = Vec::new();

    for key in FieldKey::ALL {
        let selected = key.index() == app.selected;
        let slot = app.form.slot(key);
        let value = app.form.value(key);

        let marker = if selected { "→ " } else { "  " };
        let label_style = if slot.invalid {
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
        } else if selected {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        lines.push(Line::from(vec![
            Span::raw(marker),
            Span::styled(key.label(locale), label_style),
        ]));

        let shown = match key.input_kind() {
            InputKind::Select(_) if value.is_empty() => "‹ — ›".to_string(),
            InputKind::Select(_) => format!("‹ {} ›", value),
            InputKind::Date if value.is_empty() && !selected => "YYYY-MM-DD".to_string(),
            _ if selected => format!("{}▏", value),
            _ => value.to_string(),
        };
        lines.push(Line::from(vec![
            Span::raw("    "),
            Span::styled(shown, Style::default().fg(Color::Gray)),
        ]));

        if slot.invalid {
            lines.push(Line::from(vec![
                Span::raw("    "),
                Span::styled(slot.message.clone(), Style::default().fg(Color::Red)),
            ]));
        }
    }

    let form = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Form "),
    );

    f.render_widget(form, area);
}

fn render_result<S: KeyValueStore>(f: &mut Frame, area: Rect, app: &App<S>) {
    let locale = app.form.locale();

    let lines: Vec<Line> = match app.form.view() {
        ResultView::Empty => vec![Line::from(Span::styled(
            app.form.view().render_text(locale),
            Style::default().fg(Color::DarkGray),
        ))],
        ResultView::Summary(record) => {
            let mut lines = vec![Line::from(Span::styled(
                pmb_registration::messages::summary_title(locale),
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            ))];
            lines.push(Line::from(format!(
                "{}: {}",
                pmb_registration::messages::submitted_label(locale),
                pmb_registration::render::format_submitted_at(record.submitted_at(), locale)
            )));
            lines.push(Line::from(""));

            for row in summary_rows(record, locale) {
                lines.push(Line::from(vec![
                    Span::styled(
                        format!("{:<15}", row.label),
                        Style::default().fg(Color::Yellow),
                    ),
                    Span::raw(row.value),
                ]));
            }
            lines
        }
    };

    let result = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Result "),
    );

    f.render_widget(result, area);
}

fn render_status_bar<S: KeyValueStore>(f: &mut Frame, area: Rect, app: &App<S>) {
    let status_color = match app.form.status() {
        StatusLine::Sent => Color::Green,
        StatusLine::CheckInput => Color::Red,
        StatusLine::Restored => Color::Cyan,
        StatusLine::NotSubmitted => Color::Gray,
    };

    let mut status_spans = vec![Span::styled(
        format!(" {} ", app.form.status_text()),
        Style::default().fg(status_color).add_modifier(Modifier::BOLD),
    )];

    if let Some(notice) = &app.notice {
        status_spans.push(Span::raw(" | "));
        status_spans.push(Span::styled(notice.clone(), Style::default().fg(Color::Red)));
    }

    status_spans.push(Span::raw(" | "));
    status_spans.push(Span::styled("Enter", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Submit | "));
    status_spans.push(Span::styled("Tab/↑/↓", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Field | "));
    status_spans.push(Span::styled("←/→", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Choose | "));
    status_spans.push(Span::styled("Ctrl+R", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Reset | "));
    status_spans.push(Span::styled("Esc", Style::default().fg(Color::Red)));
    status_spans.push(Span::raw(" Quit"));

    let status_bar = Paragraph::new(Line::from(status_spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pmb_registration::{FormPhase, Locale, MemoryStore, RegistrationStore};

    fn app() -> App<MemoryStore> {
        let form =
            RegistrationForm::open(RegistrationStore::new(MemoryStore::new()), Locale::English)
                .unwrap();
        App::new(form)
    }

    fn press(app: &mut App<MemoryStore>, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_str(app: &mut App<MemoryStore>, s: &str) {
        for c in s.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_typing_validates_live() {
        let mut app = app();
        type_str(&mut app, "Bu");
        assert!(app.form.slot(FieldKey::FullName).invalid);

        type_str(&mut app, "di");
        assert_eq!(app.form.value(FieldKey::FullName), "Budi");
        assert!(!app.form.slot(FieldKey::FullName).invalid);
        assert_eq!(app.form.phase(), FormPhase::Editing);
    }

    #[test]
    fn test_leaving_empty_field_marks_it_required() {
        let mut app = app();
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.selected_key(), FieldKey::StudentId);
        assert_eq!(app.form.slot(FieldKey::FullName).message, "Full name is required.");
    }

    #[test]
    fn test_select_fields_cycle_options() {
        let mut app = app();
        app.selected = FieldKey::Gender.index();

        press(&mut app, KeyCode::Right);
        assert_eq!(app.form.value(FieldKey::Gender), "Laki-laki");
        press(&mut app, KeyCode::Right);
        assert_eq!(app.form.value(FieldKey::Gender), "Perempuan");
        press(&mut app, KeyCode::Char('x'));
        assert_eq!(app.form.value(FieldKey::Gender), "Perempuan");

        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.form.value(FieldKey::Gender), "");
        assert!(app.form.slot(FieldKey::Gender).invalid);
    }

    #[test]
    fn test_rejected_submit_focuses_first_error() {
        let mut app = app();
        type_str(&mut app, "Budi Santoso");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.form.status(), StatusLine::CheckInput);
        assert_eq!(app.selected_key(), FieldKey::StudentId);
    }

    #[test]
    fn test_escape_quits() {
        let mut app = app();
        press(&mut app, KeyCode::Esc);
        assert!(app.should_quit);
    }
}
