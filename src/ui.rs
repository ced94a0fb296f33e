use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use hospital_payments::{
    format_amount, Clock, FormField, InputError, PatientForm, PatientRegistry,
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame, Terminal,
};
use std::io;

const PAGE_SIZE: u16 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Report,
    AddPatient,
}

pub struct App {
    pub registry: PatientRegistry,
    clock: Box<dyn Clock>,
    pub screen: Screen,
    pub form: PatientForm,
    pub focus: FormField,
    pub form_error: Option<InputError>,
    pub status: Option<String>,
    pub report_scroll: u16,
}

impl App {
    pub fn new(registry: PatientRegistry, clock: Box<dyn Clock>) -> Self {
        Self {
            registry,
            clock,
            screen: Screen::Report,
            form: PatientForm::new(),
            focus: FormField::Name,
            form_error: None,
            status: None,
            report_scroll: 0,
        }
    }

    /// Apply one key press. Returns true when the app should quit.
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        if key.kind != KeyEventKind::Press {
            return false;
        }

        match self.screen {
            Screen::Report => self.handle_report_key(key),
            Screen::AddPatient => {
                self.handle_form_key(key);
                false
            }
        }
    }

    fn handle_report_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Char('a') | KeyCode::Enter => self.open_form(),
            KeyCode::Down | KeyCode::Char('j') => self.scroll_down(1),
            KeyCode::Up | KeyCode::Char('k') => self.scroll_up(1),
            KeyCode::PageDown => self.scroll_down(PAGE_SIZE),
            KeyCode::PageUp => self.scroll_up(PAGE_SIZE),
            KeyCode::Home => self.report_scroll = 0,
            KeyCode::End => self.report_scroll = self.max_scroll(),
            _ => {}
        }
        false
    }

    fn handle_form_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            KeyCode::Esc => self.close_form(),
            KeyCode::Enter => self.submit(),
            KeyCode::Char('l') if ctrl => self.clear_form(),
            KeyCode::Tab | KeyCode::Down => self.focus = self.focus.next(),
            KeyCode::BackTab | KeyCode::Up => self.focus = self.focus.previous(),
            KeyCode::Backspace => {
                self.form.field_mut(self.focus).pop();
            }
            KeyCode::Char(c) if !ctrl => {
                self.form.field_mut(self.focus).push(c);
            }
            _ => {}
        }
    }

    pub fn open_form(&mut self) {
        self.form.clear();
        self.focus = FormField::Name;
        self.form_error = None;
        self.screen = Screen::AddPatient;
    }

    /// Leave the form without recording anything
    pub fn close_form(&mut self) {
        self.form_error = None;
        self.screen = Screen::Report;
    }

    /// Reset the input fields; the registry is untouched
    pub fn clear_form(&mut self) {
        self.form.clear();
        self.form_error = None;
        self.focus = FormField::Name;
    }

    /// Submit the form. Bad input stays on the form with an inline message.
    pub fn submit(&mut self) {
        match self.form.submit(&mut self.registry, self.clock.as_ref()) {
            Ok(payment) => {
                self.status = Some(format!(
                    "Added patient {} (net {}, NHIF {})",
                    self.registry.len(),
                    format_amount(payment.net_amount()),
                    format_amount(payment.withheld_amount()),
                ));
                self.form_error = None;
                self.screen = Screen::Report;
                self.report_scroll = self.max_scroll();
            }
            Err(err) => {
                self.focus = err.field();
                self.form_error = Some(err);
            }
        }
    }

    fn max_scroll(&self) -> u16 {
        let lines = self.registry.len() + 1;
        u16::try_from(lines.saturating_sub(1)).unwrap_or(u16::MAX)
    }

    fn scroll_down(&mut self, by: u16) {
        self.report_scroll = self.report_scroll.saturating_add(by).min(self.max_scroll());
    }

    fn scroll_up(&mut self, by: u16) {
        self.report_scroll = self.report_scroll.saturating_sub(by);
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
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
        tracing::error!(error = %err, "ui loop failed");
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            if app.handle_key(key) {
                return Ok(());
            }
        }
    }
}

fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Report
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);
    render_report(f, chunks[1], app);
    render_status_bar(f, chunks[2], app);

    if app.screen == Screen::AddPatient {
        render_form(f, centered_rect(60, 14, f.size()), app);
    }
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let totals = app.registry.totals();

    let spans = vec![
        Span::styled(
            "Hospital Management System",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  |  "),
        Span::styled(
            format!("Patients: {}", app.registry.len()),
            Style::default().fg(Color::White),
        ),
        Span::raw("  |  "),
        Span::styled(
            format!("Net: {}", format_amount(totals.net_amount)),
            Style::default().fg(Color::Green),
        ),
        Span::raw("  "),
        Span::styled(
            format!("NHIF: {}", format_amount(totals.withheld_amount)),
            Style::default().fg(Color::Cyan),
        ),
    ];

    let header = Paragraph::new(vec![Line::from(spans)])
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Cyan)));

    f.render_widget(header, area);
}

fn render_report(f: &mut Frame, area: Rect, app: &App) {
    let report = app.registry.render();

    let paragraph = Paragraph::new(report)
        .scroll((app.report_scroll, 0))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::White))
                .title(" Patients "),
        );

    f.render_widget(paragraph, area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let mut status_spans = Vec::new();

    if let Some(status) = &app.status {
        status_spans.push(Span::styled(
            format!(" {} ", status),
            Style::default().fg(Color::Green),
        ));
        status_spans.push(Span::raw("| "));
    }

    match app.screen {
        Screen::Report => {
            status_spans.push(Span::styled("a", Style::default().fg(Color::Yellow)));
            status_spans.push(Span::raw(" Add Patient | "));
            status_spans.push(Span::styled("↑/↓", Style::default().fg(Color::Yellow)));
            status_spans.push(Span::raw(" Scroll | "));
            status_spans.push(Span::styled("q", Style::default().fg(Color::Red)));
            status_spans.push(Span::raw(" Quit"));
        }
        Screen::AddPatient => {
            status_spans.push(Span::styled("Enter", Style::default().fg(Color::Yellow)));
            status_spans.push(Span::raw(" Add | "));
            status_spans.push(Span::styled("Tab", Style::default().fg(Color::Yellow)));
            status_spans.push(Span::raw(" Field | "));
            status_spans.push(Span::styled("Ctrl+L", Style::default().fg(Color::Yellow)));
            status_spans.push(Span::raw(" Clear | "));
            status_spans.push(Span::styled("Esc", Style::default().fg(Color::Red)));
            status_spans.push(Span::raw(" Exit"));
        }
    }

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

fn render_form(f: &mut Frame, area: Rect, app: &App) {
    let mut content = vec![Line::from("")];

    for field in [FormField::Name, FormField::Age, FormField::Payment] {
        let focused = field == app.focus;
        let label_style = if focused {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Cyan)
        };

        content.push(Line::from(vec![
            Span::raw(if focused { " → " } else { "   " }),
            Span::styled(format!("{:<9}", format!("{}:", field.label())), label_style),
            Span::styled(
                app.form.field(field).to_string(),
                Style::default().fg(Color::White),
            ),
        ]));
        content.push(Line::from(""));
    }

    match &app.form_error {
        Some(err) => content.push(Line::from(Span::styled(
            format!("  ✗ {}", err),
            Style::default().fg(Color::Red),
        ))),
        None => content.push(Line::from("")),
    }

    content.push(Line::from(""));
    content.push(Line::from(vec![
        Span::raw("  "),
        Span::styled("[Enter] Add", Style::default().fg(Color::Green)),
        Span::raw("   "),
        Span::styled("[Ctrl+L] Clear", Style::default().fg(Color::Yellow)),
        Span::raw("   "),
        Span::styled("[Esc] Exit", Style::default().fg(Color::Red)),
    ]));

    let form = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(" Add Patient "),
    );

    f.render_widget(Clear, area);
    f.render_widget(form, area);

    // Cursor at the end of the focused input
    let row = match app.focus {
        FormField::Name => 2,
        FormField::Age => 4,
        FormField::Payment => 6,
    };
    let typed = u16::try_from(app.form.field(app.focus).chars().count()).unwrap_or(u16::MAX);
    f.set_cursor(
        cursor_column(area, typed),
        area.y.saturating_add(row),
    );
}

/// Column after `typed` characters of an input, kept inside the form border
fn cursor_column(area: Rect, typed: u16) -> u16 {
    // border + focus marker + padded label
    let input_start = area.x.saturating_add(1 + 3 + 9);
    input_start
        .saturating_add(typed)
        .min(area.right().saturating_sub(2))
}

/// Rect of `percent_x` width and `height` rows centered in `area`
fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
