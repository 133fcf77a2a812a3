use anyhow::Result;
use bazi_naming::{NameCandidate, NamingEngine, NamingReport, NamingRequest};
use crossterm::{
    event::{self, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use std::io;

pub struct App {
    pub engine: NamingEngine,
    pub request: NamingRequest,
    pub seed: Option<u64>,
    pub report: NamingReport,
    pub state: TableState,
    pub show_detail: bool,
    /// Batches generated so far, including the first
    pub batches: u64,
    pub last_error: Option<String>,
}

impl App {
    pub fn new(
        engine: NamingEngine,
        request: NamingRequest,
        seed: Option<u64>,
        report: NamingReport,
    ) -> Self {
        let mut state = TableState::default();
        if !report.candidates.is_empty() {
            state.select(Some(0));
        }

        Self {
            engine,
            request,
            seed,
            report,
            state,
            show_detail: false,
            batches: 1,
            last_error: None,
        }
    }

    pub fn toggle_detail(&mut self) {
        self.show_detail = !self.show_detail;
    }

    pub fn selected_candidate(&self) -> Option<&NameCandidate> {
        self.state.selected().and_then(|i| self.report.candidates.get(i))
    }

    /// Draw a fresh batch; a fixed seed advances by one per batch so runs replay
    pub fn regenerate(&mut self) {
        let result = match self.seed {
            Some(seed) => self
                .engine
                .generate_seeded(&self.request, seed.wrapping_add(self.batches)),
            None => self.engine.generate_random(&self.request),
        };

        match result {
            Ok(report) => {
                self.report = report;
                self.batches += 1;
                self.last_error = None;
                self.state.select(Some(0));
            }
            Err(err) => self.last_error = Some(err.to_string()),
        }
    }

    pub fn next(&mut self) {
        let len = self.report.candidates.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => {
                if i >= len - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        let len = self.report.candidates.len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) => {
                if i == 0 {
                    len - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.state.select(Some(i));
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
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Enter => app.toggle_detail(),
                KeyCode::Char('r') => app.regenerate(),
                KeyCode::Down | KeyCode::Char('j') => app.next(),
                KeyCode::Up | KeyCode::Char('k') => app.previous(),
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Chart header
            Constraint::Min(0),    // Candidates
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    if app.show_detail {
        let content_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(50), // Candidate list
                Constraint::Percentage(50), // Detail panel
            ])
            .split(chunks[1]);

        render_table(f, content_chunks[0], app);
        render_detail_panel(f, content_chunks[1], app);
    } else {
        render_table(f, chunks[1], app);
    }

    render_status_bar(f, chunks[2], app);
}

fn label(text: &str) -> Span<'_> {
    Span::styled(text, Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
}

fn element_color(glyph: &str) -> Color {
    match glyph {
        "金" => Color::Yellow,
        "木" => Color::Green,
        "水" => Color::Blue,
        "火" => Color::Red,
        "土" => Color::Magenta,
        _ => Color::White,
    }
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let report = &app.report;
    let birth = &app.request.birth;

    let mut tally_spans = vec![label(" 五行: ")];
    for (element, count) in report.analysis.tally.iter() {
        let style = if report.analysis.deficiency.contains(element) {
            Style::default()
                .fg(element_color(element.glyph()))
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(element_color(element.glyph()))
        };
        tally_spans.push(Span::styled(format!("{}{}", element, count), style));
        tally_spans.push(Span::raw("  "));
    }
    tally_spans.push(Span::raw("│ "));
    tally_spans.push(Span::styled(
        report.analysis.deficiency.describe(),
        Style::default().fg(Color::Yellow),
    ));

    let header_text = vec![
        Line::from(vec![
            label(" 姓: "),
            Span::raw(app.request.surname.clone()),
            Span::raw("  │  "),
            label("生辰: "),
            Span::raw(format!("{} {:02}时", birth.date(), birth.hour())),
            Span::raw("  │  "),
            label("生肖: "),
            Span::raw(report.zodiac.clone()),
        ]),
        Line::from(vec![
            label(" 八字: "),
            Span::styled(
                report.chart_text.clone(),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(tally_spans),
    ];

    let header = Paragraph::new(header_text)
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Cyan)));

    f.render_widget(header, area);
}

fn render_table(f: &mut Frame, area: Rect, app: &mut App) {
    let header_cells = ["Name", "Elements", "Hexagram"]
        .iter()
        .map(|h| {
            Cell::from(*h).style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
        });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows = app.report.candidates.iter().map(|candidate| {
        let first_glyph = candidate
            .characters
            .first()
            .map(|c| c.element.glyph())
            .unwrap_or("");

        let cells = vec![
            Cell::from(candidate.full_name.clone()),
            Cell::from(candidate.elements.clone())
                .style(Style::default().fg(element_color(first_glyph))),
            Cell::from(format!("{} {}", candidate.hexagram.symbol, candidate.hexagram.name)),
        ];

        Row::new(cells).height(1)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(12),
            Constraint::Length(10),
            Constraint::Min(10),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(format!(" Names (batch {}) ", app.batches)),
    )
    .highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_detail_panel(f: &mut Frame, area: Rect, app: &App) {
    let candidate = match app.selected_candidate() {
        Some(c) => c,
        None => {
            let no_selection = Paragraph::new("No name selected")
                .block(Block::default().borders(Borders::ALL).title(" Details "));
            f.render_widget(no_selection, area);
            return;
        }
    };

    let mut content = vec![
        Line::from(""),
        Line::from(vec![Span::styled(
            format!("  {}", candidate.full_name),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )]),
        Line::from(""),
    ];

    for record in &candidate.characters {
        content.push(Line::from(vec![
            Span::raw("  "),
            Span::styled(
                format!("{} ({})", record.character, record.element),
                Style::default()
                    .fg(element_color(record.element.glyph()))
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(": "),
            Span::raw(record.meaning.clone()),
        ]));
    }

    content.extend([
        Line::from(""),
        Line::from("  ─────────────────────────────────────"),
        Line::from(""),
        Line::from(vec![
            label("  卦: "),
            Span::raw(format!(
                "{} 第{}卦 {}",
                candidate.hexagram.symbol, candidate.hexagram.number, candidate.hexagram.name
            )),
        ]),
        Line::from(vec![
            Span::raw("  "),
            Span::styled(
                candidate.hexagram.judgement.clone(),
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
            ),
        ]),
        Line::from(""),
        Line::from(vec![Span::styled(
            "  Press Enter to close",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )]),
    ]);

    let detail_panel = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Yellow))
            .title(" Name Details "),
    );

    f.render_widget(detail_panel, area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let selected = app.state.selected().map(|i| i + 1).unwrap_or(0);
    let total = app.report.candidates.len();

    let mut status_spans = vec![Span::styled(
        format!(" Name: {}/{} ", selected, total),
        Style::default().fg(Color::Cyan),
    )];

    if let Some(err) = &app.last_error {
        status_spans.push(Span::raw(" | "));
        status_spans.push(Span::styled(err.clone(), Style::default().fg(Color::Red)));
    }

    status_spans.push(Span::raw(" | "));
    status_spans.push(Span::styled("Enter", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Details | "));
    status_spans.push(Span::styled("r", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Regenerate | "));
    status_spans.push(Span::styled("↑/↓", Style::default().fg(Color::Yellow)));
    status_spans.push(Span::raw(" Nav | "));
    status_spans.push(Span::styled("q", Style::default().fg(Color::Red)));
    status_spans.push(Span::raw(" Quit"));

    let status_bar = Paragraph::new(vec![Line::from(status_spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use bazi_naming::BirthMoment;

    fn app() -> App {
        let engine = NamingEngine::builtin().unwrap();
        let request = NamingRequest::new("王", BirthMoment::new(1990, 2, 4, 10).unwrap());
        let report = engine.generate_seeded(&request, 5).unwrap();
        App::new(engine, request, Some(5), report)
    }

    #[test]
    fn test_navigation_wraps() {
        let mut app = app();
        assert_eq!(app.state.selected(), Some(0));
        app.previous();
        assert_eq!(app.state.selected(), Some(2));
        app.next();
        assert_eq!(app.state.selected(), Some(0));
    }

    #[test]
    fn test_regenerate_replays_with_seed() {
        let mut a = app();
        let mut b = app();
        a.regenerate();
        b.regenerate();
        assert_eq!(a.batches, 2);
        assert_eq!(a.report, b.report);
        assert!(a.last_error.is_none());
    }
}
