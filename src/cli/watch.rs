//! Watch command implementation - Interactive TUI dashboard.
//!
//! Re-projects the theory every second and re-reads the snapshot file on the
//! refetch interval, the way the dashboard polls the contract.

use super::output::{format_claim_time, format_countdown, format_timestamp, group_thousands};
use super::{CliError, Context, load_snapshot};
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use kingdom::kingdom::{TILE_COUNT, battle_readiness, level_of};
use kingdom::{LiveTheory, TileBoard};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use std::io::stdout;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Interval between projections.
const TICK: Duration = Duration::from_secs(1);

/// Tiles per row of the board grid.
const GRID_WIDTH: usize = 24;

/// Execute the watch command.
///
/// # Errors
///
/// Returns an error if the first snapshot cannot be loaded or the TUI fails.
pub(crate) fn execute(ctx: &Context, snapshot: PathBuf, refetch: u64) -> Result<(), CliError> {
    let initial = load_snapshot(&snapshot)?;
    let app = App::new(ctx, snapshot, initial, Duration::from_secs(refetch.max(1)));
    run_tui(app)
}

/// App state for the TUI.
struct App<'a> {
    ctx: &'a Context,
    path: PathBuf,
    live: LiveTheory,
    board: TileBoard,
    refetch: Duration,
    last_tick: Instant,
    last_refetch: Instant,
    status: Option<String>,
}

impl<'a> App<'a> {
    fn new(
        ctx: &'a Context,
        path: PathBuf,
        snapshot: kingdom::KingdomSnapshot,
        refetch: Duration,
    ) -> Self {
        let board = TileBoard::parse(&snapshot.tiles);
        Self {
            live: LiveTheory::new(snapshot, ctx.now()),
            ctx,
            path,
            board,
            refetch,
            last_tick: Instant::now(),
            last_refetch: Instant::now(),
            status: None,
        }
    }

    /// Re-read the snapshot file. A failed read keeps the previous snapshot.
    fn refetch(&mut self) {
        self.last_refetch = Instant::now();
        match load_snapshot(&self.path) {
            Ok(snapshot) => {
                self.board = TileBoard::parse(&snapshot.tiles);
                self.live.observe(snapshot, self.ctx.now());
                self.status = None;
            }
            Err(e) => {
                log::warn!("refetch failed: {e}");
                self.status = Some(e.to_string());
            }
        }
    }

    fn tick(&mut self) {
        if self.last_refetch.elapsed() >= self.refetch {
            self.refetch();
        }
        if self.last_tick.elapsed() >= TICK {
            self.live.refresh(self.ctx.now());
            self.last_tick = Instant::now();
        }
    }
}

fn run_tui(mut app: App<'_>) -> Result<(), CliError> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).map_err(|e| CliError::new(e.to_string()))?;

    loop {
        terminal
            .draw(|f| ui(f, &app))
            .map_err(|e| CliError::new(e.to_string()))?;

        app.tick();

        // Handle input with timeout
        if event::poll(Duration::from_millis(100)).map_err(|e| CliError::new(e.to_string()))?
            && let Event::Key(key) = event::read().map_err(|e| CliError::new(e.to_string()))?
            && key.kind == KeyEventKind::Press
        {
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => break,
                KeyCode::Char('r') => app.refetch(),
                _ => {}
            }
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;

    Ok(())
}

fn ui(f: &mut Frame, app: &App<'_>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(10),   // Main content
            Constraint::Length(3), // Footer
        ])
        .split(f.area());

    render_header(f, chunks[0], app);

    let main_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[1]);

    render_board(f, main_chunks[0], app);

    let side_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(main_chunks[1]);

    render_theory(f, side_chunks[0], app);
    render_battle(f, side_chunks[1], app);

    render_footer(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App<'_>) {
    let title = format!(
        " Kingdom | {} | {} | snapshot #{} ",
        app.path.display(),
        format_timestamp(app.live.projected_at()),
        app.live.generation()
    );

    let header = Paragraph::new(title)
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(header, area);
}

fn render_board(f: &mut Frame, area: Rect, app: &App<'_>) {
    let snapshot = app.live.snapshot();
    let mut lines: Vec<Line> = Vec::new();

    for row in snapshot.tiles.chunks(GRID_WIDTH) {
        let spans: Vec<Span> = row
            .iter()
            .map(|&raw| {
                let (ch, color) = tile_to_char_color(raw);
                Span::styled(format!("{ch} "), Style::default().fg(color))
            })
            .collect();
        lines.push(Line::from(spans));
    }

    let title = format!(
        " Board: {} built, {} free of {TILE_COUNT} ",
        app.board.occupied_count(),
        app.board.free_count()
    );
    let board = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(title));

    f.render_widget(board, area);
}

fn tile_to_char_color(raw: u8) -> (char, Color) {
    if raw == 0 {
        return ('.', Color::DarkGray);
    }
    let level = level_of(raw);
    let color = match level {
        1 | 2 => Color::Green,
        3 | 4 => Color::Yellow,
        5 | 6 => Color::Magenta,
        7 | 8 => Color::Cyan,
        _ => Color::Red,
    };
    (char::from(b'0' + level), color)
}

fn render_theory(f: &mut Frame, area: Rect, app: &App<'_>) {
    let snapshot = app.live.snapshot();
    let theory = app.live.theory();
    let bold = Style::default().add_modifier(Modifier::BOLD);

    let mut lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::raw("  Gold:  "),
            Span::styled(group_thousands(theory.gold_theory), bold.fg(Color::Yellow)),
        ]),
        Line::from(vec![
            Span::raw("  Gems:  "),
            Span::styled(group_thousands(theory.gems_theory), bold.fg(Color::LightBlue)),
        ]),
        Line::from(""),
        Line::from(format!(
            "  Per hour:   {}",
            group_thousands(u64::from(snapshot.per_hour))
        )),
        Line::from(format!("  Unclaimed:  +{}", group_thousands(theory.earned))),
        Line::from(format!("  Hours:      {}", theory.hours_passed)),
        Line::from(format!(
            "  Claimed:    {}",
            format_claim_time(snapshot.claim_time)
        )),
    ];
    if snapshot.has_ally() {
        lines.push(Line::from(format!("  Ally:       {}", snapshot.ally)));
    }

    let widget = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Theory "))
        .wrap(Wrap { trim: false });

    f.render_widget(widget, area);
}

fn render_battle(f: &mut Frame, area: Rect, app: &App<'_>) {
    let snapshot = app.live.snapshot();
    let readiness = battle_readiness(snapshot, &app.ctx.rules, app.live.projected_at());

    let status = match readiness.blocker() {
        None => Span::styled(
            "ready",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
        Some(blocker) => Span::styled(blocker.to_string(), Style::default().fg(Color::Red)),
    };

    let mut lines = vec![
        Line::from(""),
        Line::from(vec![Span::raw("  Status: "), status]),
        Line::from(format!(
            "  Next:   {}",
            format_countdown(readiness.seconds_remaining)
        )),
    ];
    if snapshot.battles_in_row > 0 {
        let kind = if snapshot.is_win_in_row { "wins" } else { "losses" };
        lines.push(Line::from(format!(
            "  Streak: {} {kind}",
            snapshot.battles_in_row
        )));
    }

    let widget = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(" Battle "))
        .wrap(Wrap { trim: false });

    f.render_widget(widget, area);
}

fn render_footer(f: &mut Frame, area: Rect, app: &App<'_>) {
    let (text, style) = match &app.status {
        Some(error) => (
            format!(" Refetch failed, showing last snapshot: {error} "),
            Style::default().fg(Color::Red),
        ),
        None => (
            format!(
                " [q] Quit  [r] Refetch  | refetch every {}s ",
                app.refetch.as_secs()
            ),
            Style::default().fg(Color::Gray),
        ),
    };

    let footer = Paragraph::new(text)
        .style(style)
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(footer, area);
}
