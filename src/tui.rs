use std::{io, time::Duration};

use chrono::{DateTime, Local};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame, Terminal,
};
use tokio::sync::mpsc;
use tracing::debug;
use tui_big_text::{BigText, PixelSize};

use crate::data::DataClient;
use crate::model::{Game, Schedule, TeamSide};

type Update = Result<Schedule, String>;

#[derive(Debug)]
struct App {
    should_quit: bool,
    games: Vec<Game>,
    state: ListState,
    filter_live: bool,
    last_error: Option<String>,
}

impl Default for App {
    fn default() -> Self {
        Self {
            should_quit: false,
            games: Vec::new(),
            state: ListState::default(),
            filter_live: false,
            last_error: None,
        }
    }
}

impl App {
    fn new() -> Self {
        let mut app = Self::default();
        app.state.select(Some(0));
        app
    }

    fn apply(&mut self, update: Update) {
        match update {
            Ok(schedule) => {
                self.games = schedule.games().cloned().collect();
                self.last_error = None;
                let len = self.filtered_games().len();
                if self.state.selected().map_or(true, |i| i >= len) {
                    self.state.select(Some(0));
                }
            }
            Err(e) => self.last_error = Some(e),
        }
    }

    fn next(&mut self) {
        let len = self.filtered_games().len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.state.select(Some(i));
    }

    fn previous(&mut self) {
        let len = self.filtered_games().len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    fn toggle_live_filter(&mut self) {
        self.filter_live = !self.filter_live;
        self.state.select(Some(0));
    }

    fn filtered_games(&self) -> Vec<&Game> {
        if !self.filter_live {
            self.games.iter().collect()
        } else {
            self.games
                .iter()
                .filter(|g| g.status.abstract_game_state == "Live")
                .collect()
        }
    }
}

/// Runs the scoreboard viewer until the user quits.
pub async fn run(client: DataClient, interval: Duration) -> anyhow::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new();
    let (tx, mut rx) = mpsc::channel::<Update>(16);

    let refresher = tokio::spawn(refresh_loop(client, interval, tx));

    let res = run_app(&mut terminal, &mut app, &mut rx).await;
    refresher.abort();

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res.map_err(Into::into)
}

async fn refresh_loop(mut client: DataClient, interval: Duration, tx: mpsc::Sender<Update>) {
    loop {
        let update = match client.fetch_schedule().await {
            Ok(_) => Ok(client.schedule().clone()),
            Err(e) => {
                debug!(error = %e, "schedule refresh failed");
                Err(e.to_string())
            }
        };
        if tx.send(update).await.is_err() {
            return;
        }
        tokio::time::sleep(interval).await;
    }
}

async fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    rx: &mut mpsc::Receiver<Update>,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                match key.code {
                    KeyCode::Char('q') => app.should_quit = true,
                    KeyCode::Char('f') => app.toggle_live_filter(),
                    KeyCode::Down | KeyCode::Char('j') => app.next(),
                    KeyCode::Up | KeyCode::Char('k') => app.previous(),
                    _ => {}
                }
            }
        }

        while let Ok(update) = rx.try_recv() {
            app.apply(update);
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(f.area());
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(rows[0]);

    draw_sidebar(f, app, chunks[0]);
    draw_main_panel(f, app, chunks[1]);
    draw_status_line(f, app, rows[1]);
}

fn draw_sidebar(f: &mut Frame, app: &mut App, area: Rect) {
    let items: Vec<ListItem> = app
        .filtered_games()
        .iter()
        .map(|game| {
            let content = format!(
                "{} @ {}  [{}]",
                game.teams.away.team.name,
                game.teams.home.team.name,
                short_state(game)
            );
            ListItem::new(content)
        })
        .collect();

    let title = if app.filter_live { " LIVE GAMES " } else { " GAMES " };

    let games_list = List::new(items)
        .block(Block::default().title(title).borders(Borders::ALL))
        .highlight_style(Style::default().add_modifier(Modifier::BOLD).bg(Color::DarkGray).fg(Color::White));

    f.render_stateful_widget(games_list, area, &mut app.state);
}

fn short_state(game: &Game) -> String {
    match game.status.abstract_game_state.as_str() {
        "Preview" => "Pre".to_string(),
        "Final" => "Final".to_string(),
        _ => format!("{}-{}", game.teams.away.score, game.teams.home.score),
    }
}

fn draw_main_panel(f: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL);
    let inner_area = block.inner(area);
    f.render_widget(block, area);

    let games = app.filtered_games();
    let Some(game) = games.get(app.state.selected().unwrap_or(0)) else {
        let p = Paragraph::new("No game selected").alignment(Alignment::Center);
        f.render_widget(p, inner_area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(10), // Scoreboard
            Constraint::Length(1),  // Spacer
            Constraint::Min(0),     // Details
        ])
        .split(inner_area);

    let header_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(40), // Away
            Constraint::Percentage(20), // @
            Constraint::Percentage(40), // Home
        ])
        .split(chunks[0]);

    draw_side(f, &game.teams.away, header_chunks[0]);
    draw_side(f, &game.teams.home, header_chunks[2]);

    let status_color = if game.status.abstract_game_state == "Live" { Color::Red } else { Color::Gray };
    let mid_text = vec![
        Line::from(""),
        Line::from(""),
        Line::from(Span::styled("@", Style::default().add_modifier(Modifier::ITALIC))),
        Line::from(""),
        Line::from(Span::styled(
            game.status.detailed_state.as_str(),
            Style::default().fg(status_color).add_modifier(Modifier::BOLD),
        )),
    ];
    f.render_widget(Paragraph::new(mid_text).alignment(Alignment::Center), header_chunks[1]);

    let start = game
        .game_date
        .as_deref()
        .and_then(local_start)
        .unwrap_or_else(|| "TBD".to_string());
    let details = vec![
        Line::from(vec![Span::raw("Venue: ").bold(), Span::raw(game.venue.name.as_str())]),
        Line::from(vec![Span::raw("Start: ").bold(), Span::raw(start)]),
        Line::from(vec![Span::raw("Game:  ").bold(), Span::raw(game.game_pk.to_string())]),
    ];
    f.render_widget(Paragraph::new(details), chunks[2]);
}

fn draw_side(f: &mut Frame, side: &TeamSide, area: Rect) {
    let text_area = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Name
            Constraint::Min(0),    // Score
        ])
        .split(area);

    let name = Paragraph::new(side.team.name.as_str())
        .style(Style::default().add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center);
    f.render_widget(name, text_area[0]);

    let score = side.score.to_string();
    if text_area[1].width < 12 || text_area[1].height < 4 {
        let p = Paragraph::new(score)
            .style(Style::default().add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center);
        f.render_widget(p, text_area[1]);
    } else {
        let big = BigText::builder()
            .pixel_size(PixelSize::Quadrant)
            .lines(vec![score.into()])
            .alignment(Alignment::Center)
            .build();
        f.render_widget(big, text_area[1]);
    }
}

fn draw_status_line(f: &mut Frame, app: &App, area: Rect) {
    let line = match &app.last_error {
        Some(e) => Line::from(Span::styled(format!(" refresh failed: {}", e), Style::default().fg(Color::Red))),
        None => Line::from(Span::styled(
            " j/k: move  f: live only  q: quit",
            Style::default().fg(Color::DarkGray),
        )),
    };
    f.render_widget(Paragraph::new(line), area);
}

fn local_start(game_date: &str) -> Option<String> {
    let start = DateTime::parse_from_rfc3339(game_date).ok()?;
    Some(start.with_timezone(&Local).format("%a %b %-d, %-I:%M %p").to_string())
}
