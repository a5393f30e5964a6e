use std::io;
use std::path::Path;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use chrono::NaiveDate;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::*;
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use matchscope::aggregate::{self, DEFAULT_HEAT_BINS, MatchResult};
use matchscope::encodings::{MarkerTable, TeamPalette};
use matchscope::export;
use matchscope::pitch;
use matchscope::provider::OpenDataProvider;
use matchscope::state::{AppState, EventType, Focus, TeamSide, View};
use matchscope::store::EventStore;

const TIMELINE_TYPES: [EventType; 5] = [
    EventType::Goal,
    EventType::Shot,
    EventType::FoulCommitted,
    EventType::YellowCard,
    EventType::RedCard,
];

const MIN_EVENT_ROWS: usize = 5;
const MAX_EVENT_ROWS: usize = 50;

/// A blocking fetch queued behind the next frame, so the loading line is on
/// screen while the provider call runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PendingFetch {
    Competitions,
    Matches,
    Events,
}

struct App {
    state: AppState,
    store: EventStore,
    markers: MarkerTable,
    palette: TeamPalette,
    pending: Option<PendingFetch>,
    should_quit: bool,
}

impl App {
    fn new(store: EventStore) -> Self {
        let mut state = AppState::new();
        state.loading = true;
        Self {
            state,
            store,
            markers: MarkerTable::timeline_default(),
            palette: TeamPalette::default_palette(),
            pending: Some(PendingFetch::Competitions),
            should_quit: false,
        }
    }

    fn schedule(&mut self, pending: PendingFetch) {
        self.pending = Some(pending);
        self.state.loading = true;
    }

    fn run_pending(&mut self, pending: PendingFetch) {
        match pending {
            PendingFetch::Competitions => self.load_competitions(),
            PendingFetch::Matches => self.load_matches(),
            PendingFetch::Events => self.load_events(),
        }
        self.state.loading = false;
    }

    fn load_competitions(&mut self) {
        self.state.push_log("[INFO] Fetching competitions");
        match self.store.competitions() {
            Ok(rows) => {
                let rows = rows.to_vec();
                self.state
                    .push_log(format!("[INFO] {} competition seasons loaded", rows.len()));
                self.state.set_competitions(rows);
                self.state.last_error = None;
                self.load_matches();
            }
            Err(err) => self.fail_load("competitions", err),
        }
    }

    fn load_matches(&mut self) {
        let Some(season) = self.state.selected_season() else {
            self.state.matches.clear();
            self.state.match_idx = 0;
            return;
        };
        let (competition_id, season_id) = (season.competition_id, season.season_id);
        self.state.push_log(format!(
            "[INFO] Fetching matches {competition_id}/{season_id}"
        ));
        match self.store.matches(competition_id, season_id) {
            Ok(rows) => {
                self.state.matches = rows.to_vec();
                self.state.match_idx = 0;
                self.state.team_side = TeamSide::Home;
                self.state
                    .push_log(format!("[INFO] {} matches loaded", self.state.matches.len()));
                self.state.last_error = None;
                self.load_events();
            }
            Err(err) => {
                self.state.matches.clear();
                self.state.match_idx = 0;
                self.fail_load("matches", err);
                // Drops the stale event table of the previous selection.
                self.load_events();
            }
        }
    }

    fn load_events(&mut self) {
        let Some(match_id) = self.state.selected_match().map(|m| m.match_id) else {
            self.state.events.clear();
            self.state.loaded_match_id = None;
            self.state.rebuild_players();
            return;
        };
        if self.state.loaded_match_id == Some(match_id) {
            return;
        }
        self.state
            .push_log(format!("[INFO] Fetching events for match {match_id}"));
        match self.store.match_events(match_id) {
            Ok(rows) => {
                self.state.events = rows.to_vec();
                self.state.loaded_match_id = Some(match_id);
                self.state
                    .push_log(format!("[INFO] {} events loaded", self.state.events.len()));
                self.state.last_error = None;
            }
            Err(err) => {
                self.state.events.clear();
                self.state.loaded_match_id = None;
                self.fail_load("events", err);
            }
        }
        self.state.rebuild_players();
    }

    fn fail_load(&mut self, what: &str, err: anyhow::Error) {
        self.state.push_log(format!("[WARN] {what} load failed: {err:#}"));
        self.state.last_error = Some(format!("{what} load failed"));
    }

    fn reload_events(&mut self) {
        self.store.invalidate_events();
        self.state.loaded_match_id = None;
        self.schedule(PendingFetch::Events);
    }

    fn export_events(&mut self) {
        let Some((home, away)) = self
            .state
            .selected_match()
            .map(|m| (m.home_team.clone(), m.away_team.clone()))
        else {
            self.state.push_log("[INFO] No match selected for export");
            return;
        };
        if self.state.events.is_empty() {
            self.state.push_log("[INFO] No events to export");
            return;
        }
        match export::export_match_events(Path::new("."), &home, &away, &self.state.events) {
            Ok(path) => self
                .state
                .push_log(format!("[INFO] Exported {}", path.display())),
            Err(err) => self.state.push_log(format!("[WARN] Export failed: {err:#}")),
        }
    }

    fn focus_order(&self) -> Vec<Focus> {
        let mut order = vec![
            Focus::Competition,
            Focus::Season,
            Focus::Match,
            Focus::Team,
            Focus::Player,
        ];
        if self.state.view == View::Compare {
            order.push(Focus::CompareA);
            order.push(Focus::CompareB);
        }
        order
    }

    fn cycle_focus(&mut self, backwards: bool) {
        let order = self.focus_order();
        let pos = order.iter().position(|f| *f == self.state.focus).unwrap_or(0);
        let next = if backwards {
            (pos + order.len() - 1) % order.len()
        } else {
            (pos + 1) % order.len()
        };
        self.state.focus = order[next];
    }

    fn change_selection(&mut self, delta: i64) {
        match self.state.focus {
            Focus::Competition => {
                let len = self.state.competition_names.len();
                if let Some(idx) = step(self.state.competition_idx, delta, len) {
                    if idx != self.state.competition_idx {
                        self.state.competition_idx = idx;
                        self.state.season_idx = 0;
                        self.schedule(PendingFetch::Matches);
                    }
                }
            }
            Focus::Season => {
                let len = self.state.seasons().len();
                if let Some(idx) = step(self.state.season_idx, delta, len) {
                    if idx != self.state.season_idx {
                        self.state.season_idx = idx;
                        self.schedule(PendingFetch::Matches);
                    }
                }
            }
            Focus::Match => {
                let len = self.state.matches.len();
                if let Some(idx) = step(self.state.match_idx, delta, len) {
                    if idx != self.state.match_idx {
                        self.state.match_idx = idx;
                        self.state.team_side = TeamSide::Home;
                        self.schedule(PendingFetch::Events);
                    }
                }
            }
            Focus::Team => {
                self.state.team_side = match self.state.team_side {
                    TeamSide::Home => TeamSide::Away,
                    TeamSide::Away => TeamSide::Home,
                };
                self.state.rebuild_players();
            }
            Focus::Player => {
                let len = self.state.players.len() + 1;
                if let Some(idx) = step(self.state.player_idx, delta, len) {
                    self.state.player_idx = idx;
                }
            }
            Focus::CompareA => {
                let len = self.state.players.len();
                if let Some(idx) = step(self.state.compare_a, delta, len) {
                    self.state.compare_a = idx;
                }
            }
            Focus::CompareB => {
                let len = self.state.players.len();
                if let Some(idx) = step(self.state.compare_b, delta, len) {
                    self.state.compare_b = idx;
                }
            }
        }
    }

    fn on_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.state.help_overlay = !self.state.help_overlay,
            KeyCode::Char('1') => self.state.view = View::Guide,
            KeyCode::Char('2') => self.state.view = View::Stats,
            KeyCode::Char('3') => self.state.view = View::PassMap,
            KeyCode::Char('4') => self.state.view = View::ShotMap,
            KeyCode::Char('5') => self.state.view = View::Heatmap,
            KeyCode::Char('6') => self.state.view = View::Timeline,
            KeyCode::Char('7') => self.state.view = View::Compare,
            KeyCode::Char('8') => self.state.view = View::Insights,
            KeyCode::Tab => self.cycle_focus(false),
            KeyCode::BackTab => self.cycle_focus(true),
            KeyCode::Char('j') | KeyCode::Down => self.change_selection(1),
            KeyCode::Char('k') | KeyCode::Up => self.change_selection(-1),
            KeyCode::Char('+') | KeyCode::Char('=') => {
                self.state.event_rows_shown =
                    (self.state.event_rows_shown + 5).min(MAX_EVENT_ROWS);
            }
            KeyCode::Char('-') => {
                self.state.event_rows_shown = self
                    .state
                    .event_rows_shown
                    .saturating_sub(5)
                    .max(MIN_EVENT_ROWS);
            }
            KeyCode::Char('x') => self.export_events(),
            KeyCode::Char('r') => self.reload_events(),
            _ => {}
        }
        if !self.focus_order().contains(&self.state.focus) {
            self.state.focus = Focus::Competition;
        }
    }
}

fn step(current: usize, delta: i64, len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let next = (current as i64 + delta).clamp(0, len as i64 - 1);
    Some(next as usize)
}

fn main() -> io::Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = ratatui::Terminal::new(backend)?;

    let store = EventStore::new(Box::new(OpenDataProvider::from_env()));
    let mut app = App::new(store);

    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("error: {err}");
    }
    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    let tick_rate = Duration::from_millis(250);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| ui(f, app))?;

        // The frame above already shows the loading line for this fetch.
        if let Some(pending) = app.pending.take() {
            app.run_pending(pending);
            continue;
        }

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.on_key(key);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn ui(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(1),
            Constraint::Length(4),
        ])
        .split(frame.size());

    let header = Paragraph::new(header_text(&app.state))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    match app.state.view {
        View::Guide => render_guide(frame, chunks[1]),
        View::Stats => render_stats(frame, chunks[1], app),
        View::PassMap => render_pass_map(frame, chunks[1], app),
        View::ShotMap => render_shot_map(frame, chunks[1], app),
        View::Heatmap => render_heatmap(frame, chunks[1], app),
        View::Timeline => render_timeline(frame, chunks[1], app),
        View::Compare => render_compare(frame, chunks[1], app),
        View::Insights => render_insights(frame, chunks[1], app),
    }

    render_console(frame, chunks[2], &app.state);

    if app.state.help_overlay {
        render_help_overlay(frame, frame.size());
    }
}

fn header_text(state: &AppState) -> String {
    let mut line1 = format!(
        "MATCHSCOPE | {} | Focus: {}{}",
        state.view.label(),
        state.focus.label(),
        if state.loading { " | loading..." } else { "" }
    );
    if let Some(err) = &state.last_error {
        line1.push_str(&format!(" | ERROR: {err}"));
    }
    let line2 = selection_path(state);
    let line3 =
        "1-8 Views | Tab Focus | j/k Select | +/- Rows | x Export | r Reload | ? Help | q Quit";
    format!("{line1}\n{line2}\n{line3}")
}

fn selection_path(state: &AppState) -> String {
    let competition = state.selected_competition_name().unwrap_or("-");
    let season = state
        .selected_season()
        .map(|s| s.season_name.as_str())
        .unwrap_or("-");
    let matchup = state
        .selected_match()
        .map(|m| m.label())
        .unwrap_or_else(|| "-".to_string());
    let team = state.team_name().unwrap_or("-");
    let player = state.selected_player().unwrap_or("All players");
    format!("{competition} / {season} / {matchup} / {team} / {player}")
}

fn selection_title(state: &AppState, what: &str) -> String {
    let team = state.team_name().unwrap_or("-");
    let player = state.selected_player().unwrap_or("All players");
    format!("{what}: {player} - {team}")
}

fn render_guide(frame: &mut Frame, area: Rect) {
    let text = [
        "Explore StatsBomb open-data matches from the terminal.",
        "",
        "Views:",
        "  2 Stats     match totals, per-team goals, result, event table head",
        "  3 Pass Map  origin -> destination vectors for the selection",
        "  4 Shot Map  shot locations, glyph and color scale with xG",
        "  5 Heatmap   30x30 binned event locations",
        "  6 Timeline  goals, shots, fouls and cards over the match clock",
        "  7 Compare   passes/shots/goals/assists for two teammates",
        "  8 Insights  top passers and top shooters",
        "",
        "Steps:",
        "  1. Tab to a selector, j/k to pick competition, season and match.",
        "  2. Pick a team, and optionally a single player.",
        "  3. Switch views with the number keys.",
        "  4. Press x to export the loaded event table as CSV.",
    ]
    .join("\n");
    let widget = Paragraph::new(text)
        .block(Block::default().title("How to use").borders(Borders::ALL));
    frame.render_widget(widget, area);
}

fn render_stats(frame: &mut Frame, area: Rect, app: &App) {
    let state = &app.state;
    let Some(m) = state.selected_match() else {
        pitch::render_no_data(frame, area, "Match summary");
        return;
    };
    if state.events.is_empty() {
        pitch::render_no_data(frame, area, "Match summary");
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(9), Constraint::Min(1)])
        .split(area);

    let summary = aggregate::match_summary(&state.events, &m.home_team, &m.away_team);
    let result_line = match summary.result {
        MatchResult::HomeWin => {
            format!("{} won with {} goals", m.home_team, summary.goals_home)
        }
        MatchResult::AwayWin => {
            format!("{} won with {} goals", m.away_team, summary.goals_away)
        }
        MatchResult::Draw => "Draw".to_string(),
    };
    let lines = vec![
        format!("Date: {}", format_match_date(&m.match_date)),
        format!("Total passes: {}", summary.total_passes),
        format!("Total shots:  {}", summary.total_shots),
        format!("Total goals:  {}", summary.total_goals()),
        format!("{}: {}", m.home_team, summary.goals_home),
        format!("{}: {}", m.away_team, summary.goals_away),
        format!("Result: {result_line}"),
    ]
    .join("\n");
    let metrics = Paragraph::new(lines)
        .block(Block::default().title("Match summary").borders(Borders::ALL));
    frame.render_widget(metrics, chunks[0]);

    let mut rows = vec![format!(
        "{:>3} {:>3}  {:<20} {:<24} {:<16} location",
        "min", "sec", "team", "player", "type"
    )];
    for event in state.events.iter().take(state.event_rows_shown) {
        let loc = event
            .location
            .map(|(x, y)| format!("({x:.1}, {y:.1})"))
            .unwrap_or_else(|| "-".to_string());
        rows.push(format!(
            "{:>3} {:>3}  {:<20} {:<24} {:<16} {loc}",
            event.minute,
            event.second,
            truncate(&event.team, 20),
            truncate(event.player.as_deref().unwrap_or("-"), 24),
            truncate(event.kind.label(), 16),
        ));
    }
    let title = format!(
        "Events (first {} of {}, +/- to adjust)",
        state.event_rows_shown.min(state.events.len()),
        state.events.len()
    );
    let table = Paragraph::new(rows.join("\n"))
        .block(Block::default().title(title).borders(Borders::ALL));
    frame.render_widget(table, chunks[1]);
}

fn render_pass_map(frame: &mut Frame, area: Rect, app: &App) {
    let state = &app.state;
    let title = selection_title(state, "Pass map");
    let Some(team) = state.team_name() else {
        pitch::render_no_data(frame, area, &title);
        return;
    };
    let rows =
        aggregate::filter_by_team_and_player(&state.events, team, state.selected_player());
    let segments = aggregate::pass_segments(&rows);
    if segments.is_empty() {
        pitch::render_no_data(frame, area, &title);
        return;
    }
    pitch::render_pass_map(frame, area, &title, &segments);
}

fn render_shot_map(frame: &mut Frame, area: Rect, app: &App) {
    let state = &app.state;
    let title = selection_title(state, "Shot map");
    let Some(team) = state.team_name() else {
        pitch::render_no_data(frame, area, &title);
        return;
    };
    let rows =
        aggregate::filter_by_team_and_player(&state.events, team, state.selected_player());
    let shots = aggregate::shot_points(&rows);
    if shots.is_empty() {
        pitch::render_no_data(frame, area, &title);
        return;
    }
    pitch::render_shot_map(frame, area, &title, &shots);
}

fn render_heatmap(frame: &mut Frame, area: Rect, app: &App) {
    let state = &app.state;
    let Some(team) = state.team_name() else {
        pitch::render_no_data(frame, area, "Heatmap");
        return;
    };
    let rows =
        aggregate::filter_by_team_and_player(&state.events, team, state.selected_player());
    let points = aggregate::located_points(&rows);
    if points.is_empty() {
        pitch::render_no_data(frame, area, &selection_title(state, "Heatmap"));
        return;
    }
    // Rows without a location are dropped from the bins but still reported.
    let title = format!(
        "{} [{} located / {} events]",
        selection_title(state, "Heatmap"),
        points.len(),
        rows.len()
    );
    let grid = aggregate::heatmap_grid(&points, DEFAULT_HEAT_BINS, DEFAULT_HEAT_BINS);
    pitch::render_heatmap(frame, area, &title, &grid);
}

fn render_timeline(frame: &mut Frame, area: Rect, app: &App) {
    let state = &app.state;
    let Some(m) = state.selected_match() else {
        pitch::render_no_data(frame, area, "Timeline");
        return;
    };
    let marks = aggregate::timeline_marks(&state.events, &TIMELINE_TYPES);
    if marks.is_empty() {
        pitch::render_no_data(frame, area, "Timeline");
        return;
    }
    let title = format!(
        "Timeline ({} blue, {} red)",
        m.home_team, m.away_team
    );
    pitch::render_timeline(
        frame,
        area,
        &title,
        &marks,
        &TIMELINE_TYPES,
        &m.home_team,
        &app.markers,
        &app.palette,
    );
}

fn render_compare(frame: &mut Frame, area: Rect, app: &App) {
    let state = &app.state;
    let title = "Compare players";
    let (Some(team), Some((a, b))) = (state.team_name(), state.compare_pair()) else {
        pitch::render_no_data(frame, area, title);
        return;
    };
    let lines = aggregate::pairwise_player_stats(&state.events, team, a, b);
    let mut rows = vec![format!(
        "{:<24} {:>7} {:>6} {:>6} {:>8}",
        "player", "passes", "shots", "goals", "assists"
    )];
    for line in &lines {
        rows.push(format!(
            "{:<24} {:>7} {:>6} {:>6} {:>8}",
            truncate(&line.player, 24),
            line.passes,
            line.shots,
            line.goals,
            line.assists
        ));
    }
    rows.push(String::new());
    rows.push("Tab to Player A / Player B, j/k to change.".to_string());
    let widget = Paragraph::new(rows.join("\n"))
        .block(Block::default().title(title).borders(Borders::ALL));
    frame.render_widget(widget, area);
}

fn render_insights(frame: &mut Frame, area: Rect, app: &App) {
    let state = &app.state;
    let title = "Insights";
    if state.events.is_empty() {
        pitch::render_no_data(frame, area, title);
        return;
    }
    let passers = aggregate::top_players_by_event_type(&state.events, &EventType::Pass, 3);
    let shooters = aggregate::top_players_by_event_type(&state.events, &EventType::Shot, 3);

    let mut rows = vec!["Top passers:".to_string()];
    if passers.is_empty() {
        rows.push("  no pass data available".to_string());
    }
    for (player, count) in &passers {
        rows.push(format!("  {player}: {count} passes"));
    }
    rows.push(String::new());
    rows.push("Top shooters:".to_string());
    if shooters.is_empty() {
        rows.push("  no shot data available".to_string());
    }
    for (player, count) in &shooters {
        rows.push(format!("  {player}: {count} shots"));
    }
    let widget = Paragraph::new(rows.join("\n"))
        .block(Block::default().title(title).borders(Borders::ALL));
    frame.render_widget(widget, area);
}

fn render_console(frame: &mut Frame, area: Rect, state: &AppState) {
    let text = if state.logs.is_empty() {
        "No activity yet".to_string()
    } else {
        state
            .logs
            .iter()
            .rev()
            .take(2)
            .cloned()
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect::<Vec<_>>()
            .join("\n")
    };
    let console = Paragraph::new(text)
        .block(Block::default().title("Console").borders(Borders::ALL));
    frame.render_widget(console, area);
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);

    let text = [
        "matchscope - Help",
        "",
        "Views:",
        "  1 Guide    2 Stats     3 Pass Map  4 Shot Map",
        "  5 Heatmap  6 Timeline  7 Compare   8 Insights",
        "",
        "Selection:",
        "  Tab / Shift-Tab   Cycle focused selector",
        "  j/k or arrows     Change the focused selection",
        "",
        "Other:",
        "  +/-   Rows shown in the Stats event table",
        "  x     Export loaded events as CSV",
        "  r     Refetch the current match events",
        "  ?     Toggle help",
        "  q     Quit",
    ]
    .join("\n");

    let help = Paragraph::new(text)
        .block(Block::default().title("Help").borders(Borders::ALL))
        .style(Style::default());
    frame.render_widget(help, popup_area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}

fn format_match_date(raw: &str) -> String {
    if raw.is_empty() {
        return "unknown".to_string();
    }
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => date.format("%d %b %Y").to_string(),
        Err(_) => raw.to_string(),
    }
}

fn truncate(raw: &str, max: usize) -> String {
    if raw.chars().count() <= max {
        return raw.to_string();
    }
    raw.chars().take(max.saturating_sub(1)).collect::<String>() + "…"
}
