use std::collections::VecDeque;

const LOG_CAP: usize = 50;

/// One competition/season pairing as listed by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Competition {
    pub competition_id: u32,
    pub season_id: u32,
    pub competition_name: String,
    pub season_name: String,
    pub country_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRow {
    pub match_id: u64,
    pub match_date: String,
    pub home_team: String,
    pub away_team: String,
    pub home_score: Option<u8>,
    pub away_score: Option<u8>,
    pub competition_id: u32,
    pub season_id: u32,
}

impl MatchRow {
    pub fn label(&self) -> String {
        format!("{} vs {}", self.home_team, self.away_team)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventType {
    Pass,
    Shot,
    FoulCommitted,
    YellowCard,
    RedCard,
    Goal,
    Other(String),
}

impl EventType {
    pub fn from_label(raw: &str) -> EventType {
        match raw {
            "Pass" => EventType::Pass,
            "Shot" => EventType::Shot,
            "Foul Committed" => EventType::FoulCommitted,
            "Yellow Card" => EventType::YellowCard,
            "Red Card" => EventType::RedCard,
            "Goal" => EventType::Goal,
            other => EventType::Other(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            EventType::Pass => "Pass",
            EventType::Shot => "Shot",
            EventType::FoulCommitted => "Foul Committed",
            EventType::YellowCard => "Yellow Card",
            EventType::RedCard => "Red Card",
            EventType::Goal => "Goal",
            EventType::Other(name) => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShotOutcome {
    Goal,
    Saved,
    OffTarget,
    Blocked,
    Post,
    Wayward,
    Other(String),
}

impl ShotOutcome {
    pub fn from_label(raw: &str) -> ShotOutcome {
        match raw {
            "Goal" => ShotOutcome::Goal,
            "Saved" => ShotOutcome::Saved,
            "Off T" | "Off Target" => ShotOutcome::OffTarget,
            "Blocked" => ShotOutcome::Blocked,
            "Post" => ShotOutcome::Post,
            "Wayward" => ShotOutcome::Wayward,
            other => ShotOutcome::Other(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            ShotOutcome::Goal => "Goal",
            ShotOutcome::Saved => "Saved",
            ShotOutcome::OffTarget => "Off T",
            ShotOutcome::Blocked => "Blocked",
            ShotOutcome::Post => "Post",
            ShotOutcome::Wayward => "Wayward",
            ShotOutcome::Other(name) => name,
        }
    }
}

/// One row of the per-match event log. Built once at load time from the
/// provider payload; identity is the row position in the loaded table.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub match_id: u64,
    pub team: String,
    pub player: Option<String>,
    pub kind: EventType,
    pub minute: u32,
    pub second: u32,
    pub location: Option<(f32, f32)>,
    pub pass_end_location: Option<(f32, f32)>,
    pub shot_outcome: Option<ShotOutcome>,
    pub shot_xg: Option<f32>,
    pub pass_goal_assist: bool,
}

impl Event {
    /// Fractional match minute, minute + second/60.
    pub fn timestamp_minutes(&self) -> f32 {
        self.minute as f32 + self.second as f32 / 60.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Guide,
    Stats,
    PassMap,
    ShotMap,
    Heatmap,
    Timeline,
    Compare,
    Insights,
}

impl View {
    pub fn label(self) -> &'static str {
        match self {
            View::Guide => "Guide",
            View::Stats => "Stats",
            View::PassMap => "Pass Map",
            View::ShotMap => "Shot Map",
            View::Heatmap => "Heatmap",
            View::Timeline => "Timeline",
            View::Compare => "Compare",
            View::Insights => "Insights",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Competition,
    Season,
    Match,
    Team,
    Player,
    CompareA,
    CompareB,
}

impl Focus {
    pub fn label(self) -> &'static str {
        match self {
            Focus::Competition => "Competition",
            Focus::Season => "Season",
            Focus::Match => "Match",
            Focus::Team => "Team",
            Focus::Player => "Player",
            Focus::CompareA => "Player A",
            Focus::CompareB => "Player B",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeamSide {
    Home,
    Away,
}

pub struct AppState {
    pub view: View,
    pub focus: Focus,

    pub competitions: Vec<Competition>,
    pub competition_names: Vec<String>,
    pub competition_idx: usize,
    pub season_idx: usize,

    pub matches: Vec<MatchRow>,
    pub match_idx: usize,

    pub team_side: TeamSide,
    pub players: Vec<String>,
    pub player_idx: usize,
    pub compare_a: usize,
    pub compare_b: usize,

    pub events: Vec<Event>,
    pub loaded_match_id: Option<u64>,

    pub event_rows_shown: usize,
    pub logs: VecDeque<String>,
    pub help_overlay: bool,
    pub loading: bool,
    pub last_error: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self {
            view: View::Guide,
            focus: Focus::Competition,
            competitions: Vec::new(),
            competition_names: Vec::new(),
            competition_idx: 0,
            season_idx: 0,
            matches: Vec::new(),
            match_idx: 0,
            team_side: TeamSide::Home,
            players: Vec::new(),
            player_idx: 0,
            compare_a: 0,
            compare_b: 0,
            events: Vec::new(),
            loaded_match_id: None,
            event_rows_shown: 10,
            logs: VecDeque::new(),
            help_overlay: false,
            loading: false,
            last_error: None,
        }
    }

    pub fn push_log(&mut self, line: impl Into<String>) {
        if self.logs.len() >= LOG_CAP {
            self.logs.pop_front();
        }
        self.logs.push_back(line.into());
    }

    pub fn set_competitions(&mut self, rows: Vec<Competition>) {
        let mut names: Vec<String> = Vec::new();
        for row in &rows {
            if !names.iter().any(|n| n == &row.competition_name) {
                names.push(row.competition_name.clone());
            }
        }
        self.competitions = rows;
        self.competition_names = names;
        self.competition_idx = 0;
        self.season_idx = 0;
        self.matches.clear();
        self.match_idx = 0;
    }

    pub fn selected_competition_name(&self) -> Option<&str> {
        self.competition_names
            .get(self.competition_idx)
            .map(String::as_str)
    }

    /// Seasons of the selected competition, provider order preserved.
    pub fn seasons(&self) -> Vec<&Competition> {
        let Some(name) = self.selected_competition_name() else {
            return Vec::new();
        };
        self.competitions
            .iter()
            .filter(|c| c.competition_name == name)
            .collect()
    }

    pub fn selected_season(&self) -> Option<&Competition> {
        self.seasons().get(self.season_idx).copied()
    }

    pub fn selected_match(&self) -> Option<&MatchRow> {
        self.matches.get(self.match_idx)
    }

    pub fn team_name(&self) -> Option<&str> {
        let m = self.selected_match()?;
        Some(match self.team_side {
            TeamSide::Home => m.home_team.as_str(),
            TeamSide::Away => m.away_team.as_str(),
        })
    }

    /// `None` means "all players" (index 0 of the selector).
    pub fn selected_player(&self) -> Option<&str> {
        if self.player_idx == 0 {
            None
        } else {
            self.players.get(self.player_idx - 1).map(String::as_str)
        }
    }

    pub fn compare_pair(&self) -> Option<(&str, &str)> {
        let a = self.players.get(self.compare_a)?;
        let b = self.players.get(self.compare_b)?;
        Some((a.as_str(), b.as_str()))
    }

    /// Distinct players of the selected team, first-encountered order,
    /// rows without a player dropped.
    pub fn rebuild_players(&mut self) {
        let Some(team) = self.team_name().map(str::to_string) else {
            self.players.clear();
            self.player_idx = 0;
            return;
        };
        let mut players: Vec<String> = Vec::new();
        for event in &self.events {
            if event.team != team {
                continue;
            }
            let Some(player) = event.player.as_ref() else {
                continue;
            };
            if !players.iter().any(|p| p == player) {
                players.push(player.clone());
            }
        }
        self.players = players;
        self.player_idx = 0;
        self.compare_a = 0;
        self.compare_b = if self.players.len() > 1 { 1 } else { 0 };
    }
}
