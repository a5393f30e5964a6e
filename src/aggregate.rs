use crate::state::{Event, EventType, ShotOutcome};

/// StatsBomb pitch coordinates.
pub const PITCH_LENGTH: f32 = 120.0;
pub const PITCH_WIDTH: f32 = 80.0;
pub const DEFAULT_HEAT_BINS: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchResult {
    HomeWin,
    AwayWin,
    Draw,
}

/// Headline match stats. Goals are derived from Shot events with a Goal
/// outcome, not from the provider's score fields; own goals are not modeled
/// as Shot events, so this can undercount the official score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchSummary {
    pub total_passes: usize,
    pub total_shots: usize,
    pub goals_home: usize,
    pub goals_away: usize,
    pub result: MatchResult,
}

impl MatchSummary {
    pub fn total_goals(&self) -> usize {
        self.goals_home + self.goals_away
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerStatLine {
    pub player: String,
    pub passes: usize,
    pub shots: usize,
    pub goals: usize,
    pub assists: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimelineMark {
    pub minutes: f32,
    pub kind: EventType,
    pub team: String,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PassSegment {
    pub origin: (f32, f32),
    pub end: (f32, f32),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShotPoint {
    pub location: (f32, f32),
    pub xg: f32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeatGrid {
    pub bins_x: usize,
    pub bins_y: usize,
    counts: Vec<u32>,
    max: u32,
}

impl HeatGrid {
    pub fn at(&self, bx: usize, by: usize) -> u32 {
        self.counts[by * self.bins_x + bx]
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().map(|c| *c as u64).sum()
    }
}

pub fn count_by_type(events: &[Event], kind: &EventType) -> usize {
    events.iter().filter(|e| &e.kind == kind).count()
}

/// Shot events for `team` whose outcome is Goal.
pub fn goals_for(events: &[Event], team: &str) -> usize {
    events
        .iter()
        .filter(|e| {
            e.team == team
                && e.kind == EventType::Shot
                && e.shot_outcome == Some(ShotOutcome::Goal)
        })
        .count()
}

pub fn match_summary(events: &[Event], home: &str, away: &str) -> MatchSummary {
    let goals_home = goals_for(events, home);
    let goals_away = goals_for(events, away);
    let result = if goals_home > goals_away {
        MatchResult::HomeWin
    } else if goals_away > goals_home {
        MatchResult::AwayWin
    } else {
        MatchResult::Draw
    };
    MatchSummary {
        total_passes: count_by_type(events, &EventType::Pass),
        total_shots: count_by_type(events, &EventType::Shot),
        goals_home,
        goals_away,
        result,
    }
}

/// Descending by count; ties keep the first-encountered order from the
/// source table. Players with no matching events never appear.
pub fn top_players_by_event_type(
    events: &[Event],
    kind: &EventType,
    n: usize,
) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for event in events {
        if &event.kind != kind {
            continue;
        }
        let Some(player) = event.player.as_ref() else {
            continue;
        };
        match counts.iter_mut().find(|(p, _)| p == player) {
            Some((_, c)) => *c += 1,
            None => counts.push((player.clone(), 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.truncate(n);
    counts
}

/// Team filter always applies; the player filter only when present, so the
/// player slice is a refinement of the team slice.
pub fn filter_by_team_and_player(
    events: &[Event],
    team: &str,
    player: Option<&str>,
) -> Vec<Event> {
    events
        .iter()
        .filter(|e| e.team == team)
        .filter(|e| match player {
            Some(name) => e.player.as_deref() == Some(name),
            None => true,
        })
        .cloned()
        .collect()
}

pub fn pairwise_player_stats(
    events: &[Event],
    team: &str,
    player_a: &str,
    player_b: &str,
) -> [PlayerStatLine; 2] {
    [
        player_stat_line(events, team, player_a),
        player_stat_line(events, team, player_b),
    ]
}

fn player_stat_line(events: &[Event], team: &str, player: &str) -> PlayerStatLine {
    let rows = filter_by_team_and_player(events, team, Some(player));
    let goals = rows
        .iter()
        .filter(|e| e.kind == EventType::Shot && e.shot_outcome == Some(ShotOutcome::Goal))
        .count();
    let assists = rows.iter().filter(|e| e.pass_goal_assist).count();
    PlayerStatLine {
        player: player.to_string(),
        passes: count_by_type(&rows, &EventType::Pass),
        shots: count_by_type(&rows, &EventType::Shot),
        goals,
        assists,
    }
}

/// Marks for the requested event types, ascending by fractional minute.
/// The sort is stable, so equal timestamps keep their input order.
pub fn timeline_marks(events: &[Event], types_of_interest: &[EventType]) -> Vec<TimelineMark> {
    let mut marks: Vec<TimelineMark> = events
        .iter()
        .filter(|e| types_of_interest.contains(&e.kind))
        .map(|e| TimelineMark {
            minutes: e.timestamp_minutes(),
            kind: e.kind.clone(),
            team: e.team.clone(),
        })
        .collect();
    marks.sort_by(|a, b| a.minutes.total_cmp(&b.minutes));
    marks
}

/// Pass rows carrying both endpoints; everything else is dropped.
pub fn pass_segments(events: &[Event]) -> Vec<PassSegment> {
    events
        .iter()
        .filter(|e| e.kind == EventType::Pass)
        .filter_map(|e| {
            Some(PassSegment {
                origin: e.location?,
                end: e.pass_end_location?,
            })
        })
        .collect()
}

/// Shot rows carrying both a location and an xG value.
pub fn shot_points(events: &[Event]) -> Vec<ShotPoint> {
    events
        .iter()
        .filter(|e| e.kind == EventType::Shot)
        .filter_map(|e| {
            Some(ShotPoint {
                location: e.location?,
                xg: e.shot_xg?,
            })
        })
        .collect()
}

pub fn located_points(events: &[Event]) -> Vec<(f32, f32)> {
    events.iter().filter_map(|e| e.location).collect()
}

/// (min, max) of the xG values, for the shared normalized color scale.
pub fn xg_bounds(shots: &[ShotPoint]) -> Option<(f32, f32)> {
    let first = shots.first()?.xg;
    let mut lo = first;
    let mut hi = first;
    for shot in shots {
        lo = lo.min(shot.xg);
        hi = hi.max(shot.xg);
    }
    Some((lo, hi))
}

/// Position of `value` within `bounds`, in [0, 1]. A degenerate range maps
/// everything to 1.0 so single-shot maps still render at full intensity.
pub fn normalized(value: f32, bounds: (f32, f32)) -> f32 {
    let (lo, hi) = bounds;
    if hi <= lo {
        return 1.0;
    }
    ((value - lo) / (hi - lo)).clamp(0.0, 1.0)
}

/// 2D binned count over pitch coordinates. Points outside the pitch clamp
/// into the edge bins, so the grid total always equals the input count.
pub fn heatmap_grid(points: &[(f32, f32)], bins_x: usize, bins_y: usize) -> HeatGrid {
    let bins_x = bins_x.max(1);
    let bins_y = bins_y.max(1);
    let mut counts = vec![0u32; bins_x * bins_y];
    for (x, y) in points {
        let bx = bin_index(*x, PITCH_LENGTH, bins_x);
        let by = bin_index(*y, PITCH_WIDTH, bins_y);
        counts[by * bins_x + bx] += 1;
    }
    let max = counts.iter().copied().max().unwrap_or(0);
    HeatGrid {
        bins_x,
        bins_y,
        counts,
        max,
    }
}

fn bin_index(value: f32, extent: f32, bins: usize) -> usize {
    let clamped = value.clamp(0.0, extent);
    let idx = (clamped / extent * bins as f32) as usize;
    idx.min(bins - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heat_grid_total_matches_input_even_off_pitch() {
        let points = vec![(0.0, 0.0), (119.9, 79.9), (120.0, 80.0), (-5.0, 200.0)];
        let grid = heatmap_grid(&points, DEFAULT_HEAT_BINS, DEFAULT_HEAT_BINS);
        assert_eq!(grid.total(), points.len() as u64);
        assert_eq!(grid.at(0, 0), 1);
        assert_eq!(grid.at(DEFAULT_HEAT_BINS - 1, DEFAULT_HEAT_BINS - 1), 2);
        assert_eq!(grid.at(0, DEFAULT_HEAT_BINS - 1), 1);
    }

    #[test]
    fn heat_grid_empty_input() {
        let grid = heatmap_grid(&[], DEFAULT_HEAT_BINS, DEFAULT_HEAT_BINS);
        assert_eq!(grid.total(), 0);
        assert_eq!(grid.max(), 0);
    }

    #[test]
    fn normalized_handles_degenerate_range() {
        assert_eq!(normalized(0.5, (0.2, 0.2)), 1.0);
        assert_eq!(normalized(0.2, (0.0, 0.4)), 0.5);
        assert_eq!(normalized(-1.0, (0.0, 1.0)), 0.0);
    }

    #[test]
    fn xg_bounds_empty_is_none() {
        assert_eq!(xg_bounds(&[]), None);
        let shots = vec![
            ShotPoint {
                location: (100.0, 40.0),
                xg: 0.3,
            },
            ShotPoint {
                location: (110.0, 38.0),
                xg: 0.7,
            },
        ];
        assert_eq!(xg_bounds(&shots), Some((0.3, 0.7)));
    }
}
