use ratatui::style::Color;

use crate::state::{EventType, TeamSide};

/// Event type → marker glyph. An explicit table passed into rendering, so
/// the mapping is testable and not scattered through draw code.
#[derive(Debug, Clone)]
pub struct MarkerTable {
    entries: Vec<(EventType, char)>,
    fallback: char,
}

impl MarkerTable {
    pub fn new(entries: Vec<(EventType, char)>, fallback: char) -> Self {
        Self { entries, fallback }
    }

    /// Mirrors the original marker set: goal circle, shot square, foul X,
    /// yellow card up-triangle, red card down-triangle.
    pub fn timeline_default() -> Self {
        Self::new(
            vec![
                (EventType::Goal, 'o'),
                (EventType::Shot, 's'),
                (EventType::FoulCommitted, 'X'),
                (EventType::YellowCard, '^'),
                (EventType::RedCard, 'v'),
            ],
            '*',
        )
    }

    pub fn glyph(&self, kind: &EventType) -> char {
        self.entries
            .iter()
            .find(|(k, _)| k == kind)
            .map(|(_, g)| *g)
            .unwrap_or(self.fallback)
    }
}

/// Team → color table.
#[derive(Debug, Clone, Copy)]
pub struct TeamPalette {
    pub home: Color,
    pub away: Color,
}

impl TeamPalette {
    pub fn default_palette() -> Self {
        Self {
            home: Color::Blue,
            away: Color::Red,
        }
    }

    pub fn color(&self, side: TeamSide) -> Color {
        match side {
            TeamSide::Home => self.home,
            TeamSide::Away => self.away,
        }
    }
}

/// Pass-vector color (the original drew pass arrows in a single blue).
pub const PASS_COLOR: Color = Color::Blue;
pub const PITCH_LINE_COLOR: Color = Color::DarkGray;

/// Shot color, monotonic in normalized xG: dim red up to bright red.
pub fn xg_ramp(t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);
    let red = 90.0 + 165.0 * t;
    let other = 60.0 * (1.0 - t);
    Color::Rgb(red as u8, other as u8, other as u8)
}

/// Shot glyph, monotonic in normalized xG (the terminal stand-in for the
/// original's marker-size channel).
pub fn xg_glyph(t: f32) -> char {
    let t = t.clamp(0.0, 1.0);
    if t < 0.25 {
        '.'
    } else if t < 0.5 {
        'o'
    } else if t < 0.75 {
        'O'
    } else {
        '@'
    }
}

/// Heat ramp, black through red and orange to near-white, monotonic in the
/// bin intensity.
pub fn heat_ramp(t: f32) -> Color {
    let t = t.clamp(0.0, 1.0);
    if t <= 0.0 {
        return Color::Rgb(20, 20, 20);
    }
    let red = (60.0 + 195.0 * (t * 2.0).min(1.0)) as u8;
    let green = (230.0 * (t - 0.35).max(0.0) / 0.65) as u8;
    let blue = (200.0 * (t - 0.8).max(0.0) / 0.2) as u8;
    Color::Rgb(red, green, blue)
}
