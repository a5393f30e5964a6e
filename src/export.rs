use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::state::Event;

/// All columns of the loaded event table, header order = struct order.
pub const CSV_HEADER: [&str; 11] = [
    "match_id",
    "team",
    "player",
    "type",
    "minute",
    "second",
    "location",
    "pass_end_location",
    "shot_outcome",
    "shot_xg",
    "pass_goal_assist",
];

pub fn export_filename(home_team: &str, away_team: &str) -> String {
    format!("{home_team} vs {away_team}_events.csv")
}

pub fn write_events_csv<W: Write>(writer: W, events: &[Event]) -> Result<()> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(CSV_HEADER)
        .context("write csv header")?;
    for event in events {
        out.write_record(&[
            event.match_id.to_string(),
            event.team.clone(),
            event.player.clone().unwrap_or_default(),
            event.kind.label().to_string(),
            event.minute.to_string(),
            event.second.to_string(),
            point_cell(event.location),
            point_cell(event.pass_end_location),
            event
                .shot_outcome
                .as_ref()
                .map(|o| o.label().to_string())
                .unwrap_or_default(),
            event.shot_xg.map(|v| v.to_string()).unwrap_or_default(),
            event.pass_goal_assist.to_string(),
        ])
        .context("write csv row")?;
    }
    out.flush().context("flush csv")?;
    Ok(())
}

/// Writes `{home} vs {away}_events.csv` into `dir` and returns the path.
pub fn export_match_events(
    dir: &Path,
    home_team: &str,
    away_team: &str,
    events: &[Event],
) -> Result<PathBuf> {
    let path = dir.join(export_filename(home_team, away_team));
    let file = File::create(&path)
        .with_context(|| format!("create {}", path.display()))?;
    write_events_csv(file, events)?;
    Ok(path)
}

/// `x;y` inside one field, empty when the point is absent. Semicolon keeps
/// the pair delimiter-safe in a comma-separated row.
fn point_cell(point: Option<(f32, f32)>) -> String {
    match point {
        Some((x, y)) => format!("{x};{y}"),
        None => String::new(),
    }
}
