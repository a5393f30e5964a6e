use anyhow::{Context, Result};
use serde::Deserialize;

use crate::http_client::http_client;
use crate::state::{Competition, Event, EventType, MatchRow, ShotOutcome};

const OPEN_DATA_URL: &str = "https://raw.githubusercontent.com/statsbomb/open-data/master/data";
const BASE_URL_ENV: &str = "MATCHSCOPE_DATA_URL";

/// The remote data seam. The store owns one of these; tests inject stubs.
pub trait MatchDataProvider {
    fn competitions(&self) -> Result<Vec<Competition>>;
    fn matches(&self, competition_id: u32, season_id: u32) -> Result<Vec<MatchRow>>;
    fn events(&self, match_id: u64) -> Result<Vec<Event>>;
}

/// StatsBomb open-data over HTTP. Base URL can point at a local mirror
/// through `MATCHSCOPE_DATA_URL`.
pub struct OpenDataProvider {
    base_url: String,
}

impl OpenDataProvider {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url }
    }

    pub fn from_env() -> Self {
        let base = std::env::var(BASE_URL_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| OPEN_DATA_URL.to_string());
        Self::new(base)
    }

    fn fetch(&self, path: &str) -> Result<String> {
        let url = format!("{}/{path}", self.base_url);
        let resp = http_client()?
            .get(&url)
            .send()
            .with_context(|| format!("request failed: {url}"))?;
        let status = resp.status();
        let body = resp.text().context("failed reading body")?;
        if !status.is_success() {
            return Err(anyhow::anyhow!("http {status}: {url}"));
        }
        Ok(body)
    }
}

impl MatchDataProvider for OpenDataProvider {
    fn competitions(&self) -> Result<Vec<Competition>> {
        let body = self.fetch("competitions.json")?;
        parse_competitions_json(&body)
    }

    fn matches(&self, competition_id: u32, season_id: u32) -> Result<Vec<MatchRow>> {
        let body = self.fetch(&format!("matches/{competition_id}/{season_id}.json"))?;
        parse_matches_json(&body)
    }

    fn events(&self, match_id: u64) -> Result<Vec<Event>> {
        let body = self.fetch(&format!("events/{match_id}.json"))?;
        parse_events_json(&body, match_id)
    }
}

#[derive(Debug, Deserialize)]
struct RawCompetition {
    competition_id: u32,
    season_id: u32,
    competition_name: String,
    season_name: String,
    #[serde(default)]
    country_name: String,
}

#[derive(Debug, Deserialize)]
struct RawMatch {
    match_id: u64,
    #[serde(default)]
    match_date: String,
    home_team: RawHomeTeam,
    away_team: RawAwayTeam,
    home_score: Option<u8>,
    away_score: Option<u8>,
    competition: RawMatchCompetition,
    season: RawMatchSeason,
}

#[derive(Debug, Deserialize)]
struct RawHomeTeam {
    #[serde(rename = "home_team_name")]
    name: String,
}

#[derive(Debug, Deserialize)]
struct RawAwayTeam {
    #[serde(rename = "away_team_name")]
    name: String,
}

#[derive(Debug, Deserialize)]
struct RawMatchCompetition {
    competition_id: u32,
}

#[derive(Debug, Deserialize)]
struct RawMatchSeason {
    season_id: u32,
}

#[derive(Debug, Deserialize)]
struct RawEvent {
    #[serde(default)]
    minute: u32,
    #[serde(default)]
    second: u32,
    #[serde(rename = "type")]
    kind: RawName,
    team: RawName,
    player: Option<RawName>,
    location: Option<Vec<f32>>,
    pass: Option<RawPass>,
    shot: Option<RawShot>,
}

#[derive(Debug, Deserialize)]
struct RawName {
    name: String,
}

#[derive(Debug, Deserialize)]
struct RawPass {
    end_location: Option<Vec<f32>>,
    #[serde(default)]
    goal_assist: bool,
}

#[derive(Debug, Deserialize)]
struct RawShot {
    statsbomb_xg: Option<f32>,
    outcome: Option<RawName>,
}

pub fn parse_competitions_json(raw: &str) -> Result<Vec<Competition>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    let rows: Vec<RawCompetition> =
        serde_json::from_str(trimmed).context("invalid competitions json")?;
    Ok(rows
        .into_iter()
        .map(|r| Competition {
            competition_id: r.competition_id,
            season_id: r.season_id,
            competition_name: r.competition_name,
            season_name: r.season_name,
            country_name: r.country_name,
        })
        .collect())
}

pub fn parse_matches_json(raw: &str) -> Result<Vec<MatchRow>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    let rows: Vec<RawMatch> = serde_json::from_str(trimmed).context("invalid matches json")?;
    Ok(rows
        .into_iter()
        .map(|r| MatchRow {
            match_id: r.match_id,
            match_date: r.match_date,
            home_team: r.home_team.name,
            away_team: r.away_team.name,
            home_score: r.home_score,
            away_score: r.away_score,
            competition_id: r.competition.competition_id,
            season_id: r.season.season_id,
        })
        .collect())
}

/// The per-match file does not repeat the match id, so the requested id is
/// stamped onto every row. Malformed optional fields become `None` for that
/// row only.
pub fn parse_events_json(raw: &str, match_id: u64) -> Result<Vec<Event>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(Vec::new());
    }
    let rows: Vec<RawEvent> = serde_json::from_str(trimmed).context("invalid events json")?;
    Ok(rows
        .into_iter()
        .map(|r| {
            let (pass_end_location, pass_goal_assist) = match &r.pass {
                Some(p) => (point_from(p.end_location.as_deref()), p.goal_assist),
                None => (None, false),
            };
            let (shot_outcome, shot_xg) = match &r.shot {
                Some(s) => (
                    s.outcome
                        .as_ref()
                        .map(|o| ShotOutcome::from_label(&o.name)),
                    s.statsbomb_xg.filter(|v| v.is_finite()),
                ),
                None => (None, None),
            };
            Event {
                match_id,
                team: r.team.name,
                player: r.player.map(|p| p.name),
                kind: EventType::from_label(&r.kind.name),
                minute: r.minute,
                second: r.second,
                location: point_from(r.location.as_deref()),
                pass_end_location,
                shot_outcome,
                shot_xg,
                pass_goal_assist,
            }
        })
        .collect())
}

fn point_from(raw: Option<&[f32]>) -> Option<(f32, f32)> {
    let coords = raw?;
    if coords.len() < 2 {
        return None;
    }
    let (x, y) = (coords[0], coords[1]);
    if !x.is_finite() || !y.is_finite() {
        return None;
    }
    Some((x, y))
}
