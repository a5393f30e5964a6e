use matchscope::aggregate::{
    DEFAULT_HEAT_BINS, MatchResult, count_by_type, filter_by_team_and_player, goals_for,
    heatmap_grid, located_points, match_summary, pairwise_player_stats, pass_segments,
    shot_points, timeline_marks, top_players_by_event_type,
};
use matchscope::state::{Event, EventType, ShotOutcome};

const HOME: &str = "Home";
const AWAY: &str = "Away";

fn event(team: &str, player: Option<&str>, kind: EventType) -> Event {
    Event {
        match_id: 7,
        team: team.to_string(),
        player: player.map(str::to_string),
        kind,
        minute: 10,
        second: 0,
        location: Some((60.0, 40.0)),
        pass_end_location: None,
        shot_outcome: None,
        shot_xg: None,
        pass_goal_assist: false,
    }
}

fn pass(team: &str, player: &str) -> Event {
    let mut e = event(team, Some(player), EventType::Pass);
    e.pass_end_location = Some((70.0, 42.0));
    e
}

fn shot(team: &str, player: &str, outcome: ShotOutcome, xg: f32) -> Event {
    let mut e = event(team, Some(player), EventType::Shot);
    e.shot_outcome = Some(outcome);
    e.shot_xg = Some(xg);
    e
}

fn at(mut e: Event, minute: u32, second: u32) -> Event {
    e.minute = minute;
    e.second = second;
    e
}

/// The spec scenario: 3 Pass rows (A, A, B), 1 Shot row (A, Goal, Home).
fn scenario_table() -> Vec<Event> {
    vec![
        pass(HOME, "A"),
        pass(HOME, "A"),
        pass(HOME, "B"),
        shot(HOME, "A", ShotOutcome::Goal, 0.4),
    ]
}

#[test]
fn count_by_type_partitions_the_table() {
    let events = vec![
        pass(HOME, "A"),
        pass(AWAY, "X"),
        shot(HOME, "A", ShotOutcome::Saved, 0.1),
        event(HOME, Some("B"), EventType::FoulCommitted),
        event(HOME, None, EventType::Other("Starting XI".to_string())),
    ];

    assert_eq!(count_by_type(&events, &EventType::Pass), 2);
    assert_eq!(count_by_type(&events, &EventType::Shot), 1);

    let mut distinct: Vec<&EventType> = Vec::new();
    for e in &events {
        if !distinct.contains(&&e.kind) {
            distinct.push(&e.kind);
        }
    }
    let total: usize = distinct
        .iter()
        .map(|kind| count_by_type(&events, *kind))
        .sum();
    assert_eq!(total, events.len());
}

#[test]
fn goals_are_additive_over_both_teams() {
    let events = vec![
        shot(HOME, "A", ShotOutcome::Goal, 0.5),
        shot(HOME, "B", ShotOutcome::Saved, 0.2),
        shot(AWAY, "X", ShotOutcome::Goal, 0.3),
        shot(AWAY, "Y", ShotOutcome::Goal, 0.6),
        pass(HOME, "A"),
    ];
    let summary = match_summary(&events, HOME, AWAY);
    assert_eq!(
        goals_for(&events, HOME) + goals_for(&events, AWAY),
        summary.total_goals()
    );
    assert_eq!(summary.goals_home, 1);
    assert_eq!(summary.goals_away, 2);
    assert_eq!(summary.result, MatchResult::AwayWin);
}

#[test]
fn match_result_covers_win_and_draw() {
    let home_win = vec![
        shot(HOME, "A", ShotOutcome::Goal, 0.5),
        shot(AWAY, "X", ShotOutcome::Saved, 0.2),
    ];
    let summary = match_summary(&home_win, HOME, AWAY);
    assert_eq!(summary.result, MatchResult::HomeWin);
    assert_eq!(summary.goals_home, 1);
    assert_eq!(summary.goals_away, 0);

    let level = vec![
        shot(HOME, "A", ShotOutcome::Goal, 0.5),
        shot(AWAY, "X", ShotOutcome::Goal, 0.3),
    ];
    assert_eq!(match_summary(&level, HOME, AWAY).result, MatchResult::Draw);

    // Goalless is a draw too, not an error.
    let empty = match_summary(&[], HOME, AWAY);
    assert_eq!(empty.result, MatchResult::Draw);
    assert_eq!(empty.total_goals(), 0);
}

#[test]
fn spec_scenario_counts() {
    let events = scenario_table();
    assert_eq!(count_by_type(&events, &EventType::Pass), 3);
    assert_eq!(
        top_players_by_event_type(&events, &EventType::Pass, 1),
        vec![("A".to_string(), 2)]
    );
    assert_eq!(goals_for(&events, HOME), 1);
}

#[test]
fn top_players_ranked_and_bounded() {
    let events = vec![
        pass(HOME, "A"),
        pass(HOME, "B"),
        pass(HOME, "B"),
        pass(HOME, "C"),
        pass(HOME, "C"),
        pass(HOME, "C"),
        shot(HOME, "Z", ShotOutcome::Saved, 0.1),
    ];
    let top = top_players_by_event_type(&events, &EventType::Pass, 2);
    assert_eq!(top.len(), 2);
    assert!(top.windows(2).all(|w| w[0].1 >= w[1].1));
    assert_eq!(top[0].0, "C");
    // Z has no passes, so never appears even with a large n.
    let all = top_players_by_event_type(&events, &EventType::Pass, 10);
    assert!(all.iter().all(|(p, count)| p != "Z" && *count > 0));
}

#[test]
fn top_players_ties_keep_first_encountered_order() {
    let events = vec![pass(HOME, "B"), pass(HOME, "A"), pass(HOME, "C")];
    let top = top_players_by_event_type(&events, &EventType::Pass, 3);
    let names: Vec<&str> = top.iter().map(|(p, _)| p.as_str()).collect();
    assert_eq!(names, vec!["B", "A", "C"]);
}

#[test]
fn player_filter_refines_team_filter() {
    let events = vec![
        pass(HOME, "A"),
        pass(HOME, "B"),
        pass(AWAY, "X"),
        shot(HOME, "A", ShotOutcome::Goal, 0.4),
    ];
    let team_rows = filter_by_team_and_player(&events, HOME, None);
    let player_rows = filter_by_team_and_player(&events, HOME, Some("A"));

    assert_eq!(team_rows.len(), 3);
    assert_eq!(player_rows.len(), 2);
    assert!(player_rows.iter().all(|e| team_rows.contains(e)));
    assert!(team_rows.iter().all(|e| e.team == HOME));
}

#[test]
fn timeline_sorted_and_stable_for_equal_timestamps() {
    let goal = at(event(HOME, Some("A"), EventType::Goal), 10, 0);
    let shot_row = at(shot(AWAY, "X", ShotOutcome::Saved, 0.2), 10, 0);
    let late_foul = at(event(AWAY, Some("Y"), EventType::FoulCommitted), 44, 30);
    let early_pass = at(pass(HOME, "A"), 1, 0);

    // Deliberately unsorted input; the Pass row is filtered out.
    let events = vec![late_foul, goal, shot_row, early_pass];
    let types = [
        EventType::Goal,
        EventType::Shot,
        EventType::FoulCommitted,
        EventType::YellowCard,
        EventType::RedCard,
    ];
    let marks = timeline_marks(&events, &types);

    assert_eq!(marks.len(), 3);
    assert!(marks.windows(2).all(|w| w[0].minutes <= w[1].minutes));
    // Both 10.0 marks keep their relative input order: Goal before Shot.
    assert_eq!(marks[0].kind, EventType::Goal);
    assert_eq!(marks[1].kind, EventType::Shot);
    assert_eq!(marks[2].minutes, 44.5);
}

#[test]
fn pairwise_stats_count_goals_and_assists() {
    let mut assist = pass(HOME, "B");
    assist.pass_goal_assist = true;
    let events = vec![
        pass(HOME, "A"),
        pass(HOME, "A"),
        assist,
        shot(HOME, "A", ShotOutcome::Goal, 0.5),
        shot(HOME, "A", ShotOutcome::Saved, 0.1),
        shot(HOME, "B", ShotOutcome::Goal, 0.3),
        shot(AWAY, "A", ShotOutcome::Goal, 0.9),
    ];
    let [a, b] = pairwise_player_stats(&events, HOME, "A", "B");

    assert_eq!(a.player, "A");
    assert_eq!(a.passes, 2);
    assert_eq!(a.shots, 2);
    // The away-team "A" shot never counts for the home-team player.
    assert_eq!(a.goals, 1);
    assert_eq!(a.assists, 0);

    assert_eq!(b.passes, 1);
    assert_eq!(b.shots, 1);
    assert_eq!(b.goals, 1);
    assert_eq!(b.assists, 1);
}

#[test]
fn empty_selection_reports_no_data_not_errors() {
    let events = vec![pass(HOME, "A"), shot(HOME, "A", ShotOutcome::Goal, 0.4)];
    let rows = filter_by_team_and_player(&events, AWAY, None);

    assert!(rows.is_empty());
    assert!(pass_segments(&rows).is_empty());
    assert!(shot_points(&rows).is_empty());
    assert!(located_points(&rows).is_empty());
    assert!(top_players_by_event_type(&rows, &EventType::Pass, 3).is_empty());
    assert_eq!(goals_for(&rows, AWAY), 0);
    assert_eq!(
        heatmap_grid(&located_points(&rows), DEFAULT_HEAT_BINS, DEFAULT_HEAT_BINS).total(),
        0
    );
}

#[test]
fn spatial_extraction_drops_rows_missing_optional_fields() {
    let mut no_end = pass(HOME, "A");
    no_end.pass_end_location = None;
    let mut no_xg = shot(HOME, "A", ShotOutcome::Saved, 0.0);
    no_xg.shot_xg = None;
    let mut no_location = shot(HOME, "B", ShotOutcome::Goal, 0.7);
    no_location.location = None;

    let events = vec![
        pass(HOME, "A"),
        no_end,
        shot(HOME, "A", ShotOutcome::Goal, 0.4),
        no_xg,
        no_location,
    ];

    assert_eq!(pass_segments(&events).len(), 1);
    assert_eq!(shot_points(&events).len(), 1);
    // Dropped rows still count in the non-spatial aggregates.
    assert_eq!(count_by_type(&events, &EventType::Pass), 2);
    assert_eq!(count_by_type(&events, &EventType::Shot), 3);
    assert_eq!(goals_for(&events, HOME), 2);
    assert_eq!(located_points(&events).len(), 4);
}
