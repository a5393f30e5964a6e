use matchscope::export::{CSV_HEADER, export_filename, write_events_csv};
use matchscope::state::{Event, EventType, ShotOutcome};

fn sample_events() -> Vec<Event> {
    vec![
        Event {
            match_id: 3869685,
            team: "Argentina".to_string(),
            player: Some("Lionel Messi".to_string()),
            kind: EventType::Pass,
            minute: 0,
            second: 12,
            location: Some((60.0, 40.0)),
            pass_end_location: Some((80.5, 46.0)),
            shot_outcome: None,
            shot_xg: None,
            pass_goal_assist: false,
        },
        Event {
            match_id: 3869685,
            team: "France".to_string(),
            player: None,
            kind: EventType::Other("Half Start".to_string()),
            minute: 45,
            second: 0,
            location: None,
            pass_end_location: None,
            shot_outcome: None,
            shot_xg: None,
            pass_goal_assist: false,
        },
        Event {
            match_id: 3869685,
            team: "Argentina".to_string(),
            player: Some("Julián Álvarez".to_string()),
            kind: EventType::Shot,
            minute: 22,
            second: 38,
            location: Some((105.3, 37.8)),
            pass_end_location: None,
            shot_outcome: Some(ShotOutcome::Goal),
            shot_xg: Some(0.3524),
            pass_goal_assist: false,
        },
    ]
}

#[test]
fn filename_follows_the_download_convention() {
    assert_eq!(
        export_filename("Argentina", "France"),
        "Argentina vs France_events.csv"
    );
}

#[test]
fn csv_has_header_and_one_row_per_event() {
    let events = sample_events();
    let mut buf: Vec<u8> = Vec::new();
    write_events_csv(&mut buf, &events).expect("csv export should succeed");

    let text = String::from_utf8(buf).expect("csv output is utf8");
    let lines: Vec<&str> = text.trim_end().lines().collect();
    assert_eq!(lines.len(), events.len() + 1);
    assert_eq!(lines[0], CSV_HEADER.join(","));

    let pass_cells: Vec<&str> = lines[1].split(',').collect();
    assert_eq!(pass_cells[0], "3869685");
    assert_eq!(pass_cells[1], "Argentina");
    assert_eq!(pass_cells[2], "Lionel Messi");
    assert_eq!(pass_cells[3], "Pass");
    assert_eq!(pass_cells[6], "60;40");
    assert_eq!(pass_cells[7], "80.5;46");
    assert_eq!(pass_cells[10], "false");

    // Optional fields serialize as empty cells, not placeholders.
    let half_start_cells: Vec<&str> = lines[2].split(',').collect();
    assert_eq!(half_start_cells[2], "");
    assert_eq!(half_start_cells[6], "");

    let shot_cells: Vec<&str> = lines[3].split(',').collect();
    assert_eq!(shot_cells[8], "Goal");
    assert_eq!(shot_cells[9], "0.3524");
}

#[test]
fn empty_table_still_writes_the_header() {
    let mut buf: Vec<u8> = Vec::new();
    write_events_csv(&mut buf, &[]).expect("empty export should succeed");
    let text = String::from_utf8(buf).unwrap();
    assert_eq!(text.trim_end(), CSV_HEADER.join(","));
}
