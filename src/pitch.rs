use ratatui::prelude::*;
use ratatui::style::{Color, Style};
use ratatui::symbols::Marker;
use ratatui::text::Span;
use ratatui::widgets::canvas::{Canvas, Circle, Context, Line as CanvasLine};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::aggregate::{
    HeatGrid, PassSegment, ShotPoint, TimelineMark, PITCH_LENGTH, PITCH_WIDTH, normalized,
    xg_bounds,
};
use crate::encodings::{self, MarkerTable, TeamPalette};
use crate::state::{EventType, TeamSide};

const PITCH_X: [f64; 2] = [0.0, PITCH_LENGTH as f64];
const PITCH_Y: [f64; 2] = [0.0, PITCH_WIDTH as f64];

/// Shared empty-state widget: every aggregate view says "no data" instead of
/// failing on an empty filtered set.
pub fn render_no_data(frame: &mut Frame, area: Rect, title: &str) {
    let msg = Paragraph::new("No data available for this selection")
        .style(Style::default().fg(Color::DarkGray))
        .block(Block::default().title(title.to_string()).borders(Borders::ALL));
    frame.render_widget(msg, area);
}

pub fn render_pass_map(frame: &mut Frame, area: Rect, title: &str, segments: &[PassSegment]) {
    let canvas = Canvas::default()
        .block(Block::default().title(title.to_string()).borders(Borders::ALL))
        .marker(Marker::Braille)
        .x_bounds(PITCH_X)
        .y_bounds(PITCH_Y)
        .paint(|ctx| {
            draw_pitch_outline(ctx, encodings::PITCH_LINE_COLOR);
            for seg in segments {
                ctx.draw(&CanvasLine {
                    x1: seg.origin.0 as f64,
                    y1: flip_y(seg.origin.1),
                    x2: seg.end.0 as f64,
                    y2: flip_y(seg.end.1),
                    color: encodings::PASS_COLOR,
                });
            }
            for seg in segments {
                ctx.print(
                    seg.end.0 as f64,
                    flip_y(seg.end.1),
                    Span::styled(">", Style::default().fg(encodings::PASS_COLOR)),
                );
            }
        });
    frame.render_widget(canvas, area);
}

/// Marker glyph and color are both monotonic in xG, normalized over the
/// shared (min, max) scale of the rendered shots.
pub fn render_shot_map(frame: &mut Frame, area: Rect, title: &str, shots: &[ShotPoint]) {
    let bounds = xg_bounds(shots).unwrap_or((0.0, 1.0));
    let canvas = Canvas::default()
        .block(Block::default().title(title.to_string()).borders(Borders::ALL))
        .marker(Marker::Braille)
        .x_bounds(PITCH_X)
        .y_bounds(PITCH_Y)
        .paint(|ctx| {
            draw_pitch_outline(ctx, encodings::PITCH_LINE_COLOR);
            for shot in shots {
                let t = normalized(shot.xg, bounds);
                let glyph = encodings::xg_glyph(t).to_string();
                ctx.print(
                    shot.location.0 as f64,
                    flip_y(shot.location.1),
                    Span::styled(glyph, Style::default().fg(encodings::xg_ramp(t))),
                );
            }
        });
    frame.render_widget(canvas, area);
}

/// Styled-text grid of the binned counts, one text row per bin row, cells
/// colored by the heat ramp. The max bin count goes into the title so the
/// scale is readable.
pub fn render_heatmap(frame: &mut Frame, area: Rect, title: &str, grid: &HeatGrid) {
    let max = grid.max().max(1) as f32;
    let mut lines: Vec<Line> = Vec::with_capacity(grid.bins_y);
    for by in 0..grid.bins_y {
        let mut spans: Vec<Span> = Vec::with_capacity(grid.bins_x);
        for bx in 0..grid.bins_x {
            let t = grid.at(bx, by) as f32 / max;
            spans.push(Span::styled(
                "██",
                Style::default().fg(encodings::heat_ramp(t)),
            ));
        }
        lines.push(Line::from(spans));
    }
    let block_title = format!("{title} (max {} events/cell)", grid.max());
    let widget = Paragraph::new(lines)
        .block(Block::default().title(block_title).borders(Borders::ALL));
    frame.render_widget(widget, area);
}

/// One lane per event type, marks placed at their fractional minute, colored
/// by team and shaped by the marker table.
pub fn render_timeline(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    marks: &[TimelineMark],
    lanes: &[EventType],
    home_team: &str,
    markers: &MarkerTable,
    palette: &TeamPalette,
) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(16), Constraint::Min(10)])
        .split(area);

    let labels: Vec<Line> = lanes
        .iter()
        .map(|kind| Line::from(kind.label().to_string()))
        .collect();
    let label_col = Paragraph::new(labels)
        .block(Block::default().title("Event").borders(Borders::ALL));
    frame.render_widget(label_col, chunks[0]);

    let last_minute = marks
        .last()
        .map(|m| m.minutes as f64)
        .unwrap_or(90.0)
        .max(90.0);
    let lane_count = lanes.len().max(1) as f64;

    let canvas = Canvas::default()
        .block(Block::default().title(title.to_string()).borders(Borders::ALL))
        .marker(Marker::Braille)
        .x_bounds([0.0, last_minute + 1.0])
        .y_bounds([0.0, lane_count])
        .paint(|ctx| {
            for mark in marks {
                let Some(lane) = lanes.iter().position(|k| k == &mark.kind) else {
                    continue;
                };
                // Lane 0 at the top, to line up with the label column.
                let y = lane_count - lane as f64 - 0.5;
                let side = if mark.team == home_team {
                    TeamSide::Home
                } else {
                    TeamSide::Away
                };
                ctx.print(
                    mark.minutes as f64,
                    y,
                    Span::styled(
                        markers.glyph(&mark.kind).to_string(),
                        Style::default().fg(palette.color(side)),
                    ),
                );
            }
        });
    frame.render_widget(canvas, chunks[1]);
}

fn draw_pitch_outline(ctx: &mut Context, color: Color) {
    let (len, wid) = (PITCH_LENGTH as f64, PITCH_WIDTH as f64);

    // Touchlines and goal lines.
    rect(ctx, 0.0, 0.0, len, wid, color);
    // Halfway line and center circle.
    ctx.draw(&CanvasLine {
        x1: len / 2.0,
        y1: 0.0,
        x2: len / 2.0,
        y2: wid,
        color,
    });
    ctx.draw(&Circle {
        x: len / 2.0,
        y: wid / 2.0,
        radius: 10.0,
        color,
    });
    // Penalty areas, StatsBomb coordinates.
    rect(ctx, 0.0, 18.0, 18.0, 62.0, color);
    rect(ctx, len - 18.0, 18.0, len, 62.0, color);
    // Six-yard boxes.
    rect(ctx, 0.0, 30.0, 6.0, 50.0, color);
    rect(ctx, len - 6.0, 30.0, len, 50.0, color);
}

fn rect(ctx: &mut Context, x1: f64, y1: f64, x2: f64, y2: f64, color: Color) {
    ctx.draw(&CanvasLine { x1, y1, x2, y2: y1, color });
    ctx.draw(&CanvasLine { x1, y1: y2, x2, y2, color });
    ctx.draw(&CanvasLine { x1, y1, x2: x1, y2, color });
    ctx.draw(&CanvasLine { x1: x2, y1, x2, y2, color });
}

/// StatsBomb's y axis points down; the canvas points up.
fn flip_y(y: f32) -> f64 {
    (PITCH_WIDTH - y) as f64
}

#[cfg(test)]
mod tests {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use ratatui::buffer::Buffer;

    use super::*;
    use crate::aggregate::TimelineMark;

    fn row_text(buffer: &Buffer, y: u16, cols: std::ops::Range<u16>) -> String {
        cols.map(|x| buffer.get(x, y).symbol().to_string()).collect()
    }

    #[test]
    fn timeline_marks_line_up_with_their_labels() {
        let lanes = [
            EventType::Goal,
            EventType::Shot,
            EventType::FoulCommitted,
            EventType::YellowCard,
            EventType::RedCard,
        ];
        let marks = vec![
            TimelineMark {
                minutes: 10.0,
                kind: EventType::Goal,
                team: "Argentina".to_string(),
            },
            TimelineMark {
                minutes: 70.0,
                kind: EventType::RedCard,
                team: "France".to_string(),
            },
        ];
        // 5 label rows + 2 border rows, so lane rows and label rows coincide.
        let mut terminal = Terminal::new(TestBackend::new(80, 7)).unwrap();
        terminal
            .draw(|frame| {
                render_timeline(
                    frame,
                    frame.size(),
                    "Timeline",
                    &marks,
                    &lanes,
                    "Argentina",
                    &MarkerTable::timeline_default(),
                    &TeamPalette::default_palette(),
                );
            })
            .unwrap();
        let buffer = terminal.backend().buffer();

        let label_row = |label: &str| {
            (0..7)
                .find(|&y| row_text(buffer, y, 0..16).contains(label))
                .unwrap()
        };
        let glyph_row = |glyph: char| {
            (0..7)
                .find(|&y| row_text(buffer, y, 17..79).contains(glyph))
                .unwrap()
        };

        // Labels read top-down in lane order.
        assert!(label_row("Goal") < label_row("Red Card"));
        // The goal mark sits on the Goal row, not mirrored onto the bottom lane.
        assert_eq!(glyph_row('o'), label_row("Goal"));
        assert!(glyph_row('v') > glyph_row('o'));
    }
}
