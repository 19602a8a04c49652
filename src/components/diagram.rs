use bracket_engine::{
    ConnectorPath, Match, MatchStatus, PathStyle, Point, Scene, TeamSlot, Tournament, ViewState,
    ViewTransform,
};
use tui::buffer::Buffer;
use tui::layout::Rect;
use tui::style::{Color, Modifier, Style};
use tui::widgets::Widget;

// ---------------------------------------------------------------------------
// World → terminal projection
// ---------------------------------------------------------------------------

/// World units per terminal cell. A cell is roughly twice as tall as it is
/// wide, so the vertical divisor is double the horizontal one to keep the
/// diagram's aspect ratio on screen.
pub const WORLD_PER_CELL_X: f64 = 8.0;
pub const WORLD_PER_CELL_Y: f64 = 16.0;

/// Map a world point through the view transform into cell coordinates
/// relative to the widget origin. May be negative or past the area; callers
/// clip.
pub fn project(p: Point, t: &ViewTransform) -> (i32, i32) {
    let x = (p.x * t.scale + t.translate_x) / WORLD_PER_CELL_X;
    let y = (p.y * t.scale + t.translate_y) / WORLD_PER_CELL_Y;
    (x.round() as i32, y.round() as i32)
}

/// Terminal area expressed in world units, for scene computation.
pub fn world_container(area: Rect) -> bracket_engine::Size {
    bracket_engine::Size {
        width: area.width as f64 * WORLD_PER_CELL_X,
        height: area.height as f64 * WORLD_PER_CELL_Y,
    }
}

/// One screen pan step (a cell) converted to world pixels at the current
/// scale, so keyboard and mouse drags move the same distance on screen.
pub fn cells_to_world(dx_cells: f64, dy_cells: f64) -> (f64, f64) {
    (dx_cells * WORLD_PER_CELL_X, dy_cells * WORLD_PER_CELL_Y)
}

// ---------------------------------------------------------------------------
// DiagramView widget
// ---------------------------------------------------------------------------

/// Renders a computed scene: connectors first, then match nodes on top.
pub struct DiagramView<'a> {
    pub tournament: &'a Tournament,
    pub scene: &'a Scene,
    pub view: &'a ViewState,
}

impl Widget for DiagramView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 10 || area.height < 3 {
            return;
        }

        let t = &self.view.transform;

        for path in &self.scene.connectors {
            draw_connector(path, t, area, buf);
        }

        for pos in &self.scene.positions {
            let Some(m) = self.tournament.find_match(&pos.match_id) else {
                continue;
            };
            let (x0, y0) = project(pos.origin, t);
            let (x1, y1) = project(
                Point::new(
                    pos.origin.x + pos.size.width,
                    pos.origin.y + pos.size.height,
                ),
                t,
            );
            let selected = self.view.selected_match.as_deref() == Some(m.id.as_str());
            draw_node(
                m,
                x0,
                y0,
                x1,
                y1,
                selected,
                self.view.highlighted_team.as_deref(),
                area,
                buf,
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Connectors
// ---------------------------------------------------------------------------

struct ConnectorChars {
    horizontal: char,
    vertical: char,
}

const SOLID: ConnectorChars = ConnectorChars {
    horizontal: '─',
    vertical: '│',
};
const DASHED: ConnectorChars = ConnectorChars {
    horizontal: '╌',
    vertical: '┆',
};

/// Draw one path as an elbow: out from the source, a vertical run at the
/// midpoint column, then into the destination.
fn draw_connector(path: &ConnectorPath, t: &ViewTransform, area: Rect, buf: &mut Buffer) {
    let (fx, fy) = project(path.from, t);
    let (tx, ty) = project(path.to, t);

    let style = match path.style {
        PathStyle::Solid => Style::default().fg(Color::DarkGray),
        PathStyle::Dashed => Style::default().fg(Color::Magenta),
    };
    let chars = match path.style {
        PathStyle::Solid => &SOLID,
        PathStyle::Dashed => &DASHED,
    };

    if fy == ty {
        for x in fx.min(tx)..=fx.max(tx) {
            put_char(buf, area, x, fy, chars.horizontal, style);
        }
        return;
    }

    let mid = (fx + tx) / 2;
    for x in fx.min(mid)..=fx.max(mid) {
        put_char(buf, area, x, fy, chars.horizontal, style);
    }
    for y in fy.min(ty)..=fy.max(ty) {
        put_char(buf, area, mid, y, chars.vertical, style);
    }
    for x in mid.min(tx)..=mid.max(tx) {
        put_char(buf, area, x, ty, chars.horizontal, style);
    }

    // Corner glyphs at the two bends.
    let (first, second) = if (ty > fy) == (tx >= fx) {
        ('┐', '└')
    } else {
        ('┘', '┌')
    };
    if path.style == PathStyle::Solid {
        put_char(buf, area, mid, fy, first, style);
        put_char(buf, area, mid, ty, second, style);
    }
}

// ---------------------------------------------------------------------------
// Match nodes
// ---------------------------------------------------------------------------

/// Rows per full-size node: top-team line, status line, bottom-team line.
const NODE_ROWS: i32 = 3;

#[allow(clippy::too_many_arguments)]
fn draw_node(
    m: &Match,
    x0: i32,
    y0: i32,
    x1: i32,
    y1: i32,
    selected: bool,
    highlighted_team: Option<&str>,
    area: Rect,
    buf: &mut Buffer,
) {
    let width = (x1 - x0).max(1) as usize;
    let height = y1 - y0;

    let base_style = if selected {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };

    if height < NODE_ROWS || width < 10 {
        // Too small for three rows: one compact line at the vertical center.
        let line = compact_line(m, width);
        put_string(buf, area, x0, (y0 + y1) / 2, &line, base_style);
        return;
    }

    // Center the three rows within the projected node height.
    let mid = y0 + height / 2;
    for (dy, slot_idx) in [(-1i32, 0u8), (0, 1), (1, 2)] {
        let y = mid + dy;
        let content = match slot_idx {
            0 => format_team_line(&m.slots[0], m.score.map(|(a, _)| a), width),
            2 => format_team_line(&m.slots[1], m.score.map(|(_, b)| b), width),
            _ => format_status_line(m, width),
        };

        let style = match slot_idx {
            1 => {
                if m.is_live() {
                    Style::default().fg(Color::Yellow)
                } else {
                    Style::default().fg(Color::DarkGray)
                }
            }
            _ => {
                let slot = &m.slots[if slot_idx == 0 { 0 } else { 1 }];
                let is_winner = slot
                    .team
                    .as_ref()
                    .zip(m.winner_id.as_deref())
                    .is_some_and(|(team, wid)| team.id == wid);
                let is_highlighted = slot
                    .team
                    .as_ref()
                    .zip(highlighted_team)
                    .is_some_and(|(team, hid)| team.id == hid);
                if is_highlighted {
                    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
                } else if is_winner {
                    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
                } else {
                    base_style
                }
            }
        };

        put_string(buf, area, x0, y, &content, style);
    }
}

/// `"[seed] [name       ] [score]"`, padded to exactly `width` chars.
fn format_team_line(slot: &TeamSlot, score: Option<u16>, width: usize) -> String {
    let seed = if slot.seed > 0 {
        format!("{:2}", slot.seed)
    } else {
        "  ".to_string()
    };
    let score_str = match score {
        Some(s) => format!("{s:3}"),
        None => "   ".to_string(),
    };
    let name_w = width.saturating_sub(8);
    let name: String = slot.label().chars().take(name_w).collect();
    format!("{seed} {name:<name_w$} {score_str} ")
}

fn format_status_line(m: &Match, width: usize) -> String {
    let raw = match m.status {
        MatchStatus::Scheduled => m
            .scheduled_at
            .map(|t| format!(" {}", t.format("%m/%d %H:%M")))
            .unwrap_or_else(|| " Scheduled".to_string()),
        MatchStatus::Active => " LIVE".to_string(),
        MatchStatus::Completed => " FINAL".to_string(),
        MatchStatus::Cancelled => " CANCELLED".to_string(),
    };
    let padded = format!("{raw:<width$}");
    if padded.chars().count() > width {
        padded.chars().take(width).collect()
    } else {
        padded
    }
}

/// Single-row fallback: `"A vs B"` clipped to the node width.
fn compact_line(m: &Match, width: usize) -> String {
    let line = format!("{} vs {}", m.slots[0].label(), m.slots[1].label());
    line.chars().take(width.max(4)).collect()
}

// ---------------------------------------------------------------------------
// Buffer helpers
// ---------------------------------------------------------------------------

fn put_char(buf: &mut Buffer, area: Rect, x: i32, y: i32, ch: char, style: Style) {
    if x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as u16, y as u16);
    if x >= area.width || y >= area.height {
        return;
    }
    if let Some(cell) = buf.cell_mut((area.x + x, area.y + y)) {
        cell.set_char(ch);
        cell.set_style(style);
    }
}

fn put_string(buf: &mut Buffer, area: Rect, x: i32, y: i32, text: &str, style: Style) {
    for (i, ch) in text.chars().enumerate() {
        put_char(buf, area, x + i as i32, y, ch, style);
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
