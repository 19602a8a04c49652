use tui::backend::Backend;
use tui::layout::{Alignment, Constraint, Layout, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::Line;
use tui::widgets::{Block, BorderType, Borders, Paragraph, Tabs};
use tui::{Frame, Terminal};
use tui_logger::TuiLoggerWidget;

use crate::app::{App, MenuItem};
use crate::components::diagram::{DiagramView, world_container};
use crate::ui::layout::LayoutAreas;

static TABS: &[&str; 2] = &["Diagram", "Help"];

pub fn draw<B>(terminal: &mut Terminal<B>, app: &mut App)
where
    B: Backend,
{
    let current_size = terminal.size().unwrap_or_default();
    if current_size.width <= 10 || current_size.height <= 10 {
        return;
    }

    let mut layout = LayoutAreas::new(current_size);

    terminal
        .draw(|f| {
            layout.update(f.area(), app.settings.full_screen);

            if !app.settings.full_screen {
                draw_tabs(f, layout.tab_bar, app);
            }

            match app.state.active_tab {
                MenuItem::Diagram => draw_diagram(f, layout.main, app),
                MenuItem::Help => draw_help(f, layout.main),
            }

            if !app.settings.full_screen {
                draw_status(f, layout.status, app);
            }
        })
        .unwrap();
}

pub fn default_border<'a>(color: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

fn draw_tabs(f: &mut Frame, tab_bar: [Rect; 2], app: &App) {
    let style = Style::default().fg(Color::White);
    let border_type = BorderType::Rounded;

    let tab_index = match app.state.active_tab {
        MenuItem::Diagram => 0,
        MenuItem::Help => 1,
    };

    let titles: Vec<Line> = TABS.iter().map(|t| Line::from(*t)).collect();
    let tabs = Tabs::new(titles)
        .block(
            Block::default()
                .borders(Borders::LEFT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .highlight_style(Style::default().add_modifier(Modifier::UNDERLINED))
        .select(tab_index)
        .style(style);
    f.render_widget(tabs, tab_bar[0]);

    let help = Paragraph::new("Help: ? ")
        .alignment(Alignment::Right)
        .block(
            Block::default()
                .borders(Borders::RIGHT | Borders::BOTTOM | Borders::TOP)
                .border_type(border_type),
        )
        .style(style);
    f.render_widget(help, tab_bar[1]);
}

fn draw_diagram(f: &mut Frame, area: Rect, app: &mut App) {
    let mut diagram_area = area;
    let mut log_area: Option<Rect> = None;
    if app.state.show_logs && area.width >= 80 {
        let [left, right] =
            Layout::horizontal([Constraint::Percentage(70), Constraint::Percentage(30)])
                .areas(area);
        diagram_area = left;
        log_area = Some(right);
    }

    let title = app
        .state
        .diagram
        .current()
        .map(|t| format!(" {} ", t.name))
        .unwrap_or_else(|| " Diagram ".to_string());
    let block = default_border(Color::White).title(title);
    let inner = block.inner(diagram_area);
    f.render_widget(block, diagram_area);

    if app.state.diagram.tournaments.is_empty() {
        let msg = app
            .state
            .last_error
            .clone()
            .unwrap_or_else(|| "No tournament loaded".to_string());
        f.render_widget(
            Paragraph::new(msg)
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center),
            inner,
        );
        return;
    }

    let [header, key_legend, content] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Fill(1),
    ])
    .areas(inner);

    app.ensure_scene(world_container(content));

    let diagram = &app.state.diagram;
    let header_text = match (diagram.current(), diagram.scene.as_ref()) {
        (Some(t), Some(scene)) => {
            let zoom = (diagram.view.transform.scale * 100.0).round();
            let warnings = if scene.warnings.is_empty() {
                String::new()
            } else {
                format!("  |  {} structure warnings", scene.warnings.len())
            };
            format!(
                "{}  |  {} matches  |  zoom {zoom:.0}%{warnings}",
                t.topology.label(),
                scene.positions.len(),
            )
        }
        (Some(t), None) => t.topology.label().to_string(),
        _ => String::new(),
    };
    f.render_widget(
        Paragraph::new(header_text).style(Style::default().fg(Color::Gray)),
        header,
    );
    f.render_widget(
        Paragraph::new("Keys: Tab=next  +/-=zoom  hjkl=pan  r=reset  Enter=select  t=team  o=flip")
            .style(Style::default().fg(Color::DarkGray)),
        key_legend,
    );

    match (diagram.current(), diagram.scene.as_ref()) {
        (Some(tournament), Some(scene)) => {
            f.render_widget(
                DiagramView {
                    tournament,
                    scene,
                    view: &diagram.view,
                },
                content,
            );
        }
        _ => {
            let msg = app
                .state
                .last_error
                .clone()
                .unwrap_or_else(|| "Layout failed, check logs (\")".to_string());
            f.render_widget(
                Paragraph::new(msg)
                    .style(Style::default().fg(Color::Red))
                    .alignment(Alignment::Center),
                content,
            );
        }
    }

    if let Some(logs) = log_area {
        draw_logs(f, logs);
    }
}

fn draw_logs(f: &mut Frame, area: Rect) {
    let widget = TuiLoggerWidget::default()
        .block(default_border(Color::DarkGray).title(" Logs "))
        .style_error(Style::default().fg(Color::Red))
        .style_warn(Style::default().fg(Color::Yellow))
        .style_info(Style::default().fg(Color::Gray))
        .style_debug(Style::default().fg(Color::DarkGray))
        .style_trace(Style::default().fg(Color::DarkGray));
    f.render_widget(widget, area);
}

fn draw_help(f: &mut Frame, area: Rect) {
    let block = default_border(Color::DarkGray).title(" Help ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let text = "\
q           quit
1           diagram tab
?           this help (Esc to close)

Tab / n     next tournament
Shift-Tab/p previous tournament
o           flip orientation

+ / -       zoom in / out
scroll      zoom at the mouse wheel
h j k l     pan (arrows too)
drag        pan with the mouse
r / 0       reset view to fit

Enter / ]   select next match
[           select previous match
t           cycle team highlight

f           full screen
\"           toggle log pane";
    f.render_widget(
        Paragraph::new(text).style(Style::default().fg(Color::Gray)),
        inner,
    );
}

fn draw_status(f: &mut Frame, area: Rect, app: &App) {
    let (text, style) = if let Some(err) = app.state.last_error.as_deref() {
        (err.to_string(), Style::default().fg(Color::Red))
    } else if let Some(status) = app.state.status.as_deref() {
        (status.to_string(), Style::default().fg(Color::Gray))
    } else {
        let selected = app
            .state
            .diagram
            .view
            .selected_match
            .as_deref()
            .and_then(|id| app.state.diagram.current().and_then(|t| t.find_match(id)));
        match selected {
            Some(m) => (
                format!(
                    "{} vs {}  [{}]{}",
                    m.slots[0].label(),
                    m.slots[1].label(),
                    m.segment.label(),
                    m.court
                        .as_deref()
                        .map(|c| format!("  {c}"))
                        .unwrap_or_default(),
                ),
                Style::default().fg(Color::Gray),
            ),
            None => (String::new(), Style::default()),
        }
    };
    f.render_widget(Paragraph::new(text).style(style), area);
}
