use crate::components::diagram::cells_to_world;
use crate::fixtures;
use crate::state::app_settings::AppSettings;
use crate::state::app_state::AppState;
use bracket_engine::{LayoutConfig, Orientation, Point, Size};

#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub enum MenuItem {
    #[default]
    Diagram,
    Help,
}

pub struct App {
    pub settings: AppSettings,
    pub state: AppState,
}

impl App {
    pub fn new() -> Self {
        let settings = AppSettings::load();

        let app = Self {
            state: AppState::new(),
            settings,
        };

        if let Some(level) = app.settings.level_filter() {
            log::set_max_level(level);
            tui_logger::set_default_level(level);
        }

        app
    }

    // -----------------------------------------------------------------------
    // Startup and ticks — called from main_ui_loop
    // -----------------------------------------------------------------------

    pub fn on_started(&mut self) {
        let mut tournaments = fixtures::demo_tournaments();

        if let Ok(path) = std::env::var("BRKT_TOURNAMENT_JSON")
            && !path.trim().is_empty()
        {
            match fixtures::load_snapshot(&path) {
                Ok(tournament) => {
                    log::info!("loaded tournament snapshot from {path}");
                    tournaments.insert(0, tournament);
                }
                Err(e) => self.on_error(format!("{e:#}")),
            }
        }

        self.state.diagram.load(tournaments);
    }

    pub fn on_tick(&mut self) {
        if let Some(tournament) = self.state.diagram.current_mut() {
            fixtures::advance_demo(tournament);
            self.state.diagram.dirty = true;
        }
        // A zoom step from the previous frame has rendered by now.
        self.state.diagram.view = self.state.diagram.view.clone().settle_zoom();
    }

    pub fn on_error(&mut self, message: String) {
        log::error!("{message}");
        self.state.last_error = Some(message);
    }

    /// Recompute the scene for the given container if anything changed.
    pub fn ensure_scene(&mut self, container: Size) {
        self.state.diagram.ensure_scene(container, &self.settings);
    }

    /// Effective config of the current scene, for zoom clamping.
    fn layout_config(&self) -> LayoutConfig {
        self.state
            .diagram
            .scene
            .as_ref()
            .map(|s| s.config)
            .unwrap_or_default()
    }

    // -----------------------------------------------------------------------
    // View control — pan, zoom, reset
    // -----------------------------------------------------------------------

    pub fn zoom_in(&mut self) {
        let config = self.layout_config();
        self.state.diagram.view = self.state.diagram.view.clone().zoom_in(&config);
    }

    pub fn zoom_out(&mut self) {
        let config = self.layout_config();
        self.state.diagram.view = self.state.diagram.view.clone().zoom_out(&config);
    }

    /// One keyboard pan step: a whole gesture in one key press.
    pub fn pan_step(&mut self, dx_cells: f64, dy_cells: f64) {
        let (dx, dy) = cells_to_world(dx_cells, dy_cells);
        self.state.diagram.view = self
            .state
            .diagram
            .view
            .clone()
            .pan_start(Point::default())
            .pan_move(Point::new(dx, dy))
            .pan_end();
    }

    pub fn pan_grab(&mut self, col: u16, row: u16) {
        self.state.diagram.view = self
            .state
            .diagram
            .view
            .clone()
            .pan_start(mouse_world(col, row));
    }

    pub fn pan_drag(&mut self, col: u16, row: u16) {
        self.state.diagram.view = self
            .state
            .diagram
            .view
            .clone()
            .pan_move(mouse_world(col, row));
    }

    pub fn pan_release(&mut self) {
        self.state.diagram.view = self.state.diagram.view.clone().pan_end();
    }

    pub fn reset_view(&mut self) {
        if let Some(scene) = self.state.diagram.scene.as_ref() {
            self.state.diagram.view = self.state.diagram.view.clone().reset_view(scene.fit);
        }
    }

    // -----------------------------------------------------------------------
    // Selection and highlight
    // -----------------------------------------------------------------------

    pub fn select_next_match(&mut self) {
        self.select_match_offset(1);
    }

    pub fn select_prev_match(&mut self) {
        self.select_match_offset(-1);
    }

    /// Step the selection through the scene's positions in layout order,
    /// wrapping at both ends.
    fn select_match_offset(&mut self, offset: isize) {
        let Some(scene) = self.state.diagram.scene.as_ref() else {
            return;
        };
        if scene.positions.is_empty() {
            return;
        }
        let len = scene.positions.len() as isize;
        let next = match self.state.diagram.view.selected_match.as_deref() {
            Some(id) => scene
                .positions
                .iter()
                .position(|p| p.match_id == id)
                .map(|i| (i as isize + offset).rem_euclid(len))
                .unwrap_or(0),
            None => {
                if offset >= 0 {
                    0
                } else {
                    len - 1
                }
            }
        };
        let id = scene.positions[next as usize].match_id.clone();
        self.state.diagram.view = self.state.diagram.view.clone().select_match(Some(id));
    }

    /// Cycle the team highlight through the selected match's two slots,
    /// then off.
    pub fn cycle_highlight(&mut self) {
        let diagram = &self.state.diagram;
        let Some(m) = diagram
            .view
            .selected_match
            .as_deref()
            .and_then(|id| diagram.current().and_then(|t| t.find_match(id)))
        else {
            return;
        };

        let ids: Vec<&str> = m
            .slots
            .iter()
            .filter_map(|s| s.team.as_ref().map(|t| t.id.as_str()))
            .collect();
        let next = match diagram.view.highlighted_team.as_deref() {
            None => ids.first().copied(),
            Some(current) => match ids.iter().position(|id| *id == current) {
                Some(i) => ids.get(i + 1).copied(),
                None => ids.first().copied(),
            },
        };
        self.state.diagram.view = self
            .state
            .diagram
            .view
            .clone()
            .highlight_team(next.map(str::to_string));
    }

    // -----------------------------------------------------------------------
    // Tournament and layout switching
    // -----------------------------------------------------------------------

    pub fn next_tournament(&mut self) {
        self.state.diagram.select_next_tournament();
        self.announce_tournament();
    }

    pub fn prev_tournament(&mut self) {
        self.state.diagram.select_prev_tournament();
        self.announce_tournament();
    }

    fn announce_tournament(&mut self) {
        if let Some(t) = self.state.diagram.current() {
            self.state.status = Some(format!("{} ({})", t.name, t.topology.label()));
        }
    }

    pub fn toggle_orientation(&mut self) {
        let flipped = match self.settings.layout.orientation {
            Some(Orientation::TopToBottom) => Orientation::LeftToRight,
            _ => Orientation::TopToBottom,
        };
        self.settings.layout.orientation = Some(flipped);
        self.state.diagram.dirty = true;
        self.state.diagram.needs_fit = true;
    }

    // -----------------------------------------------------------------------
    // Tab management
    // -----------------------------------------------------------------------

    pub fn update_tab(&mut self, next: MenuItem) {
        if self.state.active_tab == next {
            return;
        }
        self.state.previous_tab = self.state.active_tab;
        self.state.active_tab = next;
    }

    pub fn exit_help(&mut self) {
        if self.state.active_tab == MenuItem::Help {
            self.state.active_tab = self.state.previous_tab;
        }
    }

    pub fn toggle_show_logs(&mut self) {
        self.state.show_logs = !self.state.show_logs;
    }

    pub fn toggle_full_screen(&mut self) {
        self.settings.full_screen = !self.settings.full_screen;
    }
}

/// Mouse position in world translate units. Pan deltas are differences of
/// these, so only the cell-to-world ratio matters, not the origin.
fn mouse_world(col: u16, row: u16) -> Point {
    let (x, y) = cells_to_world(col as f64, row as f64);
    Point::new(x, y)
}
