use crate::app::MenuItem;
use bracket_engine::{Scene, Size, Tournament, ViewState};

use crate::state::app_settings::AppSettings;

// ---------------------------------------------------------------------------
// Diagram state
// ---------------------------------------------------------------------------

/// Everything needed to render one tournament diagram: the loaded
/// tournaments, the computed scene, and the user's view of it.
#[derive(Debug, Default)]
pub struct DiagramState {
    pub tournaments: Vec<Tournament>,
    /// Index into `tournaments`.
    pub selected: usize,
    /// Output of the last scene computation. None until the first draw
    /// supplies a container size.
    pub scene: Option<Scene>,
    pub view: ViewState,
    /// Container size in world units, derived from the terminal area.
    pub container: Size,
    /// Match data or layout options changed; recompute before drawing.
    pub dirty: bool,
    /// Refit the view to the new scene instead of preserving the transform.
    pub needs_fit: bool,
}

impl DiagramState {
    pub fn load(&mut self, tournaments: Vec<Tournament>) {
        self.tournaments = tournaments;
        self.selected = 0;
        self.scene = None;
        self.dirty = true;
        self.needs_fit = true;
    }

    pub fn current(&self) -> Option<&Tournament> {
        self.tournaments.get(self.selected)
    }

    pub fn current_mut(&mut self) -> Option<&mut Tournament> {
        self.tournaments.get_mut(self.selected)
    }

    pub fn select_next_tournament(&mut self) {
        if !self.tournaments.is_empty() {
            self.selected = (self.selected + 1) % self.tournaments.len();
            self.dirty = true;
            self.needs_fit = true;
        }
    }

    pub fn select_prev_tournament(&mut self) {
        if !self.tournaments.is_empty() {
            self.selected = (self.selected + self.tournaments.len() - 1) % self.tournaments.len();
            self.dirty = true;
            self.needs_fit = true;
        }
    }

    /// Recompute the scene if the inputs changed since the last draw.
    /// Called right before rendering, once the container size is known.
    pub fn ensure_scene(&mut self, container: Size, settings: &AppSettings) {
        if container.width != self.container.width || container.height != self.container.height {
            self.container = container;
            self.dirty = true;
        }
        if !self.dirty {
            return;
        }
        self.dirty = false;

        let Some(tournament) = self.tournaments.get(self.selected) else {
            self.scene = None;
            return;
        };

        match Scene::compute(
            &tournament.matches,
            tournament.topology,
            &settings.layout,
            self.container,
        ) {
            Ok(scene) => {
                if self.needs_fit {
                    self.needs_fit = false;
                    self.view = ViewState::fitted(scene.fit);
                } else {
                    self.view = std::mem::take(&mut self.view).retain_valid(&tournament.matches);
                }
                self.scene = Some(scene);
            }
            Err(e) => {
                log::error!("scene computation failed: {e}");
                self.scene = None;
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Root app state
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct AppState {
    pub active_tab: MenuItem,
    pub previous_tab: MenuItem,
    pub show_logs: bool,
    pub last_error: Option<String>,
    /// One-line status shown at the bottom of the screen.
    pub status: Option<String>,
    pub diagram: DiagramState,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }
}
