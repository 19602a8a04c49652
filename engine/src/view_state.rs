use crate::config::{LayoutConfig, ZOOM_STEP};
use crate::viewport::ViewTransform;
use crate::{Match, Point};
use serde::{Deserialize, Serialize};

/// What the current interaction gesture is doing. Zoom is modeled as a state
/// of its own so a rendering layer that animates zoom steps can tell an
/// in-flight zoom apart from rest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub enum InteractionMode {
    #[default]
    Idle,
    Panning {
        last: Point,
    },
    Zooming,
}

/// Interactive pan/zoom/selection state. Transitions are value-in/value-out
/// and synchronous; callers thread the state through instead of mutating
/// ambient fields, which keeps every transition independently testable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub transform: ViewTransform,
    pub selected_match: Option<String>,
    pub highlighted_team: Option<String>,
    pub mode: InteractionMode,
}

impl ViewState {
    /// Fresh state seeded with a fitted transform.
    pub fn fitted(transform: ViewTransform) -> Self {
        Self {
            transform,
            ..Self::default()
        }
    }

    /// Multiply scale by the zoom step, clamped to the configured bounds.
    /// Ignored while a pan gesture is in flight.
    pub fn zoom_in(self, config: &LayoutConfig) -> Self {
        self.zoom_by(ZOOM_STEP, config)
    }

    /// Divide scale by the zoom step, clamped to the configured bounds.
    pub fn zoom_out(self, config: &LayoutConfig) -> Self {
        self.zoom_by(1.0 / ZOOM_STEP, config)
    }

    fn zoom_by(mut self, factor: f64, config: &LayoutConfig) -> Self {
        match self.mode {
            InteractionMode::Idle | InteractionMode::Zooming => {
                self.transform.scale = config.clamp_zoom(self.transform.scale * factor);
                self.mode = InteractionMode::Zooming;
                self
            }
            InteractionMode::Panning { .. } => self,
        }
    }

    /// Return to idle once any zoom animation has settled.
    pub fn settle_zoom(mut self) -> Self {
        if self.mode == InteractionMode::Zooming {
            self.mode = InteractionMode::Idle;
        }
        self
    }

    pub fn pan_start(mut self, at: Point) -> Self {
        match self.mode {
            InteractionMode::Idle | InteractionMode::Zooming => {
                self.mode = InteractionMode::Panning { last: at };
                self
            }
            InteractionMode::Panning { .. } => self,
        }
    }

    /// Accumulate the translate delta. Only meaningful mid-gesture; a move
    /// without a preceding start is a no-op.
    pub fn pan_move(mut self, at: Point) -> Self {
        if let InteractionMode::Panning { last } = self.mode {
            self.transform.translate_x += at.x - last.x;
            self.transform.translate_y += at.y - last.y;
            self.mode = InteractionMode::Panning { last: at };
        }
        self
    }

    pub fn pan_end(mut self) -> Self {
        if matches!(self.mode, InteractionMode::Panning { .. }) {
            self.mode = InteractionMode::Idle;
        }
        self
    }

    /// Adopt the fitter's optimal transform, clear selection and highlight,
    /// and force idle. Valid from any state.
    pub fn reset_view(self, fit: ViewTransform) -> Self {
        Self {
            transform: fit,
            selected_match: None,
            highlighted_team: None,
            mode: InteractionMode::Idle,
        }
    }

    /// Pure data mutation; pan/zoom state is untouched.
    pub fn select_match(mut self, match_id: Option<String>) -> Self {
        self.selected_match = match_id;
        self
    }

    pub fn highlight_team(mut self, team_id: Option<String>) -> Self {
        self.highlighted_team = team_id;
        self
    }

    /// Drop a selection or highlight that no longer resolves against the
    /// current match list. Invoked when match data or topology changes.
    pub fn retain_valid(mut self, matches: &[Match]) -> Self {
        if let Some(id) = self.selected_match.as_deref()
            && !matches.iter().any(|m| m.id == id)
        {
            self.selected_match = None;
        }
        if let Some(team) = self.highlighted_team.as_deref()
            && !matches.iter().any(|m| {
                m.slots
                    .iter()
                    .any(|s| s.team.as_ref().is_some_and(|t| t.id == team))
            })
        {
            self.highlighted_team = None;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_MAX_ZOOM, DEFAULT_MIN_ZOOM};
    use crate::structure::tests::single_elim_8;

    #[test]
    fn test_repeated_zoom_in_clamps_at_max() {
        let config = LayoutConfig::default();
        let mut state = ViewState::default();
        for _ in 0..50 {
            state = state.zoom_in(&config).settle_zoom();
        }
        assert_eq!(state.transform.scale, DEFAULT_MAX_ZOOM);
    }

    #[test]
    fn test_repeated_zoom_out_clamps_at_min() {
        let config = LayoutConfig::default();
        let mut state = ViewState::default();
        for _ in 0..50 {
            state = state.zoom_out(&config).settle_zoom();
        }
        assert_eq!(state.transform.scale, DEFAULT_MIN_ZOOM);
    }

    #[test]
    fn test_pan_cycle_accumulates_then_stops() {
        let state = ViewState::default()
            .pan_start(Point::new(10.0, 10.0))
            .pan_move(Point::new(25.0, 4.0))
            .pan_move(Point::new(30.0, 0.0))
            .pan_end();

        assert_eq!(state.transform.translate_x, 20.0);
        assert_eq!(state.transform.translate_y, -10.0);
        assert_eq!(state.mode, InteractionMode::Idle);

        // Moves after the gesture ends change nothing.
        let after = state.clone().pan_move(Point::new(100.0, 100.0));
        assert_eq!(after, state);
    }

    #[test]
    fn test_zoom_ignored_while_panning() {
        let config = LayoutConfig::default();
        let state = ViewState::default()
            .pan_start(Point::default())
            .zoom_in(&config);
        assert_eq!(state.transform.scale, 1.0);
        assert!(matches!(state.mode, InteractionMode::Panning { .. }));
    }

    #[test]
    fn test_reset_clears_selection_from_any_mode() {
        let fit = ViewTransform {
            scale: 0.5,
            translate_x: 12.0,
            translate_y: 34.0,
        };
        for state in [
            ViewState::default().select_match(Some("m1".into())),
            ViewState::default()
                .highlight_team(Some("t1".into()))
                .pan_start(Point::default()),
            ViewState::default().zoom_in(&LayoutConfig::default()),
        ] {
            let reset = state.reset_view(fit);
            assert_eq!(reset.transform, fit);
            assert_eq!(reset.selected_match, None);
            assert_eq!(reset.highlighted_team, None);
            assert_eq!(reset.mode, InteractionMode::Idle);
        }
    }

    #[test]
    fn test_selection_does_not_touch_pan_zoom() {
        let config = LayoutConfig::default();
        let zoomed = ViewState::default().zoom_in(&config).settle_zoom();
        let selected = zoomed
            .clone()
            .select_match(Some("m1".into()))
            .highlight_team(Some("t1".into()));
        assert_eq!(selected.transform, zoomed.transform);
        assert_eq!(selected.mode, zoomed.mode);
    }

    #[test]
    fn test_retain_valid_clears_stale_references() {
        let matches = single_elim_8();
        let state = ViewState::default()
            .select_match(Some("r1m0".into()))
            .highlight_team(Some("ghost-team".into()))
            .retain_valid(&matches);
        assert_eq!(state.selected_match.as_deref(), Some("r1m0"));
        assert_eq!(state.highlighted_team, None);

        let gone = state.select_match(Some("no-such-match".into())).retain_valid(&matches);
        assert_eq!(gone.selected_match, None);
    }
}
