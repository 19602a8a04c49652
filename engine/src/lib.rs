pub mod config;
pub mod connector;
pub mod layout;
pub mod scene;
pub mod structure;
pub mod view_state;
pub mod viewport;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use config::{ConfigError, LayoutConfig, LayoutOptions, Orientation};
pub use connector::{ConnectorPath, PathStyle, route_connectors};
pub use layout::{LayoutStrategy, MatchPosition, layout, strategy_for};
pub use scene::Scene;
pub use structure::{
    EdgeKind, ProgressionEdge, ProgressionGraph, StructureWarning, resolve_structure,
};
pub use view_state::{InteractionMode, ViewState};
pub use viewport::{
    ViewBox, ViewTransform, compute_optimal_zoom, compute_responsive_dimensions, compute_view_box,
};

// ---------------------------------------------------------------------------
// Geometry primitives
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

// ---------------------------------------------------------------------------
// Domain types — read model the layout pipeline consumes, never mutates
// ---------------------------------------------------------------------------

/// Structural family of a tournament's pairing scheme. Each variant maps to
/// one layout strategy via [`layout::strategy_for`].
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum Topology {
    #[default]
    SingleElimination,
    DoubleElimination,
    Swiss,
    RoundRobin,
    Barrage,
}

impl Topology {
    pub fn label(&self) -> &'static str {
        match self {
            Topology::SingleElimination => "Single Elimination",
            Topology::DoubleElimination => "Double Elimination",
            Topology::Swiss => "Swiss",
            Topology::RoundRobin => "Round Robin",
            Topology::Barrage => "Barrage",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Topology::SingleElimination => Topology::DoubleElimination,
            Topology::DoubleElimination => Topology::Swiss,
            Topology::Swiss => Topology::RoundRobin,
            Topology::RoundRobin => Topology::Barrage,
            Topology::Barrage => Topology::SingleElimination,
        }
    }
}

/// Sub-division of a double-elimination draw. `Main` is the untagged segment
/// used by every other topology.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
pub enum Segment {
    #[default]
    Main,
    Winner,
    Loser,
    GrandFinal,
}

impl Segment {
    pub fn label(&self) -> &'static str {
        match self {
            Segment::Main => "Bracket",
            Segment::Winner => "Winner Bracket",
            Segment::Loser => "Loser Bracket",
            Segment::GrandFinal => "Grand Final",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchStatus {
    #[default]
    Scheduled,
    Active,
    Completed,
    Cancelled,
}

impl MatchStatus {
    /// Lifecycle: scheduled → active → completed, or cancelled from either
    /// of the two prior states. Completed and cancelled are terminal.
    pub fn can_transition(self, to: MatchStatus) -> bool {
        matches!(
            (self, to),
            (MatchStatus::Scheduled, MatchStatus::Active)
                | (MatchStatus::Active, MatchStatus::Completed)
                | (MatchStatus::Scheduled, MatchStatus::Cancelled)
                | (MatchStatus::Active, MatchStatus::Cancelled)
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: String,
    pub name: String,
    pub short_name: String,
}

/// One side of a match. `team: None` means the slot is still TBD; the
/// placeholder carries a human label like "Winner of M3".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamSlot {
    /// 0 = unseeded.
    #[serde(default)]
    pub seed: u16,
    #[serde(default)]
    pub team: Option<Team>,
    #[serde(default)]
    pub placeholder: Option<String>,
}

impl TeamSlot {
    pub fn label(&self) -> &str {
        self.team
            .as_ref()
            .map(|t| t.short_name.as_str())
            .or(self.placeholder.as_deref())
            .unwrap_or("TBD")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: String,
    /// 1-based round number within the match's segment.
    pub round: u32,
    #[serde(default)]
    pub segment: Segment,
    pub slots: [TeamSlot; 2],
    #[serde(default)]
    pub status: MatchStatus,
    /// (slot-0 score, slot-1 score).
    #[serde(default)]
    pub score: Option<(u16, u16)>,
    #[serde(default)]
    pub winner_id: Option<String>,
    /// Marks membership in a barrage placement stage.
    #[serde(default)]
    pub placement: bool,
    #[serde(default)]
    pub court: Option<String>,
    #[serde(default)]
    pub scheduled_at: Option<DateTime<Utc>>,
}

impl Match {
    pub fn is_live(&self) -> bool {
        self.status == MatchStatus::Active
    }

    pub fn winner(&self) -> Option<&Team> {
        let winner_id = self.winner_id.as_deref()?;
        self.slots
            .iter()
            .filter_map(|s| s.team.as_ref())
            .find(|t| t.id == winner_id)
    }

    /// Slot index (0 or 1) of the winning team, if the winner is known.
    pub fn winner_slot(&self) -> Option<usize> {
        let winner_id = self.winner_id.as_deref()?;
        self.slots
            .iter()
            .position(|s| s.team.as_ref().is_some_and(|t| t.id == winner_id))
    }

    /// Slot index of the losing team, if the winner is known.
    pub fn loser_slot(&self) -> Option<usize> {
        self.winner_slot().map(|w| 1 - w)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tournament {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub topology: Topology,
    #[serde(default)]
    pub matches: Vec<Match>,
}

impl Tournament {
    pub fn find_match(&self, match_id: &str) -> Option<&Match> {
        self.matches.iter().find(|m| m.id == match_id)
    }
}
