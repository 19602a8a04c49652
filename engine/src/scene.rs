use crate::config::{ConfigError, LayoutConfig, LayoutOptions, VIEW_PADDING};
use crate::connector::{ConnectorPath, route_connectors};
use crate::layout::{MatchPosition, strategy_for};
use crate::structure::{StructureWarning, group_rounds, resolve_structure, segment_rounds};
use crate::viewport::{ViewBox, ViewTransform, compute_responsive_dimensions, compute_view_box};
use crate::{Match, Segment, Size, Topology};
use log::debug;
use serde::{Deserialize, Serialize};

/// Composed output of one full pipeline run: resolve, lay out, route, fit.
/// Everything is derived; callers replace the whole value on every input
/// change rather than patching pieces of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub positions: Vec<MatchPosition>,
    pub connectors: Vec<ConnectorPath>,
    pub view_box: ViewBox,
    /// Transform that fits and centers the bracket in the container.
    pub fit: ViewTransform,
    pub warnings: Vec<StructureWarning>,
    /// The merged config after the responsive pre-pass, so consumers can
    /// reuse the effective node and gap sizes.
    #[serde(skip)]
    pub config: LayoutConfig,
}

impl Scene {
    /// Run the whole pipeline. A config problem is the only error; structural
    /// problems in the match data degrade to warnings on a best-effort scene.
    pub fn compute(
        matches: &[Match],
        topology: Topology,
        options: &LayoutOptions,
        container: Size,
    ) -> Result<Self, ConfigError> {
        let merged = LayoutConfig::resolve(options)?;
        let (round_count, max_round_size) = footprint_hint(matches, topology);
        let config = merged.responsive(container, round_count, max_round_size);

        let graph = resolve_structure(matches, topology);
        let positions = strategy_for(topology).layout(matches, &graph.edges, &config);
        let connectors = route_connectors(&positions, &graph.edges, &config);
        let view_box = compute_view_box(&positions, VIEW_PADDING);
        let fit = compute_responsive_dimensions(&positions, container, &config);

        debug!(
            "scene: {} matches -> {} nodes, {} connectors, {} warnings, fit scale {:.3}",
            matches.len(),
            positions.len(),
            connectors.len(),
            graph.warnings.len(),
            fit.scale
        );

        Ok(Self {
            positions,
            connectors,
            view_box,
            fit,
            warnings: graph.warnings,
            config,
        })
    }

    pub fn position_of(&self, match_id: &str) -> Option<&MatchPosition> {
        self.positions.iter().find(|p| p.match_id == match_id)
    }
}

/// Estimate the column and stacked-row counts the responsive pre-pass sizes
/// against. Double elimination stacks its two bands, so their row counts add.
fn footprint_hint(matches: &[Match], topology: Topology) -> (usize, usize) {
    match topology {
        Topology::DoubleElimination => {
            let segments = segment_rounds(matches);
            let band = |segment: Segment| {
                let rounds = segments.get(&segment);
                (
                    rounds.map(|r| r.len()).unwrap_or(0),
                    rounds
                        .and_then(|r| r.values().map(Vec::len).max())
                        .unwrap_or(0),
                )
            };
            let (wb_cols, wb_rows) = band(Segment::Winner);
            let (lb_cols, lb_rows) = band(Segment::Loser);
            let (gf_cols, _) = band(Segment::GrandFinal);
            (wb_cols.max(lb_cols) + gf_cols, wb_rows + lb_rows)
        }
        _ => {
            let rounds = group_rounds(matches.iter());
            let max_rows = rounds.values().map(Vec::len).max().unwrap_or(0);
            (rounds.len(), max_rows)
        }
    }
}
