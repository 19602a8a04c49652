use crate::config::LayoutConfig;
use crate::layout::{LayoutStrategy, MatchPosition};
use crate::structure::{ProgressionEdge, group_rounds};
use crate::Match;

/// Grid layout for the round-local topologies: one column per round along
/// the main axis, matches stacked in list order along the cross axis. Swiss
/// callers that want standings order sort the list before invoking; the
/// round-robin rotation schedule is already the list order.
pub struct RoundGrid;

impl LayoutStrategy for RoundGrid {
    fn layout(
        &self,
        matches: &[Match],
        _edges: &[ProgressionEdge],
        config: &LayoutConfig,
    ) -> Vec<MatchPosition> {
        let pitch = config.node_cross() + config.match_gap;
        let stride = config.node_main() + config.round_gap;

        let mut out = Vec::with_capacity(matches.len());
        for (rank, group) in group_rounds(matches.iter()).values().enumerate() {
            let main = rank as f64 * stride;
            for (i, m) in group.iter().enumerate() {
                let cross_center = pitch * (i as f64 + 0.5);
                out.push(MatchPosition {
                    match_id: m.id.clone(),
                    origin: config.place(main, cross_center - config.node_cross() / 2.0),
                    size: config.node_size(),
                });
            }
        }
        out
    }
}
