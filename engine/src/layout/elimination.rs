use crate::config::LayoutConfig;
use crate::layout::{LayoutStrategy, MatchPosition};
use crate::structure::{EdgeKind, ProgressionEdge, Rounds, group_rounds, segment_rounds};
use crate::{Match, Segment};
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Tree band placement, shared by all three elimination strategies
// ---------------------------------------------------------------------------

/// Result of placing one bracket tree along the cross axis.
struct TreeBand {
    /// Cross-axis extent of the band, measured from its offset.
    extent: f64,
    /// Cross center of the tree's root match (last round, first position).
    root_center: Option<f64>,
    /// Number of round columns the band occupies.
    columns: usize,
}

/// Lay out one bracket tree.
///
/// Leaf pitch is node cross-size + match gap; a match at tier t, index i is
/// centered at `pitch * 2^t * (i + 1/2)` past `cross_offset`. Rounds past the
/// first with exactly two already-placed feeders take the feeder midpoint
/// instead, which equals the tier formula on well-formed input but keeps bye
/// slots reserving geometric space when it is not. Only winner-advance edges
/// count as feeders, so loser-bracket drop-ins never pull a node into the
/// winner band.
fn tree_positions(
    rounds: &Rounds<'_>,
    edges: &[ProgressionEdge],
    config: &LayoutConfig,
    cross_offset: f64,
    column_offset: usize,
    tier_of: impl Fn(usize) -> u32,
    out: &mut Vec<MatchPosition>,
) -> TreeBand {
    let pitch = config.node_cross() + config.match_gap;
    let stride = config.node_main() + config.round_gap;

    let mut centers: HashMap<&str, f64> = HashMap::new();
    let mut extent: f64 = 0.0;
    let mut root_center = None;

    for (rank, group) in rounds.values().enumerate() {
        let span = pitch * 2f64.powi(tier_of(rank) as i32);
        extent = extent.max(span * group.len() as f64);
        let main = (column_offset + rank) as f64 * stride;

        for (i, m) in group.iter().enumerate() {
            let fallback = cross_offset + span * (i as f64 + 0.5);
            let cross_center = if rank == 0 {
                fallback
            } else {
                let feeders: Vec<f64> = edges
                    .iter()
                    .filter(|e| e.kind == EdgeKind::WinnerAdvance && e.destination == m.id)
                    .filter_map(|e| centers.get(e.source.as_str()).copied())
                    .collect();
                match feeders.as_slice() {
                    [a, b] => (a + b) / 2.0,
                    _ => fallback,
                }
            };
            centers.insert(m.id.as_str(), cross_center);
            if rank + 1 == rounds.len() && i == 0 {
                root_center = Some(cross_center);
            }

            out.push(MatchPosition {
                match_id: m.id.clone(),
                origin: config.place(main, cross_center - config.node_cross() / 2.0),
                size: config.node_size(),
            });
        }
    }

    TreeBand {
        extent,
        root_center,
        columns: rounds.len(),
    }
}

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

/// Classic binary-tree layout: round 1 evenly stacked, later rounds centered
/// on their feeders, main axis advancing one column per round.
pub struct SingleElimination;

impl LayoutStrategy for SingleElimination {
    fn layout(
        &self,
        matches: &[Match],
        edges: &[ProgressionEdge],
        config: &LayoutConfig,
    ) -> Vec<MatchPosition> {
        let mut out = Vec::with_capacity(matches.len());
        tree_positions(
            &group_rounds(matches.iter()),
            edges,
            config,
            0.0,
            0,
            |rank| rank as u32,
            &mut out,
        );
        out
    }
}

/// Winner bracket on top, loser bracket below a fixed separation band, grand
/// final one column past the later of the two.
///
/// Loser-bracket rounds come in minor/major pairs (survivors, then drop-ins),
/// so two consecutive rounds share a tier: tier = rank / 2.
pub struct DoubleElimination;

impl LayoutStrategy for DoubleElimination {
    fn layout(
        &self,
        matches: &[Match],
        edges: &[ProgressionEdge],
        config: &LayoutConfig,
    ) -> Vec<MatchPosition> {
        let segments = segment_rounds(matches);
        let mut out = Vec::with_capacity(matches.len());

        let winner_band = segments
            .get(&Segment::Winner)
            .map(|rounds| tree_positions(rounds, edges, config, 0.0, 0, |rank| rank as u32, &mut out));

        let separation = config.node_cross() + 2.0 * config.match_gap;
        let loser_offset = winner_band
            .as_ref()
            .map(|band| band.extent + separation)
            .unwrap_or(0.0);

        let loser_band = segments.get(&Segment::Loser).map(|rounds| {
            tree_positions(
                rounds,
                edges,
                config,
                loser_offset,
                0,
                |rank| (rank / 2) as u32,
                &mut out,
            )
        });

        // Grand final: one column past the longer bracket, cross-centered
        // between the two champions (falling back to the overall band middle
        // when a champion is missing from the input).
        if let Some(finals) = segments.get(&Segment::GrandFinal) {
            let column = winner_band
                .as_ref()
                .map(|b| b.columns)
                .unwrap_or(0)
                .max(loser_band.as_ref().map(|b| b.columns).unwrap_or(0));
            let cross_center = match (
                winner_band.as_ref().and_then(|b| b.root_center),
                loser_band.as_ref().and_then(|b| b.root_center),
            ) {
                (Some(w), Some(l)) => (w + l) / 2.0,
                _ => {
                    let total = loser_offset + loser_band.as_ref().map(|b| b.extent).unwrap_or(0.0);
                    total / 2.0
                }
            };

            let stride = config.node_main() + config.round_gap;
            for (rank, group) in finals.values().enumerate() {
                let main = (column + rank) as f64 * stride;
                for m in group {
                    out.push(MatchPosition {
                        match_id: m.id.clone(),
                        origin: config.place(main, cross_center - config.node_cross() / 2.0),
                        size: config.node_size(),
                    });
                }
            }
        }

        out
    }
}

/// Compact placement sub-bracket: single-elimination mechanics over the
/// subset of matches flagged for the placement stage.
pub struct Barrage;

impl LayoutStrategy for Barrage {
    fn layout(
        &self,
        matches: &[Match],
        edges: &[ProgressionEdge],
        config: &LayoutConfig,
    ) -> Vec<MatchPosition> {
        let flagged: Vec<Match> = matches.iter().filter(|m| m.placement).cloned().collect();
        if flagged.is_empty() {
            return SingleElimination.layout(matches, edges, config);
        }
        SingleElimination.layout(&flagged, edges, config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LayoutOptions, Orientation};
    use crate::structure::tests::{double_elim_8, make_match, single_elim_8};
    use crate::structure::resolve_structure;
    use crate::Topology;

    fn layout_with_edges(matches: &[Match], topology: Topology) -> Vec<MatchPosition> {
        let graph = resolve_structure(matches, topology);
        crate::layout::strategy_for(topology).layout(matches, &graph.edges, &LayoutConfig::default())
    }

    fn position<'a>(positions: &'a [MatchPosition], id: &str) -> &'a MatchPosition {
        positions
            .iter()
            .find(|p| p.match_id == id)
            .unwrap_or_else(|| panic!("no position for {id}"))
    }

    #[test]
    fn test_single_elim_round_one_is_evenly_stacked() {
        let positions = layout_with_edges(&single_elim_8(), Topology::SingleElimination);
        let config = LayoutConfig::default();
        let pitch = config.node_height + config.match_gap;

        for (i, id) in ["r1m0", "r1m1", "r1m2", "r1m3"].iter().enumerate() {
            let center = position(&positions, id).center();
            assert_eq!(center.x, config.node_width / 2.0);
            assert_eq!(center.y, pitch * (i as f64 + 0.5));
        }
    }

    #[test]
    fn test_single_elim_parents_center_on_feeders() {
        let positions = layout_with_edges(&single_elim_8(), Topology::SingleElimination);
        for (parent, feeders) in [
            ("r2m0", ["r1m0", "r1m1"]),
            ("r2m1", ["r1m2", "r1m3"]),
            ("final", ["r2m0", "r2m1"]),
        ] {
            let expected = (position(&positions, feeders[0]).center().y
                + position(&positions, feeders[1]).center().y)
                / 2.0;
            assert_eq!(position(&positions, parent).center().y, expected);
        }
    }

    #[test]
    fn test_single_elim_main_axis_stride() {
        let positions = layout_with_edges(&single_elim_8(), Topology::SingleElimination);
        let config = LayoutConfig::default();
        let stride = config.node_width + config.round_gap;
        assert_eq!(position(&positions, "r1m0").origin.x, 0.0);
        assert_eq!(position(&positions, "r2m0").origin.x, stride);
        assert_eq!(position(&positions, "final").origin.x, 2.0 * stride);
    }

    #[test]
    fn test_bye_round_reserves_space() {
        // Round 2 holds a single match fed by only one round-1 match; the
        // tier formula must still place it, not collapse the column.
        let matches = vec![
            make_match("r1m0", 1, Segment::Main),
            make_match("r2m0", 2, Segment::Main),
        ];
        let positions = layout_with_edges(&matches, Topology::SingleElimination);
        let config = LayoutConfig::default();
        let pitch = config.node_height + config.match_gap;
        // One feeder only, so the fallback 2^1 * (0 + 1/2) center applies.
        assert_eq!(position(&positions, "r2m0").center().y, pitch);
    }

    #[test]
    fn test_double_elim_bands_do_not_overlap() {
        let positions = layout_with_edges(&double_elim_8(), Topology::DoubleElimination);
        let wb_bottom = ["wb1m0", "wb1m1", "wb1m2", "wb1m3", "wb2m0", "wb2m1", "wb3m0"]
            .iter()
            .map(|id| {
                let p = position(&positions, id);
                p.origin.y + p.size.height
            })
            .fold(f64::MIN, f64::max);
        let lb_top = ["lb1m0", "lb1m1", "lb2m0", "lb2m1", "lb3m0", "lb4m0"]
            .iter()
            .map(|id| position(&positions, id).origin.y)
            .fold(f64::MAX, f64::min);
        assert!(lb_top > wb_bottom, "loser band {lb_top} overlaps winner band {wb_bottom}");
    }

    #[test]
    fn test_double_elim_minor_major_rounds_share_tier() {
        let positions = layout_with_edges(&double_elim_8(), Topology::DoubleElimination);
        // LB rounds 1 and 2 both hold two matches at tier 0.
        assert_eq!(
            position(&positions, "lb1m0").center().y,
            position(&positions, "lb2m0").center().y
        );
        assert_eq!(
            position(&positions, "lb1m1").center().y,
            position(&positions, "lb2m1").center().y
        );
    }

    #[test]
    fn test_grand_final_sits_past_both_brackets() {
        let positions = layout_with_edges(&double_elim_8(), Topology::DoubleElimination);
        let gf = position(&positions, "gf");
        for p in &positions {
            if p.match_id != "gf" {
                assert!(p.origin.x < gf.origin.x, "{} not left of grand final", p.match_id);
            }
        }
        // Cross-centered between the two champions.
        let expected = (position(&positions, "wb3m0").center().y
            + position(&positions, "lb4m0").center().y)
            / 2.0;
        assert_eq!(gf.center().y, expected);
    }

    #[test]
    fn test_barrage_lays_out_placement_subset_only() {
        let mut matches = single_elim_8();
        matches.push(make_match("pool1", 1, Segment::Main));
        for m in &mut matches {
            m.placement = m.id != "pool1";
        }
        let positions = layout_with_edges(&matches, Topology::Barrage);
        assert_eq!(positions.len(), 7);
        assert!(positions.iter().all(|p| p.match_id != "pool1"));
    }

    #[test]
    fn test_top_to_bottom_orientation_swaps_axes() {
        let options = LayoutOptions {
            orientation: Some(Orientation::TopToBottom),
            ..Default::default()
        };
        let config = LayoutConfig::resolve(&options).unwrap();
        let matches = single_elim_8();
        let graph = resolve_structure(&matches, Topology::SingleElimination);
        let positions = SingleElimination.layout(&matches, &graph.edges, &config);

        let stride = config.node_height + config.round_gap;
        assert_eq!(position(&positions, "r1m0").origin.y, 0.0);
        assert_eq!(position(&positions, "final").origin.y, 2.0 * stride);
        // Rounds stack along y, matches spread along x.
        assert!(position(&positions, "r1m1").origin.x > position(&positions, "r1m0").origin.x);
    }
}
