use crate::{Match, Segment, Topology};
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ---------------------------------------------------------------------------
// Progression edges — derived, recomputed whenever match data changes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EdgeKind {
    WinnerAdvance,
    LoserDrop,
}

impl fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EdgeKind::WinnerAdvance => write!(f, "winner-advance"),
            EdgeKind::LoserDrop => write!(f, "loser-drop"),
        }
    }
}

/// "The winner (or loser) of `source` fills slot `slot` of `destination`."
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressionEdge {
    pub source: String,
    pub destination: String,
    /// Destination slot index, 0 or 1.
    pub slot: usize,
    pub kind: EdgeKind,
    /// Slot index of the departing team in the source match, known once the
    /// source has a winner. The connector router anchors on it.
    pub source_slot: Option<usize>,
}

/// A computed destination that does not exist in the supplied match list.
/// The edge is dropped and resolution continues; stale or truncated input
/// must never make the resolver fail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructureWarning {
    pub source: String,
    pub kind: EdgeKind,
    pub segment: Segment,
    pub round: u32,
    pub index: usize,
}

impl fmt::Display for StructureWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "match {}: dropped {} edge, no match #{} in {} round {}",
            self.source,
            self.kind,
            self.index,
            self.segment.label(),
            self.round
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgressionGraph {
    pub edges: Vec<ProgressionEdge>,
    pub warnings: Vec<StructureWarning>,
}

// ---------------------------------------------------------------------------
// Resolver
// ---------------------------------------------------------------------------

pub(crate) type Rounds<'a> = BTreeMap<u32, Vec<&'a Match>>;

/// Resolve the logical progression graph for a match list.
///
/// Swiss and round-robin pairings are round-local, so those topologies always
/// resolve to an empty edge set; the resolver is still invoked uniformly.
pub fn resolve_structure(matches: &[Match], topology: Topology) -> ProgressionGraph {
    let mut graph = ProgressionGraph::default();
    match topology {
        Topology::SingleElimination => {
            advance_binary(&group_rounds(matches.iter()), &mut graph);
        }
        Topology::DoubleElimination => resolve_double(matches, &mut graph),
        Topology::Barrage => {
            // The placement sub-bracket runs over the flagged subset; a list
            // with no flags is taken to be entirely the placement stage.
            let flagged = matches.iter().filter(|m| m.placement);
            let rounds = if flagged.clone().next().is_some() {
                group_rounds(flagged)
            } else {
                group_rounds(matches.iter())
            };
            advance_binary(&rounds, &mut graph);
        }
        Topology::Swiss | Topology::RoundRobin => {}
    }
    graph
}

/// Group matches by round, preserving list order within each round. Position
/// within a round is the order of appearance, which keeps resolution
/// deterministic for identical input.
pub(crate) fn group_rounds<'a>(matches: impl Iterator<Item = &'a Match>) -> Rounds<'a> {
    let mut rounds: Rounds<'a> = BTreeMap::new();
    for m in matches {
        rounds.entry(m.round).or_default().push(m);
    }
    rounds
}

pub(crate) fn segment_rounds<'a>(matches: &'a [Match]) -> BTreeMap<Segment, Rounds<'a>> {
    let mut segments: BTreeMap<Segment, Rounds<'a>> = BTreeMap::new();
    for m in matches {
        segments
            .entry(m.segment)
            .or_default()
            .entry(m.round)
            .or_default()
            .push(m);
    }
    segments
}

fn push_edge(
    graph: &mut ProgressionGraph,
    source: &Match,
    kind: EdgeKind,
    destination: Option<&Match>,
    segment: Segment,
    round: u32,
    index: usize,
    slot: usize,
) {
    match destination {
        Some(dest) => {
            let source_slot = match kind {
                EdgeKind::WinnerAdvance => source.winner_slot(),
                EdgeKind::LoserDrop => source.loser_slot(),
            };
            graph.edges.push(ProgressionEdge {
                source: source.id.clone(),
                destination: dest.id.clone(),
                slot,
                kind,
                source_slot,
            });
        }
        None => {
            let warning = StructureWarning {
                source: source.id.clone(),
                kind,
                segment,
                round,
                index,
            };
            warn!("{warning}");
            graph.warnings.push(warning);
        }
    }
}

/// Classic binary-tree advancement: round r position p feeds round r+1
/// position p/2, in the slot given by p's parity. The highest round present
/// is taken to be the final and gets no outgoing edges, so a list whose top
/// rounds are not generated yet resolves cleanly.
fn advance_binary(rounds: &Rounds<'_>, graph: &mut ProgressionGraph) {
    let Some(&last) = rounds.keys().next_back() else {
        return;
    };
    for (&round, group) in rounds {
        if round == last {
            continue;
        }
        let next = rounds.get(&(round + 1));
        for (p, m) in group.iter().enumerate() {
            push_edge(
                graph,
                m,
                EdgeKind::WinnerAdvance,
                next.and_then(|g| g.get(p / 2)).copied(),
                m.segment,
                round + 1,
                p / 2,
                p % 2,
            );
        }
    }
}

/// Double elimination: winner bracket advances as a binary tree, losers
/// re-enter the loser bracket one round behind, both champions meet in the
/// grand final.
///
/// Loser-bracket placement convention (rounds 1-based per segment):
/// - WB round 1 match p drops into LB round 1 match p/2, slot p%2.
/// - WB round r >= 2 match p drops into LB round 2(r-1), slot 1; the drop
///   order is reversed when r is even, deferring early rematches.
/// - LB odd rounds advance same-index into slot 0 (the next round keeps its
///   size); LB even rounds halve, match p/2 slot p%2.
/// - WB champion -> grand final slot 0, LB champion -> grand final slot 1.
///   A second grand-final match (bracket reset) receives the first one's
///   winner in slot 0 and its loser in slot 1.
///
/// Non-power-of-two fields degrade gracefully: any computed destination
/// absent from the match list drops the edge with a warning.
fn resolve_double(matches: &[Match], graph: &mut ProgressionGraph) {
    let segments = segment_rounds(matches);
    let winner = segments.get(&Segment::Winner);
    let loser = segments.get(&Segment::Loser);

    // Grand-final matches in (round, list order).
    let finals: Vec<&Match> = segments
        .get(&Segment::GrandFinal)
        .map(|rounds| rounds.values().flatten().copied().collect())
        .unwrap_or_default();

    if let Some(wb) = winner {
        advance_binary(wb, graph);

        // Champion into the grand final.
        if let Some((&last, group)) = wb.iter().next_back()
            && let Some(champion) = group.first()
        {
            push_edge(
                graph,
                champion,
                EdgeKind::WinnerAdvance,
                finals.first().copied(),
                Segment::GrandFinal,
                last,
                0,
                0,
            );
        }

        // Loser drops.
        for (&round, group) in wb {
            for (p, m) in group.iter().enumerate() {
                let (lb_round, index, slot) = if round == 1 {
                    (1, Some(p / 2), p % 2)
                } else {
                    let lb_round = 2 * (round - 1);
                    let index = if round % 2 == 0 {
                        // Reversed drop order; resolves against the actual
                        // destination round size so short fields just warn.
                        loser
                            .and_then(|lb| lb.get(&lb_round))
                            .and_then(|g| g.len().checked_sub(1 + p))
                    } else {
                        Some(p)
                    };
                    (lb_round, index, 1)
                };
                push_edge(
                    graph,
                    m,
                    EdgeKind::LoserDrop,
                    index.and_then(|i| {
                        loser
                            .and_then(|lb| lb.get(&lb_round))
                            .and_then(|g| g.get(i))
                            .copied()
                    }),
                    Segment::Loser,
                    lb_round,
                    index.unwrap_or(p),
                    slot,
                );
            }
        }
    }

    if let Some(lb) = loser {
        let Some(&last) = lb.keys().next_back() else {
            return;
        };
        for (&round, group) in lb {
            if round == last {
                continue;
            }
            let next = lb.get(&(round + 1));
            for (p, m) in group.iter().enumerate() {
                let (index, slot) = if round % 2 == 1 {
                    (p, 0)
                } else {
                    (p / 2, p % 2)
                };
                push_edge(
                    graph,
                    m,
                    EdgeKind::WinnerAdvance,
                    next.and_then(|g| g.get(index)).copied(),
                    Segment::Loser,
                    round + 1,
                    index,
                    slot,
                );
            }
        }

        // LB champion into the grand final.
        if let Some(champion) = lb.get(&last).and_then(|g| g.first()) {
            push_edge(
                graph,
                champion,
                EdgeKind::WinnerAdvance,
                finals.first().copied(),
                Segment::GrandFinal,
                last,
                0,
                1,
            );
        }
    }

    // Bracket reset: each grand-final match feeds the next one.
    for pair in finals.windows(2) {
        let (first, second) = (pair[0], pair[1]);
        for (kind, slot) in [(EdgeKind::WinnerAdvance, 0), (EdgeKind::LoserDrop, 1)] {
            push_edge(
                graph,
                first,
                kind,
                Some(second),
                Segment::GrandFinal,
                second.round,
                0,
                slot,
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::{MatchStatus, Team, TeamSlot};

    pub(crate) fn make_match(id: &str, round: u32, segment: Segment) -> Match {
        Match {
            id: id.to_string(),
            round,
            segment,
            ..Default::default()
        }
    }

    /// 8-team single elimination: 4 + 2 + 1 matches.
    pub(crate) fn single_elim_8() -> Vec<Match> {
        vec![
            make_match("r1m0", 1, Segment::Main),
            make_match("r1m1", 1, Segment::Main),
            make_match("r1m2", 1, Segment::Main),
            make_match("r1m3", 1, Segment::Main),
            make_match("r2m0", 2, Segment::Main),
            make_match("r2m1", 2, Segment::Main),
            make_match("final", 3, Segment::Main),
        ]
    }

    /// 8-team double elimination: WB 4+2+1, LB 2+2+1+1, one grand final.
    pub(crate) fn double_elim_8() -> Vec<Match> {
        let mut matches = Vec::new();
        for i in 0..4 {
            matches.push(make_match(&format!("wb1m{i}"), 1, Segment::Winner));
        }
        for i in 0..2 {
            matches.push(make_match(&format!("wb2m{i}"), 2, Segment::Winner));
        }
        matches.push(make_match("wb3m0", 3, Segment::Winner));
        for i in 0..2 {
            matches.push(make_match(&format!("lb1m{i}"), 1, Segment::Loser));
        }
        for i in 0..2 {
            matches.push(make_match(&format!("lb2m{i}"), 2, Segment::Loser));
        }
        matches.push(make_match("lb3m0", 3, Segment::Loser));
        matches.push(make_match("lb4m0", 4, Segment::Loser));
        matches.push(make_match("gf", 1, Segment::GrandFinal));
        matches
    }

    fn find<'a>(graph: &'a ProgressionGraph, source: &str, kind: EdgeKind) -> &'a ProgressionEdge {
        graph
            .edges
            .iter()
            .find(|e| e.source == source && e.kind == kind)
            .unwrap_or_else(|| panic!("no {kind} edge out of {source}"))
    }

    #[test]
    fn test_single_elim_8_pairing_table() {
        let graph = resolve_structure(&single_elim_8(), Topology::SingleElimination);
        assert!(graph.warnings.is_empty());
        // Every match but the final has exactly one outgoing edge.
        assert_eq!(graph.edges.len(), 6);

        let expect = [
            ("r1m0", "r2m0", 0),
            ("r1m1", "r2m0", 1),
            ("r1m2", "r2m1", 0),
            ("r1m3", "r2m1", 1),
            ("r2m0", "final", 0),
            ("r2m1", "final", 1),
        ];
        for (source, destination, slot) in expect {
            let edge = find(&graph, source, EdgeKind::WinnerAdvance);
            assert_eq!(edge.destination, destination);
            assert_eq!(edge.slot, slot);
        }
    }

    #[test]
    fn test_swiss_and_round_robin_resolve_empty() {
        let matches = single_elim_8();
        for topology in [Topology::Swiss, Topology::RoundRobin] {
            let graph = resolve_structure(&matches, topology);
            assert!(graph.edges.is_empty());
            assert!(graph.warnings.is_empty());
        }
    }

    #[test]
    fn test_double_elim_8_loser_routing() {
        let graph = resolve_structure(&double_elim_8(), Topology::DoubleElimination);
        assert!(graph.warnings.is_empty());
        // WB advance 6 + WB champ 1 + drops 7 + LB advance 5 + LB champ 1.
        assert_eq!(graph.edges.len(), 20);

        // Round-1 losers pair up in LB round 1.
        for (source, destination, slot) in [
            ("wb1m0", "lb1m0", 0),
            ("wb1m1", "lb1m0", 1),
            ("wb1m2", "lb1m1", 0),
            ("wb1m3", "lb1m1", 1),
        ] {
            let edge = find(&graph, source, EdgeKind::LoserDrop);
            assert_eq!(edge.destination, destination);
            assert_eq!(edge.slot, slot);
        }

        // WB round 2 (even) drops reversed into LB round 2, slot 1.
        assert_eq!(find(&graph, "wb2m0", EdgeKind::LoserDrop).destination, "lb2m1");
        assert_eq!(find(&graph, "wb2m1", EdgeKind::LoserDrop).destination, "lb2m0");
        assert_eq!(find(&graph, "wb2m0", EdgeKind::LoserDrop).slot, 1);

        // WB round 3 (odd) drops into LB round 4, slot 1.
        let wb_final_drop = find(&graph, "wb3m0", EdgeKind::LoserDrop);
        assert_eq!(wb_final_drop.destination, "lb4m0");
        assert_eq!(wb_final_drop.slot, 1);

        // LB survivors: odd rounds keep index into slot 0, even rounds halve.
        assert_eq!(find(&graph, "lb1m0", EdgeKind::WinnerAdvance).destination, "lb2m0");
        assert_eq!(find(&graph, "lb1m0", EdgeKind::WinnerAdvance).slot, 0);
        assert_eq!(find(&graph, "lb2m1", EdgeKind::WinnerAdvance).destination, "lb3m0");
        assert_eq!(find(&graph, "lb2m1", EdgeKind::WinnerAdvance).slot, 1);
        assert_eq!(find(&graph, "lb3m0", EdgeKind::WinnerAdvance).destination, "lb4m0");

        // Both champions meet in the grand final.
        let wb_champ = find(&graph, "wb3m0", EdgeKind::WinnerAdvance);
        assert_eq!((wb_champ.destination.as_str(), wb_champ.slot), ("gf", 0));
        let lb_champ = find(&graph, "lb4m0", EdgeKind::WinnerAdvance);
        assert_eq!((lb_champ.destination.as_str(), lb_champ.slot), ("gf", 1));
    }

    #[test]
    fn test_bracket_reset_edges() {
        let mut matches = double_elim_8();
        matches.push(make_match("gf2", 2, Segment::GrandFinal));
        let graph = resolve_structure(&matches, Topology::DoubleElimination);

        let advance = find(&graph, "gf", EdgeKind::WinnerAdvance);
        assert_eq!((advance.destination.as_str(), advance.slot), ("gf2", 0));
        let drop = find(&graph, "gf", EdgeKind::LoserDrop);
        assert_eq!((drop.destination.as_str(), drop.slot), ("gf2", 1));
    }

    #[test]
    fn test_missing_destination_warns_instead_of_failing() {
        // A round-2 match is missing, so half of round 1 has nowhere to go.
        let mut matches = single_elim_8();
        matches.retain(|m| m.id != "r2m1");

        let graph = resolve_structure(&matches, Topology::SingleElimination);
        assert_eq!(graph.edges.len(), 3);
        assert_eq!(graph.warnings.len(), 2);
        assert!(
            graph
                .warnings
                .iter()
                .all(|w| w.round == 2 && w.index == 1 && w.kind == EdgeKind::WinnerAdvance)
        );
    }

    #[test]
    fn test_truncated_top_round_is_the_final() {
        // Later rounds not generated yet: the highest round present is
        // treated as the final, not as a missing destination.
        let mut matches = single_elim_8();
        matches.retain(|m| m.id != "final");

        let graph = resolve_structure(&matches, Topology::SingleElimination);
        assert_eq!(graph.edges.len(), 4);
        assert!(graph.warnings.is_empty());
        assert!(graph.edges.iter().all(|e| e.source.starts_with("r1")));
    }

    #[test]
    fn test_barrage_uses_placement_subset() {
        let mut matches = single_elim_8();
        // Pool-stage leftovers that must not participate in the sub-bracket.
        matches.push(make_match("pool1", 1, Segment::Main));
        for m in &mut matches {
            m.placement = m.id != "pool1";
        }

        let graph = resolve_structure(&matches, Topology::Barrage);
        assert_eq!(graph.edges.len(), 6);
        assert!(graph.edges.iter().all(|e| e.source != "pool1"));
        assert!(graph.warnings.is_empty());
    }

    #[test]
    fn test_source_slot_reflects_known_winner() {
        let mut matches = single_elim_8();
        let team = |id: &str| {
            Some(Team {
                id: id.into(),
                name: id.into(),
                short_name: id.into(),
            })
        };
        matches[0].slots = [
            TeamSlot { seed: 1, team: team("a"), placeholder: None },
            TeamSlot { seed: 8, team: team("b"), placeholder: None },
        ];
        matches[0].status = MatchStatus::Completed;
        matches[0].winner_id = Some("b".into());

        let graph = resolve_structure(&matches, Topology::SingleElimination);
        assert_eq!(find(&graph, "r1m0", EdgeKind::WinnerAdvance).source_slot, Some(1));
        assert_eq!(find(&graph, "r1m1", EdgeKind::WinnerAdvance).source_slot, None);
    }
}
