use crate::config::{LayoutConfig, Orientation};
use crate::layout::MatchPosition;
use crate::structure::{EdgeKind, ProgressionEdge};
use crate::Point;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PathStyle {
    /// Advancement.
    Solid,
    /// Elimination drop into the loser bracket.
    Dashed,
}

/// Pure geometric description of one connector: endpoints plus routing kind.
/// The particular elbow or curve drawn between them is a presentation concern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectorPath {
    pub from: Point,
    pub to: Point,
    pub kind: EdgeKind,
    pub style: PathStyle,
}

/// Fraction of the cross size where slot 0 and slot 1 anchor.
const SLOT_ANCHORS: [f64; 2] = [0.25, 0.75];

/// Compute the visual paths linking dependent matches.
///
/// Each path leaves the source node's trailing edge at the departing team's
/// slot anchor (the midpoint until the winner is known) and enters the
/// destination's leading edge at the assigned slot's anchor, so two edges
/// feeding the same match never share an endpoint. Edges whose endpoints are
/// not both positioned are skipped.
pub fn route_connectors(
    positions: &[MatchPosition],
    edges: &[ProgressionEdge],
    config: &LayoutConfig,
) -> Vec<ConnectorPath> {
    let by_id: HashMap<&str, &MatchPosition> = positions
        .iter()
        .map(|p| (p.match_id.as_str(), p))
        .collect();

    let mut paths = Vec::with_capacity(edges.len());
    for edge in edges {
        let (Some(source), Some(dest)) = (
            by_id.get(edge.source.as_str()),
            by_id.get(edge.destination.as_str()),
        ) else {
            continue;
        };

        let source_anchor = edge
            .source_slot
            .and_then(|slot| SLOT_ANCHORS.get(slot).copied())
            .unwrap_or(0.5);
        let dest_anchor = SLOT_ANCHORS.get(edge.slot).copied().unwrap_or(0.5);

        paths.push(ConnectorPath {
            from: trailing_point(source, source_anchor, config),
            to: leading_point(dest, dest_anchor, config),
            kind: edge.kind,
            style: match edge.kind {
                EdgeKind::WinnerAdvance => PathStyle::Solid,
                EdgeKind::LoserDrop => PathStyle::Dashed,
            },
        });
    }
    paths
}

/// Trailing edge of a node: right in left-to-right layouts, bottom in
/// top-to-bottom ones. `anchor` is the fraction along the cross size.
fn trailing_point(p: &MatchPosition, anchor: f64, config: &LayoutConfig) -> Point {
    match config.orientation {
        Orientation::LeftToRight => Point::new(
            p.origin.x + p.size.width,
            p.origin.y + p.size.height * anchor,
        ),
        Orientation::TopToBottom => Point::new(
            p.origin.x + p.size.width * anchor,
            p.origin.y + p.size.height,
        ),
    }
}

fn leading_point(p: &MatchPosition, anchor: f64, config: &LayoutConfig) -> Point {
    match config.orientation {
        Orientation::LeftToRight => Point::new(p.origin.x, p.origin.y + p.size.height * anchor),
        Orientation::TopToBottom => Point::new(p.origin.x + p.size.width * anchor, p.origin.y),
    }
}
