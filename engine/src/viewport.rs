use crate::config::{LayoutConfig, VIEW_PADDING};
use crate::layout::MatchPosition;
use crate::Size;
use serde::{Deserialize, Serialize};

/// Padded bounding rectangle of all positioned nodes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Scale plus pan offset mapping world coordinates into a container.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewTransform {
    pub scale: f64,
    pub translate_x: f64,
    pub translate_y: f64,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            scale: 1.0,
            translate_x: 0.0,
            translate_y: 0.0,
        }
    }
}

/// Axis-aligned bounding box over all node rectangles, expanded by `padding`
/// on every side. Empty input yields a small box centered on the origin
/// rather than an error.
pub fn compute_view_box(positions: &[MatchPosition], padding: f64) -> ViewBox {
    let mut min_x = f64::MAX;
    let mut min_y = f64::MAX;
    let mut max_x = f64::MIN;
    let mut max_y = f64::MIN;

    for p in positions {
        min_x = min_x.min(p.origin.x);
        min_y = min_y.min(p.origin.y);
        max_x = max_x.max(p.origin.x + p.size.width);
        max_y = max_y.max(p.origin.y + p.size.height);
    }

    if positions.is_empty() {
        return ViewBox {
            x: -padding,
            y: -padding,
            width: 2.0 * padding,
            height: 2.0 * padding,
        };
    }

    ViewBox {
        x: min_x - padding,
        y: min_y - padding,
        width: (max_x - min_x) + 2.0 * padding,
        height: (max_y - min_y) + 2.0 * padding,
    }
}

/// Scale that fits the whole padded bracket into the container, clamped to
/// the configured zoom bounds. Degenerate boxes (empty layout, single point)
/// and zero-size containers fall back to the neutral 1.0.
pub fn compute_optimal_zoom(
    positions: &[MatchPosition],
    container: Size,
    config: &LayoutConfig,
) -> f64 {
    let view_box = compute_view_box(positions, VIEW_PADDING);
    if positions.is_empty()
        || view_box.width <= 0.0
        || view_box.height <= 0.0
        || container.width <= 0.0
        || container.height <= 0.0
    {
        return 1.0;
    }
    let scale = (container.width / view_box.width).min(container.height / view_box.height);
    config.clamp_zoom(scale)
}

/// The transform whose translation centers the padded bounding box within
/// the container at the optimal scale.
pub fn compute_responsive_dimensions(
    positions: &[MatchPosition],
    container: Size,
    config: &LayoutConfig,
) -> ViewTransform {
    let view_box = compute_view_box(positions, VIEW_PADDING);
    let scale = compute_optimal_zoom(positions, container, config);
    ViewTransform {
        scale,
        translate_x: (container.width - view_box.width * scale) / 2.0 - view_box.x * scale,
        translate_y: (container.height - view_box.height * scale) / 2.0 - view_box.y * scale,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Point, Size};

    fn node(id: &str, x: f64, y: f64) -> MatchPosition {
        MatchPosition {
            match_id: id.to_string(),
            origin: Point::new(x, y),
            size: Size::new(100.0, 50.0),
        }
    }

    #[test]
    fn test_view_box_encloses_all_nodes_with_padding() {
        let positions = vec![node("a", 0.0, 0.0), node("b", 300.0, 200.0)];
        let view_box = compute_view_box(&positions, 10.0);
        assert_eq!(view_box.x, -10.0);
        assert_eq!(view_box.y, -10.0);
        assert_eq!(view_box.width, 400.0 + 20.0);
        assert_eq!(view_box.height, 250.0 + 20.0);
    }

    #[test]
    fn test_empty_view_box_is_a_default_centered_box() {
        let view_box = compute_view_box(&[], 40.0);
        assert_eq!(view_box.x, -40.0);
        assert_eq!(view_box.y, -40.0);
        assert_eq!(view_box.width, 80.0);
        assert_eq!(view_box.height, 80.0);
    }

    #[test]
    fn test_optimal_zoom_empty_is_neutral() {
        let config = LayoutConfig::default();
        let zoom = compute_optimal_zoom(&[], Size::new(800.0, 600.0), &config);
        assert_eq!(zoom, 1.0);
    }

    #[test]
    fn test_optimal_zoom_zero_container_is_neutral() {
        let config = LayoutConfig::default();
        let positions = vec![node("a", 0.0, 0.0)];
        assert_eq!(compute_optimal_zoom(&positions, Size::default(), &config), 1.0);
    }

    #[test]
    fn test_optimal_zoom_fits_the_smaller_ratio() {
        let config = LayoutConfig::default();
        // Box: 180 + 2*40 wide, 130 + 2*40 tall after padding.
        let positions = vec![node("a", 0.0, 0.0), node("b", 80.0, 80.0)];
        let zoom = compute_optimal_zoom(&positions, Size::new(520.0, 630.0), &config);
        assert_eq!(zoom, 2.0);
    }

    #[test]
    fn test_optimal_zoom_clamps_to_bounds() {
        let config = LayoutConfig::default();
        let positions = vec![node("a", 0.0, 0.0)];
        let huge = compute_optimal_zoom(&positions, Size::new(100_000.0, 100_000.0), &config);
        assert_eq!(huge, config.max_zoom);
        let tiny = compute_optimal_zoom(&positions, Size::new(2.0, 2.0), &config);
        assert_eq!(tiny, config.min_zoom);
    }

    #[test]
    fn test_responsive_dimensions_center_the_box() {
        let config = LayoutConfig::default();
        let positions = vec![node("a", 0.0, 0.0), node("b", 80.0, 80.0)];
        let container = Size::new(520.0, 630.0);
        let fit = compute_responsive_dimensions(&positions, container, &config);

        let view_box = compute_view_box(&positions, VIEW_PADDING);
        // World center of the box projects onto the container center.
        let world_cx = view_box.x + view_box.width / 2.0;
        let world_cy = view_box.y + view_box.height / 2.0;
        let projected_x = world_cx * fit.scale + fit.translate_x;
        let projected_y = world_cy * fit.scale + fit.translate_y;
        assert!((projected_x - container.width / 2.0).abs() < 1e-9);
        assert!((projected_y - container.height / 2.0).abs() < 1e-9);
    }
}
