use crate::Size;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

pub const DEFAULT_NODE_WIDTH: f64 = 320.0;
pub const DEFAULT_NODE_HEIGHT: f64 = 120.0;
/// Gap between round columns along the main axis.
pub const DEFAULT_ROUND_GAP: f64 = 100.0;
/// Gap between stacked matches within a round, along the cross axis.
pub const DEFAULT_MATCH_GAP: f64 = 40.0;
pub const DEFAULT_MIN_ZOOM: f64 = 0.1;
pub const DEFAULT_MAX_ZOOM: f64 = 3.0;
/// Multiplier applied by one zoom-in step (divided for zoom-out).
pub const ZOOM_STEP: f64 = 1.2;
/// Padding added on every side of the fitted view box.
pub const VIEW_PADDING: f64 = 40.0;

/// Responsive shrink floors — nodes never get smaller than this.
pub const MIN_NODE_WIDTH: f64 = 96.0;
pub const MIN_NODE_HEIGHT: f64 = 36.0;

/// Direction of the main axis (the axis rounds advance along).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Orientation {
    #[default]
    LeftToRight,
    TopToBottom,
}

// ---------------------------------------------------------------------------
// LayoutOptions — the caller-facing partial config
// ---------------------------------------------------------------------------

/// Partial layout configuration. Every field is optional; unset fields fall
/// back to the documented defaults when merged via [`LayoutConfig::resolve`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutOptions {
    pub node_width: Option<f64>,
    pub node_height: Option<f64>,
    pub round_gap: Option<f64>,
    pub match_gap: Option<f64>,
    pub orientation: Option<Orientation>,
    pub min_zoom: Option<f64>,
    pub max_zoom: Option<f64>,
}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// The only typed error the engine surfaces. Everything downstream of a valid
/// config degrades to warnings or fallback values instead of failing.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// A dimension or gap that must be positive (or non-negative) is not.
    InvalidDimension { field: &'static str, value: f64 },
    /// Zoom bounds where min > max, or a non-positive min.
    InvalidZoomBounds { min: f64, max: f64 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidDimension { field, value } => {
                write!(f, "invalid layout option {field}: {value}")
            }
            ConfigError::InvalidZoomBounds { min, max } => {
                write!(f, "invalid zoom bounds: min {min} > max {max} or min <= 0")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// LayoutConfig — merged and validated
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutConfig {
    pub node_width: f64,
    pub node_height: f64,
    pub round_gap: f64,
    pub match_gap: f64,
    pub orientation: Orientation,
    pub min_zoom: f64,
    pub max_zoom: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            node_width: DEFAULT_NODE_WIDTH,
            node_height: DEFAULT_NODE_HEIGHT,
            round_gap: DEFAULT_ROUND_GAP,
            match_gap: DEFAULT_MATCH_GAP,
            orientation: Orientation::default(),
            min_zoom: DEFAULT_MIN_ZOOM,
            max_zoom: DEFAULT_MAX_ZOOM,
        }
    }
}

impl LayoutConfig {
    /// Merge partial options over the defaults and validate the result.
    pub fn resolve(options: &LayoutOptions) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let config = Self {
            node_width: options.node_width.unwrap_or(defaults.node_width),
            node_height: options.node_height.unwrap_or(defaults.node_height),
            round_gap: options.round_gap.unwrap_or(defaults.round_gap),
            match_gap: options.match_gap.unwrap_or(defaults.match_gap),
            orientation: options.orientation.unwrap_or(defaults.orientation),
            min_zoom: options.min_zoom.unwrap_or(defaults.min_zoom),
            max_zoom: options.max_zoom.unwrap_or(defaults.max_zoom),
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (field, value, must_be_positive) in [
            ("node_width", self.node_width, true),
            ("node_height", self.node_height, true),
            ("round_gap", self.round_gap, false),
            ("match_gap", self.match_gap, false),
        ] {
            let ok = if must_be_positive {
                value > 0.0
            } else {
                value >= 0.0
            };
            if !ok || !value.is_finite() {
                return Err(ConfigError::InvalidDimension { field, value });
            }
        }
        if self.min_zoom <= 0.0 || self.min_zoom > self.max_zoom || !self.max_zoom.is_finite() {
            return Err(ConfigError::InvalidZoomBounds {
                min: self.min_zoom,
                max: self.max_zoom,
            });
        }
        Ok(())
    }

    /// Responsive pre-pass: shrink node and gap sizes proportionally when the
    /// default footprint for `round_count` columns of up to `max_round_size`
    /// stacked matches would overflow the container. Node sizes floor at the
    /// minimum legible size; gaps keep shrinking past it.
    pub fn responsive(self, container: Size, round_count: usize, max_round_size: usize) -> Self {
        if container.width <= 0.0 || container.height <= 0.0 || round_count == 0 {
            return self;
        }

        let cols = round_count as f64;
        let rows = max_round_size.max(1) as f64;
        let (main_extent, cross_extent) = match self.orientation {
            Orientation::LeftToRight => (container.width, container.height),
            Orientation::TopToBottom => (container.height, container.width),
        };

        let main_needed = cols * self.node_main() + (cols - 1.0) * self.round_gap;
        let cross_needed = rows * (self.node_cross() + self.match_gap);
        let ratio = (main_extent / main_needed)
            .min(cross_extent / cross_needed)
            .min(1.0);
        if ratio >= 1.0 {
            return self;
        }

        Self {
            node_width: (self.node_width * ratio).max(MIN_NODE_WIDTH),
            node_height: (self.node_height * ratio).max(MIN_NODE_HEIGHT),
            round_gap: self.round_gap * ratio,
            match_gap: self.match_gap * ratio,
            ..self
        }
    }

    /// Node extent along the main axis (the axis rounds advance along).
    pub fn node_main(&self) -> f64 {
        match self.orientation {
            Orientation::LeftToRight => self.node_width,
            Orientation::TopToBottom => self.node_height,
        }
    }

    /// Node extent along the cross axis (the axis matches stack along).
    pub fn node_cross(&self) -> f64 {
        match self.orientation {
            Orientation::LeftToRight => self.node_height,
            Orientation::TopToBottom => self.node_width,
        }
    }

    /// Map (main, cross) coordinates to an (x, y) point per orientation.
    pub fn place(&self, main: f64, cross: f64) -> crate::Point {
        match self.orientation {
            Orientation::LeftToRight => crate::Point::new(main, cross),
            Orientation::TopToBottom => crate::Point::new(cross, main),
        }
    }

    pub fn node_size(&self) -> Size {
        Size::new(self.node_width, self.node_height)
    }

    pub fn clamp_zoom(&self, scale: f64) -> f64 {
        scale.clamp(self.min_zoom, self.max_zoom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_empty_options_gives_defaults() {
        let config = LayoutConfig::resolve(&LayoutOptions::default()).unwrap();
        assert_eq!(config, LayoutConfig::default());
    }

    #[test]
    fn test_partial_options_merge_over_defaults() {
        let options = LayoutOptions {
            node_width: Some(200.0),
            max_zoom: Some(5.0),
            ..Default::default()
        };
        let config = LayoutConfig::resolve(&options).unwrap();
        assert_eq!(config.node_width, 200.0);
        assert_eq!(config.max_zoom, 5.0);
        assert_eq!(config.node_height, DEFAULT_NODE_HEIGHT);
        assert_eq!(config.round_gap, DEFAULT_ROUND_GAP);
    }

    #[test]
    fn test_negative_spacing_rejected() {
        let options = LayoutOptions {
            match_gap: Some(-4.0),
            ..Default::default()
        };
        assert_eq!(
            LayoutConfig::resolve(&options),
            Err(ConfigError::InvalidDimension {
                field: "match_gap",
                value: -4.0
            })
        );
    }

    #[test]
    fn test_inverted_zoom_bounds_rejected() {
        let options = LayoutOptions {
            min_zoom: Some(2.0),
            max_zoom: Some(0.5),
            ..Default::default()
        };
        assert!(matches!(
            LayoutConfig::resolve(&options),
            Err(ConfigError::InvalidZoomBounds { .. })
        ));
    }

    #[test]
    fn test_responsive_noop_when_bracket_fits() {
        let config = LayoutConfig::default();
        let shrunk = config.responsive(Size::new(10_000.0, 10_000.0), 3, 4);
        assert_eq!(shrunk, config);
    }

    #[test]
    fn test_responsive_shrinks_proportionally() {
        let config = LayoutConfig::default();
        let shrunk = config.responsive(Size::new(800.0, 600.0), 4, 8);
        assert!(shrunk.node_width < config.node_width);
        assert!(shrunk.node_height < config.node_height);
        assert!(shrunk.round_gap < config.round_gap);
        // Shrink is uniform across gaps.
        let ratio = shrunk.round_gap / config.round_gap;
        assert!((shrunk.match_gap / config.match_gap - ratio).abs() < 1e-9);
    }

    #[test]
    fn test_responsive_floors_at_minimum_node_size() {
        let config = LayoutConfig::default();
        let shrunk = config.responsive(Size::new(100.0, 80.0), 6, 32);
        assert_eq!(shrunk.node_width, MIN_NODE_WIDTH);
        assert_eq!(shrunk.node_height, MIN_NODE_HEIGHT);
    }

    #[test]
    fn test_zoom_clamping() {
        let config = LayoutConfig::default();
        assert_eq!(config.clamp_zoom(10.0), DEFAULT_MAX_ZOOM);
        assert_eq!(config.clamp_zoom(0.0001), DEFAULT_MIN_ZOOM);
        assert_eq!(config.clamp_zoom(1.0), 1.0);
    }
}
