//! Cosmetic style and editor configuration.
//!
//! [`Style`] belongs to the [`Graph`](crate::Graph) document and is consumed by
//! the layout pass, the arc renderer and the draw-command builder.
//! [`EditorConfig`] holds the interaction tunables of a
//! [`CanvasController`](crate::CanvasController).

use serde::{Deserialize, Serialize};
use slint::Color;

/// Serialize `slint::Color` as an encoded ARGB `u32`.
pub(crate) mod color_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use slint::Color;

    pub fn serialize<S: Serializer>(color: &Color, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(color.as_argb_encoded())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Color, D::Error> {
        u32::deserialize(deserializer).map(Color::from_argb_encoded)
    }
}

/// Colors, thicknesses and spacing used to lay out and draw a graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Style {
    #[serde(with = "color_serde")]
    pub grid_color: Color,
    #[serde(with = "color_serde")]
    pub node_body: Color,
    #[serde(with = "color_serde")]
    pub node_border: Color,
    #[serde(with = "color_serde")]
    pub node_border_hovered: Color,
    #[serde(with = "color_serde")]
    pub node_border_selected: Color,
    #[serde(with = "color_serde")]
    pub text_color: Color,
    #[serde(with = "color_serde")]
    pub arc_color: Color,
    #[serde(with = "color_serde")]
    pub arc_hovered: Color,
    #[serde(with = "color_serde")]
    pub arc_selected: Color,
    #[serde(with = "color_serde")]
    pub flow_pin: Color,
    #[serde(with = "color_serde")]
    pub data_pin: Color,
    #[serde(with = "color_serde")]
    pub pin_hovered: Color,
    #[serde(with = "color_serde")]
    pub pin_connectable: Color,
    #[serde(with = "color_serde")]
    pub anchor_color: Color,
    #[serde(with = "color_serde")]
    pub selection_fill: Color,
    #[serde(with = "color_serde")]
    pub selection_stroke: Color,

    pub node_rounding: f64,
    pub border_thickness: f64,
    pub arc_thickness: f64,
    pub header_height: f64,
    pub node_padding: f64,
    pub min_node_width: f64,
    pub pin_size: f64,
    pub pin_spacing: f64,
    pub anchor_size: f64,
    /// Default horizontal distance of a new arc's anchors from their pins
    pub anchor_lead: f64,
    /// Fixed glyph advance used to size labels; real text shaping belongs to
    /// the rendering backend.
    pub char_width: f64,
    pub font_size: f64,

    /// Fraction of the horizontal distance used as bezier control offset
    pub bezier_curvature: f64,
    /// Minimum bezier control offset, in world units
    pub bezier_min_offset: f64,
    /// Maximum deviation of the arc polyline from the true curve, in world units
    pub tessellation_tolerance: f64,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            grid_color: Color::from_argb_u8(40, 255, 255, 255),
            node_body: Color::from_rgb_u8(45, 45, 52),
            node_border: Color::from_rgb_u8(80, 80, 90),
            node_border_hovered: Color::from_rgb_u8(150, 150, 160),
            node_border_selected: Color::from_rgb_u8(255, 190, 60),
            text_color: Color::from_rgb_u8(230, 230, 230),
            arc_color: Color::from_rgb_u8(200, 200, 200),
            arc_hovered: Color::from_rgb_u8(255, 255, 255),
            arc_selected: Color::from_rgb_u8(255, 190, 60),
            flow_pin: Color::from_rgb_u8(240, 240, 240),
            data_pin: Color::from_rgb_u8(100, 180, 255),
            pin_hovered: Color::from_rgb_u8(255, 255, 255),
            pin_connectable: Color::from_rgb_u8(120, 230, 120),
            anchor_color: Color::from_rgb_u8(255, 120, 60),
            selection_fill: Color::from_argb_u8(40, 100, 160, 255),
            selection_stroke: Color::from_argb_u8(200, 100, 160, 255),

            node_rounding: 6.0,
            border_thickness: 1.5,
            arc_thickness: 2.0,
            header_height: 26.0,
            node_padding: 8.0,
            min_node_width: 80.0,
            pin_size: 10.0,
            pin_spacing: 22.0,
            anchor_size: 8.0,
            anchor_lead: 24.0,
            char_width: 7.0,
            font_size: 13.0,

            bezier_curvature: 0.5,
            bezier_min_offset: 50.0,
            tessellation_tolerance: 0.25,
        }
    }
}

/// Interaction tunables for [`CanvasController`](crate::CanvasController).
///
/// Screen-space values are converted to world units with the current zoom
/// before hit-testing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub zoom_min: f64,
    pub zoom_max: f64,
    /// Zoom change per scroll-wheel tick
    pub zoom_step: f64,
    /// Pointer travel (screen px) before a press becomes a drag
    pub drag_threshold: f64,
    /// Max pointer distance (screen px) from an arc polyline to hit it
    pub arc_hit_tolerance: f64,
    /// Hit radius (screen px) of the selected arc's anchors
    pub anchor_hit_radius: f64,
    pub grid_spacing: f64,
    pub show_grid: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            zoom_min: 0.2,
            zoom_max: 4.0,
            zoom_step: 0.1,
            drag_threshold: 4.0,
            arc_hit_tolerance: 6.0,
            anchor_hit_radius: 8.0,
            grid_spacing: 24.0,
            show_grid: true,
        }
    }
}

impl EditorConfig {
    pub fn with_zoom_range(mut self, min: f64, max: f64) -> Self {
        self.zoom_min = min.min(max);
        self.zoom_max = max.max(min);
        self
    }

    pub fn with_zoom_step(mut self, step: f64) -> Self {
        self.zoom_step = step;
        self
    }

    pub fn with_drag_threshold(mut self, threshold: f64) -> Self {
        self.drag_threshold = threshold;
        self
    }

    pub fn with_arc_hit_tolerance(mut self, tolerance: f64) -> Self {
        self.arc_hit_tolerance = tolerance;
        self
    }

    pub fn with_anchor_hit_radius(mut self, radius: f64) -> Self {
        self.anchor_hit_radius = radius;
        self
    }

    pub fn with_grid(mut self, spacing: f64, show: bool) -> Self {
        self.grid_spacing = spacing;
        self.show_grid = show;
        self
    }

    /// Clamp a zoom factor into `[zoom_min, zoom_max]`.
    pub fn clamp_zoom(&self, zoom: f64) -> f64 {
        zoom.clamp(self.zoom_min, self.zoom_max)
    }
}
