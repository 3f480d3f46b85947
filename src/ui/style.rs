use crate::view::bucket::Bucket;
use egui::{Color32, FontId, Stroke};

/// Style configuration for the map canvas
#[derive(Debug, Clone)]
pub struct MapStyle {
    /// Fill behind the graticule
    pub background_color: Color32,
    /// Latitude/longitude grid lines
    pub graticule_stroke: Stroke,
    /// Style for markers
    pub markers: MarkerStyle,
    /// Style for the marker popup
    pub popup: PopupStyle,
    /// Style for the legend box
    pub legend: LegendStyle,
}

/// Style for map markers
#[derive(Debug, Clone)]
pub struct MarkerStyle {
    /// Marker radius
    pub radius: f32,
    /// Border stroke
    pub border: Stroke,
    /// Border of the marker whose popup is open
    pub selected_border: Stroke,
    /// Extra radius while hovered
    pub hover_growth: f32,
}

#[derive(Debug, Clone)]
pub struct PopupStyle {
    pub background_color: Color32,
    pub border_stroke: Stroke,
    pub rounding: f32,
    pub padding: f32,
    pub title_font: FontId,
    pub body_font: FontId,
    pub text_color: Color32,
}

#[derive(Debug, Clone)]
pub struct LegendStyle {
    pub background_color: Color32,
    pub text_color: Color32,
    pub font_id: FontId,
    pub padding: f32,
    pub margin: f32,
    pub swatch_radius: f32,
}

impl Default for MapStyle {
    fn default() -> Self {
        Self {
            background_color: Color32::from_rgb(170, 211, 223),
            graticule_stroke: Stroke::new(1.0, Color32::from_rgba_unmultiplied(255, 255, 255, 120)),
            markers: MarkerStyle::default(),
            popup: PopupStyle::default(),
            legend: LegendStyle::default(),
        }
    }
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self {
            radius: crate::core::constants::MARKER_RADIUS,
            border: Stroke::new(2.0, Color32::WHITE),
            selected_border: Stroke::new(2.5, Color32::BLACK),
            hover_growth: 2.0,
        }
    }
}

impl Default for PopupStyle {
    fn default() -> Self {
        Self {
            background_color: Color32::WHITE,
            border_stroke: Stroke::new(1.0, Color32::GRAY),
            rounding: 4.0,
            padding: 8.0,
            title_font: FontId::proportional(14.0),
            body_font: FontId::proportional(12.0),
            text_color: Color32::BLACK,
        }
    }
}

impl Default for LegendStyle {
    fn default() -> Self {
        Self {
            background_color: Color32::from_rgba_unmultiplied(255, 255, 255, 220),
            text_color: Color32::BLACK,
            font_id: FontId::proportional(12.0),
            padding: 8.0,
            margin: 10.0,
            swatch_radius: 6.0,
        }
    }
}

impl MapStyle {
    pub fn with_marker_radius(mut self, radius: f32) -> Self {
        self.markers.radius = radius;
        self
    }
}

/// Marker fill for a bucket
pub fn bucket_color(bucket: Bucket) -> Color32 {
    let [r, g, b] = bucket.rgb();
    Color32::from_rgb(r, g, b)
}
