use crate::{
    core::{
        config::MapViewConfig,
        geo::{LatLng, LatLngBounds, Point, MAX_LATITUDE},
        viewport::Viewport,
    },
    ui::{
        popup::draw_popup,
        style::{bucket_color, MapStyle},
    },
    view::presentation::{LegendEntry, MarkerSpec, ViewSnapshot},
};
#[cfg(feature = "tiles")]
use crate::ui::tiles::TileLayer;
use egui::{pos2, Align2, Painter, Pos2, Rect, Response, Sense, Ui, Vec2};

/// Map area showing one marker per visible record over a raster tile base
/// map. A lat/lng grid shows wherever no tile has arrived yet, and is the
/// whole background when no tile layer is attached.
///
/// Drag to pan, double-click or the +/− buttons to zoom, click a marker to
/// open its popup.
pub struct MarkerCanvas {
    viewport: Viewport,
    style: MapStyle,
    fit_padding: f64,
    /// Table row of the marker whose popup is open
    selected: Option<usize>,
    /// Snapshot revision the selection belongs to
    selection_revision: u64,
    #[cfg(feature = "tiles")]
    tiles: Option<TileLayer>,
}

impl MarkerCanvas {
    pub fn new(config: &MapViewConfig) -> Self {
        let mut viewport = Viewport::new(config.center, config.zoom, Point::new(800.0, 600.0));
        viewport.set_zoom_limits(config.min_zoom, config.max_zoom);

        Self {
            viewport,
            style: MapStyle::default().with_marker_radius(config.marker_radius),
            fit_padding: config.fit_padding,
            selected: None,
            selection_revision: 0,
            #[cfg(feature = "tiles")]
            tiles: None,
        }
    }

    #[cfg(feature = "tiles")]
    pub fn with_tiles(mut self, tiles: TileLayer) -> Self {
        self.tiles = Some(tiles);
        self
    }

    #[cfg(feature = "tiles")]
    pub fn tiles(&self) -> Option<&TileLayer> {
        self.tiles.as_ref()
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Opens the popup of the marker for table row `row`
    pub fn select_row(&mut self, row: usize, revision: u64) {
        self.selected = Some(row);
        self.selection_revision = revision;
    }

    /// Frames the given bounds; no-op without bounds
    pub fn fit(&mut self, bounds: Option<&LatLngBounds>) {
        if let Some(bounds) = bounds {
            self.viewport.fit_bounds(bounds, self.fit_padding);
        }
    }

    pub fn show(&mut self, ui: &mut Ui, snapshot: &ViewSnapshot) -> Response {
        let (response, painter) = ui.allocate_painter(ui.available_size(), Sense::click_and_drag());
        let rect = response.rect;
        self.viewport
            .set_size(Point::new(rect.width() as f64, rect.height() as f64));

        if snapshot.revision != self.selection_revision {
            self.selected = None;
            self.selection_revision = snapshot.revision;
        }

        if response.dragged() {
            let delta = response.drag_delta();
            self.viewport.pan(Point::new(delta.x as f64, delta.y as f64));
        }
        if response.double_clicked() {
            self.viewport.zoom_in();
        }

        painter.rect_filled(rect, 0.0, self.style.background_color);
        self.draw_graticule(&painter, rect);
        self.draw_tiles(ui, &painter, rect);

        let hovered = response
            .hover_pos()
            .and_then(|pos| self.marker_at(rect, &snapshot.markers, pos));

        if response.clicked() {
            self.selected = response
                .interact_pointer_pos()
                .and_then(|pos| self.marker_at(rect, &snapshot.markers, pos))
                .map(|i| snapshot.markers[i].row);
        }

        for (i, marker) in snapshot.markers.iter().enumerate() {
            let center = self.screen_pos(rect, &marker.position);
            let mut radius = self.style.markers.radius;
            if hovered == Some(i) {
                radius += self.style.markers.hover_growth;
            }
            let border = if self.selected == Some(marker.row) {
                self.style.markers.selected_border
            } else {
                self.style.markers.border
            };
            painter.circle(center, radius, bucket_color(marker.bucket), border);
        }

        if let Some(marker) = self
            .selected
            .and_then(|row| snapshot.markers.iter().find(|m| m.row == row))
        {
            let anchor = self.screen_pos(rect, &marker.position);
            draw_popup(ui, &painter, anchor, &marker.title, &marker.body, &self.style.popup);
        }

        self.draw_legend(ui, &painter, rect, &snapshot.legend);
        self.zoom_controls(ui, rect, snapshot);

        response
    }

    #[cfg(feature = "tiles")]
    fn draw_tiles(&mut self, ui: &Ui, painter: &Painter, rect: Rect) {
        let Some(tiles) = self.tiles.as_mut() else {
            return;
        };
        if tiles.paint(ui.ctx(), painter, rect, &self.viewport) {
            ui.ctx().request_repaint();
        }

        let style = &self.style.legend;
        painter.text(
            pos2(rect.min.x + 4.0, rect.max.y - 4.0),
            Align2::LEFT_BOTTOM,
            tiles.attribution(),
            egui::FontId::proportional(11.0),
            style.text_color,
        );
    }

    #[cfg(not(feature = "tiles"))]
    fn draw_tiles(&mut self, _ui: &Ui, _painter: &Painter, _rect: Rect) {}

    fn screen_pos(&self, rect: Rect, position: &LatLng) -> Pos2 {
        let px = self.viewport.lat_lng_to_pixel(position);
        pos2(rect.min.x + px.x as f32, rect.min.y + px.y as f32)
    }

    /// Index of the topmost marker under `pos`
    fn marker_at(&self, rect: Rect, markers: &[MarkerSpec], pos: Pos2) -> Option<usize> {
        let hit_radius = self.style.markers.radius + self.style.markers.hover_growth;
        markers
            .iter()
            .enumerate()
            .rev()
            .find(|(_, m)| self.screen_pos(rect, &m.position).distance(pos) <= hit_radius)
            .map(|(i, _)| i)
    }

    fn draw_graticule(&self, painter: &Painter, rect: Rect) {
        let step = match self.viewport.zoom {
            z if z < 3.0 => 30.0,
            z if z < 5.0 => 10.0,
            z if z < 7.0 => 5.0,
            z if z < 9.0 => 1.0,
            _ => 0.25,
        };
        let stroke = self.style.graticule_stroke;
        let top = self.screen_pos(rect, &LatLng::new(MAX_LATITUDE, 0.0)).y;
        let bottom = self.screen_pos(rect, &LatLng::new(-MAX_LATITUDE, 0.0)).y;
        let left = self.screen_pos(rect, &LatLng::new(0.0, -180.0)).x;
        let right = self.screen_pos(rect, &LatLng::new(0.0, 180.0)).x;

        let mut lng = -180.0;
        while lng <= 180.0 {
            let x = self.screen_pos(rect, &LatLng::new(0.0, lng)).x;
            if x >= rect.min.x && x <= rect.max.x {
                painter.line_segment([pos2(x, top), pos2(x, bottom)], stroke);
            }
            lng += step;
        }

        let mut lat = -80.0;
        while lat <= 80.0 {
            let y = self.screen_pos(rect, &LatLng::new(lat, 0.0)).y;
            if y >= rect.min.y && y <= rect.max.y {
                painter.line_segment([pos2(left, y), pos2(right, y)], stroke);
            }
            lat += step;
        }
    }

    fn draw_legend(&self, ui: &Ui, painter: &Painter, rect: Rect, legend: &[LegendEntry]) {
        let style = &self.style.legend;
        let line_height = ui.fonts(|f| f.row_height(&style.font_id)) + 4.0;
        let title = "Legend";
        let text_width = legend
            .iter()
            .map(|entry| entry.label.as_str())
            .chain(std::iter::once(title))
            .map(|text| {
                ui.fonts(|f| f.layout_no_wrap(text.to_string(), style.font_id.clone(), style.text_color))
                    .size()
                    .x
            })
            .fold(0.0_f32, f32::max);

        let swatch = style.swatch_radius * 2.0 + 6.0;
        let size = Vec2::new(
            text_width + swatch + style.padding * 2.0,
            line_height * (legend.len() + 1) as f32 + style.padding * 2.0,
        );
        let boxed = Rect::from_min_size(
            rect.max - size - Vec2::splat(style.margin),
            size,
        );
        painter.rect_filled(boxed, 4.0, style.background_color);

        let mut cursor = boxed.min + Vec2::splat(style.padding);
        painter.text(cursor, Align2::LEFT_TOP, title, style.font_id.clone(), style.text_color);
        cursor.y += line_height;

        for entry in legend {
            let swatch_center = pos2(cursor.x + style.swatch_radius, cursor.y + line_height / 2.0 - 2.0);
            painter.circle_filled(swatch_center, style.swatch_radius, bucket_color(entry.bucket));
            painter.text(
                pos2(cursor.x + swatch, cursor.y),
                Align2::LEFT_TOP,
                &entry.label,
                style.font_id.clone(),
                style.text_color,
            );
            cursor.y += line_height;
        }
    }

    fn zoom_controls(&mut self, ui: &mut Ui, rect: Rect, snapshot: &ViewSnapshot) {
        let size = Vec2::new(36.0, 28.0);
        let origin = rect.left_top() + Vec2::new(10.0, 10.0);
        let button = |i: usize| Rect::from_min_size(origin + Vec2::new(0.0, i as f32 * 32.0), size);

        if ui.put(button(0), egui::Button::new("+")).clicked() {
            self.viewport.zoom_in();
        }
        if ui.put(button(1), egui::Button::new("−")).clicked() {
            self.viewport.zoom_out();
        }
        let fit = ui.put(button(2), egui::Button::new("Fit")).on_hover_text("Fit to data");
        if fit.clicked() {
            self.fit(snapshot.bounds.as_ref());
        }
    }
}
