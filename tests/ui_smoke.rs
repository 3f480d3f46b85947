#![cfg(feature = "egui")]

use datamap::prelude::*;
use egui::{CentralPanel, Context, RawInput};

/// Runs the widgets through real egui frames with the session behind them
#[cfg(test)]
mod ui_smoke_tests {
    use super::*;

    fn session_with_cities() -> Session {
        Session::with_records(
            &ViewerConfig::default(),
            vec![
                Record::new("Karachi", 24.86, 67.01, 14_910_000.0),
                Record::new("Multan", 30.16, 71.52, 1_872_000.0),
                Record::new("Unplaced", f64::NAN, f64::NAN, 7_000_000.0),
            ],
        )
    }

    #[test]
    fn test_canvas_and_table_render() {
        let ctx = Context::default();
        let session = session_with_cities();
        let snapshot = session.snapshot();
        let mut canvas = MarkerCanvas::new(&MapViewConfig::default());

        let mut canvas_rect = egui::Rect::NOTHING;
        let mut clicked = None;
        let _ = ctx.run(RawInput::default(), |ctx| {
            egui::TopBottomPanel::bottom("table").show(ctx, |ui| {
                clicked = record_table(ui, &snapshot);
            });
            CentralPanel::default().show(ctx, |ui| {
                canvas_rect = canvas.show(ui, &snapshot).rect;
            });
        });

        assert!(canvas_rect.width() > 0.0);
        assert!(canvas_rect.height() > 0.0);
        assert!(clicked.is_none());
        assert_eq!(snapshot.markers.len(), 2);
        assert_eq!(snapshot.rows.len(), 3);
    }

    #[test]
    fn test_fit_frames_the_markers() {
        let session = session_with_cities();
        let snapshot = session.snapshot();
        let mut canvas = MarkerCanvas::new(&MapViewConfig::default());

        canvas.fit(snapshot.bounds.as_ref());
        let center = canvas.viewport().center;
        assert!(center.lat > 24.0 && center.lat < 31.0);
        assert!(center.lng > 67.0 && center.lng < 72.0);
    }

    #[test]
    fn test_selecting_a_row_opens_its_popup() {
        let ctx = Context::default();
        let session = session_with_cities();
        let snapshot = session.snapshot();
        let mut canvas = MarkerCanvas::new(&MapViewConfig::default());
        canvas.select_row(1, snapshot.revision);

        let _ = ctx.run(RawInput::default(), |ctx| {
            CentralPanel::default().show(ctx, |ui| {
                canvas.show(ui, &snapshot);
            });
        });
        assert_eq!(canvas.selected(), Some(1));
    }

    #[test]
    fn test_controls_without_input_emit_nothing() {
        let ctx = Context::default();
        let params = ViewParams::default();
        let mut inputs = FilterInputs::default();
        let mut entry = ManualEntry::default();

        let mut actions = Vec::new();
        let mut submitted = None;
        let _ = ctx.run(RawInput::default(), |ctx| {
            CentralPanel::default().show(ctx, |ui| {
                actions = filter_sort_controls(ui, &mut inputs, &params);
                submitted = manual_entry_form(ui, &mut entry);
            });
        });

        assert!(actions.is_empty());
        assert!(submitted.is_none());
    }

    #[cfg(feature = "tiles")]
    #[test]
    fn test_unreachable_tile_server_leaves_the_grid_usable() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let config = TileConfig {
            // Nothing listens on port 9 of the loopback interface
            url_template: "http://127.0.0.1:9/{z}/{x}/{y}.png".to_string(),
            subdomains: Vec::new(),
            ..TileConfig::default()
        };
        let layer = TileLayer::from_config(runtime.handle().clone(), &config).unwrap();
        assert_eq!(layer.attribution(), "© OpenStreetMap contributors");

        let ctx = Context::default();
        let session = session_with_cities();
        let snapshot = session.snapshot();
        let mut canvas = MarkerCanvas::new(&MapViewConfig::default()).with_tiles(layer);

        let mut canvas_rect = egui::Rect::NOTHING;
        let _ = ctx.run(RawInput::default(), |ctx| {
            CentralPanel::default().show(ctx, |ui| {
                canvas_rect = canvas.show(ui, &snapshot).rect;
            });
        });

        assert!(canvas_rect.width() > 0.0);
        let tiles = canvas.tiles().unwrap();
        assert!(tiles.is_loading(), "visible tiles were requested");
        assert_eq!(tiles.cached_tiles(), 0);
    }
}
