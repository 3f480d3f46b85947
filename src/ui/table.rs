use crate::{
    ui::style::bucket_color,
    view::presentation::ViewSnapshot,
};
use egui::{Grid, RichText, ScrollArea, Ui};

/// Data table with one row per visible record, in the same order as the
/// markers. Returns the row whose city was clicked.
pub fn record_table(ui: &mut Ui, snapshot: &ViewSnapshot) -> Option<usize> {
    let mut clicked = None;

    ui.heading("City Data");
    ui.label(format!(
        "Showing {} of {} records",
        snapshot.visible_count(),
        snapshot.total
    ));

    ScrollArea::vertical()
        .auto_shrink([false, true])
        .show(ui, |ui| {
            Grid::new("record_table")
                .striped(true)
                .num_columns(4)
                .min_col_width(80.0)
                .show(ui, |ui| {
                    for header in ["City", "Latitude", "Longitude", "Value"] {
                        ui.strong(header);
                    }
                    ui.end_row();

                    for (index, row) in snapshot.rows.iter().enumerate() {
                        let city = RichText::new(&row.city).color(bucket_color(row.bucket));
                        if ui.link(city).clicked() {
                            clicked = Some(index);
                        }
                        ui.label(&row.lat);
                        ui.label(&row.lng);
                        ui.label(&row.value);
                        ui.end_row();
                    }
                });
        });

    clicked
}
