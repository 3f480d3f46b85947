use crate::{
    data::manual::ManualEntry,
    session::Action,
    view::params::{SortDirection, SortKey, ViewParams},
};
use egui::{Button, ComboBox, TextEdit, Ui};

/// Text the user typed into the filter boxes. Kept separately from
/// [`ViewParams`] so a half-typed number stays on screen.
#[derive(Debug, Clone, Default)]
pub struct FilterInputs {
    pub threshold: String,
    pub search: String,
}

/// Threshold, search and sort widgets. Returns the actions for whatever the
/// user changed this frame.
pub fn filter_sort_controls(ui: &mut Ui, inputs: &mut FilterInputs, params: &ViewParams) -> Vec<Action> {
    let mut actions = Vec::new();

    ui.horizontal(|ui| {
        let threshold = ui.add(
            TextEdit::singleline(&mut inputs.threshold)
                .hint_text("Filter value >")
                .desired_width(120.0),
        );
        if threshold.changed() {
            actions.push(Action::SetThreshold(ViewParams::threshold_from_text(
                &inputs.threshold,
            )));
        }

        let search = ui.add(
            TextEdit::singleline(&mut inputs.search)
                .hint_text("Search city")
                .desired_width(160.0),
        );
        if search.changed() {
            actions.push(Action::SetSearch(inputs.search.clone()));
        }

        let mut key = params.sort_key;
        ComboBox::from_id_source("sort_key")
            .selected_text(key.label())
            .show_ui(ui, |ui| {
                for option in SortKey::ALL {
                    ui.selectable_value(&mut key, option, option.label());
                }
            });
        if key != params.sort_key {
            actions.push(Action::SetSortKey(key));
        }

        let mut direction = params.direction;
        ComboBox::from_id_source("sort_direction")
            .selected_text(direction.label())
            .show_ui(ui, |ui| {
                for option in SortDirection::ALL {
                    ui.selectable_value(&mut direction, option, option.label());
                }
            });
        if direction != params.direction {
            actions.push(Action::SetSortDirection(direction));
        }
    });

    actions
}

/// The four-field manual entry form. Returns the submitted entry when "Add"
/// is pressed; the button stays disabled while any field is empty.
pub fn manual_entry_form(ui: &mut Ui, entry: &mut ManualEntry) -> Option<ManualEntry> {
    let mut submitted = None;

    ui.horizontal(|ui| {
        ui.add(TextEdit::singleline(&mut entry.city).hint_text("City").desired_width(120.0));
        ui.add(TextEdit::singleline(&mut entry.lat).hint_text("Latitude").desired_width(90.0));
        ui.add(TextEdit::singleline(&mut entry.lng).hint_text("Longitude").desired_width(90.0));
        ui.add(TextEdit::singleline(&mut entry.value).hint_text("Value").desired_width(110.0));

        if ui.add_enabled(entry.is_complete(), Button::new("Add")).clicked() {
            submitted = Some(entry.clone());
        }
    });

    submitted
}
