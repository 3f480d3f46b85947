use anyhow::Context;
use clap::Parser;
use datamap::{
    loader::FileLoader,
    ui::{
        filter_sort_controls, manual_entry_form, record_table, FilterInputs, MarkerCanvas,
        TileLayer,
    },
    Action, ManualEntry, NoticeLevel, Outcome, Session, ViewSnapshot, ViewerConfig,
};
use std::path::PathBuf;
use tokio::runtime::Handle;

/// Interactive data-driven map viewer
#[derive(Debug, clap::Parser)]
#[command(name = "datamap-app", version)]
struct Args {
    /// JSON configuration file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Draw the lat/lng grid only, without fetching map tiles
    #[arg(long)]
    no_tiles: bool,

    /// CSV or JSON file to load on start
    #[arg(value_name = "DATA_FILE")]
    data_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    datamap::init_logging();

    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => ViewerConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ViewerConfig::default(),
    };

    if args.no_tiles {
        config.map.tiles.enabled = false;
    }

    let handle = Handle::current();
    let mut loader = FileLoader::new(handle.clone());
    if let Some(path) = args.data_file {
        loader.load(path);
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([config.window.width, config.window.height])
            .with_title(config.window.title.clone()),
        ..Default::default()
    };

    eframe::run_native(
        "datamap-app",
        options,
        Box::new(move |_cc| Box::new(DataMapApp::new(config, loader, handle))),
    )
    .map_err(|e| anyhow::anyhow!("viewer failed: {e}"))
}

struct DataMapApp {
    config: ViewerConfig,
    session: Session,
    canvas: MarkerCanvas,
    loader: FileLoader,
    filters: FilterInputs,
    entry: ManualEntry,
    path_input: String,
    snapshot: ViewSnapshot,
}

impl DataMapApp {
    fn new(config: ViewerConfig, loader: FileLoader, handle: Handle) -> Self {
        let session = Session::new(&config);
        let snapshot = session.snapshot();

        let mut canvas = MarkerCanvas::new(&config.map);
        if config.map.tiles.enabled {
            match TileLayer::from_config(handle, &config.map.tiles) {
                Ok(tiles) => canvas = canvas.with_tiles(tiles),
                Err(e) => log::warn!("map tiles disabled: {}", e),
            }
        }

        Self {
            canvas,
            session,
            loader,
            filters: FilterInputs::default(),
            entry: ManualEntry::default(),
            path_input: String::new(),
            snapshot,
            config,
        }
    }

    fn apply(&mut self, action: Action) {
        match self.session.dispatch(action) {
            Ok(Outcome::Loaded { accepted, dropped }) => {
                log::info!("loaded {} records ({} dropped)", accepted, dropped);
                self.refresh();
                if self.config.map.fit_on_load {
                    self.canvas.fit(self.snapshot.bounds.as_ref());
                }
            }
            Ok(Outcome::Appended) => self.entry.clear(),
            Ok(_) => {}
            // The session keeps the message as its notice
            Err(e) => log::warn!("{}", e),
        }
    }

    /// Rebuilds the cached snapshot when the session moved on
    fn refresh(&mut self) {
        if self.snapshot.revision != self.session.revision() {
            self.snapshot = self.session.snapshot();
        }
    }

    fn drain_loads(&mut self) {
        for result in self.loader.poll() {
            match result {
                Ok(file) => self.apply(Action::LoadFile {
                    name: file.name,
                    content: file.content,
                }),
                Err(e) => self.session.report_error(e.to_string()),
            }
        }
    }

    fn accept_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.clone());
        for file in dropped {
            if let Some(bytes) = &file.bytes {
                self.loader.load_bytes(file.name.clone(), bytes);
            } else if let Some(path) = file.path {
                self.loader.load(path);
            }
        }
    }

    fn top_bar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.label("Upload CSV/JSON:");
            ui.add(
                egui::TextEdit::singleline(&mut self.path_input)
                    .hint_text("path to file, or drop it on the window")
                    .desired_width(280.0),
            );
            let can_open = !self.path_input.trim().is_empty() && !self.loader.is_loading();
            if ui.add_enabled(can_open, egui::Button::new("Open")).clicked() {
                self.loader.load(self.path_input.trim());
            }
            if self.loader.is_loading() {
                ui.spinner();
            }
        });

        let mut actions = filter_sort_controls(ui, &mut self.filters, self.session.params());
        if let Some(entry) = manual_entry_form(ui, &mut self.entry) {
            actions.push(Action::SubmitManual(entry));
        }
        for action in actions {
            self.apply(action);
        }

        if let Some(notice) = self.session.notice().cloned() {
            ui.horizontal(|ui| {
                let color = match notice.level {
                    NoticeLevel::Info => egui::Color32::from_rgb(40, 120, 40),
                    NoticeLevel::Error => egui::Color32::from_rgb(190, 30, 30),
                };
                ui.colored_label(color, &notice.message);
                if ui.small_button("✕").clicked() {
                    self.apply(Action::DismissNotice);
                }
            });
        }
    }
}

impl eframe::App for DataMapApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_loads();
        self.accept_dropped_files(ctx);
        self.refresh();

        egui::TopBottomPanel::top("controls").show(ctx, |ui| {
            ui.heading("Interactive Data-Driven Map");
            self.top_bar(ui);
        });
        self.refresh();

        egui::TopBottomPanel::bottom("table")
            .resizable(true)
            .default_height(220.0)
            .show(ctx, |ui| {
                if let Some(row) = record_table(ui, &self.snapshot) {
                    self.canvas.select_row(row, self.snapshot.revision);
                    if let Some(marker) = self.snapshot.markers.iter().find(|m| m.row == row) {
                        log::debug!("selected {}", marker.title);
                    }
                }
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            self.canvas.show(ui, &self.snapshot);
        });

        if self.loader.is_loading() {
            ctx.request_repaint();
        }
    }
}
