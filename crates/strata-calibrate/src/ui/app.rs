//! Main application state and iced implementation

use std::path::PathBuf;
use std::time::{Duration, Instant};

use iced::widget::{
    button, center, column, container, mouse_area, opaque, row, scrollable, stack, text, Space,
};
use iced::{Color, Element, Length, Task, Theme};
use strata_core::config::{load_config, save_config};
use strata_core::highlight::HighlightController;
use strata_core::{Command, Dataset, Editor, EditorEvent, LayoutConfig};
use strata_widgets::{column_view, legend_view, ColumnEvent};

use super::band_form::{self, BandForm, FormField};
use crate::cli::LaunchOptions;
use crate::jobs;

/// Width reserved for the legend panel
const LEGEND_WIDTH: f32 = 220.0;

/// Presses on the same legend entry closer than this may belong to a double click
const LEGEND_PRESS_WINDOW: Duration = Duration::from_millis(500);

/// First press of a possible legend double click
#[derive(Debug, Clone)]
struct LegendPress {
    at: Instant,
    formation: String,
    /// Legend state before the press was applied
    before: HighlightController,
}

/// Application state
pub struct CalibrateApp {
    /// Layout and editing engine
    editor: Editor,
    /// Command-line options the window was opened with
    options: LaunchOptions,
    /// Where layout settings are saved
    config_path: PathBuf,
    /// Name of the loaded band file
    source_name: Option<String>,
    /// Open add/edit modal
    form: Option<BandForm>,
    /// Pending first press on a legend entry
    legend_press: Option<LegendPress>,
    /// A load is in flight
    loading: bool,
    /// Unexported edits exist
    modified: bool,
    /// Status line text
    status: String,
}

/// Application messages
#[derive(Debug, Clone)]
pub enum Message {
    // Data
    Reload,
    Loaded(Result<Dataset, String>),
    ConfigLoaded(Result<LayoutConfig, String>),

    // Column and legend
    Column(ColumnEvent),
    ToggleMode,
    LegendClicked(String),
    LegendDoubleClicked(String),

    // Band form
    OpenAddForm,
    FormInput(FormField, String),
    SubmitForm,
    CloseForm,

    // Exports
    ExportCsv,
    ExportJson,
    ExportDictionary,
    ExportComplete(Result<PathBuf, String>),

    // Settings
    SaveConfig,
    SaveConfigComplete(Result<PathBuf, String>),
}

impl CalibrateApp {
    /// Create the application and kick off the initial load
    pub fn new(options: LaunchOptions) -> (Self, Task<Message>) {
        let config_path = options.config_path();
        let config = load_config(&config_path);
        let mut editor = Editor::new(config);
        editor.set_mode(jobs::initial_mode(&options));

        let (status, task) = match &options.data {
            Some(path) => (
                format!("Loading {}...", path.display()),
                Task::done(Message::Reload),
            ),
            None => (
                String::from("No data file. Add bands or restart with a CSV path."),
                Task::none(),
            ),
        };

        let app = Self {
            editor,
            options,
            config_path,
            source_name: None,
            form: None,
            legend_press: None,
            loading: false,
            modified: false,
            status,
        };
        (app, task)
    }

    /// Window title
    pub fn title(&self) -> String {
        match &self.source_name {
            Some(name) if self.modified => format!("strata-calibrate - {name} *"),
            Some(name) => format!("strata-calibrate - {name}"),
            None => String::from("strata-calibrate"),
        }
    }

    /// Handle a message
    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::Reload => {
                let Some(data) = self.options.data.clone() else {
                    self.status = String::from("No data file to reload");
                    return Task::none();
                };
                if self.loading {
                    return Task::none();
                }
                self.loading = true;
                let reference = self.options.reference.clone();
                let config_path = self.config_path.clone();
                return Task::batch([
                    Task::perform(
                        jobs::run_blocking(move || Ok(load_config(&config_path))),
                        Message::ConfigLoaded,
                    ),
                    Task::perform(
                        jobs::run_blocking(move || jobs::load_dataset(&data, reference.as_deref())),
                        Message::Loaded,
                    ),
                ]);
            }
            Message::ConfigLoaded(result) => match result {
                Ok(config) => self.editor.set_config(config),
                Err(e) => log::warn!("Keeping current settings: {}", e),
            },
            Message::Loaded(result) => {
                self.loading = false;
                match result {
                    Ok(dataset) => {
                        self.source_name = dataset.source_name.clone();
                        self.form = None;
                        self.legend_press = None;
                        let events = self.editor.load(dataset);
                        self.handle_events(events);
                        self.modified = false;
                        self.status = format!(
                            "Loaded {} bands in {} groups",
                            self.editor.store().bands().len(),
                            self.editor.layout().rows.len()
                        );
                    }
                    Err(e) => {
                        log::error!("Failed to load data: {}", e);
                        self.status = format!("Load failed: {}", e);
                    }
                }
            }

            Message::Column(event) => self.apply(event.into_command()),
            Message::ToggleMode => self.apply(Command::ToggleMode),
            Message::LegendClicked(formation) => {
                let now = Instant::now();
                let second_press = self.legend_press.as_ref().is_some_and(|p| {
                    p.formation == formation && now.duration_since(p.at) <= LEGEND_PRESS_WINDOW
                });
                if !second_press {
                    self.legend_press = Some(LegendPress {
                        at: now,
                        formation: formation.clone(),
                        before: self.editor.highlight().clone(),
                    });
                }
                self.apply(Command::LegendClick(formation));
            }
            Message::LegendDoubleClicked(formation) => {
                // Both presses were already applied as single clicks; undo them
                if let Some(press) = self.legend_press.take() {
                    if press.formation == formation {
                        self.editor.set_highlight(press.before);
                    }
                }
                self.apply(Command::LegendDoubleClick(formation));
            }

            Message::OpenAddForm => {
                let group = self.editor.layout().rows.last().map(|r| r.group.as_str());
                self.form = Some(BandForm::add(group));
            }
            Message::FormInput(field, value) => {
                if let Some(form) = self.form.as_mut() {
                    form.set(field, value);
                }
            }
            Message::SubmitForm => {
                let Some(form) = &self.form else {
                    return Task::none();
                };
                match form.to_command().and_then(|cmd| self.editor.apply(cmd)) {
                    Ok(events) => {
                        self.form = None;
                        self.handle_events(events);
                    }
                    Err(e) => {
                        log::warn!("Rejected band form: {}", e);
                        if let Some(form) = self.form.as_mut() {
                            form.error = Some(e.to_string());
                        }
                    }
                }
            }
            Message::CloseForm => self.form = None,

            Message::ExportCsv => {
                let (bands, source, dir) = self.export_inputs();
                self.status = String::from("Exporting CSV...");
                return Task::perform(
                    jobs::run_blocking(move || jobs::export_csv(&bands, source.as_deref(), &dir)),
                    Message::ExportComplete,
                );
            }
            Message::ExportJson => {
                let (bands, source, dir) = self.export_inputs();
                self.status = String::from("Exporting JSON...");
                return Task::perform(
                    jobs::run_blocking(move || jobs::export_json(&bands, source.as_deref(), &dir)),
                    Message::ExportComplete,
                );
            }
            Message::ExportDictionary => {
                let (bands, source, dir) = self.export_inputs();
                let existing = self.options.dictionary.clone();
                let strategy = self.options.merge_strategy;
                self.status = String::from("Exporting formation dictionary...");
                return Task::perform(
                    jobs::run_blocking(move || {
                        jobs::export_dictionary(
                            &bands,
                            source.as_deref(),
                            existing.as_deref(),
                            strategy,
                            &dir,
                        )
                    }),
                    Message::ExportComplete,
                );
            }
            Message::ExportComplete(result) => match result {
                Ok(path) => {
                    log::info!("Exported {:?}", path);
                    self.modified = false;
                    self.status = format!("Saved {}", path.display());
                }
                Err(e) => {
                    log::error!("Export failed: {}", e);
                    self.status = format!("Export failed: {}", e);
                }
            },

            Message::SaveConfig => {
                let config = self.editor.config().clone();
                let path = self.config_path.clone();
                return Task::perform(
                    jobs::run_blocking(move || {
                        save_config(&config, &path)?;
                        Ok(path)
                    }),
                    Message::SaveConfigComplete,
                );
            }
            Message::SaveConfigComplete(result) => match result {
                Ok(path) => {
                    log::info!("Settings saved to {:?}", path);
                    self.status = String::from("Settings saved");
                }
                Err(e) => {
                    log::error!("Failed to save settings: {}", e);
                    self.status = format!("Failed to save: {}", e);
                }
            },
        }

        Task::none()
    }

    /// Render the UI
    pub fn view(&self) -> Element<'_, Message> {
        let highlight = self.editor.highlight();
        let legend = legend_view(
            &self.editor.legend(),
            highlight.highlighted(),
            highlight.exclusive(),
            Message::LegendClicked,
            Message::LegendDoubleClicked,
        );

        let body = row![
            scrollable(column_view(&self.editor, Message::Column))
                .width(Length::Fill)
                .height(Length::Fill),
            container(legend)
                .width(Length::Fixed(LEGEND_WIDTH))
                .height(Length::Fill),
        ]
        .spacing(10);

        let main = column![self.view_header(), body, text(&self.status).size(13)].spacing(10);

        let base: Element<Message> = container(main)
            .width(Length::Fill)
            .height(Length::Fill)
            .padding(20)
            .into();

        // Overlay the band form if open
        if let Some(form) = &self.form {
            let backdrop = mouse_area(
                container(Space::new())
                    .width(Length::Fill)
                    .height(Length::Fill)
                    .style(|_theme| container::Style {
                        background: Some(Color::from_rgba(0.0, 0.0, 0.0, 0.6).into()),
                        ..Default::default()
                    }),
            )
            .on_press(Message::CloseForm);

            let modal = center(opaque(band_form::view(form)))
                .width(Length::Fill)
                .height(Length::Fill);

            stack![base, backdrop, modal].into()
        } else {
            base
        }
    }

    /// Application theme
    pub fn theme(&self) -> Theme {
        Theme::Dark
    }

    /// Header with mode toggle, editing and export actions
    fn view_header(&self) -> Element<'_, Message> {
        let expanded = self.editor.mode().is_expanded();
        let mode_btn = button(text(if expanded { "Collapse" } else { "Expand" }))
            .on_press(Message::ToggleMode)
            .style(if expanded {
                button::primary
            } else {
                button::secondary
            });

        let has_bands = !self.editor.store().bands().is_empty();
        let export_btn = |label, message| {
            button(text(label))
                .on_press_maybe(has_bands.then_some(message))
                .style(button::secondary)
        };

        let reload_btn = button(text("Reload"))
            .on_press_maybe(self.options.data.as_ref().map(|_| Message::Reload))
            .style(button::secondary);

        row![
            text("strata-calibrate").size(24),
            Space::new().width(Length::Fill),
            mode_btn,
            button(text("Add band"))
                .on_press(Message::OpenAddForm)
                .style(button::secondary),
            export_btn("Export CSV", Message::ExportCsv),
            export_btn("Export JSON", Message::ExportJson),
            export_btn("Export dictionary", Message::ExportDictionary),
            button(text("Save settings"))
                .on_press(Message::SaveConfig)
                .style(button::secondary),
            reload_btn,
        ]
        .spacing(10)
        .into()
    }

    /// Run an editor command and react to its events
    fn apply(&mut self, command: Command) {
        match self.editor.apply(command) {
            Ok(events) => self.handle_events(events),
            Err(e) => {
                log::warn!("Rejected command: {}", e);
                self.status = e.to_string();
            }
        }
    }

    fn handle_events(&mut self, events: Vec<EditorEvent>) {
        for event in events {
            match event {
                EditorEvent::BandDoubleClicked(band) => self.form = Some(BandForm::edit(&band)),
                EditorEvent::ModeToggled(expanded) => {
                    self.status = if expanded {
                        String::from("Expanded: one row per formation")
                    } else {
                        String::from("Collapsed: one row per group")
                    };
                }
                EditorEvent::LegendClicked { formation, double } => {
                    log::debug!("legend {} (double: {})", formation, double);
                }
                EditorEvent::StoreChanged => {
                    if self.source_name.is_some() || !self.editor.store().bands().is_empty() {
                        self.modified = true;
                    }
                }
            }
        }
    }

    /// Snapshot of what every export needs
    fn export_inputs(&self) -> (Vec<strata_core::BandRecord>, Option<String>, PathBuf) {
        (
            self.editor.store().bands().to_vec(),
            self.source_name.clone(),
            jobs::output_dir(self.options.data.as_deref()),
        )
    }
}
