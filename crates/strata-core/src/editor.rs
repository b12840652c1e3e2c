//! Command façade over the engine
//!
//! [`Editor`] is the single writer of the record store. Collaborators
//! (widgets, forms, loaders) send [`Command`]s and get back the
//! [`EditorEvent`]s they should react to.
//!
//! | command | store | layout + scene | restyle only |
//! |---------|-------|----------------|--------------|
//! | `ReplaceAll`, `AddBand`, `UpdateBand` | yes | rebuild | |
//! | `SetMode`, `ToggleMode` | | rebuild | |
//! | `PointerMove` while dragging | write-back | | dragged band |
//! | `LegendClick`, `LegendDoubleClick` | | | yes |

use crate::config::LayoutConfig;
use crate::dataset::Dataset;
use crate::error::ValidationError;
use crate::highlight::HighlightController;
use crate::interaction::{hit_test, DragController, Hit};
use crate::layout::{Layout, LayoutMode};
use crate::legend::{legend_entries, LegendEntry};
use crate::model::{BandId, BandRecord, GroupRecord};
use crate::scene::Scene;
use crate::store::RecordStore;

/// Inbound command
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Replace the whole store
    ReplaceAll {
        bands: Vec<BandRecord>,
        groups: Vec<GroupRecord>,
        reference_order: Vec<String>,
    },
    /// Add a band from the add form
    AddBand(BandRecord),
    /// Edit a band from the edit form
    UpdateBand {
        id: BandId,
        top: f64,
        bottom: f64,
        group: String,
    },
    /// Select the layout mode (`true` = expanded)
    SetMode(bool),
    ToggleMode,
    PointerDown { x: f32, y: f32 },
    PointerMove { x: f32, y: f32 },
    PointerUp,
    DoubleClick { x: f32, y: f32 },
    LegendClick(String),
    LegendDoubleClick(String),
}

/// Outbound event for UI collaborators
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    /// Open the edit form for this band
    BandDoubleClicked(BandRecord),
    /// Layout mode changed (`true` = expanded)
    ModeToggled(bool),
    LegendClicked { formation: String, double: bool },
    /// Records changed (load, add, edit or a finished drag)
    StoreChanged,
}

/// Owned editing session
#[derive(Debug, Clone)]
pub struct Editor {
    store: RecordStore,
    mode: LayoutMode,
    config: LayoutConfig,
    layout: Layout,
    scene: Scene,
    drag: DragController,
    highlight: HighlightController,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}

impl Editor {
    /// Empty editor in collapsed mode
    pub fn new(config: LayoutConfig) -> Self {
        let store = RecordStore::new();
        let mode = LayoutMode::Collapsed;
        let layout = Layout::compute(&store, mode, &config.canvas);
        let scene = Scene::build(&layout, &store, &config);
        Self {
            store,
            mode,
            config,
            layout,
            scene,
            drag: DragController::new(),
            highlight: HighlightController::new(),
        }
    }

    /// Editor preloaded with a dataset
    pub fn with_dataset(config: LayoutConfig, dataset: Dataset) -> Self {
        let mut editor = Self::new(config);
        editor.load(dataset);
        editor
    }

    /// Replace the store with a loaded dataset
    pub fn load(&mut self, dataset: Dataset) -> Vec<EditorEvent> {
        self.replace_all(dataset.bands, dataset.groups, dataset.reference_order)
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn mode(&self) -> LayoutMode {
        self.mode
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn highlight(&self) -> &HighlightController {
        &self.highlight
    }

    /// Reinstate a saved legend state (e.g. before the presses of a double click)
    pub fn set_highlight(&mut self, highlight: HighlightController) {
        self.highlight = highlight;
        self.highlight.apply(&mut self.scene);
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_dragging()
    }

    pub fn legend(&self) -> Vec<LegendEntry> {
        legend_entries(&self.store)
    }

    /// Band and handle under a canvas position
    pub fn hit(&self, x: f32, y: f32) -> Option<Hit> {
        hit_test(&self.scene, x, y)
    }

    /// Swap in a new layout configuration and redraw
    pub fn set_config(&mut self, config: LayoutConfig) {
        self.config = config;
        self.rebuild();
    }

    pub fn to_svg(&self) -> String {
        self.scene.to_svg(&self.config)
    }

    /// Apply one command
    ///
    /// Only the add/edit commands can fail; on failure nothing changed.
    pub fn apply(&mut self, command: Command) -> Result<Vec<EditorEvent>, ValidationError> {
        log::debug!("apply: {:?}", command);
        let events = match command {
            Command::ReplaceAll {
                bands,
                groups,
                reference_order,
            } => self.replace_all(bands, groups, reference_order),
            Command::AddBand(band) => {
                self.store.add_band(band).inspect_err(|e| log::warn!("apply: add rejected: {e}"))?;
                self.rebuild();
                vec![EditorEvent::StoreChanged]
            }
            Command::UpdateBand {
                id,
                top,
                bottom,
                group,
            } => {
                self.store
                    .update_band(id, top, bottom, &group)
                    .inspect_err(|e| log::warn!("apply: update rejected: {e}"))?;
                self.rebuild();
                vec![EditorEvent::StoreChanged]
            }
            Command::SetMode(expanded) => self.set_mode(LayoutMode::from_expanded(expanded)),
            Command::ToggleMode => self.set_mode(self.mode.toggled()),
            Command::PointerDown { x, y } => {
                self.drag.begin(&mut self.scene, &self.store, x, y);
                Vec::new()
            }
            Command::PointerMove { x, .. } => {
                self.drag.update(
                    x,
                    &mut self.store,
                    &self.layout,
                    &mut self.scene,
                    &self.config,
                );
                Vec::new()
            }
            Command::PointerUp => match self.drag.end(&mut self.scene) {
                Some(session) if session.current() != &session.snapshot => {
                    vec![EditorEvent::StoreChanged]
                }
                _ => Vec::new(),
            },
            Command::DoubleClick { x, y } => self
                .hit(x, y)
                .and_then(|hit| self.store.band(hit.id))
                .map(|band| vec![EditorEvent::BandDoubleClicked(band.clone())])
                .unwrap_or_default(),
            Command::LegendClick(formation) => {
                self.highlight.highlight(&mut self.scene, &formation);
                vec![EditorEvent::LegendClicked {
                    formation,
                    double: false,
                }]
            }
            Command::LegendDoubleClick(formation) => {
                self.highlight.toggle_exclusive(&mut self.scene, &formation);
                vec![EditorEvent::LegendClicked {
                    formation,
                    double: true,
                }]
            }
        };
        Ok(events)
    }

    fn replace_all(
        &mut self,
        bands: Vec<BandRecord>,
        groups: Vec<GroupRecord>,
        reference_order: Vec<String>,
    ) -> Vec<EditorEvent> {
        self.store.replace(bands, groups, reference_order);
        self.highlight = HighlightController::new();
        self.rebuild();
        vec![EditorEvent::StoreChanged]
    }

    /// Switch layout mode and redraw
    pub fn set_mode(&mut self, mode: LayoutMode) -> Vec<EditorEvent> {
        self.mode = mode;
        log::info!("set_mode: {:?}", mode);
        self.rebuild();
        vec![EditorEvent::ModeToggled(mode.is_expanded())]
    }

    /// Full layout and scene pass from the current store
    fn rebuild(&mut self) {
        self.drag.cancel();
        self.layout = Layout::compute(&self.store, self.mode, &self.config.canvas);
        self.scene = Scene::build(&self.layout, &self.store, &self.config);
        self.highlight.apply(&mut self.scene);
    }
}
