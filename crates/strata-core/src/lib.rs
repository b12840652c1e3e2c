//! Strata Core - Layout and direct-manipulation engine for stratigraphic columns
//!
//! Each rock unit (band) occupies a normalized depth interval `[0, 1]` inside
//! the row of its layer group. This crate owns everything that does not need
//! a live window:
//!
//! - **Record store**: the band and group records, mutated only through
//!   validated commands
//! - **Classifier**: abnormal-band detection and categorical colours
//! - **Row layout**: collapsed/expanded row domains and the x/y scales
//! - **Scene**: a retained vector scene graph rebuilt from the layout
//! - **Interaction**: the per-band drag state machine
//! - **Highlight**: legend-driven emphasis and exclusive visibility
//! - **Legend**: distinct formations with their colours
//! - **Dataset / export**: CSV and JSON ingest and export
//! - **Drilling analysis**: band files derived from raw drilling logs
//!
//! The [`editor::Editor`] ties these together as a single-writer state object
//! driven by [`editor::Command`]s.

pub mod classify;
pub mod color;
pub mod config;
pub mod dataset;
pub mod drilling;
pub mod editor;
pub mod error;
pub mod export;
pub mod highlight;
pub mod interaction;
pub mod layout;
pub mod legend;
pub mod model;
pub mod scale;
pub mod scene;
pub mod store;
pub mod validate;

pub use classify::{classify, Classification};
pub use color::Rgb;
pub use config::LayoutConfig;
pub use dataset::Dataset;
pub use editor::{Command, Editor, EditorEvent};
pub use error::{StrataError, StrataResult, ValidationError};
pub use interaction::{DragHandle, Hit};
pub use layout::{Layout, LayoutMode, Row};
pub use legend::LegendEntry;
pub use model::{BandId, BandRecord, Depth, GroupRecord};
pub use scene::Scene;
pub use store::RecordStore;
