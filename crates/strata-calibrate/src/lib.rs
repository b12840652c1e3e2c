//! Strata Calibrate - interactive calibration of stratigraphic columns
//!
//! Loads a band CSV (and optionally a reference group order), draws every
//! band on its group's row and lets the user fix intervals by dragging,
//! through the add/edit forms, or by inspecting formations via the legend.
//! Results are exported as a verification CSV, a JSON record list or a
//! formation dictionary.

pub mod cli;
pub mod jobs;
pub mod ui;
