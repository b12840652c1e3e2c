//! User interface modules for strata-calibrate

pub mod app;
pub mod band_form;

pub use app::{CalibrateApp, Message};
