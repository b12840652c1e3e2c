//! Strata Calibrate - interactive stratigraphic column calibration
//!
//! Opens the column editor window. With `--svg` it renders a snapshot of
//! the loaded column instead, and with `--analyze` it derives a band file
//! from a drilling log; neither opens a window.
//!
//! ## Command line
//!
//! `strata-calibrate [OPTIONS] [DATA.csv]`, see `--help` for the flags.

use iced::Size;
use strata_calibrate::cli::{LaunchOptions, USAGE};
use strata_calibrate::jobs;
use strata_calibrate::ui::CalibrateApp;
use strata_core::config::load_config;

fn main() -> iced::Result {
    // Initialize logger - set RUST_LOG=debug for verbose output
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let options = match LaunchOptions::parse(std::env::args().skip(1)) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("error: {e:#}\n\n{USAGE}");
            std::process::exit(2);
        }
    };
    if options.help {
        println!("{USAGE}");
        return Ok(());
    }

    if options.analyze.is_some() {
        match jobs::analyze_drilling(&options) {
            Ok(path) => {
                println!("Wrote {}", path.display());
                return Ok(());
            }
            Err(e) => {
                log::error!("Drilling analysis failed: {e:#}");
                std::process::exit(1);
            }
        }
    }

    if options.svg.is_some() {
        let config = load_config(&options.config_path());
        match jobs::render_svg(&options, config) {
            Ok(path) => {
                println!("Wrote {}", path.display());
                return Ok(());
            }
            Err(e) => {
                log::error!("SVG render failed: {e:#}");
                std::process::exit(1);
            }
        }
    }

    log::info!("strata-calibrate starting up");
    if let Some(data) = &options.data {
        log::info!("Data file: {:?}", data);
    }

    iced::application(
        move || CalibrateApp::new(options.clone()),
        CalibrateApp::update,
        CalibrateApp::view,
    )
    .title(CalibrateApp::title)
    .window_size(Size::new(1500.0, 900.0))
    .theme(CalibrateApp::theme)
    .run()
}
