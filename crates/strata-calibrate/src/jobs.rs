//! File jobs run off the UI thread
//!
//! Each job is a plain blocking function returning `anyhow::Result`; the UI
//! wraps them in `tokio::task::spawn_blocking` and maps the outcome to a
//! message.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use strata_core::dataset::Dataset;
use strata_core::drilling;
use strata_core::export::{
    dictionary_file_name, export_bands_csv, export_file_name, load_dictionary, merge_dictionary,
    save_dictionary, to_json, FormationDictionary, MergeStrategy,
};
use strata_core::{BandRecord, Editor, LayoutConfig, LayoutMode};

use crate::cli::LaunchOptions;

/// Read the band file and the optional reference order
pub fn load_dataset(data: &Path, reference: Option<&Path>) -> Result<Dataset> {
    Dataset::load(data, reference).with_context(|| format!("Failed to load {}", data.display()))
}

/// Run a blocking job on tokio's blocking pool, flattening errors to text
pub async fn run_blocking<T, F>(job: F) -> Result<T, String>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    match tokio::task::spawn_blocking(job).await {
        Ok(result) => result.map_err(|e| format!("{e:#}")),
        Err(e) => Err(format!("Background job failed: {e}")),
    }
}

/// Stem used to name exports
fn source_stem(source_name: Option<&str>) -> String {
    source_name
        .and_then(|name| Path::new(name).file_stem())
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "export".to_string())
}

/// Write the verification CSV into `out_dir`
pub fn export_csv(bands: &[BandRecord], source_name: Option<&str>, out_dir: &Path) -> Result<PathBuf> {
    let path = out_dir.join(export_file_name(source_name));
    export_bands_csv(bands, &path).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

/// Write the lossless JSON record list into `out_dir`
pub fn export_json(bands: &[BandRecord], source_name: Option<&str>, out_dir: &Path) -> Result<PathBuf> {
    let path = out_dir.join(format!("{}_records.json", source_stem(source_name)));
    let text = to_json(bands)?;
    fs::write(&path, text).with_context(|| format!("Failed to write {}", path.display()))?;
    log::info!("export_json: {} bands to {:?}", bands.len(), path);
    Ok(path)
}

/// Merge the bands into a formation dictionary and write it into `out_dir`
///
/// Without `existing` the output is `<stem>.json`; with it the strategy
/// suffix is added, even when that file does not exist yet.
pub fn export_dictionary(
    bands: &[BandRecord],
    source_name: Option<&str>,
    existing: Option<&Path>,
    strategy: MergeStrategy,
    out_dir: &Path,
) -> Result<PathBuf> {
    let base = match existing {
        Some(path) if path.exists() => Some(load_dictionary(path)?),
        Some(path) => {
            log::warn!("export_dictionary: {:?} not found, starting empty", path);
            None
        }
        None => None,
    };
    let merged_with = existing.map(|_| strategy);
    let dictionary = merge_dictionary(base.unwrap_or_else(FormationDictionary::new), bands, strategy);

    let path = out_dir.join(dictionary_file_name(&source_stem(source_name), merged_with));
    save_dictionary(&dictionary, &path).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

/// Headless render: load, lay out and write an SVG snapshot
pub fn render_svg(options: &LaunchOptions, config: LayoutConfig) -> Result<PathBuf> {
    let (Some(data), Some(out)) = (options.data.as_deref(), options.svg.clone()) else {
        anyhow::bail!("--svg needs a data file and an output path");
    };
    let dataset = load_dataset(data, options.reference.as_deref())?;
    let mut editor = Editor::with_dataset(config, dataset);
    editor.set_mode(initial_mode(options));
    fs::write(&out, editor.to_svg()).with_context(|| format!("Failed to write {}", out.display()))?;
    log::info!(
        "render_svg: {} rows ({:?}) to {:?}",
        editor.layout().rows.len(),
        editor.mode(),
        out
    );
    Ok(out)
}

/// Headless analysis: summarize a drilling log into a band file
pub fn analyze_drilling(options: &LaunchOptions) -> Result<PathBuf> {
    let (Some(drilling), Some(reference), Some(out)) = (
        options.analyze.as_deref(),
        options.reference.as_deref(),
        options.output.clone(),
    ) else {
        anyhow::bail!("--analyze needs a drilling log, a reference file and an output path");
    };
    let summaries = drilling::analyze_drilling(drilling, reference)
        .with_context(|| format!("Failed to analyze {}", drilling.display()))?;
    drilling::export_summary_csv(&summaries, &out)
        .with_context(|| format!("Failed to write {}", out.display()))?;
    Ok(out)
}

/// Directory exports go to: next to the data file, else the working directory
pub fn output_dir(data: Option<&Path>) -> PathBuf {
    data.and_then(Path::parent)
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Mode the window opens in
pub fn initial_mode(options: &LaunchOptions) -> LayoutMode {
    LayoutMode::from_expanded(options.expanded)
}
