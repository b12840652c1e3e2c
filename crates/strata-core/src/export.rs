//! Export: verification CSV, lossless JSON and the formation dictionary

use std::collections::{BTreeMap, HashSet};
use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::dataset::{BAND_COLUMNS, COL_BOTTOM, COL_GROUP, COL_TOP};
use crate::error::{StrataError, StrataResult};
use crate::model::{BandRecord, Depth};

/// Export name used when the data did not come from a file
pub const DEFAULT_EXPORT_NAME: &str = "export_verification.csv";

const BOM: &[u8] = "\u{feff}".as_bytes();

/// Round to 2 decimals for the verification file; raw text is kept
fn csv_cell(depth: &Depth) -> String {
    match depth {
        Depth::Value(v) if v.is_finite() => ((v * 100.0).round() / 100.0).to_string(),
        Depth::Value(v) => v.to_string(),
        Depth::Raw(s) => s.clone(),
    }
}

/// Write bands as a BOM-prefixed CSV with the four band columns
pub fn write_bands_csv<W: Write>(bands: &[BandRecord], mut out: W) -> StrataResult<()> {
    out.write_all(BOM).map_err(csv::Error::from)?;
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record(BAND_COLUMNS)?;
    for band in bands {
        wtr.write_record([
            band.formation_name.as_str(),
            band.group_name.as_str(),
            csv_cell(&band.top).as_str(),
            csv_cell(&band.bottom).as_str(),
        ])?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

pub fn export_bands_csv(bands: &[BandRecord], path: &Path) -> StrataResult<()> {
    let file = File::create(path).map_err(|e| StrataError::io(path, e))?;
    write_bands_csv(bands, file)?;
    log::info!("export_bands_csv: {} bands to {:?}", bands.len(), path);
    Ok(())
}

/// `<stem>_verification.csv`, or the default name without a source file
pub fn export_file_name(source_name: Option<&str>) -> String {
    source_name
        .map(|name| {
            Path::new(name)
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| name.to_string())
        })
        .filter(|stem| !stem.is_empty())
        .map(|stem| format!("{stem}_verification.csv"))
        .unwrap_or_else(|| DEFAULT_EXPORT_NAME.to_string())
}

/// Band list as JSON, numbers kept as numbers
pub fn to_json(bands: &[BandRecord]) -> StrataResult<String> {
    Ok(serde_json::to_string_pretty(bands)?)
}

/// Parse a band list produced by [`to_json`] (ids are assigned by the store)
pub fn from_json(text: &str) -> StrataResult<Vec<BandRecord>> {
    Ok(serde_json::from_str(text)?)
}

/// One formation in the dictionary file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormationEntry {
    #[serde(rename = "所属层位")]
    pub group_name: String,
    #[serde(rename = "顶界所处位置（0~1）")]
    pub top: String,
    #[serde(rename = "底界所处位置（0~1）")]
    pub bottom: String,
}

impl FormationEntry {
    fn from_band(band: &BandRecord) -> Self {
        Self {
            group_name: band.group_name.clone(),
            top: depth_text(&band.top),
            bottom: depth_text(&band.bottom),
        }
    }
}

fn depth_text(depth: &Depth) -> String {
    match depth {
        Depth::Value(v) => v.to_string(),
        Depth::Raw(s) => s.clone(),
    }
}

/// Formation name to its group and interval
pub type FormationDictionary = BTreeMap<String, FormationEntry>;

/// How bands are merged into an existing dictionary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergeStrategy {
    /// Only add formations the dictionary does not have yet
    #[default]
    KeepExisting,
    /// Band data overwrites dictionary entries
    ReplaceAll,
}

impl MergeStrategy {
    fn suffix(self) -> &'static str {
        match self {
            Self::KeepExisting => "u",
            Self::ReplaceAll => "r",
        }
    }
}

/// Merge bands into a dictionary; for repeated names the last band wins
pub fn merge_dictionary(
    existing: FormationDictionary,
    bands: &[BandRecord],
    strategy: MergeStrategy,
) -> FormationDictionary {
    let kept: HashSet<String> = match strategy {
        MergeStrategy::KeepExisting => existing.keys().cloned().collect(),
        MergeStrategy::ReplaceAll => HashSet::new(),
    };
    let mut merged = existing;
    for band in bands.iter().filter(|b| !kept.contains(&b.formation_name)) {
        merged.insert(band.formation_name.clone(), FormationEntry::from_band(band));
    }
    merged
}

/// `<stem>.json`, or `<stem>_with_config_{u,r}.json` when an existing dictionary was named
pub fn dictionary_file_name(stem: &str, merged_with: Option<MergeStrategy>) -> String {
    match merged_with {
        Some(strategy) => format!("{stem}_with_config_{}.json", strategy.suffix()),
        None => format!("{stem}.json"),
    }
}

pub fn load_dictionary(path: &Path) -> StrataResult<FormationDictionary> {
    let file = File::open(path).map_err(|e| StrataError::io(path, e))?;
    let dictionary: FormationDictionary = serde_json::from_reader(file)?;
    log::info!("load_dictionary: {} formations from {:?}", dictionary.len(), path);
    Ok(dictionary)
}

pub fn save_dictionary(dictionary: &FormationDictionary, path: &Path) -> StrataResult<()> {
    let file = File::create(path).map_err(|e| StrataError::io(path, e))?;
    serde_json::to_writer_pretty(file, dictionary)?;
    log::info!("save_dictionary: {} formations to {:?}", dictionary.len(), path);
    Ok(())
}
