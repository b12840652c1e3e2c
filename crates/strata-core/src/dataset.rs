//! Dataset ingest: band CSV, reference-order CSV and group merging
//!
//! Band files carry one row per band with the columns below (UTF-8, an
//! optional BOM is stripped). Numeric cells that fail to parse are kept
//! verbatim so the classifier can flag them.
//!
//! | column | field |
//! |--------|-------|
//! | `地层名称` | formation name |
//! | `所属层位` | group name |
//! | `顶界所处位置（0~1）` | top |
//! | `底界所处位置（0~1）` | bottom |
//!
//! The reference file lists group names in the `地层信息` column. A band file
//! ending in `.json` is read as a record export instead.

use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::{StrataError, StrataResult};
use crate::export::from_json;
use crate::model::{BandId, BandRecord, Depth, GroupRecord};

pub const COL_FORMATION: &str = "地层名称";
pub const COL_GROUP: &str = "所属层位";
pub const COL_TOP: &str = "顶界所处位置（0~1）";
pub const COL_BOTTOM: &str = "底界所处位置（0~1）";
pub const COL_REFERENCE: &str = "地层信息";

/// Band columns in file order
pub const BAND_COLUMNS: [&str; 4] = [COL_FORMATION, COL_GROUP, COL_TOP, COL_BOTTOM];

const BOM: char = '\u{feff}';

/// Everything the editor needs to start a session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub bands: Vec<BandRecord>,
    pub groups: Vec<GroupRecord>,
    pub reference_order: Vec<String>,
    /// File name the bands were read from, used to name exports
    pub source_name: Option<String>,
}

impl Dataset {
    /// Assemble a dataset; the group list is derived from the bands
    pub fn new(bands: Vec<BandRecord>, reference_order: Vec<String>) -> Self {
        let groups = merge_group_order(&bands, &reference_order);
        Self {
            bands,
            groups,
            reference_order,
            source_name: None,
        }
    }

    /// Load a band file and an optional reference file
    ///
    /// A `.json` band file is read as a record export, anything else as CSV.
    pub fn load(bands_path: &Path, reference_path: Option<&Path>) -> StrataResult<Self> {
        let is_json = bands_path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let bands = if is_json {
            load_bands_json(bands_path)?
        } else {
            load_bands_csv(bands_path)?
        };
        let reference_order = match reference_path {
            Some(path) => load_reference_csv(path)?,
            None => Vec::new(),
        };
        let mut dataset = Self::new(bands, reference_order);
        dataset.source_name = bands_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned());
        log::info!(
            "load: {} bands in {} groups from {:?}",
            dataset.bands.len(),
            dataset.groups.len(),
            bands_path
        );
        Ok(dataset)
    }
}

pub(crate) fn reader<R: Read>(input: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(input)
}

/// Position of an optional column
pub(crate) fn column_index(headers: &csv::StringRecord, wanted: &str) -> Option<usize> {
    headers
        .iter()
        .position(|h| h.trim_start_matches(BOM).trim() == wanted)
}

/// Column positions for the requested names, or the list of missing ones
pub(crate) fn column_indices<const N: usize>(
    headers: &csv::StringRecord,
    wanted: [&str; N],
) -> StrataResult<[usize; N]> {
    let mut missing = Vec::new();
    let mut indices = [0; N];
    for (slot, column) in indices.iter_mut().zip(wanted) {
        match column_index(headers, column) {
            Some(i) => *slot = i,
            None => missing.push(column.to_string()),
        }
    }
    if missing.is_empty() {
        Ok(indices)
    } else {
        Err(StrataError::MissingColumns(missing))
    }
}

/// Parse band rows from any reader
pub fn read_bands_csv<R: Read>(input: R) -> StrataResult<Vec<BandRecord>> {
    let mut rdr = reader(input);
    let [name, group, top, bottom] = column_indices(rdr.headers()?, BAND_COLUMNS)?;

    let mut bands = Vec::new();
    for row in rdr.records() {
        let row = row?;
        let cell = |i: usize| row.get(i).unwrap_or("").trim();
        // Skip fully blank lines
        if row.iter().all(|c| c.trim().is_empty()) {
            continue;
        }
        bands.push(BandRecord {
            id: BandId::default(),
            formation_name: cell(name).to_string(),
            group_name: cell(group).to_string(),
            top: Depth::parse(cell(top)),
            bottom: Depth::parse(cell(bottom)),
        });
    }
    Ok(bands)
}

pub fn load_bands_csv(path: &Path) -> StrataResult<Vec<BandRecord>> {
    let file = File::open(path).map_err(|e| StrataError::io(path, e))?;
    read_bands_csv(file)
}

/// Band records from a JSON export; ids are assigned by the store
pub fn load_bands_json(path: &Path) -> StrataResult<Vec<BandRecord>> {
    let text = std::fs::read_to_string(path).map_err(|e| StrataError::io(path, e))?;
    from_json(&text)
}

/// Parse the reference order: non-empty names in row order, duplicates dropped
pub fn read_reference_csv<R: Read>(input: R) -> StrataResult<Vec<String>> {
    let mut rdr = reader(input);
    let [column] = column_indices(rdr.headers()?, [COL_REFERENCE])?;

    let mut seen = HashSet::new();
    let mut order = Vec::new();
    for row in rdr.records() {
        let row = row?;
        let name = row.get(column).unwrap_or("").trim();
        if !name.is_empty() && seen.insert(name.to_string()) {
            order.push(name.to_string());
        }
    }
    Ok(order)
}

pub fn load_reference_csv(path: &Path) -> StrataResult<Vec<String>> {
    let file = File::open(path).map_err(|e| StrataError::io(path, e))?;
    let order = read_reference_csv(file)?;
    log::info!("load_reference_csv: {} groups from {:?}", order.len(), path);
    Ok(order)
}

/// Distinct group names of the bands, in first-seen order
pub fn groups_in_bands(bands: &[BandRecord]) -> Vec<&str> {
    let mut seen = HashSet::new();
    bands
        .iter()
        .map(|b| b.group_name.as_str())
        .filter(|g| !g.is_empty() && seen.insert(*g))
        .collect()
}

/// Canonical group list: the reference order, then any other band groups
///
/// Without a reference order this is simply the band groups in first-seen
/// order. `sequence_index` is the 1-based position.
pub fn merge_group_order(bands: &[BandRecord], reference_order: &[String]) -> Vec<GroupRecord> {
    reorder_by_reference(groups_in_bands(bands), reference_order)
        .into_iter()
        .enumerate()
        .map(|(i, name)| GroupRecord::new(name, i as u32 + 1))
        .collect()
}

/// The full reference order, then names it does not list in input order
fn reorder_by_reference(names: Vec<&str>, reference_order: &[String]) -> Vec<String> {
    let listed: HashSet<&str> = reference_order.iter().map(String::as_str).collect();

    reference_order
        .iter()
        .cloned()
        .chain(
            names
                .into_iter()
                .filter(|n| !listed.contains(n))
                .map(str::to_string),
        )
        .collect()
}
