//! Drilling-log analysis: derive a band file from raw well intervals
//!
//! A drilling log lists intervals with the formation at each end (`起始地层`,
//! `结束地层`) and the measured depths (`起始井深`, `结束井深`). Every distinct
//! formation becomes one band: its top is the shallowest start depth over the
//! deepest end depth of the intervals naming it, its bottom is 1. The group is
//! the `类别` of the first reference row whose `地层信息` contains the name,
//! `未知` when none does.
//!
//! A log that names no formation at all falls back to the reference rows,
//! each spanning its whole row with `地层顶深`/`地层底深` as the depth range.
//!
//! The summary is written with the band columns first, so the calibrator can
//! open it directly.

use std::collections::HashSet;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use crate::dataset::{
    column_index, column_indices, reader, COL_BOTTOM, COL_FORMATION, COL_GROUP, COL_REFERENCE,
    COL_TOP,
};
use crate::error::{StrataError, StrataResult};
use crate::model::Depth;

pub const COL_START_FORMATION: &str = "起始地层";
pub const COL_END_FORMATION: &str = "结束地层";
pub const COL_START_DEPTH: &str = "起始井深";
pub const COL_END_DEPTH: &str = "结束井深";
pub const COL_CATEGORY: &str = "类别";
pub const COL_REF_TOP_DEPTH: &str = "地层顶深";
pub const COL_REF_BOTTOM_DEPTH: &str = "地层底深";

/// Group of a formation no reference row mentions
pub const UNKNOWN_GROUP: &str = "未知";

/// Summary columns in file order
pub const SUMMARY_COLUMNS: [&str; 8] = [
    COL_FORMATION,
    COL_GROUP,
    COL_TOP,
    COL_BOTTOM,
    "最小深度",
    "最大深度",
    "平均深度",
    "出现次数",
];

const BOM: &[u8] = "\u{feff}".as_bytes();

/// One interval of the drilling log
#[derive(Debug, Clone, PartialEq)]
pub struct DrillingInterval {
    pub start_formation: String,
    pub end_formation: String,
    pub start_depth: Option<f64>,
    pub end_depth: Option<f64>,
}

impl DrillingInterval {
    fn mentions(&self, formation: &str) -> bool {
        self.start_formation.contains(formation) || self.end_formation.contains(formation)
    }
}

/// One row of the reference file
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceRow {
    pub name: String,
    /// `类别`, else `所属层位`, else [`UNKNOWN_GROUP`]
    pub group: String,
    pub top_depth: Option<f64>,
    pub bottom_depth: Option<f64>,
}

/// Depth statistics of one formation
#[derive(Debug, Clone, PartialEq)]
pub struct FormationSummary {
    pub formation_name: String,
    pub group_name: String,
    /// Normalized top, rounded to 6 decimals
    pub top: f64,
    pub bottom: f64,
    pub min_depth: Option<f64>,
    pub max_depth: Option<f64>,
    /// Intervals mentioning the formation
    pub count: usize,
}

impl FormationSummary {
    pub fn avg_depth(&self) -> Option<f64> {
        Some((self.min_depth? + self.max_depth?) / 2.0)
    }

    fn from_reference(row: &ReferenceRow) -> Self {
        Self {
            formation_name: row.name.clone(),
            group_name: row.group.clone(),
            top: 0.0,
            bottom: 1.0,
            min_depth: row.top_depth,
            max_depth: row.bottom_depth,
            count: 1,
        }
    }
}

fn number(cell: &str) -> Option<f64> {
    Depth::parse(cell).as_f64()
}

fn round6(value: f64) -> f64 {
    (value * 1e6).round() / 1e6
}

/// Parse drilling intervals; blank lines are skipped
pub fn read_drilling_csv<R: Read>(input: R) -> StrataResult<Vec<DrillingInterval>> {
    let mut rdr = reader(input);
    let [start, end, start_depth, end_depth] = column_indices(
        rdr.headers()?,
        [
            COL_START_FORMATION,
            COL_END_FORMATION,
            COL_START_DEPTH,
            COL_END_DEPTH,
        ],
    )?;

    let mut intervals = Vec::new();
    for row in rdr.records() {
        let row = row?;
        if row.iter().all(|c| c.trim().is_empty()) {
            continue;
        }
        let cell = |i: usize| row.get(i).unwrap_or("").trim();
        intervals.push(DrillingInterval {
            start_formation: cell(start).to_string(),
            end_formation: cell(end).to_string(),
            start_depth: number(cell(start_depth)),
            end_depth: number(cell(end_depth)),
        });
    }
    Ok(intervals)
}

/// Parse reference rows; only `地层信息` is required
pub fn read_reference_rows<R: Read>(input: R) -> StrataResult<Vec<ReferenceRow>> {
    let mut rdr = reader(input);
    let headers = rdr.headers()?.clone();
    let [name] = column_indices(&headers, [COL_REFERENCE])?;
    let category = column_index(&headers, COL_CATEGORY);
    let group_name = column_index(&headers, COL_GROUP);
    let top = column_index(&headers, COL_REF_TOP_DEPTH);
    let bottom = column_index(&headers, COL_REF_BOTTOM_DEPTH);

    let mut rows = Vec::new();
    for row in rdr.records() {
        let row = row?;
        let cell = |i: Option<usize>| i.and_then(|i| row.get(i)).unwrap_or("").trim();
        let formation = cell(Some(name));
        if formation.is_empty() {
            continue;
        }
        let group = [cell(category), cell(group_name)]
            .into_iter()
            .find(|g| !g.is_empty())
            .unwrap_or(UNKNOWN_GROUP);
        rows.push(ReferenceRow {
            name: formation.to_string(),
            group: group.to_string(),
            top_depth: number(cell(top)),
            bottom_depth: number(cell(bottom)),
        });
    }
    Ok(rows)
}

/// Distinct formation names: start column first, then end column
fn distinct_formations(intervals: &[DrillingInterval]) -> Vec<&str> {
    let mut seen = HashSet::new();
    intervals
        .iter()
        .map(|i| i.start_formation.as_str())
        .chain(intervals.iter().map(|i| i.end_formation.as_str()))
        .filter(|f| !f.is_empty() && *f != "nan" && seen.insert(*f))
        .collect()
}

fn summarize(
    formation: &str,
    intervals: &[DrillingInterval],
    reference: &[ReferenceRow],
) -> Option<FormationSummary> {
    let subset: Vec<&DrillingInterval> = intervals.iter().filter(|i| i.mentions(formation)).collect();
    if subset.is_empty() {
        return None;
    }
    let min_depth = subset.iter().filter_map(|i| i.start_depth).reduce(f64::min);
    let max_depth = subset.iter().filter_map(|i| i.end_depth).reduce(f64::max);
    let top = match (min_depth, max_depth) {
        (Some(min), Some(max)) if max > 0.0 => round6(min / max),
        _ => 0.0,
    };
    let group_name = reference
        .iter()
        .find(|r| r.name.contains(formation))
        .map_or(UNKNOWN_GROUP, |r| r.group.as_str());

    Some(FormationSummary {
        formation_name: formation.to_string(),
        group_name: group_name.to_string(),
        top,
        bottom: 1.0,
        min_depth,
        max_depth,
        count: subset.len(),
    })
}

/// Summarize every formation of the log, or fall back to the reference rows
///
/// Fails with [`StrataError::EmptyDataset`] when neither yields a row.
pub fn summarize_formations(
    intervals: &[DrillingInterval],
    reference: &[ReferenceRow],
) -> StrataResult<Vec<FormationSummary>> {
    let summaries: Vec<_> = distinct_formations(intervals)
        .into_iter()
        .filter_map(|f| summarize(f, intervals, reference))
        .collect();
    if !summaries.is_empty() {
        return Ok(summaries);
    }

    log::warn!(
        "summarize_formations: no formation in {} intervals, using {} reference rows",
        intervals.len(),
        reference.len()
    );
    if reference.is_empty() {
        return Err(StrataError::EmptyDataset);
    }
    Ok(reference.iter().map(FormationSummary::from_reference).collect())
}

/// Read both files and summarize
pub fn analyze_drilling(drilling: &Path, reference: &Path) -> StrataResult<Vec<FormationSummary>> {
    let file = File::open(drilling).map_err(|e| StrataError::io(drilling, e))?;
    let intervals = read_drilling_csv(file)?;
    let file = File::open(reference).map_err(|e| StrataError::io(reference, e))?;
    let rows = read_reference_rows(file)?;

    let summaries = summarize_formations(&intervals, &rows)?;
    log::info!(
        "analyze_drilling: {} formations from {} intervals in {:?}",
        summaries.len(),
        intervals.len(),
        drilling
    );
    Ok(summaries)
}

fn optional_cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Write the summary as a BOM-prefixed CSV
pub fn write_summary_csv<W: Write>(summaries: &[FormationSummary], mut out: W) -> StrataResult<()> {
    out.write_all(BOM).map_err(csv::Error::from)?;
    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record(SUMMARY_COLUMNS)?;
    for s in summaries {
        wtr.write_record([
            s.formation_name.clone(),
            s.group_name.clone(),
            s.top.to_string(),
            s.bottom.to_string(),
            optional_cell(s.min_depth),
            optional_cell(s.max_depth),
            optional_cell(s.avg_depth()),
            s.count.to_string(),
        ])?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

pub fn export_summary_csv(summaries: &[FormationSummary], path: &Path) -> StrataResult<()> {
    let file = File::create(path).map_err(|e| StrataError::io(path, e))?;
    write_summary_csv(summaries, file)?;
    log::info!("export_summary_csv: {} formations to {:?}", summaries.len(), path);
    Ok(())
}
