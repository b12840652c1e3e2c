//! Band and group records
//!
//! A [`BandRecord`] is one rock-unit interval inside a layer group. Depths
//! are normalized to `[0, 1]` within the group's row. Records are kept
//! exactly as received so an unedited dataset exports unchanged: a depth
//! cell that is not a number stays as its raw text ([`Depth::Raw`]) and is
//! flagged abnormal by the classifier instead of being rejected.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable synthetic identifier assigned to a band when it enters the store
///
/// Drag write-back and edit commands locate records by this id, so two
/// bands with identical name, interval and group stay distinguishable.
/// `BandId::default()` (0) marks a record not yet owned by a store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BandId(pub u64);

impl fmt::Display for BandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A normalized depth value as received from the data source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Depth {
    /// Numeric cell
    Value(f64),
    /// Cell text that was not stored as a number
    Raw(String),
}

impl Depth {
    /// Parse a CSV cell, keeping the original text if it is not numeric
    pub fn parse(text: &str) -> Self {
        match text.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => Depth::Value(v),
            _ => Depth::Raw(text.to_string()),
        }
    }

    /// Wrap a computed value; non-finite values are kept as text
    pub fn from_f64(value: f64) -> Self {
        if value.is_finite() {
            Depth::Value(value)
        } else {
            Depth::Raw(value.to_string())
        }
    }

    /// The value as a finite number, if it is (or parses as) one
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Depth::Value(v) if v.is_finite() => Some(*v),
            Depth::Value(_) => None,
            Depth::Raw(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        }
    }

    /// Text used in band labels: numbers to 2 decimals, raw text verbatim
    pub fn display(&self) -> String {
        match self.as_f64() {
            Some(v) => format!("{:.2}", v),
            None => match self {
                Depth::Raw(s) => s.clone(),
                Depth::Value(v) => v.to_string(),
            },
        }
    }
}

impl From<f64> for Depth {
    fn from(value: f64) -> Self {
        Depth::from_f64(value)
    }
}

/// One rock-unit interval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BandRecord {
    /// Store-assigned identity (not part of the exchanged record)
    #[serde(skip)]
    pub id: BandId,
    /// Display identifier; uniqueness is only enforced on manual add
    pub formation_name: String,
    /// Owning layer group
    pub group_name: String,
    /// Normalized top boundary
    pub top: Depth,
    /// Normalized bottom boundary
    pub bottom: Depth,
}

impl BandRecord {
    /// Create a record with numeric boundaries (id assigned by the store)
    pub fn new(
        formation_name: impl Into<String>,
        group_name: impl Into<String>,
        top: f64,
        bottom: f64,
    ) -> Self {
        Self {
            id: BandId::default(),
            formation_name: formation_name.into(),
            group_name: group_name.into(),
            top: Depth::from_f64(top),
            bottom: Depth::from_f64(bottom),
        }
    }

    /// Top as a finite number, if it is one
    pub fn top_value(&self) -> Option<f64> {
        self.top.as_f64()
    }

    /// Bottom as a finite number, if it is one
    pub fn bottom_value(&self) -> Option<f64> {
        self.bottom.as_f64()
    }

    /// Overwrite both boundaries with numeric values
    pub fn set_interval(&mut self, top: f64, bottom: f64) {
        self.top = Depth::from_f64(top);
        self.bottom = Depth::from_f64(bottom);
    }

    /// Label text: `name (top, bottom)` with 2-decimal rounding
    pub fn label(&self) -> String {
        format!(
            "{} ({}, {})",
            self.formation_name,
            self.top.display(),
            self.bottom.display()
        )
    }
}

/// One layer group (a named row bucket)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupRecord {
    pub group_name: String,
    /// 1-based position when the group was first introduced
    pub sequence_index: u32,
}

impl GroupRecord {
    pub fn new(group_name: impl Into<String>, sequence_index: u32) -> Self {
        Self {
            group_name: group_name.into(),
            sequence_index,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_depth_parse_keeps_raw_text() {
        assert_eq!(Depth::parse(" 0.25 "), Depth::Value(0.25));
        assert_eq!(Depth::parse("abc"), Depth::Raw("abc".to_string()));
        assert_eq!(Depth::parse("NaN"), Depth::Raw("NaN".to_string()));
        assert_eq!(Depth::parse("inf").as_f64(), None);
    }

    #[test]
    fn test_raw_numeric_text_still_parses() {
        let d = Depth::Raw("0.5".to_string());
        assert_eq!(d.as_f64(), Some(0.5));
    }

    #[test]
    fn test_label_rounds_to_two_decimals() {
        let band = BandRecord::new("Shale", "G1", 0.12345, 0.9);
        assert_eq!(band.label(), "Shale (0.12, 0.90)");

        let mut broken = band.clone();
        broken.top = Depth::Raw("n/a".to_string());
        assert_eq!(broken.label(), "Shale (n/a, 0.90)");
    }

    #[test]
    fn test_json_keeps_numbers_as_numbers() {
        let band = BandRecord::new("Shale", "G1", 0.1, 0.35);
        let json = serde_json::to_string(&band).unwrap();
        assert_eq!(
            json,
            r#"{"formationName":"Shale","groupName":"G1","top":0.1,"bottom":0.35}"#
        );

        let raw: BandRecord = serde_json::from_str(
            r#"{"formationName":"X","groupName":"G","top":"bad","bottom":1.0}"#,
        )
        .unwrap();
        assert_eq!(raw.top, Depth::Raw("bad".to_string()));
        assert_eq!(raw.bottom, Depth::Value(1.0));
    }
}
