//! Validity classifier
//!
//! A band is abnormal when either boundary is not a finite number, lies
//! outside `[0, 1]`, or when `top > bottom`. Abnormal bands get a fixed
//! black fill with white text and are always drawn fully opaque.

use crate::color::{formation_color, Rgb, BLACK, WHITE};
use crate::model::{BandRecord, Depth};

/// Fill used for abnormal bands
pub const ABNORMAL_FILL: Rgb = BLACK;
/// Label colour on abnormal bands
pub const ABNORMAL_TEXT: Rgb = WHITE;
/// Label colour on normal bands
pub const NORMAL_TEXT: Rgb = BLACK;

/// Classifier result for one band
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub abnormal: bool,
    pub fill: Rgb,
    pub text: Rgb,
}

/// Classify a band record (pure, allocation free)
pub fn classify(band: &BandRecord) -> Classification {
    classify_parts(&band.formation_name, &band.top, &band.bottom)
}

/// Classify from the raw fields, used while a drag is patching a record
pub fn classify_parts(formation_name: &str, top: &Depth, bottom: &Depth) -> Classification {
    if is_abnormal(top, bottom) {
        Classification {
            abnormal: true,
            fill: ABNORMAL_FILL,
            text: ABNORMAL_TEXT,
        }
    } else {
        Classification {
            abnormal: false,
            fill: formation_color(formation_name),
            text: NORMAL_TEXT,
        }
    }
}

/// Numeric/range/ordering check
pub fn is_abnormal(top: &Depth, bottom: &Depth) -> bool {
    match (top.as_f64(), bottom.as_f64()) {
        (Some(t), Some(b)) => !in_unit_range(t) || !in_unit_range(b) || t > b,
        _ => true,
    }
}

fn in_unit_range(v: f64) -> bool {
    (0.0..=1.0).contains(&v)
}
