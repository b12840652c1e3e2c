//! Validation for manual add/edit of bands
//!
//! Edits accept `top == bottom`; adds require `top < bottom`. Anything that
//! fails leaves the store untouched and reports a [`ValidationError`].

use crate::error::ValidationError;

/// Ordering rule applied between top and bottom
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntervalRule {
    /// `top <= bottom` (edit)
    AllowEqual,
    /// `top < bottom` (add)
    Strict,
}

/// Parse a form field as a normalized depth
pub fn parse_depth(field: &'static str, text: &str) -> Result<f64, ValidationError> {
    let value = text
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or(ValidationError::NotNumeric { field })?;
    check_range(field, value)?;
    Ok(value)
}

/// Reject values outside `[0, 1]` (and non-finite ones)
pub fn check_range(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NotNumeric { field });
    }
    if !(0.0..=1.0).contains(&value) {
        return Err(ValidationError::OutOfRange { field, value });
    }
    Ok(())
}

/// Full interval check used by the store commands
pub fn check_interval(top: f64, bottom: f64, rule: IntervalRule) -> Result<(), ValidationError> {
    check_range("Top", top)?;
    check_range("Bottom", bottom)?;
    match rule {
        IntervalRule::AllowEqual if top > bottom => {
            Err(ValidationError::TopAfterBottom { top, bottom })
        }
        IntervalRule::Strict if top >= bottom => {
            Err(ValidationError::TopNotBeforeBottom { top, bottom })
        }
        _ => Ok(()),
    }
}

/// Reject blank names
pub fn check_name(name: &str, empty: ValidationError) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        Err(empty)
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_depth() {
        assert_eq!(parse_depth("Top", " 0.25"), Ok(0.25));
        assert_eq!(
            parse_depth("Top", "x"),
            Err(ValidationError::NotNumeric { field: "Top" })
        );
        assert_eq!(
            parse_depth("Bottom", "1.01"),
            Err(ValidationError::OutOfRange {
                field: "Bottom",
                value: 1.01
            })
        );
        assert!(parse_depth("Top", "NaN").is_err());
    }

    #[test]
    fn test_edit_allows_zero_thickness() {
        assert!(check_interval(0.4, 0.4, IntervalRule::AllowEqual).is_ok());
        assert!(matches!(
            check_interval(0.5, 0.4, IntervalRule::AllowEqual),
            Err(ValidationError::TopAfterBottom { .. })
        ));
    }

    #[test]
    fn test_add_requires_positive_thickness() {
        assert!(matches!(
            check_interval(0.4, 0.4, IntervalRule::Strict),
            Err(ValidationError::TopNotBeforeBottom { .. })
        ));
        assert!(check_interval(0.1, 0.4, IntervalRule::Strict).is_ok());
    }

    #[test]
    fn test_blank_names_rejected() {
        assert_eq!(
            check_name("  ", ValidationError::EmptyGroup),
            Err(ValidationError::EmptyGroup)
        );
        assert!(check_name("G1", ValidationError::EmptyGroup).is_ok());
    }
}
