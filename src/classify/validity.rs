//! Presence predicates behind every "has this milestone happened yet" check.

use super::normalize::normalize;
use crate::constants::PLACEHOLDER_NOT_APPLICABLE;

/// False for blank cells and for the "N/A" placeholder (any case)
pub fn is_present_value(raw: Option<&str>) -> bool {
    is_present_with(raw, PLACEHOLDER_NOT_APPLICABLE)
}

/// Same as [`is_present_value`] with a configurable placeholder literal
pub fn is_present_with(raw: Option<&str>, placeholder: &str) -> bool {
    let value = normalize(raw);
    !value.is_empty() && !value.eq_ignore_ascii_case(placeholder)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_equivalence() {
        assert!(!is_present_value(Some("")));
        assert!(!is_present_value(Some("N/A")));
        assert!(!is_present_value(Some("n/a")));
        assert!(!is_present_value(Some(" N/a ")));
        assert!(!is_present_value(None));
    }

    #[test]
    fn test_present_values() {
        assert!(is_present_value(Some("F-1020")));
        assert!(is_present_value(Some("NA")));
        assert!(is_present_value(Some("0")));
    }

    #[test]
    fn test_custom_placeholder() {
        assert!(!is_present_with(Some("pendiente"), "PENDIENTE"));
        assert!(is_present_with(Some("N/A"), "PENDIENTE"));
    }
}
