//! Shared helper functions for CLI commands

use crate::core::trace::format_one_decimal;
use crate::core::SizingResult;

/// Columns emitted for one sizing result in row-oriented formats
pub const RESULT_COLUMNS: &[&str] = &[
    "width",
    "height",
    "window",
    "style",
    "production_width",
    "production_height",
    "divisor",
    "raw_quantity",
    "order_quantity",
];

/// One row of [`RESULT_COLUMNS`]
pub fn result_row(result: &SizingResult) -> Vec<String> {
    vec![
        result.measured_width.to_string(),
        result.measured_height.to_string(),
        result.window_type.to_string(),
        result.pleat_style.to_string(),
        result.production_width.to_string(),
        result.production_height.to_string(),
        result.divisor.to_string(),
        format_raw_quantity(result.raw_quantity),
        result.order_quantity.to_string(),
    ]
}

/// Raw quantity as displayed, matching the formula trace
pub fn format_raw_quantity(raw: f64) -> String {
    format_one_decimal(raw)
}

/// Truncate a string to max_len characters, adding "..." if truncated
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::compute_sizing_raw;

    #[test]
    fn test_result_row_matches_columns() {
        let result = compute_sizing_raw("200", "150", "full", "butterfly").unwrap();
        let row = result_row(&result);
        assert_eq!(row.len(), RESULT_COLUMNS.len());
        assert_eq!(
            row,
            vec!["200", "150", "full", "butterfly", "220", "146", "70", "3.1", "4"]
        );
    }

    #[test]
    fn test_row_and_trace_agree_on_ties() {
        let result = compute_sizing_raw("91", "150", "full", "back-matched").unwrap();
        assert_eq!(result_row(&result)[7], "1.3");
        assert!(crate::core::trace::quantity_formula(&result).contains("= 1.3 "));
    }

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("hello", 10), "hello");
        assert_eq!(truncate_str("hello world", 8), "hello...");
        assert_eq!(truncate_str("hi", 2), "hi");
        assert_eq!(truncate_str("거실 커튼 왼쪽 창", 6), "거실 ...");
    }
}
