//! Order sheets - several windows sized in one run
//!
//! An order sheet is a CSV file with a header row. Recognised columns
//! (case-insensitive): `label`, `width`, `height`, `window`, `style`.
//! `window` and `style` fall back to the caller's defaults when the column
//! is absent or the cell is empty.

use csv::{ReaderBuilder, StringRecord};
use std::collections::HashMap;
use std::io::Read;
use thiserror::Error;
use tracing::debug;

use crate::core::sizing::{
    compute_sizing, MeasurementInput, PleatStyle, SizingError, SizingResult, WindowType,
};

/// Column names, in template order
pub const ORDER_COLUMNS: &[&str] = &["label", "width", "height", "window", "style"];

/// Errors reading the sheet itself (as opposed to a bad row)
#[derive(Debug, Error)]
pub enum OrderSheetError {
    #[error("CSV parse error at row {row}: {source}")]
    Csv {
        row: usize,
        #[source]
        source: csv::Error,
    },

    #[error("Order sheet is missing required column '{0}'")]
    MissingColumn(&'static str),
}

/// One data row of an order sheet, still unparsed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderLine {
    /// 1-based row number in the file, counting the header
    pub row: usize,
    pub label: Option<String>,
    pub width: String,
    pub height: String,
    pub window: Option<String>,
    pub style: Option<String>,
}

/// Selections applied to rows that leave `window` or `style` blank
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrderDefaults {
    pub window_type: WindowType,
    pub pleat_style: PleatStyle,
}

/// Outcome of sizing one row
#[derive(Debug, Clone, PartialEq)]
pub struct OrderEntry {
    pub row: usize,
    pub label: Option<String>,
    pub outcome: Result<SizingResult, SizingError>,
}

/// Totals over an evaluated sheet
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrderSummary {
    pub rows: usize,
    pub computed: usize,
    pub failed: usize,
    pub total_quantity: u64,
}

/// Read every data row of an order sheet
pub fn read_order_sheet<R: Read>(reader: R) -> Result<Vec<OrderLine>, OrderSheetError> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|source| OrderSheetError::Csv { row: 1, source })?
        .clone();
    let header_map = build_header_map(&headers);

    for required in ["width", "height"] {
        if !header_map.contains_key(required) {
            return Err(OrderSheetError::MissingColumn(required));
        }
    }

    let mut lines = Vec::new();
    for (row_idx, result) in rdr.records().enumerate() {
        let row = row_idx + 2; // 1-indexed, after the header
        let record = result.map_err(|source| OrderSheetError::Csv { row, source })?;

        if record.iter().all(|field| field.is_empty()) {
            continue;
        }

        lines.push(OrderLine {
            row,
            label: get_field(&record, &header_map, "label"),
            width: get_field(&record, &header_map, "width").unwrap_or_default(),
            height: get_field(&record, &header_map, "height").unwrap_or_default(),
            window: get_field(&record, &header_map, "window"),
            style: get_field(&record, &header_map, "style"),
        });
    }

    debug!(rows = lines.len(), "read order sheet");
    Ok(lines)
}

/// Size one row, filling in blank selections from `defaults`
pub fn evaluate_line(line: &OrderLine, defaults: OrderDefaults) -> OrderEntry {
    let outcome = size_line(line, defaults);

    if let Err(e) = &outcome {
        debug!(row = line.row, error = %e, "order line rejected");
    }

    OrderEntry {
        row: line.row,
        label: line.label.clone(),
        outcome,
    }
}

fn size_line(line: &OrderLine, defaults: OrderDefaults) -> Result<SizingResult, SizingError> {
    let input = MeasurementInput::parse(&line.width, &line.height)?;
    let window_type = match &line.window {
        Some(w) => w.parse::<WindowType>()?,
        None => defaults.window_type,
    };
    let pleat_style = match &line.style {
        Some(s) => s.parse::<PleatStyle>()?,
        None => defaults.pleat_style,
    };
    compute_sizing(input, window_type, pleat_style)
}

/// Size every row of a sheet
pub fn evaluate_sheet(lines: &[OrderLine], defaults: OrderDefaults) -> Vec<OrderEntry> {
    lines.iter().map(|line| evaluate_line(line, defaults)).collect()
}

/// Count rows and total the order quantities of the successful ones
pub fn summarize(entries: &[OrderEntry]) -> OrderSummary {
    entries
        .iter()
        .fold(OrderSummary::default(), |mut summary, entry| {
            summary.rows += 1;
            match &entry.outcome {
                Ok(result) => {
                    summary.computed += 1;
                    summary.total_quantity += u64::from(result.order_quantity);
                }
                Err(_) => summary.failed += 1,
            }
            summary
        })
}

/// Header line plus example rows, for `batch --template`
pub fn template() -> String {
    format!(
        "{}\n거실,200,150,full,butterfly\n안방,183.4,210,partial,back-matched\n",
        ORDER_COLUMNS.join(",")
    )
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(i, h)| (h.to_lowercase().trim().to_string(), i))
        .collect()
}

fn get_field(
    record: &StringRecord,
    header_map: &HashMap<String, usize>,
    field: &str,
) -> Option<String> {
    header_map
        .get(field)
        .and_then(|&idx| record.get(idx))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHEET: &str = "\
label,width,height,window,style
거실,200,150,full,butterfly
안방,100,150,partial,plain
주방,abc,150,,
서재,100,120,,
";

    #[test]
    fn test_read_order_sheet() {
        let lines = read_order_sheet(SHEET.as_bytes()).unwrap();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0].row, 2);
        assert_eq!(lines[0].label.as_deref(), Some("거실"));
        assert_eq!(lines[0].width, "200");
        assert_eq!(lines[3].window, None);
        assert_eq!(lines[3].style, None);
    }

    #[test]
    fn test_evaluate_sheet_mixed_rows() {
        let lines = read_order_sheet(SHEET.as_bytes()).unwrap();
        let entries = evaluate_sheet(&lines, OrderDefaults::default());

        let first = entries[0].outcome.as_ref().unwrap();
        assert_eq!(first.order_quantity, 4);
        assert_eq!(first.production_height, 146.0);

        let second = entries[1].outcome.as_ref().unwrap();
        assert_eq!(second.production_height, 180.0);
        assert_eq!(second.order_quantity, 1);

        assert_eq!(entries[2].row, 4);
        assert!(matches!(
            entries[2].outcome,
            Err(SizingError::InvalidMeasurement { .. })
        ));
    }

    #[test]
    fn test_defaults_fill_blank_cells() {
        let lines = read_order_sheet(SHEET.as_bytes()).unwrap();
        let defaults = OrderDefaults {
            window_type: WindowType::PartialWindow,
            pleat_style: PleatStyle::BackMatchedPleat,
        };
        let entry = evaluate_line(&lines[3], defaults);
        let result = entry.outcome.unwrap();
        assert_eq!(result.window_type, WindowType::PartialWindow);
        assert_eq!(result.pleat_style, PleatStyle::BackMatchedPleat);
        assert_eq!(result.production_height, 150.0);
        assert_eq!(result.divisor, 80);
    }

    #[test]
    fn test_summarize() {
        let lines = read_order_sheet(SHEET.as_bytes()).unwrap();
        let summary = summarize(&evaluate_sheet(&lines, OrderDefaults::default()));
        assert_eq!(summary.rows, 4);
        assert_eq!(summary.computed, 3);
        assert_eq!(summary.failed, 1);
        // 4 + 1 + ceil(110 / 70) = 2
        assert_eq!(summary.total_quantity, 7);
    }

    #[test]
    fn test_columns_are_case_insensitive_and_optional() {
        let sheet = "Width,HEIGHT\n200,150\n";
        let lines = read_order_sheet(sheet.as_bytes()).unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].label, None);
        assert_eq!(lines[0].height, "150");
    }

    #[test]
    fn test_missing_required_column() {
        let err = read_order_sheet("label,width\nA,200\n".as_bytes()).unwrap_err();
        assert!(matches!(err, OrderSheetError::MissingColumn("height")));
    }

    #[test]
    fn test_unknown_style_in_row() {
        let lines = read_order_sheet("width,height,style\n200,150,pinch\n".as_bytes()).unwrap();
        let entry = evaluate_line(&lines[0], OrderDefaults::default());
        assert_eq!(entry.outcome, Err(SizingError::UnknownStyle("pinch".to_string())));
    }

    #[test]
    fn test_template_is_a_valid_sheet() {
        let lines = read_order_sheet(template().as_bytes()).unwrap();
        let entries = evaluate_sheet(&lines, OrderDefaults::default());
        assert!(entries.iter().all(|e| e.outcome.is_ok()));
    }
}
