//! Human-readable formula trace for a sizing result
//!
//! Shown next to the numbers so a customer can check the arithmetic.

use serde::Serialize;

use crate::core::sizing::{SizingResult, WindowType};

/// Formula strings and notice derived from a [`SizingResult`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormulaTrace {
    /// e.g. `(200×1.1 / 150-4)`
    pub size_formula: String,
    /// e.g. `(220÷70 = 3.1 → 올림)`
    pub quantity_formula: String,
    /// e.g. `나비주름 기준 주문 수량: 4개`
    pub notice: String,
}

impl FormulaTrace {
    pub fn from_result(result: &SizingResult) -> Self {
        Self {
            size_formula: size_formula(result),
            quantity_formula: quantity_formula(result),
            notice: notice(result),
        }
    }
}

/// Production size formula
pub fn size_formula(result: &SizingResult) -> String {
    let height = match result.window_type {
        WindowType::FullWindow => format!("{}-4", result.measured_height),
        WindowType::PartialWindow => format!("{}+30", result.measured_height),
    };
    format!("({}×1.1 / {})", result.measured_width, height)
}

/// Order quantity formula, raw quantity shown to one decimal
pub fn quantity_formula(result: &SizingResult) -> String {
    format!(
        "({}÷{} = {} → 올림)",
        result.production_width,
        result.divisor,
        format_one_decimal(result.raw_quantity)
    )
}

/// One decimal place, exact ties rounded away from zero
///
/// `{:.1}` rounds ties to even (`1.25` → `1.2`). A tie at one decimal is
/// only exact in binary when the value is an odd multiple of 0.25.
pub fn format_one_decimal(value: f64) -> String {
    let quarters = value * 4.0;
    let is_tie = value.is_finite() && quarters.fract() == 0.0 && quarters % 2.0 != 0.0;
    if !is_tie {
        return format!("{:.1}", value);
    }
    let tenths = (value.abs() * 10.0).floor() + 1.0;
    format!("{:.1}", value.signum() * tenths / 10.0)
}

/// Success notice naming the pleat style
pub fn notice(result: &SizingResult) -> String {
    format!(
        "{} 기준 주문 수량: {}개",
        result.pleat_style.korean_name(),
        result.order_quantity
    )
}
