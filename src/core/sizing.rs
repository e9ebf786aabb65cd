//! Sizing engine - production size and order quantity from raw measurements
//!
//! Every function here is a pure function of its arguments. The caller owns
//! the "current selection" (window type, pleat style) and passes it in.

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Width allowance applied to the measured width
pub const WIDTH_FACTOR: f64 = 1.1;

/// Height deduction for full windows (cm)
pub const FULL_WINDOW_DEDUCTION: f64 = 4.0;

/// Height allowance for partial windows (cm)
pub const PARTIAL_WINDOW_ALLOWANCE: f64 = 30.0;

/// Floating-point slack tolerated before rounding the quantity up
pub const QUANTITY_EPSILON: f64 = 1e-9;

/// Notice shown when the measurements are missing or invalid
pub const MEASUREMENT_NOTICE: &str = "실측 가로와 세로를 입력해 주세요.";

/// Errors produced while validating inputs or computing a size
#[derive(Debug, Clone, PartialEq, Error, Diagnostic)]
pub enum SizingError {
    /// Width or height is non-numeric, non-finite, or not greater than zero
    #[error("Invalid measured {field}: '{input}'")]
    #[diagnostic(
        code(curtain::sizing::invalid_measurement),
        help("실측 가로와 세로를 입력해 주세요. Width and height must be numbers greater than 0.")
    )]
    InvalidMeasurement {
        field: MeasurementField,
        input: String,
    },

    /// Pleat style is not in the divisor table
    #[error("Unknown pleat style: '{0}'")]
    #[diagnostic(
        code(curtain::sizing::unknown_style),
        help("Valid styles: butterfly (나비주름), back-matched (뒷맞주름), plain (민자주름)")
    )]
    UnknownStyle(String),

    /// Window type is not one of the known variants
    #[error("Unknown window type: '{0}'")]
    #[diagnostic(
        code(curtain::sizing::unknown_window_type),
        help("Valid window types: full (통창), partial (일반창)")
    )]
    UnknownWindowType(String),

    /// The height formula produced a production height of zero or less
    #[error("Production height {production_height} is not positive (measured height {measured_height})")]
    #[diagnostic(
        code(curtain::sizing::non_positive_height),
        help("A full window loses 4 cm of height; the measured height must exceed 4.")
    )]
    NonPositiveHeight {
        measured_height: f64,
        production_height: f64,
    },

    /// The panel count does not fit the order quantity type
    #[error("Order quantity for production width {production_width} is out of range")]
    #[diagnostic(
        code(curtain::sizing::quantity_out_of_range),
        help("Check the measured width; it is far larger than any window.")
    )]
    QuantityOutOfRange { production_width: f64 },
}

impl SizingError {
    /// Short message suitable for showing to a customer
    pub fn user_message(&self) -> String {
        match self {
            SizingError::InvalidMeasurement { .. } => MEASUREMENT_NOTICE.to_string(),
            other => other.to_string(),
        }
    }
}

/// Which measurement failed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeasurementField {
    Width,
    Height,
}

impl fmt::Display for MeasurementField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeasurementField::Width => write!(f, "width"),
            MeasurementField::Height => write!(f, "height"),
        }
    }
}

/// Fabric gathering pattern, which fixes the width covered by one panel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PleatStyle {
    /// 나비주름
    #[default]
    #[serde(rename = "butterfly", alias = "나비주름")]
    ButterflyPleat,
    /// 뒷맞주름
    #[serde(rename = "back-matched", alias = "뒷맞주름")]
    BackMatchedPleat,
    /// 민자주름
    #[serde(rename = "plain", alias = "민자주름")]
    PlainPleat,
}

impl PleatStyle {
    /// Divisor used to turn a production width into a panel count
    pub fn divisor(&self) -> u32 {
        match self {
            PleatStyle::ButterflyPleat => 70,
            PleatStyle::BackMatchedPleat => 80,
            PleatStyle::PlainPleat => 130,
        }
    }

    /// Machine-friendly name
    pub fn as_str(&self) -> &'static str {
        match self {
            PleatStyle::ButterflyPleat => "butterfly",
            PleatStyle::BackMatchedPleat => "back-matched",
            PleatStyle::PlainPleat => "plain",
        }
    }

    /// Name used on the storefront
    pub fn korean_name(&self) -> &'static str {
        match self {
            PleatStyle::ButterflyPleat => "나비주름",
            PleatStyle::BackMatchedPleat => "뒷맞주름",
            PleatStyle::PlainPleat => "민자주름",
        }
    }

    pub fn all() -> &'static [PleatStyle] {
        &[
            PleatStyle::ButterflyPleat,
            PleatStyle::BackMatchedPleat,
            PleatStyle::PlainPleat,
        ]
    }
}

impl fmt::Display for PleatStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PleatStyle {
    type Err = SizingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_lowercase().replace('_', "-").as_str() {
            "butterfly" | "butterfly-pleat" | "나비주름" => Ok(PleatStyle::ButterflyPleat),
            "back-matched" | "backmatched" | "back-matched-pleat" | "뒷맞주름" => {
                Ok(PleatStyle::BackMatchedPleat)
            }
            "plain" | "plain-pleat" | "민자주름" => Ok(PleatStyle::PlainPleat),
            _ => Err(SizingError::UnknownStyle(trimmed.to_string())),
        }
    }
}

/// Window opening kind, which selects the height formula
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum WindowType {
    /// 통창 - the curtain covers the whole opening
    #[default]
    #[serde(rename = "full", alias = "통창")]
    FullWindow,
    /// Framed / partial opening
    #[serde(rename = "partial", alias = "일반창")]
    PartialWindow,
}

impl WindowType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WindowType::FullWindow => "full",
            WindowType::PartialWindow => "partial",
        }
    }

    pub fn korean_name(&self) -> &'static str {
        match self {
            WindowType::FullWindow => "통창",
            WindowType::PartialWindow => "일반창",
        }
    }

    /// Signed height adjustment in cm
    pub fn height_adjustment(&self) -> f64 {
        match self {
            WindowType::FullWindow => -FULL_WINDOW_DEDUCTION,
            WindowType::PartialWindow => PARTIAL_WINDOW_ALLOWANCE,
        }
    }

    pub fn all() -> &'static [WindowType] {
        &[WindowType::FullWindow, WindowType::PartialWindow]
    }
}

impl fmt::Display for WindowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for WindowType {
    type Err = SizingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_lowercase().replace('_', "-").as_str() {
            "full" | "full-window" | "통창" => Ok(WindowType::FullWindow),
            "partial" | "partial-window" | "other" | "일반창" => Ok(WindowType::PartialWindow),
            _ => Err(SizingError::UnknownWindowType(trimmed.to_string())),
        }
    }
}

/// Validated measured width and height (cm)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasurementInput {
    width: f64,
    height: f64,
}

impl MeasurementInput {
    /// Validate numeric measurements
    pub fn new(width: f64, height: f64) -> Result<Self, SizingError> {
        Ok(Self {
            width: check_positive(width, &width.to_string(), MeasurementField::Width)?,
            height: check_positive(height, &height.to_string(), MeasurementField::Height)?,
        })
    }

    /// Parse and validate measurements typed by a user
    pub fn parse(width: &str, height: &str) -> Result<Self, SizingError> {
        Ok(Self {
            width: parse_measurement(width, MeasurementField::Width)?,
            height: parse_measurement(height, MeasurementField::Height)?,
        })
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }
}

fn parse_measurement(input: &str, field: MeasurementField) -> Result<f64, SizingError> {
    let value = input
        .trim()
        .parse::<f64>()
        .map_err(|_| SizingError::InvalidMeasurement {
            field,
            input: input.to_string(),
        })?;
    check_positive(value, input, field)
}

fn check_positive(value: f64, input: &str, field: MeasurementField) -> Result<f64, SizingError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(SizingError::InvalidMeasurement {
            field,
            input: input.to_string(),
        })
    }
}

/// Production size and order quantity, with every intermediate value
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizingResult {
    pub measured_width: f64,
    pub measured_height: f64,
    pub window_type: WindowType,
    pub pleat_style: PleatStyle,
    /// round(measured_width × 1.1), ties away from zero
    pub production_width: f64,
    /// measured_height - 4 (full) or + 30 (partial)
    pub production_height: f64,
    pub divisor: u32,
    /// production_width / divisor before rounding
    pub raw_quantity: f64,
    /// raw_quantity rounded up
    pub order_quantity: u32,
}

/// Compute production size and order quantity from validated inputs
pub fn compute_sizing(
    input: MeasurementInput,
    window_type: WindowType,
    pleat_style: PleatStyle,
) -> Result<SizingResult, SizingError> {
    let production_width = (input.width * WIDTH_FACTOR).round();
    let production_height = input.height + window_type.height_adjustment();

    if production_height <= 0.0 {
        return Err(SizingError::NonPositiveHeight {
            measured_height: input.height,
            production_height,
        });
    }

    let divisor = pleat_style.divisor();
    let raw_quantity = production_width / f64::from(divisor);

    Ok(SizingResult {
        measured_width: input.width,
        measured_height: input.height,
        window_type,
        pleat_style,
        production_width,
        production_height,
        divisor,
        raw_quantity,
        order_quantity: round_up_quantity(raw_quantity, production_width)?,
    })
}

/// Parse every input and compute, as a form submission would
pub fn compute_sizing_raw(
    width: &str,
    height: &str,
    window_type: &str,
    pleat_style: &str,
) -> Result<SizingResult, SizingError> {
    let input = MeasurementInput::parse(width, height)?;
    let window_type = window_type.parse::<WindowType>()?;
    let pleat_style = pleat_style.parse::<PleatStyle>()?;
    compute_sizing(input, window_type, pleat_style)
}

/// Round up, ignoring float noise just above an integer
fn round_up_quantity(raw: f64, production_width: f64) -> Result<u32, SizingError> {
    let nearest = raw.round();
    let value = if (raw - nearest).abs() < QUANTITY_EPSILON {
        nearest
    } else {
        raw.ceil()
    };
    if !value.is_finite() || value < 0.0 || value > f64::from(u32::MAX) {
        return Err(SizingError::QuantityOutOfRange { production_width });
    }
    Ok(value as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(w: f64, h: f64) -> MeasurementInput {
        MeasurementInput::new(w, h).unwrap()
    }

    #[test]
    fn test_end_to_end_example() {
        let r = compute_sizing(input(200.0, 150.0), WindowType::FullWindow, PleatStyle::ButterflyPleat)
            .unwrap();
        assert_eq!(r.production_width, 220.0);
        assert_eq!(r.production_height, 146.0);
        assert_eq!(r.divisor, 70);
        assert!((r.raw_quantity - 3.142857).abs() < 1e-6);
        assert_eq!(r.order_quantity, 4);
    }

    #[test]
    fn test_partial_window_height() {
        let r = compute_sizing(input(100.0, 150.0), WindowType::PartialWindow, PleatStyle::ButterflyPleat)
            .unwrap();
        assert_eq!(r.production_height, 180.0);
    }

    #[test]
    fn test_fractional_height_is_not_rounded() {
        let r = compute_sizing(input(100.0, 150.5), WindowType::FullWindow, PleatStyle::PlainPleat)
            .unwrap();
        assert_eq!(r.production_height, 146.5);
    }

    #[test]
    fn test_plain_pleat_single_panel() {
        let r = compute_sizing(input(100.0, 150.0), WindowType::FullWindow, PleatStyle::PlainPleat)
            .unwrap();
        assert_eq!(r.production_width, 110.0);
        assert_eq!(r.divisor, 130);
        assert!((r.raw_quantity - 110.0 / 130.0).abs() < 1e-12);
        assert_eq!(r.order_quantity, 1);
    }

    #[test]
    fn test_divisor_table() {
        assert_eq!(PleatStyle::ButterflyPleat.divisor(), 70);
        assert_eq!(PleatStyle::BackMatchedPleat.divisor(), 80);
        assert_eq!(PleatStyle::PlainPleat.divisor(), 130);
    }

    #[test]
    fn test_exact_quotient_does_not_round_up() {
        // 700 × 1.1 = 770.0000000000001 before rounding, 770 / 70 = 11
        let r = compute_sizing(input(700.0, 200.0), WindowType::FullWindow, PleatStyle::ButterflyPleat)
            .unwrap();
        assert_eq!(r.production_width, 770.0);
        assert_eq!(r.order_quantity, 11);
    }

    #[test]
    fn test_width_rounds_half_away_from_zero() {
        // 15 × 1.1 = 16.5
        let r = compute_sizing(input(15.0, 100.0), WindowType::FullWindow, PleatStyle::ButterflyPleat)
            .unwrap();
        assert_eq!(r.production_width, 17.0);
    }

    #[test]
    fn test_quantity_never_below_raw() {
        for style in PleatStyle::all() {
            for w in [1.0, 33.3, 63.7, 100.0, 127.0, 250.5, 999.9] {
                let r = compute_sizing(input(w, 120.0), WindowType::PartialWindow, *style).unwrap();
                assert_eq!(r.production_width, (w * 1.1).round());
                assert!(f64::from(r.order_quantity) >= r.raw_quantity - QUANTITY_EPSILON);
                assert_eq!(
                    r.order_quantity,
                    (r.production_width / f64::from(r.divisor)).ceil() as u32
                );
            }
        }
    }

    #[test]
    fn test_huge_width_is_out_of_range() {
        for w in ["1e12", "1e308"] {
            let err = compute_sizing_raw(w, "150", "full", "butterfly").unwrap_err();
            assert!(matches!(err, SizingError::QuantityOutOfRange { .. }), "{w}");
        }
    }

    #[test]
    fn test_large_width_still_exact() {
        // 1e9 × 1.1 = 1.1e9, 1.1e9 / 70 = 15714285.71...
        let r = compute_sizing(input(1e9, 150.0), WindowType::FullWindow, PleatStyle::ButterflyPleat)
            .unwrap();
        assert_eq!(r.production_width, 1_100_000_000.0);
        assert_eq!(r.order_quantity, 15_714_286);
        assert_eq!(
            f64::from(r.order_quantity),
            (r.production_width / f64::from(r.divisor)).ceil()
        );
    }

    #[test]
    fn test_zero_production_width_orders_nothing() {
        // 0.4 × 1.1 = 0.44 rounds to 0
        let r = compute_sizing(input(0.4, 150.0), WindowType::FullWindow, PleatStyle::ButterflyPleat)
            .unwrap();
        assert_eq!(r.production_width, 0.0);
        assert_eq!(r.raw_quantity, 0.0);
        assert_eq!(r.order_quantity, 0);
    }

    #[test]
    fn test_round_up_tolerates_noise_above_integer() {
        let noisy = (0.1 + 0.2) * 10.0;
        assert!(noisy > 3.0);
        assert_eq!(round_up_quantity(noisy, 0.0).unwrap(), 3);
        assert_eq!(round_up_quantity(3.0 + 1e-12, 0.0).unwrap(), 3);
        assert_eq!(round_up_quantity(3.0 - 1e-12, 0.0).unwrap(), 3);
        assert_eq!(round_up_quantity(3.0 + 1e-6, 0.0).unwrap(), 4);
        assert_eq!(round_up_quantity(2.000001, 0.0).unwrap(), 3);
    }

    #[test]
    fn test_idempotent() {
        let a = compute_sizing_raw("183.4", "210", "partial", "back-matched").unwrap();
        let b = compute_sizing_raw("183.4", "210", "partial", "back-matched").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_invalid_measurements() {
        for (w, h) in [("0", "150"), ("-3", "150"), ("abc", "150"), ("", "150"), ("200", "NaN"), ("200", "inf")] {
            let err = compute_sizing_raw(w, h, "full", "butterfly").unwrap_err();
            assert!(matches!(err, SizingError::InvalidMeasurement { .. }), "{w} x {h}");
            assert_eq!(err.user_message(), MEASUREMENT_NOTICE);
        }
        assert!(MeasurementInput::new(f64::NAN, 1.0).is_err());
        assert!(MeasurementInput::new(1.0, -1.0).is_err());
    }

    #[test]
    fn test_invalid_measurement_reports_field() {
        let err = MeasurementInput::parse("200", "x").unwrap_err();
        assert_eq!(
            err,
            SizingError::InvalidMeasurement {
                field: MeasurementField::Height,
                input: "x".to_string()
            }
        );
    }

    #[test]
    fn test_unknown_style_rejected() {
        let err = compute_sizing_raw("200", "150", "full", "pinch").unwrap_err();
        assert_eq!(err, SizingError::UnknownStyle("pinch".to_string()));
    }

    #[test]
    fn test_unknown_window_rejected() {
        let err = compute_sizing_raw("200", "150", "bay", "plain").unwrap_err();
        assert_eq!(err, SizingError::UnknownWindowType("bay".to_string()));
    }

    #[test]
    fn test_non_positive_full_window_height() {
        let err = compute_sizing(input(200.0, 4.0), WindowType::FullWindow, PleatStyle::PlainPleat)
            .unwrap_err();
        assert!(matches!(err, SizingError::NonPositiveHeight { .. }));
        // the same height is fine for a partial window
        assert!(compute_sizing(input(200.0, 4.0), WindowType::PartialWindow, PleatStyle::PlainPleat).is_ok());
    }

    #[test]
    fn test_parse_korean_names() {
        assert_eq!("나비주름".parse::<PleatStyle>().unwrap(), PleatStyle::ButterflyPleat);
        assert_eq!("뒷맞주름".parse::<PleatStyle>().unwrap(), PleatStyle::BackMatchedPleat);
        assert_eq!("민자주름".parse::<PleatStyle>().unwrap(), PleatStyle::PlainPleat);
        assert_eq!("통창".parse::<WindowType>().unwrap(), WindowType::FullWindow);
        assert_eq!(" Back_Matched ".parse::<PleatStyle>().unwrap(), PleatStyle::BackMatchedPleat);
    }

    #[test]
    fn test_style_roundtrip_names() {
        for style in PleatStyle::all() {
            assert_eq!(style.as_str().parse::<PleatStyle>().unwrap(), *style);
            assert_eq!(style.korean_name().parse::<PleatStyle>().unwrap(), *style);
        }
        for window in WindowType::all() {
            assert_eq!(window.as_str().parse::<WindowType>().unwrap(), *window);
            assert_eq!(window.korean_name().parse::<WindowType>().unwrap(), *window);
        }
    }

    #[test]
    fn test_result_serializes_with_slugs() {
        let r = compute_sizing_raw("200", "150", "통창", "나비주름").unwrap();
        let json = serde_json::to_value(r).unwrap();
        assert_eq!(json["window_type"], "full");
        assert_eq!(json["pleat_style"], "butterfly");
        assert_eq!(json["order_quantity"], 4);
    }
}
