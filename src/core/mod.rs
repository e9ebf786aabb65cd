//! Core module - sizing engine and supporting types

pub mod config;
pub mod order;
pub mod sizing;
pub mod trace;

pub use config::{Config, ConfigError};
pub use order::{OrderDefaults, OrderEntry, OrderLine, OrderSheetError, OrderSummary};
pub use sizing::{
    compute_sizing, compute_sizing_raw, MeasurementField, MeasurementInput, PleatStyle,
    SizingError, SizingResult, WindowType,
};
pub use trace::FormulaTrace;
