//! `curtain calc` command - size a single window

use console::style;
use dialoguer::{theme::ColorfulTheme, Input};
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use tracing::debug;

use crate::cli::helpers::{result_row, RESULT_COLUMNS};
use crate::cli::output::{print_json, print_rows, print_yaml};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::{
    compute_sizing, Config, FormulaTrace, MeasurementInput, PleatStyle, SizingResult, WindowType,
};

#[derive(clap::Args, Debug)]
pub struct CalcArgs {
    /// Measured width in cm
    #[arg(allow_negative_numbers = true)]
    pub width: Option<String>,

    /// Measured height in cm
    #[arg(allow_negative_numbers = true)]
    pub height: Option<String>,

    /// Window type: full (통창) or partial (일반창)
    #[arg(long, short = 'w')]
    pub window: Option<WindowType>,

    /// Pleat style: butterfly (나비주름), back-matched (뒷맞주름), plain (민자주름)
    #[arg(long, short = 's')]
    pub style: Option<PleatStyle>,

    /// Prompt for any missing values
    #[arg(long, short = 'i')]
    pub interactive: bool,
}

/// Result plus formula trace, as emitted in JSON/YAML
#[derive(Debug, Serialize)]
struct CalcReport {
    #[serde(flatten)]
    result: SizingResult,
    trace: FormulaTrace,
}

pub fn run(args: CalcArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load(global.config.as_deref())?;
    let format = global.format.resolve(config.default_format.as_deref());

    let window_type = match args.window {
        Some(w) => w,
        None => config.window_type()?,
    };
    let pleat_style = match args.style {
        Some(s) => s,
        None => config.pleat_style()?,
    };

    let prompt = args.interactive || console::user_attended();
    let width = measurement(args.width, "Measured width (cm)", prompt)?;
    let height = measurement(args.height, "Measured height (cm)", prompt)?;

    let input = MeasurementInput::parse(&width, &height)?;
    let result = compute_sizing(input, window_type, pleat_style)?;
    debug!(?result, "computed sizing");

    let trace = FormulaTrace::from_result(&result);

    match format {
        OutputFormat::Json => print_json(&CalcReport { result, trace }),
        OutputFormat::Yaml => print_yaml(&CalcReport { result, trace }),
        OutputFormat::Csv | OutputFormat::Tsv | OutputFormat::Md => {
            print_rows(format, RESULT_COLUMNS, &[result_row(&result)])
        }
        OutputFormat::Auto | OutputFormat::Text => {
            print_text(&result, &trace, global.quiet);
            Ok(())
        }
    }
}

/// Use the given value, or prompt for it when allowed
fn measurement(value: Option<String>, label: &str, prompt: bool) -> Result<String> {
    if let Some(v) = value {
        return Ok(v);
    }
    if !prompt {
        return Err(miette::miette!(
            help = "Pass WIDTH and HEIGHT, or use --interactive",
            "{} is required",
            label
        ));
    }
    Input::<String>::with_theme(&ColorfulTheme::default())
        .with_prompt(label)
        .validate_with(|input: &String| -> std::result::Result<(), String> {
            match input.trim().parse::<f64>() {
                Ok(v) if v.is_finite() && v > 0.0 => Ok(()),
                _ => Err("Enter a number greater than 0".to_string()),
            }
        })
        .interact_text()
        .into_diagnostic()
}

fn print_text(result: &SizingResult, trace: &FormulaTrace, quiet: bool) {
    if quiet {
        println!("{}", result.order_quantity);
        return;
    }

    println!(
        "{} {} × {}",
        style("Production size:").bold(),
        style(result.production_width).cyan(),
        style(result.production_height).cyan()
    );
    println!("                 {}", style(&trace.size_formula).dim());
    println!(
        "{} {}",
        style("Order quantity: ").bold(),
        style(result.order_quantity).cyan()
    );
    println!("                 {}", style(&trace.quantity_formula).dim());
    println!();
    println!("{} {}", style("✓").green(), trace.notice);
}
