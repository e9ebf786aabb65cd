//! `curtain batch` command - size every window in a CSV order sheet

use console::style;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use crate::cli::helpers::{format_raw_quantity, truncate_str};
use crate::cli::output::{print_json, print_rows, print_yaml};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::order::{self, OrderDefaults, OrderEntry, OrderSummary};
use crate::core::{Config, PleatStyle, SizingResult, WindowType};

#[derive(clap::Args, Debug)]
pub struct BatchArgs {
    /// CSV order sheet (columns: label, width, height, window, style)
    #[arg(required_unless_present = "template")]
    pub file: Option<PathBuf>,

    /// Window type for rows that leave it blank
    #[arg(long, short = 'w')]
    pub window: Option<WindowType>,

    /// Pleat style for rows that leave it blank
    #[arg(long, short = 's')]
    pub style: Option<PleatStyle>,

    /// Report invalid rows and continue instead of stopping
    #[arg(long)]
    pub skip_errors: bool,

    /// Print an example order sheet and exit
    #[arg(long)]
    pub template: bool,
}

/// One row as emitted in JSON/YAML
#[derive(Debug, Serialize)]
struct EntryReport<'a> {
    row: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    label: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<&'a SizingResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct BatchReport<'a> {
    entries: Vec<EntryReport<'a>>,
    rows: usize,
    computed: usize,
    failed: usize,
    total_quantity: u64,
}

const TABLE_COLUMNS: &[&str] = &[
    "row",
    "label",
    "window",
    "style",
    "production size",
    "raw",
    "quantity",
];

pub fn run(args: BatchArgs, global: &GlobalOpts) -> Result<()> {
    if args.template {
        print!("{}", order::template());
        return Ok(());
    }

    let path = args
        .file
        .ok_or_else(|| miette::miette!("An order sheet path is required"))?;

    let config = Config::load(global.config.as_deref())?;
    let format = global.format.resolve(config.default_format.as_deref());
    let defaults = OrderDefaults {
        window_type: match args.window {
            Some(w) => w,
            None => config.window_type()?,
        },
        pleat_style: match args.style {
            Some(s) => s,
            None => config.pleat_style()?,
        },
    };

    let file = File::open(&path)
        .into_diagnostic()
        .map_err(|e| e.wrap_err(format!("Cannot open order sheet {}", path.display())))?;
    let lines = order::read_order_sheet(BufReader::new(file)).into_diagnostic()?;
    let entries = order::evaluate_sheet(&lines, defaults);

    if !args.skip_errors {
        if let Some((row, err)) = entries
            .iter()
            .find_map(|e| e.outcome.as_ref().err().map(|err| (e.row, err.clone())))
        {
            return Err(miette::Report::new(err).wrap_err(format!("Row {}", row)));
        }
    }

    let summary = order::summarize(&entries);

    match format {
        OutputFormat::Json => print_json(&batch_report(&entries, summary)),
        OutputFormat::Yaml => print_yaml(&batch_report(&entries, summary)),
        _ => {
            let rows: Vec<Vec<String>> = entries.iter().map(table_row).collect();
            print_rows(format, TABLE_COLUMNS, &rows)?;
            if matches!(format, OutputFormat::Text | OutputFormat::Auto) && !global.quiet {
                print_summary(&entries, summary);
            }
            Ok(())
        }
    }
}

fn batch_report(entries: &[OrderEntry], summary: OrderSummary) -> BatchReport<'_> {
    BatchReport {
        entries: entries
            .iter()
            .map(|e| EntryReport {
                row: e.row,
                label: e.label.as_deref(),
                result: e.outcome.as_ref().ok(),
                error: e.outcome.as_ref().err().map(|err| err.to_string()),
            })
            .collect(),
        rows: summary.rows,
        computed: summary.computed,
        failed: summary.failed,
        total_quantity: summary.total_quantity,
    }
}

fn table_row(entry: &OrderEntry) -> Vec<String> {
    let label = entry
        .label
        .as_deref()
        .map(|l| truncate_str(l, 20))
        .unwrap_or_default();
    match &entry.outcome {
        Ok(r) => vec![
            entry.row.to_string(),
            label,
            r.window_type.to_string(),
            r.pleat_style.to_string(),
            format!("{} × {}", r.production_width, r.production_height),
            format_raw_quantity(r.raw_quantity),
            r.order_quantity.to_string(),
        ],
        Err(e) => vec![
            entry.row.to_string(),
            label,
            String::new(),
            String::new(),
            format!("error: {}", e),
            String::new(),
            String::new(),
        ],
    }
}

fn print_summary(entries: &[OrderEntry], summary: OrderSummary) {
    println!();
    for entry in entries {
        if let Err(e) = &entry.outcome {
            eprintln!(
                "{} Row {}: {}",
                style("✗").red(),
                entry.row,
                e.user_message()
            );
        }
    }
    println!(
        "{} {} window(s) sized, total order quantity {}",
        style("✓").green(),
        summary.computed,
        style(summary.total_quantity).cyan()
    );
    if summary.failed > 0 {
        println!(
            "{} {} row(s) skipped",
            style("!").yellow(),
            summary.failed
        );
    }
}
