//! Writers for the structured output formats

use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::io::{self, Write};
use tabled::{builder::Builder, settings::Style};

use crate::cli::OutputFormat;

/// Print a value as pretty JSON
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).into_diagnostic()?;
    println!("{}", json);
    Ok(())
}

/// Print a value as YAML
pub fn print_yaml<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let yaml = serde_yml::to_string(value).into_diagnostic()?;
    print!("{}", yaml);
    Ok(())
}

/// Print rows as CSV or TSV, header first
pub fn print_delimited(headers: &[&str], rows: &[Vec<String>], delimiter: u8) -> Result<()> {
    let stdout = io::stdout();
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(stdout.lock());
    wtr.write_record(headers).into_diagnostic()?;
    for row in rows {
        wtr.write_record(row).into_diagnostic()?;
    }
    wtr.flush().into_diagnostic()?;
    Ok(())
}

/// Render rows as a table (markdown or rounded box drawing)
pub fn render_table(headers: &[&str], rows: &[Vec<String>], markdown: bool) -> String {
    let mut builder = Builder::default();
    builder.push_record(headers.iter().copied());
    for row in rows {
        builder.push_record(row.iter().cloned());
    }
    let mut table = builder.build();
    if markdown {
        table.with(Style::markdown());
    } else {
        table.with(Style::rounded());
    }
    table.to_string()
}

/// Print tabular data as CSV, TSV, markdown, or a text table
pub fn print_rows(format: OutputFormat, headers: &[&str], rows: &[Vec<String>]) -> Result<()> {
    match format {
        OutputFormat::Csv => print_delimited(headers, rows, b','),
        OutputFormat::Tsv => print_delimited(headers, rows, b'\t'),
        _ => {
            let markdown = format == OutputFormat::Md;
            let mut out = io::stdout().lock();
            writeln!(out, "{}", render_table(headers, rows, markdown)).into_diagnostic()
        }
    }
}
