//! `curtain styles` command - divisor table and height formulas

use console::style;
use miette::Result;
use serde::Serialize;

use crate::cli::output::{print_json, print_rows, print_yaml};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::sizing::{PleatStyle, WindowType, WIDTH_FACTOR};
use crate::core::Config;

#[derive(clap::Args, Debug)]
pub struct StylesArgs {
    /// Also list window types and their height formulas
    #[arg(long)]
    pub windows: bool,
}

#[derive(Debug, Serialize)]
struct StyleInfo {
    style: PleatStyle,
    name: &'static str,
    divisor: u32,
}

#[derive(Debug, Serialize)]
struct WindowInfo {
    window: WindowType,
    name: &'static str,
    height_adjustment: f64,
}

#[derive(Debug, Serialize)]
struct StylesReport {
    width_factor: f64,
    styles: Vec<StyleInfo>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    windows: Vec<WindowInfo>,
}

pub fn run(args: StylesArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load(global.config.as_deref())?;
    let format = global.format.resolve(config.default_format.as_deref());

    let report = StylesReport {
        width_factor: WIDTH_FACTOR,
        styles: PleatStyle::all()
            .iter()
            .map(|s| StyleInfo {
                style: *s,
                name: s.korean_name(),
                divisor: s.divisor(),
            })
            .collect(),
        windows: if args.windows {
            WindowType::all()
                .iter()
                .map(|w| WindowInfo {
                    window: *w,
                    name: w.korean_name(),
                    height_adjustment: w.height_adjustment(),
                })
                .collect()
        } else {
            Vec::new()
        },
    };

    match format {
        OutputFormat::Json => return print_json(&report),
        OutputFormat::Yaml => return print_yaml(&report),
        _ => {}
    }

    let style_rows: Vec<Vec<String>> = report
        .styles
        .iter()
        .map(|s| vec![s.style.to_string(), s.name.to_string(), s.divisor.to_string()])
        .collect();
    print_rows(format, &["style", "name", "divisor"], &style_rows)?;

    if args.windows {
        let window_rows: Vec<Vec<String>> = report
            .windows
            .iter()
            .map(|w| {
                vec![
                    w.window.to_string(),
                    w.name.to_string(),
                    format!("height {:+}", w.height_adjustment),
                ]
            })
            .collect();
        println!();
        print_rows(format, &["window", "name", "formula"], &window_rows)?;
    }

    if matches!(format, OutputFormat::Text | OutputFormat::Auto) && !global.quiet {
        println!();
        println!(
            "{}",
            style("production width = round(width × 1.1), quantity = ceil(production width ÷ divisor)")
                .dim()
        );
    }

    Ok(())
}
