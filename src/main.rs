use anyhow::Result;
use clap::Parser;

use std::path::PathBuf;

use sales_report::{chart, pdf, record, report::Report};

/// Generates a monthly sales report from a CSV of sales transactions.
///
/// Reads the input file, prints a metrics summary, renders the monthly
/// trend and top-salespeople charts as PNG images, and composes them with
/// a top-products table into a single-page PDF, all under the output
/// directory.
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    /// Path to the sales transactions CSV file.
    #[arg(default_value = "sales_data_2025.csv")]
    input: PathBuf,

    /// Directory where the charts and the PDF report are written.
    #[arg(short, long, default_value = "reports")]
    output_dir: PathBuf,
}

fn main() -> Result<()> {
    let args = Args::parse();
    println!("Loading sales data from {}", args.input.display());
    let records = record::read_csv(&args.input)?;
    println!("Loaded {} records.", records.len());

    let report = Report::from_records(&records);
    println!();
    print!("{report}");
    println!();

    println!("Rendering charts...");
    let charts = chart::render_charts(&report, &args.output_dir)?;
    println!("Wrote {}", charts.monthly_trend.display());
    println!("Wrote {}", charts.top_salespeople.display());

    println!("Composing PDF report...");
    let path = pdf::write_pdf(&report, &charts, &args.output_dir, &pdf::Layout::default())?;
    println!("Wrote {}", path.display());
    Ok(())
}
