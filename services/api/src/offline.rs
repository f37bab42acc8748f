use clap::Args;
use serde::Serialize;
use smartpack::catalog::{parse_product_rows, NewProduct};
use smartpack::config::AppConfig;
use smartpack::error::AppError;
use smartpack::optimization::{calculate, OptimizationResult};
use smartpack::telemetry::{self, LogSink};
use std::fmt::Write as _;
use std::fs::File;
use std::io::{self, BufReader, Write};
use std::path::PathBuf;
use tracing::info;

#[derive(Args, Debug)]
pub(crate) struct OptimizeArgs {
    /// Product CSV to optimize (same layout as the upload endpoint)
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Print JSON instead of a table
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct OfflineOptimization {
    pub(crate) product: String,
    #[serde(flatten)]
    pub(crate) result: OptimizationResult,
}

pub(crate) fn run_optimize(args: OptimizeArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry, LogSink::Stderr)?;

    let file = File::open(&args.csv)?;
    let products = parse_product_rows(BufReader::new(file))?;
    info!(path = %args.csv.display(), products = products.len(), "catalog loaded");

    let rows = optimize_all(&products);
    let stdout = io::stdout();
    let mut out = stdout.lock();
    if args.json {
        serde_json::to_writer_pretty(&mut out, &rows).map_err(io::Error::from)?;
        writeln!(out)?;
    } else {
        out.write_all(render_table(&rows).as_bytes())?;
    }
    Ok(())
}

pub(crate) fn optimize_all(products: &[NewProduct]) -> Vec<OfflineOptimization> {
    products
        .iter()
        .map(|product| OfflineOptimization {
            product: product.name.clone(),
            result: calculate(&product.packaging()),
        })
        .collect()
}

pub(crate) fn render_table(rows: &[OfflineOptimization]) -> String {
    let mut table = String::new();
    let _ = writeln!(
        table,
        "{:<28} {:>9} {:>9} {:>8} {:>8} {:>5}  {}",
        "Product", "Cost", "Savings", "Waste%", "CO2 kg", "Conf", "Material"
    );
    for row in rows {
        let result = &row.result;
        let _ = writeln!(
            table,
            "{:<28} {:>9.2} {:>9.2} {:>8.1} {:>8.2} {:>5.2}  {}",
            truncate(&row.product, 28),
            result.original_cost,
            result.cost_savings,
            result.waste_reduction_percentage,
            result.co2_reduction_kg,
            result.confidence_score,
            result.recommended_material
        );
    }

    let savings: f64 = rows.iter().map(|row| row.result.cost_savings).sum();
    let co2: f64 = rows.iter().map(|row| row.result.co2_reduction_kg).sum();
    let _ = writeln!(
        table,
        "{} products | {:.2} saved per unit set | {:.2} kg CO2",
        rows.len(),
        savings,
        co2
    );
    table
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        value.to_string()
    } else {
        let mut cut: String = value.chars().take(width.saturating_sub(1)).collect();
        cut.push('~');
        cut
    }
}
