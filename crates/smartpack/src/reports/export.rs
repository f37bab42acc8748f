use super::domain::ReportRecord;
use super::pdf::render_text_document;
use chrono::{DateTime, SecondsFormat, Utc};
use mime::Mime;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Pdf,
    Csv,
    Json,
}

impl ExportFormat {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "csv" => Some(Self::Csv),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    pub fn content_type(self) -> Mime {
        match self {
            Self::Pdf => mime::APPLICATION_PDF,
            Self::Csv => mime::TEXT_CSV,
            Self::Json => mime::APPLICATION_JSON,
        }
    }

    pub const fn extension(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

/// Rendered report ready to be sent as an attachment.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedReport {
    pub content_type: Mime,
    pub filename: String,
    pub body: Vec<u8>,
}

impl ExportedReport {
    pub fn content_disposition(&self) -> String {
        format!("attachment; filename=\"{}\"", self.filename)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to encode report as JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to encode report as CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush CSV export: {0}")]
    Flush(String),
}

pub fn export_report(
    report: &ReportRecord,
    format: ExportFormat,
    generated_at: DateTime<Utc>,
) -> Result<ExportedReport, ExportError> {
    let body = match format {
        ExportFormat::Pdf => render_pdf(report, generated_at)?,
        ExportFormat::Csv => render_csv(report)?,
        ExportFormat::Json => serde_json::to_vec_pretty(&report.content)?,
    };

    Ok(ExportedReport {
        content_type: format.content_type(),
        filename: format!("{}.{}", attachment_stem(&report.name), format.extension()),
        body,
    })
}

fn render_pdf(report: &ReportRecord, generated_at: DateTime<Utc>) -> Result<Vec<u8>, ExportError> {
    let content = serde_json::to_string_pretty(&report.content)?;
    let mut lines = vec![
        format!("PDF Report: {}", report.name),
        String::new(),
        format!(
            "Generated: {}",
            generated_at.to_rfc3339_opts(SecondsFormat::Millis, true)
        ),
        String::new(),
        "Content:".to_string(),
    ];
    lines.extend(content.lines().map(str::to_string));
    Ok(render_text_document(&lines))
}

fn render_csv(report: &ReportRecord) -> Result<Vec<u8>, ExportError> {
    let metrics = &report.content.key_metrics;
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["Metric", "Value"])?;
    writer.write_record(["Total Products".to_string(), metrics.total_products.to_string()])?;
    writer.write_record(["Total Savings".to_string(), format!("${}", metrics.total_savings)])?;
    writer.write_record([
        "Avg Waste Reduction".to_string(),
        format!("{}%", metrics.avg_waste_reduction),
    ])?;
    writer.write_record(["CO2 Reduction".to_string(), format!("{} kg", metrics.co2_reduction)])?;
    writer
        .into_inner()
        .map_err(|err| ExportError::Flush(err.to_string()))
}

// Header-safe file stem: printable ASCII without quotes or path separators.
fn attachment_stem(name: &str) -> String {
    let stem: String = name
        .chars()
        .map(|ch| match ch {
            '"' | '/' | '\\' => '_',
            ' '..='~' => ch,
            _ => '_',
        })
        .collect();
    let stem = stem.trim();
    if stem.is_empty() {
        "report".to_string()
    } else {
        stem.to_string()
    }
}
