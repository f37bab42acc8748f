//! Generated sustainability reports and their downloadable exports.

mod domain;
mod export;
mod pdf;

pub use domain::{
    KeyMetrics, NewReport, ReportBrief, ReportContent, ReportMetrics, ReportRecord, ReportRequest,
    ReportSection, ReportStatus,
};
pub use export::{export_report, ExportError, ExportFormat, ExportedReport};
