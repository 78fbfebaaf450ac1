//! Report generation port trait.

use crate::domain::error::BarsimError;
use crate::domain::stats::RunReport;

/// Port for writing a completed run's report.
pub trait ReportPort {
    fn write(&self, report: &RunReport, output_path: &str) -> Result<(), BarsimError>;
}
