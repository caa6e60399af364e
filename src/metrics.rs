use std::time::Duration;

use metrics::{counter, histogram};

use crate::error::ContactError;
use crate::models::ImportSummary;
use crate::store::BackendKind;

/// Metric names emitted by the contact service.
///
/// No recorder is installed here; without one every call is a no-op.
#[derive(Debug, Clone, Copy)]
pub struct MetricsCollector {
    pub operations_total: &'static str,
    pub operation_duration: &'static str,
    pub errors_total: &'static str,
    pub import_records_total: &'static str,
    pub export_records_total: &'static str,
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self {
            operations_total: "contact_book_operations_total",
            operation_duration: "contact_book_operation_duration_seconds",
            errors_total: "contact_book_errors_total",
            import_records_total: "contact_book_import_records_total",
            export_records_total: "contact_book_export_records_total",
        }
    }
}

impl MetricsCollector {
    /// Record one store operation and how it ended
    pub fn record_operation(
        &self,
        operation: &'static str,
        backend: BackendKind,
        duration: Duration,
        error: Option<&ContactError>,
    ) {
        let status = if error.is_some() { "error" } else { "success" };

        counter!(
            self.operations_total,
            "operation" => operation,
            "backend" => backend.as_str(),
            "status" => status
        )
        .increment(1);
        histogram!(self.operation_duration, "operation" => operation).record(duration.as_secs_f64());

        if let Some(err) = error {
            counter!(self.errors_total, "operation" => operation, "type" => err.kind()).increment(1);
        }
    }

    /// Record per-outcome counts of an import
    pub fn record_import(&self, summary: &ImportSummary) {
        let outcomes = [
            ("imported", summary.imported),
            ("duplicate", summary.duplicates),
            ("invalid", summary.invalid),
            ("failed", summary.failed),
        ];
        for (outcome, count) in outcomes {
            counter!(self.import_records_total, "outcome" => outcome).increment(count as u64);
        }
    }

    /// Record how many contacts an export wrote
    pub fn record_export(&self, count: usize) {
        counter!(self.export_records_total).increment(count as u64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_collector_creation() {
        let collector = MetricsCollector::default();
        assert_eq!(collector.operations_total, "contact_book_operations_total");
    }

    #[test]
    fn test_recording_without_recorder_is_noop() {
        let collector = MetricsCollector::default();
        collector.record_operation("insert", BackendKind::Document, Duration::from_millis(3), None);
        collector.record_import(&ImportSummary {
            imported: 2,
            ..ImportSummary::default()
        });
        collector.record_export(2);
    }
}
