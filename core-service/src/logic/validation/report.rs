//! Validation Report

use serde::{Deserialize, Serialize};

/// Outcome of one validation pass over a batch.
///
/// `failed_checks` lists rule violations in evaluation order. The report is
/// built once by the validator and only read afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    success: bool,
    failed_checks: Vec<String>,
    total_checks: usize,
}

impl ValidationReport {
    pub fn success(&self) -> bool {
        self.success
    }

    pub fn failed_checks(&self) -> &[String] {
        &self.failed_checks
    }

    pub fn total_checks(&self) -> usize {
        self.total_checks
    }

    pub fn passed_checks(&self) -> usize {
        self.total_checks.saturating_sub(self.failed_checks.len())
    }

    /// True if any failure message starts with `prefix`
    pub fn has_failure(&self, prefix: &str) -> bool {
        self.failed_checks.iter().any(|f| f.starts_with(prefix))
    }
}

/// Accumulates check results while the rules run
#[derive(Debug, Default)]
pub(crate) struct ReportBuilder {
    failed_checks: Vec<String>,
    total_checks: usize,
}

impl ReportBuilder {
    /// Count one check
    pub fn check(&mut self) {
        self.total_checks += 1;
    }

    pub fn fail(&mut self, message: String) {
        log::warn!("Validation check failed: {}", message);
        self.failed_checks.push(message);
    }

    pub fn finish(self) -> ValidationReport {
        let report = ValidationReport {
            success: self.failed_checks.is_empty(),
            failed_checks: self.failed_checks,
            total_checks: self.total_checks,
        };

        if report.success {
            log::info!(
                "Data validation PASSED: {}/{} checks successful",
                report.passed_checks(),
                report.total_checks
            );
        } else {
            log::warn!(
                "Data validation FAILED: {}/{} checks failed",
                report.failed_checks.len(),
                report.total_checks
            );
        }

        report
    }
}
