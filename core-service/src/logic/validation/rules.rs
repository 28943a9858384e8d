//! Validation Rules - schema, business-rule and range checks
//!
//! Every rule runs on every call; a failure never stops the next rule.
//! Rules whose column is missing are skipped without failing (the missing
//! column is already reported by the existence check).

use crate::constants::{
    CONTRACT, CONTRACT_VALUES, CUSTOMER_ID, DEPENDENTS, GENDER, INTERNET_SERVICE,
    INTERNET_SERVICE_VALUES, MONTHLY_CHARGES, PARTNER, PHONE_SERVICE, TENURE, TOTAL_CHARGES,
    YES_NO,
};
use crate::logic::record::{FieldValue, RawTable};

use super::report::{ReportBuilder, ValidationReport};

/// Columns every batch must carry
pub const REQUIRED_COLUMNS: &[&str] = &[
    CUSTOMER_ID,
    GENDER,
    PARTNER,
    DEPENDENTS,
    PHONE_SERVICE,
    INTERNET_SERVICE,
    CONTRACT,
    TENURE,
    MONTHLY_CHARGES,
    TOTAL_CHARGES,
];

/// Yes/No business fields
pub const YES_NO_COLUMNS: &[&str] = &[PARTNER, DEPENDENTS, PHONE_SERVICE];

/// Max share of rows (percent) allowed to have TotalCharges < MonthlyCharges
pub const CONSISTENCY_TOLERANCE_PCT: f64 = 5.0;

/// Offending values listed per set-membership failure
const MAX_REPORTED_VALUES: usize = 5;

/// Run every rule over the batch and report which ones failed
pub fn validate_table(table: &RawTable) -> ValidationReport {
    log::info!(
        "Starting data validation ({} rows, {} columns)",
        table.row_count(),
        table.columns().len()
    );

    let mut report = ReportBuilder::default();

    check_required_columns(table, &mut report);
    check_customer_id(table, &mut report);

    for column in YES_NO_COLUMNS {
        check_value_set(table, column, YES_NO, &mut report);
    }
    check_value_set(table, CONTRACT, CONTRACT_VALUES, &mut report);
    check_value_set(table, INTERNET_SERVICE, INTERNET_SERVICE_VALUES, &mut report);

    check_range(table, TENURE, 0.0, Some(120.0), &mut report);
    check_range(table, MONTHLY_CHARGES, 0.0, Some(200.0), &mut report);
    check_range(table, TOTAL_CHARGES, 0.0, None, &mut report);

    check_charges_consistency(table, &mut report);

    report.finish()
}

fn check_required_columns(table: &RawTable, report: &mut ReportBuilder) {
    for column in REQUIRED_COLUMNS {
        report.check();
        if table.has_column(column) {
            log::info!("Column '{}' exists", column);
        } else {
            report.fail(format!("expect_column_to_exist({})", column));
        }
    }
}

fn check_customer_id(table: &RawTable, report: &mut ReportBuilder) {
    report.check();
    let Some(cells) = table.column(CUSTOMER_ID) else {
        return;
    };

    let nulls = cells.filter(|c| c.is_null()).count();
    if nulls > 0 {
        report.fail(format!(
            "expect_column_values_to_not_be_null({}) - {} nulls",
            CUSTOMER_ID, nulls
        ));
    } else {
        log::info!("{} has no nulls", CUSTOMER_ID);
    }
}

/// Non-null cells must be one of `allowed` (exact, case-sensitive match)
fn check_value_set(table: &RawTable, column: &str, allowed: &[&str], report: &mut ReportBuilder) {
    report.check();
    let Some(cells) = table.column(column) else {
        return;
    };

    let mut invalid_count = 0usize;
    let mut found: Vec<&FieldValue> = Vec::new();

    for cell in cells {
        if cell.is_null() {
            continue;
        }
        let valid = cell.as_text().is_some_and(|s| allowed.contains(&s));
        if !valid {
            invalid_count += 1;
            if found.len() < MAX_REPORTED_VALUES && !found.contains(&cell) {
                found.push(cell);
            }
        }
    }

    if invalid_count > 0 {
        let listed: Vec<String> = found.iter().map(|v| repr(v)).collect();
        report.fail(format!(
            "expect_column_values_to_be_in_set({}) - found: [{}]",
            column,
            listed.join(", ")
        ));
    } else {
        log::info!("{} values are valid", column);
    }
}

/// Numeric-coerced cells must lie in `[min, max]` (no upper bound if `max`
/// is `None`). Bounded columns are also checked for nulls, where an
/// unparseable value counts as null.
fn check_range(table: &RawTable, column: &str, min: f64, max: Option<f64>, report: &mut ReportBuilder) {
    report.check();
    let Some(cells) = table.column(column) else {
        return;
    };

    let numbers: Vec<Option<f64>> = cells.map(FieldValue::as_number).collect();
    let out_of_range = numbers
        .iter()
        .flatten()
        .filter(|&&n| n < min || max.is_some_and(|m| n > m))
        .count();

    match max {
        Some(max) => {
            if out_of_range > 0 {
                report.fail(format!(
                    "expect_column_values_to_be_between({}, {}, {}) - {} out of range",
                    column, min, max, out_of_range
                ));
            } else {
                log::info!("{} values are within [{}, {}]", column, min, max);
            }

            report.check();
            let nulls = numbers.iter().filter(|n| n.is_none()).count();
            if nulls > 0 {
                report.fail(format!(
                    "expect_column_values_to_not_be_null({}) - {} nulls",
                    column, nulls
                ));
            }
        }
        None => {
            if out_of_range > 0 {
                report.fail(format!(
                    "expect_column_values_to_be_between({}, {}, inf) - {} negative values",
                    column, min, out_of_range
                ));
            } else {
                log::info!("{} values are at least {}", column, min);
            }
        }
    }
}

/// TotalCharges should not fall below MonthlyCharges in more than
/// `CONSISTENCY_TOLERANCE_PCT` percent of the rows where both parse.
fn check_charges_consistency(table: &RawTable, report: &mut ReportBuilder) {
    report.check();
    let (Some(total), Some(monthly)) = (table.column(TOTAL_CHARGES), table.column(MONTHLY_CHARGES))
    else {
        return;
    };

    let pairs: Vec<(f64, f64)> = total
        .zip(monthly)
        .filter_map(|(t, m)| Some((t.as_number()?, m.as_number()?)))
        .collect();

    if pairs.is_empty() {
        log::warn!("Cannot check charges consistency: no rows with both charges");
        return;
    }

    let invalid = pairs.iter().filter(|(t, m)| t < m).count();
    let invalid_pct = invalid as f64 / pairs.len() as f64 * 100.0;

    if invalid_pct > CONSISTENCY_TOLERANCE_PCT {
        report.fail(format!(
            "expect_column_pair_values_A_to_be_greater_than_B({}, {}) - {:.1}% invalid",
            TOTAL_CHARGES, MONTHLY_CHARGES, invalid_pct
        ));
    } else {
        log::info!(
            "{} >= {} in {:.1}% of rows",
            TOTAL_CHARGES,
            MONTHLY_CHARGES,
            100.0 - invalid_pct
        );
    }
}

fn repr(value: &FieldValue) -> String {
    match value {
        FieldValue::Text(s) => format!("'{}'", s),
        other => other.to_string(),
    }
}
