//! Customer request model

use serde::{de, Deserialize, Deserializer, Serialize};
use validator::{Validate, ValidationError};

use churn_core::constants::*;
use churn_core::{ChurnLabel, FieldValue, RawRecord};

/// The 18 customer attributes accepted by `/predict` and the UI form.
///
/// The numeric fields take a JSON number or numeric-looking text. Text is
/// handed to the encoder unchanged, so the configured numeric policy decides
/// what an unparseable value means.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "PascalCase")]
pub struct CustomerData {
    #[serde(rename = "gender")]
    pub gender: String,
    pub partner: String,
    pub dependents: String,
    pub phone_service: String,
    pub multiple_lines: String,
    pub internet_service: String,
    pub online_security: String,
    pub online_backup: String,
    pub device_protection: String,
    pub tech_support: String,
    #[serde(rename = "StreamingTV")]
    pub streaming_tv: String,
    pub streaming_movies: String,
    pub contract: String,
    pub paperless_billing: String,
    pub payment_method: String,

    // Form limits; the JSON endpoint does not enforce them
    #[serde(rename = "tenure", deserialize_with = "whole_number_or_text")]
    #[validate(custom(function = "tenure_in_range"))]
    pub tenure: FieldValue,
    #[serde(deserialize_with = "number_or_text")]
    #[validate(custom(function = "monthly_charges_in_range"))]
    pub monthly_charges: FieldValue,
    #[serde(deserialize_with = "number_or_text")]
    #[validate(custom(function = "total_charges_in_range"))]
    pub total_charges: FieldValue,
}

impl CustomerData {
    /// Month-to-month fiber customer one month in: the form's starting values
    pub fn high_risk() -> Self {
        Self {
            gender: "Female".to_string(),
            partner: "No".to_string(),
            dependents: "No".to_string(),
            phone_service: "Yes".to_string(),
            multiple_lines: "No".to_string(),
            internet_service: "Fiber optic".to_string(),
            online_security: "No".to_string(),
            online_backup: "No".to_string(),
            device_protection: "No".to_string(),
            tech_support: "No".to_string(),
            streaming_tv: "Yes".to_string(),
            streaming_movies: "Yes".to_string(),
            contract: "Month-to-month".to_string(),
            paperless_billing: "Yes".to_string(),
            payment_method: "Electronic check".to_string(),
            tenure: FieldValue::Number(1.0),
            monthly_charges: FieldValue::Number(85.0),
            total_charges: FieldValue::Number(85.0),
        }
    }

    /// Five years on a two-year DSL contract with every add-on
    pub fn loyal() -> Self {
        Self {
            gender: "Male".to_string(),
            partner: "Yes".to_string(),
            dependents: "Yes".to_string(),
            phone_service: "Yes".to_string(),
            multiple_lines: "Yes".to_string(),
            internet_service: "DSL".to_string(),
            online_security: "Yes".to_string(),
            online_backup: "Yes".to_string(),
            device_protection: "Yes".to_string(),
            tech_support: "Yes".to_string(),
            streaming_tv: "No".to_string(),
            streaming_movies: "No".to_string(),
            contract: "Two year".to_string(),
            paperless_billing: "No".to_string(),
            payment_method: "Credit card (automatic)".to_string(),
            tenure: FieldValue::Number(60.0),
            monthly_charges: FieldValue::Number(45.0),
            total_charges: FieldValue::Number(2700.0),
        }
    }
}

impl Default for CustomerData {
    fn default() -> Self {
        Self::high_risk()
    }
}

impl From<&CustomerData> for RawRecord {
    fn from(data: &CustomerData) -> Self {
        RawRecord::new()
            .with(GENDER, data.gender.as_str())
            .with(PARTNER, data.partner.as_str())
            .with(DEPENDENTS, data.dependents.as_str())
            .with(PHONE_SERVICE, data.phone_service.as_str())
            .with(MULTIPLE_LINES, data.multiple_lines.as_str())
            .with(INTERNET_SERVICE, data.internet_service.as_str())
            .with(ONLINE_SECURITY, data.online_security.as_str())
            .with(ONLINE_BACKUP, data.online_backup.as_str())
            .with(DEVICE_PROTECTION, data.device_protection.as_str())
            .with(TECH_SUPPORT, data.tech_support.as_str())
            .with(STREAMING_TV, data.streaming_tv.as_str())
            .with(STREAMING_MOVIES, data.streaming_movies.as_str())
            .with(CONTRACT, data.contract.as_str())
            .with(PAPERLESS_BILLING, data.paperless_billing.as_str())
            .with(PAYMENT_METHOD, data.payment_method.as_str())
            .with(TENURE, data.tenure.clone())
            .with(MONTHLY_CHARGES, data.monthly_charges.clone())
            .with(TOTAL_CHARGES, data.total_charges.clone())
    }
}

#[derive(Debug, Serialize)]
pub struct PredictionResponse {
    pub prediction: ChurnLabel,
}

// ============================================================================
// NUMERIC FIELDS
// ============================================================================

fn number_or_text<'de, D>(deserializer: D) -> Result<FieldValue, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::Number(n) => n
            .as_f64()
            .map(FieldValue::Number)
            .ok_or_else(|| de::Error::custom("number out of range")),
        serde_json::Value::String(s) => Ok(FieldValue::Text(s)),
        other => Err(de::Error::invalid_type(unexpected(&other), &"a number or numeric text")),
    }
}

/// Like `number_or_text`, but a JSON number must be integral (`12` or `12.0`)
fn whole_number_or_text<'de, D>(deserializer: D) -> Result<FieldValue, D::Error>
where
    D: Deserializer<'de>,
{
    let value = number_or_text(deserializer)?;
    match value {
        FieldValue::Number(n) if n.fract() != 0.0 => Err(de::Error::invalid_value(
            de::Unexpected::Float(n),
            &"a whole number",
        )),
        other => Ok(other),
    }
}

fn unexpected(value: &serde_json::Value) -> de::Unexpected<'_> {
    match value {
        serde_json::Value::Null => de::Unexpected::Unit,
        serde_json::Value::Bool(b) => de::Unexpected::Bool(*b),
        serde_json::Value::Array(_) => de::Unexpected::Seq,
        _ => de::Unexpected::Map,
    }
}

fn check_range(value: &FieldValue, min: f64, max: f64) -> Result<(), ValidationError> {
    match value.as_number() {
        Some(n) if (min..=max).contains(&n) => Ok(()),
        Some(_) => Err(ValidationError::new("range")),
        None => Err(ValidationError::new("not_a_number")),
    }
}

fn tenure_in_range(value: &FieldValue) -> Result<(), ValidationError> {
    check_range(value, 0.0, 100.0)
}

fn monthly_charges_in_range(value: &FieldValue) -> Result<(), ValidationError> {
    check_range(value, 0.0, 200.0)
}

fn total_charges_in_range(value: &FieldValue) -> Result<(), ValidationError> {
    check_range(value, 0.0, 10000.0)
}
