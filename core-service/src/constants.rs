//! Central Schema Constants
//!
//! Single source of truth for the customer-record field names and the
//! fixed encoding tables shared by the encoder and the validator.

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "Churn Serving";

// ============================================
// Field names (as they appear in raw records)
// ============================================

pub const CUSTOMER_ID: &str = "customerID";
pub const GENDER: &str = "gender";
pub const SENIOR_CITIZEN: &str = "SeniorCitizen";
pub const PARTNER: &str = "Partner";
pub const DEPENDENTS: &str = "Dependents";
pub const TENURE: &str = "tenure";
pub const PHONE_SERVICE: &str = "PhoneService";
pub const MULTIPLE_LINES: &str = "MultipleLines";
pub const INTERNET_SERVICE: &str = "InternetService";
pub const ONLINE_SECURITY: &str = "OnlineSecurity";
pub const ONLINE_BACKUP: &str = "OnlineBackup";
pub const DEVICE_PROTECTION: &str = "DeviceProtection";
pub const TECH_SUPPORT: &str = "TechSupport";
pub const STREAMING_TV: &str = "StreamingTV";
pub const STREAMING_MOVIES: &str = "StreamingMovies";
pub const CONTRACT: &str = "Contract";
pub const PAPERLESS_BILLING: &str = "PaperlessBilling";
pub const PAYMENT_METHOD: &str = "PaymentMethod";
pub const MONTHLY_CHARGES: &str = "MonthlyCharges";
pub const TOTAL_CHARGES: &str = "TotalCharges";

// ============================================
// Encoding tables
// ============================================

/// Fields coerced to real numbers before encoding
pub const NUMERIC_FIELDS: &[&str] = &[TENURE, MONTHLY_CHARGES, TOTAL_CHARGES];

/// Two-valued categorical fields and their `(value_for_0, value_for_1)` pair
pub const BINARY_FIELDS: &[(&str, &str, &str)] = &[
    (GENDER, "Female", "Male"),
    (PARTNER, "No", "Yes"),
    (DEPENDENTS, "No", "Yes"),
    (PHONE_SERVICE, "No", "Yes"),
    (PAPERLESS_BILLING, "No", "Yes"),
];

// ============================================
// Allowed value sets
// ============================================

pub const YES_NO: &[&str] = &["Yes", "No"];

pub const CONTRACT_VALUES: &[&str] = &["Month-to-month", "One year", "Two year"];

pub const INTERNET_SERVICE_VALUES: &[&str] = &["DSL", "Fiber optic", "No"];

pub const MULTIPLE_LINES_VALUES: &[&str] = &["Yes", "No", "No phone service"];

/// Shared by the six internet add-on fields
pub const INTERNET_ADDON_VALUES: &[&str] = &["Yes", "No", "No internet service"];

pub const PAYMENT_METHOD_VALUES: &[&str] = &[
    "Electronic check",
    "Mailed check",
    "Bank transfer (automatic)",
    "Credit card (automatic)",
];

// ============================================
// Prediction labels
// ============================================

pub const LABEL_CHURN: &str = "Likely to churn";
pub const LABEL_NO_CHURN: &str = "Not likely to churn";
