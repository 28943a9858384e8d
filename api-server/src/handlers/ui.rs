//! Form UI handlers
//!
//! A single server-rendered page: the 18 customer fields as dropdowns and
//! numeric inputs, and the predicted label once submitted.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Html,
    Form,
};
use serde::Deserialize;
use validator::Validate;

use churn_core::constants::*;

use crate::handlers::predict::run_prediction;
use crate::models::CustomerData;
use crate::AppState;

const GENDER_VALUES: &[&str] = &["Male", "Female"];

/// What to show under the form
enum Outcome {
    Empty,
    Label(String),
    Error(String),
}

/// `?example=loyal` pre-fills the low-risk profile instead of the default
#[derive(Debug, Default, Deserialize)]
pub struct FormQuery {
    example: Option<String>,
}

pub async fn form(Query(query): Query<FormQuery>) -> Html<String> {
    let data = match query.example.as_deref() {
        Some("loyal") => CustomerData::loyal(),
        _ => CustomerData::high_risk(),
    };
    Html(render(&data, Outcome::Empty))
}

pub async fn submit(
    State(state): State<AppState>,
    Form(data): Form<CustomerData>,
) -> (StatusCode, Html<String>) {
    if let Err(errors) = data.validate() {
        let page = render(&data, Outcome::Error(format!("Invalid input: {}", errors)));
        return (StatusCode::UNPROCESSABLE_ENTITY, Html(page));
    }

    match run_prediction(&state, &data).await {
        Ok(label) => (StatusCode::OK, Html(render(&data, Outcome::Label(label.to_string())))),
        Err(e) => (e.status_code(), Html(render(&data, Outcome::Error(e.to_string())))),
    }
}

fn render(data: &CustomerData, outcome: Outcome) -> String {
    let selects: [(&str, &str, &[&str], &str); 15] = [
        (GENDER, "Gender", GENDER_VALUES, &data.gender),
        (PARTNER, "Partner", YES_NO, &data.partner),
        (DEPENDENTS, "Dependents", YES_NO, &data.dependents),
        (PHONE_SERVICE, "Phone Service", YES_NO, &data.phone_service),
        (MULTIPLE_LINES, "Multiple Lines", MULTIPLE_LINES_VALUES, &data.multiple_lines),
        (INTERNET_SERVICE, "Internet Service", INTERNET_SERVICE_VALUES, &data.internet_service),
        (ONLINE_SECURITY, "Online Security", INTERNET_ADDON_VALUES, &data.online_security),
        (ONLINE_BACKUP, "Online Backup", INTERNET_ADDON_VALUES, &data.online_backup),
        (DEVICE_PROTECTION, "Device Protection", INTERNET_ADDON_VALUES, &data.device_protection),
        (TECH_SUPPORT, "Tech Support", INTERNET_ADDON_VALUES, &data.tech_support),
        (STREAMING_TV, "Streaming TV", INTERNET_ADDON_VALUES, &data.streaming_tv),
        (STREAMING_MOVIES, "Streaming Movies", INTERNET_ADDON_VALUES, &data.streaming_movies),
        (CONTRACT, "Contract", CONTRACT_VALUES, &data.contract),
        (PAPERLESS_BILLING, "Paperless Billing", YES_NO, &data.paperless_billing),
        (PAYMENT_METHOD, "Payment Method", PAYMENT_METHOD_VALUES, &data.payment_method),
    ];

    let mut fields = String::new();
    for (name, label, options, current) in selects {
        fields.push_str(&select(name, label, options, current));
    }
    fields.push_str(&number(TENURE, "Tenure (months)", &data.tenure.to_string(), 0, 100, "1"));
    fields.push_str(&number(MONTHLY_CHARGES, "Monthly Charges ($)", &data.monthly_charges.to_string(), 0, 200, "0.01"));
    fields.push_str(&number(TOTAL_CHARGES, "Total Charges ($)", &data.total_charges.to_string(), 0, 10000, "0.01"));

    let result = match outcome {
        Outcome::Empty => String::new(),
        Outcome::Label(label) => format!(
            r#"<section class="result"><h2>Churn Prediction</h2><p id="prediction">{}</p></section>"#,
            escape(&label)
        ),
        Outcome::Error(message) => format!(
            r#"<section class="result error"><h2>Error</h2><p id="error">{}</p></section>"#,
            escape(&message)
        ),
    };

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{app} - Customer Churn Predictor</title>
<style>
body {{ font-family: sans-serif; max-width: 720px; margin: 2rem auto; }}
form {{ display: grid; grid-template-columns: 1fr 1fr; gap: 0.75rem 1.5rem; }}
label {{ display: flex; flex-direction: column; font-size: 0.9rem; }}
button {{ grid-column: span 2; padding: 0.6rem; }}
.result {{ margin-top: 1.5rem; padding: 1rem; border: 1px solid #ccc; }}
.error {{ border-color: #c33; }}
</style>
</head>
<body>
<h1>Telco Customer Churn Predictor</h1>
<p>Fill in customer details to predict churn.</p>
<p class="examples">Examples: <a href="/ui?example=high-risk">high-risk customer</a> | <a href="/ui?example=loyal">loyal customer</a></p>
<form method="post" action="/ui">
{fields}<button type="submit">Predict</button>
</form>
{result}
</body>
</html>
"#,
        app = APP_NAME,
        fields = fields,
        result = result,
    )
}

fn select(name: &str, label: &str, options: &[&str], current: &str) -> String {
    let mut html = format!(r#"<label>{}<select name="{}">"#, escape(label), escape(name));
    for option in options {
        let selected = if *option == current { " selected" } else { "" };
        html.push_str(&format!(
            r#"<option value="{v}"{s}>{v}</option>"#,
            v = escape(option),
            s = selected
        ));
    }
    html.push_str("</select></label>\n");
    html
}

fn number(name: &str, label: &str, value: &str, min: u32, max: u32, step: &str) -> String {
    format!(
        r#"<label>{}<input type="number" name="{}" value="{}" min="{}" max="{}" step="{}" required></label>
"#,
        escape(label),
        escape(name),
        escape(value),
        min,
        max,
        step
    )
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
