//! Request and response shapes exchanged with the statistical service.
//!
//! Every endpoint uses the same envelope: a success status carries the
//! endpoint-specific success shape, any other status carries an
//! [`ErrorResponse`].

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Successful reply to `POST /upload`.
///
/// The service only reports the columns it can model (numeric ones), so the
/// list may be shorter than the file's header row.
///
/// ```json
/// { "columns": ["age", "income"], "filename": "people.csv" }
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
pub struct IngestResponse {
    /// Ordered column names of the uploaded dataset.
    pub columns: Vec<String>,

    /// Display label for the dataset.
    ///
    /// The reference service names this field `filename`; both spellings are
    /// accepted on the way in.
    #[serde(alias = "filename", default)]
    pub label: String,
}

/// Body of `POST /train`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
pub struct TrainRequest {
    /// Independent variable.
    pub x_column: String,
    /// Dependent variable.
    pub y_column: String,
}

/// Successful reply to `POST /train`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
pub struct TrainResponse {
    /// Slope of the fitted line.
    pub m: f64,
    /// Intercept of the fitted line.
    pub c: f64,
    /// Goodness of fit, typically in `[0, 1]`.
    pub r2: f64,
    /// Mean squared error on the held-out split, when the service reports it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mse: Option<f64>,
    /// Base64-encoded plot image.
    pub plot_url: String,
}

/// Value sent to `POST /predict`.
///
/// The client forwards whatever the user typed; parsing it as a number is the
/// service's job.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
#[serde(untagged)]
pub enum PredictValue {
    Number(f64),
    Text(String),
}

impl From<&str> for PredictValue {
    fn from(value: &str) -> Self {
        PredictValue::Text(value.to_string())
    }
}

impl From<f64> for PredictValue {
    fn from(value: f64) -> Self {
        PredictValue::Number(value)
    }
}

/// Body of `POST /predict`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, TS)]
pub struct PredictRequest {
    pub value: PredictValue,
}

/// Successful reply to `POST /predict`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, TS)]
pub struct PredictResponse {
    pub prediction: f64,
}

/// Failure body shared by every endpoint.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
pub struct ErrorResponse {
    pub error: String,
}
