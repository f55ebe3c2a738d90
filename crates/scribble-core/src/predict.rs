//! Wire contract with the classification service.
//!
//! The client posts a JSON body to [`PREDICT_PATH`]:
//! ```json
//! { "image": "data:image/png;base64,iVBORw0KGgo..." }
//! ```
//! and expects a JSON object carrying at least a `prediction` field:
//! ```json
//! { "prediction": "face" }
//! ```
//! Failures are reported as `{ "error": "..." }` with a non-2xx status.

use base64::{Engine, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Endpoint path for classification requests.
pub const PREDICT_PATH: &str = "/predict";

/// MIME type of exported bitmaps.
pub const PNG_MIME: &str = "image/png";

/// Request body for [`PREDICT_PATH`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictRequest {
    /// Embedded image as a data URI.
    pub image: String,
}

impl PredictRequest {
    pub fn new(image: &DataUri) -> Self {
        Self {
            image: image.to_string(),
        }
    }
}

/// Successful response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictResponse {
    pub prediction: Prediction,
}

/// Error response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Opaque predicted label.
///
/// The service decides the type; strings display without quotes, anything
/// else as compact JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Prediction(pub Value);

impl Prediction {
    /// The label as a string, if the service sent one.
    pub fn as_str(&self) -> Option<&str> {
        self.0.as_str()
    }
}

impl From<&str> for Prediction {
    fn from(label: &str) -> Self {
        Prediction(Value::String(label.to_string()))
    }
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Value::String(s) => f.write_str(s),
            other => write!(f, "{}", other),
        }
    }
}

/// Data URI errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DataUriError {
    #[error("Not a data URI")]
    MissingPrefix,
    #[error("Data URI is not base64 encoded")]
    NotBase64,
    #[error("Invalid base64 payload: {0}")]
    Decode(String),
}

/// A base64 data URI (`data:<mime>;base64,<payload>`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri {
    mime_type: String,
    data: Vec<u8>,
}

impl DataUri {
    /// Wrap raw bytes.
    pub fn new(mime_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data,
        }
    }

    /// Wrap PNG bytes.
    pub fn png(data: Vec<u8>) -> Self {
        Self::new(PNG_MIME, data)
    }

    /// The `data:<mime>;base64,` prefix for a MIME type.
    pub fn prefix_for(mime_type: &str) -> String {
        format!("data:{};base64,", mime_type)
    }

    /// Parse a data URI string.
    ///
    /// Only base64 payloads are accepted.
    pub fn parse(uri: &str) -> Result<Self, DataUriError> {
        let rest = uri.strip_prefix("data:").ok_or(DataUriError::MissingPrefix)?;
        let (header, payload) = rest.split_once(',').ok_or(DataUriError::MissingPrefix)?;
        let mime_type = header
            .strip_suffix(";base64")
            .ok_or(DataUriError::NotBase64)?;
        let data = STANDARD
            .decode(payload.trim())
            .map_err(|e| DataUriError::Decode(e.to_string()))?;
        Ok(Self::new(mime_type, data))
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }
}

impl fmt::Display for DataUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "data:{};base64,{}", self.mime_type, STANDARD.encode(&self.data))
    }
}
