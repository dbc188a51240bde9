use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Deserialize, Debug, Clone)]
pub struct ApiRequest {
    pub id: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub id: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: serde_json::Value,
}

impl ApiResponse {
    pub fn data(id: impl Into<String>, value: impl Serialize) -> Self {
        let data = serde_json::to_value(value).unwrap_or_else(|e| {
            tracing::error!("Failed to serialize response data: {}", e);
            serde_json::Value::Null
        });
        Self {
            id: id.into(),
            success: true,
            message: None,
            data,
        }
    }

    pub fn outcome(id: impl Into<String>, success: bool, message: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            success,
            message: Some(message.into()),
            data: serde_json::Value::Null,
        }
    }

    pub fn error(id: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::outcome(id, false, message.to_string())
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl fmt::Display for ApiResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match serde_json::to_string(self) {
            Ok(text) => f.write_str(&text),
            Err(_) => Err(fmt::Error),
        }
    }
}
