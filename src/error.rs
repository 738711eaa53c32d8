// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Error types for Cytoscan

use thiserror::Error;

/// Result type alias for Cytoscan operations
pub type Result<T> = std::result::Result<T, CytoscanError>;

/// Cytoscan error types
#[derive(Error, Debug)]
pub enum CytoscanError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File system error: {0}")]
    FileSystem(#[from] std::io::Error),

    #[error("API error: {0}")]
    Api(#[from] reqwest::Error),

    #[error("Service not available: {0}")]
    ServiceUnavailable(String),

    #[error("Malformed service response: {0}")]
    Interpretation(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Sample decode error: {0}")]
    SampleDecode(#[from] base64::DecodeError),
}
