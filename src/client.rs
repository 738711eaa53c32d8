// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! HTTP client for the remote classification service

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use crate::selection::SelectedFile;
use crate::{CytoscanError, Result};

/// Shared multipart field name the service reads the batch from
const BATCH_FIELD: &str = "files";

/// Remote collaborator seam; the production implementation is
/// [`ClassifierClient`], tests substitute a mock
#[async_trait]
pub trait ClassificationService: Send + Sync {
    /// Submit one batch and return the raw response payload
    async fn classify(&self, files: &[SelectedFile]) -> Result<serde_json::Value>;
}

/// Classification service API client
pub struct ClassifierClient {
    client: Client,
    endpoint: String,
}

impl ClassifierClient {
    /// Create a new client against the predict endpoint
    pub fn new(endpoint: &str, timeout_secs: u64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            endpoint: normalize_endpoint(endpoint),
        }
    }

    /// Check if the service is reachable.
    ///
    /// The service has no dedicated health route; it answers a CORS
    /// preflight on the predict endpoint, so that is what we probe.
    pub async fn preflight(&self) -> Result<()> {
        self.client
            .request(reqwest::Method::OPTIONS, &self.endpoint)
            .timeout(Duration::from_secs(10))
            .send()
            .await
            .map_err(|e| {
                CytoscanError::ServiceUnavailable(format!(
                    "Cannot connect to classification service at {}: {}",
                    self.endpoint, e
                ))
            })?;

        Ok(())
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl ClassificationService for ClassifierClient {
    async fn classify(&self, files: &[SelectedFile]) -> Result<serde_json::Value> {
        let mut form = Form::new();
        for file in files {
            let part = Part::bytes(file.bytes.clone())
                .file_name(file.name.clone())
                .mime_str("application/octet-stream")?;
            form = form.part(BATCH_FIELD, part);
        }

        debug!("Submitting batch of {} file(s) to {}", files.len(), self.endpoint);

        let response = self.client.post(&self.endpoint).multipart(form).send().await?;

        if !response.status().is_success() {
            return Err(CytoscanError::ServiceUnavailable(format!(
                "Classification service returned status {}",
                response.status()
            )));
        }

        let payload: serde_json::Value = response.json().await?;
        Ok(payload)
    }
}

/// Strip trailing slashes so configured endpoints compare and log cleanly
fn normalize_endpoint(endpoint: &str) -> String {
    endpoint.trim_end_matches('/').to_string()
}
