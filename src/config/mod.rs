// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Configuration management for Cytoscan

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::interpret::SchemaVariant;

/// Main application configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    /// Remote classification service
    pub service: ServiceConfig,

    /// Response schema the deployment speaks
    #[serde(default = "default_schema")]
    pub schema: SchemaVariant,

    /// File selection settings
    #[serde(default)]
    pub selection: SelectionConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServiceConfig {
    /// Predict endpoint URL
    pub url: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct SelectionConfig {
    /// Image extensions accepted by the loader
    #[serde(default)]
    pub formats: Vec<String>,
}

// Default value functions
fn default_timeout() -> u64 { 120 }
fn default_schema() -> SchemaVariant { SchemaVariant::Extended }
fn default_service_url() -> String { "http://localhost:5000/predict".to_string() }

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            service: ServiceConfig {
                url: default_service_url(),
                timeout_secs: default_timeout(),
            },
            schema: default_schema(),
            selection: SelectionConfig::default(),
        }
    }
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            formats: vec!["jpg", "jpeg", "png", "bmp", "tiff", "tif"]
                .into_iter().map(String::from).collect(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> crate::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = serde_json::from_str(&content)
                .map_err(|e| crate::CytoscanError::Config(format!("Failed to parse config: {}", e)))?;
            Ok(config)
        } else {
            tracing::info!("Config file not found at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    /// Save configuration to a JSON file
    pub fn save(&self, path: &Path) -> crate::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
