// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Response interpretation: validate the service payload and normalize it
//! into a display-ready result set

use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{CytoscanError, Result};

/// Response contract selected per deployment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaVariant {
    /// Four categories: singlet/aggregate plus live/dead on singlets,
    /// with per-category sample images
    Extended,
    /// Two categories: live/dead only, no sample images
    Basic,
}

impl std::fmt::Display for SchemaVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Extended => write!(f, "extended"),
            Self::Basic => write!(f, "basic"),
        }
    }
}

impl std::str::FromStr for SchemaVariant {
    type Err = CytoscanError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "extended" => Ok(Self::Extended),
            "basic" => Ok(Self::Basic),
            other => Err(CytoscanError::Config(format!(
                "Unknown schema variant '{}' (expected 'extended' or 'basic')",
                other
            ))),
        }
    }
}

/// Aggregated counts and percentages for the extended schema.
///
/// Percentages are rendered as received; the service computes them and the
/// client does not re-derive them from the counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtendedSummary {
    pub total_images: u64,
    pub singlet_count: u64,
    pub aggregate_count: u64,
    pub live_count: u64,
    pub dead_count: u64,
    pub singlet_percentage: f64,
    pub aggregate_percentage: f64,
    pub live_percentage: f64,
    pub dead_percentage: f64,
}

/// Aggregated counts and percentages for the basic schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BasicSummary {
    pub total_images: u64,
    pub live_count: u64,
    pub dead_count: u64,
    pub live_percentage: f64,
    pub dead_percentage: f64,
}

/// Per-file outcome reported by the service.
///
/// `singlet_aggregate_label`/`live_dead_label` are set by the extended
/// schema, `label` by the basic one; `error` marks files the service could
/// not read. A per-file error does not fail the batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileOutcome {
    pub filename: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub singlet_aggregate_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub live_dead_label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileOutcome {
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Decoded sample previews per category, extended schema only.
///
/// Samples are opaque encoded image blobs (JPEG as served); no image
/// decoding happens client-side.
#[derive(Debug, Clone, Default)]
pub struct SampleGalleries {
    pub singlets: Vec<Vec<u8>>,
    pub aggregates: Vec<Vec<u8>>,
    pub live: Vec<Vec<u8>>,
    pub dead: Vec<Vec<u8>>,
}

/// Normalized extended-schema results
#[derive(Debug, Clone)]
pub struct ExtendedResults {
    pub summary: ExtendedSummary,
    pub samples: SampleGalleries,
    pub outcomes: Vec<FileOutcome>,
}

/// Normalized basic-schema results
#[derive(Debug, Clone)]
pub struct BasicResults {
    pub summary: BasicSummary,
    pub outcomes: Vec<FileOutcome>,
}

/// The normalized, display-ready form of the service response
#[derive(Debug, Clone)]
pub enum ResultSet {
    Extended(ExtendedResults),
    Basic(BasicResults),
}

impl ResultSet {
    pub fn total_images(&self) -> u64 {
        match self {
            Self::Extended(r) => r.summary.total_images,
            Self::Basic(r) => r.summary.total_images,
        }
    }

    /// Outcomes the service flagged with a per-file error
    pub fn failed_files(&self) -> Vec<&FileOutcome> {
        let outcomes = match self {
            Self::Extended(r) => &r.outcomes,
            Self::Basic(r) => &r.outcomes,
        };
        outcomes.iter().filter(|o| o.is_error()).collect()
    }
}

// Wire shapes as served; unknown fields are ignored, absent required
// fields are an interpretation error.

#[derive(Deserialize)]
struct ExtendedWire {
    summary: ExtendedSummary,
    singlet_images: Vec<String>,
    aggregate_images: Vec<String>,
    live_images: Vec<String>,
    dead_images: Vec<String>,
    #[serde(default)]
    results: Vec<FileOutcome>,
}

#[derive(Deserialize)]
struct BasicWire {
    summary: BasicSummary,
    #[serde(default)]
    results: Vec<FileOutcome>,
}

/// Validate a raw service payload against the active schema variant.
///
/// Shape validation only: counts and percentages pass through as received,
/// and internal inconsistencies (counts not summing to the total) are the
/// service's responsibility, not re-audited here.
pub fn interpret(raw: serde_json::Value, variant: SchemaVariant) -> Result<ResultSet> {
    debug!("Interpreting response against {} schema", variant);

    match variant {
        SchemaVariant::Extended => {
            let wire: ExtendedWire = serde_json::from_value(raw)
                .map_err(|e| CytoscanError::Interpretation(e.to_string()))?;

            let samples = SampleGalleries {
                singlets: decode_samples(&wire.singlet_images)?,
                aggregates: decode_samples(&wire.aggregate_images)?,
                live: decode_samples(&wire.live_images)?,
                dead: decode_samples(&wire.dead_images)?,
            };

            Ok(ResultSet::Extended(ExtendedResults {
                summary: wire.summary,
                samples,
                outcomes: wire.results,
            }))
        }
        SchemaVariant::Basic => {
            let wire: BasicWire = serde_json::from_value(raw)
                .map_err(|e| CytoscanError::Interpretation(e.to_string()))?;

            Ok(ResultSet::Basic(BasicResults {
                summary: wire.summary,
                outcomes: wire.results,
            }))
        }
    }
}

/// Decode base64 sample payloads into opaque blobs
fn decode_samples(encoded: &[String]) -> Result<Vec<Vec<u8>>> {
    encoded
        .iter()
        .map(|s| {
            general_purpose::STANDARD
                .decode(s)
                .map_err(CytoscanError::from)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::Engine as _;
    use serde_json::json;

    fn encoded(bytes: &[u8]) -> String {
        general_purpose::STANDARD.encode(bytes)
    }

    fn extended_payload() -> serde_json::Value {
        json!({
            "summary": {
                "total_images": 2,
                "singlet_count": 2,
                "aggregate_count": 0,
                "live_count": 1,
                "dead_count": 1,
                "live_percentage": 50.0,
                "dead_percentage": 50.0,
                "singlet_percentage": 100.0,
                "aggregate_percentage": 0.0
            },
            "singlet_images": [encoded(b"s1"), encoded(b"s2")],
            "aggregate_images": [],
            "live_images": [encoded(b"l1")],
            "dead_images": [encoded(b"d1")],
            "results": [
                {"filename": "imgA.jpg", "singlet_aggregate_label": "Singlet", "live_dead_label": "Live Cell"},
                {"filename": "imgB.jpg", "singlet_aggregate_label": "Singlet", "live_dead_label": "Dead Cell"}
            ]
        })
    }

    #[test]
    fn test_extended_counts_pass_through() {
        let result = interpret(extended_payload(), SchemaVariant::Extended).unwrap();

        match result {
            ResultSet::Extended(r) => {
                assert_eq!(r.summary.total_images, 2);
                assert_eq!(r.summary.singlet_count, 2);
                assert_eq!(r.summary.aggregate_count, 0);
                assert_eq!(r.summary.live_count, 1);
                assert_eq!(r.summary.dead_count, 1);
                assert_eq!(r.summary.live_percentage, 50.0);
                assert_eq!(r.summary.singlet_percentage, 100.0);
                assert_eq!(r.samples.singlets, vec![b"s1".to_vec(), b"s2".to_vec()]);
                assert!(r.samples.aggregates.is_empty());
                assert_eq!(r.outcomes.len(), 2);
            }
            ResultSet::Basic(_) => panic!("Expected extended result set"),
        }
    }

    #[test]
    fn test_percentages_not_rederived() {
        // Inconsistent on purpose: shape validation accepts what the
        // service computed
        let mut payload = extended_payload();
        payload["summary"]["live_percentage"] = json!(99.9);

        let result = interpret(payload, SchemaVariant::Extended).unwrap();
        match result {
            ResultSet::Extended(r) => assert_eq!(r.summary.live_percentage, 99.9),
            ResultSet::Basic(_) => panic!("Expected extended result set"),
        }
    }

    #[test]
    fn test_missing_summary_is_error() {
        let payload = json!({
            "singlet_images": [],
            "aggregate_images": [],
            "live_images": [],
            "dead_images": []
        });

        let err = interpret(payload, SchemaVariant::Extended).unwrap_err();
        assert!(matches!(err, CytoscanError::Interpretation(_)));
    }

    #[test]
    fn test_wrong_field_type_is_error() {
        let mut payload = extended_payload();
        payload["summary"]["live_count"] = json!("one");

        let err = interpret(payload, SchemaVariant::Extended).unwrap_err();
        assert!(matches!(err, CytoscanError::Interpretation(_)));
    }

    #[test]
    fn test_negative_count_is_error() {
        let mut payload = extended_payload();
        payload["summary"]["dead_count"] = json!(-1);

        let err = interpret(payload, SchemaVariant::Extended).unwrap_err();
        assert!(matches!(err, CytoscanError::Interpretation(_)));
    }

    #[test]
    fn test_undecodable_sample_is_error() {
        let mut payload = extended_payload();
        payload["live_images"] = json!(["not base64!!!"]);

        assert!(interpret(payload, SchemaVariant::Extended).is_err());
    }

    #[test]
    fn test_basic_schema() {
        let payload = json!({
            "summary": {
                "total_images": 3,
                "live_count": 2,
                "dead_count": 1,
                "live_percentage": 66.67,
                "dead_percentage": 33.33
            },
            "results": [
                {"filename": "a.jpg", "label": "Live Cell"},
                {"filename": "b.jpg", "label": "Live Cell"},
                {"filename": "c.jpg", "label": "Dead Cell"}
            ]
        });

        let result = interpret(payload, SchemaVariant::Basic).unwrap();
        match result {
            ResultSet::Basic(r) => {
                assert_eq!(r.summary.total_images, 3);
                assert_eq!(r.summary.live_percentage, 66.67);
                assert_eq!(r.outcomes.len(), 3);
            }
            ResultSet::Extended(_) => panic!("Expected basic result set"),
        }
    }

    #[test]
    fn test_basic_missing_count_is_error() {
        let payload = json!({
            "summary": {
                "total_images": 1,
                "live_count": 1,
                "live_percentage": 100.0,
                "dead_percentage": 0.0
            }
        });

        let err = interpret(payload, SchemaVariant::Basic).unwrap_err();
        assert!(matches!(err, CytoscanError::Interpretation(_)));
    }

    #[test]
    fn test_per_file_errors_do_not_fail_batch() {
        let mut payload = extended_payload();
        payload["results"] = json!([
            {"filename": "imgA.jpg", "singlet_aggregate_label": "Singlet", "live_dead_label": "Live Cell"},
            {"filename": "blurry.jpg", "error": "Could not read image"}
        ]);

        let result = interpret(payload, SchemaVariant::Extended).unwrap();
        let failed = result.failed_files();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].filename, "blurry.jpg");
    }

    #[test]
    fn test_missing_results_array_tolerated() {
        let mut payload = extended_payload();
        payload.as_object_mut().unwrap().remove("results");

        let result = interpret(payload, SchemaVariant::Extended).unwrap();
        assert!(result.failed_files().is_empty());
    }

    #[test]
    fn test_variant_from_str() {
        assert_eq!("extended".parse::<SchemaVariant>().unwrap(), SchemaVariant::Extended);
        assert_eq!("basic".parse::<SchemaVariant>().unwrap(), SchemaVariant::Basic);
        assert!("duck".parse::<SchemaVariant>().is_err());
    }
}
