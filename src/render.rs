// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Terminal presentation of submission state; a pure function of state to
//! text, with no business logic

use serde_json::json;
use std::fmt::Write as _;

use crate::controller::SubmissionState;
use crate::interpret::{BasicResults, ExtendedResults, ResultSet};

/// Upper bound on sample previews mentioned per category; the service caps
/// at five server-side
const GALLERY_LIMIT: usize = 5;

/// Render the current submission state as terminal text
pub fn render(state: &SubmissionState) -> String {
    match state {
        SubmissionState::Idle => "No results yet. Select files and submit a batch.\n".to_string(),
        SubmissionState::Loading => render_loading(),
        SubmissionState::Failure(msg) => format!("Error: {}\n", msg),
        SubmissionState::Success(results) => render_results(results),
    }
}

/// Placeholder skeleton while the request is in flight
fn render_loading() -> String {
    let mut out = String::from("Processing...\n");
    for width in [24usize, 16, 20, 20, 20, 20] {
        let _ = writeln!(out, "  {}", "-".repeat(width));
    }
    out
}

fn render_results(results: &ResultSet) -> String {
    let mut out = String::from("Results\n=======\n");

    match results {
        ResultSet::Extended(r) => render_extended(&mut out, r),
        ResultSet::Basic(r) => render_basic(&mut out, r),
    }

    let failed = results.failed_files();
    if !failed.is_empty() {
        out.push_str("\nFiles the service could not read:\n");
        for outcome in failed {
            let _ = writeln!(
                out,
                "  {}: {}",
                outcome.filename,
                outcome.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    out
}

fn render_extended(out: &mut String, r: &ExtendedResults) {
    let s = &r.summary;
    let _ = writeln!(out, "Total Images: {}", s.total_images);
    let _ = writeln!(out, "Singlets: {} ({:.2}%)", s.singlet_count, s.singlet_percentage);
    let _ = writeln!(out, "Aggregates: {} ({:.2}%)", s.aggregate_count, s.aggregate_percentage);
    let _ = writeln!(out, "Live Cells from Singlets: {} ({:.2}%)", s.live_count, s.live_percentage);
    let _ = writeln!(out, "Dead Cells from Singlets: {} ({:.2}%)", s.dead_count, s.dead_percentage);

    out.push('\n');
    gallery_line(out, "Singlets", s.singlet_count, r.samples.singlets.len());
    gallery_line(out, "Aggregates", s.aggregate_count, r.samples.aggregates.len());
    gallery_line(out, "Live Cells", s.live_count, r.samples.live.len());
    gallery_line(out, "Dead Cells", s.dead_count, r.samples.dead.len());
}

fn render_basic(out: &mut String, r: &BasicResults) {
    let s = &r.summary;
    let _ = writeln!(out, "Total Images: {}", s.total_images);
    let _ = writeln!(out, "Live Cells: {} ({:.2}%)", s.live_count, s.live_percentage);
    let _ = writeln!(out, "Dead Cells: {} ({:.2}%)", s.dead_count, s.dead_percentage);
}

fn gallery_line(out: &mut String, category: &str, classified: u64, samples: usize) {
    let shown = samples.min(GALLERY_LIMIT);
    let _ = writeln!(
        out,
        "Out of {} classified {}, {} sample image(s) received",
        classified, category, shown
    );
}

/// Machine-readable mirror of the success view
pub fn to_json(results: &ResultSet) -> serde_json::Value {
    match results {
        ResultSet::Extended(r) => json!({
            "schema": "extended",
            "summary": r.summary,
            "sample_counts": {
                "singlets": r.samples.singlets.len(),
                "aggregates": r.samples.aggregates.len(),
                "live": r.samples.live.len(),
                "dead": r.samples.dead.len(),
            },
            "results": r.outcomes,
        }),
        ResultSet::Basic(r) => json!({
            "schema": "basic",
            "summary": r.summary,
            "results": r.outcomes,
        }),
    }
}
