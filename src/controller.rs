// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Submission controller: owns the idle/loading/success/failure state
//! machine and the single outstanding service request

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, error, info, warn};

use crate::client::ClassificationService;
use crate::interpret::{interpret, ResultSet, SchemaVariant};
use crate::selection::{SelectedFile, SelectionStore};
use crate::Result;

/// Shown when submit is attempted with nothing selected
pub const NO_FILES_MESSAGE: &str = "Please select at least one file.";

/// Shown for every transport or interpretation failure; the underlying
/// cause goes to the log, never to the user
pub const PROCESSING_ERROR_MESSAGE: &str = "An error occurred while processing the files.";

/// Submission lifecycle; exactly one variant is active at any time
#[derive(Debug, Clone, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    Loading,
    Success(ResultSet),
    Failure(String),
}

impl SubmissionState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// Drives a selection through one submission cycle at a time.
///
/// The `Loading` state is the mutual-exclusion gate: while a request is in
/// flight, further `submit` calls are rejected without side effects. There
/// is no cancellation; an in-flight request runs to completion.
pub struct SubmissionController {
    service: Arc<dyn ClassificationService>,
    variant: SchemaVariant,
    state: Mutex<SubmissionState>,
}

impl SubmissionController {
    pub fn new(service: Arc<dyn ClassificationService>, variant: SchemaVariant) -> Self {
        Self {
            service,
            variant,
            state: Mutex::new(SubmissionState::Idle),
        }
    }

    /// Snapshot of the current state
    pub fn state(&self) -> SubmissionState {
        self.lock_state().clone()
    }

    /// Submit the current selection; the sole entry point that begins
    /// processing. Returns the state the cycle settled in.
    ///
    /// An empty selection fails locally and synchronously, without any
    /// network activity. A call while a request is outstanding is a no-op.
    pub async fn submit(&self, selection: &SelectionStore) -> SubmissionState {
        {
            // One synchronous critical section: guard check plus the
            // transition into Loading, before any network activity
            let mut state = self.lock_state();

            if state.is_loading() {
                warn!("Submission already in flight, ignoring");
                return state.clone();
            }

            if selection.is_empty() {
                warn!("Submission refused: no files selected");
                *state = SubmissionState::Failure(NO_FILES_MESSAGE.to_string());
                return state.clone();
            }

            info!("Submitting {} file(s)", selection.len());
            *state = SubmissionState::Loading;
        }

        let outcome = self.run_cycle(selection.files()).await;

        let mut state = self.lock_state();
        *state = match outcome {
            Ok(results) => {
                info!("Batch classified: {} image(s)", results.total_images());
                SubmissionState::Success(results)
            }
            Err(e) => {
                error!("Submission failed: {}", e);
                SubmissionState::Failure(PROCESSING_ERROR_MESSAGE.to_string())
            }
        };
        state.clone()
    }

    async fn run_cycle(&self, files: &[SelectedFile]) -> Result<ResultSet> {
        let raw = self.service.classify(files).await?;
        debug!("Service responded, interpreting payload");
        interpret(raw, self.variant)
    }

    // The mutex is never held across an await; a poisoned lock only means
    // a panicked writer, so the value itself is still a valid state
    fn lock_state(&self) -> MutexGuard<'_, SubmissionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
