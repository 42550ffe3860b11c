//! The report submission workflow.
//!
//! One [`ReportWorkflow`] backs one "report a problem" screen. It owns the
//! draft, asks for permissions, reads the sensors, shapes the photo and
//! settles a successful submission against the cached user.
//!
//! ```text
//! Empty -> Editing -> Submittable -> Submitting -> Succeeded (draft reset)
//!                                              \-> Failed    (draft kept)
//! ```
//!
//! Requirement checks run on every attempt, synchronously, before anything
//! is sent.

mod acquisition;
mod capture;
mod submission;

#[cfg(test)]
pub(crate) mod testing;

pub use acquisition::{Acquisition, LocationFix};
pub use capture::{CaptureError, CaptureFailure, CaptureOutcome};
pub use submission::{SubmitError, SubmitStatus, Submission};

use std::sync::Arc;

use parking_lot::Mutex;
use recicla_core::{DraftPhase, DraftReport};

use crate::api::ReportGateway;
use crate::media::CaptureOptions;
use crate::notice::Notifier;
use crate::platform::{Platform, PermissionStatus};
use crate::session::SessionStore;

const DEFAULT_LOCALITY: &str = "Ventanilla";

pub struct ReportWorkflow {
    platform: Platform,
    gateway: Arc<dyn ReportGateway>,
    session: SessionStore,
    notifier: Arc<dyn Notifier>,
    capture: CaptureOptions,
    locality: String,
    state: Mutex<WorkflowState>,
}

#[derive(Default)]
struct WorkflowState {
    draft: DraftReport,
    submit: SubmitStatus,
    camera: Option<PermissionStatus>,
    location: Option<PermissionStatus>,
}

impl ReportWorkflow {
    #[must_use]
    pub fn new(
        platform: Platform,
        gateway: Arc<dyn ReportGateway>,
        session: SessionStore,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            platform,
            gateway,
            session,
            notifier,
            capture: CaptureOptions::default(),
            locality: DEFAULT_LOCALITY.to_owned(),
            state: Mutex::new(WorkflowState::default()),
        }
    }

    #[must_use]
    pub const fn with_capture_options(mut self, options: CaptureOptions) -> Self {
        self.capture = options;
        self
    }

    #[must_use]
    pub fn with_locality(mut self, locality: impl Into<String>) -> Self {
        self.locality = locality.into();
        self
    }

    /// Snapshot of the current draft.
    #[must_use]
    pub fn draft(&self) -> DraftReport {
        self.state.lock().draft.clone()
    }

    #[must_use]
    pub fn phase(&self) -> DraftPhase {
        self.state.lock().draft.phase()
    }

    #[must_use]
    pub fn status(&self) -> SubmitStatus {
        self.state.lock().submit.clone()
    }

    /// Last recorded answers to the camera and location requests.
    #[must_use]
    pub fn permissions(&self) -> (Option<PermissionStatus>, Option<PermissionStatus>) {
        let state = self.state.lock();
        (state.camera, state.location)
    }

    pub fn set_description(&self, description: impl Into<String>) {
        self.state.lock().draft.set_description(description);
    }

    pub fn remove_photo(&self) {
        self.state.lock().draft.clear_photo();
    }

    /// Discard the draft. Recorded permissions are kept.
    pub fn reset_draft(&self) {
        let mut state = self.state.lock();
        state.draft.reset();
        state.submit = SubmitStatus::Idle;
    }
}

impl std::fmt::Debug for ReportWorkflow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("ReportWorkflow")
            .field("draft", &state.draft)
            .field("submit", &state.submit)
            .field("locality", &self.locality)
            .finish_non_exhaustive()
    }
}
