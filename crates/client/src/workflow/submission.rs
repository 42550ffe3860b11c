use parking_lot::Mutex;
use recicla_core::{DraftIssue, NewReport, Points, ReportId};
use thiserror::Error;
use tracing::{debug, error, instrument, warn};

use super::{ReportWorkflow, WorkflowState};
use crate::api::ApiError;
use crate::notice::Notice;
use crate::platform::PermissionStatus;

const SUBMIT_FALLBACK: &str = "Could not submit the report";

/// Where the latest submission attempt stands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SubmitStatus {
    #[default]
    Idle,
    Submitting,
    Succeeded { points: Points },
    Failed { message: String },
}

/// Why a report was not accepted.
#[derive(Debug, Error)]
pub enum SubmitError {
    /// A requirement is unmet; nothing was sent.
    #[error(transparent)]
    Incomplete(#[from] DraftIssue),

    /// Nobody is signed in; nothing was sent.
    #[error("Sign in to submit reports")]
    NotSignedIn,

    /// Another attempt from this draft has not finished.
    #[error("A report is already being submitted")]
    InFlight,

    /// The backend did not accept the report.
    #[error("{message}")]
    Remote {
        message: String,
        #[source]
        source: ApiError,
    },
}

/// A report the backend accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub points_awarded: Points,
    pub report_id: Option<ReportId>,
}

/// Puts the status back to idle if an attempt is abandoned mid-flight.
struct InFlightGuard<'a> {
    state: &'a Mutex<WorkflowState>,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.state.lock();
        if state.submit == SubmitStatus::Submitting {
            state.submit = SubmitStatus::Idle;
        }
    }
}

impl ReportWorkflow {
    /// Send the draft as the signed-in user.
    ///
    /// On success the user is told how many points they earned, the draft
    /// is cleared, the points are added to the cached user and the position
    /// is read again for the next report if location access was granted.
    /// On failure the draft and the cached user are left as they were.
    ///
    /// # Errors
    ///
    /// Returns the first unmet requirement, [`SubmitError::NotSignedIn`],
    /// [`SubmitError::InFlight`] while another attempt runs, or the remote
    /// failure. All but `InFlight` are also raised as notices.
    #[instrument(skip(self))]
    pub async fn submit(&self) -> Result<Submission, SubmitError> {
        let (report, guard) = match self.begin_submission() {
            Ok(started) => started,
            Err(SubmitError::InFlight) => {
                debug!("Submission already in flight");
                return Err(SubmitError::InFlight);
            }
            Err(e) => {
                debug!(reason = %e, "Draft not submittable");
                self.notifier.notify(Notice::error(e.to_string()));
                return Err(e);
            }
        };

        match self.gateway.submit_report(&report).await {
            Ok(receipt) => {
                let points = receipt.points_awarded;
                self.notifier.notify(Notice::success(
                    "Report sent!",
                    format!(
                        "Your report was sent. You earned {points} points for helping the environment."
                    ),
                ));

                let relocate = {
                    let mut state = self.state.lock();
                    state.draft.reset();
                    state.submit = SubmitStatus::Succeeded { points };
                    state.location == Some(PermissionStatus::Granted)
                };
                drop(guard);

                if let Err(e) = self.session.award_points(points).await {
                    warn!(error = %e, "Could not persist awarded points");
                }
                if relocate {
                    self.refresh_location().await;
                }

                debug!(%points, report_id = ?receipt.report_id, "Report settled");
                Ok(Submission {
                    points_awarded: points,
                    report_id: receipt.report_id,
                })
            }
            Err(source) => {
                let message = source.user_message(SUBMIT_FALLBACK);
                error!(error = %source, "Report submission rejected");
                self.notifier.notify(Notice::error(message.clone()));
                self.state.lock().submit = SubmitStatus::Failed {
                    message: message.clone(),
                };
                drop(guard);
                Err(SubmitError::Remote { message, source })
            }
        }
    }

    /// Checks that run before anything is sent. Holding the state lock for
    /// the whole check makes the in-flight test and the transition to
    /// `Submitting` one step.
    fn begin_submission(&self) -> Result<(NewReport, InFlightGuard<'_>), SubmitError> {
        let user = self.session.current_user();
        let mut state = self.state.lock();

        if state.submit == SubmitStatus::Submitting {
            return Err(SubmitError::InFlight);
        }
        state.draft.validate()?;
        let user = user.ok_or(SubmitError::NotSignedIn)?;
        let report = state.draft.to_new_report(&user.id)?;

        state.submit = SubmitStatus::Submitting;
        Ok((report, InFlightGuard { state: &self.state }))
    }
}
