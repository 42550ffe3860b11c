//! Report submission and listing.

use async_trait::async_trait;
use recicla_core::{NewReport, ReportReceipt, SubmittedReport, UserId};
use serde::Deserialize;
use tracing::{debug, error, instrument};

use super::{ApiClient, ApiError};

#[derive(Deserialize)]
struct ReportsEnvelope {
    #[serde(rename = "reportes", default)]
    reports: Vec<SubmittedReport>,
}

/// Where complete reports are sent.
///
/// The submission workflow depends on this rather than on [`ApiClient`]
/// so it can run against any transport.
#[async_trait]
pub trait ReportGateway: Send + Sync {
    /// Send one report and return what the server granted for it.
    async fn submit_report(&self, report: &NewReport) -> Result<ReportReceipt, ApiError>;
}

#[async_trait]
impl ReportGateway for ApiClient {
    #[instrument(skip(self, report), fields(user_id = %report.user_id))]
    async fn submit_report(&self, report: &NewReport) -> Result<ReportReceipt, ApiError> {
        match self.post::<ReportReceipt, _>("/reportes", report).await {
            Ok(receipt) => {
                debug!(
                    report_id = ?receipt.report_id,
                    points = %receipt.points_awarded,
                    "Report submitted"
                );
                Ok(receipt)
            }
            Err(e) => {
                error!(error = %e, "Report submission failed");
                Err(e)
            }
        }
    }
}

impl ApiClient {
    /// Reports sent by one user.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the body is malformed.
    #[instrument(skip(self))]
    pub async fn user_reports(&self, user_id: &UserId) -> Result<Vec<SubmittedReport>, ApiError> {
        let envelope: ReportsEnvelope = self.get(&format!("/reportes/{user_id}")).await?;
        debug!(count = envelope.reports.len(), "Fetched user reports");
        Ok(envelope.reports)
    }

    /// Community feed of public reports, newest first.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the body is malformed.
    #[instrument(skip(self))]
    pub async fn public_reports(&self) -> Result<Vec<SubmittedReport>, ApiError> {
        let envelope: ReportsEnvelope = self.get("/reportes-publicos").await?;
        debug!(count = envelope.reports.len(), "Fetched public reports");
        Ok(envelope.reports)
    }

    /// Reports with coordinates for the map view.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the body is malformed.
    #[instrument(skip(self))]
    pub async fn map_reports(&self) -> Result<Vec<SubmittedReport>, ApiError> {
        let envelope: ReportsEnvelope = self.get("/mapa-reportes").await?;
        debug!(count = envelope.reports.len(), "Fetched map reports");
        Ok(envelope.reports)
    }
}
