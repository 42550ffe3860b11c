use recicla_core::format::format_date_time;
use recicla_core::{Coordinates, LoadState, SubmittedReport};
use tracing::instrument;

use crate::api::ApiClient;

/// A pin on the community map.
#[derive(Debug, Clone, PartialEq)]
pub struct MapMarker {
    pub coordinates: Coordinates,
    pub title: String,
    pub subtitle: String,
    pub submitter: String,
}

impl From<&SubmittedReport> for MapMarker {
    fn from(report: &SubmittedReport) -> Self {
        Self {
            coordinates: report.coordinates(),
            title: report.description.clone(),
            subtitle: report
                .timestamp
                .as_deref()
                .map(format_date_time)
                .unwrap_or_default(),
            submitter: report.submitter_or_anonymous().to_owned(),
        }
    }
}

/// Community map plus the public feed below it.
#[derive(Debug)]
pub struct MapScreen {
    api: ApiClient,
    pub map: LoadState<Vec<SubmittedReport>>,
    pub feed: LoadState<Vec<SubmittedReport>>,
}

impl MapScreen {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            map: LoadState::Idle,
            feed: LoadState::Idle,
        }
    }

    /// Fetch map reports and the public feed concurrently.
    #[instrument(skip(self))]
    pub async fn load(&mut self) {
        self.map = LoadState::Loading;
        self.feed = LoadState::Loading;

        let (map, feed) = tokio::join!(self.api.map_reports(), self.api.public_reports());
        self.map =
            LoadState::from_result(map.map_err(|e| e.user_message("Could not load the map")));
        self.feed = LoadState::from_result(
            feed.map_err(|e| e.user_message("Could not load community reports")),
        );
    }

    /// Markers for reports with usable coordinates.
    #[must_use]
    pub fn markers(&self) -> Vec<MapMarker> {
        self.map
            .ready()
            .map(|reports| {
                reports
                    .iter()
                    .filter(|r| r.coordinates().is_valid())
                    .map(MapMarker::from)
                    .collect()
            })
            .unwrap_or_default()
    }
}
