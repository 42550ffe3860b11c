use recicla_core::Coordinates;
use tracing::{debug, instrument, warn};

use super::ReportWorkflow;
use crate::notice::Notice;
use crate::platform::{Accuracy, PermissionKind, PermissionStatus};

/// Result of the initial permission and sensor pass.
#[derive(Debug, Clone, PartialEq)]
pub struct Acquisition {
    pub camera: PermissionStatus,
    pub location: PermissionStatus,
    pub fix: Option<LocationFix>,
}

/// A position and the address it resolved to. The address is empty when
/// the place could not be named.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationFix {
    pub coordinates: Coordinates,
    pub address: String,
}

impl ReportWorkflow {
    /// Ask for camera and location access, then fix the position when
    /// allowed. Denials are advisory: each one raises a warning notice and
    /// the rest of the flow carries on.
    #[instrument(skip(self))]
    pub async fn acquire(&self) -> Acquisition {
        let (camera, location) = tokio::join!(
            self.platform.permissions.request(PermissionKind::Camera),
            self.platform.permissions.request(PermissionKind::Location),
        );
        {
            let mut state = self.state.lock();
            state.camera = Some(camera);
            state.location = Some(location);
        }
        debug!(?camera, ?location, "Permissions resolved");

        if !camera.is_granted() {
            self.notifier.notify(Notice::warning(
                "Camera permission",
                "We need access to your camera to photograph the problem.",
            ));
        }

        let fix = if location.is_granted() {
            self.refresh_location().await
        } else {
            self.notifier.notify(Notice::warning(
                "Location permission",
                "We need your location to record where the environmental problem is.",
            ));
            None
        };

        Acquisition {
            camera,
            location,
            fix,
        }
    }

    /// Read the position again and replace both coordinates and address.
    ///
    /// A sensor failure is logged and leaves the draft as it was. A
    /// geocoding failure still records the coordinates, with an empty
    /// address.
    #[instrument(skip(self))]
    pub async fn refresh_location(&self) -> Option<LocationFix> {
        let coordinates = match self.platform.location.current_position(Accuracy::High).await {
            Ok(coordinates) => coordinates,
            Err(e) => {
                warn!(error = %e, "Could not read current position");
                return None;
            }
        };

        let address = self.describe(coordinates).await;
        self.state
            .lock()
            .draft
            .set_location(coordinates, address.clone());
        debug!(%address, "Location updated");

        Some(LocationFix {
            coordinates,
            address,
        })
    }

    async fn describe(&self, coordinates: Coordinates) -> String {
        let Some(geocoder) = &self.platform.geocoder else {
            return String::new();
        };
        match geocoder.reverse_geocode(coordinates).await {
            Ok(Some(placemark)) => placemark.format_address(&self.locality),
            Ok(None) => {
                debug!("No address known for position");
                String::new()
            }
            Err(e) => {
                warn!(error = %e, "Reverse geocoding failed");
                String::new()
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use recicla_core::DraftPhase;

    use super::*;
    use crate::notice::NoticeLevel;
    use crate::platform::{FixedLocation, StaticPermissions};
    use crate::workflow::testing::{FailingGeocoder, Fixture, VENTANILLA};

    #[tokio::test]
    async fn test_acquire_populates_location() {
        let fx = Fixture::new().await;

        let acquisition = fx.workflow.acquire().await;

        assert_eq!(acquisition.location, PermissionStatus::Granted);
        let fix = acquisition.fix.unwrap();
        assert_eq!(fix.coordinates, VENTANILLA);
        assert_eq!(fix.address, "Av. La Playa 120, Pachacútec, Ventanilla");
        assert_eq!(fx.workflow.draft().coordinates(), Some(VENTANILLA));
        assert!(fx.notices.is_empty());
    }

    #[tokio::test]
    async fn test_geocoding_failure_keeps_coordinates_silently() {
        let fx = Fixture::builder()
            .geocoder(Arc::new(FailingGeocoder))
            .build()
            .await;

        fx.workflow.acquire().await;

        let draft = fx.workflow.draft();
        assert_eq!(draft.coordinates(), Some(VENTANILLA));
        assert_eq!(draft.address(), "");
        assert!(fx.notices.is_empty());
    }

    #[tokio::test]
    async fn test_denials_are_advisory() {
        let fx = Fixture::builder()
            .permissions(
                StaticPermissions::granted()
                    .with_camera(PermissionStatus::Denied)
                    .with_location(PermissionStatus::Denied),
            )
            .build()
            .await;

        let acquisition = fx.workflow.acquire().await;

        assert!(acquisition.fix.is_none());
        assert_eq!(fx.notices.at_level(NoticeLevel::Warning).len(), 2);
        assert_eq!(fx.workflow.phase(), DraftPhase::Empty);
        assert_eq!(
            fx.workflow.permissions(),
            (Some(PermissionStatus::Denied), Some(PermissionStatus::Denied))
        );
    }

    #[tokio::test]
    async fn test_sensor_failure_leaves_draft_untouched() {
        let fx = Fixture::builder()
            .location(FixedLocation(None))
            .build()
            .await;

        let acquisition = fx.workflow.acquire().await;

        assert_eq!(acquisition.location, PermissionStatus::Granted);
        assert!(acquisition.fix.is_none());
        assert!(fx.workflow.draft().coordinates().is_none());
        assert!(fx.notices.is_empty());
    }

    #[tokio::test]
    async fn test_refresh_replaces_address() {
        let fx = Fixture::new().await;
        fx.workflow.acquire().await;
        assert!(!fx.workflow.draft().address().is_empty());

        fx.geocoder.set(None);
        let fix = fx.workflow.refresh_location().await.unwrap();

        assert_eq!(fix.address, "");
        assert_eq!(fx.workflow.draft().address(), "");
        assert_eq!(fx.workflow.draft().coordinates(), Some(VENTANILLA));
    }
}
