//! Report submission from the terminal.
//!
//! The photo file stands in for both the camera and the gallery, and the
//! position comes from `--lat`/`--lon`. Without coordinates location access
//! is treated as denied, so the draft cannot be submitted.

use std::path::PathBuf;
use std::sync::Arc;

use recicla_client::ReportWorkflow;
use recicla_client::geocode::NominatimGeocoder;
use recicla_client::media::CaptureOptions;
use recicla_client::platform::{
    CaptureSource, FilePicker, FixedLocation, Geocoder, PermissionStatus, Platform,
    StaticPermissions,
};
use recicla_client::workflow::CaptureOutcome;
use recicla_core::Coordinates;
use tracing::info;

use super::coordinates;
use crate::console;
use crate::context::{CliError, Context};

fn platform(
    ctx: &Context,
    photo: PathBuf,
    at: Option<Coordinates>,
) -> Result<Platform, CliError> {
    let permissions = if at.is_some() {
        StaticPermissions::granted()
    } else {
        StaticPermissions::granted().with_location(PermissionStatus::Denied)
    };
    let geocoder = match &ctx.config.geocoder_url {
        Some(url) => Some(Arc::new(NominatimGeocoder::new(
            url.clone(),
            ctx.config.http_timeout,
        )?) as Arc<dyn Geocoder>),
        None => None,
    };
    Ok(Platform {
        permissions: Arc::new(permissions),
        location: Arc::new(FixedLocation(at)),
        geocoder,
        picker: Arc::new(FilePicker::new(Some(photo))),
    })
}

pub async fn submit(
    ctx: &Context,
    description: String,
    photo: PathBuf,
    gallery: bool,
    at: Option<(f64, f64)>,
    capture: CaptureOptions,
) -> Result<(), CliError> {
    let at = coordinates(at)?;
    ctx.require_user()?;

    let workflow = ReportWorkflow::new(
        platform(ctx, photo, at)?,
        Arc::new(ctx.api.clone()),
        ctx.session.clone(),
        ctx.notifier.clone(),
    )
    .with_capture_options(capture)
    .with_locality(ctx.config.locality.clone());

    let acquisition = workflow.acquire().await;
    if let Some(fix) = &acquisition.fix {
        console::field(
            "Location",
            format_args!("{:.5}, {:.5}", fix.coordinates.latitude, fix.coordinates.longitude),
        );
        if !fix.address.is_empty() {
            console::field("Address", &fix.address);
        }
    }

    let source = if gallery {
        CaptureSource::Gallery
    } else {
        CaptureSource::Camera
    };
    if workflow.capture_photo(source).await? == CaptureOutcome::Cancelled {
        info!("No photo selected");
    }
    workflow.set_description(description);

    let submission = workflow.submit().await?;
    if let Some(id) = &submission.report_id {
        console::field("Report", id);
    }
    if let Some(user) = ctx.session.current_user() {
        console::field("Balance", format_args!("{} points", user.points));
    }
    Ok(())
}
