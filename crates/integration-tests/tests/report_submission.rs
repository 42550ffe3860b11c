//! Report submission end to end: sign in, locate, photograph, submit.

use std::path::PathBuf;
use std::sync::Arc;

use httpmock::prelude::*;
use recicla_client::geocode::NominatimGeocoder;
use recicla_client::notice::NoticeLevel;
use recicla_client::platform::{
    CaptureSource, FilePicker, FixedLocation, Geocoder, Platform, StaticPermissions,
};
use recicla_client::screens::AccountService;
use recicla_client::workflow::CaptureOutcome;
use recicla_client::{ReportWorkflow, SubmitError, SubmitStatus};
use recicla_core::{DraftPhase, Points};
use recicla_integration_tests::{PACHACUTEC, TestContext, auth_json};
use serde_json::json;

fn workflow(ctx: &TestContext, photo: PathBuf) -> ReportWorkflow {
    let geocoder = NominatimGeocoder::new(TestContext::url(&ctx.server), None)
        .expect("Failed to build geocoder");
    let platform = Platform {
        permissions: Arc::new(StaticPermissions::granted()),
        location: Arc::new(FixedLocation(Some(PACHACUTEC))),
        geocoder: Some(Arc::new(geocoder) as Arc<dyn Geocoder>),
        picker: Arc::new(FilePicker::new(Some(photo))),
    };
    ReportWorkflow::new(
        platform,
        Arc::new(ctx.api.clone()),
        ctx.session.clone(),
        ctx.notices.clone(),
    )
}

async fn mock_geocoder(server: &MockServer) {
    server
        .mock_async(|when, then| {
            when.method(GET).path("/reverse");
            then.status(200).json_body(json!({
                "address": {
                    "road": "Av. La Playa",
                    "house_number": "120",
                    "suburb": "Pachacútec",
                    "city": "Ventanilla"
                }
            }));
        })
        .await;
}

async fn sign_in(ctx: &TestContext, points: u32) {
    ctx.server
        .mock_async(|when, then| {
            when.method(POST).path("/api/login");
            then.status(200).json_body(auth_json("tok-1", points));
        })
        .await;
    AccountService::new(ctx.api.clone(), ctx.session.clone(), ctx.notices.clone())
        .login("ana@mail.pe", "secreto123")
        .await
        .expect("Login failed");
}

#[tokio::test]
async fn test_submission_awards_and_persists_points() {
    let ctx = TestContext::new().await;
    mock_geocoder(&ctx.server).await;
    sign_in(&ctx, 5).await;
    let submit = ctx
        .server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/reportes")
                .header("authorization", "Bearer tok-1")
                .body_includes("\"usuario_id\":\"u1\"")
                .body_includes("\"direccion\":\"Av. La Playa 120, Pachacútec, Ventanilla\"")
                .body_includes("data:image/jpeg;base64,");
            then.status(200).json_body(json!({
                "message": "Reporte creado exitosamente",
                "reporte_id": "r-9",
                "puntos_ganados": 10
            }));
        })
        .await;
    let workflow = workflow(&ctx, ctx.photo_file(800, 800));

    let acquisition = workflow.acquire().await;
    let fix = acquisition.fix.expect("Position should be fixed");
    assert_eq!(fix.address, "Av. La Playa 120, Pachacútec, Ventanilla");

    let outcome = workflow
        .capture_photo(CaptureSource::Camera)
        .await
        .expect("Capture failed");
    assert_eq!(outcome, CaptureOutcome::Replaced);
    workflow.set_description("Basura acumulada frente al colegio");
    assert_eq!(workflow.phase(), DraftPhase::Submittable);

    let submission = workflow.submit().await.expect("Submit failed");

    submit.assert_async().await;
    assert_eq!(submission.points_awarded, Points::new(10));
    assert_eq!(
        workflow.status(),
        SubmitStatus::Succeeded {
            points: Points::new(10)
        }
    );
    let draft = workflow.draft();
    assert!(draft.description().is_empty());
    assert!(draft.photo().is_none());
    assert!(draft.coordinates().is_some(), "Location is fixed again for the next report");

    let (_, restored) = ctx.reopen().await;
    let user = restored.current_user().expect("User should persist");
    assert_eq!(user.points, Points::new(15));
    assert!(restored.is_signed_in());
    assert_eq!(
        ctx.notices.at_level(NoticeLevel::Success).last().map(|n| n.title.as_str()),
        Some("Report sent!")
    );
}

#[tokio::test]
async fn test_rejected_submission_keeps_draft_and_balance() {
    let ctx = TestContext::new().await;
    mock_geocoder(&ctx.server).await;
    sign_in(&ctx, 5).await;
    ctx.server
        .mock_async(|when, then| {
            when.method(POST).path("/api/reportes");
            then.status(422).json_body(json!({
                "detail": [{"loc": ["body", "latitud"], "msg": "field required", "type": "missing"}]
            }));
        })
        .await;
    let workflow = workflow(&ctx, ctx.photo_file(640, 480));
    workflow.acquire().await;
    workflow
        .capture_photo(CaptureSource::Gallery)
        .await
        .expect("Capture failed");
    workflow.set_description("Desmonte en la loma");

    let err = workflow.submit().await.expect_err("Submit should fail");

    assert!(matches!(&err, SubmitError::Remote { message, .. } if message == "field required"));
    assert_eq!(workflow.phase(), DraftPhase::Submittable);
    assert_eq!(
        workflow.status(),
        SubmitStatus::Failed {
            message: "field required".into()
        }
    );
    let (_, restored) = ctx.reopen().await;
    assert_eq!(
        restored.current_user().map(|u| u.points),
        Some(Points::new(5))
    );
}

#[tokio::test]
async fn test_signed_out_submission_is_refused_locally() {
    let ctx = TestContext::new().await;
    mock_geocoder(&ctx.server).await;
    let submit = ctx
        .server
        .mock_async(|when, then| {
            when.method(POST).path("/api/reportes");
            then.status(200);
        })
        .await;
    let workflow = workflow(&ctx, ctx.photo_file(400, 300));
    workflow.acquire().await;
    workflow
        .capture_photo(CaptureSource::Camera)
        .await
        .expect("Capture failed");
    workflow.set_description("Quema de basura");

    let err = workflow.submit().await.expect_err("Submit should fail");

    assert!(matches!(err, SubmitError::NotSignedIn));
    submit.assert_calls_async(0).await;
}
