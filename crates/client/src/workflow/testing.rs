//! Fakes shared by the workflow tests.

#![allow(clippy::unwrap_used)]

use std::collections::VecDeque;
use std::io::Cursor;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use image::{DynamicImage, ImageFormat, RgbImage};
use parking_lot::Mutex;
use recicla_core::{
    CachedUser, Coordinates, Email, NewReport, Placemark, Points, ReportId, ReportReceipt, UserId,
};
use tokio::sync::Notify;

use super::ReportWorkflow;
use crate::api::{ApiError, ReportGateway};
use crate::media::CaptureOptions;
use crate::notice::NoticeLog;
use crate::platform::{
    CaptureSource, FixedLocation, Geocoder, ImagePicker, PickOutcome, Platform, PlatformError,
    RawImage, StaticPermissions,
};
use crate::session::SessionStore;
use crate::storage::MemoryStore;

pub(crate) const VENTANILLA: Coordinates = Coordinates::new(-11.87, -77.13);

pub(crate) fn png(width: u32, height: u32) -> Vec<u8> {
    let img =
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, image::Rgb([90, 140, 60])));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png).unwrap();
    out.into_inner()
}

pub(crate) fn user(points: u32) -> CachedUser {
    CachedUser {
        id: UserId::new("u1"),
        name: "Ana Torres".into(),
        email: Email::parse("ana@mail.pe").unwrap(),
        points: Points::new(points),
        reports_submitted: 3,
        achievements: Vec::new(),
        photo: None,
    }
}

/// What the fake backend answers.
pub(crate) enum Reply {
    Points(u32),
    Reject { status: u16, detail: Option<String> },
    Hang,
}

pub(crate) struct FakeGateway {
    calls: AtomicUsize,
    reply: Mutex<Reply>,
    held: AtomicBool,
    pub entered: Notify,
    pub release: Notify,
    last: Mutex<Option<NewReport>>,
}

impl FakeGateway {
    pub(crate) fn new(reply: Reply) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            reply: Mutex::new(reply),
            held: AtomicBool::new(false),
            entered: Notify::new(),
            release: Notify::new(),
            last: Mutex::new(None),
        }
    }

    /// Make each call wait for `release` before answering.
    pub(crate) fn hold(&self) {
        self.held.store(true, Ordering::SeqCst);
    }

    pub(crate) fn set_reply(&self, reply: Reply) {
        *self.reply.lock() = reply;
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn last_report(&self) -> Option<NewReport> {
        self.last.lock().clone()
    }
}

#[async_trait]
impl ReportGateway for FakeGateway {
    async fn submit_report(&self, report: &NewReport) -> Result<ReportReceipt, ApiError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last.lock() = Some(report.clone());
        self.entered.notify_one();

        if self.held.load(Ordering::SeqCst) {
            self.release.notified().await;
        }

        let outcome = match &*self.reply.lock() {
            Reply::Points(points) => Some(Ok(ReportReceipt {
                message: Some("Reporte enviado exitosamente".into()),
                report_id: Some(ReportId::new("r1")),
                points_awarded: Points::new(*points),
            })),
            Reply::Reject { status, detail } => Some(Err(ApiError::Api {
                status: *status,
                detail: detail.clone(),
            })),
            Reply::Hang => None,
        };
        match outcome {
            Some(outcome) => outcome,
            None => std::future::pending().await,
        }
    }
}

pub(crate) struct FixedGeocoder(Mutex<Option<Placemark>>);

impl FixedGeocoder {
    pub(crate) fn new(placemark: Option<Placemark>) -> Self {
        Self(Mutex::new(placemark))
    }

    pub(crate) fn pachacutec() -> Self {
        Self::new(Some(Placemark {
            street: Some("Av. La Playa".into()),
            street_number: Some("120".into()),
            district: Some("Pachacútec".into()),
        }))
    }

    pub(crate) fn set(&self, placemark: Option<Placemark>) {
        *self.0.lock() = placemark;
    }
}

#[async_trait]
impl Geocoder for FixedGeocoder {
    async fn reverse_geocode(&self, _at: Coordinates) -> Result<Option<Placemark>, PlatformError> {
        Ok(self.0.lock().clone())
    }
}

pub(crate) struct FailingGeocoder;

#[async_trait]
impl Geocoder for FailingGeocoder {
    async fn reverse_geocode(&self, _at: Coordinates) -> Result<Option<Placemark>, PlatformError> {
        Err(PlatformError::Geocoding("service unavailable".into()))
    }
}

/// Hands out queued outcomes; an empty queue behaves like a cancelled
/// dialog.
#[derive(Default)]
pub(crate) struct ScriptedPicker {
    queue: Mutex<VecDeque<Result<PickOutcome, PlatformError>>>,
}

impl ScriptedPicker {
    pub(crate) fn push_image(&self, bytes: Vec<u8>) {
        self.queue
            .lock()
            .push_back(Ok(PickOutcome::Picked(RawImage { bytes })));
    }

    pub(crate) fn push(&self, outcome: Result<PickOutcome, PlatformError>) {
        self.queue.lock().push_back(outcome);
    }
}

#[async_trait]
impl ImagePicker for ScriptedPicker {
    async fn pick(
        &self,
        _source: CaptureSource,
        _options: &CaptureOptions,
    ) -> Result<PickOutcome, PlatformError> {
        self.queue
            .lock()
            .pop_front()
            .unwrap_or(Ok(PickOutcome::Cancelled))
    }
}

pub(crate) struct Fixture {
    pub workflow: Arc<ReportWorkflow>,
    pub gateway: Arc<FakeGateway>,
    pub notices: Arc<NoticeLog>,
    pub storage: Arc<MemoryStore>,
    pub session: SessionStore,
    pub picker: Arc<ScriptedPicker>,
    pub geocoder: Arc<FixedGeocoder>,
}

impl Fixture {
    /// All permissions granted, a fixed position, a working geocoder and a
    /// signed-in user with 5 points. The backend awards 10.
    pub(crate) async fn new() -> Self {
        Self::builder().build().await
    }

    pub(crate) fn builder() -> FixtureBuilder {
        FixtureBuilder {
            permissions: StaticPermissions::granted(),
            location: FixedLocation(Some(VENTANILLA)),
            geocoder: None,
            reply: Reply::Points(10),
            user: Some(user(5)),
        }
    }
}

pub(crate) struct FixtureBuilder {
    permissions: StaticPermissions,
    location: FixedLocation,
    geocoder: Option<Arc<dyn Geocoder>>,
    reply: Reply,
    user: Option<CachedUser>,
}

impl FixtureBuilder {
    pub(crate) fn permissions(mut self, permissions: StaticPermissions) -> Self {
        self.permissions = permissions;
        self
    }

    pub(crate) fn location(mut self, location: FixedLocation) -> Self {
        self.location = location;
        self
    }

    pub(crate) fn geocoder(mut self, geocoder: Arc<dyn Geocoder>) -> Self {
        self.geocoder = Some(geocoder);
        self
    }

    pub(crate) fn reply(mut self, reply: Reply) -> Self {
        self.reply = reply;
        self
    }

    pub(crate) fn signed_out(mut self) -> Self {
        self.user = None;
        self
    }

    pub(crate) async fn build(self) -> Fixture {
        let storage = Arc::new(MemoryStore::new());
        let session = SessionStore::new(storage.clone());
        if let Some(user) = self.user {
            session.replace_user(user).await.unwrap();
        }

        let gateway = Arc::new(FakeGateway::new(self.reply));
        let notices = Arc::new(NoticeLog::new());
        let picker = Arc::new(ScriptedPicker::default());
        let geocoder = Arc::new(FixedGeocoder::pachacutec());

        let platform = Platform {
            permissions: Arc::new(self.permissions),
            location: Arc::new(self.location),
            geocoder: Some(
                self.geocoder
                    .unwrap_or_else(|| geocoder.clone() as Arc<dyn Geocoder>),
            ),
            picker: picker.clone(),
        };
        let workflow = Arc::new(ReportWorkflow::new(
            platform,
            gateway.clone(),
            session.clone(),
            notices.clone(),
        ));

        Fixture {
            workflow,
            gateway,
            notices,
            storage,
            session,
            picker,
            geocoder,
        }
    }
}
