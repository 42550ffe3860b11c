//! Draft and submitted environmental reports.
//!
//! A [`DraftReport`] is the in-progress report owned by one reporting
//! session. It is never persisted. [`NewReport`] is the wire body built from
//! a complete draft, and [`SubmittedReport`] is the read-only projection the
//! server returns for list and map views.

use serde::{Deserialize, Serialize};

use super::{Coordinates, PhotoPayload, Points, ReportId, UserId};

/// Why a draft cannot be submitted yet.
///
/// Variants are ordered the way they are checked; the first unmet
/// requirement wins.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftIssue {
    #[error("Please describe the problem")]
    MissingDescription,
    #[error("Please take a photo of the problem")]
    MissingPhoto,
    #[error("Location unavailable")]
    MissingLocation,
}

/// Where a draft stands, derived from its fields on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftPhase {
    /// Nothing has been filled in.
    Empty,
    /// Something is filled in but at least one requirement is unmet.
    Editing,
    /// Description, photo and coordinates are all present.
    Submittable,
}

/// An in-progress report.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DraftReport {
    description: String,
    photo: Option<PhotoPayload>,
    coordinates: Option<Coordinates>,
    address: String,
}

impl DraftReport {
    /// An empty draft.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub const fn photo(&self) -> Option<&PhotoPayload> {
        self.photo.as_ref()
    }

    #[must_use]
    pub const fn coordinates(&self) -> Option<Coordinates> {
        self.coordinates
    }

    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    /// Replace the held photo. A report carries at most one.
    pub fn set_photo(&mut self, photo: PhotoPayload) {
        self.photo = Some(photo);
    }

    pub fn clear_photo(&mut self) {
        self.photo = None;
    }

    /// Replace the location entirely. An empty `address` means the place
    /// could not be named.
    pub fn set_location(&mut self, coordinates: Coordinates, address: impl Into<String>) {
        self.coordinates = Some(coordinates);
        self.address = address.into();
    }

    /// Back to the empty draft.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Check the submission requirements in order: description, photo,
    /// coordinates.
    ///
    /// # Errors
    ///
    /// Returns the first unmet requirement.
    pub fn validate(&self) -> Result<(), DraftIssue> {
        if self.description.trim().is_empty() {
            return Err(DraftIssue::MissingDescription);
        }
        if self.photo.is_none() {
            return Err(DraftIssue::MissingPhoto);
        }
        if self.coordinates.is_none() {
            return Err(DraftIssue::MissingLocation);
        }
        Ok(())
    }

    #[must_use]
    pub fn phase(&self) -> DraftPhase {
        if self.validate().is_ok() {
            DraftPhase::Submittable
        } else if *self == Self::default() {
            DraftPhase::Empty
        } else {
            DraftPhase::Editing
        }
    }

    /// Build the request body for `user_id`.
    ///
    /// # Errors
    ///
    /// Returns the first unmet requirement, exactly as [`Self::validate`].
    pub fn to_new_report(&self, user_id: &UserId) -> Result<NewReport, DraftIssue> {
        self.validate()?;
        let (Some(photo), Some(coordinates)) = (&self.photo, self.coordinates) else {
            return Err(DraftIssue::MissingPhoto);
        };
        Ok(NewReport {
            description: self.description.trim().to_owned(),
            photo: photo.clone(),
            latitude: coordinates.latitude,
            longitude: coordinates.longitude,
            address: self.address.clone(),
            user_id: user_id.clone(),
        })
    }
}

/// Body of `POST /api/reportes`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewReport {
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "foto_base64")]
    pub photo: PhotoPayload,
    #[serde(rename = "latitud")]
    pub latitude: f64,
    #[serde(rename = "longitud")]
    pub longitude: f64,
    #[serde(rename = "direccion")]
    pub address: String,
    #[serde(rename = "usuario_id")]
    pub user_id: UserId,
}

/// Response of `POST /api/reportes`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReportReceipt {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(rename = "reporte_id", default)]
    pub report_id: Option<ReportId>,
    #[serde(rename = "puntos_ganados")]
    pub points_awarded: Points,
}

/// A report as listed by the server.
///
/// List endpoints project different subsets (the public list drops the
/// photo, the per-user list drops the ID), so everything except the
/// location and description is optional.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SubmittedReport {
    #[serde(rename = "_id", default)]
    pub id: Option<ReportId>,
    #[serde(rename = "descripcion", default)]
    pub description: String,
    #[serde(rename = "foto_base64", default)]
    pub photo: Option<String>,
    #[serde(rename = "latitud")]
    pub latitude: f64,
    #[serde(rename = "longitud")]
    pub longitude: f64,
    #[serde(rename = "direccion", default)]
    pub address: Option<String>,
    #[serde(rename = "usuario_id", default)]
    pub user_id: Option<UserId>,
    #[serde(rename = "usuario_nombre", default)]
    pub submitter_name: Option<String>,
    #[serde(rename = "fecha", default)]
    pub timestamp: Option<String>,
    #[serde(rename = "estado", default)]
    pub status: Option<String>,
    #[serde(rename = "publico", default)]
    pub public: Option<bool>,
}

impl SubmittedReport {
    #[must_use]
    pub const fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }

    /// Submitter name, or the anonymous label the server uses.
    #[must_use]
    pub fn submitter_or_anonymous(&self) -> &str {
        self.submitter_name.as_deref().unwrap_or("Usuario Anónimo")
    }
}
