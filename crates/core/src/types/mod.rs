//! Core types for Recicla Contigo.
//!
//! This module provides type-safe wrappers for the domain concepts shared by
//! the client and the CLI.

pub mod catalog;
pub mod email;
pub mod geo;
pub mod id;
pub mod load;
pub mod photo;
pub mod points;
pub mod registration;
pub mod report;
pub mod settings;
pub mod user;

pub use catalog::{
    EducationItem, EducationKind, Incentive, NewsItem, Notification, RankingEntry,
};
pub use email::{Email, EmailError};
pub use geo::{Coordinates, Placemark};
pub use id::*;
pub use load::LoadState;
pub use photo::{PhotoError, PhotoPayload};
pub use points::Points;
pub use registration::{
    AuthResponse, LoginRequest, MIN_PASSWORD_LENGTH, RegistrationError, RegistrationForm,
    RegistrationRequest,
};
pub use report::{
    DraftIssue, DraftPhase, DraftReport, NewReport, ReportReceipt, SubmittedReport,
};
pub use settings::{DisplaySettings, Palette, ThemeMode};
pub use user::CachedUser;
