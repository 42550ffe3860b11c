//! Recicla Contigo Client - everything between the views and the outside world.
//!
//! # Architecture
//!
//! - [`api`] - REST client for the backend (`/api/...` endpoints)
//! - [`storage`] - Key-value persistence (`token`, `user`, display settings)
//! - [`session`] / [`settings`] - Observable stores views subscribe to
//! - [`platform`] - Traits for camera, gallery, location and permissions
//! - [`geocode`] - HTTP reverse geocoding
//! - [`media`] - Photo normalisation and encoding
//! - [`workflow`] - The report submission workflow
//! - [`screens`] - View models for the remaining tabs
//!
//! Every user-visible failure is turned into a [`notice::Notice`] at the point
//! where it happens and also returned as a typed error.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod config;
pub mod geocode;
pub mod media;
pub mod notice;
pub mod platform;
pub mod screens;
pub mod session;
pub mod settings;
pub mod storage;
pub mod workflow;

pub use api::{ApiClient, ApiError, ReportGateway};
pub use config::{ClientConfig, ConfigError};
pub use notice::{Notice, NoticeLevel, Notifier};
pub use session::SessionStore;
pub use settings::SettingsStore;
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
pub use workflow::{ReportWorkflow, SubmitError, SubmitStatus};
