//! View models for the tabs around the report workflow.
//!
//! Each screen owns its [`recicla_core::LoadState`]s and is driven by a
//! frontend: call `load`, then read the state. Failures that need the
//! user's attention go through the [`crate::notice::Notifier`]; load
//! failures stay in the state as [`recicla_core::LoadState::Failed`].

mod account;
mod education;
mod home;
mod incentives;
mod map;
mod profile;

pub use account::{AccountError, AccountService};
pub use education::EducationScreen;
pub use home::HomeScreen;
pub use incentives::{IncentivesScreen, RedeemError};
pub use map::{MapMarker, MapScreen};
pub use profile::{ProfileError, ProfileScreen};
