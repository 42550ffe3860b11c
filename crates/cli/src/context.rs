//! Shared state for one CLI invocation.

use std::sync::Arc;

use recicla_client::media::MediaError;
use recicla_client::platform::PlatformError;
use recicla_client::screens::{AccountError, AccountService, ProfileError, RedeemError};
use recicla_client::workflow::CaptureError;
use recicla_client::{
    ApiClient, ApiError, ClientConfig, ConfigError, FileStore, Notifier, SessionStore,
    StorageError, SubmitError,
};
use thiserror::Error;
use tracing::debug;

use crate::console::ConsoleNotifier;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Account(#[from] AccountError),

    #[error(transparent)]
    Submit(#[from] SubmitError),

    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error(transparent)]
    Redeem(#[from] RedeemError),

    #[error(transparent)]
    Profile(#[from] ProfileError),

    #[error(transparent)]
    Media(#[from] MediaError),

    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Sign in first with `recicla login`")]
    NotSignedIn,

    #[error("Invalid coordinates: {latitude}, {longitude}")]
    InvalidCoordinates { latitude: f64, longitude: f64 },
}

pub struct Context {
    pub config: ClientConfig,
    pub api: ApiClient,
    pub storage: Arc<FileStore>,
    pub session: SessionStore,
    pub notifier: Arc<dyn Notifier>,
}

impl Context {
    /// Load configuration, open the data directory and restore the session.
    pub async fn open() -> Result<Self, CliError> {
        let config = ClientConfig::from_env()?;
        let storage = Arc::new(FileStore::open(config.data_dir.clone()).await?);
        let session = SessionStore::load(storage.clone()).await?;
        let api = ApiClient::from_config(&config)?;
        if let Some(token) = session.token() {
            api.set_token(token);
        }
        debug!(
            data_dir = %config.data_dir.display(),
            signed_in = session.is_signed_in(),
            "Context ready"
        );
        Ok(Self {
            config,
            api,
            storage,
            session,
            notifier: Arc::new(ConsoleNotifier),
        })
    }

    /// Account operations, with any restored token attached to the client.
    pub fn accounts(&self) -> AccountService {
        AccountService::new(self.api.clone(), self.session.clone(), self.notifier.clone())
    }

    pub fn require_user(&self) -> Result<recicla_core::CachedUser, CliError> {
        self.session.current_user().ok_or(CliError::NotSignedIn)
    }
}
