//! Registration, login and logout.

use std::sync::Arc;

use recicla_core::{
    CachedUser, Email, EmailError, LoginRequest, RegistrationError, RegistrationForm,
};
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use tracing::{error, instrument};

use crate::api::{ApiClient, ApiError};
use crate::notice::{Notice, Notifier};
use crate::session::SessionStore;
use crate::storage::StorageError;

const REGISTER_FALLBACK: &str = "Could not create the account";
const LOGIN_FALLBACK: &str = "Could not sign in";

#[derive(Debug, Error)]
pub enum AccountError {
    #[error(transparent)]
    Invalid(#[from] RegistrationError),

    #[error("Please enter your email and password")]
    MissingCredentials,

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("{message}")]
    Remote {
        message: String,
        #[source]
        source: ApiError,
    },

    #[error("Could not save the session: {0}")]
    Storage(#[from] StorageError),
}

/// Keeps the API client's bearer token and the session store in step.
#[derive(Clone)]
pub struct AccountService {
    api: ApiClient,
    session: SessionStore,
    notifier: Arc<dyn Notifier>,
}

impl AccountService {
    /// Wrap `api` and `session`, attaching any restored token to the client.
    #[must_use]
    pub fn new(api: ApiClient, session: SessionStore, notifier: Arc<dyn Notifier>) -> Self {
        if let Some(token) = session.token() {
            api.set_token(token);
        }
        Self {
            api,
            session,
            notifier,
        }
    }

    #[must_use]
    pub const fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Validate the form locally, create the account and sign in.
    ///
    /// # Errors
    ///
    /// Returns the first validation failure, the server's rejection, or a
    /// storage failure. Each is also raised as a notice.
    #[instrument(skip(self, form))]
    pub async fn register(&self, form: &RegistrationForm) -> Result<CachedUser, AccountError> {
        let request = form.validate().map_err(|e| self.fail(e.into()))?;
        let response = self.api.register(&request).await.map_err(|source| {
            error!(error = %source, "Registration failed");
            self.fail(AccountError::Remote {
                message: source.user_message(REGISTER_FALLBACK),
                source,
            })
        })?;

        self.establish(SecretString::from(response.token), response.user.clone())
            .await?;
        self.notifier.notify(Notice::success(
            "Welcome!",
            "Your account was created. Thanks for joining the recycling revolution.",
        ));
        Ok(response.user)
    }

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Returns error for blank or malformed input, rejected credentials or
    /// a storage failure. Each is also raised as a notice.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<CachedUser, AccountError> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(self.fail(AccountError::MissingCredentials));
        }
        let email = Email::parse(email).map_err(|e| self.fail(e.into()))?;
        let request = LoginRequest {
            email,
            password: password.to_owned(),
        };
        let response = self.api.login(&request).await.map_err(|source| {
            error!(error = %source, "Login failed");
            self.fail(AccountError::Remote {
                message: source.user_message(LOGIN_FALLBACK),
                source,
            })
        })?;

        self.establish(SecretString::from(response.token), response.user.clone())
            .await?;
        Ok(response.user)
    }

    /// Forget the token and cached user.
    ///
    /// # Errors
    ///
    /// Returns error if storage cannot be cleared.
    pub async fn logout(&self) -> Result<(), AccountError> {
        self.api.clear_token();
        self.session.sign_out().await?;
        Ok(())
    }

    async fn establish(&self, token: SecretString, user: CachedUser) -> Result<(), AccountError> {
        self.api
            .set_token(SecretString::from(token.expose_secret().to_owned()));
        self.session
            .sign_in(token, user)
            .await
            .map_err(|e| self.fail(e.into()))
    }

    fn fail(&self, err: AccountError) -> AccountError {
        self.notifier.notify(Notice::error(err.to_string()));
        err
    }
}

impl std::fmt::Debug for AccountService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountService")
            .field("api", &self.api)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}
