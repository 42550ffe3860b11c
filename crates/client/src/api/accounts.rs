//! Registration, login and profile endpoints.

use recicla_core::{AuthResponse, CachedUser, LoginRequest, RegistrationRequest, UserId};
use serde::Serialize;
use tracing::{debug, instrument};

use super::{ApiClient, ApiError};

#[derive(Serialize)]
struct PhotoUpdate<'a> {
    #[serde(rename = "foto")]
    photo: &'a str,
}

impl ApiClient {
    /// Create an account.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails; a taken email comes back as
    /// [`ApiError::Api`] with the server's detail.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn register(&self, request: &RegistrationRequest) -> Result<AuthResponse, ApiError> {
        let response: AuthResponse = self.post("/usuarios", request).await?;
        debug!(user_id = %response.user.id, "Account created");
        Ok(response)
    }

    /// Exchange credentials for a token.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Unauthorized`] for bad credentials.
    #[instrument(skip(self, request), fields(email = %request.email))]
    pub async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
        let response: AuthResponse = self.post("/login", request).await?;
        debug!(user_id = %response.user.id, "Logged in");
        Ok(response)
    }

    /// Fetch the server's view of a user profile.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the user does not exist.
    #[instrument(skip(self))]
    pub async fn get_user(&self, user_id: &UserId) -> Result<CachedUser, ApiError> {
        self.get(&format!("/usuarios/{user_id}")).await
    }

    /// Replace the profile photo with a data URI.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self, photo), fields(photo_len = photo.len()))]
    pub async fn update_profile_photo(
        &self,
        user_id: &UserId,
        photo: &str,
    ) -> Result<(), ApiError> {
        self.put(&format!("/usuarios/{user_id}"), &PhotoUpdate { photo })
            .await?;
        debug!("Profile photo updated");
        Ok(())
    }
}
