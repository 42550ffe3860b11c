//! Account registration and login payloads.

use serde::{Deserialize, Serialize};

use super::{CachedUser, Coordinates, Email, EmailError, UserId};

/// Minimum password length accepted by the registration form.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Reasons a registration form is rejected before it reaches the server.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("Please fill in all fields")]
    MissingFields,
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("Password must be at least {} characters", MIN_PASSWORD_LENGTH)]
    PasswordTooShort,
    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),
}

/// The registration form as typed by the user.
///
/// Coordinates are optional; they are captured when location permission was
/// granted on the registration screen.
#[derive(Clone, Default)]
pub struct RegistrationForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirmation: String,
    pub coordinates: Option<Coordinates>,
}

impl core::fmt::Debug for RegistrationForm {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RegistrationForm")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("coordinates", &self.coordinates)
            .finish_non_exhaustive()
    }
}

impl RegistrationForm {
    /// Validate in order: all fields present, passwords match, password
    /// length, email shape.
    ///
    /// # Errors
    ///
    /// Returns the first failing check.
    pub fn validate(&self) -> Result<RegistrationRequest, RegistrationError> {
        if self.name.trim().is_empty()
            || self.email.trim().is_empty()
            || self.password.is_empty()
            || self.confirmation.is_empty()
        {
            return Err(RegistrationError::MissingFields);
        }
        if self.password != self.confirmation {
            return Err(RegistrationError::PasswordMismatch);
        }
        if self.password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(RegistrationError::PasswordTooShort);
        }
        let email = Email::parse(&self.email)?;

        Ok(RegistrationRequest {
            name: self.name.trim().to_owned(),
            email,
            password: self.password.clone(),
            latitude: self.coordinates.map(|c| c.latitude),
            longitude: self.coordinates.map(|c| c.longitude),
        })
    }
}

/// Body of `POST /api/usuarios`.
#[derive(Clone, Serialize)]
pub struct RegistrationRequest {
    #[serde(rename = "nombre")]
    pub name: String,
    pub email: Email,
    pub password: String,
    #[serde(rename = "latitud")]
    pub latitude: Option<f64>,
    #[serde(rename = "longitud")]
    pub longitude: Option<f64>,
}

impl core::fmt::Debug for RegistrationRequest {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RegistrationRequest")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

/// Body of `POST /api/login`.
#[derive(Clone, Serialize)]
pub struct LoginRequest {
    pub email: Email,
    pub password: String,
}

impl core::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Response of both registration and login.
#[derive(Clone, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub message: Option<String>,
    pub token: String,
    #[serde(default)]
    pub user_id: Option<UserId>,
    #[serde(rename = "usuario")]
    pub user: CachedUser,
}

impl core::fmt::Debug for AuthResponse {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AuthResponse")
            .field("token", &"[REDACTED]")
            .field("user", &self.user)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn form() -> RegistrationForm {
        RegistrationForm {
            name: " Ana Torres ".into(),
            email: "ana@mail.pe".into(),
            password: "reciclo1".into(),
            confirmation: "reciclo1".into(),
            coordinates: None,
        }
    }

    #[test]
    fn test_valid_form() {
        let request = form().validate().unwrap();
        assert_eq!(request.name, "Ana Torres");
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["nombre"], "Ana Torres");
        assert!(json["latitud"].is_null());
    }

    #[test]
    fn test_validation_order() {
        let mut f = form();
        f.confirmation = String::new();
        f.email = "not-an-email".into();
        assert_eq!(f.validate().unwrap_err(), RegistrationError::MissingFields);

        f.confirmation = "otra".into();
        assert_eq!(f.validate().unwrap_err(), RegistrationError::PasswordMismatch);

        f.password = "otra".into();
        assert_eq!(f.validate().unwrap_err(), RegistrationError::PasswordTooShort);

        f.password = "suficiente".into();
        f.confirmation = "suficiente".into();
        assert!(matches!(
            f.validate().unwrap_err(),
            RegistrationError::InvalidEmail(_)
        ));
    }

    #[test]
    fn test_coordinates_are_sent() {
        let mut f = form();
        f.coordinates = Some(Coordinates::new(-11.87, -77.13));
        let json = serde_json::to_value(f.validate().unwrap()).unwrap();
        assert_eq!(json["latitud"], -11.87);
        assert_eq!(json["longitud"], -77.13);
    }

    #[test]
    fn test_debug_redacts_password() {
        assert!(!format!("{:?}", form()).contains("reciclo1"));
    }

    #[test]
    fn test_auth_response() {
        let json = r#"{
            "message": "Usuario registrado exitosamente",
            "token": "eyJ",
            "user_id": "65a1",
            "usuario": {"id": "65a1", "nombre": "Ana", "email": "ana@mail.pe", "puntos": 0}
        }"#;
        let response: AuthResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.user.id, UserId::new("65a1"));
        assert!(!format!("{response:?}").contains("eyJ"));
    }
}
