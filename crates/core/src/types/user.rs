//! The locally cached user profile.

use serde::{Deserialize, Serialize};

use super::{Email, Points, UserId};

/// Snapshot of the signed-in user's profile and reward balance.
///
/// Persisted under the `user` storage key in the backend's own JSON shape,
/// so a payload from `GET /api/usuarios/{id}` can be written straight to
/// storage. The registration and login responses omit the counters and
/// achievements; those default to empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedUser {
    pub id: UserId,
    #[serde(rename = "nombre")]
    pub name: String,
    pub email: Email,
    #[serde(rename = "puntos", default)]
    pub points: Points,
    #[serde(rename = "reportes_enviados", default)]
    pub reports_submitted: u32,
    #[serde(rename = "logros", default)]
    pub achievements: Vec<String>,
    #[serde(rename = "foto", default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

impl CachedUser {
    /// Copy of this user with `award` added to the balance.
    #[must_use]
    pub fn with_points_awarded(&self, award: Points) -> Self {
        Self {
            points: self.points.credit(award),
            ..self.clone()
        }
    }

    /// Copy of this user with `cost` taken from the balance.
    #[must_use]
    pub fn with_points_spent(&self, cost: Points) -> Self {
        Self {
            points: self.points.debit(cost),
            ..self.clone()
        }
    }

    /// Whether the user has earned the named badge.
    #[must_use]
    pub fn has_achievement(&self, badge: &str) -> bool {
        self.achievements.iter().any(|a| a == badge)
    }

    /// First letter of the name, upper-cased, for avatar placeholders.
    #[must_use]
    pub fn initial(&self) -> Option<char> {
        self.name.trim().chars().next().map(|c| c.to_uppercase().next().unwrap_or(c))
    }
}
