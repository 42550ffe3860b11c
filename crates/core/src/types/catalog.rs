//! Read-only catalog entities served by the backend.

use serde::{Deserialize, Serialize};

use super::{IncentiveId, Points};

/// A reward that can be redeemed for points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Incentive {
    pub id: IncentiveId,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion", default)]
    pub description: String,
    #[serde(rename = "puntos_requeridos")]
    pub points_required: Points,
    #[serde(rename = "categoria", default)]
    pub category: String,
}

/// Kind of educational content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EducationKind {
    Video,
    #[serde(rename = "informacion")]
    Information,
    #[serde(rename = "articulo")]
    Article,
    #[serde(other)]
    Other,
}

/// An entry in the environmental-education library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EducationItem {
    pub id: i64,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "tipo")]
    pub kind: EducationKind,
    #[serde(rename = "contenido", default)]
    pub content: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(rename = "duracion", default)]
    pub duration: Option<String>,
    #[serde(rename = "categoria", default)]
    pub category: String,
}

/// A municipal news item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    pub id: i64,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "contenido", default)]
    pub content: String,
    #[serde(rename = "fecha", default)]
    pub date: String,
    #[serde(rename = "categoria", default)]
    pub category: String,
}

/// A notification addressed to the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub id: i64,
    #[serde(rename = "mensaje")]
    pub message: String,
    #[serde(rename = "fecha", default)]
    pub date: String,
    #[serde(rename = "leida", default)]
    pub read: bool,
}

/// A row of the community leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingEntry {
    #[serde(rename = "posicion")]
    pub position: u32,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "puntos")]
    pub points: Points,
}
