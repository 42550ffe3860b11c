//! Incentives, educational content, news, notifications and ranking.

use recicla_core::{
    EducationItem, Incentive, IncentiveId, NewsItem, Notification, RankingEntry, UserId,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::{ApiClient, ApiError};

#[derive(Serialize)]
struct RedeemRequest<'a> {
    #[serde(rename = "incentivo_id")]
    incentive_id: &'a IncentiveId,
    #[serde(rename = "usuario_id")]
    user_id: &'a UserId,
}

/// Confirmation of a redeemed incentive.
#[derive(Debug, Clone, Deserialize)]
pub struct Redemption {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(rename = "fecha_canje", default)]
    pub redeemed_at: Option<String>,
}

#[derive(Deserialize)]
struct IncentivesEnvelope {
    #[serde(rename = "incentivos", default)]
    incentives: Vec<Incentive>,
}

#[derive(Deserialize)]
struct EducationEnvelope {
    #[serde(rename = "contenido", default)]
    content: Vec<EducationItem>,
}

#[derive(Deserialize)]
struct NewsEnvelope {
    #[serde(rename = "noticias", default)]
    news: Vec<NewsItem>,
}

#[derive(Deserialize)]
struct NotificationsEnvelope {
    #[serde(rename = "notificaciones", default)]
    notifications: Vec<Notification>,
}

#[derive(Deserialize)]
struct RankingEnvelope {
    #[serde(default)]
    ranking: Vec<RankingEntry>,
}

impl ApiClient {
    /// Rewards that can be exchanged for points.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the body is malformed.
    #[instrument(skip(self))]
    pub async fn incentives(&self) -> Result<Vec<Incentive>, ApiError> {
        let envelope: IncentivesEnvelope = self.get("/incentivos").await?;
        debug!(count = envelope.incentives.len(), "Fetched incentives");
        Ok(envelope.incentives)
    }

    /// Exchange points for an incentive. The server does not check the
    /// balance; callers do.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self))]
    pub async fn redeem(
        &self,
        incentive_id: &IncentiveId,
        user_id: &UserId,
    ) -> Result<Redemption, ApiError> {
        let redemption: Redemption = self
            .post(
                "/canjear",
                &RedeemRequest {
                    incentive_id,
                    user_id,
                },
            )
            .await?;
        debug!(redeemed_at = ?redemption.redeemed_at, "Incentive redeemed");
        Ok(redemption)
    }

    /// Educational videos and articles.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the body is malformed.
    #[instrument(skip(self))]
    pub async fn education(&self) -> Result<Vec<EducationItem>, ApiError> {
        let envelope: EducationEnvelope = self.get("/educacion").await?;
        Ok(envelope.content)
    }

    /// Municipal news.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the body is malformed.
    #[instrument(skip(self))]
    pub async fn news(&self) -> Result<Vec<NewsItem>, ApiError> {
        let envelope: NewsEnvelope = self.get("/noticias").await?;
        Ok(envelope.news)
    }

    /// Notifications addressed to a user.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the body is malformed.
    #[instrument(skip(self))]
    pub async fn notifications(&self, user_id: &UserId) -> Result<Vec<Notification>, ApiError> {
        let envelope: NotificationsEnvelope =
            self.get(&format!("/notificaciones/{user_id}")).await?;
        Ok(envelope.notifications)
    }

    /// Remove a notification.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails.
    #[instrument(skip(self))]
    pub async fn dismiss_notification(&self, notification_id: i64) -> Result<(), ApiError> {
        self.delete(&format!("/notificaciones/{notification_id}"))
            .await
    }

    /// Community leaderboard by points.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails or the body is malformed.
    #[instrument(skip(self))]
    pub async fn ranking(&self) -> Result<Vec<RankingEntry>, ApiError> {
        let envelope: RankingEnvelope = self.get("/ranking").await?;
        Ok(envelope.ranking)
    }
}
