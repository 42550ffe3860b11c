//! Incentive catalogue and point redemption.

use std::sync::Arc;

use recicla_core::filter::{CategoryFilter, distinct_categories, filter_incentives};
use recicla_core::{CachedUser, Incentive, IncentiveId, LoadState, Points};
use thiserror::Error;
use tracing::{error, instrument, warn};

use crate::api::{ApiClient, ApiError, Redemption};
use crate::notice::{Notice, Notifier};
use crate::session::SessionStore;

const REDEEM_FALLBACK: &str = "Could not redeem the incentive";

#[derive(Debug, Error)]
pub enum RedeemError {
    #[error("Sign in to redeem incentives")]
    NotSignedIn,

    #[error("Unknown incentive {0}")]
    UnknownIncentive(IncentiveId),

    #[error("Insufficient points: you need {required} and have {available}")]
    InsufficientPoints { required: Points, available: Points },

    #[error("{message}")]
    Remote {
        message: String,
        #[source]
        source: ApiError,
    },
}

pub struct IncentivesScreen {
    api: ApiClient,
    session: SessionStore,
    notifier: Arc<dyn Notifier>,
    pub items: LoadState<Vec<Incentive>>,
    category: CategoryFilter,
}

impl IncentivesScreen {
    #[must_use]
    pub fn new(api: ApiClient, session: SessionStore, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            api,
            session,
            notifier,
            items: LoadState::Idle,
            category: CategoryFilter::All,
        }
    }

    #[instrument(skip(self))]
    pub async fn load(&mut self) {
        self.items = LoadState::Loading;
        let result = self.api.incentives().await;
        self.items =
            LoadState::from_result(result.map_err(|e| e.user_message("Could not load incentives")));
    }

    pub fn set_category(&mut self, category: CategoryFilter) {
        self.category = category;
    }

    #[must_use]
    pub fn visible(&self) -> Vec<&Incentive> {
        self.items
            .ready()
            .map(|items| filter_incentives(items, &self.category))
            .unwrap_or_default()
    }

    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        self.items
            .ready()
            .map(|items| distinct_categories(items.iter().map(|i| i.category.as_str())))
            .unwrap_or_default()
    }

    /// Current balance of the signed-in user.
    #[must_use]
    pub fn balance(&self) -> Option<Points> {
        self.session.current_user().map(|u| u.points)
    }

    /// Exchange points for a loaded incentive.
    ///
    /// The balance is checked locally before anything is sent; the server
    /// does not check it. On success the cost comes off the cached balance;
    /// a failure to persist that balance is logged and does not undo the
    /// redemption the server already accepted.
    ///
    /// # Errors
    ///
    /// Returns error when signed out, when the incentive is not in the
    /// loaded list, when the balance is short, or when the server rejects
    /// the request. Each is also raised as a notice.
    #[instrument(skip(self))]
    pub async fn redeem(&self, incentive_id: &IncentiveId) -> Result<Redemption, RedeemError> {
        let user = self
            .session
            .current_user()
            .ok_or_else(|| self.fail(RedeemError::NotSignedIn))?;
        let incentive = self
            .items
            .ready()
            .and_then(|items| items.iter().find(|i| &i.id == incentive_id))
            .ok_or_else(|| self.fail(RedeemError::UnknownIncentive(incentive_id.clone())))?;
        let cost = incentive.points_required;
        check_balance(&user, cost).map_err(|e| self.fail(e))?;

        let redemption = self
            .api
            .redeem(incentive_id, &user.id)
            .await
            .map_err(|source| {
                error!(error = %source, "Redemption failed");
                self.fail(RedeemError::Remote {
                    message: source.user_message(REDEEM_FALLBACK),
                    source,
                })
            })?;

        if let Err(e) = self.session.spend_points(cost).await {
            warn!(error = %e, "Could not persist balance after redemption");
        }
        self.notifier.notify(Notice::success(
            "Redeemed!",
            format!(
                "\"{}\" was redeemed. You will soon receive details on how to claim it.",
                incentive.name
            ),
        ));
        Ok(redemption)
    }

    fn fail(&self, err: RedeemError) -> RedeemError {
        let notice = match &err {
            RedeemError::InsufficientPoints { .. } => {
                Notice::warning("Insufficient points", err.to_string())
            }
            _ => Notice::error(err.to_string()),
        };
        self.notifier.notify(notice);
        err
    }
}

fn check_balance(user: &CachedUser, cost: Points) -> Result<(), RedeemError> {
    if user.points.covers(cost) {
        Ok(())
    } else {
        Err(RedeemError::InsufficientPoints {
            required: cost,
            available: user.points,
        })
    }
}

impl std::fmt::Debug for IncentivesScreen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IncentivesScreen")
            .field("items", &self.items)
            .field("category", &self.category)
            .finish_non_exhaustive()
    }
}
