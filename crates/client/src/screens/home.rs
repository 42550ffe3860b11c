use recicla_core::{CachedUser, LoadState, NewsItem, RankingEntry};
use tracing::instrument;

use crate::api::ApiClient;
use crate::session::SessionStore;

/// Greeting, balance, news and the community ranking.
#[derive(Debug)]
pub struct HomeScreen {
    api: ApiClient,
    session: SessionStore,
    pub news: LoadState<Vec<NewsItem>>,
    pub ranking: LoadState<Vec<RankingEntry>>,
}

impl HomeScreen {
    #[must_use]
    pub fn new(api: ApiClient, session: SessionStore) -> Self {
        Self {
            api,
            session,
            news: LoadState::Idle,
            ranking: LoadState::Idle,
        }
    }

    /// The signed-in user, as last cached.
    #[must_use]
    pub fn user(&self) -> Option<CachedUser> {
        self.session.current_user()
    }

    #[instrument(skip(self))]
    pub async fn load(&mut self) {
        self.news = LoadState::Loading;
        self.ranking = LoadState::Loading;

        let (news, ranking) = tokio::join!(self.api.news(), self.api.ranking());
        self.news = LoadState::from_result(news.map_err(|e| e.user_message("Could not load news")));
        self.ranking = LoadState::from_result(
            ranking.map_err(|e| e.user_message("Could not load the ranking")),
        );
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use httpmock::prelude::*;
    use serde_json::json;
    use url::Url;

    use super::*;
    use crate::storage::MemoryStore;

    #[tokio::test]
    async fn test_load_settles_each_list_independently() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/noticias");
                then.status(200).json_body(json!({"noticias": [
                    {"id": 1, "titulo": "Campaña de limpieza", "contenido": "Playa Costa Azul", "fecha": "2024-01-15", "categoria": "Campañas"}
                ]}));
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/ranking");
                then.status(503);
            })
            .await;

        let api = ApiClient::new(Url::parse(&server.base_url()).unwrap(), None).unwrap();
        let mut screen = HomeScreen::new(api, SessionStore::new(Arc::new(MemoryStore::new())));
        screen.load().await;

        assert_eq!(screen.news.ready().unwrap().len(), 1);
        assert_eq!(screen.ranking.error(), Some("Could not load the ranking"));
        assert!(screen.user().is_none());
    }
}
