use recicla_core::filter::{CategoryFilter, distinct_categories, filter_education};
use recicla_core::{EducationItem, LoadState};
use tracing::instrument;

use crate::api::ApiClient;

/// Educational content with a category chip row and a search box.
#[derive(Debug)]
pub struct EducationScreen {
    api: ApiClient,
    pub items: LoadState<Vec<EducationItem>>,
    category: CategoryFilter,
    search: String,
}

impl EducationScreen {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            items: LoadState::Idle,
            category: CategoryFilter::All,
            search: String::new(),
        }
    }

    #[instrument(skip(self))]
    pub async fn load(&mut self) {
        self.items = LoadState::Loading;
        let result = self.api.education().await;
        self.items =
            LoadState::from_result(result.map_err(|e| e.user_message("Could not load content")));
    }

    pub fn set_category(&mut self, category: CategoryFilter) {
        self.category = category;
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
    }

    #[must_use]
    pub const fn category(&self) -> &CategoryFilter {
        &self.category
    }

    /// Loaded items in the chosen category that match the search text.
    #[must_use]
    pub fn visible(&self) -> Vec<&EducationItem> {
        self.items
            .ready()
            .map(|items| filter_education(items, &self.category, &self.search))
            .unwrap_or_default()
    }

    /// Categories present in the loaded items, for the chip row.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        self.items
            .ready()
            .map(|items| distinct_categories(items.iter().map(|i| i.category.as_str())))
            .unwrap_or_default()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use httpmock::prelude::*;
    use serde_json::json;
    use url::Url;

    use super::*;

    #[tokio::test]
    async fn test_filter_and_search() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/educacion");
                then.status(200).json_body(json!({"contenido": [
                    {"id": 1, "titulo": "Separar residuos", "tipo": "video", "contenido": "Orgánicos e inorgánicos", "categoria": "Básico"},
                    {"id": 2, "titulo": "Horarios de recolección", "tipo": "informacion", "contenido": "Zona Norte", "categoria": "Servicios Locales"},
                    {"id": 3, "titulo": "Compostaje", "tipo": "articulo", "contenido": "Reduce residuos", "categoria": "Avanzado"}
                ]}));
            })
            .await;
        let api = ApiClient::new(Url::parse(&server.base_url()).unwrap(), None).unwrap();
        let mut screen = EducationScreen::new(api);
        assert!(screen.visible().is_empty());

        screen.load().await;
        assert_eq!(screen.visible().len(), 3);
        assert_eq!(
            screen.categories(),
            ["Básico", "Servicios Locales", "Avanzado"]
        );

        screen.set_search("RESIDUOS");
        let ids: Vec<i64> = screen.visible().iter().map(|i| i.id).collect();
        assert_eq!(ids, [1, 3]);

        screen.set_category(CategoryFilter::parse("Avanzado"));
        let ids: Vec<i64> = screen.visible().iter().map(|i| i.id).collect();
        assert_eq!(ids, [3]);
    }
}
