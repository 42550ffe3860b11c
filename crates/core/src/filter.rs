//! Client-side list filtering.
//!
//! Lists served by the backend are small (a handful to a few dozen items),
//! so filtering is a single pass over the already-loaded slice.

use crate::{EducationItem, Incentive};

/// Labels that mean "no category filter".
const ALL_LABELS: &[&str] = &["", "all", "todos", "todas"];

/// Category selection shared by the education and incentive lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    /// Interpret a chip label or CLI argument. `Todos`/`All` (any case) and
    /// blank select everything.
    #[must_use]
    pub fn parse(label: &str) -> Self {
        let trimmed = label.trim();
        if ALL_LABELS.contains(&trimmed.to_lowercase().as_str()) {
            Self::All
        } else {
            Self::Only(trimmed.to_owned())
        }
    }

    /// Category matching is exact, as the server spells the categories.
    #[must_use]
    pub fn matches(&self, category: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == category,
        }
    }
}

/// Education items in `category` whose title or content contains `search`,
/// ignoring case. A blank search matches everything.
#[must_use]
pub fn filter_education<'a>(
    items: &'a [EducationItem],
    category: &CategoryFilter,
    search: &str,
) -> Vec<&'a EducationItem> {
    let needle = search.trim().to_lowercase();
    items
        .iter()
        .filter(|item| category.matches(&item.category))
        .filter(|item| {
            needle.is_empty()
                || item.title.to_lowercase().contains(&needle)
                || item.content.to_lowercase().contains(&needle)
        })
        .collect()
}

/// Incentives in `category`.
#[must_use]
pub fn filter_incentives<'a>(
    items: &'a [Incentive],
    category: &CategoryFilter,
) -> Vec<&'a Incentive> {
    items
        .iter()
        .filter(|item| category.matches(&item.category))
        .collect()
}

/// Distinct categories in first-seen order, for building filter chips.
#[must_use]
pub fn distinct_categories<'a>(categories: impl IntoIterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen: Vec<&str> = Vec::new();
    for category in categories {
        if !category.is_empty() && !seen.contains(&category) {
            seen.push(category);
        }
    }
    seen
}
