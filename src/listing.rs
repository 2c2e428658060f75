use crate::state::{Category, Item};

/// Category choice of the browse view. `All` disables the category predicate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub const ALL_LABEL: &'static str = "All";

    pub fn options() -> impl Iterator<Item = CategoryFilter> {
        std::iter::once(CategoryFilter::All).chain(Category::ALL.into_iter().map(CategoryFilter::Only))
    }

    pub fn label(self) -> &'static str {
        match self {
            CategoryFilter::All => Self::ALL_LABEL,
            CategoryFilter::Only(category) => category.as_str(),
        }
    }

    /// Unknown labels fall back to `All`.
    pub fn from_label(label: &str) -> Self {
        label.parse().map(CategoryFilter::Only).unwrap_or_default()
    }

    fn admits(self, item: &Item) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(category) => item.category == category.as_str(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListingFilter {
    pub query: String,
    pub category: CategoryFilter,
}

impl ListingFilter {
    pub fn matches(&self, item: &Item) -> bool {
        if !self.category.admits(item) {
            return false;
        }
        if self.query.is_empty() {
            return true;
        }
        let needle = self.query.to_lowercase();
        item.title.to_lowercase().contains(&needle)
            || item.description.to_lowercase().contains(&needle)
    }

    /// Items passing both predicates, in source order.
    pub fn apply(&self, items: &[Item]) -> Vec<Item> {
        items
            .iter()
            .filter(|item| self.matches(item))
            .cloned()
            .collect()
    }
}
