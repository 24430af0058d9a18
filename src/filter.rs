use crate::classify::in_category;
use crate::model::{Category, NormalizedItem, Wear};
use crate::normalize::MAX_MARKET_CENTS;

/// Current filter selection. `None` means "all" for that dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    pub query: String,
    pub category: Option<Category>,
    pub wear: Option<Wear>,
}

impl Filters {
    // Cheapest predicates first.
    fn matches(&self, item: &NormalizedItem, needle: &str) -> bool {
        if item.market_cents >= MAX_MARKET_CENTS {
            return false;
        }

        if !needle.is_empty()
            && !item.weapon_type.to_lowercase().contains(needle)
            && !item.clean_name.to_lowercase().contains(needle)
            && !item.market_hash_name.to_lowercase().contains(needle)
        {
            return false;
        }

        if let Some(category) = self.category {
            if !in_category(item, category) {
                return false;
            }
        }

        if let Some(wear) = self.wear {
            if item.wear != wear {
                return false;
            }
        }

        true
    }

    pub fn is_default(&self) -> bool {
        *self == Filters::default()
    }
}

pub fn filter_items(items: &[NormalizedItem], filters: &Filters) -> Vec<NormalizedItem> {
    let needle = filters.query.to_lowercase();
    items
        .iter()
        .filter(|item| filters.matches(item, &needle))
        .cloned()
        .collect()
}
