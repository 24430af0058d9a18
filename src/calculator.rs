use std::time::{Duration, Instant};

use crate::fetch::FetchResult;
use crate::filter::{filter_items, Filters};
use crate::model::{Category, NormalizedItem, Wear};
use crate::normalize::build_catalog;
use crate::reveal::Reveal;
use crate::summary::CatalogSummary;

/// State behind the calculator page: the fetched listing, the filter
/// selection and how much of the result is revealed.
pub struct Calculator {
    catalog: Vec<NormalizedItem>,
    filters: Filters,
    filtered: Vec<NormalizedItem>,
    summary: CatalogSummary,
    reveal: Reveal,

    loading: bool,
    last_error: Option<String>,

    debounce: Duration,
    refresh_due: Option<Instant>,
}

impl Calculator {
    pub fn new(debounce: Duration) -> Self {
        Self {
            catalog: vec![],
            filters: Filters::default(),
            filtered: vec![],
            summary: CatalogSummary::default(),
            reveal: Reveal::default(),
            loading: false,
            last_error: None,
            debounce,
            refresh_due: None,
        }
    }

    pub fn begin_load(&mut self) {
        self.loading = true;
        self.last_error = None;
    }

    pub fn finish_load(&mut self, result: FetchResult) {
        match result {
            Ok(raws) => {
                self.catalog = build_catalog(&raws);
                tracing::info!(
                    received = raws.len(),
                    listed = self.catalog.len(),
                    "price feed loaded"
                );
            }
            Err(err) => {
                tracing::warn!(error = %err, "price feed unavailable");
                self.catalog.clear();
                self.last_error = Some(err.to_string());
            }
        }
        self.loading = false;
        self.reveal.reset();
        self.flush();
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn catalog_len(&self) -> usize {
        self.catalog.len()
    }

    pub fn filters(&self) -> &Filters {
        &self.filters
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        let next = Filters {
            query: query.into(),
            ..self.filters.clone()
        };
        self.update_filters(next);
    }

    pub fn set_category(&mut self, category: Option<Category>) {
        let next = Filters {
            category,
            ..self.filters.clone()
        };
        self.update_filters(next);
    }

    pub fn set_wear(&mut self, wear: Option<Wear>) {
        let next = Filters {
            wear,
            ..self.filters.clone()
        };
        self.update_filters(next);
    }

    pub fn reset_filters(&mut self) {
        self.update_filters(Filters::default());
    }

    fn update_filters(&mut self, next: Filters) {
        if next == self.filters {
            return;
        }
        self.filters = next;
        self.reveal.reset();
        self.refresh_due = Some(Instant::now() + self.debounce);
    }

    /// When a scheduled refresh should run, if one is pending.
    pub fn refresh_due(&self) -> Option<Instant> {
        self.refresh_due
    }

    /// Recompute the filtered listing once the debounce delay has passed.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.refresh_due {
            Some(due) if now >= due => {
                self.flush();
                true
            }
            _ => false,
        }
    }

    pub fn flush(&mut self) {
        self.refresh_due = None;
        self.filtered = filter_items(&self.catalog, &self.filters);
        self.summary = CatalogSummary::from_items(&self.filtered);
        tracing::debug!(
            matched = self.filtered.len(),
            of = self.catalog.len(),
            "filters applied"
        );
    }

    pub fn load_more(&mut self) {
        self.reveal.load_more();
    }

    pub fn visible(&self) -> &[NormalizedItem] {
        self.reveal.visible_slice(&self.filtered)
    }

    pub fn has_more(&self) -> bool {
        self.reveal.has_more(self.filtered.len())
    }

    pub fn filtered_len(&self) -> usize {
        self.filtered.len()
    }

    pub fn summary(&self) -> &CatalogSummary {
        &self.summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use crate::model::RawMarketItem;
    use crate::reveal::PAGE_SIZE;

    fn raws(count: usize) -> Vec<RawMarketItem> {
        (0..count)
            .map(|i| RawMarketItem {
                market_hash_name: Some(if i % 2 == 0 {
                    format!("★ Karambit | Pattern {} (Factory New)", i)
                } else {
                    format!("AK-47 | Pattern {} (Field-Tested)", i)
                }),
                suggested_price: Some(30.0 + i as f64),
                ..Default::default()
            })
            .collect()
    }

    fn loaded(count: usize) -> Calculator {
        let mut calc = Calculator::new(Duration::from_secs(10));
        calc.begin_load();
        assert!(calc.is_loading());
        calc.finish_load(Ok(raws(count)));
        calc
    }

    #[test]
    fn load_reveals_first_page() {
        let calc = loaded(150);
        assert!(!calc.is_loading());
        assert_eq!(calc.catalog_len(), 150);
        assert_eq!(calc.filtered_len(), 150);
        assert_eq!(calc.visible().len(), PAGE_SIZE);
        assert!(calc.has_more());
        assert_eq!(calc.summary().count, 150);
    }

    #[test]
    fn failed_load_leaves_an_empty_listing() {
        let mut calc = loaded(30);
        calc.begin_load();
        calc.finish_load(Err(FetchError::Aborted));
        assert!(!calc.is_loading());
        assert_eq!(calc.catalog_len(), 0);
        assert!(calc.visible().is_empty());
        assert!(!calc.has_more());
        assert_eq!(calc.last_error(), Some("price fetch was aborted"));
    }

    #[test]
    fn changing_category_resets_reveal() {
        let mut calc = loaded(150);
        for _ in 0..4 {
            calc.load_more();
        }
        assert_eq!(calc.visible().len(), 100);

        calc.set_category(Some(Category::Knife));
        // The old result is still shown until the refresh runs, but cut back to one page.
        assert_eq!(calc.filtered_len(), 150);
        assert_eq!(calc.visible().len(), PAGE_SIZE);
        calc.flush();
        assert_eq!(calc.filtered_len(), 75);
        assert_eq!(calc.visible().len(), PAGE_SIZE);
    }

    #[test]
    fn unchanged_filters_keep_reveal() {
        let mut calc = loaded(60);
        calc.load_more();
        calc.set_category(None);
        calc.set_query("");
        assert_eq!(calc.visible().len(), 40);
        assert!(calc.refresh_due().is_none());
    }

    #[test]
    fn refresh_is_debounced() {
        let mut calc = loaded(60);
        calc.set_query("karambit");
        calc.set_wear(Some(Wear::FactoryNew));
        assert_eq!(calc.filtered_len(), 60);

        assert!(!calc.tick(Instant::now()));
        assert_eq!(calc.filtered_len(), 60);

        assert!(calc.tick(Instant::now() + Duration::from_secs(11)));
        assert_eq!(calc.filtered_len(), 30);
        assert!(calc.refresh_due().is_none());
        assert!(!calc.tick(Instant::now() + Duration::from_secs(20)));
    }

    #[test]
    fn reset_restores_full_listing() {
        let mut calc = loaded(40);
        calc.set_wear(Some(Wear::BattleScarred));
        calc.flush();
        assert_eq!(calc.filtered_len(), 0);
        calc.reset_filters();
        assert!(calc.filters().is_default());
        calc.flush();
        assert_eq!(calc.filtered_len(), 40);
    }

    #[test]
    fn listing_is_cheapest_first() {
        let mut shuffled = raws(5);
        shuffled.reverse();
        let mut calc = Calculator::new(Duration::ZERO);
        calc.finish_load(Ok(shuffled));
        let prices: Vec<u64> = calc.visible().iter().map(|i| i.market_cents).collect();
        let mut sorted = prices.clone();
        sorted.sort();
        assert_eq!(prices, sorted);
    }
}
