use statrs::statistics::{Data, Median, Statistics};

use crate::model::{NormalizedItem, RarityTier};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CatalogSummary {
    pub count: usize,
    pub mean_market: f64,
    pub median_market: f64,
    pub std_dev_market: f64,
    pub total_resale: f64,
    pub tier_counts: [usize; 6],
}

impl CatalogSummary {
    pub fn from_items(items: &[NormalizedItem]) -> Self {
        if items.is_empty() {
            return CatalogSummary::default();
        }

        let prices: Vec<f64> = items.iter().map(|i| i.market_price()).collect();
        let total_resale_cents: u64 = items.iter().map(|i| i.resale_cents).sum();

        let mut tier_counts = [0usize; 6];
        for item in items {
            tier_counts[item.rarity.index()] += 1;
        }

        // Sample deviation is undefined for a single listing.
        let std_dev_market = if prices.len() > 1 {
            prices.iter().std_dev()
        } else {
            0.0
        };

        CatalogSummary {
            count: items.len(),
            mean_market: prices.iter().mean(),
            median_market: Data::new(prices.clone()).median(),
            std_dev_market,
            total_resale: total_resale_cents as f64 / 100.0,
            tier_counts,
        }
    }

    pub fn tier_count(&self, tier: RarityTier) -> usize {
        self.tier_counts[tier.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RawMarketItem;
    use crate::normalize::build_catalog;

    fn items(prices: &[f64]) -> Vec<NormalizedItem> {
        let raws: Vec<_> = prices
            .iter()
            .map(|p| RawMarketItem {
                market_hash_name: Some("AK-47 | Redline (Field-Tested)".into()),
                suggested_price: Some(*p),
                ..Default::default()
            })
            .collect();
        build_catalog(&raws)
    }

    #[test]
    fn empty_listing() {
        let summary = CatalogSummary::from_items(&[]);
        assert_eq!(summary.count, 0);
        assert_eq!(summary.total_resale, 0.0);
    }

    #[test]
    fn summarizes_prices_and_tiers() {
        let summary = CatalogSummary::from_items(&items(&[30.0, 40.0, 60.0, 150.0]));
        assert_eq!(summary.count, 4);
        assert!((summary.mean_market - 70.0).abs() < 1e-9);
        assert!((summary.median_market - 50.0).abs() < 1e-9);
        assert!(summary.std_dev_market > 0.0);
        // 21.00 + 28.00 + 42.00 + 105.00
        assert!((summary.total_resale - 196.0).abs() < 1e-9);
        assert_eq!(summary.tier_count(RarityTier::Uncommon), 2);
        assert_eq!(summary.tier_count(RarityTier::Rare), 1);
        assert_eq!(summary.tier_count(RarityTier::Mythical), 1);
        assert_eq!(summary.tier_count(RarityTier::Ancient), 0);
    }

    #[test]
    fn single_item_has_no_spread() {
        let summary = CatalogSummary::from_items(&items(&[45.0]));
        assert_eq!(summary.std_dev_market, 0.0);
        assert_eq!(summary.median_market, 45.0);
    }
}
