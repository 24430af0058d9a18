use rayon::prelude::*;

use crate::classify::icon_for;
use crate::error::{MalformedItem, Rejection};
use crate::model::{NormalizedItem, RarityTier, RawMarketItem, Wear};

/// The platform buys at this percentage of market value.
pub const RESALE_RATE_PERCENT: u64 = 70;

/// Items whose resale price would be below this are not listed.
pub const MIN_RESALE_CENTS: u64 = 20_00;

/// Items at or above this market price are not listed.
pub const MAX_MARKET_CENTS: u64 = 500_00;

pub const MARKET_LISTING_URL: &str = "https://steamcommunity.com/market/listings/730/";

const STAT_TRAK: &str = "StatTrak™ ";
const SOUVENIR: &str = "Souvenir ";
const STAR: &str = "★ ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedName {
    pub clean_name: String,
    pub weapon_type: String,
    pub wear: Wear,
    pub stat_trak: bool,
    pub souvenir: bool,
}

pub fn parse_name(market_hash_name: &str) -> ParsedName {
    let (base, wear) = match market_hash_name.split_once(" (") {
        Some((base, rest)) => {
            let label = rest.split(')').next().unwrap_or(rest);
            (base, Wear::from_label(label).unwrap_or(Wear::FieldTested))
        }
        None => (market_hash_name, Wear::FieldTested),
    };

    // Knives list as "★ StatTrak™ ...", so keep stripping until no marker is left.
    let mut name = base;
    let mut stat_trak = false;
    let mut souvenir = false;
    loop {
        if let Some(rest) = name.strip_prefix(STAT_TRAK) {
            stat_trak = true;
            name = rest;
        } else if let Some(rest) = name.strip_prefix(SOUVENIR) {
            souvenir = true;
            name = rest;
        } else if let Some(rest) = name.strip_prefix(STAR) {
            name = rest;
        } else {
            break;
        }
    }

    let weapon_type = name.split_once(" | ").map_or(name, |(weapon, _)| weapon);

    ParsedName {
        clean_name: name.to_string(),
        weapon_type: weapon_type.to_string(),
        wear,
        stat_trak,
        souvenir,
    }
}

/// Round half up to whole cents.
pub fn to_cents(price: f64) -> Option<u64> {
    if !price.is_finite() || price < 0.0 {
        return None;
    }
    Some((price * 100.0).round() as u64)
}

pub fn resale_cents(market_cents: u64) -> u64 {
    market_cents
        .saturating_mul(RESALE_RATE_PERCENT)
        .saturating_add(50)
        / 100
}

pub fn rarity_for_cents(market_cents: u64) -> RarityTier {
    if market_cents < 10_00 {
        RarityTier::Common
    } else if market_cents < 50_00 {
        RarityTier::Uncommon
    } else if market_cents < 100_00 {
        RarityTier::Rare
    } else if market_cents < 500_00 {
        RarityTier::Mythical
    } else if market_cents < 1000_00 {
        RarityTier::Legendary
    } else {
        RarityTier::Ancient
    }
}

pub fn market_url(market_hash_name: &str) -> String {
    format!("{}{}", MARKET_LISTING_URL, urlencoding::encode(market_hash_name))
}

/// Normalize one feed row. `index` is the row's position in the batch and
/// seeds the id when the feed does not carry one.
pub fn normalize_item(index: usize, raw: &RawMarketItem) -> Result<NormalizedItem, Rejection> {
    let name = raw
        .market_hash_name
        .as_deref()
        .filter(|n| !n.trim().is_empty())
        .ok_or(MalformedItem::MissingName)?;
    let market_cents = raw
        .suggested_price
        .and_then(to_cents)
        .ok_or(MalformedItem::InvalidPrice)?;
    if market_cents >= MAX_MARKET_CENTS {
        return Err(Rejection::MarketAboveCeiling);
    }
    let resale_cents = resale_cents(market_cents);
    if resale_cents < MIN_RESALE_CENTS {
        return Err(Rejection::ResaleBelowFloor);
    }

    let parsed = parse_name(name);
    let icon = icon_for(&parsed.clean_name);

    Ok(NormalizedItem {
        id: raw.id.clone().unwrap_or_else(|| format!("item-{}", index)),
        market_hash_name: name.to_string(),
        clean_name: parsed.clean_name,
        weapon_type: parsed.weapon_type,
        wear: parsed.wear,
        market_cents,
        resale_cents,
        rarity: rarity_for_cents(market_cents),
        stat_trak: parsed.stat_trak,
        souvenir: parsed.souvenir,
        icon,
        market_url: market_url(name),
        quantity: raw.quantity,
        updated_at: raw.updated_at,
    })
}

/// Normalize a batch, keeping feed order and dropping rejected rows.
pub fn normalize_items(raws: &[RawMarketItem]) -> Vec<NormalizedItem> {
    let results: Vec<Result<NormalizedItem, Rejection>> = raws
        .par_iter()
        .enumerate()
        .map(|(i, raw)| normalize_item(i, raw))
        .collect();

    let mut items = Vec::with_capacity(results.len());
    let mut malformed = 0usize;
    let mut out_of_range = 0usize;

    for (i, result) in results.into_iter().enumerate() {
        match result {
            Ok(item) => items.push(item),
            Err(Rejection::Malformed(reason)) => {
                tracing::trace!(index = i, %reason, "dropping malformed feed row");
                malformed += 1;
            }
            Err(_) => out_of_range += 1,
        }
    }

    tracing::debug!(
        kept = items.len(),
        malformed,
        out_of_range,
        "normalized price feed"
    );
    items
}

/// The calculator's listing: normalized rows, cheapest first.
pub fn build_catalog(raws: &[RawMarketItem]) -> Vec<NormalizedItem> {
    let mut items = normalize_items(raws);
    items.sort_by_key(|item| item.market_cents);
    items
}
