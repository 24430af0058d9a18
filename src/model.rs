use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// One row of the market price feed, as received.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawMarketItem {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: Option<String>,
    #[serde(default, alias = "marketHashName", deserialize_with = "lenient_string")]
    pub market_hash_name: Option<String>,
    #[serde(default, alias = "suggestedPrice", deserialize_with = "lenient_price")]
    pub suggested_price: Option<f64>,
    #[serde(default, deserialize_with = "lenient_quantity")]
    pub quantity: Option<u32>,
    #[serde(default, alias = "updatedAt", deserialize_with = "lenient_timestamp")]
    pub updated_at: Option<i64>,
}

// A single odd field should cost us that row, not the whole feed.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }))
}

fn lenient_price<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }))
}

fn lenient_quantity<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value
        .and_then(|v| v.as_u64())
        .and_then(|q| u32::try_from(q).ok()))
}

fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| v.as_i64()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Wear {
    FactoryNew,
    MinimalWear,
    FieldTested,
    WellWorn,
    BattleScarred,
}

impl Wear {
    pub const ALL: [Wear; 5] = [
        Wear::FactoryNew,
        Wear::MinimalWear,
        Wear::FieldTested,
        Wear::WellWorn,
        Wear::BattleScarred,
    ];

    /// The label as it appears inside a market hash name.
    pub fn label(self) -> &'static str {
        match self {
            Wear::FactoryNew => "Factory New",
            Wear::MinimalWear => "Minimal Wear",
            Wear::FieldTested => "Field-Tested",
            Wear::WellWorn => "Well-Worn",
            Wear::BattleScarred => "Battle-Scarred",
        }
    }

    pub fn from_label(label: &str) -> Option<Wear> {
        Wear::ALL.into_iter().find(|w| w.label() == label)
    }

    pub fn short(self) -> &'static str {
        match self {
            Wear::FactoryNew => "FN",
            Wear::MinimalWear => "MW",
            Wear::FieldTested => "FT",
            Wear::WellWorn => "WW",
            Wear::BattleScarred => "BS",
        }
    }
}

/// Display bucket derived from market price only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RarityTier {
    Common,
    Uncommon,
    Rare,
    Mythical,
    Legendary,
    Ancient,
}

impl RarityTier {
    pub const ALL: [RarityTier; 6] = [
        RarityTier::Common,
        RarityTier::Uncommon,
        RarityTier::Rare,
        RarityTier::Mythical,
        RarityTier::Legendary,
        RarityTier::Ancient,
    ];

    pub fn label(self) -> &'static str {
        match self {
            RarityTier::Common => "Common",
            RarityTier::Uncommon => "Uncommon",
            RarityTier::Rare => "Rare",
            RarityTier::Mythical => "Mythical",
            RarityTier::Legendary => "Legendary",
            RarityTier::Ancient => "Ancient",
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Knife,
    Rifle,
    Pistol,
    Smg,
    Heavy,
    Gloves,
    Sticker,
    Other,
}

impl Category {
    pub const ALL: [Category; 8] = [
        Category::Knife,
        Category::Rifle,
        Category::Pistol,
        Category::Smg,
        Category::Heavy,
        Category::Gloves,
        Category::Sticker,
        Category::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Category::Knife => "Knives",
            Category::Rifle => "Rifles",
            Category::Pistol => "Pistols",
            Category::Smg => "SMGs",
            Category::Heavy => "Heavy",
            Category::Gloves => "Gloves",
            Category::Sticker => "Stickers",
            Category::Other => "Other",
        }
    }
}

/// Category artwork shown next to an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemIcon {
    Knife,
    Pistol,
    Gloves,
    Sticker,
    Default,
}

impl ItemIcon {
    pub fn asset(self) -> &'static str {
        match self {
            ItemIcon::Knife => "icons/knife.png",
            ItemIcon::Pistol => "icons/pistol.png",
            ItemIcon::Gloves => "icons/gloves.png",
            ItemIcon::Sticker => "icons/sticker.png",
            ItemIcon::Default => "icons/default.png",
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            ItemIcon::Knife => "🔪",
            ItemIcon::Pistol => "🔫",
            ItemIcon::Gloves => "🧤",
            ItemIcon::Sticker => "🏷",
            ItemIcon::Default => "🎯",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedItem {
    pub id: String,
    pub market_hash_name: String,
    pub clean_name: String,
    pub weapon_type: String,
    pub wear: Wear,
    pub market_cents: u64,
    pub resale_cents: u64,
    pub rarity: RarityTier,
    pub stat_trak: bool,
    pub souvenir: bool,
    pub icon: ItemIcon,
    pub market_url: String,

    pub quantity: Option<u32>,
    pub updated_at: Option<i64>,
}

impl NormalizedItem {
    pub fn market_price(&self) -> f64 {
        self.market_cents as f64 / 100.0
    }

    pub fn resale_price(&self) -> f64 {
        self.resale_cents as f64 / 100.0
    }
}
