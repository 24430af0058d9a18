use crate::model::{Category, ItemIcon, NormalizedItem};

const KNIVES: &[&str] = &[
    "Knife",
    "Karambit",
    "Bayonet",
    "Butterfly",
    "Falchion",
    "Flip",
    "Gut",
    "Huntsman",
    "Bowie",
    "Shadow Daggers",
    "Navaja",
    "Stiletto",
    "Talon",
    "Ursus",
    "Kukri",
];

const RIFLES: &[&str] = &[
    "AK-47", "M4A4", "M4A1-S", "AWP", "FAMAS", "Galil AR", "AUG", "SG 553", "SSG 08", "SCAR-20",
    "G3SG1",
];

const PISTOLS: &[&str] = &[
    "Glock-18",
    "USP-S",
    "P2000",
    "P250",
    "Desert Eagle",
    "Five-SeveN",
    "Tec-9",
    "CZ75-Auto",
    "Dual Berettas",
    "R8 Revolver",
    "Zeus x27",
];

const SMGS: &[&str] = &["MP9", "MAC-10", "MP7", "MP5-SD", "UMP-45", "P90", "PP-Bizon"];

const HEAVY: &[&str] = &["Nova", "XM1014", "Sawed-Off", "MAG-7", "M249", "Negev"];

const GLOVES: &[&str] = &["Gloves", "Hand Wraps", "Wraps"];

const STICKERS: &[&str] = &["Sticker"];

const OTHER: &[&str] = &[
    "Case", "Capsule", "Package", "Music Kit", "Patch", "Graffiti", "Pin", "Key", "Pass", "Charm",
];

/// Filter categories in precedence order. Stickers are matched against the
/// item name, everything else against the weapon type.
pub const CATEGORY_TABLE: &[(Category, &[&str])] = &[
    (Category::Knife, KNIVES),
    (Category::Rifle, RIFLES),
    (Category::Pistol, PISTOLS),
    (Category::Smg, SMGS),
    (Category::Heavy, HEAVY),
    (Category::Gloves, GLOVES),
    (Category::Sticker, STICKERS),
    (Category::Other, OTHER),
];

/// Icon groups tested against the clean name, first match wins.
pub const ICON_TABLE: &[(ItemIcon, &[&str])] = &[
    (ItemIcon::Knife, KNIVES),
    (ItemIcon::Pistol, PISTOLS),
    (ItemIcon::Gloves, GLOVES),
    (ItemIcon::Sticker, STICKERS),
];

fn keywords(category: Category) -> &'static [&'static str] {
    CATEGORY_TABLE
        .iter()
        .find(|(c, _)| *c == category)
        .map(|(_, words)| *words)
        .unwrap_or(&[])
}

fn contains_any(haystack: &str, words: &[&str]) -> bool {
    words.iter().any(|w| haystack.contains(w))
}

pub fn in_category(item: &NormalizedItem, category: Category) -> bool {
    let words = keywords(category);
    match category {
        Category::Sticker => contains_any(&item.clean_name, words),
        _ => contains_any(&item.weapon_type, words),
    }
}

/// The category an item is listed under; anything unmatched is `Other`.
pub fn classify(item: &NormalizedItem) -> Category {
    CATEGORY_TABLE
        .iter()
        .map(|(c, _)| *c)
        .find(|c| in_category(item, *c))
        .unwrap_or(Category::Other)
}

pub fn icon_for(clean_name: &str) -> ItemIcon {
    ICON_TABLE
        .iter()
        .find(|(_, words)| contains_any(clean_name, words))
        .map(|(icon, _)| *icon)
        .unwrap_or(ItemIcon::Default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RawMarketItem;
    use crate::normalize::normalize_item;

    fn item(name: &str) -> NormalizedItem {
        let raw = RawMarketItem {
            market_hash_name: Some(name.to_string()),
            suggested_price: Some(100.0),
            ..Default::default()
        };
        normalize_item(0, &raw).unwrap()
    }

    #[test]
    fn icon_precedence() {
        assert_eq!(icon_for("Karambit | Fade"), ItemIcon::Knife);
        assert_eq!(icon_for("Glock-18 | Fade"), ItemIcon::Pistol);
        // Pistols are checked before gloves.
        assert_eq!(icon_for("Desert Eagle | Glove Box Gloves"), ItemIcon::Pistol);
        assert_eq!(icon_for("Sport Gloves | Vice"), ItemIcon::Gloves);
        assert_eq!(icon_for("Sticker | Titan"), ItemIcon::Sticker);
        assert_eq!(icon_for("AK-47 | Redline"), ItemIcon::Default);
    }

    #[test]
    fn classifies_by_weapon_type() {
        assert_eq!(classify(&item("★ Karambit | Doppler (Factory New)")), Category::Knife);
        assert_eq!(classify(&item("AK-47 | Redline (Field-Tested)")), Category::Rifle);
        assert_eq!(classify(&item("USP-S | Kill Confirmed (Minimal Wear)")), Category::Pistol);
        assert_eq!(classify(&item("MP9 | Starlight Protector (Factory New)")), Category::Smg);
        assert_eq!(classify(&item("XM1014 | Entombed (Minimal Wear)")), Category::Heavy);
        assert_eq!(classify(&item("★ Sport Gloves | Vice (Field-Tested)")), Category::Gloves);
        assert_eq!(classify(&item("Sticker | Titan (Holo) | Katowice 2014")), Category::Sticker);
        assert_eq!(classify(&item("Operation Riptide Case")), Category::Other);
        assert_eq!(classify(&item("Sir Bloody Darryl | The Professionals")), Category::Other);
    }

    #[test]
    fn sticker_matches_name_not_weapon_type() {
        let sticker = item("Sticker | Titan (Holo) | Katowice 2014");
        assert_eq!(sticker.weapon_type, "Sticker");
        assert!(in_category(&sticker, Category::Sticker));
        assert!(!in_category(&sticker, Category::Rifle));
    }
}
