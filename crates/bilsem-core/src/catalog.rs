//! The static game catalog.
//!
//! Each game ships with a catalog entry carrying its display title,
//! cognitive category, and nominal session duration. The catalog doubles
//! as the seed listing served when the database holds no play metrics yet
//! or is unreachable.

use bilsem_types::{GameCategory, GameSummary};

/// A single catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogItem {
    /// Catalog slug (URL-safe game identifier).
    pub id: &'static str,
    /// Display title.
    pub title: &'static str,
    /// Cognitive category.
    pub category: GameCategory,
    /// Nominal duration of one session in seconds.
    pub duration_seconds: u32,
}

/// All games known to the platform.
pub const GAME_CATALOG: [CatalogItem; 28] = [
    CatalogItem { id: "attention-coding", title: "Attention Coding", category: GameCategory::Attention, duration_seconds: 120 },
    CatalogItem { id: "word-hunt", title: "Word Hunt", category: GameCategory::Language, duration_seconds: 150 },
    CatalogItem { id: "spot-difference", title: "Spot Difference", category: GameCategory::Attention, duration_seconds: 180 },
    CatalogItem { id: "farki-bul", title: "Farki Bul", category: GameCategory::Attention, duration_seconds: 180 },
    CatalogItem { id: "kelime-avi", title: "Kelime Avi", category: GameCategory::Language, duration_seconds: 150 },
    CatalogItem { id: "sembol-arama", title: "Sembol Arama", category: GameCategory::Attention, duration_seconds: 180 },
    CatalogItem { id: "sekil-hafizasi", title: "Sekil Hafizasi", category: GameCategory::Memory, duration_seconds: 180 },
    CatalogItem { id: "gorsel-tarama", title: "Gorsel Tarama", category: GameCategory::Attention, duration_seconds: 180 },
    CatalogItem { id: "isitsel-hafiza", title: "Isitsel Hafiza", category: GameCategory::Memory, duration_seconds: 180 },
    CatalogItem { id: "tepki-suresi", title: "Tepki Suresi", category: GameCategory::Attention, duration_seconds: 180 },
    CatalogItem { id: "sozel-analoji", title: "Sozel Analoji", category: GameCategory::Language, duration_seconds: 180 },
    CatalogItem { id: "es-anlam", title: "Es Anlam", category: GameCategory::Language, duration_seconds: 180 },
    CatalogItem { id: "cumle-ici-es-anlam", title: "Cumle Ici Es Anlam", category: GameCategory::Language, duration_seconds: 180 },
    CatalogItem { id: "simge-kodlama", title: "Simge Kodlama", category: GameCategory::Attention, duration_seconds: 120 },
    CatalogItem { id: "kosullu-yonerge", title: "Kosullu Yonerge", category: GameCategory::Logic, duration_seconds: 180 },
    CatalogItem { id: "mantik-bulmacasi", title: "Mantik Bulmacasi", category: GameCategory::Logic, duration_seconds: 180 },
    CatalogItem { id: "sayi-sihirbazi", title: "Sayi Sihirbazi", category: GameCategory::Logic, duration_seconds: 180 },
    CatalogItem { id: "matematik-grid", title: "Matematik Grid", category: GameCategory::Logic, duration_seconds: 180 },
    CatalogItem { id: "gorsel-hafiza", title: "Gorsel Hafiza", category: GameCategory::Memory, duration_seconds: 180 },
    CatalogItem { id: "sayisal-hafiza", title: "Sayisal Hafiza", category: GameCategory::Memory, duration_seconds: 180 },
    CatalogItem { id: "sayisal-dizi", title: "Sayisal Dizi", category: GameCategory::Logic, duration_seconds: 180 },
    CatalogItem { id: "sayisal-sifre", title: "Sayisal Sifre", category: GameCategory::Logic, duration_seconds: 180 },
    CatalogItem { id: "n-geri-sifresi", title: "N-Geri Sifresi", category: GameCategory::Memory, duration_seconds: 180 },
    CatalogItem { id: "kozmik-hafiza", title: "Kozmik Hafiza", category: GameCategory::Memory, duration_seconds: 180 },
    CatalogItem { id: "lazer-labirent", title: "Lazer Labirent", category: GameCategory::Logic, duration_seconds: 180 },
    CatalogItem { id: "saat-problemi", title: "Saat Problemi", category: GameCategory::Logic, duration_seconds: 180 },
    CatalogItem { id: "labirent", title: "Labirent", category: GameCategory::Logic, duration_seconds: 180 },
    CatalogItem { id: "algisal-hiz", title: "Algisal Hiz", category: GameCategory::Attention, duration_seconds: 180 },
];

/// Look up a catalog entry by its slug.
pub fn catalog_item(game_id: &str) -> Option<&'static CatalogItem> {
    GAME_CATALOG.iter().find(|item| item.id == game_id)
}

/// Build the seed listing served when no metrics are available.
pub fn seed_summaries() -> Vec<GameSummary> {
    GAME_CATALOG.iter().map(summary_from_catalog).collect()
}

/// Build a metric-less summary from a catalog entry.
pub fn summary_from_catalog(item: &CatalogItem) -> GameSummary {
    GameSummary {
        id: item.id.to_owned(),
        title: item.title.to_owned(),
        category: item.category,
        duration_seconds: item.duration_seconds,
        plays_count: None,
        best_score: None,
        avg_score: None,
        avg_duration_seconds: None,
    }
}

/// Derive a display title from a slug for games missing a catalog entry.
///
/// Splits on `-` and `_` and capitalizes each word:
/// `"renk-avi"` becomes `"Renk Avi"`.
pub fn display_title(game_id: &str) -> String {
    game_id
        .split(['-', '_'])
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            chars.next().map_or_else(String::new, |first| {
                let mut word: String = first.to_uppercase().collect();
                word.push_str(chars.as_str());
                word
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_slugs_are_unique() {
        for (index, item) in GAME_CATALOG.iter().enumerate() {
            let duplicate = GAME_CATALOG
                .iter()
                .skip(index.saturating_add(1))
                .any(|other| other.id == item.id);
            assert!(!duplicate, "duplicate catalog slug: {}", item.id);
        }
    }

    #[test]
    fn lookup_known_and_unknown() {
        let item = catalog_item("labirent");
        assert_eq!(item.map(|i| i.title), Some("Labirent"));
        assert!(catalog_item("no-such-game").is_none());
    }

    #[test]
    fn seed_has_no_metrics() {
        let seed = seed_summaries();
        assert_eq!(seed.len(), GAME_CATALOG.len());
        assert!(seed.iter().all(|game| game.plays_count.is_none()));
    }

    #[test]
    fn display_title_from_slug() {
        assert_eq!(display_title("renk-avi"), "Renk Avi");
        assert_eq!(display_title("word_hunt"), "Word Hunt");
        assert_eq!(display_title("--double--dash--"), "Double Dash");
        assert_eq!(display_title(""), "");
    }
}
