//! Filter/dedupe projector: catalog -> reviewable subset (pre-shuffle).

use std::collections::HashSet;
use std::sync::Arc;

use unicode_normalization::UnicodeNormalization;

use crate::domain::{EntityCatalog, Gender, Locale, NameEntity};
use crate::ports::Collator;

/// Normalized display text: trimmed, case-folded, NFC-composed.
pub fn normalize_display(text: &str, collator: &dyn Collator) -> String {
    collator.fold_case(text.trim()).nfc().collect()
}

/// Key under which two entries look identical in the current locale.
pub fn dedupe_key(entity: &NameEntity, locale: Locale, collator: &dyn Collator) -> String {
    format!(
        "{}::{}",
        entity.gender().code(),
        normalize_display(entity.display(locale), collator)
    )
}

/// Names whose gender is active, with display duplicates collapsed.
///
/// Keeps catalog order; the first entity with a given key wins. Dropped
/// entries are not a data-quality signal and are not counted anywhere.
pub fn project(
    catalog: &EntityCatalog,
    genders: &[Gender],
    locale: Locale,
    collator: &dyn Collator,
) -> Vec<Arc<NameEntity>> {
    let mut seen = HashSet::new();
    catalog
        .iter()
        .filter(|entity| genders.contains(&entity.gender()))
        .filter(|entity| seen.insert(dedupe_key(entity, locale, collator)))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::GenderMode;
    use crate::impls::CyrillicCollator;

    fn catalog() -> EntityCatalog {
        EntityCatalog::new(vec![
            NameEntity::new("Айгерім", "Айгерим", "Aigerim", Gender::Female),
            NameEntity::new("Асқар", "Аскар", "Askar", Gender::Male),
            NameEntity::new("Айгерим", "Айгерим", "Aigerym", Gender::Female),
            NameEntity::new("Нұр", "Нур", "Nur", Gender::Unisex),
            NameEntity::new("Нұр", "Нур", "Nur", Gender::Male),
        ])
    }

    fn english(entities: &[Arc<NameEntity>]) -> Vec<&str> {
        entities.iter().map(|e| e.en()).collect()
    }

    #[test]
    fn male_mode_excludes_female_only() {
        let projected = project(
            &catalog(),
            GenderMode::Male.active_genders(),
            Locale::En,
            &CyrillicCollator,
        );
        assert_eq!(english(&projected), vec!["Askar", "Nur", "Nur"]);
        assert!(projected.iter().all(|e| e.gender() != Gender::Female));
    }

    #[test]
    fn display_duplicates_collapse_per_locale() {
        let genders = GenderMode::Both.active_genders();

        // Both female entries read "Айгерим" in Russian: the first one wins.
        let ru = project(&catalog(), genders, Locale::Ru, &CyrillicCollator);
        assert_eq!(english(&ru), vec!["Aigerim", "Askar", "Nur", "Nur"]);

        // In English they differ, so both stay.
        let en = project(&catalog(), genders, Locale::En, &CyrillicCollator);
        assert_eq!(en.len(), 5);
    }

    #[test]
    fn same_text_different_gender_is_kept() {
        let ru = project(&catalog(), &[Gender::Male, Gender::Unisex], Locale::Ru, &CyrillicCollator);
        assert_eq!(ru.iter().filter(|e| e.ru() == "Нур").count(), 2);
    }

    #[test]
    fn key_ignores_case_whitespace_and_composition() {
        let composed = NameEntity::new("Йолдыз", "Йолдыз", "Yoldyz", Gender::Female);
        // И + combining breve, padded and upper-cased
        let decomposed = NameEntity::new("Йолдыз", "  \u{0418}\u{0306}ОЛДЫЗ ", "Yoldyz", Gender::Female);
        assert_eq!(
            dedupe_key(&composed, Locale::Ru, &CyrillicCollator),
            dedupe_key(&decomposed, Locale::Ru, &CyrillicCollator)
        );
        assert_eq!(dedupe_key(&composed, Locale::Ru, &CyrillicCollator), "F::йолдыз");
    }

    #[test]
    fn empty_filter_yields_nothing() {
        assert!(project(&catalog(), &[], Locale::Ru, &CyrillicCollator).is_empty());
    }
}
