//! Name entities and the small enumerations that describe them.
//!
//! Identity is derived from content: the same `(kk, ru, en, gender)` tuple
//! always yields the same [`EntityId`], regardless of row order or reloads.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator used when building an [`EntityId`].
///
/// The loader rejects any field that contains it, so ids never collide.
pub const ID_SEPARATOR: &str = "||";

/// Gender tag of a name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Gender {
    #[serde(rename = "M")]
    Male,
    #[serde(rename = "F")]
    Female,
    /// Used for both boys and girls.
    #[serde(rename = "B")]
    Unisex,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Unisex];

    /// Single-letter code used in the CSV and in persisted state.
    pub fn code(self) -> &'static str {
        match self {
            Gender::Male => "M",
            Gender::Female => "F",
            Gender::Unisex => "B",
        }
    }

    /// Parse an exact (already upper-cased) code.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "M" => Some(Gender::Male),
            "F" => Some(Gender::Female),
            "B" => Some(Gender::Unisex),
            _ => None,
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Display locale: which rendering of a name is shown and compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    Kk,
    #[default]
    Ru,
    En,
}

impl Locale {
    pub const ALL: [Locale; 3] = [Locale::Ru, Locale::Kk, Locale::En];

    pub fn as_str(self) -> &'static str {
        match self {
            Locale::Kk => "kk",
            Locale::Ru => "ru",
            Locale::En => "en",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "kk" => Some(Locale::Kk),
            "ru" => Some(Locale::Ru),
            "en" => Some(Locale::En),
            _ => None,
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Content-derived identifier of a [`NameEntity`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(String);

impl EntityId {
    /// Build the id for a field tuple.
    pub fn derive(kk: &str, ru: &str, en: &str, gender: Gender) -> Self {
        Self([kk, ru, en, gender.code()].join(ID_SEPARATOR))
    }

    /// Wrap a raw id read back from storage or from the view layer.
    ///
    /// No validation happens here; unknown ids are dropped by
    /// [`crate::persist::sanitize`] or ignored by the catalog lookup.
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One candidate name: three language renderings plus a gender tag.
///
/// Immutable once built. Fields are trimmed by the loader before construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NameEntity {
    id: EntityId,
    kk: String,
    ru: String,
    en: String,
    gender: Gender,
}

impl NameEntity {
    pub fn new(
        kk: impl Into<String>,
        ru: impl Into<String>,
        en: impl Into<String>,
        gender: Gender,
    ) -> Self {
        let (kk, ru, en) = (kk.into(), ru.into(), en.into());
        let id = EntityId::derive(&kk, &ru, &en, gender);
        Self {
            id,
            kk,
            ru,
            en,
            gender,
        }
    }

    pub fn id(&self) -> &EntityId {
        &self.id
    }

    pub fn kk(&self) -> &str {
        &self.kk
    }

    pub fn ru(&self) -> &str {
        &self.ru
    }

    pub fn en(&self) -> &str {
        &self.en
    }

    pub fn gender(&self) -> Gender {
        self.gender
    }

    /// The rendering shown for `locale`.
    pub fn display(&self, locale: Locale) -> &str {
        match locale {
            Locale::Kk => &self.kk,
            Locale::Ru => &self.ru,
            Locale::En => &self.en,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn id_is_deterministic_over_fields() {
        let a = NameEntity::new("Айгерім", "Айгерим", "Aigerim", Gender::Female);
        let b = NameEntity::new("Айгерім", "Айгерим", "Aigerim", Gender::Female);
        assert_eq!(a.id(), b.id());
        assert_eq!(a.id().as_str(), "Айгерім||Айгерим||Aigerim||F");
    }

    #[test]
    fn gender_is_part_of_identity() {
        let f = NameEntity::new("Нұр", "Нур", "Nur", Gender::Female);
        let b = NameEntity::new("Нұр", "Нур", "Nur", Gender::Unisex);
        assert_ne!(f.id(), b.id());
    }

    #[rstest]
    #[case::kk(Locale::Kk, "Әлихан")]
    #[case::ru(Locale::Ru, "Алихан")]
    #[case::en(Locale::En, "Alikhan")]
    fn display_picks_locale_field(#[case] locale: Locale, #[case] expected: &str) {
        let entity = NameEntity::new("Әлихан", "Алихан", "Alikhan", Gender::Male);
        assert_eq!(entity.display(locale), expected);
    }

    #[test]
    fn gender_codes_round_trip() {
        for gender in Gender::ALL {
            assert_eq!(Gender::from_code(gender.code()), Some(gender));
        }
        assert_eq!(Gender::from_code("m"), None);
        assert_eq!(Gender::from_code("X"), None);
    }

    #[test]
    fn locale_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Locale::Kk).unwrap(), "\"kk\"");
        assert_eq!(Locale::parse("en"), Some(Locale::En));
        assert_eq!(Locale::parse("EN"), None);
        assert_eq!(Locale::default(), Locale::Ru);
    }
}
