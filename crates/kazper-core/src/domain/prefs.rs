//! Preferences: display locale and gender filter.

use serde::{Deserialize, Serialize};

use super::entity::{Gender, Locale};

/// Which genders the deck shows. Unisex names are part of every mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenderMode {
    Male,
    Female,
    #[default]
    Both,
}

impl GenderMode {
    pub fn as_str(self) -> &'static str {
        match self {
            GenderMode::Male => "male",
            GenderMode::Female => "female",
            GenderMode::Both => "both",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "male" => Some(GenderMode::Male),
            "female" => Some(GenderMode::Female),
            "both" => Some(GenderMode::Both),
            _ => None,
        }
    }

    pub fn active_genders(self) -> &'static [Gender] {
        match self {
            GenderMode::Male => &[Gender::Male, Gender::Unisex],
            GenderMode::Female => &[Gender::Female, Gender::Unisex],
            GenderMode::Both => &Gender::ALL,
        }
    }

    pub fn includes(self, gender: Gender) -> bool {
        self.active_genders().contains(&gender)
    }

    /// Nearest mode for a legacy explicit gender set.
    pub fn infer(genders: &[Gender]) -> Self {
        let male = genders.contains(&Gender::Male);
        let female = genders.contains(&Gender::Female);
        match (male, female) {
            (true, false) => GenderMode::Male,
            (false, true) => GenderMode::Female,
            _ => GenderMode::Both,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Preferences {
    pub locale: Locale,
    pub gender_mode: GenderMode,
}

impl Preferences {
    pub fn active_genders(&self) -> &'static [Gender] {
        self.gender_mode.active_genders()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::male(GenderMode::Male, &[Gender::Male, Gender::Unisex])]
    #[case::female(GenderMode::Female, &[Gender::Female, Gender::Unisex])]
    #[case::both(GenderMode::Both, &[Gender::Male, Gender::Female, Gender::Unisex])]
    fn active_genders_per_mode(#[case] mode: GenderMode, #[case] expected: &[Gender]) {
        assert_eq!(mode.active_genders(), expected);
    }

    #[test]
    fn male_mode_excludes_female_only() {
        assert!(!GenderMode::Male.includes(Gender::Female));
        assert!(GenderMode::Male.includes(Gender::Unisex));
    }

    #[rstest]
    #[case::male_only(&[Gender::Male], GenderMode::Male)]
    #[case::male_and_unisex(&[Gender::Male, Gender::Unisex], GenderMode::Male)]
    #[case::female_and_unisex(&[Gender::Unisex, Gender::Female], GenderMode::Female)]
    #[case::both(&[Gender::Male, Gender::Female], GenderMode::Both)]
    #[case::unisex_only(&[Gender::Unisex], GenderMode::Both)]
    #[case::empty(&[], GenderMode::Both)]
    fn infer_from_legacy_set(#[case] genders: &[Gender], #[case] expected: GenderMode) {
        assert_eq!(GenderMode::infer(genders), expected);
    }

    #[test]
    fn defaults_are_ru_and_both() {
        let prefs = Preferences::default();
        assert_eq!(prefs.locale, Locale::Ru);
        assert_eq!(prefs.gender_mode, GenderMode::Both);
    }
}
