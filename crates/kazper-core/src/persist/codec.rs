//! Persistence codec: bucket assignment and preferences <-> JSON documents.
//!
//! Decoding is lenient: anything that does not match a known enumeration is
//! dropped field by field instead of failing the whole document.

use serde::Serialize;
use serde_json::Value;

use crate::domain::{
    Bucket, BucketAssignment, EntityCatalog, EntityId, Gender, GenderMode, Locale, Preferences,
};

/// Stored form of the bucket assignment (`choices` key).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredChoices {
    pub good: Vec<String>,
    pub bad: Vec<String>,
}

/// Stored form of the preferences (`prefs` key).
///
/// `genders` is written for readers that predate `genderMode`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredPrefs {
    pub locale: Locale,
    pub gender_mode: GenderMode,
    pub genders: Vec<Gender>,
}

pub fn serialize_choices(buckets: &BucketAssignment) -> StoredChoices {
    let strings = |bucket: Bucket| -> Vec<String> {
        buckets
            .ids(bucket)
            .iter()
            .map(|id| id.as_str().to_string())
            .collect()
    };
    StoredChoices {
        good: strings(Bucket::Kept),
        bad: strings(Bucket::Rejected),
    }
}

pub fn serialize_prefs(prefs: &Preferences) -> StoredPrefs {
    StoredPrefs {
        locale: prefs.locale,
        gender_mode: prefs.gender_mode,
        genders: prefs.active_genders().to_vec(),
    }
}

fn string_items(value: Option<&Value>) -> Vec<&str> {
    match value {
        Some(Value::Array(items)) => items.iter().filter_map(Value::as_str).collect(),
        _ => Vec::new(),
    }
}

/// Decode a stored `choices` document.
///
/// Unparseable documents and non-string ids are ignored. An id listed in both
/// arrays stays kept.
pub fn deserialize_choices(raw: &str) -> BucketAssignment {
    let Ok(document) = serde_json::from_str::<Value>(raw) else {
        return BucketAssignment::new();
    };
    let ids = |key: &str| {
        string_items(document.get(key))
            .into_iter()
            .map(EntityId::from_raw)
            .collect::<Vec<_>>()
    };
    BucketAssignment::from_lists(ids("good"), ids("bad"))
}

/// Decode a stored `prefs` document on top of `base`.
///
/// A valid `genderMode` wins; otherwise a legacy `genders` array is mapped to
/// the nearest mode. Invalid values leave the corresponding field of `base`.
pub fn deserialize_prefs(raw: &str, base: Preferences) -> Preferences {
    let mut prefs = base;
    let Ok(document) = serde_json::from_str::<Value>(raw) else {
        return prefs;
    };
    if !document.is_object() {
        return prefs;
    }

    if let Some(locale) = document.get("locale").and_then(Value::as_str).and_then(Locale::parse) {
        prefs.locale = locale;
    }

    if let Some(mode) = document
        .get("genderMode")
        .and_then(Value::as_str)
        .and_then(GenderMode::parse)
    {
        prefs.gender_mode = mode;
    } else if let Some(Value::Array(_)) = document.get("genders") {
        let genders: Vec<Gender> = string_items(document.get("genders"))
            .into_iter()
            .filter_map(Gender::from_code)
            .collect();
        prefs.gender_mode = GenderMode::infer(&genders);
    }

    prefs
}

/// Drop ids the catalog does not know.
///
/// Overlap between the buckets cannot exist in a [`BucketAssignment`]; it is
/// resolved in favor of kept when the assignment is built.
pub fn sanitize(buckets: &mut BucketAssignment, catalog: &EntityCatalog) {
    buckets.retain(|id| catalog.contains(id));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::NameEntity;
    use rstest::rstest;

    fn catalog() -> EntityCatalog {
        EntityCatalog::new(vec![
            NameEntity::new("Асқар", "Аскар", "Askar", Gender::Male),
            NameEntity::new("Дана", "Дана", "Dana", Gender::Female),
            NameEntity::new("Нұр", "Нур", "Nur", Gender::Unisex),
        ])
    }

    fn ids(catalog: &EntityCatalog) -> Vec<EntityId> {
        catalog.iter().map(|e| e.id().clone()).collect()
    }

    #[test]
    fn choices_round_trip_equals_sanitized() {
        let catalog = catalog();
        let ids = ids(&catalog);
        let mut buckets = BucketAssignment::from_lists(
            vec![ids[2].clone(), ids[0].clone()],
            vec![ids[1].clone()],
        );

        let raw = serde_json::to_string(&serialize_choices(&buckets)).unwrap();
        let decoded = deserialize_choices(&raw);
        sanitize(&mut buckets, &catalog);
        assert_eq!(decoded, buckets);
    }

    #[test]
    fn choices_document_shape() {
        let buckets = BucketAssignment::from_lists(
            vec![EntityId::from_raw("a")],
            vec![EntityId::from_raw("b")],
        );
        let raw = serde_json::to_string(&serialize_choices(&buckets)).unwrap();
        assert_eq!(raw, r#"{"good":["a"],"bad":["b"]}"#);
    }

    #[rstest]
    #[case::not_json("{{{")]
    #[case::array("[1,2]")]
    #[case::wrong_types(r#"{"good":"a","bad":7}"#)]
    #[case::null("null")]
    fn garbage_choices_decode_empty(#[case] raw: &str) {
        assert!(deserialize_choices(raw).is_empty());
    }

    #[test]
    fn non_string_ids_are_skipped() {
        let decoded = deserialize_choices(r#"{"good":["a",1,null,"b"],"bad":[{"x":1},"c"]}"#);
        assert_eq!(decoded.count(Bucket::Kept), 2);
        assert_eq!(decoded.ids(Bucket::Rejected), &[EntityId::from_raw("c")]);
    }

    #[test]
    fn sanitize_drops_orphans_and_favors_kept() {
        let catalog = catalog();
        let ids = ids(&catalog);
        let raw = format!(
            r#"{{"good":["{a}","ghost"],"bad":["{a}","{b}","ghost2"]}}"#,
            a = ids[0],
            b = ids[1]
        );
        let mut decoded = deserialize_choices(&raw);
        sanitize(&mut decoded, &catalog);

        assert_eq!(decoded.ids(Bucket::Kept), &[ids[0].clone()]);
        assert_eq!(decoded.ids(Bucket::Rejected), &[ids[1].clone()]);
    }

    #[test]
    fn prefs_document_shape() {
        let prefs = Preferences {
            locale: Locale::Kk,
            gender_mode: GenderMode::Female,
        };
        let raw = serde_json::to_string(&serialize_prefs(&prefs)).unwrap();
        assert_eq!(raw, r#"{"locale":"kk","genderMode":"female","genders":["F","B"]}"#);
        assert_eq!(deserialize_prefs(&raw, Preferences::default()), prefs);
    }

    #[rstest]
    #[case::legacy_male(r#"{"genders":["M","B"]}"#, GenderMode::Male)]
    #[case::legacy_female(r#"{"genders":["F"]}"#, GenderMode::Female)]
    #[case::legacy_both(r#"{"genders":["M","F"]}"#, GenderMode::Both)]
    #[case::legacy_garbage(r#"{"genders":["X",3]}"#, GenderMode::Both)]
    #[case::mode_wins(r#"{"genderMode":"male","genders":["F"]}"#, GenderMode::Male)]
    #[case::bad_mode_falls_to_legacy(r#"{"genderMode":"robot","genders":["F","B"]}"#, GenderMode::Female)]
    fn gender_mode_resolution(#[case] raw: &str, #[case] expected: GenderMode) {
        assert_eq!(deserialize_prefs(raw, Preferences::default()).gender_mode, expected);
    }

    #[test]
    fn invalid_prefs_fields_keep_base() {
        let base = Preferences {
            locale: Locale::En,
            gender_mode: GenderMode::Male,
        };
        assert_eq!(deserialize_prefs(r#"{"locale":"fr","genderMode":1}"#, base), base);
        assert_eq!(deserialize_prefs("not json", base), base);
        assert_eq!(deserialize_prefs("[]", base), base);
    }
}
