//! CyrillicCollator - ru/kk 向けの比較器
//!
//! A small table-driven stand-in for ICU's `ru` collation, extended with the
//! Kazakh letters:
//!
//! - primary: script order (spaces/punctuation < digits < Cyrillic < Latin <
//!   everything else), then alphabet position; case and `ё`/`е` are ignored
//! - secondary: `е` before `ё`
//! - tertiary: lower case before upper case
//! - finally raw code points, so the order is total

use std::cmp::Ordering;

use crate::ports::Collator;

/// Kazakh Cyrillic alphabet order; it contains the Russian alphabet as a
/// subsequence, with `ё` folded onto `е` at the primary level.
const CYRILLIC_ORDER: &str = "аәбвгғдежзийкқлмнңоөпрстуұүфхһцчшщъыіьэюя";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Script {
    Symbol,
    Digit,
    Cyrillic,
    Latin,
    Other,
}

/// Collation weights for one character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Primary(Script, u32);

#[derive(Debug, Clone, Copy, Default)]
pub struct CyrillicCollator;

impl CyrillicCollator {
    pub fn new() -> Self {
        Self
    }

    fn lower(ch: char) -> char {
        ch.to_lowercase().next().unwrap_or(ch)
    }

    fn primary(ch: char) -> Primary {
        let lower = match Self::lower(ch) {
            'ё' => 'е',
            other => other,
        };
        if let Some(position) = CYRILLIC_ORDER.chars().position(|letter| letter == lower) {
            return Primary(Script::Cyrillic, position as u32);
        }
        if lower.is_ascii_lowercase() {
            return Primary(Script::Latin, lower as u32);
        }
        if lower.is_numeric() {
            return Primary(Script::Digit, lower.to_digit(10).unwrap_or(lower as u32));
        }
        if lower.is_whitespace() || lower.is_ascii_punctuation() {
            return Primary(Script::Symbol, lower as u32);
        }
        Primary(Script::Other, lower as u32)
    }

    fn secondary(ch: char) -> u8 {
        u8::from(Self::lower(ch) == 'ё')
    }

    fn tertiary(ch: char) -> u8 {
        u8::from(Self::lower(ch) != ch)
    }
}

impl Collator for CyrillicCollator {
    fn fold_case(&self, text: &str) -> String {
        text.to_lowercase()
    }

    fn compare(&self, a: &str, b: &str) -> Ordering {
        a.chars()
            .map(Self::primary)
            .cmp(b.chars().map(Self::primary))
            .then_with(|| a.chars().map(Self::secondary).cmp(b.chars().map(Self::secondary)))
            .then_with(|| a.chars().map(Self::tertiary).cmp(b.chars().map(Self::tertiary)))
            .then_with(|| a.cmp(b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sorted(words: &[&str]) -> Vec<String> {
        let collator = CyrillicCollator::new();
        let mut words: Vec<String> = words.iter().map(|w| w.to_string()).collect();
        words.sort_by(|a, b| collator.compare(a, b));
        words
    }

    #[test]
    fn russian_alphabet_order() {
        assert_eq!(
            sorted(&["Ярослав", "Борис", "Анна", "Эльвира", "Жанна"]),
            vec!["Анна", "Борис", "Жанна", "Эльвира", "Ярослав"]
        );
    }

    #[test]
    fn kazakh_letters_follow_their_base_letter() {
        assert_eq!(
            sorted(&["Бекзат", "Әсел", "Айгерім", "Қанат", "Кенже", "Лаура", "Ұлан", "Үміт", "Фарида"]),
            vec!["Айгерім", "Әсел", "Бекзат", "Кенже", "Қанат", "Лаура", "Ұлан", "Үміт", "Фарида"]
        );
    }

    #[test]
    fn yo_is_primary_equal_to_ye() {
        let collator = CyrillicCollator::new();
        // Decided at the second letter, ё/е does not matter there.
        assert_eq!(collator.compare("Ёлка", "Ерлан"), Ordering::Less);
        // Same primary weights: е sorts before ё.
        assert_eq!(collator.compare("Семен", "Семён"), Ordering::Less);
    }

    #[test]
    fn case_is_a_tertiary_difference() {
        let collator = CyrillicCollator::new();
        assert_eq!(collator.compare("дана", "Дана"), Ordering::Less);
        assert_eq!(collator.compare("Дана", "данияр"), Ordering::Less);
    }

    #[test]
    fn cyrillic_before_latin_and_digits_first() {
        assert_eq!(
            sorted(&["Zarina", "Анна", "2pac", "Aigerim"]),
            vec!["2pac", "Анна", "Aigerim", "Zarina"]
        );
    }

    #[test]
    fn shorter_prefix_sorts_first() {
        let collator = CyrillicCollator::new();
        assert_eq!(collator.compare("Ал", "Алихан"), Ordering::Less);
        assert_eq!(collator.compare("Алихан", "Алихан"), Ordering::Equal);
    }

    #[test]
    fn fold_case_lowers_kazakh_and_russian() {
        let collator = CyrillicCollator::new();
        assert_eq!(collator.fold_case("ӘЛІ Ёрик"), "әлі ёрик");
    }
}
