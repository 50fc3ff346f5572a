//! Shared text helpers: normalization, tokenizing, weekday and number words.

use std::sync::LazyLock;

use regex::Regex;

/// Alternation matching any weekday name or alias. Full names come first so
/// the longest spelling is preferred.
pub(crate) const WEEKDAY_ALT: &str = "sunday|monday|tuesday|wednesday|thursday|friday|saturday|sun|mon|tues|tue|wed|thurs|thur|thu|fri|sat";

static RE_SPACES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());
static RE_MERIDIEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([ap])\.\s?m\b\.?").unwrap());

/// Lowercase, fold `a.m.`/`p.m.` to `am`/`pm`, and collapse whitespace.
pub(crate) fn normalize(text: &str) -> String {
    let lower = text.to_lowercase().replace(['’', '`'], "'");
    let folded = RE_MERIDIEM.replace_all(&lower, "${1}m");
    RE_SPACES.replace_all(folded.trim(), " ").into_owned()
}

/// Alphanumeric tokens (apostrophes kept so "i'd" stays one word).
pub(crate) fn words(text: &str) -> Vec<&str> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '\''))
        .filter(|w| !w.is_empty())
        .collect()
}

/// Map a weekday word to 0 = Sunday … 6 = Saturday. Plurals are only
/// accepted on full names, so "thus" is not read as "thu".
pub(crate) fn weekday_from_word(word: &str) -> Option<u8> {
    let lookup = |w: &str| match w {
        "sunday" | "sun" => Some(0),
        "monday" | "mon" => Some(1),
        "tuesday" | "tue" | "tues" => Some(2),
        "wednesday" | "wed" => Some(3),
        "thursday" | "thu" | "thur" | "thurs" => Some(4),
        "friday" | "fri" => Some(5),
        "saturday" | "sat" => Some(6),
        _ => None,
    };
    lookup(word).or_else(|| {
        word.strip_suffix('s')
            .filter(|w| w.len() >= 6)
            .and_then(lookup)
    })
}

pub(crate) fn weekday_label(day: u8) -> &'static str {
    match day {
        0 => "Sunday",
        1 => "Monday",
        2 => "Tuesday",
        3 => "Wednesday",
        4 => "Thursday",
        5 => "Friday",
        _ => "Saturday",
    }
}

/// Small cardinal numbers spelled out, plus "a"/"an" as one.
pub(crate) fn number_word(word: &str) -> Option<u32> {
    let n = match word {
        "a" | "an" | "one" => 1,
        "two" => 2,
        "three" => 3,
        "four" => 4,
        "five" => 5,
        "six" => 6,
        "seven" => 7,
        "eight" => 8,
        "nine" => 9,
        "ten" => 10,
        "eleven" => 11,
        "twelve" => 12,
        _ => return None,
    };
    Some(n)
}

/// Parse either digits or a spelled-out small number.
pub(crate) fn parse_count(word: &str) -> Option<u32> {
    word.parse().ok().or_else(|| number_word(word))
}

/// True if any of the phrases occurs as whole words in `text`.
pub(crate) fn contains_phrase(text: &str, phrases: &[&str]) -> bool {
    phrases.iter().any(|p| {
        text.match_indices(p).any(|(i, m)| {
            let before = text[..i].chars().next_back();
            let after = text[i + m.len()..].chars().next();
            !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_folds_meridiem_and_spaces() {
        assert_eq!(normalize("  Book   2 P.M. Friday "), "book 2 pm friday");
        assert_eq!(normalize("9 a.m."), "9 am");
    }

    #[test]
    fn words_split_on_punctuation() {
        assert_eq!(words("mon, wed & fri!"), vec!["mon", "wed", "fri"]);
        assert_eq!(words("i'd like"), vec!["i'd", "like"]);
    }

    #[test]
    fn weekday_words_and_plurals() {
        assert_eq!(weekday_from_word("tues"), Some(2));
        assert_eq!(weekday_from_word("mondays"), Some(1));
        assert_eq!(weekday_from_word("thurs"), Some(4));
        assert_eq!(weekday_from_word("month"), None);
        assert_eq!(weekday_from_word("thus"), None);
    }

    #[test]
    fn phrase_match_respects_word_boundaries() {
        assert!(contains_phrase("please book it", &["book"]));
        assert!(!contains_phrase("unbooked slots", &["booked slots", "book"]));
        assert!(contains_phrase("can you show", &["can you"]));
    }

    #[test]
    fn counts_parse_digits_and_words() {
        assert_eq!(parse_count("12"), Some(12));
        assert_eq!(parse_count("three"), Some(3));
        assert_eq!(parse_count("many"), None);
    }
}
