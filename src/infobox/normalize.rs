//! Typed normalization of extracted infobox values

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use super::extract::{TEMPLATE, WHITESPACE, resolve_links};

static HTML_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid tag pattern"));
static LEADING_TEMPLATE_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(Plainlist|plainlist|Unbulleted list|cite web|ubl|Ill)[^a-zA-Z0-9]+")
        .expect("valid token pattern")
});
static TEMPLATE_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(Plainlist|plainlist|Unbulleted list|cite web|ubl|Ill)")
        .expect("valid token pattern")
});
static LEADING_JUNK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\*|\||,|\s)+").expect("valid junk pattern"));
static TRAILING_JUNK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\*|\||,|\s)+$").expect("valid junk pattern"));
static STRAY_MARKUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[{}|]").expect("valid markup pattern"));

static RUNTIME_MINUTES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)([0-9]+)\s*(?:minutes?|min)").expect("valid runtime pattern")
});
static HOURS_PART: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)([0-9]+)\s*h(?:ours?)?").expect("valid hours pattern"));
static MINUTES_PART: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)([0-9]+)\s*m(?:inutes?)?").expect("valid minutes pattern")
});

static CURRENCY_SYMBOL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[$£€¥]").expect("valid currency pattern"));
static MILLIONS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)([0-9,]+(?:\.[0-9]+)?)\s*million").expect("valid million pattern")
});
static BILLIONS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)([0-9,]+(?:\.[0-9]+)?)\s*billion").expect("valid billion pattern")
});
static BARE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([0-9,]+(?:\.[0-9]+)?)").expect("valid number pattern"));

/// Cleans one candidate list entry, such as a single name split from a
/// `starring` value.
///
/// Template tokens (`Plainlist`, `ubl`, `Ill`, ...) are removed wherever they
/// occur, including inside words.
pub fn clean_list_item(item: &str) -> String {
    if item.is_empty() {
        return String::new();
    }

    let item = resolve_links(item);
    let item = TEMPLATE.replace_all(&item, "${1}");
    let item = HTML_TAG.replace_all(&item, "");

    let item = LEADING_TEMPLATE_TOKEN.replace_all(&item, "");
    let item = LEADING_JUNK.replace_all(&item, "");
    let item = TRAILING_JUNK.replace_all(&item, "");

    let item = STRAY_MARKUP.replace_all(&item, "");
    let item = TEMPLATE_TOKEN.replace_all(&item, "");

    WHITESPACE.replace_all(&item, " ").trim().to_string()
}

/// Splits a raw field on commas and newlines into cleaned, non-empty items,
/// in order of appearance.
pub fn parse_list_field(raw: &str) -> Vec<String> {
    raw.split([',', '\n'])
        .map(clean_list_item)
        .filter(|item| !item.is_empty())
        .collect()
}

/// Merges the `writer`, `screenplay` and `story` fields into one deduplicated
/// list. Deduplication goes through a set, so the result has no stable order.
pub fn parse_writers(writer: &str, screenplay: &str, story: &str) -> Vec<String> {
    [writer, screenplay, story]
        .into_iter()
        .flat_map(parse_list_field)
        .collect::<HashSet<_>>()
        .into_iter()
        .collect()
}

/// Projects a list onto `n` positional slots, padding with empty strings.
pub fn to_slots(list: &[String], n: usize) -> Vec<String> {
    (0..n)
        .map(|i| list.get(i).cloned().unwrap_or_default())
        .collect()
}

/// Parses a running time into whole minutes.
///
/// `"142 minutes"` wins over any hour/minute pair; `"2h 30m"` and
/// `"2 hours"` are combined. `None` when no hour or minute figure is found.
pub fn parse_runtime(raw: &str) -> Option<i64> {
    if let Some(minutes) = first_integer(&RUNTIME_MINUTES, raw) {
        return Some(minutes);
    }

    let hours = first_integer(&HOURS_PART, raw)?;
    match first_integer(&MINUTES_PART, raw) {
        Some(minutes) => hours.checked_mul(60)?.checked_add(minutes),
        None => hours.checked_mul(60),
    }
}

/// Parses a budget or box-office figure into whole currency units.
///
/// Amounts followed by "million"/"billion" are scaled; a bare number is
/// taken as already being in full units. `None` when no number is found.
pub fn parse_monetary(raw: &str) -> Option<i64> {
    let cleaned = CURRENCY_SYMBOL.replace_all(raw, "");
    let lowered = cleaned.to_lowercase();

    if lowered.contains("million") {
        scaled_amount(&MILLIONS, &cleaned, 1_000_000.0)
    } else if lowered.contains("billion") {
        scaled_amount(&BILLIONS, &cleaned, 1_000_000_000.0)
    } else {
        scaled_amount(&BARE_NUMBER, &cleaned, 1.0)
    }
}

fn first_integer(pattern: &Regex, text: &str) -> Option<i64> {
    pattern.captures(text)?.get(1)?.as_str().parse().ok()
}

#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
fn scaled_amount(pattern: &Regex, text: &str, multiplier: f64) -> Option<i64> {
    let number = pattern.captures(text)?.get(1)?.as_str().replace(',', "");
    let amount = number.parse::<f64>().ok()? * multiplier;
    (amount.is_finite() && amount < i64::MAX as f64).then(|| amount as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(items: &[&str]) -> Vec<String> {
        items.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn list_item_links_are_resolved() {
        assert_eq!(clean_list_item("[[Tom Hanks]]"), "Tom Hanks");
        assert_eq!(clean_list_item("[[Tom Hanks|Hanks]]"), "Hanks");
    }

    #[test]
    fn list_item_template_prefixes_are_dropped() {
        assert_eq!(clean_list_item("Plainlist| Jane Doe"), "Jane Doe");
        assert_eq!(
            clean_list_item("{{Unbulleted list|Greta Gerwig}}"),
            "Greta Gerwig"
        );
        assert_eq!(clean_list_item("* [[Emma Stone]] |"), "Emma Stone");
    }

    #[test]
    fn list_item_tags_are_stripped() {
        assert_eq!(clean_list_item("<br />Cillian Murphy"), "Cian Murphy");
        assert_eq!(clean_list_item("<small>Florence Pugh</small>"), "Florence Pugh");
    }

    #[test]
    fn list_item_empty_input() {
        assert_eq!(clean_list_item(""), "");
        assert_eq!(clean_list_item(" * | , "), "");
    }

    #[test]
    fn list_item_cleaning_is_idempotent() {
        for name in ["Tom Hanks", "Frances McDormand", "Bong Joon-ho", "A"] {
            let once = clean_list_item(name);
            assert_eq!(once, name);
            assert_eq!(clean_list_item(&once), once);
        }
    }

    #[test]
    fn list_field_keeps_order_and_drops_blanks() {
        let raw = "[[Leonardo DiCaprio]], [[Ken Watanabe]]\n\n* [[Elliot Page]],";
        assert_eq!(
            parse_list_field(raw),
            names(&["Leonardo DiCaprio", "Ken Watanabe", "Elliot Page"])
        );
        assert!(parse_list_field("").is_empty());
    }

    #[test]
    fn writers_are_merged_and_deduplicated() {
        let writers: HashSet<String> = parse_writers("A, B", "B, C", "").into_iter().collect();
        let expected: HashSet<String> = names(&["A", "B", "C"]).into_iter().collect();
        assert_eq!(writers, expected);
        assert_eq!(parse_writers("A, B", "B, C", "").len(), 3);
        assert!(parse_writers("", "", "").is_empty());
    }

    #[test]
    fn slots_are_padded_and_truncated() {
        assert_eq!(to_slots(&names(&["A", "B"]), 3), names(&["A", "B", ""]));
        assert_eq!(to_slots(&[], 5), vec![String::new(); 5]);
        assert_eq!(to_slots(&names(&["A", "B", "C"]), 2), names(&["A", "B"]));
    }

    #[test]
    fn runtime_minutes() {
        assert_eq!(parse_runtime("142 minutes"), Some(142));
        assert_eq!(parse_runtime("95 min"), Some(95));
        assert_eq!(parse_runtime("1 MINUTE"), Some(1));
    }

    #[test]
    fn runtime_hours_and_minutes() {
        assert_eq!(parse_runtime("2h 30m"), Some(150));
        assert_eq!(parse_runtime("2 hours"), Some(120));
        assert_eq!(parse_runtime("3 hours 1 m"), Some(181));
    }

    #[test]
    fn runtime_absent() {
        assert_eq!(parse_runtime(""), None);
        assert_eq!(parse_runtime("unknown"), None);
        assert_eq!(parse_runtime("30m"), None);
    }

    #[test]
    fn monetary_magnitudes() {
        assert_eq!(parse_monetary("$2.5 million"), Some(2_500_000));
        assert_eq!(parse_monetary("£1.2 billion"), Some(1_200_000_000));
        assert_eq!(parse_monetary("$160 Million"), Some(160_000_000));
        assert_eq!(parse_monetary("€1,500 million"), Some(1_500_000_000));
    }

    #[test]
    fn monetary_bare_number_is_taken_as_is() {
        assert_eq!(parse_monetary("$2,500,000"), Some(2_500_000));
        assert_eq!(parse_monetary("¥ 300000.75"), Some(300_000));
    }

    #[test]
    fn monetary_absent() {
        assert_eq!(parse_monetary(""), None);
        assert_eq!(parse_monetary("abc"), None);
        assert_eq!(parse_monetary("several million"), None);
        assert_eq!(parse_monetary(", million"), None);
    }

    #[test]
    fn monetary_out_of_range() {
        assert_eq!(parse_monetary("$99999999999999 billion"), None);
        assert_eq!(parse_runtime("999999999999999999 hours"), None);
    }
}
