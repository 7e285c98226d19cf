//! Field extraction from raw infobox wikitext

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

static HTML_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid tag pattern"));
static REF_PAIRED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<ref[^>]*>.*?</ref>").expect("valid ref pattern"));
static REF_SELF_CLOSING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<ref[^>]*/>").expect("valid ref pattern"));
static CITATION_NEEDED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{citation needed[^}]*\}\}").expect("valid citation pattern")
});
pub(crate) static SIMPLE_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\[([^|\]]+)\]\]").expect("valid link pattern"));
pub(crate) static DISPLAY_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\[([^|]+)\|([^\]]+)\]\]").expect("valid link pattern"));
static PLAINLIST: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{plainlist\|\s*([^}]+)\}\}").expect("valid plainlist pattern")
});
pub(crate) static TEMPLATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{([^}]+)\}\}").expect("valid template pattern"));
pub(crate) static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));
static EDGE_PUNCTUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[,\s*]+|[,\s*]+$").expect("valid edge pattern"));

/// Boundary shapes tried from strictest to loosest. `{}` is replaced by the
/// escaped field name.
const FIELD_PATTERNS: [&str; 3] = [
    r"(?is)\|\s*{}\s*=\s*(.*?)(?:\n\||\n\}|\n\|\}|\n\|\s*\w+\s*=)",
    r"(?is)\|\s*{}\s*=\s*(.*?)(?:\n\||\n\}|\n\|\})",
    r"(?is){}\s*=\s*(.*?)(?:\n\||\n\}|\n\|\})",
];

/// Ordered matchers for a single infobox field.
struct FieldMatchers {
    patterns: Vec<Regex>,
}

impl FieldMatchers {
    fn new(field_name: &str) -> Self {
        let escaped = regex::escape(field_name);
        let patterns = FIELD_PATTERNS
            .iter()
            .filter_map(|shape| match Regex::new(&shape.replace("{}", &escaped)) {
                Ok(regex) => Some(regex),
                Err(e) => {
                    debug!("Skipping pattern for field '{}': {}", field_name, e);
                    None
                }
            })
            .collect();

        Self { patterns }
    }

    /// First capture of the first pattern that matches.
    fn first_match<'a>(&self, markup: &'a str) -> Option<&'a str> {
        self.patterns
            .iter()
            .find_map(|pattern| pattern.captures(markup))
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }
}

/// Extracts the cleaned value of `field_name` from an infobox block.
///
/// Returns an empty string when the field is missing or its patterns
/// cannot be built. Extraction never fails.
pub fn extract_field(markup: &str, field_name: &str) -> String {
    FieldMatchers::new(field_name)
        .first_match(markup)
        .map(|raw| clean_value(raw.trim()))
        .unwrap_or_default()
}

/// Removes wikitext and HTML artifacts from a raw field value.
///
/// Tags are stripped before `<ref>` blocks, so by the time the reference
/// patterns run the tags are gone and the reference text stays in place.
pub(crate) fn clean_value(raw: &str) -> String {
    let value = HTML_TAG.replace_all(raw, "");
    let value = REF_PAIRED.replace_all(&value, "");
    let value = REF_SELF_CLOSING.replace_all(&value, "");
    let value = CITATION_NEEDED.replace_all(&value, "");

    let value = resolve_links(&value);

    let value = PLAINLIST.replace_all(&value, "${1}");
    let value = PLAINLIST.replace_all(&value, "${1}");
    let value = TEMPLATE.replace_all(&value, "${1}");

    let value = WHITESPACE.replace_all(&value, " ");
    EDGE_PUNCTUATION.replace_all(value.trim(), "").into_owned()
}

/// `[[target]]` becomes `target`, then `[[target|display]]` becomes `display`.
pub(crate) fn resolve_links(text: &str) -> String {
    let simple = SIMPLE_LINK.replace_all(text, "${1}");
    DISPLAY_LINK.replace_all(&simple, "${2}").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    const INCEPTION: &str = "{{Infobox film\n\
| name           = Inception\n\
| director       = [[Christopher Nolan]]\n\
| starring       = {{plainlist|\n* [[Leonardo DiCaprio]]\n* [[Ken Watanabe]]\n* [[Joseph Gordon-Levitt]]}}\n\
| music          = [[Hans Zimmer]]\n\
| running_time   = 148 minutes<ref>{{cite web |title=Inception}}</ref>\n\
| budget         = $160 million{{citation needed|date=May 2020}}\n\
| distributor    = [[Warner Bros. Pictures|Warner Bros.]]\n\
}}";

    #[test]
    fn missing_field_is_empty() {
        assert_eq!(extract_field(INCEPTION, "cinematography"), "");
        assert_eq!(extract_field("", "director"), "");
        assert_eq!(extract_field("no infobox here at all", "budget"), "");
    }

    #[test]
    fn runtime_value_is_extracted_up_to_next_field() {
        let markup = "{{Infobox film\n|runtime = 142 minutes\n|country = United States\n}}";
        assert_eq!(extract_field(markup, "runtime"), "142 minutes");
    }

    #[test]
    fn field_name_is_case_insensitive() {
        let markup = "| Director = Greta Gerwig\n| writer = Noah Baumbach\n}}";
        assert_eq!(extract_field(markup, "director"), "Greta Gerwig");
    }

    #[test]
    fn links_are_resolved() {
        assert_eq!(extract_field(INCEPTION, "director"), "Christopher Nolan");
        assert_eq!(extract_field(INCEPTION, "distributor"), "Warner Bros.");
    }

    #[test]
    fn plainlist_is_unwrapped_and_whitespace_collapsed() {
        assert_eq!(
            extract_field(INCEPTION, "starring"),
            "Leonardo DiCaprio * Ken Watanabe * Joseph Gordon-Levitt"
        );
    }

    #[test]
    fn citation_needed_is_removed() {
        assert_eq!(extract_field(INCEPTION, "budget"), "$160 million");
    }

    #[test]
    fn ref_tags_are_stripped_before_reference_blocks() {
        assert_eq!(
            extract_field(INCEPTION, "running_time"),
            "148 minutescite web |title=Inception"
        );
    }

    #[test]
    fn self_closing_ref_leaves_no_trace() {
        let markup = "| budget = $20 million<ref name=\"bom\" />\n| gross = 1\n}}";
        assert_eq!(extract_field(markup, "budget"), "$20 million");
    }

    #[test]
    fn loosest_pattern_matches_without_leading_pipe() {
        let markup = "rating = PG-13\n}}";
        assert_eq!(extract_field(markup, "rating"), "PG-13");
    }

    #[test]
    fn value_at_end_without_boundary_is_missed() {
        assert_eq!(extract_field("| country = France", "country"), "");
    }

    #[test]
    fn field_name_is_escaped() {
        assert_eq!(extract_field("| a.b = x\n| c = y\n}}", "a+b"), "");
    }

    #[test]
    fn edge_commas_and_asterisks_are_trimmed() {
        let markup = "| editing = * , Lee Smith ,*\n| music = x\n}}";
        assert_eq!(extract_field(markup, "editing"), "Lee Smith");
    }

    #[test]
    fn nested_plainlist_is_unwrapped_twice() {
        let markup = "| starring = {{plainlist|{{plainlist|Song Kang-ho}}}}\n| music = x\n}}";
        assert_eq!(extract_field(markup, "starring"), "Song Kang-ho");
    }

    #[test]
    fn template_left_after_plainlist_is_unwrapped_once() {
        let markup =
            "| director = {{plainlist|* [[Bong Joon-ho]] {{small|(director)}}}}\n| music = x\n}}";
        assert_eq!(
            extract_field(markup, "director"),
            "Bong Joon-ho small|(director)"
        );
    }

    #[test]
    fn generic_templates_get_a_single_pass() {
        let markup = "| distributor = {{nowrap|{{nowrap|CJ Entertainment}}}}\n| music = x\n}}";
        assert_eq!(
            extract_field(markup, "distributor"),
            "nowrap|{{nowrap|CJ Entertainment}}"
        );
    }
}
