//! Topic → filename normalization.

use std::sync::LazyLock;

use regex::Regex;

use pagesmith_shared::PAGE_EXTENSION;

/// Lowercase the topic, collapse every run of non `[a-z0-9]` characters into a
/// single hyphen, and strip hyphens from both ends.
pub fn slugify(topic: &str) -> String {
    static NON_ALNUM_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"[^a-z0-9]+").expect("valid regex"));

    let lower = topic.to_lowercase();
    NON_ALNUM_RE
        .replace_all(&lower, "-")
        .trim_matches('-')
        .to_string()
}

/// File name a topic is published under.
pub fn page_filename(topic: &str) -> String {
    format!("{}{PAGE_EXTENSION}", slugify(topic))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_question() {
        assert_eq!(slugify("What Is Love?"), "what-is-love");
    }

    #[test]
    fn slugify_strips_edge_hyphens() {
        assert_eq!(slugify("  -- test --  "), "test");
    }

    #[test]
    fn slugify_collapses_runs() {
        assert_eq!(slugify("Cats & Dogs!!! (really?)"), "cats-dogs-really");
        assert_eq!(slugify("Don't_stop"), "don-t-stop");
    }

    #[test]
    fn slugify_drops_non_ascii() {
        assert_eq!(slugify("Café au lait?"), "caf-au-lait");
        assert_eq!(slugify("¿¡!?"), "");
    }

    #[test]
    fn slugify_is_idempotent() {
        for topic in ["What Is Love?", "Why is the sky blue?", "  -- test --  ", "a1-b2"] {
            let once = slugify(topic);
            assert_eq!(slugify(&once), once);
        }
    }

    #[test]
    fn filename_has_extension() {
        assert_eq!(page_filename("Why is the sky blue?"), "why-is-the-sky-blue.html");
    }
}
