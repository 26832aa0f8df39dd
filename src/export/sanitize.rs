//! Text normalization for the exported transcript.
//!
//! Compatibility decomposition (NFKD) first, so `é` becomes `e` + a combining
//! accent and `ﬁ` becomes `fi`; then everything outside printable ASCII and
//! `\n` is dropped. Nothing is transliterated: what doesn't survive
//! decomposition is lost.

use unicode_normalization::UnicodeNormalization;

/// Characters allowed through to the document: printable ASCII plus newline.
pub fn is_permitted(c: char) -> bool {
    c == '\n' || (' '..='~').contains(&c)
}

pub fn sanitize(text: &str) -> String {
    text.nfkd().filter(|c| is_permitted(*c)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: &[&str] = &[
        "plain ascii",
        "café crème brûlée",
        "ﬁne ligatures",
        "Hello 👋 world",
        "tabs\tand\r\nCRLF",
        "日本語のテキスト",
        "① ½ ™",
        "",
    ];

    #[test]
    fn test_accents_are_stripped_not_dropped() {
        assert_eq!(sanitize("café crème"), "cafe creme");
    }

    #[test]
    fn test_compatibility_forms_are_decomposed() {
        assert_eq!(sanitize("ﬁne"), "fine");
        assert_eq!(sanitize("①"), "1");
        assert_eq!(sanitize("™"), "TM");
    }

    #[test]
    fn test_unrepresentable_characters_are_dropped() {
        assert_eq!(sanitize("Hello 👋 world"), "Hello  world");
        assert_eq!(sanitize("日本語"), "");
        assert_eq!(sanitize("a\tb\r\nc"), "ab\nc");
    }

    #[test]
    fn test_output_stays_in_permitted_set() {
        for sample in SAMPLES {
            assert!(sanitize(sample).chars().all(is_permitted), "{sample:?}");
        }
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        for sample in SAMPLES {
            let once = sanitize(sample);
            assert_eq!(sanitize(&once), once, "{sample:?}");
        }
    }
}
