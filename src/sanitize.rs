/// Filesystem-safe folder names.
///
/// Titles pulled out of release filenames can contain characters that are
/// reserved on at least one common filesystem. They are replaced with an
/// underscore so the same title always maps to the same folder on every
/// platform.
use regex::Regex;
use std::sync::LazyLock;

static RESERVED_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[\\/:*?"<>|]"#).expect("valid reserved character class"));

/// The characters replaced by [`sanitize`].
pub const RESERVED: [char; 9] = ['\\', '/', ':', '*', '?', '"', '<', '>', '|'];

/// Replaces every reserved character with `_` and trims surrounding whitespace.
///
/// # Examples
///
/// ```
/// use mediatidy::sanitize::sanitize;
///
/// assert_eq!(sanitize("Fate/Zero"), "Fate_Zero");
/// assert_eq!(sanitize("  Re: Life?  "), "Re_ Life_");
/// assert_eq!(sanitize(""), "");
/// ```
pub fn sanitize(name: &str) -> String {
    RESERVED_CHARS.replace_all(name, "_").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: &[&str] = &[
        "",
        "   ",
        "Plain Title",
        "Steins;Gate",
        "Fate/stay night: UBW",
        "What?! <Really> \"quoted\" a|b c*d e\\f",
        "\t Trailing and leading \n",
        "////",
        "Nausicaä of the Valley of the Wind",
    ];

    #[test]
    fn test_replaces_each_reserved_char() {
        for c in RESERVED {
            let input = format!("a{}b", c);
            assert_eq!(sanitize(&input), "a_b", "reserved char {:?}", c);
        }
    }

    #[test]
    fn test_trims_whitespace_after_replacement() {
        assert_eq!(sanitize("  Title  "), "Title");
        // Replacement happens first, so an underscore at the edge survives the trim
        assert_eq!(sanitize(" :Title: "), "_Title_");
    }

    #[test]
    fn test_leaves_other_characters_alone() {
        assert_eq!(sanitize("Steins;Gate 0"), "Steins;Gate 0");
        assert_eq!(sanitize("Nausicaä"), "Nausicaä");
    }

    #[test]
    fn test_empty_and_blank_input() {
        assert_eq!(sanitize(""), "");
        assert_eq!(sanitize(" \t "), "");
    }

    #[test]
    fn test_output_never_contains_reserved_chars() {
        for sample in SAMPLES {
            let out = sanitize(sample);
            assert!(
                !out.contains(RESERVED.as_slice()),
                "{:?} left a reserved char in {:?}",
                sample,
                out
            );
        }
    }

    #[test]
    fn test_idempotent() {
        for sample in SAMPLES {
            let once = sanitize(sample);
            assert_eq!(sanitize(&once), once, "not idempotent for {:?}", sample);
        }
    }
}
