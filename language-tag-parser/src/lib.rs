//! A parser for the syntax of language tags, according to BCP 47
//! (RFC 5646).
//!
//! This crate is only concerned with the shape of a tag: which subtag is the
//! language, which is the script, and so on. Looking up what those subtags
//! mean, or whether they've been replaced by something newer, happens in the
//! `language-codes` crate.
//!
//! ```
//! use language_tag_parser::{parse_tag, Subtag, SubtagKind};
//!
//! let parsed = parse_tag("zh-hant-tw").unwrap();
//! assert_eq!(parsed, vec![
//!     Subtag::new(SubtagKind::Language, "zh"),
//!     Subtag::new(SubtagKind::Script, "Hant"),
//!     Subtag::new(SubtagKind::Region, "TW"),
//! ]);
//! ```
use std::fmt;

mod error;
pub use error::LanguageTagError;

/// These tags should not be parsed by the usual parser; they're grandfathered
/// in from RFC 3066. The irregular ones don't fit the syntax at all; the
/// regular ones do, but would give meaningless results when parsed.
///
/// They're lowercased so they can be matched after `normalize_characters`.
const GRANDFATHERED: [&str; 26] = [
    // Irregular
    "en-gb-oed", "i-ami", "i-bnn", "i-default", "i-enochian", "i-hak",
    "i-klingon", "i-lux", "i-mingo", "i-navajo", "i-pwn", "i-tao", "i-tay",
    "i-tsu", "sgn-be-fr", "sgn-be-nl", "sgn-ch-de",
    // Regular
    "art-lojban", "cel-gaulish", "no-bok", "no-nyn", "zh-guoyu", "zh-hakka",
    "zh-min", "zh-min-nan", "zh-xiang",
];

/// The most extlang subtags that can follow a language.
const MAX_EXTLANGS: usize = 3;

/// What kind of information a subtag carries.
///
/// The derived ordering matters: from `Extlang` to `Extension`, it's the
/// order in which subtags have to appear after the language.
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Debug, Hash)]
pub enum SubtagKind {
    Language,
    Extlang,
    Script,
    Region,
    Variant,
    Extension,
    Private,
    Grandfathered,
}

impl SubtagKind {
    pub fn name(self) -> &'static str {
        match self {
            SubtagKind::Language => "language",
            SubtagKind::Extlang => "extlang",
            SubtagKind::Script => "script",
            SubtagKind::Region => "region",
            SubtagKind::Variant => "variant",
            SubtagKind::Extension => "extension",
            SubtagKind::Private => "private",
            SubtagKind::Grandfathered => "grandfathered",
        }
    }

    /// The kinds that are allowed to appear when the parser is expecting
    /// `self` or anything later.
    fn this_or_later(self) -> Vec<SubtagKind> {
        ORDERED_KINDS.iter().copied().filter(|&kind| kind >= self).collect()
    }
}

impl fmt::Display for SubtagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

const ORDERED_KINDS: [SubtagKind; 5] = [
    SubtagKind::Extlang,
    SubtagKind::Script,
    SubtagKind::Region,
    SubtagKind::Variant,
    SubtagKind::Extension,
];

/// One classified piece of a language tag. Scripts are title-cased and
/// regions are upper-cased; everything else is lowercase.
#[derive(PartialEq, Eq, Clone, Debug, Hash)]
pub struct Subtag {
    pub kind: SubtagKind,
    pub value: String,
}

impl Subtag {
    pub fn new(kind: SubtagKind, value: &str) -> Subtag {
        Subtag {
            kind,
            value: value.to_string(),
        }
    }
}

/// BCP 47 is case-insensitive, and considers underscores equivalent to
/// hyphens. So here we smash tags into lowercase with hyphens, so we can
/// make exact comparisons.
///
/// ```
/// assert_eq!(language_tag_parser::normalize_characters("zh-Hant_TW"), "zh-hant-tw");
/// ```
pub fn normalize_characters(tag: &str) -> String {
    tag.replace('_', "-").to_lowercase()
}

/// Parse the syntax of a language tag, without looking up anything in a
/// registry. Returns the subtags in order, each labeled with its kind.
pub fn parse_tag(tag: &str) -> Result<Vec<Subtag>, LanguageTagError> {
    let normal_tag = normalize_characters(tag);
    if GRANDFATHERED.contains(&normal_tag.as_str()) {
        return Ok(vec![Subtag::new(SubtagKind::Grandfathered, &normal_tag)]);
    }

    let subtags: Vec<&str> = normal_tag.split('-').collect();
    for subtag in &subtags {
        check_characters(subtag)?;
    }

    // The first subtag is always either the language code, or 'x' to mark
    // the entire tag as private use. The language code is distinguished
    // from other subtags only by the fact that it comes first.
    let language = subtags[0];
    if language == "x" {
        if subtags.len() == 1 {
            return Err(LanguageTagError::Unterminated {
                subtag: language.to_string(),
            });
        }
        check_block_subtags(&subtags[1..])?;
        // Whatever a private-use tag means, it fills the language slot.
        return Ok(vec![Subtag::new(SubtagKind::Language, &normal_tag)]);
    }
    // RFC 5646 section 2.1: `language = 2*3ALPHA ["-" extlang] / 4ALPHA /
    // 5*8ALPHA`, so a primary language is 2 to 8 letters and nothing else.
    if !(2..=8).contains(&language.len()) || !is_alpha(language) {
        return Err(LanguageTagError::InvalidSubtag {
            subtag: language.to_string(),
            expected: "a language code",
        });
    }

    let mut parsed = vec![Subtag::new(SubtagKind::Language, language)];
    parse_subtags(&subtags[1..], &mut parsed)?;
    Ok(parsed)
}

/// Parse everything that comes after the language subtag: extlangs,
/// scripts, regions, variants, and extensions.
///
/// `expect` tracks where we are in the required order. When it's `Region`,
/// for example, we'll accept a region or anything that's allowed to come
/// after one.
fn parse_subtags(subtags: &[&str], parsed: &mut Vec<Subtag>) -> Result<(), LanguageTagError> {
    let mut expect = SubtagKind::Extlang;
    let mut pos = 0;

    while pos < subtags.len() {
        let subtag = subtags[pos];
        let kind = match subtag.len() {
            // A singleton introduces an extension. Extensions necessarily
            // come last, so there's no order to check.
            1 => {
                pos += parse_extension(&subtags[pos..], parsed)?;
                expect = SubtagKind::Extension;
                continue;
            }
            2 if is_alpha(subtag) => SubtagKind::Region,
            3 if is_alpha(subtag) => {
                // Three-letter subtags can only be extlangs, and up to three
                // of them can appear in a row right after the language.
                if expect > SubtagKind::Extlang {
                    return Err(order_error(subtag, SubtagKind::Extlang, expect));
                }
                let count = subtags[pos..]
                    .iter()
                    .take(MAX_EXTLANGS)
                    .take_while(|extlang| extlang.len() == 3 && is_alpha(extlang))
                    .count();
                for extlang in &subtags[pos..pos + count] {
                    parsed.push(Subtag::new(SubtagKind::Extlang, extlang));
                }
                pos += count;
                expect = SubtagKind::Script;
                continue;
            }
            // Three-digit regions are UN M.49 areas, such as 419 for Latin
            // America.
            3 if is_digit(subtag) => SubtagKind::Region,
            4 if is_alpha(subtag) => SubtagKind::Script,
            4 if starts_with_digit(subtag) => SubtagKind::Variant,
            5..=8 => SubtagKind::Variant,
            0 | 9.. => {
                return Err(LanguageTagError::InvalidSubtag {
                    subtag: subtag.to_string(),
                    expected: "1-8 characters",
                });
            }
            _ => {
                return Err(LanguageTagError::InvalidSubtag {
                    subtag: subtag.to_string(),
                    expected: "a valid subtag",
                });
            }
        };

        if kind < expect {
            return Err(order_error(subtag, kind, expect));
        }

        // There can be at most one script and one region, so after those
        // we expect something strictly later. Variants can repeat.
        expect = match kind {
            SubtagKind::Script => SubtagKind::Region,
            SubtagKind::Region => SubtagKind::Variant,
            _ => kind,
        };
        parsed.push(Subtag {
            kind,
            value: capitalize(kind, subtag),
        });
        pos += 1;
    }
    Ok(())
}

/// Parse an extension, starting at its singleton, and return how many
/// subtags it consumed.
///
/// The private-use singleton 'x' consumes the rest of the tag, because
/// nothing after it has a meaning defined by the standard. Any other
/// singleton runs until the next singleton, so `en-u-x-foo` is an empty
/// `u` extension followed by private use. Only a singleton at the very end
/// of the tag is an error.
fn parse_extension(subtags: &[&str], parsed: &mut Vec<Subtag>) -> Result<usize, LanguageTagError> {
    let singleton = subtags[0];
    if subtags.len() == 1 {
        return Err(LanguageTagError::Unterminated {
            subtag: singleton.to_string(),
        });
    }

    let boundary = if singleton == "x" {
        subtags.len()
    } else {
        subtags
            .iter()
            .skip(1)
            .position(|subtag| subtag.len() == 1)
            .map_or(subtags.len(), |offset| offset + 1)
    };

    let block = &subtags[..boundary];
    check_block_subtags(&block[1..])?;
    let kind = if singleton == "x" {
        SubtagKind::Private
    } else {
        SubtagKind::Extension
    };
    parsed.push(Subtag::new(kind, &block.join("-")));
    Ok(boundary)
}

/// The contents of extensions and private-use blocks aren't classified,
/// but they can't be empty: RFC 5646 section 2.1 builds them from
/// `1*8alphanum` subtags, and two hyphens in a row leave nothing between
/// them.
fn check_block_subtags(subtags: &[&str]) -> Result<(), LanguageTagError> {
    match subtags.iter().find(|subtag| subtag.is_empty()) {
        Some(subtag) => Err(LanguageTagError::InvalidSubtag {
            subtag: subtag.to_string(),
            expected: "a non-empty subtag",
        }),
        None => Ok(()),
    }
}

fn order_error(subtag: &str, kind: SubtagKind, expect: SubtagKind) -> LanguageTagError {
    LanguageTagError::OutOfOrder {
        subtag: subtag.to_string(),
        kind,
        expected: expect.this_or_later(),
    }
}

/// Apply the conventional capitalization for a subtag of this kind.
fn capitalize(kind: SubtagKind, subtag: &str) -> String {
    match kind {
        SubtagKind::Script => {
            let (first_letter, rest_letters) = subtag.split_at(1);
            first_letter.to_uppercase() + rest_letters
        }
        SubtagKind::Region => subtag.to_uppercase(),
        _ => subtag.to_string(),
    }
}

fn check_characters(subtag: &str) -> Result<(), LanguageTagError> {
    if subtag.bytes().all(|b| b.is_ascii_digit() || b.is_ascii_lowercase()) {
        Ok(())
    } else {
        Err(LanguageTagError::InvalidCharacter {
            subtag: subtag.to_string(),
        })
    }
}

fn is_alpha(subtag: &str) -> bool {
    subtag.bytes().all(|b| b.is_ascii_alphabetic())
}

fn is_digit(subtag: &str) -> bool {
    subtag.bytes().all(|b| b.is_ascii_digit())
}

fn starts_with_digit(subtag: &str) -> bool {
    subtag.bytes().next().is_some_and(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use SubtagKind::*;

    fn parses_to(tag: &str, expected: &[(SubtagKind, &str)]) {
        let parsed = parse_tag(tag).unwrap();
        let expected: Vec<Subtag> = expected
            .iter()
            .map(|&(kind, value)| Subtag::new(kind, value))
            .collect();
        assert_eq!(parsed, expected, "parsing {tag:?}");
    }

    fn fails_with(tag: &str, message: &str) {
        let err = parse_tag(tag).unwrap_err();
        assert_eq!(err.to_string(), message, "parsing {tag:?}");
    }

    #[test]
    fn test_normalize_characters() {
        assert_eq!(normalize_characters("en_US"), "en-us");
        assert_eq!(normalize_characters("zh-Hant_TW"), "zh-hant-tw");
    }

    #[test]
    fn test_parse() {
        parses_to("en", &[(Language, "en")]);
        parses_to("en_US", &[(Language, "en"), (Region, "US")]);
        parses_to("en-Latn", &[(Language, "en"), (Script, "Latn")]);
        parses_to("es-419", &[(Language, "es"), (Region, "419")]);
        parses_to("zh-hant-tw", &[(Language, "zh"), (Script, "Hant"), (Region, "TW")]);
        parses_to("de-DE-1901", &[(Language, "de"), (Region, "DE"), (Variant, "1901")]);
        parses_to(
            "ja-latn-hepburn",
            &[(Language, "ja"), (Script, "Latn"), (Variant, "hepburn")],
        );
        parses_to(
            "sl-rozaj-biske-1994",
            &[(Language, "sl"), (Variant, "rozaj"), (Variant, "biske"), (Variant, "1994")],
        );
    }

    #[test]
    fn test_extlang() {
        parses_to("zh-yue", &[(Language, "zh"), (Extlang, "yue")]);
        parses_to("zh-yue-Hant", &[(Language, "zh"), (Extlang, "yue"), (Script, "Hant")]);
        parses_to(
            "zh-aaa-bbb-ccc",
            &[(Language, "zh"), (Extlang, "aaa"), (Extlang, "bbb"), (Extlang, "ccc")],
        );
        parses_to("zh-yue-419", &[(Language, "zh"), (Extlang, "yue"), (Region, "419")]);
        fails_with(
            "zh-aaa-bbb-ccc-ddd",
            "This extlang subtag, 'ddd', is out of place. \
             Expected script, region, variant, extension, or end of string.",
        );
        fails_with(
            "en-US-yue",
            "This extlang subtag, 'yue', is out of place. \
             Expected variant, extension, or end of string.",
        );
    }

    #[test]
    fn test_grandfathered() {
        parses_to("zh-min-nan", &[(Grandfathered, "zh-min-nan")]);
        parses_to("i-Klingon", &[(Grandfathered, "i-klingon")]);
        parses_to("en-GB-oed", &[(Grandfathered, "en-gb-oed")]);
    }

    #[test]
    fn test_private_use() {
        parses_to("x-dothraki", &[(Language, "x-dothraki")]);
        parses_to(
            "en-u-co-backwards-x-pig-latin",
            &[(Language, "en"), (Extension, "u-co-backwards"), (Private, "x-pig-latin")],
        );
        parses_to(
            "en-x-pig-latin-u-co-backwards",
            &[(Language, "en"), (Private, "x-pig-latin-u-co-backwards")],
        );
        parses_to(
            "de-a-value-b-other",
            &[(Language, "de"), (Extension, "a-value"), (Extension, "b-other")],
        );
    }

    #[test]
    fn test_singleton_followed_by_singleton() {
        // An extension stops at the next singleton, even if that leaves it
        // with nothing but its singleton
        parses_to("en-a-b-foo", &[(Language, "en"), (Extension, "a"), (Extension, "b-foo")]);
        parses_to("en-u-x-foo", &[(Language, "en"), (Extension, "u"), (Private, "x-foo")]);
    }

    #[test]
    fn test_order_errors() {
        fails_with(
            "zh-tw-hant",
            "This script subtag, 'hant', is out of place. \
             Expected variant, extension, or end of string.",
        );
        fails_with(
            "ja-hepburn-latn",
            "This script subtag, 'latn', is out of place. \
             Expected variant, extension, or end of string.",
        );
        fails_with(
            "en-latn-cyrl",
            "This script subtag, 'cyrl', is out of place. \
             Expected region, variant, extension, or end of string.",
        );
        match parse_tag("zh-tw-hant") {
            Err(LanguageTagError::OutOfOrder { kind, expected, .. }) => {
                assert_eq!(kind, Script);
                assert_eq!(expected, vec![Variant, Extension]);
            }
            other => panic!("unexpected result {other:?}"),
        }
    }

    #[test]
    fn test_malformed() {
        fails_with("u-co-backwards", "Expected a language code, got 'u'");
        fails_with("", "Expected a language code, got ''");
        fails_with("x", "The subtag 'x' must be followed by something");
        fails_with("en-x", "The subtag 'x' must be followed by something");
        fails_with("en-u", "The subtag 'u' must be followed by something");
        fails_with("en-u-x", "The subtag 'x' must be followed by something");
        fails_with("abcdefghi", "Expected a language code, got 'abcdefghi'");
        fails_with("e1", "Expected a language code, got 'e1'");
        fails_with("en-toolongvariant", "Expected 1-8 characters, got 'toolongvariant'");
        fails_with("en--us", "Expected 1-8 characters, got ''");
        fails_with("en-x-pig--latin", "Expected a non-empty subtag, got ''");
        fails_with("en-1a", "Expected a valid subtag, got '1a'");
        fails_with("en-a1b", "Expected a valid subtag, got 'a1b'");
        assert_eq!(
            parse_tag("en-Ü"),
            Err(LanguageTagError::InvalidCharacter { subtag: "ü".to_string() })
        );
    }
}
