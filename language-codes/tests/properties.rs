use language_codes::{
    broader_meanings, fill_likely_values, meaning_superset, parse_tag, remove_likely_values,
    standardize_tag, tag_to_meaning, Meaning,
};
use proptest::prelude::*;
use proptest::sample::select;

// Languages with interesting replacements, macrolanguages, and default
// scripts, plus some with none of those.
const LANGUAGES: &[&str] = &[
    "en", "fr", "zh", "cmn", "sh", "sr", "in", "iw", "ja", "und", "ar", "arb", "no", "nb", "mo",
    "eee", "yue", "tl",
];
const SCRIPTS: &[&str] = &["Latn", "Cyrl", "Hans", "Hant", "Arab", "Hebr", "Qaai", "Zinh", "Jpan"];
const REGIONS: &[&str] = &["US", "GB", "UK", "CN", "TW", "419", "840", "DD", "QU", "EU", "BR"];
const VARIANTS: &[&str] = &["1901", "hepburn", "fonipa", "valencia"];
const EXTENSIONS: &[&str] = &["u-co-phonebk", "t-en"];
const PRIVATE: &[&str] = &["x-private", "x-pig-latin"];

fn tag_strategy() -> impl Strategy<Value = String> {
    (
        select(LANGUAGES),
        proptest::option::of(select(SCRIPTS)),
        proptest::option::of(select(REGIONS)),
        proptest::collection::btree_set(select(VARIANTS), 0..3),
        proptest::option::of(select(EXTENSIONS)),
        proptest::option::of(select(PRIVATE)),
    )
        .prop_map(|(language, script, region, variants, extension, private)| {
            let mut subtags = vec![language];
            subtags.extend(script);
            subtags.extend(region);
            subtags.extend(variants);
            subtags.extend(extension);
            subtags.extend(private);
            subtags.join("-")
        })
}

fn meaning_strategy() -> impl Strategy<Value = Meaning> {
    tag_strategy()
        .prop_map(|tag| tag_to_meaning(&tag, true).expect("generated tags are well-formed"))
}

/// Scramble the case of a tag, and use underscores for some of its hyphens.
fn scramble(tag: &str, flips: &[bool]) -> String {
    tag.chars()
        .zip(flips.iter().cycle())
        .map(|(ch, &flip)| match ch {
            '-' if flip => '_',
            _ if flip => ch.to_ascii_uppercase(),
            _ => ch.to_ascii_lowercase(),
        })
        .collect()
}

proptest! {
    #[test]
    fn parsing_ignores_case_and_separators(
        tag in tag_strategy(),
        flips in proptest::collection::vec(any::<bool>(), 1..16),
    ) {
        prop_assert_eq!(parse_tag(&scramble(&tag, &flips)), parse_tag(&tag));
    }

    #[test]
    fn standardizing_is_idempotent(tag in tag_strategy(), prefer_macro in any::<bool>()) {
        let once = standardize_tag(&tag, prefer_macro).unwrap();
        let twice = standardize_tag(&once, prefer_macro).unwrap();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn formatting_inverts_literal_parsing(tag in tag_strategy()) {
        // Generated tags list their subtags in canonical order already
        let literal = tag_to_meaning(&tag, false).unwrap();
        prop_assert_eq!(literal.to_string(), tag);
    }

    #[test]
    fn superset_is_reflexive_and_antisymmetric(a in meaning_strategy(), b in meaning_strategy()) {
        prop_assert!(meaning_superset(&a, &a));
        if meaning_superset(&a, &b) && meaning_superset(&b, &a) {
            prop_assert_eq!(a, b);
        }
    }

    #[test]
    fn broadening_ends_with_nothing(meaning in meaning_strategy()) {
        let broader: Vec<Meaning> = broader_meanings(&meaning).collect();
        prop_assert_eq!(broader.first(), Some(&meaning));
        prop_assert_eq!(broader.last(), Some(&Meaning::default()));
        prop_assert!(meaning_superset(&Meaning::default(), &meaning));
    }

    #[test]
    fn filling_keeps_what_was_there(meaning in meaning_strategy()) {
        let filled = fill_likely_values(&meaning).unwrap();
        prop_assert!(meaning_superset(&meaning, &filled));
        prop_assert!(filled.language.is_some());
        prop_assert!(filled.script.is_some());
        prop_assert!(filled.region.is_some());
    }

    #[test]
    fn removing_likely_values_can_be_undone(meaning in meaning_strategy()) {
        let minimal = remove_likely_values(&meaning).unwrap();
        prop_assert_eq!(
            fill_likely_values(&minimal).unwrap().to_string(),
            fill_likely_values(&meaning).unwrap().to_string()
        );
    }
}
