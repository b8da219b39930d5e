//! Normalize and compare language tags.
//!
//! A language tag such as `zh-cmn-Hans-CN` or `en_uk` is parsed into a
//! [`Meaning`], with deprecated codes replaced using the IANA registry and
//! CLDR. Meanings can be compared, broadened, filled in with likely values,
//! and formatted back into a standard tag.
//!
//! ```
//! use language_codes::standardize_tag;
//!
//! assert_eq!(standardize_tag("en_US", false).unwrap(), "en-US");
//! assert_eq!(standardize_tag("en-uk", false).unwrap(), "en-GB");
//! assert_eq!(standardize_tag("zh-cmn-hans-cn", true).unwrap(), "zh-Hans-CN");
//! ```
//!
//! The functions at the top level use the tables compiled into this crate.
//! To use other data, implement [`LanguageData`] and call the same methods
//! on [`Tables`].

pub use language_tag_parser::{
    normalize_characters, parse_tag, LanguageTagError, Subtag, SubtagKind,
};

mod error;
pub mod langdata;
mod meaning;
mod tables;

pub use crate::error::Error;
pub use crate::langdata::BundledData;
pub use crate::meaning::{BroaderMeanings, Meaning, UNDETERMINED};
pub use crate::tables::{LanguageData, Tables};

/// Standardize a language tag, optionally preferring macrolanguages. See
/// [`Tables::standardize_tag`].
pub fn standardize_tag(tag: &str, prefer_macro: bool) -> Result<String, Error> {
    Tables::bundled().standardize_tag(tag, prefer_macro)
}

pub fn tag_to_meaning(tag: &str, normalize: bool) -> Result<Meaning, Error> {
    Tables::bundled().tag_to_meaning(tag, normalize)
}

pub fn meaning_to_tag(meaning: &Meaning) -> String {
    meaning.to_string()
}

pub fn prefer_macrolanguage(meaning: &Meaning) -> Meaning {
    Tables::bundled().prefer_macrolanguage(meaning)
}

pub fn simplify_script(meaning: &Meaning) -> Meaning {
    Tables::bundled().simplify_script(meaning)
}

pub fn assume_script(meaning: &Meaning) -> Meaning {
    Tables::bundled().assume_script(meaning)
}

/// Determine whether `meaning2` is equal to or more specific than
/// `meaning1`.
pub fn meaning_superset(meaning1: &Meaning, meaning2: &Meaning) -> bool {
    meaning1.is_superset(meaning2)
}

pub fn broader_meanings(meaning: &Meaning) -> BroaderMeanings<'_> {
    meaning.broader_meanings()
}

pub fn fill_likely_values(meaning: &Meaning) -> Result<Meaning, Error> {
    Tables::bundled().fill_likely_values(meaning)
}

pub fn remove_likely_values(meaning: &Meaning) -> Result<Meaning, Error> {
    Tables::bundled().remove_likely_values(meaning)
}
