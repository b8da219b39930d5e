use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use language_tag_parser::{Subtag, SubtagKind};

use crate::{Error, Tables};

/// The language subtag that means "undetermined". A `Meaning` represents it
/// by leaving `language` empty.
pub const UNDETERMINED: &str = "und";

// Fields that `restrict` can keep, combined as bits.
pub(crate) const LANGUAGE: u8 = 0b0001;
pub(crate) const MACROLANGUAGE: u8 = 0b0010;
pub(crate) const SCRIPT: u8 = 0b0100;
pub(crate) const REGION: u8 = 0b1000;

/// The successively broader field sets that `broader_meanings` tries, after
/// the meaning itself.
///
/// This doesn't follow chains of macrolanguages beyond the one recorded in
/// the meaning, or regions that contain other regions.
const BROADER_FIELDS: [u8; 12] = [
    LANGUAGE | SCRIPT | REGION,
    LANGUAGE | SCRIPT,
    LANGUAGE | REGION,
    LANGUAGE,
    MACROLANGUAGE | SCRIPT | REGION,
    MACROLANGUAGE | SCRIPT,
    MACROLANGUAGE | REGION,
    MACROLANGUAGE,
    SCRIPT | REGION,
    SCRIPT,
    REGION,
    0,
];

/// What a language tag means, once its subtags have been classified and
/// looked up.
///
/// A missing `language` means the language is undetermined. `macrolanguage`
/// is only set alongside a `language` that belongs to it, such as `cmn`
/// (Mandarin) belonging to `zh` (Chinese). An empty set is the same as an
/// absent one.
#[derive(PartialEq, Eq, Hash, Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Meaning {
    pub language: Option<String>,
    pub macrolanguage: Option<String>,
    pub script: Option<String>,
    pub region: Option<String>,
    pub extlang: BTreeSet<String>,
    pub variant: BTreeSet<String>,
    pub extension: BTreeSet<String>,
    pub private: Option<String>,
}

impl Meaning {
    /// Construct a Meaning from just a language, script, and region.
    pub fn from_parts(
        language: Option<&str>,
        script: Option<&str>,
        region: Option<&str>,
    ) -> Meaning {
        Meaning {
            language: language.map(str::to_string),
            script: script.map(str::to_string),
            region: region.map(str::to_string),
            ..Meaning::default()
        }
    }

    /// Transcribe parsed subtags into a Meaning literally, without
    /// consulting any tables. Only "und" gets special treatment: it
    /// becomes an absent language.
    pub fn from_subtags(subtags: &[Subtag]) -> Meaning {
        let mut meaning = Meaning::default();
        for subtag in subtags {
            let value = subtag.value.clone();
            match subtag.kind {
                SubtagKind::Language | SubtagKind::Grandfathered => {
                    if value != UNDETERMINED {
                        meaning.language = Some(value);
                    }
                }
                SubtagKind::Extlang => {
                    meaning.extlang.insert(value);
                }
                SubtagKind::Script => meaning.script = Some(value),
                SubtagKind::Region => meaning.region = Some(value),
                SubtagKind::Variant => {
                    meaning.variant.insert(value);
                }
                SubtagKind::Extension => {
                    meaning.extension.insert(value);
                }
                SubtagKind::Private => meaning.private = Some(value),
            }
        }
        meaning
    }

    pub fn is_empty(&self) -> bool {
        *self == Meaning::default()
    }

    /// Get the language subtag, giving "und" if the language is unknown.
    pub fn language_subtag(&self) -> &str {
        self.language.as_deref().unwrap_or(UNDETERMINED)
    }

    /// Remove everything but the language (and its macrolanguage).
    pub fn language_only(&self) -> Meaning {
        self.restrict(LANGUAGE | MACROLANGUAGE)
    }

    /// Overwrite fields of `self` with the ones that are present in
    /// `other`. The language and its macrolanguage are taken as a pair.
    pub fn update(&mut self, other: Meaning) {
        if other.language.is_some() {
            self.language = other.language;
            self.macrolanguage = other.macrolanguage;
        }
        if other.script.is_some() {
            self.script = other.script;
        }
        if other.region.is_some() {
            self.region = other.region;
        }
        if !other.extlang.is_empty() {
            self.extlang = other.extlang;
        }
        if !other.variant.is_empty() {
            self.variant = other.variant;
        }
        if !other.extension.is_empty() {
            self.extension = other.extension;
        }
        if other.private.is_some() {
            self.private = other.private;
        }
    }

    /// Determine whether this meaning encompasses `other`: that is, whether
    /// `other` says everything this one says, and possibly more.
    ///
    /// This only compares values. It doesn't know, for example, that `ar`
    /// encompasses `arb`.
    pub fn is_superset(&self, other: &Meaning) -> bool {
        fn covers(mine: &Option<String>, yours: &Option<String>) -> bool {
            mine.is_none() || mine == yours
        }

        covers(&self.language, &other.language)
            && covers(&self.macrolanguage, &other.macrolanguage)
            && covers(&self.script, &other.script)
            && covers(&self.region, &other.region)
            && covers(&self.private, &other.private)
            && self.extlang.is_subset(&other.extlang)
            && self.variant.is_subset(&other.variant)
            && self.extension.is_subset(&other.extension)
    }

    /// Iterate over this meaning, followed by more general versions of it.
    /// The last one is always the empty meaning.
    pub fn broader_meanings(&self) -> BroaderMeanings<'_> {
        BroaderMeanings {
            meaning: self,
            position: 0,
        }
    }

    /// Keep only the fields named in `fields`. When a macrolanguage is kept
    /// without the language, it takes the language's place.
    pub(crate) fn restrict(&self, fields: u8) -> Meaning {
        let mut restricted = Meaning::default();
        if fields & LANGUAGE != 0 {
            restricted.language = self.language.clone();
        }
        if fields & MACROLANGUAGE != 0 {
            if fields & LANGUAGE != 0 {
                restricted.macrolanguage = self.macrolanguage.clone();
            } else {
                restricted.language = self.macrolanguage.clone();
            }
        }
        if fields & SCRIPT != 0 {
            restricted.script = self.script.clone();
        }
        if fields & REGION != 0 {
            restricted.region = self.region.clone();
        }
        restricted
    }
}

/// Formats the canonical tag: language (or "und"), script, region, sorted
/// variants, sorted extensions, then the private-use part.
impl fmt::Display for Meaning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.language_subtag())?;
        let subtags = self
            .script
            .iter()
            .chain(&self.region)
            .chain(&self.variant)
            .chain(&self.extension)
            .chain(&self.private);
        for subtag in subtags {
            write!(f, "-{}", subtag)?;
        }
        Ok(())
    }
}

impl FromStr for Meaning {
    type Err = Error;

    /// Parse and normalize a language tag using the bundled tables.
    fn from_str(s: &str) -> Result<Meaning, Error> {
        Tables::bundled().tag_to_meaning(s, true)
    }
}

/// The iterator returned by [`Meaning::broader_meanings`]. Clone it to
/// start over.
#[derive(Clone, Debug)]
pub struct BroaderMeanings<'a> {
    meaning: &'a Meaning,
    position: usize,
}

impl Iterator for BroaderMeanings<'_> {
    type Item = Meaning;

    fn next(&mut self) -> Option<Meaning> {
        if self.position == 0 {
            self.position = 1;
            return Some(self.meaning.clone());
        }
        while let Some(&fields) = BROADER_FIELDS.get(self.position - 1) {
            self.position += 1;
            // Skip restrictions that didn't remove anything
            let restricted = self.meaning.restrict(fields);
            if restricted != *self.meaning {
                return Some(restricted);
            }
        }
        None
    }
}
