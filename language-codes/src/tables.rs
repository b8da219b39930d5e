use std::collections::HashMap;

use language_tag_parser::{normalize_characters, parse_tag, Subtag, SubtagKind};
use lazy_static::lazy_static;
use tracing::{debug, error, trace};

use crate::langdata::BundledData;
use crate::meaning::{Meaning, LANGUAGE, MACROLANGUAGE, REGION, SCRIPT, UNDETERMINED};
use crate::Error;

/// How many replacements can be applied in a chain before we decide the
/// tables contain a cycle.
const MAX_REPLACEMENT_DEPTH: usize = 8;

/// Fields that likely-subtag completion fills in.
const LIKELY_FIELDS: u8 = LANGUAGE | MACROLANGUAGE | SCRIPT | REGION;

/// Candidates for `remove_likely_values`, shortest first. Scripts are
/// favored over regions: `zh-Hant`, not `zh-TW`.
const MINIMAL_FIELDS: [u8; 3] = [
    LANGUAGE | MACROLANGUAGE,
    LANGUAGE | MACROLANGUAGE | SCRIPT,
    LANGUAGE | MACROLANGUAGE | REGION,
];

lazy_static! {
    static ref BUNDLED: Tables = match Tables::from_data(&BundledData) {
        Ok(tables) => tables,
        Err(err) => panic!("the bundled language data is unusable: {}", err),
    };
}

/// A source of the registry and CLDR mappings that normalization depends on.
/// Each method returns (key, value) pairs; keys don't need to be in any
/// particular case.
pub trait LanguageData {
    /// Codes that should be replaced unconditionally when `prefer_macro` is
    /// false, or codes that CLDR would rather replace with a macrolanguage
    /// when it's true.
    fn language_replacements(&self, prefer_macro: bool) -> Vec<(String, String)>;

    /// Languages mapped to the macrolanguages that contain them.
    fn macrolanguages(&self) -> Vec<(String, String)>;

    /// Regions that have been renamed, merged, or re-coded.
    fn region_replacements(&self) -> Vec<(String, String)>;

    fn script_replacements(&self) -> Vec<(String, String)> {
        Vec::new()
    }

    /// The script that a language is written in by default, which doesn't
    /// need to appear in its tag.
    fn suppressed_scripts(&self) -> Vec<(String, String)>;

    /// The most likely full tag for a partial tag. There must be an entry
    /// for "und".
    fn likely_subtags(&self) -> Vec<(String, String)>;
}

/// Lookup tables, normalized and indexed for the operations on meanings.
///
/// These are read-only once they're built. Most code will use the tables
/// compiled into this crate, through [`Tables::bundled`] or the functions at
/// the top level of the crate.
#[derive(Debug, Clone)]
pub struct Tables {
    language_replace: HashMap<String, String>,
    macro_replace: HashMap<String, String>,
    macrolanguages: HashMap<String, String>,
    region_replace: HashMap<String, String>,
    script_replace: HashMap<String, String>,
    suppress_script: HashMap<String, String>,
    likely_subtags: HashMap<String, String>,
}

fn title_case(code: &str) -> String {
    let lower = code.to_lowercase();
    let mut chars = lower.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => lower,
    }
}

fn index(
    pairs: Vec<(String, String)>,
    key_case: fn(&str) -> String,
    value_case: fn(&str) -> String,
) -> HashMap<String, String> {
    pairs
        .into_iter()
        .map(|(key, value)| (key_case(&key), value_case(&value)))
        .collect()
}

fn und_with(subtag: &str) -> String {
    format!("{}-{}", UNDETERMINED, subtag)
}

/// Make sure every value in a replacement table is something the parser
/// accepts, so a bad table is blamed on the data instead of on whatever tag
/// happens to trigger the replacement. `as_tag` turns a bare region or
/// script into a tag that can be parsed.
fn check_replacements(
    name: &str,
    table: &HashMap<String, String>,
    as_tag: fn(&str) -> String,
) -> Result<(), Error> {
    for (key, value) in table {
        if let Err(err) = parse_tag(&as_tag(value)) {
            error!(table = name, %key, %value, "replacement isn't a well-formed tag");
            return Err(Error::TableInconsistency(format!(
                "{} replacement for {:?}: {}",
                name, key, err
            )));
        }
    }
    Ok(())
}

impl Tables {
    /// The tables built from the data compiled into this crate. They're
    /// built the first time they're needed.
    pub fn bundled() -> &'static Tables {
        &BUNDLED
    }

    /// Build tables from any source of language data.
    ///
    /// Fails if any likely-subtags entry or replacement value isn't
    /// well-formed, or if there's no likely-subtags entry for "und", which
    /// every completion ultimately falls back on.
    pub fn from_data<D: LanguageData + ?Sized>(data: &D) -> Result<Tables, Error> {
        let mut likely_subtags = HashMap::new();
        for (key, value) in data.likely_subtags() {
            let parsed_key = parse_tag(&key).map_err(|err| {
                Error::TableInconsistency(format!("likely subtags key {:?}: {}", key, err))
            })?;
            parse_tag(&value).map_err(|err| {
                Error::TableInconsistency(format!("likely subtags for {:?}: {}", key, err))
            })?;
            // Index by the same canonical form that completion will look up
            likely_subtags.insert(Meaning::from_subtags(&parsed_key).to_string(), value);
        }
        if !likely_subtags.contains_key(UNDETERMINED) {
            return Err(Error::TableInconsistency(
                "there are no likely subtags for \"und\"".to_string(),
            ));
        }

        let tables = Tables {
            language_replace: index(
                data.language_replacements(false),
                normalize_characters,
                normalize_characters,
            ),
            macro_replace: index(
                data.language_replacements(true),
                normalize_characters,
                normalize_characters,
            ),
            macrolanguages: index(data.macrolanguages(), str::to_lowercase, str::to_lowercase),
            region_replace: index(data.region_replacements(), str::to_uppercase, str::to_uppercase),
            script_replace: index(data.script_replacements(), title_case, title_case),
            suppress_script: index(data.suppressed_scripts(), str::to_lowercase, title_case),
            likely_subtags,
        };
        check_replacements("language", &tables.language_replace, str::to_string)?;
        check_replacements("macrolanguage", &tables.macro_replace, str::to_string)?;
        check_replacements("containing macrolanguage", &tables.macrolanguages, str::to_string)?;
        check_replacements("region", &tables.region_replace, und_with)?;
        check_replacements("script", &tables.script_replace, und_with)?;
        debug!(
            language_replacements = tables.language_replace.len(),
            macrolanguage_replacements = tables.macro_replace.len(),
            macrolanguages = tables.macrolanguages.len(),
            region_replacements = tables.region_replace.len(),
            suppressed_scripts = tables.suppress_script.len(),
            likely_subtags = tables.likely_subtags.len(),
            "built language tables"
        );
        Ok(tables)
    }

    /// Parse a language tag and determine what it means.
    ///
    /// With `normalize`, deprecated codes are replaced by their current
    /// versions, extlangs are promoted to languages when possible, and
    /// languages are annotated with their macrolanguages. Without it, the
    /// result is a literal transcription of the tag.
    pub fn tag_to_meaning(&self, tag: &str, normalize: bool) -> Result<Meaning, Error> {
        if normalize {
            self.normalized_meaning(tag, 0)
        } else {
            Ok(Meaning::from_subtags(&parse_tag(tag)?))
        }
    }

    fn normalized_meaning(&self, tag: &str, depth: usize) -> Result<Meaning, Error> {
        if depth > MAX_REPLACEMENT_DEPTH {
            error!(tag, "language replacements don't settle");
            return Err(Error::TableInconsistency(format!(
                "the replacements for {:?} form a cycle",
                tag
            )));
        }

        // Some entire tags, such as sign languages written with a country
        // code, are replaced as a unit instead of subtag by subtag.
        let normal_tag = normalize_characters(tag);
        let tag = match self.language_replace.get(&normal_tag) {
            Some(replacement) => {
                trace!(from = %normal_tag, to = %replacement, "replacing tag");
                replacement.as_str()
            }
            None => tag,
        };

        let mut meaning = Meaning::default();
        for Subtag { kind, value } in parse_tag(tag)? {
            match kind {
                SubtagKind::Language => {
                    if value == UNDETERMINED {
                        continue;
                    }
                    match self.language_replace.get(&value) {
                        // The replacement can have more than one subtag, as
                        // when "sh" becomes "sr-Latn", so it's parsed too.
                        Some(replacement) => {
                            trace!(from = %value, to = %replacement, "replacing language");
                            let replaced = self.normalized_meaning(replacement, depth + 1)?;
                            meaning.update(replaced);
                        }
                        None => {
                            meaning.macrolanguage = self.macrolanguages.get(&value).cloned();
                            meaning.language = Some(value);
                        }
                    }
                }
                SubtagKind::Extlang => {
                    // "zh-yue" collapses into "yue" when the tables say so.
                    let smashed = meaning.language.as_ref().and_then(|language| {
                        self.language_replace.get(&format!("{}-{}", language, value))
                    });
                    match smashed {
                        Some(replacement) => {
                            trace!(extlang = %value, to = %replacement, "promoting extlang");
                            let replaced = self.normalized_meaning(replacement, depth + 1)?;
                            meaning.update(replaced);
                        }
                        None => {
                            meaning.extlang.insert(value);
                        }
                    }
                }
                SubtagKind::Script => {
                    let script = self.script_replace.get(&value).cloned();
                    meaning.script = Some(script.unwrap_or(value));
                }
                SubtagKind::Region => {
                    let region = match self.region_replace.get(&value) {
                        Some(replacement) => {
                            trace!(from = %value, to = %replacement, "replacing region");
                            replacement.clone()
                        }
                        None => value,
                    };
                    meaning.region = Some(region);
                }
                SubtagKind::Variant => {
                    meaning.variant.insert(value);
                }
                SubtagKind::Extension => {
                    meaning.extension.insert(value);
                }
                SubtagKind::Private => meaning.private = Some(value),
                // Grandfathered tags with no replacement don't decompose, so
                // they stand in for the language, like private-use tags.
                SubtagKind::Grandfathered => meaning.language = Some(value),
            }
        }
        Ok(meaning)
    }

    /// Standardize a language tag:
    ///
    /// - Replace deprecated values with their updated versions
    /// - Remove script subtags that are redundant with the language
    /// - If `prefer_macro` is true, use a macrolanguage to represent the
    ///   most common language within it: `cmn` (Mandarin) becomes `zh`
    ///   (Chinese). BCP 47 doesn't require this, but CLDR does.
    /// - Format the result according to the conventions of BCP 47
    pub fn standardize_tag(&self, tag: &str, prefer_macro: bool) -> Result<String, Error> {
        let mut meaning = self.tag_to_meaning(tag, true)?;
        if prefer_macro {
            meaning = self.prefer_macrolanguage(&meaning);
        }
        Ok(self.simplify_script(&meaning).to_string())
    }

    /// Replace the language with its macrolanguage, if CLDR prefers the
    /// macrolanguage for it.
    pub fn prefer_macrolanguage(&self, meaning: &Meaning) -> Meaning {
        let replacement = meaning
            .language
            .as_ref()
            .and_then(|language| self.macro_replace.get(language));
        match replacement {
            Some(macro_lang) => Meaning {
                language: Some(macro_lang.clone()),
                macrolanguage: None,
                ..meaning.clone()
            },
            None => meaning.clone(),
        }
    }

    /// Remove the script if it's the one the language is written in by
    /// default.
    pub fn simplify_script(&self, meaning: &Meaning) -> Meaning {
        match (&meaning.language, &meaning.script) {
            (Some(language), Some(script))
                if self.suppress_script.get(language) == Some(script) =>
            {
                Meaning {
                    script: None,
                    ..meaning.clone()
                }
            }
            _ => meaning.clone(),
        }
    }

    /// Fill in the script if it's missing and the language has a default
    /// script. This is the opposite of `simplify_script`.
    pub fn assume_script(&self, meaning: &Meaning) -> Meaning {
        match (&meaning.language, &meaning.script) {
            (Some(language), None) => Meaning {
                script: self.suppress_script.get(language).cloned(),
                ..meaning.clone()
            },
            _ => meaning.clone(),
        }
    }

    /// Fill in the most likely language, script, and region for what's
    /// missing, keeping everything the meaning already specifies. This is
    /// the "add likely subtags" operation of UTS #35.
    pub fn fill_likely_values(&self, meaning: &Meaning) -> Result<Meaning, Error> {
        for broader in meaning.broader_meanings() {
            if let Some(likely) = self.likely_subtags.get(&broader.to_string()) {
                let mut filled = self.tag_to_meaning(likely, true)?;
                filled.update(meaning.clone());
                return Ok(filled);
            }
        }
        error!(%meaning, "no likely subtags apply, not even for \"und\"");
        Err(Error::TableInconsistency(format!(
            "couldn't fill in likely values for {:?}",
            meaning.to_string()
        )))
    }

    /// Remove any language, script, or region that `fill_likely_values`
    /// would add back. This is the "remove likely subtags" operation of
    /// UTS #35. Variants, extensions, and private use are kept.
    pub fn remove_likely_values(&self, meaning: &Meaning) -> Result<Meaning, Error> {
        let max = self.fill_likely_values(meaning)?.restrict(LIKELY_FIELDS);
        for fields in MINIMAL_FIELDS {
            let candidate = max.restrict(fields);
            if self.fill_likely_values(&candidate)?.restrict(LIKELY_FIELDS) == max {
                return Ok(Meaning {
                    language: candidate.language,
                    macrolanguage: candidate.macrolanguage,
                    script: candidate.script,
                    region: candidate.region,
                    ..meaning.clone()
                });
            }
        }
        Ok(meaning.clone())
    }
}
