//! Lookup tables generated by `build.rs` from the registry and CLDR files in
//! the data directory.

use crate::tables::LanguageData;

include!(concat!(env!("OUT_DIR"), "/langdata.rs"));

/// The data that was compiled into this crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct BundledData;

fn pairs(map: &phf::Map<&'static str, &'static str>) -> Vec<(String, String)> {
    map.entries()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

impl LanguageData for BundledData {
    fn language_replacements(&self, prefer_macro: bool) -> Vec<(String, String)> {
        if prefer_macro {
            pairs(&MACROLANGUAGE_REPLACE)
        } else {
            pairs(&LANGUAGE_REPLACE)
        }
    }

    fn macrolanguages(&self) -> Vec<(String, String)> {
        pairs(&MACROLANGUAGES)
    }

    fn region_replacements(&self) -> Vec<(String, String)> {
        pairs(&REGION_REPLACE)
    }

    fn script_replacements(&self) -> Vec<(String, String)> {
        pairs(&SCRIPT_REPLACE)
    }

    fn suppressed_scripts(&self) -> Vec<(String, String)> {
        pairs(&SUPPRESS_SCRIPT)
    }

    fn likely_subtags(&self) -> Vec<(String, String)> {
        pairs(&LIKELY_SUBTAGS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_tables() {
        assert_eq!(LANGUAGE_REPLACE.get("sgn-us"), Some(&"ase"));
        assert_eq!(LANGUAGE_REPLACE.get("zh-cmn"), Some(&"cmn"));
        assert_eq!(LANGUAGE_REPLACE.get("sh"), Some(&"sr-latn"));
        assert_eq!(LANGUAGE_REPLACE.get("cmn"), None);
        assert_eq!(MACROLANGUAGE_REPLACE.get("cmn"), Some(&"zh"));
        assert_eq!(MACROLANGUAGES.get("sr"), Some(&"sh"));
        assert_eq!(REGION_REPLACE.get("UK"), Some(&"GB"));
        assert_eq!(REGION_REPLACE.get("YU"), None);
        assert_eq!(SCRIPT_REPLACE.get("Qaai"), Some(&"Zinh"));
        assert_eq!(SUPPRESS_SCRIPT.get("en"), Some(&"Latn"));
        assert_eq!(LIKELY_SUBTAGS.get("und"), Some(&"en-Latn-US"));
    }
}
