//! Build the lookup tables in `langdata.rs` from the IANA Language Subtag
//! Registry and CLDR's supplemental data.
//!
//! The data directory defaults to `data/` in this crate; set
//! `LANGUAGE_DATA_DIR` to build against a complete download instead.

use std::collections::BTreeMap;
use std::env;
use std::error::Error;
use std::fs::{self, File};
use std::io::prelude::*;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use language_tag_parser::{normalize_characters, parse_tag};

type BuildResult<T> = Result<T, Box<dyn Error>>;
type Table = BTreeMap<String, String>;

/// One `%%`-separated record of the registry, as (field, value) pairs in
/// the order they appear.
struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value.as_str())
    }
}

fn data_dir() -> BuildResult<PathBuf> {
    println!("cargo:rerun-if-env-changed=LANGUAGE_DATA_DIR");
    match env::var_os("LANGUAGE_DATA_DIR") {
        Some(dir) => Ok(PathBuf::from(dir)),
        None => Ok(Path::new(&env::var("CARGO_MANIFEST_DIR")?).join("data")),
    }
}

fn read_text(path: &Path) -> BuildResult<String> {
    println!("cargo:rerun-if-changed={}", path.display());
    fs::read_to_string(path).map_err(|err| format!("can't read {}: {}", path.display(), err).into())
}

fn read_json(path: &Path) -> BuildResult<json::JsonValue> {
    let text = read_text(path)?;
    json::parse(&text).map_err(|err| format!("can't parse {}: {}", path.display(), err).into())
}

/// Read the registry's record-jar format. Lines that start with whitespace
/// continue the previous field.
fn read_registry(path: &Path) -> BuildResult<Vec<Record>> {
    let text = read_text(path)?;
    let mut records = Vec::new();
    let mut fields: Vec<(String, String)> = Vec::new();
    for (lineno, line) in text.lines().enumerate() {
        if line == "%%" {
            records.push(Record { fields });
            fields = Vec::new();
        } else if line.starts_with(char::is_whitespace) {
            match fields.last_mut() {
                Some((_, value)) => {
                    value.push(' ');
                    value.push_str(line.trim());
                }
                None => {
                    let place = format!("{}:{}", path.display(), lineno + 1);
                    return Err(format!("{}: stray continuation line", place).into());
                }
            }
        } else if let Some((field, value)) = line.split_once(": ") {
            fields.push((field.to_string(), value.trim().to_string()));
        } else if !line.is_empty() {
            let place = format!("{}:{}", path.display(), lineno + 1);
            return Err(format!("{}: malformed line {:?}", place, line).into());
        }
    }
    records.push(Record { fields });
    Ok(records)
}

/// Make sure a tag we're about to put in a table is something the parser
/// will accept at run time.
fn check_tag(tag: &str, source: &Path) -> BuildResult<()> {
    match parse_tag(tag) {
        Ok(_) => Ok(()),
        Err(err) => Err(format!("{}: invalid tag {:?}: {}", source.display(), tag, err).into()),
    }
}

fn is_region_code(code: &str) -> bool {
    (code.len() == 2 && code.bytes().all(|b| b.is_ascii_alphabetic()))
        || (code.len() == 3 && code.bytes().all(|b| b.is_ascii_digit()))
}

fn write_map(out: &mut impl Write, name: &str, table: &Table) -> BuildResult<()> {
    let mut builder = phf_codegen::Map::new();
    for (key, value) in table {
        builder.entry(key.as_str(), &format!("{:?}", value));
    }
    writeln!(
        out,
        "pub static {}: ::phf::Map<&'static str, &'static str> = {};",
        name,
        builder.build()
    )?;
    Ok(())
}

fn make_tables() -> BuildResult<()> {
    let data = data_dir()?;
    let registry_path = data.join("language-subtag-registry.txt");
    let aliases_path = data.join("aliases.json");
    let likely_path = data.join("likelySubtags.json");

    let mut language_replace = Table::new();
    let mut macro_replace = Table::new();
    let mut macrolanguages = Table::new();
    let mut region_replace = Table::new();
    let mut script_replace = Table::new();
    let mut suppress_script = Table::new();
    let mut likely_subtags = Table::new();

    for record in read_registry(&registry_path)? {
        let preferred = record.get("Preferred-Value");
        match record.get("Type") {
            Some("language") => {
                let subtag = record
                    .get("Subtag")
                    .ok_or("language record without a subtag")?
                    .to_lowercase();
                if let Some(macro_lang) = record.get("Macrolanguage") {
                    macrolanguages.insert(subtag.clone(), macro_lang.to_lowercase());
                }
                if let Some(script) = record.get("Suppress-Script") {
                    suppress_script.insert(subtag.clone(), script.to_string());
                }
                if let Some(value) = preferred {
                    language_replace.insert(subtag, value.to_lowercase());
                }
            }
            Some("extlang") => {
                // An extlang is replaced along with its prefix: "zh-yue"
                // becomes "yue".
                let subtag = record.get("Subtag").ok_or("extlang record without a subtag")?;
                let prefix = record.get("Prefix").ok_or("extlang record without a prefix")?;
                if let Some(value) = preferred {
                    let smashed = normalize_characters(&format!("{}-{}", prefix, subtag));
                    language_replace.insert(smashed, value.to_lowercase());
                }
            }
            Some("grandfathered") | Some("redundant") => {
                let tag = record.get("Tag").ok_or("tag record without a tag")?;
                if let Some(value) = preferred {
                    language_replace.insert(normalize_characters(tag), normalize_characters(value));
                }
            }
            Some("region") => {
                let subtag = record.get("Subtag").ok_or("region record without a subtag")?;
                if let Some(value) = preferred {
                    region_replace.insert(subtag.to_uppercase(), value.to_uppercase());
                }
            }
            Some("script") => {
                let subtag = record.get("Subtag").ok_or("script record without a subtag")?;
                if let Some(value) = preferred {
                    script_replace.insert(subtag.to_string(), value.to_string());
                }
            }
            _ => {}
        }
    }

    let parsed = read_json(&aliases_path)?;
    let alias = &parsed["supplemental"]["metadata"]["alias"];
    for (key, val) in alias["languageAlias"].entries() {
        let replacement = val["_replacement"]
            .as_str()
            .ok_or_else(|| format!("languageAlias {:?} has no replacement", key))?;
        // Replacements that list several possibilities can't be applied
        // automatically.
        if replacement.contains(' ') {
            continue;
        }
        let key = normalize_characters(key);
        let replacement = normalize_characters(replacement);
        if val["_reason"].as_str() == Some("macrolanguage") {
            macro_replace.insert(key, replacement);
        } else {
            language_replace.insert(key, replacement);
        }
    }

    for (key, val) in alias["territoryAlias"].entries() {
        let replacement = val["_replacement"]
            .as_str()
            .ok_or_else(|| format!("territoryAlias {:?} has no replacement", key))?;
        // Skip replacements with spaces; these indicate regions that were
        // split, such as Yugoslavia, and there's no one answer for them.
        if !replacement.contains(' ') && is_region_code(key) {
            region_replace.insert(key.to_uppercase(), replacement.to_uppercase());
        }
    }

    let parsed = read_json(&likely_path)?;
    for (key, val) in parsed["supplemental"]["likelySubtags"].entries() {
        let expansion = val
            .as_str()
            .ok_or_else(|| format!("likely subtags for {:?} isn't a string", key))?;
        likely_subtags.insert(key.replace('_', "-"), expansion.replace('_', "-"));
    }

    for (key, value) in language_replace.iter().chain(&macro_replace) {
        check_tag(key, &aliases_path)?;
        check_tag(value, &aliases_path)?;
    }
    for (key, value) in &region_replace {
        check_tag(&format!("und-{}", key), &registry_path)?;
        check_tag(&format!("und-{}", value), &registry_path)?;
    }
    for (key, value) in &likely_subtags {
        check_tag(key, &likely_path)?;
        check_tag(value, &likely_path)?;
    }
    if !likely_subtags.contains_key("und") {
        return Err(format!("{}: there is no entry for \"und\"", likely_path.display()).into());
    }

    let out_path = Path::new(&env::var("OUT_DIR")?).join("langdata.rs");
    let mut out_file = BufWriter::new(File::create(&out_path)?);
    write_map(&mut out_file, "LANGUAGE_REPLACE", &language_replace)?;
    write_map(&mut out_file, "MACROLANGUAGE_REPLACE", &macro_replace)?;
    write_map(&mut out_file, "MACROLANGUAGES", &macrolanguages)?;
    write_map(&mut out_file, "REGION_REPLACE", &region_replace)?;
    write_map(&mut out_file, "SCRIPT_REPLACE", &script_replace)?;
    write_map(&mut out_file, "SUPPRESS_SCRIPT", &suppress_script)?;
    write_map(&mut out_file, "LIKELY_SUBTAGS", &likely_subtags)?;
    out_file.flush()?;
    Ok(())
}

fn main() {
    if let Err(err) = make_tables() {
        panic!("couldn't build the language tables: {}", err);
    }
}
