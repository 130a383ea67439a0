//! Field coalescing, slug derivation, and value coercion.
//!
//! Source files name their fields inconsistently (`name` vs `strain` vs
//! `variety`, `thc` vs `thc_percent`, ...). Rather than probing properties at
//! every call site, all parsers funnel their raw key/value maps through
//! [`coalesce_record`], which applies one fixed synonym priority list per
//! field. The slug derived from the coalesced name is the catalog's natural
//! key.

use serde_json::{Map, Value};

use crate::models::SourceRecord;

/// Synonym priority lists. Earlier entries win; lookup is case-insensitive.
const NAME_KEYS: &[&str] = &["name", "strain", "title", "variety"];
const KIND_KEYS: &[&str] = &["type", "kind", "phenotype", "category"];
const DESCRIPTION_KEYS: &[&str] = &["description", "desc", "notes", "summary"];
const EFFECTS_KEYS: &[&str] = &["effects", "effect"];
const FLAVORS_KEYS: &[&str] = &["flavors", "flavor", "taste"];
const LINEAGE_KEYS: &[&str] = &["lineage", "parents", "genetics"];
const THC_KEYS: &[&str] = &["thc", "thc_percent", "thcPercent"];
const CBD_KEYS: &[&str] = &["cbd", "cbd_percent", "cbdPercent"];

/// Coalesce a raw key/value map into a [`SourceRecord`].
///
/// Returns `None` when no synonym yields a non-empty trimmed name; such
/// records are dropped, never errored on.
pub fn coalesce_record(map: &Map<String, Value>) -> Option<SourceRecord> {
    let name = lookup(map, NAME_KEYS).and_then(coerce_string)?;

    Some(SourceRecord {
        name,
        kind: lookup(map, KIND_KEYS).and_then(coerce_string),
        description: lookup(map, DESCRIPTION_KEYS).and_then(coerce_string),
        effects: lookup(map, EFFECTS_KEYS).map(coerce_list).unwrap_or_default(),
        flavors: lookup(map, FLAVORS_KEYS).map(coerce_list).unwrap_or_default(),
        lineage: lookup(map, LINEAGE_KEYS).map(coerce_list).unwrap_or_default(),
        thc: lookup(map, THC_KEYS).and_then(coerce_number),
        cbd: lookup(map, CBD_KEYS).and_then(coerce_number),
    })
}

fn lookup<'a>(map: &'a Map<String, Value>, synonyms: &[&str]) -> Option<&'a Value> {
    for key in synonyms {
        if let Some((_, value)) = map.iter().find(|(k, _)| k.eq_ignore_ascii_case(key)) {
            if !value.is_null() {
                return Some(value);
            }
        }
    }
    None
}

/// Scalar → trimmed non-empty string, or `None`.
pub fn coerce_string(value: &Value) -> Option<String> {
    let s = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    if s.is_empty() {
        None
    } else {
        Some(s)
    }
}

/// List coercion: arrays keep their scalar elements, a scalar becomes a
/// singleton, anything else is empty. Never errors.
pub fn coerce_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().filter_map(coerce_string).collect(),
        other => coerce_string(other).map(|s| vec![s]).unwrap_or_default(),
    }
}

/// Numeric coercion for THC/CBD percentages. Bad input coerces to `None`,
/// never to an error. A trailing `%` on string input is tolerated.
pub fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|f| f.is_finite()),
        Value::String(s) => {
            let trimmed = s.trim().trim_end_matches('%').trim();
            trimmed.parse::<f64>().ok().filter(|f| f.is_finite())
        }
        _ => None,
    }
}

/// Derive the catalog's natural key from a strain name.
///
/// Lowercases, folds Latin diacritics to ASCII, drops characters outside
/// `[a-z0-9\s-]`, trims, and collapses whitespace runs to single hyphens.
pub fn slugify(name: &str) -> String {
    let mut folded = String::with_capacity(name.len());
    for c in name.to_lowercase().chars() {
        folded.push(fold_diacritic(c));
    }

    let filtered: String = folded
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace() || *c == '-')
        .collect();

    filtered
        .trim()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}

/// Fold common Latin accented characters to their ASCII base letter.
/// Characters outside the table pass through (and are filtered later if
/// still non-ASCII).
fn fold_diacritic(c: char) -> char {
    match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' | 'ā' | 'ă' | 'ą' => 'a',
        'è' | 'é' | 'ê' | 'ë' | 'ē' | 'ĕ' | 'ė' | 'ę' | 'ě' => 'e',
        'ì' | 'í' | 'î' | 'ï' | 'ī' | 'ĭ' | 'į' => 'i',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' | 'ō' | 'ŏ' | 'ő' => 'o',
        'ù' | 'ú' | 'û' | 'ü' | 'ū' | 'ŭ' | 'ů' | 'ű' => 'u',
        'ç' | 'ć' | 'č' => 'c',
        'ñ' | 'ń' | 'ň' => 'n',
        'ý' | 'ÿ' => 'y',
        'ś' | 'š' => 's',
        'ź' | 'ż' | 'ž' => 'z',
        'ł' => 'l',
        'đ' => 'd',
        'ţ' | 'ť' => 't',
        'ŕ' | 'ř' => 'r',
        'ğ' => 'g',
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Blue Dream"), "blue-dream");
        assert_eq!(slugify("  OG Kush  "), "og-kush");
        assert_eq!(slugify("Gorilla   Glue   #4"), "gorilla-glue-4");
    }

    #[test]
    fn test_slugify_diacritics_and_symbols() {
        assert_eq!(slugify("Açaí Gelato"), "acai-gelato");
        assert_eq!(slugify("Piña Colada!"), "pina-colada");
        assert_eq!(slugify("Jack's Girl Scout Cookies"), "jacks-girl-scout-cookies");
    }

    #[test]
    fn test_slugify_keeps_existing_hyphens() {
        assert_eq!(slugify("AK-47"), "ak-47");
    }

    #[test]
    fn test_slugify_empty_and_symbol_only() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify("★☆★"), "");
    }

    #[test]
    fn test_coalesce_name_synonyms() {
        let rec = coalesce_record(&obj(json!({"strain": "Sour Diesel"}))).unwrap();
        assert_eq!(rec.name, "Sour Diesel");

        let rec = coalesce_record(&obj(json!({"variety": "Gelato", "title": "Better"}))).unwrap();
        // "title" outranks "variety" in the synonym list
        assert_eq!(rec.name, "Better");
    }

    #[test]
    fn test_coalesce_case_insensitive_keys() {
        let rec = coalesce_record(&obj(json!({"Name": "Blue Dream", "THC": 22.5}))).unwrap();
        assert_eq!(rec.name, "Blue Dream");
        assert_eq!(rec.thc, Some(22.5));
    }

    #[test]
    fn test_coalesce_drops_nameless() {
        assert!(coalesce_record(&obj(json!({"thc": 20}))).is_none());
        assert!(coalesce_record(&obj(json!({"name": "   "}))).is_none());
        assert!(coalesce_record(&obj(json!({"name": null}))).is_none());
    }

    #[test]
    fn test_coerce_number_variants() {
        assert_eq!(coerce_number(&json!(19.5)), Some(19.5));
        assert_eq!(coerce_number(&json!("19.5")), Some(19.5));
        assert_eq!(coerce_number(&json!("19.5%")), Some(19.5));
        assert_eq!(coerce_number(&json!("n/a")), None);
        assert_eq!(coerce_number(&json!("")), None);
        assert_eq!(coerce_number(&json!(null)), None);
        assert_eq!(coerce_number(&json!([1, 2])), None);
    }

    #[test]
    fn test_coerce_list_scalar_becomes_singleton() {
        assert_eq!(coerce_list(&json!("relaxed")), vec!["relaxed"]);
        assert_eq!(
            coerce_list(&json!(["happy", "sleepy"])),
            vec!["happy", "sleepy"]
        );
        assert!(coerce_list(&json!(null)).is_empty());
    }

    #[test]
    fn test_full_record_coalescing() {
        let rec = coalesce_record(&obj(json!({
            "strain": "Northern Lights",
            "phenotype": "indica",
            "notes": "Classic.",
            "effect": "sleepy",
            "flavors": ["pine", "earthy"],
            "genetics": ["Afghani", "Thai"],
            "thc_percent": "18%",
            "cbd": "bad"
        })))
        .unwrap();

        assert_eq!(rec.name, "Northern Lights");
        assert_eq!(rec.kind.as_deref(), Some("indica"));
        assert_eq!(rec.description.as_deref(), Some("Classic."));
        assert_eq!(rec.effects, vec!["sleepy"]);
        assert_eq!(rec.flavors, vec!["pine", "earthy"]);
        assert_eq!(rec.lineage, vec!["Afghani", "Thai"]);
        assert_eq!(rec.thc, Some(18.0));
        assert_eq!(rec.cbd, None);
    }
}
