use anyhow::{Result, anyhow};
use isolang::Language;

/// Language utilities for ISO language code handling
///
/// Translation backends disagree on code formats: Argos packages use ISO 639-1
/// ("en", "pt"), LLM prompts read better with English names. Everything is
/// resolved through isolang here.

/// ISO 639-2/B codes that differ from their 639-2/T form
const BIBLIOGRAPHIC_CODES: &[(&str, &str)] = &[
    ("fre", "fra"),
    ("ger", "deu"),
    ("dut", "nld"),
    ("gre", "ell"),
    ("chi", "zho"),
    ("cze", "ces"),
    ("ice", "isl"),
    ("alb", "sqi"),
    ("arm", "hye"),
    ("baq", "eus"),
    ("bur", "mya"),
    ("per", "fas"),
    ("geo", "kat"),
    ("may", "msa"),
    ("mac", "mkd"),
    ("rum", "ron"),
    ("slo", "slk"),
    ("wel", "cym"),
];

/// Resolve a 2- or 3-letter code (optionally with a region suffix such as
/// "pt-BR" or "pt_BR") to an isolang language
pub fn resolve_language(code: &str) -> Result<Language> {
    let normalized = code.trim().to_lowercase();
    let base = normalized
        .split(['-', '_'])
        .next()
        .unwrap_or_default();

    let language = match base.len() {
        2 => Language::from_639_1(base),
        3 => {
            let part2t = BIBLIOGRAPHIC_CODES.iter()
                .find(|(b, _)| *b == base)
                .map(|(_, t)| *t)
                .unwrap_or(base);
            Language::from_639_3(part2t)
        },
        _ => None,
    };

    language.ok_or_else(|| anyhow!("Invalid language code: {}", code))
}

/// Normalize a language code to ISO 639-2/T (3-letter) format
pub fn normalize_to_part2t(code: &str) -> Result<String> {
    Ok(resolve_language(code)?.to_639_3().to_string())
}

/// Normalize a language code to ISO 639-1 (2-letter) format if possible
/// Falls back to ISO 639-2/T if no ISO 639-1 code exists
pub fn normalize_to_part1_or_part2t(code: &str) -> Result<String> {
    let language = resolve_language(code)?;
    Ok(language
        .to_639_1()
        .map(str::to_string)
        .unwrap_or_else(|| language.to_639_3().to_string()))
}

/// Check if two language codes match (represent the same language)
pub fn language_codes_match(code1: &str, code2: &str) -> bool {
    match (resolve_language(code1), resolve_language(code2)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Get the English language name from a code
pub fn get_language_name(code: &str) -> Result<String> {
    Ok(resolve_language(code)?.to_name().to_string())
}
