use anyhow::{Result, anyhow};
use isolang::Language;

/// Language utilities for ISO language code handling
///
/// This module provides functions for validating, normalizing, and matching
/// ISO 639-1 (2-letter) and ISO 639-2 (3-letter) language codes, and for
/// inferring a language from a SAMI `Class` attribute (e.g. `KRCC`, `ENUSCC`).
/// ISO 639-2/B codes that differ from their 639-2/T counterpart
const PART2B_TO_PART2T: &[(&str, &str)] = &[
    ("fre", "fra"), // French
    ("ger", "deu"), // German
    ("dut", "nld"), // Dutch
    ("gre", "ell"), // Greek
    ("chi", "zho"), // Chinese
    ("cze", "ces"), // Czech
    ("ice", "isl"), // Icelandic
    ("alb", "sqi"), // Albanian
    ("arm", "hye"), // Armenian
    ("baq", "eus"), // Basque
    ("bur", "mya"), // Burmese
    ("per", "fas"), // Persian
    ("geo", "kat"), // Georgian
    ("may", "msa"), // Malay
    ("mac", "mkd"), // Macedonian
    ("rum", "ron"), // Romanian
    ("slo", "slk"), // Slovak
    ("wel", "cym"), // Welsh
];

fn part2b_to_part2t(code: &str) -> Option<&'static str> {
    PART2B_TO_PART2T
        .iter()
        .find(|(b, _)| *b == code)
        .map(|(_, t)| *t)
}

/// Normalize a language code to ISO 639-2/T (3-letter) format
pub fn normalize_to_part2t(code: &str) -> Result<String> {
    let normalized_code = code.trim().to_lowercase();

    // If it's a 2-letter code, convert to 3-letter
    if normalized_code.len() == 2 {
        if let Some(lang) = Language::from_639_1(&normalized_code) {
            return Ok(lang.to_639_3().to_string());
        }
    }
    // If it's already a 3-letter code, ensure it's ISO 639-2/T
    else if normalized_code.len() == 3 {
        if Language::from_639_3(&normalized_code).is_some() {
            return Ok(normalized_code);
        }

        if let Some(part2t) = part2b_to_part2t(&normalized_code) {
            return Ok(part2t.to_string());
        }
    }

    Err(anyhow!("Cannot normalize invalid language code: {}", code))
}

/// Normalize a language code to ISO 639-1 (2-letter) format if possible,
/// falling back to ISO 639-2/T if no 2-letter code exists
pub fn normalize_to_part1_or_part2t(code: &str) -> Result<String> {
    let part2t = normalize_to_part2t(code)?;

    if let Some(lang) = Language::from_639_3(&part2t) {
        if let Some(code_639_1) = lang.to_639_1() {
            return Ok(code_639_1.to_string());
        }
        return Ok(part2t);
    }

    Err(anyhow!("Cannot normalize invalid language code: {}", code))
}

/// Check if two language codes match (represent the same language)
pub fn language_codes_match(code1: &str, code2: &str) -> bool {
    match (normalize_to_part2t(code1), normalize_to_part2t(code2)) {
        (Ok(n1), Ok(n2)) => n1 == n2,
        _ => false,
    }
}

/// Get the English language name from a code
pub fn get_language_name(code: &str) -> Result<String> {
    let normalized = normalize_to_part2t(code)?;
    let lang = Language::from_639_3(&normalized)
        .ok_or_else(|| anyhow!("Failed to get language from code: {}", normalized))?;

    Ok(lang.to_name().to_string())
}

/// Caption classes seen in the wild that don't start with an ISO 639 code
const KNOWN_SAMI_CLASSES: &[(&str, &str)] = &[
    ("krcc", "ko"), // Korean captions, KR country prefix
    ("kokrcc", "ko"),
    ("encc", "en"),
    ("enuscc", "en"),
    ("egcc", "en"), // older Korean tools label English as EGCC
    ("jpcc", "ja"),
    ("jajpcc", "ja"),
    ("cncc", "zh"),
    ("zhcc", "zh"),
];

/// Infer an ISO 639-1/2 language code from a SAMI `Class` attribute value.
///
/// Tries a table of well-known caption class names first, then probes the
/// leading characters of the class for a valid ISO code. Returns `None` when
/// nothing matches; callers keep the raw class name as the track tag so no
/// track is dropped over an unrecognized label.
pub fn language_from_sami_class(class: &str) -> Option<String> {
    let lowered = class.trim().to_lowercase();
    if lowered.is_empty() {
        return None;
    }

    if let Some((_, code)) = KNOWN_SAMI_CLASSES.iter().find(|(c, _)| *c == lowered) {
        return Some((*code).to_string());
    }

    // Probe a 2-letter then a 3-letter prefix, e.g. "frcc" or "engcc"
    for prefix_len in [2usize, 3] {
        if let Some(prefix) = lowered.get(..prefix_len) {
            if let Ok(code) = normalize_to_part1_or_part2t(prefix) {
                return Some(code);
            }
        }
    }

    None
}
