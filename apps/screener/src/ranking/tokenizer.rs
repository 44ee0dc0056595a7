//! Tokenizer — turns a file name into lowercase keyword tokens.

use once_cell::sync::Lazy;
use regex::Regex;

static PDF_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\.pdf$").expect("valid pdf suffix pattern"));

static SEPARATORS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\s\-_.]+").expect("valid separator pattern"));

/// Splits a file name into keyword tokens.
///
/// A trailing `.pdf` (any case) is dropped, the rest is lowercased and split on
/// runs of whitespace, `-`, `_` and `.`. Empty tokens produced by leading or
/// trailing separators are discarded, so `"_cv_.pdf"` yields `["cv"]` and an
/// empty name yields no tokens at all.
pub fn tokenize(file_name: &str) -> Vec<String> {
    let stem = PDF_SUFFIX.replace(file_name, "");
    let lowered = stem.to_lowercase();
    SEPARATORS
        .split(&lowered)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}
