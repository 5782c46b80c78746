use once_cell::sync::Lazy;
use regex::Regex;

// `\w` is ASCII only here so slugs never carry accented letters.
static DISALLOWED: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9_\s-]").expect("valid regex"));
static SEPARATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s_-]+").expect("valid regex"));

/// Turns a free-text ingredient name into its dictionary slug.
///
/// Lowercases and trims, drops anything that is not a word character, whitespace
/// or hyphen, folds runs of whitespace, underscores and hyphens into one hyphen
/// and trims hyphens from both ends. Parentheses fall under the dropped set, so
/// `"Vitamin E Supplement ()"` and `"Vitamin E Supplement"` share a slug.
pub fn slugify(name: &str) -> String {
    let lowered = name.to_lowercase();
    let cleaned = DISALLOWED.replace_all(lowered.trim(), "");
    let hyphenated = SEPARATORS.replace_all(&cleaned, "-");
    hyphenated.trim_matches('-').to_string()
}
