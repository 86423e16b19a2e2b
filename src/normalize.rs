//! Identifier normalization used by every name-based lookup.

use alloc::string::{String, ToString};

/// Turns an identifier as written in SQL into its canonical form.
///
/// Implementations must be pure: the same input always yields the same output.
pub trait Normalizer {
    /// Returns the canonical form of `identifier`.
    fn normalize(&self, identifier: &str) -> String;
}

impl<F: Fn(&str) -> String> Normalizer for F {
    fn normalize(&self, identifier: &str) -> String {
        self(identifier)
    }
}

/// Strips one level of quoting (`"x"`, `` `x` ``, `[x]`, `'x'`) and keeps case.
///
/// This is the normalizer used by the lookups that do not take one explicitly.
/// Lookups compare case-insensitively on top of it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DelimiterNormalizer;

impl Normalizer for DelimiterNormalizer {
    fn normalize(&self, identifier: &str) -> String {
        strip_delimiters(identifier)
    }
}

/// Strips quoting like [`DelimiterNormalizer`] and then lowercases.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CaseFoldNormalizer;

impl Normalizer for CaseFoldNormalizer {
    fn normalize(&self, identifier: &str) -> String {
        strip_delimiters(identifier).to_lowercase()
    }
}

/// Normalizes `identifier` with the [`DelimiterNormalizer`].
#[must_use]
pub fn normalize(identifier: &str) -> String {
    DelimiterNormalizer.normalize(identifier)
}

/// Unicode-aware case-insensitive equality, without allocating.
#[must_use]
pub fn eq_ignore_case(left: &str, right: &str) -> bool {
    left.chars()
        .flat_map(char::to_lowercase)
        .eq(right.chars().flat_map(char::to_lowercase))
}

fn strip_delimiters(identifier: &str) -> String {
    let mut chars = identifier.chars();
    let (Some(first), Some(last)) = (chars.next(), chars.next_back()) else {
        return identifier.to_string();
    };
    let closing = match first {
        '"' => '"',
        '`' => '`',
        '\'' => '\'',
        '[' => ']',
        _ => return identifier.to_string(),
    };
    if last != closing {
        return identifier.to_string();
    }

    let inner = chars.as_str();
    if first == '[' {
        return inner.replace("]]", "]");
    }
    let mut doubled = String::with_capacity(2);
    doubled.push(closing);
    doubled.push(closing);
    inner.replace(doubled.as_str(), &closing.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_quotes() {
        assert_eq!(normalize("\"Users\""), "Users");
        assert_eq!(normalize("`orders`"), "orders");
        assert_eq!(normalize("[Order Details]"), "Order Details");
        assert_eq!(normalize("'t'"), "t");
    }

    #[test]
    fn test_unquoted_is_unchanged() {
        assert_eq!(normalize("T1"), "T1");
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("\""), "\"");
        assert_eq!(normalize("\"half"), "\"half");
    }

    #[test]
    fn test_doubled_delimiters_unescape() {
        assert_eq!(normalize("\"a\"\"b\""), "a\"b");
        assert_eq!(normalize("[a]]b]"), "a]b");
    }

    #[test]
    fn test_case_fold() {
        assert_eq!(CaseFoldNormalizer.normalize("\"MixedCase\""), "mixedcase");
    }

    #[test]
    fn test_closure_normalizer() {
        let upper = |s: &str| s.to_uppercase();
        assert_eq!(upper.normalize("id"), "ID");
    }

    #[test]
    fn test_eq_ignore_case() {
        assert!(eq_ignore_case("Id", "ID"));
        assert!(eq_ignore_case("Ölpreis", "ölPREIS"));
        assert!(!eq_ignore_case("id", "ids"));
    }
}
