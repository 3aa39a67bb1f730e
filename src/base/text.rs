//! Text utilities for canonical-casing of file and folder names.

/// Check if a character is considered part of a word (identifier).
///
/// Uses Unicode Standard Annex #31 rules for identifier characters,
/// which covers the accented Latin-1 letters legacy PHP trees contain.
#[inline]
pub fn is_word_character(c: char) -> bool {
    unicode_ident::is_xid_continue(c)
}

/// Check if a string is a valid identifier (usable as a class or
/// namespace segment name).
pub fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if unicode_ident::is_xid_start(c) || c == '_' => {}
        _ => return false,
    }
    chars.all(is_word_character)
}

/// Convert a name to PascalCase.
///
/// Splits into words on separators (`_`, `-`, spaces, anything
/// non-alphanumeric), on lower→upper camel boundaries, on letter/digit
/// boundaries, and on acronym tails (`HTTPServer` → `HTTP` + `Server`),
/// then upper-cases the first character of each word:
///
/// `"helper_functions"` → `"HelperFunctions"`,
/// `"dbAdapter"` → `"DbAdapter"`,
/// `"HTTPClient"` → `"HTTPClient"`.
pub fn pascal_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut word_start = true;
    let chars: Vec<char> = s.chars().collect();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            word_start = true;
            continue;
        }

        let prev = if i > 0 { Some(chars[i - 1]) } else { None };
        let next = chars.get(i + 1).copied();

        let boundary = match prev {
            Some(p) if !p.is_alphanumeric() => true,
            Some(p) if p.is_lowercase() && c.is_uppercase() => true,
            Some(p) if p.is_ascii_digit() != c.is_ascii_digit() => true,
            // Acronym tail: "HTTPServer" splits before the 'S'
            Some(p) if p.is_uppercase() && c.is_uppercase() => {
                matches!(next, Some(n) if n.is_lowercase())
            }
            _ => false,
        };

        if word_start || boundary {
            out.extend(c.to_uppercase());
            word_start = false;
        } else {
            out.push(c);
        }
    }

    out
}

/// Check whether a name is already in canonical PascalCase.
pub fn is_pascal_case(s: &str) -> bool {
    s == pascal_case(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("helper_functions", "HelperFunctions")]
    #[case("db-adapter", "DbAdapter")]
    #[case("my class", "MyClass")]
    #[case("--foo-bar--", "FooBar")]
    #[case("dbAdapter", "DbAdapter")]
    #[case("fooBarBaz", "FooBarBaz")]
    #[case("HTTPClient", "HTTPClient")]
    #[case("parseXMLDocument", "ParseXMLDocument")]
    #[case("utf8Decoder", "Utf8Decoder")]
    #[case("md5hash", "Md5Hash")]
    #[case("Widget", "Widget")]
    fn test_pascal_case(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(pascal_case(input), expected);
    }

    #[test]
    fn test_is_pascal_case() {
        assert!(is_pascal_case("HelperFunctions"));
        assert!(!is_pascal_case("helper_functions"));
    }

    #[test]
    fn test_is_identifier() {
        assert!(is_identifier("Widget"));
        assert!(is_identifier("_internal"));
        assert!(is_identifier("Café"));
        assert!(!is_identifier("9lives"));
        assert!(!is_identifier("foo-bar"));
        assert!(!is_identifier(""));
    }
}
