//! RFC 5545 TEXT value handling.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TextError {
    #[error("invalid escape sequence '\\{0}'")]
    InvalidEscape(char),

    #[error("value ends with a lone backslash")]
    TrailingBackslash,
}

/// Unescape a single TEXT value. Unknown escapes are kept verbatim.
pub fn unescape_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') | Some('N') => out.push('\n'),
            Some(escaped @ ('\\' | ',' | ';')) => out.push(escaped),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Split a comma-separated TEXT list (such as CATEGORIES) into its values.
///
/// Escaped commas stay inside their value. Unlike [`unescape_text`] this is
/// strict: an invalid escape makes the whole list unusable.
pub fn split_text_list(raw: &str) -> Result<Vec<String>, TextError> {
    let mut values = Vec::new();
    let mut current = String::new();
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        match c {
            ',' => values.push(std::mem::take(&mut current)),
            '\\' => match chars.next() {
                Some('n') | Some('N') => current.push('\n'),
                Some(escaped @ ('\\' | ',' | ';')) => current.push(escaped),
                Some(other) => return Err(TextError::InvalidEscape(other)),
                None => return Err(TextError::TrailingBackslash),
            },
            _ => current.push(c),
        }
    }
    values.push(current);
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unescape_handles_rfc_escapes() {
        assert_eq!(unescape_text(r"Raum 3\, 2. OG\nBitte klingeln"), "Raum 3, 2. OG\nBitte klingeln");
        assert_eq!(unescape_text(r"a\;b\\c"), r"a;b\c");
        // Lenient on anything else
        assert_eq!(unescape_text(r"C:\temp\"), r"C:\temp\");
    }

    #[test]
    fn split_keeps_escaped_commas() {
        assert_eq!(
            split_text_list(r"Algebra\, Zahlentheorie,Analysis").unwrap(),
            vec!["Algebra, Zahlentheorie", "Analysis"]
        );
        assert_eq!(split_text_list("Topologie").unwrap(), vec!["Topologie"]);
    }

    #[test]
    fn split_rejects_invalid_escapes() {
        assert_eq!(split_text_list(r"Algebra\x"), Err(TextError::InvalidEscape('x')));
        assert_eq!(split_text_list("Algebra\\"), Err(TextError::TrailingBackslash));
    }
}
