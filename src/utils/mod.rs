//! Utility functions for markup escaping and inline style inspection.

use core::fmt;

/// Escapes HTML special characters in a string.
///
/// # Examples
/// ```
/// use mathdoc::utils::escape;
///
/// assert_eq!(escape("a & b"), "a &amp; b");
/// assert_eq!(escape("a < b"), "a &lt; b");
/// assert_eq!(escape("a \" b"), "a &quot; b");
/// ```
#[must_use]
pub fn escape(text: &str) -> String {
    let mut escaped = String::new();
    let _ = escape_into(&mut escaped, text);
    escaped
}

/// Writes the escaped HTML representation of `text` into the provided writer.
///
/// This helper avoids intermediate string allocations by emitting directly
/// into any `fmt::Write` implementor.
#[inline]
pub fn escape_into<W: fmt::Write>(writer: &mut W, text: &str) -> fmt::Result {
    let mut last = 0;
    for (idx, ch) in text.char_indices() {
        let replacement = match ch {
            '&' => Some("&amp;"),
            '>' => Some("&gt;"),
            '<' => Some("&lt;"),
            '"' => Some("&quot;"),
            '\'' => Some("&#x27;"),
            _ => None,
        };

        if let Some(rep) = replacement {
            if last < idx {
                writer.write_str(&text[last..idx])?;
            }
            writer.write_str(rep)?;
            last = idx + ch.len_utf8();
        }
    }

    if last < text.len() {
        writer.write_str(&text[last..])
    } else {
        Ok(())
    }
}

/// Escapes text for use inside a CSS string literal (`content: "…"`).
#[must_use]
pub fn escape_css_string(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '"' | '\\' => {
                out.push('\\');
                out.push(ch);
            }
            _ => out.push(ch),
        }
    }
    out
}

/// Uppercase hexadecimal code point, as used in glyph class hooks
/// (`mjx-c1D465`).
///
/// ```
/// use mathdoc::utils::codepoint_hex;
///
/// assert_eq!(codepoint_hex('x'), "78");
/// assert_eq!(codepoint_hex('\u{1D465}'), "1D465");
/// ```
#[must_use]
pub fn codepoint_hex(ch: char) -> String {
    format!("{:X}", ch as u32)
}

/// Finds the value of `property` in an inline `style` attribute.
///
/// ```
/// use mathdoc::utils::style_value;
///
/// assert_eq!(style_value("color: red; font-size: 20px", "font-size"), Some("20px"));
/// assert_eq!(style_value("color: red", "font-size"), None);
/// ```
#[must_use]
pub fn style_value<'a>(style: &'a str, property: &str) -> Option<&'a str> {
    style.split(';').find_map(|decl| {
        let (name, value) = decl.split_once(':')?;
        name.trim()
            .eq_ignore_ascii_case(property)
            .then(|| value.trim())
    })
}

/// Parses a pixel length (`"20px"`, `"20"`).
#[must_use]
pub fn parse_px(value: &str) -> Option<f64> {
    let value = value.trim();
    let number = value.strip_suffix("px").unwrap_or(value).trim();
    number.parse::<f64>().ok().filter(|n| n.is_finite() && *n > 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn css_strings_escape_quotes_and_backslashes() {
        assert_eq!(escape_css_string(r#"a"b\c"#), r#"a\"b\\c"#);
    }

    #[test]
    fn pixel_lengths_reject_other_units() {
        assert_eq!(parse_px("18px"), Some(18.0));
        assert_eq!(parse_px(" 12 "), Some(12.0));
        assert_eq!(parse_px("1.2em"), None);
        assert_eq!(parse_px("-3px"), None);
    }
}
