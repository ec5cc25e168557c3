//! Escaping for markup text and attribute values.

/// Escape text content (`&`, `<`, `>`)
pub fn encode_text(text: &str) -> String {
    let mut result = String::with_capacity(text.len());

    for c in text.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            _ => result.push(c),
        }
    }

    result
}

/// Escape an attribute value.
///
/// Applies [`encode_text`], then encodes double quotes and newlines as
/// numeric character references.
pub fn encode_attribute(value: &str) -> String {
    let mut result = String::with_capacity(value.len());

    for c in encode_text(value).chars() {
        match c {
            '"' => result.push_str("&#34;"),
            '\n' => result.push_str("&#10;"),
            _ => result.push(c),
        }
    }

    result
}
