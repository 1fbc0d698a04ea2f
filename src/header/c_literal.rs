/// Quotes `value` as a C string literal.
pub fn string_literal(value: &str) -> String {
    let mut literal = String::with_capacity(value.len() + 2);
    literal.push('"');
    for c in value.chars() {
        match c {
            '"' => literal.push_str("\\\""),
            '\\' => literal.push_str("\\\\"),
            '\n' => literal.push_str("\\n"),
            '\r' => literal.push_str("\\r"),
            '\t' => literal.push_str("\\t"),
            // Octal escapes stop after three digits, hex escapes would swallow a following digit
            c if c.is_ascii_control() => literal.push_str(&format!("\\{:03o}", c as u32)),
            c => literal.push(c),
        }
    }
    literal.push('"');
    literal
}

/// Wraps `value` in a C++ raw string literal, starting and ending on a line of its own.
/// Returns `None` if the value would terminate the literal early.
pub fn raw_literal(value: &str, delimiter: &str) -> Option<String> {
    let terminator = format!("){}\"", delimiter);
    if value.contains(&terminator) {
        return None;
    }

    Some(format!("R\"{}(\n{}\n{}", delimiter, value.trim_matches(|c: char| c == '\n' || c == '\r'), terminator))
}
