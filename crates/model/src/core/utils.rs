use std::fmt::Write;

/// Hex-encodes raw bytes in the PostgreSQL `bytea` text form (`\x0a0b`).
pub fn encode_bytea(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(2 + 2 * bytes.len());
    out.push_str("\\x");
    for b in bytes {
        // writing into a String cannot fail
        let _ = write!(&mut out, "{b:02x}");
    }
    out
}

/// Makes a cell printable on a single line.
pub fn escape_control_chars(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\n' => escaped.push_str(r"\n"),
            '\r' => escaped.push_str(r"\r"),
            '\t' => escaped.push_str(r"\t"),
            '\0' => escaped.push_str(r"\0"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// Cuts `value` to at most `max_chars` characters, marking the cut with `...`.
pub fn truncate_chars(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        return value.to_string();
    }
    if max_chars <= 3 {
        return ".".repeat(max_chars);
    }
    let mut out: String = value.chars().take(max_chars - 3).collect();
    out.push_str("...");
    out
}
