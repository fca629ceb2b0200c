//! Lexical utilities shared by the encoder and decoder: escaping, quote-aware
//! scanning, and the predicates that decide whether a string needs quoting.

/// Escapes `\`, `"`, `\n`, `\r`, `\t` into their two-character sequences.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(ch),
        }
    }
    out
}

/// Reverses [`escape`]. `content` must not include the surrounding quotes.
/// `line_no` is carried only for error reporting.
pub fn unescape(content: &str, line_no: usize) -> crate::error::Result<String> {
    let mut out = String::with_capacity(content.len());
    let mut chars = content.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some(other) => {
                return Err(crate::error::Error::invalid_escape(
                    line_no,
                    format!("\\{other}"),
                ))
            }
            None => return Err(crate::error::Error::invalid_escape(line_no, "\\")),
        }
    }
    Ok(out)
}

/// True if `s` looks like a number: optional sign, digits, optional fraction,
/// optional exponent, or an octal-shaped leading-zero run of digits.
pub fn is_numeric_like(s: &str) -> bool {
    let s = s.strip_prefix(['+', '-']).unwrap_or(s);
    if s.is_empty() {
        return false;
    }
    let bytes = s.as_bytes();
    if bytes[0] == b'0' && bytes.len() > 1 && bytes[1].is_ascii_digit() {
        return s.bytes().all(|b| b.is_ascii_digit());
    }

    let mut chars = s.chars().peekable();
    let mut saw_digit = false;
    while let Some(&c) = chars.peek() {
        if c.is_ascii_digit() {
            saw_digit = true;
            chars.next();
        } else {
            break;
        }
    }
    if chars.peek() == Some(&'.') {
        chars.next();
        while matches!(chars.peek(), Some(c) if c.is_ascii_digit()) {
            saw_digit = true;
            chars.next();
        }
    }
    if !saw_digit {
        return false;
    }
    if matches!(chars.peek(), Some('e') | Some('E')) {
        chars.next();
        if matches!(chars.peek(), Some('+') | Some('-')) {
            chars.next();
        }
        let mut saw_exp_digit = false;
        while matches!(chars.peek(), Some(c) if c.is_ascii_digit()) {
            saw_exp_digit = true;
            chars.next();
        }
        if !saw_exp_digit {
            return false;
        }
    }
    chars.peek().is_none()
}

/// True if `s` can be used as an object key without quoting: a leading
/// letter-or-underscore followed by word or `.` characters.
pub fn is_valid_unquoted_key(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '.')
}

const RESERVED_UNQUOTED_CHARS: [char; 8] = [':', '"', '\\', '[', ']', '{', '}', '\n'];

/// True if `s` requires no quoting at all in an encoded position: not empty,
/// no surrounding whitespace, not a `null`/`true`/`false` literal, not
/// numeric-like, contains none of the reserved structural characters or the
/// active delimiter, and does not start with `-`.
pub fn is_safe_unquoted(s: &str, delim: char) -> bool {
    if s.is_empty() {
        return false;
    }
    if s.trim() != s {
        return false;
    }
    let lower = s.to_ascii_lowercase();
    if lower == "null" || lower == "true" || lower == "false" {
        return false;
    }
    if is_numeric_like(s) {
        return false;
    }
    if s.starts_with('-') {
        return false;
    }
    if s.chars().any(|c| {
        RESERVED_UNQUOTED_CHARS.contains(&c) || c == '\r' || c == '\t' || c == delim
    }) {
        return false;
    }
    true
}

/// Finds the first occurrence of `ch` in `content` starting at `start`,
/// ignoring any occurrence inside a double-quoted span (where `\"` does not
/// terminate the span). Returns `None` if not found.
pub fn find_unquoted(content: &str, ch: char, start: usize) -> Option<usize> {
    find_first_unquoted(content, &[ch], start).map(|(idx, _)| idx)
}

/// Like [`find_unquoted`] but over a character set; returns the index and
/// which character matched.
pub fn find_first_unquoted(content: &str, chars: &[char], start: usize) -> Option<(usize, char)> {
    let bytes: Vec<char> = content.chars().collect();
    let mut in_quotes = false;
    let mut i = start;
    while i < bytes.len() {
        let c = bytes[i];
        if c == '"' {
            in_quotes = !in_quotes;
            i += 1;
            continue;
        }
        if c == '\\' && in_quotes {
            // an escaped character, including \" , must not toggle quote state
            i += 2;
            continue;
        }
        if !in_quotes && chars.contains(&c) {
            return Some((i, c));
        }
        i += 1;
    }
    None
}

/// Splits `content` on unquoted occurrences of `delim`, trims each token, and
/// drops trailing empty tokens produced by a trailing delimiter.
pub fn parse_delimited_values(content: &str, delim: char) -> Vec<String> {
    let chars: Vec<char> = content.chars().collect();
    let mut tokens = Vec::new();
    let mut start = 0usize;
    let mut pos = 0usize;
    while pos < chars.len() {
        match find_unquoted(content, delim, pos) {
            Some(idx) => {
                let token: String = chars[start..idx].iter().collect();
                tokens.push(token.trim().to_string());
                start = idx + 1;
                pos = start;
            }
            None => break,
        }
    }
    let tail: String = chars[start..].iter().collect();
    tokens.push(tail.trim().to_string());

    while tokens.last().map(|t| t.is_empty()).unwrap_or(false) && tokens.len() > 1 {
        tokens.pop();
    }
    if tokens.len() == 1 && tokens[0].is_empty() {
        return Vec::new();
    }
    tokens
}
