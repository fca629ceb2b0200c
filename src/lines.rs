//! Line splitting (§4.4.1) and array-header recognition (§4.4.2) shared by
//! the decoder's object/array recursion.

use crate::error::{Error, Result};
use crate::lex;

/// One line of input, already split on indent and left-trimmed (§3 "Parsed line").
#[derive(Debug, Clone)]
pub struct ParsedLine {
    pub raw: String,
    pub content: String,
    pub indent: usize,
    pub depth: usize,
    pub line_no: usize,
    pub is_blank: bool,
}

/// Splits `text` on `\n` into [`ParsedLine`]s. `indent_size == 0` makes
/// `depth` equal the raw indent count (§9 "Indent ambiguity").
pub fn parse_lines(text: &str, indent_size: usize) -> Vec<ParsedLine> {
    text.split('\n')
        .enumerate()
        .map(|(i, raw)| {
            let line_no = i + 1;
            let trimmed = raw.trim_end_matches('\r');
            let indent = trimmed.len() - trimmed.trim_start_matches(' ').len();
            let content = trimmed.trim_start_matches(' ').to_string();
            let is_blank = content.is_empty();
            let depth = if indent_size == 0 {
                indent
            } else {
                indent / indent_size
            };
            ParsedLine {
                raw: trimmed.to_string(),
                content,
                indent,
                depth,
                line_no,
                is_blank,
            }
        })
        .collect()
}

/// `{ key, length, delimiter, fields }` decoded from an array header line
/// (§3 "Array header descriptor").
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderDescriptor {
    pub key: Option<String>,
    pub length: usize,
    pub delimiter: char,
    pub fields: Option<Vec<String>>,
}

const VALID_DELIMS: [char; 3] = [',', '\t', '|'];

/// Attempts to parse `content` as an array-header line (§4.4.2). Returns
/// `None` when `content` has no unquoted `[` at all (an ordinary `kv-line`).
/// Returns an error when a `[` is present but the bracket/field-clause/colon
/// structure does not close out correctly.
///
/// On success, also returns the remainder of the line following the header's
/// terminal `:` (may be empty, or begin with a space before an inline value).
pub fn recognize_header(content: &str, line_no: usize) -> Result<Option<(HeaderDescriptor, String)>> {
    let Some(bracket_idx) = lex::find_unquoted(content, '[', 0) else {
        return Ok(None);
    };

    let key_part = content[..bracket_idx].trim();
    let key = if key_part.is_empty() {
        None
    } else if key_part.starts_with('"') && key_part.ends_with('"') && key_part.len() >= 2 {
        Some(lex::unescape(&key_part[1..key_part.len() - 1], line_no)?)
    } else {
        Some(key_part.to_string())
    };

    let mut pos = bracket_idx + 1;
    let bytes: Vec<char> = content.chars().collect();

    let length_marker = bytes.get(pos) == Some(&'#');
    if length_marker {
        pos += 1;
    }

    let digit_start = pos;
    while bytes.get(pos).map(|c| c.is_ascii_digit()).unwrap_or(false) {
        pos += 1;
    }
    if pos == digit_start {
        return Err(Error::missing_colon(line_no, content));
    }
    let length: usize = content[digit_start..pos]
        .parse()
        .map_err(|_| Error::missing_colon(line_no, content))?;

    let mut delimiter = ',';
    if let Some(&c) = bytes.get(pos) {
        if VALID_DELIMS.contains(&c) && c != ',' {
            delimiter = c;
            pos += 1;
        }
    }

    let Some(&close) = bytes.get(pos) else {
        return Err(Error::unterminated_fields(line_no, content));
    };
    if close != ']' {
        return Err(Error::unterminated_fields(line_no, content));
    }
    pos += 1;

    let mut fields = None;
    if bytes.get(pos) == Some(&'{') {
        let rest: String = bytes[pos..].iter().collect();
        let close_rel = lex::find_unquoted(&rest, '}', 0)
            .ok_or_else(|| Error::unterminated_fields(line_no, content))?;
        let field_content = &rest[1..close_rel];
        fields = Some(lex::parse_delimited_values(field_content, delimiter));
        pos += close_rel + 1;
    }

    if bytes.get(pos) != Some(&':') {
        return Err(Error::missing_colon(line_no, content));
    }
    pos += 1;

    let remainder: String = bytes[pos..].iter().collect();

    Ok(Some((
        HeaderDescriptor {
            key,
            length,
            delimiter,
            fields,
        },
        remainder,
    )))
}

/// True when `content`, scanned quote-aware, contains the active delimiter
/// before any unquoted `:` — the signal that a line under a tabular header is
/// a data row rather than an ordinary `key: value` line (§4.4.4 "Tabular").
pub fn looks_like_table_row(content: &str, delim: char) -> bool {
    match lex::find_first_unquoted(content, &[delim, ':'], 0) {
        Some((_, matched)) => matched == delim,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_lines_with_indent() {
        let lines = parse_lines("a: 1\n  b: 2\n\n", 2);
        assert_eq!(lines[0].depth, 0);
        assert_eq!(lines[1].depth, 1);
        assert!(lines[2].is_blank);
    }

    #[test]
    fn zero_indent_counts_raw_spaces_as_depth() {
        let lines = parse_lines("a: 1\n b: 2\n", 0);
        assert_eq!(lines[1].depth, 1);
    }

    #[test]
    fn recognizes_simple_inline_header() {
        let (header, rest) = recognize_header("tags[3]: red,green,blue", 1)
            .unwrap()
            .unwrap();
        assert_eq!(header.key.as_deref(), Some("tags"));
        assert_eq!(header.length, 3);
        assert_eq!(header.delimiter, ',');
        assert_eq!(header.fields, None);
        assert_eq!(rest, " red,green,blue");
    }

    #[test]
    fn recognizes_tabular_header_with_fields() {
        let (header, rest) = recognize_header("users[2]{id,name}:", 1).unwrap().unwrap();
        assert_eq!(header.key.as_deref(), Some("users"));
        assert_eq!(header.length, 2);
        assert_eq!(header.fields, Some(vec!["id".to_string(), "name".to_string()]));
        assert_eq!(rest, "");
    }

    #[test]
    fn recognizes_anonymous_header() {
        let (header, _) = recognize_header("[0]:", 1).unwrap().unwrap();
        assert_eq!(header.key, None);
        assert_eq!(header.length, 0);
    }

    #[test]
    fn recognizes_length_marker_and_delimiter() {
        let (header, _) = recognize_header("items[#3|]:", 1).unwrap().unwrap();
        assert_eq!(header.length, 3);
        assert_eq!(header.delimiter, '|');
    }

    #[test]
    fn non_header_line_returns_none() {
        assert!(recognize_header("name: Alice", 1).unwrap().is_none());
    }

    #[test]
    fn unterminated_fields_errors() {
        assert!(recognize_header("users[2]{id,name:", 1).is_err());
    }

    #[test]
    fn table_row_detection() {
        assert!(looks_like_table_row("1,A", ','));
        assert!(!looks_like_table_row("name: Alice", ','));
        assert!(!looks_like_table_row(r#""a:b""#, ','));
    }
}
