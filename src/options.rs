//! Configuration options for TOON encoding and decoding.
//!
//! This module provides the entire configuration surface of the codec — there
//! are no environment variables or config files, only these two option
//! structs passed explicitly to `to_string_with_options`/`from_str_with_options`:
//!
//! - [`ToonOptions`]: encode-side options (indent, delimiter, length marker)
//! - [`DecodeOptions`]: decode-side options (indent, strict mode)
//! - [`Delimiter`]: Choice of delimiter for arrays and tables (comma, tab, or pipe)
//!
//! ## Examples
//!
//! ```rust
//! use toon_codec::{ToonOptions, Delimiter, to_string_with_options};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Data { x: i32, y: i32 }
//!
//! let data = Data { x: 1, y: 2 };
//!
//! // Use pipe delimiter
//! let options = ToonOptions::new().with_delimiter(Delimiter::Pipe);
//! let toon = to_string_with_options(&data, options).unwrap();
//!
//! // Use length marker '#' for arrays
//! let options = ToonOptions::new().with_length_marker('#');
//! let toon = to_string_with_options(&vec![1, 2, 3], options).unwrap();
//! // Output: "[#3]: 1,2,3"
//! ```

/// Delimiter choice for TOON arrays and tables.
///
/// TOON supports multiple delimiters to optimize for different contexts:
///
/// - **Comma**: Default, most compact
/// - **Tab**: Best for TSV-like output
/// - **Pipe**: Readable for markdown-style tables
///
/// # Examples
///
/// ```rust
/// use toon_codec::Delimiter;
///
/// assert_eq!(Delimiter::Comma.as_str(), ",");
/// assert_eq!(Delimiter::Tab.as_str(), "\t");
/// assert_eq!(Delimiter::Pipe.as_str(), "|");
/// ```
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Delimiter {
    #[default]
    Comma,
    Tab,
    Pipe,
}

impl Delimiter {
    /// Returns the string representation of this delimiter.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Delimiter::Comma => ",",
            Delimiter::Tab => "\t",
            Delimiter::Pipe => "|",
        }
    }

    /// Returns the character representation of this delimiter.
    #[must_use]
    pub const fn as_char(&self) -> char {
        match self {
            Delimiter::Comma => ',',
            Delimiter::Tab => '\t',
            Delimiter::Pipe => '|',
        }
    }
}

/// Encode-side configuration (§3, §4.3, §6).
///
/// This is the entire encoder options surface: an indent width, a delimiter,
/// and an optional decorative length marker. There is no separate "pretty"
/// mode — the encoder always lays out nested structure on its own indented
/// lines; `indent=0` degrades to one space per depth rather than disabling
/// line breaks.
///
/// # Examples
///
/// ```rust
/// use toon_codec::{ToonOptions, Delimiter};
///
/// let options = ToonOptions::new();
/// assert_eq!(options.indent, 2);
///
/// let options = ToonOptions::new()
///     .with_delimiter(Delimiter::Pipe)
///     .with_length_marker('#')
///     .with_indent(4);
/// ```
#[derive(Clone, Debug)]
pub struct ToonOptions {
    pub indent: usize,
    pub delimiter: Delimiter,
    pub length_marker: Option<char>,
}

impl Default for ToonOptions {
    fn default() -> Self {
        ToonOptions {
            indent: 2,
            delimiter: Delimiter::default(),
            length_marker: None,
        }
    }
}

impl ToonOptions {
    /// Creates default options (comma delimiter, 2-space indent, no length marker).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use toon_codec::ToonOptions;
    ///
    /// let options = ToonOptions::new();
    /// assert_eq!(options.indent, 2);
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the indentation size (number of spaces per level).
    ///
    /// Default is 2. `0` degrades to one space per depth (§9 "Indent ambiguity").
    ///
    /// # Examples
    ///
    /// ```rust
    /// use toon_codec::ToonOptions;
    ///
    /// let options = ToonOptions::new().with_indent(4);
    /// assert_eq!(options.indent, 4);
    /// ```
    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Sets the delimiter for arrays and tables.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use toon_codec::{ToonOptions, Delimiter};
    ///
    /// let options = ToonOptions::new().with_delimiter(Delimiter::Pipe);
    /// ```
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: Delimiter) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Sets an optional length marker character for arrays.
    ///
    /// When set, array lengths are prefixed with this character (e.g., `[#3]` instead of `[3]`).
    ///
    /// # Examples
    ///
    /// ```rust
    /// use toon_codec::ToonOptions;
    ///
    /// let options = ToonOptions::new().with_length_marker('#');
    /// ```
    #[must_use]
    pub fn with_length_marker(mut self, marker: char) -> Self {
        self.length_marker = Some(marker);
        self
    }
}

/// Decode-side configuration (§3, §4.4).
///
/// # Examples
///
/// ```rust
/// use toon_codec::DecodeOptions;
///
/// let options = DecodeOptions::new();
/// assert_eq!(options.indent, 2);
/// assert!(options.strict);
///
/// let lenient = DecodeOptions::new().with_strict(false);
/// assert!(!lenient.strict);
/// ```
#[derive(Clone, Debug)]
pub struct DecodeOptions {
    pub indent: usize,
    pub strict: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        DecodeOptions {
            indent: 2,
            strict: true,
        }
    }
}

impl DecodeOptions {
    /// Creates default options (2-space indent, strict mode on).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the expected indent width. `0` means raw indent counts as depth
    /// directly (§9 "Indent ambiguity").
    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Toggles strict mode (§4.4.6): exact length agreement, no in-array blank
    /// lines, no duplicate keys, indent multiples enforced.
    #[must_use]
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_encode_options() {
        let opts = ToonOptions::new();
        assert_eq!(opts.indent, 2);
        assert_eq!(opts.delimiter, Delimiter::Comma);
        assert_eq!(opts.length_marker, None);
    }

    #[test]
    fn default_decode_options() {
        let opts = DecodeOptions::new();
        assert_eq!(opts.indent, 2);
        assert!(opts.strict);
    }

    #[test]
    fn builders_compose() {
        let opts = ToonOptions::new()
            .with_delimiter(Delimiter::Tab)
            .with_length_marker('#')
            .with_indent(4);
        assert_eq!(opts.delimiter, Delimiter::Tab);
        assert_eq!(opts.length_marker, Some('#'));
        assert_eq!(opts.indent, 4);
    }
}
