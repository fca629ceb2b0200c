//! The indent-prefix cache used by the encoder (§4.3, §5 resource policy).
//!
//! A single `encode` call builds one `LineWriter`; it is never shared across
//! calls or threads. It exists only to avoid rebuilding the same `"  "` /
//! `"    "` prefix string on every line at a given depth.

/// Caches the leading-whitespace prefix for each indentation depth seen so
/// far during one encode pass.
pub struct LineWriter {
    indent: usize,
    prefixes: Vec<String>,
}

impl LineWriter {
    /// `indent` is the configured indent width; `0` degrades to one space per
    /// depth so structure stays recoverable (§9 "Indent ambiguity").
    pub fn new(indent: usize) -> Self {
        LineWriter {
            indent: if indent == 0 { 1 } else { indent },
            prefixes: vec![String::new()],
        }
    }

    /// Returns the whitespace prefix for `depth`, computing and caching it on
    /// first use.
    pub fn prefix(&mut self, depth: usize) -> &str {
        while self.prefixes.len() <= depth {
            let next_depth = self.prefixes.len();
            self.prefixes.push(" ".repeat(next_depth * self.indent));
        }
        &self.prefixes[depth]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caches_and_computes_prefixes() {
        let mut writer = LineWriter::new(2);
        assert_eq!(writer.prefix(0), "");
        assert_eq!(writer.prefix(2), "    ");
        assert_eq!(writer.prefix(1), "  ");
    }

    #[test]
    fn zero_indent_degrades_to_one_space() {
        let mut writer = LineWriter::new(0);
        assert_eq!(writer.prefix(3), "   ");
    }
}
