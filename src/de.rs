//! TOON decoding (§4.4).
//!
//! Decoding happens in two stages. First, [`decode_to_value`] turns the whole
//! document into a [`ToonValue`] tree by tokenizing lines (see [`crate::lines`]),
//! recognizing array headers, and applying the inline/tabular/mixed-list rules
//! of §4.4.4 with the strict-mode checks of §4.4.6. Second, [`Deserializer`]
//! bridges that value tree into serde's `Deserialize` machinery, the same way
//! `serde_json::Value` does — so `#[derive(Deserialize)]` types decode without
//! any additional code.
//!
//! ## Usage
//!
//! ```rust
//! use toon_codec::from_str;
//! use serde::Deserialize;
//!
//! #[derive(Deserialize, Debug, PartialEq)]
//! struct Point { x: i32, y: i32 }
//!
//! let point: Point = from_str("x: 1\ny: 2").unwrap();
//! assert_eq!(point, Point { x: 1, y: 2 });
//! ```

use crate::error::{Error, Result};
use crate::lex;
use crate::lines::{self, HeaderDescriptor, ParsedLine};
use crate::{DecodeOptions, Number, ToonMap, ToonValue};
use serde::de::{self, IntoDeserializer};

/// Parses `text` into a [`ToonValue`] tree (the pure decode direction of §4.4,
/// with no serde involved). This is what [`Deserializer`] wraps.
///
/// # Errors
///
/// Returns a codec error (§4.4.7) on malformed input under strict mode.
pub fn decode_to_value(text: &str, options: &DecodeOptions) -> Result<ToonValue> {
    let mut parsed = lines::parse_lines(text, options.indent);
    while parsed.len() > 1 && parsed.last().map(|l| l.raw.is_empty()).unwrap_or(false) {
        parsed.pop();
    }

    let mut decoder = Decoder {
        lines: parsed,
        pos: 0,
        options: options.clone(),
    };

    decoder.skip_blank();
    let Some(first) = decoder.peek().cloned() else {
        return Ok(ToonValue::Object(ToonMap::new()));
    };

    if let Some((header, remainder)) = lines::recognize_header(&first.content, first.line_no)? {
        // A *keyless* header (`[3]: 1,2,3`) means the whole document is that
        // array. A keyed header (`users[2]{id,name}:`) is an ordinary object
        // with one field, and has to go through `decode_object_body` like
        // any other key does, or the key itself would be silently dropped.
        if header.key.is_none() {
            decoder.pos += 1;
            return decoder.decode_array(header, remainder, first.depth, first.line_no, &first.content);
        }
    }

    // A document with no header and no unquoted colon on its only line isn't
    // a kv-object at all -- it's a bare scalar root (the shape
    // `to_string(&42)` or `to_string(&"hi")` produces).
    let is_only_line = decoder.lines[decoder.pos + 1..].iter().all(|l| l.is_blank);
    if is_only_line && lex::find_unquoted(&first.content, ':', 0).is_none() {
        return decode_primitive_token(&first.content, first.line_no);
    }

    let obj = decoder.decode_object_body(0)?;
    Ok(ToonValue::Object(obj))
}

struct Decoder {
    lines: Vec<ParsedLine>,
    pos: usize,
    options: DecodeOptions,
}

impl Decoder {
    fn peek(&self) -> Option<&ParsedLine> {
        self.lines.get(self.pos)
    }

    fn skip_blank(&mut self) {
        while let Some(l) = self.lines.get(self.pos) {
            if l.is_blank {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn check_indent(&self, line: &ParsedLine) -> Result<()> {
        if self.options.strict && self.options.indent != 0 && line.indent % self.options.indent != 0
        {
            return Err(Error::bad_indent(
                line.line_no,
                &line.content,
                self.options.indent,
                line.indent,
            ));
        }
        Ok(())
    }

    /// §4.4.3: object decode at `depth`.
    fn decode_object_body(&mut self, depth: usize) -> Result<ToonMap> {
        let mut map = ToonMap::new();
        loop {
            self.skip_blank();
            let Some(peeked) = self.peek() else { break };
            if peeked.depth < depth {
                break;
            }
            let line = peeked.clone();
            self.check_indent(&line)?;
            self.pos += 1;

            if let Some((header, remainder)) = lines::recognize_header(&line.content, line.line_no)?
            {
                let key = header
                    .key
                    .clone()
                    .ok_or_else(|| Error::missing_colon(line.line_no, &line.content))?;
                if self.options.strict && map.get(&key).is_some() {
                    return Err(Error::duplicate_key(line.line_no, &line.content, key));
                }
                let value =
                    self.decode_array(header, remainder, line.depth, line.line_no, &line.content)?;
                map.insert(key, value);
                continue;
            }

            let Some(colon_idx) = lex::find_unquoted(&line.content, ':', 0) else {
                if self.options.strict {
                    return Err(Error::missing_colon(line.line_no, &line.content));
                }
                tracing::warn!(
                    line_no = line.line_no,
                    content = %line.content,
                    "non-strict decode: skipping line with no unquoted colon"
                );
                continue;
            };

            let key = parse_key(&line.content[..colon_idx], line.line_no)?;
            if self.options.strict && map.get(&key).is_some() {
                return Err(Error::duplicate_key(line.line_no, &line.content, key));
            }

            let value_part = line.content[colon_idx + 1..].trim();
            let value = if value_part.is_empty() {
                ToonValue::Object(self.decode_object_body(depth + 1)?)
            } else {
                self.decode_primitive(value_part, line.line_no)?
            };
            map.insert(key, value);
        }
        Ok(map)
    }

    /// §4.4.4: dispatch on header shape.
    fn decode_array(
        &mut self,
        header: HeaderDescriptor,
        remainder: String,
        header_depth: usize,
        header_line_no: usize,
        header_content: &str,
    ) -> Result<ToonValue> {
        if let Some(fields) = header.fields.clone() {
            return self.decode_tabular(header, fields, header_depth, header_line_no, header_content);
        }
        if !remainder.trim().is_empty() {
            return self.decode_inline(&header, &remainder, header_line_no, header_content);
        }
        if header.length == 0 {
            return Ok(ToonValue::Array(Vec::new()));
        }
        self.decode_mixed_list(header, header_depth, header_line_no, header_content)
    }

    fn decode_inline(
        &mut self,
        header: &HeaderDescriptor,
        remainder: &str,
        line_no: usize,
        header_content: &str,
    ) -> Result<ToonValue> {
        let tokens = lex::parse_delimited_values(remainder.trim_start(), header.delimiter);
        if self.options.strict && tokens.len() != header.length {
            return Err(Error::length_mismatch(
                line_no,
                header_content,
                header.length,
                tokens.len(),
            ));
        }
        let mut values = Vec::with_capacity(tokens.len());
        for token in tokens {
            values.push(self.decode_primitive(&token, line_no)?);
        }
        Ok(ToonValue::Array(values))
    }

    fn decode_tabular(
        &mut self,
        header: HeaderDescriptor,
        fields: Vec<String>,
        header_depth: usize,
        header_line_no: usize,
        header_content: &str,
    ) -> Result<ToonValue> {
        let row_depth = header_depth + 1;
        let mut rows = Vec::new();

        loop {
            let Some(peeked) = self.peek() else { break };
            if peeked.is_blank {
                if self.options.strict {
                    return Err(Error::unexpected_blank(peeked.line_no, ""));
                }
                self.pos += 1;
                continue;
            }
            if peeked.depth != row_depth {
                break;
            }
            if !lines::looks_like_table_row(&peeked.content, header.delimiter) {
                break;
            }
            let line = peeked.clone();
            self.check_indent(&line)?;
            self.pos += 1;

            let tokens = lex::parse_delimited_values(&line.content, header.delimiter);
            if self.options.strict && tokens.len() != fields.len() {
                return Err(Error::row_width_mismatch(
                    line.line_no,
                    &line.content,
                    fields.len(),
                    tokens.len(),
                ));
            }
            let mut obj = ToonMap::new();
            for (i, field) in fields.iter().enumerate() {
                let value = match tokens.get(i) {
                    Some(tok) => self.decode_primitive(tok, line.line_no)?,
                    None => ToonValue::Null,
                };
                obj.insert(field.clone(), value);
            }
            rows.push(ToonValue::Object(obj));
        }

        if self.options.strict && rows.len() != header.length {
            return Err(Error::length_mismatch(
                header_line_no,
                header_content,
                header.length,
                rows.len(),
            ));
        }
        Ok(ToonValue::Array(rows))
    }

    fn decode_mixed_list(
        &mut self,
        header: HeaderDescriptor,
        header_depth: usize,
        header_line_no: usize,
        header_content: &str,
    ) -> Result<ToonValue> {
        let item_depth = header_depth + 1;
        let mut items = Vec::new();

        loop {
            let Some(peeked) = self.peek() else { break };
            if peeked.is_blank {
                if self.options.strict {
                    return Err(Error::unexpected_blank(peeked.line_no, ""));
                }
                self.pos += 1;
                continue;
            }
            if peeked.depth != item_depth {
                break;
            }
            if !(peeked.content.starts_with("- ") || peeked.content == "-") {
                break;
            }
            let line = peeked.clone();
            self.check_indent(&line)?;
            self.pos += 1;

            let item_content = line
                .content
                .strip_prefix("- ")
                .or_else(|| line.content.strip_prefix('-'))
                .unwrap_or("");
            let value = self.decode_list_item(item_content, item_depth, line.line_no)?;
            items.push(value);
        }

        if self.options.strict && items.len() != header.length {
            return Err(Error::length_mismatch(
                header_line_no,
                header_content,
                header.length,
                items.len(),
            ));
        }
        Ok(ToonValue::Array(items))
    }

    /// One `- ...` item, mirroring the encoder's mixed-list packing (§4.3 item 4).
    fn decode_list_item(&mut self, content: &str, item_depth: usize, line_no: usize) -> Result<ToonValue> {
        if content.trim().is_empty() {
            if self
                .peek()
                .map(|l| l.depth > item_depth && !l.is_blank)
                .unwrap_or(false)
            {
                let obj = self.decode_object_body(item_depth + 1)?;
                return Ok(ToonValue::Object(obj));
            }
            return Ok(ToonValue::Object(ToonMap::new()));
        }

        if let Some((header, remainder)) = lines::recognize_header(content, line_no)? {
            return self.decode_array(header, remainder, item_depth, line_no, content);
        }

        if let Some(colon_idx) = lex::find_unquoted(content, ':', 0) {
            let key = parse_key(&content[..colon_idx], line_no)?;
            let value_part = content[colon_idx + 1..].trim();

            let mut obj = ToonMap::new();
            let first_value = if value_part.is_empty() {
                ToonValue::Object(self.decode_object_body(item_depth + 1)?)
            } else {
                self.decode_primitive(value_part, line_no)?
            };
            obj.insert(key, first_value);

            let rest = self.decode_object_body(item_depth + 1)?;
            for (k, v) in rest.into_iter() {
                obj.insert(k, v);
            }
            return Ok(ToonValue::Object(obj));
        }

        self.decode_primitive(content, line_no)
    }

    /// §4.4.5: primitive token parsing.
    fn decode_primitive(&self, token: &str, line_no: usize) -> Result<ToonValue> {
        decode_primitive_token(token, line_no)
    }
}

/// §4.4.5 primitive token parsing, standalone so callers outside the document
/// recursion (the adapter's field-extraction fallback, §4.5.3) can decode a
/// single scalar without round-tripping through a whole document.
pub(crate) fn decode_primitive_token(token: &str, line_no: usize) -> Result<ToonValue> {
    let t = token.trim();
    if t.eq_ignore_ascii_case("null") {
        return Ok(ToonValue::Null);
    }
    if t.eq_ignore_ascii_case("true") {
        return Ok(ToonValue::Bool(true));
    }
    if t.eq_ignore_ascii_case("false") {
        return Ok(ToonValue::Bool(false));
    }
    if let Some(rest) = t.strip_prefix('"') {
        if !rest.ends_with('"') || rest.is_empty() {
            return Err(Error::unterminated_string(line_no, t));
        }
        let inner = &rest[..rest.len() - 1];
        return Ok(ToonValue::String(lex::unescape(inner, line_no)?));
    }
    if lex::is_numeric_like(t) {
        if t.contains('.') || t.contains('e') || t.contains('E') {
            if let Ok(f) = t.parse::<f64>() {
                return Ok(ToonValue::Number(
                    Number::normalize_f64(f).unwrap_or(Number::Integer(0)),
                ));
            }
        } else if let Ok(i) = t.parse::<i64>() {
            return Ok(ToonValue::Number(Number::Integer(i)));
        } else if let Ok(f) = t.parse::<f64>() {
            return Ok(ToonValue::Number(
                Number::normalize_f64(f).unwrap_or(Number::Integer(0)),
            ));
        }
    }
    Ok(ToonValue::String(t.to_string()))
}

fn parse_key(raw: &str, line_no: usize) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.starts_with('"') && trimmed.ends_with('"') && trimmed.len() >= 2 {
        lex::unescape(&trimmed[1..trimmed.len() - 1], line_no)
    } else {
        Ok(trimmed.to_string())
    }
}

/// Bridges a decoded [`ToonValue`] tree into serde's `Deserialize` machinery,
/// the same way `serde_json::Value` does: every `deserialize_*` method just
/// inspects which case `self.value` holds and calls the matching serde visitor
/// method.
pub struct Deserializer {
    value: ToonValue,
}

impl Deserializer {
    /// Parses `s` with default [`DecodeOptions`].
    pub fn from_str(s: &str) -> Self {
        Self::from_str_with_options(s, DecodeOptions::default())
    }

    /// Parses `s` with explicit [`DecodeOptions`].
    pub fn from_str_with_options(s: &str, options: DecodeOptions) -> Self {
        let value = decode_to_value(s, &options).unwrap_or(ToonValue::Null);
        Deserializer { value }
    }

    fn from_value(value: ToonValue) -> Self {
        Deserializer { value }
    }
}

macro_rules! deserialize_scalar {
    ($method:ident, $visit:ident, $as_ty:ident, $ty:ty) => {
        fn $method<V>(self, visitor: V) -> Result<V::Value>
        where
            V: de::Visitor<'de>,
        {
            match &self.value {
                ToonValue::Number(n) => visitor.$visit(n.$as_ty() as $ty),
                other => Err(Error::type_mismatch(stringify!($ty), &format!("{:?}", other))),
            }
        }
    };
}

impl<'de> de::Deserializer<'de> for &mut Deserializer {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match std::mem::take(&mut self.value) {
            ToonValue::Null => visitor.visit_unit(),
            ToonValue::Bool(b) => visitor.visit_bool(b),
            ToonValue::Number(Number::Integer(i)) => visitor.visit_i64(i),
            ToonValue::Number(Number::Float(f)) => visitor.visit_f64(f),
            ToonValue::String(s) => visitor.visit_string(s),
            ToonValue::Array(arr) => visitor.visit_seq(SeqAccess { iter: arr.into_iter() }),
            ToonValue::Object(obj) => visitor.visit_map(MapAccess {
                iter: obj.into_iter(),
                value: None,
            }),
        }
    }

    fn deserialize_bool<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match &self.value {
            ToonValue::Bool(b) => visitor.visit_bool(*b),
            other => Err(Error::type_mismatch("bool", &format!("{:?}", other))),
        }
    }

    deserialize_scalar!(deserialize_i8, visit_i8, as_i64, i8);
    deserialize_scalar!(deserialize_i16, visit_i16, as_i64, i16);
    deserialize_scalar!(deserialize_i32, visit_i32, as_i64, i32);
    deserialize_scalar!(deserialize_u8, visit_u8, as_i64, u8);
    deserialize_scalar!(deserialize_u16, visit_u16, as_i64, u16);
    deserialize_scalar!(deserialize_u32, visit_u32, as_i64, u32);

    fn deserialize_i64<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match &self.value {
            ToonValue::Number(n) => visitor.visit_i64(n.as_i64().unwrap_or(n.as_f64() as i64)),
            other => Err(Error::type_mismatch("i64", &format!("{:?}", other))),
        }
    }

    fn deserialize_u64<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match &self.value {
            ToonValue::Number(n) => visitor.visit_u64(n.as_f64() as u64),
            other => Err(Error::type_mismatch("u64", &format!("{:?}", other))),
        }
    }

    fn deserialize_f32<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match &self.value {
            ToonValue::Number(n) => visitor.visit_f32(n.as_f64() as f32),
            other => Err(Error::type_mismatch("f32", &format!("{:?}", other))),
        }
    }

    fn deserialize_f64<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match &self.value {
            ToonValue::Number(n) => visitor.visit_f64(n.as_f64()),
            other => Err(Error::type_mismatch("f64", &format!("{:?}", other))),
        }
    }

    fn deserialize_char<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match &self.value {
            ToonValue::String(s) if s.chars().count() == 1 => {
                visitor.visit_char(s.chars().next().unwrap())
            }
            other => Err(Error::type_mismatch("char", &format!("{:?}", other))),
        }
    }

    fn deserialize_str<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match std::mem::take(&mut self.value) {
            ToonValue::String(s) => visitor.visit_string(s),
            other => Err(Error::type_mismatch("string", &format!("{:?}", other))),
        }
    }

    fn deserialize_string<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_str(visitor)
    }

    fn deserialize_bytes<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_byte_buf<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match &self.value {
            ToonValue::Null => visitor.visit_none(),
            _ => visitor.visit_some(self),
        }
    }

    fn deserialize_unit<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match &self.value {
            ToonValue::Null => visitor.visit_unit(),
            other => Err(Error::type_mismatch("null", &format!("{:?}", other))),
        }
    }

    fn deserialize_unit_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_unit(visitor)
    }

    fn deserialize_newtype_struct<V>(self, _name: &'static str, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match std::mem::take(&mut self.value) {
            ToonValue::Array(arr) => visitor.visit_seq(SeqAccess { iter: arr.into_iter() }),
            other => Err(Error::type_mismatch("array", &format!("{:?}", other))),
        }
    }

    fn deserialize_tuple<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_tuple_struct<V>(
        self,
        _name: &'static str,
        _len: usize,
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_seq(visitor)
    }

    fn deserialize_map<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match std::mem::take(&mut self.value) {
            ToonValue::Object(obj) => visitor.visit_map(MapAccess {
                iter: obj.into_iter(),
                value: None,
            }),
            other => Err(Error::type_mismatch("object", &format!("{:?}", other))),
        }
    }

    fn deserialize_struct<V>(
        self,
        _name: &'static str,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_map(visitor)
    }

    fn deserialize_enum<V>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        match std::mem::take(&mut self.value) {
            ToonValue::String(s) => visitor.visit_enum(s.into_deserializer()),
            ToonValue::Object(obj) => {
                if obj.len() != 1 {
                    return Err(Error::type_mismatch(
                        "single-key object (enum variant)",
                        &format!("object with {} keys", obj.len()),
                    ));
                }
                let (variant, value) = obj.into_iter().next().unwrap();
                visitor.visit_enum(EnumAccess { variant, value })
            }
            other => Err(Error::type_mismatch("enum", &format!("{:?}", other))),
        }
    }

    fn deserialize_identifier<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_str(visitor)
    }

    fn deserialize_ignored_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        self.deserialize_any(visitor)
    }
}

struct SeqAccess {
    iter: std::vec::IntoIter<ToonValue>,
}

impl<'de> de::SeqAccess<'de> for SeqAccess {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some(value) => {
                let mut de = Deserializer::from_value(value);
                seed.deserialize(&mut de).map(Some)
            }
            None => Ok(None),
        }
    }
}

struct MapAccess {
    iter: indexmap::map::IntoIter<String, ToonValue>,
    value: Option<ToonValue>,
}

impl<'de> de::MapAccess<'de> for MapAccess {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: de::DeserializeSeed<'de>,
    {
        match self.iter.next() {
            Some((key, value)) => {
                self.value = Some(value);
                let mut de = Deserializer::from_value(ToonValue::String(key));
                seed.deserialize(&mut de).map(Some)
            }
            None => Ok(None),
        }
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: de::DeserializeSeed<'de>,
    {
        let value = self
            .value
            .take()
            .ok_or_else(|| Error::custom("next_value_seed called before next_key_seed"))?;
        let mut de = Deserializer::from_value(value);
        seed.deserialize(&mut de)
    }
}

struct EnumAccess {
    variant: String,
    value: ToonValue,
}

impl<'de> de::EnumAccess<'de> for EnumAccess {
    type Error = Error;
    type Variant = VariantAccess;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant)>
    where
        V: de::DeserializeSeed<'de>,
    {
        let mut de = Deserializer::from_value(ToonValue::String(self.variant));
        let variant = seed.deserialize(&mut de)?;
        Ok((variant, VariantAccess { value: self.value }))
    }
}

struct VariantAccess {
    value: ToonValue,
}

impl<'de> de::VariantAccess<'de> for VariantAccess {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        Ok(())
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value>
    where
        T: de::DeserializeSeed<'de>,
    {
        let mut de = Deserializer::from_value(self.value);
        seed.deserialize(&mut de)
    }

    fn tuple_variant<V>(self, _len: usize, visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let mut de = Deserializer::from_value(self.value);
        de::Deserializer::deserialize_seq(&mut de, visitor)
    }

    fn struct_variant<V>(self, _fields: &'static [&'static str], visitor: V) -> Result<V::Value>
    where
        V: de::Visitor<'de>,
    {
        let mut de = Deserializer::from_value(self.value);
        de::Deserializer::deserialize_map(&mut de, visitor)
    }
}
