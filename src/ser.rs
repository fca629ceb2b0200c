//! TOON encoding (§4.3).
//!
//! This module provides the [`Serializer`] implementation that converts
//! Rust data structures into TOON format strings.
//!
//! ## Overview
//!
//! The serializer automatically applies TOON's space-saving optimizations:
//!
//! - **Tabular arrays**: Homogeneous object arrays serialize as compact tables
//! - **Inline primitives**: Simple arrays serialize inline (e.g., `[3]: 1,2,3`)
//! - **List format**: Complex arrays use list syntax with `- ` prefixes
//! - **Quote minimization**: Strings are unquoted when safe
//!
//! Array shape selection is purely structural (§4.3): two structurally equal
//! normalized values produce identical bytes under equal options, and object
//! field order always follows insertion order, never a sort.
//!
//! ## Usage
//!
//! Most users should use the high-level functions in the crate root:
//!
//! ```rust
//! use toon_codec::{to_string, to_string_with_options, ToonOptions};
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Data { x: i32, y: i32 }
//!
//! let data = Data { x: 1, y: 2 };
//! let toon = to_string(&data).unwrap();
//! assert_eq!(toon, "x: 1\ny: 2");
//! ```
//!
//! ## Direct Serializer Usage
//!
//! ```rust
//! use toon_codec::{Serializer, ToonOptions};
//! use serde::Serialize;
//!
//! let options = ToonOptions::new();
//! let mut serializer = Serializer::new(options);
//!
//! let data = vec![1, 2, 3, 4, 5];
//! data.serialize(&mut serializer).unwrap();
//!
//! let toon_string = serializer.into_inner();
//! assert_eq!(toon_string, "[5]: 1,2,3,4,5");
//! ```

use crate::line_writer::LineWriter;
use crate::{Delimiter, Error, Number, Result, ToonMap, ToonOptions, ToonValue};
use serde::ser::SerializeSeq;
use serde::{ser, Serialize};

/// The TOON encoder.
///
/// Converts Rust values implementing `Serialize` into TOON format strings.
/// Created via [`Serializer::new`] with customizable options.
pub struct Serializer {
    output: String,
    options: ToonOptions,
    indent_level: usize,
    writer: LineWriter,
}

impl Serializer {
    pub fn new(options: ToonOptions) -> Self {
        let writer = LineWriter::new(options.indent);
        Serializer {
            output: String::with_capacity(256),
            options,
            indent_level: 0,
            writer,
        }
    }

    pub fn into_inner(self) -> String {
        self.output
    }

    #[inline]
    fn write_string(&mut self, s: &str) {
        write_quoted_string(&mut self.output, s, self.options.delimiter.as_char());
    }
}

impl<'a> ser::Serializer for &'a mut Serializer {
    type Ok = ();
    type Error = Error;

    type SerializeSeq = SeqSerializer<'a>;
    type SerializeTuple = TupleSerializer<'a>;
    type SerializeTupleStruct = TupleStructSerializer<'a>;
    type SerializeTupleVariant = TupleVariantSerializer<'a>;
    type SerializeMap = MapSerializer<'a>;
    type SerializeStruct = StructSerializer<'a>;
    type SerializeStructVariant = StructVariantSerializer<'a>;

    fn serialize_bool(self, v: bool) -> Result<Self::Ok> {
        self.output.push_str(if v { "true" } else { "false" });
        Ok(())
    }

    fn serialize_i8(self, v: i8) -> Result<Self::Ok> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i16(self, v: i16) -> Result<Self::Ok> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i32(self, v: i32) -> Result<Self::Ok> {
        self.serialize_i64(v as i64)
    }

    fn serialize_i64(self, v: i64) -> Result<Self::Ok> {
        self.output.push_str(&v.to_string());
        Ok(())
    }

    fn serialize_u8(self, v: u8) -> Result<Self::Ok> {
        self.serialize_u64(v as u64)
    }

    fn serialize_u16(self, v: u16) -> Result<Self::Ok> {
        self.serialize_u64(v as u64)
    }

    fn serialize_u32(self, v: u32) -> Result<Self::Ok> {
        self.serialize_u64(v as u64)
    }

    fn serialize_u64(self, v: u64) -> Result<Self::Ok> {
        self.output.push_str(&v.to_string());
        Ok(())
    }

    fn serialize_f32(self, v: f32) -> Result<Self::Ok> {
        self.serialize_f64(v as f64)
    }

    fn serialize_f64(self, v: f64) -> Result<Self::Ok> {
        self.output.push_str(&format_float(v));
        Ok(())
    }

    fn serialize_char(self, v: char) -> Result<Self::Ok> {
        self.serialize_str(&v.to_string())
    }

    fn serialize_str(self, v: &str) -> Result<Self::Ok> {
        self.write_string(v);
        Ok(())
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Self::Ok> {
        use ser::SerializeSeq;
        let mut seq = self.serialize_seq(Some(v.len()))?;
        for byte in v {
            seq.serialize_element(byte)?;
        }
        seq.end()
    }

    fn serialize_none(self) -> Result<Self::Ok> {
        self.serialize_unit()
    }

    fn serialize_some<T>(self, value: &T) -> Result<Self::Ok>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Self::Ok> {
        self.output.push_str("null");
        Ok(())
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Self::Ok> {
        self.serialize_unit()
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Self::Ok> {
        self.serialize_str(variant)
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<Self::Ok>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Self::Ok>
    where
        T: ?Sized + Serialize,
    {
        self.output.push_str(variant);
        self.output.push_str(": ");
        value.serialize(self)
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq> {
        Ok(SeqSerializer {
            ser: self,
            elements: Vec::new(),
        })
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple> {
        Ok(TupleSerializer {
            ser: self,
            elements: Vec::new(),
        })
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        Ok(TupleStructSerializer {
            ser: self,
            elements: Vec::new(),
        })
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Ok(TupleVariantSerializer {
            ser: self,
            variant: variant.to_string(),
            elements: Vec::new(),
        })
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap> {
        Ok(MapSerializer {
            ser: self,
            entries: Vec::new(),
            current_key: None,
        })
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Self::SerializeStruct> {
        Ok(StructSerializer {
            ser: self,
            entries: Vec::new(),
        })
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Ok(StructVariantSerializer {
            ser: self,
            variant: variant.to_string(),
            entries: Vec::new(),
        })
    }
}

pub struct SeqSerializer<'a> {
    ser: &'a mut Serializer,
    elements: Vec<ToonValue>,
}

impl<'a> ser::SerializeSeq for SeqSerializer<'a> {
    type Ok = ();
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let toon_value = to_toon_value(value)?;
        self.elements.push(toon_value);
        Ok(())
    }

    fn end(self) -> Result<Self::Ok> {
        write_array_toon(
            &mut self.ser.output,
            &mut self.ser.writer,
            &self.elements,
            &self.ser.options,
            self.ser.indent_level,
        );
        Ok(())
    }
}

pub struct TupleSerializer<'a> {
    ser: &'a mut Serializer,
    elements: Vec<ToonValue>,
}

impl<'a> ser::SerializeTuple for TupleSerializer<'a> {
    type Ok = ();
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let toon_value = to_toon_value(value)?;
        self.elements.push(toon_value);
        Ok(())
    }

    fn end(self) -> Result<Self::Ok> {
        let seq_ser = SeqSerializer {
            ser: self.ser,
            elements: self.elements,
        };
        seq_ser.end()
    }
}

pub struct TupleStructSerializer<'a> {
    ser: &'a mut Serializer,
    elements: Vec<ToonValue>,
}

impl<'a> ser::SerializeTupleStruct for TupleStructSerializer<'a> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let toon_value = to_toon_value(value)?;
        self.elements.push(toon_value);
        Ok(())
    }

    fn end(self) -> Result<Self::Ok> {
        let seq_ser = SeqSerializer {
            ser: self.ser,
            elements: self.elements,
        };
        seq_ser.end()
    }
}

pub struct TupleVariantSerializer<'a> {
    ser: &'a mut Serializer,
    variant: String,
    elements: Vec<ToonValue>,
}

impl<'a> ser::SerializeTupleVariant for TupleVariantSerializer<'a> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let toon_value = to_toon_value(value)?;
        self.elements.push(toon_value);
        Ok(())
    }

    fn end(self) -> Result<Self::Ok> {
        self.ser.output.push_str(&self.variant);
        self.ser.output.push_str(": ");

        let seq_ser = SeqSerializer {
            ser: self.ser,
            elements: self.elements,
        };
        seq_ser.end()
    }
}

pub struct MapSerializer<'a> {
    ser: &'a mut Serializer,
    entries: Vec<(String, ToonValue)>,
    current_key: Option<String>,
}

impl<'a> ser::SerializeMap for MapSerializer<'a> {
    type Ok = ();
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key_value = to_toon_value(key)?;
        match key_value {
            ToonValue::String(s) => {
                self.current_key = Some(s);
                Ok(())
            }
            other => {
                // Non-string keys stringify (§4.2 value normalizer).
                self.current_key = Some(other.to_string());
                Ok(())
            }
        }
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .current_key
            .take()
            .ok_or_else(|| Error::custom("serialize_value called without serialize_key"))?;
        let toon_value = to_toon_value(value)?;
        self.entries.push((key, toon_value));
        Ok(())
    }

    fn end(self) -> Result<Self::Ok> {
        write_object(
            &mut self.ser.output,
            &mut self.ser.writer,
            &self.entries,
            &self.ser.options,
            self.ser.indent_level,
        );
        Ok(())
    }
}

pub struct StructSerializer<'a> {
    ser: &'a mut Serializer,
    entries: Vec<(String, ToonValue)>,
}

impl<'a> ser::SerializeStruct for StructSerializer<'a> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let toon_value = to_toon_value(value)?;
        self.entries.push((key.to_string(), toon_value));
        Ok(())
    }

    fn end(self) -> Result<Self::Ok> {
        write_object(
            &mut self.ser.output,
            &mut self.ser.writer,
            &self.entries,
            &self.ser.options,
            self.ser.indent_level,
        );
        Ok(())
    }
}

pub struct StructVariantSerializer<'a> {
    ser: &'a mut Serializer,
    variant: String,
    entries: Vec<(String, ToonValue)>,
}

impl<'a> ser::SerializeStructVariant for StructVariantSerializer<'a> {
    type Ok = ();
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let toon_value = to_toon_value(value)?;
        self.entries.push((key.to_string(), toon_value));
        Ok(())
    }

    fn end(self) -> Result<Self::Ok> {
        self.ser.output.push_str(&self.variant);
        self.ser.output.push(':');
        self.ser.output.push('\n');
        self.ser.indent_level += 1;

        write_object(
            &mut self.ser.output,
            &mut self.ser.writer,
            &self.entries,
            &self.ser.options,
            self.ser.indent_level,
        );

        self.ser.indent_level -= 1;

        Ok(())
    }
}

pub struct ToonValueSerializer;

pub struct SerializeVec {
    vec: Vec<ToonValue>,
}

pub struct SerializeMap {
    map: ToonMap,
    current_key: Option<String>,
}

impl ser::Serializer for ToonValueSerializer {
    type Ok = ToonValue;
    type Error = Error;

    type SerializeSeq = SerializeVec;
    type SerializeTuple = SerializeVec;
    type SerializeTupleStruct = SerializeVec;
    type SerializeTupleVariant = SerializeVec;
    type SerializeMap = SerializeMap;
    type SerializeStruct = SerializeMap;
    type SerializeStructVariant = SerializeMap;

    fn serialize_bool(self, v: bool) -> Result<ToonValue> {
        Ok(ToonValue::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<ToonValue> {
        Ok(ToonValue::Number(Number::Integer(v as i64)))
    }

    fn serialize_i16(self, v: i16) -> Result<ToonValue> {
        Ok(ToonValue::Number(Number::Integer(v as i64)))
    }

    fn serialize_i32(self, v: i32) -> Result<ToonValue> {
        Ok(ToonValue::Number(Number::Integer(v as i64)))
    }

    fn serialize_i64(self, v: i64) -> Result<ToonValue> {
        Ok(ToonValue::Number(Number::Integer(v)))
    }

    fn serialize_u8(self, v: u8) -> Result<ToonValue> {
        Ok(ToonValue::Number(Number::Integer(v as i64)))
    }

    fn serialize_u16(self, v: u16) -> Result<ToonValue> {
        Ok(ToonValue::Number(Number::Integer(v as i64)))
    }

    fn serialize_u32(self, v: u32) -> Result<ToonValue> {
        Ok(ToonValue::Number(Number::Integer(v as i64)))
    }

    fn serialize_u64(self, v: u64) -> Result<ToonValue> {
        if v <= i64::MAX as u64 {
            Ok(ToonValue::Number(Number::Integer(v as i64)))
        } else {
            Ok(ToonValue::Number(
                Number::normalize_f64(v as f64).unwrap_or(Number::Integer(i64::MAX)),
            ))
        }
    }

    fn serialize_f32(self, v: f32) -> Result<ToonValue> {
        self.serialize_f64(v as f64)
    }

    fn serialize_f64(self, v: f64) -> Result<ToonValue> {
        match Number::normalize_f64(v) {
            Some(n) => Ok(ToonValue::Number(n)),
            None => Ok(ToonValue::Null),
        }
    }

    fn serialize_char(self, v: char) -> Result<ToonValue> {
        Ok(ToonValue::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<ToonValue> {
        Ok(ToonValue::String(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<ToonValue> {
        let vec = v
            .iter()
            .map(|&b| ToonValue::Number(Number::Integer(b as i64)))
            .collect();
        Ok(ToonValue::Array(vec))
    }

    fn serialize_none(self) -> Result<ToonValue> {
        Ok(ToonValue::Null)
    }

    fn serialize_some<T>(self, value: &T) -> Result<ToonValue>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<ToonValue> {
        Ok(ToonValue::Null)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<ToonValue> {
        Ok(ToonValue::Null)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<ToonValue> {
        Ok(ToonValue::String(variant.to_string()))
    }

    fn serialize_newtype_struct<T>(self, _name: &'static str, value: &T) -> Result<ToonValue>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<ToonValue>
    where
        T: ?Sized + Serialize,
    {
        let mut map = ToonMap::new();
        map.insert(variant.to_string(), to_toon_value(value)?);
        Ok(ToonValue::Object(map))
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<SerializeVec> {
        Ok(SerializeVec::new())
    }

    fn serialize_tuple(self, _len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new())
    }

    fn serialize_tuple_struct(self, _name: &'static str, _len: usize) -> Result<SerializeVec> {
        Ok(SerializeVec::new())
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<SerializeVec> {
        Err(Error::unsupported_type("tuple variants"))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<SerializeMap> {
        Ok(SerializeMap::new())
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<SerializeMap> {
        Ok(SerializeMap::new())
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<SerializeMap> {
        Err(Error::unsupported_type("struct variants"))
    }
}

impl SerializeVec {
    fn new() -> Self {
        SerializeVec { vec: Vec::new() }
    }
}

impl SerializeMap {
    fn new() -> Self {
        SerializeMap {
            map: ToonMap::new(),
            current_key: None,
        }
    }
}

impl ser::SerializeSeq for SerializeVec {
    type Ok = ToonValue;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.vec.push(to_toon_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<ToonValue> {
        Ok(ToonValue::Array(self.vec))
    }
}

impl ser::SerializeTuple for SerializeVec {
    type Ok = ToonValue;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.vec.push(to_toon_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<ToonValue> {
        Ok(ToonValue::Array(self.vec))
    }
}

impl ser::SerializeTupleStruct for SerializeVec {
    type Ok = ToonValue;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.vec.push(to_toon_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<ToonValue> {
        Ok(ToonValue::Array(self.vec))
    }
}

impl ser::SerializeTupleVariant for SerializeVec {
    type Ok = ToonValue;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.vec.push(to_toon_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<ToonValue> {
        Ok(ToonValue::Array(self.vec))
    }
}

impl ser::SerializeMap for SerializeMap {
    type Ok = ToonValue;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        match to_toon_value(key)? {
            ToonValue::String(s) => {
                self.current_key = Some(s);
                Ok(())
            }
            other => {
                self.current_key = Some(other.to_string());
                Ok(())
            }
        }
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self
            .current_key
            .take()
            .ok_or_else(|| Error::custom("serialize_value called without serialize_key"))?;
        self.map.insert(key, to_toon_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<ToonValue> {
        Ok(ToonValue::Object(self.map))
    }
}

impl ser::SerializeStruct for SerializeMap {
    type Ok = ToonValue;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.map.insert(key.to_string(), to_toon_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<ToonValue> {
        Ok(ToonValue::Object(self.map))
    }
}

impl ser::SerializeStructVariant for SerializeMap {
    type Ok = ToonValue;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.map.insert(key.to_string(), to_toon_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<ToonValue> {
        Ok(ToonValue::Object(self.map))
    }
}

fn to_toon_value<T: Serialize + ?Sized>(value: &T) -> Result<ToonValue> {
    value.serialize(ToonValueSerializer)
}

/// Formats a finite f64 in fixed decimal, never scientific notation (§4.3).
fn format_float(v: f64) -> String {
    let default = v.to_string();
    if default.contains('e') || default.contains('E') {
        format!("{:.17}", v)
            .trim_end_matches('0')
            .trim_end_matches('.')
            .to_string()
    } else {
        default
    }
}

fn write_quoted_string(output: &mut String, s: &str, delim: char) {
    if crate::lex::is_safe_unquoted(s, delim) {
        output.push_str(s);
    } else {
        output.push('"');
        output.push_str(&crate::lex::escape(s));
        output.push('"');
    }
}

#[inline]
fn is_primitive_value(value: &ToonValue) -> bool {
    value.is_primitive()
}

/// Tabular eligibility per §4.3/§9: every element must be an object, all
/// objects must share the *same ordered* key set (insertion order, not a
/// sort), and every value must be primitive. A single mismatch demotes the
/// whole array to mixed-list form.
fn can_be_tabular(elements: &[ToonValue]) -> Option<(Vec<String>, Vec<Vec<ToonValue>>)> {
    if elements.is_empty() {
        return None;
    }

    let first_headers: Vec<String> = match &elements[0] {
        ToonValue::Object(obj) => {
            if obj.values().any(|v| !is_primitive_value(v)) {
                return None;
            }
            obj.keys().cloned().collect()
        }
        _ => return None,
    };

    let mut rows = Vec::with_capacity(elements.len());
    for element in elements {
        match element {
            ToonValue::Object(obj) => {
                let element_headers: Vec<&String> = obj.keys().collect();
                if element_headers.len() != first_headers.len()
                    || element_headers
                        .iter()
                        .zip(first_headers.iter())
                        .any(|(a, b)| *a != b)
                {
                    return None;
                }
                if obj.values().any(|v| !is_primitive_value(v)) {
                    return None;
                }
                let row: Vec<_> = first_headers
                    .iter()
                    .map(|key| obj.get(key).cloned().unwrap_or(ToonValue::Null))
                    .collect();
                rows.push(row);
            }
            _ => return None,
        }
    }

    Some((first_headers, rows))
}

fn write_tabular_array(
    output: &mut String,
    writer: &mut LineWriter,
    headers: &[String],
    rows: &[Vec<ToonValue>],
    options: &ToonOptions,
    indent_level: usize,
) {
    write_array_header(output, options, rows.len(), Some(headers));

    let prefix = writer.prefix(indent_level + 1).to_string();
    let delimiter_str = options.delimiter.as_str();
    for row in rows {
        output.push('\n');
        output.push_str(&prefix);
        for (i, value) in row.iter().enumerate() {
            if i > 0 {
                output.push_str(delimiter_str);
            }
            write_toon_value_quoted(output, writer, value, options, indent_level + 1);
        }
    }
}

fn write_inline_array(output: &mut String, elements: &[ToonValue], options: &ToonOptions) {
    write_array_header(output, options, elements.len(), None);
    output.push(' ');

    let delimiter_str = options.delimiter.as_str();
    for (i, element) in elements.iter().enumerate() {
        if i > 0 {
            output.push_str(delimiter_str);
        }
        write_quoted_element(output, element, options);
    }
}

fn write_list_array(
    output: &mut String,
    writer: &mut LineWriter,
    elements: &[ToonValue],
    options: &ToonOptions,
    indent_level: usize,
) {
    write_array_header(output, options, elements.len(), None);

    let item_prefix = writer.prefix(indent_level + 1).to_string();
    for element in elements {
        output.push('\n');
        output.push_str(&item_prefix);
        output.push_str("- ");

        match element {
            ToonValue::Object(obj) => {
                let mut iter = obj.iter();
                if let Some((first_key, first_value)) = iter.next() {
                    if is_primitive_value(first_value) {
                        output.push_str(first_key);
                        output.push_str(": ");
                        write_quoted_element(output, first_value, options);
                    } else {
                        output.push_str(first_key);
                        match first_value {
                            ToonValue::Array(arr) => {
                                write_array_toon(output, writer, arr, options, indent_level + 1);
                            }
                            ToonValue::Object(_) => {
                                output.push(':');
                                output.push('\n');
                                let entries: Vec<_> = first_value
                                    .as_object()
                                    .unwrap()
                                    .iter()
                                    .map(|(k, v)| (k.clone(), v.clone()))
                                    .collect();
                                write_object(
                                    output,
                                    writer,
                                    &entries,
                                    options,
                                    indent_level + 2,
                                );
                            }
                            _ => unreachable!(),
                        }
                    }

                    let rest: Vec<_> = iter.map(|(k, v)| (k.clone(), v.clone())).collect();
                    if !rest.is_empty() {
                        output.push('\n');
                        write_object(output, writer, &rest, options, indent_level + 2);
                    }
                } else {
                    // Empty object as a list item: dash alone.
                }
            }
            ToonValue::Array(arr) if arr.iter().all(is_primitive_value) => {
                write_array_header(output, options, arr.len(), None);
                output.push(' ');
                let delim = options.delimiter.as_str();
                for (i, v) in arr.iter().enumerate() {
                    if i > 0 {
                        output.push_str(delim);
                    }
                    write_quoted_element(output, v, options);
                }
            }
            ToonValue::Array(arr) => {
                write_array_toon(output, writer, arr, options, indent_level + 1);
            }
            _ => {
                write_quoted_element(output, element, options);
            }
        }
    }
}

fn write_array_header(
    output: &mut String,
    options: &ToonOptions,
    len: usize,
    fields: Option<&[String]>,
) {
    output.push('[');
    if let Some(marker) = options.length_marker {
        output.push(marker);
    }
    output.push_str(&len.to_string());
    if !matches!(options.delimiter, Delimiter::Comma) {
        output.push_str(options.delimiter.as_str());
    }
    output.push(']');
    if let Some(fields) = fields {
        output.push('{');
        output.push_str(&fields.join(options.delimiter.as_str()));
        output.push('}');
    }
    output.push(':');
}

fn write_array_toon(
    output: &mut String,
    writer: &mut LineWriter,
    arr: &[ToonValue],
    options: &ToonOptions,
    indent_level: usize,
) {
    if arr.is_empty() {
        write_array_header(output, options, 0, None);
        return;
    }

    if let Some((headers, rows)) = can_be_tabular(arr) {
        write_tabular_array(output, writer, &headers, &rows, options, indent_level);
    } else if arr.iter().all(is_primitive_value) {
        write_inline_array(output, arr, options);
    } else {
        write_list_array(output, writer, arr, options, indent_level);
    }
}

fn write_object(
    output: &mut String,
    writer: &mut LineWriter,
    entries: &[(String, ToonValue)],
    options: &ToonOptions,
    indent_level: usize,
) {
    let prefix = writer.prefix(indent_level).to_string();
    for (i, (key, value)) in entries.iter().enumerate() {
        if i > 0 {
            output.push('\n');
        }
        output.push_str(&prefix);
        output.push_str(key);

        match value {
            ToonValue::Array(arr) => {
                write_array_toon(output, writer, arr, options, indent_level);
            }
            ToonValue::Object(obj) => {
                output.push(':');
                output.push('\n');
                let entries: Vec<_> = obj.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
                write_object(output, writer, &entries, options, indent_level + 1);
            }
            _ => {
                output.push(':');
                output.push(' ');
                write_quoted_element(output, value, options);
            }
        }
    }
}

/// Writes a primitive value honoring the active delimiter for quoting
/// decisions. Never called on `Array`/`Object` — those go through
/// `write_array_toon`/`write_object`.
fn write_quoted_element(output: &mut String, value: &ToonValue, options: &ToonOptions) {
    match value {
        ToonValue::Null => output.push_str("null"),
        ToonValue::Bool(b) => output.push_str(if *b { "true" } else { "false" }),
        ToonValue::Number(Number::Integer(i)) => output.push_str(&i.to_string()),
        ToonValue::Number(Number::Float(f)) => output.push_str(&format_float(*f)),
        ToonValue::String(s) => write_quoted_string(output, s, options.delimiter.as_char()),
        ToonValue::Array(_) | ToonValue::Object(_) => {
            debug_assert!(false, "write_quoted_element called on a non-primitive");
        }
    }
}

/// Used by `write_tabular_array`'s row cells, which never nest further so a
/// shared indent_level parameter is unused beyond passthrough safety.
fn write_toon_value_quoted(
    output: &mut String,
    _writer: &mut LineWriter,
    value: &ToonValue,
    options: &ToonOptions,
    _indent_level: usize,
) {
    write_quoted_element(output, value, options);
}
