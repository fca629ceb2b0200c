//! Schema synthesis, prompt shaping, and response parsing for LLM callers
//! (§4.5). This layer sits above the codec: it never touches an LLM client
//! itself, it only turns a [`Signature`] plus inputs into chat messages, and
//! turns a completion string back into a map of output values.
//!
//! Grounded on `examples/original_source/src/patient_notes/dspy_toon_adapter/toon_adapter.py`,
//! a DSPy adapter built on this same wire format. Field types there come from
//! Python type annotations and Pydantic models; here they're an explicit
//! [`FieldType`] tree, since the adapter has no access to Rust's type system
//! at the boundary where LLM output is still just text.

use crate::error::{AdapterError, Error, Result};
use crate::{to_string as encode_toon, ToonMap, ToonValue};
use regex::Regex;

const COMMENT_SYMBOL: char = '#';

/// The shape of one field, as rendered into a schema and used to drive
/// response parsing (§4.5.1).
#[derive(Debug, Clone, PartialEq)]
pub enum FieldType {
    String,
    Int,
    Float,
    Boolean,
    /// A fixed set of string literals, rendered `"a" or "b" or "c"`.
    Enum(Vec<String>),
    Object(Vec<FieldSchema>),
    Array(Box<FieldType>),
    /// `T | null`. Only ever wraps the type; nested nullable arrays don't
    /// double up the "or null" suffix (§4.5.1).
    Nullable(Box<FieldType>),
}

/// One field of a [`Signature`]: its name, shape, and optional human-readable
/// description (rendered as a `#` comment line ahead of the field).
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSchema {
    pub name: String,
    pub field_type: FieldType,
    pub description: Option<String>,
}

impl FieldSchema {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        FieldSchema {
            name: name.into(),
            field_type,
            description: None,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// The input/output field declaration and task documentation that an
/// [`Adapter`] renders into prompts and parses completions against.
#[derive(Debug, Clone, PartialEq)]
pub struct Signature {
    pub name: String,
    pub doc: Option<String>,
    pub input_fields: Vec<FieldSchema>,
    pub output_fields: Vec<FieldSchema>,
}

impl Signature {
    pub fn new(name: impl Into<String>) -> Self {
        Signature {
            name: name.into(),
            doc: None,
            input_fields: Vec::new(),
            output_fields: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    #[must_use]
    pub fn with_input(mut self, field: FieldSchema) -> Self {
        self.input_fields.push(field);
        self
    }

    #[must_use]
    pub fn with_output(mut self, field: FieldSchema) -> Self {
        self.output_fields.push(field);
        self
    }
}

/// A single chat turn produced by [`Adapter::format_demos`]/
/// [`Adapter::format_conversation_history`].
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub role: String,
    pub content: String,
}

/// One turn of prior conversation, accepted in either the legacy
/// `{user, assistant}` shape or as a typed record of field values (§4.5.2).
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryTurn {
    Legacy {
        user: Option<String>,
        assistant: Option<String>,
    },
    Typed(ToonMap),
}

/// Adapter-level configuration. Currently just the name attached to
/// [`AdapterError`] diagnostics; kept as its own type so callers can extend
/// it (a custom comment symbol, a different fallback order) without
/// changing [`Adapter`]'s constructor signature.
#[derive(Debug, Clone, PartialEq)]
pub struct AdapterConfig {
    pub name: String,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        AdapterConfig {
            name: "toon".to_string(),
        }
    }
}

/// Renders signatures into TOON-shaped prompts and parses completions back
/// into field values (§4.5).
#[derive(Debug, Clone, Default)]
pub struct Adapter {
    config: AdapterConfig,
}

impl Adapter {
    pub fn new() -> Self {
        Adapter::default()
    }

    pub fn with_config(config: AdapterConfig) -> Self {
        Adapter { config }
    }

    /// Renders a field type into its TOON schema fragment (§4.5.1).
    fn render_type(field_type: &FieldType, indent: usize) -> String {
        match field_type {
            FieldType::String => "string".to_string(),
            FieldType::Int => "int".to_string(),
            FieldType::Float => "float".to_string(),
            FieldType::Boolean => "boolean".to_string(),
            FieldType::Enum(variants) => variants
                .iter()
                .map(|v| format!("{v:?}"))
                .collect::<Vec<_>>()
                .join(" or "),
            FieldType::Object(fields) => Self::build_object_schema(fields, indent),
            FieldType::Array(inner) => Self::render_type(inner, indent),
            FieldType::Nullable(inner) => {
                let rendered = Self::render_type(inner, indent);
                if rendered.ends_with(" or null") {
                    rendered
                } else {
                    format!("{rendered} or null")
                }
            }
        }
    }

    /// Builds an indented `name: type` block for an object field type,
    /// prefixing described fields with a `#` comment line.
    fn build_object_schema(fields: &[FieldSchema], indent: usize) -> String {
        let prefix = "  ".repeat(indent);
        let mut lines = Vec::with_capacity(fields.len());
        for field in fields {
            if let Some(desc) = &field.description {
                lines.push(format!("{prefix}{COMMENT_SYMBOL} {desc}"));
            }
            if let FieldType::Array(inner) = &field.field_type {
                lines.push(Self::render_array_field(&field.name, inner, indent));
            } else {
                let rendered = Self::render_type(&field.field_type, indent + 1);
                if rendered.contains('\n') {
                    lines.push(format!("{prefix}{}:", field.name));
                    for line in rendered.lines() {
                        lines.push(format!("{prefix}  {line}"));
                    }
                } else {
                    lines.push(format!("{prefix}{}: {rendered}", field.name));
                }
            }
        }
        lines.join("\n")
    }

    fn render_array_field(name: &str, inner: &FieldType, indent: usize) -> String {
        let prefix = "  ".repeat(indent);
        match inner {
            FieldType::Object(fields) => {
                let field_names: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
                format!(
                    "{prefix}{name}[COUNT]{{{}}}:\n{prefix}  value1,value2,...\n{prefix}  (one row per item, COUNT = number of items)",
                    field_names.join(",")
                )
            }
            other => {
                let rendered = Self::render_type(other, indent);
                format!("{prefix}{name}[COUNT]: {rendered},... (COUNT = num items)")
            }
        }
    }

    /// Synthesizes the output-schema fragment for one declared output field
    /// (§4.5.1): tabular-array example, object schema, inline-array hint, or
    /// plain `name: type`.
    pub fn output_schema(field: &FieldSchema) -> String {
        match &field.field_type {
            FieldType::Array(inner) => match inner.as_ref() {
                FieldType::Object(fields) => {
                    let names: Vec<&str> = fields.iter().map(|f| f.name.as_str()).collect();
                    format!(
                        "{}[2]{{{}}}:\n  Alice,35,engineer\n  Bob,28,designer\n(Replace 2 with actual count, add one row per item)",
                        field.name,
                        names.join(",")
                    )
                }
                _ => format!("{}[COUNT]: value1,value2,value3", field.name),
            },
            FieldType::Object(fields) => {
                let schema = Self::build_object_schema(fields, 1);
                format!("{}:\n{schema}", field.name)
            }
            FieldType::Nullable(inner) => {
                if let FieldType::Array(_) = inner.as_ref() {
                    Self::output_schema(&FieldSchema {
                        name: field.name.clone(),
                        field_type: (**inner).clone(),
                        description: field.description.clone(),
                    })
                } else {
                    format!("{}: {}", field.name, Self::render_type(&field.field_type, 0))
                }
            }
            other => format!("{}: {}", field.name, Self::render_type(other, 0)),
        }
    }

    /// Renders the "Input fields: / Output fields:" description section
    /// (§4.5.2 section (a)).
    pub fn format_field_description(signature: &Signature) -> String {
        let mut sections = Vec::new();

        if !signature.input_fields.is_empty() {
            sections.push("Input fields:".to_string());
            for field in &signature.input_fields {
                let desc = field
                    .description
                    .as_ref()
                    .map(|d| format!(" - {d}"))
                    .unwrap_or_default();
                sections.push(format!(
                    "  {}: {}{desc}",
                    field.name,
                    Self::render_type(&field.field_type, 0)
                ));
            }
        }

        if !signature.output_fields.is_empty() {
            sections.push("\nOutput fields:".to_string());
            for field in &signature.output_fields {
                let desc = field
                    .description
                    .as_ref()
                    .map(|d| format!(" - {d}"))
                    .unwrap_or_default();
                sections.push(format!(
                    "  {}: {}{desc}",
                    field.name,
                    Self::render_type(&field.field_type, 0)
                ));
            }
        }

        sections.join("\n")
    }

    /// Renders the TOON structure block (§4.5.1/§4.5.2 section (b)), with
    /// explicit anti-JSON instructions ahead of the per-field schema.
    pub fn format_field_structure(signature: &Signature) -> String {
        let mut sections = vec![
            "\nTOON Format (NOT JSON):\n\
- Simple values: key: value (booleans: true/false)\n\
- Primitive arrays: field[COUNT]: item1,item2,item3  (single line, comma-separated; replace COUNT)\n\
- Tabular arrays for objects:\n\
  [COUNT]{field1,field2}:\n\
    value1,value2\n\
    value3,value4\n\
  (COUNT is the actual number of rows)\n\
- Empty/none values: use `field: null` (no [COUNT]) when there are no items or the value is absent\n\
- No JSON braces/brackets, code fences, or dashes for primitive arrays\n\
- Do not wrap output in JSON or YAML; emit plain TOON only\n"
                .to_string(),
        ];

        sections.push("Output structure:".to_string());
        for field in &signature.output_fields {
            sections.push(Self::output_schema(field));
        }

        sections.join("\n")
    }

    /// Returns the task description from the signature's documentation
    /// (§4.5.2 section (c)), or a generic fallback.
    pub fn format_task_description(signature: &Signature) -> String {
        signature
            .doc
            .clone()
            .unwrap_or_else(|| "Complete the task based on the inputs.".to_string())
    }

    /// Encodes a single field value as TOON text for embedding in a message.
    fn encode_value(value: &ToonValue) -> String {
        match value {
            ToonValue::Array(_) | ToonValue::Object(_) => {
                encode_toon(value).unwrap_or_else(|_| value.to_string())
            }
            ToonValue::String(s) => s.clone(),
            _ => value.to_string(),
        }
    }

    /// Renders the user-turn message for one set of input values (§4.5.2).
    pub fn format_user_message_content(
        signature: &Signature,
        inputs: &ToonMap,
        prefix: &str,
    ) -> String {
        let mut parts = Vec::new();
        if !prefix.is_empty() {
            parts.push(prefix.to_string());
        }

        for field in &signature.input_fields {
            if let Some(value) = inputs.get(&field.name) {
                let encoded = Self::encode_value(value);
                if encoded.contains('\n') || matches!(value, ToonValue::Array(_) | ToonValue::Object(_)) {
                    parts.push(format!("{}:\n{encoded}", field.name));
                } else {
                    parts.push(format!("{}: {encoded}", field.name));
                }
            }
        }

        parts.join("\n\n").trim().to_string()
    }

    /// Renders the assistant-turn message for one set of output values
    /// (§4.5.2), substituting `missing_field_message` for absent fields.
    pub fn format_assistant_message_content(
        signature: &Signature,
        outputs: &ToonMap,
        missing_field_message: Option<&str>,
    ) -> String {
        let mut parts = Vec::new();
        for field in &signature.output_fields {
            let value = outputs.get(&field.name);
            let encoded = match value {
                Some(v) => Self::encode_value(v),
                None => match missing_field_message {
                    Some(msg) => msg.to_string(),
                    None => continue,
                },
            };
            let is_structured = matches!(value, Some(ToonValue::Array(_)) | Some(ToonValue::Object(_)));
            if encoded.contains('\n') || is_structured {
                parts.push(format!("{}:\n{encoded}", field.name));
            } else {
                parts.push(format!("{}: {encoded}", field.name));
            }
        }
        parts.join("\n")
    }

    /// Partitions few-shot examples into complete/incomplete and renders
    /// each as a user/assistant message pair (§4.5.2).
    pub fn format_demos(signature: &Signature, demos: &[ToonMap]) -> Vec<Message> {
        let mut complete = Vec::new();
        let mut incomplete = Vec::new();

        for demo in demos {
            let all_fields = signature.input_fields.iter().chain(signature.output_fields.iter());
            let is_complete = all_fields
                .clone()
                .all(|f| matches!(demo.get(&f.name), Some(v) if !matches!(v, ToonValue::Null)));

            let has_input = signature.input_fields.iter().any(|f| demo.get(&f.name).is_some());
            let has_output = signature.output_fields.iter().any(|f| demo.get(&f.name).is_some());

            if is_complete {
                complete.push(demo);
            } else if has_input && has_output {
                incomplete.push(demo);
            }
        }

        let mut messages = Vec::new();

        let incomplete_prefix =
            "This is an example of the task, though some input or output fields are not supplied.";
        for demo in incomplete {
            messages.push(Message {
                role: "user".to_string(),
                content: Self::format_user_message_content(signature, demo, incomplete_prefix),
            });
            messages.push(Message {
                role: "assistant".to_string(),
                content: Self::format_assistant_message_content(
                    signature,
                    demo,
                    Some("Not supplied for this particular example."),
                ),
            });
        }

        for demo in complete {
            messages.push(Message {
                role: "user".to_string(),
                content: Self::format_user_message_content(signature, demo, ""),
            });
            messages.push(Message {
                role: "assistant".to_string(),
                content: Self::format_assistant_message_content(signature, demo, None),
            });
        }

        messages
    }

    /// Flattens prior conversation turns into alternating user/assistant
    /// messages (§4.5.2), accepting both legacy and typed turn shapes.
    pub fn format_conversation_history(signature: &Signature, history: &[HistoryTurn]) -> Vec<Message> {
        let mut messages = Vec::with_capacity(history.len() * 2);
        for turn in history {
            match turn {
                HistoryTurn::Legacy { user, assistant } => {
                    if let Some(u) = user {
                        messages.push(Message {
                            role: "user".to_string(),
                            content: u.clone(),
                        });
                    }
                    if let Some(a) = assistant {
                        messages.push(Message {
                            role: "assistant".to_string(),
                            content: a.clone(),
                        });
                    }
                }
                HistoryTurn::Typed(fields) => {
                    messages.push(Message {
                        role: "user".to_string(),
                        content: Self::format_user_message_content(signature, fields, ""),
                    });
                    messages.push(Message {
                        role: "assistant".to_string(),
                        content: Self::format_assistant_message_content(signature, fields, None),
                    });
                }
            }
        }
        messages
    }

    /// Parses a completion against `signature`'s declared output fields,
    /// running the five-step fallback chain of §4.5.3. Returns
    /// `Error::Adapter` when at least one declared field is still missing
    /// after every step.
    pub fn parse(&self, signature: &Signature, completion: &str) -> Result<ToonMap> {
        let completion = completion.trim();
        let mut result = ToonMap::new();

        for field in &signature.output_fields {
            if let Some(value) = Self::extract_field_value(completion, field) {
                result.insert(field.name.clone(), value);
            }
        }

        if signature.output_fields.iter().all(|f| result.get(&f.name).is_some()) {
            return Ok(result);
        }

        if let Ok(parsed) = crate::from_str::<ToonValue>(completion) {
            if let Some(obj) = parsed.as_object() {
                for field in &signature.output_fields {
                    if result.get(&field.name).is_none() {
                        if let Some(v) = obj.get(&field.name) {
                            result.insert(field.name.clone(), Self::convert_field(v.clone(), &field.field_type));
                        }
                    }
                }
            }
            if signature.output_fields.iter().all(|f| result.get(&f.name).is_some()) {
                return Ok(result);
            }
        } else {
            tracing::debug!(adapter = %self.config.name, "full TOON parsing failed, trying JSON fallback");
        }

        let json_str = extract_fenced_json(completion);
        if let Ok(parsed) = serde_json::from_str::<serde_json::Value>(&json_str) {
            if let serde_json::Value::Object(obj) = parsed {
                for field in &signature.output_fields {
                    if result.get(&field.name).is_none() {
                        if let Some(v) = obj.get(&field.name) {
                            let toon_value = json_to_toon_value(v);
                            result.insert(field.name.clone(), Self::convert_field(toon_value, &field.field_type));
                        }
                    }
                }
            }
        } else {
            tracing::debug!(adapter = %self.config.name, "JSON fallback parsing failed");
        }

        if !signature.output_fields.iter().all(|f| result.get(&f.name).is_some()) {
            let parsed_result = result
                .iter()
                .map(|(k, v)| (k.clone(), v.to_string()))
                .collect();
            tracing::warn!(adapter = %self.config.name, signature = %signature.name, "failed to parse all declared output fields");
            return Err(Error::Adapter(AdapterError::parse_failed(
                self.config.name.clone(),
                signature.name.clone(),
                completion.to_string(),
                parsed_result,
            )));
        }

        Ok(result)
    }

    /// Steps 1-3 of §4.5.3: tabular sub-block, simple `name: value` line, or
    /// (for list fields) an inline/plain-line array block.
    ///
    /// The `regex` crate has no lookaround, so unlike the Python original
    /// this can't capture a field's block with a single `(?=\n\w+:|$)`
    /// lookahead. Instead each step locates its own header with a regex,
    /// then [`take_block`] walks forward by hand to the next top-level
    /// `word:` line (or end of input).
    fn extract_field_value(completion: &str, field: &FieldSchema) -> Option<ToonValue> {
        let is_list = matches!(field.field_type, FieldType::Array(_))
            || matches!(&field.field_type, FieldType::Nullable(inner) if matches!(**inner, FieldType::Array(_)));

        if let Some(value) = Self::extract_tabular(completion, &field.name) {
            return Some(Self::convert_field(value, &field.field_type));
        }

        if let Some(value_str) = Self::extract_simple_value(completion, &field.name) {
            if !(value_str.is_empty() || value_str.starts_with('[')) {
                return if let Ok(parsed) = crate::from_str::<ToonValue>(value_str) {
                    Some(Self::convert_field(parsed, &field.field_type))
                } else {
                    tracing::debug!(field = %field.name, step = 2, "field extraction step failed, falling back");
                    if let FieldType::Object(_) = &field.field_type {
                        if let Some(obj) = parse_inline_kv_pairs(value_str) {
                            return Some(Self::convert_field(ToonValue::Object(obj), &field.field_type));
                        }
                    }
                    Some(ToonValue::String(value_str.to_string()))
                };
            }
            // Empty or `[`-prefixed: the value continues on following lines, fall through.
        }

        if is_list {
            if let Some(value) = Self::extract_list_field(completion, &field.name) {
                return Some(Self::convert_field(value, &field.field_type));
            }
        }

        None
    }

    /// Matches a standalone tabular array for `field_name`, in either the
    /// normal attached form (`name[2]{a,b}:`) or the flattened form a model
    /// sometimes emits instead (`name:` on its own line, followed by an
    /// anonymous `[2]{a,b}:` header on the next).
    fn extract_tabular(completion: &str, field_name: &str) -> Option<ToonValue> {
        let attached = format!(r"(?m)^{}\[\d+\]\{{[^}}]*\}}:", regex::escape(field_name));
        if let Ok(re) = Regex::new(&attached) {
            if let Some(m) = re.find(completion) {
                let block = take_block(&completion[m.start()..]);
                // A keyed header at the document root decodes to a single-entry
                // object wrapping the array under its key (§4.4.3).
                if let Ok(ToonValue::Object(obj)) =
                    crate::de::decode_to_value(block.trim_end(), &crate::DecodeOptions::default())
                {
                    if let Some(v) = obj.get(field_name) {
                        return Some(v.clone());
                    }
                }
                tracing::debug!(field = %field_name, step = 1, "attached tabular decode failed, falling back");
            }
        }

        let flattened = format!(r"(?m)^{}:[ \t]*$", regex::escape(field_name));
        if let Ok(re) = Regex::new(&flattened) {
            if let Some(m) = re.find(completion) {
                let after = completion[m.end()..].strip_prefix('\n').unwrap_or("");
                if after.lines().next().unwrap_or("").trim_start().starts_with('[') {
                    let block = take_block(after);
                    if let Ok(parsed) = crate::from_str::<ToonValue>(block.trim()) {
                        return Some(parsed);
                    }
                    tracing::debug!(field = %field_name, step = 1, "flattened tabular decode failed, falling back");
                }
            }
        }

        None
    }

    /// Matches a plain `name: value` line (no brackets) and returns the
    /// trimmed remainder after the colon.
    fn extract_simple_value<'a>(completion: &'a str, field_name: &str) -> Option<&'a str> {
        let pattern = format!(r"(?m)^{}:[ \t]*(.*)$", regex::escape(field_name));
        let re = Regex::new(&pattern).ok()?;
        let caps = re.captures(completion)?;
        Some(caps.get(1).unwrap().as_str().trim())
    }

    /// List-typed fields only: an inline `name[N]?: v1,v2,...` line, or a
    /// block of plain lines following `name[N]?:` with nothing on that line.
    fn extract_list_field(completion: &str, field_name: &str) -> Option<ToonValue> {
        let pattern = format!(r"(?m)^{}(?:\[\d+\])?:[ \t]*(.*)$", regex::escape(field_name));
        let re = Regex::new(&pattern).ok()?;
        let caps = re.captures(completion)?;
        let whole_match_end = caps.get(0).unwrap().end();
        let same_line = caps.get(1).unwrap().as_str().trim();

        if !same_line.is_empty() {
            let items: Vec<ToonValue> = same_line
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| crate::de::decode_primitive_token(s, 0).unwrap_or_else(|_| ToonValue::String(s.to_string())))
                .collect();
            if !items.is_empty() {
                return Some(ToonValue::Array(items));
            }
            return None;
        }

        let after = completion[whole_match_end..].strip_prefix('\n').unwrap_or("");
        let block = take_block(after);
        let items: Vec<ToonValue> = block
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(|l| crate::de::decode_primitive_token(l, 0).unwrap_or_else(|_| ToonValue::String(l.to_string())))
            .collect();
        if items.is_empty() {
            None
        } else {
            Some(ToonValue::Array(items))
        }
    }

    /// Coerces a decoded value onto the field's declared shape (§4.5.3's
    /// final "coerce to the declared type" step): unwraps `Nullable`,
    /// recurses element-wise into arrays of objects.
    fn convert_field(value: ToonValue, field_type: &FieldType) -> ToonValue {
        match field_type {
            FieldType::Nullable(inner) => Self::convert_field(value, inner),
            FieldType::Array(inner) => match (value, inner.as_ref()) {
                (ToonValue::Array(items), FieldType::Object(fields)) => ToonValue::Array(
                    items
                        .into_iter()
                        .map(|item| Self::convert_field(item, &FieldType::Object(fields.clone())))
                        .collect(),
                ),
                (other, _) => other,
            },
            FieldType::Object(_) => value,
            _ => value,
        }
    }
}

/// Returns the prefix of `text` up to (but not including) the next line that
/// starts at column 0 with a bare `word:` or `word more words:` header —
/// the boundary a field's captured block stops at, since the `regex` crate
/// has no lookahead to express that as part of the original match.
fn take_block(text: &str) -> &str {
    match Regex::new(r"(?m)^\w[\w\s]*:").ok().and_then(|re| re.find(text)) {
        Some(m) => &text[..m.start()],
        None => text,
    }
}

/// Fallback inline `k: v, k: v` parser for a single malformed-TOON object
/// value (§4.5.3 step 2's object fallback).
fn parse_inline_kv_pairs(value_str: &str) -> Option<ToonMap> {
    if !value_str.contains(':') {
        return None;
    }
    let mut map = ToonMap::new();
    for part in value_str.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let Some((key, raw_val)) = part.split_once(':') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        let raw_val = raw_val.trim();
        let value = crate::from_str::<ToonValue>(raw_val).unwrap_or_else(|_| {
            if raw_val.eq_ignore_ascii_case("null") {
                ToonValue::Null
            } else {
                ToonValue::String(raw_val.to_string())
            }
        });
        map.insert(key.to_string(), value);
    }
    if map.is_empty() {
        None
    } else {
        Some(map)
    }
}

/// Strips a ` ```json ... ``` ` or ` ``` ... ``` ` fence if present
/// (§4.5.3 step 5), otherwise returns the input unchanged.
fn extract_fenced_json(completion: &str) -> String {
    if let Some(start) = completion.find("```json") {
        let rest = &completion[start + "```json".len()..];
        if let Some(end) = rest.find("```") {
            return rest[..end].trim().to_string();
        }
    }
    if let Some(start) = completion.find("```") {
        let rest = &completion[start + "```".len()..];
        if let Some(end) = rest.find("```") {
            return rest[..end].trim().to_string();
        }
    }
    completion.to_string()
}

fn json_to_toon_value(value: &serde_json::Value) -> ToonValue {
    match value {
        serde_json::Value::Null => ToonValue::Null,
        serde_json::Value::Bool(b) => ToonValue::Bool(*b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                ToonValue::Number(crate::Number::Integer(i))
            } else {
                let f = n.as_f64().unwrap_or(0.0);
                ToonValue::Number(crate::Number::normalize_f64(f).unwrap_or(crate::Number::Integer(0)))
            }
        }
        serde_json::Value::String(s) => ToonValue::String(s.clone()),
        serde_json::Value::Array(arr) => ToonValue::Array(arr.iter().map(json_to_toon_value).collect()),
        serde_json::Value::Object(obj) => {
            let mut map = ToonMap::with_capacity(obj.len());
            for (k, v) in obj {
                map.insert(k.clone(), json_to_toon_value(v));
            }
            ToonValue::Object(map)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person_signature() -> Signature {
        Signature::new("ExtractPerson")
            .with_doc("Extract person from text.")
            .with_input(FieldSchema::new("text", FieldType::String))
            .with_output(
                FieldSchema::new(
                    "person",
                    FieldType::Object(vec![
                        FieldSchema::new("name", FieldType::String).with_description("Full name"),
                        FieldSchema::new("age", FieldType::Int),
                    ]),
                )
                .with_description("Extracted person"),
            )
    }

    #[test]
    fn render_primitive_type() {
        assert_eq!(Adapter::render_type(&FieldType::Int, 0), "int");
    }

    #[test]
    fn render_enum_type() {
        let t = FieldType::Enum(vec!["a".into(), "b".into()]);
        assert_eq!(Adapter::render_type(&t, 0), "\"a\" or \"b\"");
    }

    #[test]
    fn render_nullable_does_not_duplicate_or_null() {
        let t = FieldType::Nullable(Box::new(FieldType::String));
        assert_eq!(Adapter::render_type(&t, 0), "string or null");
    }

    #[test]
    fn output_schema_for_tabular_array() {
        let field = FieldSchema::new(
            "users",
            FieldType::Array(Box::new(FieldType::Object(vec![
                FieldSchema::new("id", FieldType::Int),
                FieldSchema::new("name", FieldType::String),
            ]))),
        );
        let schema = Adapter::output_schema(&field);
        assert!(schema.starts_with("users[2]{id,name}:"));
    }

    #[test]
    fn field_description_lists_inputs_and_outputs() {
        let sig = person_signature();
        let desc = Adapter::format_field_description(&sig);
        assert!(desc.contains("Input fields:"));
        assert!(desc.contains("text: string"));
        assert!(desc.contains("Output fields:"));
    }

    #[test]
    fn demos_partition_complete_and_incomplete() {
        let sig = Signature::new("Sig")
            .with_input(FieldSchema::new("q", FieldType::String))
            .with_output(FieldSchema::new("a", FieldType::String));

        let mut complete = ToonMap::new();
        complete.insert("q".into(), ToonValue::String("hi".into()));
        complete.insert("a".into(), ToonValue::String("there".into()));

        let mut incomplete = ToonMap::new();
        incomplete.insert("q".into(), ToonValue::String("hi".into()));

        let demos = vec![incomplete, complete];
        let messages = Adapter::format_demos(&sig, &demos);
        // Incomplete pair emitted first, then the complete pair.
        assert_eq!(messages.len(), 4);
        assert!(messages[0].content.contains("This is an example"));
        assert_eq!(messages[2].role, "user");
        assert!(!messages[2].content.contains("This is an example"));
    }

    #[test]
    fn parse_extracts_simple_field() {
        let sig = Signature::new("Sig").with_output(FieldSchema::new("answer", FieldType::String));
        let adapter = Adapter::new();
        let result = adapter.parse(&sig, "answer: 42").unwrap();
        assert_eq!(result.get("answer").and_then(|v| v.as_str()), Some("42"));
    }

    #[test]
    fn parse_falls_back_to_fenced_json() {
        let sig = Signature::new("Sig").with_output(FieldSchema::new("answer", FieldType::String));
        let adapter = Adapter::new();
        let completion = "Sure, here you go:\n```json\n{\"answer\": \"42\"}\n```";
        let result = adapter.parse(&sig, completion).unwrap();
        assert_eq!(result.get("answer").and_then(|v| v.as_str()), Some("42"));
    }

    #[test]
    fn parse_fails_when_field_missing_everywhere() {
        let sig = Signature::new("Sig").with_output(FieldSchema::new("answer", FieldType::String));
        let adapter = Adapter::new();
        let result = adapter.parse(&sig, "nothing useful here");
        assert!(matches!(result, Err(Error::Adapter(_))));
    }

    #[test]
    fn parse_tabular_output_field() {
        let sig = Signature::new("Sig").with_output(FieldSchema::new(
            "users",
            FieldType::Array(Box::new(FieldType::Object(vec![
                FieldSchema::new("id", FieldType::Int),
                FieldSchema::new("name", FieldType::String),
            ]))),
        ));
        let adapter = Adapter::new();
        let completion = "users:\n[2]{id,name}:\n  1,Alice\n  2,Bob";
        let result = adapter.parse(&sig, completion).unwrap();
        let users = result.get("users").unwrap().as_array().unwrap();
        assert_eq!(users.len(), 2);
    }

    #[test]
    fn parse_tabular_output_field_attached_header() {
        let sig = Signature::new("Sig").with_output(FieldSchema::new(
            "users",
            FieldType::Array(Box::new(FieldType::Object(vec![
                FieldSchema::new("id", FieldType::Int),
                FieldSchema::new("name", FieldType::String),
            ]))),
        ));
        let adapter = Adapter::new();
        let completion = "Here is the result:\nusers[2]{id,name}:\n  1,Alice\n  2,Bob";
        let result = adapter.parse(&sig, completion).unwrap();
        let users = result.get("users").unwrap().as_array().unwrap();
        assert_eq!(users.len(), 2);
    }

    #[test]
    fn parse_inline_list_field() {
        let sig = Signature::new("Sig").with_output(FieldSchema::new(
            "tags",
            FieldType::Array(Box::new(FieldType::String)),
        ));
        let adapter = Adapter::new();
        let result = adapter.parse(&sig, "tags[3]: red,green,blue").unwrap();
        let tags = result.get("tags").unwrap().as_array().unwrap();
        assert_eq!(tags.len(), 3);
        assert_eq!(tags[0].as_str(), Some("red"));
    }
}
