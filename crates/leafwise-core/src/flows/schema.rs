//! Output schemas: prompt instructions, JSON extraction and validation.

use serde_json::{Map, Value};

/// JSON type of a schema field.
#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    String,
    Boolean,
    Object(&'static [Field]),
}

/// One field of a flow's output schema.
#[derive(Debug, Clone, Copy)]
pub struct Field {
    /// JSON key (camelCase)
    pub name: &'static str,
    pub kind: FieldKind,
    /// Shown to the model next to the key
    pub description: &'static str,
}

impl Field {
    pub const fn string(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::String,
            description,
        }
    }

    pub const fn boolean(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Boolean,
            description,
        }
    }

    pub const fn object(
        name: &'static str,
        description: &'static str,
        fields: &'static [Field],
    ) -> Self {
        Self {
            name,
            kind: FieldKind::Object(fields),
            description,
        }
    }
}

/// Build the response-format instructions appended to a rendered prompt.
pub fn instructions(fields: &[Field]) -> String {
    let mut out = String::from(
        "Respond with a single JSON object and nothing else (no prose, no markdown). \
         It must contain these fields:\n",
    );
    write_fields(&mut out, fields, 0);
    out
}

fn write_fields(out: &mut String, fields: &[Field], depth: usize) {
    let indent = "  ".repeat(depth);
    for field in fields {
        let kind = match field.kind {
            FieldKind::String => "string",
            FieldKind::Boolean => "boolean",
            FieldKind::Object(_) => "object",
        };
        out.push_str(&format!(
            "{indent}- \"{}\" ({kind}): {}\n",
            field.name, field.description
        ));
        if let FieldKind::Object(children) = field.kind {
            write_fields(out, children, depth + 1);
        }
    }
}

/// Locate the JSON object inside a model answer.
///
/// Accepts bare JSON, a fenced code block, or an object surrounded by prose.
pub fn extract_json(text: &str) -> Option<&str> {
    let trimmed = text.trim();
    if let Some(inner) = fenced_block(trimmed) {
        return Some(inner);
    }
    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    (end > start).then(|| &trimmed[start..=end])
}

fn fenced_block(text: &str) -> Option<&str> {
    let open = text.find("```")?;
    let after_fence = &text[open + 3..];
    // Skip the info string (e.g. "json")
    let body_start = after_fence.find('\n')? + 1;
    let body = &after_fence[body_start..];
    let close = body.find("```")?;
    let inner = body[..close].trim();
    inner.starts_with('{').then_some(inner)
}

/// Extract, parse and validate a model answer against `fields`.
///
/// Returns the normalized object: `null` strings become empty strings,
/// unknown keys are dropped.
pub fn parse_output(text: &str, fields: &[Field]) -> Result<Value, String> {
    let json = extract_json(text).ok_or_else(|| "response contains no JSON object".to_string())?;
    let value: Value =
        serde_json::from_str(json).map_err(|e| format!("response is not valid JSON: {e}"))?;
    validate(&value, fields, "")
}

fn validate(value: &Value, fields: &[Field], path: &str) -> Result<Value, String> {
    let object = value
        .as_object()
        .ok_or_else(|| format!("expected an object at '{}'", display_path(path)))?;

    let mut normalized = Map::new();
    for field in fields {
        let key = if path.is_empty() {
            field.name.to_string()
        } else {
            format!("{path}.{}", field.name)
        };
        let found = object
            .get(field.name)
            .ok_or_else(|| format!("missing field '{key}'"))?;

        let checked = match (field.kind, found) {
            (FieldKind::String, Value::String(_)) => found.clone(),
            (FieldKind::String, Value::Null) => Value::String(String::new()),
            (FieldKind::Boolean, Value::Bool(_)) => found.clone(),
            (FieldKind::Object(children), Value::Object(_)) => validate(found, children, &key)?,
            (kind, other) => {
                return Err(format!(
                    "field '{key}' should be {}, got {}",
                    kind_name(kind),
                    json_type(other)
                ))
            }
        };
        normalized.insert(field.name.to_string(), checked);
    }
    Ok(Value::Object(normalized))
}

fn display_path(path: &str) -> &str {
    if path.is_empty() {
        "$"
    } else {
        path
    }
}

fn kind_name(kind: FieldKind) -> &'static str {
    match kind {
        FieldKind::String => "a string",
        FieldKind::Boolean => "a boolean",
        FieldKind::Object(_) => "an object",
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
