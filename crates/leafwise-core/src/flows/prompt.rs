//! Prompt template rendering.
//!
//! Templates use a small Handlebars-style syntax:
//!
//! - `{{field}}` and `{{{field}}}` insert the value of `field` from the
//!   serialized flow input. Output is plain text, so neither form escapes.
//! - `{{media url=field}}` marks `field` (a data URI) as the image to attach
//!   to the request. The tag renders as a short placeholder.
//!
//! Unknown fields render as empty strings. An unterminated tag is kept
//! verbatim.

use serde_json::Value;

/// Text that replaces a `{{media ...}}` tag in the rendered prompt.
pub const MEDIA_PLACEHOLDER: &str = "(attached image)";

/// A rendered prompt plus the media it references.
#[derive(Debug, Clone, PartialEq)]
pub struct Rendered {
    pub text: String,
    /// Value of the field named by `{{media url=...}}`, if any
    pub media: Option<String>,
}

/// Render `template` against a JSON object of variables.
pub fn render(template: &str, vars: &Value) -> Result<Rendered, String> {
    let mut text = String::with_capacity(template.len());
    let mut media = None;
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        text.push_str(&rest[..start]);
        let after = &rest[start..];

        let (open, close) = if after.starts_with("{{{") {
            ("{{{", "}}}")
        } else {
            ("{{", "}}")
        };

        let Some(end) = after[open.len()..].find(close) else {
            // Unterminated tag: keep the remainder as-is
            text.push_str(after);
            rest = "";
            break;
        };

        let inner = after[open.len()..open.len() + end].trim();
        rest = &after[open.len() + end + close.len()..];

        if let Some(args) = inner.strip_prefix("media") {
            let field = parse_media_url(args)
                .ok_or_else(|| format!("malformed media tag: {{{{{inner}}}}}"))?;
            let value = vars
                .get(field)
                .and_then(Value::as_str)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| format!("media field '{field}' is missing or not a string"))?;
            media = Some(value.to_string());
            text.push_str(MEDIA_PLACEHOLDER);
        } else {
            text.push_str(&value_to_text(vars.get(inner)));
        }
    }
    text.push_str(rest);

    Ok(Rendered { text, media })
}

/// Extract the field name from ` url=field`.
fn parse_media_url(args: &str) -> Option<&str> {
    args.split_whitespace()
        .find_map(|arg| arg.strip_prefix("url="))
        .filter(|field| !field.is_empty())
}

fn value_to_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
