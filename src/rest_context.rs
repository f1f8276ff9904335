use std::time::Duration;

use derivative::Derivative;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::coerce;
use crate::error::{Error, Result};
use crate::redis_funcs::{Reply, Request};

/// Connection settings for the REST endpoint.
#[derive(Derivative, Clone)]
#[derivative(Default(bound = ""), Debug)]
pub struct RestContext {
    pub url: String,
    #[derivative(Debug = "ignore")]
    pub token: String,
    #[derivative(Default(value = "Duration::from_secs(30)"))]
    pub timeout: Duration,
}

/// Body of every REST reply: either a result or an error message.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(default)]
    result: Value,
    #[serde(default)]
    error: Option<String>,
}

impl RestContext {
    /// Credentials from flags (already merged with their environment
    /// variables by the parser); empty values count as missing.
    pub fn from_parts(url: Option<String>, token: Option<String>, timeout: Option<u64>) -> Result<Self> {
        let url = url.filter(|u| !u.trim().is_empty());
        let token = token.filter(|t| !t.trim().is_empty());
        let (Some(url), Some(token)) = (url, token) else {
            return Err(Error::MissingCredentials);
        };
        let mut context = RestContext {
            url: url.trim_end_matches('/').to_string(),
            token,
            ..Default::default()
        };
        if let Some(secs) = timeout {
            context.timeout = Duration::from_secs(secs);
        }
        Ok(context)
    }

    /// Send `request` and return its decoded result.
    pub fn execute(&self, request: &Request) -> Result<Value> {
        let args = request.wire_args();
        debug!(url = %self.url, command = %shell_words::join(&args), "sending command");

        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()?;
        let response = client
            .post(&self.url)
            .bearer_auth(&self.token)
            .json(&args)
            .send()?;

        let status = response.status();
        let body = response.text()?;
        debug!(%status, bytes = body.len(), "received reply");

        let envelope: Envelope = match serde_json::from_str(&body) {
            Ok(envelope) => envelope,
            Err(_) => return Err(Error::Http { status, body }),
        };
        if let Some(message) = envelope.error {
            return Err(Error::Remote(message));
        }
        if !status.is_success() {
            return Err(Error::Http { status, body });
        }
        Ok(decode(envelope.result, request.reply()))
    }
}

/// Turn a raw result into what gets printed.
pub fn decode(raw: Value, reply: &Reply) -> Value {
    match reply {
        Reply::Plain => deserialize(raw),
        Reply::Hash => fold_hash(raw),
        Reply::Fields(fields) => zip_fields(fields, raw),
        Reply::Scan => scan_page(raw),
    }
}

/// Parse a JSON-looking string, keeping the text when it is not JSON.
fn parse_lenient(value: Value) -> Value {
    match value {
        Value::String(text) => match serde_json::from_str(&text) {
            Ok(parsed) => coerce::normalize(parsed),
            Err(_) => Value::String(text),
        },
        other => other,
    }
}

/// Replace string results that hold JSON with the parsed value.
///
/// A string stays as-is when it is not JSON, or when it parses to a number
/// whose text differs from the original (`"007"`, integers beyond 2^53).
pub fn deserialize(raw: Value) -> Value {
    match raw {
        Value::String(text) => match serde_json::from_str::<Value>(&text) {
            Ok(Value::Number(n)) if n.to_string() != text => Value::String(text),
            Ok(Value::Number(n)) if n.as_f64().map_or(true, |f| f.abs() > 9_007_199_254_740_991.0) => {
                Value::String(text)
            }
            Ok(parsed) => parsed,
            Err(_) => Value::String(text),
        },
        Value::Array(items) => Value::Array(items.into_iter().map(deserialize).collect()),
        other => other,
    }
}

/// `[f1, v1, f2, v2, ...]` into `{f1: v1, f2: v2}`; empty becomes nil.
fn fold_hash(raw: Value) -> Value {
    let Value::Array(items) = raw else {
        return deserialize(raw);
    };
    if items.is_empty() {
        return Value::Null;
    }
    let mut map = Map::new();
    let mut iter = items.into_iter();
    while let (Some(field), Some(value)) = (iter.next(), iter.next()) {
        let field = match field {
            Value::String(s) => s,
            other => other.to_string(),
        };
        map.insert(field, hash_value(value));
    }
    Value::Object(map)
}

/// Numeric text that a double cannot hold exactly (`1.5`, `2^53 + 1`) stays text.
fn hash_value(value: Value) -> Value {
    match value {
        Value::String(text)
            if coerce::parse_number(&text).map_or(false, |n| !coerce::is_safe_integer(&n)) =>
        {
            Value::String(text)
        }
        other => parse_lenient(other),
    }
}

/// `[v1, v2, ...]` for `HMGET f1 f2 ...` into `{f1: v1, f2: v2}`; all-nil becomes nil.
fn zip_fields(fields: &[String], raw: Value) -> Value {
    let Value::Array(values) = raw else {
        return deserialize(raw);
    };
    if values.iter().all(Value::is_null) {
        return Value::Null;
    }
    let mut values = values.into_iter();
    let map = fields
        .iter()
        .map(|field| (field.clone(), parse_lenient(values.next().unwrap_or(Value::Null))))
        .collect::<Map<_, _>>();
    Value::Object(map)
}

/// `[cursor, items]` keeps the cursor as the store sent it.
fn scan_page(raw: Value) -> Value {
    match raw {
        Value::Array(mut page) if page.len() == 2 => {
            let items = deserialize(page.pop().unwrap_or(Value::Null));
            let cursor = match page.pop() {
                Some(Value::Number(n)) => Value::String(n.to_string()),
                Some(other) => other,
                None => Value::Null,
            };
            Value::Array(vec![cursor, items])
        }
        other => deserialize(other),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_from_parts() {
        let ctx = RestContext::from_parts(Some("https://example.io/".into()), Some("tok".into()), None).unwrap();
        assert_eq!("https://example.io", ctx.url);
        assert_eq!(Duration::from_secs(30), ctx.timeout);

        let ctx = RestContext::from_parts(Some("https://example.io".into()), Some("tok".into()), Some(3)).unwrap();
        assert_eq!(Duration::from_secs(3), ctx.timeout);
    }

    #[test]
    fn test_missing_credentials() {
        assert!(matches!(
            RestContext::from_parts(None, Some("tok".into()), None),
            Err(Error::MissingCredentials)
        ));
        assert!(matches!(
            RestContext::from_parts(Some("https://example.io".into()), Some("".into()), None),
            Err(Error::MissingCredentials)
        ));
    }

    #[test]
    fn test_debug_hides_token() {
        let ctx = RestContext::from_parts(Some("https://example.io".into()), Some("s3cr3t".into()), None).unwrap();
        let rendered = format!("{ctx:?}");
        assert!(rendered.contains("example.io"));
        assert!(!rendered.contains("s3cr3t"));
    }

    #[test]
    fn test_deserialize_scalars() {
        assert_eq!(json!("OK"), deserialize(json!("OK")));
        assert_eq!(json!(42), deserialize(json!("42")));
        assert_eq!(json!(1.5), deserialize(json!("1.5")));
        assert_eq!(json!("007"), deserialize(json!("007")));
        assert_eq!(json!("12345678901234567890"), deserialize(json!("12345678901234567890")));
        assert_eq!(json!({"a": 1}), deserialize(json!(r#"{"a":1}"#)));
        assert_eq!(json!(true), deserialize(json!("true")));
        assert_eq!(json!(3), deserialize(json!(3)));
        assert_eq!(Value::Null, deserialize(Value::Null));
    }

    #[test]
    fn test_deserialize_arrays() {
        assert_eq!(json!(["0", ["user:1", 2]]), deserialize(json!(["\"0\"", ["user:1", "2"]])));
        assert_eq!(json!(["a", 1, null]), deserialize(json!(["a", "1", null])));
    }

    #[test]
    fn test_fold_hash() {
        assert_eq!(
            json!({"name": "John", "age": 30}),
            decode(json!(["name", "John", "age", "30"]), &Reply::Hash)
        );
        assert_eq!(Value::Null, decode(json!([]), &Reply::Hash));
        assert_eq!(Value::Null, decode(Value::Null, &Reply::Hash));
    }

    #[test]
    fn test_fold_hash_keeps_inexact_numbers_as_text() {
        assert_eq!(
            json!({"price": "1.5", "big": "9007199254740993", "qty": 3, "code": "007", "tags": ["a"]}),
            decode(
                json!(["price", "1.5", "big", "9007199254740993", "qty", "3", "code", "007", "tags", "[\"a\"]"]),
                &Reply::Hash
            )
        );
    }

    #[test]
    fn test_zip_fields() {
        let fields = Reply::Fields(vec!["name".to_string(), "age".to_string()]);
        assert_eq!(json!({"name": "John", "age": 30}), decode(json!(["John", "30"]), &fields));
        assert_eq!(json!({"name": "John", "age": null}), decode(json!(["John", null]), &fields));
        assert_eq!(Value::Null, decode(json!([null, null]), &fields));
    }

    #[test]
    fn test_scan_page_keeps_cursor_text() {
        assert_eq!(json!(["17", ["a", "b"]]), decode(json!(["17", ["a", "b"]]), &Reply::Scan));
        assert_eq!(json!(["0", ["m", 1]]), decode(json!(["0", ["m", "1"]]), &Reply::Scan));
    }
}
