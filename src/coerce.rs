//! Operand coercion: number, then `{}`/`[]` JSON, then the raw string.

use std::fmt;
use std::io;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;
use serde_json::ser::{CompactFormatter, Formatter};
use serde_json::{Map, Number, Value};

/// Largest integer a double represents exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

fn decimal_literal() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[+-]?(?:[0-9]+\.?[0-9]*|\.[0-9]+)(?:[eE][+-]?[0-9]+)?$")
            .expect("decimal literal pattern")
    })
}

fn radix_literal() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^0(?:[xX](?P<hex>[0-9a-fA-F]+)|[oO](?P<oct>[0-7]+)|[bB](?P<bin>[01]+))$")
            .expect("radix literal pattern")
    })
}

/// Parse `text` the way a JavaScript `Number()` conversion would, keeping only
/// finite results. Blank input is not a number.
pub fn parse_number(text: &str) -> Option<Number> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    let parsed = if decimal_literal().is_match(trimmed) {
        trimmed.parse::<f64>().ok()?
    } else if let Some(caps) = radix_literal().captures(trimmed) {
        let (digits, radix) = if let Some(m) = caps.name("hex") {
            (m.as_str(), 16)
        } else if let Some(m) = caps.name("oct") {
            (m.as_str(), 8)
        } else {
            (caps.name("bin")?.as_str(), 2)
        };
        u64::from_str_radix(digits, radix).ok()? as f64
    } else {
        return None;
    };
    canonical_number(parsed)
}

/// Integral values inside the exactly-representable range are stored as
/// integers so `1.0` and `1e3` serialize as `1` and `1000`.
fn canonical_number(value: f64) -> Option<Number> {
    if !value.is_finite() {
        return None;
    }
    if value.fract() == 0.0 && value.abs() <= MAX_SAFE_INTEGER {
        return Some(Number::from(value as i64));
    }
    Number::from_f64(value)
}

/// Whether `n` is an integer a double holds exactly.
pub fn is_safe_integer(n: &Number) -> bool {
    n.as_i64().map_or(false, |i| (i as f64).abs() <= MAX_SAFE_INTEGER)
}

/// Recursively rewrite numbers into canonical form.
pub(crate) fn normalize(value: Value) -> Value {
    match value {
        Value::Number(n) => match n.as_f64().and_then(canonical_number) {
            Some(canonical) if !n.is_u64() && !n.is_i64() => Value::Number(canonical),
            _ => Value::Number(n),
        },
        Value::Array(items) => Value::Array(items.into_iter().map(normalize).collect()),
        Value::Object(map) => Value::Object(map.into_iter().map(|(k, v)| (k, normalize(v))).collect()),
        other => other,
    }
}

fn looks_structured(text: &str) -> bool {
    (text.starts_with('{') && text.ends_with('}')) || (text.starts_with('[') && text.ends_with(']'))
}

/// Coerce a value operand.
///
/// With `json_mode` the text is parsed as JSON, falling back to the raw
/// string. Otherwise: number, then `{}`/`[]` JSON, then the raw string.
pub fn parse_value(text: &str, json_mode: bool) -> Value {
    if json_mode {
        return serde_json::from_str(text)
            .map(normalize)
            .unwrap_or_else(|_| Value::String(text.to_string()));
    }
    if let Some(number) = parse_number(text) {
        return Value::Number(number);
    }
    if looks_structured(text) {
        if let Ok(parsed) = serde_json::from_str(text) {
            return normalize(parsed);
        }
    }
    Value::String(text.to_string())
}

/// Compact JSON, except integral floats below 1e21 are written out in full
/// (`12345678901234567000`, not `1.2345678901234567e19`).
struct WireFormatter;

impl Formatter for WireFormatter {
    fn write_f64<W: ?Sized + io::Write>(&mut self, writer: &mut W, value: f64) -> io::Result<()> {
        if value.fract() == 0.0 && value.abs() < 1e21 {
            write!(writer, "{value}")
        } else {
            CompactFormatter.write_f64(writer, value)
        }
    }
}

/// Text sent to the store for a coerced value: strings verbatim, everything
/// else as compact JSON.
pub fn to_wire(value: &Value) -> String {
    if let Value::String(s) = value {
        return s.clone();
    }
    let mut out = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, WireFormatter);
    match value.serialize(&mut serializer) {
        Ok(()) => String::from_utf8_lossy(&out).into_owned(),
        Err(_) => value.to_string(),
    }
}

/// A numeric operand (count, index, timestamp, increment, score).
///
/// Malformed text is kept as typed; the store is left to reject it.
#[derive(Debug, Clone, PartialEq)]
pub enum Numeric {
    Finite(Number),
    Malformed(String),
}

impl fmt::Display for Numeric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Numeric::Finite(n) => f.write_str(&to_wire(&Value::Number(n.clone()))),
            Numeric::Malformed(raw) => f.write_str(raw),
        }
    }
}

pub fn numeric(text: &str) -> Numeric {
    match parse_number(text) {
        Some(n) => Numeric::Finite(n),
        None => {
            tracing::warn!(operand = text, "operand is not a number, forwarding as typed");
            Numeric::Malformed(text.to_string())
        }
    }
}

/// Scan cursors fall back to `0` when they do not parse.
pub fn cursor(text: &str) -> String {
    parse_number(text)
        .map(|n| to_wire(&Value::Number(n)))
        .unwrap_or_else(|| "0".to_string())
}

/// Fold `[k1, v1, k2, v2, ...]` into an ordered map with coerced values.
///
/// A repeated key keeps its first position and takes the last value. A
/// trailing unpaired token is ignored.
pub fn pairs_to_object(pairs: &[String], json_mode: bool) -> Map<String, Value> {
    let mut map = Map::new();
    for pair in pairs.chunks_exact(2) {
        map.insert(pair[0].clone(), parse_value(&pair[1], json_mode));
    }
    map
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScoreMember {
    pub score: Numeric,
    pub member: String,
}

/// Turn `[s1, m1, s2, m2, ...]` into score/member entries; a trailing
/// unpaired token is ignored.
pub fn score_member_pairs(pairs: &[String]) -> Vec<ScoreMember> {
    pairs
        .chunks_exact(2)
        .map(|pair| ScoreMember {
            score: numeric(&pair[0]),
            member: pair[1].clone(),
        })
        .collect()
}
