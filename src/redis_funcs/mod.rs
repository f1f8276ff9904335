use std::fmt;

use redis::{Arg, Cmd, ToRedisArgs};
use serde_json::Value;

use crate::cmd_parser::{Flags, Invocation};
use crate::coerce;
use crate::error::{Error, Result};

mod hashes;
mod json;
mod keys;
mod lists;
mod server;
mod sets;
mod sorted_sets;
mod strings;

/// How a raw reply is turned into the printed result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Plain,
    /// Flat `[field, value, ...]` folded into an object.
    Hash,
    /// Values of the named fields, in request order.
    Fields(Vec<String>),
    /// `[cursor, items]` with the cursor left as text.
    Scan,
}

/// A single command ready to be sent.
#[derive(Clone)]
pub struct Request {
    cmd: Cmd,
    reply: Reply,
}

impl Request {
    pub fn new(name: &str) -> Self {
        Request {
            cmd: redis::cmd(name),
            reply: Reply::Plain,
        }
    }

    pub fn arg<T: ToRedisArgs>(mut self, arg: T) -> Self {
        self.cmd.arg(arg);
        self
    }

    pub fn args<I>(mut self, args: I) -> Self
    where
        I: IntoIterator,
        I::Item: ToRedisArgs,
    {
        for arg in args {
            self.cmd.arg(arg);
        }
        self
    }

    pub fn with_reply(mut self, reply: Reply) -> Self {
        self.reply = reply;
        self
    }

    pub fn reply(&self) -> &Reply {
        &self.reply
    }

    /// The command as the list of strings sent in the request body.
    pub fn wire_args(&self) -> Vec<String> {
        self.cmd
            .args_iter()
            .map(|arg| match arg {
                Arg::Simple(bytes) => String::from_utf8_lossy(bytes).into_owned(),
                Arg::Cursor => "0".to_string(),
            })
            .collect()
    }
}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("args", &self.wire_args())
            .field("reply", &self.reply)
            .finish()
    }
}

/// Operand access for one invocation, with arity checks.
pub(crate) struct Call<'a> {
    name: String,
    operands: &'a [String],
    flags: &'a Flags,
}

impl<'a> Call<'a> {
    fn new(invocation: &'a Invocation) -> Self {
        Call {
            name: invocation.name.to_ascii_uppercase(),
            operands: &invocation.operands,
            flags: &invocation.flags,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn flags(&self) -> &Flags {
        self.flags
    }

    pub fn missing(&self, operand: &'static str) -> Error {
        Error::MissingOperand {
            command: self.name.clone(),
            operand,
        }
    }

    /// Operand at `index`, named `operand` in the error when absent.
    pub fn operand(&self, index: usize, operand: &'static str) -> Result<&'a str> {
        self.operands
            .get(index)
            .map(String::as_str)
            .ok_or_else(|| self.missing(operand))
    }

    pub fn optional(&self, index: usize) -> Option<&'a str> {
        self.operands.get(index).map(String::as_str)
    }

    /// Operands from `index` on; at least one is required.
    pub fn rest(&self, index: usize, operand: &'static str) -> Result<&'a [String]> {
        match self.operands.get(index..) {
            Some(rest) if !rest.is_empty() => Ok(rest),
            _ => Err(self.missing(operand)),
        }
    }

    /// Operands from `index` on, possibly none.
    pub fn tail(&self, index: usize) -> &'a [String] {
        self.operands.get(index..).unwrap_or_default()
    }

    /// Value operand at `index`, coerced.
    pub fn value(&self, index: usize, operand: &'static str) -> Result<Value> {
        let text = self.operand(index, operand)?;
        Ok(coerce::parse_value(text, self.flags.json))
    }

    /// Numeric operand at `index` in wire form.
    pub fn number(&self, index: usize, operand: &'static str) -> Result<String> {
        let text = self.operand(index, operand)?;
        Ok(coerce::numeric(text).to_string())
    }

    /// Value operands from `index` on, coerced to wire form.
    pub fn values(&self, index: usize, operand: &'static str) -> Result<Vec<String>> {
        Ok(self
            .rest(index, operand)?
            .iter()
            .map(|text| coerce::to_wire(&coerce::parse_value(text, self.flags.json)))
            .collect())
    }

    /// Field/value pairs from `index` on, in wire form.
    pub fn pairs(&self, index: usize, operand: &'static str) -> Result<Vec<String>> {
        let map = coerce::pairs_to_object(self.rest(index, operand)?, self.flags.json);
        if map.is_empty() {
            return Err(self.missing("value"));
        }
        Ok(map
            .iter()
            .flat_map(|(field, value)| [field.clone(), coerce::to_wire(value)])
            .collect())
    }
}

/// Shared shape of `<cmd> <key> [count]`.
pub(crate) fn with_optional_count(call: &Call<'_>) -> Result<Request> {
    let request = Request::new(call.name()).arg(call.operand(0, "key")?);
    Ok(match call.optional(1) {
        Some(count) => request.arg(coerce::numeric(count).to_string()),
        None => request,
    })
}

/// Build the request for `invocation` without touching the network.
pub fn build_request(invocation: &Invocation) -> Result<Request> {
    let call = Call::new(invocation);
    let families: [fn(&Call<'_>) -> Option<Result<Request>>; 8] = [
        strings::dispatch,
        hashes::dispatch,
        lists::dispatch,
        sets::dispatch,
        sorted_sets::dispatch,
        keys::dispatch,
        server::dispatch,
        json::dispatch,
    ];
    families
        .iter()
        .find_map(|dispatch| dispatch(&call))
        .unwrap_or_else(|| Err(Error::UnsupportedCommand(call.name().to_string())))
}


#[cfg(test)]
mod tests {
    use super::test_support::wire;
    use super::*;

    #[test]
    fn test_unknown_command() {
        let err = wire(&["FOOBAR", "x"]).unwrap_err();
        assert!(matches!(err, Error::UnsupportedCommand(ref name) if name == "FOOBAR"));
        assert_eq!("Unknown or unsupported command: FOOBAR", err.to_string());
    }

    #[test]
    fn test_case_insensitive_name() {
        assert_eq!(vec!["GET", "k"], wire(&["get", "k"]).unwrap());
        assert_eq!(vec!["GET", "k"], wire(&["GeT", "k"]).unwrap());
    }

    #[test]
    fn test_missing_operand_names_argument() {
        let err = wire(&["HGET", "user:1"]).unwrap_err();
        assert_eq!("HGET: missing operand <field>", err.to_string());
        let err = wire(&["DEL"]).unwrap_err();
        assert_eq!("DEL: missing operand <key>", err.to_string());
    }

    fn reply_of(argv: &[&str]) -> Reply {
        let (name, operands) = argv.split_first().unwrap();
        let invocation = Invocation::new(*name, operands.iter().map(|s| s.to_string()).collect(), Flags::default());
        build_request(&invocation).unwrap().reply().clone()
    }

    #[test]
    fn test_reply_shapes() {
        assert_eq!(Reply::Hash, reply_of(&["hgetall", "user:1"]));
        assert_eq!(Reply::Plain, reply_of(&["hget", "user:1", "name"]));
        assert_eq!(
            Reply::Fields(vec!["name".to_string(), "age".to_string()]),
            reply_of(&["HMGET", "user:1", "name", "age"])
        );
        assert_eq!(Reply::Plain, reply_of(&["HDEL", "user:1", "name"]));
        assert_eq!(Reply::Scan, reply_of(&["SCAN", "0"]));
        assert_eq!(Reply::Scan, reply_of(&["HSCAN", "h", "0"]));
        assert_eq!(Reply::Scan, reply_of(&["SSCAN", "s", "0"]));
        assert_eq!(Reply::Scan, reply_of(&["ZSCAN", "z", "0"]));
    }

    #[test]
    fn test_debug_shows_wire_args() {
        let rendered = format!("{:?}", Request::new("GET").arg("k"));
        assert!(rendered.contains(r#"["GET", "k"]"#), "{rendered}");
    }
}
