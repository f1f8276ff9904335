use super::{Call, Reply, Request};
use crate::coerce;
use crate::error::{Error, Result};
use crate::options::ScanOptions;

pub(super) fn dispatch(call: &Call<'_>) -> Option<Result<Request>> {
    let request = match call.name() {
        "DEL" | "UNLINK" | "EXISTS" | "TOUCH" => many_keys(call),
        "EXPIRE" | "PEXPIRE" => expire(call),
        "EXPIREAT" | "PEXPIREAT" => expire_at(call),
        "TTL" | "PTTL" | "PERSIST" | "TYPE" | "DUMP" => key_only(call),
        "KEYS" => keys(call),
        "SCAN" => scan(call),
        "RENAME" | "RENAMENX" | "COPY" => rename(call),
        "OBJECT" => object(call),
        "RANDOMKEY" => Ok(Request::new("RANDOMKEY")),
        _ => return None,
    };
    Some(request)
}

fn key_only(call: &Call<'_>) -> Result<Request> {
    Ok(Request::new(call.name()).arg(call.operand(0, "key")?))
}

fn many_keys(call: &Call<'_>) -> Result<Request> {
    Ok(Request::new(call.name()).args(call.rest(0, "key")?))
}

fn expire(call: &Call<'_>) -> Result<Request> {
    let key = call.operand(0, "key")?;
    let ttl = call.number(1, if call.name() == "EXPIRE" { "seconds" } else { "milliseconds" })?;
    Ok(Request::new(call.name()).arg(key).arg(ttl))
}

fn expire_at(call: &Call<'_>) -> Result<Request> {
    let key = call.operand(0, "key")?;
    let timestamp = call.number(1, "timestamp")?;
    Ok(Request::new(call.name()).arg(key).arg(timestamp))
}

fn keys(call: &Call<'_>) -> Result<Request> {
    Ok(Request::new("KEYS").arg(call.operand(0, "pattern")?))
}

fn scan(call: &Call<'_>) -> Result<Request> {
    let cursor = coerce::cursor(call.operand(0, "cursor")?);
    let request = Request::new("SCAN").arg(cursor).with_reply(Reply::Scan);
    Ok(match ScanOptions::parse(call.tail(1)) {
        Some(opts) => request.args(opts.to_args()),
        None => request,
    })
}

fn rename(call: &Call<'_>) -> Result<Request> {
    let key = call.operand(0, "key")?;
    let new_key = call.operand(1, "newkey")?;
    Ok(Request::new(call.name()).arg(key).arg(new_key))
}

fn object(call: &Call<'_>) -> Result<Request> {
    let subcommand = call.operand(0, "subcommand")?.to_ascii_uppercase();
    if !matches!(subcommand.as_str(), "ENCODING" | "FREQ" | "IDLETIME" | "REFCOUNT") {
        return Err(Error::UnknownSubcommand {
            command: "OBJECT".to_string(),
            subcommand,
        });
    }
    let key = call.operand(1, "key")?;
    Ok(Request::new("OBJECT").arg(subcommand).arg(key))
}
