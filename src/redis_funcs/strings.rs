use super::{Call, Request};
use crate::coerce;
use crate::error::Result;
use crate::options::SetOptions;

pub(super) fn dispatch(call: &Call<'_>) -> Option<Result<Request>> {
    let request = match call.name() {
        "GET" | "INCR" | "DECR" | "STRLEN" => key_only(call),
        "SET" => set(call),
        "SETNX" => setnx(call),
        "SETEX" | "PSETEX" => setex(call),
        "MGET" => mget(call),
        "MSET" | "MSETNX" => mset(call),
        "INCRBY" | "INCRBYFLOAT" | "DECRBY" => incr_by(call),
        "APPEND" => append(call),
        "GETRANGE" => getrange(call),
        "SETRANGE" => setrange(call),
        _ => return None,
    };
    Some(request)
}

fn key_only(call: &Call<'_>) -> Result<Request> {
    Ok(Request::new(call.name()).arg(call.operand(0, "key")?))
}

fn set(call: &Call<'_>) -> Result<Request> {
    let key = call.operand(0, "key")?;
    let value = coerce::to_wire(&call.value(1, "value")?);
    let request = Request::new("SET").arg(key).arg(value);
    Ok(match SetOptions::from_flags(call.flags()) {
        Some(opts) => request.args(opts.to_args()),
        None => request,
    })
}

fn setnx(call: &Call<'_>) -> Result<Request> {
    let key = call.operand(0, "key")?;
    let value = coerce::to_wire(&call.value(1, "value")?);
    Ok(Request::new("SETNX").arg(key).arg(value))
}

/// `SETEX` and `PSETEX` share the `<key> <ttl> <value>` shape.
fn setex(call: &Call<'_>) -> Result<Request> {
    let key = call.operand(0, "key")?;
    let ttl = call.number(1, if call.name() == "SETEX" { "seconds" } else { "milliseconds" })?;
    let value = coerce::to_wire(&call.value(2, "value")?);
    Ok(Request::new(call.name()).arg(key).arg(ttl).arg(value))
}

fn mget(call: &Call<'_>) -> Result<Request> {
    Ok(Request::new("MGET").args(call.rest(0, "key")?))
}

fn mset(call: &Call<'_>) -> Result<Request> {
    Ok(Request::new(call.name()).args(call.pairs(0, "key")?))
}

fn incr_by(call: &Call<'_>) -> Result<Request> {
    let key = call.operand(0, "key")?;
    let amount = call.number(1, if call.name() == "DECRBY" { "decrement" } else { "increment" })?;
    Ok(Request::new(call.name()).arg(key).arg(amount))
}

fn append(call: &Call<'_>) -> Result<Request> {
    let key = call.operand(0, "key")?;
    let value = call.operand(1, "value")?;
    Ok(Request::new("APPEND").arg(key).arg(value))
}

fn getrange(call: &Call<'_>) -> Result<Request> {
    let key = call.operand(0, "key")?;
    let start = call.number(1, "start")?;
    let end = call.number(2, "end")?;
    Ok(Request::new("GETRANGE").arg(key).arg(start).arg(end))
}

fn setrange(call: &Call<'_>) -> Result<Request> {
    let key = call.operand(0, "key")?;
    let offset = call.number(1, "offset")?;
    let value = call.operand(2, "value")?;
    Ok(Request::new("SETRANGE").arg(key).arg(offset).arg(value))
}
