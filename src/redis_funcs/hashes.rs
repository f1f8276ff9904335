use super::{Call, Reply, Request};
use crate::coerce;
use crate::error::Result;
use crate::options::ScanOptions;

pub(super) fn dispatch(call: &Call<'_>) -> Option<Result<Request>> {
    let request = match call.name() {
        "HGET" | "HEXISTS" => field(call),
        "HSET" | "HMSET" => hset(call),
        "HSETNX" => hsetnx(call),
        "HMGET" => hmget(call),
        "HDEL" => fields(call),
        "HGETALL" => hgetall(call),
        "HKEYS" | "HVALS" | "HLEN" => key_only(call),
        "HINCRBY" | "HINCRBYFLOAT" => hincr_by(call),
        "HSCAN" => hscan(call),
        _ => return None,
    };
    Some(request)
}

fn key_only(call: &Call<'_>) -> Result<Request> {
    Ok(Request::new(call.name()).arg(call.operand(0, "key")?))
}

fn field(call: &Call<'_>) -> Result<Request> {
    let key = call.operand(0, "key")?;
    let field = call.operand(1, "field")?;
    Ok(Request::new(call.name()).arg(key).arg(field))
}

fn fields(call: &Call<'_>) -> Result<Request> {
    let key = call.operand(0, "key")?;
    Ok(Request::new(call.name()).arg(key).args(call.rest(1, "field")?))
}

fn hmget(call: &Call<'_>) -> Result<Request> {
    let key = call.operand(0, "key")?;
    let fields = call.rest(1, "field")?;
    Ok(Request::new("HMGET").arg(key).args(fields).with_reply(Reply::Fields(fields.to_vec())))
}

/// `HMSET` goes out as `HSET`, which takes the same pairs.
fn hset(call: &Call<'_>) -> Result<Request> {
    let key = call.operand(0, "key")?;
    Ok(Request::new("HSET").arg(key).args(call.pairs(1, "field")?))
}

fn hsetnx(call: &Call<'_>) -> Result<Request> {
    let key = call.operand(0, "key")?;
    let field = call.operand(1, "field")?;
    let value = coerce::to_wire(&call.value(2, "value")?);
    Ok(Request::new("HSETNX").arg(key).arg(field).arg(value))
}

fn hgetall(call: &Call<'_>) -> Result<Request> {
    Ok(Request::new("HGETALL").arg(call.operand(0, "key")?).with_reply(Reply::Hash))
}

fn hincr_by(call: &Call<'_>) -> Result<Request> {
    let key = call.operand(0, "key")?;
    let field = call.operand(1, "field")?;
    let increment = call.number(2, "increment")?;
    Ok(Request::new(call.name()).arg(key).arg(field).arg(increment))
}

fn hscan(call: &Call<'_>) -> Result<Request> {
    let key = call.operand(0, "key")?;
    let cursor = coerce::cursor(call.operand(1, "cursor")?);
    let request = Request::new("HSCAN").arg(key).arg(cursor).with_reply(Reply::Scan);
    Ok(match ScanOptions::parse(call.tail(2)) {
        Some(opts) => request.args(opts.to_args()),
        None => request,
    })
}
