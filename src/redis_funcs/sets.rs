use super::{with_optional_count, Call, Reply, Request};
use crate::coerce;
use crate::error::Result;
use crate::options::ScanOptions;

pub(super) fn dispatch(call: &Call<'_>) -> Option<Result<Request>> {
    let request = match call.name() {
        "SADD" | "SREM" | "SMISMEMBER" => members(call),
        "SMEMBERS" | "SCARD" => key_only(call),
        "SISMEMBER" => sismember(call),
        "SPOP" | "SRANDMEMBER" => with_optional_count(call),
        "SINTER" | "SUNION" | "SDIFF" => algebra(call),
        "SINTERSTORE" | "SUNIONSTORE" | "SDIFFSTORE" => algebra_store(call),
        "SMOVE" => smove(call),
        "SSCAN" => sscan(call),
        _ => return None,
    };
    Some(request)
}

fn key_only(call: &Call<'_>) -> Result<Request> {
    Ok(Request::new(call.name()).arg(call.operand(0, "key")?))
}

fn members(call: &Call<'_>) -> Result<Request> {
    let key = call.operand(0, "key")?;
    Ok(Request::new(call.name()).arg(key).args(call.values(1, "member")?))
}

fn sismember(call: &Call<'_>) -> Result<Request> {
    let key = call.operand(0, "key")?;
    let member = coerce::to_wire(&call.value(1, "member")?);
    Ok(Request::new("SISMEMBER").arg(key).arg(member))
}

fn algebra(call: &Call<'_>) -> Result<Request> {
    Ok(Request::new(call.name()).args(call.rest(0, "key")?))
}

fn algebra_store(call: &Call<'_>) -> Result<Request> {
    let destination = call.operand(0, "destination")?;
    Ok(Request::new(call.name()).arg(destination).args(call.rest(1, "key")?))
}

fn smove(call: &Call<'_>) -> Result<Request> {
    let source = call.operand(0, "source")?;
    let destination = call.operand(1, "destination")?;
    let member = coerce::to_wire(&call.value(2, "member")?);
    Ok(Request::new("SMOVE").arg(source).arg(destination).arg(member))
}

fn sscan(call: &Call<'_>) -> Result<Request> {
    let key = call.operand(0, "key")?;
    let cursor = coerce::cursor(call.operand(1, "cursor")?);
    let request = Request::new("SSCAN").arg(key).arg(cursor).with_reply(Reply::Scan);
    Ok(match ScanOptions::parse(call.tail(2)) {
        Some(opts) => request.args(opts.to_args()),
        None => request,
    })
}
