use super::{with_optional_count, Call, Request};
use crate::coerce;
use crate::error::Result;

pub(super) fn dispatch(call: &Call<'_>) -> Option<Result<Request>> {
    let request = match call.name() {
        "LPUSH" | "RPUSH" | "LPUSHX" | "RPUSHX" => push(call),
        "LPOP" | "RPOP" => with_optional_count(call),
        "LRANGE" | "LTRIM" => span(call),
        "LLEN" => llen(call),
        "LINDEX" => lindex(call),
        "LSET" => lset(call),
        "LREM" => lrem(call),
        "LINSERT" => linsert(call),
        "LPOS" => lpos(call),
        "LMOVE" => lmove(call),
        _ => return None,
    };
    Some(request)
}

fn push(call: &Call<'_>) -> Result<Request> {
    let key = call.operand(0, "key")?;
    Ok(Request::new(call.name()).arg(key).args(call.values(1, "value")?))
}

fn llen(call: &Call<'_>) -> Result<Request> {
    Ok(Request::new("LLEN").arg(call.operand(0, "key")?))
}

fn span(call: &Call<'_>) -> Result<Request> {
    let key = call.operand(0, "key")?;
    let start = call.number(1, "start")?;
    let stop = call.number(2, "stop")?;
    Ok(Request::new(call.name()).arg(key).arg(start).arg(stop))
}

fn lindex(call: &Call<'_>) -> Result<Request> {
    let key = call.operand(0, "key")?;
    let index = call.number(1, "index")?;
    Ok(Request::new("LINDEX").arg(key).arg(index))
}

fn lset(call: &Call<'_>) -> Result<Request> {
    let key = call.operand(0, "key")?;
    let index = call.number(1, "index")?;
    let value = coerce::to_wire(&call.value(2, "value")?);
    Ok(Request::new("LSET").arg(key).arg(index).arg(value))
}

fn lrem(call: &Call<'_>) -> Result<Request> {
    let key = call.operand(0, "key")?;
    let count = call.number(1, "count")?;
    let value = coerce::to_wire(&call.value(2, "value")?);
    Ok(Request::new("LREM").arg(key).arg(count).arg(value))
}

fn linsert(call: &Call<'_>) -> Result<Request> {
    let key = call.operand(0, "key")?;
    let position = call.operand(1, "BEFORE|AFTER")?.to_ascii_uppercase();
    let pivot = coerce::to_wire(&call.value(2, "pivot")?);
    let value = coerce::to_wire(&call.value(3, "value")?);
    Ok(Request::new("LINSERT").arg(key).arg(position).arg(pivot).arg(value))
}

fn lpos(call: &Call<'_>) -> Result<Request> {
    let key = call.operand(0, "key")?;
    let value = coerce::to_wire(&call.value(1, "value")?);
    Ok(Request::new("LPOS").arg(key).arg(value))
}

fn lmove(call: &Call<'_>) -> Result<Request> {
    let source = call.operand(0, "source")?;
    let destination = call.operand(1, "destination")?;
    let from = call.operand(2, "LEFT|RIGHT")?.to_ascii_uppercase();
    let to = call.operand(3, "LEFT|RIGHT")?.to_ascii_uppercase();
    Ok(Request::new("LMOVE").arg(source).arg(destination).arg(from).arg(to))
}
