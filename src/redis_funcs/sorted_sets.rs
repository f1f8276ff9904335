//! Sorted-set commands. Every range variant goes out as `ZRANGE`.

use super::{with_optional_count, Call, Reply, Request};
use crate::coerce;
use crate::error::Result;
use crate::options::{RangeOptions, ScanOptions, ZAddOptions};

pub(super) fn dispatch(call: &Call<'_>) -> Option<Result<Request>> {
    let request = match call.name() {
        "ZADD" => zadd(call),
        "ZREM" | "ZMSCORE" => members(call),
        "ZSCORE" | "ZRANK" | "ZREVRANK" => member(call),
        "ZRANGE" => zrange(call),
        "ZRANGEBYSCORE" => zrange_by_score(call),
        "ZREVRANGE" => zrevrange(call),
        "ZREVRANGEBYSCORE" => zrevrange_by_score(call),
        "ZCARD" => zcard(call),
        "ZCOUNT" | "ZREMRANGEBYSCORE" => score_bounds(call),
        "ZINCRBY" => zincrby(call),
        "ZPOPMIN" | "ZPOPMAX" => with_optional_count(call),
        "ZREMRANGEBYRANK" => zremrangebyrank(call),
        "ZINTERSTORE" | "ZUNIONSTORE" => combine_store(call),
        "ZSCAN" => zscan(call),
        _ => return None,
    };
    Some(request)
}

fn zadd(call: &Call<'_>) -> Result<Request> {
    let key = call.operand(0, "key")?;
    let pairs = coerce::score_member_pairs(call.rest(1, "score")?);
    if pairs.is_empty() {
        return Err(call.missing("member"));
    }
    let mut request = Request::new("ZADD").arg(key);
    if let Some(opts) = ZAddOptions::from_flags(call.flags()) {
        request = request.args(opts.to_args());
    }
    for pair in pairs {
        request = request.arg(pair.score.to_string()).arg(pair.member);
    }
    Ok(request)
}

fn zcard(call: &Call<'_>) -> Result<Request> {
    Ok(Request::new("ZCARD").arg(call.operand(0, "key")?))
}

fn member(call: &Call<'_>) -> Result<Request> {
    let key = call.operand(0, "key")?;
    let member = call.operand(1, "member")?;
    Ok(Request::new(call.name()).arg(key).arg(member))
}

fn members(call: &Call<'_>) -> Result<Request> {
    let key = call.operand(0, "key")?;
    Ok(Request::new(call.name()).arg(key).args(call.rest(1, "member")?))
}

/// `ZRANGE key start stop [BYSCORE|BYLEX] [REV] [LIMIT off count] [WITHSCORES]`.
fn range(key: &str, start: &str, stop: &str, opts: Option<RangeOptions>) -> Request {
    let request = Request::new("ZRANGE").arg(key).arg(start).arg(stop);
    match opts {
        Some(opts) => request.args(opts.to_args()),
        None => request,
    }
}

fn zrange(call: &Call<'_>) -> Result<Request> {
    let key = call.operand(0, "key")?;
    let start = call.operand(1, "start")?;
    let stop = call.operand(2, "stop")?;
    Ok(range(key, start, stop, RangeOptions::from_flags(call.flags())))
}

fn zrange_by_score(call: &Call<'_>) -> Result<Request> {
    let key = call.operand(0, "key")?;
    let min = call.operand(1, "min")?;
    let max = call.operand(2, "max")?;
    let opts = RangeOptions::paging_from_flags(call.flags()).unwrap_or_default().by_score();
    Ok(range(key, min, max, Some(opts)))
}

fn zrevrange(call: &Call<'_>) -> Result<Request> {
    let key = call.operand(0, "key")?;
    let start = call.operand(1, "start")?;
    let stop = call.operand(2, "stop")?;
    let opts = RangeOptions::from_flags(call.flags()).unwrap_or_default().rev();
    Ok(range(key, start, stop, Some(opts)))
}

/// With `REV` the generalized range expects the upper bound first.
fn zrevrange_by_score(call: &Call<'_>) -> Result<Request> {
    let key = call.operand(0, "key")?;
    let min = call.operand(1, "min")?;
    let max = call.operand(2, "max")?;
    let opts = RangeOptions::paging_from_flags(call.flags())
        .unwrap_or_default()
        .by_score()
        .rev();
    Ok(range(key, max, min, Some(opts)))
}

fn score_bounds(call: &Call<'_>) -> Result<Request> {
    let key = call.operand(0, "key")?;
    let min = call.operand(1, "min")?;
    let max = call.operand(2, "max")?;
    Ok(Request::new(call.name()).arg(key).arg(min).arg(max))
}

fn zincrby(call: &Call<'_>) -> Result<Request> {
    let key = call.operand(0, "key")?;
    let increment = call.number(1, "increment")?;
    let member = call.operand(2, "member")?;
    Ok(Request::new("ZINCRBY").arg(key).arg(increment).arg(member))
}

fn zremrangebyrank(call: &Call<'_>) -> Result<Request> {
    let key = call.operand(0, "key")?;
    let start = call.number(1, "start")?;
    let stop = call.number(2, "stop")?;
    Ok(Request::new("ZREMRANGEBYRANK").arg(key).arg(start).arg(stop))
}

fn combine_store(call: &Call<'_>) -> Result<Request> {
    let destination = call.operand(0, "destination")?;
    let numkeys = call.number(1, "numkeys")?;
    Ok(Request::new(call.name())
        .arg(destination)
        .arg(numkeys)
        .args(call.rest(2, "key")?))
}

fn zscan(call: &Call<'_>) -> Result<Request> {
    let key = call.operand(0, "key")?;
    let cursor = coerce::cursor(call.operand(1, "cursor")?);
    let request = Request::new("ZSCAN").arg(key).arg(cursor).with_reply(Reply::Scan);
    Ok(match ScanOptions::parse(call.tail(2)) {
        Some(opts) => request.args(opts.to_args()),
        None => request,
    })
}
