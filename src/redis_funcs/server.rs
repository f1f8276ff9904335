use super::{Call, Request};
use crate::error::Result;

pub(super) fn dispatch(call: &Call<'_>) -> Option<Result<Request>> {
    let request = match call.name() {
        "DBSIZE" | "FLUSHDB" | "FLUSHALL" | "TIME" => Ok(Request::new(call.name())),
        "PING" | "INFO" => Ok(Request::new(call.name()).args(call.optional(0))),
        "ECHO" => echo(call),
        _ => return None,
    };
    Some(request)
}

fn echo(call: &Call<'_>) -> Result<Request> {
    Ok(Request::new("ECHO").arg(call.operand(0, "message")?))
}
