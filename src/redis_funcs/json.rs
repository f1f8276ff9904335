use super::{Call, Request};
use crate::coerce;
use crate::error::Result;

const ROOT_PATH: &str = "$";

pub(super) fn dispatch(call: &Call<'_>) -> Option<Result<Request>> {
    let request = match call.name() {
        "JSON.SET" => json_set(call),
        "JSON.GET" | "JSON.DEL" => with_path(call),
        _ => return None,
    };
    Some(request)
}

fn json_set(call: &Call<'_>) -> Result<Request> {
    let key = call.operand(0, "key")?;
    let path = call.operand(1, "path")?;
    let value = coerce::to_wire(&call.value(2, "value")?);
    Ok(Request::new("JSON.SET").arg(key).arg(path).arg(value))
}

fn with_path(call: &Call<'_>) -> Result<Request> {
    let key = call.operand(0, "key")?;
    let path = call.optional(1).unwrap_or(ROOT_PATH);
    Ok(Request::new(call.name()).arg(key).arg(path))
}
