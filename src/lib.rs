use cmd_parser::{Args, Invocation};
use error::{Error, Result};
use rest_context::RestContext;

pub mod cmd_parser;
pub mod coerce;
pub mod error;
pub mod logging;
pub mod options;
pub mod output;
pub mod redis_funcs;
pub mod rest_context;

/// Resolve credentials, send the command and return the text to print.
///
/// Credentials are checked before any operand is looked at.
pub fn run(args: &Args) -> Result<String> {
    let context = RestContext::from_parts(args.url.clone(), args.token.clone(), args.timeout)?;
    let invocation = args.invocation().ok_or(Error::MissingCommand)?;
    call_and_get_result(&context, &invocation)
}

pub fn call_and_get_result(context: &RestContext, invocation: &Invocation) -> Result<String> {
    let request = redis_funcs::build_request(invocation)?;
    let result = context.execute(&request)?;
    Ok(output::format_result(&result))
}
