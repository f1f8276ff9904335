use std::process::ExitCode;

use clap::Parser;

use redis_rest_cli::cmd_parser::{self, Args};
use redis_rest_cli::error::Error;

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            // --version lands here too and is not a failure
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    if args.help || args.command.is_empty() {
        let _ = cmd_parser::print_help();
        return if args.help {
            ExitCode::SUCCESS
        } else {
            ExitCode::FAILURE
        };
    }

    redis_rest_cli::logging::init(args.verbose);

    match redis_rest_cli::run(&args) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("Error: {err}");
            if matches!(err, Error::MissingCredentials) {
                eprintln!(
                    "Provide --url and --token, or set UPSTASH_REDIS_REST_URL and UPSTASH_REDIS_REST_TOKEN"
                );
            }
            ExitCode::FAILURE
        }
    }
}
