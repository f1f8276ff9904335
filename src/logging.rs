use atty::Stream;
use tracing_subscriber::EnvFilter;

/// Install the stderr subscriber. `RUST_LOG` wins over `verbosity`.
pub fn init(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // only color on a terminal, stderr may be captured
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(atty::is(Stream::Stderr))
        .with_target(false)
        .try_init();
}
