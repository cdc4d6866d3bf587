use tracing_subscriber::EnvFilter;

/// Install the stderr subscriber. `OBRA_LOG` wins over the `-v` count.
pub fn init(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_env("OBRA_LOG")
        .unwrap_or_else(|_| EnvFilter::new(format!("obra={default_level}")));

    // try_init: a subscriber may already be installed when embedded.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
