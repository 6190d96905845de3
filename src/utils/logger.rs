use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is unset. Verbose mode also surfaces the
/// HTTP client's connection handling, which is where hung runs stall.
fn default_directives(verbose: bool) -> &'static str {
    if verbose {
        "sched_talks=debug,reqwest=debug,warn"
    } else {
        "sched_talks=info,warn"
    }
}

/// Logs go to stderr so stdout only carries the final result line.
pub fn init_cli_logger(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(verbose)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}
