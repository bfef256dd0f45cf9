use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Directive used when `RUST_LOG` is not set.
fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "birthdays=debug,info"
    } else {
        "birthdays=info"
    }
}

fn env_filter(verbose: bool) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)))
}

/// Human-readable output for the local server and the CLI commands.
pub fn init_cli_logger(verbose: bool) {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(verbose)
        .compact();

    tracing_subscriber::registry()
        .with(env_filter(verbose))
        .with(fmt_layer)
        .init();
}

/// One JSON object per line; CloudWatch adds its own timestamps.
pub fn init_lambda_logger() {
    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .without_time()
        .json();

    tracing_subscriber::registry()
        .with(env_filter(false))
        .with(fmt_layer)
        .init();
}
