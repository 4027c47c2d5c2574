//! Logging setup for the gridform CLI.
//!
//! Warnings and errors (oversized uploads, failed write-backs) go to
//! stderr by default; `-v` or a `RUST_LOG` filter widens the view.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const DEFAULT_LOG_FILTER: &str = "gridform=warn,gridform_model=warn,gridform_export=warn";
const VERBOSE_LOG_FILTER: &str = "gridform=debug,gridform_model=debug,gridform_export=debug";

pub fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose {
            VERBOSE_LOG_FILTER
        } else {
            DEFAULT_LOG_FILTER
        })
    });

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_filter(filter),
        )
        .init();
}
