use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging with optional quiet mode.
///
/// When `quiet` is true, only error-level events are emitted.
/// When `quiet` is false, info-level and above events are emitted.
///
/// Calling this more than once is harmless: later calls leave the first
/// subscriber in place.
pub fn init_logging(quiet: bool) {
    let directive = if quiet { "gymcfg=error" } else { "gymcfg=info" };
    let mut filter = EnvFilter::from_default_env();
    if let Ok(parsed) = directive.parse() {
        filter = filter.add_directive(parsed);
    }

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_current_span(false)
                .with_span_list(false),
        )
        .with(filter)
        .try_init();
}
