use sentry::integrations::log::SentryLogger;

const DEFAULT_FILTERS: &str = "info";

/// `RUST_LOG` when set, `info` otherwise.
fn filters(rust_log: Option<String>) -> String {
    rust_log
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_FILTERS.to_string())
}

/// Sets up `pretty_env_logger`, routed through Sentry when a DSN is given.
///
/// The returned guard flushes pending Sentry events on drop, so callers keep it
/// alive for the whole process.
pub fn init(sentry_url: Option<&str>) -> Option<sentry::ClientInitGuard> {
    let mut builder = pretty_env_logger::formatted_builder();
    builder.parse_filters(&filters(std::env::var("RUST_LOG").ok()));

    let Some(dsn) = sentry_url else {
        builder.init();
        return None;
    };

    let guard = sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    ));

    let logger = builder.build();
    let max_level = logger.filter();

    if log::set_boxed_logger(Box::new(SentryLogger::with_dest(logger))).is_ok() {
        log::set_max_level(max_level);
    }

    Some(guard)
}
