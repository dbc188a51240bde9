use tracing_subscriber::EnvFilter;

pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

/// Installs the global fmt subscriber, filtered by `RUST_LOG`. Set
/// `LOG_FORMAT=json` for machine readable output.
pub fn init_tracing_subscriber() -> Result<(), tracing::subscriber::SetGlobalDefaultError> {
    let json = std::env::var(LOG_FORMAT_ENV).is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    let builder = tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env());

    if json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.pretty().finish())
    }
}
