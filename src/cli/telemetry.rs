use anyhow::Result;
use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Registry};

fn env_filter(verbosity_level: Option<Level>) -> EnvFilter {
    // RUST_LOG=
    EnvFilter::builder()
        .with_default_directive(verbosity_level.unwrap_or(Level::ERROR).into())
        .from_env_lossy()
}

/// Install the global tracing subscriber.
///
/// Logs go to stderr so stdout only carries the planned steps.
///
/// # Errors
/// Returns an error if a global subscriber is already installed.
pub fn init(verbosity_level: Option<Level>, json: bool) -> Result<()> {
    let fmt_layer = fmt::layer()
        .with_file(true)
        .with_line_number(true)
        .with_thread_ids(true)
        .with_target(false)
        .with_writer(std::io::stderr);

    let filter = env_filter(verbosity_level);

    if json {
        let subscriber = Registry::default().with(fmt_layer.json()).with(filter);
        tracing::subscriber::set_global_default(subscriber)?;
    } else {
        let subscriber = Registry::default().with(fmt_layer).with(filter);
        tracing::subscriber::set_global_default(subscriber)?;
    }

    Ok(())
}
