//! Logging setup and log targets.

use std::sync::Once;

use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt::format::{DefaultFields, Format};
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::fmt::SubscriberBuilder;
use tracing_subscriber::FmtSubscriber;

use crate::config::{LogConfig, LogFormat, LogLevel};

// Log targets used like `debug!(target: STORE, "Added record");`
pub const STORE: &str = "store";
pub const CODEC: &str = "codec";
pub const AUTH: &str = "auth";
pub const APPOINTMENT: &str = "appointment";
pub const CLINIC: &str = "clinic";
pub const CONFIG: &str = "config";

static INIT: Once = Once::new();

type Subscriber = Box<dyn tracing::Subscriber + Send + Sync>;

/// Install the global subscriber. Only the first call has any effect, and
/// an embedding application that already installed one keeps it.
pub fn init(config: &LogConfig) {
    INIT.call_once(|| {
        let subscriber = set_format(config, builder(config));
        if tracing::subscriber::set_global_default(subscriber).is_err() {
            // host application owns logging
            return;
        }
        tracing::debug!(target: CONFIG, level = %config.level, "Logging initialised");
    });
}

pub fn builder(config: &LogConfig) -> SubscriberBuilder<DefaultFields, Format, EnvFilter, BoxMakeWriter> {
    // RUST_LOG wins over the configured level
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| level_filter(config));
    builder_with_filter(config, env_filter)
}

/// Filter built from the configured level alone.
pub fn level_filter(config: &LogConfig) -> EnvFilter {
    EnvFilter::builder().parse_lossy(config.level.to_string())
}

pub fn builder_with_filter(
    config: &LogConfig,
    env_filter: EnvFilter,
) -> SubscriberBuilder<DefaultFields, Format, EnvFilter, BoxMakeWriter> {
    let mut builder = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_ansi(config.ansi_enabled)
        .with_writer(BoxMakeWriter::new(std::io::stderr));

    if matches!(config.level, LogLevel::Debug | LogLevel::Trace) {
        builder = builder.with_file(true).with_line_number(true);
    }

    builder
}

pub fn set_format(
    config: &LogConfig,
    builder: SubscriberBuilder<DefaultFields, Format, EnvFilter, BoxMakeWriter>,
) -> Subscriber {
    match config.format {
        LogFormat::Pretty => Box::new(builder.pretty().finish()),
        LogFormat::Structured => Box::new(builder.json().finish()),
        LogFormat::Text => Box::new(builder.finish()),
    }
}
