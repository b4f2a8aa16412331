//! Tracing subscriber initialization with structured logging and optional
//! OpenTelemetry trace export.
//!
//! # Usage
//!
//! ```no_run
//! use coursechat_observe::tracing_setup::{LogTarget, TracingOptions, init_tracing};
//!
//! // One-shot command: logs to stderr.
//! init_tracing(TracingOptions::new("warn")).unwrap();
//!
//! // Interactive chat: the terminal belongs to the chat loop.
//! init_tracing(
//!     TracingOptions::new("info").with_target(LogTarget::File("/tmp/cchat.log".into())),
//! )
//! .unwrap();
//! ```

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};

use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::trace::SdkTracerProvider;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::Layer;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Stores the OTel tracer provider so it can be shut down cleanly on exit.
static TRACER_PROVIDER: OnceLock<SdkTracerProvider> = OnceLock::new();

/// Where formatted log lines go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    /// Append to a file, without ANSI colors.
    File(PathBuf),
}

/// Subscriber settings chosen by the binary.
#[derive(Debug, Clone)]
pub struct TracingOptions {
    /// Filter directive used when `RUST_LOG` is unset (e.g. `"info"`).
    pub default_level: String,
    pub target: LogTarget,
    pub enable_otel: bool,
}

impl TracingOptions {
    pub fn new(default_level: impl Into<String>) -> Self {
        Self {
            default_level: default_level.into(),
            target: LogTarget::Stderr,
            enable_otel: false,
        }
    }

    pub fn with_target(mut self, target: LogTarget) -> Self {
        self.target = target;
        self
    }

    pub fn with_otel(mut self, enable_otel: bool) -> Self {
        self.enable_otel = enable_otel;
        self
    }
}

/// Map a `-v` count to a default filter directive.
pub fn level_for_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Initialize the global tracing subscriber.
///
/// - Always installs a structured `fmt` layer with target visibility and span
///   close timing, writing to stderr or appending to a file.
/// - When `enable_otel` is true, additionally bridges tracing spans to
///   OpenTelemetry using a stdout exporter.
/// - `RUST_LOG` wins over `default_level` when set.
///
/// # Errors
///
/// Returns an error if the log file cannot be opened, the global subscriber
/// has already been set, or the OTel pipeline fails to initialize.
pub fn init_tracing(options: TracingOptions) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&options.default_level));

    let fmt_layer = match &options.target {
        LogTarget::Stderr => tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_span_events(FmtSpan::CLOSE)
            .with_writer(std::io::stderr)
            .boxed(),
        LogTarget::File(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_span_events(FmtSpan::CLOSE)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .boxed()
        }
    };

    if options.enable_otel {
        let provider = SdkTracerProvider::builder()
            .with_simple_exporter(opentelemetry_stdout::SpanExporter::default())
            .build();
        let tracer = provider.tracer("coursechat");
        let otel_layer = tracing_opentelemetry::layer().with_tracer(tracer);

        // Store the provider for shutdown and register it globally.
        let _ = TRACER_PROVIDER.set(provider.clone());
        opentelemetry::global::set_tracer_provider(provider);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()?;
    }

    Ok(())
}

/// Flush pending traces and shut down the OpenTelemetry tracer provider.
///
/// Safe to call even when OTel was not enabled (no-op in that case).
pub fn shutdown_tracing() {
    if let Some(provider) = TRACER_PROVIDER.get() {
        if let Err(e) = provider.shutdown() {
            eprintln!("Warning: OTel tracer provider shutdown error: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_levels() {
        assert_eq!(level_for_verbosity(0), "warn");
        assert_eq!(level_for_verbosity(1), "info");
        assert_eq!(level_for_verbosity(2), "debug");
        assert_eq!(level_for_verbosity(9), "trace");
    }

    #[test]
    fn options_builder() {
        let options = TracingOptions::new("debug")
            .with_target(LogTarget::File(PathBuf::from("/tmp/x.log")))
            .with_otel(true);
        assert_eq!(options.default_level, "debug");
        assert_eq!(options.target, LogTarget::File(PathBuf::from("/tmp/x.log")));
        assert!(options.enable_otel);
    }
}
