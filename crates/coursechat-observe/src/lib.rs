//! Observability setup for coursechat: tracing subscriber and optional
//! OpenTelemetry export.

pub mod tracing_setup;
