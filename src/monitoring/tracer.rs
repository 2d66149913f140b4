/*!
 * Structured Tracing
 * Subscriber setup and timed spans for pool audits
 *
 * Features:
 * - Env-filtered output (RUST_LOG)
 * - JSON-formatted logs for structured parsing
 * - Phase spans with duration fields
 */

use crate::core::limits::ENV_TRACE_JSON;
use std::time::Instant;
use tracing::{debug, info, span, Level};
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Initialize structured tracing
///
/// Environment variables:
/// - RUST_LOG: Set log level (default: info)
/// - POOL_TRACE_JSON: Enable JSON output (default: false)
///
/// Returns `false` if a global subscriber was already installed.
pub fn init_tracing() -> bool {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let use_json = std::env::var(ENV_TRACE_JSON)
        .map(|v| v == "1" || v == "true")
        .unwrap_or(false);

    let registry = tracing_subscriber::registry().with(env_filter);

    let installed = if use_json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_thread_names(true)
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .try_init()
            .is_ok()
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_thread_names(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .compact(),
            )
            .try_init()
            .is_ok()
    };

    if installed {
        info!(json = use_json, "Structured tracing initialized");
    }
    installed
}

/// Timed span around one audit phase
pub struct AuditSpan {
    span: tracing::Span,
    start: Instant,
}

impl AuditSpan {
    pub fn new(phase: &str) -> Self {
        let span = span!(
            Level::INFO,
            "audit",
            phase = phase,
            duration_us = tracing::field::Empty,
            items = tracing::field::Empty,
        );

        let _entered = span.enter();
        debug!(phase, "audit phase started");
        drop(_entered);

        Self {
            span,
            start: Instant::now(),
        }
    }

    /// Enter the span for the current scope
    pub fn enter(&self) -> tracing::span::Entered<'_> {
        self.span.enter()
    }

    /// Record the item count and elapsed time, closing the span
    pub fn finish(self, items: usize) {
        let elapsed = self.start.elapsed();
        self.span.record("items", items);
        self.span.record("duration_us", elapsed.as_micros() as u64);

        let _entered = self.span.enter();
        debug!(items, duration_us = elapsed.as_micros() as u64, "audit phase finished");
    }
}
