use tracing::Span;

use super::TraceId;

/// Root span for one bot generation (start or reload until shutdown).
pub fn root_span(trace_id: &TraceId) -> Span {
    tracing::info_span!("bot", trace_id = %trace_id)
}

/// Span for a single poll of one tracker, correlated by its own trace_id.
pub fn poll_span(symbol: &str, feed: &str, trace_id: &TraceId) -> Span {
    tracing::info_span!("poll", symbol = %symbol, feed = %feed, trace_id = %trace_id)
}
