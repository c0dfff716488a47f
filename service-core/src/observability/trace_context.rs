//! W3C Trace Context propagation for outgoing HTTP calls.
//!
//! Downstream services receive `traceparent`/`tracestate` headers built from
//! the current span so their spans join the caller's trace.
//!
//! See: https://www.w3.org/TR/trace-context/

use opentelemetry::trace::TraceContextExt;
use reqwest::header::HeaderMap;
use tracing::Span;
use tracing_opentelemetry::OpenTelemetrySpanExt;

/// Header name for W3C traceparent
pub const TRACEPARENT_HEADER: &str = "traceparent";

/// Header name for W3C tracestate
pub const TRACESTATE_HEADER: &str = "tracestate";

/// Inject current trace context into HTTP request headers.
///
/// Does nothing when the current span carries no valid OpenTelemetry context,
/// e.g. when OTLP export is disabled.
pub fn inject_trace_context(headers: &mut HeaderMap) {
    let span = Span::current();
    let context = span.context();
    let otel_span = context.span();
    let span_context = otel_span.span_context();

    if !span_context.is_valid() {
        return;
    }

    // version-trace_id-span_id-trace_flags
    let traceparent = format!(
        "00-{}-{}-{:02x}",
        span_context.trace_id(),
        span_context.span_id(),
        span_context.trace_flags().to_u8()
    );

    if let Ok(value) = traceparent.parse() {
        headers.insert(TRACEPARENT_HEADER, value);
    }

    let tracestate = span_context.trace_state().header();
    if !tracestate.is_empty()
        && let Ok(value) = tracestate.parse()
    {
        headers.insert(TRACESTATE_HEADER, value);
    }
}

/// A reqwest request that gets trace headers injected when sent.
pub struct TracedRequest {
    request: reqwest::RequestBuilder,
}

impl TracedRequest {
    pub fn new(request: reqwest::RequestBuilder) -> Self {
        Self { request }
    }

    /// Attach a multipart/form-data body.
    pub fn multipart(self, form: reqwest::multipart::Form) -> Self {
        Self {
            request: self.request.multipart(form),
        }
    }

    /// Send the request with trace context headers injected.
    pub async fn send(self) -> Result<reqwest::Response, reqwest::Error> {
        let mut headers = HeaderMap::new();
        inject_trace_context(&mut headers);

        self.request.headers(headers).send().await
    }
}

/// Extension trait for reqwest::Client to create traced requests.
pub trait TracedClientExt {
    fn traced_get(&self, url: &str) -> TracedRequest;
    fn traced_post(&self, url: &str) -> TracedRequest;
    fn traced_delete(&self, url: &str) -> TracedRequest;
}

impl TracedClientExt for reqwest::Client {
    fn traced_get(&self, url: &str) -> TracedRequest {
        TracedRequest::new(self.get(url))
    }

    fn traced_post(&self, url: &str) -> TracedRequest {
        TracedRequest::new(self.post(url))
    }

    fn traced_delete(&self, url: &str) -> TracedRequest {
        TracedRequest::new(self.delete(url))
    }
}
