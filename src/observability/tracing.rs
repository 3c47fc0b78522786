//! Trace-context propagation.
//!
//! # Responsibilities
//! - Stamp every span with a trace id and a span id
//! - Inherit the trace id from the parent span; mint a fresh one at roots
//!
//! # Design Decisions
//! - Ids are random (128-bit trace, 64-bit span), rendered lowercase hex
//! - Stored in span extensions so the log formatter can read them
//! - Spans are ordinary `tracing` spans; scoping them with `Instrument`
//!   (or an entered guard) closes them on every exit path, errors included

use rand::Rng;
use tracing::span::{Attributes, Id};
use tracing::Subscriber;
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

/// Identifiers tying a span to its enclosing trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceContext {
    pub trace_id: u128,
    pub span_id: u64,
    pub sampled: bool,
}

impl TraceContext {
    /// Start a new trace. Everything is sampled; there is no exporter to
    /// overload.
    fn root() -> Self {
        let mut rng = rand::thread_rng();
        Self {
            trace_id: rng.gen(),
            span_id: rng.gen(),
            sampled: true,
        }
    }

    /// Derive a context for a child span: same trace, fresh span id.
    fn child_of(parent: &TraceContext) -> Self {
        Self {
            trace_id: parent.trace_id,
            span_id: rand::thread_rng().gen(),
            sampled: parent.sampled,
        }
    }

    /// 32-char lowercase hex rendering of the trace id.
    pub fn trace_id_hex(&self) -> String {
        format!("{:032x}", self.trace_id)
    }

    /// 16-char lowercase hex rendering of the span id.
    pub fn span_id_hex(&self) -> String {
        format!("{:016x}", self.span_id)
    }
}

/// Subscriber layer that assigns a [`TraceContext`] to every new span.
#[derive(Debug, Default)]
pub struct TraceContextLayer;

impl<S> Layer<S> for TraceContextLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, id: &Id, ctx: Context<'_, S>) {
        let span = ctx.span(id).expect("new span missing from registry");

        let parent = attrs
            .parent()
            .and_then(|parent_id| ctx.span(parent_id))
            .or_else(|| {
                if attrs.is_contextual() {
                    ctx.lookup_current()
                } else {
                    None
                }
            })
            .and_then(|parent| parent.extensions().get::<TraceContext>().copied());

        let context = match parent {
            Some(parent) => TraceContext::child_of(&parent),
            None => TraceContext::root(),
        };
        span.extensions_mut().insert(context);
    }
}
