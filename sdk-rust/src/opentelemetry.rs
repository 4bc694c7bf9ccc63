use crate::{ConnectXError, ConnectXResult};
use opentelemetry::trace::Status;
use std::{future::Future, time::Instant};
use tracing::{info_span, Span};
use tracing_futures::Instrument;
use tracing_opentelemetry::OpenTelemetrySpanExt;

pub struct SubmitSpan {
    span: Span,
    operation: &'static str,
    start_time: Instant,
}

impl SubmitSpan {
    pub fn new(operation: &'static str, path: &str, organize_id: &str) -> Self {
        let span = match operation {
            "track" => info_span!("connectx.track"),
            "identify" => info_span!("connectx.identify"),
            "create_records" => info_span!("connectx.create_records"),
            "open_ticket" => info_span!("connectx.open_ticket"),
            _ => info_span!("connectx.submit"),
        };
        span.set_attribute("connectx.operation", operation);
        span.set_attribute("connectx.endpoint", path.to_string());
        span.set_attribute("connectx.organize_id", organize_id.to_string());

        Self {
            span,
            operation,
            start_time: Instant::now(),
        }
    }

    pub async fn instrument_future<F>(&self, future: F) -> F::Output
    where
        F: Future,
    {
        future.instrument(self.span.clone()).await
    }

    pub fn on_success(&self) {
        let elapsed = self.start_time.elapsed().as_secs_f64();
        self.span.set_attribute("connectx.duration", elapsed);
        self.span.in_scope(|| {
            tracing::debug!(operation = self.operation, elapsed, "event delivered");
        });
    }

    pub fn on_error(&self, error: &ConnectXError) {
        if let ConnectXError::Delivery(status, _) = error {
            self.span
                .set_attribute("http.response.status_code", i64::from(status.as_u16()));
        }
        self.span
            .set_attribute("exception.message", error.to_string());
        self.span.set_status(Status::error(error.to_string()));
        self.span.in_scope(|| {
            tracing::error!(operation = self.operation, error = %error, "event dropped");
        });
    }
}

/// Run one submission inside its span, logging the outcome.
pub async fn trace_submit<Fut>(
    operation: &'static str,
    path: &str,
    organize_id: &str,
    submit: Fut,
) -> ConnectXResult<()>
where
    Fut: Future<Output = ConnectXResult<()>>,
{
    let span = SubmitSpan::new(operation, path, organize_id);
    let result = span.instrument_future(submit).await;

    match &result {
        Ok(()) => span.on_success(),
        Err(error) => span.on_error(error),
    }

    result
}
