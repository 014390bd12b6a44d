//! Prometheus metrics: HTTP traffic plus order and payment events.

use std::sync::OnceLock;

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounter, IntCounterVec, IntGauge, Opts, Registry,
    TextEncoder, core::Collector,
};
use salvo::{
    Request, Response, handler,
    http::{
        StatusCode,
        header::{CONTENT_TYPE, HeaderValue},
    },
};
use tracing::error;

const PREFIX: &str = "emporium_json";

#[derive(Debug)]
struct Metrics {
    registry: Registry,
    requests_total: IntCounterVec,
    request_duration_seconds: HistogramVec,
    requests_in_flight: IntGauge,
    orders_placed_total: IntCounter,
    checkouts_total: IntCounterVec,
    webhook_events_total: IntCounterVec,
}

static METRICS: OnceLock<Option<Metrics>> = OnceLock::new();

/// Keeps the in-flight gauge raised for as long as it lives.
#[derive(Debug)]
pub(super) struct InFlightRequestGuard(Option<&'static IntGauge>);

impl InFlightRequestGuard {
    pub(super) fn track() -> Self {
        let gauge = metrics().map(|metrics| &metrics.requests_in_flight);

        if let Some(gauge) = gauge {
            gauge.inc();
        }

        Self(gauge)
    }
}

impl Drop for InFlightRequestGuard {
    fn drop(&mut self) {
        if let Some(gauge) = self.0 {
            gauge.dec();
        }
    }
}

pub(super) fn observe_request(method: &str, route: &str, status_code: u16, duration_seconds: f64) {
    let Some(metrics) = metrics() else {
        return;
    };

    let status_code = status_code.to_string();

    metrics
        .requests_total
        .with_label_values(&[method, route, status_code.as_str()])
        .inc();

    metrics
        .request_duration_seconds
        .with_label_values(&[method, route])
        .observe(duration_seconds);
}

/// Count an order created from a cart.
pub(crate) fn record_order_placed() {
    if let Some(metrics) = metrics() {
        metrics.orders_placed_total.inc();
    }
}

/// Count a checkout attempt, `started` or `failed`.
pub(crate) fn record_checkout(result: &str) {
    if let Some(metrics) = metrics() {
        metrics.checkouts_total.with_label_values(&[result]).inc();
    }
}

/// Count a webhook delivery by how it was answered.
pub(crate) fn record_webhook(outcome: &str) {
    if let Some(metrics) = metrics() {
        metrics
            .webhook_events_total
            .with_label_values(&[outcome])
            .inc();
    }
}

#[handler]
pub(crate) async fn metrics_handler(res: &mut Response) {
    let Some(metrics) = metrics() else {
        res.status_code(StatusCode::SERVICE_UNAVAILABLE);
        return;
    };

    let encoder = TextEncoder::new();
    let mut encoded = Vec::new();

    if let Err(source) = encoder.encode(&metrics.registry.gather(), &mut encoded) {
        error!("failed to encode metrics: {source}");
        res.status_code(StatusCode::INTERNAL_SERVER_ERROR);

        return;
    }

    if let Ok(content_type) = HeaderValue::from_str(encoder.format_type()) {
        res.headers_mut().insert(CONTENT_TYPE, content_type);
    }

    res.render(String::from_utf8_lossy(&encoded).into_owned());
}

fn metrics() -> Option<&'static Metrics> {
    METRICS
        .get_or_init(|| {
            build_metrics()
                .inspect_err(|source| error!("metrics disabled: {source}"))
                .ok()
        })
        .as_ref()
}

fn name(suffix: &str) -> String {
    format!("{PREFIX}_{suffix}")
}

fn register<C>(registry: &Registry, collector: C) -> Result<C, prometheus::Error>
where
    C: Collector + Clone + 'static,
{
    registry.register(Box::new(collector.clone()))?;

    Ok(collector)
}

fn build_metrics() -> Result<Metrics, prometheus::Error> {
    let registry = Registry::new();

    let requests_total = register(
        &registry,
        IntCounterVec::new(
            Opts::new(name("http_requests_total"), "HTTP requests by method, route and status."),
            &["method", "route", "status_code"],
        )?,
    )?;

    let request_duration_seconds = register(
        &registry,
        HistogramVec::new(
            HistogramOpts::new(
                name("http_request_duration_seconds"),
                "HTTP request duration in seconds by method and route.",
            )
            .buckets(vec![0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0]),
            &["method", "route"],
        )?,
    )?;

    let requests_in_flight = register(
        &registry,
        IntGauge::new(name("http_requests_in_flight"), "HTTP requests being served.")?,
    )?;

    let orders_placed_total = register(
        &registry,
        IntCounter::new(name("orders_placed_total"), "Orders created from carts.")?,
    )?;

    let checkouts_total = register(
        &registry,
        IntCounterVec::new(
            Opts::new(name("checkouts_total"), "Checkout session attempts by result."),
            &["result"],
        )?,
    )?;

    let webhook_events_total = register(
        &registry,
        IntCounterVec::new(
            Opts::new(
                name("webhook_events_total"),
                "Payment webhook deliveries by outcome.",
            ),
            &["outcome"],
        )?,
    )?;

    Ok(Metrics {
        registry,
        requests_total,
        request_duration_seconds,
        requests_in_flight,
        orders_placed_total,
        checkouts_total,
        webhook_events_total,
    })
}

#[cfg(test)]
mod tests {
    use salvo::{
        Router, Service,
        test::{ResponseExt, TestClient},
    };
    use testresult::TestResult;

    use super::*;

    #[tokio::test]
    async fn metrics_endpoint_exposes_http_and_order_metrics() -> TestResult {
        observe_request("GET", "/orders", 200, 0.042);
        record_order_placed();
        record_checkout("started");
        record_webhook("success");

        let body = TestClient::get("http://example.com/metrics")
            .send(&Service::new(
                Router::with_path("metrics").get(metrics_handler),
            ))
            .await
            .take_string()
            .await?;

        for metric in [
            "emporium_json_http_requests_total",
            "emporium_json_http_request_duration_seconds",
            "emporium_json_http_requests_in_flight",
            "emporium_json_orders_placed_total",
            "emporium_json_checkouts_total{result=\"started\"}",
            "emporium_json_webhook_events_total{outcome=\"success\"}",
        ] {
            assert!(body.contains(metric), "expected {metric} in the exposition");
        }

        Ok(())
    }

    #[test]
    fn in_flight_guard_restores_the_gauge() {
        let before = metrics().map(|metrics| metrics.requests_in_flight.get());

        {
            let _guard = InFlightRequestGuard::track();
        }

        let after = metrics().map(|metrics| metrics.requests_in_flight.get());

        assert_eq!(before, after, "gauge should return to its starting value");
    }
}
