use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder};

pub fn init_metrics() {
    describe_counter!(
        "vision_app_infer_requests_total",
        "Total number of inference form submissions by outcome status"
    );
    describe_histogram!(
        "vision_app_infer_duration_seconds",
        "Wall-clock duration of the backend chat-completions call"
    );
}

/// Starts the Prometheus exporter on its own listener. Called once at
/// startup, before any request is served.
pub fn start_prometheus(host: &str, port: u16) {
    init_metrics();

    let duration_matcher = Matcher::Suffix(String::from("duration_seconds"));
    let duration_bucket = [
        0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 15.0, 30.0, 60.0, 120.0,
    ];

    let ip_addr: IpAddr = host
        .parse()
        .unwrap_or(IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)));
    let socket_addr = SocketAddr::new(ip_addr, port);

    PrometheusBuilder::new()
        .with_http_listener(socket_addr)
        .upkeep_timeout(Duration::from_secs(5 * 60))
        .set_buckets_for_metric(duration_matcher, &duration_bucket)
        .expect("failed to set duration bucket")
        .install()
        .expect("failed to install Prometheus metrics exporter");
}

pub struct InferMetrics;

impl InferMetrics {
    /// status is one of success, error, bad_request, not_configured.
    pub fn record_outcome(status: &str) {
        counter!("vision_app_infer_requests_total",
            "status" => status.to_string()
        )
        .increment(1);
    }

    pub fn record_infer_duration(duration: Duration) {
        histogram!("vision_app_infer_duration_seconds").record(duration.as_secs_f64());
    }
}
