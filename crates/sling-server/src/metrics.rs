// Metrics for the lock server
// Operation counters are recorded by the lock manager through the `metrics`
// facade; this module describes them and installs the Prometheus recorder.

use actix_web::{HttpResponse, web};
use metrics::describe_counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Initialize all metric descriptions
/// Should be called once at application startup
pub fn init_metrics() {
    describe_counter!(
        "sling_lock_operations_total",
        "Lock lifecycle operations by operation and outcome"
    );
}

/// Install the global Prometheus recorder.
pub fn install_recorder() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    init_metrics();
    Ok(handle)
}

/// Prometheus text exposition of every recorded metric
pub async fn render(handle: web::Data<PrometheusHandle>) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(handle.render())
}
