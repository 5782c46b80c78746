//! Run counters for the document build.
//!
//! Counters are always recorded; they only leave the process when an exporter is
//! installed through [`init_metrics`].

use std::net::SocketAddr;

pub const DOCUMENTS_WRITTEN: &str = "pdp_documents_written_total";
pub const DOCUMENT_WRITE_FAILURES: &str = "pdp_document_write_failures_total";
pub const MISSING_INGREDIENTS: &str = "pdp_missing_ingredients_total";
pub const AAFCO_NO_MATCH: &str = "pdp_aafco_no_match_total";
pub const ANALYSIS_FRAGMENTS_SKIPPED: &str = "pdp_analysis_fragments_skipped_total";
pub const PRODUCTS_RETURNED: &str = "pdp_products_returned";

/// Installs the Prometheus exporter when `PDP_METRICS_PORT` is set.
pub fn init_metrics() {
    let Some(port) = std::env::var("PDP_METRICS_PORT")
        .ok()
        .and_then(|s| s.parse::<u16>().ok())
    else {
        return;
    };
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    let builder = metrics_exporter_prometheus::PrometheusBuilder::new().with_http_listener(addr);
    match builder.install() {
        Ok(()) => tracing::info!("Prometheus exporter listening on http://{}/metrics", addr),
        Err(e) => tracing::warn!("Prometheus exporter install failed: {}", e),
    }
}

pub struct BatchMetrics;

impl BatchMetrics {
    pub fn record_products_returned(count: usize) {
        ::metrics::gauge!(PRODUCTS_RETURNED).set(count as f64);
    }

    pub fn record_document_written() {
        ::metrics::counter!(DOCUMENTS_WRITTEN).increment(1);
    }

    pub fn record_write_failure() {
        ::metrics::counter!(DOCUMENT_WRITE_FAILURES).increment(1);
    }

    pub fn record_missing_ingredient(label: &'static str) {
        ::metrics::counter!(MISSING_INGREDIENTS, "list" => label).increment(1);
    }

    pub fn record_aafco_no_match() {
        ::metrics::counter!(AAFCO_NO_MATCH).increment(1);
    }

    pub fn record_analysis_fragment_skipped() {
        ::metrics::counter!(ANALYSIS_FRAGMENTS_SKIPPED).increment(1);
    }
}
