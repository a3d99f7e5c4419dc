use once_cell::sync::Lazy;
use prometheus::{register_int_counter, register_int_counter_vec, Encoder, IntCounter, IntCounterVec, TextEncoder};

// Prometheus metrics (default registry)
pub static SNAPSHOT_READS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "catalog_snapshot_reads_total",
        "Total catalog snapshot reads against the blob store"
    )
    .expect("register snapshot_reads_total")
});

pub static SNAPSHOT_READ_FALLBACKS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "catalog_snapshot_read_fallbacks_total",
        "Snapshot reads that failed and were served as an empty catalog"
    )
    .expect("register snapshot_read_fallbacks_total")
});

pub static SNAPSHOT_WRITES_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "catalog_snapshot_writes_total",
        "Total full-snapshot writes to the blob store"
    )
    .expect("register snapshot_writes_total")
});

pub static REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "catalog_requests_total",
        "Catalog endpoint requests by method and status",
        &["method", "status"]
    )
    .expect("register requests_total")
});

pub fn record_request(method: &str, status: u16) {
    REQUESTS_TOTAL.with_label_values(&[method, &status.to_string()]).inc();
}

/// Render the default registry in the Prometheus text format.
pub fn render() -> Result<String, prometheus::Error> {
    // touch the statics so they show up before first use
    Lazy::force(&SNAPSHOT_READS_TOTAL);
    Lazy::force(&SNAPSHOT_READ_FALLBACKS_TOTAL);
    Lazy::force(&SNAPSHOT_WRITES_TOTAL);
    Lazy::force(&REQUESTS_TOTAL);

    let mut buf = Vec::new();
    TextEncoder::new().encode(&prometheus::gather(), &mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
