use prometheus::{Encoder, TextEncoder};

/// Render the default registry in Prometheus text format.
pub fn render_metrics() -> Result<String, prometheus::Error> {
    // Make sure every lookup metric is exported even before first use
    counters::init();

    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;

    String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
}

/// Lookup service metrics with msisdn_* prefix.
///
/// Registered lazily in the default prometheus registry.
pub mod counters {
    use prometheus::{
        register_histogram, register_int_counter_vec, register_int_gauge_vec, Histogram,
        IntCounterVec, IntGaugeVec,
    };
    use std::sync::OnceLock;

    use crate::classifier::ErrorKind;

    static LOOKUPS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();
    static LOOKUP_DURATION: OnceLock<Histogram> = OnceLock::new();
    static DIRECTORY_RELOADS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();
    static DIRECTORY_ENTRIES: OnceLock<IntGaugeVec> = OnceLock::new();
    static DIRECTORY_CHANGES_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();

    fn lookups_total() -> &'static IntCounterVec {
        LOOKUPS_TOTAL.get_or_init(|| {
            register_int_counter_vec!(
                "msisdn_lookups_total",
                "MSISDN lookups by outcome",
                &["outcome"]
            )
            .expect("msisdn_lookups_total registers once")
        })
    }

    fn lookup_duration() -> &'static Histogram {
        LOOKUP_DURATION.get_or_init(|| {
            register_histogram!(
                "msisdn_lookup_duration_seconds",
                "Time spent classifying an MSISDN",
                vec![0.000_001, 0.000_005, 0.000_01, 0.000_05, 0.000_1, 0.000_5, 0.001]
            )
            .expect("msisdn_lookup_duration_seconds registers once")
        })
    }

    fn directory_reloads_total() -> &'static IntCounterVec {
        DIRECTORY_RELOADS_TOTAL.get_or_init(|| {
            register_int_counter_vec!(
                "msisdn_directory_reloads_total",
                "Prefix directory reloads by result",
                &["result"]
            )
            .expect("msisdn_directory_reloads_total registers once")
        })
    }

    fn directory_entries() -> &'static IntGaugeVec {
        DIRECTORY_ENTRIES.get_or_init(|| {
            register_int_gauge_vec!(
                "msisdn_directory_entries",
                "Entries in the active prefix directory",
                &["kind"]
            )
            .expect("msisdn_directory_entries registers once")
        })
    }

    fn directory_changes_total() -> &'static IntCounterVec {
        DIRECTORY_CHANGES_TOTAL.get_or_init(|| {
            register_int_counter_vec!(
                "msisdn_directory_changes_total",
                "Runtime directory edits by operation and result",
                &["operation", "result"]
            )
            .expect("msisdn_directory_changes_total registers once")
        })
    }

    /// Register all metrics.
    pub fn init() {
        lookups_total();
        lookup_duration();
        directory_reloads_total();
        directory_entries();
        directory_changes_total();
    }

    /// Record a successful lookup.
    pub fn lookup_succeeded(seconds: f64) {
        lookups_total().with_label_values(&["success"]).inc();
        lookup_duration().observe(seconds);
    }

    /// Record a failed lookup.
    pub fn lookup_failed(kind: ErrorKind, seconds: f64) {
        lookups_total().with_label_values(&[kind.as_str()]).inc();
        lookup_duration().observe(seconds);
    }

    /// Record a directory reload attempt.
    pub fn directory_reloaded(ok: bool) {
        let result = if ok { "success" } else { "failure" };
        directory_reloads_total().with_label_values(&[result]).inc();
    }

    /// Record a runtime directory edit (add or remove of a country or operator).
    pub fn directory_changed(operation: &str, ok: bool) {
        let result = if ok { "success" } else { "failure" };
        directory_changes_total()
            .with_label_values(&[operation, result])
            .inc();
    }

    /// Publish the active directory size.
    pub fn directory_size(countries: usize, operators: usize) {
        let gauge = directory_entries();
        gauge.with_label_values(&["country"]).set(countries as i64);
        gauge.with_label_values(&["operator"]).set(operators as i64);
    }
}
