//! Service Metrics
//!
//! Process-global prometheus metrics for the prediction path. Aggregated
//! counters complement the per-call reports from the instrumentation
//! wrapper; they are exposed by the metrics listener at `/metrics`.

use once_cell::sync::Lazy;
use prometheus::{Histogram, IntCounterVec};

/// Outcome label values for [`PREDICTIONS_TOTAL`]
pub mod outcome {
    pub const OK: &str = "ok";
    pub const INVALID: &str = "invalid";
    pub const UNAVAILABLE: &str = "unavailable";
    pub const ERROR: &str = "error";
}

/// Total prediction requests, by outcome
pub static PREDICTIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    prometheus::register_int_counter_vec!(
        "irisserve_predictions_total",
        "Total number of prediction requests by outcome",
        &["outcome"]
    )
    .expect("register irisserve_predictions_total")
});

/// Wall-clock latency of successful prediction requests
pub static PREDICT_DURATION_SECONDS: Lazy<Histogram> = Lazy::new(|| {
    prometheus::register_histogram!(
        "irisserve_predict_duration_seconds",
        "Prediction request latency in seconds"
    )
    .expect("register irisserve_predict_duration_seconds")
});

/// Record one finished prediction request.
pub fn record_prediction(outcome: &str, duration_secs: f64) {
    PREDICTIONS_TOTAL.with_label_values(&[outcome]).inc();
    if outcome == outcome::OK {
        PREDICT_DURATION_SECONDS.observe(duration_secs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_prediction_counts_by_outcome() {
        let before = PREDICTIONS_TOTAL
            .with_label_values(&[outcome::UNAVAILABLE])
            .get();

        record_prediction(outcome::UNAVAILABLE, 0.0);

        let after = PREDICTIONS_TOTAL
            .with_label_values(&[outcome::UNAVAILABLE])
            .get();
        assert_eq!(after, before + 1);
    }

    #[test]
    fn test_only_successful_requests_feed_the_histogram() {
        let before = PREDICT_DURATION_SECONDS.get_sample_count();

        record_prediction(outcome::ERROR, 1.0);
        assert_eq!(PREDICT_DURATION_SECONDS.get_sample_count(), before);

        record_prediction(outcome::OK, 0.01);
        assert_eq!(PREDICT_DURATION_SECONDS.get_sample_count(), before + 1);
    }
}
