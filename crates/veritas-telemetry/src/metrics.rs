//! Validation metrics.
//!
//! Recorded through the `metrics` facade; no exporter is bundled, so the
//! host application installs whichever recorder it already uses. Without a
//! recorder every call here is a no-op.
//!
//! # Standard Metrics
//!
//! | Metric | Type | Labels | Description |
//! |--------|------|--------|-------------|
//! | `veritas_validations_total` | Counter | `schema`, `outcome` | Validation calls |
//! | `veritas_validation_duration_seconds` | Histogram | `schema` | Validation latency |
//! | `veritas_validation_errors_total` | Counter | `schema`, `code` | Error entries produced |

use std::time::Duration;

use metrics::{counter, describe_counter, describe_histogram, histogram};
use veritas_core::ErrorEntry;

/// Metric names.
pub mod names {
    /// Validation call counter.
    pub const VALIDATIONS_TOTAL: &str = "veritas_validations_total";
    /// Validation latency histogram.
    pub const VALIDATION_DURATION_SECONDS: &str = "veritas_validation_duration_seconds";
    /// Error entry counter.
    pub const VALIDATION_ERRORS_TOTAL: &str = "veritas_validation_errors_total";
}

/// Outcome label for a successful validation.
pub const OUTCOME_VALID: &str = "valid";

/// Outcome label for a failed validation.
pub const OUTCOME_INVALID: &str = "invalid";

/// Registers descriptions for all standard metrics.
///
/// Call once after installing a recorder.
pub fn describe_metrics() {
    describe_counter!(
        names::VALIDATIONS_TOTAL,
        "Total number of validation calls by outcome"
    );
    describe_histogram!(
        names::VALIDATION_DURATION_SECONDS,
        "Validation duration in seconds"
    );
    describe_counter!(
        names::VALIDATION_ERRORS_TOTAL,
        "Total number of validation error entries by error code"
    );
}

/// Records a completed validation.
///
/// Updates the following metrics:
/// - `veritas_validations_total` (incremented once)
/// - `veritas_validation_duration_seconds` (histogram observation)
/// - `veritas_validation_errors_total` (incremented per error entry)
pub fn record_validation(schema: &str, duration: Duration, errors: &[ErrorEntry]) {
    let outcome = if errors.is_empty() {
        OUTCOME_VALID
    } else {
        OUTCOME_INVALID
    };

    counter!(
        names::VALIDATIONS_TOTAL,
        "schema" => schema.to_string(),
        "outcome" => outcome
    )
    .increment(1);

    histogram!(
        names::VALIDATION_DURATION_SECONDS,
        "schema" => schema.to_string()
    )
    .record(duration.as_secs_f64());

    for entry in errors {
        counter!(
            names::VALIDATION_ERRORS_TOTAL,
            "schema" => schema.to_string(),
            "code" => entry.error_code.as_str()
        )
        .increment(1);
    }
}
