//! Token request metrics
//!
//! - `spotify_token_requests_total` (counter): labels `grant_type`, `outcome`
//! - `spotify_token_request_duration_seconds` (histogram): label `grant_type`
//!
//! The library only emits; installing a recorder is the application's call.
//! Without one these are no-ops.

/// Record one token endpoint exchange attempt.
pub fn record_token_request(grant_type: &'static str, outcome: &'static str, duration_secs: f64) {
    metrics::counter!(
        "spotify_token_requests_total",
        "grant_type" => grant_type,
        "outcome" => outcome
    )
    .increment(1);
    metrics::histogram!("spotify_token_request_duration_seconds", "grant_type" => grant_type)
        .record(duration_secs);
}
