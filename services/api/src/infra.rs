use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

pub(crate) fn parse_threshold(raw: &str) -> Result<u16, String> {
    let threshold = raw
        .trim()
        .parse::<u16>()
        .map_err(|err| format!("failed to parse '{raw}' as a score ({err})"))?;
    if threshold > 100 {
        return Err(format!("threshold {threshold} exceeds the maximum score of 100"));
    }
    Ok(threshold)
}
