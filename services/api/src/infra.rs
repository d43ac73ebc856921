use ielts_band::scoring::{BandScore, Module, RawScore};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn parse_raw(raw: &str) -> Result<RawScore, String> {
    let value = raw
        .trim()
        .parse::<i64>()
        .map_err(|err| format!("failed to parse '{raw}' as a whole number ({err})"))?;
    RawScore::try_from(value).map_err(|err| err.to_string())
}

pub(crate) fn parse_band(raw: &str) -> Result<BandScore, String> {
    let value = raw
        .trim()
        .parse::<f64>()
        .map_err(|err| format!("failed to parse '{raw}' as a band score ({err})"))?;
    BandScore::new(value).map_err(|err| err.to_string())
}

/// Four comma-separated criterion bands, e.g. `6.5,7,6,6.5`.
pub(crate) fn parse_criteria(raw: &str) -> Result<[BandScore; 4], String> {
    let bands = raw
        .split(',')
        .map(parse_band)
        .collect::<Result<Vec<_>, _>>()?;
    let count = bands.len();
    bands
        .try_into()
        .map_err(|_| format!("expected 4 comma-separated bands, got {count}"))
}

pub(crate) fn parse_module(raw: &str) -> Result<Module, String> {
    Module::from_label(raw)
        .ok_or_else(|| format!("unknown module '{raw}' (expected academic or general-training)"))
}
