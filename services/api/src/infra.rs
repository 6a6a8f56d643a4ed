use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use staff_portal::config::PortalConfig;
use staff_portal::error::AppError;
use staff_portal::portal::{FundRecordImporter, PortalState, SharedPortal};
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, RwLock};
use tracing::info;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn shared_portal(state: PortalState) -> SharedPortal {
    Arc::new(RwLock::new(state))
}

/// Seeded portal, with its fund ledger replaced by a CSV export when one is given.
pub(crate) fn load_portal(
    config: &PortalConfig,
    funds_csv: Option<PathBuf>,
) -> Result<PortalState, AppError> {
    let mut state = PortalState::seeded(config);
    if let Some(path) = funds_csv {
        let records = FundRecordImporter::from_path(&path)?;
        info!(path = %path.display(), count = records.len(), "fund ledger imported");
        state.set_fund_records(records);
    }
    Ok(state)
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
