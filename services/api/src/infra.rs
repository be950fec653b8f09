use avvia::config::PipelineSettings;
use avvia::error::AppError;
use avvia::workflows::campaign::pipeline::{
    CampaignPipelineService, InMemoryOutbox, InMemoryPipelineStore,
};
use avvia::workflows::campaign::CampaignBlueprint;
use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) type PipelineService = CampaignPipelineService<InMemoryPipelineStore, InMemoryOutbox>;

/// In-memory pipeline, seeded with the demo campaign when the settings ask
/// for it.
pub(crate) fn build_pipeline(
    settings: PipelineSettings,
) -> Result<(Arc<PipelineService>, Arc<InMemoryOutbox>), AppError> {
    let store = Arc::new(InMemoryPipelineStore::new());
    let outbox = Arc::new(InMemoryOutbox::new());
    let seed = settings.seed_demo;
    let today = settings.today();
    let service = CampaignPipelineService::new(store, outbox.clone(), settings);

    if seed {
        service.seed(CampaignBlueprint::demo(today))?;
    }

    Ok((Arc::new(service), outbox))
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
