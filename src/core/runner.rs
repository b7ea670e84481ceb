use crate::core::endpoint::AssetEndpoint;
use crate::core::{AssetTransport, RefreshOutcome, RefreshReport, Storage, TokenRange};
use crate::utils::error::Result;
use crate::utils::monitor::{RefreshProgress, SystemMonitor};
use url::Url;

pub const REPORT_FILE_NAME: &str = "refresh_report.json";

/// Writes the report as pretty JSON and returns where it landed.
pub async fn save_report<S: Storage>(storage: &S, report: &RefreshReport) -> Result<String> {
    let json = report.to_json()?;
    storage.write_file(REPORT_FILE_NAME, json.as_bytes()).await
}

/// Walks a token range one request at a time, asking the marketplace to
/// re-index each token. Individual failures are logged and recorded, never
/// propagated.
pub struct RefreshRunner<T: AssetTransport> {
    transport: T,
    endpoint: AssetEndpoint,
    range: TokenRange,
    monitor: SystemMonitor,
}

impl<T: AssetTransport> RefreshRunner<T> {
    pub fn new(transport: T, endpoint: AssetEndpoint, range: TokenRange) -> Self {
        Self::new_with_monitoring(transport, endpoint, range, false)
    }

    pub fn new_with_monitoring(
        transport: T,
        endpoint: AssetEndpoint,
        range: TokenRange,
        monitor_enabled: bool,
    ) -> Self {
        Self {
            transport,
            endpoint,
            range,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub fn range(&self) -> TokenRange {
        self.range
    }

    pub fn endpoint(&self) -> &AssetEndpoint {
        &self.endpoint
    }

    /// URLs `refresh_all` would request, in order. Lazy, so any range size is fine.
    pub fn dry_run_urls(&self) -> impl Iterator<Item = Result<Url>> + '_ {
        self.range
            .ids()
            .map(|token_id| self.endpoint.token_url(token_id))
    }

    pub async fn refresh_one(&self, token_id: u64) -> RefreshOutcome {
        let result = match self.endpoint.token_url(token_id) {
            Ok(url) => {
                tracing::debug!("GET {}", url);
                self.transport.get_json(&url).await
            }
            Err(e) => Err(e),
        };

        let outcome = RefreshOutcome::from_result(token_id, result);
        match &outcome {
            RefreshOutcome::Refreshed { .. } => tracing::info!("{}", outcome),
            RefreshOutcome::Failed { kind, .. } => tracing::error!(?kind, "{}", outcome),
        }
        outcome
    }

    pub async fn refresh_all(&self) -> RefreshReport {
        tracing::info!(
            "🔄 Refreshing metadata. Contract address: {} - Token IDs: {}",
            self.endpoint.contract_address(),
            self.range
        );
        let mut progress = RefreshProgress::new(self.range.len());
        self.monitor.log_stats("Start", &progress);

        let mut report = RefreshReport::new(self.endpoint.contract_address(), self.range);
        for token_id in self.range.ids() {
            let outcome = self.refresh_one(token_id).await;
            progress.record(outcome.is_success());
            if self.monitor.is_enabled() && progress.is_checkpoint() {
                self.monitor.log_stats("Progress", &progress);
            }
            report.record(outcome);
        }
        report.finish();

        self.monitor.log_final_stats(&progress);
        tracing::info!(
            "✅ Refresh finished: {} requested, {} succeeded, {} failed",
            report.total(),
            report.succeeded(),
            report.failed()
        );
        if report.failed() > 0 {
            tracing::warn!("Failed token IDs: {:?}", report.failed_token_ids());
        }

        report
    }
}
