use clap::Parser;
use metadata_refresh::core::runner::save_report;
use metadata_refresh::core::ConfigProvider;
use metadata_refresh::utils::{logger, validation::Validate};
use metadata_refresh::{
    AssetEndpoint, CliConfig, HttpTransport, LocalStorage, RefreshRunner, TomlConfig,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    // 初始化日誌
    logger::init_logger(logger::LogFormat::from_json_flag(cli.log_json), cli.verbose);

    tracing::info!("🚀 Starting metadata-refresh");

    match &cli.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path);
            let config = match TomlConfig::from_file(path) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("❌ Failed to load config file '{}': {}", path, e);
                    eprintln!("💡 Make sure the file exists and is valid TOML format");
                    std::process::exit(1);
                }
            };
            let monitor_enabled = cli.monitor || config.monitoring_enabled();
            execute(&config, monitor_enabled, cli.dry_run).await
        }
        None => execute(&cli, cli.monitor, cli.dry_run).await,
    }
}

async fn execute<C: ConfigProvider + Validate>(
    config: &C,
    monitor_enabled: bool,
    dry_run: bool,
) -> anyhow::Result<()> {
    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let endpoint = AssetEndpoint::new(config.base_url(), config.contract_address())?;
    let range = config.token_range()?;
    let transport =
        HttpTransport::with_options(config.api_key().map(str::to_string), config.timeout())?;

    tracing::debug!(
        "Target: {} contract {} tokens {} (api key: {}, timeout: {:?})",
        config.base_url(),
        config.contract_address(),
        range,
        if config.api_key().is_some() { "set" } else { "unset" },
        config.timeout()
    );

    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let runner = RefreshRunner::new_with_monitoring(transport, endpoint, range, monitor_enabled);

    if dry_run {
        tracing::info!("🔍 DRY RUN MODE - No requests will be sent");
        for url in runner.dry_run_urls() {
            println!("{}", url?);
        }
        return Ok(());
    }

    // Per-token failures are in the log and the report; the exit code stays 0.
    let report = runner.refresh_all().await;

    if let Some(output_path) = config.output_path() {
        let storage = LocalStorage::new(output_path.to_string());
        match save_report(&storage, &report).await {
            Ok(path) => tracing::info!("📁 Report saved to: {}", path),
            Err(e) => {
                tracing::error!("❌ Failed to save report: {}", e);
                tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            }
        }
    }

    Ok(())
}
