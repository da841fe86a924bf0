use anyhow::{Context, Result};
use clap::Parser;

use shoresquad_offline::{CacheTag, DiskCacheStorage, HttpNetwork, OfflineWorker};
use shoresquad_ui::app_services::{
    crew_directory, default_coordinate_source, profile_store, weather_pipeline,
};
use shoresquad_ui::{AppState, ConfiguredGeolocator, PageController};

#[derive(Debug, Parser)]
#[command(name = "shoresquad")]
#[command(author, version, about = "Renders the ShoreSquad page")]
struct Cli {
    /// Install and activate the offline cache before rendering
    #[arg(long)]
    sync_offline: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize core
    shoresquad_core::init()?;

    // Create and initialize application
    let mut app = shoresquad_core::App::new()?;
    app.initialize()?;
    let config = app.shared_config();

    tracing::info!("ShoreSquad started");

    if cli.sync_offline {
        sync_offline_cache(&config).await?;
    }

    let profiles = profile_store(&config).context("Failed to open profile storage")?;
    let pipeline = weather_pipeline(&config, ConfiguredGeolocator::from_config(&config))
        .context("Failed to set up weather")?;

    let mut page = PageController::new(
        AppState::new(crew_directory(&config)),
        profiles,
        pipeline,
    );
    page.boot();
    page.request_weather(default_coordinate_source(&config)).await;

    let html = page.page().document().context("Failed to render page")?;
    println!("{}", html);

    // Graceful shutdown
    app.shutdown()?;

    Ok(())
}

async fn sync_offline_cache(config: &shoresquad_core::Config) -> Result<()> {
    let offline = &config.offline;
    let storage = DiskCacheStorage::open_root(&offline.cache_dir)
        .context("Failed to open offline cache")?;
    let origin = url::Url::parse(&offline.origin).context("Invalid offline origin")?;
    let network = HttpNetwork::new(origin)?;

    let worker = OfflineWorker::new(
        CacheTag::new(offline.cache_tag.clone()),
        &offline.origin,
        storage,
        network,
    )?
    .with_assets(offline.assets.clone())
    .with_fallback_page(offline.fallback_page.clone());

    let report = worker.install().await?;
    let deleted = worker.activate().await?;
    tracing::info!(
        cached = report.cached.len(),
        failed = report.failed.len(),
        deleted = deleted.len(),
        "Offline cache ready"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sync_offline_flag() {
        assert!(Cli::try_parse_from(["shoresquad", "--sync-offline"])
            .unwrap()
            .sync_offline);
        assert!(!Cli::try_parse_from(["shoresquad"]).unwrap().sync_offline);
    }

    #[test]
    fn test_unknown_arguments_are_rejected() {
        assert!(Cli::try_parse_from(["shoresquad", "--sync-ofline"]).is_err());
        assert!(Cli::try_parse_from(["shoresquad", "--bogus"]).is_err());
    }
}
