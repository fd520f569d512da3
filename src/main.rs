use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;

use voxscribe::application::services::{NoiseCalibrator, TranscriptionClient, TranscriptionPipeline};
use voxscribe::infrastructure::audio::{CpalCaptureDevice, SpeechProviderFactory, SymphoniaAudioDecoder};
use voxscribe::infrastructure::observability::{TracingConfig, init_tracing};
use voxscribe::infrastructure::storage::LocalHoldingArea;
use voxscribe::presentation::{AppState, Environment, Settings, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment = Environment::from_env().map_err(anyhow::Error::msg)?;
    let settings = Settings::load(environment).context("Failed to load settings")?;

    init_tracing(&TracingConfig::new(
        environment.as_str(),
        settings.logging.enable_json,
        &settings.logging.level,
    ));

    let holding_area = Arc::new(
        LocalHoldingArea::new(PathBuf::from(&settings.storage.upload_dir))
            .context("Failed to prepare upload directory")?,
    );

    let provider = SpeechProviderFactory::create(&settings.provider)
        .context("Failed to configure speech provider")?;
    let client = TranscriptionClient::new(provider, settings.provider.timeout());

    let capture_device = Arc::new(CpalCaptureDevice::new(
        settings.capture.listener(),
        settings.capture.chunk_size,
    ));

    let pipeline = Arc::new(TranscriptionPipeline::new(
        capture_device,
        Arc::new(SymphoniaAudioDecoder),
        holding_area,
        NoiseCalibrator::new(settings.capture.calibration()),
        client,
        settings.pipeline(),
    ));

    tracing::info!(
        environment = %environment,
        provider = pipeline.provider_name(),
        upload_dir = %settings.storage.upload_dir,
        "Transcription pipeline ready"
    );

    let router = create_router(AppState::new(pipeline, &settings));

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("API server listening on http://{}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
