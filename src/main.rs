use polly_audiobook::domain::audiobook::{AudiobookService, AudiobookServiceApi};
use polly_audiobook::infrastructure::config::{Config, LogFormat, ReportFormat};
use polly_audiobook::infrastructure::repositories::{PollySynthesisRepository, S3BlobRepository};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        tracing::error!(error = %e, "Aborting before any further synthesis work");
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        text_file = %config.text_file.display(),
        output_dir = %config.output_dir.display(),
        bucket = %config.bucket,
        key_prefix = %config.key_prefix,
        voice = %config.voice_id,
        engine = %config.engine,
        output_format = %config.output_format,
        "Starting audiobook synthesis"
    );

    // Fail fast before touching AWS
    if !config.text_file.is_file() {
        return Err(polly_audiobook::error::AppError::InputNotFound(config.text_file.clone()).into());
    }

    // Create AWS clients
    tracing::info!("Initializing AWS clients with region: {}", config.aws_region);

    let mut aws_loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(aws_config::Region::new(config.aws_region.clone()));
    if let Some(endpoint) = &config.aws_endpoint_url {
        aws_loader = aws_loader.endpoint_url(endpoint);
    }
    let aws_config = aws_loader.load().await;

    // Log AWS config details (without exposing credentials)
    tracing::info!(
        region = ?aws_config.region(),
        endpoint = ?config.aws_endpoint_url,
        "AWS configuration loaded"
    );

    let polly_client = Arc::new(aws_sdk_polly::Client::new(&aws_config));
    let s3_client = Arc::new(aws_sdk_s3::Client::new(&aws_config));
    tracing::info!("AWS Polly and S3 clients initialized successfully");

    // Wire repositories into the service
    let synthesis_repo = Arc::new(PollySynthesisRepository::new(polly_client));
    let blob_repo = Arc::new(S3BlobRepository::new(s3_client));
    let service = AudiobookService::new(&config, synthesis_repo, blob_repo)?;

    let report = service.narrate_file(&config.text_file).await?;

    match config.report_format {
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        ReportFormat::Text => println!("{}", report),
    }

    Ok(())
}

fn init_logging(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "polly_audiobook=info,aws_config=warn".into());

    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
            .init();
    }
}
