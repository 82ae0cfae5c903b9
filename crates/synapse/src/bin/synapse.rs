use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use clap::Parser;
use synapse::{
    article::HttpArticleLoader,
    catalog::ModelCatalog,
    gemini::{GeminiClient, DEFAULT_BASE_URL},
    server::router,
    tracing::init_tracing_subscriber,
    yt::{normalize_languages, transcript::YoutubeTranscripts, DEFAULT_TRANSCRIPT_LANGUAGES},
    SynapseBuilder,
};

#[derive(Parser)]
#[command(name = "synapse", about = "Summarize videos, articles and text with Gemini")]
struct Cli {
    /// Google Generative AI API key
    #[arg(long, env = "GOOGLE_API_KEY", hide_env_values = true)]
    google_api_key: Option<String>,

    /// Address the http server listens on
    #[arg(long, env = "SYNAPSE_BIND_ADDR", default_value = "0.0.0.0:3000")]
    bind_addr: SocketAddr,

    /// Gemini REST endpoint
    #[arg(long, env = "GEMINI_BASE_URL", default_value = DEFAULT_BASE_URL)]
    gemini_base_url: String,

    /// Catalog model used when a request names none, and for translation
    #[arg(long, env = "SYNAPSE_DEFAULT_MODEL")]
    default_model: Option<String>,

    /// Transcript languages to try, in order
    #[arg(long, env = "SYNAPSE_TRANSCRIPT_LANGUAGES", value_delimiter = ',')]
    transcript_languages: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let _guard = sentry::init((
        std::env::var("SENTRY_DSN").unwrap_or_default(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    ));

    init_tracing_subscriber()?;

    let cli = Cli::parse();

    let mut catalog = ModelCatalog::default();
    if let Some(ref model) = cli.default_model {
        catalog = catalog
            .with_default(model)
            .context("SYNAPSE_DEFAULT_MODEL is not a catalog model")?;
    }

    let mut languages = normalize_languages(&cli.transcript_languages);
    if languages.is_empty() {
        languages = normalize_languages(DEFAULT_TRANSCRIPT_LANGUAGES);
    }

    let http = reqwest::Client::new();
    let gemini = GeminiClient::new(cli.google_api_key)
        .with_client(http.clone())
        .with_base_url(cli.gemini_base_url);

    if !gemini.has_credential() {
        tracing::warn!("GOOGLE_API_KEY is not set; summarize and translate requests will fail");
    }

    let synapse = SynapseBuilder::new()
        .transcripts(YoutubeTranscripts::new(http.clone()))
        .articles(HttpArticleLoader::new(http))
        .invoker(gemini)
        .catalog(catalog)
        .transcript_languages(languages)
        .build();

    let app = router(Arc::new(synapse));

    let listener = tokio::net::TcpListener::bind(cli.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", cli.bind_addr))?;

    tracing::info!(addr = %cli.bind_addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down");
        })
        .await?;

    Ok(())
}
