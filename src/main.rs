use anyhow::Context;
use notes::{
    AppState, NotesConfig,
    api::routes::create_app,
    cli::{
        Cli, Commands,
        init::{self, InitConfig, InitResult},
        output::Output,
    },
};
use std::path::Path;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is normal
    let _ = dotenvy::dotenv();

    let cli = Cli::parse_args();
    let output = Output::new(!cli.no_color);

    match cli.command {
        Some(Commands::Init {
            ref path,
            force,
            ref host,
            port,
        }) => {
            let config = InitConfig {
                path: path.clone(),
                force,
                host: host.clone(),
                port,
            };
            match init::run(config, &output) {
                InitResult::Success => Ok(()),
                InitResult::AlreadyExists => anyhow::bail!("project already initialized"),
                InitResult::Error(e) => anyhow::bail!("init failed: {e}"),
            }
        }
        Some(Commands::Config { validate }) => show_config(&cli.config, validate, &output),
        None => serve(&cli).await,
    }
}

async fn serve(cli: &Cli) -> anyhow::Result<()> {
    let config = NotesConfig::load(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;

    init_tracing(&config, cli.verbose, cli.no_color);

    let token_settings = config.token_settings()?;
    let provider = config.database_provider();
    tracing::info!(database = %provider.describe(), "opening database");
    let db = provider
        .create_client()
        .await
        .context("failed to open database")?;

    let addr = config.bind_address();
    let state = AppState::new(config, db, token_settings);
    let app = create_app(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(%addr, "notes server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("server stopped");
    Ok(())
}

/// `RUST_LOG` wins over `server.log_level`; `--verbose` raises the default to debug.
fn init_tracing(config: &NotesConfig, verbose: bool, no_color: bool) {
    let default_level = if verbose {
        "debug"
    } else {
        config.server.log_level.as_str()
    };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);
    if config.server.json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_ansi(!no_color))
            .init();
    }
}

fn show_config(path: &Path, validate: bool, output: &Output) -> anyhow::Result<()> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let config = NotesConfig::from_toml_str(&content)?;

    output.section("Configuration");
    output.field("file", &path.display().to_string());
    output.field("listen", &config.bind_address());
    output.field("log level", &config.server.log_level);
    output.field("database", &config.database_provider().describe());
    output.field("token issuer", &config.auth.issuer);
    output.field("token audience", &config.auth.audience);
    output.field(
        "token lifetime",
        &format!("{} minutes", config.auth.expires_minutes),
    );
    output.field("signing key env", &config.auth.jwt_secret_env);
    output.field("cors origins", &config.cors.allowed_origins.join(", "));

    if validate {
        output.blank();
        match config.validate() {
            Ok(()) => output.success("Configuration is valid"),
            Err(e) => {
                output.error(&e.to_string());
                anyhow::bail!("invalid configuration");
            }
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {},
                    _ = terminate.recv() => {},
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to install SIGTERM handler");
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }

    tracing::info!("shutdown signal received");
}
