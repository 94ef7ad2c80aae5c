use std::{net::SocketAddr, sync::Arc};

use clap::{Parser, Subcommand};
use folio::{Folio, FolioBuilder, SqliteRepositoryProvider};
use folio_axum::CookieConfig;
use tokio::{net::TcpListener, signal, sync::watch};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;

use config::AppConfig;

#[derive(Parser)]
#[command(name = "folio", version, about = "Portfolio site backend")]
struct Cli {
    /// Database URL, overrides DATABASE_URL
    #[arg(long, global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (the default)
    Serve {
        /// Address to listen on, overrides FOLIO_BIND
        #[arg(long)]
        bind: Option<SocketAddr>,
    },
    /// Apply database migrations and exit
    Migrate,
    /// Create an admin account
    CreateAdmin {
        #[arg(long)]
        email: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, env = "FOLIO_ADMIN_PASSWORD", hide_env_values = true)]
        password: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "info,folio=debug".into()),
        )
        .init();

    let cli = Cli::parse();
    let mut config = AppConfig::from_env()?;
    if let Some(database_url) = cli.database_url {
        config.database_url = database_url;
    }

    match cli.command.unwrap_or(Command::Serve { bind: None }) {
        Command::Serve { bind } => {
            if let Some(bind) = bind {
                config.bind = bind;
            }
            serve(config).await
        }
        Command::Migrate => {
            let folio = connect(&config, tooling_secret(&config)).await?;
            folio.migrate().await?;
            info!(database_url = %config.database_url, "Migrations applied");
            Ok(())
        }
        Command::CreateAdmin {
            email,
            name,
            password,
        } => {
            let folio = connect(&config, tooling_secret(&config)).await?;
            folio.migrate().await?;
            let user = folio.create_admin(&email, name, &password).await?;
            info!(user_id = %user.id, email = %user.email, "Admin account created");
            Ok(())
        }
    }
}

async fn serve(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let folio = FolioBuilder::new()
        .with_sqlite(&config.database_url)
        .await?
        .with_session_secret(config.require_session_secret()?)?
        .with_session_expiry(config.session_ttl)
        .with_turnstile_secret(config.turnstile_secret.clone())
        .with_mailer_from_env()?
        .apply_migrations(true)
        .build()
        .await?;
    let folio = Arc::new(folio);

    if folio.count_users().await? == 0 {
        tracing::warn!("No admin account yet, create one with `folio create-admin`");
    }

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let cleanup = folio.login_protection().start_cleanup_task(shutdown_rx);

    let app = folio_axum::routes(folio)
        .with_cookie_config(CookieConfig::default().with_secure(config.cookie_secure))
        .build();

    let listener = TcpListener::bind(config.bind).await?;
    info!("Listening on {}", listener.local_addr()?);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    let _ = shutdown_tx.send(true);
    let _ = cleanup.await;
    info!("Server stopped");
    Ok(())
}

/// Maintenance commands never sign sessions, so any key will do when none is configured.
fn tooling_secret(config: &AppConfig) -> Vec<u8> {
    config
        .session_secret
        .clone()
        .unwrap_or_else(|| rand::random::<[u8; 32]>().to_vec())
}

async fn connect(
    config: &AppConfig,
    secret: Vec<u8>,
) -> Result<Folio<SqliteRepositoryProvider>, Box<dyn std::error::Error>> {
    let folio = FolioBuilder::new()
        .with_sqlite(&config.database_url)
        .await?
        .with_session_secret(secret)?
        .build()
        .await?;
    Ok(folio)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
