use std::process::ExitCode;
use std::sync::Arc;

use intranet_backend::adapters::http::{
    app_router, LoginHandlers, RouterConfig, SubmissionHandlers, UploadLimits,
};
use intranet_backend::adapters::{LocalSubmissionStore, MySqlIdentityConnector};
use intranet_backend::application::{AuthenticateHandler, CredentialGateway, SubmitHandler};
use intranet_backend::config::AppConfig;
use intranet_backend::telemetry;

#[tokio::main]
async fn main() -> ExitCode {
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("failed to load configuration: {e}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = config.validate() {
        eprintln!("invalid configuration: {e}");
        return ExitCode::FAILURE;
    }
    if let Err(e) = telemetry::init(&config.server) {
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "server terminated");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: AppConfig) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let connector = MySqlIdentityConnector::new(&config.database, &config.auth)?;
    let gateway = CredentialGateway::from_config(Arc::new(connector), &config.database);
    let login = LoginHandlers::new(Arc::new(AuthenticateHandler::new(gateway)));

    tokio::fs::create_dir_all(&config.upload.storage_dir).await?;
    let store = LocalSubmissionStore::new(&config.upload.storage_dir);
    let submissions = SubmissionHandlers::new(
        Arc::new(SubmitHandler::new(Arc::new(store))),
        UploadLimits::from(&config.upload),
    );

    let app = app_router(login, submissions, &RouterConfig::from(&config));

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(
        %addr,
        environment = ?config.server.environment,
        database_host = %config.database.host,
        storage_dir = %config.upload.storage_dir.display(),
        "intranet backend listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
