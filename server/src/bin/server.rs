use std::{
    net::{IpAddr, SocketAddr},
    sync::Arc,
};

use camino::Utf8PathBuf as PathBuf;
use clap::Parser;
use eyre::{Context, Result};
use kavian::{
    app_state::{AppState, SharedState},
    mail::SmtpMailer,
    routes,
};
use tokio::signal;
use tracing::{error, info};
use tracing_error::ErrorLayer;
use tracing_subscriber::{prelude::*, EnvFilter};

#[derive(Parser)]
#[command(version, about = "Contact form mail relay", long_about = None)]
struct Cli {
    #[arg(short, long)]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    if std::env::var("RUST_LIB_BACKTRACE").is_err() {
        std::env::set_var("RUST_LIB_BACKTRACE", "1")
    }
    if std::env::var("RUST_SPANTRACE").is_err() {
        std::env::set_var("RUST_SPANTRACE", "1");
    }
    color_eyre::install()?;
    tracing_subscriber::registry()
        .with(EnvFilter::from_env("KAVIAN_LOG"))
        .with(ErrorLayer::default())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config_path = PathBuf::from(args.config);
    let config = kavian_core::config::read_config(&config_path).await?;
    let mail_config = config.mail()?;
    let mailer = SmtpMailer::from_config(mail_config)?;
    let shared_state: SharedState = Arc::new(AppState {
        mailer: Box::new(mailer),
        recipient: mail_config.recipient.clone(),
    });

    let addr: IpAddr = config
        .server
        .address
        .parse()
        .wrap_err("error parsing listening address")?;
    let socket_addr = SocketAddr::new(addr, config.server.port);
    let app = routes::app(shared_state);
    let listener = tokio::net::TcpListener::bind(socket_addr)
        .await
        .wrap_err("Error binding socket")?;
    info!(%socket_addr, "Server running");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .wrap_err("server error")?;
    info!("Shutting down...");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = signal::ctrl_c().await {
        // we also shut down in case of error
        error!("Unable to listen for shutdown signal: {}", err);
    }
}
