pub mod routes;
pub mod state;

use std::{net::SocketAddr, path::PathBuf};

use clap::Parser;
use tokio::{net::TcpListener, signal};
use tracing_subscriber::EnvFilter;

use crate::state::AppState;

#[derive(Debug, Parser)]
#[command(
	version = nodup_cli::VERSION,
	rename_all = "kebab",
	styles = nodup_cli::styles(),
)]
pub struct Args {
	#[arg(long, short = 'c', value_name = "FILE")]
	pub config: PathBuf,
}

pub async fn run(args: Args) -> color_eyre::Result<()> {
	let config = nodup_config::load(&args.config)?;

	init_tracing(&config)?;

	let http_addr: SocketAddr = config.service.http_bind.parse()?;
	let (state, db) = AppState::connect(config).await?;
	let app = routes::router(state);
	let listener = TcpListener::bind(http_addr).await?;

	tracing::info!(%http_addr, version = nodup_cli::VERSION, "HTTP server listening.");

	let served = axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await;

	db.close().await;

	tracing::info!("HTTP server stopped.");

	Ok(served?)
}

fn init_tracing(config: &nodup_config::Config) -> color_eyre::Result<()> {
	let filter =
		EnvFilter::try_new(&config.service.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::fmt().with_env_filter(filter).init();

	Ok(())
}

// Resolves on the first SIGINT or SIGTERM. A listener that fails to install only disables its own
// signal.
async fn shutdown_signal() {
	let interrupt = async {
		if let Err(err) = signal::ctrl_c().await {
			tracing::error!(error = %err, "Failed to listen for SIGINT.");
			std::future::pending::<()>().await;
		}
	};
	#[cfg(unix)]
	let terminate = async {
		match signal::unix::signal(signal::unix::SignalKind::terminate()) {
			Ok(mut stream) => {
				stream.recv().await;
			},
			Err(err) => {
				tracing::error!(error = %err, "Failed to listen for SIGTERM.");
				std::future::pending::<()>().await;
			},
		}
	};
	#[cfg(not(unix))]
	let terminate = std::future::pending::<()>();

	tokio::select! {
		_ = interrupt => tracing::info!("SIGINT received. Draining in-flight requests."),
		_ = terminate => tracing::info!("SIGTERM received. Draining in-flight requests."),
	}
}
