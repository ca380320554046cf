use sqlx::{PgPool, postgres::PgPoolOptions};

use crate::Result;

pub struct Db {
	pub pool: PgPool,
}
impl Db {
	pub async fn connect(cfg: &nodup_config::Postgres) -> Result<Self> {
		let pool =
			PgPoolOptions::new().max_connections(cfg.pool_max_conns).connect(&cfg.dsn).await?;

		tracing::info!(max_connections = cfg.pool_max_conns, "Postgres pool connected.");

		Ok(Self { pool })
	}

	/// Waits for checked-out connections to return, then closes the pool.
	pub async fn close(&self) {
		self.pool.close().await;

		tracing::info!("Postgres pool closed.");
	}
}
