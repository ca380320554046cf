use sqlx::PgPool;

use crate::{Result, db::Db};
use nodup_domain::{corroboration::AuxiliaryMetadata, record::RecordId};

/// Read-only access to the externally owned table holding corroboration columns.
pub struct MetadataReader {
	pool: PgPool,
	sql: String,
}
impl MetadataReader {
	/// `cfg` names are trusted to be plain identifiers; `nodup_config::validate` enforces it.
	pub fn new(db: &Db, cfg: &nodup_config::Metadata) -> Self {
		Self { pool: db.pool.clone(), sql: lookup_sql(cfg) }
	}

	pub async fn lookup(&self, id: &RecordId) -> Result<AuxiliaryMetadata> {
		let rows: Vec<(Option<String>, Option<String>, Option<String>)> =
			sqlx::query_as(&self.sql).bind(id.to_string()).fetch_all(&self.pool).await?;
		let mut aux = AuxiliaryMetadata::default();

		for (company, title, url) in rows {
			aux.push_row(company, title, url);
		}

		Ok(aux)
	}
}

// The id is compared as text so integer and text id columns both match the caller's id.
fn lookup_sql(cfg: &nodup_config::Metadata) -> String {
	format!(
		"SELECT company, title, url FROM {table} WHERE {id_column}::text = $1",
		table = cfg.table,
		id_column = cfg.id_column,
	)
}
