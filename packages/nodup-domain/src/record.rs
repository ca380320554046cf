use std::fmt::{self, Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::corroboration::Corroborators;

/// Caller-assigned record identity.
///
/// Callers send either a non-negative integer or a string, and get the same shape back.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
	Num(u64),
	Text(String),
}
impl RecordId {
	pub fn is_blank(&self) -> bool {
		match self {
			Self::Num(_) => false,
			Self::Text(text) => text.trim().is_empty(),
		}
	}
}
impl Display for RecordId {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			Self::Num(id) => write!(f, "{id}"),
			Self::Text(id) => f.write_str(id),
		}
	}
}
impl From<u64> for RecordId {
	fn from(id: u64) -> Self {
		Self::Num(id)
	}
}
impl From<&str> for RecordId {
	fn from(id: &str) -> Self {
		Self::Text(id.to_string())
	}
}
impl From<String> for RecordId {
	fn from(id: String) -> Self {
		Self::Text(id)
	}
}

/// A validated candidate record.
#[derive(Clone, Debug)]
pub struct Record {
	pub id: RecordId,
	pub description: String,
	pub corroborators: Corroborators,
}
