use std::collections::{BTreeMap, BTreeSet};

/// Auxiliary attributes that can vouch for two records describing the same entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CorroborationField {
	Company,
	Title,
	Url,
}
impl CorroborationField {
	pub const ALL: [Self; 3] = [Self::Company, Self::Title, Self::Url];

	pub fn as_str(self) -> &'static str {
		match self {
			Self::Company => "company",
			Self::Title => "title",
			Self::Url => "url",
		}
	}
}

/// Corroboration values supplied with a candidate record. Empty values are never stored.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Corroborators(BTreeMap<CorroborationField, String>);
impl Corroborators {
	pub fn insert(&mut self, field: CorroborationField, value: impl Into<String>) {
		let value = value.into();

		if value.is_empty() {
			self.0.remove(&field);
		} else {
			self.0.insert(field, value);
		}
	}

	pub fn get(&self, field: CorroborationField) -> Option<&str> {
		self.0.get(&field).map(String::as_str)
	}
}
impl<V> FromIterator<(CorroborationField, V)> for Corroborators
where
	V: Into<String>,
{
	fn from_iter<I>(iter: I) -> Self
	where
		I: IntoIterator<Item = (CorroborationField, V)>,
	{
		let mut out = Self::default();

		for (field, value) in iter {
			out.insert(field, value);
		}

		out
	}
}

/// Values historically observed for a stored record, grouped by field.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuxiliaryMetadata {
	pub companies: BTreeSet<String>,
	pub titles: BTreeSet<String>,
	pub urls: BTreeSet<String>,
}
impl AuxiliaryMetadata {
	pub fn values(&self, field: CorroborationField) -> &BTreeSet<String> {
		match field {
			CorroborationField::Company => &self.companies,
			CorroborationField::Title => &self.titles,
			CorroborationField::Url => &self.urls,
		}
	}

	/// Folds one metadata row into the sets, skipping null columns.
	pub fn push_row(&mut self, company: Option<String>, title: Option<String>, url: Option<String>) {
		if let Some(company) = company {
			self.companies.insert(company);
		}
		if let Some(title) = title {
			self.titles.insert(title);
		}
		if let Some(url) = url {
			self.urls.insert(url);
		}
	}

	pub fn is_empty(&self) -> bool {
		self.companies.is_empty() && self.titles.is_empty() && self.urls.is_empty()
	}
}

/// A candidate value corroborates when it is non-empty and appears verbatim inside at least one
/// known value.
pub fn corroborates(value: &str, known: &BTreeSet<String>) -> bool {
	!value.is_empty() && known.iter().any(|known| known.contains(value))
}

#[cfg(test)]
mod tests {
	use super::*;

	fn set(values: &[&str]) -> BTreeSet<String> {
		values.iter().map(|value| value.to_string()).collect()
	}

	#[test]
	fn substring_of_any_known_value_corroborates() {
		let known = set(&["Acme Corporation", "Globex"]);

		assert!(corroborates("Acme", &known));
		assert!(corroborates("Globex", &known));
		assert!(!corroborates("acme", &known));
		assert!(!corroborates("Initech", &known));
	}

	#[test]
	fn empty_value_or_empty_set_never_corroborates() {
		assert!(!corroborates("", &set(&["Acme"])));
		assert!(!corroborates("Acme", &BTreeSet::new()));
	}

	#[test]
	fn rows_skip_null_columns() {
		let mut aux = AuxiliaryMetadata::default();

		aux.push_row(Some("Acme".to_string()), None, Some("https://acme.test/jobs/1".to_string()));
		aux.push_row(Some("Acme".to_string()), Some("Engineer".to_string()), None);
		aux.push_row(None, None, None);

		assert_eq!(aux.companies, set(&["Acme"]));
		assert_eq!(aux.titles, set(&["Engineer"]));
		assert_eq!(aux.urls, set(&["https://acme.test/jobs/1"]));
	}

	#[test]
	fn empty_corroborator_values_are_dropped() {
		let fields: Corroborators = [
			(CorroborationField::Company, "Acme"),
			(CorroborationField::Title, ""),
		]
		.into_iter()
		.collect();

		assert_eq!(fields.get(CorroborationField::Company), Some("Acme"));
		assert_eq!(fields.get(CorroborationField::Title), None);
		assert_eq!(fields.get(CorroborationField::Url), None);
	}
}
